//! Validation constraints consumed for column sizing.
//!
//! Constraints are evaluated elsewhere; the binder only reads their bounds.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Constraints declared on one property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSet {
    /// Minimum numeric value.
    pub min: Option<f64>,
    /// Maximum numeric value.
    pub max: Option<f64>,
    /// Numeric range `[min, max]`.
    pub range: Option<(f64, f64)>,
    /// Size range `[min, max]` for strings and collections.
    pub size: Option<(u32, u32)>,
    /// Minimum size.
    pub min_size: Option<u32>,
    /// Maximum size.
    pub max_size: Option<u32>,
    /// Decimal scale.
    pub scale: Option<u32>,
    /// Allowed values.
    pub in_list: Option<Vec<String>>,
    /// Whether null is allowed.
    pub nullable: Option<bool>,
    /// Whether blank strings are allowed.
    pub blank: Option<bool>,
    /// Whether the value must be unique.
    pub unique: Option<bool>,
}

impl ConstraintSet {
    /// Create an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain the size to `[min, max]`.
    pub fn size(mut self, min: u32, max: u32) -> Self {
        self.size = Some((min, max));
        self
    }

    /// Constrain the maximum size.
    pub fn max_size(mut self, max: u32) -> Self {
        self.max_size = Some(max);
        self
    }

    /// Constrain the value to `[min, max]`.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Constrain the minimum value.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Constrain the maximum value.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the scale.
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Restrict to a list of values.
    pub fn in_list(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.in_list = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Effective maximum size: explicit max size, else the size range's upper bound.
    pub fn effective_max_size(&self) -> Option<u32> {
        self.max_size.or(self.size.map(|(_, max)| max))
    }

    /// Effective minimum value: explicit min, else the range's lower bound.
    pub fn effective_min(&self) -> Option<f64> {
        self.min.or(self.range.map(|(min, _)| min))
    }

    /// Effective maximum value: explicit max, else the range's upper bound.
    pub fn effective_max(&self) -> Option<f64> {
        self.max.or(self.range.map(|(_, max)| max))
    }
}

/// Source of per-property constraints.
pub trait ConstraintSource: Send + Sync {
    /// Constraints declared on `entity.property`, if any.
    fn constraints_for(&self, entity: &str, property: &str) -> Option<ConstraintSet>;
}

/// Constraint source backed by a map keyed by entity then property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryConstraints {
    entries: HashMap<String, HashMap<String, ConstraintSet>>,
}

impl InMemoryConstraints {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register constraints for a property.
    pub fn with(
        mut self,
        entity: impl Into<String>,
        property: impl Into<String>,
        constraints: ConstraintSet,
    ) -> Self {
        self.entries
            .entry(entity.into())
            .or_default()
            .insert(property.into(), constraints);
        self
    }
}

impl ConstraintSource for InMemoryConstraints {
    fn constraints_for(&self, entity: &str, property: &str) -> Option<ConstraintSet> {
        self.entries.get(entity)?.get(property).cloned()
    }
}

/// A source that never has constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstraints;

impl ConstraintSource for NoConstraints {
    fn constraints_for(&self, _entity: &str, _property: &str) -> Option<ConstraintSet> {
        None
    }
}
