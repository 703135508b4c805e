//! Cached override lookup with layered fallback.

use super::mapping::MappingOverride;
use super::property::PropertyConfig;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Source of mapping overrides, usually an external DSL evaluator.
pub trait OverrideSource: Send + Sync {
    /// Override tree for an entity, if one was declared.
    fn override_for(&self, entity: &str) -> Option<MappingOverride>;
}

/// Override source backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOverrides {
    overrides: HashMap<String, MappingOverride>,
}

impl InMemoryOverrides {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override for an entity.
    pub fn with(mut self, entity: impl Into<String>, mapping: MappingOverride) -> Self {
        self.overrides.insert(entity.into(), mapping);
        self
    }

    /// Register an override for an entity.
    pub fn insert(&mut self, entity: impl Into<String>, mapping: MappingOverride) {
        self.overrides.insert(entity.into(), mapping);
    }
}

impl From<HashMap<String, MappingOverride>> for InMemoryOverrides {
    fn from(overrides: HashMap<String, MappingOverride>) -> Self {
        Self { overrides }
    }
}

impl OverrideSource for InMemoryOverrides {
    fn override_for(&self, entity: &str) -> Option<MappingOverride> {
        self.overrides.get(entity).cloned()
    }
}

/// Resolves overrides per entity, evaluating each source entry at most once.
///
/// Property lookups fall through: explicit property config, then the
/// entity's `*` entry, then the global default (property, then `*`).
pub struct OverrideResolver {
    source: Arc<dyn OverrideSource>,
    global: MappingOverride,
    cache: DashMap<String, Option<Arc<MappingOverride>>>,
}

impl OverrideResolver {
    /// Create a resolver over a source with a global default override.
    pub fn new(source: Arc<dyn OverrideSource>, global: MappingOverride) -> Self {
        Self {
            source,
            global,
            cache: DashMap::new(),
        }
    }

    /// Resolver with no overrides at all.
    pub fn empty() -> Self {
        Self::new(Arc::new(InMemoryOverrides::new()), MappingOverride::default())
    }

    /// The global default override.
    pub fn global(&self) -> &MappingOverride {
        &self.global
    }

    /// Override tree for an entity.
    pub fn resolve(&self, entity: &str) -> Option<Arc<MappingOverride>> {
        if let Some(cached) = self.cache.get(entity) {
            return cached.clone();
        }
        self.cache
            .entry(entity.to_string())
            .or_insert_with(|| self.source.override_for(entity).map(Arc::new))
            .clone()
    }

    /// Fully layered config for a property. `None` when no layer mentions it.
    pub fn property_config(&self, entity: &str, property: &str) -> Option<PropertyConfig> {
        let mapping = self.resolve(entity);
        let layers = [
            mapping.as_deref().and_then(|m| m.property(property)),
            mapping.as_deref().and_then(|m| m.wildcard()),
            self.global.property(property),
            self.global.wildcard(),
        ];

        layers
            .into_iter()
            .flatten()
            .fold(None, |merged: Option<PropertyConfig>, layer| {
                Some(match merged {
                    Some(config) => config.or(layer),
                    None => layer.clone(),
                })
            })
    }

    /// Entity-level attribute, falling back to the global default override.
    pub fn entity_attr<T>(&self, entity: &str, get: impl Fn(&MappingOverride) -> Option<T>) -> Option<T> {
        self.resolve(entity)
            .as_deref()
            .and_then(&get)
            .or_else(|| get(&self.global))
    }

    /// Number of entities resolved so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl std::fmt::Debug for OverrideResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideResolver")
            .field("global", &self.global)
            .field("cached", &self.cache.len())
            .finish()
    }
}
