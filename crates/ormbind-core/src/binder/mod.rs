//! Two-phase binder from domain descriptors to the relational schema model.
//!
//! The structural pass maps every entity to tables and columns and queues
//! associations. The linking pass resolves the queue once every target of
//! the run is mapped. Nothing is published unless both passes succeed.

pub mod cascade;
mod context;
mod linking;
pub mod sizing;
mod structural;
pub mod work;

pub use cascade::{default_cascade, resolve_cascade, CascadeInput};
pub use work::{CollectionWork, CollectionWorkItem, ForeignKeyWork};

use crate::config::BinderConfig;
use crate::constraint::{ConstraintSource, NoConstraints};
use crate::descriptor::{DescriptorStore, EntityDescriptor};
use crate::error::{BindWarning, Result};
use crate::naming::NamingRegistry;
use crate::overrides::{OverrideResolver, OverrideSource};
use crate::schema::{PersistentMapping, RelationalSchemaModel};
use context::BindingContext;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument};

/// Entities already bound, shared across binder instances.
#[derive(Debug, Default)]
pub struct BindingState {
    bound: Mutex<BTreeSet<String>>,
}

impl BindingState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an entity has been bound.
    pub fn is_bound(&self, entity: &str) -> bool {
        self.bound.lock().contains(entity)
    }

    /// Record entities as bound.
    pub fn mark_bound<I, S>(&self, entities: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut bound = self.bound.lock();
        bound.extend(entities.into_iter().map(Into::into));
    }

    /// Number of bound entities.
    pub fn len(&self) -> usize {
        self.bound.lock().len()
    }

    /// Whether nothing has been bound yet.
    pub fn is_empty(&self) -> bool {
        self.bound.lock().is_empty()
    }
}

/// Binds entity descriptors into a [`RelationalSchemaModel`].
///
/// # Example
///
/// ```
/// use ormbind_core::{Binder, BinderConfig, EntityDescriptor, PropertyDescriptor, ValueType};
///
/// let book = EntityDescriptor::new("Book")
///     .with_property(PropertyDescriptor::basic("title", ValueType::String));
///
/// let mut binder = Binder::new(BinderConfig::default());
/// let model = binder.bind(&[book]).unwrap();
/// assert!(model.table_named("book").is_some());
/// ```
pub struct Binder {
    config: BinderConfig,
    naming: Arc<NamingRegistry>,
    overrides: Arc<OverrideResolver>,
    constraints: Arc<dyn ConstraintSource>,
    state: Arc<BindingState>,
    store: DescriptorStore,
    model: RelationalSchemaModel,
    warnings: Vec<BindWarning>,
}

impl Binder {
    /// Create a binder with no overrides or constraints.
    pub fn new(config: BinderConfig) -> Self {
        let overrides = OverrideResolver::new(
            Arc::new(crate::overrides::InMemoryOverrides::new()),
            config.global_override.clone(),
        );
        Self {
            config,
            naming: Arc::new(NamingRegistry::new()),
            overrides: Arc::new(overrides),
            constraints: Arc::new(NoConstraints),
            state: Arc::new(BindingState::new()),
            store: DescriptorStore::new(),
            model: RelationalSchemaModel::new(),
            warnings: Vec::new(),
        }
    }

    /// Use an override source; the config's global override stays the fallback.
    pub fn with_overrides(mut self, source: Arc<dyn OverrideSource>) -> Self {
        self.overrides = Arc::new(OverrideResolver::new(
            source,
            self.config.global_override.clone(),
        ));
        self
    }

    /// Use a validation constraint source.
    pub fn with_constraints(mut self, constraints: Arc<dyn ConstraintSource>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Use a shared naming registry.
    pub fn with_naming(mut self, naming: Arc<NamingRegistry>) -> Self {
        self.naming = naming;
        self
    }

    /// Share the bound-entity set with other binders.
    pub fn with_state(mut self, state: Arc<BindingState>) -> Self {
        self.state = state;
        self
    }

    /// Bind a batch of entities.
    ///
    /// Already-bound entities are skipped. On error the previous model is
    /// kept untouched.
    #[instrument(skip_all, fields(entities = entities.len(), datasource = %self.config.datasource))]
    pub fn bind(&mut self, entities: &[EntityDescriptor]) -> Result<&RelationalSchemaModel> {
        let mut store = self.store.clone();
        for entity in entities {
            store.insert(entity.clone());
        }

        let mut context = BindingContext {
            config: &self.config,
            naming: self.naming.strategy(&self.config.datasource),
            overrides: &self.overrides,
            constraints: self.constraints.as_ref(),
            state: &self.state,
            store,
            model: self.model.clone(),
            queue: Vec::new(),
            warnings: Vec::new(),
            newly_bound: BTreeSet::new(),
        };
        context.bind_structure(entities)?;
        context.link()?;

        let BindingContext {
            store,
            model,
            warnings,
            newly_bound,
            ..
        } = context;

        info!(
            bound = newly_bound.len(),
            tables = model.tables.len(),
            collections = model.collections.len(),
            warnings = warnings.len(),
            "binding run complete"
        );
        self.state.mark_bound(newly_bound);
        self.store = store;
        self.model = model;
        self.warnings.extend(warnings);
        Ok(&self.model)
    }

    /// Mapping of an entity, if bound.
    pub fn get_mapping(&self, entity: &str) -> Option<&PersistentMapping> {
        self.model.mapping(entity)
    }

    /// The published model.
    pub fn model(&self) -> &RelationalSchemaModel {
        &self.model
    }

    /// Warnings collected across all successful runs.
    pub fn warnings(&self) -> &[BindWarning] {
        &self.warnings
    }

    /// Shared bound-entity set.
    pub fn state(&self) -> &Arc<BindingState> {
        &self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// Descriptors seen by successful runs.
    pub fn descriptors(&self) -> &DescriptorStore {
        &self.store
    }
}

impl std::fmt::Debug for Binder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("datasource", &self.config.datasource)
            .field("entities", &self.model.mappings.len())
            .field("tables", &self.model.tables.len())
            .field("warnings", &self.warnings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_state_tracks_entities() {
        let state = BindingState::new();
        assert!(state.is_empty());

        state.mark_bound(["Person", "Pet"]);
        state.mark_bound(["Person"]);

        assert_eq!(state.len(), 2);
        assert!(state.is_bound("Pet"));
        assert!(!state.is_bound("Vet"));
    }

    #[test]
    fn test_shared_state_skips_bound_entities() {
        use crate::descriptor::{PropertyDescriptor, ValueType};

        let state = Arc::new(BindingState::new());
        let book = EntityDescriptor::new("Book")
            .with_property(PropertyDescriptor::basic("title", ValueType::String));

        let mut first = Binder::new(BinderConfig::default()).with_state(state.clone());
        first.bind(std::slice::from_ref(&book)).unwrap();
        assert!(state.is_bound("Book"));

        let mut second = Binder::new(BinderConfig::default()).with_state(state);
        let model = second.bind(&[book]).unwrap();
        assert!(model.mappings.is_empty());
    }
}
