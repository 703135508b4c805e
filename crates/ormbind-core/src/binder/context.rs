//! State of one binding run.

use super::work::CollectionWorkItem;
use super::BindingState;
use crate::config::BinderConfig;
use crate::constraint::ConstraintSource;
use crate::descriptor::{short_class_name, DescriptorStore, EntityDescriptor, ValueType};
use crate::error::BindWarning;
use crate::naming::NamingStrategy;
use crate::overrides::{EnumStorage, InheritanceRequest, OverrideResolver, PropertyConfig};
use crate::schema::{PropertyBinding, QualifiedName, RelationalSchemaModel, SqlType};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

/// Draft state of a run. Published only when both passes succeed.
pub(crate) struct BindingContext<'a> {
    pub config: &'a BinderConfig,
    pub naming: Arc<dyn NamingStrategy>,
    pub overrides: &'a OverrideResolver,
    pub constraints: &'a dyn ConstraintSource,
    pub state: &'a BindingState,
    pub store: DescriptorStore,
    pub model: RelationalSchemaModel,
    pub queue: Vec<CollectionWorkItem>,
    pub warnings: Vec<BindWarning>,
    pub newly_bound: BTreeSet<String>,
}

impl<'a> BindingContext<'a> {
    pub fn is_bound(&self, entity: &str) -> bool {
        self.newly_bound.contains(entity) || self.state.is_bound(entity)
    }

    pub fn mark_bound(&mut self, entity: &str) {
        self.newly_bound.insert(entity.to_string());
    }

    pub fn warn(&mut self, warning: BindWarning) {
        warn!(
            entity = %warning.entity(),
            property = %warning.property(),
            "{}",
            warning
        );
        self.warnings.push(warning);
    }

    pub fn entity(&self, name: &str) -> Option<Arc<EntityDescriptor>> {
        self.store.get(name).cloned()
    }

    /// Primary table of an entity: override name, else naming default.
    pub fn table_name_for(&self, entity: &str) -> QualifiedName {
        let explicit = self
            .overrides
            .resolve(entity)
            .and_then(|m| m.table.as_ref().and_then(|t| t.name.clone()));
        let name = explicit.unwrap_or_else(|| self.naming.class_to_table_name(entity));
        QualifiedName::qualified(name, self.schema_for(entity), self.catalog_for(entity))
    }

    pub fn schema_for(&self, entity: &str) -> Option<String> {
        self.overrides
            .entity_attr(entity, |m| m.table.as_ref().and_then(|t| t.schema.clone()))
            .or_else(|| self.config.default_schema.clone())
    }

    pub fn catalog_for(&self, entity: &str) -> Option<String> {
        self.overrides
            .entity_attr(entity, |m| m.table.as_ref().and_then(|t| t.catalog.clone()))
            .or_else(|| self.config.default_catalog.clone())
    }

    pub fn column_name(&self, path: &str) -> String {
        self.naming.property_to_column_name(path)
    }

    /// Unqualified snake name of an entity, used for key columns.
    pub fn short_table_name(&self, entity: &str) -> String {
        self.naming.class_to_table_name(short_class_name(entity))
    }

    pub fn foreign_key_column(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.config.foreign_key_suffix)
    }

    /// Key column names for referencing an identifier: `{prefix}_id` for a
    /// single column, `{prefix}_{column}` per part of a composite.
    pub fn key_column_names(&self, prefix: &str, keys: &[(String, SqlType)]) -> Vec<String> {
        match keys {
            [_] | [] => vec![self.foreign_key_column(prefix)],
            parts => parts
                .iter()
                .map(|(column, _)| format!("{}_{}", prefix, column))
                .collect(),
        }
    }

    pub fn property_config(&self, entity: &str, path: &str) -> PropertyConfig {
        self.overrides
            .property_config(entity, path)
            .unwrap_or_default()
    }

    /// Inheritance requested by an entity's own override, else the global one.
    pub fn inheritance_request(&self, entity: &str) -> InheritanceRequest {
        match self.own_inheritance_request(entity) {
            InheritanceRequest::Unspecified => self.overrides.global().inheritance_request(),
            request => request,
        }
    }

    pub fn own_inheritance_request(&self, entity: &str) -> InheritanceRequest {
        self.overrides
            .resolve(entity)
            .map(|m| m.inheritance_request())
            .unwrap_or(InheritanceRequest::Unspecified)
    }

    /// Storage type of a property.
    ///
    /// A configured type name must be a known storage type or a registered
    /// user type; anything else warns and falls back to the declared type.
    pub fn resolve_sql_type(
        &mut self,
        entity: &str,
        path: &str,
        type_name: Option<&str>,
        declared: &ValueType,
        enum_storage: Option<EnumStorage>,
    ) -> SqlType {
        let fallback = SqlType::from_value_type(declared, enum_storage.unwrap_or_default());
        let Some(type_name) = type_name else {
            return fallback;
        };
        if let Some(sql_type) = SqlType::from_type_name(type_name) {
            return sql_type;
        }
        if self.config.is_user_type(type_name) {
            return SqlType::UserType(type_name.to_string());
        }
        self.warn(BindWarning::UnresolvableUserType {
            entity: entity.to_string(),
            property: path.to_string(),
            type_name: type_name.to_string(),
        });
        fallback
    }

    /// Entity declaring a property: `entity` itself or its nearest ancestor.
    pub fn declaring_entity(&self, entity: &str, property: &str) -> Option<String> {
        if self.entity(entity)?.get_property(property).is_some() {
            return Some(entity.to_string());
        }
        self.store
            .ancestors(entity)
            .into_iter()
            .find(|d| d.get_property(property).is_some())
            .map(|d| d.name.clone())
    }

    /// Binding of a property on an entity or its nearest mapped ancestor.
    pub fn find_binding(&self, entity: &str, property: &str) -> Option<(String, PropertyBinding)> {
        let mut chain = vec![entity.to_string()];
        chain.extend(self.store.ancestors(entity).iter().map(|d| d.name.clone()));
        chain.into_iter().find_map(|name| {
            let binding = self.model.mapping(&name)?.property(property)?.clone();
            Some((name, binding))
        })
    }
}
