//! Entity-level mapping overrides.

use super::property::{ColumnConfig, PropertyConfig};
use crate::schema::SortDirection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the wildcard property entry applied to every property.
pub const WILDCARD: &str = "*";

/// Table placement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Table name.
    pub name: Option<String>,
    /// Schema.
    pub schema: Option<String>,
    /// Catalog.
    pub catalog: Option<String>,
}

/// Identifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Generator strategy (`native`, `sequence`, `uuid`, `assigned`, ...).
    pub generator: Option<String>,
    /// Generator parameters.
    pub params: BTreeMap<String, String>,
    /// Identifier column.
    pub column: Option<String>,
    /// Storage type name of the identifier.
    pub type_name: Option<String>,
    /// Properties forming a composite identifier.
    pub composite: Option<Vec<String>>,
    /// Properties forming a natural identifier.
    pub natural: Option<Vec<String>>,
}

/// Second-level cache policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether caching is enabled.
    pub enabled: Option<bool>,
    /// Cache usage (`read-write`, `read-only`, ...).
    pub usage: Option<String>,
    /// What to include (`all`, `non-lazy`).
    pub include: Option<String>,
}

/// Discriminator settings for single-table hierarchies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscriminatorConfig {
    /// Value identifying rows of this entity.
    pub value: Option<String>,
    /// Discriminator column.
    pub column: Option<ColumnConfig>,
    /// Storage type name of the discriminator.
    pub type_name: Option<String>,
    /// Formula replacing the discriminator column.
    pub formula: Option<String>,
    /// Whether the discriminator is written on insert.
    pub insertable: Option<bool>,
}

/// Mapping override tree for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingOverride {
    /// Table placement.
    pub table: Option<TableConfig>,
    /// Identifier settings.
    pub identity: Option<IdentityConfig>,
    /// Whether the version property is mapped.
    pub version: Option<bool>,
    /// Version column.
    pub version_column: Option<String>,
    /// Cache policy.
    pub cache: Option<CacheConfig>,
    /// Discriminator settings.
    pub discriminator: Option<DiscriminatorConfig>,
    /// Whether the hierarchy shares one table.
    pub table_per_hierarchy: Option<bool>,
    /// Whether each subclass gets a joined table.
    pub table_per_subclass: Option<bool>,
    /// Default sort property path.
    pub sort: Option<String>,
    /// Default sort direction.
    pub order: Option<SortDirection>,
    /// Only write changed columns on update.
    pub dynamic_update: Option<bool>,
    /// Only write non-null columns on insert.
    pub dynamic_insert: Option<bool>,
    /// Batch fetch size.
    pub batch_size: Option<u32>,
    /// Table comment.
    pub comment: Option<String>,
    /// Property configs keyed by property name (`*` applies to all).
    pub properties: BTreeMap<String, PropertyConfig>,
}

/// Inheritance strategy an override requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritanceRequest {
    /// Nothing requested.
    Unspecified,
    /// Share one table.
    SingleTable,
    /// One joined table per subclass.
    Joined,
    /// Flags contradict each other.
    Conflicting,
}

impl MappingOverride {
    /// Create an empty override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table name.
    pub fn with_table(mut self, name: impl Into<String>) -> Self {
        self.table.get_or_insert_with(TableConfig::default).name = Some(name.into());
        self
    }

    /// Set the schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.table.get_or_insert_with(TableConfig::default).schema = Some(schema.into());
        self
    }

    /// Configure a property (or `*` for all properties).
    pub fn with_property(mut self, name: impl Into<String>, config: PropertyConfig) -> Self {
        self.properties.insert(name.into(), config);
        self
    }

    /// Request one joined table per subclass.
    pub fn table_per_subclass(mut self) -> Self {
        self.table_per_subclass = Some(true);
        self
    }

    /// Disable the version column.
    pub fn without_version(mut self) -> Self {
        self.version = Some(false);
        self
    }

    /// Set the discriminator value.
    pub fn with_discriminator_value(mut self, value: impl Into<String>) -> Self {
        self.discriminator
            .get_or_insert_with(DiscriminatorConfig::default)
            .value = Some(value.into());
        self
    }

    /// Set the identifier settings.
    pub fn with_identity(mut self, identity: IdentityConfig) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set the default sort.
    pub fn with_sort(mut self, sort: impl Into<String>, order: SortDirection) -> Self {
        self.sort = Some(sort.into());
        self.order = Some(order);
        self
    }

    /// Config for a property, without wildcard fallback.
    pub fn property(&self, name: &str) -> Option<&PropertyConfig> {
        self.properties.get(name)
    }

    /// The wildcard property config.
    pub fn wildcard(&self) -> Option<&PropertyConfig> {
        self.properties.get(WILDCARD)
    }

    /// Inheritance strategy requested by the two flags.
    pub fn inheritance_request(&self) -> InheritanceRequest {
        match (self.table_per_hierarchy, self.table_per_subclass) {
            (None, None) => InheritanceRequest::Unspecified,
            (Some(true), Some(true)) | (Some(false), Some(false)) => InheritanceRequest::Conflicting,
            (Some(true), _) | (None, Some(false)) => InheritanceRequest::SingleTable,
            (Some(false), _) | (_, Some(true)) => InheritanceRequest::Joined,
        }
    }
}
