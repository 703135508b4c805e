//! Binder configuration.

use crate::naming::DEFAULT_DATASOURCE;
use crate::overrides::MappingOverride;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default identifier generator strategy.
pub const DEFAULT_ID_GENERATOR: &str = "native";

/// Default discriminator column name.
pub const DEFAULT_DISCRIMINATOR_COLUMN: &str = "class";

/// Default suffix of foreign key columns.
pub const DEFAULT_FOREIGN_KEY_SUFFIX: &str = "_id";

/// Default suffix of list index and map key columns.
pub const DEFAULT_INDEX_SUFFIX: &str = "_idx";

/// Default length of map key columns.
pub const DEFAULT_MAP_KEY_LENGTH: u32 = 255;

/// Default decimal precision when constraints give no usable bound.
pub const DEFAULT_PRECISION: u32 = 19;

/// Default decimal scale.
pub const DEFAULT_SCALE: u32 = 2;

/// Binder configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinderConfig {
    /// Datasource whose naming strategy is used.
    pub datasource: String,

    /// Schema for tables whose override names none.
    pub default_schema: Option<String>,

    /// Catalog for tables whose override names none.
    pub default_catalog: Option<String>,

    /// Identifier generator used when the override names none.
    pub id_generator: String,

    /// Discriminator column used when the override names none.
    pub discriminator_column: String,

    /// Suffix appended to foreign key columns.
    pub foreign_key_suffix: String,

    /// Suffix appended to list index and map key columns.
    pub index_suffix: String,

    /// Length of default map key columns.
    pub map_key_length: u32,

    /// Registered user type names accepted as column types.
    pub user_types: BTreeSet<String>,

    /// Global default override applied to every entity.
    pub global_override: MappingOverride,
}

impl BinderConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self {
            datasource: DEFAULT_DATASOURCE.to_string(),
            default_schema: None,
            default_catalog: None,
            id_generator: DEFAULT_ID_GENERATOR.to_string(),
            discriminator_column: DEFAULT_DISCRIMINATOR_COLUMN.to_string(),
            foreign_key_suffix: DEFAULT_FOREIGN_KEY_SUFFIX.to_string(),
            index_suffix: DEFAULT_INDEX_SUFFIX.to_string(),
            map_key_length: DEFAULT_MAP_KEY_LENGTH,
            user_types: BTreeSet::new(),
            global_override: MappingOverride::default(),
        }
    }

    /// Set the datasource.
    pub fn with_datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = datasource.into();
        self
    }

    /// Set the default schema.
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    /// Set the default identifier generator.
    pub fn with_id_generator(mut self, generator: impl Into<String>) -> Self {
        self.id_generator = generator.into();
        self
    }

    /// Set the default discriminator column.
    pub fn with_discriminator_column(mut self, column: impl Into<String>) -> Self {
        self.discriminator_column = column.into();
        self
    }

    /// Register a user type name.
    pub fn with_user_type(mut self, name: impl Into<String>) -> Self {
        self.user_types.insert(name.into());
        self
    }

    /// Set the global default override.
    pub fn with_global_override(mut self, global: MappingOverride) -> Self {
        self.global_override = global;
        self
    }

    /// Whether a user type is registered.
    pub fn is_user_type(&self, name: &str) -> bool {
        self.user_types.contains(name)
    }
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self::new()
    }
}
