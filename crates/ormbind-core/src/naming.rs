//! Naming strategies and the per-datasource registry.

use crate::descriptor::short_class_name;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the datasource used when none is configured.
pub const DEFAULT_DATASOURCE: &str = "DEFAULT";

/// Converts class and property names into table and column names.
pub trait NamingStrategy: Send + Sync {
    /// Table name for a class (identity may be fully qualified).
    fn class_to_table_name(&self, class_name: &str) -> String;

    /// Column name for a property name or dotted property path.
    fn property_to_column_name(&self, property_name: &str) -> String;
}

/// Lowercase, underscore-separated names (`homeAddress` -> `home_address`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImprovedNamingStrategy;

impl ImprovedNamingStrategy {
    fn add_underscores(name: &str) -> String {
        let chars: Vec<char> = name.replace('.', "_").chars().collect();
        let mut out = String::with_capacity(chars.len() + 4);
        for (i, &c) in chars.iter().enumerate() {
            let splits_word = i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_lowercase()
                && c.is_uppercase()
                && chars[i + 1].is_lowercase();
            if splits_word {
                out.push('_');
            }
            out.push(c);
        }
        out.to_lowercase()
    }
}

impl NamingStrategy for ImprovedNamingStrategy {
    fn class_to_table_name(&self, class_name: &str) -> String {
        Self::add_underscores(short_class_name(class_name))
    }

    fn property_to_column_name(&self, property_name: &str) -> String {
        Self::add_underscores(property_name)
    }
}

/// Names kept as declared; paths joined with underscores.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreserveNamingStrategy;

impl NamingStrategy for PreserveNamingStrategy {
    fn class_to_table_name(&self, class_name: &str) -> String {
        short_class_name(class_name).to_string()
    }

    fn property_to_column_name(&self, property_name: &str) -> String {
        property_name.replace('.', "_")
    }
}

/// Naming strategy per logical datasource.
///
/// Unconfigured datasources use [`ImprovedNamingStrategy`].
pub struct NamingRegistry {
    strategies: RwLock<HashMap<String, Arc<dyn NamingStrategy>>>,
}

impl NamingRegistry {
    /// Create a registry with no configured datasources.
    pub fn new() -> Self {
        Self {
            strategies: RwLock::new(HashMap::new()),
        }
    }

    /// Configure the strategy for a datasource, replacing any previous one.
    pub fn configure(&self, datasource: impl Into<String>, strategy: Arc<dyn NamingStrategy>) {
        self.strategies.write().insert(datasource.into(), strategy);
    }

    /// Strategy for a datasource.
    pub fn strategy(&self, datasource: &str) -> Arc<dyn NamingStrategy> {
        self.strategies
            .read()
            .get(datasource)
            .cloned()
            .unwrap_or_else(|| Arc::new(ImprovedNamingStrategy))
    }

    /// Whether a datasource has an explicitly configured strategy.
    pub fn is_configured(&self, datasource: &str) -> bool {
        self.strategies.read().contains_key(datasource)
    }
}

impl Default for NamingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NamingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.strategies.read().keys().cloned().collect();
        names.sort();
        f.debug_struct("NamingRegistry")
            .field("datasources", &names)
            .finish()
    }
}
