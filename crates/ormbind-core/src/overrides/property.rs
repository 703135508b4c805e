//! Per-property mapping overrides.

use crate::schema::{CascadeStrategy, FetchMode, SortDirection};
use serde::{Deserialize, Serialize};

/// Explicit column settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Column name.
    pub name: Option<String>,
    /// Raw SQL type, passed through untouched (e.g. `varchar(40)`).
    pub sql_type: Option<String>,
    /// Column length.
    pub length: Option<u32>,
    /// Numeric precision.
    pub precision: Option<u32>,
    /// Numeric scale.
    pub scale: Option<u32>,
    /// Explicit nullability.
    pub nullable: Option<bool>,
    /// Single-column unique constraint.
    pub unique: Option<bool>,
    /// Index name(s), comma separated.
    pub index: Option<String>,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Column comment.
    pub comment: Option<String>,
}

impl ColumnConfig {
    /// A column override carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }
}

/// Explicit join table settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinTableConfig {
    /// Join table name.
    pub name: Option<String>,
    /// Join table schema.
    pub schema: Option<String>,
    /// Join table catalog.
    pub catalog: Option<String>,
    /// Column referencing the owning entity.
    pub key: Option<ColumnConfig>,
    /// Column holding the element.
    pub column: Option<ColumnConfig>,
}

impl JoinTableConfig {
    /// A join table override carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// How an enum value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumStorage {
    /// Variant name as a string.
    #[default]
    String,
    /// Variant position as an integer.
    Ordinal,
}

/// Mapping settings for one property.
///
/// Every attribute is optional; `or` layers a config over a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyConfig {
    /// Explicit columns, one per entry.
    pub columns: Vec<ColumnConfig>,
    /// Storage type name (`text`, `yes_no`, a registered user type, ...).
    pub type_name: Option<String>,
    /// Explicit cascade.
    pub cascade: Option<CascadeStrategy>,
    /// Fetch mode.
    pub fetch: Option<FetchMode>,
    /// Lazy loading.
    pub lazy: Option<bool>,
    /// Unique constraint on the property's columns.
    pub unique: Option<bool>,
    /// Index name(s), comma separated.
    pub index: Option<String>,
    /// Join table for collections.
    pub join_table: Option<JoinTableConfig>,
    /// Formula making the property derived.
    pub formula: Option<String>,
    /// Sort clause for collections (`name`, `owner.name desc, age`).
    pub sort: Option<String>,
    /// Default direction for sort tokens that do not name one.
    pub order: Option<SortDirection>,
    /// Whether the column is written on insert.
    pub insertable: Option<bool>,
    /// Whether the column is written on update.
    pub updatable: Option<bool>,
    /// List index or map key column.
    pub index_column: Option<ColumnConfig>,
    /// Element property used as a map key.
    pub map_key_property: Option<String>,
    /// Collection key column.
    pub key: Option<ColumnConfig>,
    /// Enum storage.
    pub enum_type: Option<EnumStorage>,
    /// Batch fetch size.
    pub batch_size: Option<u32>,
    /// Ignore dangling references.
    pub ignore_not_found: Option<bool>,
    /// Collection cache usage.
    pub cache: Option<String>,
    /// Shortcut for the nullability of the first column.
    pub nullable: Option<bool>,
    /// Shortcut for the length of the first column.
    pub length: Option<u32>,
    /// Shortcut for the precision of the first column.
    pub precision: Option<u32>,
    /// Shortcut for the scale of the first column.
    pub scale: Option<u32>,
}

impl PropertyConfig {
    /// Layer `self` over `fallback`: every attribute set here wins.
    pub fn or(self, fallback: &PropertyConfig) -> PropertyConfig {
        PropertyConfig {
            columns: if self.columns.is_empty() {
                fallback.columns.clone()
            } else {
                self.columns
            },
            type_name: self.type_name.or_else(|| fallback.type_name.clone()),
            cascade: self.cascade.or(fallback.cascade),
            fetch: self.fetch.or(fallback.fetch),
            lazy: self.lazy.or(fallback.lazy),
            unique: self.unique.or(fallback.unique),
            index: self.index.or_else(|| fallback.index.clone()),
            join_table: self.join_table.or_else(|| fallback.join_table.clone()),
            formula: self.formula.or_else(|| fallback.formula.clone()),
            sort: self.sort.or_else(|| fallback.sort.clone()),
            order: self.order.or(fallback.order),
            insertable: self.insertable.or(fallback.insertable),
            updatable: self.updatable.or(fallback.updatable),
            index_column: self.index_column.or_else(|| fallback.index_column.clone()),
            map_key_property: self
                .map_key_property
                .or_else(|| fallback.map_key_property.clone()),
            key: self.key.or_else(|| fallback.key.clone()),
            enum_type: self.enum_type.or(fallback.enum_type),
            batch_size: self.batch_size.or(fallback.batch_size),
            ignore_not_found: self.ignore_not_found.or(fallback.ignore_not_found),
            cache: self.cache.or_else(|| fallback.cache.clone()),
            nullable: self.nullable.or(fallback.nullable),
            length: self.length.or(fallback.length),
            precision: self.precision.or(fallback.precision),
            scale: self.scale.or(fallback.scale),
        }
    }

    /// Columns to bind, with the first-column shortcuts folded in.
    ///
    /// Returns an empty list when no column attribute was configured.
    pub fn effective_columns(&self) -> Vec<ColumnConfig> {
        let shortcuts = self.nullable.is_some()
            || self.length.is_some()
            || self.precision.is_some()
            || self.scale.is_some();
        let mut columns = self.columns.clone();
        if columns.is_empty() && shortcuts {
            columns.push(ColumnConfig::default());
        }
        if let Some(first) = columns.first_mut() {
            first.nullable = first.nullable.or(self.nullable);
            first.length = first.length.or(self.length);
            first.precision = first.precision.or(self.precision);
            first.scale = first.scale.or(self.scale);
        }
        columns
    }

    /// Set a single explicit column name.
    pub fn with_column(mut self, column: ColumnConfig) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the cascade.
    pub fn with_cascade(mut self, cascade: CascadeStrategy) -> Self {
        self.cascade = Some(cascade);
        self
    }

    /// Set the join table.
    pub fn with_join_table(mut self, join_table: JoinTableConfig) -> Self {
        self.join_table = Some(join_table);
        self
    }

    /// Set the formula.
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Set the sort clause.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Set the storage type name.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }
}
