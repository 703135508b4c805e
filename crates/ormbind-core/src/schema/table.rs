//! Tables, columns, and keys.

use super::types::SqlType;
use serde::{Deserialize, Serialize};

/// Table name qualified by schema and catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Schema.
    pub schema: Option<String>,
    /// Catalog.
    pub catalog: Option<String>,
    /// Table name.
    pub name: String,
}

impl QualifiedName {
    /// An unqualified table name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            catalog: None,
            name: name.into(),
        }
    }

    /// Qualify with a schema and catalog.
    pub fn qualified(name: impl Into<String>, schema: Option<String>, catalog: Option<String>) -> Self {
        Self {
            schema,
            catalog,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        if let Some(catalog) = &self.catalog {
            write!(f, "{}.", catalog)?;
        }
        write!(f, "{}", self.name)
    }
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Logical storage type.
    pub sql_type: SqlType,
    /// Raw SQL type overriding the logical one.
    pub sql_type_override: Option<String>,
    /// Length for character and binary types.
    pub length: Option<u32>,
    /// Numeric precision.
    pub precision: Option<u32>,
    /// Numeric scale.
    pub scale: Option<u32>,
    /// Whether null is allowed.
    pub nullable: bool,
    /// Whether a single-column unique constraint applies.
    pub unique: bool,
    /// Default value expression.
    pub default_value: Option<String>,
    /// Column comment.
    pub comment: Option<String>,
}

impl Column {
    /// Create a non-null column.
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            sql_type_override: None,
            length: None,
            precision: None,
            scale: None,
            nullable: false,
            unique: false,
            default_value: None,
            comment: None,
        }
    }

    /// Set the nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set the length.
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

/// A unique constraint over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueKey {
    /// Constraint name.
    pub name: String,
    /// Constrained columns.
    pub columns: Vec<String>,
}

/// A named index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub referenced_table: QualifiedName,
    /// Referenced columns.
    pub referenced_columns: Vec<String>,
}

/// A table of the relational model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Qualified name.
    pub name: QualifiedName,
    /// Columns, in binding order.
    pub columns: Vec<Column>,
    /// Primary key columns.
    pub primary_key: Vec<String>,
    /// Unique constraints.
    pub unique_keys: Vec<UniqueKey>,
    /// Indices.
    pub indices: Vec<Index>,
    /// Foreign keys.
    pub foreign_keys: Vec<ForeignKey>,
    /// Table comment.
    pub comment: Option<String>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            columns: Vec::new(),
            primary_key: Vec::new(),
            unique_keys: Vec::new(),
            indices: Vec::new(),
            foreign_keys: Vec::new(),
            comment: None,
        }
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a mutable column by name.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Whether the table has a column.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Add a column unless one with the same name exists. Returns whether it was added.
    pub fn add_column(&mut self, column: Column) -> bool {
        if self.has_column(&column.name) {
            return false;
        }
        self.columns.push(column);
        true
    }

    /// Add a unique key unless one over the same columns exists.
    pub fn add_unique_key(&mut self, name: impl Into<String>, columns: Vec<String>) {
        if self.unique_keys.iter().any(|k| k.columns == columns) {
            return;
        }
        self.unique_keys.push(UniqueKey {
            name: name.into(),
            columns,
        });
    }

    /// Add a column to the named index, creating the index if needed.
    pub fn add_index_column(&mut self, name: &str, column: &str) {
        match self.indices.iter_mut().find(|i| i.name == name) {
            Some(index) => {
                if !index.columns.iter().any(|c| c == column) {
                    index.columns.push(column.to_string());
                }
            }
            None => self.indices.push(Index {
                name: name.to_string(),
                columns: vec![column.to_string()],
            }),
        }
    }

    /// Add a foreign key unless an identical one exists.
    pub fn add_foreign_key(
        &mut self,
        columns: Vec<String>,
        referenced_table: QualifiedName,
        referenced_columns: Vec<String>,
    ) {
        let exists = self
            .foreign_keys
            .iter()
            .any(|fk| fk.columns == columns && fk.referenced_table == referenced_table);
        if exists {
            return;
        }
        let name = format!("fk_{}_{}", self.name.name, columns.join("_"));
        self.foreign_keys.push(ForeignKey {
            name,
            columns,
            referenced_table,
            referenced_columns,
        });
    }

    /// Foreign keys referencing a table.
    pub fn foreign_keys_to<'a>(&'a self, table: &'a QualifiedName) -> impl Iterator<Item = &'a ForeignKey> {
        self.foreign_keys
            .iter()
            .filter(move |fk| &fk.referenced_table == table)
    }
}
