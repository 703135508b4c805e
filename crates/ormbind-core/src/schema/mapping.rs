//! Persistent mappings of entities and their properties.

use super::table::QualifiedName;
use super::types::{CascadeStrategy, FetchMode, SortDirection, SqlType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a hierarchy is laid out in tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceStrategy {
    /// The whole hierarchy shares the root table.
    SingleTable,
    /// Each subclass has a table joined on the identifier.
    Joined,
}

/// Identifier generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    /// Strategy name (`native`, `sequence`, `uuid`, `assigned`, ...).
    pub strategy: String,
    /// Strategy parameters.
    pub params: BTreeMap<String, String>,
}

/// Identifier of a root mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierMapping {
    /// One property, one column.
    Simple {
        /// Identifier property.
        property: String,
        /// Identifier column.
        column: String,
        /// Column type.
        sql_type: SqlType,
        /// Value generator.
        generator: Generator,
    },
    /// Several properties forming the key.
    Composite {
        /// Key parts, in declaration order.
        properties: Vec<PropertyBinding>,
    },
}

impl IdentifierMapping {
    /// Identifier column names, in key order.
    pub fn columns(&self) -> Vec<String> {
        match self {
            IdentifierMapping::Simple { column, .. } => vec![column.clone()],
            IdentifierMapping::Composite { properties } => properties
                .iter()
                .flat_map(|p| p.value.columns().iter().cloned())
                .collect(),
        }
    }

    /// Column types, aligned with [`IdentifierMapping::columns`].
    pub fn column_types(&self) -> Vec<SqlType> {
        match self {
            IdentifierMapping::Simple { sql_type, .. } => vec![sql_type.clone()],
            IdentifierMapping::Composite { properties } => properties
                .iter()
                .flat_map(|p| {
                    let sql_type = p.value.sql_type().unwrap_or(SqlType::BigInt);
                    std::iter::repeat(sql_type).take(p.value.columns().len())
                })
                .collect(),
        }
    }

    /// Whether the identifier spans several properties.
    pub fn is_composite(&self) -> bool {
        matches!(self, IdentifierMapping::Composite { .. })
    }
}

/// Optimistic lock column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMapping {
    /// Version property.
    pub property: String,
    /// Version column.
    pub column: String,
    /// Column type.
    pub sql_type: SqlType,
}

/// Discriminator of a single-table hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discriminator {
    /// Discriminator column, absent when a formula is used.
    pub column: Option<String>,
    /// Formula computing the discriminator.
    pub formula: Option<String>,
    /// Column type.
    pub sql_type: SqlType,
    /// Whether the value is written on insert.
    pub insertable: bool,
}

/// Second-level cache policy of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Cache usage.
    pub usage: String,
    /// What is cached.
    pub include: String,
}

/// Root-specific mapping data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootMapping {
    /// Identifier.
    pub identifier: IdentifierMapping,
    /// Optimistic lock column.
    pub version: Option<VersionMapping>,
    /// Discriminator for single-table hierarchies.
    pub discriminator: Option<Discriminator>,
    /// Strategy used by the hierarchy, when it has subclasses.
    pub inheritance: Option<InheritanceStrategy>,
    /// Natural identifier properties.
    pub natural_id: Vec<String>,
}

/// Subclass-specific mapping data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubclassMapping {
    /// Direct superclass.
    pub parent: String,
    /// Root of the hierarchy.
    pub root: String,
    /// Strategy of the hierarchy.
    pub strategy: InheritanceStrategy,
    /// Key columns of a joined table, referencing the parent identifier.
    pub key_columns: Vec<String>,
}

/// Root or subclass variant of a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    /// Root of a hierarchy.
    Root(RootMapping),
    /// Subclass of another mapped entity.
    Subclass(SubclassMapping),
}

/// How a property value is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBinding {
    /// Plain columns.
    Simple {
        /// Column names.
        columns: Vec<String>,
        /// Column type.
        sql_type: SqlType,
    },
    /// Read-only formula.
    Formula {
        /// SQL expression.
        expression: String,
    },
    /// Foreign key to another entity.
    ManyToOne {
        /// Referenced entity.
        entity: String,
        /// Foreign key columns.
        columns: Vec<String>,
        /// Whether the reference is unique (owning one-to-one).
        unique: bool,
        /// Whether dangling references are ignored.
        ignore_not_found: bool,
    },
    /// Non-owning one-to-one resolved through the other side.
    OneToOne {
        /// Referenced entity.
        entity: String,
        /// Property of the referenced entity holding the key.
        property_ref: Option<String>,
    },
    /// Embedded component stored in the owner's table.
    Component {
        /// Component type.
        class: String,
        /// Component properties.
        properties: Vec<PropertyBinding>,
    },
    /// Collection, described by the collection mapping with this role.
    Collection {
        /// Collection role.
        role: String,
    },
}

impl ValueBinding {
    /// Columns owned directly by this value.
    pub fn columns(&self) -> &[String] {
        match self {
            ValueBinding::Simple { columns, .. } | ValueBinding::ManyToOne { columns, .. } => {
                columns
            }
            _ => &[],
        }
    }

    /// Column type of a simple value.
    pub fn sql_type(&self) -> Option<SqlType> {
        match self {
            ValueBinding::Simple { sql_type, .. } => Some(sql_type.clone()),
            ValueBinding::ManyToOne { .. } => Some(SqlType::BigInt),
            _ => None,
        }
    }
}

/// One property of a mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyBinding {
    /// Property name.
    pub name: String,
    /// Persisted value.
    pub value: ValueBinding,
    /// Cascade behavior for associations.
    pub cascade: CascadeStrategy,
    /// Fetch mode.
    pub fetch: FetchMode,
    /// Lazy loading.
    pub lazy: bool,
    /// Whether written on insert.
    pub insertable: bool,
    /// Whether written on update.
    pub updatable: bool,
    /// Whether the value is computed and never written.
    pub derived: bool,
}

impl PropertyBinding {
    /// A writable, non-cascading binding.
    pub fn new(name: impl Into<String>, value: ValueBinding) -> Self {
        Self {
            name: name.into(),
            value,
            cascade: CascadeStrategy::None,
            fetch: FetchMode::Select,
            lazy: false,
            insertable: true,
            updatable: true,
            derived: false,
        }
    }
}

/// Which collection column a back-reference exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackReferenceKind {
    /// The collection key.
    Key,
    /// The list index.
    Index,
}

/// Synthetic read-only property on a collection's element entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackReference {
    /// Synthetic property name.
    pub name: String,
    /// Collection the reference belongs to.
    pub collection_role: String,
    /// Columns exposed.
    pub columns: Vec<String>,
    /// Whether the columns allow null.
    pub nullable: bool,
    /// Whether written on insert.
    pub insertable: bool,
    /// Whether written on update.
    pub updatable: bool,
    /// Exposed column kind.
    pub kind: BackReferenceKind,
}

/// One column of a sort clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortClause {
    /// Property path.
    pub property: String,
    /// Direction.
    pub direction: SortDirection,
}

/// Mapping of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentMapping {
    /// Entity identity.
    pub entity: String,
    /// Table holding this entity's own columns.
    pub table: QualifiedName,
    /// Root or subclass data.
    pub kind: MappingKind,
    /// Discriminator value, set in single-table hierarchies.
    pub discriminator_value: Option<String>,
    /// Property bindings, in declaration order.
    pub properties: Vec<PropertyBinding>,
    /// Back-references added by collections of other entities.
    pub back_references: Vec<BackReference>,
    /// Default sort used when the entity is a collection element.
    pub default_sort: Vec<SortClause>,
    /// Cache policy.
    pub cache: Option<CachePolicy>,
    /// Only write changed columns on update.
    pub dynamic_update: bool,
    /// Only write non-null columns on insert.
    pub dynamic_insert: bool,
    /// Batch fetch size.
    pub batch_size: Option<u32>,
}

impl PersistentMapping {
    /// Create a mapping with no properties.
    pub fn new(entity: impl Into<String>, table: QualifiedName, kind: MappingKind) -> Self {
        Self {
            entity: entity.into(),
            table,
            kind,
            discriminator_value: None,
            properties: Vec::new(),
            back_references: Vec::new(),
            default_sort: Vec::new(),
            cache: None,
            dynamic_update: false,
            dynamic_insert: false,
            batch_size: None,
        }
    }

    /// Whether this is a root mapping.
    pub fn is_root(&self) -> bool {
        matches!(self.kind, MappingKind::Root(_))
    }

    /// Root data, for root mappings.
    pub fn root(&self) -> Option<&RootMapping> {
        match &self.kind {
            MappingKind::Root(root) => Some(root),
            MappingKind::Subclass(_) => None,
        }
    }

    /// Subclass data, for subclass mappings.
    pub fn subclass(&self) -> Option<&SubclassMapping> {
        match &self.kind {
            MappingKind::Subclass(subclass) => Some(subclass),
            MappingKind::Root(_) => None,
        }
    }

    /// Binding of a property declared on this entity.
    pub fn property(&self, name: &str) -> Option<&PropertyBinding> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Add a back-reference unless one with the same name exists.
    pub fn add_back_reference(&mut self, back_reference: BackReference) {
        if self.back_references.iter().any(|b| b.name == back_reference.name) {
            return;
        }
        self.back_references.push(back_reference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_identifier_columns() {
        let identifier = IdentifierMapping::Composite {
            properties: vec![
                PropertyBinding::new(
                    "order",
                    ValueBinding::ManyToOne {
                        entity: "Order".into(),
                        columns: vec!["order_id".into()],
                        unique: false,
                        ignore_not_found: false,
                    },
                ),
                PropertyBinding::new(
                    "line",
                    ValueBinding::Simple {
                        columns: vec!["line".into()],
                        sql_type: SqlType::Integer,
                    },
                ),
            ],
        };

        assert!(identifier.is_composite());
        assert_eq!(identifier.columns(), vec!["order_id", "line"]);
        assert_eq!(
            identifier.column_types(),
            vec![SqlType::BigInt, SqlType::Integer]
        );
    }

    #[test]
    fn test_back_references_dedupe() {
        let mut mapping = PersistentMapping::new(
            "Pet",
            QualifiedName::new("pet"),
            MappingKind::Subclass(SubclassMapping {
                parent: "Animal".into(),
                root: "Animal".into(),
                strategy: InheritanceStrategy::SingleTable,
                key_columns: Vec::new(),
            }),
        );
        let back_reference = BackReference {
            name: "_Person_petsBackref".into(),
            collection_role: "Person.pets".into(),
            columns: vec!["person_pets_id".into()],
            nullable: true,
            insertable: true,
            updatable: false,
            kind: BackReferenceKind::Key,
        };
        mapping.add_back_reference(back_reference.clone());
        mapping.add_back_reference(back_reference);

        assert!(!mapping.is_root());
        assert_eq!(mapping.subclass().unwrap().root, "Animal");
        assert_eq!(mapping.back_references.len(), 1);
    }
}
