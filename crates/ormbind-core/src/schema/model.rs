//! The relational schema model produced by binding.

use super::collection::CollectionMapping;
use super::mapping::{IdentifierMapping, MappingKind, PersistentMapping};
use super::table::{QualifiedName, Table};
use super::types::SqlType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tables, entity mappings, and collection mappings.
///
/// Tables are keyed by their qualified display name, mappings by entity
/// identity, and collections by role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationalSchemaModel {
    /// Tables by qualified name.
    pub tables: BTreeMap<String, Table>,
    /// Entity mappings by identity.
    pub mappings: BTreeMap<String, PersistentMapping>,
    /// Collection mappings by role.
    pub collections: BTreeMap<String, CollectionMapping>,
}

impl RelationalSchemaModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a table.
    pub fn table(&self, name: &QualifiedName) -> Option<&Table> {
        self.tables.get(&name.to_string())
    }

    /// Get a mutable table.
    pub fn table_mut(&mut self, name: &QualifiedName) -> Option<&mut Table> {
        self.tables.get_mut(&name.to_string())
    }

    /// Get a table by its display name.
    pub fn table_named(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Get a table, creating it if absent.
    pub fn get_or_create_table(&mut self, name: &QualifiedName) -> &mut Table {
        self.tables
            .entry(name.to_string())
            .or_insert_with(|| Table::new(name.clone()))
    }

    /// Whether a table exists.
    pub fn has_table(&self, name: &QualifiedName) -> bool {
        self.tables.contains_key(&name.to_string())
    }

    /// Entity owning a table as its primary or joined table.
    pub fn table_owner(&self, name: &QualifiedName) -> Option<&str> {
        self.mappings
            .values()
            .find(|m| &m.table == name && Self::owns_table(m))
            .map(|m| m.entity.as_str())
    }

    fn owns_table(mapping: &PersistentMapping) -> bool {
        match &mapping.kind {
            MappingKind::Root(_) => true,
            MappingKind::Subclass(subclass) => !subclass.key_columns.is_empty(),
        }
    }

    /// Mapping of an entity.
    pub fn mapping(&self, entity: &str) -> Option<&PersistentMapping> {
        self.mappings.get(entity)
    }

    /// Mutable mapping of an entity.
    pub fn mapping_mut(&mut self, entity: &str) -> Option<&mut PersistentMapping> {
        self.mappings.get_mut(entity)
    }

    /// Whether an entity is mapped.
    pub fn is_mapped(&self, entity: &str) -> bool {
        self.mappings.contains_key(entity)
    }

    /// Root mapping of an entity's hierarchy.
    pub fn root_mapping(&self, entity: &str) -> Option<&PersistentMapping> {
        let mapping = self.mappings.get(entity)?;
        match &mapping.kind {
            MappingKind::Root(_) => Some(mapping),
            MappingKind::Subclass(subclass) => self.mappings.get(&subclass.root),
        }
    }

    /// Identifier of an entity's hierarchy.
    pub fn identifier(&self, entity: &str) -> Option<&IdentifierMapping> {
        self.root_mapping(entity)?.root().map(|r| &r.identifier)
    }

    /// Identifier columns with their types, read from the root table.
    pub fn identifier_columns(&self, entity: &str) -> Vec<(String, SqlType)> {
        let Some(root) = self.root_mapping(entity) else {
            return Vec::new();
        };
        let Some(identifier) = root.root().map(|r| &r.identifier) else {
            return Vec::new();
        };
        let table = self.table(&root.table);
        identifier
            .columns()
            .into_iter()
            .zip(identifier.column_types())
            .map(|(column, fallback)| {
                let sql_type = table
                    .and_then(|t| t.column(&column))
                    .map(|c| c.sql_type.clone())
                    .unwrap_or(fallback);
                (column, sql_type)
            })
            .collect()
    }

    /// Collection mapping by role.
    pub fn collection(&self, role: &str) -> Option<&CollectionMapping> {
        self.collections.get(role)
    }

    /// Mutable collection mapping by role.
    pub fn collection_mut(&mut self, role: &str) -> Option<&mut CollectionMapping> {
        self.collections.get_mut(role)
    }

    /// Direct subclasses mapped under an entity.
    pub fn subclasses_of<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a PersistentMapping> {
        self.mappings
            .values()
            .filter(move |m| m.subclass().is_some_and(|s| s.parent == entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Generator, InheritanceStrategy, RootMapping, SubclassMapping};
    use std::collections::BTreeMap;

    fn animal_model() -> RelationalSchemaModel {
        let mut model = RelationalSchemaModel::new();
        let table = QualifiedName::new("animal");
        model
            .get_or_create_table(&table)
            .add_column(Column::new("animal_key", SqlType::Uuid));
        model.mappings.insert(
            "Animal".into(),
            PersistentMapping::new(
                "Animal",
                table.clone(),
                MappingKind::Root(RootMapping {
                    identifier: IdentifierMapping::Simple {
                        property: "id".into(),
                        column: "animal_key".into(),
                        sql_type: SqlType::BigInt,
                        generator: Generator {
                            strategy: "uuid".into(),
                            params: BTreeMap::new(),
                        },
                    },
                    version: None,
                    discriminator: None,
                    inheritance: Some(InheritanceStrategy::SingleTable),
                    natural_id: Vec::new(),
                }),
            ),
        );
        model.mappings.insert(
            "Dog".into(),
            PersistentMapping::new(
                "Dog",
                table,
                MappingKind::Subclass(SubclassMapping {
                    parent: "Animal".into(),
                    root: "Animal".into(),
                    strategy: InheritanceStrategy::SingleTable,
                    key_columns: Vec::new(),
                }),
            ),
        );
        model
    }

    #[test]
    fn test_root_lookup_through_subclass() {
        let model = animal_model();

        assert_eq!(model.root_mapping("Dog").unwrap().entity, "Animal");
        assert_eq!(model.subclasses_of("Animal").count(), 1);
        assert!(model.identifier("Dog").is_some());
        assert!(model.root_mapping("Cat").is_none());
    }

    #[test]
    fn test_identifier_columns_use_table_types() {
        let model = animal_model();

        assert_eq!(
            model.identifier_columns("Dog"),
            vec![("animal_key".to_string(), SqlType::Uuid)]
        );
    }

    #[test]
    fn test_single_table_subclass_does_not_own_table() {
        let model = animal_model();

        assert_eq!(model.table_owner(&QualifiedName::new("animal")), Some("Animal"));
        assert_eq!(model.table_owner(&QualifiedName::new("dog")), None);
    }
}
