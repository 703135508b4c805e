//! Linking pass: foreign keys, collection keys, join tables, and ordering.
//!
//! Runs after every entity of a run is structurally bound, so every
//! reference can be checked against the mapped set.

use super::context::BindingContext;
use super::work::{CollectionWork, CollectionWorkItem, ForeignKeyWork};
use crate::descriptor::{short_class_name, AssociationKind, PropertyDescriptor};
use crate::error::{BindError, BindWarning, Result};
use crate::overrides::PropertyConfig;
use crate::schema::{
    BackReference, BackReferenceKind, CollectionElement, CollectionKey, CollectionKind,
    CollectionMapping, Column, IdentifierMapping, JoinCriterion, ListIndex, MapKey, OrderColumn,
    PropertyBinding, QualifiedName, SortClause, SortDirection, SqlType, ValueBinding,
};
use tracing::debug;

/// Parse `path [asc|desc], ...` into clauses; malformed tokens come back as errors.
pub(crate) fn parse_sort(
    spec: &str,
    default: SortDirection,
) -> Vec<std::result::Result<SortClause, String>> {
    spec.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let parts: Vec<&str> = token.split_whitespace().collect();
            let (path, direction) = match parts.as_slice() {
                [path] => (*path, Some(default)),
                [path, direction] => (*path, SortDirection::parse(direction)),
                _ => (token, None),
            };
            match direction {
                Some(direction) if !path.split('.').any(str::is_empty) => Ok(SortClause {
                    property: path.to_string(),
                    direction,
                }),
                _ => Err(token.to_string()),
            }
        })
        .collect()
}

fn back_reference_name(owner: &str, property: &str, suffix: &str) -> String {
    format!("_{}_{}{}", short_class_name(owner), property, suffix)
}

/// Everything a collection linker needs about the owner side.
struct OwnerSide {
    entity: String,
    table: QualifiedName,
    keys: Vec<(String, SqlType)>,
}

impl OwnerSide {
    fn key_names(&self) -> Vec<String> {
        self.keys.iter().map(|(c, _)| c.clone()).collect()
    }
}

impl<'a> BindingContext<'a> {
    /// Consume every queued work item.
    pub fn link(&mut self) -> Result<()> {
        let queue = std::mem::take(&mut self.queue);
        for item in queue {
            match item {
                CollectionWorkItem::ForeignKey(work) => self.link_foreign_key(work)?,
                CollectionWorkItem::Set(work) | CollectionWorkItem::Bag(work) => {
                    self.link_collection(&work)?;
                }
                CollectionWorkItem::List(work) => {
                    self.link_collection(&work)?;
                    self.link_list_index(&work);
                }
                CollectionWorkItem::Map(work) => {
                    self.link_collection(&work)?;
                    self.link_map_key(&work);
                }
            }
        }
        Ok(())
    }

    fn link_foreign_key(&mut self, work: ForeignKeyWork) -> Result<()> {
        if !self.model.is_mapped(&work.target) {
            return Err(BindError::UnmappedAssociationTarget {
                entity: work.entity,
                property: work.property,
                target: work.target,
            });
        }
        if work.columns.is_empty() {
            return Ok(());
        }
        let Some(target_table) = self.model.root_mapping(&work.target).map(|m| m.table.clone())
        else {
            return Ok(());
        };
        let keys = self.model.identifier_columns(&work.target);
        let referenced: Vec<String> = keys.iter().map(|(c, _)| c.clone()).collect();

        let table = self.model.get_or_create_table(&work.table);
        for (column, (_, sql_type)) in work.columns.iter().zip(&keys) {
            if let Some(column) = table.column_mut(column) {
                column.sql_type = sql_type.clone();
            }
        }
        table.add_foreign_key(work.columns, target_table, referenced);
        Ok(())
    }

    fn link_collection(&mut self, work: &CollectionWork) -> Result<()> {
        let Some(mut collection) = self.model.collection(&work.role).cloned() else {
            return Ok(());
        };
        let Some(property) = self.store.find_property(&work.owner, &work.property).cloned() else {
            return Ok(());
        };
        if let Some(target) = collection.element.entity() {
            if !self.model.is_mapped(target) {
                return Err(BindError::UnmappedAssociationTarget {
                    entity: work.owner.clone(),
                    property: work.property.clone(),
                    target: target.to_string(),
                });
            }
        }

        let config = self.property_config(&work.owner, &work.property);
        let owner = OwnerSide {
            entity: work.owner.clone(),
            table: self
                .model
                .mapping(&work.owner)
                .map(|m| m.table.clone())
                .unwrap_or_else(|| self.table_name_for(&work.owner)),
            keys: self.model.identifier_columns(&work.owner),
        };

        match collection.element.clone() {
            CollectionElement::Basic { sql_type } => {
                self.link_basic(&mut collection, &property, &config, &owner, sql_type)
            }
            CollectionElement::OneToMany { entity } => {
                self.link_one_to_many(&mut collection, &property, &config, &owner, &entity)
            }
            CollectionElement::ManyToMany { entity } => {
                self.link_many_to_many(&mut collection, &property, &config, &owner, &entity)
            }
        }
        self.link_sort(&mut collection, &config);

        debug!(
            role = %collection.role,
            table = ?collection.table.as_ref().map(|t| t.to_string()),
            inverse = collection.inverse,
            "linked collection"
        );
        self.model
            .collections
            .insert(collection.role.clone(), collection);
        Ok(())
    }

    /// Explicit single key column name, if configured.
    fn explicit_key(config: &PropertyConfig) -> Option<String> {
        config
            .join_table
            .as_ref()
            .and_then(|j| j.key.as_ref())
            .and_then(|k| k.name.clone())
            .or_else(|| config.key.as_ref().and_then(|k| k.name.clone()))
    }

    /// Explicit single element column name, if configured.
    fn explicit_element(config: &PropertyConfig) -> Option<String> {
        config
            .join_table
            .as_ref()
            .and_then(|j| j.column.as_ref())
            .and_then(|c| c.name.clone())
    }

    fn owner_key_columns(&self, config: &PropertyConfig, owner: &OwnerSide, prefix: &str) -> Vec<String> {
        match Self::explicit_key(config) {
            Some(name) if owner.keys.len() <= 1 => vec![name],
            _ => self.key_column_names(prefix, &owner.keys),
        }
    }

    /// Add key columns referencing `keys`, plus the foreign key to `referenced`.
    fn add_key_columns(
        &mut self,
        table: &QualifiedName,
        columns: &[String],
        keys: &[(String, SqlType)],
        nullable: bool,
        referenced: &QualifiedName,
    ) {
        let target = self.model.get_or_create_table(table);
        for (column, (_, sql_type)) in columns.iter().zip(keys) {
            target.add_column(Column::new(column, sql_type.clone()).with_nullable(nullable));
        }
        target.add_foreign_key(
            columns.to_vec(),
            referenced.clone(),
            keys.iter().map(|(c, _)| c.clone()).collect(),
        );
    }

    fn set_primary_key(&mut self, collection: &CollectionMapping, table: &QualifiedName, extra: &[String]) {
        let Some(key) = &collection.key else {
            return;
        };
        let mut columns = key.columns.clone();
        columns.extend(extra.iter().cloned());
        self.model.get_or_create_table(table).primary_key = columns;
    }

    fn link_basic(
        &mut self,
        collection: &mut CollectionMapping,
        property: &PropertyDescriptor,
        config: &PropertyConfig,
        owner: &OwnerSide,
        sql_type: SqlType,
    ) {
        let table = collection.table.clone().unwrap_or_else(|| {
            let owner_table = self.table_name_for(&owner.entity);
            QualifiedName::qualified(
                format!("{}_{}", owner_table.name, self.column_name(&property.name)),
                owner_table.schema,
                owner_table.catalog,
            )
        });
        let prefix = self.short_table_name(&owner.entity);
        let key_columns = self.owner_key_columns(config, owner, &prefix);
        self.add_key_columns(&table, &key_columns, &owner.keys, false, &owner.table);

        let element_column = Self::explicit_element(config).unwrap_or_else(|| {
            format!(
                "{}_{}",
                self.column_name(&property.name),
                property.value_type.short_name()
            )
        });
        let mut element = Column::new(&element_column, sql_type);
        element.length = config
            .join_table
            .as_ref()
            .and_then(|j| j.column.as_ref())
            .and_then(|c| c.length);
        self.model.get_or_create_table(&table).add_column(element);

        collection.table = Some(table.clone());
        collection.key = Some(CollectionKey {
            columns: key_columns,
            nullable: false,
            property_ref: None,
        });
        collection.element_columns = vec![element_column.clone()];
        if matches!(collection.kind, CollectionKind::Set | CollectionKind::SortedSet) {
            self.set_primary_key(collection, &table, &[element_column]);
        }
    }

    /// The many-to-one on the element entity answering this collection, if any.
    fn answering_many_to_one(
        &self,
        property: &PropertyDescriptor,
        owner: &str,
        element: &str,
    ) -> Option<(String, Vec<String>)> {
        let other_name = property.other_side.as_deref()?;
        let other = self.store.find_property(element, other_name)?;
        if other.association != AssociationKind::ManyToOne {
            return None;
        }
        let referenced = other.referenced_entity.as_deref()?;
        let references_owner = referenced == owner
            || self
                .store
                .ancestors(owner)
                .iter()
                .any(|ancestor| ancestor.name == referenced);
        if !references_owner {
            return None;
        }
        let (declaring, binding) = self.find_binding(element, other_name)?;
        match binding.value {
            ValueBinding::ManyToOne { columns, .. } => Some((declaring, columns)),
            _ => None,
        }
    }

    fn link_one_to_many(
        &mut self,
        collection: &mut CollectionMapping,
        property: &PropertyDescriptor,
        config: &PropertyConfig,
        owner: &OwnerSide,
        element: &str,
    ) {
        let element_table = self
            .model
            .mapping(element)
            .map(|m| m.table.clone())
            .unwrap_or_else(|| self.table_name_for(element));

        if let Some((declaring, columns)) = self.answering_many_to_one(property, &owner.entity, element) {
            let columns = config
                .key
                .as_ref()
                .and_then(|k| k.name.clone())
                .map(|name| vec![name])
                .unwrap_or(columns);
            let table = self
                .model
                .mapping(&declaring)
                .map(|m| m.table.clone())
                .unwrap_or(element_table);
            let nullable = self.model.table(&table).is_some_and(|t| {
                columns
                    .iter()
                    .any(|c| t.column(c).is_some_and(|column| column.nullable))
            });

            collection.inverse = true;
            collection.table = Some(table);
            collection.key = Some(CollectionKey {
                columns: columns.clone(),
                nullable,
                property_ref: None,
            });
            if let Some(mapping) = self.model.mapping_mut(element) {
                mapping.add_back_reference(BackReference {
                    name: back_reference_name(&owner.entity, &property.name, "Backref"),
                    collection_role: collection.role.clone(),
                    columns,
                    nullable,
                    insertable: false,
                    updatable: false,
                    kind: BackReferenceKind::Key,
                });
            }
            return;
        }

        if config.join_table.is_some() {
            let table = collection.table.clone().unwrap_or_else(|| {
                let owner_table = self.table_name_for(&owner.entity);
                QualifiedName::qualified(
                    format!("{}_{}", owner_table.name, self.column_name(&property.name)),
                    owner_table.schema,
                    owner_table.catalog,
                )
            });
            let prefix = self.short_table_name(&owner.entity);
            let key_columns = self.owner_key_columns(config, owner, &prefix);
            self.add_key_columns(&table, &key_columns, &owner.keys, false, &owner.table);

            let element_keys = self.model.identifier_columns(element);
            let element_columns = match Self::explicit_element(config) {
                Some(name) if element_keys.len() <= 1 => vec![name],
                _ => self.key_column_names(&self.short_table_name(element), &element_keys),
            };
            let element_root = self
                .model
                .root_mapping(element)
                .map(|m| m.table.clone())
                .unwrap_or(element_table);
            self.add_key_columns(&table, &element_columns, &element_keys, false, &element_root);
            let target = self.model.get_or_create_table(&table);
            let name = format!("uk_{}_{}", target.name.name, element_columns.join("_"));
            target.add_unique_key(name, element_columns.clone());

            collection.table = Some(table.clone());
            collection.unique_elements = true;
            collection.key = Some(CollectionKey {
                columns: key_columns,
                nullable: false,
                property_ref: None,
            });
            collection.element_columns = element_columns.clone();
            if matches!(collection.kind, CollectionKind::Set | CollectionKind::SortedSet) {
                self.set_primary_key(collection, &table, &element_columns);
            }
            return;
        }

        // Unidirectional: the element table carries a nullable key back to the owner.
        let prefix = format!(
            "{}_{}",
            self.short_table_name(&owner.entity),
            self.column_name(&property.name)
        );
        let columns = match config.key.as_ref().and_then(|k| k.name.clone()) {
            Some(name) if owner.keys.len() <= 1 => vec![name],
            _ => self.key_column_names(&prefix, &owner.keys),
        };
        self.add_key_columns(&element_table, &columns, &owner.keys, true, &owner.table);

        collection.table = Some(element_table);
        collection.key = Some(CollectionKey {
            columns: columns.clone(),
            nullable: true,
            property_ref: None,
        });
        if let Some(mapping) = self.model.mapping_mut(element) {
            mapping.add_back_reference(BackReference {
                name: back_reference_name(&owner.entity, &property.name, "Backref"),
                collection_role: collection.role.clone(),
                columns,
                nullable: true,
                insertable: true,
                updatable: false,
                kind: BackReferenceKind::Key,
            });
        }
    }

    fn link_many_to_many(
        &mut self,
        collection: &mut CollectionMapping,
        property: &PropertyDescriptor,
        config: &PropertyConfig,
        owner: &OwnerSide,
        element: &str,
    ) {
        let this_side = (owner.entity.clone(), property.name.clone());
        let other = property.other_side.as_deref().and_then(|name| {
            let other = self.store.find_property(element, name)?;
            if other.association != AssociationKind::ManyToMany {
                return None;
            }
            let declaring = self.declaring_entity(element, name)?;
            Some(((declaring, name.to_string()), other.owning_side))
        });

        let (owning, inverse) = match other {
            Some((other_side, _)) if other_side == this_side => (this_side.clone(), false),
            Some((other_side, other_owning)) if other_owning != property.owning_side => {
                if property.owning_side {
                    (this_side.clone(), false)
                } else {
                    (other_side, true)
                }
            }
            Some((other_side, _)) => {
                if this_side < other_side {
                    self.warn(BindWarning::AmbiguousManyToManyOwner {
                        entity: owner.entity.clone(),
                        property: property.name.clone(),
                        owner: owner.entity.clone(),
                    });
                    (this_side.clone(), false)
                } else {
                    (other_side, true)
                }
            }
            None => (this_side.clone(), false),
        };

        let (owning_entity, owning_property) = owning;
        let (key_entity, element_entity) = if inverse {
            (owning_entity.clone(), owner.entity.clone())
        } else {
            (owner.entity.clone(), element.to_string())
        };

        let owning_config = if inverse {
            self.property_config(&owning_entity, &owning_property)
        } else {
            config.clone()
        };
        let join = owning_config
            .join_table
            .clone()
            .or_else(|| config.join_table.clone())
            .unwrap_or_default();
        let owning_table = self.table_name_for(&owning_entity);
        let table = QualifiedName::qualified(
            join.name.clone().unwrap_or_else(|| {
                format!("{}_{}", owning_table.name, self.column_name(&owning_property))
            }),
            join.schema.clone().or(owning_table.schema),
            join.catalog.clone().or(owning_table.catalog),
        );

        let key_keys = self.model.identifier_columns(&key_entity);
        let element_keys = self.model.identifier_columns(&element_entity);
        let key_columns = match join.key.as_ref().and_then(|k| k.name.clone()) {
            Some(name) if key_keys.len() <= 1 => vec![name],
            _ => self.key_column_names(&self.short_table_name(&key_entity), &key_keys),
        };
        let mut element_columns = match join.column.as_ref().and_then(|c| c.name.clone()) {
            Some(name) if element_keys.len() <= 1 => vec![name],
            _ => self.key_column_names(&self.short_table_name(&element_entity), &element_keys),
        };
        if element_columns == key_columns {
            let prefix = format!(
                "{}_{}",
                self.short_table_name(&element_entity),
                self.column_name(&owning_property)
            );
            element_columns = self.key_column_names(&prefix, &element_keys);
        }

        collection.table = Some(table.clone());
        collection.inverse = inverse;
        if inverse {
            collection.key = Some(CollectionKey {
                columns: element_columns,
                nullable: false,
                property_ref: None,
            });
            collection.element_columns = key_columns;
            return;
        }

        let key_root = self
            .model
            .root_mapping(&key_entity)
            .map(|m| m.table.clone())
            .unwrap_or_else(|| owner.table.clone());
        let element_root = self
            .model
            .root_mapping(&element_entity)
            .map(|m| m.table.clone())
            .unwrap_or_else(|| self.table_name_for(&element_entity));
        self.add_key_columns(&table, &key_columns, &key_keys, false, &key_root);
        self.add_key_columns(&table, &element_columns, &element_keys, false, &element_root);

        collection.key = Some(CollectionKey {
            columns: key_columns,
            nullable: false,
            property_ref: None,
        });
        collection.element_columns = element_columns.clone();
        if matches!(collection.kind, CollectionKind::Set | CollectionKind::SortedSet) {
            self.set_primary_key(collection, &table, &element_columns);
        }
    }

    fn link_list_index(&mut self, work: &CollectionWork) {
        let config = self.property_config(&work.owner, &work.property);
        let Some(mut collection) = self.model.collection(&work.role).cloned() else {
            return;
        };
        let (Some(table), Some(key)) = (collection.table.clone(), collection.key.clone()) else {
            return;
        };
        let column = config
            .index_column
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| {
                format!("{}{}", self.column_name(&work.property), self.config.index_suffix)
            });
        self.model
            .get_or_create_table(&table)
            .add_column(Column::new(&column, SqlType::Integer).with_nullable(key.nullable));
        if collection.has_join_table() && !collection.inverse {
            self.set_primary_key(&collection, &table, std::slice::from_ref(&column));
        }

        let needs_index_backref = !key.nullable
            && !collection.inverse
            && collection.element.entity().is_some();
        if needs_index_backref {
            if let Some(element) = collection.element.entity().map(str::to_string) {
                if let Some(mapping) = self.model.mapping_mut(&element) {
                    mapping.add_back_reference(BackReference {
                        name: back_reference_name(&work.owner, &work.property, "IndexBackref"),
                        collection_role: collection.role.clone(),
                        columns: vec![column.clone()],
                        nullable: false,
                        insertable: true,
                        updatable: false,
                        kind: BackReferenceKind::Index,
                    });
                }
            }
        }

        collection.index = Some(ListIndex { column, base: 0 });
        self.model.collections.insert(work.role.clone(), collection);
    }

    fn link_map_key(&mut self, work: &CollectionWork) {
        let config = self.property_config(&work.owner, &work.property);
        let Some(mut collection) = self.model.collection(&work.role).cloned() else {
            return;
        };
        if let Some(property) = config.map_key_property.clone() {
            collection.map_key = Some(MapKey::Property { property });
            self.model.collections.insert(work.role.clone(), collection);
            return;
        }
        let (Some(table), Some(key)) = (collection.table.clone(), collection.key.clone()) else {
            return;
        };

        let index = config.index_column.clone().unwrap_or_default();
        let column = index.name.clone().unwrap_or_else(|| {
            format!("{}{}", self.column_name(&work.property), self.config.index_suffix)
        });
        let sql_type = index
            .sql_type
            .as_deref()
            .and_then(SqlType::from_type_name)
            .unwrap_or(SqlType::Varchar);
        let length = sql_type
            .has_length()
            .then(|| index.length.unwrap_or(self.config.map_key_length));

        let mut key_column = Column::new(&column, sql_type.clone()).with_nullable(key.nullable);
        key_column.length = length;
        self.model.get_or_create_table(&table).add_column(key_column);
        if collection.has_join_table() && !collection.inverse {
            self.set_primary_key(&collection, &table, std::slice::from_ref(&column));
        }

        collection.map_key = Some(MapKey::Column {
            column,
            sql_type,
            length,
        });
        self.model.collections.insert(work.role.clone(), collection);
    }

    fn link_sort(&mut self, collection: &mut CollectionMapping, config: &PropertyConfig) {
        let element = collection.element.entity().map(str::to_string);
        let (spec, order) = match &config.sort {
            Some(sort) => (Some(sort.clone()), config.order),
            None => match element.as_deref().and_then(|e| self.overrides.resolve(e)) {
                Some(mapping) => (mapping.sort.clone(), mapping.order),
                None => (None, None),
            },
        };
        let Some(spec) = spec else {
            return;
        };
        if collection.kind.is_indexed() {
            self.warn(BindWarning::SortIgnoredForIndexedCollection {
                entity: collection.owner.clone(),
                property: collection.property.clone(),
            });
            return;
        }

        for parsed in parse_sort(&spec, order.unwrap_or_default()) {
            let resolved = match &parsed {
                Ok(clause) => element
                    .as_deref()
                    .and_then(|e| self.resolve_sort_path(e, &clause.property))
                    .map(|resolved| (clause.clone(), resolved)),
                Err(_) => None,
            };
            let Some((clause, (joins, table, column))) = resolved else {
                let token = match parsed {
                    Ok(clause) => clause.property,
                    Err(token) => token,
                };
                self.warn(BindWarning::AmbiguousSortToken {
                    entity: collection.owner.clone(),
                    property: collection.property.clone(),
                    token,
                });
                continue;
            };
            for join in joins {
                if !collection.sort_joins.iter().any(|j| j.path == join.path) {
                    collection.sort_joins.push(join);
                }
            }
            collection.order_by.push(OrderColumn {
                path: clause.property,
                column,
                table,
                direction: clause.direction,
            });
        }
    }

    /// Resolve a dotted property path from `element` to a column, collecting
    /// one join per traversed association.
    fn resolve_sort_path(
        &self,
        element: &str,
        path: &str,
    ) -> Option<(Vec<JoinCriterion>, QualifiedName, String)> {
        let segments: Vec<&str> = path.split('.').collect();
        let (last, init) = segments.split_last()?;

        let mut entity = element.to_string();
        let mut table = self.model.mapping(&entity)?.table.clone();
        let mut component: Option<Vec<PropertyBinding>> = None;
        let mut joins = Vec::new();
        let mut walked = String::new();

        for segment in init {
            walked = if walked.is_empty() {
                segment.to_string()
            } else {
                format!("{}.{}", walked, segment)
            };
            let binding = match &component {
                Some(properties) => properties.iter().find(|p| p.name == *segment).cloned()?,
                None => {
                    let (declaring, binding) = self.find_binding(&entity, segment)?;
                    table = self.model.mapping(&declaring)?.table.clone();
                    binding
                }
            };
            match binding.value {
                ValueBinding::ManyToOne {
                    entity: target,
                    columns,
                    ..
                } => {
                    let target_table = self.model.mapping(&target)?.table.clone();
                    joins.push(JoinCriterion {
                        path: walked.clone(),
                        entity: target.clone(),
                        table: target_table.clone(),
                        columns,
                    });
                    entity = target;
                    table = target_table;
                    component = None;
                }
                ValueBinding::Component { properties, .. } => component = Some(properties),
                _ => return None,
            }
        }

        if let Some(properties) = &component {
            let column = properties
                .iter()
                .find(|p| p.name == *last)?
                .value
                .columns()
                .first()?
                .clone();
            return Some((joins, table, column));
        }
        if let Some((declaring, binding)) = self.find_binding(&entity, last) {
            let column = binding.value.columns().first()?.clone();
            let table = self.model.mapping(&declaring)?.table.clone();
            return Some((joins, table, column));
        }
        let root = self.model.root_mapping(&entity)?;
        match root.root().map(|r| &r.identifier)? {
            IdentifierMapping::Simple {
                property, column, ..
            } if property == last => Some((joins, root.table.clone(), column.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_tokens() {
        let parsed = parse_sort("name, owner.name desc,  age ASC", SortDirection::Asc);

        assert_eq!(parsed.len(), 3);
        assert_eq!(
            parsed[1],
            Ok(SortClause {
                property: "owner.name".into(),
                direction: SortDirection::Desc,
            })
        );
        assert_eq!(parsed[2].as_ref().map(|c| c.direction), Ok(SortDirection::Asc));
    }

    #[test]
    fn test_parse_sort_default_direction() {
        let parsed = parse_sort("name", SortDirection::Desc);

        assert_eq!(parsed[0].as_ref().map(|c| c.direction), Ok(SortDirection::Desc));
    }

    #[test]
    fn test_parse_sort_rejects_malformed_tokens() {
        let parsed = parse_sort("name sideways, a b c, owner..name, ,", SortDirection::Asc);

        assert_eq!(
            parsed,
            vec![
                Err("name sideways".to_string()),
                Err("a b c".to_string()),
                Err("owner..name".to_string()),
            ]
        );
    }

    #[test]
    fn test_back_reference_name() {
        assert_eq!(
            back_reference_name("com.example.Person", "pets", "Backref"),
            "_Person_petsBackref"
        );
    }
}
