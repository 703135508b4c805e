//! Structural pass: tables, identifiers, and property columns.
//!
//! Associations and collections whose targets may not be mapped yet are
//! queued as [`CollectionWorkItem`]s for the linking pass.

use super::cascade::{resolve_cascade, CascadeInput};
use super::context::BindingContext;
use super::linking::parse_sort;
use super::sizing::size_column;
use super::work::{CollectionWork, CollectionWorkItem, ForeignKeyWork};
use crate::descriptor::{
    AssociationKind, EntityDescriptor, Identifier, MappingStrategy, PropertyDescriptor, ValueType,
};
use crate::error::{BindError, BindWarning, Result};
use crate::overrides::{ColumnConfig, InheritanceRequest, PropertyConfig};
use crate::schema::{
    CachePolicy, CollectionElement, CollectionKind, CollectionMapping, Column, Discriminator,
    Generator, IdentifierMapping, InheritanceStrategy, MappingKind, PersistentMapping,
    PropertyBinding, QualifiedName, RootMapping, SqlType, SubclassMapping, ValueBinding,
    VersionMapping,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Where a group of properties is bound.
#[derive(Debug, Clone)]
struct Scope {
    /// Entity whose overrides, roles and ownership apply.
    owner: Arc<EntityDescriptor>,
    /// Table receiving the columns.
    table: QualifiedName,
    /// Path prefix inside embedded components.
    prefix: Option<String>,
    /// Single-table subclass columns must accept null.
    forced_nullable: bool,
    /// An enclosing component is optional.
    optional: bool,
}

impl Scope {
    fn new(owner: Arc<EntityDescriptor>, table: QualifiedName, forced_nullable: bool) -> Self {
        Self {
            owner,
            table,
            prefix: None,
            forced_nullable,
            optional: false,
        }
    }

    fn path(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.to_string(),
        }
    }
}

/// Entity referenced by an association property.
fn target_of(property: &PropertyDescriptor) -> Option<String> {
    property.referenced_entity.clone().or_else(|| match &property.value_type {
        ValueType::Entity(name) => Some(name.clone()),
        _ => None,
    })
}

impl<'a> BindingContext<'a> {
    /// Bind every supplied entity: roots first, then subclasses attaching
    /// to parents mapped earlier.
    pub fn bind_structure(&mut self, entities: &[EntityDescriptor]) -> Result<()> {
        for entity in entities {
            if let Some(parent) = &entity.superclass {
                if !self.store.contains(parent) {
                    return Err(BindError::UnknownEntity {
                        entity: parent.clone(),
                    });
                }
            }
        }

        for entity in entities.iter().filter(|e| e.is_root()) {
            if let Some(descriptor) = self.entity(&entity.name) {
                self.bind_root(descriptor)?;
            }
        }

        loop {
            let pending: Vec<Arc<EntityDescriptor>> = entities
                .iter()
                .filter(|e| !e.is_root() && !self.is_bound(&e.name))
                .filter_map(|e| self.entity(&e.name))
                .filter(|d| self.is_bindable(d))
                .collect();

            let mut progressed = false;
            for subclass in pending {
                let Some(parent) = subclass.superclass.clone() else {
                    continue;
                };
                let Some(root) = self.model.root_mapping(&parent).map(|m| m.entity.clone()) else {
                    continue;
                };
                if self.is_bound(&subclass.name) {
                    continue;
                }
                let strategy = self.ensure_hierarchy(&root)?;
                self.bind_subclass(subclass, &parent, &root, strategy)?;
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
        Ok(())
    }

    fn is_bindable(&self, entity: &EntityDescriptor) -> bool {
        !entity.embeddable && entity.mapping_strategy == MappingStrategy::Native
    }

    fn bind_root(&mut self, entity: Arc<EntityDescriptor>) -> Result<()> {
        if self.is_bound(&entity.name) {
            return Ok(());
        }
        if !self.is_bindable(&entity) {
            debug!(entity = %entity.name, "skipping entity not mapped natively");
            return Ok(());
        }
        let name = entity.name.clone();
        if self.own_inheritance_request(&name) == InheritanceRequest::Conflicting {
            return Err(BindError::ConflictingInheritance {
                entity: name,
                reason: "table_per_hierarchy and table_per_subclass disagree".to_string(),
            });
        }

        let table = self.claim_table(&entity)?;
        let (identifier, mut excluded) = self.bind_identifier(&entity, &table)?;
        let version = self.bind_version(&entity, &table);
        if let Some(version) = entity.version_name() {
            excluded.insert(version.to_string());
        }

        let mut mapping = PersistentMapping::new(
            &name,
            table.clone(),
            MappingKind::Root(RootMapping {
                identifier,
                version,
                discriminator: None,
                inheritance: None,
                natural_id: Vec::new(),
            }),
        );
        self.apply_entity_settings(&mut mapping);
        self.model.mappings.insert(name.clone(), mapping);
        self.mark_bound(&name);

        let scope = Scope::new(entity.clone(), table.clone(), false);
        let properties = self.bind_properties(&scope, &entity, &excluded)?;
        if let Some(mapping) = self.model.mapping_mut(&name) {
            mapping.properties.extend(properties);
        }
        self.bind_natural_id(&name, &table);
        debug!(entity = %name, table = %table, "bound root entity");

        if !entity.subclasses.is_empty() {
            let strategy = self.ensure_hierarchy(&name)?;
            for subclass in &entity.subclasses {
                let descriptor = self.entity(subclass).ok_or_else(|| BindError::UnknownEntity {
                    entity: subclass.clone(),
                })?;
                self.bind_subclass(descriptor, &name, &name, strategy)?;
            }
        }
        Ok(())
    }

    fn bind_subclass(
        &mut self,
        entity: Arc<EntityDescriptor>,
        parent: &str,
        root: &str,
        strategy: InheritanceStrategy,
    ) -> Result<()> {
        if self.is_bound(&entity.name) || !self.is_bindable(&entity) {
            return Ok(());
        }
        let name = entity.name.clone();
        let requested = match self.own_inheritance_request(&name) {
            InheritanceRequest::Unspecified => None,
            InheritanceRequest::SingleTable => Some(InheritanceStrategy::SingleTable),
            InheritanceRequest::Joined => Some(InheritanceStrategy::Joined),
            InheritanceRequest::Conflicting => {
                return Err(BindError::ConflictingInheritance {
                    entity: name,
                    reason: "table_per_hierarchy and table_per_subclass disagree".to_string(),
                })
            }
        };
        if let Some(requested) = requested.filter(|r| *r != strategy) {
            return Err(BindError::ConflictingInheritance {
                entity: name,
                reason: format!("requests {:?} but root {} uses {:?}", requested, root, strategy),
            });
        }

        let (table, key_columns) = match strategy {
            InheritanceStrategy::SingleTable => {
                let table = self
                    .model
                    .mapping(root)
                    .map(|m| m.table.clone())
                    .ok_or_else(|| BindError::UnknownEntity {
                        entity: root.to_string(),
                    })?;
                (table, Vec::new())
            }
            InheritanceStrategy::Joined => {
                let table = self.claim_table(&entity)?;
                let parent_table = self
                    .model
                    .mapping(parent)
                    .map(|m| m.table.clone())
                    .ok_or_else(|| BindError::UnknownEntity {
                        entity: parent.to_string(),
                    })?;
                let keys = self.model.identifier_columns(root);
                let names: Vec<String> = keys.iter().map(|(c, _)| c.clone()).collect();
                let joined = self.model.get_or_create_table(&table);
                for (column, sql_type) in keys {
                    joined.add_column(Column::new(column, sql_type));
                }
                joined.primary_key = names.clone();
                joined.add_foreign_key(names.clone(), parent_table, names.clone());
                (table, names)
            }
        };

        let mut mapping = PersistentMapping::new(
            &name,
            table.clone(),
            MappingKind::Subclass(SubclassMapping {
                parent: parent.to_string(),
                root: root.to_string(),
                strategy,
                key_columns,
            }),
        );
        if strategy == InheritanceStrategy::SingleTable {
            mapping.discriminator_value = Some(self.discriminator_value(&name));
        }
        self.apply_entity_settings(&mut mapping);
        self.model.mappings.insert(name.clone(), mapping);
        self.mark_bound(&name);

        let excluded = self.root_exclusions(root);
        let forced_nullable = strategy == InheritanceStrategy::SingleTable;
        let scope = Scope::new(entity.clone(), table.clone(), forced_nullable);
        let properties = self.bind_properties(&scope, &entity, &excluded)?;
        if let Some(mapping) = self.model.mapping_mut(&name) {
            mapping.properties.extend(properties);
        }
        debug!(entity = %name, parent, table = %table, ?strategy, "bound subclass");

        for subclass in &entity.subclasses {
            let descriptor = self.entity(subclass).ok_or_else(|| BindError::UnknownEntity {
                entity: subclass.clone(),
            })?;
            self.bind_subclass(descriptor, &name, root, strategy)?;
        }
        Ok(())
    }

    /// Resolve the primary table, failing if another entity owns it.
    fn claim_table(&mut self, entity: &EntityDescriptor) -> Result<QualifiedName> {
        let table = self.table_name_for(&entity.name);
        if let Some(existing) = self.model.table_owner(&table) {
            if existing != entity.name {
                return Err(BindError::DuplicateTable {
                    entity: entity.name.clone(),
                    table: table.to_string(),
                    existing: existing.to_string(),
                });
            }
        }
        let comment = self
            .overrides
            .resolve(&entity.name)
            .and_then(|m| m.comment.clone());
        let created = self.model.get_or_create_table(&table);
        if comment.is_some() {
            created.comment = comment;
        }
        Ok(table)
    }

    /// Identifier layout, with the override's composite key taking precedence.
    fn identifier_plan(&self, entity: &EntityDescriptor) -> Identifier {
        let composite = self
            .overrides
            .resolve(&entity.name)
            .and_then(|m| m.identity.as_ref().and_then(|i| i.composite.clone()));
        match composite {
            Some(parts) => Identifier::Composite(parts),
            None => entity.identifier.clone(),
        }
    }

    /// Properties never bound as ordinary properties anywhere in a hierarchy.
    fn root_exclusions(&self, root: &str) -> BTreeSet<String> {
        let Some(entity) = self.entity(root) else {
            return BTreeSet::new();
        };
        let mut excluded: BTreeSet<String> = match self.identifier_plan(&entity) {
            Identifier::Simple(property) => BTreeSet::from([property.name]),
            Identifier::Composite(parts) => parts.into_iter().collect(),
        };
        if let Some(version) = entity.version_name() {
            excluded.insert(version.to_string());
        }
        excluded
    }

    fn bind_identifier(
        &mut self,
        entity: &Arc<EntityDescriptor>,
        table: &QualifiedName,
    ) -> Result<(IdentifierMapping, BTreeSet<String>)> {
        let identity = self
            .overrides
            .resolve(&entity.name)
            .and_then(|m| m.identity.clone())
            .unwrap_or_default();

        match self.identifier_plan(entity) {
            Identifier::Composite(parts) => {
                let scope = Scope::new(entity.clone(), table.clone(), false);
                let mut properties = Vec::with_capacity(parts.len());
                for part in &parts {
                    let property = entity
                        .get_property(part)
                        .filter(|p| !p.association.is_collection())
                        .cloned()
                        .ok_or_else(|| BindError::CompositeIdentifier {
                            entity: entity.name.clone(),
                            property: part.clone(),
                        })?;
                    if let Some(binding) = self.bind_property(&scope, &property)? {
                        properties.push(binding);
                    }
                }
                let columns: Vec<String> = properties
                    .iter()
                    .flat_map(|p| p.value.columns().iter().cloned())
                    .collect();
                let key_table = self.model.get_or_create_table(table);
                for column in &columns {
                    if let Some(column) = key_table.column_mut(column) {
                        column.nullable = false;
                    }
                }
                key_table.primary_key = columns;
                Ok((
                    IdentifierMapping::Composite { properties },
                    parts.into_iter().collect(),
                ))
            }
            Identifier::Simple(property) => {
                let column = identity
                    .column
                    .clone()
                    .unwrap_or_else(|| self.column_name(&property.name));
                let sql_type = self.resolve_sql_type(
                    &entity.name,
                    &property.name,
                    identity.type_name.as_deref(),
                    &property.value_type,
                    None,
                );
                let strategy = identity
                    .generator
                    .clone()
                    .or_else(|| {
                        self.overrides
                            .global()
                            .identity
                            .as_ref()
                            .and_then(|i| i.generator.clone())
                    })
                    .unwrap_or_else(|| self.config.id_generator.clone());

                let key_table = self.model.get_or_create_table(table);
                key_table.add_column(Column::new(&column, sql_type.clone()));
                key_table.primary_key = vec![column.clone()];

                Ok((
                    IdentifierMapping::Simple {
                        property: property.name.clone(),
                        column,
                        sql_type,
                        generator: Generator {
                            strategy,
                            params: identity.params,
                        },
                    },
                    BTreeSet::from([property.name]),
                ))
            }
        }
    }

    fn bind_version(
        &mut self,
        entity: &EntityDescriptor,
        table: &QualifiedName,
    ) -> Option<VersionMapping> {
        let property = entity.version.as_ref()?;
        if self.overrides.entity_attr(&entity.name, |m| m.version) == Some(false) {
            return None;
        }
        if !property.value_type.is_versionable() {
            self.warn(BindWarning::UnsupportedVersionType {
                entity: entity.name.clone(),
                property: property.name.clone(),
                type_name: property.value_type.short_name(),
            });
            return None;
        }
        let column = self
            .overrides
            .resolve(&entity.name)
            .and_then(|m| m.version_column.clone())
            .unwrap_or_else(|| self.column_name(&property.name));
        let sql_type = SqlType::from_value_type(&property.value_type, Default::default());
        self.model
            .get_or_create_table(table)
            .add_column(Column::new(&column, sql_type.clone()));
        Some(VersionMapping {
            property: property.name.clone(),
            column,
            sql_type,
        })
    }

    /// Settle the inheritance strategy of a root, adding the discriminator
    /// the first time a single-table hierarchy is seen.
    pub(crate) fn ensure_hierarchy(&mut self, root: &str) -> Result<InheritanceStrategy> {
        let existing = self
            .model
            .mapping(root)
            .and_then(|m| m.root())
            .and_then(|r| r.inheritance);
        if let Some(strategy) = existing {
            return Ok(strategy);
        }
        let strategy = match self.inheritance_request(root) {
            InheritanceRequest::Joined => InheritanceStrategy::Joined,
            InheritanceRequest::SingleTable | InheritanceRequest::Unspecified => {
                InheritanceStrategy::SingleTable
            }
            InheritanceRequest::Conflicting => {
                return Err(BindError::ConflictingInheritance {
                    entity: root.to_string(),
                    reason: "table_per_hierarchy and table_per_subclass disagree".to_string(),
                })
            }
        };

        let table = self
            .model
            .mapping(root)
            .map(|m| m.table.clone())
            .ok_or_else(|| BindError::UnknownEntity {
                entity: root.to_string(),
            })?;
        let discriminator = match strategy {
            InheritanceStrategy::SingleTable => Some(self.bind_discriminator(root, &table)),
            InheritanceStrategy::Joined => None,
        };
        let value = discriminator
            .as_ref()
            .map(|_| self.discriminator_value(root));

        if let Some(mapping) = self.model.mapping_mut(root) {
            if let MappingKind::Root(root_mapping) = &mut mapping.kind {
                root_mapping.inheritance = Some(strategy);
                root_mapping.discriminator = discriminator;
            }
            mapping.discriminator_value = value;
        }
        Ok(strategy)
    }

    fn bind_discriminator(&mut self, root: &str, table: &QualifiedName) -> Discriminator {
        let config = self
            .overrides
            .resolve(root)
            .and_then(|m| m.discriminator.clone())
            .unwrap_or_default();
        let column_config = config.column.clone().unwrap_or_default();
        let column = column_config
            .name
            .clone()
            .unwrap_or_else(|| self.config.discriminator_column.clone());
        let sql_type = match config.type_name.as_deref() {
            Some(type_name) => {
                self.resolve_sql_type(root, &column, Some(type_name), &ValueType::String, None)
            }
            None => SqlType::Varchar,
        };

        if let Some(formula) = config.formula {
            return Discriminator {
                column: None,
                formula: Some(formula),
                sql_type,
                insertable: false,
            };
        }

        let mut discriminator_column = Column::new(&column, sql_type.clone());
        discriminator_column.length = column_config.length;
        discriminator_column.sql_type_override = column_config.sql_type;
        self.model
            .get_or_create_table(table)
            .add_column(discriminator_column);
        Discriminator {
            column: Some(column),
            formula: None,
            sql_type,
            insertable: config.insertable.unwrap_or(true),
        }
    }

    fn discriminator_value(&self, entity: &str) -> String {
        self.overrides
            .resolve(entity)
            .and_then(|m| m.discriminator.as_ref().and_then(|d| d.value.clone()))
            .unwrap_or_else(|| entity.to_string())
    }

    fn apply_entity_settings(&self, mapping: &mut PersistentMapping) {
        let entity = mapping.entity.clone();
        mapping.cache = self
            .overrides
            .entity_attr(&entity, |m| m.cache.clone())
            .and_then(|cache| match (cache.enabled, cache.usage) {
                (Some(false), _) | (None, None) => None,
                (_, usage) => Some(CachePolicy {
                    usage: usage.unwrap_or_else(|| "read-write".to_string()),
                    include: cache.include.unwrap_or_else(|| "all".to_string()),
                }),
            });
        mapping.dynamic_update = self
            .overrides
            .entity_attr(&entity, |m| m.dynamic_update)
            .unwrap_or(false);
        mapping.dynamic_insert = self
            .overrides
            .entity_attr(&entity, |m| m.dynamic_insert)
            .unwrap_or(false);
        mapping.batch_size = self.overrides.entity_attr(&entity, |m| m.batch_size);

        if let Some(sort) = self.overrides.entity_attr(&entity, |m| m.sort.clone()) {
            let order = self
                .overrides
                .entity_attr(&entity, |m| m.order)
                .unwrap_or_default();
            mapping.default_sort = parse_sort(&sort, order).into_iter().flatten().collect();
        }
    }

    fn bind_natural_id(&mut self, entity: &str, table: &QualifiedName) {
        let Some(natural) = self
            .overrides
            .resolve(entity)
            .and_then(|m| m.identity.as_ref().and_then(|i| i.natural.clone()))
        else {
            return;
        };
        let Some(mapping) = self.model.mapping(entity) else {
            return;
        };
        let columns: Vec<String> = natural
            .iter()
            .filter_map(|p| mapping.property(p))
            .flat_map(|b| b.value.columns().iter().cloned())
            .collect();
        if columns.is_empty() {
            return;
        }
        let key_table = self.model.get_or_create_table(table);
        let name = format!("uk_{}_natural_id", key_table.name.name);
        key_table.add_unique_key(name, columns);
        if let Some(MappingKind::Root(root)) = self.model.mapping_mut(entity).map(|m| &mut m.kind) {
            root.natural_id = natural;
        }
    }

    fn bind_properties(
        &mut self,
        scope: &Scope,
        declaring: &EntityDescriptor,
        excluded: &BTreeSet<String>,
    ) -> Result<Vec<PropertyBinding>> {
        let mut bindings = Vec::new();
        for property in &declaring.properties {
            if excluded.contains(&property.name)
                || self.store.is_inherited(&declaring.name, &property.name)
            {
                continue;
            }
            if let Some(binding) = self.bind_property(scope, property)? {
                bindings.push(binding);
            }
        }
        Ok(bindings)
    }

    fn bind_property(
        &mut self,
        scope: &Scope,
        property: &PropertyDescriptor,
    ) -> Result<Option<PropertyBinding>> {
        let path = scope.path(&property.name);
        let config = self.property_config(&scope.owner.name, &path);
        let target = target_of(property);

        let binding = match (property.association, target) {
            (AssociationKind::ManyToOne | AssociationKind::OneToOne { owning: true }, Some(target)) => {
                self.bind_many_to_one(scope, property, &path, &config, target)
            }
            (AssociationKind::OneToOne { owning: false }, Some(target)) => {
                self.bind_inverse_one_to_one(scope, property, &path, &config, target)
            }
            (AssociationKind::Embedded, Some(target)) => {
                self.bind_component(scope, property, &path, target)?
            }
            (kind, target) if kind.is_collection() => {
                if scope.prefix.is_some() {
                    self.warn(BindWarning::UnsupportedEmbeddedCollection {
                        entity: scope.owner.name.clone(),
                        property: path,
                    });
                    return Ok(None);
                }
                self.bind_collection(scope, property, &config, target)
            }
            _ => self.bind_simple(scope, property, &path, &config),
        };
        Ok(Some(binding))
    }

    fn add_column(&mut self, table: &QualifiedName, column: Column, forced_nullable: bool) {
        let target = self.model.get_or_create_table(table);
        let name = column.name.clone();
        if !target.add_column(column) && forced_nullable {
            if let Some(existing) = target.column_mut(&name) {
                existing.nullable = true;
            }
        }
    }

    fn add_indices(&mut self, table: &QualifiedName, spec: Option<&str>, column: &str) {
        let Some(spec) = spec else {
            return;
        };
        let target = self.model.get_or_create_table(table);
        for index in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            target.add_index_column(index, column);
        }
    }

    fn add_unique_key(&mut self, table: &QualifiedName, columns: &[String]) {
        let target = self.model.get_or_create_table(table);
        let name = format!("uk_{}_{}", target.name.name, columns.join("_"));
        target.add_unique_key(name, columns.to_vec());
    }

    fn bind_simple(
        &mut self,
        scope: &Scope,
        property: &PropertyDescriptor,
        path: &str,
        config: &PropertyConfig,
    ) -> PropertyBinding {
        let owner = scope.owner.name.clone();
        if let Some(formula) = &config.formula {
            let mut binding = PropertyBinding::new(
                &property.name,
                ValueBinding::Formula {
                    expression: formula.clone(),
                },
            );
            binding.derived = true;
            binding.insertable = false;
            binding.updatable = false;
            return binding;
        }

        let sql_type = self.resolve_sql_type(
            &owner,
            path,
            config.type_name.as_deref(),
            &property.value_type,
            config.enum_type,
        );
        let constraints = self.constraints.constraints_for(&owner, path);
        let mut column_configs = config.effective_columns();
        if column_configs.is_empty() {
            column_configs.push(ColumnConfig::default());
        }

        let base = self.column_name(path);
        let mut names = Vec::with_capacity(column_configs.len());
        for (i, column_config) in column_configs.iter().enumerate() {
            let name = column_config.name.clone().unwrap_or_else(|| {
                if i == 0 {
                    base.clone()
                } else {
                    format!("{}_{}", base, i)
                }
            });
            let declared_nullable = column_config
                .nullable
                .or(constraints.as_ref().and_then(|c| c.nullable))
                .unwrap_or(property.nullable || scope.optional);

            let mut column = Column::new(&name, sql_type.clone());
            column.sql_type_override = column_config.sql_type.clone();
            column.length = column_config.length;
            column.precision = column_config.precision;
            column.scale = column_config.scale;
            // Rows of sibling subclasses leave these columns empty.
            column.nullable = scope.forced_nullable || declared_nullable;
            column.unique = column_config.unique.unwrap_or(false);
            column.default_value = column_config.default_value.clone();
            column.comment = column_config.comment.clone();
            if let Some(constraints) = &constraints {
                size_column(&mut column, &property.value_type, constraints);
            }

            self.add_column(&scope.table, column, scope.forced_nullable);
            self.add_indices(
                &scope.table,
                column_config.index.as_deref().or(config.index.as_deref()),
                &name,
            );
            names.push(name);
        }

        let unique = config.unique == Some(true)
            || constraints.as_ref().and_then(|c| c.unique) == Some(true);
        if unique {
            self.add_unique_key(&scope.table, &names);
        }

        let mut binding = PropertyBinding::new(
            &property.name,
            ValueBinding::Simple {
                columns: names,
                sql_type,
            },
        );
        binding.lazy = config.lazy.unwrap_or(false);
        binding.fetch = config.fetch.unwrap_or_default();
        binding.derived = property.derived;
        binding.insertable = !property.derived && config.insertable.unwrap_or(true);
        binding.updatable = !property.derived && config.updatable.unwrap_or(true);
        binding
    }

    /// Default foreign key columns and their types for a reference to `target`.
    fn foreign_key_columns(
        &self,
        scope: &Scope,
        property: &PropertyDescriptor,
        path: &str,
        target: &str,
    ) -> Vec<(String, SqlType)> {
        let base = self
            .bidirectional_key_prefix(scope, property, target)
            .unwrap_or_else(|| self.column_name(path));

        let root = self.store.root_of(target).to_string();
        let Some(root) = self.entity(&root) else {
            return vec![(self.foreign_key_column(&base), SqlType::BigInt)];
        };
        match self.identifier_plan(&root) {
            Identifier::Simple(id) => vec![(
                self.foreign_key_column(&base),
                SqlType::from_value_type(&id.value_type, Default::default()),
            )],
            Identifier::Composite(parts) => parts
                .iter()
                .map(|part| {
                    let sql_type = root
                        .get_property(part)
                        .map(|p| SqlType::from_value_type(&p.value_type, Default::default()))
                        .unwrap_or(SqlType::BigInt);
                    (format!("{}_{}", base, self.column_name(part)), sql_type)
                })
                .collect(),
        }
    }

    /// Many-to-one side of a bidirectional one-to-many is keyed by the
    /// target's table name, unless two such references compete.
    fn bidirectional_key_prefix(
        &self,
        scope: &Scope,
        property: &PropertyDescriptor,
        target: &str,
    ) -> Option<String> {
        if scope.prefix.is_some() || property.association != AssociationKind::ManyToOne {
            return None;
        }
        let other = self
            .store
            .find_property(target, property.other_side.as_deref()?)?;
        if other.association != AssociationKind::OneToMany {
            return None;
        }
        let competing = scope
            .owner
            .properties
            .iter()
            .filter(|p| {
                p.association == AssociationKind::ManyToOne
                    && p.other_side.is_some()
                    && p.referenced_entity.as_deref() == Some(target)
            })
            .count();
        if competing > 1 {
            return None;
        }
        Some(self.short_table_name(target))
    }

    fn bind_many_to_one(
        &mut self,
        scope: &Scope,
        property: &PropertyDescriptor,
        path: &str,
        config: &PropertyConfig,
        target: String,
    ) -> PropertyBinding {
        let one_to_one = matches!(property.association, AssociationKind::OneToOne { .. });
        let defaults = self.foreign_key_columns(scope, property, path, &target);
        let column_configs = config.effective_columns();

        let mut names = Vec::with_capacity(defaults.len());
        for (i, (default_name, sql_type)) in defaults.into_iter().enumerate() {
            let column_config = column_configs.get(i).cloned().unwrap_or_default();
            let name = column_config.name.clone().unwrap_or(default_name);
            let mut column = Column::new(&name, sql_type);
            column.nullable = scope.forced_nullable
                || column_config
                    .nullable
                    .unwrap_or(property.nullable || scope.optional);
            column.sql_type_override = column_config.sql_type.clone();
            column.comment = column_config.comment.clone();
            self.add_column(&scope.table, column, scope.forced_nullable);
            self.add_indices(
                &scope.table,
                column_config.index.as_deref().or(config.index.as_deref()),
                &name,
            );
            names.push(name);
        }

        let unique = one_to_one || config.unique == Some(true);
        if unique {
            self.add_unique_key(&scope.table, &names);
        }

        let cascade = resolve_cascade(
            config.cascade,
            &CascadeInput::for_property(&scope.owner, property, &self.store),
        );
        self.queue.push(CollectionWorkItem::ForeignKey(ForeignKeyWork {
            entity: scope.owner.name.clone(),
            property: path.to_string(),
            table: scope.table.clone(),
            columns: names.clone(),
            target: target.clone(),
        }));

        let mut binding = PropertyBinding::new(
            &property.name,
            ValueBinding::ManyToOne {
                entity: target,
                columns: names,
                unique,
                ignore_not_found: config.ignore_not_found.unwrap_or(false),
            },
        );
        binding.cascade = cascade;
        binding.lazy = config.lazy.unwrap_or(true);
        binding.fetch = config.fetch.unwrap_or_default();
        binding.insertable = config.insertable.unwrap_or(true);
        binding.updatable = config.updatable.unwrap_or(true);
        binding
    }

    fn bind_inverse_one_to_one(
        &mut self,
        scope: &Scope,
        property: &PropertyDescriptor,
        path: &str,
        config: &PropertyConfig,
        target: String,
    ) -> PropertyBinding {
        let cascade = resolve_cascade(
            config.cascade,
            &CascadeInput::for_property(&scope.owner, property, &self.store),
        );
        self.queue.push(CollectionWorkItem::ForeignKey(ForeignKeyWork {
            entity: scope.owner.name.clone(),
            property: path.to_string(),
            table: scope.table.clone(),
            columns: Vec::new(),
            target: target.clone(),
        }));

        let mut binding = PropertyBinding::new(
            &property.name,
            ValueBinding::OneToOne {
                entity: target,
                property_ref: property.other_side.clone(),
            },
        );
        binding.cascade = cascade;
        binding.lazy = config.lazy.unwrap_or(true);
        binding.fetch = config.fetch.unwrap_or_default();
        binding
    }

    fn bind_component(
        &mut self,
        scope: &Scope,
        property: &PropertyDescriptor,
        path: &str,
        target: String,
    ) -> Result<PropertyBinding> {
        let component = self.entity(&target).ok_or_else(|| BindError::UnknownEntity {
            entity: target.clone(),
        })?;
        let mut excluded = BTreeSet::new();
        if let Some(id) = component.identifier_name() {
            excluded.insert(id.to_string());
        }
        if let Some(version) = component.version_name() {
            excluded.insert(version.to_string());
        }

        let nested = Scope {
            owner: scope.owner.clone(),
            table: scope.table.clone(),
            prefix: Some(path.to_string()),
            forced_nullable: scope.forced_nullable,
            optional: scope.optional || property.nullable,
        };
        let properties = self.bind_properties(&nested, &component, &excluded)?;
        Ok(PropertyBinding::new(
            &property.name,
            ValueBinding::Component {
                class: target,
                properties,
            },
        ))
    }

    fn bind_collection(
        &mut self,
        scope: &Scope,
        property: &PropertyDescriptor,
        config: &PropertyConfig,
        target: Option<String>,
    ) -> PropertyBinding {
        let owner = scope.owner.name.clone();
        let kind = CollectionKind::from_container(property.container_or_default());
        let element = match (property.association, target) {
            (AssociationKind::ManyToMany, Some(entity)) => CollectionElement::ManyToMany { entity },
            (AssociationKind::OneToMany, Some(entity)) => CollectionElement::OneToMany { entity },
            _ => CollectionElement::Basic {
                sql_type: self.resolve_sql_type(
                    &owner,
                    &property.name,
                    config.type_name.as_deref(),
                    &property.value_type,
                    config.enum_type,
                ),
            },
        };

        let mut collection = CollectionMapping::new(&owner, &property.name, kind, element);
        collection.cascade = resolve_cascade(
            config.cascade,
            &CascadeInput::for_property(&scope.owner, property, &self.store),
        );
        collection.lazy = config.lazy.unwrap_or(true);
        collection.fetch = config.fetch.unwrap_or_default();
        collection.batch_size = config.batch_size;
        collection.cache = config.cache.clone();

        let owner_table = self.table_name_for(&owner);
        if let Some(join_table) = &config.join_table {
            if let Some(name) = &join_table.name {
                collection.table = Some(QualifiedName::qualified(
                    name.clone(),
                    join_table.schema.clone().or_else(|| owner_table.schema.clone()),
                    join_table.catalog.clone().or_else(|| owner_table.catalog.clone()),
                ));
            }
        }
        if collection.table.is_none() && matches!(collection.element, CollectionElement::Basic { .. }) {
            collection.table = Some(QualifiedName::qualified(
                format!("{}_{}", owner_table.name, self.column_name(&property.name)),
                owner_table.schema.clone(),
                owner_table.catalog.clone(),
            ));
        }

        let role = collection.role.clone();
        let mut binding = PropertyBinding::new(
            &property.name,
            ValueBinding::Collection { role: role.clone() },
        );
        binding.cascade = collection.cascade;
        binding.lazy = collection.lazy;
        binding.fetch = collection.fetch;

        self.model.collections.insert(role.clone(), collection);
        self.queue.push(CollectionWorkItem::collection(
            kind,
            CollectionWork {
                owner,
                property: property.name.clone(),
                role: role.clone(),
            },
        ));
        debug!(role = %role, ?kind, "queued collection");
        binding
    }
}
