//! ORMBind Core - binds domain descriptors to a relational schema model.
//!
//! Entity descriptors, optional mapping overrides and validation constraints
//! go in; tables, columns, keys, entity mappings and collection mappings
//! come out.

pub mod binder;
pub mod config;
pub mod constraint;
pub mod descriptor;
pub mod error;
pub mod naming;
pub mod overrides;
pub mod schema;

pub use binder::{Binder, BindingState};
pub use config::BinderConfig;
pub use constraint::{ConstraintSet, ConstraintSource, InMemoryConstraints, NoConstraints};
pub use descriptor::{
    AssociationKind, ContainerKind, DescriptorStore, EntityDescriptor, Identifier,
    MappingStrategy, PropertyDescriptor, ValueType,
};
pub use error::{BindError, BindWarning, Result};
pub use naming::{
    ImprovedNamingStrategy, NamingRegistry, NamingStrategy, PreserveNamingStrategy,
    DEFAULT_DATASOURCE,
};
pub use overrides::{
    ColumnConfig, InMemoryOverrides, JoinTableConfig, MappingOverride, OverrideResolver,
    OverrideSource, PropertyConfig,
};
pub use schema::{
    CascadeStrategy, CollectionMapping, Column, FetchMode, PersistentMapping, QualifiedName,
    RelationalSchemaModel, SortDirection, SqlType, Table,
};
