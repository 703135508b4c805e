//! Relational schema model.
//!
//! The output of binding: tables with their columns and keys, one
//! [`PersistentMapping`] per entity and one [`CollectionMapping`] per
//! collection role, gathered in a [`RelationalSchemaModel`].

mod collection;
mod mapping;
mod model;
mod table;
mod types;

pub use collection::{
    CollectionElement, CollectionKey, CollectionKind, CollectionMapping, JoinCriterion, ListIndex,
    MapKey, OrderColumn,
};
pub use mapping::{
    BackReference, BackReferenceKind, CachePolicy, Discriminator, Generator, IdentifierMapping,
    InheritanceStrategy, MappingKind, PersistentMapping, PropertyBinding, RootMapping, SortClause,
    SubclassMapping, ValueBinding, VersionMapping,
};
pub use model::RelationalSchemaModel;
pub use table::{Column, ForeignKey, Index, QualifiedName, Table, UniqueKey};
pub use types::{CascadeStrategy, FetchMode, SortDirection, SqlType};
