//! Mapping overrides.
//!
//! Overrides are produced by an external mapping DSL and only read here.
//! Every attribute is optional; absence falls through to the next layer and
//! finally to naming-strategy defaults.

mod mapping;
mod property;
mod resolver;

pub use mapping::{
    CacheConfig, DiscriminatorConfig, IdentityConfig, InheritanceRequest, MappingOverride,
    TableConfig, WILDCARD,
};
pub use property::{ColumnConfig, EnumStorage, JoinTableConfig, PropertyConfig};
pub use resolver::{InMemoryOverrides, OverrideResolver, OverrideSource};
