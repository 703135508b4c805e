//! Binding errors and warnings.

use thiserror::Error;

/// Fatal binding errors. A run failing with one of these publishes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A composite identifier names a property the entity does not declare.
    #[error("composite identifier of {entity} references unknown property {property}")]
    CompositeIdentifier {
        /// Entity identity.
        entity: String,
        /// Missing property.
        property: String,
    },

    /// An association references an entity that was never mapped.
    #[error("{entity}.{property} references unmapped entity {target}")]
    UnmappedAssociationTarget {
        /// Entity declaring the association.
        entity: String,
        /// Association property.
        property: String,
        /// Referenced entity.
        target: String,
    },

    /// Inheritance flags contradict each other.
    #[error("conflicting inheritance for {entity}: {reason}")]
    ConflictingInheritance {
        /// Entity whose flags conflict.
        entity: String,
        /// What conflicts.
        reason: String,
    },

    /// Two entities resolve to the same table.
    #[error("table {table} of {entity} is already owned by {existing}")]
    DuplicateTable {
        /// Entity being bound.
        entity: String,
        /// Qualified table name.
        table: String,
        /// Entity already owning the table.
        existing: String,
    },

    /// A superclass or subclass link names an entity that was never supplied.
    #[error("unknown entity {entity}")]
    UnknownEntity {
        /// Missing identity.
        entity: String,
    },
}

/// Non-fatal problems; binding continues with a degraded mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindWarning {
    /// The version property has a type that cannot act as an optimistic lock.
    #[error("version {entity}.{property} has unsupported type {type_name}; no version mapped")]
    UnsupportedVersionType {
        /// Entity identity.
        entity: String,
        /// Version property.
        property: String,
        /// Declared type.
        type_name: String,
    },

    /// A sort token could not be parsed or resolved.
    #[error("ignoring sort token '{token}' on {entity}.{property}")]
    AmbiguousSortToken {
        /// Entity identity.
        entity: String,
        /// Collection property.
        property: String,
        /// Offending token.
        token: String,
    },

    /// A type name is neither a known storage type nor a registered user type.
    #[error("unknown type '{type_name}' on {entity}.{property}; using declared type")]
    UnresolvableUserType {
        /// Entity identity.
        entity: String,
        /// Property name.
        property: String,
        /// Unresolved type name.
        type_name: String,
    },

    /// Both sides of a many-to-many claim the same ownership.
    #[error("no single owner for {entity}.{property}; {owner} owns the join table")]
    AmbiguousManyToManyOwner {
        /// Entity identity.
        entity: String,
        /// Collection property.
        property: String,
        /// Entity chosen as owner.
        owner: String,
    },

    /// Embedded types cannot contain collections.
    #[error("collection {entity}.{property} inside an embedded type is not mapped")]
    UnsupportedEmbeddedCollection {
        /// Owning entity identity.
        entity: String,
        /// Property path.
        property: String,
    },

    /// Indexed collections are ordered by their index.
    #[error("sort on indexed collection {entity}.{property} is ignored")]
    SortIgnoredForIndexedCollection {
        /// Entity identity.
        entity: String,
        /// Collection property.
        property: String,
    },
}

impl BindWarning {
    /// Entity the warning concerns.
    pub fn entity(&self) -> &str {
        match self {
            BindWarning::UnsupportedVersionType { entity, .. }
            | BindWarning::AmbiguousSortToken { entity, .. }
            | BindWarning::UnresolvableUserType { entity, .. }
            | BindWarning::AmbiguousManyToManyOwner { entity, .. }
            | BindWarning::UnsupportedEmbeddedCollection { entity, .. }
            | BindWarning::SortIgnoredForIndexedCollection { entity, .. } => entity,
        }
    }

    /// Property the warning concerns.
    pub fn property(&self) -> &str {
        match self {
            BindWarning::UnsupportedVersionType { property, .. }
            | BindWarning::AmbiguousSortToken { property, .. }
            | BindWarning::UnresolvableUserType { property, .. }
            | BindWarning::AmbiguousManyToManyOwner { property, .. }
            | BindWarning::UnsupportedEmbeddedCollection { property, .. }
            | BindWarning::SortIgnoredForIndexedCollection { property, .. } => property,
        }
    }
}

/// Result type for binding.
pub type Result<T> = std::result::Result<T, BindError>;
