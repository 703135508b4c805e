//! Declared value types and association tags for domain properties.

use serde::{Deserialize, Serialize};

/// Declared type of a domain property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Boolean value.
    Bool,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// Arbitrary-precision decimal.
    Decimal,
    /// UTF-8 string.
    String,
    /// Unbounded text.
    Text,
    /// Single character.
    Char,
    /// Binary data.
    Bytes,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// UUID (128-bit identifier).
    Uuid,
    /// An enumeration type.
    Enum {
        /// Name of the enum type.
        name: String,
        /// Declared variants, in declaration order.
        variants: Vec<String>,
    },
    /// A reference to another entity (or embeddable component).
    Entity(String),
    /// A type only a user type can persist.
    Custom(String),
}

impl ValueType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ValueType::Int16
                | ValueType::Int32
                | ValueType::Int64
                | ValueType::Float32
                | ValueType::Float64
                | ValueType::Decimal
        )
    }

    /// Check if this type carries a fractional part (precision/scale apply).
    pub fn is_fractional(&self) -> bool {
        matches!(
            self,
            ValueType::Float32 | ValueType::Float64 | ValueType::Decimal
        )
    }

    /// Check if this type is a string-like type (length applies).
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            ValueType::String | ValueType::Text | ValueType::Char | ValueType::Bytes
        )
    }

    /// Whether a version (optimistic lock) property may have this type.
    pub fn is_versionable(&self) -> bool {
        matches!(
            self,
            ValueType::Int16
                | ValueType::Int32
                | ValueType::Int64
                | ValueType::Date
                | ValueType::Timestamp
        )
    }

    /// Short lowercase name, used when deriving element column names.
    pub fn short_name(&self) -> String {
        match self {
            ValueType::Bool => "boolean".into(),
            ValueType::Int16 => "short".into(),
            ValueType::Int32 => "integer".into(),
            ValueType::Int64 => "long".into(),
            ValueType::Float32 => "float".into(),
            ValueType::Float64 => "double".into(),
            ValueType::Decimal => "big_decimal".into(),
            ValueType::String | ValueType::Text => "string".into(),
            ValueType::Char => "character".into(),
            ValueType::Bytes => "binary".into(),
            ValueType::Date => "date".into(),
            ValueType::Time => "time".into(),
            ValueType::Timestamp => "timestamp".into(),
            ValueType::Uuid => "uuid".into(),
            ValueType::Enum { name, .. } | ValueType::Entity(name) | ValueType::Custom(name) => {
                short_class_name(name).to_lowercase()
            }
        }
    }
}

/// Container a collection property is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Unordered, unique elements.
    Set,
    /// Naturally sorted, unique elements.
    SortedSet,
    /// Ordered elements with an explicit index.
    List,
    /// Keyed elements.
    Map,
    /// Unordered elements allowing duplicates.
    Bag,
}

impl ContainerKind {
    /// Whether elements carry a positional or key index.
    pub fn is_indexed(self) -> bool {
        matches!(self, ContainerKind::List | ContainerKind::Map)
    }
}

/// Association kind of a property, fixed when the descriptor is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// A plain value (scalar or enum).
    None,
    /// Many-to-one reference; this side holds the foreign key.
    ManyToOne,
    /// One-to-one reference.
    OneToOne {
        /// Whether this side holds the foreign key.
        owning: bool,
    },
    /// Collection of entities keyed back to this entity.
    OneToMany,
    /// Collection of entities through a join table.
    ManyToMany,
    /// Component whose properties live in the owner's table.
    Embedded,
    /// Collection of plain values.
    BasicCollection,
}

impl AssociationKind {
    /// Whether the property is a collection.
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            AssociationKind::OneToMany
                | AssociationKind::ManyToMany
                | AssociationKind::BasicCollection
        )
    }

    /// Whether the property holds a foreign key to another entity.
    pub fn holds_foreign_key(self) -> bool {
        matches!(
            self,
            AssociationKind::ManyToOne | AssociationKind::OneToOne { owning: true }
        )
    }
}

/// The unqualified part of a dotted class identity (`com.example.Person` -> `Person`).
pub fn short_class_name(identity: &str) -> &str {
    identity.rsplit('.').next().unwrap_or(identity)
}
