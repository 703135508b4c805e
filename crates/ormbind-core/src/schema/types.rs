//! Storage types and association behavior enums.

use crate::descriptor::ValueType;
use crate::overrides::EnumStorage;
use serde::{Deserialize, Serialize};

/// Logical storage type of a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    /// Boolean.
    Boolean,
    /// 16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInt,
    /// Single precision float.
    Real,
    /// Double precision float.
    Double,
    /// Fixed-precision decimal.
    Decimal,
    /// Fixed-length character data.
    Char,
    /// Variable-length character data.
    Varchar,
    /// Unbounded character data.
    Text,
    /// Binary data.
    Binary,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// UUID.
    Uuid,
    /// Registered user type, persisted by name.
    UserType(String),
}

impl SqlType {
    /// Storage type derived from a declared type.
    ///
    /// Entity references map to the 64-bit key type; callers binding foreign
    /// keys use the referenced identifier's type instead.
    pub fn from_value_type(value_type: &ValueType, enum_storage: EnumStorage) -> SqlType {
        match value_type {
            ValueType::Bool => SqlType::Boolean,
            ValueType::Int16 => SqlType::SmallInt,
            ValueType::Int32 => SqlType::Integer,
            ValueType::Int64 => SqlType::BigInt,
            ValueType::Float32 => SqlType::Real,
            ValueType::Float64 => SqlType::Double,
            ValueType::Decimal => SqlType::Decimal,
            ValueType::String => SqlType::Varchar,
            ValueType::Text => SqlType::Text,
            ValueType::Char => SqlType::Char,
            ValueType::Bytes => SqlType::Binary,
            ValueType::Date => SqlType::Date,
            ValueType::Time => SqlType::Time,
            ValueType::Timestamp => SqlType::Timestamp,
            ValueType::Uuid => SqlType::Uuid,
            ValueType::Enum { .. } => match enum_storage {
                EnumStorage::String => SqlType::Varchar,
                EnumStorage::Ordinal => SqlType::Integer,
            },
            ValueType::Entity(_) => SqlType::BigInt,
            ValueType::Custom(name) => SqlType::UserType(name.clone()),
        }
    }

    /// Storage type for a well-known type name, case-insensitive.
    pub fn from_type_name(name: &str) -> Option<SqlType> {
        let sql_type = match name.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => SqlType::Boolean,
            "yes_no" | "true_false" | "character" | "char" => SqlType::Char,
            "short" | "smallint" => SqlType::SmallInt,
            "integer" | "int" => SqlType::Integer,
            "long" | "bigint" => SqlType::BigInt,
            "float" | "real" => SqlType::Real,
            "double" => SqlType::Double,
            "big_decimal" | "decimal" | "numeric" => SqlType::Decimal,
            "string" | "varchar" => SqlType::Varchar,
            "text" | "clob" => SqlType::Text,
            "binary" | "blob" => SqlType::Binary,
            "date" => SqlType::Date,
            "time" => SqlType::Time,
            "timestamp" => SqlType::Timestamp,
            "uuid" | "uuid-binary" | "uuid-char" => SqlType::Uuid,
            _ => return None,
        };
        Some(sql_type)
    }

    /// Whether column length applies.
    pub fn has_length(&self) -> bool {
        matches!(
            self,
            SqlType::Char | SqlType::Varchar | SqlType::Binary
        )
    }

    /// Whether precision and scale apply.
    pub fn has_precision(&self) -> bool {
        matches!(self, SqlType::Decimal | SqlType::Real | SqlType::Double)
    }
}

/// Cascade behavior of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CascadeStrategy {
    /// Cascade every operation.
    All,
    /// Cascade every operation and delete orphans.
    AllDeleteOrphan,
    /// Cascade saves and updates.
    SaveUpdate,
    /// Cascade merges.
    Merge,
    /// Cascade deletes.
    Delete,
    /// Cascade nothing.
    None,
}

impl std::fmt::Display for CascadeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CascadeStrategy::All => write!(f, "all"),
            CascadeStrategy::AllDeleteOrphan => write!(f, "all-delete-orphan"),
            CascadeStrategy::SaveUpdate => write!(f, "save-update"),
            CascadeStrategy::Merge => write!(f, "merge"),
            CascadeStrategy::Delete => write!(f, "delete"),
            CascadeStrategy::None => write!(f, "none"),
        }
    }
}

/// How an association is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Separate select.
    #[default]
    Select,
    /// Outer join.
    Join,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parse `asc` / `desc`, case-insensitive.
    pub fn parse(token: &str) -> Option<SortDirection> {
        match token.to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}
