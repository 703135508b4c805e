//! Collection mappings.

use super::table::QualifiedName;
use super::types::{CascadeStrategy, FetchMode, SortDirection, SqlType};
use crate::descriptor::ContainerKind;
use serde::{Deserialize, Serialize};

/// Collection semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Unique, unordered.
    Set,
    /// Unique, kept in natural order.
    SortedSet,
    /// Ordered by an index column.
    List,
    /// Keyed by a map key.
    Map,
    /// Duplicates allowed, unordered.
    Bag,
}

impl CollectionKind {
    /// Collection kind for a declared container.
    pub fn from_container(container: ContainerKind) -> Self {
        match container {
            ContainerKind::Set => CollectionKind::Set,
            ContainerKind::SortedSet => CollectionKind::SortedSet,
            ContainerKind::List => CollectionKind::List,
            ContainerKind::Map => CollectionKind::Map,
            ContainerKind::Bag => CollectionKind::Bag,
        }
    }

    /// Whether elements are addressed by index or key.
    pub fn is_indexed(self) -> bool {
        matches!(self, CollectionKind::List | CollectionKind::Map)
    }
}

/// What a collection holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionElement {
    /// Entities keyed back to the owner.
    OneToMany {
        /// Element entity.
        entity: String,
    },
    /// Entities joined through a join table.
    ManyToMany {
        /// Element entity.
        entity: String,
    },
    /// Plain values.
    Basic {
        /// Element type.
        sql_type: SqlType,
    },
}

impl CollectionElement {
    /// Element entity, if the elements are entities.
    pub fn entity(&self) -> Option<&str> {
        match self {
            CollectionElement::OneToMany { entity } | CollectionElement::ManyToMany { entity } => {
                Some(entity)
            }
            CollectionElement::Basic { .. } => None,
        }
    }
}

/// Key linking collection rows to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionKey {
    /// Key columns in the collection table.
    pub columns: Vec<String>,
    /// Whether the key columns allow null.
    pub nullable: bool,
    /// Owner property the key references, when not the identifier.
    pub property_ref: Option<String>,
}

/// Index column of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListIndex {
    /// Index column.
    pub column: String,
    /// Index of the first element.
    pub base: u32,
}

/// Key of a map collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapKey {
    /// Dedicated key column.
    Column {
        /// Key column.
        column: String,
        /// Key type.
        sql_type: SqlType,
        /// Key length.
        length: Option<u32>,
    },
    /// A property of the element entity.
    Property {
        /// Element property name.
        property: String,
    },
}

/// One column of a collection's ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderColumn {
    /// Property path relative to the element.
    pub path: String,
    /// Resolved column.
    pub column: String,
    /// Table the column lives in.
    pub table: QualifiedName,
    /// Direction.
    pub direction: SortDirection,
}

/// Join needed to reach a dotted sort path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCriterion {
    /// Path prefix being joined (`owner`, `owner.address`).
    pub path: String,
    /// Entity reached by the join.
    pub entity: String,
    /// Table joined.
    pub table: QualifiedName,
    /// Foreign key columns on the source side.
    pub columns: Vec<String>,
}

/// Mapping of one collection property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMapping {
    /// Role, `Owner.property`.
    pub role: String,
    /// Owning entity.
    pub owner: String,
    /// Property name.
    pub property: String,
    /// Collection semantics.
    pub kind: CollectionKind,
    /// Table holding the collection rows: the join or value table, or the
    /// element table for keyed one-to-many collections.
    pub table: Option<QualifiedName>,
    /// Element description.
    pub element: CollectionElement,
    /// Element columns in the collection table.
    pub element_columns: Vec<String>,
    /// Whether each element appears in at most one collection.
    pub unique_elements: bool,
    /// Key back to the owner, set by linking.
    pub key: Option<CollectionKey>,
    /// Whether the other side maintains the relationship.
    pub inverse: bool,
    /// List index.
    pub index: Option<ListIndex>,
    /// Map key.
    pub map_key: Option<MapKey>,
    /// Ordering.
    pub order_by: Vec<OrderColumn>,
    /// Joins required by the ordering.
    pub sort_joins: Vec<JoinCriterion>,
    /// Cascade behavior.
    pub cascade: CascadeStrategy,
    /// Lazy loading.
    pub lazy: bool,
    /// Fetch mode.
    pub fetch: FetchMode,
    /// Batch fetch size.
    pub batch_size: Option<u32>,
    /// Cache usage.
    pub cache: Option<String>,
}

impl CollectionMapping {
    /// Role string for an owner and property.
    pub fn role_of(owner: &str, property: &str) -> String {
        format!("{}.{}", owner, property)
    }

    /// Create an unlinked collection.
    pub fn new(
        owner: impl Into<String>,
        property: impl Into<String>,
        kind: CollectionKind,
        element: CollectionElement,
    ) -> Self {
        let owner = owner.into();
        let property = property.into();
        Self {
            role: Self::role_of(&owner, &property),
            owner,
            property,
            kind,
            table: None,
            element,
            element_columns: Vec::new(),
            unique_elements: false,
            key: None,
            inverse: false,
            index: None,
            map_key: None,
            order_by: Vec::new(),
            sort_joins: Vec::new(),
            cascade: CascadeStrategy::None,
            lazy: true,
            fetch: FetchMode::Select,
            batch_size: None,
            cache: None,
        }
    }

    /// Whether the linking pass has resolved the key.
    pub fn is_linked(&self) -> bool {
        self.key.is_some()
    }

    /// Whether rows live in a dedicated join or value table.
    pub fn has_join_table(&self) -> bool {
        match self.element {
            CollectionElement::ManyToMany { .. } | CollectionElement::Basic { .. } => true,
            CollectionElement::OneToMany { .. } => !self.element_columns.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_and_defaults() {
        let collection = CollectionMapping::new(
            "Person",
            "pets",
            CollectionKind::from_container(ContainerKind::Set),
            CollectionElement::OneToMany {
                entity: "Pet".into(),
            },
        );

        assert_eq!(collection.role, "Person.pets");
        assert_eq!(collection.element.entity(), Some("Pet"));
        assert!(!collection.is_linked());
        assert!(!collection.has_join_table());
        assert!(!collection.kind.is_indexed());
    }

    #[test]
    fn test_basic_collections_use_a_value_table() {
        let collection = CollectionMapping::new(
            "Person",
            "nicknames",
            CollectionKind::List,
            CollectionElement::Basic {
                sql_type: SqlType::Varchar,
            },
        );

        assert!(collection.has_join_table());
        assert!(collection.kind.is_indexed());
        assert_eq!(collection.element.entity(), None);
    }
}
