//! Deferred work queued by the structural pass.

use crate::schema::{CollectionKind, QualifiedName};

/// Foreign key to resolve once every entity is mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyWork {
    /// Entity declaring the association.
    pub entity: String,
    /// Property path of the association.
    pub property: String,
    /// Table holding the foreign key columns.
    pub table: QualifiedName,
    /// Foreign key columns; empty for references that only need a mapped target.
    pub columns: Vec<String>,
    /// Referenced entity.
    pub target: String,
}

/// Collection to link once every entity is mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionWork {
    /// Owning entity.
    pub owner: String,
    /// Collection property.
    pub property: String,
    /// Collection role.
    pub role: String,
}

/// A unit of work for the linking pass, consumed exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionWorkItem {
    /// Many-to-one or owning one-to-one constraint.
    ForeignKey(ForeignKeyWork),
    /// Set or sorted set.
    Set(CollectionWork),
    /// Bag.
    Bag(CollectionWork),
    /// List with an index column.
    List(CollectionWork),
    /// Map with a key.
    Map(CollectionWork),
}

impl CollectionWorkItem {
    /// Work item for a collection of the given kind.
    pub fn collection(kind: CollectionKind, work: CollectionWork) -> Self {
        match kind {
            CollectionKind::Set | CollectionKind::SortedSet => CollectionWorkItem::Set(work),
            CollectionKind::Bag => CollectionWorkItem::Bag(work),
            CollectionKind::List => CollectionWorkItem::List(work),
            CollectionKind::Map => CollectionWorkItem::Map(work),
        }
    }

    /// Collection payload, if this is a collection item.
    pub fn as_collection(&self) -> Option<&CollectionWork> {
        match self {
            CollectionWorkItem::ForeignKey(_) => None,
            CollectionWorkItem::Set(work)
            | CollectionWorkItem::Bag(work)
            | CollectionWorkItem::List(work)
            | CollectionWorkItem::Map(work) => Some(work),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_variant_by_kind() {
        let work = CollectionWork {
            owner: "Person".into(),
            property: "nicknames".into(),
            role: "Person.nicknames".into(),
        };

        assert!(matches!(
            CollectionWorkItem::collection(CollectionKind::SortedSet, work.clone()),
            CollectionWorkItem::Set(_)
        ));
        let list = CollectionWorkItem::collection(CollectionKind::List, work);
        assert_eq!(list.as_collection().unwrap().role, "Person.nicknames");
    }
}
