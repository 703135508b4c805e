//! Default cascade behavior of associations.

use crate::descriptor::{AssociationKind, DescriptorStore, EntityDescriptor, PropertyDescriptor};
use crate::schema::CascadeStrategy;

/// Facts about an association that decide its default cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeInput {
    /// Association kind.
    pub kind: AssociationKind,
    /// The declaring entity owns the referenced entity.
    pub this_owns_referenced: bool,
    /// The referenced entity owns the declaring entity.
    pub referenced_owns_this: bool,
    /// The association references its own declaring type.
    pub circular: bool,
}

impl CascadeInput {
    /// Input for a property declared on `owner`.
    ///
    /// "A owns B" means B lists A among its owners.
    pub fn for_property(
        owner: &EntityDescriptor,
        property: &PropertyDescriptor,
        store: &DescriptorStore,
    ) -> Self {
        let target = property
            .referenced_entity
            .as_deref()
            .and_then(|name| store.get(name));
        Self {
            kind: property.association,
            this_owns_referenced: target.is_some_and(|t| t.is_owned_by(&owner.name)),
            referenced_owns_this: property
                .referenced_entity
                .as_deref()
                .is_some_and(|name| owner.is_owned_by(name)),
            circular: property.circular,
        }
    }
}

/// Cascade applied when no override names one.
pub fn default_cascade(input: &CascadeInput) -> CascadeStrategy {
    match input.kind {
        AssociationKind::OneToOne { .. } => {
            if input.this_owns_referenced {
                CascadeStrategy::All
            } else {
                CascadeStrategy::None
            }
        }
        AssociationKind::OneToMany => {
            if input.this_owns_referenced {
                CascadeStrategy::All
            } else {
                CascadeStrategy::SaveUpdate
            }
        }
        AssociationKind::ManyToMany => {
            if input.this_owns_referenced || input.referenced_owns_this || input.circular {
                CascadeStrategy::SaveUpdate
            } else {
                CascadeStrategy::None
            }
        }
        AssociationKind::ManyToOne => {
            if input.referenced_owns_this && !input.circular {
                CascadeStrategy::All
            } else {
                CascadeStrategy::None
            }
        }
        AssociationKind::BasicCollection => CascadeStrategy::All,
        AssociationKind::Embedded | AssociationKind::None => CascadeStrategy::None,
    }
}

/// Explicit cascade if configured, else the default.
pub fn resolve_cascade(explicit: Option<CascadeStrategy>, input: &CascadeInput) -> CascadeStrategy {
    explicit.unwrap_or_else(|| default_cascade(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ContainerKind, ValueType};

    fn input(kind: AssociationKind, this_owns: bool, owned: bool, circular: bool) -> CascadeInput {
        CascadeInput {
            kind,
            this_owns_referenced: this_owns,
            referenced_owns_this: owned,
            circular,
        }
    }

    #[test]
    fn test_one_to_one() {
        let kind = AssociationKind::OneToOne { owning: true };
        assert_eq!(default_cascade(&input(kind, true, false, false)), CascadeStrategy::All);
        assert_eq!(default_cascade(&input(kind, false, true, false)), CascadeStrategy::None);
        assert_eq!(default_cascade(&input(kind, false, false, false)), CascadeStrategy::None);
    }

    #[test]
    fn test_one_to_many() {
        let kind = AssociationKind::OneToMany;
        assert_eq!(default_cascade(&input(kind, true, false, false)), CascadeStrategy::All);
        assert_eq!(
            default_cascade(&input(kind, false, true, false)),
            CascadeStrategy::SaveUpdate
        );
        assert_eq!(
            default_cascade(&input(kind, false, false, false)),
            CascadeStrategy::SaveUpdate
        );
    }

    #[test]
    fn test_many_to_many() {
        let kind = AssociationKind::ManyToMany;
        assert_eq!(
            default_cascade(&input(kind, true, false, false)),
            CascadeStrategy::SaveUpdate
        );
        assert_eq!(
            default_cascade(&input(kind, false, true, false)),
            CascadeStrategy::SaveUpdate
        );
        assert_eq!(
            default_cascade(&input(kind, false, false, true)),
            CascadeStrategy::SaveUpdate
        );
        assert_eq!(default_cascade(&input(kind, false, false, false)), CascadeStrategy::None);
    }

    #[test]
    fn test_many_to_one() {
        let kind = AssociationKind::ManyToOne;
        assert_eq!(default_cascade(&input(kind, false, true, false)), CascadeStrategy::All);
        assert_eq!(default_cascade(&input(kind, false, true, true)), CascadeStrategy::None);
        assert_eq!(default_cascade(&input(kind, true, false, false)), CascadeStrategy::None);
        assert_eq!(default_cascade(&input(kind, false, false, true)), CascadeStrategy::None);
    }

    #[test]
    fn test_values_and_components() {
        assert_eq!(
            default_cascade(&input(AssociationKind::BasicCollection, false, false, false)),
            CascadeStrategy::All
        );
        assert_eq!(
            default_cascade(&input(AssociationKind::Embedded, true, true, false)),
            CascadeStrategy::None
        );
        assert_eq!(
            default_cascade(&input(AssociationKind::None, false, false, false)),
            CascadeStrategy::None
        );
    }

    #[test]
    fn test_explicit_cascade_wins() {
        let many_to_one = input(AssociationKind::ManyToOne, false, true, false);
        assert_eq!(
            resolve_cascade(Some(CascadeStrategy::Merge), &many_to_one),
            CascadeStrategy::Merge
        );
        assert_eq!(resolve_cascade(None, &many_to_one), CascadeStrategy::All);
    }

    #[test]
    fn test_input_from_descriptors() {
        let mut store = DescriptorStore::new();
        let person = EntityDescriptor::new("Person").with_property(
            PropertyDescriptor::one_to_many("pets", "Pet", ContainerKind::Set)
                .with_other_side("owner"),
        );
        let pet = EntityDescriptor::new("Pet")
            .belongs_to("Person")
            .with_property(PropertyDescriptor::basic("name", ValueType::String))
            .with_property(PropertyDescriptor::many_to_one("owner", "Person").with_other_side("pets"));
        store.insert(person.clone());
        store.insert(pet.clone());

        let pets = CascadeInput::for_property(&person, person.get_property("pets").unwrap(), &store);
        assert!(pets.this_owns_referenced);
        assert_eq!(default_cascade(&pets), CascadeStrategy::All);

        let owner = CascadeInput::for_property(&pet, pet.get_property("owner").unwrap(), &store);
        assert!(owner.referenced_owns_this);
        assert_eq!(default_cascade(&owner), CascadeStrategy::All);
    }

    #[test]
    fn test_self_reference() {
        let mut store = DescriptorStore::new();
        let category = EntityDescriptor::new("Category")
            .with_property(PropertyDescriptor::many_to_one("parent", "Category"))
            .with_property(PropertyDescriptor::many_to_many(
                "related",
                "Category",
                ContainerKind::Set,
            ));
        store.insert(category.clone());

        let parent =
            CascadeInput::for_property(&category, category.get_property("parent").unwrap(), &store);
        let related =
            CascadeInput::for_property(&category, category.get_property("related").unwrap(), &store);

        assert_eq!(default_cascade(&parent), CascadeStrategy::None);
        assert_eq!(default_cascade(&related), CascadeStrategy::SaveUpdate);
    }
}
