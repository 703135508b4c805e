//! Property descriptors for entities.

use super::types::{AssociationKind, ContainerKind, ValueType};
use serde::{Deserialize, Serialize};

/// One persistent property of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,
    /// Declared type. For collections this is the element type.
    pub value_type: ValueType,
    /// Collection container, if the property is a collection.
    #[serde(default)]
    pub container: Option<ContainerKind>,
    /// Association kind.
    pub association: AssociationKind,
    /// Referenced entity (associations) or component type (embedded).
    #[serde(default)]
    pub referenced_entity: Option<String>,
    /// Name of the property on the referenced entity pointing back at this one.
    #[serde(default)]
    pub other_side: Option<String>,
    /// Whether this end owns the relationship (foreign key / join table).
    #[serde(default)]
    pub owning_side: bool,
    /// Whether the referenced type is the owning entity's own type.
    #[serde(default)]
    pub circular: bool,
    /// Whether the property may be absent.
    #[serde(default)]
    pub nullable: bool,
    /// Whether the value is computed and never written.
    #[serde(default)]
    pub derived: bool,
}

impl PropertyDescriptor {
    fn with_kind(name: impl Into<String>, value_type: ValueType, association: AssociationKind) -> Self {
        Self {
            name: name.into(),
            value_type,
            container: None,
            association,
            referenced_entity: None,
            other_side: None,
            owning_side: false,
            circular: false,
            nullable: false,
            derived: false,
        }
    }

    /// Create a required basic property.
    pub fn basic(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::with_kind(name, value_type, AssociationKind::None)
    }

    /// Create an optional basic property.
    pub fn optional(name: impl Into<String>, value_type: ValueType) -> Self {
        Self::basic(name, value_type).nullable()
    }

    /// Create a many-to-one reference.
    pub fn many_to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::entity_ref(name, target, AssociationKind::ManyToOne)
    }

    /// Create a one-to-one reference. The owning side holds the foreign key.
    pub fn one_to_one(name: impl Into<String>, target: impl Into<String>, owning: bool) -> Self {
        Self::entity_ref(name, target, AssociationKind::OneToOne { owning })
    }

    /// Create a one-to-many collection.
    pub fn one_to_many(
        name: impl Into<String>,
        target: impl Into<String>,
        container: ContainerKind,
    ) -> Self {
        let mut property = Self::entity_ref(name, target, AssociationKind::OneToMany);
        property.container = Some(container);
        property
    }

    /// Create a many-to-many collection.
    pub fn many_to_many(
        name: impl Into<String>,
        target: impl Into<String>,
        container: ContainerKind,
    ) -> Self {
        let mut property = Self::entity_ref(name, target, AssociationKind::ManyToMany);
        property.container = Some(container);
        property
    }

    /// Create an embedded component.
    pub fn embedded(name: impl Into<String>, component: impl Into<String>) -> Self {
        Self::entity_ref(name, component, AssociationKind::Embedded)
    }

    /// Create a collection of plain values.
    pub fn basic_collection(
        name: impl Into<String>,
        element: ValueType,
        container: ContainerKind,
    ) -> Self {
        let mut property = Self::with_kind(name, element, AssociationKind::BasicCollection);
        property.container = Some(container);
        property
    }

    fn entity_ref(name: impl Into<String>, target: impl Into<String>, kind: AssociationKind) -> Self {
        let target = target.into();
        let mut property = Self::with_kind(name, ValueType::Entity(target.clone()), kind);
        property.referenced_entity = Some(target);
        property
    }

    /// Mark the property as optional.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the property as derived (computed, never written).
    pub fn derived(mut self) -> Self {
        self.derived = true;
        self
    }

    /// Point at the property on the other side of a bidirectional association.
    pub fn with_other_side(mut self, other_side: impl Into<String>) -> Self {
        self.other_side = Some(other_side.into());
        self
    }

    /// Mark this end as the owning side.
    pub fn owning(mut self) -> Self {
        self.owning_side = true;
        self
    }

    /// Whether the association is navigable from both ends.
    pub fn is_bidirectional(&self) -> bool {
        self.other_side.is_some()
    }

    /// Whether this property is an association to another entity.
    pub fn is_association(&self) -> bool {
        !matches!(
            self.association,
            AssociationKind::None | AssociationKind::Embedded | AssociationKind::BasicCollection
        )
    }

    /// Container of a collection property, defaulting to a set.
    pub fn container_or_default(&self) -> ContainerKind {
        self.container.unwrap_or(ContainerKind::Set)
    }
}
