//! Entity descriptors.

use super::property::PropertyDescriptor;
use super::types::{short_class_name, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One domain class eligible for persistence mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Stable identity (fully-qualified class name).
    pub name: String,
    /// Persistent superclass, if any.
    #[serde(default)]
    pub superclass: Option<String>,
    /// Direct persistent subclasses, in declaration order.
    #[serde(default)]
    pub subclasses: Vec<String>,
    /// Persistent properties, in declaration order.
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    /// Identifier definition.
    #[serde(default)]
    pub identifier: Identifier,
    /// Version (optimistic lock) property.
    #[serde(default)]
    pub version: Option<PropertyDescriptor>,
    /// Entities this entity belongs to.
    #[serde(default)]
    pub owners: BTreeSet<String>,
    /// Who maps this entity.
    #[serde(default)]
    pub mapping_strategy: MappingStrategy,
    /// Whether this type is only ever embedded in other entities.
    #[serde(default)]
    pub embeddable: bool,
}

/// Identifier of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    /// A single identifier property.
    Simple(PropertyDescriptor),
    /// Several properties that together identify a row.
    Composite(Vec<String>),
}

impl Default for Identifier {
    fn default() -> Self {
        Identifier::Simple(PropertyDescriptor::basic("id", ValueType::Int64))
    }
}

/// How an entity is mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    /// Bound by this binder.
    #[default]
    Native,
    /// Mapped elsewhere; the binder leaves it alone.
    External,
}

impl EntityDescriptor {
    /// Create a new entity descriptor with the default `id` identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            subclasses: Vec::new(),
            properties: Vec::new(),
            identifier: Identifier::default(),
            version: None,
            owners: BTreeSet::new(),
            mapping_strategy: MappingStrategy::Native,
            embeddable: false,
        }
    }

    /// Create an embeddable component type.
    pub fn embeddable(name: impl Into<String>) -> Self {
        let mut descriptor = Self::new(name);
        descriptor.embeddable = true;
        descriptor
    }

    /// Add a property. Self-referencing associations are flagged circular here.
    pub fn with_property(mut self, mut property: PropertyDescriptor) -> Self {
        if property.referenced_entity.as_deref() == Some(self.name.as_str()) {
            property.circular = true;
        }
        self.properties.push(property);
        self
    }

    /// Add multiple properties.
    pub fn with_properties(self, properties: impl IntoIterator<Item = PropertyDescriptor>) -> Self {
        properties.into_iter().fold(self, Self::with_property)
    }

    /// Set the identifier.
    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = identifier;
        self
    }

    /// Use a composite identifier made of the named properties.
    pub fn with_composite_id(mut self, properties: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.identifier = Identifier::Composite(properties.into_iter().map(Into::into).collect());
        self
    }

    /// Set the version property.
    pub fn with_version(mut self, version: PropertyDescriptor) -> Self {
        self.version = Some(version);
        self
    }

    /// Declare the superclass.
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Declare a direct subclass.
    pub fn with_subclass(mut self, subclass: impl Into<String>) -> Self {
        self.subclasses.push(subclass.into());
        self
    }

    /// Declare that this entity belongs to `owner`.
    pub fn belongs_to(mut self, owner: impl Into<String>) -> Self {
        self.owners.insert(owner.into());
        self
    }

    /// Mark the entity as mapped elsewhere.
    pub fn externally_mapped(mut self) -> Self {
        self.mapping_strategy = MappingStrategy::External;
        self
    }

    /// Whether this entity has no persistent superclass.
    pub fn is_root(&self) -> bool {
        self.superclass.is_none()
    }

    /// Whether `owner` is one of the entities this entity belongs to.
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owners.contains(owner)
    }

    /// Unqualified class name.
    pub fn short_name(&self) -> &str {
        short_class_name(&self.name)
    }

    /// Get a property by name.
    pub fn get_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Name of the simple identifier property, if the identifier is simple.
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.identifier {
            Identifier::Simple(property) => Some(&property.name),
            Identifier::Composite(_) => None,
        }
    }

    /// Name of the version property.
    pub fn version_name(&self) -> Option<&str> {
        self.version.as_ref().map(|v| v.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ContainerKind;

    #[test]
    fn test_entity_builder() {
        let entity = EntityDescriptor::new("com.example.Person")
            .with_property(PropertyDescriptor::basic("name", ValueType::String))
            .with_property(PropertyDescriptor::optional("nickname", ValueType::String))
            .with_version(PropertyDescriptor::basic("version", ValueType::Int64));

        assert_eq!(entity.short_name(), "Person");
        assert!(entity.is_root());
        assert_eq!(entity.properties.len(), 2);
        assert_eq!(entity.identifier_name(), Some("id"));
        assert_eq!(entity.version_name(), Some("version"));
    }

    #[test]
    fn test_self_reference_is_circular() {
        let entity = EntityDescriptor::new("Category")
            .with_property(PropertyDescriptor::many_to_one("parent", "Category"))
            .with_property(PropertyDescriptor::many_to_many(
                "related",
                "Other",
                ContainerKind::Set,
            ));

        assert!(entity.get_property("parent").unwrap().circular);
        assert!(!entity.get_property("related").unwrap().circular);
    }

    #[test]
    fn test_hierarchy_links_and_owners() {
        let dog = EntityDescriptor::new("Dog").extends("Animal").belongs_to("Person");

        assert!(!dog.is_root());
        assert!(dog.is_owned_by("Person"));
        assert!(!dog.is_owned_by("Animal"));
    }

    #[test]
    fn test_composite_identifier() {
        let entity = EntityDescriptor::new("OrderLine").with_composite_id(["order", "line"]);

        assert_eq!(entity.identifier_name(), None);
        assert_eq!(
            entity.identifier,
            Identifier::Composite(vec!["order".into(), "line".into()])
        );
    }
}
