//! Arena of entity descriptors keyed by identity.

use super::entity::EntityDescriptor;
use super::property::PropertyDescriptor;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory registry of entity descriptors.
///
/// Descriptors are stored once per identity; inserting an identity that is
/// already present keeps the cached descriptor.
#[derive(Debug, Clone, Default)]
pub struct DescriptorStore {
    entries: Vec<Arc<EntityDescriptor>>,
    index: HashMap<String, usize>,
}

impl DescriptorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor. Returns false if the identity was already cached.
    pub fn insert(&mut self, descriptor: EntityDescriptor) -> bool {
        if self.index.contains_key(&descriptor.name) {
            return false;
        }
        self.index.insert(descriptor.name.clone(), self.entries.len());
        self.entries.push(Arc::new(descriptor));
        true
    }

    /// Get a descriptor by identity.
    pub fn get(&self, name: &str) -> Option<&Arc<EntityDescriptor>> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    /// Check whether an identity is known.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EntityDescriptor>> {
        self.entries.iter()
    }

    /// Ancestors of an entity, nearest first. Stops at the first unknown link.
    pub fn ancestors(&self, name: &str) -> Vec<&Arc<EntityDescriptor>> {
        let mut chain = Vec::new();
        let mut current = self.get(name).and_then(|d| d.superclass.as_deref());
        while let Some(parent) = current {
            let Some(descriptor) = self.get(parent) else {
                break;
            };
            if chain.iter().any(|d: &&Arc<EntityDescriptor>| d.name == descriptor.name) {
                break;
            }
            chain.push(descriptor);
            current = descriptor.superclass.as_deref();
        }
        chain
    }

    /// Root of the hierarchy an entity belongs to.
    pub fn root_of<'a>(&'a self, name: &'a str) -> &'a str {
        self.ancestors(name)
            .into_iter()
            .last()
            .map(|d| d.name.as_str())
            .unwrap_or(name)
    }

    /// Whether a property of `entity` is declared by one of its ancestors.
    pub fn is_inherited(&self, entity: &str, property: &str) -> bool {
        self.ancestors(entity)
            .iter()
            .any(|ancestor| ancestor.get_property(property).is_some())
    }

    /// Find a property on an entity or any of its ancestors.
    pub fn find_property(&self, entity: &str, property: &str) -> Option<&PropertyDescriptor> {
        let own = self.get(entity).and_then(|d| d.get_property(property));
        own.or_else(|| {
            self.ancestors(entity)
                .into_iter()
                .find_map(|ancestor| ancestor.get_property(property))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ValueType;

    fn hierarchy() -> DescriptorStore {
        let mut store = DescriptorStore::new();
        store.insert(
            EntityDescriptor::new("Animal")
                .with_subclass("Dog")
                .with_property(PropertyDescriptor::basic("name", ValueType::String)),
        );
        store.insert(
            EntityDescriptor::new("Dog")
                .extends("Animal")
                .with_subclass("Puppy")
                .with_property(PropertyDescriptor::basic("name", ValueType::String))
                .with_property(PropertyDescriptor::basic("breed", ValueType::String)),
        );
        store.insert(EntityDescriptor::new("Puppy").extends("Dog"));
        store
    }

    #[test]
    fn test_insert_is_cached_by_identity() {
        let mut store = DescriptorStore::new();
        assert!(store.insert(EntityDescriptor::new("Person")));
        assert!(!store.insert(
            EntityDescriptor::new("Person")
                .with_property(PropertyDescriptor::basic("name", ValueType::String))
        ));

        assert_eq!(store.len(), 1);
        assert!(store.get("Person").unwrap().properties.is_empty());
    }

    #[test]
    fn test_ancestors_and_root() {
        let store = hierarchy();

        let names: Vec<_> = store.ancestors("Puppy").iter().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["Dog", "Animal"]);
        assert_eq!(store.root_of("Puppy"), "Animal");
        assert_eq!(store.root_of("Animal"), "Animal");
    }

    #[test]
    fn test_inherited_properties() {
        let store = hierarchy();

        assert!(store.is_inherited("Dog", "name"));
        assert!(!store.is_inherited("Dog", "breed"));
        assert!(store.find_property("Puppy", "breed").is_some());
        assert!(store.find_property("Puppy", "missing").is_none());
    }
}
