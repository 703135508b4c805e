//! Domain model descriptors.
//!
//! Descriptors are produced by an external introspector before binding
//! starts and stay immutable for the duration of a binding run.

mod entity;
mod property;
mod store;
mod types;

pub use entity::{EntityDescriptor, Identifier, MappingStrategy};
pub use property::PropertyDescriptor;
pub use store::DescriptorStore;
pub use types::{short_class_name, AssociationKind, ContainerKind, ValueType};
