//! Graph value types shared by the store, the template, and messages

mod entity;
mod node;
mod relationship;

pub use entity::{Entity, EntityClass, TYPE_PROPERTY};
pub use node::{Node, NodeId, Properties, PropertyValue};
pub use relationship::{BasicRelationship, EntityRelationship, Relationship, RelationshipId};
