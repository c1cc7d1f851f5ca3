//! Graph data-access template
//!
//! `GraphTemplate` is the façade the producer dispatches to. `StoreTemplate`
//! implements it over any [`GraphDatabase`], resolving mapped entities to
//! store nodes on the way.

use crate::graph::{
    Entity, EntityClass, Node, NodeId, Properties, PropertyValue, Relationship, RelationshipId,
    TYPE_PROPERTY,
};
use crate::storage::{Endpoint, GraphDatabase, StorageError, StorageResult};
use std::sync::Arc;

/// Graph operations available to message producers.
pub trait GraphTemplate: Send + Sync {
    /// Create a node without properties
    fn create_node(&self) -> StorageResult<Node>;

    /// Create a node with the given properties
    fn create_node_with(&self, properties: &Properties) -> StorageResult<Node>;

    /// Create a relationship between two stored nodes
    fn create_relationship_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
        properties: Option<&Properties>,
    ) -> StorageResult<Relationship>;

    /// Create a relationship entity between two mapped entities.
    ///
    /// With `allow_duplicates` false, an existing relationship of the same
    /// type between the two entity nodes is returned unchanged.
    fn create_entity_relationship_between(
        &self,
        start: &Entity,
        end: &Entity,
        entity_class: &EntityClass,
        rel_type: &str,
        allow_duplicates: bool,
    ) -> StorageResult<Relationship>;

    /// Delete a node; it must exist and have no relationships
    fn delete_node(&self, id: NodeId) -> StorageResult<()>;

    /// Delete a relationship; it must exist
    fn delete_relationship(&self, id: RelationshipId) -> StorageResult<()>;

    /// Delete every relationship of `rel_type` from `start` to `end`.
    /// Returns the first removed id, or None if there was nothing to remove.
    fn delete_relationship_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> StorageResult<Option<RelationshipId>>;
}

/// Template backed by an embedded graph store.
pub struct StoreTemplate<S: GraphDatabase> {
    store: Arc<S>,
}

impl<S: GraphDatabase> StoreTemplate<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The store endpoint backing an entity: its node if attached, otherwise
    /// a new node carrying the entity's properties.
    fn endpoint_of(entity: &Entity) -> Endpoint {
        match entity.node_id {
            Some(id) => Endpoint::Existing(id),
            None => Endpoint::New(entity.node_properties()),
        }
    }
}

impl<S: GraphDatabase> Clone for StoreTemplate<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: GraphDatabase> GraphTemplate for StoreTemplate<S> {
    fn create_node(&self) -> StorageResult<Node> {
        self.store.create_node(&Properties::new())
    }

    fn create_node_with(&self, properties: &Properties) -> StorageResult<Node> {
        self.store.create_node(properties)
    }

    fn create_relationship_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
        properties: Option<&Properties>,
    ) -> StorageResult<Relationship> {
        let empty = Properties::new();
        self.store
            .create_relationship(start, end, rel_type, properties.unwrap_or(&empty))
    }

    fn create_entity_relationship_between(
        &self,
        start: &Entity,
        end: &Entity,
        entity_class: &EntityClass,
        rel_type: &str,
        allow_duplicates: bool,
    ) -> StorageResult<Relationship> {
        let mut properties = Properties::new();
        properties.insert(
            TYPE_PROPERTY.to_string(),
            PropertyValue::String(entity_class.name().to_string()),
        );
        self.store.link(
            &Self::endpoint_of(start),
            &Self::endpoint_of(end),
            rel_type,
            &properties,
            !allow_duplicates,
        )
    }

    fn delete_node(&self, id: NodeId) -> StorageResult<()> {
        if self.store.delete_node(id)? {
            Ok(())
        } else {
            Err(StorageError::NodeNotFound(id))
        }
    }

    fn delete_relationship(&self, id: RelationshipId) -> StorageResult<()> {
        if self.store.delete_relationship(id)? {
            Ok(())
        } else {
            Err(StorageError::RelationshipNotFound(id))
        }
    }

    fn delete_relationship_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> StorageResult<Option<RelationshipId>> {
        let removed = self.store.delete_relationships_between(start, end, rel_type)?;
        Ok(removed.first().copied())
    }
}
