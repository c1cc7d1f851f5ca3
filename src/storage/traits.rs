//! Storage trait definitions

use crate::graph::{Node, NodeId, Properties, Relationship, RelationshipId};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(RelationshipId),

    #[error("Node {0} still has relationships")]
    NodeHasRelationships(NodeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParse(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One end of a relationship created by [`GraphDatabase::link`]
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// A node that must already exist
    Existing(NodeId),
    /// A node to create with the given properties
    New(Properties),
}

/// Trait for embedded graph database backends
///
/// Implementations must be thread-safe (Send + Sync). Identifiers are
/// assigned by the store and never reused.
pub trait GraphDatabase: Send + Sync {
    // === Node Operations ===

    /// Create a node with the given properties
    fn create_node(&self, properties: &Properties) -> StorageResult<Node>;

    /// Load a node by ID
    fn load_node(&self, id: NodeId) -> StorageResult<Option<Node>>;

    /// Delete a node. Fails with `NodeHasRelationships` if any relationship
    /// still references it. Returns false if the node did not exist.
    fn delete_node(&self, id: NodeId) -> StorageResult<bool>;

    /// Number of stored nodes
    fn node_count(&self) -> StorageResult<usize>;

    // === Relationship Operations ===

    /// Create a relationship; both endpoints must exist
    fn create_relationship(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
        properties: &Properties,
    ) -> StorageResult<Relationship>;

    /// Load a relationship by ID
    fn load_relationship(&self, id: RelationshipId) -> StorageResult<Option<Relationship>>;

    /// Delete a relationship. Returns false if it did not exist.
    fn delete_relationship(&self, id: RelationshipId) -> StorageResult<bool>;

    /// Relationships of the given type from `start` to `end`, oldest first
    fn relationships_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> StorageResult<Vec<Relationship>>;

    /// Create a relationship, creating `New` endpoints on the way, as one
    /// atomic step: on error nothing is stored.
    ///
    /// With `reuse_existing` set, an existing relationship of `rel_type`
    /// from `start` to `end` is returned instead of creating another.
    fn link(
        &self,
        start: &Endpoint,
        end: &Endpoint,
        rel_type: &str,
        properties: &Properties,
        reuse_existing: bool,
    ) -> StorageResult<Relationship>;

    /// Atomically delete every relationship of `rel_type` from `start` to
    /// `end`, returning the removed ids oldest first
    fn delete_relationships_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> StorageResult<Vec<RelationshipId>>;

    /// Number of stored relationships
    fn relationship_count(&self) -> StorageResult<usize>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphDatabase + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
