//! graphbridge: routes pipeline messages to graph operations
//!
//! A producer reads the operation header of an inbound message, hands the
//! body to a graph template, and writes the resulting node or relationship
//! id back onto the message.
//!
//! # Core Concepts
//!
//! - **Exchange / Message**: headers plus a typed body
//! - **Operation**: the closed set of graph operations a message can request
//! - **Template**: the graph-store façade the producer delegates to
//! - **Endpoint**: an opened store, addressed by `graph:` URI
//!
//! # Example
//!
//! ```
//! use graphbridge::{
//!     EndpointConfig, Exchange, GraphEndpoint, HeaderValue, Message, Operation,
//!     HEADER_NODE_ID, HEADER_OPERATION,
//! };
//!
//! let endpoint = GraphEndpoint::open(&EndpointConfig::new("graph:memory")).unwrap();
//! let producer = endpoint.create_producer();
//!
//! let mut exchange = Exchange::new(
//!     Message::new().with_header(HEADER_OPERATION, Operation::CreateNode),
//! );
//! producer.process(&mut exchange).unwrap();
//! assert!(matches!(
//!     exchange.message().header(HEADER_NODE_ID),
//!     Some(HeaderValue::Long(_))
//! ));
//! ```

pub mod endpoint;
pub mod exchange;
mod graph;
pub mod operation;
pub mod producer;
pub mod storage;
pub mod template;

pub use endpoint::{ConfigError, EndpointConfig, GraphEndpoint, StoreLocation};
pub use exchange::{Body, Exchange, HeaderValue, Message, RelationshipBody};
pub use graph::{
    BasicRelationship, Entity, EntityClass, EntityRelationship, Node, NodeId, Properties,
    PropertyValue, Relationship, RelationshipId, TYPE_PROPERTY,
};
pub use operation::{Operation, HEADER_NODE_ID, HEADER_OPERATION, HEADER_RELATIONSHIP_ID};
pub use producer::{GraphProducer, ProducerError, ProducerResult};
pub use storage::{Endpoint, GraphDatabase, OpenStore, SqliteGraph, StorageError, StorageResult};
pub use template::{GraphTemplate, StoreTemplate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
