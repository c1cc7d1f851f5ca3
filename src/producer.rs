//! Producer: dispatches an exchange to a graph operation
//!
//! The operation header selects one of a closed set of operations. The body
//! supplies the operation's arguments, the template does the work, and the
//! resulting id is written back onto the message.

use crate::endpoint::StoreLocation;
use crate::exchange::{Body, Exchange, HeaderValue, Message, RelationshipBody};
use crate::operation::{Operation, HEADER_NODE_ID, HEADER_OPERATION, HEADER_RELATIONSHIP_ID};
use crate::storage::StorageError;
use crate::template::GraphTemplate;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while processing an exchange
#[derive(Debug, Error)]
pub enum ProducerError {
    /// The operation header is missing or names no known operation
    #[error("No supported operation specified{}", code_suffix(.0))]
    UnsupportedOperation(Option<String>),

    #[error("Operation {operation} cannot use a {found} body")]
    InvalidBody {
        operation: Operation,
        found: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StorageError),
}

/// Result type for producer operations
pub type ProducerResult<T> = Result<T, ProducerError>;

/// Routes exchanges to a graph template.
pub struct GraphProducer<T: GraphTemplate> {
    template: T,
    endpoint: Option<StoreLocation>,
}

impl<T: GraphTemplate> GraphProducer<T> {
    /// A producer over a bare template, not bound to any endpoint
    pub fn new(template: T) -> Self {
        Self {
            template,
            endpoint: None,
        }
    }

    /// A producer created by the endpoint at `location`
    pub fn for_endpoint(template: T, location: StoreLocation) -> Self {
        Self {
            template,
            endpoint: Some(location),
        }
    }

    pub fn template(&self) -> &T {
        &self.template
    }

    /// Location of the endpoint that created this producer, if any
    pub fn endpoint(&self) -> Option<&StoreLocation> {
        self.endpoint.as_ref()
    }

    /// Process one exchange.
    ///
    /// On error the message is left as it was received.
    pub fn process(&self, exchange: &mut Exchange) -> ProducerResult<()> {
        let exchange_id = exchange.id();
        let msg = exchange.message_mut();

        let operation = match Self::operation_of(msg) {
            Ok(op) => op,
            Err(e) => {
                warn!(%exchange_id, endpoint = ?self.endpoint, "{}", e);
                return Err(e);
            }
        };
        debug!(
            %exchange_id,
            endpoint = ?self.endpoint,
            %operation,
            body = msg.body().kind(),
            "dispatching"
        );

        match operation {
            Operation::CreateNode => self.create_node(msg),
            Operation::CreateRelationship => self.create_relationship(msg),
            Operation::RemoveNode => self.remove_node(msg),
            Operation::RemoveRelationship => self.remove_relationship(msg),
        }
    }

    fn operation_of(msg: &Message) -> ProducerResult<Operation> {
        match msg.header(HEADER_OPERATION) {
            Some(HeaderValue::Operation(op)) => Ok(*op),
            Some(HeaderValue::Text(code)) => code
                .parse()
                .map_err(|_| ProducerError::UnsupportedOperation(Some(code.clone()))),
            Some(other) => Err(ProducerError::UnsupportedOperation(Some(format!("{:?}", other)))),
            None => Err(ProducerError::UnsupportedOperation(None)),
        }
    }

    fn create_node(&self, msg: &mut Message) -> ProducerResult<()> {
        let node = match msg.body() {
            Body::Empty => self.template.create_node()?,
            Body::Properties(props) => self.template.create_node_with(props)?,
            other => return Err(invalid_body(Operation::CreateNode, other)),
        };
        msg.set_header(HEADER_NODE_ID, node.id.as_i64());
        Ok(())
    }

    fn create_relationship(&self, msg: &mut Message) -> ProducerResult<()> {
        let rel = match msg.body() {
            Body::Relationship(RelationshipBody::Basic(basic)) => self
                .template
                .create_relationship_between(basic.start(), basic.end(), basic.rel_type(), None)?,
            Body::Relationship(RelationshipBody::Entity(mapped)) => {
                self.template.create_entity_relationship_between(
                    mapped.start(),
                    mapped.end(),
                    mapped.entity_class(),
                    mapped.rel_type(),
                    mapped.allow_duplicates(),
                )?
            }
            other => return Err(invalid_body(Operation::CreateRelationship, other)),
        };
        msg.set_header(HEADER_RELATIONSHIP_ID, rel.id.as_i64());
        Ok(())
    }

    fn remove_node(&self, msg: &mut Message) -> ProducerResult<()> {
        let id = match msg.body() {
            Body::NodeId(id) => *id,
            other => return Err(invalid_body(Operation::RemoveNode, other)),
        };
        self.template.delete_node(id)?;
        msg.set_header(HEADER_NODE_ID, id.as_i64());
        Ok(())
    }

    fn remove_relationship(&self, msg: &mut Message) -> ProducerResult<()> {
        let removed = match msg.body() {
            Body::RelationshipId(id) => {
                self.template.delete_relationship(*id)?;
                Some(*id)
            }
            Body::Relationship(RelationshipBody::Basic(basic)) => self
                .template
                .delete_relationship_between(basic.start(), basic.end(), basic.rel_type())?,
            other => return Err(invalid_body(Operation::RemoveRelationship, other)),
        };
        if let Some(id) = removed {
            msg.set_header(HEADER_RELATIONSHIP_ID, id.as_i64());
        }
        Ok(())
    }
}

fn code_suffix(code: &Option<String>) -> String {
    match code {
        Some(code) => format!(": {}", code),
        None => String::new(),
    }
}

fn invalid_body(operation: Operation, body: &Body) -> ProducerError {
    ProducerError::InvalidBody {
        operation,
        found: body.kind(),
    }
}
