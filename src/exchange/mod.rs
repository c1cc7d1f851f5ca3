//! Exchanges carry one inbound message through a producer

mod message;

pub use message::{Body, HeaderValue, Message, RelationshipBody};

use uuid::Uuid;

/// A unit of work handed to a producer.
#[derive(Debug, Clone)]
pub struct Exchange {
    id: Uuid,
    message: Message,
}

impl Exchange {
    pub fn new(message: Message) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The inbound message
    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

impl From<Message> for Exchange {
    fn from(message: Message) -> Self {
        Self::new(message)
    }
}
