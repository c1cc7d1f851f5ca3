//! A `GraphTemplate` that records calls instead of touching a store

use chrono::Utc;
use graphbridge::{
    Entity, EntityClass, GraphTemplate, Node, NodeId, Properties, Relationship, RelationshipId,
    StorageError, StorageResult,
};
use std::sync::Mutex;

/// One recorded template call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateNode,
    CreateNodeWith(Properties),
    CreateRelationshipBetween {
        start: NodeId,
        end: NodeId,
        rel_type: String,
        properties: Option<Properties>,
    },
    CreateEntityRelationshipBetween {
        start: Entity,
        end: Entity,
        entity_class: EntityClass,
        rel_type: String,
        allow_duplicates: bool,
    },
    DeleteNode(NodeId),
    DeleteRelationship(RelationshipId),
    DeleteRelationshipBetween {
        start: NodeId,
        end: NodeId,
        rel_type: String,
    },
}

pub struct RecordingTemplate {
    calls: Mutex<Vec<Call>>,
    node_id: i64,
    relationship_id: i64,
    unavailable: bool,
}

impl RecordingTemplate {
    /// Answers node calls with `node_id` and relationship calls with `relationship_id`
    pub fn new(node_id: i64, relationship_id: i64) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            node_id,
            relationship_id,
            unavailable: false,
        }
    }

    /// Records calls, then fails each one as if the store were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(0, 0)
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> StorageResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.unavailable {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "store unavailable",
            )));
        }
        Ok(())
    }

    fn node(&self, properties: Properties) -> Node {
        Node {
            id: NodeId::new(self.node_id),
            properties,
            created_at: Utc::now(),
        }
    }

    fn relationship(&self, start: NodeId, end: NodeId, rel_type: &str) -> Relationship {
        Relationship {
            id: RelationshipId::new(self.relationship_id),
            start,
            end,
            rel_type: rel_type.to_string(),
            properties: Properties::new(),
            created_at: Utc::now(),
        }
    }
}

impl GraphTemplate for RecordingTemplate {
    fn create_node(&self) -> StorageResult<Node> {
        self.record(Call::CreateNode)?;
        Ok(self.node(Properties::new()))
    }

    fn create_node_with(&self, properties: &Properties) -> StorageResult<Node> {
        self.record(Call::CreateNodeWith(properties.clone()))?;
        Ok(self.node(properties.clone()))
    }

    fn create_relationship_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
        properties: Option<&Properties>,
    ) -> StorageResult<Relationship> {
        self.record(Call::CreateRelationshipBetween {
            start,
            end,
            rel_type: rel_type.to_string(),
            properties: properties.cloned(),
        })?;
        Ok(self.relationship(start, end, rel_type))
    }

    fn create_entity_relationship_between(
        &self,
        start: &Entity,
        end: &Entity,
        entity_class: &EntityClass,
        rel_type: &str,
        allow_duplicates: bool,
    ) -> StorageResult<Relationship> {
        self.record(Call::CreateEntityRelationshipBetween {
            start: start.clone(),
            end: end.clone(),
            entity_class: entity_class.clone(),
            rel_type: rel_type.to_string(),
            allow_duplicates,
        })?;
        let start_id = start.node_id.unwrap_or(NodeId::new(self.node_id));
        let end_id = end.node_id.unwrap_or(NodeId::new(self.node_id));
        Ok(self.relationship(start_id, end_id, rel_type))
    }

    fn delete_node(&self, id: NodeId) -> StorageResult<()> {
        self.record(Call::DeleteNode(id))
    }

    fn delete_relationship(&self, id: RelationshipId) -> StorageResult<()> {
        self.record(Call::DeleteRelationship(id))
    }

    fn delete_relationship_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> StorageResult<Option<RelationshipId>> {
        self.record(Call::DeleteRelationshipBetween {
            start,
            end,
            rel_type: rel_type.to_string(),
        })?;
        Ok(Some(RelationshipId::new(self.relationship_id)))
    }
}
