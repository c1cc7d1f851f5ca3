//! Relationships and the relationship descriptions carried in message bodies

use super::entity::{Entity, EntityClass};
use super::node::{NodeId, Properties};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier for a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(i64);

impl RelationshipId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RelationshipId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed, typed relationship as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub start: NodeId,
    pub end: NodeId,
    /// Relationship type label (e.g., "friendswith")
    pub rel_type: String,
    pub properties: Properties,
    pub created_at: DateTime<Utc>,
}

/// A relationship between two raw store nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicRelationship {
    start: NodeId,
    end: NodeId,
    rel_type: String,
}

impl BasicRelationship {
    pub fn new(start: NodeId, end: NodeId, rel_type: impl Into<String>) -> Self {
        Self {
            start,
            end,
            rel_type: rel_type.into(),
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }
}

/// A relationship between two mapped entities.
///
/// `entity_class` names the relationship entity type recorded on the created
/// relationship. With `allow_duplicates` unset, an existing relationship of
/// the same type between the two entities is reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRelationship {
    start: Entity,
    end: Entity,
    entity_class: EntityClass,
    rel_type: String,
    allow_duplicates: bool,
}

impl EntityRelationship {
    pub fn new(
        start: Entity,
        end: Entity,
        entity_class: EntityClass,
        rel_type: impl Into<String>,
        allow_duplicates: bool,
    ) -> Self {
        Self {
            start,
            end,
            entity_class,
            rel_type: rel_type.into(),
            allow_duplicates,
        }
    }

    pub fn start(&self) -> &Entity {
        &self.start
    }

    pub fn end(&self) -> &Entity {
        &self.end
    }

    pub fn entity_class(&self) -> &EntityClass {
        &self.entity_class
    }

    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }
}
