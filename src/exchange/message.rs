//! Messages: a header bag plus a typed body

use crate::graph::{BasicRelationship, EntityRelationship, NodeId, Properties, RelationshipId};
use crate::operation::Operation;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A header value.
///
/// Untagged so JSON headers keep their plain shape. A string that spells an
/// operation code deserializes as `Operation`; nulls, arrays and objects are
/// carried through as `Json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Bool(bool),
    Long(i64),
    Float(f64),
    Operation(Operation),
    Text(String),
    Json(serde_json::Value),
}

impl HeaderValue {
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Operation> for HeaderValue {
    fn from(op: Operation) -> Self {
        Self::Operation(op)
    }
}

impl From<i64> for HeaderValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for HeaderValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for HeaderValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for HeaderValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

/// Relationship descriptions a body can carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipBody {
    /// Between raw store nodes
    Basic(BasicRelationship),
    /// Between mapped entities
    Entity(EntityRelationship),
}

/// Message body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    #[default]
    Empty,
    Properties(Properties),
    Relationship(RelationshipBody),
    NodeId(NodeId),
    RelationshipId(RelationshipId),
}

impl Body {
    /// Short name of the body shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Properties(_) => "properties",
            Self::Relationship(RelationshipBody::Basic(_)) => "basic relationship",
            Self::Relationship(RelationshipBody::Entity(_)) => "entity relationship",
            Self::NodeId(_) => "node id",
            Self::RelationshipId(_) => "relationship id",
        }
    }
}

impl From<Properties> for Body {
    fn from(props: Properties) -> Self {
        Self::Properties(props)
    }
}

impl From<BasicRelationship> for Body {
    fn from(rel: BasicRelationship) -> Self {
        Self::Relationship(RelationshipBody::Basic(rel))
    }
}

impl From<EntityRelationship> for Body {
    fn from(rel: EntityRelationship) -> Self {
        Self::Relationship(RelationshipBody::Entity(rel))
    }
}

impl From<NodeId> for Body {
    fn from(id: NodeId) -> Self {
        Self::NodeId(id)
    }
}

impl From<RelationshipId> for Body {
    fn from(id: RelationshipId) -> Self {
        Self::RelationshipId(id)
    }
}

/// A message moving through a pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub headers: HashMap<String, HeaderValue>,
    #[serde(default)]
    pub body: Body,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<HeaderValue>) {
        self.headers.insert(name.into(), value.into());
    }

    pub fn remove_header(&mut self, name: &str) -> Option<HeaderValue> {
        self.headers.remove(name)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}
