//! Mapped entities: domain objects persisted as nodes

use super::node::{NodeId, Properties, PropertyValue};
use serde::{Deserialize, Serialize};

/// Property under which an entity or relationship entity records its class.
pub const TYPE_PROPERTY: &str = "__type__";

/// Descriptor of a mapped entity type (e.g., "Person", "Friendship")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityClass(String);

impl EntityClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A mapped domain object.
///
/// An entity without a `node_id` has not been persisted yet; the template
/// stores it as a new node when it takes part in a relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub class: EntityClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    #[serde(default)]
    pub properties: Properties,
}

impl Entity {
    /// A new, not yet persisted entity
    pub fn new(class: EntityClass) -> Self {
        Self {
            class,
            node_id: None,
            properties: Properties::new(),
        }
    }

    /// An entity already backed by a stored node
    pub fn attached(class: EntityClass, node_id: NodeId) -> Self {
        Self {
            class,
            node_id: Some(node_id),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Properties to store on the backing node, including the class marker.
    pub fn node_properties(&self) -> Properties {
        let mut props = self.properties.clone();
        props.insert(
            TYPE_PROPERTY.to_string(),
            PropertyValue::String(self.class.name().to_string()),
        );
        props
    }
}
