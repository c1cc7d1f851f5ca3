//! Operation codes and the header names producers read and write

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Header selecting the operation to perform
pub const HEADER_OPERATION: &str = "GraphOperation";
/// Header receiving the id of the created or removed node
pub const HEADER_NODE_ID: &str = "GraphNodeId";
/// Header receiving the id of the created or removed relationship
pub const HEADER_RELATIONSHIP_ID: &str = "GraphRelationshipId";

/// Graph operations a message can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    CreateNode,
    CreateRelationship,
    RemoveNode,
    RemoveRelationship,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::CreateNode,
        Operation::CreateRelationship,
        Operation::RemoveNode,
        Operation::RemoveRelationship,
    ];

    /// Wire code of the operation (e.g., "CREATE_NODE")
    pub fn code(&self) -> &'static str {
        match self {
            Self::CreateNode => "CREATE_NODE",
            Self::CreateRelationship => "CREATE_RELATIONSHIP",
            Self::RemoveNode => "REMOVE_NODE",
            Self::RemoveRelationship => "REMOVE_RELATIONSHIP",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a code names no known operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.code() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_parse_back_to_operations() {
        for op in Operation::ALL {
            assert_eq!(op.code().parse::<Operation>(), Ok(op));
        }
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert_eq!(
            "create_node".parse::<Operation>(),
            Err(UnknownOperation("create_node".to_string()))
        );
    }

    #[test]
    fn serde_uses_wire_codes() {
        for op in Operation::ALL {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, op.code());
        }
    }
}
