//! Endpoint configuration: where the graph lives and how producers reach it
//!
//! Endpoints are addressed by URI:
//!
//! - `graph:memory`: a private in-memory store
//! - `graph:embedded:<path>`: a SQLite database file at `<path>`
//!
//! The same URI can come from a YAML file (`uri: graph:embedded:/var/lib/g.db`).

use crate::producer::GraphProducer;
use crate::storage::{OpenStore, SqliteGraph, StorageError};
use crate::template::StoreTemplate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

const SCHEME: &str = "graph";

/// Errors that can occur while configuring an endpoint
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid endpoint URI: {0}")]
    InvalidUri(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open store: {0}")]
    Store(#[from] StorageError),
}

/// Where the endpoint's graph is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Embedded(PathBuf),
}

impl FromStr for StoreLocation {
    type Err = ConfigError;

    fn from_str(uri: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidUri(uri.to_string());

        let rest = uri
            .strip_prefix(SCHEME)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or_else(invalid)?;

        if rest == "memory" {
            return Ok(Self::Memory);
        }
        match rest.strip_prefix("embedded:") {
            Some(path) if !path.is_empty() => Ok(Self::Embedded(PathBuf::from(path))),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "{}:memory", SCHEME),
            Self::Embedded(path) => write!(f, "{}:embedded:{}", SCHEME, path.display()),
        }
    }
}

/// Serialized endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub uri: String,
}

impl EndpointConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Configuration for an embedded store at `path`
    pub fn embedded(path: impl AsRef<Path>) -> Self {
        Self::new(StoreLocation::Embedded(path.as_ref().to_path_buf()).to_string())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn location(&self) -> Result<StoreLocation, ConfigError> {
        self.uri.parse()
    }
}

/// An opened endpoint: a store plus the means to create producers for it.
pub struct GraphEndpoint {
    location: StoreLocation,
    store: Arc<SqliteGraph>,
}

impl GraphEndpoint {
    /// Open the store the configuration points at
    pub fn open(config: &EndpointConfig) -> Result<Self, ConfigError> {
        let location = config.location()?;
        let store = match &location {
            StoreLocation::Memory => SqliteGraph::open_in_memory()?,
            StoreLocation::Embedded(path) => SqliteGraph::open(path)?,
        };
        info!(endpoint = %location, "opened graph store");

        Ok(Self {
            location,
            store: Arc::new(store),
        })
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    pub fn store(&self) -> &Arc<SqliteGraph> {
        &self.store
    }

    /// Create a producer sharing this endpoint's store
    pub fn create_producer(&self) -> GraphProducer<StoreTemplate<SqliteGraph>> {
        GraphProducer::for_endpoint(
            StoreTemplate::new(Arc::clone(&self.store)),
            self.location.clone(),
        )
    }
}
