//! Embedded graph storage
//!
//! Stores implement the `GraphDatabase` trait. The bundled backend is
//! `SqliteGraph`, a single-file SQLite database.

mod sqlite;
mod traits;

pub use sqlite::SqliteGraph;
pub use traits::{Endpoint, GraphDatabase, OpenStore, StorageError, StorageResult};
