//! SQLite storage backend

use super::traits::{Endpoint, GraphDatabase, OpenStore, StorageError, StorageResult};
use crate::graph::{Node, NodeId, Properties, Relationship, RelationshipId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;

/// Raw relationship columns: (id, start_id, end_id, rel_type, properties_json, created_at)
type RelationshipRow = (i64, i64, i64, String, String, String);

const RELATIONSHIP_COLUMNS: &str =
    "id, start_id, end_id, rel_type, properties_json, created_at";

/// SQLite-backed embedded graph
///
/// Uses a single SQLite database file with tables for nodes and
/// relationships. Thread-safe via internal mutex on the connection;
/// multi-statement writes run in a transaction while the mutex is held.
pub struct SqliteGraph {
    conn: Mutex<Connection>,
}

impl SqliteGraph {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        // AUTOINCREMENT keeps ids of deleted rows from being handed out again.
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS nodes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                properties_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS relationships (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                start_id INTEGER NOT NULL,
                end_id INTEGER NOT NULL,
                rel_type TEXT NOT NULL,
                properties_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (start_id) REFERENCES nodes(id),
                FOREIGN KEY (end_id) REFERENCES nodes(id)
            );

            CREATE INDEX IF NOT EXISTS idx_relationships_start
                ON relationships(start_id, rel_type);
            CREATE INDEX IF NOT EXISTS idx_relationships_end
                ON relationships(end_id);
            "#,
        )?;
        Ok(())
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn parse_timestamp(raw: &str) -> StorageResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::DateParse(e.to_string()))
    }

    fn row_to_node(id: i64, properties_json: String, created_at: String) -> StorageResult<Node> {
        Ok(Node {
            id: NodeId::new(id),
            properties: serde_json::from_str(&properties_json)?,
            created_at: Self::parse_timestamp(&created_at)?,
        })
    }

    fn read_relationship_row(row: &Row<'_>) -> rusqlite::Result<RelationshipRow> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn row_to_relationship(row: RelationshipRow) -> StorageResult<Relationship> {
        let (id, start_id, end_id, rel_type, properties_json, created_at) = row;
        Ok(Relationship {
            id: RelationshipId::new(id),
            start: NodeId::new(start_id),
            end: NodeId::new(end_id),
            rel_type,
            properties: serde_json::from_str(&properties_json)?,
            created_at: Self::parse_timestamp(&created_at)?,
        })
    }

    // === Statement helpers (caller holds the connection lock) ===

    fn node_exists(conn: &Connection, id: NodeId) -> StorageResult<bool> {
        let exists: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM nodes WHERE id = ?1",
            params![id.as_i64()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn insert_node(conn: &Connection, properties: &Properties) -> StorageResult<Node> {
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO nodes (properties_json, created_at) VALUES (?1, ?2)",
            params![serde_json::to_string(properties)?, created_at.to_rfc3339()],
        )?;

        Ok(Node {
            id: NodeId::new(conn.last_insert_rowid()),
            properties: properties.clone(),
            created_at,
        })
    }

    fn insert_relationship(
        conn: &Connection,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
        properties: &Properties,
    ) -> StorageResult<Relationship> {
        let created_at = Utc::now();
        conn.execute(
            r#"
            INSERT INTO relationships (start_id, end_id, rel_type, properties_json, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                start.as_i64(),
                end.as_i64(),
                rel_type,
                serde_json::to_string(properties)?,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Relationship {
            id: RelationshipId::new(conn.last_insert_rowid()),
            start,
            end,
            rel_type: rel_type.to_string(),
            properties: properties.clone(),
            created_at,
        })
    }

    fn select_between(
        conn: &Connection,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> StorageResult<Vec<Relationship>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM relationships \
             WHERE start_id = ?1 AND end_id = ?2 AND rel_type = ?3 ORDER BY id",
            RELATIONSHIP_COLUMNS
        ))?;

        let rows: Vec<RelationshipRow> = stmt
            .query_map(
                params![start.as_i64(), end.as_i64(), rel_type],
                Self::read_relationship_row,
            )?
            .collect::<Result<_, _>>()?;

        rows.into_iter().map(Self::row_to_relationship).collect()
    }

    fn require_existing(conn: &Connection, endpoint: &Endpoint) -> StorageResult<()> {
        if let Endpoint::Existing(id) = endpoint {
            if !Self::node_exists(conn, *id)? {
                return Err(StorageError::NodeNotFound(*id));
            }
        }
        Ok(())
    }

    fn resolve(conn: &Connection, endpoint: &Endpoint) -> StorageResult<NodeId> {
        match endpoint {
            Endpoint::Existing(id) => Ok(*id),
            Endpoint::New(properties) => Ok(Self::insert_node(conn, properties)?.id),
        }
    }
}

impl OpenStore for SqliteGraph {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl GraphDatabase for SqliteGraph {
    // === Node Operations ===

    fn create_node(&self, properties: &Properties) -> StorageResult<Node> {
        let conn = self.conn.lock().unwrap();
        Self::insert_node(&conn, properties)
    }

    fn load_node(&self, id: NodeId) -> StorageResult<Option<Node>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT id, properties_json, created_at FROM nodes WHERE id = ?1",
                params![id.as_i64()],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            )
            .optional()?;

        row.map(|(id, props, created)| Self::row_to_node(id, props, created))
            .transpose()
    }

    fn delete_node(&self, id: NodeId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let attached: i64 = conn.query_row(
            "SELECT COUNT(*) FROM relationships WHERE start_id = ?1 OR end_id = ?1",
            params![id.as_i64()],
            |row| row.get(0),
        )?;
        if attached > 0 {
            return Err(StorageError::NodeHasRelationships(id));
        }

        let deleted = conn.execute("DELETE FROM nodes WHERE id = ?1", params![id.as_i64()])?;
        Ok(deleted > 0)
    }

    fn node_count(&self) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // === Relationship Operations ===

    fn create_relationship(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
        properties: &Properties,
    ) -> StorageResult<Relationship> {
        let conn = self.conn.lock().unwrap();
        for endpoint in [start, end] {
            if !Self::node_exists(&conn, endpoint)? {
                return Err(StorageError::NodeNotFound(endpoint));
            }
        }
        Self::insert_relationship(&conn, start, end, rel_type, properties)
    }

    fn load_relationship(&self, id: RelationshipId) -> StorageResult<Option<Relationship>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<RelationshipRow> = conn
            .query_row(
                &format!("SELECT {} FROM relationships WHERE id = ?1", RELATIONSHIP_COLUMNS),
                params![id.as_i64()],
                Self::read_relationship_row,
            )
            .optional()?;

        row.map(Self::row_to_relationship).transpose()
    }

    fn delete_relationship(&self, id: RelationshipId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM relationships WHERE id = ?1",
            params![id.as_i64()],
        )?;
        Ok(deleted > 0)
    }

    fn relationships_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> StorageResult<Vec<Relationship>> {
        let conn = self.conn.lock().unwrap();
        Self::select_between(&conn, start, end, rel_type)
    }

    fn link(
        &self,
        start: &Endpoint,
        end: &Endpoint,
        rel_type: &str,
        properties: &Properties,
        reuse_existing: bool,
    ) -> StorageResult<Relationship> {
        let mut conn = self.conn.lock().unwrap();
        // Dropping the transaction without commit rolls back any new nodes.
        let tx = conn.transaction()?;

        Self::require_existing(&tx, start)?;
        Self::require_existing(&tx, end)?;

        if reuse_existing {
            if let (Endpoint::Existing(s), Endpoint::Existing(e)) = (start, end) {
                if let Some(rel) = Self::select_between(&tx, *s, *e, rel_type)?.into_iter().next() {
                    return Ok(rel);
                }
            }
        }

        let start_id = Self::resolve(&tx, start)?;
        let end_id = Self::resolve(&tx, end)?;
        let rel = Self::insert_relationship(&tx, start_id, end_id, rel_type, properties)?;
        tx.commit()?;
        Ok(rel)
    }

    fn delete_relationships_between(
        &self,
        start: NodeId,
        end: NodeId,
        rel_type: &str,
    ) -> StorageResult<Vec<RelationshipId>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let ids: Vec<RelationshipId> = Self::select_between(&tx, start, end, rel_type)?
            .into_iter()
            .map(|r| r.id)
            .collect();
        for id in &ids {
            tx.execute(
                "DELETE FROM relationships WHERE id = ?1",
                params![id.as_i64()],
            )?;
        }
        tx.commit()?;
        Ok(ids)
    }

    fn relationship_count(&self) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM relationships", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
