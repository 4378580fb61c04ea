//! SQLite storage backend for topicmod

use super::traits::{AssociationFilter, GraphStore, OpenStore, StorageError, StorageResult};
use crate::graph::{Association, AssociationId, ContentDocument, NodeId, NodeKind, Role, Tag};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Raw association columns, in `ASSOCIATION_COLUMNS` order
type AssociationRow = (String, String, String, String, String, String, String);

const ASSOCIATION_COLUMNS: &str =
    "id, role, source_id, source_kind, target_id, target_kind, created_at";

/// SQLite-backed graph store
///
/// Uses a single SQLite database file with tables for tags, documents and
/// associations. Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Tags table; counters kept as one JSON object
            CREATE TABLE IF NOT EXISTS tags (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                counts_json TEXT NOT NULL
            );

            -- Documents table
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                body TEXT NOT NULL
            );

            -- Associations table (mirrored pairs are two rows)
            CREATE TABLE IF NOT EXISTS associations (
                id TEXT PRIMARY KEY,
                role TEXT NOT NULL,
                source_id TEXT NOT NULL,
                source_kind TEXT NOT NULL,
                target_id TEXT NOT NULL,
                target_kind TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Lookups by anchor: "who is tagged with X", "who follows X"
            CREATE INDEX IF NOT EXISTS idx_associations_target
                ON associations(role, target_id);
            CREATE INDEX IF NOT EXISTS idx_associations_source
                ON associations(role, source_id);

            -- Enable WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Deserialize an association from database columns
    fn row_to_association(row: AssociationRow) -> StorageResult<Association> {
        use chrono::DateTime;

        let (id, role, source_id, source_kind, target_id, target_kind, created_at) = row;
        Ok(Association {
            id: AssociationId::parse(&id)
                .map_err(|e| StorageError::Corrupt(format!("association id '{}': {}", id, e)))?,
            role: Role::parse(&role)
                .ok_or_else(|| StorageError::Corrupt(format!("unknown role '{}'", role)))?,
            source_id: NodeId::from_string(source_id),
            source_kind: Self::parse_kind(&source_kind)?,
            target_id: NodeId::from_string(target_id),
            target_kind: Self::parse_kind(&target_kind)?,
            timestamp: DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StorageError::DateParse(e.to_string()))?
                .with_timezone(&chrono::Utc),
        })
    }

    fn parse_kind(kind: &str) -> StorageResult<NodeKind> {
        NodeKind::parse(kind).ok_or_else(|| StorageError::Corrupt(format!("unknown node kind '{}'", kind)))
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl GraphStore for SqliteStore {
    // === Tag Operations ===

    fn get_tag(&self, id: &NodeId) -> StorageResult<Option<Tag>> {
        let conn = self.conn()?;
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT title, counts_json FROM tags WHERE id = ?1",
                params![id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((title, counts_json)) => Ok(Some(Tag {
                id: id.clone(),
                title,
                counts: serde_json::from_str(&counts_json)?,
            })),
            None => Ok(None),
        }
    }

    fn save_tag(&self, tag: &Tag) -> StorageResult<()> {
        let conn = self.conn()?;
        let counts_json = serde_json::to_string(&tag.counts)?;

        conn.execute(
            r#"
            INSERT INTO tags (id, title, counts_json)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                counts_json = excluded.counts_json
            "#,
            params![tag.id.as_str(), tag.title, counts_json],
        )?;

        Ok(())
    }

    // === Document Operations ===

    fn get_document(&self, id: &NodeId) -> StorageResult<Option<ContentDocument>> {
        let conn = self.conn()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(body.map(|body| ContentDocument {
            id: id.clone(),
            body,
        }))
    }

    fn save_document(&self, document: &ContentDocument) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO documents (id, body)
            VALUES (?1, ?2)
            ON CONFLICT(id) DO UPDATE SET body = excluded.body
            "#,
            params![document.id.as_str(), document.body],
        )?;
        Ok(())
    }

    fn delete_document(&self, id: &NodeId) -> StorageResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM documents WHERE id = ?1", params![id.as_str()])?;
        Ok(rows > 0)
    }

    // === Association Operations ===

    fn find_associations(&self, filter: &AssociationFilter) -> StorageResult<Vec<Association>> {
        let conn = self.conn()?;

        let mut sql = format!("SELECT {} FROM associations WHERE 1 = 1", ASSOCIATION_COLUMNS);
        let mut params_vec: Vec<String> = Vec::new();

        if let Some(role) = filter.role {
            sql.push_str(" AND role = ?");
            params_vec.push(role.as_str().to_string());
        }
        if let Some(ref source_id) = filter.source_id {
            sql.push_str(" AND source_id = ?");
            params_vec.push(source_id.as_str().to_string());
        }
        if let Some(source_kind) = filter.source_kind {
            sql.push_str(" AND source_kind = ?");
            params_vec.push(source_kind.as_str().to_string());
        }
        if let Some(ref target_id) = filter.target_id {
            sql.push_str(" AND target_id = ?");
            params_vec.push(target_id.as_str().to_string());
        }
        if let Some(target_kind) = filter.target_kind {
            sql.push_str(" AND target_kind = ?");
            params_vec.push(target_kind.as_str().to_string());
        }
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params_vec.iter()), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut associations = Vec::new();
        for row in rows {
            associations.push(Self::row_to_association(row?)?);
        }

        Ok(associations)
    }

    fn create_association(&self, association: &Association) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO associations ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                ASSOCIATION_COLUMNS
            ),
            params![
                association.id.to_string(),
                association.role.as_str(),
                association.source_id.as_str(),
                association.source_kind.as_str(),
                association.target_id.as_str(),
                association.target_kind.as_str(),
                association.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn remove_association(&self, association: &Association) -> StorageResult<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            r#"
            DELETE FROM associations
            WHERE role = ?1
              AND source_id = ?2 AND source_kind = ?3
              AND target_id = ?4 AND target_kind = ?5
            "#,
            params![
                association.role.as_str(),
                association.source_id.as_str(),
                association.source_kind.as_str(),
                association.target_id.as_str(),
                association.target_kind.as_str(),
            ],
        )?;
        Ok(rows > 0)
    }
}
