//! Chat history storage
//!
//! A SQLite database holding the `messages` table shown by the chat console
//! and a small `settings` key/value table used for dashboard-only state such
//! as the GPIO pin layout.
//!
//! The store is opened once at startup and handed to the HTTP layer. After
//! [`MessageStore::close`] every call fails with
//! [`AdminError::StoreUnavailable`] instead of silently returning nothing.

use crate::error::{AdminError, Result};
use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod types;
pub use types::{ChatMessage, Role};

/// SQLite-backed message store
pub struct MessageStore {
    db_path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl MessageStore {
    /// Open (or create) the store at `db_path`
    ///
    /// Parent directories are created as needed and the schema is applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use maruadmin::history::{MessageStore, Role};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = MessageStore::open(dir.path().join("admin.db")).unwrap();
    /// store.append(Role::User, "hello").unwrap();
    /// assert_eq!(store.recent(10).unwrap().len(), 1);
    /// ```
    pub fn open<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| AdminError::Storage(e.to_string()))?;
        }

        let conn = Connection::open(&db_path)
            .context("Failed to open database")
            .map_err(|e| AdminError::Storage(e.to_string()))?;
        Self::init(&conn)?;

        tracing::debug!(path = %db_path.display(), "history store opened");

        Ok(Self {
            db_path,
            conn: Mutex::new(Some(conn)),
        })
    }

    fn init(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("Failed to create tables")
        .map_err(|e| AdminError::Storage(e.to_string()))?;
        Ok(())
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let guard = self
            .conn
            .lock()
            .map_err(|_| AdminError::StoreUnavailable("history store lock poisoned".into()))?;
        let conn = guard
            .as_ref()
            .ok_or_else(|| AdminError::StoreUnavailable("history store is closed".into()))?;
        f(conn)
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Whether [`close`](Self::close) has not been called yet
    pub fn is_open(&self) -> bool {
        self.conn.lock().map(|c| c.is_some()).unwrap_or(false)
    }

    /// Append a message and return the stored row
    pub fn append(&self, role: Role, content: &str) -> Result<ChatMessage> {
        let timestamp = Utc::now();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (role, content, timestamp) VALUES (?1, ?2, ?3)",
                params![role.as_str(), content, timestamp.to_rfc3339()],
            )
            .context("Failed to insert message")
            .map_err(|e| AdminError::Storage(e.to_string()))?;

            Ok(ChatMessage {
                id: conn.last_insert_rowid(),
                role,
                content: content.to_string(),
                timestamp,
            })
        })
    }

    /// Up to `limit` most recent messages, newest first
    pub fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, role, content, timestamp
                    FROM messages
                    ORDER BY id DESC
                    LIMIT ?1",
                )
                .context("Failed to prepare statement")
                .map_err(|e| AdminError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(params![limit], |row| {
                    let id: i64 = row.get(0)?;
                    let role: String = row.get(1)?;
                    let content: String = row.get(2)?;
                    let timestamp: Option<String> = row.get(3)?;
                    Ok((id, role, content, timestamp))
                })
                .context("Failed to query messages")
                .map_err(|e| AdminError::Storage(e.to_string()))?;

            let mut messages = Vec::new();
            for row in rows {
                let (id, role, content, timestamp) =
                    row.map_err(|e| AdminError::Storage(e.to_string()))?;
                let role = role.parse::<Role>().map_err(AdminError::Storage)?;
                messages.push(ChatMessage {
                    id,
                    role,
                    content,
                    timestamp: parse_timestamp(timestamp.as_deref()),
                });
            }
            Ok(messages)
        })
    }

    /// Delete every message, returning how many rows were removed
    pub fn clear(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let removed = conn
                .execute("DELETE FROM messages", [])
                .context("Failed to clear messages")
                .map_err(|e| AdminError::Storage(e.to_string()))?;
            Ok(removed)
        })
    }

    /// Read a dashboard setting
    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query setting")
            .map_err(|e| AdminError::Storage(e.to_string()).into())
        })
    }

    /// Insert or replace a dashboard setting
    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .context("Failed to store setting")
            .map_err(|e| AdminError::Storage(e.to_string()))?;
            Ok(())
        })
    }

    /// Release the database connection
    ///
    /// Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut guard = self
            .conn
            .lock()
            .map_err(|_| AdminError::StoreUnavailable("history store lock poisoned".into()))?;
        if let Some(conn) = guard.take() {
            conn.close()
                .map_err(|(_, e)| AdminError::Storage(format!("Failed to close database: {}", e)))?;
            tracing::debug!(path = %self.db_path.display(), "history store closed");
        }
        Ok(())
    }
}

/// Parse a stored timestamp.
///
/// Rows written by this crate are RFC 3339; rows created by the SQLite
/// column default use `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw else {
        return Utc::now();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    tracing::warn!(timestamp = raw, "unparseable message timestamp");
    Utc::now()
}
