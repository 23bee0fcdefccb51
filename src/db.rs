//! Database connection and statement execution.
//!
//! Supports multiple backends:
//! - Local SQLite file: `path/to/db.sqlite` or `file:path` or `sqlite://path`
//! - In-memory: `:memory:`
//! - Remote Turso: `libsql://...` or `https://...` (requires TURSO_AUTH_TOKEN env var)
//!
//! A single connection is opened at startup and shared by every request.
//! Access is serialized through an async mutex, so each call below runs its
//! statements without interleaving with other requests.

use std::sync::Arc;

use libsql::params::IntoParams;
use libsql::{Builder, Connection, Database, Row};
use tokio::sync::Mutex;

/// Schema script applied by [`Handle::init_schema`].
pub const SCHEMA: &str = include_str!("schema.sql");

/// Decode a domain type from a result row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> crate::Result<Self>;
}

struct Inner {
    // Kept alive for as long as the connection is in use.
    _db: Database,
    conn: Mutex<Connection>,
}

/// Shared handle to the service database.
#[derive(Clone)]
pub struct Handle {
    inner: Arc<Inner>,
}

/// Connect to the database.
///
/// # URL formats
/// - Local file: `mydata.db`, `file:path/to/db.sqlite`, `sqlite://path`
/// - In-memory: `:memory:`
/// - Remote Turso: `libsql://your-db.turso.io` (requires `TURSO_AUTH_TOKEN` env var)
pub async fn connect(url: &str) -> crate::Result<Handle> {
    let db = if url.starts_with("libsql://") || url.starts_with("https://") {
        let token = std::env::var("TURSO_AUTH_TOKEN").map_err(|_| {
            crate::Error::Config("TURSO_AUTH_TOKEN not set for remote database".into())
        })?;
        Builder::new_remote(url.to_string(), token).build().await?
    } else if url == ":memory:" {
        Builder::new_local(":memory:").build().await?
    } else {
        // Local file - strip sqlite:// or file: prefix if present
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("file:"))
            .unwrap_or(url);
        Builder::new_local(path).build().await?
    };

    let conn = db.connect()?;
    tracing::debug!("Connected to database {url}");

    Ok(Handle {
        inner: Arc::new(Inner {
            _db: db,
            conn: Mutex::new(conn),
        }),
    })
}

impl Handle {
    /// Run the schema script. Safe to repeat: every table is created with
    /// `IF NOT EXISTS`.
    pub async fn init_schema(&self) -> crate::Result<()> {
        let conn = self.inner.conn.lock().await;
        conn.execute_batch(SCHEMA).await?;
        tracing::info!("Database schema initialized");
        Ok(())
    }

    /// Execute a single statement and return the number of affected rows.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> crate::Result<u64> {
        let conn = self.inner.conn.lock().await;
        Ok(conn.execute(sql, params).await?)
    }

    /// Execute an `INSERT` and return the rowid it assigned.
    pub async fn insert(&self, sql: &str, params: impl IntoParams) -> crate::Result<i64> {
        let conn = self.inner.conn.lock().await;
        conn.execute(sql, params).await?;
        Ok(conn.last_insert_rowid())
    }

    /// Fetch every row of a query.
    pub async fn fetch_all<T: FromRow>(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> crate::Result<Vec<T>> {
        let conn = self.inner.conn.lock().await;
        let mut rows = conn.query(sql, params).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(T::from_row(&row)?);
        }
        Ok(out)
    }

    /// Fetch the first row of a query, if any.
    pub async fn fetch_optional<T: FromRow>(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> crate::Result<Option<T>> {
        let conn = self.inner.conn.lock().await;
        let mut rows = conn.query(sql, params).await?;
        match rows.next().await? {
            Some(row) => Ok(Some(T::from_row(&row)?)),
            None => Ok(None),
        }
    }
}

// Re-exported so handlers can bind parameters without naming libsql
pub use libsql::params;
