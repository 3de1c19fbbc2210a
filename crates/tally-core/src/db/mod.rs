//! Database access layer: the single store file, its schema, and the
//! statement primitives every domain module builds on
//!
//! This module is organized by domain:
//! - `sales` - Sales CRUD and revenue roll-ups
//! - `costs` - Direct project costs
//! - `sga` - SG&A overhead
//! - `cashflow` - Monthly inflow/outflow
//! - `tags` - Sales tags and the singleton revenue target
//! - `profits` - Live profit and stored profit snapshots
//! - `users` - User credentials
//! - `dashboard` - Cross-domain overview
//! - `dump` - SQL dump and replay
//!
//! Every call opens its own connection and drops it before returning, so no
//! connection is held between calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Connection, Params, Row, Transaction};
use tempfile::TempDir;
use tracing::{debug, error, info};

use crate::error::{Error, Result};

mod cashflow;
mod costs;
mod dashboard;
mod dump;
mod profits;
mod sales;
mod sga;
mod tags;
mod users;

pub use dashboard::DashboardSummary;
pub use dump::SqlDump;

/// Version of the table set below; bump when adding tables
pub const SCHEMA_VERSION: i64 = 1;

/// One table of the schema
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub create_sql: &'static str,
}

/// All tables in creation (and dump) order
pub const SCHEMA: &[Table] = &[
    Table {
        name: "schema_version",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                version INTEGER NOT NULL
            )"#,
    },
    Table {
        name: "sales",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS sales (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project TEXT NOT NULL,
                tag TEXT,                      -- tag name, not a foreign key
                revenue REAL NOT NULL,
                date TEXT NOT NULL             -- YYYY-MM-DD
            )"#,
    },
    Table {
        name: "costs",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS costs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project TEXT NOT NULL,
                cost REAL NOT NULL,
                date TEXT NOT NULL
            )"#,
    },
    Table {
        name: "sg_a_costs",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS sg_a_costs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                amount REAL NOT NULL,
                date TEXT NOT NULL
            )"#,
    },
    Table {
        name: "cashflow",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS cashflow (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                month TEXT NOT NULL,           -- YYYY-MM
                inflow REAL NOT NULL,
                outflow REAL NOT NULL
            )"#,
    },
    Table {
        name: "tags",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tag_name TEXT NOT NULL
            )"#,
    },
    Table {
        name: "users",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL         -- argon2 PHC string
            )"#,
    },
    Table {
        name: "target_revenue",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS target_revenue (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL
            )"#,
    },
    Table {
        name: "profits",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS profits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                revenue REAL NOT NULL,
                cost REAL NOT NULL,
                sg_a_cost REAL NOT NULL,
                profit REAL NOT NULL,
                date TEXT NOT NULL
            )"#,
    },
];

/// Log a failed statement and wrap the error
fn storage_error(sql: &str, err: rusqlite::Error) -> Error {
    error!(error = %err, statement = sql.trim(), "Storage error");
    Error::Database(err)
}

/// Handle to the store file
#[derive(Debug, Clone)]
pub struct Database {
    /// Path to the database file
    db_path: PathBuf,
    /// Owning directory of a throwaway store, removed with the last clone
    _temp_dir: Option<Arc<TempDir>>,
}

impl Database {
    /// Open (creating if needed) the store at `path` and bring its schema up to date
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Self {
            db_path: path.as_ref().to_path_buf(),
            _temp_dir: None,
        };
        db.initialize()?;
        Ok(db)
    }

    /// Create a throwaway database file (for testing)
    ///
    /// The file lives in its own temporary directory, deleted once the last
    /// clone of the handle is dropped.
    pub fn in_memory() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("tally_test_").tempdir()?;
        let db = Self {
            db_path: dir.path().join("tally.db"),
            _temp_dir: Some(Arc::new(dir)),
        };
        db.initialize()?;
        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Open a fresh connection; dropped (and closed) by the caller
    pub fn conn(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Create any missing tables and record the schema version
    ///
    /// Idempotent. Tables are only ever added, never dropped or altered.
    pub fn initialize(&self) -> Result<()> {
        let current = self.transaction(|tx| {
            tx.execute_batch(SCHEMA[0].create_sql)?;
            let current: i64 = tx.query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_version",
                [],
                |row| row.get(0),
            )?;

            if current < SCHEMA_VERSION {
                for table in SCHEMA {
                    tx.execute_batch(table.create_sql)?;
                }
                tx.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    [SCHEMA_VERSION],
                )?;
            }
            Ok(current)
        })?;

        if current < SCHEMA_VERSION {
            info!(
                path = %self.db_path.display(),
                from = current,
                to = SCHEMA_VERSION,
                "Database schema initialized"
            );
        }
        Ok(())
    }

    /// Current schema version recorded in the store
    pub fn schema_version(&self) -> Result<i64> {
        self.query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version", [])
    }

    /// Run one mutating statement; returns the number of rows changed
    ///
    /// The statement commits on its own. On failure nothing is written.
    pub fn execute<P: Params>(&self, sql: &str, params: P) -> Result<usize> {
        debug!(statement = sql.trim(), "execute");
        let conn = self.conn()?;
        conn.execute(sql, params).map_err(|e| storage_error(sql, e))
    }

    /// Run one read statement and return every row as a tuple of raw values
    ///
    /// Rows come back in storage order; no match yields an empty vector.
    pub fn query<P: Params>(&self, sql: &str, params: P) -> Result<Vec<Vec<Value>>> {
        debug!(statement = sql.trim(), "query");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(|e| storage_error(sql, e))?;
        let columns = stmt.column_count();
        let rows = stmt
            .query_map(params, |row| {
                (0..columns)
                    .map(|i| row.get::<_, Value>(i))
                    .collect::<rusqlite::Result<Vec<Value>>>()
            })
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<_>>>())
            .map_err(|e| storage_error(sql, e))?;
        Ok(rows)
    }

    /// Run an insert and return the new row id
    pub(crate) fn insert<P: Params>(&self, sql: &str, params: P) -> Result<i64> {
        debug!(statement = sql.trim(), "insert");
        let conn = self.conn()?;
        conn.execute(sql, params).map_err(|e| storage_error(sql, e))?;
        Ok(conn.last_insert_rowid())
    }

    /// Run a read statement, mapping each row
    pub(crate) fn query_map<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        debug!(statement = sql.trim(), "query");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(|e| storage_error(sql, e))?;
        let rows = stmt
            .query_map(params, f)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<T>>>())
            .map_err(|e| storage_error(sql, e))?;
        Ok(rows)
    }

    /// Run a read statement expected to return at most one row
    pub(crate) fn query_opt<T, P, F>(&self, sql: &str, params: P, f: F) -> Result<Option<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        Ok(self.query_map(sql, params, f)?.into_iter().next())
    }

    /// Run a read statement returning a single value
    pub(crate) fn query_scalar<T, P>(&self, sql: &str, params: P) -> Result<T>
    where
        T: rusqlite::types::FromSql,
        P: Params,
    {
        debug!(statement = sql.trim(), "query");
        let conn = self.conn()?;
        conn.query_row(sql, params, |row| row.get(0))
            .map_err(|e| storage_error(sql, e))
    }

    /// Sum a numeric column, treating an empty table as 0
    pub(crate) fn column_total(&self, table: &str, column: &str) -> Result<f64> {
        self.query_scalar(
            &format!("SELECT COALESCE(SUM({}), 0.0) FROM {}", column, table),
            [],
        )
    }

    /// Sum a numeric column per `YYYY-MM` month of a date column, oldest first
    pub(crate) fn column_by_month(
        &self,
        table: &str,
        date_column: &str,
        column: &str,
    ) -> Result<Vec<crate::aggregate::MonthlyTotal>> {
        let sql = format!(
            "SELECT substr({date}, 1, 7) AS month, SUM({col}) FROM {table} GROUP BY month ORDER BY month",
            date = date_column,
            col = column,
            table = table,
        );
        self.query_map(&sql, [], |row| {
            Ok(crate::aggregate::MonthlyTotal {
                month: row.get(0)?,
                amount: row.get(1)?,
            })
        })
    }

    /// Sum a numeric column per label and attach shares of the grand total
    pub(crate) fn column_by_label(
        &self,
        table: &str,
        label_column: &str,
        column: &str,
    ) -> Result<Vec<crate::aggregate::GroupTotal>> {
        let sql = format!(
            "SELECT {label}, {col} FROM {table} ORDER BY id",
            label = label_column,
            col = column,
            table = table,
        );
        let rows: Vec<(Option<String>, f64)> =
            self.query_map(&sql, [], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(crate::aggregate::group_rollup(rows))
    }

    /// Count rows in a table
    pub(crate) fn count_rows(&self, table: &str) -> Result<i64> {
        self.query_scalar(&format!("SELECT COUNT(*) FROM {}", table), [])
    }

    /// Run several statements atomically
    pub(crate) fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                // Dropping the transaction rolls it back
                error!(error = %e, "Transaction failed, rolled back");
                Err(Error::Database(e))
            }
        }
    }
}
