//! SQL dump and replay
//!
//! A dump is one statement per line: `BEGIN TRANSACTION;`, then for each
//! table in schema order its `CREATE TABLE` statement and one `INSERT` per
//! row in rowid order, then the AUTOINCREMENT counters from `sqlite_sequence`,
//! then `COMMIT;`. Rows are read one table at a time as the iterator reaches
//! it.

use std::collections::VecDeque;
use std::path::Path;

use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::{info, warn};

use super::{Database, Table, SCHEMA};
use crate::error::{Error, Result};

/// Lazy iterator over the statements of a full store dump
pub struct SqlDump {
    conn: Connection,
    tables: std::slice::Iter<'static, Table>,
    pending: VecDeque<String>,
    finished: bool,
}

impl SqlDump {
    fn new(conn: Connection) -> Self {
        Self {
            conn,
            tables: SCHEMA.iter(),
            pending: VecDeque::from([String::from("BEGIN TRANSACTION;")]),
            finished: false,
        }
    }

    fn load_table(&mut self, table: &Table) -> rusqlite::Result<()> {
        self.pending
            .push_back(format!("{};", single_line(table.create_sql)));

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM \"{}\" ORDER BY rowid", table.name))?;
        let columns = stmt.column_count();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let values = (0..columns)
                .map(|i| row.get::<_, Value>(i).map(|v| sql_literal(&v)))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            self.pending.push_back(format!(
                "INSERT INTO \"{}\" VALUES({});",
                table.name,
                values.join(",")
            ));
        }
        Ok(())
    }

    /// Carry the AUTOINCREMENT counters so deleted ids are not reissued
    fn load_sequences(&mut self) -> rusqlite::Result<()> {
        self.pending
            .push_back(String::from("DELETE FROM \"sqlite_sequence\";"));

        let mut stmt = self
            .conn
            .prepare("SELECT name, seq FROM sqlite_sequence ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, Value>(0)?, row.get::<_, Value>(1)?))
        })?;
        for row in rows {
            let (name, seq) = row?;
            self.pending.push_back(format!(
                "INSERT INTO \"sqlite_sequence\" VALUES({},{});",
                sql_literal(&name),
                sql_literal(&seq)
            ));
        }
        Ok(())
    }
}

impl Iterator for SqlDump {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(statement) = self.pending.pop_front() {
                return Some(Ok(statement));
            }
            if self.finished {
                return None;
            }
            match self.tables.next() {
                Some(table) => {
                    if let Err(e) = self.load_table(table) {
                        self.finished = true;
                        return Some(Err(Error::Database(e)));
                    }
                }
                None => {
                    self.finished = true;
                    if let Err(e) = self.load_sequences() {
                        return Some(Err(Error::Database(e)));
                    }
                    self.pending.push_back(String::from("COMMIT;"));
                }
            }
        }
    }
}

/// Collapse a multi-line statement onto one line, dropping `--` comments
fn single_line(sql: &str) -> String {
    sql.lines()
        .map(|line| match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(" )", ")")
}

/// Render a value as an SQL literal that stays on one line
pub(crate) fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => real_literal(*f),
        Value::Text(s) => text_literal(s),
        Value::Blob(b) => format!("X'{}'", hex::encode_upper(b)),
    }
}

/// Plain decimal notation, always with a decimal point
fn real_literal(f: f64) -> String {
    if f.is_infinite() {
        return if f > 0.0 { "9e999" } else { "-9e999" }.to_string();
    }
    let plain = f.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

fn text_literal(s: &str) -> String {
    let quoted = format!("'{}'", s.replace('\'', "''"));
    if !quoted.contains(|c: char| c == '\n' || c == '\r') {
        return quoted;
    }
    quoted
        .replace('\n', "'||char(10)||'")
        .replace('\r', "'||char(13)||'")
}

impl Database {
    /// Stream the full store contents as replayable SQL statements
    ///
    /// The returned iterator owns its own connection.
    pub fn raw_dump(&self) -> Result<SqlDump> {
        Ok(SqlDump::new(self.conn()?))
    }

    /// Build a new store at `path` by replaying a dump
    ///
    /// The target must not already contain tables. Statements run in order;
    /// on failure any open transaction is rolled back and the error returned.
    pub fn restore_dump<I, S>(path: impl AsRef<Path>, statements: I) -> Result<Database>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let existing: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
            [],
            |row| row.get(0),
        )?;
        if existing > 0 {
            return Err(Error::Validation(format!(
                "Refusing to restore into {}: it already contains {} tables",
                path.display(),
                existing
            )));
        }

        let mut replayed = 0usize;
        for statement in statements {
            let statement = statement.as_ref().trim();
            if statement.is_empty() {
                continue;
            }
            if let Err(e) = conn.execute_batch(statement) {
                warn!(error = %e, statement, "Dump replay failed");
                if !conn.is_autocommit() {
                    let _ = conn.execute_batch("ROLLBACK;");
                }
                return Err(Error::Database(e));
            }
            replayed += 1;
        }
        if !conn.is_autocommit() {
            let _ = conn.execute_batch("ROLLBACK;");
            return Err(Error::Validation(
                "Dump ended inside an open transaction".to_string(),
            ));
        }
        drop(conn);

        info!(path = %path.display(), statements = replayed, "Restored dump");
        Database::open(path)
    }
}
