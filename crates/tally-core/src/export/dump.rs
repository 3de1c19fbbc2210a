//! SQL dump files

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::info;

use super::write_atomic;
use crate::db::Database;
use crate::error::Result;

/// Write the full store as a SQL dump file, one statement per line
///
/// Returns the number of statements written.
pub fn write_sql_dump(db: &Database, path: &Path) -> Result<usize> {
    let mut written = 0usize;
    write_atomic(path, |file| {
        for statement in db.raw_dump()? {
            writeln!(file, "{}", statement?)?;
            written += 1;
        }
        Ok(())
    })?;
    info!(path = %path.display(), statements = written, "SQL dump exported");
    Ok(written)
}

/// Replay a SQL dump file into a new store at `target`
pub fn read_sql_dump(dump_path: &Path, target: &Path) -> Result<Database> {
    let reader = BufReader::new(File::open(dump_path)?);
    let statements = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    Database::restore_dump(target, statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, NewSale};

    #[test]
    fn test_dump_file_round_trip() {
        let db = Database::in_memory().unwrap();
        db.record_sale(&NewSale {
            project: "Kiosk".to_string(),
            tag: None,
            revenue: 250.0,
            date: parse_date("2024-05-01").unwrap(),
        })
        .unwrap();
        db.set_target_revenue(1000.0).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let dump_path = dir.path().join("tally.sql");
        let written = write_sql_dump(&db, &dump_path).unwrap();

        let content = std::fs::read_to_string(&dump_path).unwrap();
        assert_eq!(content.lines().count(), written);
        assert!(content.starts_with("BEGIN TRANSACTION;\n"));
        assert!(content.ends_with("COMMIT;\n"));

        let restored = read_sql_dump(&dump_path, &dir.path().join("copy.db")).unwrap();
        assert_eq!(restored.list_sales().unwrap(), db.list_sales().unwrap());
        assert_eq!(restored.target_revenue().unwrap(), Some(1000.0));
    }

    #[test]
    fn test_missing_dump_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_sql_dump(&dir.path().join("nope.sql"), &dir.path().join("x.db")).is_err());
    }
}
