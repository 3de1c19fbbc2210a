//! Export functionality
//!
//! Supports:
//! - Full SQL dump of the store, and replay of a dump into a new store
//! - Presentation decks (JSON documents of chart data series)
//! - CSV export of any ledger table
//!
//! File exports go to a temporary file beside the target and are renamed
//! into place once complete.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};

pub mod csv;
pub mod deck;
pub mod dump;

pub use self::csv::{export_table_csv, write_table_csv, ExportTable};
pub use deck::{build_deck, write_deck, Chart, ChartKind, Deck, DeckKind, Point, Slide};
pub use dump::{read_sql_dump, write_sql_dump};

/// Write a file by filling a temp file in the same directory and renaming it
pub fn write_atomic<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    fill(&mut tmp)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    info!(path = %path.display(), "Export written");
    Ok(())
}
