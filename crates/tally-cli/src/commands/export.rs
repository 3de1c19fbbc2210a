//! Export and import command implementations

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::db::Database;
use tally_core::export::{self, DeckKind, ExportTable};

pub fn cmd_export_sql(db: &Database, output: &Path) -> Result<()> {
    let statements = export::write_sql_dump(db, output)
        .with_context(|| format!("Failed to write dump to {}", output.display()))?;
    println!(
        "✅ Exported {} statements to {}",
        statements,
        output.display()
    );
    Ok(())
}

pub fn cmd_export_deck(db: &Database, kind: &str, output: &Path) -> Result<()> {
    let kind: DeckKind = kind.parse()?;
    let deck = export::write_deck(db, kind, output)
        .with_context(|| format!("Failed to write deck to {}", output.display()))?;
    println!(
        "✅ Exported '{}' deck ({} slides) to {}",
        deck.title,
        deck.slides.len(),
        output.display()
    );
    Ok(())
}

pub fn cmd_export_csv(db: &Database, table: &str, output: Option<&Path>) -> Result<()> {
    let table: ExportTable = table.parse()?;
    match output {
        Some(path) => {
            let rows = export::write_table_csv(db, table, path)
                .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
            println!(
                "✅ Exported {} {} rows to {}",
                rows,
                table.as_str(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            export::export_table_csv(db, table, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

pub fn cmd_import_sql(file: &Path, db_path: &Path) -> Result<()> {
    println!("📥 Restoring {} into {}...", file.display(), db_path.display());
    let db = export::read_sql_dump(file, db_path)
        .with_context(|| format!("Failed to restore {}", file.display()))?;

    let stats = db.dashboard_summary()?;
    println!("✅ Restore complete");
    println!("   Sales:     {}", stats.sales_count);
    println!("   Costs:     {}", stats.cost_count);
    println!("   SG&A:      {}", stats.sga_count);
    println!("   Cashflow:  {}", stats.cashflow_count);
    println!("   Users:     {}", db.list_users()?.len());
    Ok(())
}
