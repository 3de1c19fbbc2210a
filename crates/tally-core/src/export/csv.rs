//! CSV export of ledger tables

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::info;

use super::write_atomic;
use crate::db::Database;
use crate::error::{Error, Result};

/// Tables that can be exported as CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Sales,
    Costs,
    Sga,
    Cashflow,
    Tags,
    Profits,
}

impl ExportTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTable::Sales => "sales",
            ExportTable::Costs => "costs",
            ExportTable::Sga => "sga",
            ExportTable::Cashflow => "cashflow",
            ExportTable::Tags => "tags",
            ExportTable::Profits => "profits",
        }
    }
}

impl FromStr for ExportTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sales" => Ok(ExportTable::Sales),
            "costs" => Ok(ExportTable::Costs),
            "sga" | "sg_a_costs" => Ok(ExportTable::Sga),
            "cashflow" => Ok(ExportTable::Cashflow),
            "tags" => Ok(ExportTable::Tags),
            "profits" | "snapshots" => Ok(ExportTable::Profits),
            other => Err(Error::Validation(format!("Unknown table '{}'", other))),
        }
    }
}

fn write_records<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(records.len())
}

/// Write a table as CSV with a header row; returns the number of data rows
///
/// An empty table writes nothing, not even the header.
pub fn export_table_csv<W: Write>(db: &Database, table: ExportTable, writer: W) -> Result<usize> {
    match table {
        ExportTable::Sales => write_records(writer, &db.list_sales()?),
        ExportTable::Costs => write_records(writer, &db.list_costs()?),
        ExportTable::Sga => write_records(writer, &db.list_sga_costs()?),
        ExportTable::Cashflow => write_records(writer, &db.list_cashflow()?),
        ExportTable::Tags => write_records(writer, &db.list_tags()?),
        ExportTable::Profits => write_records(writer, &db.list_profit_snapshots()?),
    }
}

/// Export a table to a CSV file
pub fn write_table_csv(db: &Database, table: ExportTable, path: &Path) -> Result<usize> {
    let mut rows = 0;
    write_atomic(path, |file| {
        rows = export_table_csv(db, table, &mut *file)?;
        Ok(())
    })?;
    info!(table = table.as_str(), rows, "CSV exported");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_date, NewCashflow, NewSale};

    #[test]
    fn test_sales_csv() {
        let db = Database::in_memory().unwrap();
        db.create_tag("Retail").unwrap();
        db.record_sale(&NewSale {
            project: "Kiosk, north".to_string(),
            tag: Some("Retail".to_string()),
            revenue: 1200.5,
            date: parse_date("2024-01-15").unwrap(),
        })
        .unwrap();
        db.record_sale(&NewSale {
            project: "Web".to_string(),
            tag: None,
            revenue: 80.0,
            date: parse_date("2024-02-01").unwrap(),
        })
        .unwrap();

        let mut out = Vec::new();
        let rows = export_table_csv(&db, ExportTable::Sales, &mut out).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,project,tag,revenue,date");
        assert_eq!(lines[1], "1,\"Kiosk, north\",Retail,1200.5,2024-01-15");
        assert_eq!(lines[2], "2,Web,,80.0,2024-02-01");
    }

    #[test]
    fn test_cashflow_csv_file() {
        let db = Database::in_memory().unwrap();
        db.record_cashflow(&NewCashflow {
            month: "2024-03".to_string(),
            inflow: 10.0,
            outflow: 4.0,
        })
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cashflow.csv");
        assert_eq!(write_table_csv(&db, ExportTable::Cashflow, &path).unwrap(), 1);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,month,inflow,outflow\n"));
    }

    #[test]
    fn test_export_table_parse() {
        assert_eq!("SGA".parse::<ExportTable>().unwrap(), ExportTable::Sga);
        assert!("users".parse::<ExportTable>().is_err());
    }
}
