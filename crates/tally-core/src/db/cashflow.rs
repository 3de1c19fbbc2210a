//! Cashflow operations

use rusqlite::{params, Row};

use super::Database;
use crate::aggregate::{CashflowSummary, MonthlyCashflow};
use crate::error::{Error, Result};
use crate::models::{CashflowEntry, NewCashflow};

fn cashflow_from_row(row: &Row<'_>) -> rusqlite::Result<CashflowEntry> {
    Ok(CashflowEntry {
        id: row.get(0)?,
        month: row.get(1)?,
        inflow: row.get(2)?,
        outflow: row.get(3)?,
    })
}

impl Database {
    /// Record a month's inflow and outflow, returning the new id
    ///
    /// Several entries for the same month are allowed and summed by the roll-ups.
    pub fn record_cashflow(&self, entry: &NewCashflow) -> Result<i64> {
        let month = entry.validate()?;
        self.insert(
            "INSERT INTO cashflow (month, inflow, outflow) VALUES (?1, ?2, ?3)",
            params![month, entry.inflow, entry.outflow],
        )
    }

    pub fn list_cashflow(&self) -> Result<Vec<CashflowEntry>> {
        self.query_map(
            "SELECT id, month, inflow, outflow FROM cashflow ORDER BY id",
            [],
            cashflow_from_row,
        )
    }

    pub fn get_cashflow(&self, id: i64) -> Result<Option<CashflowEntry>> {
        self.query_opt(
            "SELECT id, month, inflow, outflow FROM cashflow WHERE id = ?1",
            [id],
            cashflow_from_row,
        )
    }

    pub fn update_cashflow(&self, id: i64, entry: &NewCashflow) -> Result<()> {
        let month = entry.validate()?;
        let changed = self.execute(
            "UPDATE cashflow SET month = ?1, inflow = ?2, outflow = ?3 WHERE id = ?4",
            params![month, entry.inflow, entry.outflow, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("cashflow entry {}", id)));
        }
        Ok(())
    }

    /// Delete a cashflow entry; returns false if no such entry existed
    pub fn delete_cashflow(&self, id: i64) -> Result<bool> {
        Ok(self.execute("DELETE FROM cashflow WHERE id = ?1", [id])? > 0)
    }

    /// Total inflow, outflow and their difference
    pub fn cashflow_summary(&self) -> Result<CashflowSummary> {
        let inflow = self.column_total("cashflow", "inflow")?;
        let outflow = self.column_total("cashflow", "outflow")?;
        Ok(CashflowSummary {
            inflow,
            outflow,
            net: inflow - outflow,
        })
    }

    /// Inflow, outflow and net per month label, oldest first
    pub fn cashflow_by_month(&self) -> Result<Vec<MonthlyCashflow>> {
        self.query_map(
            r#"
            SELECT month, SUM(inflow), SUM(outflow)
            FROM cashflow
            GROUP BY month
            ORDER BY month
            "#,
            [],
            |row| {
                let inflow: f64 = row.get(1)?;
                let outflow: f64 = row.get(2)?;
                Ok(MonthlyCashflow {
                    month: row.get(0)?,
                    inflow,
                    outflow,
                    net: inflow - outflow,
                })
            },
        )
    }
}
