//! Operating profit: live figures and stored snapshots

use chrono::NaiveDate;
use rusqlite::{params, Row};
use tracing::info;

use super::Database;
use crate::aggregate::{self, MonthlyProfit, ProfitSummary};
use crate::error::Result;
use crate::models::ProfitSnapshot;

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<ProfitSnapshot> {
    Ok(ProfitSnapshot {
        id: row.get(0)?,
        revenue: row.get(1)?,
        cost: row.get(2)?,
        sg_a_cost: row.get(3)?,
        profit: row.get(4)?,
        date: row.get(5)?,
    })
}

impl Database {
    /// Revenue, cost, SG&A and profit over all recorded rows
    pub fn profit_summary(&self) -> Result<ProfitSummary> {
        Ok(ProfitSummary::new(
            self.sales_total()?,
            self.cost_total()?,
            self.sga_total()?,
        ))
    }

    /// Profit per calendar month, oldest first
    pub fn profit_by_month(&self) -> Result<Vec<MonthlyProfit>> {
        Ok(aggregate::monthly_profit(
            &self.sales_by_month()?,
            &self.costs_by_month()?,
            &self.sga_by_month()?,
        ))
    }

    /// Store the current profit summary dated `date`
    pub fn record_profit_snapshot(&self, date: NaiveDate) -> Result<ProfitSnapshot> {
        let summary = self.profit_summary()?;
        let id = self.insert(
            "INSERT INTO profits (revenue, cost, sg_a_cost, profit, date) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                summary.revenue,
                summary.cost,
                summary.sg_a_cost,
                summary.profit,
                date
            ],
        )?;
        info!(id, profit = summary.profit, %date, "Recorded profit snapshot");
        Ok(ProfitSnapshot {
            id,
            revenue: summary.revenue,
            cost: summary.cost,
            sg_a_cost: summary.sg_a_cost,
            profit: summary.profit,
            date,
        })
    }

    /// Stored snapshots, oldest date first
    pub fn list_profit_snapshots(&self) -> Result<Vec<ProfitSnapshot>> {
        self.query_map(
            "SELECT id, revenue, cost, sg_a_cost, profit, date FROM profits ORDER BY date, id",
            [],
            snapshot_from_row,
        )
    }

    /// Delete a snapshot; returns false if no such snapshot existed
    pub fn delete_profit_snapshot(&self, id: i64) -> Result<bool> {
        Ok(self.execute("DELETE FROM profits WHERE id = ?1", [id])? > 0)
    }
}
