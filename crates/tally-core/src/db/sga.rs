//! SG&A (selling, general & administrative) cost operations

use rusqlite::{params, Row};

use super::Database;
use crate::aggregate::{GroupTotal, MonthlyTotal};
use crate::error::{Error, Result};
use crate::models::{NewSgaCost, SgaCost};

fn sga_from_row(row: &Row<'_>) -> rusqlite::Result<SgaCost> {
    Ok(SgaCost {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
    })
}

impl Database {
    /// Record an overhead cost, returning its id
    pub fn record_sga_cost(&self, cost: &NewSgaCost) -> Result<i64> {
        cost.validate()?;
        self.insert(
            "INSERT INTO sg_a_costs (category, amount, date) VALUES (?1, ?2, ?3)",
            params![cost.category.trim(), cost.amount, cost.date],
        )
    }

    pub fn list_sga_costs(&self) -> Result<Vec<SgaCost>> {
        self.query_map(
            "SELECT id, category, amount, date FROM sg_a_costs ORDER BY id",
            [],
            sga_from_row,
        )
    }

    pub fn get_sga_cost(&self, id: i64) -> Result<Option<SgaCost>> {
        self.query_opt(
            "SELECT id, category, amount, date FROM sg_a_costs WHERE id = ?1",
            [id],
            sga_from_row,
        )
    }

    pub fn update_sga_cost(&self, id: i64, cost: &NewSgaCost) -> Result<()> {
        cost.validate()?;
        let changed = self.execute(
            "UPDATE sg_a_costs SET category = ?1, amount = ?2, date = ?3 WHERE id = ?4",
            params![cost.category.trim(), cost.amount, cost.date, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("SG&A cost {}", id)));
        }
        Ok(())
    }

    /// Delete an overhead cost; returns false if no such row existed
    pub fn delete_sga_cost(&self, id: i64) -> Result<bool> {
        Ok(self.execute("DELETE FROM sg_a_costs WHERE id = ?1", [id])? > 0)
    }

    pub fn sga_total(&self) -> Result<f64> {
        self.column_total("sg_a_costs", "amount")
    }

    pub fn sga_by_month(&self) -> Result<Vec<MonthlyTotal>> {
        self.column_by_month("sg_a_costs", "date", "amount")
    }

    pub fn sga_by_category(&self) -> Result<Vec<GroupTotal>> {
        self.column_by_label("sg_a_costs", "category", "amount")
    }
}
