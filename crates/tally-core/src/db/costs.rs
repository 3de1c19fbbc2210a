//! Direct project cost operations

use rusqlite::{params, Row};

use super::Database;
use crate::aggregate::{GroupTotal, MonthlyTotal};
use crate::error::{Error, Result};
use crate::models::{Cost, NewCost};

fn cost_from_row(row: &Row<'_>) -> rusqlite::Result<Cost> {
    Ok(Cost {
        id: row.get(0)?,
        project: row.get(1)?,
        cost: row.get(2)?,
        date: row.get(3)?,
    })
}

impl Database {
    /// Record a project cost, returning its id
    pub fn record_cost(&self, cost: &NewCost) -> Result<i64> {
        cost.validate()?;
        self.insert(
            "INSERT INTO costs (project, cost, date) VALUES (?1, ?2, ?3)",
            params![cost.project.trim(), cost.cost, cost.date],
        )
    }

    pub fn list_costs(&self) -> Result<Vec<Cost>> {
        self.query_map(
            "SELECT id, project, cost, date FROM costs ORDER BY id",
            [],
            cost_from_row,
        )
    }

    pub fn get_cost(&self, id: i64) -> Result<Option<Cost>> {
        self.query_opt(
            "SELECT id, project, cost, date FROM costs WHERE id = ?1",
            [id],
            cost_from_row,
        )
    }

    pub fn update_cost(&self, id: i64, cost: &NewCost) -> Result<()> {
        cost.validate()?;
        let changed = self.execute(
            "UPDATE costs SET project = ?1, cost = ?2, date = ?3 WHERE id = ?4",
            params![cost.project.trim(), cost.cost, cost.date, id],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("cost {}", id)));
        }
        Ok(())
    }

    /// Delete a cost; returns false if no such cost existed
    pub fn delete_cost(&self, id: i64) -> Result<bool> {
        Ok(self.execute("DELETE FROM costs WHERE id = ?1", [id])? > 0)
    }

    pub fn cost_total(&self) -> Result<f64> {
        self.column_total("costs", "cost")
    }

    pub fn costs_by_month(&self) -> Result<Vec<MonthlyTotal>> {
        self.column_by_month("costs", "date", "cost")
    }

    /// Cost per project with each project's share of total cost
    pub fn costs_by_project(&self) -> Result<Vec<GroupTotal>> {
        self.column_by_label("costs", "project", "cost")
    }
}
