//! Sales operations and revenue roll-ups

use rusqlite::{params, Row};
use tracing::info;

use super::Database;
use crate::aggregate::{GroupTotal, MonthlyTotal, TargetStatus};
use crate::error::{Error, Result};
use crate::models::{NewSale, Sale};

const SALE_COLUMNS: &str = "id, project, tag, revenue, date";

fn sale_from_row(row: &Row<'_>) -> rusqlite::Result<Sale> {
    Ok(Sale {
        id: row.get(0)?,
        project: row.get(1)?,
        tag: row.get(2)?,
        revenue: row.get(3)?,
        date: row.get(4)?,
    })
}

impl Database {
    /// Record a sale, returning its id
    ///
    /// A tag, when given, must name a registered tag.
    pub fn record_sale(&self, sale: &NewSale) -> Result<i64> {
        self.check_sale(sale)?;
        let id = self.insert(
            "INSERT INTO sales (project, tag, revenue, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                sale.project.trim(),
                sale.normalized_tag(),
                sale.revenue,
                sale.date
            ],
        )?;
        info!(id, project = sale.project.trim(), "Recorded sale");
        Ok(id)
    }

    /// List all sales in insertion order
    pub fn list_sales(&self) -> Result<Vec<Sale>> {
        self.query_map(
            &format!("SELECT {} FROM sales ORDER BY id", SALE_COLUMNS),
            [],
            sale_from_row,
        )
    }

    /// Get a sale by ID
    pub fn get_sale(&self, id: i64) -> Result<Option<Sale>> {
        self.query_opt(
            &format!("SELECT {} FROM sales WHERE id = ?1", SALE_COLUMNS),
            [id],
            sale_from_row,
        )
    }

    /// Replace every field of a sale
    pub fn update_sale(&self, id: i64, sale: &NewSale) -> Result<()> {
        self.check_sale(sale)?;
        let changed = self.execute(
            "UPDATE sales SET project = ?1, tag = ?2, revenue = ?3, date = ?4 WHERE id = ?5",
            params![
                sale.project.trim(),
                sale.normalized_tag(),
                sale.revenue,
                sale.date,
                id
            ],
        )?;
        if changed == 0 {
            return Err(Error::NotFound(format!("sale {}", id)));
        }
        Ok(())
    }

    /// Delete a sale; returns false if no such sale existed
    pub fn delete_sale(&self, id: i64) -> Result<bool> {
        Ok(self.execute("DELETE FROM sales WHERE id = ?1", [id])? > 0)
    }

    /// Total revenue across all sales
    pub fn sales_total(&self) -> Result<f64> {
        self.column_total("sales", "revenue")
    }

    /// Revenue per calendar month, oldest first
    pub fn sales_by_month(&self) -> Result<Vec<MonthlyTotal>> {
        self.column_by_month("sales", "date", "revenue")
    }

    /// Revenue per tag with each tag's share of total revenue
    pub fn sales_by_tag(&self) -> Result<Vec<GroupTotal>> {
        self.column_by_label("sales", "tag", "revenue")
    }

    /// Total revenue measured against the registered target
    pub fn sales_target_status(&self) -> Result<TargetStatus> {
        Ok(TargetStatus::new(self.target_revenue()?, self.sales_total()?))
    }

    fn check_sale(&self, sale: &NewSale) -> Result<()> {
        sale.validate()?;
        if let Some(tag) = sale.normalized_tag() {
            if self.find_tag_by_name(tag)?.is_none() {
                return Err(Error::Validation(format!("Unknown tag '{}'", tag)));
            }
        }
        Ok(())
    }
}
