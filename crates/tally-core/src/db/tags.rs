//! Sales tags and the revenue target
//!
//! Sales reference tags by name. Deleting a tag leaves sales that still
//! carry its name untouched; roll-ups keep reporting them under that name.
//! Renaming a tag rewrites the name on its sales in the same transaction.

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::Database;
use crate::error::{Error, Result};
use crate::models::Tag;

fn validate_tag_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("Tag name must not be empty".to_string()));
    }
    Ok(name)
}

impl Database {
    /// Create a tag, returning its id
    pub fn create_tag(&self, name: &str) -> Result<i64> {
        let name = validate_tag_name(name)?;
        if self.find_tag_by_name(name)?.is_some() {
            return Err(Error::Validation(format!("Tag '{}' already exists", name)));
        }
        let id = self.insert("INSERT INTO tags (tag_name) VALUES (?1)", [name])?;
        info!(id, name, "Created tag");
        Ok(id)
    }

    /// List tags in creation order
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        self.query_map("SELECT id, tag_name FROM tags ORDER BY id", [], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
    }

    pub fn get_tag(&self, id: i64) -> Result<Option<Tag>> {
        self.query_opt(
            "SELECT id, tag_name FROM tags WHERE id = ?1",
            [id],
            |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
    }

    /// Find a tag by exact name
    pub fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        self.query_opt(
            "SELECT id, tag_name FROM tags WHERE tag_name = ?1 ORDER BY id LIMIT 1",
            [name.trim()],
            |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
    }

    /// Rename a tag and the sales that carry its old name
    ///
    /// Returns the number of sales relabelled.
    pub fn rename_tag(&self, id: i64, new_name: &str) -> Result<usize> {
        let new_name = validate_tag_name(new_name)?;
        let tag = self
            .get_tag(id)?
            .ok_or_else(|| Error::NotFound(format!("tag {}", id)))?;
        if tag.name == new_name {
            return Ok(0);
        }
        if self.find_tag_by_name(new_name)?.is_some() {
            return Err(Error::Validation(format!(
                "Tag '{}' already exists",
                new_name
            )));
        }

        let relabelled = self.transaction(|tx| {
            tx.execute(
                "UPDATE tags SET tag_name = ?1 WHERE id = ?2",
                params![new_name, id],
            )?;
            tx.execute(
                "UPDATE sales SET tag = ?1 WHERE tag = ?2",
                params![new_name, tag.name],
            )
        })?;

        info!(id, from = %tag.name, to = new_name, relabelled, "Renamed tag");
        Ok(relabelled)
    }

    /// Delete a tag; returns false if no such tag existed
    pub fn delete_tag(&self, id: i64) -> Result<bool> {
        Ok(self.execute("DELETE FROM tags WHERE id = ?1", [id])? > 0)
    }

    /// Number of sales carrying a tag name
    pub fn count_sales_with_tag(&self, name: &str) -> Result<i64> {
        self.query_scalar("SELECT COUNT(*) FROM sales WHERE tag = ?1", [name])
    }

    /// Replace the revenue target with `amount`
    pub fn set_target_revenue(&self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::Validation(format!(
                "Target revenue must be a non-negative number (got {})",
                amount
            )));
        }
        self.transaction(|tx| {
            tx.execute("DELETE FROM target_revenue", [])?;
            tx.execute("INSERT INTO target_revenue (amount) VALUES (?1)", [amount])?;
            Ok(())
        })?;
        info!(amount, "Target revenue set");
        Ok(())
    }

    /// The current revenue target, if one is registered
    pub fn target_revenue(&self) -> Result<Option<f64>> {
        let conn = self.conn()?;
        let amount = conn
            .query_row(
                "SELECT amount FROM target_revenue ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(amount)
    }

    /// Remove the revenue target
    pub fn clear_target_revenue(&self) -> Result<bool> {
        Ok(self.execute("DELETE FROM target_revenue", [])? > 0)
    }
}
