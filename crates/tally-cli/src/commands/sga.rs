//! SG&A command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::aggregate::{GroupTotal, MonthlyTotal};
use tally_core::db::Database;
use tally_core::models::NewSgaCost;

use super::{date_or_today, limited, print_groups, print_json, print_monthly, truncate};

fn new_sga(category: &str, amount: f64, date: Option<&str>) -> Result<NewSgaCost> {
    Ok(NewSgaCost {
        category: category.to_string(),
        amount,
        date: date_or_today(date)?,
    })
}

pub fn cmd_sga_add(db: &Database, category: &str, amount: f64, date: Option<&str>) -> Result<()> {
    let entry = new_sga(category, amount, date)?;
    let id = db
        .record_sga_cost(&entry)
        .context("Failed to record SG&A cost")?;
    println!("✅ Recorded SG&A {} ({} {:.2})", id, entry.category, entry.amount);
    Ok(())
}

pub fn cmd_sga_list(db: &Database, limit: usize, json: bool) -> Result<()> {
    let rows = limited(db.list_sga_costs()?, limit);
    if json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No SG&A costs recorded.");
        return Ok(());
    }

    println!();
    println!("🏢 SG&A");
    println!("   ─────────────────────────────────────────────────────────────");
    for row in &rows {
        println!(
            "   {:>5}  {}  {:<32} {:>12.2}",
            row.id,
            row.date,
            truncate(&row.category, 32),
            row.amount
        );
    }
    Ok(())
}

pub fn cmd_sga_update(
    db: &Database,
    id: i64,
    category: &str,
    amount: f64,
    date: Option<&str>,
) -> Result<()> {
    db.update_sga_cost(id, &new_sga(category, amount, date)?)
        .with_context(|| format!("Failed to update SG&A cost {}", id))?;
    println!("✅ Updated SG&A {}", id);
    Ok(())
}

pub fn cmd_sga_delete(db: &Database, id: i64) -> Result<()> {
    if db.delete_sga_cost(id)? {
        println!("✅ Deleted SG&A {}", id);
    } else {
        println!("No SG&A cost with id {}", id);
    }
    Ok(())
}

#[derive(Serialize)]
struct SgaSummary {
    total: f64,
    by_month: Vec<MonthlyTotal>,
    by_category: Vec<GroupTotal>,
}

pub fn cmd_sga_summary(db: &Database, json: bool) -> Result<()> {
    let summary = SgaSummary {
        total: db.sga_total()?,
        by_month: db.sga_by_month()?,
        by_category: db.sga_by_category()?,
    };
    if json {
        return print_json(&summary);
    }

    println!();
    println!("🏢 SG&A Summary");
    println!("   ─────────────────────────────");
    println!("   Total SG&A: {:.2}", summary.total);
    print_monthly("By month", &summary.by_month);
    print_groups("By category", &summary.by_category);
    Ok(())
}
