//! Profit command implementations

use anyhow::{Context, Result};
use tally_core::db::Database;

use super::{date_or_today, print_json};

pub fn cmd_profit_summary(db: &Database, json: bool) -> Result<()> {
    let summary = db.profit_summary()?;
    if json {
        return print_json(&summary);
    }

    println!();
    println!("📈 Operating Profit");
    println!("   ─────────────────────────────");
    println!("   Revenue: {:>14.2}", summary.revenue);
    println!("   Cost:    {:>14.2}", summary.cost);
    println!("   SG&A:    {:>14.2}", summary.sg_a_cost);
    println!("   Profit:  {:>14.2}  ({}k)", summary.profit, summary.profit_thousands());
    Ok(())
}

pub fn cmd_profit_monthly(db: &Database, json: bool) -> Result<()> {
    let months = db.profit_by_month()?;
    if json {
        return print_json(&months);
    }

    if months.is_empty() {
        println!("Nothing recorded yet.");
        return Ok(());
    }

    println!();
    println!("📈 Monthly Profit");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<7}  {:>12}  {:>12}  {:>12}  {:>12}",
        "month", "revenue", "cost", "sg&a", "profit"
    );
    for m in &months {
        println!(
            "   {:<7}  {:>12.2}  {:>12.2}  {:>12.2}  {:>+12.2}",
            m.month, m.revenue, m.cost, m.sg_a_cost, m.profit
        );
    }
    Ok(())
}

pub fn cmd_profit_snapshot(db: &Database, date: Option<&str>) -> Result<()> {
    let snapshot = db
        .record_profit_snapshot(date_or_today(date)?)
        .context("Failed to record profit snapshot")?;
    println!(
        "✅ Snapshot {} stored for {}: profit {:.2}",
        snapshot.id, snapshot.date, snapshot.profit
    );
    Ok(())
}

pub fn cmd_profit_snapshots(db: &Database, json: bool) -> Result<()> {
    let snapshots = db.list_profit_snapshots()?;
    if json {
        return print_json(&snapshots);
    }

    if snapshots.is_empty() {
        println!("No snapshots. Store one with 'tally profit snapshot'.");
        return Ok(());
    }

    println!();
    println!("📸 Profit Snapshots");
    println!("   ─────────────────────────────────────────────────────────────");
    for s in &snapshots {
        println!(
            "   {:>4}  {}  revenue {:>12.2}  profit {:>+12.2}",
            s.id, s.date, s.revenue, s.profit
        );
    }
    Ok(())
}

pub fn cmd_profit_delete(db: &Database, id: i64) -> Result<()> {
    if db.delete_profit_snapshot(id)? {
        println!("✅ Deleted snapshot {}", id);
    } else {
        println!("No snapshot with id {}", id);
    }
    Ok(())
}
