//! Cashflow command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::aggregate::{CashflowSummary, MonthlyCashflow};
use tally_core::db::Database;
use tally_core::models::NewCashflow;

use super::{limited, print_json};

fn new_entry(month: &str, inflow: f64, outflow: f64) -> NewCashflow {
    NewCashflow {
        month: month.to_string(),
        inflow,
        outflow,
    }
}

pub fn cmd_cashflow_add(db: &Database, month: &str, inflow: f64, outflow: f64) -> Result<()> {
    let id = db
        .record_cashflow(&new_entry(month, inflow, outflow))
        .context("Failed to record cashflow")?;
    println!(
        "✅ Recorded cashflow {} (net {:+.2})",
        id,
        inflow - outflow
    );
    Ok(())
}

pub fn cmd_cashflow_list(db: &Database, limit: usize, json: bool) -> Result<()> {
    let entries = limited(db.list_cashflow()?, limit);
    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No cashflow recorded.");
        return Ok(());
    }

    println!();
    println!("🔄 Cashflow");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>5}  {:<7}  {:>12}  {:>12}  {:>12}",
        "id", "month", "inflow", "outflow", "net"
    );
    for entry in &entries {
        println!(
            "   {:>5}  {:<7}  {:>12.2}  {:>12.2}  {:>+12.2}",
            entry.id,
            entry.month,
            entry.inflow,
            entry.outflow,
            entry.net()
        );
    }
    Ok(())
}

pub fn cmd_cashflow_update(
    db: &Database,
    id: i64,
    month: &str,
    inflow: f64,
    outflow: f64,
) -> Result<()> {
    db.update_cashflow(id, &new_entry(month, inflow, outflow))
        .with_context(|| format!("Failed to update cashflow entry {}", id))?;
    println!("✅ Updated cashflow {}", id);
    Ok(())
}

pub fn cmd_cashflow_delete(db: &Database, id: i64) -> Result<()> {
    if db.delete_cashflow(id)? {
        println!("✅ Deleted cashflow {}", id);
    } else {
        println!("No cashflow entry with id {}", id);
    }
    Ok(())
}

#[derive(Serialize)]
struct CashflowReport {
    totals: CashflowSummary,
    by_month: Vec<MonthlyCashflow>,
}

pub fn cmd_cashflow_summary(db: &Database, json: bool) -> Result<()> {
    let report = CashflowReport {
        totals: db.cashflow_summary()?,
        by_month: db.cashflow_by_month()?,
    };
    if json {
        return print_json(&report);
    }

    println!();
    println!("🔄 Cashflow Summary");
    println!("   ─────────────────────────────");
    println!("   Inflow:  {:.2}", report.totals.inflow);
    println!("   Outflow: {:.2}", report.totals.outflow);
    println!("   Net:     {:+.2}", report.totals.net);
    println!();
    for m in &report.by_month {
        println!(
            "   {}  in {:>12.2}  out {:>12.2}  net {:>+12.2}",
            m.month, m.inflow, m.outflow, m.net
        );
    }
    Ok(())
}
