//! Direct cost command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::aggregate::{GroupTotal, MonthlyTotal};
use tally_core::db::Database;
use tally_core::models::NewCost;

use super::{date_or_today, limited, print_groups, print_json, print_monthly, truncate};

pub fn cmd_costs_add(db: &Database, project: &str, cost: f64, date: Option<&str>) -> Result<()> {
    let entry = NewCost {
        project: project.to_string(),
        cost,
        date: date_or_today(date)?,
    };
    let id = db.record_cost(&entry).context("Failed to record cost")?;
    println!("✅ Recorded cost {} ({} {:.2})", id, entry.project, entry.cost);
    Ok(())
}

pub fn cmd_costs_list(db: &Database, limit: usize, json: bool) -> Result<()> {
    let costs = limited(db.list_costs()?, limit);
    if json {
        return print_json(&costs);
    }

    if costs.is_empty() {
        println!("No costs recorded.");
        return Ok(());
    }

    println!();
    println!("🧾 Costs");
    println!("   ─────────────────────────────────────────────────────────────");
    for cost in &costs {
        println!(
            "   {:>5}  {}  {:<32} {:>12.2}",
            cost.id,
            cost.date,
            truncate(&cost.project, 32),
            cost.cost
        );
    }
    Ok(())
}

pub fn cmd_costs_update(
    db: &Database,
    id: i64,
    project: &str,
    cost: f64,
    date: Option<&str>,
) -> Result<()> {
    let entry = NewCost {
        project: project.to_string(),
        cost,
        date: date_or_today(date)?,
    };
    db.update_cost(id, &entry)
        .with_context(|| format!("Failed to update cost {}", id))?;
    println!("✅ Updated cost {}", id);
    Ok(())
}

pub fn cmd_costs_delete(db: &Database, id: i64) -> Result<()> {
    if db.delete_cost(id)? {
        println!("✅ Deleted cost {}", id);
    } else {
        println!("No cost with id {}", id);
    }
    Ok(())
}

#[derive(Serialize)]
struct CostSummary {
    total: f64,
    by_month: Vec<MonthlyTotal>,
    by_project: Vec<GroupTotal>,
}

pub fn cmd_costs_summary(db: &Database, json: bool) -> Result<()> {
    let summary = CostSummary {
        total: db.cost_total()?,
        by_month: db.costs_by_month()?,
        by_project: db.costs_by_project()?,
    };
    if json {
        return print_json(&summary);
    }

    println!();
    println!("🧾 Cost Summary");
    println!("   ─────────────────────────────");
    println!("   Total cost: {:.2}", summary.total);
    print_monthly("By month", &summary.by_month);
    print_groups("By project", &summary.by_project);
    Ok(())
}
