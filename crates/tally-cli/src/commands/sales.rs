//! Sales command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use tally_core::aggregate::{GroupTotal, MonthlyTotal, TargetStatus};
use tally_core::db::Database;
use tally_core::models::NewSale;

use super::{date_or_today, limited, print_groups, print_json, print_monthly, truncate};

fn new_sale(
    project: &str,
    revenue: f64,
    tag: Option<&str>,
    date: Option<&str>,
) -> Result<NewSale> {
    Ok(NewSale {
        project: project.to_string(),
        tag: tag.map(str::to_string),
        revenue,
        date: date_or_today(date)?,
    })
}

pub fn cmd_sales_add(
    db: &Database,
    project: &str,
    revenue: f64,
    tag: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let sale = new_sale(project, revenue, tag, date)?;
    let id = db.record_sale(&sale).context("Failed to record sale")?;
    println!("✅ Recorded sale {} ({} {:.2} on {})", id, sale.project, sale.revenue, sale.date);
    Ok(())
}

pub fn cmd_sales_list(db: &Database, limit: usize, json: bool) -> Result<()> {
    let sales = limited(db.list_sales()?, limit);
    if json {
        return print_json(&sales);
    }

    if sales.is_empty() {
        println!("No sales recorded. Add one with 'tally sales add <project> <revenue>'.");
        return Ok(());
    }

    println!();
    println!("💵 Sales");
    println!("   ─────────────────────────────────────────────────────────────");
    for sale in &sales {
        println!(
            "   {:>5}  {}  {:<28} {:<16} {:>12.2}",
            sale.id,
            sale.date,
            truncate(&sale.project, 28),
            truncate(sale.tag.as_deref().unwrap_or("-"), 16),
            sale.revenue
        );
    }
    Ok(())
}

pub fn cmd_sales_update(
    db: &Database,
    id: i64,
    project: &str,
    revenue: f64,
    tag: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let sale = new_sale(project, revenue, tag, date)?;
    db.update_sale(id, &sale)
        .with_context(|| format!("Failed to update sale {}", id))?;
    println!("✅ Updated sale {}", id);
    Ok(())
}

pub fn cmd_sales_delete(db: &Database, id: i64) -> Result<()> {
    if db.delete_sale(id)? {
        println!("✅ Deleted sale {}", id);
    } else {
        println!("No sale with id {}", id);
    }
    Ok(())
}

#[derive(Serialize)]
struct SalesSummary {
    total: f64,
    target: TargetStatus,
    by_month: Vec<MonthlyTotal>,
    by_tag: Vec<GroupTotal>,
}

pub fn cmd_sales_summary(db: &Database, json: bool) -> Result<()> {
    let summary = SalesSummary {
        total: db.sales_total()?,
        target: db.sales_target_status()?,
        by_month: db.sales_by_month()?,
        by_tag: db.sales_by_tag()?,
    };
    if json {
        return print_json(&summary);
    }

    println!();
    println!("💵 Sales Summary");
    println!("   ─────────────────────────────");
    println!("   Total revenue: {:.2}", summary.total);
    match summary.target {
        TargetStatus::Configured {
            target, variance, ..
        } => {
            println!("   Target:        {:.2}", target);
            println!("   Variance:      {:+.2}", variance);
        }
        TargetStatus::NotConfigured { .. } => {
            println!("   Target:        (not set, use 'tally target set <amount>')");
        }
    }
    print_monthly("By month", &summary.by_month);
    print_groups("By tag", &summary.by_tag);
    Ok(())
}
