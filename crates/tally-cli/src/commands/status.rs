//! Dashboard command implementation

use anyhow::Result;
use tally_core::aggregate::TargetStatus;
use tally_core::db::Database;

use super::print_json;

pub fn cmd_dashboard(db: &Database, json: bool) -> Result<()> {
    let stats = db.dashboard_summary()?;
    if json {
        return print_json(&stats);
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           📊 Tally Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Sales:        {}", stats.sales_count);
    println!("  Costs:        {}", stats.cost_count);
    println!("  SG&A:         {}", stats.sga_count);
    println!("  Cashflow:     {}", stats.cashflow_count);
    println!("  Tags:         {}", stats.tag_count);
    println!("  Snapshots:    {}", stats.snapshot_count);
    println!();
    println!("  💵 Revenue:   {:.2}", stats.profit.revenue);
    println!("  🧾 Cost:      {:.2}", stats.profit.cost);
    println!("  🏢 SG&A:      {:.2}", stats.profit.sg_a_cost);
    println!(
        "  📈 Profit:    {:.2} ({}k)",
        stats.profit.profit,
        stats.profit.profit_thousands()
    );
    println!("  🔄 Cash net:  {:+.2}", stats.cashflow.net);
    println!();

    match stats.target {
        TargetStatus::Configured {
            target, variance, ..
        } => {
            println!("  🎯 Target {:.2}, variance {:+.2}", target, variance);
        }
        TargetStatus::NotConfigured { .. } => {
            println!("  Set a revenue target with 'tally target set <amount>'.");
        }
    }

    Ok(())
}
