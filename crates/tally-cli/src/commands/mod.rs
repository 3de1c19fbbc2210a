//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init, register, whoami) and shared utilities (open_db, login)
//! - `sales` - Sales commands (add, list, update, delete, summary)
//! - `costs` - Direct cost commands
//! - `sga` - SG&A commands
//! - `cashflow` - Cashflow commands
//! - `tags` - Tag and revenue target commands
//! - `profit` - Profit summary and snapshot commands
//! - `status` - Dashboard command
//! - `export` - SQL dump, deck and CSV export, dump import

pub mod cashflow;
pub mod core;
pub mod costs;
pub mod export;
pub mod profit;
pub mod sales;
pub mod sga;
pub mod status;
pub mod tags;

// Re-export command functions for main.rs
pub use cashflow::*;
pub use self::core::*;
pub use costs::*;
pub use export::*;
pub use profit::*;
pub use sales::*;
pub use sga::*;
pub use status::*;
pub use tags::*;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tally_core::aggregate::{GroupTotal, MonthlyTotal};
use tally_core::models::parse_date;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today
pub fn date_or_today(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(Local::now().date_naive()),
    }
}

/// Keep the first `limit` rows; 0 keeps everything
pub fn limited<T>(mut rows: Vec<T>, limit: usize) -> Vec<T> {
    if limit > 0 {
        rows.truncate(limit);
    }
    rows
}

pub(crate) fn print_monthly(title: &str, months: &[MonthlyTotal]) {
    println!();
    println!("   {}", title);
    if months.is_empty() {
        println!("   (no entries)");
    }
    for m in months {
        println!("   {}  {:>14.2}", m.month, m.amount);
    }
}

pub(crate) fn print_groups(title: &str, groups: &[GroupTotal]) {
    println!();
    println!("   {}", title);
    if groups.is_empty() {
        println!("   (no entries)");
    }
    for g in groups {
        println!(
            "   {:<24} {:>14.2}  {:>5.1}%",
            truncate(&g.label, 24),
            g.amount,
            g.share * 100.0
        );
    }
}
