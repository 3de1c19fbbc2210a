//! Tally Core Library
//!
//! Shared functionality for the Tally small-business dashboard:
//! - Storage of sales, costs, SG&A, cashflow, tags and profit snapshots
//! - Aggregation (totals, monthly and per-tag roll-ups, profit, target variance)
//! - Session and login gate with hashed credentials
//! - Exports: SQL dump, presentation decks, CSV tables
//! - Configuration file handling

pub mod aggregate;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod session;

pub use aggregate::{
    CashflowSummary, GroupTotal, MonthlyCashflow, MonthlyProfit, MonthlyTotal, ProfitSummary,
    TargetStatus,
};
pub use config::Config;
pub use db::{DashboardSummary, Database, SqlDump};
pub use error::{Error, Result};
pub use export::{DeckKind, ExportTable};
pub use session::{Session, SessionState};
