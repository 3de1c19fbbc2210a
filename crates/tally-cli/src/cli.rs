//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Sales, costs and profit for a small business
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Small-business sales and profit dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (overrides TALLY_DB and the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file (defaults to <data dir>/tally/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// User to log in as
    ///
    /// Commands that read or change business data require a login.
    /// The password is read from the TALLY_PASSWORD environment variable.
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Register a new user (password from TALLY_PASSWORD)
    Register {
        /// Username
        username: String,
    },

    /// Check the login and show the current user
    Whoami,

    /// Manage sales
    Sales {
        #[command(subcommand)]
        action: Option<SalesAction>,
    },

    /// Manage direct project costs
    Costs {
        #[command(subcommand)]
        action: Option<CostsAction>,
    },

    /// Manage SG&A overhead
    Sga {
        #[command(subcommand)]
        action: Option<SgaAction>,
    },

    /// Manage monthly cashflow
    Cashflow {
        #[command(subcommand)]
        action: Option<CashflowAction>,
    },

    /// Manage sales tags
    Tags {
        #[command(subcommand)]
        action: Option<TagsAction>,
    },

    /// Manage the revenue target
    Target {
        #[command(subcommand)]
        action: Option<TargetAction>,
    },

    /// Operating profit and snapshots
    Profit {
        #[command(subcommand)]
        action: Option<ProfitAction>,
    },

    /// Show dashboard summary
    Dashboard,

    /// Export data
    Export {
        #[command(subcommand)]
        export_type: ExportType,
    },

    /// Import data
    Import {
        #[command(subcommand)]
        import_type: ImportType,
    },
}

#[derive(Subcommand)]
pub enum SalesAction {
    /// Record a sale
    Add {
        /// Project name
        project: String,

        /// Revenue amount
        revenue: f64,

        /// Tag name (must already exist)
        #[arg(short, long)]
        tag: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List sales
    List {
        /// Maximum number of rows to show (0 for all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Replace a sale
    Update {
        /// Sale ID
        id: i64,

        project: String,

        revenue: f64,

        #[arg(short, long)]
        tag: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a sale
    Delete {
        /// Sale ID
        id: i64,
    },

    /// Totals, monthly and per-tag breakdown, target variance
    Summary,
}

#[derive(Subcommand)]
pub enum CostsAction {
    /// Record a cost
    Add {
        /// Project name
        project: String,

        /// Cost amount
        cost: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List costs
    List {
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Replace a cost
    Update {
        /// Cost ID
        id: i64,

        project: String,

        cost: f64,

        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete a cost
    Delete {
        /// Cost ID
        id: i64,
    },

    /// Totals, monthly and per-project breakdown
    Summary,
}

#[derive(Subcommand)]
pub enum SgaAction {
    /// Record an SG&A cost
    Add {
        /// Category (e.g. Rent, Payroll)
        category: String,

        amount: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List SG&A costs
    List {
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Replace an SG&A cost
    Update {
        id: i64,

        category: String,

        amount: f64,

        #[arg(short, long)]
        date: Option<String>,
    },

    /// Delete an SG&A cost
    Delete { id: i64 },

    /// Totals, monthly and per-category breakdown
    Summary,
}

#[derive(Subcommand)]
pub enum CashflowAction {
    /// Record a month's inflow and outflow
    Add {
        /// Month (YYYY-MM)
        month: String,

        inflow: f64,

        outflow: f64,
    },

    /// List cashflow entries
    List {
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Replace a cashflow entry
    Update {
        id: i64,

        month: String,

        inflow: f64,

        outflow: f64,
    },

    /// Delete a cashflow entry
    Delete { id: i64 },

    /// Totals and per-month net
    Summary,
}

#[derive(Subcommand)]
pub enum TagsAction {
    /// Create a tag
    Add {
        /// Tag name
        name: String,
    },

    /// List tags
    List,

    /// Rename a tag (sales carrying it are relabelled)
    Rename {
        /// Tag name or ID
        tag: String,

        /// New name
        new_name: String,
    },

    /// Delete a tag (sales keep the old name)
    Delete {
        /// Tag name or ID
        tag: String,
    },
}

#[derive(Subcommand)]
pub enum TargetAction {
    /// Set the revenue target (replaces any existing target)
    Set { amount: f64 },

    /// Show the target and current variance
    Show,

    /// Remove the target
    Clear,
}

#[derive(Subcommand)]
pub enum ProfitAction {
    /// Show current revenue, cost, SG&A and profit
    Summary,

    /// Show profit per month
    Monthly,

    /// Store the current profit as a snapshot
    Snapshot {
        /// Snapshot date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List stored snapshots
    Snapshots,

    /// Delete a snapshot
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum ExportType {
    /// Full SQL dump of the database
    Sql {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Presentation deck (JSON chart data)
    Deck {
        /// Deck: sales, costs, sga, profit
        #[arg(short, long, default_value = "sales")]
        kind: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// One table as CSV
    Csv {
        /// Table: sales, costs, sga, cashflow, tags, profits
        #[arg(short, long)]
        table: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ImportType {
    /// Rebuild a database from a SQL dump
    ///
    /// The --db target must not exist yet or must be empty.
    Sql {
        /// Dump file
        #[arg(short, long)]
        file: PathBuf,
    },
}
