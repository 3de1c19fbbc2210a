//! Tally CLI - Small-business sales and profit dashboard
//!
//! Usage:
//!   tally init                          Initialize database
//!   tally register alice                Create a user (password from TALLY_PASSWORD)
//!   tally -u alice sales add Web 1200   Record a sale
//!   tally -u alice dashboard            Show the overview

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use tally_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // Priority: --db flag > TALLY_DB > config file > default
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    let db_path = config.database_path.clone();
    tracing::debug!(db = %db_path.display(), "Using database");
    let json = cli.json;

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Register { username } => {
            let db = commands::open_db(&db_path)?;
            commands::cmd_register(&db, &username)
        }
        Commands::Import { import_type } => match import_type {
            ImportType::Sql { file } => commands::cmd_import_sql(&file, &db_path),
        },
        command => {
            let db = commands::open_db(&db_path)?;
            let mut session = commands::login(&db, cli.user.as_deref())?;
            run_gated(command, &db, &mut session, &config, json)
        }
    }
}

/// Run a command that needs a logged-in session
fn run_gated(
    command: Commands,
    db: &tally_core::Database,
    session: &mut tally_core::Session,
    config: &Config,
    json: bool,
) -> Result<()> {
    let db = session.gate(db)?;

    match command {
        Commands::Whoami => commands::cmd_whoami(session, json),
        Commands::Dashboard => commands::cmd_dashboard(db, json),
        Commands::Sales { action } => match action {
            None => commands::cmd_sales_list(db, 0, json),
            Some(SalesAction::Add {
                project,
                revenue,
                tag,
                date,
            }) => commands::cmd_sales_add(db, &project, revenue, tag.as_deref(), date.as_deref()),
            Some(SalesAction::List { limit }) => commands::cmd_sales_list(db, limit, json),
            Some(SalesAction::Update {
                id,
                project,
                revenue,
                tag,
                date,
            }) => commands::cmd_sales_update(
                db,
                id,
                &project,
                revenue,
                tag.as_deref(),
                date.as_deref(),
            ),
            Some(SalesAction::Delete { id }) => commands::cmd_sales_delete(db, id),
            Some(SalesAction::Summary) => commands::cmd_sales_summary(db, json),
        },
        Commands::Costs { action } => match action {
            None => commands::cmd_costs_list(db, 0, json),
            Some(CostsAction::Add {
                project,
                cost,
                date,
            }) => commands::cmd_costs_add(db, &project, cost, date.as_deref()),
            Some(CostsAction::List { limit }) => commands::cmd_costs_list(db, limit, json),
            Some(CostsAction::Update {
                id,
                project,
                cost,
                date,
            }) => commands::cmd_costs_update(db, id, &project, cost, date.as_deref()),
            Some(CostsAction::Delete { id }) => commands::cmd_costs_delete(db, id),
            Some(CostsAction::Summary) => commands::cmd_costs_summary(db, json),
        },
        Commands::Sga { action } => match action {
            None => commands::cmd_sga_list(db, 0, json),
            Some(SgaAction::Add {
                category,
                amount,
                date,
            }) => commands::cmd_sga_add(db, &category, amount, date.as_deref()),
            Some(SgaAction::List { limit }) => commands::cmd_sga_list(db, limit, json),
            Some(SgaAction::Update {
                id,
                category,
                amount,
                date,
            }) => commands::cmd_sga_update(db, id, &category, amount, date.as_deref()),
            Some(SgaAction::Delete { id }) => commands::cmd_sga_delete(db, id),
            Some(SgaAction::Summary) => commands::cmd_sga_summary(db, json),
        },
        Commands::Cashflow { action } => match action {
            None => commands::cmd_cashflow_list(db, 0, json),
            Some(CashflowAction::Add {
                month,
                inflow,
                outflow,
            }) => commands::cmd_cashflow_add(db, &month, inflow, outflow),
            Some(CashflowAction::List { limit }) => commands::cmd_cashflow_list(db, limit, json),
            Some(CashflowAction::Update {
                id,
                month,
                inflow,
                outflow,
            }) => commands::cmd_cashflow_update(db, id, &month, inflow, outflow),
            Some(CashflowAction::Delete { id }) => commands::cmd_cashflow_delete(db, id),
            Some(CashflowAction::Summary) => commands::cmd_cashflow_summary(db, json),
        },
        Commands::Tags { action } => match action {
            None | Some(TagsAction::List) => commands::cmd_tags_list(db, json),
            Some(TagsAction::Add { name }) => commands::cmd_tags_add(db, &name),
            Some(TagsAction::Rename { tag, new_name }) => {
                commands::cmd_tags_rename(db, session, &tag, &new_name)
            }
            Some(TagsAction::Delete { tag }) => commands::cmd_tags_delete(db, &tag),
        },
        Commands::Target { action } => match action {
            None | Some(TargetAction::Show) => commands::cmd_target_show(db, json),
            Some(TargetAction::Set { amount }) => commands::cmd_target_set(db, amount),
            Some(TargetAction::Clear) => commands::cmd_target_clear(db),
        },
        Commands::Profit { action } => match action {
            None | Some(ProfitAction::Summary) => commands::cmd_profit_summary(db, json),
            Some(ProfitAction::Monthly) => commands::cmd_profit_monthly(db, json),
            Some(ProfitAction::Snapshot { date }) => {
                commands::cmd_profit_snapshot(db, date.as_deref())
            }
            Some(ProfitAction::Snapshots) => commands::cmd_profit_snapshots(db, json),
            Some(ProfitAction::Delete { id }) => commands::cmd_profit_delete(db, id),
        },
        Commands::Export { export_type } => match export_type {
            ExportType::Sql { output } => {
                commands::cmd_export_sql(db, &config.export_path(&output))
            }
            ExportType::Deck { kind, output } => {
                commands::cmd_export_deck(db, &kind, &config.export_path(&output))
            }
            ExportType::Csv { table, output } => {
                let output = output.map(|o| config.export_path(&o));
                commands::cmd_export_csv(db, &table, output.as_deref())
            }
        },
        Commands::Init | Commands::Register { .. } | Commands::Import { .. } => {
            anyhow::bail!("This command does not need a login")
        }
    }
}
