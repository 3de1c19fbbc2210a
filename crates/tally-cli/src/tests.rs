//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use clap::Parser;
use tally_core::db::Database;
use tally_core::Session;

use crate::cli::{Cli, Commands, ExportType, SalesAction};
use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.create_tag("Retail").unwrap();
    db
}

fn logged_in(db: &Database) -> Session {
    commands::register_with(db, "owner", "pw").unwrap();
    commands::login_with(db, "owner", "pw").unwrap()
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a much longer project name", 10), "a much ...");
    assert_eq!(truncate("café crème brûlée", 8), "café ...");
}

#[test]
fn test_date_or_today() {
    let date = commands::date_or_today(Some("2024-06-30")).unwrap();
    assert_eq!(date.to_string(), "2024-06-30");
    assert!(commands::date_or_today(Some("30/06/2024")).is_err());
    assert!(commands::date_or_today(None).is_ok());
}

#[test]
fn test_limited() {
    assert_eq!(commands::limited(vec![1, 2, 3], 2), vec![1, 2]);
    assert_eq!(commands::limited(vec![1, 2, 3], 0), vec![1, 2, 3]);
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_sales_add() {
    let cli = Cli::try_parse_from([
        "tally", "--user", "owner", "sales", "add", "Kiosk", "1200.5", "--tag", "Retail", "-d",
        "2024-01-02",
    ])
    .unwrap();
    assert_eq!(cli.user.as_deref(), Some("owner"));
    match cli.command {
        Commands::Sales {
            action:
                Some(SalesAction::Add {
                    project,
                    revenue,
                    tag,
                    date,
                }),
        } => {
            assert_eq!(project, "Kiosk");
            assert_eq!(revenue, 1200.5);
            assert_eq!(tag.as_deref(), Some("Retail"));
            assert_eq!(date.as_deref(), Some("2024-01-02"));
        }
        _ => panic!("expected sales add"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tally", "export", "deck", "--kind", "profit", "-o", "deck.json", "--db", "x.db", "--json",
    ])
    .unwrap();
    assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("x.db")));
    assert!(cli.json);
    assert!(matches!(
        cli.command,
        Commands::Export {
            export_type: ExportType::Deck { .. }
        }
    ));
}

#[test]
fn test_parse_rejects_bad_amount() {
    assert!(Cli::try_parse_from(["tally", "target", "set", "lots"]).is_err());
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");
    commands::cmd_init(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_register_and_login() {
    let db = setup_test_db();
    let session = logged_in(&db);
    assert!(session.is_authenticated());
    assert!(commands::cmd_whoami(&session, false).is_ok());

    assert!(commands::register_with(&db, "owner", "again").is_err());
    assert!(commands::login_with(&db, "owner", "wrong").is_err());
}

#[test]
fn test_login_requires_user() {
    let db = setup_test_db();
    assert!(commands::login(&db, None).is_err());
}

#[test]
fn test_whoami_requires_login() {
    assert!(commands::cmd_whoami(&Session::new(), false).is_err());
}

// ========== Ledger Command Tests ==========

#[test]
fn test_cmd_sales_flow() {
    let db = setup_test_db();
    commands::cmd_sales_add(&db, "Kiosk", 500.0, Some("Retail"), Some("2024-01-05")).unwrap();
    commands::cmd_sales_add(&db, "Web", 250.0, None, None).unwrap();
    assert_eq!(db.sales_total().unwrap(), 750.0);

    assert!(commands::cmd_sales_list(&db, 1, false).is_ok());
    assert!(commands::cmd_sales_list(&db, 0, true).is_ok());
    assert!(commands::cmd_sales_summary(&db, false).is_ok());
    assert!(commands::cmd_sales_summary(&db, true).is_ok());

    let id = db.list_sales().unwrap()[0].id;
    commands::cmd_sales_update(&db, id, "Kiosk", 600.0, Some("Retail"), Some("2024-01-05"))
        .unwrap();
    assert_eq!(db.sales_total().unwrap(), 850.0);

    commands::cmd_sales_delete(&db, id).unwrap();
    assert_eq!(db.sales_total().unwrap(), 250.0);
    // Deleting again is not an error
    assert!(commands::cmd_sales_delete(&db, id).is_ok());
}

#[test]
fn test_cmd_sales_add_unknown_tag() {
    let db = setup_test_db();
    let result = commands::cmd_sales_add(&db, "Kiosk", 5.0, Some("Nope"), None);
    assert!(result.is_err());
    assert!(db.list_sales().unwrap().is_empty());
}

#[test]
fn test_cmd_update_missing_id() {
    let db = setup_test_db();
    assert!(commands::cmd_costs_update(&db, 42, "X", 1.0, None).is_err());
    assert!(commands::cmd_cashflow_update(&db, 42, "2024-01", 1.0, 1.0).is_err());
}

#[test]
fn test_cmd_costs_sga_cashflow() {
    let db = setup_test_db();
    commands::cmd_costs_add(&db, "Kiosk", 100.0, Some("2024-01-01")).unwrap();
    commands::cmd_sga_add(&db, "Rent", 300.0, Some("2024-01-01")).unwrap();
    commands::cmd_cashflow_add(&db, "2024-01", 1000.0, 400.0).unwrap();

    assert!(commands::cmd_costs_summary(&db, false).is_ok());
    assert!(commands::cmd_sga_summary(&db, false).is_ok());
    assert!(commands::cmd_cashflow_summary(&db, false).is_ok());
    assert!(commands::cmd_cashflow_list(&db, 0, false).is_ok());

    assert_eq!(db.cashflow_summary().unwrap().net, 600.0);
    assert!(commands::cmd_cashflow_add(&db, "January", 1.0, 1.0).is_err());
    assert!(commands::cmd_sga_add(&db, "Rent", -1.0, None).is_err());
}

// ========== Tag and Target Command Tests ==========

#[test]
fn test_cmd_tags_rename_by_name_and_id() {
    let db = setup_test_db();
    let mut session = logged_in(&db);
    commands::cmd_sales_add(&db, "Kiosk", 10.0, Some("Retail"), None).unwrap();

    commands::cmd_tags_rename(&db, &mut session, "Retail", "Shop").unwrap();
    assert_eq!(db.count_sales_with_tag("Shop").unwrap(), 1);

    let id = db.find_tag_by_name("Shop").unwrap().unwrap().id;
    commands::cmd_tags_rename(&db, &mut session, &id.to_string(), "Store").unwrap();
    assert!(!session.is_editing_tag(id));
    assert_eq!(db.count_sales_with_tag("Store").unwrap(), 1);
}

#[test]
fn test_cmd_tags_rename_failure_closes_edit() {
    let db = setup_test_db();
    let mut session = logged_in(&db);
    commands::cmd_tags_add(&db, "Online").unwrap();
    let id = db.find_tag_by_name("Retail").unwrap().unwrap().id;

    assert!(commands::cmd_tags_rename(&db, &mut session, "Retail", "Online").is_err());
    assert!(!session.is_editing_tag(id));
}

#[test]
fn test_cmd_tags_delete_and_missing() {
    let db = setup_test_db();
    commands::cmd_tags_delete(&db, "Retail").unwrap();
    assert!(db.list_tags().unwrap().is_empty());
    assert!(commands::cmd_tags_delete(&db, "Retail").is_err());
    assert!(commands::cmd_tags_list(&db, false).is_ok());
}

#[test]
fn test_cmd_target() {
    let db = setup_test_db();
    assert!(commands::cmd_target_show(&db, false).is_ok());

    commands::cmd_target_set(&db, 1000.0).unwrap();
    commands::cmd_target_set(&db, 2000.0).unwrap();
    assert_eq!(db.target_revenue().unwrap(), Some(2000.0));
    assert!(commands::cmd_target_set(&db, -5.0).is_err());

    commands::cmd_target_clear(&db).unwrap();
    assert_eq!(db.target_revenue().unwrap(), None);
}

// ========== Profit, Dashboard and Export Tests ==========

#[test]
fn test_cmd_profit() {
    let db = setup_test_db();
    commands::cmd_sales_add(&db, "Kiosk", 10000.0, None, Some("2024-01-01")).unwrap();
    commands::cmd_costs_add(&db, "Kiosk", 4000.0, Some("2024-01-01")).unwrap();
    commands::cmd_sga_add(&db, "Rent", 2000.0, Some("2024-01-01")).unwrap();

    assert!(commands::cmd_profit_summary(&db, false).is_ok());
    assert!(commands::cmd_profit_monthly(&db, true).is_ok());

    commands::cmd_profit_snapshot(&db, Some("2024-01-31")).unwrap();
    let snapshots = db.list_profit_snapshots().unwrap();
    assert_eq!(snapshots[0].profit, 4000.0);

    commands::cmd_profit_delete(&db, snapshots[0].id).unwrap();
    assert!(db.list_profit_snapshots().unwrap().is_empty());
}

#[test]
fn test_cmd_dashboard() {
    let db = setup_test_db();
    assert!(commands::cmd_dashboard(&db, false).is_ok());
    assert!(commands::cmd_dashboard(&db, true).is_ok());
}

#[test]
fn test_cmd_export_and_import() {
    let db = setup_test_db();
    logged_in(&db);
    commands::cmd_sales_add(&db, "Kiosk", 800.0, Some("Retail"), Some("2024-02-01")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("dump.sql");
    commands::cmd_export_sql(&db, &dump).unwrap();
    commands::cmd_export_deck(&db, "sales", &dir.path().join("sales.json")).unwrap();
    commands::cmd_export_csv(&db, "sales", Some(&dir.path().join("sales.csv"))).unwrap();
    assert!(commands::cmd_export_deck(&db, "nonsense", &dir.path().join("x.json")).is_err());
    assert!(commands::cmd_export_csv(&db, "users", None).is_err());

    let restored_path = dir.path().join("restored.db");
    commands::cmd_import_sql(&dump, &restored_path).unwrap();
    let restored = Database::open(&restored_path).unwrap();
    assert_eq!(restored.sales_total().unwrap(), 800.0);
    assert!(commands::login_with(&restored, "owner", "pw").is_ok());

    // A second import into the same file is refused
    assert!(commands::cmd_import_sql(&dump, &restored_path).is_err());
}
