//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `login` - Log in with --user and TALLY_PASSWORD
//! - `cmd_init` - Initialize the database
//! - `cmd_register` - Create a user
//! - `cmd_whoami` - Show the logged-in user

use std::path::Path;

use anyhow::{bail, Context, Result};
use tally_core::{Database, Session};

/// Environment variable holding the login password
pub const PASSWORD_ENV: &str = "TALLY_PASSWORD";

/// Open the database, creating and initializing it if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    Database::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

fn password_from_env() -> Result<String> {
    match std::env::var(PASSWORD_ENV) {
        Ok(password) if !password.is_empty() => Ok(password),
        _ => bail!("Set {} to your password", PASSWORD_ENV),
    }
}

/// Log in as `user` with the password from the environment
pub fn login(db: &Database, user: Option<&str>) -> Result<Session> {
    let Some(username) = user else {
        bail!(
            "This command requires a login: pass --user and set {}",
            PASSWORD_ENV
        );
    };
    login_with(db, username, &password_from_env()?)
}

pub fn login_with(db: &Database, username: &str, password: &str) -> Result<Session> {
    let mut session = Session::new();
    session
        .login(db, username, password)
        .with_context(|| format!("Login failed for '{}'", username))?;
    Ok(session)
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    println!("   Schema version: {}", db.schema_version()?);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: {}=... tally register <name>", PASSWORD_ENV);
    println!("  2. Record a sale: tally --user <name> sales add \"Project\" 1200");

    Ok(())
}

pub fn cmd_register(db: &Database, username: &str) -> Result<()> {
    let password = password_from_env()?;
    register_with(db, username, &password)
}

pub fn register_with(db: &Database, username: &str, password: &str) -> Result<()> {
    let user = Session::new()
        .register(db, username, password)
        .context("Registration failed")?;
    println!("✅ Registered user '{}' (id: {})", user.username, user.id);
    Ok(())
}

pub fn cmd_whoami(session: &Session, json: bool) -> Result<()> {
    let Some(user) = session.user() else {
        bail!("Not logged in");
    };
    if json {
        return super::print_json(user);
    }
    println!("👤 {} (id: {})", user.username, user.id);
    Ok(())
}
