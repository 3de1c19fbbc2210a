//! User credential storage
//!
//! Only password hashes are stored; hashing and verification live in
//! [`crate::session`].

use rusqlite::{params, ErrorCode};

use super::Database;
use crate::error::{Error, Result};
use crate::models::User;

impl Database {
    /// Insert a user with an already-hashed password
    pub(crate) fn create_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        if self.find_user(username)?.is_some() {
            return Err(Error::Validation(format!(
                "Username '{}' is already taken",
                username
            )));
        }
        match self.insert(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![username, password_hash],
        ) {
            Err(Error::Database(rusqlite::Error::SqliteFailure(e, _)))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(Error::Validation(format!(
                    "Username '{}' is already taken",
                    username
                )))
            }
            other => other,
        }
    }

    /// Look up a user by exact username
    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        self.query_opt(
            "SELECT id, username FROM users WHERE username = ?1",
            [username],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                })
            },
        )
    }

    /// Look up a user and their stored password hash
    pub(crate) fn user_credentials(&self, username: &str) -> Result<Option<(User, String)>> {
        self.query_opt(
            "SELECT id, username, password FROM users WHERE username = ?1",
            [username],
            |row| {
                Ok((
                    User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    },
                    row.get(2)?,
                ))
            },
        )
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.query_map(
            "SELECT id, username FROM users ORDER BY id",
            [],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                })
            },
        )
    }
}
