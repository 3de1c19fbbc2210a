//! Session and authentication gate
//!
//! A [`Session`] is an explicit value handed to every page handler. It tracks
//! who is logged in and which tags are currently being edited; the domain
//! operations on [`Database`] are only reachable through [`Session::gate`].
//!
//! Passwords are stored as salted Argon2id hashes (PHC strings). Verification
//! goes through argon2's `PasswordVerifier`, which compares digests in
//! constant time.

use std::collections::HashSet;
use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::User;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash string
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::PasswordHash(format!("Malformed stored hash: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::PasswordHash(e.to_string())),
    }
}

/// Hash that unknown usernames are verified against, built on first use
fn dummy_hash() -> Result<&'static str> {
    static DUMMY: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_password("tally-dummy-password")?;
    Ok(DUMMY.get_or_init(|| hash).as_str())
}

/// Where a session is in the login flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// Credentials submitted, check in progress
    Authenticating,
    Authenticated(User),
}

/// Per-user interaction state
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    active_tag_edits: HashSet<i64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Anonymous,
            active_tag_edits: HashSet::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// The logged-in user, if any
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Register a new user; the session stays anonymous
    pub fn register(&self, db: &Database, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::Validation("Username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("Password must not be empty".to_string()));
        }

        let hash = hash_password(password)?;
        let id = db.create_user(username, &hash)?;
        info!(id, username, "Registered user");
        Ok(User {
            id,
            username: username.to_string(),
        })
    }

    /// Check credentials and move to `Authenticated` on success
    ///
    /// On a mismatch the session returns to `Anonymous` and
    /// [`Error::InvalidCredentials`] is returned.
    pub fn login(&mut self, db: &Database, username: &str, password: &str) -> Result<&User> {
        self.logout();
        self.state = SessionState::Authenticating;

        let verified = match db.user_credentials(username.trim()) {
            Ok(Some((user, stored))) => match verify_password(password, &stored) {
                Ok(true) => Ok(Some(user)),
                Ok(false) => Ok(None),
                Err(e) => Err(e),
            },
            // Same verification work as a known user with a wrong password
            Ok(None) => dummy_hash()
                .and_then(|hash| verify_password(password, hash))
                .map(|_| None),
            Err(e) => Err(e),
        };

        match verified {
            Ok(Some(user)) => {
                info!(user = %user.username, "Login succeeded");
                self.state = SessionState::Authenticated(user);
                self.user().ok_or(Error::InvalidCredentials)
            }
            Ok(None) => {
                warn!(username = username.trim(), "Login failed");
                self.state = SessionState::Anonymous;
                Err(Error::InvalidCredentials)
            }
            Err(e) => {
                self.state = SessionState::Anonymous;
                Err(e)
            }
        }
    }

    /// Return to `Anonymous`, dropping any in-progress tag edits
    pub fn logout(&mut self) {
        if let SessionState::Authenticated(user) = &self.state {
            info!(user = %user.username, "Logged out");
        }
        self.state = SessionState::Anonymous;
        self.active_tag_edits.clear();
    }

    /// Access the domain operations; fails unless authenticated
    pub fn gate<'a>(&self, db: &'a Database) -> Result<&'a Database> {
        if self.is_authenticated() {
            Ok(db)
        } else {
            Err(Error::Unauthorized)
        }
    }

    /// Mark a tag as being edited
    pub fn begin_tag_edit(&mut self, tag_id: i64) -> Result<()> {
        if !self.is_authenticated() {
            return Err(Error::Unauthorized);
        }
        self.active_tag_edits.insert(tag_id);
        Ok(())
    }

    pub fn is_editing_tag(&self, tag_id: i64) -> bool {
        self.active_tag_edits.contains(&tag_id)
    }

    /// Abandon an edit; returns false if none was active
    pub fn cancel_tag_edit(&mut self, tag_id: i64) -> bool {
        self.active_tag_edits.remove(&tag_id)
    }

    /// Save the new name for a tag being edited and end the edit
    ///
    /// The edit stays active if the rename is rejected.
    pub fn commit_tag_edit(&mut self, db: &Database, tag_id: i64, new_name: &str) -> Result<usize> {
        let db = self.gate(db)?;
        if !self.is_editing_tag(tag_id) {
            return Err(Error::Validation(format!(
                "Tag {} is not being edited",
                tag_id
            )));
        }
        let relabelled = db.rename_tag(tag_id, new_name)?;
        self.active_tag_edits.remove(&tag_id);
        Ok(relabelled)
    }
}
