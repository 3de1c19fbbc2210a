//! Configuration file handling
//!
//! Settings come from an optional TOML file:
//!
//! ```toml
//! [database]
//! path = "/srv/tally/tally.db"
//!
//! [export]
//! dir = "/srv/tally/exports"
//! ```
//!
//! The database path can be overridden by the `TALLY_DB` environment
//! variable, and the CLI's `--db` flag overrides both.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable overriding the database path
pub const DB_ENV_VAR: &str = "TALLY_DB";

/// Database file used when nothing else is configured
pub const DEFAULT_DB_FILE: &str = "tally.db";

/// Resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    /// Directory relative export paths are resolved against
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_FILE),
            export_dir: PathBuf::from("."),
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config.toml"))
}

impl Config {
    /// Load settings (explicit path first, then the default location)
    ///
    /// An explicit path must exist; a missing default file just means
    /// defaults. `TALLY_DB` is applied on top.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let config = match override_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        Ok(config.with_database_override(std::env::var(DB_ENV_VAR).ok()))
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading config");
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Parse config from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();
        if let Some(path) = raw.database.and_then(|d| d.path) {
            config.database_path = path;
        }
        if let Some(dir) = raw.export.and_then(|e| e.dir) {
            config.export_dir = dir;
        }
        Ok(config)
    }

    /// Replace the database path when `path` is set and non-empty
    pub fn with_database_override(mut self, path: Option<String>) -> Self {
        if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        self
    }

    /// Resolve an export target against `export_dir`
    pub fn export_path(&self, target: &Path) -> PathBuf {
        if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.export_dir.join(target)
        }
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    database: Option<RawDatabase>,
    export: Option<RawExport>,
}

#[derive(Debug, Deserialize)]
struct RawDatabase {
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawExport {
    dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
            [database]
            path = "/srv/tally/data.db"

            [export]
            dir = "/srv/tally/out"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/tally/data.db"));
        assert_eq!(config.export_dir, PathBuf::from("/srv/tally/out"));
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());

        let partial = Config::parse("[export]\ndir = \"out\"").unwrap();
        assert_eq!(partial.database_path, PathBuf::from(DEFAULT_DB_FILE));
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        assert!(matches!(
            Config::parse("[database\npath = 1"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_database_override() {
        let config = Config::default().with_database_override(Some("other.db".to_string()));
        assert_eq!(config.database_path, PathBuf::from("other.db"));

        let unchanged = Config::default().with_database_override(Some("  ".to_string()));
        assert_eq!(unchanged.database_path, PathBuf::from(DEFAULT_DB_FILE));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[export]\ndir = \"decks\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.export_dir, PathBuf::from("decks"));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(missing.as_path())),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_export_path() {
        let config = Config {
            export_dir: PathBuf::from("/exports"),
            ..Config::default()
        };
        assert_eq!(
            config.export_path(Path::new("deck.json")),
            PathBuf::from("/exports/deck.json")
        );
        assert_eq!(
            config.export_path(Path::new("/tmp/deck.json")),
            PathBuf::from("/tmp/deck.json")
        );
    }
}
