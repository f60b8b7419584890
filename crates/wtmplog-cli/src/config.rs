//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default location of the session database, alongside the other system
/// accounting data.
const DEFAULT_DATABASE_PATH: &str = "/var/lib/wtmplog/wtmplog.db";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    ///
    /// Precedence, lowest to highest: built-in defaults, the platform
    /// config file, the explicit `config_path`, then `WTMPLOG_*`
    /// environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("WTMPLOG_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for wtmplog.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wtmplog"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_system_store() {
        let config = Config::default();
        assert_eq!(
            config.database_path,
            PathBuf::from("/var/lib/wtmplog/wtmplog.db")
        );
    }

    #[test]
    fn explicit_config_file_overrides_default() {
        let temp = tempfile::tempdir().unwrap();
        let config_file = temp.path().join("config.toml");
        std::fs::write(&config_file, "database_path = \"/tmp/other.db\"\n").unwrap();

        let config = Config::load_from(Some(&config_file)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
    }

    #[test]
    fn environment_overrides_config_file() {
        figment::Jail::expect_with(|jail| {
            let config_file = jail.directory().join("config.toml");
            jail.create_file("config.toml", "database_path = \"/tmp/from-file.db\"")?;
            jail.set_env("WTMPLOG_DATABASE_PATH", "/tmp/from-env.db");

            let config = Config::load_from(Some(&config_file)).expect("load config");
            assert_eq!(config.database_path, PathBuf::from("/tmp/from-env.db"));
            Ok(())
        });
    }
}
