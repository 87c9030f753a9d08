//! Service configuration
//!
//! Resolution follows the priority order: command-line argument, then
//! environment variable, then TOML config file, then compiled default.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use pht_common::auth::AuthTokens;
use pht_common::{Error, Result};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5760;

/// Command-line arguments for pht-engine
///
/// Environment variables act as fallbacks for unset flags, which gives the
/// CLI > env part of the priority order for free.
#[derive(Parser, Debug, Default)]
#[command(name = "pht-engine")]
#[command(about = "Tournament round & voting engine")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PHT_PORT")]
    pub port: Option<u16>,

    /// SQLite database path
    #[arg(long, env = "PHT_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Run against an in-memory store (state is lost on exit)
    #[arg(long, env = "PHT_MEMORY", default_value_t = false)]
    pub memory: bool,

    /// Token granting the admin role
    #[arg(long, env = "PHT_ADMIN_TOKEN")]
    pub admin_token: Option<String>,

    /// Token granting the player role
    #[arg(long, env = "PHT_PLAYER_TOKEN")]
    pub player_token: Option<String>,

    /// Explicit config file path
    #[arg(long, env = "PHT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// TOML config file contents; every field optional
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub port: Option<u16>,
    pub db_path: Option<PathBuf>,
    pub admin_token: Option<String>,
    pub player_token: Option<String>,
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub memory: bool,
    pub admin_token: Option<String>,
    pub player_token: Option<String>,
}

impl Config {
    /// Resolve configuration from arguments, an optional TOML file, and
    /// defaults
    pub fn resolve(args: Args) -> Result<Self> {
        let file = match &args.config {
            // an explicitly named file must load
            Some(path) => load_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => load_file(&path)?,
                _ => FileConfig::default(),
            },
        };

        Ok(Config {
            port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
            db_path: args
                .db_path
                .or(file.db_path)
                .unwrap_or_else(default_db_path),
            memory: args.memory,
            admin_token: args.admin_token.or(file.admin_token),
            player_token: args.player_token.or(file.player_token),
        })
    }

    /// Token configuration for role resolution
    pub fn auth_tokens(&self) -> AuthTokens {
        AuthTokens::new(self.admin_token.clone(), self.player_token.clone())
    }
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&raw)
        .map_err(|e| Error::Config(format!("invalid config {}: {}", path.display(), e)))
}

/// Platform config file location (~/.config/pht/config.toml on Linux)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pht").join("config.toml"))
}

/// Platform data location for the SQLite database
fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("pht").join("tourney.db"))
        .unwrap_or_else(|| PathBuf::from("./pht_data/tourney.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        file.write_all(contents.as_bytes())
            .expect("Should write config");
        file
    }

    #[test]
    fn test_cli_beats_file() {
        let file = config_file("port = 6000\nadmin_token = \"from-file\"\n");
        let args = Args {
            port: Some(7000),
            config: Some(file.path().to_path_buf()),
            ..Args::default()
        };
        let config = Config::resolve(args).expect("Should resolve");
        assert_eq!(config.port, 7000);
        assert_eq!(config.admin_token.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_file_beats_default() {
        let file = config_file("port = 6000\n");
        let args = Args {
            config: Some(file.path().to_path_buf()),
            ..Args::default()
        };
        let config = Config::resolve(args).expect("Should resolve");
        assert_eq!(config.port, 6000);
    }

    #[test]
    fn test_defaults_apply_with_empty_file() {
        let file = config_file("");
        let args = Args {
            config: Some(file.path().to_path_buf()),
            ..Args::default()
        };
        let config = Config::resolve(args).expect("Should resolve");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.memory);
        assert!(config.admin_token.is_none());
        assert!(config.auth_tokens().disabled());
    }

    #[test]
    fn test_missing_explicit_config_errors() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/pht/config.toml")),
            ..Args::default()
        };
        assert!(Config::resolve(args).is_err());
    }

    #[test]
    fn test_invalid_toml_errors() {
        let file = config_file("port = \"not a number\"\n");
        let args = Args {
            config: Some(file.path().to_path_buf()),
            ..Args::default()
        };
        assert!(Config::resolve(args).is_err());
    }

    #[test]
    #[serial]
    fn test_env_fills_unset_flags() {
        std::env::set_var("PHT_PORT", "9100");
        let args = Args::try_parse_from(["pht-engine"]).expect("Should parse");
        std::env::remove_var("PHT_PORT");
        assert_eq!(args.port, Some(9100));
    }

    #[test]
    #[serial]
    fn test_cli_beats_env() {
        std::env::set_var("PHT_PORT", "9100");
        let args =
            Args::try_parse_from(["pht-engine", "--port", "9200"]).expect("Should parse");
        std::env::remove_var("PHT_PORT");
        assert_eq!(args.port, Some(9200));
    }
}
