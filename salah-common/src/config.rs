//! Configuration resolution for the salah service
//!
//! Settings resolve through a 4-tier priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`SALAH_API_HOST`, `SALAH_API_PORT`, `SALAH_API_DATABASE`)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use serde::Deserialize;
use std::path::PathBuf;

/// Default listen port for salah-api
pub const DEFAULT_PORT: u16 = 5820;

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// SQLite database file path
    pub database: PathBuf,
}

/// Optional settings read from the TOML config file
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
}

impl ServiceConfig {
    /// Resolve configuration from CLI arguments, environment and config file
    pub fn resolve(
        cli_host: Option<String>,
        cli_port: Option<u16>,
        cli_database: Option<PathBuf>,
    ) -> Self {
        let env = FileConfig {
            host: std::env::var("SALAH_API_HOST").ok(),
            port: std::env::var("SALAH_API_PORT")
                .ok()
                .and_then(|raw| raw.parse().ok()),
            database: std::env::var("SALAH_API_DATABASE").ok().map(PathBuf::from),
        };
        let file = load_file_config().unwrap_or_default();
        Self::merge(cli_host, cli_port, cli_database, env, file)
    }

    /// Pure merge of the four tiers, highest priority first
    fn merge(
        cli_host: Option<String>,
        cli_port: Option<u16>,
        cli_database: Option<PathBuf>,
        env: FileConfig,
        file: FileConfig,
    ) -> Self {
        Self {
            host: cli_host
                .or(env.host)
                .or(file.host)
                .unwrap_or_else(|| "127.0.0.1".to_string()),
            port: cli_port.or(env.port).or(file.port).unwrap_or(DEFAULT_PORT),
            database: cli_database
                .or(env.database)
                .or(file.database)
                .unwrap_or_else(default_database_path),
        }
    }
}

/// Locate and parse the TOML config file, if any
fn load_file_config() -> Option<FileConfig> {
    let path = config_file_path()?;
    let raw = std::fs::read_to_string(&path).ok()?;
    match toml::from_str(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!("Ignoring malformed config file {}: {}", path.display(), err);
            None
        }
    }
}

/// Config file location: `~/.config/salah/config.toml`, then (Linux only)
/// `/etc/salah/config.toml`
fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|dir| dir.join("salah").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }
    if cfg!(target_os = "linux") {
        let system = PathBuf::from("/etc/salah/config.toml");
        if system.exists() {
            return Some(system);
        }
    }
    None
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("salah"))
        .unwrap_or_else(|| PathBuf::from("./salah_data"))
        .join("salah.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_wins_over_all_tiers() {
        let env = FileConfig {
            host: Some("env-host".into()),
            port: Some(1111),
            database: Some("env.db".into()),
        };
        let file = FileConfig {
            host: Some("file-host".into()),
            port: Some(2222),
            database: Some("file.db".into()),
        };
        let config = ServiceConfig::merge(
            Some("cli-host".into()),
            Some(3333),
            Some("cli.db".into()),
            env,
            file,
        );
        assert_eq!(config.host, "cli-host");
        assert_eq!(config.port, 3333);
        assert_eq!(config.database, PathBuf::from("cli.db"));
    }

    #[test]
    fn test_env_wins_over_file() {
        let env = FileConfig {
            host: Some("env-host".into()),
            port: None,
            database: None,
        };
        let file = FileConfig {
            host: Some("file-host".into()),
            port: Some(2222),
            database: Some("file.db".into()),
        };
        let config = ServiceConfig::merge(None, None, None, env, file);
        assert_eq!(config.host, "env-host");
        assert_eq!(config.port, 2222);
        assert_eq!(config.database, PathBuf::from("file.db"));
    }

    #[test]
    fn test_compiled_defaults() {
        let config =
            ServiceConfig::merge(None, None, None, FileConfig::default(), FileConfig::default());
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database.ends_with("salah.db"));
    }

    #[test]
    fn test_file_config_parses_partial_toml() {
        let config: FileConfig = toml::from_str("port = 8080").unwrap();
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.host, None);
        assert_eq!(config.database, None);
    }
}
