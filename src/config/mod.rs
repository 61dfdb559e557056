//! Configuration resolution
//!
//! Three layers, later wins per key: built-in defaults, the optional JSON
//! override file, then command-line flags.

mod cli;
mod schema;

pub use cli::CliArgs;
pub use schema::*;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// File name looked up next to the executable when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "mysql.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("MySQL user is required")]
    MissingUser,
    #[error("MySQL password is required")]
    MissingPassword,
}

/// Resolve the configuration for this run from command-line arguments
pub fn resolve(args: &CliArgs) -> Result<CheckConfig, ConfigError> {
    let path = args.config_file.clone().unwrap_or_else(default_config_path);
    let file = load_overrides(&path)?.unwrap_or_default();
    build(file.merge(ConfigOverrides::from(args)))
}

/// Read an override file, `Ok(None)` when it does not exist
pub fn load_overrides<P: AsRef<Path>>(path: P) -> Result<Option<ConfigOverrides>, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, skipping");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let overrides = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "Loaded config file");
    Ok(Some(overrides))
}

/// Apply defaults to merged overrides and validate credentials
pub fn build(overrides: ConfigOverrides) -> Result<CheckConfig, ConfigError> {
    let username = overrides
        .username
        .filter(|u| !u.is_empty())
        .ok_or(ConfigError::MissingUser)?;
    let password = overrides
        .password
        .filter(|p| !p.is_empty())
        .ok_or(ConfigError::MissingPassword)?;

    let defaults = Thresholds::default();

    Ok(CheckConfig {
        connection: ConnectionConfig {
            host: overrides.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.unwrap_or(DEFAULT_PORT),
            username,
            password,
        },
        thresholds: Thresholds {
            uptime_floor: overrides.uptime.unwrap_or(defaults.uptime_floor),
            warn_conn_pct: overrides.warn_conn.unwrap_or(defaults.warn_conn_pct),
            crit_conn_pct: overrides.crit_conn.unwrap_or(defaults.crit_conn_pct),
            warn_slave_lag: overrides.warn_slave_lag.unwrap_or(defaults.warn_slave_lag),
            crit_slave_lag: overrides.crit_slave_lag.unwrap_or(defaults.crit_slave_lag),
        },
        handlers: overrides.handlers.unwrap_or_default(),
        dry_run: overrides.dryrun.unwrap_or(false),
    })
}

/// `<directory of the running executable>/mysql.json`
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_default()
        .join(DEFAULT_CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn args_with_config(path: &Path) -> CliArgs {
        CliArgs {
            config_file: Some(path.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            username: Some("monitor".into()),
            password: Some("secret".into()),
            ..args_with_config(&dir.path().join("missing.json"))
        };

        let config = resolve(&args).unwrap();
        assert_eq!(config.connection.host, "localhost");
        assert_eq!(config.connection.port, 3306);
        assert_eq!(config.thresholds, Thresholds::default());
        assert!(config.handlers.is_empty());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"{
                "username": "file-user",
                "password": "file-pass",
                "host": "db.local",
                "crit_conn": 95
            }"#,
        );
        let config = resolve(&args_with_config(file.path())).unwrap();
        assert_eq!(config.connection.username, "file-user");
        assert_eq!(config.connection.password, "file-pass");
        assert_eq!(config.connection.host, "db.local");
        assert_eq!(config.thresholds.crit_conn_pct, 95);
        assert_eq!(config.thresholds.warn_conn_pct, 80);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = write_config(
            r#"{
                "username": "file-user",
                "password": "file-pass",
                "warn_conn": 50,
                "handlers": ["mail"]
            }"#,
        );
        let args = CliArgs {
            username: Some("cli-user".into()),
            warn_conn: Some(75),
            handlers: Some(vec!["slack".into()]),
            ..args_with_config(file.path())
        };

        let config = resolve(&args).unwrap();
        assert_eq!(config.connection.username, "cli-user");
        assert_eq!(config.connection.password, "file-pass");
        assert_eq!(config.thresholds.warn_conn_pct, 75);
        assert_eq!(config.handlers, vec!["slack".to_string()]);
    }

    #[test]
    fn test_missing_user() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            password: Some("secret".into()),
            ..args_with_config(&dir.path().join("missing.json"))
        };
        assert!(matches!(resolve(&args), Err(ConfigError::MissingUser)));
    }

    #[test]
    fn test_missing_password() {
        let file = write_config(r#"{"username": "monitor"}"#);
        assert!(matches!(
            resolve(&args_with_config(file.path())),
            Err(ConfigError::MissingPassword)
        ));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let overrides = ConfigOverrides {
            username: Some(String::new()),
            password: Some("secret".into()),
            ..Default::default()
        };
        assert!(matches!(build(overrides), Err(ConfigError::MissingUser)));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let file = write_config("{ not json");
        let args = CliArgs {
            username: Some("monitor".into()),
            password: Some("secret".into()),
            ..args_with_config(file.path())
        };
        assert!(matches!(resolve(&args), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_is_not_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_overrides(dir.path().join("nope.json")).unwrap().is_none());
    }

    #[test]
    fn test_default_config_path_file_name() {
        assert!(default_config_path().ends_with(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_connection_addr() {
        let conn = ConnectionConfig {
            host: "db".into(),
            port: 3306,
            username: "u".into(),
            password: "p".into(),
        };
        assert_eq!(conn.addr(), "db:3306");
    }
}
