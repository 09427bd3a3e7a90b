//! Application configuration.
//!
//! Values are resolved from, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `config.yaml` in the working directory (path overridable with `USERDESK_CONFIG`)
//! 3. `.env` file (loaded into the process environment by `dotenvy`)
//! 4. Environment variables, named after the dotted key with `.` replaced by
//!    `_` and upper-cased (`server.port` -> `SERVER_PORT`)
//!
//! # Keys
//!
//! ## Required
//! - `database.dsn` - `PostgreSQL` connection string
//!
//! ## Optional
//! - `server.host` - Bind host (default: localhost)
//! - `server.port` - Listen port (default: 8080)
//! - `server.shutdown_grace_secs` - In-flight request grace period on shutdown (default: 5)
//! - `database.max_connections` - Pool size (default: 25)
//! - `database.min_connections` - Connections kept warm (default: 5)
//! - `database.max_lifetime_secs` - Connection recycle age (default: 300)
//! - `database.query_timeout_secs` - Per-query deadline (default: 5)
//! - `templates.path` - Static asset directory served at `/static`
//! - `sentry.dsn` - Sentry error tracking DSN

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Config file read when `USERDESK_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 5;
const DEFAULT_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_MIN_CONNECTIONS: u32 = 5;
const DEFAULT_MAX_LIFETIME_SECS: u64 = 300;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;
const DEFAULT_TEMPLATES_PATH: &str = "crates/web/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is empty (set it in the config file or env {1})")]
    MissingValue(&'static str, String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Failed to read config file {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    FileParse(PathBuf, serde_yaml::Error),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub templates: TemplatesConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long shutdown waits for in-flight requests.
    pub shutdown_grace: Duration,
}

/// Connection pool settings.
///
/// The DSN usually carries a password, so it is kept secret and redacted
/// from `Debug` output.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub dsn: SecretString,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    /// Deadline applied to every repository call.
    pub query_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct TemplatesConfig {
    /// Directory of runtime assets served under `/static`.
    pub path: PathBuf,
}

/// The optional YAML layer. Every field may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServer,
    pub database: FileDatabase,
    pub templates: FileTemplates,
    pub sentry: FileSentry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileServer {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub shutdown_grace_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileDatabase {
    pub dsn: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub max_lifetime_secs: Option<u64>,
    pub query_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileTemplates {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileSentry {
    pub dsn: Option<String>,
}

impl AppConfig {
    /// Load configuration from the config file and the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file exists but cannot be read or
    /// parsed, an environment override does not parse, or `database.dsn` is
    /// empty.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let path = std::env::var("USERDESK_CONFIG")
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        let file = read_config_file(&path)?;

        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from a parsed file layer and an environment
    /// lookup. Empty environment values count as unset.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(&env_key(key)).filter(|v| !v.is_empty());

        let server = ServerConfig {
            host: env("server.host")
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: resolve(&env, "server.port", file.server.port, DEFAULT_PORT)?,
            shutdown_grace: Duration::from_secs(resolve(
                &env,
                "server.shutdown_grace_secs",
                file.server.shutdown_grace_secs,
                DEFAULT_SHUTDOWN_GRACE_SECS,
            )?),
        };

        let dsn = env("database.dsn")
            .or(file.database.dsn)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingValue("database.dsn", env_key("database.dsn")))?;

        let database = DatabaseConfig {
            dsn: SecretString::from(dsn),
            max_connections: resolve(
                &env,
                "database.max_connections",
                file.database.max_connections,
                DEFAULT_MAX_CONNECTIONS,
            )?,
            min_connections: resolve(
                &env,
                "database.min_connections",
                file.database.min_connections,
                DEFAULT_MIN_CONNECTIONS,
            )?,
            max_lifetime: Duration::from_secs(resolve(
                &env,
                "database.max_lifetime_secs",
                file.database.max_lifetime_secs,
                DEFAULT_MAX_LIFETIME_SECS,
            )?),
            query_timeout: Duration::from_secs(resolve(
                &env,
                "database.query_timeout_secs",
                file.database.query_timeout_secs,
                DEFAULT_QUERY_TIMEOUT_SECS,
            )?),
        };

        let templates = TemplatesConfig {
            path: PathBuf::from(
                env("templates.path")
                    .or(file.templates.path)
                    .unwrap_or_else(|| DEFAULT_TEMPLATES_PATH.to_owned()),
            ),
        };

        let sentry_dsn = env("sentry.dsn")
            .or(file.sentry.dsn)
            .filter(|v| !v.is_empty());

        Ok(Self {
            server,
            database,
            templates,
            sentry_dsn,
        })
    }
}

impl ServerConfig {
    /// Address string for `TcpListener::bind`. Host names are resolved there.
    #[must_use]
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment variable name for a dotted config key.
#[must_use]
pub fn env_key(key: &str) -> String {
    key.replace('.', "_").to_uppercase()
}

/// Read the YAML layer. A missing file is an empty layer.
fn read_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config_file(path, &content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(e) => Err(ConfigError::FileRead(path.to_owned(), e)),
    }
}

fn parse_config_file(path: &Path, content: &str) -> Result<FileConfig, ConfigError> {
    // An empty document deserializes as unit, not as an empty mapping
    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ConfigError::FileParse(path.to_owned(), e))
}

/// Environment value, then file value, then default.
fn resolve<T>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
    file_value: Option<T>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(env_key(key), e.to_string())),
        None => Ok(file_value.unwrap_or(default)),
    }
}
