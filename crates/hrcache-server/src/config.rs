//! Layered settings for the cache layer.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file,
//! and `HRCACHE_*` environment variables (`__` separates nested keys, so
//! `HRCACHE_REDIS__HOST` sets `redis.host`).

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use hrcache_store::RedisConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime used in the development profile when none is configured.
pub const DEBUG_DEFAULT_TTL_SECS: u64 = 900;

/// Lifetime used outside the development profile when none is configured (30 days).
pub const PRODUCTION_DEFAULT_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Environment variable naming the optional settings file.
pub const CONFIG_FILE_ENV: &str = "HRCACHE_CONFIG_FILE";

const ENV_PREFIX: &str = "HRCACHE";

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// Settings were read but a value is out of range.
    #[error("invalid setting '{key}': {message}")]
    Invalid { key: String, message: String },
}

impl SettingsError {
    fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Which store backs the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackendKind {
    Memory,
    #[default]
    Files,
    Redis,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Files => "files",
            BackendKind::Redis => "redis",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "files" | "file" => Ok(BackendKind::Files),
            "redis" => Ok(BackendKind::Redis),
            other => Err(format!(
                "unknown cache backend '{}', expected memory, files or redis",
                other
            )),
        }
    }
}

impl TryFrom<String> for BackendKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackendKind> for String {
    fn from(kind: BackendKind) -> Self {
        kind.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    pub max_capacity: u64,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    pub location: PathBuf,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            location: PathBuf::from("hrcache_data"),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub database: u8,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6380,
            password: None,
            database: 0,
        }
    }
}

// Password stays out of logs.
impl fmt::Debug for RedisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .finish()
    }
}

/// Admin HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8890,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| SettingsError::invalid("server.host", format!("{}", e)))
    }
}

/// Complete settings of the cache layer.
///
/// # Example
///
/// ```
/// use hrcache_server::config::{BackendKind, CacheSettings};
///
/// let settings = CacheSettings::from_toml_str(
///     r#"
///     debug = false
///     backend = "redis"
///
///     [redis]
///     host = "cache.internal"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(settings.backend, BackendKind::Redis);
/// assert_eq!(settings.default_ttl().as_secs(), 2_592_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Global cache flag. When false every accessor is a no-op.
    pub active: bool,
    /// Development profile: short default TTL, plain Redis without password.
    pub debug: bool,
    pub backend: BackendKind,
    /// Explicit default lifetime; zero or negative falls back to the profile default.
    pub default_ttl_seconds: Option<i64>,
    /// Upper bound for a single store call.
    pub operation_timeout_ms: u64,
    pub memory: MemorySettings,
    pub files: FileSettings,
    pub redis: RedisSettings,
    pub server: ServerSettings,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            active: true,
            debug: true,
            backend: BackendKind::default(),
            default_ttl_seconds: None,
            operation_timeout_ms: 1000,
            memory: MemorySettings::default(),
            files: FileSettings::default(),
            redis: RedisSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl CacheSettings {
    /// Loads settings from the optional file and the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(config_file, None)
    }

    /// Same as [`CacheSettings::load`] but reads variables from `env` instead
    /// of the process environment when given.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let settings: CacheSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parses settings from TOML text, ignoring the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        let settings: CacheSettings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.operation_timeout_ms == 0 {
            return Err(SettingsError::invalid(
                "operation_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.memory.max_capacity == 0 {
            return Err(SettingsError::invalid(
                "memory.max_capacity",
                "must be greater than zero",
            ));
        }
        if self.backend == BackendKind::Files && self.files.location.as_os_str().is_empty() {
            return Err(SettingsError::invalid("files.location", "must not be empty"));
        }
        if self.backend == BackendKind::Redis && self.redis.host.trim().is_empty() {
            return Err(SettingsError::invalid("redis.host", "must not be empty"));
        }
        Ok(())
    }

    /// Lifetime applied when a caller passes no TTL, or a zero/negative one.
    pub fn default_ttl(&self) -> Duration {
        match self.default_ttl_seconds {
            Some(seconds) if seconds > 0 => Duration::from_secs(seconds as u64),
            _ if self.debug => Duration::from_secs(DEBUG_DEFAULT_TTL_SECS),
            _ => Duration::from_secs(PRODUCTION_DEFAULT_TTL_SECS),
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Redis connection parameters for the active profile.
    ///
    /// Outside debug the connection uses TLS and carries the password.
    pub fn redis_config(&self) -> RedisConfig {
        RedisConfig {
            host: self.redis.host.clone(),
            port: self.redis.port,
            database: self.redis.database,
            password: if self.debug {
                None
            } else {
                self.redis.password.clone()
            },
            tls: !self.debug,
        }
    }
}
