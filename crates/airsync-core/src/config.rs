use std::fmt;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AirsyncError, Result};

pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0";
pub const DEFAULT_WRITER_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_SYNC_BATCH_SIZE: u32 = 100;
pub const MAX_SYNC_BATCH_SIZE: u32 = 10_000;
pub const DEFAULT_DATABASE: &str = "air_quality";

/// Env var naming the TOML file to load.
pub const CONFIG_PATH_ENV: &str = "AIRSYNC_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "airsync.toml";

/// Flat variable names of existing deployments that hold text, mapped
/// onto config keys. Their values are taken verbatim, so `007` stays `007`.
const LEGACY_TEXT_ENV: &[(&str, &str)] = &[
    ("MYSQL_HOST", "primary.host"),
    ("MYSQL_USER", "primary.user"),
    ("MYSQL_PASSWORD", "primary.password"),
    ("MYSQL_DATABASE", "primary.database"),
    ("PG_HOST", "secondary.host"),
    ("PG_USER", "secondary.user"),
    ("PG_PASSWORD", "secondary.password"),
    ("PG_DATABASE", "secondary.database"),
];

/// Flat numeric variables, parsed by figment.
const LEGACY_NUMERIC_ENV: &[(&str, &str)] = &[
    ("MYSQL_PORT", "primary.port"),
    ("PG_PORT", "secondary.port"),
    ("DATA_INTERVAL_SECONDS", "writer.interval_secs"),
    ("PORT", "http.port"),
];

/// Top-level config (airsync.toml + legacy env + AIRSYNC_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirsyncConfig {
    /// MySQL store readings are written to.
    pub primary: StoreConfig,
    /// PostgreSQL mirror.
    pub secondary: StoreConfig,
    pub writer: WriterConfig,
    pub replication: ReplicationConfig,
    pub http: HttpConfig,
}

impl Default for AirsyncConfig {
    fn default() -> Self {
        Self {
            primary: StoreConfig {
                host: "localhost".to_string(),
                port: 3306,
                user: "root".to_string(),
                password: String::new(),
                database: DEFAULT_DATABASE.to_string(),
                ssl_mode: SslMode::default(),
            },
            secondary: StoreConfig {
                host: "localhost".to_string(),
                port: 5432,
                user: "postgres".to_string(),
                password: String::new(),
                database: DEFAULT_DATABASE.to_string(),
                ssl_mode: SslMode::default(),
            },
            writer: WriterConfig::default(),
            replication: ReplicationConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// Connection parameters for one relational store.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(deserialize_with = "text")]
    pub host: String,
    pub port: u16,
    #[serde(deserialize_with = "text")]
    pub user: String,
    #[serde(deserialize_with = "text")]
    pub password: String,
    #[serde(deserialize_with = "text")]
    pub database: String,
    #[serde(default)]
    pub ssl_mode: SslMode,
}

impl StoreConfig {
    /// `user@host:port/database`, safe to log.
    pub fn summary(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

/// Accepts a string, or a scalar an env provider parsed out of one
/// (`AIRSYNC_PRIMARY__PASSWORD=123456` arrives as an integer).
fn text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Str(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Str(s) => s,
        Scalar::Unsigned(n) => n.to_string(),
        Scalar::Signed(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    })
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    Disable,
    /// Use TLS when the server offers it, without verifying the certificate.
    #[default]
    Prefer,
    Require,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriterConfig {
    pub interval_secs: u64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_WRITER_INTERVAL_SECS,
        }
    }
}

impl WriterConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationConfig {
    pub interval_secs: u64,
    /// Most recent rows copied per tick.
    pub batch_size: u32,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            batch_size: DEFAULT_SYNC_BATCH_SIZE,
        }
    }
}

impl ReplicationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// When false no listener is opened; the periodic tasks still run.
    pub enabled: bool,
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: DEFAULT_HTTP_BIND.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

impl AirsyncConfig {
    /// Load config from defaults, a TOML file and the environment.
    ///
    /// The file is the explicit path argument, else `$AIRSYNC_CONFIG`, else
    /// `./airsync.toml`. A missing file is not an error.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let config: AirsyncConfig = Self::figment(&path)
            .extract()
            .map_err(|e| AirsyncError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Provider chain, lowest priority first.
    pub fn figment(path: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(AirsyncConfig::default()))
            .merge(Toml::file(path))
            .merge(legacy_numeric_env());
        for &(name, key) in LEGACY_TEXT_ENV {
            if let Ok(value) = std::env::var(name) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment.merge(Env::prefixed("AIRSYNC_").split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.writer.interval_secs == 0 {
            return Err(AirsyncError::Validation(
                "writer.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.replication.interval_secs == 0 {
            return Err(AirsyncError::Validation(
                "replication.interval_secs must be greater than zero".to_string(),
            ));
        }
        if !(1..=MAX_SYNC_BATCH_SIZE).contains(&self.replication.batch_size) {
            return Err(AirsyncError::Validation(format!(
                "replication.batch_size must be between 1 and {MAX_SYNC_BATCH_SIZE}, got {}",
                self.replication.batch_size
            )));
        }
        for (name, store) in [("primary", &self.primary), ("secondary", &self.secondary)] {
            if store.host.trim().is_empty() {
                return Err(AirsyncError::Validation(format!("{name}.host is empty")));
            }
            if store.database.trim().is_empty() {
                return Err(AirsyncError::Validation(format!("{name}.database is empty")));
            }
        }
        Ok(())
    }
}

fn legacy_numeric_env() -> Env {
    let names: Vec<&str> = LEGACY_NUMERIC_ENV.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        LEGACY_NUMERIC_ENV
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, path)| *path)
            .unwrap_or_else(|| key.as_str())
            .into()
    })
}
