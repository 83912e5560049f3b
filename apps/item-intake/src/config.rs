//! Service configuration
//!
//! Everything comes from the process environment (optionally seeded from a
//! `.env` file). Missing backend settings abort startup instead of failing
//! individual requests.

use std::fmt;
use std::str::FromStr;

use itemdrop_domain::ingestion::IngestionConfig;
use itemdrop_s3::infrastructure::StorageCredentials;
use thiserror::Error;

/// Headroom for the non-image JSON fields on top of the encoded image
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Errors raised while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Shape of emitted log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `text` or `json`, got `{}`", other)),
        }
    }
}

/// Runtime configuration of the intake service
#[derive(Clone)]
pub struct IntakeConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub storage: StorageCredentials,
    pub bucket: String,
    pub max_image_bytes: usize,
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl IntakeConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &'static str, default: &str| {
            lookup(key).unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse(
                "DATABASE_MAX_CONNECTIONS",
                optional("DATABASE_MAX_CONNECTIONS", "5"),
            )?,
            run_migrations: parse_bool("RUN_MIGRATIONS", optional("RUN_MIGRATIONS", "true"))?,
            storage: StorageCredentials {
                endpoint: required("STORAGE_ENDPOINT")?,
                region: optional("STORAGE_REGION", "us-east-1"),
                access_key_id: required("STORAGE_ACCESS_KEY_ID")?,
                secret_access_key: required("STORAGE_SECRET_ACCESS_KEY")?,
            },
            bucket: optional("ITEM_IMAGE_BUCKET", "item-images"),
            max_image_bytes: parse(
                "MAX_IMAGE_BYTES",
                optional(
                    "MAX_IMAGE_BYTES",
                    &IngestionConfig::default().max_image_bytes.to_string(),
                ),
            )?,
            host: optional("INTAKE_HOST", "0.0.0.0"),
            port: parse("INTAKE_PORT", optional("INTAKE_PORT", "3000"))?,
            log_format: parse("LOG_FORMAT", optional("LOG_FORMAT", "text"))?,
        })
    }

    /// Domain-level settings for the ingestion service
    pub fn ingestion(&self) -> IngestionConfig {
        IngestionConfig {
            max_image_bytes: self.max_image_bytes,
        }
    }

    /// Largest request body accepted, sized for a base64-encoded maximal image
    pub fn request_body_limit(&self) -> usize {
        request_body_limit(self.max_image_bytes)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for IntakeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntakeConfig")
            .field("database_url", &"<redacted>")
            .field("database_max_connections", &self.database_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("storage", &self.storage)
            .field("bucket", &self.bucket)
            .field("max_image_bytes", &self.max_image_bytes)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .finish()
    }
}

/// Body limit for a decoded image limit: base64 grows data by 4/3
pub fn request_body_limit(max_image_bytes: usize) -> usize {
    max_image_bytes.div_ceil(3) * 4 + BODY_OVERHEAD_BYTES
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
        value,
    })
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://intake:pw@localhost/items"),
        ("STORAGE_ENDPOINT", "http://localhost:9000"),
        ("STORAGE_ACCESS_KEY_ID", "key"),
        ("STORAGE_SECRET_ACCESS_KEY", "secret"),
    ];

    #[test]
    fn test_defaults_apply() {
        let config = IntakeConfig::from_lookup(env(REQUIRED)).unwrap();

        assert_eq!(config.bucket, "item-images");
        assert_eq!(config.storage.region, "us-east-1");
        assert_eq!(config.max_image_bytes, 10 * 1024 * 1024);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.run_migrations);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_log_format() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("LOG_FORMAT", "JSON"));
        let config = IntakeConfig::from_lookup(env(&pairs)).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("LOG_FORMAT", "yaml"));
        let err = IntakeConfig::from_lookup(env(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "LOG_FORMAT", .. }));
    }

    #[test]
    fn test_missing_required_values_fail() {
        for (missing, _) in REQUIRED {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .copied()
                .filter(|(key, _)| key != missing)
                .collect();
            let err = IntakeConfig::from_lookup(env(&pairs)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(*missing));
        }
    }

    #[test]
    fn test_blank_required_value_counts_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("DATABASE_URL", "   ");

        let err = IntakeConfig::from_lookup(env(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_invalid_numbers_are_reported() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("INTAKE_PORT", "eighty"));

        let err = IntakeConfig::from_lookup(env(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "INTAKE_PORT", .. }));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("ITEM_IMAGE_BUCKET", "uploads"),
            ("MAX_IMAGE_BYTES", "3000"),
            ("RUN_MIGRATIONS", "off"),
            ("INTAKE_PORT", "8080"),
        ]);

        let config = IntakeConfig::from_lookup(env(&pairs)).unwrap();
        assert_eq!(config.bucket, "uploads");
        assert_eq!(config.ingestion().max_image_bytes, 3000);
        assert!(!config.run_migrations);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_request_body_limit_covers_encoded_image() {
        assert_eq!(request_body_limit(3), 4 + BODY_OVERHEAD_BYTES);
        assert_eq!(request_body_limit(4), 8 + BODY_OVERHEAD_BYTES);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = IntakeConfig::from_lookup(env(REQUIRED)).unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("pw@"));
        assert!(!debug.contains("\"secret\""));
    }
}
