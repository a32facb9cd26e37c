//! Seeder configuration
//!
//! Connection coordinates are resolved on every invocation. Process
//! settings (where the batch comes from, endpoint overrides, log format)
//! are resolved once at startup.

use crate::error::ConfigError;
use crate::logging::LogFormat;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

/// Aurora cluster ARN the statements run against
pub const CLUSTER_ARN_VAR: &str = "MAINT_DB_CLUSTER_ARN";
/// Secrets Manager ARN holding the database credentials
pub const SECRET_ARN_VAR: &str = "MAINT_DB_SECRET_ARN";
/// Target database name
pub const DATABASE_NAME_VAR: &str = "DEFAULT_DATABASE_NAME";

/// Directory holding `manifest.txt` and the statement files
pub const SQL_DIR_VAR: &str = "MAINT_SEED_SQL_DIR";
/// Endpoint override for the RDS Data API client
pub const DATA_API_ENDPOINT_VAR: &str = "MAINT_SEED_DATA_API_ENDPOINT";
/// `json`, `pretty`, or `plain`
pub const LOG_FORMAT_VAR: &str = "MAINT_SEED_LOG_FORMAT";

/// The three coordinates every Data API request carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCoordinates {
    pub cluster_arn: String,
    pub secret_arn: String,
    pub database: String,
}

impl ConnectionCoordinates {
    pub fn new(
        cluster_arn: impl Into<String>,
        secret_arn: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            cluster_arn: cluster_arn.into(),
            secret_arn: secret_arn.into(),
            database: database.into(),
        }
    }

    /// Load coordinates from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load coordinates through an arbitrary key lookup.
    ///
    /// Every missing or blank variable is reported, not just the first. A
    /// value made only of whitespace counts as missing, so `"  "` is
    /// rejected even though it is a non-empty string.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &str| match lookup(key) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(key.to_string());
                String::new()
            }
        };

        let cluster_arn = required(CLUSTER_ARN_VAR);
        let secret_arn = required(SECRET_ARN_VAR);
        let database = required(DATABASE_NAME_VAR);

        if !missing.is_empty() {
            return Err(ConfigError::MissingRequired(missing));
        }

        Ok(Self {
            cluster_arn,
            secret_arn,
            database,
        })
    }
}

/// Process-level settings, read once at startup
#[derive(Debug, Clone, Default)]
pub struct SeederSettings {
    /// Load the batch from this directory instead of the embedded one
    pub sql_dir: Option<PathBuf>,
    /// RDS Data API endpoint override
    pub data_api_endpoint: Option<String>,
    /// Log output format, when set explicitly
    pub log_format: Option<LogFormat>,
}

impl SeederSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let log_format = match non_blank(LOG_FORMAT_VAR) {
            Some(value) => Some(value.parse().map_err(|_| {
                ConfigError::invalid_value(LOG_FORMAT_VAR, value, "json, pretty, or plain")
            })?),
            None => None,
        };

        Ok(Self {
            sql_dir: non_blank(SQL_DIR_VAR).map(PathBuf::from),
            data_api_endpoint: non_blank(DATA_API_ENDPOINT_VAR),
            log_format,
        })
    }

    pub fn with_sql_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sql_dir = Some(dir.into());
        self
    }

    pub fn with_data_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.data_api_endpoint = Some(endpoint.into());
        self
    }
}
