//! Provisioner configuration loaded from environment variables.
//!
//! The endpoint and the service credential have no defaults. Everything
//! else falls back to a value that works against a stock Supabase project.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_SQL_EXECUTOR: &str = "execute_sql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Placeholder keys copied from sample `.env` files. Never valid.
const PLACEHOLDER_KEYS: &[&str] = &[
    "your-service-role-key",
    "change-me",
    "changeme",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{0} is still a placeholder value")]
    Placeholder(&'static str),

    #[error("{var} is invalid ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Service-role credential. Sent as both the `apikey` header and the bearer
/// token; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceKey(String);

impl ServiceKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    /// Project URL, e.g. `https://abcd.supabase.co`.
    /// Env: `CHATBASE_URL`
    pub project_url: String,

    /// Env: `CHATBASE_SERVICE_KEY`
    pub service_key: ServiceKey,

    /// Name of the remote SQL-execution function.
    /// Env: `CHATBASE_SQL_EXECUTOR`
    /// Default: `execute_sql`
    pub sql_executor: String,

    /// Per-request timeout.
    /// Env: `CHATBASE_HTTP_TIMEOUT_SECS`
    /// Default: `10`
    pub timeout: Duration,
}

impl ProvisionerConfig {
    pub fn new(project_url: impl Into<String>, service_key: ServiceKey) -> Self {
        Self {
            project_url: project_url.into(),
            service_key,
            sql_executor: DEFAULT_SQL_EXECUTOR.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let project_url = get("CHATBASE_URL").ok_or(ConfigError::Missing("CHATBASE_URL"))?;
        if !(project_url.starts_with("https://") || project_url.starts_with("http://")) {
            return Err(ConfigError::Invalid {
                var: "CHATBASE_URL",
                value: project_url,
                reason: "expected an http:// or https:// URL",
            });
        }

        let key = get("CHATBASE_SERVICE_KEY").ok_or(ConfigError::Missing("CHATBASE_SERVICE_KEY"))?;
        if PLACEHOLDER_KEYS.contains(&key.as_str()) {
            return Err(ConfigError::Placeholder("CHATBASE_SERVICE_KEY"));
        }

        let mut config = Self::new(project_url, ServiceKey::new(key));

        if let Some(name) = get("CHATBASE_SQL_EXECUTOR") {
            if !is_identifier(&name) {
                return Err(ConfigError::Invalid {
                    var: "CHATBASE_SQL_EXECUTOR",
                    value: name,
                    reason: "expected a plain SQL identifier",
                });
            }
            config.sql_executor = name;
        }

        if let Some(raw) = get("CHATBASE_HTTP_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "CHATBASE_HTTP_TIMEOUT_SECS",
                        value: raw,
                        reason: "expected a positive number of seconds",
                    });
                }
            }
        }

        Ok(config)
    }

    /// Base of the REST data API.
    pub fn rest_base(&self) -> String {
        format!("{}/rest/v1", self.project_url.trim_end_matches('/'))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
