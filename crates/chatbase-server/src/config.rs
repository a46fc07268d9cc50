use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is invalid ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Widget server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Env: `CHATBASE_WIDGET_HOST`, default `0.0.0.0`
    pub host: String,
    /// Env: `CHATBASE_WIDGET_PORT`, default `8080`
    pub port: u16,
    /// Directory served for every path that is not the widget itself.
    /// Env: `CHATBASE_WIDGET_ROOT`, default `./public`
    pub root: PathBuf,
    /// File under `root` answered for `/` and `/chat`.
    /// Env: `CHATBASE_WIDGET_INDEX`, default `chat-widget.html`
    pub index: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            root: PathBuf::from("./public"),
            index: "chat-widget.html".to_string(),
        }
    }
}

impl WidgetConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(host) = get("CHATBASE_WIDGET_HOST") {
            config.host = host;
        }

        if let Some(port) = get("CHATBASE_WIDGET_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::Invalid {
                var: "CHATBASE_WIDGET_PORT",
                value: port,
                reason: "expected a port number",
            })?;
        }

        if let Some(root) = get("CHATBASE_WIDGET_ROOT") {
            config.root = PathBuf::from(root);
        }

        if let Some(index) = get("CHATBASE_WIDGET_INDEX") {
            if index.contains('/') || index.contains('\\') || index == ".." {
                return Err(ConfigError::Invalid {
                    var: "CHATBASE_WIDGET_INDEX",
                    value: index,
                    reason: "expected a file name inside the widget root",
                });
            }
            config.index = index;
        }

        Ok(config)
    }

    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            var: "CHATBASE_WIDGET_HOST",
            value: self.host.clone(),
            reason: "expected an IP address",
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index)
    }
}
