use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "PaperSubmission";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Topic that receives one event per created paper.
pub const EVENT_TOPIC: &str = "paper-events";

const ENV_BIND: &str = "PAPER_SUBMISSION_BIND";
const ENV_DB: &str = "PAPER_SUBMISSION_DB";
const ENV_BROKER_URL: &str = "PAPER_SUBMISSION_BROKER_URL";
const ENV_PUBLISH_TIMEOUT: &str = "PAPER_SUBMISSION_PUBLISH_TIMEOUT_SECS";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_PUBLISH_TIMEOUT_SECS: u64 = 10;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,paper_submission_lib=debug,paper_submission=debug"
    } else {
        "info"
    }
}

/// Get the application data directory
/// ~/PaperSubmission/ on all platforms
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Cannot determine a database location; set PAPER_SUBMISSION_DB")]
    NoDataDir,
}

/// Runtime configuration for the HTTP server and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    /// Kafka REST Proxy base URL. `None` keeps events in-process.
    pub broker_url: Option<String>,
    pub publish_timeout: Duration,
}

impl ServerConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get(ENV_BIND)
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: ENV_BIND,
                reason: e.to_string(),
            })?;

        let db_path = match get(ENV_DB) {
            Some(path) => PathBuf::from(path.trim()),
            None => app_data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("papers.db"),
        };

        let broker_url = match get(ENV_BROKER_URL) {
            Some(url) => {
                let url = url.trim().to_string();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::Invalid {
                        var: ENV_BROKER_URL,
                        reason: format!("expected an http(s) URL, got `{url}`"),
                    });
                }
                Some(url)
            }
            None => None,
        };

        let publish_timeout_secs = match get(ENV_PUBLISH_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: ENV_PUBLISH_TIMEOUT,
                    reason: format!("expected a positive number of seconds, got `{raw}`"),
                })?,
            None => DEFAULT_PUBLISH_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            db_path,
            broker_url,
            publish_timeout: Duration::from_secs(publish_timeout_secs),
        })
    }
}
