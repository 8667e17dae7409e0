//! Process configuration, read once at startup from the environment.
//!
//! | Variable | Required | Default |
//! |----------|----------|---------|
//! | `GITHUB_SECRET` | no (deliveries fail with 500 without it) | none |
//! | `TRELLO_API_KEY` | yes | |
//! | `TRELLO_TOKEN` | yes | |
//! | `TRELLO_API_URL` | no | `https://api.trello.com` |
//! | `CARDHOOK_BIND` | no | `0.0.0.0:8080` |
//! | `PORT` | no | overrides the port of the bind address |
//! | `CARDHOOK_LOG_FORMAT` | no | `json` (or `pretty`) |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | no | OTLP export disabled |

use std::net::SocketAddr;

use anyhow::{anyhow, bail, Context};
use trello::{TrelloCredentials, TRELLO_API_URL};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// How log events are rendered on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Human-readable text.
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => bail!("CARDHOOK_LOG_FORMAT must be 'json' or 'pretty', got '{other}'"),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub github_secret: Option<String>,
    pub trello: TrelloCredentials,
    pub trello_api_url: String,
    pub bind: SocketAddr,
    pub log_format: LogFormat,
    pub otlp_endpoint: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github_secret", &self.github_secret.as_ref().map(|_| "<redacted>"))
            .field("trello", &self.trello)
            .field("trello_api_url", &self.trello_api_url)
            .field("bind", &self.bind)
            .field("log_format", &self.log_format)
            .field("otlp_endpoint", &self.otlp_endpoint)
            .finish()
    }
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup`. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Names every missing required variable at once, or the first invalid
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get("TRELLO_API_KEY");
        let token = get("TRELLO_TOKEN");

        let mut missing = Vec::new();
        if api_key.is_none() {
            missing.push("TRELLO_API_KEY");
        }
        if token.is_none() {
            missing.push("TRELLO_TOKEN");
        }
        let (Some(api_key), Some(token)) = (api_key, token) else {
            bail!(
                "missing required environment variables: {}",
                missing.join(", ")
            );
        };

        let mut bind: SocketAddr = get("CARDHOOK_BIND")
            .as_deref()
            .unwrap_or(DEFAULT_BIND)
            .parse()
            .context("CARDHOOK_BIND is not a valid socket address")?;
        if let Some(port) = get("PORT") {
            let port = port
                .parse()
                .map_err(|_| anyhow!("PORT must be a port number, got '{port}'"))?;
            bind.set_port(port);
        }

        let log_format = match get("CARDHOOK_LOG_FORMAT") {
            Some(value) => LogFormat::parse(&value)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            github_secret: get("GITHUB_SECRET"),
            trello: TrelloCredentials { api_key, token },
            trello_api_url: get("TRELLO_API_URL").unwrap_or_else(|| TRELLO_API_URL.to_string()),
            bind,
            log_format,
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
