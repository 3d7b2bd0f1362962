use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Environment variable supplying the ingestion endpoint when the config does
/// not carry one.
pub const ENDPOINT_ENV: &str = "COURIER_ENDPOINT";

/// Environment variable supplying an optional bearer token for the endpoint.
pub const TOKEN_ENV: &str = "COURIER_API_TOKEN";

/// Failure to establish the transport session at client construction.
///
/// This is the only error surfaced to callers. Once a client handle exists,
/// recording cannot fail and transmission problems stay local to the flush
/// routine.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither the config nor the environment supplies an ingestion endpoint.
    #[error("no ingestion endpoint configured and COURIER_ENDPOINT is not set")]
    MissingEndpoint,
    /// The supplied ingestion endpoint is not a valid URL.
    #[error("invalid ingestion endpoint")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Parameters used by the [`MetricsClient`](crate::MetricsClient).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Wall-clock interval in seconds between scheduled background flushes.
    ///
    /// Defaults to `60` seconds. Only relevant once
    /// [`start`](crate::MetricsClient::start) is called; direct flushes are
    /// not rate limited.
    pub flush_interval: u64,

    /// Identifier of the destination region the client ships to.
    ///
    /// Sent with every outbound request so that multi-region endpoints can
    /// route the batch. Defaults to `"local"`.
    pub region: String,

    /// Explicit ingestion endpoint.
    ///
    /// When unset, the endpoint is resolved from the `COURIER_ENDPOINT`
    /// environment variable at construction time.
    pub endpoint: Option<String>,
}

impl ClientConfig {
    /// Creates a config with the given flush interval and destination region.
    pub fn new(flush_interval: Duration, region: impl Into<String>) -> Self {
        Self {
            flush_interval: flush_interval.as_secs(),
            region: region.into(),
            endpoint: None,
        }
    }

    /// Returns the interval between scheduled background flushes.
    pub fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval)
    }

    /// Resolves the ingestion endpoint from the config or the environment.
    pub(crate) fn resolve_endpoint(&self) -> Result<Url, ConfigError> {
        let raw = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => env::var(ENDPOINT_ENV).map_err(|_| ConfigError::MissingEndpoint)?,
        };

        Ok(Url::parse(&raw)?)
    }

    /// Resolves the optional bearer token from the environment.
    pub(crate) fn resolve_token(&self) -> Option<String> {
        env::var(TOKEN_ENV).ok().filter(|token| !token.is_empty())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            flush_interval: 60,
            region: "local".to_owned(),
            endpoint: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.flush_interval(), Duration::from_secs(60));
        assert_eq!(config.region, "local");
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: ClientConfig = serde_json::from_str(r#"{"flush_interval": 5}"#).unwrap();
        assert_eq!(config.flush_interval(), Duration::from_secs(5));
        assert_eq!(config.region, "local");
    }

    #[test]
    fn test_explicit_endpoint_takes_precedence() {
        let mut config = ClientConfig::new(Duration::from_secs(1), "eu-west-1");
        config.endpoint = Some("https://metrics.example.com/v1/put".to_owned());

        let url = config.resolve_endpoint().unwrap();
        assert_eq!(url.as_str(), "https://metrics.example.com/v1/put");
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = ClientConfig::default();
        config.endpoint = Some("not a url".to_owned());

        assert!(matches!(
            config.resolve_endpoint(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }
}
