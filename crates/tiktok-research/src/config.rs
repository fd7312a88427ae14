//! Client configuration: endpoint base URL, retry backoffs, and timeouts.

use std::time::Duration;

use url::Url;

use crate::ResearchError;

pub const DEFAULT_BASE_URL: &str = "https://open.tiktokapis.com";

const ENV_BASE_URL: &str = "TIKTOK_RESEARCH_BASE_URL";
const ENV_RATE_LIMIT_BACKOFF: &str = "TIKTOK_RESEARCH_RATE_LIMIT_BACKOFF_SECS";
const ENV_GATEWAY_BACKOFF: &str = "TIKTOK_RESEARCH_GATEWAY_BACKOFF_SECS";
const ENV_SEARCH_ID_BACKOFF: &str = "TIKTOK_RESEARCH_SEARCH_ID_BACKOFF_SECS";
const ENV_MAX_GATEWAY_TIMEOUTS: &str = "TIKTOK_RESEARCH_MAX_GATEWAY_TIMEOUTS";

/// Runtime configuration shared by the auth and query clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Wait after a 429 before resending the same request.
    pub rate_limit_backoff: Duration,
    /// Wait after a 504 from the video query endpoint.
    pub gateway_timeout_backoff: Duration,
    /// Wait after the video query endpoint rejects a fresh search id.
    pub search_id_backoff: Duration,
    /// Number of 504s within one call that aborts it.
    pub max_gateway_timeouts: u32,
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            rate_limit_backoff: Duration::from_secs(10),
            gateway_timeout_backoff: Duration::from_secs(600),
            search_id_backoff: Duration::from_secs(10),
            max_gateway_timeouts: 10,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Defaults with overrides from `TIKTOK_RESEARCH_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            base_url: get(ENV_BASE_URL).unwrap_or(defaults.base_url),
            rate_limit_backoff: parse_secs(
                get(ENV_RATE_LIMIT_BACKOFF),
                ENV_RATE_LIMIT_BACKOFF,
                defaults.rate_limit_backoff,
            ),
            gateway_timeout_backoff: parse_secs(
                get(ENV_GATEWAY_BACKOFF),
                ENV_GATEWAY_BACKOFF,
                defaults.gateway_timeout_backoff,
            ),
            search_id_backoff: parse_secs(
                get(ENV_SEARCH_ID_BACKOFF),
                ENV_SEARCH_ID_BACKOFF,
                defaults.search_id_backoff,
            ),
            max_gateway_timeouts: parse_u32(
                get(ENV_MAX_GATEWAY_TIMEOUTS),
                ENV_MAX_GATEWAY_TIMEOUTS,
                defaults.max_gateway_timeouts,
            ),
            request_timeout: defaults.request_timeout,
        }
    }

    /// Resolve an absolute endpoint path against the configured base URL.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, ResearchError> {
        Ok(Url::parse(&self.base_url)?.join(path)?)
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client, ResearchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: Duration) -> Duration {
    match raw {
        Some(v) => match v.trim().parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                tracing::warn!(key, value = %v, "Ignoring unparsable duration override");
                default
            }
        },
        None => default,
    }
}

fn parse_u32(raw: Option<String>, key: &str, default: u32) -> u32 {
    match raw {
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %v, "Ignoring unparsable integer override");
            default
        }),
        None => default,
    }
}
