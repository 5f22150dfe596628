//! Configuration for the lookup client, pipeline and result cache.

use std::time::Duration;

/// Default Brandfetch search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.brandfetch.io/v2/search";

/// Default Brandfetch brand endpoint.
pub const DEFAULT_BRAND_ENDPOINT: &str = "https://api.brandfetch.io/v2/brands";

/// Configuration for a fetcher.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Search endpoint; the URL-encoded company name is appended as a path segment
    pub search_endpoint: String,

    /// Brand endpoint; the domain is appended as a path segment
    pub brand_endpoint: String,

    /// Timeout for each individual request in milliseconds
    pub request_timeout_ms: u64,

    /// Deadline for a whole pipeline run in milliseconds.
    /// Companies still pending at the deadline are reported as failed.
    /// None means no batch deadline.
    pub batch_timeout_ms: Option<u64>,

    /// How long cached pipeline results stay valid in milliseconds
    pub cache_ttl_ms: u64,

    /// Maximum number of cached pipeline results
    pub cache_capacity: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            brand_endpoint: DEFAULT_BRAND_ENDPOINT.to_string(),
            request_timeout_ms: 30_000,
            batch_timeout_ms: None,
            cache_ttl_ms: 3_600_000, // 1 hour
            cache_capacity: 128,
        }
    }
}

impl FetcherConfig {
    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_ms.map(Duration::from_millis)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: FetcherConfig = serde_json::from_value(serde_json::json!({
            "search_endpoint": "http://localhost:9000/search",
            "batch_timeout_ms": 2500
        }))
        .unwrap();

        assert_eq!(config.search_endpoint, "http://localhost:9000/search");
        assert_eq!(config.brand_endpoint, DEFAULT_BRAND_ENDPOINT);
        assert_eq!(config.batch_timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.request_timeout_ms, 30_000);
    }
}
