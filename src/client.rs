//! Brand provider client: name search, brand detail lookup and asset download.
//!
//! Every operation maps transport failures, non-2xx statuses and malformed
//! bodies into [`LogoFetcherError`] values. Nothing here retries.

use std::sync::Arc;

use serde_json::Value;

use crate::config::FetcherConfig;
use crate::domain::{BrandDetail, SearchResult};
use crate::error::{LogoFetcherError, Result};
use crate::http::{HttpClient, HttpRequest, HttpResponse};

/// Stateless client for the brand provider's search and brand endpoints.
pub struct BrandLookupClient<H: HttpClient> {
    http_client: Arc<H>,
    config: FetcherConfig,
}

impl<H: HttpClient> Clone for BrandLookupClient<H> {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            config: self.config.clone(),
        }
    }
}

impl<H: HttpClient> BrandLookupClient<H> {
    pub fn new(http_client: Arc<H>, config: FetcherConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.config.search_endpoint.trim_end_matches('/'),
            urlencoding::encode(name)
        )
    }

    fn brand_url(&self, domain: &str) -> String {
        format!(
            "{}/{}",
            self.config.brand_endpoint.trim_end_matches('/'),
            urlencoding::encode(domain)
        )
    }

    /// Resolve a company name to its first search hit.
    ///
    /// A list response yields its first element; an object response is used
    /// directly. An empty response is reported as "No brands found".
    #[tracing::instrument(skip(self, name), fields(company = %name))]
    pub async fn search_company(&self, name: &str) -> Result<SearchResult> {
        let request = HttpRequest::get(self.search_url(name)).accept_json();
        self.fetch_json(&request, "")
            .await
            .and_then(first_search_hit)
            .inspect_err(|e| tracing::warn!(company = %name, error = %e, "Brand search failed"))
    }

    /// Fetch the brand record for a domain, authenticated with the caller's credential.
    #[tracing::instrument(skip(self, domain, credential), fields(domain = %domain))]
    pub async fn fetch_brand_details(&self, domain: &str, credential: &str) -> Result<BrandDetail> {
        let request = HttpRequest::get(self.brand_url(domain)).accept_json();
        self.fetch_json(&request, credential)
            .await
            .and_then(|body| {
                serde_json::from_value::<BrandDetail>(body).map_err(|e| {
                    LogoFetcherError::Decode(format!("Malformed brand record: {}", e))
                })
            })
            .inspect_err(
                |e| tracing::warn!(domain = %domain, error = %e, "Brand detail lookup failed"),
            )
    }

    /// Download the raw bytes of a selected logo asset.
    #[tracing::instrument(skip(self))]
    pub async fn download_asset(&self, url: &str) -> Result<Vec<u8>> {
        let request = HttpRequest::get(url);
        let response = self
            .http_client
            .execute(&request, "", self.config.request_timeout_ms)
            .await
            .and_then(|response| ensure_success(response, url))
            .inspect_err(|e| tracing::warn!(url = %url, error = %e, "Logo download failed"))?;

        tracing::debug!(url = %url, bytes = response.body.len(), "Downloaded logo");
        Ok(response.body)
    }

    async fn fetch_json(&self, request: &HttpRequest, api_key: &str) -> Result<Value> {
        let response = self
            .http_client
            .execute(request, api_key, self.config.request_timeout_ms)
            .await?;
        ensure_success(response, &request.url)?.json()
    }
}

fn ensure_success(response: HttpResponse, url: &str) -> Result<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(LogoFetcherError::Status {
            status: response.status,
            url: url.to_string(),
        })
    }
}

fn first_search_hit(body: Value) -> Result<SearchResult> {
    let hit = match body {
        Value::Array(items) => items.into_iter().next(),
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other),
    };

    let hit = hit.ok_or_else(|| LogoFetcherError::NotFound("No brands found".to_string()))?;
    serde_json::from_value(hit)
        .map_err(|_| LogoFetcherError::NotFound("Search result has no domain".to_string()))
}
