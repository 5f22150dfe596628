//! Batch logo resolution.
//!
//! Each company runs search → brand lookup → format selection → download →
//! classification on its own future. All futures are driven together on the
//! caller's task, so every search is in flight before any brand lookup is
//! awaited, and results are collected by input position rather than by
//! completion order.

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;

use crate::classifier;
use crate::client::BrandLookupClient;
use crate::config::FetcherConfig;
use crate::domain::ResolvedLogo;
use crate::error::{LogoFetcherError, Result};
use crate::http::HttpClient;
use crate::store::ResultStore;

#[cfg(feature = "metrics")]
use crate::metrics::LogoFetcherMetrics;

/// Message for companies with no selectable logo format.
pub const NO_LOGO_MESSAGE: &str = "No SVG, PNG, or JPG Logo available";

/// Message for companies still pending when the batch deadline passes.
pub const DEADLINE_MESSAGE: &str = "Batch deadline exceeded";

/// Stateless pipeline resolving company names to logos.
///
/// # Example
/// ```ignore
/// let pipeline = LogoPipeline::new(Arc::new(ReqwestHttpClient::new()), FetcherConfig::default());
/// let logos = pipeline.resolve(&["Acme", "Globex"], &api_key).await?;
/// ```
pub struct LogoPipeline<H: HttpClient> {
    client: BrandLookupClient<H>,
    #[cfg(feature = "metrics")]
    metrics: Option<LogoFetcherMetrics>,
}

impl<H: HttpClient> LogoPipeline<H> {
    pub fn new(http_client: Arc<H>, config: FetcherConfig) -> Self {
        Self::from_client(BrandLookupClient::new(http_client, config))
    }

    pub fn from_client(client: BrandLookupClient<H>) -> Self {
        Self {
            client,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Record lookup and resolution metrics into the given registry wrapper.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: LogoFetcherMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &FetcherConfig {
        self.client.config()
    }

    /// Resolve every company, returning one record per input name in input order.
    ///
    /// Per-company failures become failed records; the call itself only fails
    /// when the credential is missing, before any request is made.
    pub async fn resolve<S: AsRef<str>>(
        &self,
        company_names: &[S],
        credential: &str,
    ) -> Result<Vec<ResolvedLogo>> {
        if credential.trim().is_empty() {
            return Err(LogoFetcherError::Validation(
                "an API credential is required".to_string(),
            ));
        }
        if company_names.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let deadline = self
            .config()
            .batch_timeout()
            .map(|timeout| tokio::time::Instant::now() + timeout);

        tracing::info!(companies = company_names.len(), "Resolving logos");

        let logos = join_all(
            company_names
                .iter()
                .map(|name| self.resolve_before(name.as_ref(), credential, deadline)),
        )
        .await;

        let resolved = logos.iter().filter(|logo| logo.is_resolved()).count();
        let white = logos.iter().filter(|logo| logo.is_white()).count();
        tracing::info!(
            companies = logos.len(),
            resolved = resolved,
            failed = logos.len() - resolved,
            white = white,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Logo resolution finished"
        );
        self.record_batch(&logos, started);

        Ok(logos)
    }

    /// Resolve and append the results to a caller-owned store.
    ///
    /// Returns the positions of the newly appended records.
    pub async fn resolve_into<S: AsRef<str>>(
        &self,
        store: &mut ResultStore,
        company_names: &[S],
        credential: &str,
    ) -> Result<Range<usize>> {
        let logos = self.resolve(company_names, credential).await?;
        Ok(store.append(logos))
    }

    async fn resolve_before(
        &self,
        name: &str,
        credential: &str,
        deadline: Option<tokio::time::Instant>,
    ) -> ResolvedLogo {
        let Some(deadline) = deadline else {
            return self.resolve_company(name, credential).await;
        };

        match tokio::time::timeout_at(deadline, self.resolve_company(name, credential)).await {
            Ok(logo) => logo,
            Err(_) => {
                tracing::warn!(company = %name, "Batch deadline passed before company resolved");
                ResolvedLogo::failed_transient(name, DEADLINE_MESSAGE)
            }
        }
    }

    async fn resolve_company(&self, name: &str, credential: &str) -> ResolvedLogo {
        let hit = match self.client.search_company(name).await {
            Ok(hit) => {
                self.record_lookup("search", true);
                hit
            }
            Err(e) => {
                self.record_lookup("search", false);
                return failure(name, "Error searching brand", &e);
            }
        };

        let brand = match self.client.fetch_brand_details(&hit.domain, credential).await {
            Ok(brand) => {
                self.record_lookup("brand", true);
                brand
            }
            Err(e) => {
                self.record_lookup("brand", false);
                return failure(name, "Error fetching brand details", &e);
            }
        };

        let Some(asset) = brand.select_logo() else {
            tracing::info!(company = %name, domain = %hit.domain, "No selectable logo format");
            return ResolvedLogo::failed(name, NO_LOGO_MESSAGE);
        };

        let bytes = match self.client.download_asset(&asset.url).await {
            Ok(bytes) => {
                self.record_lookup("download", true);
                bytes
            }
            Err(e) => {
                self.record_lookup("download", false);
                return failure(name, "Error downloading logo", &e);
            }
        };

        let is_white = classifier::classify(&bytes, asset.format);
        tracing::debug!(
            company = %name,
            domain = %hit.domain,
            format = %asset.format,
            is_white = is_white,
            "Resolved logo"
        );

        ResolvedLogo::resolved(name, asset, bytes, is_white)
    }

    #[cfg(feature = "metrics")]
    fn record_lookup(&self, stage: &str, succeeded: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record_lookup(stage, succeeded);
        }
    }

    #[cfg(not(feature = "metrics"))]
    fn record_lookup(&self, _stage: &str, _succeeded: bool) {}

    #[cfg(feature = "metrics")]
    fn record_batch(&self, logos: &[ResolvedLogo], started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_batch(logos, started.elapsed());
        }
    }

    #[cfg(not(feature = "metrics"))]
    fn record_batch(&self, _logos: &[ResolvedLogo], _started: Instant) {}
}

/// Failed record for a stage error, prefixed with the stage that failed.
fn failure(name: &str, stage: &str, cause: &LogoFetcherError) -> ResolvedLogo {
    let message = format!("{}: {}", stage, cause);
    if cause.is_transient() {
        ResolvedLogo::failed_transient(name, message)
    } else {
        ResolvedLogo::failed(name, message)
    }
}
