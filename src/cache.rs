//! Time-boxed cache of pipeline runs using moka.
//!
//! Keyed by the trimmed company list and a digest of the credential, so the
//! raw credential is never held by the cache. Runs that contain a transient
//! failure are returned but not stored.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sha2::{Digest, Sha256};

use crate::config::FetcherConfig;
use crate::domain::ResolvedLogo;
use crate::error::Result;
use crate::http::HttpClient;
use crate::pipeline::LogoPipeline;

/// Normalized identity of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    company_names: Vec<String>,
    credential_digest: String,
}

impl CacheKey {
    pub fn new<S: AsRef<str>>(company_names: &[S], credential: &str) -> Self {
        Self {
            company_names: company_names
                .iter()
                .map(|name| name.as_ref().trim().to_string())
                .collect(),
            credential_digest: hex::encode(Sha256::digest(credential.as_bytes())),
        }
    }
}

/// Cache of complete pipeline results.
#[derive(Clone)]
pub struct ResolutionCache {
    inner: Cache<CacheKey, Arc<Vec<ResolvedLogo>>>,
}

impl ResolutionCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_ttl())
    }

    pub async fn get(&self, key: &CacheKey) -> Option<Arc<Vec<ResolvedLogo>>> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: CacheKey, logos: Arc<Vec<ResolvedLogo>>) {
        self.inner.insert(key, logos).await;
    }

    /// Return cached results for this run, resolving and caching on a miss.
    ///
    /// On a miss the trimmed names from the key are resolved, so records never
    /// depend on which spelling filled the entry. Runs rejected by the pipeline
    /// (missing credential) and runs with any transient failure are not cached.
    pub async fn get_or_resolve<H, S>(
        &self,
        pipeline: &LogoPipeline<H>,
        company_names: &[S],
        credential: &str,
    ) -> Result<Arc<Vec<ResolvedLogo>>>
    where
        H: HttpClient,
        S: AsRef<str>,
    {
        let key = CacheKey::new(company_names, credential);
        if let Some(cached) = self.get(&key).await {
            tracing::debug!(companies = company_names.len(), "Serving logos from cache");
            return Ok(cached);
        }

        let logos = Arc::new(pipeline.resolve(&key.company_names, credential).await?);
        if logos.iter().any(ResolvedLogo::is_transient) {
            tracing::debug!(
                companies = logos.len(),
                "Not caching run with transient failures"
            );
        } else {
            self.insert(key, logos.clone()).await;
        }
        Ok(logos)
    }

    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}
