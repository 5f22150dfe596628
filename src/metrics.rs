//! Prometheus metrics for logo resolution.
//!
//! - **Counters**: provider lookups by stage and outcome, resolved records by outcome
//! - **Histograms**: whole-batch duration

#[cfg(feature = "metrics")]
use prometheus::{CounterVec, Histogram, HistogramOpts, Opts, Registry};
#[cfg(feature = "metrics")]
use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::domain::ResolvedLogo;
#[cfg(feature = "metrics")]
use crate::error::Result;

/// Prometheus metrics registry for the logo pipeline.
#[cfg(feature = "metrics")]
#[derive(Clone)]
pub struct LogoFetcherMetrics {
    registry: Registry,
    lookups_total: CounterVec,
    resolutions_total: CounterVec,
    batch_duration_seconds: Histogram,
}

#[cfg(feature = "metrics")]
impl LogoFetcherMetrics {
    /// Create and register all metrics with the provided registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metrics fail to register (e.g., duplicate registration).
    pub fn new(registry: Registry) -> Result<Self> {
        let lookups_total = CounterVec::new(
            Opts::new(
                "logo_fetcher_lookups_total",
                "Provider and asset requests by stage and outcome",
            ),
            &["stage", "outcome"],
        )
        .map_err(|e| anyhow::anyhow!("Failed to create lookups_total counter: {}", e))?;

        let resolutions_total = CounterVec::new(
            Opts::new(
                "logo_fetcher_resolutions_total",
                "Resolved company records by outcome",
            ),
            &["outcome"],
        )
        .map_err(|e| anyhow::anyhow!("Failed to create resolutions_total counter: {}", e))?;

        let batch_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "logo_fetcher_batch_duration_seconds",
                "Pipeline run duration in seconds",
            )
            .buckets(vec![0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]),
        )
        .map_err(|e| anyhow::anyhow!("Failed to create batch_duration_seconds histogram: {}", e))?;

        registry
            .register(Box::new(lookups_total.clone()))
            .map_err(|e| anyhow::anyhow!("Failed to register lookups_total: {}", e))?;
        registry
            .register(Box::new(resolutions_total.clone()))
            .map_err(|e| anyhow::anyhow!("Failed to register resolutions_total: {}", e))?;
        registry
            .register(Box::new(batch_duration_seconds.clone()))
            .map_err(|e| anyhow::anyhow!("Failed to register batch_duration_seconds: {}", e))?;

        Ok(Self {
            registry,
            lookups_total,
            resolutions_total,
            batch_duration_seconds,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one request. `stage` is one of "search", "brand", "download".
    pub fn record_lookup(&self, stage: &str, succeeded: bool) {
        let outcome = if succeeded { "ok" } else { "error" };
        self.lookups_total.with_label_values(&[stage, outcome]).inc();
    }

    /// Record a finished pipeline run.
    pub fn record_batch(&self, logos: &[ResolvedLogo], duration: Duration) {
        for logo in logos {
            let outcome = if logo.is_resolved() { "resolved" } else { "failed" };
            self.resolutions_total.with_label_values(&[outcome]).inc();
            if logo.is_white() {
                self.resolutions_total.with_label_values(&["white"]).inc();
            }
        }
        self.batch_duration_seconds.observe(duration.as_secs_f64());
    }
}
