//! Bulk brand-logo resolution against the Brandfetch API.
//!
//! A [`LogoPipeline`] takes a list of company names, searches the provider for
//! each one's domain, fetches the brand record, picks the preferred logo format
//! (svg, then png, then jpg/jpeg), downloads it and flags logos that are
//! predominantly white. Companies are resolved concurrently and independently:
//! one company's failure becomes an error record, never a failed batch.
//!
//! Results can be accumulated in a caller-owned [`ResultStore`], cached with a
//! [`ResolutionCache`], and packaged with an [`ArchiveBuilder`].

pub mod archive;
pub mod cache;
pub mod classifier;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod metrics;
pub mod pipeline;
pub mod store;

// Re-export commonly used types
pub use archive::{ArchiveBuilder, ArchiveEntry, ZipArchiveBuilder, archive_entries};
pub use cache::{CacheKey, ResolutionCache};
pub use client::BrandLookupClient;
pub use config::FetcherConfig;
pub use domain::*;
pub use error::{LogoFetcherError, Result};
pub use http::{HttpClient, HttpRequest, HttpResponse, MockHttpClient, ReqwestHttpClient};
#[cfg(feature = "metrics")]
pub use metrics::LogoFetcherMetrics;
pub use pipeline::LogoPipeline;
pub use store::{LogoPosition, ResultStore};
