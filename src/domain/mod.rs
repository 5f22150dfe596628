//! Core domain types for logo resolution.
//!
//! This module contains pure domain types with no I/O dependencies:
//! - Provider search hits and brand records
//! - Logo format selection
//! - Per-company resolution records

pub mod brand;
pub mod logo;

pub use brand::{AssetFormat, BrandDetail, LogoAsset, LogoEntry, LogoFormat, SearchResult};
pub use logo::{ResolvedLogo, parse_company_list};
