//! Pipeline output records.

use serde::Serialize;

use super::brand::{AssetFormat, LogoAsset};

/// Split a comma-separated company list into names.
///
/// Entries are trimmed and blank entries dropped. Order and duplicates are kept:
/// position is the only identity a company has within a batch.
pub fn parse_company_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Outcome of resolving one company.
///
/// Exactly one of `logo_url` and `error_message` is set. Records are built once
/// through [`ResolvedLogo::resolved`] or [`ResolvedLogo::failed`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLogo {
    company_name: String,
    logo_url: Option<String>,
    format: Option<AssetFormat>,
    #[serde(skip)]
    raw_bytes: Option<Vec<u8>>,
    error_message: Option<String>,
    is_white: bool,
    #[serde(skip)]
    transient: bool,
}

impl ResolvedLogo {
    pub fn resolved(
        company_name: impl Into<String>,
        asset: LogoAsset,
        raw_bytes: Vec<u8>,
        is_white: bool,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            logo_url: Some(asset.url),
            format: Some(asset.format),
            raw_bytes: Some(raw_bytes),
            error_message: None,
            is_white,
            transient: false,
        }
    }

    pub fn failed(company_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            logo_url: None,
            format: None,
            raw_bytes: None,
            error_message: Some(error_message.into()),
            is_white: false,
            transient: false,
        }
    }

    /// A failure that may not recur, such as a dropped connection or a passed deadline.
    pub fn failed_transient(
        company_name: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            transient: true,
            ..Self::failed(company_name, error_message)
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }

    pub fn format(&self) -> Option<AssetFormat> {
        self.format
    }

    pub fn raw_bytes(&self) -> Option<&[u8]> {
        self.raw_bytes.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the logo is predominantly white. Always false for failures.
    pub fn is_white(&self) -> bool {
        self.is_white
    }

    /// Whether this record carries a downloadable asset.
    pub fn is_resolved(&self) -> bool {
        self.error_message.is_none()
    }

    /// Whether this failure might not happen again on a later run.
    pub fn is_transient(&self) -> bool {
        self.transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_company_list_trims_and_keeps_duplicates() {
        assert_eq!(
            parse_company_list(" Acme ,Globex,  Acme"),
            vec!["Acme", "Globex", "Acme"]
        );
    }

    #[test]
    fn test_parse_company_list_drops_blank_entries() {
        assert_eq!(parse_company_list("Acme,, ,Initech,"), vec!["Acme", "Initech"]);
        assert!(parse_company_list("  ").is_empty());
    }

    #[test]
    fn test_failed_record_has_no_asset() {
        let record = ResolvedLogo::failed("Acme", "No brands found");
        assert!(!record.is_resolved());
        assert_eq!(record.logo_url(), None);
        assert_eq!(record.raw_bytes(), None);
        assert!(!record.is_white());
        assert!(!record.is_transient());
    }

    #[test]
    fn test_transient_failure_serializes_like_any_failure() {
        let record = ResolvedLogo::failed_transient("Acme", "Batch deadline exceeded");
        assert!(record.is_transient());
        assert!(!record.is_resolved());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["error_message"], "Batch deadline exceeded");
        assert!(json.get("transient").is_none());
    }

    #[test]
    fn test_resolved_record_serializes_without_bytes() {
        let record = ResolvedLogo::resolved(
            "Acme",
            LogoAsset {
                format: AssetFormat::Png,
                url: "https://x/acme.png".to_string(),
            },
            vec![1, 2, 3],
            true,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["logo_url"], "https://x/acme.png");
        assert_eq!(json["format"], "png");
        assert_eq!(json["error_message"], serde_json::Value::Null);
        assert_eq!(json["is_white"], true);
        assert!(json.get("raw_bytes").is_none());
    }
}
