//! Provider-facing brand types and logo format selection.
//!
//! These mirror the provider's JSON contract: a search hit carrying a domain,
//! and a brand record carrying logo entries with format variants.

use serde::{Deserialize, Deserializer, Serialize};

/// Image formats the pipeline knows how to select and classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFormat {
    Svg,
    Png,
    Jpg,
    Jpeg,
}

impl AssetFormat {
    /// Parse a provider format tag. Tags outside `svg|png|jpg|jpeg` are not selectable.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "svg" => Some(AssetFormat::Svg),
            "png" => Some(AssetFormat::Png),
            "jpg" => Some(AssetFormat::Jpg),
            "jpeg" => Some(AssetFormat::Jpeg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFormat::Svg => "svg",
            AssetFormat::Png => "png",
            AssetFormat::Jpg => "jpg",
            AssetFormat::Jpeg => "jpeg",
        }
    }

    /// Selection tier: lower wins. `jpg` and `jpeg` share the last tier.
    fn tier(&self) -> usize {
        match self {
            AssetFormat::Svg => 0,
            AssetFormat::Png => 1,
            AssetFormat::Jpg | AssetFormat::Jpeg => 2,
        }
    }
}

impl std::fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First usable hit from the provider's search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Canonical website identifier, key for the brand lookup
    pub domain: String,
    /// Display name reported by the provider
    #[serde(default)]
    pub name: Option<String>,
}

/// Brand record returned by the provider's brand endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandDetail {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    /// Logo entries in provider order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logos: Vec<LogoEntry>,
}

/// A provider asset descriptor (logo, icon, symbol, ...) with its format variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoEntry {
    /// Only entries of type `"logo"` are eligible for selection
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub formats: Vec<LogoFormat>,
}

impl LogoEntry {
    pub fn is_logo(&self) -> bool {
        self.kind.as_deref() == Some("logo")
    }
}

/// One format variant of a logo entry.
///
/// The provider occasionally sends `null` for either field; such variants are
/// kept but never selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoFormat {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub src: Option<String>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The asset chosen for a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoAsset {
    pub format: AssetFormat,
    pub url: String,
}

impl BrandDetail {
    /// Pick the preferred logo asset.
    ///
    /// Only `"logo"` entries are considered. svg beats png beats jpg/jpeg; within
    /// a tier the first variant in provider order wins. Single pass: the first
    /// URL per tier is recorded, then tiers are read in priority order.
    pub fn select_logo(&self) -> Option<LogoAsset> {
        let mut first_per_tier: [Option<LogoAsset>; 3] = [None, None, None];

        let candidates = self
            .logos
            .iter()
            .filter(|entry| entry.is_logo())
            .flat_map(|entry| entry.formats.iter())
            .filter_map(|variant| {
                let src = variant.src.as_deref().filter(|src| !src.is_empty())?;
                let format = AssetFormat::from_tag(variant.format.as_deref()?)?;
                Some((format, src))
            });

        for (format, src) in candidates {
            let slot = &mut first_per_tier[format.tier()];
            if slot.is_none() {
                *slot = Some(LogoAsset {
                    format,
                    url: src.to_string(),
                });
            }
        }

        first_per_tier.into_iter().flatten().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: &str, formats: &[(&str, &str)]) -> LogoEntry {
        LogoEntry {
            kind: Some(kind.to_string()),
            theme: None,
            formats: formats
                .iter()
                .map(|(format, src)| LogoFormat {
                    format: Some(format.to_string()),
                    src: Some(src.to_string()),
                })
                .collect(),
        }
    }

    fn detail(logos: Vec<LogoEntry>) -> BrandDetail {
        BrandDetail {
            logos,
            ..Default::default()
        }
    }

    #[test]
    fn test_svg_beats_png_regardless_of_order() {
        let brand = detail(vec![entry(
            "logo",
            &[("png", "https://x/a.png"), ("svg", "https://x/a.svg")],
        )]);
        let asset = brand.select_logo().unwrap();
        assert_eq!(asset.format, AssetFormat::Svg);
        assert_eq!(asset.url, "https://x/a.svg");
    }

    #[test]
    fn test_svg_in_later_entry_beats_png_in_earlier_entry() {
        let brand = detail(vec![
            entry("logo", &[("png", "https://x/first.png")]),
            entry("logo", &[("svg", "https://x/second.svg")]),
        ]);
        assert_eq!(brand.select_logo().unwrap().url, "https://x/second.svg");
    }

    #[test]
    fn test_png_beats_jpg() {
        let brand = detail(vec![entry(
            "logo",
            &[("jpg", "https://x/a.jpg"), ("png", "https://x/a.png")],
        )]);
        let asset = brand.select_logo().unwrap();
        assert_eq!(asset.format, AssetFormat::Png);
    }

    #[test]
    fn test_first_of_jpg_or_jpeg_wins() {
        let brand = detail(vec![entry(
            "logo",
            &[("jpeg", "https://x/a.jpeg"), ("jpg", "https://x/a.jpg")],
        )]);
        let asset = brand.select_logo().unwrap();
        assert_eq!(asset.format, AssetFormat::Jpeg);
        assert_eq!(asset.url, "https://x/a.jpeg");
    }

    #[test]
    fn test_first_within_tier_wins() {
        let brand = detail(vec![
            entry("logo", &[("png", "https://x/one.png")]),
            entry("logo", &[("png", "https://x/two.png")]),
        ]);
        assert_eq!(brand.select_logo().unwrap().url, "https://x/one.png");
    }

    #[test]
    fn test_non_logo_entries_ignored() {
        let brand = detail(vec![
            entry("icon", &[("svg", "https://x/icon.svg")]),
            entry("symbol", &[("png", "https://x/symbol.png")]),
        ]);
        assert_eq!(brand.select_logo(), None);
    }

    #[test]
    fn test_unsupported_formats_ignored() {
        let brand = detail(vec![entry("logo", &[("webp", "https://x/a.webp")])]);
        assert_eq!(brand.select_logo(), None);
    }

    #[test]
    fn test_brand_detail_deserializes_provider_shape() {
        let json = serde_json::json!({
            "name": "Acme",
            "domain": "acme.com",
            "claimed": true,
            "logos": [
                {
                    "type": "logo",
                    "theme": "dark",
                    "formats": [
                        { "src": "https://x/acme.png", "format": "png", "height": 100 }
                    ]
                },
                { "type": "icon" }
            ]
        });
        let brand: BrandDetail = serde_json::from_value(json).unwrap();
        assert_eq!(brand.logos.len(), 2);
        assert!(brand.logos[1].formats.is_empty());
        assert_eq!(brand.select_logo().unwrap().url, "https://x/acme.png");
    }

    #[test]
    fn test_missing_logos_is_empty() {
        let brand: BrandDetail = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(brand.logos.is_empty());
        assert_eq!(brand.select_logo(), None);
    }

    #[test]
    fn test_null_variant_fields_do_not_hide_other_formats() {
        let json = serde_json::json!({
            "logos": [
                {
                    "type": "logo",
                    "formats": [
                        { "src": null, "format": "svg" },
                        { "src": "https://x/broken", "format": null },
                        { "src": "https://x/acme.png", "format": "png" }
                    ]
                },
                { "type": null, "formats": null }
            ]
        });
        let brand: BrandDetail = serde_json::from_value(json).unwrap();
        assert!(brand.logos[1].formats.is_empty());
        let asset = brand.select_logo().unwrap();
        assert_eq!(asset.format, AssetFormat::Png);
        assert_eq!(asset.url, "https://x/acme.png");
    }

    #[test]
    fn test_null_logos_is_empty() {
        let brand: BrandDetail =
            serde_json::from_value(serde_json::json!({ "logos": null })).unwrap();
        assert!(brand.logos.is_empty());
    }

    #[test]
    fn test_format_tag_parse_case_insensitive() {
        assert_eq!(AssetFormat::from_tag("SVG"), Some(AssetFormat::Svg));
        assert_eq!(AssetFormat::from_tag("gif"), None);
    }
}
