//! Whiteness classification for downloaded logo assets.
//!
//! Classification is advisory: anything that cannot be read is reported as
//! not white rather than surfaced as an error.

use std::collections::HashMap;

use crate::domain::AssetFormat;

/// Color tokens that mark markup as white.
const WHITE_TOKENS: [&str; 3] = ["#ffffff", "#fff", "rgb(255,255,255)"];

/// Channel sum above which a dominant color counts as near-white.
const NEAR_WHITE_CHANNEL_SUM: u32 = 700;

/// Whether markup references white anywhere (case-insensitive substring match).
///
/// This is a heuristic over the text, not a render.
pub fn is_white_markup(markup: &str) -> bool {
    let lowered = markup.to_lowercase();
    WHITE_TOKENS.iter().any(|token| lowered.contains(token))
}

/// Whether the dominant color of a raster image is white or near-white.
///
/// Only `png`, `jpg` and `jpeg` tags are decoded; any other tag, or bytes that
/// fail to decode, yield `false`.
pub fn is_white_raster(image_bytes: &[u8], format_tag: &str) -> bool {
    let tag = format_tag.to_ascii_lowercase();
    if !matches!(tag.as_str(), "png" | "jpg" | "jpeg") {
        return false;
    }

    let decoded = match image::load_from_memory(image_bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!(format = %tag, error = %e, "Could not decode logo, treating as not white");
            return false;
        }
    };

    let rgb = decoded.to_rgb8();
    let mut histogram: HashMap<[u8; 3], u32> = HashMap::new();
    for pixel in rgb.pixels() {
        *histogram.entry(pixel.0).or_default() += 1;
    }

    let Some((dominant, _)) = histogram.into_iter().max_by_key(|(_, count)| *count) else {
        return false;
    };

    let channel_sum: u32 = dominant.iter().map(|c| u32::from(*c)).sum();
    dominant == [255, 255, 255] || channel_sum > NEAR_WHITE_CHANNEL_SUM
}

/// Classify downloaded bytes according to the format they were selected as.
pub fn classify(bytes: &[u8], format: AssetFormat) -> bool {
    match format {
        AssetFormat::Svg => is_white_markup(&String::from_utf8_lossy(bytes)),
        raster => is_white_raster(bytes, raster.as_str()),
    }
}
