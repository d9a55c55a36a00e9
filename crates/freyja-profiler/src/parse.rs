//! Turning model output into a [`BrandProfile`].

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use freyja_core::BrandProfile;
use freyja_scraper::truncate_chars;

use crate::error::ProfilerError;

pub const DEFAULT_BRAND_NAME: &str = "Marque Inconnue";
pub const DEFAULT_PRIMARY_COLOR: &str = "#000000";
pub const DEFAULT_SECONDARY_COLOR: &str = "#ffffff";
pub const DEFAULT_BRAND_MOOD: &str = "Neutre";

/// Characters of cleaned page text kept in `raw_content`.
pub const RAW_CONTENT_CHARS: usize = 1000;

static HEX_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

/// Returns the first well-formed JSON object embedded in `content`.
///
/// Each `{` is tried in order and parsed as a single JSON value, so leading
/// prose, markdown fences and anything after the object are ignored.
#[must_use]
pub fn extract_json_object(content: &str) -> Option<Value> {
    content
        .match_indices('{')
        .find_map(|(start, _)| {
            serde_json::Deserializer::from_str(&content[start..])
                .into_iter::<Value>()
                .next()
                .and_then(Result::ok)
                .filter(Value::is_object)
        })
}

/// Builds a profile from the assistant text, filling gaps with defaults.
///
/// # Errors
///
/// Returns [`ProfilerError::MalformedResponse`] when `content` holds no
/// well-formed JSON object.
pub fn parse_brand_profile(
    content: &str,
    cleaned_text: &str,
) -> Result<BrandProfile, ProfilerError> {
    let parsed = extract_json_object(content).ok_or_else(|| {
        tracing::error!(content, "no JSON object in model response");
        ProfilerError::MalformedResponse {
            reason: "no well-formed JSON object found".to_string(),
        }
    })?;

    Ok(BrandProfile {
        brand_name: text_field(&parsed, "brandName")
            .unwrap_or_else(|| DEFAULT_BRAND_NAME.to_string()),
        offer_details: text_field(&parsed, "offerDetails").unwrap_or_default(),
        target_audience: text_field(&parsed, "targetAudience").unwrap_or_default(),
        brand_positioning: text_field(&parsed, "brandPositioning").unwrap_or_default(),
        raw_content: truncate_chars(cleaned_text, RAW_CONTENT_CHARS).to_string(),
        primary_color: color_field(&parsed, "primaryColor", DEFAULT_PRIMARY_COLOR),
        secondary_color: color_field(&parsed, "secondaryColor", DEFAULT_SECONDARY_COLOR),
        brand_mood: text_field(&parsed, "brandMood")
            .unwrap_or_else(|| DEFAULT_BRAND_MOOD.to_string()),
    })
}

/// Non-blank string value of `key`; anything else counts as missing.
fn text_field(parsed: &Value, key: &str) -> Option<String> {
    parsed
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
}

fn color_field(parsed: &Value, key: &str, default: &str) -> String {
    match text_field(parsed, key) {
        Some(color) if HEX_COLOR_RE.is_match(color.trim()) => color.trim().to_string(),
        Some(color) => {
            tracing::warn!(
                field = key,
                value = %color,
                default,
                "model returned an invalid hex color"
            );
            default.to_string()
        }
        None => default.to_string(),
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
