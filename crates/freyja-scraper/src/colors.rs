//! Brand color candidates from raw page markup.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on the number of candidates handed to the profiler.
pub const MAX_CANDIDATES: usize = 15;

/// Number of document-wide colors kept after frequency ranking.
const TOP_GLOBAL_COLORS: usize = 5;

/// Near-white, near-black and grey values that say nothing about a brand.
const IGNORED_COLORS: [&str; 8] = [
    "#ffffff", "#000000", "#f8f8f8", "#f2f2f2", "#eeeeee", "#333333", "#222222", "#111111",
];

static HEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#[0-9a-f]{6}\b").expect("valid hex regex"));
static CSS_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)--[a-z0-9-]*(?:color|primary|brand|main|accent)[a-z0-9-]*\s*:\s*(#[0-9a-f]{6})\b",
    )
    .expect("valid css var regex")
});
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<header\b.*?</header\s*>").expect("valid header regex"));
static FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<footer\b.*?</footer\s*>").expect("valid footer regex"));
static SVG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<svg\b.*?</svg\s*>").expect("valid svg regex"));

/// Heuristically extracts up to [`MAX_CANDIDATES`] brand color candidates.
///
/// Buckets, highest priority first:
/// 1. CSS custom properties whose name mentions color/primary/brand/main/accent
/// 2. colors inside the first `<header>`, the first `<footer>` and every `<svg>`
/// 3. the five most frequent colors of the whole document, minus greys
///
/// The result is lowercase, deduplicated on first occurrence, and may be empty.
#[must_use]
pub fn extract_color_candidates(html: &str) -> Vec<String> {
    let css_brand_colors = CSS_VAR_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_ascii_lowercase()));

    let priority_colors = priority_colors(html);
    let top_global_colors = top_global_colors(html);

    let mut seen = HashSet::new();
    css_brand_colors
        .chain(priority_colors)
        .chain(top_global_colors)
        .filter(|color| seen.insert(color.clone()))
        .take(MAX_CANDIDATES)
        .collect()
}

fn hex_colors(fragment: &str) -> impl Iterator<Item = String> + '_ {
    HEX_RE
        .find_iter(fragment)
        .map(|m| m.as_str().to_ascii_lowercase())
}

fn priority_colors(html: &str) -> Vec<String> {
    let mut colors = Vec::new();
    if let Some(header) = HEADER_RE.find(html) {
        colors.extend(hex_colors(header.as_str()));
    }
    if let Some(footer) = FOOTER_RE.find(html) {
        colors.extend(hex_colors(footer.as_str()));
    }
    for svg in SVG_RE.find_iter(html) {
        colors.extend(hex_colors(svg.as_str()));
    }
    colors
}

fn top_global_colors(html: &str) -> Vec<String> {
    // color -> (count, first position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, color) in hex_colors(html).enumerate() {
        counts.entry(color).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .filter(|(color, _)| !IGNORED_COLORS.contains(&color.as_str()))
        .map(|(color, (count, first))| (color, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(TOP_GLOBAL_COLORS)
        .map(|(color, _, _)| color)
        .collect()
}
