//! Command handlers for `scrape` and `acquire`.

use std::time::Duration;

use anyhow::Context;

use freyja_core::{normalize_site_url, AppConfig};
use freyja_profiler::{BrandExtractionPipeline, PipelineConfig};
use freyja_scraper::{extract_color_candidates, truncate_chars, ContentAcquirer};

/// Runs the full pipeline for `url` and prints the profile as pretty JSON.
///
/// # Errors
///
/// Returns an error when no API key is available or the pipeline fails.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    url: &str,
    api_key: Option<String>,
) -> anyhow::Result<()> {
    let api_key = api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .context("no completion API key: pass --api-key or set FREYJA_COMPLETION_API_KEY")?;

    let url = normalize_site_url(url);
    let pipeline = BrandExtractionPipeline::new(PipelineConfig::from_app_config(config, api_key))
        .context("failed to build extraction pipeline")?;

    let profile = pipeline
        .run(&url)
        .await
        .with_context(|| format!("brand extraction failed for {url}"))?;

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

/// Acquires `url` and prints the source, color candidates and a text excerpt.
///
/// # Errors
///
/// Returns an error when the page cannot be fetched directly or via proxy.
pub(crate) async fn run_acquire(
    config: &AppConfig,
    url: &str,
    excerpt_chars: usize,
) -> anyhow::Result<()> {
    let url = normalize_site_url(url);
    let acquirer = ContentAcquirer::new(
        &config.proxy_base_url,
        Duration::from_secs(config.direct_fetch_timeout_secs),
    )?;

    let content = acquirer.acquire(&url).await?;
    let candidates = content
        .raw_html()
        .map(extract_color_candidates)
        .unwrap_or_default();

    println!("source: {}", content.source);
    if candidates.is_empty() {
        println!("color candidates: none");
    } else {
        println!("color candidates: {}", candidates.join(", "));
    }
    println!(
        "text ({} chars):\n{}",
        content.cleaned_text.chars().count(),
        truncate_chars(&content.cleaned_text, excerpt_chars)
    );
    Ok(())
}
