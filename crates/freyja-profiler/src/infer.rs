use freyja_core::BrandProfile;
use freyja_scraper::AcquisitionSource;

use crate::client::CompletionClient;
use crate::error::ProfilerError;
use crate::parse::parse_brand_profile;
use crate::prompt::{brand_analysis_prompt, SYSTEM_PROMPT};

/// Asks the completion model for the brand attributes of one page.
///
/// Exactly one completion request is made; nothing is retried.
///
/// # Errors
///
/// Propagates [`ProfilerError`] from the completion call or from parsing
/// the reply.
pub async fn infer_brand_profile(
    client: &CompletionClient,
    url: &str,
    cleaned_text: &str,
    color_candidates: &[String],
    source: AcquisitionSource,
) -> Result<BrandProfile, ProfilerError> {
    let prompt = brand_analysis_prompt(url, source, color_candidates, cleaned_text);
    tracing::debug!(
        url,
        %source,
        candidates = color_candidates.len(),
        prompt_chars = prompt.chars().count(),
        "requesting brand inference"
    );

    let content = client.complete(SYSTEM_PROMPT, &prompt).await?;
    let profile = parse_brand_profile(&content, cleaned_text)?;

    tracing::info!(
        url,
        brand = %profile.brand_name,
        primary = %profile.primary_color,
        secondary = %profile.secondary_color,
        "brand inference complete"
    );
    Ok(profile)
}
