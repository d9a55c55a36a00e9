//! End-to-end brand extraction: acquire, extract colors, infer.

use std::time::Duration;

use reqwest::Client;

use freyja_core::{AppConfig, BrandProfile};
use freyja_scraper::{extract_color_candidates, ContentAcquirer};

use crate::client::{CompletionClient, CompletionOptions};
use crate::error::PipelineError;
use crate::infer::infer_brand_profile;

/// Everything a pipeline run needs. Built by the caller; the pipeline never
/// reads the process environment.
#[derive(Clone)]
pub struct PipelineConfig {
    pub completion_api_base: String,
    pub completion_api_key: String,
    pub proxy_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub direct_timeout: Duration,
}

impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("completion_api_base", &self.completion_api_base)
            .field("completion_api_key", &"[redacted]")
            .field("proxy_base_url", &self.proxy_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("direct_timeout", &self.direct_timeout)
            .finish()
    }
}

impl PipelineConfig {
    /// Combines the service configuration with a per-user API key.
    #[must_use]
    pub fn from_app_config(config: &AppConfig, completion_api_key: impl Into<String>) -> Self {
        Self {
            completion_api_base: config.completion_api_base.clone(),
            completion_api_key: completion_api_key.into(),
            proxy_base_url: config.proxy_base_url.clone(),
            model: config.completion_model.clone(),
            temperature: config.completion_temperature,
            max_tokens: config.completion_max_tokens,
            direct_timeout: Duration::from_secs(config.direct_fetch_timeout_secs),
        }
    }
}

/// Acquisition followed by attribute inference for a single URL.
#[derive(Debug)]
pub struct BrandExtractionPipeline {
    acquirer: ContentAcquirer,
    completion: CompletionClient,
}

impl BrandExtractionPipeline {
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the HTTP client cannot be built.
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Builds a pipeline on a shared client. Cheap enough to call per request:
    /// only the configuration is moved in.
    #[must_use]
    pub fn with_client(config: PipelineConfig, client: Client) -> Self {
        let acquirer =
            ContentAcquirer::with_client(client.clone(), &config.proxy_base_url, config.direct_timeout);
        let completion = CompletionClient::with_client(
            client,
            &config.completion_api_base,
            config.completion_api_key,
            CompletionOptions {
                model: config.model,
                temperature: config.temperature,
                max_tokens: config.max_tokens,
            },
        );
        Self {
            acquirer,
            completion,
        }
    }

    /// Runs the full extraction for `url`.
    ///
    /// Color candidates are only extracted when raw HTML is available (direct
    /// fetch); proxy content goes to the model with an empty list.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Acquisition`] when the page cannot be fetched; no
    ///   completion request is made in that case
    /// - [`PipelineError::Inference`] when the completion call or reply
    ///   parsing fails
    pub async fn run(&self, url: &str) -> Result<BrandProfile, PipelineError> {
        let content = self.acquirer.acquire(url).await?;

        let candidates = match content.raw_html() {
            Some(html) => extract_color_candidates(html),
            None => {
                tracing::info!(url, "proxy content has no markup; colors left to the model");
                Vec::new()
            }
        };
        tracing::debug!(url, ?candidates, "color candidates");

        let profile = infer_brand_profile(
            &self.completion,
            url,
            &content.cleaned_text,
            &candidates,
            content.source,
        )
        .await?;
        Ok(profile)
    }
}
