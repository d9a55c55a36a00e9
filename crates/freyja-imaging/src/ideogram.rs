//! Ideogram v3 text-to-image.

use std::time::Duration;

use reqwest::{multipart::Form, Client};
use serde_json::Value;

use crate::error::ImagingError;
use crate::upstream::{ensure_success, first_url};

const ASPECT_RATIO: &str = "10x16";
const MODEL: &str = "V_3";
const MAGIC_PROMPT: &str = "AUTO";

#[derive(Debug, Clone)]
pub struct IdeogramClient {
    http: Client,
    api_base: String,
}

impl IdeogramClient {
    /// # Errors
    ///
    /// Returns [`ImagingError::Http`] if the HTTP client cannot be built.
    pub fn new(api_base: &str) -> Result<Self, ImagingError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(http, api_base))
    }

    #[must_use]
    pub fn with_client(http: Client, api_base: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
        }
    }

    /// Generates one portrait (10x16) image for `prompt` and returns its URL.
    ///
    /// # Errors
    ///
    /// - [`ImagingError::Upstream`] on a non-2xx reply
    /// - [`ImagingError::MissingImage`] when the reply has no `data[0].url`
    /// - [`ImagingError::Http`] on transport or decode failure
    pub async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, ImagingError> {
        let form = Form::new()
            .text("prompt", prompt.to_owned())
            .text("aspect_ratio", ASPECT_RATIO)
            .text("model", MODEL)
            .text("magic_prompt_option", MAGIC_PROMPT);

        let response = self
            .http
            .post(format!("{}/v1/ideogram-v3/generate", self.api_base))
            .header("Api-Key", api_key)
            .multipart(form)
            .send()
            .await?;
        let body: Value = ensure_success(response, "Ideogram API Error")
            .await?
            .json()
            .await?;

        first_url(&body, &["/data/0/url"]).ok_or(ImagingError::MissingImage {
            provider: "Ideogram API",
        })
    }
}
