//! Higgsfield "Nano Banana Pro" generation.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::ImagingError;
use crate::upstream::{ensure_success, first_url};

/// Used when the caller does not pick an aspect ratio.
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// Body sent to the provider.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NanoBananaRequest<'a> {
    pub prompt: &'a str,
    pub num_images: u8,
    pub resolution: &'static str,
    pub aspect_ratio: &'a str,
    pub output_format: &'static str,
}

impl<'a> NanoBananaRequest<'a> {
    /// A single 1k PNG; `aspect_ratio` falls back to [`DEFAULT_ASPECT_RATIO`].
    #[must_use]
    pub fn new(prompt: &'a str, aspect_ratio: Option<&'a str>) -> Self {
        Self {
            prompt,
            num_images: 1,
            resolution: "1k",
            aspect_ratio: aspect_ratio
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_ASPECT_RATIO),
            output_format: "png",
        }
    }
}

#[derive(Debug, Clone)]
pub struct HiggsfieldClient {
    http: Client,
    api_base: String,
}

impl HiggsfieldClient {
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

    /// Sends `request` and returns the first image reference in the reply.
    ///
    /// The provider has answered with `images[0]`, `image` or `url`
    /// depending on the deployment; they are checked in that order.
    ///
    /// # Errors
    ///
    /// - [`ImagingError::Upstream`] on a non-2xx reply
    /// - [`ImagingError::MissingImage`] when none of those fields is present
    /// - [`ImagingError::Http`] on transport or decode failure
    pub async fn generate(
        &self,
        api_key: &str,
        api_secret: &str,
        request: &NanoBananaRequest<'_>,
    ) -> Result<String, ImagingError> {
        let response = self
            .http
            .post(format!("{}/nano-banana-pro", self.api_base))
            .header("hf-api-key", api_key)
            .header("hf-secret", api_secret)
            .json(request)
            .send()
            .await?;
        let body: Value = ensure_success(response, "Higgsfield Error")
            .await?
            .json()
            .await?;

        first_url(&body, &["/images/0", "/image", "/url"]).ok_or(ImagingError::MissingImage {
            provider: "Nano Banana",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_to_square() {
        let req = NanoBananaRequest::new("a cat", None);
        assert_eq!(req.aspect_ratio, DEFAULT_ASPECT_RATIO);
        assert_eq!(req.num_images, 1);
        assert_eq!(req.resolution, "1k");
        assert_eq!(req.output_format, "png");
    }

    #[test]
    fn blank_aspect_ratio_falls_back_to_default() {
        assert_eq!(NanoBananaRequest::new("a cat", Some("")).aspect_ratio, "1:1");
        assert_eq!(NanoBananaRequest::new("a cat", Some("16:9")).aspect_ratio, "16:9");
    }
}
