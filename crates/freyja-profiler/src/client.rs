//! Minimal OpenAI-compatible chat completion client.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::ProfilerError;

/// Upstream error bodies longer than this are cut in error messages.
const MAX_ERROR_DETAIL_CHARS: usize = 300;

/// Per-request generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 800,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Chat completion client for `{api_base}/chat/completions`.
pub struct CompletionClient {
    client: Client,
    api_base: String,
    api_key: String,
    options: CompletionOptions,
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"[redacted]")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CompletionClient {
    /// # Errors
    ///
    /// Returns [`ProfilerError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_base: &str,
        api_key: impl Into<String>,
        options: CompletionOptions,
    ) -> Result<Self, ProfilerError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, api_base, api_key, options))
    }

    /// Uses an existing HTTP client, sharing its connection pool.
    #[must_use]
    pub fn with_client(
        client: Client,
        api_base: &str,
        api_key: impl Into<String>,
        options: CompletionOptions,
    ) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            options,
        }
    }

    /// Sends one system + user exchange and returns the assistant text.
    ///
    /// # Errors
    ///
    /// - [`ProfilerError::Http`] on transport failure
    /// - [`ProfilerError::Upstream`] on a non-2xx status, carrying the
    ///   upstream `error.message` when the body has one
    /// - [`ProfilerError::MalformedResponse`] when the body has no
    ///   `choices[0].message.content` string
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ProfilerError> {
        let body = ChatRequest {
            model: &self.options.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = upstream_error_detail(&text);
            tracing::warn!(status = status.as_u16(), %detail, "completion request failed");
            return Err(ProfilerError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProfilerError::MalformedResponse {
                reason: format!("completion body is not JSON: {e}"),
            })?;

        payload
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| ProfilerError::MalformedResponse {
                reason: "missing choices[0].message.content".to_string(),
            })
    }
}

/// Pulls `error.message` out of an upstream error body.
fn upstream_error_detail(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    });
    match message {
        Some(message) => message,
        None if body.trim().is_empty() => "Unknown error".to_string(),
        None => body.trim().chars().take(MAX_ERROR_DETAIL_CHARS).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_prefers_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(upstream_error_detail(body), "Incorrect API key provided");
    }

    #[test]
    fn error_detail_falls_back_to_raw_body() {
        assert_eq!(upstream_error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(upstream_error_detail("  "), "Unknown error");
        assert_eq!(upstream_error_detail(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = CompletionClient::new(
            "https://api.example.test/v1/",
            "sk-secret",
            CompletionOptions::default(),
        )
        .expect("client builds");
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("https://api.example.test/v1\""));
    }
}
