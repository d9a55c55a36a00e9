use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use freyja_core::SupabaseSettings;

use crate::error::StoreError;

/// The caller behind a bearer token, as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SettingsRow {
    openai_api_key: Option<String>,
}

/// REST client for the hosted auth and settings endpoints.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    settings: SupabaseSettings,
}

impl SupabaseClient {
    /// # Errors
    ///
    /// Returns [`StoreError::Request`] if the HTTP client cannot be built.
    pub fn new(settings: SupabaseSettings) -> Result<Self, StoreError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            settings: SupabaseSettings {
                url: settings.url.trim_end_matches('/').to_string(),
                ..settings
            },
        })
    }

    /// Resolves `access_token` to a user via `GET /auth/v1/user`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Unauthorized`] when the auth service rejects the token
    /// - [`StoreError::Request`] / [`StoreError::UnexpectedStatus`] when the
    ///   service cannot be reached or misbehaves
    /// - [`StoreError::Deserialize`] on an unexpected body
    pub async fn authenticate_user(
        &self,
        access_token: &str,
    ) -> Result<AuthenticatedUser, StoreError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.settings.url))
            .header("apikey", &self.settings.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => response
                .json::<AuthenticatedUser>()
                .await
                .map_err(|e| StoreError::Deserialize(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::Unauthorized),
            status => {
                tracing::warn!(status = status.as_u16(), "auth service returned unexpected status");
                Err(StoreError::UnexpectedStatus {
                    context: "auth service",
                    status: status.as_u16(),
                })
            }
        }
    }

    /// Reads the user's completion API key from the `settings` table.
    ///
    /// # Errors
    ///
    /// - [`StoreError::MissingApiKey`] when there is no row or the key is blank
    /// - [`StoreError::Request`] / [`StoreError::UnexpectedStatus`] /
    ///   [`StoreError::Deserialize`] on service failures
    pub async fn fetch_completion_api_key(&self, user_id: Uuid) -> Result<String, StoreError> {
        let url = format!(
            "{}/rest/v1/settings?user_id=eq.{}&select=openai_api_key&limit=1",
            self.settings.url, user_id
        );
        let response = self
            .http
            .get(url)
            .header("apikey", &self.settings.service_role_key)
            .bearer_auth(&self.settings.service_role_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %user_id, "settings query failed");
            return Err(StoreError::UnexpectedStatus {
                context: "settings service",
                status: status.as_u16(),
            });
        }

        let mut rows: Vec<SettingsRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Deserialize(e.to_string()))?;

        rows.pop()
            .and_then(|row| row.openai_api_key)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(StoreError::MissingApiKey)
    }
}
