use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;

use freyja_core::BrandProfile;
use freyja_profiler::{BrandExtractionPipeline, PipelineConfig, PipelineError};
use freyja_store::{AuthenticatedUser, StoreError};

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    url: Option<String>,
}

pub(super) async fn scrape_website(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<BrandProfile>, ApiError> {
    let rid = &req_id.0;

    let Json(body) = body.map_err(|e| {
        tracing::debug!(request_id = %rid, error = %e, "rejected request body");
        ApiError::new("bad_request", format!("invalid JSON body: {}", e.body_text()))
    })?;
    let url = body
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::new("bad_request", "URL is required"))?;

    let api_key = state
        .store
        .fetch_completion_api_key(user.id)
        .await
        .map_err(|e| map_store_error(rid, &e))?;

    let pipeline = BrandExtractionPipeline::with_client(
        PipelineConfig::from_app_config(&state.config, api_key),
        state.http.clone(),
    );

    tracing::info!(request_id = %rid, user_id = %user.id, url, "brand extraction started");
    let profile = pipeline
        .run(url)
        .await
        .map_err(|e| map_pipeline_error(rid, url, &e))?;

    tracing::info!(
        request_id = %rid,
        url,
        brand = %profile.brand_name,
        "brand extraction finished"
    );
    Ok(Json(profile))
}

fn map_store_error(rid: &str, error: &StoreError) -> ApiError {
    match error {
        StoreError::MissingApiKey => ApiError::new(
            "precondition_failed",
            "OpenAI API key not configured. Add it in Settings.",
        ),
        StoreError::Unauthorized => ApiError::new("unauthorized", error.to_string()),
        _ => {
            tracing::error!(request_id = %rid, error = %error, "settings lookup failed");
            ApiError::new("service_unavailable", "settings service unavailable")
        }
    }
}

fn map_pipeline_error(rid: &str, url: &str, error: &PipelineError) -> ApiError {
    tracing::warn!(request_id = %rid, url, error = %error, "brand extraction failed");
    ApiError::new("bad_gateway", error.to_string())
}
