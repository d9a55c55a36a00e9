//! Pass-through image generation. The caller supplies provider credentials in
//! the body; replies are reshaped for the studio front end.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use freyja_imaging::{ImagingError, NanoBananaRequest};
use freyja_store::AuthenticatedUser;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IdeogramBody {
    prompt: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NanoBananaBody {
    prompt: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    #[serde(rename = "aspect_ratio")]
    aspect_ratio: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct IdeogramReply {
    data: Vec<ImageUrl>,
}

pub(super) async fn generate_image_ideogram(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<IdeogramBody>, JsonRejection>,
) -> Result<Json<IdeogramReply>, ApiError> {
    let rid = &req_id.0;
    let Json(body) = body.map_err(|e| reject_body(rid, &e))?;
    let (Some(prompt), Some(api_key)) = (
        present(body.prompt.as_deref()),
        present(body.api_key.as_deref()),
    ) else {
        return Err(ApiError::new("bad_request", "Missing prompt or apiKey"));
    };

    tracing::info!(request_id = %rid, user_id = %user.id, "ideogram generation started");
    let url = state
        .ideogram
        .generate(api_key, prompt)
        .await
        .map_err(|e| map_imaging_error(rid, &e))?;

    Ok(Json(IdeogramReply {
        data: vec![ImageUrl { url }],
    }))
}

pub(super) async fn generate_image_nanobanana(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<NanoBananaBody>, JsonRejection>,
) -> Result<Json<ImageUrl>, ApiError> {
    let rid = &req_id.0;
    let Json(body) = body.map_err(|e| reject_body(rid, &e))?;
    let (Some(prompt), Some(api_key), Some(api_secret)) = (
        present(body.prompt.as_deref()),
        present(body.api_key.as_deref()),
        present(body.api_secret.as_deref()),
    ) else {
        return Err(ApiError::new(
            "bad_request",
            "Missing prompt, apiKey, or apiSecret",
        ));
    };

    tracing::info!(request_id = %rid, user_id = %user.id, "nano banana generation started");
    let request = NanoBananaRequest::new(prompt, body.aspect_ratio.as_deref());
    let url = state
        .higgsfield
        .generate(api_key, api_secret, &request)
        .await
        .map_err(|e| map_imaging_error(rid, &e))?;

    Ok(Json(ImageUrl { url }))
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn reject_body(rid: &str, error: &JsonRejection) -> ApiError {
    tracing::debug!(request_id = %rid, error = %error, "rejected request body");
    ApiError::new("bad_request", format!("invalid JSON body: {}", error.body_text()))
}

/// Provider statuses are mirrored; everything else is a bad gateway.
fn map_imaging_error(rid: &str, error: &ImagingError) -> ApiError {
    tracing::warn!(request_id = %rid, error = %error, "image generation failed");
    match error {
        ImagingError::Upstream { status, .. } => ApiError::with_status(
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            error.to_string(),
        ),
        ImagingError::MissingImage { .. } | ImagingError::Http(_) => {
            ApiError::new("bad_gateway", error.to_string())
        }
    }
}
