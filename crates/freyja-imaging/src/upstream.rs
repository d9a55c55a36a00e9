use reqwest::Response;
use serde_json::Value;

use crate::error::ImagingError;

/// Passes 2xx responses through; anything else becomes
/// [`ImagingError::Upstream`] carrying the status line and body text.
pub(crate) async fn ensure_success(
    response: Response,
    label: &'static str,
) -> Result<Response, ImagingError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = status.canonical_reason().unwrap_or_default().to_string();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), label, body = %body, "image provider rejected request");
    Err(ImagingError::Upstream {
        label,
        status: status.as_u16(),
        reason,
        body,
    })
}

/// First non-empty string found at any of `pointers`, in order.
pub(crate) fn first_url(body: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .filter_map(|p| body.pointer(p).and_then(Value::as_str))
        .find(|url| !url.is_empty())
        .map(str::to_owned)
}
