use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use freyja_store::{AuthenticatedUser, StoreError};

use crate::api::{ApiError, AppState};

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter shared by every protected route, with one window per
/// authenticated caller. Requests without a resolved user share the `None`
/// window.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<HashMap<Option<Uuid>, RateLimitWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts one request for `caller`; `false` once the window is full.
    async fn try_acquire(&self, caller: Option<Uuid>) -> bool {
        let mut windows = self.state.lock().await;
        let now = Instant::now();
        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let window = windows.entry(caller).or_insert(RateLimitWindow {
            started_at: now,
            count: 0,
        });
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Resolves the bearer token to a Supabase user and stores it as a request
/// extension. A missing token is rejected before any backend call.
pub async fn require_supabase_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer_token(req.headers().get(AUTHORIZATION)) else {
        return ApiError::new("unauthorized", "missing bearer token").into_response();
    };

    match state.store.authenticate_user(token).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "caller authenticated");
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(StoreError::Unauthorized) => {
            ApiError::new("unauthorized", "invalid or expired access token").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "auth service unavailable");
            ApiError::new("service_unavailable", "authentication service unavailable")
                .into_response()
        }
    }
}

/// Middleware enforcing a fixed request-per-window limit per caller.
///
/// Must sit inside [`require_supabase_user`] so the caller is known.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let caller = req.extensions().get::<AuthenticatedUser>().map(|u| u.id);
    if !rate_limit.try_acquire(caller).await {
        tracing::debug!(user_id = ?caller, "rate limit exceeded");
        return ApiError::new("rate_limited", "rate limit exceeded").into_response();
    }

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn windows_are_counted_per_caller() {
        let limiter = RateLimitState::new(1, Duration::from_secs(60));
        let alice = Some(Uuid::new_v4());
        let bob = Some(Uuid::new_v4());

        assert!(limiter.try_acquire(alice).await);
        assert!(!limiter.try_acquire(alice).await);
        assert!(limiter.try_acquire(bob).await);
    }

    #[tokio::test]
    async fn expired_windows_reset() {
        let limiter = RateLimitState::new(1, Duration::from_millis(20));
        let caller = Some(Uuid::new_v4());

        assert!(limiter.try_acquire(caller).await);
        assert!(!limiter.try_acquire(caller).await);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(limiter.try_acquire(caller).await);
        assert_eq!(limiter.state.lock().await.len(), 1);
    }

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_header() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn extract_bearer_token_rejects_blank_token() {
        let header = HeaderValue::from_static("Bearer   ");
        assert_eq!(extract_bearer_token(Some(&header)), None);
        assert_eq!(extract_bearer_token(None), None);
    }
}
