mod images;
mod scrape;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use freyja_core::AppConfig;
use freyja_imaging::{HiggsfieldClient, IdeogramClient};
use freyja_store::SupabaseClient;

use crate::middleware::{enforce_rate_limit, request_id, require_supabase_user, RateLimitState};

/// Shared across requests. `http` is the one connection pool every outbound
/// call reuses; per-user keys are supplied at call time.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: SupabaseClient,
    pub http: reqwest::Client,
    pub ideogram: IdeogramClient,
    pub higgsfield: HiggsfieldClient,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, store: SupabaseClient, http: reqwest::Client) -> Self {
        let ideogram = IdeogramClient::with_client(http.clone(), &config.ideogram_api_base);
        let higgsfield = HiggsfieldClient::with_client(http.clone(), &config.higgsfield_api_base);
        Self {
            config,
            store,
            http,
            ideogram,
            higgsfield,
        }
    }
}

/// Error returned by every route and middleware; serialized as
/// `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self::with_status(status_for_code(code), message)
    }

    /// For replies that mirror an upstream status verbatim.
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

fn status_for_code(code: &str) -> StatusCode {
    match code {
        "bad_request" => StatusCode::BAD_REQUEST,
        "unauthorized" => StatusCode::UNAUTHORIZED,
        "precondition_failed" => StatusCode::PRECONDITION_FAILED,
        "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
        "bad_gateway" => StatusCode::BAD_GATEWAY,
        "service_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-request-id"),
        ])
}

/// Auth runs first so the limiter can key its windows by caller.
fn protected_router(state: &AppState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/scrape-website", post(scrape::scrape_website))
        .route(
            "/api/v1/generate-image-ideogram",
            post(images::generate_image_ideogram),
        )
        .route(
            "/api/v1/generate-image-nanobanana",
            post(images::generate_image_nanobanana),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    require_supabase_user,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                )),
        )
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(&state, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}
