//! # Intake Relay
//!
//! HTTP relay between the care assessment form and an external webhook.
//!
//! Handles:
//! - The submission endpoint, built on axum
//! - CORS for browser clients and panic containment (tower-http)
//! - OpenAPI/Swagger documentation
//! - Mapping webhook outcomes to structured JSON responses
//!
//! Form validation lives in `intake-core`; the relay only checks the one field it needs.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod envelope;
pub mod error;
pub mod relay;

use axum::{
    extract::State,
    http::{header, Method},
    response::Json,
    routing::{any, get},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::{RelayConfig, WebhookUrlSource, WEBHOOK_TIMEOUT_ENV, WEBHOOK_URL_ENV};
pub use envelope::{DebugInfo, ErrorEnvelope, HealthRes, SuccessEnvelope};
pub use error::{handle_panic, ConfigError, RelayError};
pub use relay::{relay, AppState, RelayOutcome, RELAY_PATH};

#[derive(OpenApi)]
#[openapi(
    paths(health, relay::care_assessment_webhook),
    components(schemas(HealthRes, SuccessEnvelope, DebugInfo, ErrorEnvelope))
)]
pub struct ApiDoc;

/// CORS policy for browser clients: any origin, the usual methods, JSON and bearer auth.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the relay router.
///
/// Routes:
/// - `POST|OPTIONS /care-assessment-webhook` (other methods answer 405)
/// - `GET /health`
/// - `/swagger-ui` and `/api-docs/openapi.json`
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route(RELAY_PATH, any(relay::care_assessment_webhook))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    with_middleware(routes).with_state(state)
}

/// Wrap routes in the relay's middleware stack.
///
/// Panics are caught inside the CORS layer so that the 500 envelope still carries the
/// CORS headers a browser needs to read it.
pub fn with_middleware<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Reports that the relay process is serving requests. It does not contact the webhook.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Intake relay is alive".into(),
    })
}
