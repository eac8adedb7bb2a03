//! Submission relay.
//!
//! Accepts a care assessment payload, checks only that the service user's first name is
//! present, and forwards the payload unchanged to the configured webhook. Field-level
//! validation happens in the form engine before submit; the relay deliberately trusts it.
//!
//! Each request makes at most one outbound call. There are no retries.

use std::error::Error as _;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::Instrument;

use intake_types::{NonEmptyText, FIRST_NAME_KEY, SERVICE_USER_DETAILS_KEY};

use crate::config::RelayConfig;
use crate::envelope::{DebugInfo, ErrorEnvelope, SuccessEnvelope};
use crate::error::RelayError;

/// Path the form posts submissions to.
pub const RELAY_PATH: &str = "/care-assessment-webhook";

const REQUIRED_FIRST_NAME: &str = "serviceUserDetails.firstName";

/// Shared state for relay handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<RelayConfig>,
    client: reqwest::Client,
}

impl AppState {
    /// Build state with an HTTP client bounded by the configured webhook timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed (e.g. no TLS backend).
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.webhook_timeout())
            .build()?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}

/// Result of a successfully handled relay request.
#[derive(Debug)]
pub enum RelayOutcome {
    /// CORS preflight; answered without touching the webhook.
    Preflight,
    Forwarded(SuccessEnvelope),
}

impl IntoResponse for RelayOutcome {
    fn into_response(self) -> Response {
        match self {
            RelayOutcome::Preflight => (StatusCode::OK, "ok").into_response(),
            RelayOutcome::Forwarded(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        }
    }
}

/// Handle one relay request.
///
/// # Errors
/// See [`RelayError`] for the full taxonomy; every failure is returned, never panicked.
pub async fn relay(
    state: &AppState,
    method: &Method,
    body: &[u8],
) -> Result<RelayOutcome, RelayError> {
    if *method == Method::OPTIONS {
        return Ok(RelayOutcome::Preflight);
    }
    if *method != Method::POST {
        return Err(RelayError::MethodNotAllowed(method.clone()));
    }

    let webhook_url = state.config.webhook_url()?;

    let payload: Value = serde_json::from_slice(body).map_err(RelayError::InvalidJson)?;
    let client_name = required_first_name(&payload)?;

    tracing::info!("forwarding submission to webhook");

    let response = state
        .client
        .post(webhook_url.clone())
        .json(&payload)
        .send()
        .await
        .map_err(|error| {
            if error.is_builder() {
                RelayError::Unhandled {
                    message: error.to_string(),
                    stack: Some(source_chain(&error)),
                }
            } else {
                RelayError::UpstreamNetwork {
                    webhook_url: webhook_url.to_string(),
                    error,
                }
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.ok().filter(|b| !b.is_empty());
        return Err(RelayError::UpstreamStatus {
            status: status.as_u16(),
            body,
        });
    }

    tracing::info!("webhook accepted submission with status {}", status);

    Ok(RelayOutcome::Forwarded(SuccessEnvelope {
        success: true,
        message: "Form submitted successfully".into(),
        debug_info: DebugInfo {
            webhook_url: webhook_url.to_string(),
            response_status: status.as_u16(),
            client_name: client_name.into_inner(),
        },
    }))
}

#[utoipa::path(
    post,
    path = "/care-assessment-webhook",
    responses(
        (status = 200, description = "Submission forwarded", body = SuccessEnvelope),
        (status = 400, description = "Invalid JSON or missing first name", body = ErrorEnvelope),
        (status = 405, description = "Method not allowed", body = ErrorEnvelope),
        (status = 500, description = "Service configuration or internal error", body = ErrorEnvelope),
        (status = 502, description = "Webhook unreachable or rejected the submission", body = ErrorEnvelope)
    )
)]
/// Relay endpoint
///
/// Forwards a care assessment submission to the configured webhook. `OPTIONS` requests
/// are answered as CORS preflight; every method other than `POST` is rejected.
#[axum::debug_handler]
pub async fn care_assessment_webhook(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("relay", %request_id, %method);

    relay(&state, &method, &body)
        .instrument(span)
        .await
        .into_response()
}

fn required_first_name(payload: &Value) -> Result<NonEmptyText, RelayError> {
    payload
        .get(SERVICE_USER_DETAILS_KEY)
        .and_then(|details| details.get(FIRST_NAME_KEY))
        .and_then(Value::as_str)
        .and_then(|name| NonEmptyText::new(name).ok())
        .ok_or(RelayError::MissingRequiredField(REQUIRED_FIRST_NAME))
}

fn source_chain(error: &reqwest::Error) -> String {
    let mut chain = vec![error.to_string()];
    let mut source = error.source();
    while let Some(e) = source {
        chain.push(e.to_string());
        source = e.source();
    }
    chain.join("\ncaused by: ")
}
