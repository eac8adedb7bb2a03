use std::any::Any;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::envelope::ErrorEnvelope;

/// Startup configuration errors.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid webhook timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Everything a single relay request can fail with.
///
/// Each variant maps to one HTTP status and one `error` category string in the JSON
/// body. None of them affect the server beyond the request that produced them.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("webhook URL is not configured ({source_name})")]
    MissingWebhookUrl { source_name: String },
    #[error("webhook URL is invalid: {reason}")]
    InvalidWebhookUrl { reason: String },
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("missing required field {0}")]
    MissingRequiredField(&'static str),
    #[error("method {0} is not allowed")]
    MethodNotAllowed(Method),
    #[error("failed to reach webhook {webhook_url}: {error}")]
    UpstreamNetwork {
        webhook_url: String,
        #[source]
        error: reqwest::Error,
    },
    #[error("webhook returned {status}")]
    UpstreamStatus { status: u16, body: Option<String> },
    #[error("unhandled error: {message}")]
    Unhandled {
        message: String,
        stack: Option<String>,
    },
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingWebhookUrl { .. }
            | RelayError::InvalidWebhookUrl { .. }
            | RelayError::Unhandled { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::InvalidJson(_) | RelayError::MissingRequiredField(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::UpstreamNetwork { .. } | RelayError::UpstreamStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Short category reported in the `error` field.
    pub fn category(&self) -> &'static str {
        match self {
            RelayError::MissingWebhookUrl { .. } | RelayError::InvalidWebhookUrl { .. } => {
                "Service configuration error"
            }
            RelayError::InvalidJson(_) => "Invalid JSON",
            RelayError::MissingRequiredField(_) => "Missing required fields",
            RelayError::MethodNotAllowed(_) => "Method not allowed",
            RelayError::UpstreamNetwork { .. } => "Failed to send to webhook",
            RelayError::UpstreamStatus { .. } => "Webhook request failed",
            RelayError::Unhandled { .. } => "Internal server error",
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let (message, details) = match self {
            RelayError::MissingWebhookUrl { source_name } => (
                "Webhook URL is not configured".to_string(),
                json!({ "setting": source_name }),
            ),
            RelayError::InvalidWebhookUrl { reason } => (
                "Webhook URL is invalid".to_string(),
                json!({ "reason": reason }),
            ),
            RelayError::InvalidJson(e) => (
                "Request body must be valid JSON".to_string(),
                json!({ "parseError": e.to_string(), "line": e.line(), "column": e.column() }),
            ),
            RelayError::MissingRequiredField(field) => (
                format!("{field} is required"),
                json!({ "required": [field] }),
            ),
            RelayError::MethodNotAllowed(method) => (
                "Only POST requests are accepted".to_string(),
                json!({ "method": method.as_str(), "allowed": ["POST", "OPTIONS"] }),
            ),
            RelayError::UpstreamNetwork { webhook_url, error } => (
                "Could not reach the webhook".to_string(),
                json!({
                    "webhookUrl": webhook_url,
                    "reason": error.to_string(),
                    "timeout": error.is_timeout(),
                    "connect": error.is_connect(),
                }),
            ),
            RelayError::UpstreamStatus { status, body } => (
                format!("Webhook returned status {status}"),
                json!({ "status": status, "body": body }),
            ),
            RelayError::Unhandled { message, stack } => (
                message.clone(),
                json!({ "stack": stack }),
            ),
        };

        ErrorEnvelope {
            error: self.category().to_string(),
            message,
            details,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("relay error: {}", self);
        } else {
            tracing::warn!("relay rejected request: {}", self);
        }
        (status, Json(self.envelope())).into_response()
    }
}

/// Convert a panic caught by `CatchPanicLayer` into a 500 response.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    RelayError::Unhandled {
        message,
        stack: None,
    }
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases: Vec<(RelayError, StatusCode, &str)> = vec![
            (
                RelayError::MissingWebhookUrl {
                    source_name: "X".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "Service configuration error",
            ),
            (
                RelayError::MissingRequiredField("serviceUserDetails.firstName"),
                StatusCode::BAD_REQUEST,
                "Missing required fields",
            ),
            (
                RelayError::MethodNotAllowed(Method::DELETE),
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed",
            ),
            (
                RelayError::UpstreamStatus {
                    status: 503,
                    body: None,
                },
                StatusCode::BAD_GATEWAY,
                "Webhook request failed",
            ),
            (
                RelayError::Unhandled {
                    message: "boom".into(),
                    stack: None,
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ),
        ];

        for (err, status, category) in cases {
            assert_eq!(err.status_code(), status, "{err}");
            assert_eq!(err.envelope().error, category);
        }
    }

    #[test]
    fn invalid_json_reports_position() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{\"a\":").expect_err("bad json");
        let envelope = RelayError::InvalidJson(parse_err).envelope();
        assert_eq!(envelope.error, "Invalid JSON");
        assert_eq!(envelope.details["line"], 1);
        assert!(envelope.details["parseError"].is_string());
    }

    #[test]
    fn upstream_status_embeds_body() {
        let envelope = RelayError::UpstreamStatus {
            status: 503,
            body: Some("maintenance".into()),
        }
        .envelope();
        assert_eq!(envelope.message, "Webhook returned status 503");
        assert_eq!(envelope.details["status"], 503);
        assert_eq!(envelope.details["body"], "maintenance");
    }

    #[test]
    fn panic_payloads_become_internal_errors() {
        let response = handle_panic(Box::new("exploded"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
