//! JSON bodies returned by the relay.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for an accepted submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    pub success: bool,
    pub message: String,
    pub debug_info: DebugInfo,
}

/// Traceability details for an accepted submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub webhook_url: String,
    pub response_status: u16,
    pub client_name: String,
}

/// Response for every failure: a short category, a message and diagnostic context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub error: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}
