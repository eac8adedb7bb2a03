//! Submission payload.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::form::{FormData, MedicalBackground, NextOfKinDetails, ServiceUserDetails};

/// Frozen snapshot of a form at the moment it is submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub service_user_details: ServiceUserDetails,
    pub next_of_kin_details: NextOfKinDetails,
    pub medical_background: MedicalBackground,
    pub consent: bool,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub submitted_at: String,
}

impl SubmissionPayload {
    pub fn new(data: &FormData, submitted_at: DateTime<Utc>) -> Self {
        Self {
            service_user_details: data.service_user_details.clone(),
            next_of_kin_details: data.next_of_kin_details.clone(),
            medical_background: data.medical_background.clone(),
            consent: data.consent,
            submitted_at: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn client_name(&self) -> &str {
        self.service_user_details.first_name.trim()
    }
}
