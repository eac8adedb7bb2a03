//! Section completion tracking.
//!
//! A required field counts as complete when it is filled (non-empty after trimming) and
//! has no inline message. A section is complete when all of its required fields are.

use serde::Serialize;

use crate::constants::TOTAL_REQUIRED_FIELDS;
use crate::form::{Field, FormData, Section};
use crate::reducer::FormErrors;

/// Aggregate progress across the whole form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub total_required: usize,
    pub completed: usize,
    pub per_section_complete: [bool; 3],
    pub consent_complete: bool,
}

impl CompletionStatus {
    pub fn section_complete(&self, section: Section) -> bool {
        self.per_section_complete[section.index()]
    }

    /// True when every section and consent are complete.
    pub fn is_submittable(&self) -> bool {
        self.per_section_complete.iter().all(|&c| c) && self.consent_complete
    }

    /// Whole-number percentage of required fields completed.
    pub fn progress_percent(&self) -> u8 {
        if self.total_required == 0 {
            return 100;
        }
        let percent = self.completed * 100 / self.total_required;
        u8::try_from(percent.min(100)).unwrap_or(100)
    }
}

pub fn is_field_complete(field: Field, data: &FormData, errors: &FormErrors) -> bool {
    data.is_filled(field) && !errors.contains_key(&field)
}

pub fn is_section_complete(section: Section, data: &FormData, errors: &FormErrors) -> bool {
    section
        .required_fields()
        .iter()
        .all(|&field| is_field_complete(field, data, errors))
}

/// Required fields of `section` that are still empty or carry a message.
pub fn missing_required(section: Section, data: &FormData, errors: &FormErrors) -> Vec<Field> {
    section
        .required_fields()
        .iter()
        .copied()
        .filter(|&field| !is_field_complete(field, data, errors))
        .collect()
}

/// Completion status of `data` given its current `errors`.
pub fn status(data: &FormData, errors: &FormErrors) -> CompletionStatus {
    let mut completed = 0;
    let mut per_section_complete = [false; 3];

    for section in Section::ALL {
        let done = section
            .required_fields()
            .iter()
            .filter(|&&field| is_field_complete(field, data, errors))
            .count();
        completed += done;
        per_section_complete[section.index()] = done == section.required_fields().len();
    }

    let consent_complete = data.consent;
    if consent_complete {
        completed += 1;
    }

    CompletionStatus {
        total_required: TOTAL_REQUIRED_FIELDS,
        completed,
        per_section_complete,
        consent_complete,
    }
}
