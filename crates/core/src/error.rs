use crate::form::{Field, Section};

/// Errors from applying a [`crate::FormAction`] to form state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReduceError {
    #[error("{0} is a date field; set its day, month or year instead")]
    NotATextField(Field),
    #[error("{0} is not a date field")]
    NotADateField(Field),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("{section} is incomplete ({missing} required fields outstanding)")]
    SectionIncomplete { section: Section, missing: usize },
    #[error("{0} is the last section")]
    NoNextSection(Section),
    #[error("the form has already been submitted")]
    AlreadySubmitted,
}

/// Reasons a submit attempt is refused or fails.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("Please complete all required fields before submitting ({} missing)", .missing.len())]
    Incomplete { missing: Vec<Field> },
    #[error("Please continue to {0} before submitting")]
    FinalSectionNotReached(Section),
    #[error("Please confirm consent before submitting")]
    ConsentRequired,
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("no submission is in progress")]
    NotSubmitting,
    #[error("There was an error submitting the form: {0}. Please try again.")]
    Transport(#[from] TransportError),
}

/// Failure reported by a [`crate::SubmissionTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("could not reach the submission service: {0}")]
    Network(String),
    #[error("submission rejected ({status}): {error}: {message}")]
    Rejected {
        status: u16,
        error: String,
        message: String,
    },
    #[error("unexpected response from the submission service: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressLookupError {
    #[error("address lookup failed: {0}")]
    Lookup(String),
    #[error("no suggestion with id {0}")]
    UnknownSuggestion(String),
    #[error("no address suggestions are open")]
    NoSuggestions,
    #[error("could not apply the selected address: {0}")]
    Apply(#[from] ReduceError),
}

pub type SubmitResult<T> = std::result::Result<T, SubmitError>;
