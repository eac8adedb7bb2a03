//! # Intake Core
//!
//! Form engine for the care assessment intake form.
//!
//! This crate contains the pure form logic:
//! - The form data model and its field table
//! - Field validators and inline messages
//! - A pure reducer over form state
//! - Section completion tracking and progressive navigation
//! - The address autocomplete boundary
//! - The session store that gates and freezes submissions
//!
//! **No transport concerns**: HTTP servers and clients belong in `intake-relay` and
//! `intake-cli`. Submissions leave this crate through the [`SubmissionTransport`] trait.

#![warn(rust_2018_idioms)]

pub mod address;
pub mod completion;
pub mod constants;
pub mod error;
pub mod form;
pub mod navigation;
pub mod payload;
pub mod reducer;
pub mod session;
pub mod validation;

pub use address::{
    AddressContext, AddressFill, AddressLookup, AddressSuggestion, AddressTarget, SuggestionList,
};
pub use completion::{status, CompletionStatus};
pub use error::{
    AddressLookupError, NavigationError, ReduceError, SubmitError, SubmitResult, TransportError,
};
pub use form::{
    DatePart, DateParts, Field, FieldKind, FormData, MedicalBackground, NextOfKinDetails, Section,
    ServiceUserDetails, UnknownField,
};
pub use navigation::{next_visible_section, NavigationState};
pub use payload::SubmissionPayload;
pub use reducer::{reduce, FormAction, FormErrors, FormState};
pub use session::{FormSession, RelayReceipt, SubmissionTransport};
