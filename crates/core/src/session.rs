//! Form session store.
//!
//! A [`FormSession`] is the single owner of one form's state. All edits go through
//! [`FormSession::dispatch`], which runs the pure reducer and then re-evaluates section
//! navigation. Submitting is split into [`FormSession::begin_submit`] and
//! [`FormSession::finish_submit`] around the network call so that a second submit
//! cannot start while one is in flight.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::address::{AddressFill, AddressLookup, AddressTarget, SuggestionList};
use crate::completion::{self, missing_required, CompletionStatus};
use crate::constants::{MIN_ADDRESS_QUERY_LENGTH, SUBMIT_SUCCESS_MESSAGE};
use crate::error::{
    AddressLookupError, NavigationError, ReduceError, SubmitError, SubmitResult, TransportError,
};
use crate::form::{DatePart, Field, FormData, Section};
use crate::navigation::NavigationState;
use crate::payload::SubmissionPayload;
use crate::reducer::{reduce, FormAction, FormErrors, FormState};

/// What the relay reported for an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayReceipt {
    pub message: String,
    /// Status the webhook returned to the relay, when reported.
    pub upstream_status: Option<u16>,
}

/// Sends a frozen payload to the submission relay.
pub trait SubmissionTransport {
    fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<RelayReceipt, TransportError>> + Send;
}

#[derive(Clone, Debug, Default)]
pub struct FormSession {
    state: FormState,
    navigation: NavigationState,
    suggestions: Option<SuggestionList>,
    is_submitting: bool,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from previously entered data, validating every field and
    /// unlocking as many sections as are already complete.
    pub fn from_data(data: FormData) -> Self {
        let mut session = Self {
            state: FormState::from_data(data),
            ..Self::default()
        };
        session
            .navigation
            .recompute(&session.state.data, &session.state.errors);
        session
    }

    pub fn data(&self) -> &FormData {
        &self.state.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.state.errors
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn current_section(&self) -> Section {
        self.navigation.current
    }

    pub fn suggestions(&self) -> Option<&SuggestionList> {
        self.suggestions.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn status(&self) -> CompletionStatus {
        completion::status(&self.state.data, &self.state.errors)
    }

    /// Apply an action and re-evaluate navigation.
    ///
    /// # Errors
    /// Returns a [`ReduceError`] if the action does not fit the field's kind.
    pub fn dispatch(&mut self, action: FormAction) -> Result<(), ReduceError> {
        let reset = matches!(action, FormAction::Reset);
        self.state = reduce(&self.state, action)?;
        if reset {
            self.navigation = NavigationState::default();
            self.suggestions = None;
        }
        self.navigation
            .recompute(&self.state.data, &self.state.errors);
        Ok(())
    }

    pub fn set_text(&mut self, field: Field, value: impl Into<String>) -> Result<(), ReduceError> {
        self.dispatch(FormAction::set_text(field, value))
    }

    pub fn set_date_part(
        &mut self,
        field: Field,
        part: DatePart,
        value: impl Into<String>,
    ) -> Result<(), ReduceError> {
        self.dispatch(FormAction::set_date_part(field, part, value))
    }

    pub fn set_consent(&mut self, consent: bool) -> Result<(), ReduceError> {
        self.dispatch(FormAction::SetConsent(consent))
    }

    pub fn go_back(&mut self) -> bool {
        self.navigation.go_back()
    }

    pub fn next_section(&mut self) -> Result<Section, NavigationError> {
        self.navigation
            .next_section(&self.state.data, &self.state.errors)
    }

    /// Ask `lookup` for suggestions and open them for `target`.
    ///
    /// Short queries close the list without calling the lookup. Returns the number of
    /// suggestions offered.
    pub fn search_addresses(
        &mut self,
        lookup: &impl AddressLookup,
        query: &str,
        target: AddressTarget,
    ) -> Result<usize, AddressLookupError> {
        let query = query.trim();
        if query.chars().count() < MIN_ADDRESS_QUERY_LENGTH {
            self.suggestions = None;
            return Ok(0);
        }

        let items = lookup.search(query).inspect_err(|e| {
            tracing::warn!("address lookup failed: {}", e);
            self.suggestions = None;
        })?;
        let count = items.len();
        self.suggestions = (!items.is_empty()).then_some(SuggestionList { target, items });
        Ok(count)
    }

    /// Fill the target's address fields from the chosen suggestion and close the list.
    pub fn select_suggestion(&mut self, id: &str) -> Result<(), AddressLookupError> {
        let list = self
            .suggestions
            .as_ref()
            .ok_or(AddressLookupError::NoSuggestions)?;
        let suggestion = list
            .find(id)
            .ok_or_else(|| AddressLookupError::UnknownSuggestion(id.to_string()))?;
        let action = FormAction::ApplyAddress {
            target: list.target,
            fill: AddressFill::from_suggestion(suggestion),
        };

        self.suggestions = None;
        self.dispatch(action)?;
        Ok(())
    }

    pub fn dismiss_suggestions(&mut self) {
        self.suggestions = None;
    }

    /// Gate a submit attempt and freeze the payload.
    ///
    /// # Errors
    /// - [`SubmitError::AlreadySubmitting`] while a previous attempt is in flight
    /// - [`SubmitError::Incomplete`] listing every outstanding required field
    /// - [`SubmitError::FinalSectionNotReached`] until navigation has unlocked the last
    ///   section
    /// - [`SubmitError::ConsentRequired`] when consent has not been given
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> SubmitResult<SubmissionPayload> {
        if self.is_submitting {
            return Err(SubmitError::AlreadySubmitting);
        }

        let missing: Vec<Field> = Section::ALL
            .into_iter()
            .flat_map(|s| missing_required(s, &self.state.data, &self.state.errors))
            .collect();
        if !missing.is_empty() {
            return Err(SubmitError::Incomplete { missing });
        }
        if !self.navigation.can_submit() {
            return Err(SubmitError::FinalSectionNotReached(
                Section::MedicalBackground,
            ));
        }
        if !self.state.data.consent {
            return Err(SubmitError::ConsentRequired);
        }

        self.is_submitting = true;
        Ok(SubmissionPayload::new(&self.state.data, now))
    }

    /// Record the outcome of the network call started after [`Self::begin_submit`].
    ///
    /// On success the form is cleared and marked submitted, and the confirmation text is
    /// returned. On failure the entered data is kept.
    pub fn finish_submit(
        &mut self,
        outcome: Result<RelayReceipt, TransportError>,
    ) -> SubmitResult<String> {
        if !self.is_submitting {
            return Err(SubmitError::NotSubmitting);
        }
        self.is_submitting = false;

        match outcome {
            Ok(receipt) => {
                tracing::info!(
                    "submission accepted: {} (upstream status {:?})",
                    receipt.message,
                    receipt.upstream_status
                );
                self.state = FormState::default();
                self.suggestions = None;
                self.navigation = NavigationState::default();
                self.navigation.mark_submitted();
                Ok(SUBMIT_SUCCESS_MESSAGE.to_string())
            }
            Err(e) => {
                tracing::warn!("submission failed: {}", e);
                Err(SubmitError::Transport(e))
            }
        }
    }

    /// Run one full submit cycle through `transport`.
    pub async fn submit<T: SubmissionTransport>(&mut self, transport: &T) -> SubmitResult<String> {
        let payload = self.begin_submit(Utc::now())?;
        let outcome = transport.send(&payload).await;
        self.finish_submit(outcome)
    }
}
