//! Pure form reducer.
//!
//! Every edit to a form is expressed as a [`FormAction`]. [`reduce`] never mutates its
//! input; it returns the next [`FormState`] with the edited values and the inline
//! messages for exactly the fields the action touched.

use std::collections::BTreeMap;

use crate::address::{AddressFill, AddressTarget};
use crate::error::ReduceError;
use crate::form::{DatePart, Field, FormData};
use crate::validation::validate_field;

/// Inline validation messages keyed by field.
pub type FormErrors = BTreeMap<Field, String>;

/// Values plus their current inline messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub data: FormData,
    pub errors: FormErrors,
}

impl FormState {
    /// Build state for data that did not come through the reducer, validating every field.
    pub fn from_data(data: FormData) -> Self {
        let errors = validate_all(&data);
        Self { data, errors }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    SetText { field: Field, value: String },
    SetDatePart {
        field: Field,
        part: DatePart,
        value: String,
    },
    SetConsent(bool),
    ApplyAddress {
        target: AddressTarget,
        fill: AddressFill,
    },
    Reset,
}

impl FormAction {
    pub fn set_text(field: Field, value: impl Into<String>) -> Self {
        FormAction::SetText {
            field,
            value: value.into(),
        }
    }

    pub fn set_date_part(field: Field, part: DatePart, value: impl Into<String>) -> Self {
        FormAction::SetDatePart {
            field,
            part,
            value: value.into(),
        }
    }
}

/// Compute the state that follows `state` once `action` is applied.
///
/// # Errors
/// Returns a [`ReduceError`] if a text edit targets a date field or vice versa; `state`
/// is left as it was.
pub fn reduce(state: &FormState, action: FormAction) -> Result<FormState, ReduceError> {
    let mut next = state.clone();
    match action {
        FormAction::SetText { field, value } => {
            let slot = next
                .data
                .text_mut(field)
                .ok_or(ReduceError::NotATextField(field))?;
            *slot = value;
            refresh_error(&mut next, field);
        }
        FormAction::SetDatePart { field, part, value } => {
            let date = next
                .data
                .date_mut(field)
                .ok_or(ReduceError::NotADateField(field))?;
            *date.part_mut(part) = value;
            refresh_error(&mut next, field);
        }
        FormAction::SetConsent(consent) => next.data.consent = consent,
        FormAction::ApplyAddress { target, fill } => {
            for (field, value) in fill.assignments(target) {
                if let Some(slot) = next.data.text_mut(field) {
                    *slot = value.to_string();
                }
                refresh_error(&mut next, field);
            }
        }
        FormAction::Reset => next = FormState::default(),
    }
    Ok(next)
}

/// Inline messages for every field of `data`.
pub fn validate_all(data: &FormData) -> FormErrors {
    Field::ALL
        .iter()
        .filter_map(|&field| validate_field(field, data).map(|msg| (field, msg)))
        .collect()
}

fn refresh_error(state: &mut FormState, field: Field) {
    match validate_field(field, &state.data) {
        Some(message) => {
            state.errors.insert(field, message);
        }
        None => {
            state.errors.remove(&field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::tests::high_street;

    #[test]
    fn set_text_updates_value_and_error_without_touching_input() {
        let start = FormState::default();
        let next = reduce(
            &start,
            FormAction::set_text(Field::ServiceUserFirstName, "Jo"),
        )
        .expect("text field");

        assert_eq!(start, FormState::default());
        assert_eq!(next.data.service_user_details.first_name, "Jo");
        assert!(next.errors.contains_key(&Field::ServiceUserFirstName));

        let fixed = reduce(&next, FormAction::set_text(Field::ServiceUserFirstName, "Joan"))
            .expect("text field");
        assert!(!fixed.errors.contains_key(&Field::ServiceUserFirstName));
    }

    #[test]
    fn clearing_a_field_clears_its_warning() {
        let state = reduce(
            &FormState::default(),
            FormAction::set_text(Field::NextOfKinPhone, "123"),
        )
        .expect("text field");
        assert!(state.errors.contains_key(&Field::NextOfKinPhone));

        let cleared =
            reduce(&state, FormAction::set_text(Field::NextOfKinPhone, "")).expect("text field");
        assert!(cleared.errors.is_empty());
    }

    #[test]
    fn date_parts_are_set_individually() {
        let mut state = FormState::default();
        for (part, value) in [(DatePart::Day, "31"), (DatePart::Month, "2"), (DatePart::Year, "1950")] {
            state = reduce(
                &state,
                FormAction::set_date_part(Field::ServiceUserDateOfBirth, part, value),
            )
            .expect("date field");
        }
        assert!(state.errors.contains_key(&Field::ServiceUserDateOfBirth));

        state = reduce(
            &state,
            FormAction::set_date_part(Field::ServiceUserDateOfBirth, DatePart::Day, "28"),
        )
        .expect("date field");
        assert!(state.errors.is_empty());
        assert_eq!(state.data.service_user_details.date_of_birth.day, "28");
    }

    #[test]
    fn mismatched_field_kinds_are_rejected() {
        let state = FormState::default();
        assert_eq!(
            reduce(&state, FormAction::set_text(Field::ServiceUserClientStartDate, "x")),
            Err(ReduceError::NotATextField(Field::ServiceUserClientStartDate))
        );
        assert_eq!(
            reduce(
                &state,
                FormAction::set_date_part(Field::Allergies, DatePart::Year, "2020")
            ),
            Err(ReduceError::NotADateField(Field::Allergies))
        );
    }

    #[test]
    fn apply_address_fills_only_the_target() {
        let fill = AddressFill::from_suggestion(&high_street());
        let state = reduce(
            &FormState::default(),
            FormAction::ApplyAddress {
                target: AddressTarget::NextOfKin,
                fill,
            },
        )
        .expect("address");

        assert_eq!(state.data.next_of_kin_details.address, "12 High Street");
        assert_eq!(state.data.next_of_kin_details.city, "Leeds");
        assert_eq!(state.data.next_of_kin_details.region, "England");
        assert_eq!(state.data.next_of_kin_details.postcode, "LS1 4AB");
        assert_eq!(state.data.service_user_details.address, "");
    }

    #[test]
    fn reset_returns_to_an_empty_form() {
        let state = reduce(&FormState::default(), FormAction::SetConsent(true)).expect("consent");
        assert!(state.data.consent);
        assert_eq!(
            reduce(&state, FormAction::Reset).expect("reset"),
            FormState::default()
        );
    }

    #[test]
    fn from_data_validates_every_field() {
        let mut data = FormData::default();
        data.service_user_details.email = "bad".into();
        data.next_of_kin_details.last_name = "X".into();
        let state = FormState::from_data(data);
        assert_eq!(
            state.errors.keys().copied().collect::<Vec<_>>(),
            vec![Field::ServiceUserEmail, Field::NextOfKinLastName]
        );
    }
}
