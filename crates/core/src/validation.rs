//! Field validators.
//!
//! Pure predicates over user input, plus the per-field inline message used by the
//! reducer. Messages are advisory: an empty value never produces a message, the
//! completion tracker is what reports missing required fields.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::constants::{MIN_NAME_LENGTH, PHONE_DIGITS, PHONE_PREFIX};
use crate::form::{DateParts, Field, FieldKind, FieldValue, FormData};
use intake_types::NonEmptyText;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Letters and spaces only, at least three characters long.
///
/// Surrounding spaces count towards the length; whether a field is filled at all is the
/// completion tracker's concern.
pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_LENGTH
        && name.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

/// Contains something shaped like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Eleven digits starting with `0`, ignoring any whitespace.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    digits.len() == PHONE_DIGITS
        && digits.starts_with(PHONE_PREFIX)
        && digits.bytes().all(|b| b.is_ascii_digit())
}

/// A real calendar date with a four digit year.
pub fn is_valid_date(date: &DateParts) -> bool {
    parse_date(date).is_some()
}

/// Parse a [`DateParts`] triple into a calendar date.
pub fn parse_date(date: &DateParts) -> Option<NaiveDate> {
    let year = date.year.trim();
    if year.len() != 4 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = date.month.trim().parse().ok()?;
    let day: u32 = date.day.trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether an inline warning should be visible for `value`.
///
/// A warning shows only once something has been typed and it fails `is_valid`. The
/// same predicate drives both the warning text and the field description styling.
pub fn should_warn(value: &str, is_valid: impl Fn(&str) -> bool) -> bool {
    NonEmptyText::is_filled(value) && !is_valid(value)
}

/// Inline message for `field`, or `None` when the value is acceptable or not yet entered.
pub fn validate_field(field: Field, data: &FormData) -> Option<String> {
    match (field.kind(), data.value(field)) {
        (FieldKind::Name, FieldValue::Text(value)) => should_warn(value, is_valid_name)
            .then(|| {
                format!(
                    "{} must be at least {MIN_NAME_LENGTH} characters and contain only letters and spaces",
                    field.label()
                )
            }),
        (FieldKind::Email, FieldValue::Text(value)) => should_warn(value, is_valid_email)
            .then(|| "Please enter a valid email address".to_string()),
        (FieldKind::Phone, FieldValue::Text(value)) => should_warn(value, is_valid_phone)
            .then(|| {
                format!("Please enter a valid {PHONE_DIGITS}-digit phone number starting with {PHONE_PREFIX}")
            }),
        (FieldKind::Date, FieldValue::Date(date)) => (date.is_filled() && !is_valid_date(date))
            .then(|| format!("{} is not a valid date", field.label())),
        _ => None,
    }
}
