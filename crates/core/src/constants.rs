//! Constants used throughout the intake core crate.
//!
//! Validation thresholds and fixed totals live here so the validators, the completion
//! tracker and their tests agree on the same numbers.

/// Minimum number of characters (after trimming) for a person's name.
pub const MIN_NAME_LENGTH: usize = 3;

/// Number of digits in a valid phone number.
pub const PHONE_DIGITS: usize = 11;

/// Required first digit of a valid phone number.
pub const PHONE_PREFIX: char = '0';

/// Required fields across all sections, consent included (11 + 9 + 3 + 1).
pub const TOTAL_REQUIRED_FIELDS: usize = 24;

/// Shortest query passed on to an address lookup.
pub const MIN_ADDRESS_QUERY_LENGTH: usize = 3;

/// Context id prefixes used by address suggestions.
pub const CONTEXT_PREFIX_POSTCODE: &str = "postcode";
pub const CONTEXT_PREFIX_PLACE: &str = "place";
pub const CONTEXT_PREFIX_REGION: &str = "region";

/// Message shown after the relay accepts a submission.
pub const SUBMIT_SUCCESS_MESSAGE: &str =
    "Thank you! Your care assessment has been submitted successfully.";
