//! Care assessment form data model.
//!
//! The form is split into three sequential sections plus a consent flag. Every field is
//! addressed by a [`Field`] key so that the reducer, the validators and the completion
//! tracker can all work from the same table instead of hard-coding struct accessors.
//!
//! Wire names are camelCase to match the JSON payload the relay forwards. Missing keys
//! deserialise to empty values so partially filled payload files can be loaded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use intake_types::NonEmptyText;

// ============================================================================
// Sections
// ============================================================================

/// One of the three sequential groups of form fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    /// Section 1: the person receiving care.
    ServiceUser,
    /// Section 2: their next of kin.
    NextOfKin,
    /// Section 3: medical background.
    MedicalBackground,
}

impl Section {
    /// Sections in the order they are revealed.
    pub const ALL: [Section; 3] = [
        Section::ServiceUser,
        Section::NextOfKin,
        Section::MedicalBackground,
    ];

    /// One-based position of the section in the form.
    pub fn number(self) -> u8 {
        match self {
            Section::ServiceUser => 1,
            Section::NextOfKin => 2,
            Section::MedicalBackground => 3,
        }
    }

    /// Zero-based index, for `[T; 3]` tables.
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Section::ServiceUser),
            2 => Some(Section::NextOfKin),
            3 => Some(Section::MedicalBackground),
            _ => None,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::ServiceUser => "Service User Details",
            Section::NextOfKin => "Next of Kin Details",
            Section::MedicalBackground => "Medical Background",
        }
    }

    /// Fields that must be filled and error-free for this section to be complete.
    pub fn required_fields(self) -> &'static [Field] {
        match self {
            Section::ServiceUser => &SERVICE_USER_REQUIRED,
            Section::NextOfKin => &NEXT_OF_KIN_REQUIRED,
            Section::MedicalBackground => &MEDICAL_BACKGROUND_REQUIRED,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Section {}: {}", self.number(), self.title())
    }
}

const SERVICE_USER_REQUIRED: [Field; 11] = [
    Field::ServiceUserFirstName,
    Field::ServiceUserLastName,
    Field::ServiceUserDateOfBirth,
    Field::ServiceUserGender,
    Field::ServiceUserEmail,
    Field::ServiceUserPhone,
    Field::ServiceUserAddress,
    Field::ServiceUserCity,
    Field::ServiceUserRegion,
    Field::ServiceUserPostcode,
    Field::ServiceUserClientStartDate,
];

const NEXT_OF_KIN_REQUIRED: [Field; 9] = [
    Field::NextOfKinFirstName,
    Field::NextOfKinLastName,
    Field::NextOfKinRelationship,
    Field::NextOfKinPhone,
    Field::NextOfKinEmail,
    Field::NextOfKinAddress,
    Field::NextOfKinCity,
    Field::NextOfKinRegion,
    Field::NextOfKinPostcode,
];

const MEDICAL_BACKGROUND_REQUIRED: [Field; 3] = [
    Field::MedicalConditions,
    Field::Medications,
    Field::Allergies,
];

// ============================================================================
// Fields
// ============================================================================

/// How a field's value is checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Letters and spaces, minimum length.
    Name,
    Email,
    Phone,
    /// A day/month/year triple.
    Date,
    /// Free text with no format rule.
    Text,
}

/// Key of every editable value in the form, consent excepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    ServiceUserFirstName,
    ServiceUserLastName,
    ServiceUserPreferredName,
    ServiceUserDateOfBirth,
    ServiceUserGender,
    ServiceUserEmail,
    ServiceUserPhone,
    ServiceUserAddress,
    ServiceUserCity,
    ServiceUserRegion,
    ServiceUserPostcode,
    ServiceUserNhsNumber,
    ServiceUserClientStartDate,

    NextOfKinFirstName,
    NextOfKinLastName,
    NextOfKinRelationship,
    NextOfKinPhone,
    NextOfKinEmail,
    NextOfKinAddress,
    NextOfKinCity,
    NextOfKinRegion,
    NextOfKinPostcode,

    MedicalConditions,
    Medications,
    Allergies,
    GpName,
    AdditionalNotes,
}

impl Field {
    pub const ALL: [Field; 27] = [
        Field::ServiceUserFirstName,
        Field::ServiceUserLastName,
        Field::ServiceUserPreferredName,
        Field::ServiceUserDateOfBirth,
        Field::ServiceUserGender,
        Field::ServiceUserEmail,
        Field::ServiceUserPhone,
        Field::ServiceUserAddress,
        Field::ServiceUserCity,
        Field::ServiceUserRegion,
        Field::ServiceUserPostcode,
        Field::ServiceUserNhsNumber,
        Field::ServiceUserClientStartDate,
        Field::NextOfKinFirstName,
        Field::NextOfKinLastName,
        Field::NextOfKinRelationship,
        Field::NextOfKinPhone,
        Field::NextOfKinEmail,
        Field::NextOfKinAddress,
        Field::NextOfKinCity,
        Field::NextOfKinRegion,
        Field::NextOfKinPostcode,
        Field::MedicalConditions,
        Field::Medications,
        Field::Allergies,
        Field::GpName,
        Field::AdditionalNotes,
    ];

    /// Stable dotted key, e.g. `serviceUser.firstName`.
    pub fn key(self) -> &'static str {
        match self {
            Field::ServiceUserFirstName => "serviceUser.firstName",
            Field::ServiceUserLastName => "serviceUser.lastName",
            Field::ServiceUserPreferredName => "serviceUser.preferredName",
            Field::ServiceUserDateOfBirth => "serviceUser.dateOfBirth",
            Field::ServiceUserGender => "serviceUser.gender",
            Field::ServiceUserEmail => "serviceUser.email",
            Field::ServiceUserPhone => "serviceUser.phone",
            Field::ServiceUserAddress => "serviceUser.address",
            Field::ServiceUserCity => "serviceUser.city",
            Field::ServiceUserRegion => "serviceUser.region",
            Field::ServiceUserPostcode => "serviceUser.postcode",
            Field::ServiceUserNhsNumber => "serviceUser.nhsNumber",
            Field::ServiceUserClientStartDate => "serviceUser.clientStartDate",
            Field::NextOfKinFirstName => "nextOfKin.firstName",
            Field::NextOfKinLastName => "nextOfKin.lastName",
            Field::NextOfKinRelationship => "nextOfKin.relationship",
            Field::NextOfKinPhone => "nextOfKin.phone",
            Field::NextOfKinEmail => "nextOfKin.email",
            Field::NextOfKinAddress => "nextOfKin.address",
            Field::NextOfKinCity => "nextOfKin.city",
            Field::NextOfKinRegion => "nextOfKin.region",
            Field::NextOfKinPostcode => "nextOfKin.postcode",
            Field::MedicalConditions => "medical.medicalConditions",
            Field::Medications => "medical.medications",
            Field::Allergies => "medical.allergies",
            Field::GpName => "medical.gpName",
            Field::AdditionalNotes => "medical.additionalNotes",
        }
    }

    /// Human-readable label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::ServiceUserFirstName | Field::NextOfKinFirstName => "First name",
            Field::ServiceUserLastName | Field::NextOfKinLastName => "Last name",
            Field::ServiceUserPreferredName => "Preferred name",
            Field::ServiceUserDateOfBirth => "Date of birth",
            Field::ServiceUserGender => "Gender",
            Field::ServiceUserEmail | Field::NextOfKinEmail => "Email",
            Field::ServiceUserPhone | Field::NextOfKinPhone => "Phone number",
            Field::ServiceUserAddress | Field::NextOfKinAddress => "Address",
            Field::ServiceUserCity | Field::NextOfKinCity => "City",
            Field::ServiceUserRegion | Field::NextOfKinRegion => "Region",
            Field::ServiceUserPostcode | Field::NextOfKinPostcode => "Postcode",
            Field::ServiceUserNhsNumber => "NHS number",
            Field::ServiceUserClientStartDate => "Client start date",
            Field::NextOfKinRelationship => "Relationship",
            Field::MedicalConditions => "Medical conditions",
            Field::Medications => "Medications",
            Field::Allergies => "Allergies",
            Field::GpName => "GP name",
            Field::AdditionalNotes => "Additional notes",
        }
    }

    pub fn section(self) -> Section {
        match self {
            Field::ServiceUserFirstName
            | Field::ServiceUserLastName
            | Field::ServiceUserPreferredName
            | Field::ServiceUserDateOfBirth
            | Field::ServiceUserGender
            | Field::ServiceUserEmail
            | Field::ServiceUserPhone
            | Field::ServiceUserAddress
            | Field::ServiceUserCity
            | Field::ServiceUserRegion
            | Field::ServiceUserPostcode
            | Field::ServiceUserNhsNumber
            | Field::ServiceUserClientStartDate => Section::ServiceUser,
            Field::NextOfKinFirstName
            | Field::NextOfKinLastName
            | Field::NextOfKinRelationship
            | Field::NextOfKinPhone
            | Field::NextOfKinEmail
            | Field::NextOfKinAddress
            | Field::NextOfKinCity
            | Field::NextOfKinRegion
            | Field::NextOfKinPostcode => Section::NextOfKin,
            Field::MedicalConditions
            | Field::Medications
            | Field::Allergies
            | Field::GpName
            | Field::AdditionalNotes => Section::MedicalBackground,
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::ServiceUserFirstName
            | Field::ServiceUserLastName
            | Field::NextOfKinFirstName
            | Field::NextOfKinLastName => FieldKind::Name,
            Field::ServiceUserEmail | Field::NextOfKinEmail => FieldKind::Email,
            Field::ServiceUserPhone | Field::NextOfKinPhone => FieldKind::Phone,
            Field::ServiceUserDateOfBirth | Field::ServiceUserClientStartDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    pub fn is_required(self) -> bool {
        self.section().required_fields().contains(&self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string is not a known field key.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Component of a [`DateParts`] triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

impl FromStr for DatePart {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(DatePart::Day),
            "month" => Ok(DatePart::Month),
            "year" => Ok(DatePart::Year),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

// ============================================================================
// Values
// ============================================================================

/// A date entered as three separate inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateParts {
    pub day: String,
    pub month: String,
    pub year: String,
}

impl DateParts {
    pub fn new(day: impl Into<String>, month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            month: month.into(),
            year: year.into(),
        }
    }

    pub fn part(&self, part: DatePart) -> &str {
        match part {
            DatePart::Day => &self.day,
            DatePart::Month => &self.month,
            DatePart::Year => &self.year,
        }
    }

    pub fn part_mut(&mut self, part: DatePart) -> &mut String {
        match part {
            DatePart::Day => &mut self.day,
            DatePart::Month => &mut self.month,
            DatePart::Year => &mut self.year,
        }
    }

    /// True when all three parts are non-empty after trimming.
    pub fn is_filled(&self) -> bool {
        [&self.day, &self.month, &self.year]
            .iter()
            .all(|p| NonEmptyText::is_filled(p))
    }

    /// True when no part has been entered yet.
    pub fn is_blank(&self) -> bool {
        [&self.day, &self.month, &self.year]
            .iter()
            .all(|p| !NonEmptyText::is_filled(p))
    }
}

/// Borrowed view of a single field's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Date(&'a DateParts),
}

impl FieldValue<'_> {
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(s) => NonEmptyText::is_filled(s),
            FieldValue::Date(d) => d.is_filled(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceUserDetails {
    pub first_name: String,
    pub last_name: String,
    pub preferred_name: String,
    pub date_of_birth: DateParts,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub postcode: String,
    pub nhs_number: String,
    pub client_start_date: DateParts,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NextOfKinDetails {
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub region: String,
    pub postcode: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicalBackground {
    pub medical_conditions: String,
    pub medications: String,
    pub allergies: String,
    pub gp_name: String,
    pub additional_notes: String,
}

/// All values entered into one form session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormData {
    pub service_user_details: ServiceUserDetails,
    pub next_of_kin_details: NextOfKinDetails,
    pub medical_background: MedicalBackground,
    pub consent: bool,
}

impl FormData {
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        let su = &self.service_user_details;
        let nok = &self.next_of_kin_details;
        let med = &self.medical_background;
        match field {
            Field::ServiceUserDateOfBirth => FieldValue::Date(&su.date_of_birth),
            Field::ServiceUserClientStartDate => FieldValue::Date(&su.client_start_date),
            Field::ServiceUserFirstName => FieldValue::Text(&su.first_name),
            Field::ServiceUserLastName => FieldValue::Text(&su.last_name),
            Field::ServiceUserPreferredName => FieldValue::Text(&su.preferred_name),
            Field::ServiceUserGender => FieldValue::Text(&su.gender),
            Field::ServiceUserEmail => FieldValue::Text(&su.email),
            Field::ServiceUserPhone => FieldValue::Text(&su.phone),
            Field::ServiceUserAddress => FieldValue::Text(&su.address),
            Field::ServiceUserCity => FieldValue::Text(&su.city),
            Field::ServiceUserRegion => FieldValue::Text(&su.region),
            Field::ServiceUserPostcode => FieldValue::Text(&su.postcode),
            Field::ServiceUserNhsNumber => FieldValue::Text(&su.nhs_number),
            Field::NextOfKinFirstName => FieldValue::Text(&nok.first_name),
            Field::NextOfKinLastName => FieldValue::Text(&nok.last_name),
            Field::NextOfKinRelationship => FieldValue::Text(&nok.relationship),
            Field::NextOfKinPhone => FieldValue::Text(&nok.phone),
            Field::NextOfKinEmail => FieldValue::Text(&nok.email),
            Field::NextOfKinAddress => FieldValue::Text(&nok.address),
            Field::NextOfKinCity => FieldValue::Text(&nok.city),
            Field::NextOfKinRegion => FieldValue::Text(&nok.region),
            Field::NextOfKinPostcode => FieldValue::Text(&nok.postcode),
            Field::MedicalConditions => FieldValue::Text(&med.medical_conditions),
            Field::Medications => FieldValue::Text(&med.medications),
            Field::Allergies => FieldValue::Text(&med.allergies),
            Field::GpName => FieldValue::Text(&med.gp_name),
            Field::AdditionalNotes => FieldValue::Text(&med.additional_notes),
        }
    }

    /// Mutable access to a text field; `None` for date fields.
    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        let su = &mut self.service_user_details;
        let nok = &mut self.next_of_kin_details;
        let med = &mut self.medical_background;
        let slot = match field {
            Field::ServiceUserDateOfBirth | Field::ServiceUserClientStartDate => return None,
            Field::ServiceUserFirstName => &mut su.first_name,
            Field::ServiceUserLastName => &mut su.last_name,
            Field::ServiceUserPreferredName => &mut su.preferred_name,
            Field::ServiceUserGender => &mut su.gender,
            Field::ServiceUserEmail => &mut su.email,
            Field::ServiceUserPhone => &mut su.phone,
            Field::ServiceUserAddress => &mut su.address,
            Field::ServiceUserCity => &mut su.city,
            Field::ServiceUserRegion => &mut su.region,
            Field::ServiceUserPostcode => &mut su.postcode,
            Field::ServiceUserNhsNumber => &mut su.nhs_number,
            Field::NextOfKinFirstName => &mut nok.first_name,
            Field::NextOfKinLastName => &mut nok.last_name,
            Field::NextOfKinRelationship => &mut nok.relationship,
            Field::NextOfKinPhone => &mut nok.phone,
            Field::NextOfKinEmail => &mut nok.email,
            Field::NextOfKinAddress => &mut nok.address,
            Field::NextOfKinCity => &mut nok.city,
            Field::NextOfKinRegion => &mut nok.region,
            Field::NextOfKinPostcode => &mut nok.postcode,
            Field::MedicalConditions => &mut med.medical_conditions,
            Field::Medications => &mut med.medications,
            Field::Allergies => &mut med.allergies,
            Field::GpName => &mut med.gp_name,
            Field::AdditionalNotes => &mut med.additional_notes,
        };
        Some(slot)
    }

    /// Mutable access to a date field; `None` for text fields.
    pub fn date_mut(&mut self, field: Field) -> Option<&mut DateParts> {
        match field {
            Field::ServiceUserDateOfBirth => Some(&mut self.service_user_details.date_of_birth),
            Field::ServiceUserClientStartDate => {
                Some(&mut self.service_user_details.client_start_date)
            }
            _ => None,
        }
    }

    pub fn is_filled(&self, field: Field) -> bool {
        self.value(field).is_filled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field_totals_match_form_layout() {
        assert_eq!(Section::ServiceUser.required_fields().len(), 11);
        assert_eq!(Section::NextOfKin.required_fields().len(), 9);
        assert_eq!(Section::MedicalBackground.required_fields().len(), 3);
        for section in Section::ALL {
            for field in section.required_fields() {
                assert_eq!(field.section(), section, "{field} listed in wrong section");
                assert!(field.is_required());
            }
        }
        assert!(!Field::ServiceUserNhsNumber.is_required());
        assert!(!Field::AdditionalNotes.is_required());
    }

    #[test]
    fn field_keys_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(field.key().parse::<Field>(), Ok(field));
        }
        assert_eq!(
            "serviceUser.shoeSize".parse::<Field>(),
            Err(UnknownField("serviceUser.shoeSize".into()))
        );
    }

    #[test]
    fn section_navigation_helpers() {
        assert_eq!(Section::ServiceUser.next(), Some(Section::NextOfKin));
        assert_eq!(Section::MedicalBackground.next(), None);
        assert_eq!(Section::ServiceUser.previous(), None);
        assert_eq!(Section::MedicalBackground.previous(), Some(Section::NextOfKin));
        assert_eq!(Section::NextOfKin.index(), 1);
    }

    #[test]
    fn text_and_date_accessors_are_disjoint() {
        let mut data = FormData::default();
        for field in Field::ALL {
            let is_date = field.kind() == FieldKind::Date;
            assert_eq!(data.text_mut(field).is_none(), is_date, "{field}");
            assert_eq!(data.date_mut(field).is_some(), is_date, "{field}");
        }
    }

    #[test]
    fn filled_means_non_empty_after_trim() {
        let mut data = FormData::default();
        data.service_user_details.first_name = "   ".into();
        assert!(!data.is_filled(Field::ServiceUserFirstName));
        data.service_user_details.first_name = " Jane ".into();
        assert!(data.is_filled(Field::ServiceUserFirstName));

        data.service_user_details.date_of_birth = DateParts::new("1", "", "1950");
        assert!(!data.is_filled(Field::ServiceUserDateOfBirth));
        data.service_user_details.date_of_birth.month = "2".into();
        assert!(data.is_filled(Field::ServiceUserDateOfBirth));
    }

    #[test]
    fn deserialises_partial_payload_with_defaults() {
        let data: FormData =
            serde_json::from_str(r#"{"serviceUserDetails":{"firstName":"Jane"}}"#)
                .expect("partial payload");
        assert_eq!(data.service_user_details.first_name, "Jane");
        assert!(data.service_user_details.date_of_birth.is_blank());
        assert!(!data.consent);

        let json = serde_json::to_value(&data).expect("serialise");
        assert!(json["serviceUserDetails"]["dateOfBirth"]["day"].is_string());
        assert!(json["nextOfKinDetails"]["firstName"].is_string());
        assert_eq!(json["consent"], false);
    }
}
