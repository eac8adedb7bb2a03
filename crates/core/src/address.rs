//! Address autocomplete boundary.
//!
//! Geocoding is not done here. An [`AddressLookup`] implementation supplies
//! [`AddressSuggestion`] records and this module turns a chosen suggestion into the
//! four address fields of either the service user or the next of kin.

use serde::{Deserialize, Serialize};

use crate::constants::{CONTEXT_PREFIX_PLACE, CONTEXT_PREFIX_POSTCODE, CONTEXT_PREFIX_REGION};
use crate::error::AddressLookupError;
use crate::form::Field;

/// Which person's address a lookup is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AddressTarget {
    ServiceUser,
    NextOfKin,
}

impl AddressTarget {
    pub fn from_is_next_of_kin(is_next_of_kin: bool) -> Self {
        if is_next_of_kin {
            AddressTarget::NextOfKin
        } else {
            AddressTarget::ServiceUser
        }
    }

    /// Address, city, region and postcode fields for this target, in that order.
    pub fn fields(self) -> [Field; 4] {
        match self {
            AddressTarget::ServiceUser => [
                Field::ServiceUserAddress,
                Field::ServiceUserCity,
                Field::ServiceUserRegion,
                Field::ServiceUserPostcode,
            ],
            AddressTarget::NextOfKin => [
                Field::NextOfKinAddress,
                Field::NextOfKinCity,
                Field::NextOfKinRegion,
                Field::NextOfKinPostcode,
            ],
        }
    }
}

/// A containing area of a suggestion (`postcode.123`, `place.456`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressContext {
    pub id: String,
    pub text: String,
}

/// Read-only record returned by an address lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSuggestion {
    pub id: String,
    pub place_name: String,
    /// Street name or feature name.
    pub text: String,
    /// House number, when the lookup knows one.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub context: Vec<AddressContext>,
}

impl AddressSuggestion {
    fn context_text(&self, prefix: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|c| {
                c.id == prefix
                    || c.id
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('.'))
            })
            .map(|c| c.text.as_str())
    }
}

/// Values written into the address fields when a suggestion is selected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressFill {
    pub address: String,
    pub city: String,
    pub region: String,
    pub postcode: String,
}

impl AddressFill {
    pub fn from_suggestion(suggestion: &AddressSuggestion) -> Self {
        let address = match suggestion.address.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => format!("{number} {}", suggestion.text),
            _ => suggestion.text.clone(),
        };
        let context = |prefix: &str| suggestion.context_text(prefix).unwrap_or_default().to_string();

        Self {
            address,
            city: context(CONTEXT_PREFIX_PLACE),
            region: context(CONTEXT_PREFIX_REGION),
            postcode: context(CONTEXT_PREFIX_POSTCODE),
        }
    }

    /// Pairs each target field with the value to write into it.
    pub fn assignments(&self, target: AddressTarget) -> [(Field, &str); 4] {
        let [address, city, region, postcode] = target.fields();
        [
            (address, self.address.as_str()),
            (city, self.city.as_str()),
            (region, self.region.as_str()),
            (postcode, self.postcode.as_str()),
        ]
    }
}

/// External address-lookup collaborator.
pub trait AddressLookup {
    fn search(&self, query: &str) -> Result<Vec<AddressSuggestion>, AddressLookupError>;
}

/// Suggestions currently offered to the user for one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestionList {
    pub target: AddressTarget,
    pub items: Vec<AddressSuggestion>,
}

impl SuggestionList {
    pub fn find(&self, id: &str) -> Option<&AddressSuggestion> {
        self.items.iter().find(|s| s.id == id)
    }
}
