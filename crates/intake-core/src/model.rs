//! Customer data model
//!
//! Drafts and confirmed records are distinct types: a [`CustomerDraft`] is
//! whatever the user has typed so far, a [`CustomerRecord`] is a draft the
//! remote store accepted and assigned a [`RecordId`] to. Only the latter can
//! enter the synchronized record list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Country used when a draft does not name one and none is configured
pub const DEFAULT_COUNTRY: &str = "IN";

/// Postal address of a customer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    /// Country code selecting the postal-code rule (e.g. "US", "IN").
    /// Empty when the payload omits it; the validator then applies its
    /// configured default.
    #[serde(default)]
    pub country: String,
}

/// Customer data as entered by the user, before the store accepts it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl CustomerDraft {
    /// Empty draft whose address defaults to `country`
    pub fn with_country(country: impl Into<String>) -> Self {
        Self {
            address: Address {
                country: country.into(),
                ..Address::default()
            },
            ..Self::default()
        }
    }

    /// Read the current value of a field
    pub fn get(&self, path: FieldPath) -> &str {
        match path {
            FieldPath::PhoneNumber => &self.phone_number,
            FieldPath::FirstName => &self.first_name,
            FieldPath::LastName => &self.last_name,
            FieldPath::Email => &self.email,
            FieldPath::Street => &self.address.street,
            FieldPath::City => &self.address.city,
            FieldPath::State => &self.address.state,
            FieldPath::ZipCode => &self.address.zip_code,
            FieldPath::Country => &self.address.country,
            FieldPath::Organization => self.organization.as_deref().unwrap_or(""),
        }
    }

    /// Overwrite a field with raw user input
    ///
    /// An empty organization is stored as `None`.
    pub fn set(&mut self, path: FieldPath, value: impl Into<String>) {
        let value = value.into();
        match path {
            FieldPath::PhoneNumber => self.phone_number = value,
            FieldPath::FirstName => self.first_name = value,
            FieldPath::LastName => self.last_name = value,
            FieldPath::Email => self.email = value,
            FieldPath::Street => self.address.street = value,
            FieldPath::City => self.address.city = value,
            FieldPath::State => self.address.state = value,
            FieldPath::ZipCode => self.address.zip_code = value,
            FieldPath::Country => self.address.country = value,
            FieldPath::Organization => {
                self.organization = if value.is_empty() { None } else { Some(value) }
            }
        }
    }
}

/// Server-assigned record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A customer accepted by the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub details: CustomerDraft,
}

impl CustomerRecord {
    pub fn new(id: RecordId, details: CustomerDraft) -> Self {
        Self { id, details }
    }

    /// "First Last", as shown on a record card
    pub fn display_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }
}

/// Addressable fields of a draft, including the nested address fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldPath {
    PhoneNumber,
    FirstName,
    LastName,
    Email,
    Street,
    City,
    State,
    ZipCode,
    Country,
    Organization,
}

impl FieldPath {
    /// Every field, in form order
    pub const ALL: [FieldPath; 10] = [
        FieldPath::PhoneNumber,
        FieldPath::FirstName,
        FieldPath::LastName,
        FieldPath::Email,
        FieldPath::Street,
        FieldPath::City,
        FieldPath::State,
        FieldPath::ZipCode,
        FieldPath::Country,
        FieldPath::Organization,
    ];

    /// Wire path of the field, e.g. `address.zipCode`
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::PhoneNumber => "phoneNumber",
            FieldPath::FirstName => "firstName",
            FieldPath::LastName => "lastName",
            FieldPath::Email => "email",
            FieldPath::Street => "address.street",
            FieldPath::City => "address.city",
            FieldPath::State => "address.state",
            FieldPath::ZipCode => "address.zipCode",
            FieldPath::Country => "address.country",
            FieldPath::Organization => "organization",
        }
    }

    /// Parse a wire path back into a field
    pub fn parse(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == path)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote payloads may arrive bare or wrapped as `{"data": ...}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}
