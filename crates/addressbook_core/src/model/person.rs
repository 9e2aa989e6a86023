//! Person contact record.
//!
//! # Responsibility
//! - Define the canonical contact shape used on the wire and in storage.
//! - Provide constructors for fresh (empty) contacts.
//!
//! # Invariants
//! - `id` is generated once and never changes for the lifetime of a contact.
//! - Attribute fields are free-form text; empty strings are valid values.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one contact.
pub type PersonId = Uuid;

/// Contact record with identity and five free-text attributes.
///
/// Serialized as `{id, name, email, phone, address, notes}`; every field is
/// required on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

impl Person {
    /// Creates an empty contact with a freshly generated ID.
    pub fn new() -> Self {
        Self::empty(Uuid::new_v4())
    }

    /// Creates an empty contact with a caller-provided ID.
    pub fn empty(id: PersonId) -> Self {
        Self {
            id,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
        }
    }

    /// Returns the display label used by list views.
    ///
    /// Falls back to email, then to a placeholder for unnamed contacts.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            self.name.as_str()
        } else if !self.email.trim().is_empty() {
            self.email.as_str()
        } else {
            "(unnamed)"
        }
    }
}

impl Default for Person {
    fn default() -> Self {
        Self::new()
    }
}

/// Create-procedure input: a contact whose ID may still be unassigned.
///
/// Server assigns a fresh ID when `id` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PersonId>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

impl NewPerson {
    /// Resolves the final record, generating an ID when none was provided.
    pub fn into_person(self) -> Person {
        Person {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            notes: self.notes,
        }
    }
}

impl From<Person> for NewPerson {
    fn from(value: Person) -> Self {
        Self {
            id: Some(value.id),
            name: value.name,
            email: value.email,
            phone: value.phone,
            address: value.address,
            notes: value.notes,
        }
    }
}
