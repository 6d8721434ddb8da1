//! # vCard Payloads
//!
//! Contact cards are encoded as a fixed vCard 3.0 template:
//!
//! ```text
//! BEGIN:VCARD
//! VERSION:3.0
//! FN:<first> <last>
//! TEL:<phone>
//! EMAIL:<email>
//! ORG:<company>
//! ADR:;;<street>;<city>;<state>;<zip>;<country>
//! URL:<website>
//! END:VCARD
//! ```
//!
//! The two leading `ADR` segments (post-office box, extended address) are
//! always empty. Blank fields stay blank; nothing is validated or escaped.

use serde::{Deserialize, Serialize};

/// The eleven contact fields of the vCard form.
///
/// Field order matches the form layout and the flat payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VCardFields {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub state: String,
    pub country: String,
    pub website: String,
}

impl VCardFields {
    /// Field names in flat-payload order.
    pub const FIELD_NAMES: [&'static str; 11] = [
        "first_name",
        "last_name",
        "phone",
        "email",
        "company",
        "street",
        "city",
        "zip",
        "state",
        "country",
        "website",
    ];

    /// Mutable access to a field by name, for form-style editing.
    ///
    /// Accepts the snake_case names in [`Self::FIELD_NAMES`] and their
    /// camelCase spellings (`firstName`).
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let field = match name {
            "first_name" | "firstName" => &mut self.first_name,
            "last_name" | "lastName" => &mut self.last_name,
            "phone" => &mut self.phone,
            "email" => &mut self.email,
            "company" => &mut self.company,
            "street" => &mut self.street,
            "city" => &mut self.city,
            "zip" => &mut self.zip,
            "state" => &mut self.state,
            "country" => &mut self.country,
            "website" => &mut self.website,
            _ => return None,
        };
        Some(field)
    }

    fn values(&self) -> [&str; 11] {
        [
            &self.first_name,
            &self.last_name,
            &self.phone,
            &self.email,
            &self.company,
            &self.street,
            &self.city,
            &self.zip,
            &self.state,
            &self.country,
            &self.website,
        ]
    }

    /// Parse the flat form: one field per line in [`Self::FIELD_NAMES`]
    /// order. Missing lines leave their fields empty.
    pub fn from_flat(flat: &str) -> Self {
        let mut fields = Self::default();
        for (name, value) in Self::FIELD_NAMES.iter().zip(flat.split('\n')) {
            if let Some(slot) = fields.field_mut(name) {
                *slot = value.to_string();
            }
        }
        fields
    }

    /// Join all eleven fields with newlines.
    pub fn to_flat(&self) -> String {
        self.values().join("\n")
    }

    /// Render the vCard 3.0 record.
    pub fn encode(&self) -> String {
        [
            "BEGIN:VCARD".to_string(),
            "VERSION:3.0".to_string(),
            format!("FN:{} {}", self.first_name, self.last_name),
            format!("TEL:{}", self.phone),
            format!("EMAIL:{}", self.email),
            format!("ORG:{}", self.company),
            format!(
                "ADR:;;{};{};{};{};{}",
                self.street, self.city, self.state, self.zip, self.country
            ),
            format!("URL:{}", self.website),
            "END:VCARD".to_string(),
        ]
        .join("\n")
    }
}
