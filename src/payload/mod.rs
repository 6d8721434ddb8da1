//! # Payload Formatting
//!
//! Maps a semantic content type to the exact string a QR code has to carry
//! for phones and scanners to recognise it.
//!
//! ## Conventions
//!
//! | Kind | Encoded form |
//! |------|--------------|
//! | `text` | content unchanged |
//! | `url` | `https://` prefix unless it already starts with `http` |
//! | `vcard` | vCard 3.0 record (see [`vcard`]) |
//! | `email` | `mailto:<addr>?subject=..&body=..` |
//! | `phone` | `tel:<number>` |
//! | `sms` | `sms:<number>` |
//! | `wifi` | `WIFI:S:<ssid>;T:WPA;P:<password>;;` (see [`wifi`]) |
//! | `twitter` | `https://twitter.com/<handle>` |
//! | `facebook` | `https://facebook.com/<handle>` |
//! | `maps` | Google Maps search URL with the query percent-encoded |
//!
//! Formatting is permissive: no variant validates its input, and blank or
//! malformed fields degrade to partially empty output instead of an error.
//!
//! ## Example
//!
//! ```
//! use qrkit::payload::{ContentSelection, EmailFields};
//!
//! let url = ContentSelection::Url("example.com".into());
//! assert_eq!(url.encode(), "https://example.com");
//!
//! let email = ContentSelection::Email(EmailFields {
//!     email: "a@b.com".into(),
//!     subject: "Hi there".into(),
//!     message: "Hello & bye".into(),
//! });
//! assert_eq!(
//!     email.encode(),
//!     "mailto:a@b.com?subject=Hi%20there&body=Hello%20%26%20bye"
//! );
//! ```

pub mod uri;
pub mod vcard;
pub mod wifi;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QrKitError;

pub use uri::encode_component;
pub use vcard::VCardFields;

const TWITTER_BASE: &str = "https://twitter.com/";
const FACEBOOK_BASE: &str = "https://facebook.com/";
const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

// ============================================================================
// CONTENT KIND
// ============================================================================

/// The content type selected in the form, without any field data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Text,
    Url,
    VCard,
    Email,
    Phone,
    Sms,
    Wifi,
    Twitter,
    Facebook,
    Maps,
}

impl ContentKind {
    /// Every kind, in the order the form's type picker lists them.
    pub const ALL: [ContentKind; 10] = [
        ContentKind::Text,
        ContentKind::Url,
        ContentKind::VCard,
        ContentKind::Email,
        ContentKind::Phone,
        ContentKind::Sms,
        ContentKind::Wifi,
        ContentKind::Twitter,
        ContentKind::Facebook,
        ContentKind::Maps,
    ];

    /// Lowercase tag used on the command line and in form files.
    pub fn tag(self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Url => "url",
            ContentKind::VCard => "vcard",
            ContentKind::Email => "email",
            ContentKind::Phone => "phone",
            ContentKind::Sms => "sms",
            ContentKind::Wifi => "wifi",
            ContentKind::Twitter => "twitter",
            ContentKind::Facebook => "facebook",
            ContentKind::Maps => "maps",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Text => "Text",
            ContentKind::Url => "URL",
            ContentKind::VCard => "vCard",
            ContentKind::Email => "Email",
            ContentKind::Phone => "Phone",
            ContentKind::Sms => "SMS",
            ContentKind::Wifi => "Wi-Fi",
            ContentKind::Twitter => "Twitter",
            ContentKind::Facebook => "Facebook",
            ContentKind::Maps => "Maps",
        }
    }

    /// Whether the kind is entered as several structured fields rather than
    /// one line of text.
    pub fn is_structured(self) -> bool {
        matches!(self, ContentKind::VCard | ContentKind::Email)
    }

    /// Resolve a tag, treating anything unrecognized as plain text.
    pub fn from_tag_lossy(tag: &str) -> ContentKind {
        tag.parse().unwrap_or_else(|_| {
            tracing::debug!(tag, "unknown content type, formatting as text");
            ContentKind::Text
        })
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ContentKind {
    type Err = QrKitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == lower)
            .ok_or_else(|| {
                QrKitError::Config(format!(
                    "unknown content type '{}' (expected one of: {})",
                    s,
                    ContentKind::ALL.map(ContentKind::tag).join(", ")
                ))
            })
    }
}

// ============================================================================
// CONTENT SELECTION
// ============================================================================

/// Fields of an email QR code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailFields {
    /// Recipient address, used verbatim as the `mailto:` path.
    pub email: String,
    pub subject: String,
    /// Body text.
    pub message: String,
}

impl EmailFields {
    /// Parse the collector's flat form: address, subject and message on
    /// separate lines. The message keeps any further newlines.
    pub fn from_flat(flat: &str) -> Self {
        let mut parts = flat.splitn(3, '\n');
        let mut next = || parts.next().unwrap_or_default().to_string();
        Self {
            email: next(),
            subject: next(),
            message: next(),
        }
    }

    /// Join the fields back into the flat form.
    pub fn to_flat(&self) -> String {
        format!("{}\n{}\n{}", self.email, self.subject, self.message)
    }
}

/// The current form content: one variant per content kind, each carrying
/// only the fields that kind needs.
///
/// Serialized with an explicit tag so a form file reads as
/// `{"type": "url", "content": "example.com"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ContentSelection {
    Text(String),
    Url(String),
    VCard(VCardFields),
    Email(EmailFields),
    Phone(String),
    Sms(String),
    /// `ssid,password` as typed into the single Wi-Fi field.
    Wifi(String),
    /// Profile handle.
    Twitter(String),
    /// Profile handle.
    Facebook(String),
    /// Free-text place or address query.
    Maps(String),
}

impl Default for ContentSelection {
    fn default() -> Self {
        ContentSelection::Text(String::new())
    }
}

impl ContentSelection {
    /// The kind tag of this selection.
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentSelection::Text(_) => ContentKind::Text,
            ContentSelection::Url(_) => ContentKind::Url,
            ContentSelection::VCard(_) => ContentKind::VCard,
            ContentSelection::Email(_) => ContentKind::Email,
            ContentSelection::Phone(_) => ContentKind::Phone,
            ContentSelection::Sms(_) => ContentKind::Sms,
            ContentSelection::Wifi(_) => ContentKind::Wifi,
            ContentSelection::Twitter(_) => ContentKind::Twitter,
            ContentSelection::Facebook(_) => ContentKind::Facebook,
            ContentSelection::Maps(_) => ContentKind::Maps,
        }
    }

    /// Build a selection from a kind and the collector's flat payload.
    ///
    /// Structured kinds split the flat string on newlines; missing trailing
    /// fields become empty strings.
    pub fn from_flat(kind: ContentKind, flat: &str) -> Self {
        let s = flat.to_string();
        match kind {
            ContentKind::Text => ContentSelection::Text(s),
            ContentKind::Url => ContentSelection::Url(s),
            ContentKind::VCard => ContentSelection::VCard(VCardFields::from_flat(flat)),
            ContentKind::Email => ContentSelection::Email(EmailFields::from_flat(flat)),
            ContentKind::Phone => ContentSelection::Phone(s),
            ContentKind::Sms => ContentSelection::Sms(s),
            ContentKind::Wifi => ContentSelection::Wifi(s),
            ContentKind::Twitter => ContentSelection::Twitter(s),
            ContentKind::Facebook => ContentSelection::Facebook(s),
            ContentKind::Maps => ContentSelection::Maps(s),
        }
    }

    /// The flat payload string: single-line kinds return their content,
    /// structured kinds join their fields with newlines.
    pub fn to_flat(&self) -> String {
        match self {
            ContentSelection::VCard(fields) => fields.to_flat(),
            ContentSelection::Email(fields) => fields.to_flat(),
            ContentSelection::Text(s)
            | ContentSelection::Url(s)
            | ContentSelection::Phone(s)
            | ContentSelection::Sms(s)
            | ContentSelection::Wifi(s)
            | ContentSelection::Twitter(s)
            | ContentSelection::Facebook(s)
            | ContentSelection::Maps(s) => s.clone(),
        }
    }

    /// True when there is nothing to render.
    ///
    /// Structured kinds are never empty: their flat form always contains
    /// the field separators, so a blank vCard still renders a skeleton card.
    pub fn is_empty(&self) -> bool {
        self.to_flat().is_empty()
    }

    /// Produce the exact string the QR code encodes.
    pub fn encode(&self) -> String {
        match self {
            ContentSelection::Text(s) => s.clone(),
            ContentSelection::Url(s) => format_url(s),
            ContentSelection::VCard(fields) => fields.encode(),
            ContentSelection::Email(fields) => format_email(fields),
            ContentSelection::Phone(s) => format!("tel:{}", s),
            ContentSelection::Sms(s) => format!("sms:{}", s),
            ContentSelection::Wifi(s) => wifi::WifiCredentials::parse(s).encode(),
            ContentSelection::Twitter(handle) => format!("{}{}", TWITTER_BASE, handle),
            ContentSelection::Facebook(handle) => format!("{}{}", FACEBOOK_BASE, handle),
            ContentSelection::Maps(query) => format_maps(query),
        }
    }
}

// ============================================================================
// FORMATTERS
// ============================================================================

/// Format a flat payload for the given kind.
pub fn format_flat(kind: ContentKind, flat: &str) -> String {
    ContentSelection::from_flat(kind, flat).encode()
}

/// Format a flat payload for a kind given by tag. Unknown tags pass the
/// content through unchanged.
pub fn format_flat_tag(tag: &str, flat: &str) -> String {
    format_flat(ContentKind::from_tag_lossy(tag), flat)
}

/// Prefix `https://` unless the value already starts with `http`.
///
/// The check is a plain prefix test, so `httpbin.org` is left alone too.
pub fn format_url(value: &str) -> String {
    if value.starts_with("http") {
        value.to_string()
    } else {
        format!("https://{}", value)
    }
}

/// Build a `mailto:` link with percent-encoded subject and body.
pub fn format_email(fields: &EmailFields) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        fields.email,
        encode_component(&fields.subject),
        encode_component(&fields.message)
    )
}

/// Build a Google Maps search URL for a free-text query.
pub fn format_maps(query: &str) -> String {
    format!("{}{}", MAPS_SEARCH_BASE, encode_component(query))
}
