//! # Input Collector
//!
//! Holds the form's content fields and turns them into a
//! [`ContentSelection`].
//!
//! The form keeps three independent sets of fields: a single line of text
//! shared by all simple kinds, the vCard fields and the email fields. Only
//! the set that belongs to the selected kind is read. Switching kinds clears
//! the single line but keeps the structured fields, so a half-filled vCard
//! survives a detour through another kind.

use crate::payload::{ContentKind, ContentSelection, EmailFields, VCardFields};

/// Form state for the content half of the QR form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputCollector {
    kind: ContentKind,
    content: String,
    vcard: VCardFields,
    email: EmailFields,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the collector from an existing selection.
    pub fn from_selection(selection: &ContentSelection) -> Self {
        let mut collector = Self::new();
        collector.kind = selection.kind();
        match selection {
            ContentSelection::VCard(fields) => collector.vcard = fields.clone(),
            ContentSelection::Email(fields) => collector.email = fields.clone(),
            other => collector.content = other.to_flat(),
        }
        collector
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Select a content kind. The single-line content is cleared.
    pub fn set_kind(&mut self, kind: ContentKind) {
        if kind != self.kind {
            tracing::debug!(from = %self.kind, to = %kind, "content kind changed");
        }
        self.kind = kind;
        self.content.clear();
    }

    /// Current single-line content.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn vcard(&self) -> &VCardFields {
        &self.vcard
    }

    /// Set one vCard field by name. Returns `false` for an unknown name.
    pub fn set_vcard_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.vcard.field_mut(name) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    pub fn email(&self) -> &EmailFields {
        &self.email
    }

    /// Set one email field (`email`, `subject` or `message`). Returns
    /// `false` for an unknown name.
    pub fn set_email_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            "email" => &mut self.email.email,
            "subject" => &mut self.email.subject,
            "message" | "body" => &mut self.email.message,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// Set a field of whichever structured kind is selected.
    ///
    /// For simple kinds only the name `content` is accepted.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.kind {
            ContentKind::VCard => self.set_vcard_field(name, value),
            ContentKind::Email => self.set_email_field(name, value),
            _ if name == "content" => {
                self.set_content(value);
                true
            }
            _ => false,
        }
    }

    /// The selected kind's fields as one flat string: structured kinds join
    /// their fields with newlines.
    pub fn flat_payload(&self) -> String {
        match self.kind {
            ContentKind::VCard => self.vcard.to_flat(),
            ContentKind::Email => self.email.to_flat(),
            _ => self.content.clone(),
        }
    }

    /// The selected kind with its fields.
    pub fn selection(&self) -> ContentSelection {
        match self.kind {
            ContentKind::VCard => ContentSelection::VCard(self.vcard.clone()),
            ContentKind::Email => ContentSelection::Email(self.email.clone()),
            kind => ContentSelection::from_flat(kind, &self.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_empty_text() {
        let collector = InputCollector::new();
        assert_eq!(collector.kind(), ContentKind::Text);
        assert_eq!(collector.selection(), ContentSelection::Text(String::new()));
        assert!(collector.selection().is_empty());
    }

    #[test]
    fn test_switching_kind_clears_content() {
        let mut collector = InputCollector::new();
        collector.set_content("example.com");
        collector.set_kind(ContentKind::Url);
        assert_eq!(collector.content(), "");
        assert_eq!(collector.selection(), ContentSelection::Url(String::new()));
    }

    #[test]
    fn test_structured_fields_survive_kind_switch() {
        let mut collector = InputCollector::new();
        collector.set_kind(ContentKind::VCard);
        assert!(collector.set_vcard_field("first_name", "Ada"));
        collector.set_kind(ContentKind::Phone);
        collector.set_kind(ContentKind::VCard);
        assert_eq!(collector.vcard().first_name, "Ada");
    }

    #[test]
    fn test_email_flat_payload() {
        let mut collector = InputCollector::new();
        collector.set_kind(ContentKind::Email);
        collector.set_field("email", "a@b.com");
        collector.set_field("subject", "Hi there");
        collector.set_field("body", "Hello & bye");
        assert_eq!(collector.flat_payload(), "a@b.com\nHi there\nHello & bye");
        assert_eq!(
            collector.selection().encode(),
            "mailto:a@b.com?subject=Hi%20there&body=Hello%20%26%20bye"
        );
    }

    #[test]
    fn test_vcard_flat_payload_has_eleven_fields() {
        let mut collector = InputCollector::new();
        collector.set_kind(ContentKind::VCard);
        collector.set_field("city", "Paris");
        let flat = collector.flat_payload();
        assert_eq!(flat.split('\n').count(), 11);
        assert_eq!(flat.split('\n').nth(6), Some("Paris"));
    }

    #[test]
    fn test_set_field_rejects_unknown_names() {
        let mut collector = InputCollector::new();
        assert!(!collector.set_field("subject", "x"));
        assert!(collector.set_field("content", "hello"));
        collector.set_kind(ContentKind::Email);
        assert!(!collector.set_field("fax", "x"));
    }

    #[test]
    fn test_from_selection() {
        let sel = ContentSelection::Wifi("Net,pw".into());
        let collector = InputCollector::from_selection(&sel);
        assert_eq!(collector.kind(), ContentKind::Wifi);
        assert_eq!(collector.selection(), sel);

        let sel = ContentSelection::VCard(VCardFields {
            last_name: "Hopper".into(),
            ..Default::default()
        });
        assert_eq!(InputCollector::from_selection(&sel).selection(), sel);
    }
}
