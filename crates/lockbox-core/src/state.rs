//! Field state model shared between bindings, the store, and the collector.
//!
//! States are value objects: a binding builds a fresh snapshot on every
//! input change and pushes it into the store; consumers only ever see
//! clones, never the live entry.

use std::fmt;

use lockbox_card::{classify, mask, CardBrand};

/// Opaque stable key identifying a bound field within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

/// What kind of input a binding collects. Decides the default rule set
/// and how content is derived from raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    CardNumber,
    Cvc,
    ExpirationDate,
    CardHolderName,
    Info,
}

/// Sanitized content of a field.
///
/// `CardNumber` is derived by the masking logic at update time and is
/// never constructed from pre-masked parts by a consumer.
#[derive(Clone, PartialEq, Eq)]
pub enum FieldContent {
    CardNumber {
        raw: Option<String>,
        masked: Option<String>,
        brand: CardBrand,
        cvc_length: usize,
    },
    Info {
        data: Option<String>,
    },
}

impl FieldContent {
    /// Derive card-number content from raw input text.
    pub fn card_number(raw: &str) -> Self {
        let brand = classify(raw);
        FieldContent::CardNumber {
            raw: Some(raw.to_string()),
            masked: Some(mask::masked(raw)),
            brand,
            cvc_length: brand.cvc_max_length(),
        }
    }

    /// Plain content for every non-card field kind.
    pub fn info(data: impl Into<String>) -> Self {
        FieldContent::Info {
            data: Some(data.into()),
        }
    }

    /// The value this field contributes to an outbound payload.
    pub fn payload_value(&self) -> Option<&str> {
        match self {
            FieldContent::CardNumber { raw, .. } => raw.as_deref(),
            FieldContent::Info { data } => data.as_deref(),
        }
    }

    /// Issuer-identifying prefix, safe to display. `None` for info fields.
    pub fn bin(&self) -> Option<String> {
        match self {
            FieldContent::CardNumber { raw, .. } => raw.as_deref().map(mask::bin),
            FieldContent::Info { .. } => None,
        }
    }

    /// Trailing digits, safe to display. `None` for info fields.
    pub fn last_digits(&self) -> Option<String> {
        match self {
            FieldContent::CardNumber { raw, .. } => raw.as_deref().map(mask::last_digits),
            FieldContent::Info { .. } => None,
        }
    }

    /// Detected brand for card-number content.
    pub fn brand(&self) -> Option<CardBrand> {
        match self {
            FieldContent::CardNumber { brand, .. } => Some(*brand),
            FieldContent::Info { .. } => None,
        }
    }
}

impl Default for FieldContent {
    fn default() -> Self {
        FieldContent::Info { data: None }
    }
}

// Raw values never reach logs: card content shows only its masked form,
// info content only whether a value is present.
impl fmt::Debug for FieldContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldContent::CardNumber {
                masked,
                brand,
                cvc_length,
                ..
            } => f
                .debug_struct("CardNumber")
                .field("masked", masked)
                .field("brand", brand)
                .field("cvc_length", cvc_length)
                .finish_non_exhaustive(),
            FieldContent::Info { data } => f
                .debug_struct("Info")
                .field("set", &data.is_some())
                .finish(),
        }
    }
}

/// Snapshot of one bound field's UI and validation state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldState {
    pub has_focus: bool,
    pub is_required: bool,
    pub is_valid: bool,
    pub alias: Option<String>,
    pub content: FieldContent,
}

impl FieldState {
    /// Alias used in payloads and error messages, with a stable
    /// placeholder for fields bound without one.
    pub fn alias_or_placeholder(&self) -> &str {
        self.alias.as_deref().unwrap_or("<unnamed>")
    }
}
