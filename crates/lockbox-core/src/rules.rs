//! Composable per-field validation rules.
//!
//! A rule answers one question about one field's content; a [`RuleSet`]
//! is the ordered conjunction of its rules. Rule sets are mutable so a
//! binding can assemble them per field kind and the host can append its
//! own checks.

use chrono::{Datelike, Utc};
use regex::Regex;

use lockbox_card::{classify, digits_of, luhn_valid};

use crate::state::FieldKind;

/// One validation rule over raw field content.
pub trait ContentRule: Send + Sync {
    fn is_valid(&self, content: &str) -> bool;
}

/// Ordered conjunction of rules: valid iff every rule accepts.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn ContentRule>>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(&mut self, rule: impl ContentRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Logical AND over the rules. An empty set accepts everything.
    pub fn is_valid(&self, content: &str) -> bool {
        self.rules.iter().all(|rule| rule.is_valid(content))
    }
}

/// Rejects empty or whitespace-only content.
pub struct NotEmpty;

impl ContentRule for NotEmpty {
    fn is_valid(&self, content: &str) -> bool {
        !content.trim().is_empty()
    }
}

/// Accepts only ASCII digit characters.
pub struct DigitsOnly;

impl ContentRule for DigitsOnly {
    fn is_valid(&self, content: &str) -> bool {
        content.chars().all(|c| c.is_ascii_digit())
    }
}

/// Digit count must be one of the accepted lengths.
pub struct LengthIn {
    lengths: Vec<usize>,
}

impl LengthIn {
    pub fn new(lengths: impl Into<Vec<usize>>) -> Self {
        Self {
            lengths: lengths.into(),
        }
    }
}

impl ContentRule for LengthIn {
    fn is_valid(&self, content: &str) -> bool {
        self.lengths.contains(&digits_of(content).len())
    }
}

/// Luhn mod-10 checksum over the content's digits.
pub struct Luhn;

impl ContentRule for Luhn {
    fn is_valid(&self, content: &str) -> bool {
        luhn_valid(content)
    }
}

/// Digit count must match the accepted lengths of the detected brand.
pub struct BrandLength;

impl ContentRule for BrandLength {
    fn is_valid(&self, content: &str) -> bool {
        let brand = classify(content);
        brand.number_lengths().contains(&digits_of(content).len())
    }
}

/// Accepts `MM/yy` or `MM/yyyy` dates that are not in the past, at
/// month granularity.
pub struct ExpirationDate;

impl ExpirationDate {
    fn parse(content: &str) -> Option<(u32, i32)> {
        let (month_part, year_part) = content.trim().split_once('/')?;
        let month: u32 = month_part.parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        let year: i32 = match year_part.len() {
            2 => 2000 + year_part.parse::<i32>().ok()?,
            4 => year_part.parse().ok()?,
            _ => return None,
        };
        Some((month, year))
    }
}

impl ContentRule for ExpirationDate {
    fn is_valid(&self, content: &str) -> bool {
        let Some((month, year)) = Self::parse(content) else {
            return false;
        };
        let now = Utc::now();
        year > now.year() || (year == now.year() && month >= now.month())
    }
}

/// Arbitrary regex rule for info fields.
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }
}

impl ContentRule for Pattern {
    fn is_valid(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }
}

/// Default rule assembly for a field kind.
///
/// Card-number and CVC fields validate their shape regardless of the
/// required flag; free-text kinds only gate on presence when required.
pub fn default_rules(kind: FieldKind, required: bool) -> RuleSet {
    let mut rules = RuleSet::new();
    match kind {
        FieldKind::CardNumber => {
            rules.add_rule(Luhn);
            rules.add_rule(BrandLength);
        }
        FieldKind::Cvc => {
            rules.add_rule(DigitsOnly);
            rules.add_rule(LengthIn::new([3, 4]));
        }
        FieldKind::ExpirationDate => {
            rules.add_rule(ExpirationDate);
        }
        FieldKind::CardHolderName | FieldKind::Info => {
            if required {
                rules.add_rule(NotEmpty);
            }
        }
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_accepts_everything() {
        let rules = RuleSet::new();
        assert!(rules.is_valid(""));
        assert!(rules.is_valid("anything"));
    }

    #[test]
    fn test_conjunction_and_dynamic_assembly() {
        let mut rules = RuleSet::new();
        rules.add_rule(NotEmpty);
        rules.add_rule(DigitsOnly);

        assert!(rules.is_valid("123"));
        assert!(!rules.is_valid(""));
        assert!(!rules.is_valid("12a"));

        rules.clear_rules();
        assert!(rules.is_empty());
        assert!(rules.is_valid("12a"));
    }

    #[test]
    fn test_card_number_rules() {
        let rules = default_rules(FieldKind::CardNumber, true);
        assert!(rules.is_valid("4111111111111111"));
        assert!(rules.is_valid("4111 1111 1111 1111"));
        // Bad checksum.
        assert!(!rules.is_valid("4111111111111112"));
        // Valid checksum, 14 digits is not an accepted Visa length.
        assert!(!rules.is_valid("40000000000002"));
        assert!(!rules.is_valid(""));
    }

    #[test]
    fn test_cvc_rules() {
        let rules = default_rules(FieldKind::Cvc, true);
        assert!(rules.is_valid("123"));
        assert!(rules.is_valid("1234"));
        assert!(!rules.is_valid("12"));
        assert!(!rules.is_valid("12345"));
        assert!(!rules.is_valid("12a"));
    }

    #[test]
    fn test_expiration_date_rule() {
        let rule = ExpirationDate;
        assert!(rule.is_valid("12/99"));
        assert!(rule.is_valid("12/2099"));
        assert!(!rule.is_valid("13/30"));
        assert!(!rule.is_valid("00/30"));
        assert!(!rule.is_valid("01/2020"));
        assert!(!rule.is_valid("1230"));
        assert!(!rule.is_valid(""));
    }

    #[test]
    fn test_info_rules_gate_on_required_only() {
        let required = default_rules(FieldKind::Info, true);
        assert!(!required.is_valid(""));
        assert!(required.is_valid("value"));

        let optional = default_rules(FieldKind::Info, false);
        assert!(optional.is_valid(""));
    }

    #[test]
    fn test_pattern_rule() {
        let rule = Pattern::new(r"^[A-Z]{2}\d{4}$").unwrap();
        assert!(rule.is_valid("AB1234"));
        assert!(!rule.is_valid("ab1234"));
        assert!(Pattern::new("(unclosed").is_err());
    }
}
