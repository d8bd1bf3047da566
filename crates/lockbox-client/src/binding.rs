//! Glue between a host input widget and the field store.
//!
//! A binding owns the per-field rule set and turns raw widget text into
//! [`FieldState`] snapshots, pushed through the store subscription on
//! every change. The store never learns who is pushing.

use lockbox_core::rules::default_rules;
use lockbox_core::{ContentRule, FieldContent, FieldId, FieldKind, FieldState, FieldSubscriber, RuleSet};

/// Live connection between one widget and the collector's store.
pub struct FieldBinding {
    id: FieldId,
    kind: FieldKind,
    alias: String,
    required: bool,
    has_focus: bool,
    text: String,
    rules: RuleSet,
    subscriber: FieldSubscriber,
}

impl FieldBinding {
    pub(crate) fn new(
        id: FieldId,
        kind: FieldKind,
        alias: String,
        required: bool,
        subscriber: FieldSubscriber,
    ) -> Self {
        let binding = Self {
            id,
            kind,
            alias,
            required,
            has_focus: false,
            text: String::new(),
            rules: default_rules(kind, required),
            subscriber,
        };
        // Register the initial (empty) state so the field participates
        // in validation before the first keystroke.
        binding.push_state();
        binding
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Append a rule to this field and re-evaluate the current text.
    pub fn add_rule(&mut self, rule: impl ContentRule + 'static) {
        self.rules.add_rule(rule);
        self.push_state();
    }

    /// Drop every rule (including the kind defaults) and re-evaluate.
    pub fn clear_rules(&mut self) {
        self.rules.clear_rules();
        self.push_state();
    }

    /// Widget focus change.
    pub fn set_focus(&mut self, has_focus: bool) {
        if self.has_focus != has_focus {
            self.has_focus = has_focus;
            self.push_state();
        }
    }

    /// Widget text change.
    pub fn update_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.push_state();
    }

    fn push_state(&self) {
        let content = match self.kind {
            FieldKind::CardNumber => FieldContent::card_number(&self.text),
            _ => FieldContent::info(self.text.clone()),
        };
        let state = FieldState {
            has_focus: self.has_focus,
            is_required: self.required,
            is_valid: self.rules.is_valid(&self.text),
            alias: Some(self.alias.clone()),
            content,
        };
        self.subscriber.emit(self.id, state);
    }
}
