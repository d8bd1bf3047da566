//! lockbox-core: field state model, validation rules, and the state store.
//!
//! Everything the collection pipeline tracks between keystrokes lives
//! here: value-semantics field states, the composable rule sets that
//! decide per-field validity, the insertion-ordered store widgets push
//! into, and the error taxonomy pre-flight checks reject with.

pub mod error;
pub mod rules;
pub mod state;
pub mod store;

pub use error::{CollectError, ErrorCode};
pub use rules::{ContentRule, RuleSet};
pub use state::{FieldContent, FieldId, FieldKind, FieldState};
pub use store::{AttachedFile, FieldStore, FieldSubscriber, StateListener, DEFAULT_FILE_SIZE_LIMIT};
