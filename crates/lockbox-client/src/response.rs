//! Vault response model and the listener fan-out contract.

use serde::Serialize;
use serde_json::Value;

use lockbox_core::CollectError;

/// Outcome of one submission, delivered to every registered listener.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VaultResponse {
    /// The vault accepted the submission.
    Success { code: u16, body: Option<Value> },
    /// Pre-flight rejection or transport-level failure.
    Error { message: String, code: u16 },
}

impl VaultResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, VaultResponse::Success { .. })
    }

    pub fn code(&self) -> u16 {
        match self {
            VaultResponse::Success { code, .. } => *code,
            VaultResponse::Error { code, .. } => *code,
        }
    }

    /// Error response for a pre-flight rejection.
    pub fn rejected(err: &CollectError) -> Self {
        VaultResponse::Error {
            message: err.to_string(),
            code: err.code().as_u16(),
        }
    }
}

/// Receiver of submission outcomes. Listeners are called in
/// registration order, on whichever task completed the submission.
pub trait ResponseListener: Send + Sync {
    fn on_response(&self, response: &VaultResponse);
}

impl<F> ResponseListener for F
where
    F: Fn(&VaultResponse) + Send + Sync,
{
    fn on_response(&self, response: &VaultResponse) {
        self(response)
    }
}
