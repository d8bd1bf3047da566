//! lockbox-client: drop-in secure collection against a lockbox vault.
//!
//! A host binds input fields to a [`Collector`], the collector tracks
//! their live validation state, and `submit`/`submit_async` forward the
//! sanitized values to the vault without the raw data passing through
//! host code.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lockbox_client::{Collector, Environment, FieldKind, SubmitRequest, VaultResponse};
//!
//! # async fn run() {
//! let collector = Collector::new("tnt12345", Environment::Sandbox);
//!
//! let mut card = collector.bind_field(FieldKind::CardNumber, "card_number", true);
//! card.update_text("4111111111111111");
//!
//! collector.add_response_listener(Arc::new(|response: &VaultResponse| {
//!     println!("vault said: {response:?}");
//! }));
//!
//! let response = collector.submit(SubmitRequest::post("/post")).await;
//! assert!(response.is_success());
//! # }
//! ```

pub mod binding;
pub mod collector;
pub mod payload;
pub mod request;
pub mod response;
pub mod session;
pub mod transport;

pub use binding::FieldBinding;
pub use collector::{Collector, Environment};
pub use request::{HttpMethod, SubmitRequest, SubmitRequestBuilder};
pub use response::{ResponseListener, VaultResponse};
pub use session::SessionStorage;
pub use transport::{HttpTransport, OutboundCall, Transport, TransportError};

// Re-exported so most hosts need only this crate in scope.
pub use lockbox_card::CardBrand;
pub use lockbox_core::{AttachedFile, CollectError, ErrorCode, FieldKind, FieldState};
