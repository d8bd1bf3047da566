//! Transport abstraction and the production HTTPS client.
//!
//! The collector only sees the [`Transport`] trait: one call taking a
//! fully-resolved snapshot, plus the session storage every call reads.
//! Timeout behaviour belongs to the transport, not the collector.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::request::HttpMethod;
use crate::response::VaultResponse;
use crate::session::SessionStorage;

/// Fully-resolved outbound call, snapshotted at schedule time. Nothing
/// in here aliases live collector state.
#[derive(Debug, Clone)]
pub struct OutboundCall {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Map<String, Value>,
}

/// Network-level failure: the call never produced an HTTP response.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("TRANSPORT/{0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Request(err.to_string())
    }
}

/// HTTP(S) capability consumed by the collector.
///
/// An HTTP response of any status resolves to a [`VaultResponse`];
/// `Err` is reserved for transport failures (connect, timeout). The
/// returned future must be cancel-safe: dropping it aborts the call.
pub trait Transport: Send + Sync + 'static {
    fn call(
        &self,
        call: OutboundCall,
    ) -> impl Future<Output = Result<VaultResponse, TransportError>> + Send;

    /// Session-scoped custom data and headers shared by every call.
    fn session(&self) -> &SessionStorage;
}

/// Production transport over a pooled `reqwest` client.
pub struct HttpTransport {
    http: reqwest::Client,
    session: SessionStorage,
}

impl HttpTransport {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build reqwest client");
        Self {
            http,
            session: SessionStorage::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

impl Transport for HttpTransport {
    async fn call(&self, call: OutboundCall) -> Result<VaultResponse, TransportError> {
        let mut request = self.http.request(to_reqwest_method(call.method), &call.url);
        for (name, value) in &call.headers {
            request = request.header(name, value);
        }
        if call.method.has_body() {
            request = request.json(&call.body);
        }

        let response = request.send().await?;
        let code = response.status().as_u16();
        let success = response.status().is_success();
        let reason = response
            .status()
            .canonical_reason()
            .unwrap_or("request failed");
        let text = response.text().await?;
        debug!(code, "vault call completed");

        if success {
            let body = if text.is_empty() {
                None
            } else {
                // Non-JSON bodies are passed through as raw text.
                Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
            };
            Ok(VaultResponse::Success { code, body })
        } else {
            let message = if text.is_empty() {
                reason.to_string()
            } else {
                text
            };
            Ok(VaultResponse::Error { message, code })
        }
    }

    fn session(&self) -> &SessionStorage {
        &self.session
    }
}
