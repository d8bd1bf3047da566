//! Submission orchestration: pre-flight gating, snapshotting, and
//! single-slot background execution.
//!
//! Every submission walks the same gate sequence (network permission,
//! URL validity, field validity, file size) and the first failure
//! becomes an error response; the transport is only reached when all
//! gates pass. Background submissions are supervised by a single slot:
//! scheduling a new one cancels whatever is still in flight, so at most
//! one asynchronous submission exists per collector.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use url::Url;
use uuid::Uuid;

use lockbox_core::{AttachedFile, CollectError, FieldKind, FieldState, FieldStore, StateListener};

use crate::binding::FieldBinding;
use crate::payload;
use crate::request::SubmitRequest;
use crate::response::{ResponseListener, VaultResponse};
use crate::transport::{HttpTransport, OutboundCall, Transport};

/// Which vault tier a collector talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Sandbox,
    Live,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Live => "live",
        }
    }
}

/// Base URL for a vault id in an environment. Validity is checked
/// separately; an id with bad characters produces an invalid URL and a
/// pre-flight rejection, never a panic.
fn build_base_url(vault_id: &str, environment: Environment) -> String {
    format!(
        "https://{}.{}.lockboxproxy.com",
        vault_id,
        environment.as_str()
    )
}

fn is_url_valid(base_url: &str) -> bool {
    let Ok(url) = Url::parse(base_url) else {
        return false;
    };
    if url.scheme() != "https" && url.scheme() != "http" {
        return false;
    }
    match url.host_str() {
        Some(host) => !host.is_empty() && !host.split('.').any(|label| label.is_empty()),
        None => false,
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

struct Inflight {
    cancel: CancellationToken,
    // Held so the task slot owns its work; the token does the stopping.
    _handle: JoinHandle<()>,
}

type Listeners = Arc<Mutex<Vec<Arc<dyn ResponseListener>>>>;

/// Entry point of the SDK: owns the field store, gates submissions, and
/// drives the transport.
pub struct Collector<T: Transport = HttpTransport> {
    transport: Arc<T>,
    store: Arc<FieldStore>,
    listeners: Listeners,
    inflight: Mutex<Option<Inflight>>,
    next_field_id: AtomicU32,
    base_url: String,
    url_valid: bool,
    network_probe: Option<Box<dyn Fn() -> bool + Send + Sync>>,
}

impl Collector<HttpTransport> {
    /// Collector for `vault_id` in `environment`, over the production
    /// HTTPS transport.
    pub fn new(vault_id: &str, environment: Environment) -> Self {
        Self::with_transport(HttpTransport::new(), build_base_url(vault_id, environment))
    }
}

impl<T: Transport> Collector<T> {
    /// Collector over a caller-supplied transport and base URL.
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let url_valid = is_url_valid(&base_url);
        if !url_valid {
            info!(%base_url, "collector created with invalid base url");
        }
        Self {
            transport: Arc::new(transport),
            store: Arc::new(FieldStore::new()),
            listeners: Arc::new(Mutex::new(Vec::new())),
            inflight: Mutex::new(None),
            next_field_id: AtomicU32::new(0),
            base_url,
            url_valid,
            network_probe: None,
        }
    }

    /// Install a host probe consulted before every submission. Without
    /// one, network access is assumed to be granted.
    pub fn with_network_probe(mut self, probe: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.network_probe = Some(Box::new(probe));
        self
    }

    /// Bind a new input field. The returned binding pushes states into
    /// this collector's store; its alias keys the value in payloads.
    pub fn bind_field(&self, kind: FieldKind, alias: &str, required: bool) -> FieldBinding {
        let id = lockbox_core::FieldId(self.next_field_id.fetch_add(1, Ordering::Relaxed));
        FieldBinding::new(id, kind, alias.to_string(), required, self.store.subscriber())
    }

    /// Register a response listener. Listeners are notified in
    /// registration order for every submission outcome.
    pub fn add_response_listener(&self, listener: Arc<dyn ResponseListener>) {
        self.listeners
            .lock()
            .expect("listener set lock poisoned")
            .push(listener);
    }

    /// Observe aggregate field-state changes.
    pub fn set_field_state_listener(&self, listener: Option<Arc<dyn StateListener>>) {
        self.store.set_state_listener(listener);
    }

    /// Snapshot of every bound field's current state.
    pub fn states(&self) -> Vec<FieldState> {
        self.store.states()
    }

    /// The field store, for file attachment and limit configuration.
    pub fn store(&self) -> &Arc<FieldStore> {
        &self.store
    }

    pub fn attach_file(&self, file: AttachedFile) {
        self.store.attach_file(file);
    }

    /// Session-static custom data sent with every request until reset.
    pub fn set_custom_data(&self, data: serde_json::Map<String, serde_json::Value>) {
        self.transport.session().set_custom_data(data);
    }

    pub fn reset_custom_data(&self) {
        self.transport.session().reset_custom_data();
    }

    /// Session-static headers sent with every request until reset.
    pub fn set_custom_headers(&self, headers: std::collections::HashMap<String, String>) {
        self.transport.session().set_custom_headers(headers);
    }

    pub fn reset_custom_headers(&self) {
        self.transport.session().reset_custom_headers();
    }

    /// Execute a submission on the caller's task.
    ///
    /// Blocks (awaits) until the vault responds or the transport fails;
    /// the outcome fans out to every listener and is also returned.
    pub async fn submit(&self, request: SubmitRequest) -> VaultResponse {
        let call = match self.preflight(&request) {
            Ok(call) => call,
            Err(err) => return self.reject(err),
        };
        let trace_id = Uuid::new_v4();
        debug!(%trace_id, url = %call.url, method = call.method.as_str(), "submitting");

        let response = match self.transport.call(call).await {
            Ok(response) => response,
            Err(err) => {
                error!(%trace_id, "transport failure: {err}");
                VaultResponse::Error {
                    message: err.to_string(),
                    code: 0,
                }
            }
        };
        fan_out(&self.listeners, &response);
        response
    }

    /// Schedule a submission on a background task.
    ///
    /// Must be called from within a tokio runtime. Any submission still
    /// in flight is cancelled and superseded; a cancelled submission
    /// delivers nothing to listeners. All request-relevant data is
    /// snapshotted before scheduling.
    pub fn submit_async(&self, request: SubmitRequest) {
        let call = match self.preflight(&request) {
            Ok(call) => call,
            Err(err) => {
                self.reject(err);
                return;
            }
        };

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let transport = Arc::clone(&self.transport);
        let listeners = Arc::clone(&self.listeners);
        let trace_id = Uuid::new_v4();

        let mut slot = self.inflight.lock().expect("inflight slot lock poisoned");
        if let Some(previous) = slot.take() {
            previous.cancel.cancel();
            debug!("superseding in-flight submission");
        }

        let handle = tokio::spawn(async move {
            debug!(%trace_id, url = %call.url, "background submission started");
            let result = tokio::select! {
                _ = token.cancelled() => {
                    debug!(%trace_id, "submission cancelled in flight");
                    return;
                }
                result = transport.call(call) => result,
            };
            // A response that raced the cancellation is discarded, not
            // delivered.
            if token.is_cancelled() {
                debug!(%trace_id, "result suppressed after cancellation");
                return;
            }
            let response = match result {
                Ok(response) => response,
                Err(err) => {
                    error!(%trace_id, "transport failure: {err}");
                    VaultResponse::Error {
                        message: err.to_string(),
                        code: 0,
                    }
                }
            };
            fan_out(&listeners, &response);
        });

        *slot = Some(Inflight {
            cancel,
            _handle: handle,
        });
    }

    /// Tear the collector down: cancel in-flight work, drop listeners,
    /// clear the store. Safe to call repeatedly or with nothing in
    /// flight.
    pub fn shutdown(&self) {
        if let Some(inflight) = self
            .inflight
            .lock()
            .expect("inflight slot lock poisoned")
            .take()
        {
            inflight.cancel.cancel();
        }
        self.listeners
            .lock()
            .expect("listener set lock poisoned")
            .clear();
        self.store.clear();
        info!("collector shut down");
    }

    /// Run the pre-flight gates and build the outbound snapshot.
    fn preflight(&self, request: &SubmitRequest) -> Result<OutboundCall, CollectError> {
        if let Some(probe) = &self.network_probe {
            if !probe() {
                return Err(CollectError::NoNetworkPermission);
            }
        }
        if !self.url_valid {
            return Err(CollectError::UrlNotValid);
        }

        let states = self.store.states();
        if !request.fields_ignore {
            // The loop visits every field; the alias reported is the
            // last invalid one encountered.
            let mut invalid_alias: Option<String> = None;
            for state in &states {
                if !state.is_valid {
                    invalid_alias = Some(state.alias_or_placeholder().to_string());
                }
            }
            if let Some(alias) = invalid_alias {
                return Err(CollectError::InputDataNotValid(alias));
            }
        }

        let files = self.store.attached_files();
        let limit = self.store.file_size_limit();
        if !request.file_ignore {
            let mut oversized: Option<String> = None;
            for file in &files {
                if file.size > limit {
                    oversized = Some(file.name.clone());
                }
            }
            if let Some(name) = oversized {
                return Err(CollectError::FileSizeOverLimit(name));
            }
        }

        let session = self.transport.session();
        let body = payload::assemble(
            &states,
            &session.custom_data(),
            &request.custom_data,
            &files,
            limit,
            request.fields_ignore,
            request.file_ignore,
        );

        let mut headers = session.custom_headers();
        headers.extend(request.custom_headers.clone());

        Ok(OutboundCall {
            url: join_url(&self.base_url, &request.path),
            method: request.method,
            headers,
            body,
        })
    }

    fn reject(&self, err: CollectError) -> VaultResponse {
        error!(code = err.code().as_u16(), "submission rejected: {err}");
        let response = VaultResponse::rejected(&err);
        fan_out(&self.listeners, &response);
        response
    }
}

fn fan_out(listeners: &Listeners, response: &VaultResponse) {
    // Snapshot the set so a listener may register or remove listeners
    // without deadlocking the fan-out.
    let snapshot: Vec<Arc<dyn ResponseListener>> = listeners
        .lock()
        .expect("listener set lock poisoned")
        .clone();
    for listener in snapshot {
        listener.on_response(response);
    }
}
