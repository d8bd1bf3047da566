//! Keyed registry of live field states with change notification.
//!
//! The store owns every `FieldState` for its lifetime. Bound widgets
//! push updates through a [`FieldSubscriber`] handle; consumers read
//! snapshot copies and never alias the live map. The file section is
//! pass-through configuration for the attachment flow.

use std::sync::{Arc, Mutex, Weak};

use indexmap::IndexMap;
use tracing::debug;

use crate::state::{FieldId, FieldState};

/// Attachment size ceiling applied when the host does not set one.
pub const DEFAULT_FILE_SIZE_LIMIT: usize = 4 * 1024 * 1024;

/// Observer of per-field state changes, fired synchronously on upsert.
pub trait StateListener: Send + Sync {
    fn on_state_change(&self, state: &FieldState);
}

impl<F> StateListener for F
where
    F: Fn(&FieldState) + Send + Sync,
{
    fn on_state_change(&self, state: &FieldState) {
        self(state)
    }
}

/// Binary attachment queued for the next submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub name: String,
    pub size: usize,
    pub bytes: Vec<u8>,
}

impl AttachedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len(),
            bytes,
        }
    }
}

struct StoreInner {
    fields: IndexMap<FieldId, FieldState>,
    listener: Option<Arc<dyn StateListener>>,
    files: Vec<AttachedFile>,
    file_size_limit: usize,
}

/// Insertion-ordered registry of field states.
pub struct FieldStore {
    inner: Mutex<StoreInner>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                fields: IndexMap::new(),
                listener: None,
                files: Vec::new(),
                file_size_limit: DEFAULT_FILE_SIZE_LIMIT,
            }),
        }
    }

    /// Insert `state` under `id`, overwriting in place when the id is
    /// already present. The registered listener (if any) is notified
    /// synchronously with the stored state.
    pub fn upsert(&self, id: FieldId, state: FieldState) {
        let (listener, snapshot) = {
            let mut inner = self.lock();
            inner.fields.insert(id, state.clone());
            (inner.listener.clone(), state)
        };
        // Notify outside the lock so a listener may read the store back.
        if let Some(listener) = listener {
            listener.on_state_change(&snapshot);
        }
    }

    /// Snapshot of all field states in insertion order.
    pub fn states(&self) -> Vec<FieldState> {
        self.lock().fields.values().cloned().collect()
    }

    /// Snapshot of a single field's state.
    pub fn get(&self, id: FieldId) -> Option<FieldState> {
        self.lock().fields.get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().fields.is_empty()
    }

    /// Drop every entry and attachment. Fires no per-entry
    /// notifications; observable only through a subsequent empty read.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.fields.clear();
        inner.files.clear();
        debug!("field store cleared");
    }

    /// Register (or replace) the single change-listener slot.
    pub fn set_state_listener(&self, listener: Option<Arc<dyn StateListener>>) {
        self.lock().listener = listener;
    }

    /// Emit handle for a bound widget. The handle holds no strong
    /// reference, so an orphaned widget cannot keep the store alive.
    pub fn subscriber(self: &Arc<Self>) -> FieldSubscriber {
        FieldSubscriber {
            store: Arc::downgrade(self),
        }
    }

    pub fn attach_file(&self, file: AttachedFile) {
        self.lock().files.push(file);
    }

    /// Snapshot of the attached files.
    pub fn attached_files(&self) -> Vec<AttachedFile> {
        self.lock().files.clone()
    }

    pub fn set_file_size_limit(&self, limit: usize) {
        self.lock().file_size_limit = limit;
    }

    pub fn file_size_limit(&self) -> usize {
        self.lock().file_size_limit
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().expect("field store lock poisoned")
    }
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Push capability handed to a bound field; behaviourally `upsert`
/// without exposing the store itself.
#[derive(Clone)]
pub struct FieldSubscriber {
    store: Weak<FieldStore>,
}

impl FieldSubscriber {
    /// Push a state change. A no-op once the owning store is gone.
    pub fn emit(&self, id: FieldId, state: FieldState) {
        if let Some(store) = self.store.upgrade() {
            store.upsert(id, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn state_with_alias(alias: &str) -> FieldState {
        FieldState {
            alias: Some(alias.to_string()),
            ..FieldState::default()
        }
    }

    #[test]
    fn test_upsert_grows_only_on_fresh_ids() {
        let store = FieldStore::new();

        store.upsert(FieldId(0), FieldState::default());
        assert_eq!(store.states().len(), 1);

        store.upsert(FieldId(1), FieldState::default());
        assert_eq!(store.states().len(), 2);

        store.upsert(
            FieldId(0),
            FieldState {
                has_focus: true,
                ..FieldState::default()
            },
        );
        assert_eq!(store.states().len(), 2);

        store.upsert(FieldId(2), FieldState::default());
        assert_eq!(store.states().len(), 3);
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let store = FieldStore::new();
        store.upsert(FieldId(0), state_with_alias("first"));
        store.upsert(FieldId(1), state_with_alias("second"));
        store.upsert(FieldId(0), state_with_alias("first-updated"));

        let states = store.states();
        assert_eq!(states[0].alias.as_deref(), Some("first-updated"));
        assert_eq!(states[1].alias.as_deref(), Some("second"));
    }

    #[test]
    fn test_listener_sees_latest_state() {
        let seen: Arc<StdMutex<Option<FieldState>>> = Arc::new(StdMutex::new(None));
        let store = FieldStore::new();

        let sink = Arc::clone(&seen);
        store.set_state_listener(Some(Arc::new(move |state: &FieldState| {
            *sink.lock().unwrap() = Some(state.clone());
        })));

        store.upsert(
            FieldId(0),
            FieldState {
                is_required: true,
                alias: Some("alias".to_string()),
                ..FieldState::default()
            },
        );
        assert!(seen.lock().unwrap().is_some());

        let update = FieldState {
            has_focus: true,
            is_required: false,
            alias: Some("alias1".to_string()),
            ..FieldState::default()
        };
        store.upsert(FieldId(0), update.clone());

        let latest = seen.lock().unwrap().clone().unwrap();
        assert_eq!(latest, update);
    }

    #[test]
    fn test_subscriber_emits_into_store() {
        let store = Arc::new(FieldStore::new());
        let subscriber = store.subscriber();

        let state = state_with_alias("via-subscription");
        subscriber.emit(FieldId(0), state.clone());
        assert!(store.states().contains(&state));

        subscriber.emit(FieldId(1), FieldState::default());
        assert_eq!(store.states().len(), 2);
    }

    #[test]
    fn test_subscriber_outliving_store_is_noop() {
        let store = Arc::new(FieldStore::new());
        let subscriber = store.subscriber();
        drop(store);
        subscriber.emit(FieldId(0), FieldState::default());
    }

    #[test]
    fn test_clear_empties_everything() {
        let store = FieldStore::new();
        store.upsert(FieldId(0), FieldState::default());
        store.upsert(FieldId(1), FieldState::default());
        store.attach_file(AttachedFile::new("doc.pdf", vec![0u8; 16]));
        assert_eq!(store.states().len(), 2);

        store.clear();
        assert!(store.states().is_empty());
        assert!(store.attached_files().is_empty());
    }

    #[test]
    fn test_file_section_is_pass_through() {
        let store = FieldStore::new();
        assert_eq!(store.file_size_limit(), DEFAULT_FILE_SIZE_LIMIT);

        store.set_file_size_limit(1024);
        assert_eq!(store.file_size_limit(), 1024);

        store.attach_file(AttachedFile::new("scan.png", vec![1, 2, 3]));
        let files = store.attached_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "scan.png");
        assert_eq!(files[0].size, 3);
    }
}
