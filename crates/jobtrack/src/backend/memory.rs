//! In-process backend.
//!
//! Keeps records in memory and supports failure injection and holding a
//! fetch in flight, which makes it the backend of choice for exercising the
//! store's error and race handling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use super::ApplicationBackend;
use crate::error::BackendError;
use crate::model::{Application, ApplicationDraft, ApplicationPatch};

#[derive(Default)]
struct MemoryState {
    /// Insertion order.
    records: Vec<Application>,
    failing: bool,
    fail_next: usize,
    gates: HashMap<String, Arc<Notify>>,
}

/// Releases a fetch held by [`MemoryBackend::hold_next_fetch`].
#[derive(Clone)]
pub struct FetchGate {
    notify: Arc<Notify>,
}

impl FetchGate {
    pub fn release(&self) {
        // Stores a permit if the fetch has not started waiting yet.
        self.notify.notify_one();
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    calls: AtomicUsize,
    held: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with records, oldest first.
    pub fn with_records(records: Vec<Application>) -> Self {
        let backend = Self::new();
        backend.lock().records = records;
        backend
    }

    /// Makes every call fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Makes the next `count` calls fail.
    pub fn fail_next(&self, count: usize) {
        self.lock().fail_next = count;
    }

    /// Blocks the next `fetch_all` for `owner_id` until the returned gate is
    /// released.
    pub fn hold_next_fetch(&self, owner_id: &str) -> FetchGate {
        let notify = Arc::new(Notify::new());
        self.lock()
            .gates
            .insert(owner_id.to_string(), Arc::clone(&notify));
        FetchGate { notify }
    }

    /// Number of fetches currently waiting on a gate.
    pub fn held_fetches(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }

    /// Number of backend calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored record regardless of owner.
    pub fn records(&self) -> Vec<Application> {
        self.lock().records.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Memory backend lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn begin_call(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        if state.failing {
            return Err(BackendError::Unavailable("backend offline".to_string()));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(BackendError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ApplicationBackend for MemoryBackend {
    async fn fetch_all(&self, owner_id: &str) -> Result<Vec<Application>, BackendError> {
        let gate = self.lock().gates.remove(owner_id);
        if let Some(gate) = gate {
            self.held.fetch_add(1, Ordering::SeqCst);
            gate.notified().await;
            self.held.fetch_sub(1, Ordering::SeqCst);
        }
        self.begin_call()?;

        let state = self.lock();
        let mut rows: Vec<Application> = state
            .records
            .iter()
            .rev()
            .filter(|app| app.owner_id == owner_id)
            .cloned()
            .collect();
        // Stable: equal timestamps keep newest-inserted first.
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert(
        &self,
        owner_id: &str,
        draft: ApplicationDraft,
    ) -> Result<Application, BackendError> {
        self.begin_call()?;
        draft.validate()?;

        let app = Application::from_draft(Uuid::new_v4().to_string(), owner_id, draft, Utc::now());
        self.lock().records.push(app.clone());
        Ok(app)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &ApplicationPatch,
    ) -> Result<Application, BackendError> {
        self.begin_call()?;
        patch.validate()?;

        let mut state = self.lock();
        let app = state
            .records
            .iter_mut()
            .find(|app| app.id == id && app.owner_id == owner_id)
            .ok_or_else(|| BackendError::NotFound { id: id.to_string() })?;
        app.apply_patch(patch);
        app.updated_at = Utc::now();
        Ok(app.clone())
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), BackendError> {
        self.begin_call()?;

        let mut state = self.lock();
        let before = state.records.len();
        state
            .records
            .retain(|app| !(app.id == id && app.owner_id == owner_id));
        if state.records.len() == before {
            return Err(BackendError::NotFound { id: id.to_string() });
        }
        Ok(())
    }
}
