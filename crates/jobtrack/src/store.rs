//! The signed-in user's application collection.
//!
//! [`ApplicationStore`] is the single owner of the in-memory list and the
//! only writer to the backend. Backend failures never escape: each one is
//! logged, surfaced as one error notification, and turned into an empty /
//! `None` / `false` result.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::backend::ApplicationBackend;
use crate::error::BackendError;
use crate::identity::{IdentityProvider, User};
use crate::model::{Application, ApplicationPatch, ApplicationStatus, NewApplication};
use crate::notify::{Notification, NotificationSink};
use crate::stats::ApplicationStats;

const LOAD_FAILED: &str = "Failed to load applications";
const ADD_FAILED: &str = "Failed to add application";
const UPDATE_FAILED: &str = "Failed to update application";
const DELETE_FAILED: &str = "Failed to delete application";
const ADDED: &str = "Application added successfully";
const UPDATED: &str = "Application updated successfully";
const DELETED: &str = "Application deleted successfully";

struct StoreState {
    /// Newest first after a load; unique by id.
    collection: Vec<Application>,
    is_loading: bool,
    current_user: Option<User>,
    /// Bumped by every user change and every load; a load only commits if
    /// the epoch it started with is still current.
    epoch: u64,
}

impl StoreState {
    fn current_user_id(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.id.as_str())
    }
}

/// Owned, per-session container for the current user's applications.
pub struct ApplicationStore {
    backend: Arc<dyn ApplicationBackend>,
    notifier: Arc<dyn NotificationSink>,
    state: RwLock<StoreState>,
    /// Revision counter, bumped whenever observable state changes.
    changes: watch::Sender<u64>,
}

impl ApplicationStore {
    /// Creates a store with no user. It reports loading until the first
    /// [`load`](Self::load) resolves.
    pub fn new(backend: Arc<dyn ApplicationBackend>, notifier: Arc<dyn NotificationSink>) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            backend,
            notifier,
            state: RwLock::new(StoreState {
                collection: Vec::new(),
                is_loading: true,
                current_user: None,
                epoch: 0,
            }),
            changes,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Application store lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Application store lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn touch(&self) {
        self.changes.send_modify(|revision| *revision += 1);
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    /// Snapshot of the collection, newest first.
    pub fn applications(&self) -> Vec<Application> {
        self.read().collection.clone()
    }

    pub fn get(&self, id: &str) -> Option<Application> {
        self.read().collection.iter().find(|a| a.id == id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().current_user.clone()
    }

    /// Recomputed from the current collection on every call.
    pub fn stats(&self) -> ApplicationStats {
        ApplicationStats::from_applications(&self.read().collection)
    }

    /// Receives a new revision number after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    // ─── Session ────────────────────────────────────────────────────────────

    /// Replaces the current user, discarding the collection and invalidating
    /// any load in flight. Returns false if the user did not change.
    pub fn set_current_user(&self, user: Option<User>) -> bool {
        {
            let mut state = self.write();
            if state.current_user == user {
                return false;
            }
            state.current_user = user;
            state.collection.clear();
            state.is_loading = true;
            state.epoch += 1;
        }
        self.touch();
        true
    }

    /// Changes the user and loads their applications.
    pub async fn switch_user(&self, user: Option<User>) {
        self.set_current_user(user);
        self.load().await;
    }

    /// Keeps the store in sync with `identity`: applies the current user
    /// now and reloads after every change.
    pub fn attach(self: &Arc<Self>, identity: &IdentityProvider) -> StoreSubscription {
        let store = Arc::clone(self);
        let mut rx = identity.subscribe();

        let handle = tokio::spawn(async move {
            let user = rx.borrow_and_update().clone();
            store.set_current_user(user);
            store.spawn_load();

            while rx.changed().await.is_ok() {
                let user = rx.borrow_and_update().clone();
                if store.set_current_user(user) {
                    store.spawn_load();
                }
            }
            log::debug!("Identity provider closed, store subscription ending");
        });

        StoreSubscription { handle }
    }

    /// Loads run detached so a slow fetch never delays reacting to the next
    /// user change.
    fn spawn_load(self: &Arc<Self>) {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.load().await });
    }

    // ─── Operations ─────────────────────────────────────────────────────────

    /// Replaces the collection with the current user's applications.
    ///
    /// Without a user the collection is emptied and no backend call is made.
    /// A load superseded by a user change or a newer load is discarded.
    pub async fn load(&self) {
        let (user_id, epoch) = {
            let mut state = self.write();
            state.epoch += 1;
            let user_id = state.current_user_id().map(str::to_string);
            match user_id {
                Some(user_id) => {
                    state.is_loading = true;
                    (user_id, state.epoch)
                }
                None => {
                    state.collection.clear();
                    state.is_loading = false;
                    drop(state);
                    self.touch();
                    return;
                }
            }
        };

        let span = tracing::info_span!("store.load", user_id = %user_id);
        let result = self.backend.fetch_all(&user_id).instrument(span).await;

        {
            let mut state = self.write();
            if state.epoch != epoch {
                log::debug!("Discarding superseded load for user {}", user_id);
                return;
            }
            state.is_loading = false;

            match result {
                Ok(mut applications) => {
                    let fetched = applications.len();
                    applications.retain(|app| app.owner_id == user_id);
                    if applications.len() != fetched {
                        log::warn!(
                            "Backend returned {} applications not owned by {}",
                            fetched - applications.len(),
                            user_id
                        );
                    }
                    log::debug!("Loaded {} applications", applications.len());
                    state.collection = applications;
                }
                Err(e) => {
                    drop(state);
                    self.report_failure("fetching", &e, LOAD_FAILED);
                }
            }
        }
        self.touch();
    }

    /// Alias of [`load`](Self::load).
    pub async fn refetch(&self) {
        self.load().await;
    }

    /// Creates an application for the current user and prepends it.
    ///
    /// Returns `None` without contacting the backend when nobody is signed
    /// in.
    pub async fn create(&self, input: NewApplication) -> Option<Application> {
        let Some(user_id) = self.read().current_user_id().map(str::to_string) else {
            log::debug!("Ignoring create without a signed-in user");
            return None;
        };

        let draft = input.into_draft(Local::now().date_naive());
        let span = tracing::info_span!("store.create", user_id = %user_id);
        match self.backend.insert(&user_id, draft).instrument(span).await {
            Ok(app) => {
                {
                    let mut state = self.write();
                    if state.current_user_id() == Some(app.owner_id.as_str()) {
                        state.collection.retain(|existing| existing.id != app.id);
                        state.collection.insert(0, app.clone());
                    } else {
                        log::debug!("User changed while creating {}, not prepending", app.id);
                    }
                }
                self.touch();
                self.notifier.notify(Notification::success(ADDED));
                Some(app)
            }
            Err(e) => {
                self.report_failure("adding", &e, ADD_FAILED);
                None
            }
        }
    }

    /// Applies `patch` to the application `id`, replacing it in place.
    ///
    /// The backend call is made even if `id` is not in the collection.
    pub async fn update(&self, id: &str, patch: ApplicationPatch) -> Option<Application> {
        let owner = self.read().current_user_id().map(str::to_string);

        let result = match owner.as_deref() {
            Some(owner_id) => {
                let span = tracing::info_span!("store.update", user_id = %owner_id, id = %id);
                self.backend
                    .update(owner_id, id, &patch)
                    .instrument(span)
                    .await
            }
            None => Err(BackendError::Unauthorized),
        };

        match result {
            Ok(app) => {
                {
                    let mut state = self.write();
                    if state.current_user_id() == owner.as_deref() {
                        if let Some(slot) = state.collection.iter_mut().find(|a| a.id == id) {
                            *slot = app.clone();
                        }
                    }
                }
                self.touch();
                self.notifier.notify(Notification::success(UPDATED));
                Some(app)
            }
            Err(e) => {
                self.report_failure("updating", &e, UPDATE_FAILED);
                None
            }
        }
    }

    pub async fn update_status(&self, id: &str, status: ApplicationStatus) -> Option<Application> {
        self.update(id, ApplicationPatch::status(status)).await
    }

    /// Kanban drop: changes the status of a listed application.
    ///
    /// Dropping onto the column it is already in, or an id that is not
    /// listed, does nothing.
    pub async fn move_application(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Option<Application> {
        let current = self.get(id)?;
        if current.status == status {
            return None;
        }
        self.update_status(id, status).await
    }

    /// Deletes the application `id`. Returns true on success.
    pub async fn delete(&self, id: &str) -> bool {
        let owner = self.read().current_user_id().map(str::to_string);

        let result = match owner.as_deref() {
            Some(owner_id) => {
                let span = tracing::info_span!("store.delete", user_id = %owner_id, id = %id);
                self.backend.delete(owner_id, id).instrument(span).await
            }
            None => Err(BackendError::Unauthorized),
        };

        match result {
            Ok(()) => {
                self.write().collection.retain(|app| app.id != id);
                self.touch();
                self.notifier.notify(Notification::success(DELETED));
                true
            }
            Err(e) => {
                self.report_failure("deleting", &e, DELETE_FAILED);
                false
            }
        }
    }

    fn report_failure(&self, action: &str, error: &BackendError, message: &str) {
        log::error!("Error {} application: {}", action, error);
        self.notifier.notify(Notification::error(message));
    }
}

/// Keeps an [`ApplicationStore`] attached to an identity provider.
///
/// Dropping the handle stops reacting to user changes.
pub struct StoreSubscription {
    handle: JoinHandle<()>,
}

impl StoreSubscription {
    pub fn detach(self) {}
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
