//! Store harnesses for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::broadcast;

use jobtrack::backend::{MemoryBackend, SqliteBackend};
use jobtrack::db::Database;
use jobtrack::model::Application;
use jobtrack::notify::{Notification, NotificationBroadcaster};
use jobtrack::store::ApplicationStore;

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Drains every notification received so far.
pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        out.push(notification);
    }
    out
}

/// Waits until `predicate` holds for the store, re-checking after each
/// state change. Panics after a timeout.
pub async fn wait_until<F>(store: &ApplicationStore, predicate: F)
where
    F: Fn(&ApplicationStore) -> bool,
{
    let mut changes = store.subscribe();
    let result = tokio::time::timeout(WAIT_TIMEOUT, async {
        loop {
            if predicate(store) {
                return;
            }
            if changes.changed().await.is_err() {
                return;
            }
        }
    })
    .await;
    assert!(result.is_ok(), "store never reached the expected state");
}

/// A store over an in-memory backend.
pub struct StoreHarness {
    pub backend: Arc<MemoryBackend>,
    pub store: Arc<ApplicationStore>,
    pub notifications: NotificationBroadcaster,
    rx: broadcast::Receiver<Notification>,
}

impl StoreHarness {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seeds the backend with `records`, oldest first.
    pub fn with_records(records: Vec<Application>) -> Self {
        let backend = Arc::new(MemoryBackend::with_records(records));
        let notifications = NotificationBroadcaster::new(64);
        let rx = notifications.subscribe();
        let store = Arc::new(ApplicationStore::new(
            backend.clone(),
            Arc::new(notifications.clone()),
        ));
        Self {
            backend,
            store,
            notifications,
            rx,
        }
    }

    pub fn notifications(&mut self) -> Vec<Notification> {
        drain(&mut self.rx)
    }

    pub fn messages(&mut self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .map(|n| n.message)
            .collect()
    }

    pub fn ids(&self) -> Vec<String> {
        self.store
            .applications()
            .into_iter()
            .map(|a| a.id)
            .collect()
    }
}

/// A store over a SQLite file in a temp directory.
pub struct SqliteHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub store: Arc<ApplicationStore>,
    rx: broadcast::Receiver<Notification>,
}

impl SqliteHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("jobtrack.db");
        let store_and_rx = Self::open_store(&db_path);
        Self {
            temp_dir,
            db_path,
            store: store_and_rx.0,
            rx: store_and_rx.1,
        }
    }

    /// A second store over the same file, as after an app restart.
    pub fn reopen(&self) -> Arc<ApplicationStore> {
        Self::open_store(&self.db_path).0
    }

    pub fn notifications(&mut self) -> Vec<Notification> {
        drain(&mut self.rx)
    }

    fn open_store(path: &Path) -> (Arc<ApplicationStore>, broadcast::Receiver<Notification>) {
        let db = Database::open(path).expect("Failed to open database");
        let notifications = NotificationBroadcaster::new(64);
        let rx = notifications.subscribe();
        let store = Arc::new(ApplicationStore::new(
            Arc::new(SqliteBackend::new(db)),
            Arc::new(notifications),
        ));
        (store, rx)
    }
}
