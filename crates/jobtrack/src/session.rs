//! Wiring of one signed-in session: identity, notifications, backend and
//! store, plus the dashboard snapshot built from them.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::backend::{ApplicationBackend, SqliteBackend};
use crate::config::{Config, DashboardConfig};
use crate::db::Database;
use crate::error::{ConfigError, Result};
use crate::identity::IdentityProvider;
use crate::model::Application;
use crate::notify::NotificationBroadcaster;
use crate::stats::{ApplicationStats, PipelineSegment};
use crate::store::{ApplicationStore, StoreSubscription};
use crate::views;

/// Everything the dashboard page shows, computed from the store at one
/// instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub greeting_name: String,
    pub stats: ApplicationStats,
    pub pipeline: Vec<PipelineSegment>,
    pub recent: Vec<Application>,
    pub upcoming_follow_ups: Vec<Application>,
    pub overdue_follow_ups: Vec<Application>,
    /// Ids of upcoming follow-ups inside the urgent window.
    pub urgent_ids: Vec<String>,
}

pub struct Session {
    identity: IdentityProvider,
    notifications: NotificationBroadcaster,
    store: Arc<ApplicationStore>,
    dashboard: DashboardConfig,
    _subscription: StoreSubscription,
}

impl Session {
    /// Opens the configured SQLite database and attaches a store to a
    /// fresh identity provider. Must be called within a Tokio runtime.
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.database_path().ok_or_else(|| ConfigError::Validation {
            message: "database.path is unset and no home directory was found".to_string(),
        })?;
        let db = Database::open(&path)?;
        log::info!("Opened application database at {}", path.display());
        Ok(Self::with_backend(Arc::new(SqliteBackend::new(db)), config))
    }

    /// Must be called within a Tokio runtime.
    pub fn with_backend(backend: Arc<dyn ApplicationBackend>, config: &Config) -> Self {
        let identity = IdentityProvider::new();
        let notifications = NotificationBroadcaster::new(config.notifications.capacity);
        let store = Arc::new(ApplicationStore::new(
            backend,
            Arc::new(notifications.clone()),
        ));
        let subscription = store.attach(&identity);

        Self {
            identity,
            notifications,
            store,
            dashboard: config.dashboard.clone(),
            _subscription: subscription,
        }
    }

    pub fn identity(&self) -> &IdentityProvider {
        &self.identity
    }

    pub fn notifications(&self) -> &NotificationBroadcaster {
        &self.notifications
    }

    pub fn store(&self) -> &Arc<ApplicationStore> {
        &self.store
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let applications = self.store.applications();
        let stats = ApplicationStats::from_applications(&applications);
        let follow_ups = views::follow_ups(&applications, today, self.dashboard.upcoming_limit);

        let urgent_ids = follow_ups
            .upcoming
            .iter()
            .filter(|app| views::is_urgent(app, today, self.dashboard.urgent_window_days))
            .map(|app| app.id.clone())
            .collect();

        Dashboard {
            greeting_name: self
                .store
                .current_user()
                .map(|user| user.first_name().to_string())
                .unwrap_or_else(|| "there".to_string()),
            stats,
            pipeline: stats.pipeline(),
            recent: views::recent(&applications, self.dashboard.recent_limit).to_vec(),
            upcoming_follow_ups: follow_ups.upcoming.into_iter().cloned().collect(),
            overdue_follow_ups: follow_ups.overdue.into_iter().cloned().collect(),
            urgent_ids,
        }
    }
}
