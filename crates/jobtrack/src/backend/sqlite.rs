//! SQLite-backed persistence.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use super::ApplicationBackend;
use crate::db::application_repo::{self, ApplicationRow};
use crate::db::Database;
use crate::error::BackendError;
use crate::model::{Application, ApplicationDraft, ApplicationPatch};

/// Stored timestamps keep microsecond precision.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Backend storing applications in the local `applications` table.
///
/// Statements are synchronous and short, so they run inline on the calling
/// task.
#[derive(Clone)]
pub struct SqliteBackend {
    db: Database,
}

impl SqliteBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn find(&self, owner_id: &str, id: &str) -> Result<Application, BackendError> {
        match application_repo::find_by_id(&self.db, owner_id, id)? {
            Some(row) => Ok(row.into_application()?),
            None => Err(BackendError::NotFound { id: id.to_string() }),
        }
    }
}

#[async_trait]
impl ApplicationBackend for SqliteBackend {
    async fn fetch_all(&self, owner_id: &str) -> Result<Vec<Application>, BackendError> {
        let rows = application_repo::list_by_owner(&self.db, owner_id)?;
        rows.into_iter()
            .map(|row| row.into_application().map_err(BackendError::from))
            .collect()
    }

    async fn insert(
        &self,
        owner_id: &str,
        draft: ApplicationDraft,
    ) -> Result<Application, BackendError> {
        draft.validate()?;

        let app = Application::from_draft(Uuid::new_v4().to_string(), owner_id, draft, now());
        application_repo::insert(&self.db, &ApplicationRow::from_application(&app))?;
        log::debug!("Inserted application {} for user {}", app.id, owner_id);
        Ok(app)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &ApplicationPatch,
    ) -> Result<Application, BackendError> {
        patch.validate()?;

        let mut app = self.find(owner_id, id)?;
        app.apply_patch(patch);
        app.updated_at = now();

        if !application_repo::update(&self.db, &ApplicationRow::from_application(&app))? {
            return Err(BackendError::NotFound { id: id.to_string() });
        }
        Ok(app)
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), BackendError> {
        if application_repo::delete(&self.db, owner_id, id)? {
            Ok(())
        } else {
            Err(BackendError::NotFound { id: id.to_string() })
        }
    }
}
