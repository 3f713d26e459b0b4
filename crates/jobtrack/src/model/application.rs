//! Application records and the inputs that create or change them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::optional::{self, normalize_text};
use super::status::ApplicationStatus;
use crate::error::BackendError;

/// A job application as stored by a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Backend-assigned identifier.
    pub id: String,
    /// The user who created the application.
    #[serde(rename = "user_id")]
    pub owner_id: String,
    pub company_name: String,
    pub role: String,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub location: Option<String>,
    /// Where the posting was found (LinkedIn, referral, ...).
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub source: Option<String>,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    #[serde(default, deserialize_with = "optional::optional_date")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub salary_range: Option<String>,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub job_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Builds a stored record from a draft. Used by backends.
    pub fn from_draft(
        id: String,
        owner_id: &str,
        draft: ApplicationDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id: owner_id.to_string(),
            company_name: draft.company_name,
            role: draft.role,
            location: draft.location,
            source: draft.source,
            status: draft.status,
            applied_date: draft.applied_date,
            follow_up_date: draft.follow_up_date,
            notes: draft.notes,
            salary_range: draft.salary_range,
            job_url: draft.job_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the fields present in `patch`. Does not touch `updated_at`.
    pub fn apply_patch(&mut self, patch: &ApplicationPatch) {
        if let Some(ref company_name) = patch.company_name {
            self.company_name = company_name.trim().to_string();
        }
        if let Some(ref role) = patch.role {
            self.role = role.trim().to_string();
        }
        if let Some(ref location) = patch.location {
            self.location = normalize_text(location.clone());
        }
        if let Some(ref source) = patch.source {
            self.source = normalize_text(source.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(applied_date) = patch.applied_date {
            self.applied_date = applied_date;
        }
        if let Some(follow_up_date) = patch.follow_up_date {
            self.follow_up_date = follow_up_date;
        }
        if let Some(ref notes) = patch.notes {
            self.notes = normalize_text(notes.clone());
        }
        if let Some(ref salary_range) = patch.salary_range {
            self.salary_range = normalize_text(salary_range.clone());
        }
        if let Some(ref job_url) = patch.job_url {
            self.job_url = normalize_text(job_url.clone());
        }
    }
}

/// Caller input for creating an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub company_name: String,
    pub role: String,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub source: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    /// Defaults to the caller's local date when omitted.
    #[serde(default, deserialize_with = "optional::optional_date")]
    pub applied_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional::optional_date")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub salary_range: Option<String>,
    #[serde(default, deserialize_with = "optional::optional_text")]
    pub job_url: Option<String>,
}

impl NewApplication {
    pub fn new(company_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn applied_on(mut self, date: NaiveDate) -> Self {
        self.applied_date = Some(date);
        self
    }

    pub fn follow_up_on(mut self, date: NaiveDate) -> Self {
        self.follow_up_date = Some(date);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = normalize_text(Some(location.into()));
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = normalize_text(Some(source.into()));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = normalize_text(Some(notes.into()));
        self
    }

    /// Resolves defaults and normalizes every text field.
    pub fn into_draft(self, today: NaiveDate) -> ApplicationDraft {
        ApplicationDraft {
            company_name: self.company_name.trim().to_string(),
            role: self.role.trim().to_string(),
            location: normalize_text(self.location),
            source: normalize_text(self.source),
            status: self.status,
            applied_date: self.applied_date.unwrap_or(today),
            follow_up_date: self.follow_up_date,
            notes: normalize_text(self.notes),
            salary_range: normalize_text(self.salary_range),
            job_url: normalize_text(self.job_url),
        }
    }
}

/// A fully resolved record ready for insertion: everything except the
/// backend-assigned id, owner and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub company_name: String,
    pub role: String,
    pub location: Option<String>,
    pub source: Option<String>,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub salary_range: Option<String>,
    pub job_url: Option<String>,
}

impl ApplicationDraft {
    /// Company and role are required and must not be blank.
    pub fn validate(&self) -> Result<(), BackendError> {
        require_text("company_name", &self.company_name)?;
        require_text("role", &self.role)
    }
}

/// A partial update. `None` leaves a field unchanged; for nullable fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationPatch {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "optional::patch_text")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "optional::patch_text")]
    pub source: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default, deserialize_with = "optional::optional_date")]
    pub applied_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional::patch_date")]
    pub follow_up_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "optional::patch_text")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "optional::patch_text")]
    pub salary_range: Option<Option<String>>,
    #[serde(default, deserialize_with = "optional::patch_text")]
    pub job_url: Option<Option<String>>,
}

impl ApplicationPatch {
    /// A patch that only changes the status.
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Rejects blank company or role when the patch sets them.
    pub fn validate(&self) -> Result<(), BackendError> {
        if let Some(ref company_name) = self.company_name {
            require_text("company_name", company_name)?;
        }
        if let Some(ref role) = self.role {
            require_text("role", role)?;
        }
        Ok(())
    }
}

/// Submitting the edit form sends every field; unset optionals clear the
/// stored value.
impl From<NewApplication> for ApplicationPatch {
    fn from(input: NewApplication) -> Self {
        Self {
            company_name: Some(input.company_name),
            role: Some(input.role),
            location: Some(normalize_text(input.location)),
            source: Some(normalize_text(input.source)),
            status: Some(input.status),
            applied_date: input.applied_date,
            follow_up_date: Some(input.follow_up_date),
            notes: Some(normalize_text(input.notes)),
            salary_range: Some(normalize_text(input.salary_range)),
            job_url: Some(normalize_text(input.job_url)),
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), BackendError> {
    if value.trim().is_empty() {
        return Err(BackendError::validation(format!("{} is required", field)));
    }
    Ok(())
}
