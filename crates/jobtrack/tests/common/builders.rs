//! Builders for application records and configs.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use jobtrack::config::Config;
use jobtrack::model::{Application, ApplicationStatus, NewApplication};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builder for stored `Application` records, for seeding backends.
pub struct ApplicationBuilder {
    id: String,
    owner_id: String,
    input: NewApplication,
    created_at: DateTime<Utc>,
}

impl ApplicationBuilder {
    pub fn new(id: &str, owner_id: &str) -> Self {
        Self {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            input: NewApplication::new(format!("Company {}", id), "Software Engineer"),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
        }
    }

    pub fn company(mut self, company: &str) -> Self {
        self.input.company_name = company.to_string();
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.input.role = role.to_string();
        self
    }

    pub fn status(mut self, status: ApplicationStatus) -> Self {
        self.input = self.input.with_status(status);
        self
    }

    pub fn follow_up(mut self, date: NaiveDate) -> Self {
        self.input = self.input.follow_up_on(date);
        self
    }

    /// Offsets `created_at` from the builder's base time.
    pub fn created_minutes_after(mut self, minutes: i64) -> Self {
        self.created_at += Duration::minutes(minutes);
        self
    }

    pub fn build(self) -> Application {
        let draft = self.input.into_draft(date(2026, 1, 1));
        Application::from_draft(self.id, &self.owner_id, draft, self.created_at)
    }
}

/// Records for `owner_id` with the given statuses, oldest first.
pub fn applications_with_statuses(owner_id: &str, statuses: &[ApplicationStatus]) -> Vec<Application> {
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            ApplicationBuilder::new(&format!("{}-{}", owner_id, i), owner_id)
                .status(*status)
                .created_minutes_after(i as i64)
                .build()
        })
        .collect()
}

/// Builder for `Config` documents.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn database_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.database.path = Some(path.into());
        self
    }

    pub fn recent_limit(mut self, limit: usize) -> Self {
        self.config.dashboard.recent_limit = limit;
        self
    }

    pub fn upcoming_limit(mut self, limit: usize) -> Self {
        self.config.dashboard.upcoming_limit = limit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.config).unwrap()
    }

    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(&self.config).unwrap()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
