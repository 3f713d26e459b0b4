//! List, pipeline and dashboard queries over an application collection.
//!
//! All helpers borrow from the collection and keep its order (newest
//! first) unless stated otherwise.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{Application, ApplicationStatus, UnknownStatus};

/// Status dropdown of the list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn accepts(&self, status: ApplicationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Search box plus status dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub search: String,
    pub status: StatusFilter,
}

impl ApplicationFilter {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// Case-insensitive substring match on company name or role.
    pub fn matches(&self, app: &Application) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = app.company_name.to_lowercase().contains(&needle)
            || app.role.to_lowercase().contains(&needle);
        matches_search && self.status.accepts(app.status)
    }

    pub fn apply<'a>(&self, applications: &'a [Application]) -> Vec<&'a Application> {
        applications.iter().filter(|app| self.matches(app)).collect()
    }
}

pub fn by_status(applications: &[Application], status: ApplicationStatus) -> Vec<&Application> {
    applications
        .iter()
        .filter(|app| app.status == status)
        .collect()
}

/// A Kanban column.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineColumn<'a> {
    pub status: ApplicationStatus,
    pub applications: Vec<&'a Application>,
}

/// One column per status in pipeline order; every application lands in
/// exactly one column.
pub fn pipeline_columns(applications: &[Application]) -> Vec<PipelineColumn<'_>> {
    ApplicationStatus::ALL
        .into_iter()
        .map(|status| PipelineColumn {
            status,
            applications: by_status(applications, status),
        })
        .collect()
}

/// The most recently created applications.
pub fn recent(applications: &[Application], limit: usize) -> &[Application] {
    &applications[..applications.len().min(limit)]
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FollowUps<'a> {
    /// Future follow-ups, soonest first.
    pub upcoming: Vec<&'a Application>,
    /// Follow-ups due today or earlier on applications still in flight.
    pub overdue: Vec<&'a Application>,
}

pub fn follow_ups(
    applications: &[Application],
    today: NaiveDate,
    upcoming_limit: usize,
) -> FollowUps<'_> {
    let mut upcoming: Vec<&Application> = applications
        .iter()
        .filter(|app| app.follow_up_date.is_some_and(|d| d > today))
        .collect();
    upcoming.sort_by_key(|app| app.follow_up_date);
    upcoming.truncate(upcoming_limit);

    let overdue = applications
        .iter()
        .filter(|app| {
            app.follow_up_date.is_some_and(|d| d <= today) && !app.status.is_terminal()
        })
        .collect();

    FollowUps { upcoming, overdue }
}

/// True when the follow-up falls within `window_days` of `today`.
pub fn is_urgent(app: &Application, today: NaiveDate, window_days: u32) -> bool {
    let Some(date) = app.follow_up_date else {
        return false;
    };
    match today.checked_add_days(Days::new(u64::from(window_days))) {
        Some(limit) => date <= limit,
        None => true,
    }
}
