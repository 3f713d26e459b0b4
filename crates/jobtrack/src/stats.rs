//! Derived statistics over an application collection.
//!
//! Everything here is recomputed from the slice it is given; nothing is
//! cached or persisted.

use serde::Serialize;

use crate::model::{Application, ApplicationStatus};

/// Per-status counts plus success rate and in-flight count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStats {
    pub total: usize,
    pub applied: usize,
    pub oa: usize,
    pub interview: usize,
    pub offer: usize,
    pub rejected: usize,
    /// Offers as a whole-number percentage of all applications.
    pub success_rate: u32,
    /// Applications not yet in a terminal status.
    pub active_applications: usize,
}

/// One bar of the pipeline overview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSegment {
    pub status: ApplicationStatus,
    pub count: usize,
    /// Share of all applications, 0.0..=100.0.
    pub percent: f64,
}

impl ApplicationStats {
    pub fn from_applications(applications: &[Application]) -> Self {
        let mut stats = Self {
            total: applications.len(),
            ..Self::default()
        };

        for app in applications {
            match app.status {
                ApplicationStatus::Applied => stats.applied += 1,
                ApplicationStatus::Oa => stats.oa += 1,
                ApplicationStatus::Interview => stats.interview += 1,
                ApplicationStatus::Offer => stats.offer += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
            }
        }

        stats.success_rate = rounded_percent(stats.offer, stats.total);
        stats.active_applications = stats.applied + stats.oa + stats.interview;
        stats
    }

    pub fn count(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Applied => self.applied,
            ApplicationStatus::Oa => self.oa,
            ApplicationStatus::Interview => self.interview,
            ApplicationStatus::Offer => self.offer,
            ApplicationStatus::Rejected => self.rejected,
        }
    }

    /// Segments in pipeline order.
    pub fn pipeline(&self) -> Vec<PipelineSegment> {
        ApplicationStatus::ALL
            .into_iter()
            .map(|status| {
                let count = self.count(status);
                let percent = if self.total == 0 {
                    0.0
                } else {
                    count as f64 / self.total as f64 * 100.0
                };
                PipelineSegment {
                    status,
                    count,
                    percent,
                }
            })
            .collect()
    }
}

/// `part / total * 100`, rounded half up; 0 when `total` is 0.
fn rounded_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (part as u64) * 200 + total as u64;
    (scaled / (2 * total as u64)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewApplication;
    use chrono::{NaiveDate, Utc};

    fn apps(statuses: &[ApplicationStatus]) -> Vec<Application> {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let draft = NewApplication::new(format!("Company {}", i), "Engineer")
                    .with_status(*status)
                    .into_draft(today);
                Application::from_draft(format!("a{}", i), "u1", draft, Utc::now())
            })
            .collect()
    }

    use ApplicationStatus::*;

    #[test]
    fn test_empty_collection() {
        let stats = ApplicationStats::from_applications(&[]);
        assert_eq!(stats, ApplicationStats::default());
        assert_eq!(stats.success_rate, 0);
    }

    #[test]
    fn test_mixed_scenario() {
        let stats = ApplicationStats::from_applications(&apps(&[Applied, Applied, Offer, Rejected]));
        assert_eq!(
            stats,
            ApplicationStats {
                total: 4,
                applied: 2,
                oa: 0,
                interview: 0,
                offer: 1,
                rejected: 1,
                success_rate: 25,
                active_applications: 2,
            }
        );
    }

    #[test]
    fn test_success_rate_rounds() {
        let one_in_three = ApplicationStats::from_applications(&apps(&[Offer, Applied, Oa]));
        assert_eq!(one_in_three.success_rate, 33);

        let two_in_three = ApplicationStats::from_applications(&apps(&[Offer, Offer, Oa]));
        assert_eq!(two_in_three.success_rate, 67);

        // 1/8 = 12.5 rounds up.
        let one_in_eight = ApplicationStats::from_applications(&apps(&[
            Offer, Applied, Applied, Applied, Applied, Applied, Applied, Applied,
        ]));
        assert_eq!(one_in_eight.success_rate, 13);
    }

    #[test]
    fn test_single_status_collections() {
        let all_offers = ApplicationStats::from_applications(&apps(&[Offer, Offer, Offer]));
        assert_eq!(all_offers.success_rate, 100);
        assert_eq!(all_offers.active_applications, 0);

        let all_interviews = ApplicationStats::from_applications(&apps(&[Interview, Interview]));
        assert_eq!(all_interviews.interview, 2);
        assert_eq!(all_interviews.active_applications, 2);
        assert_eq!(all_interviews.success_rate, 0);
    }

    #[test]
    fn test_counts_sum_to_total() {
        let stats = ApplicationStats::from_applications(&apps(&[
            Applied, Oa, Oa, Interview, Offer, Rejected, Rejected,
        ]));
        let sum: usize = ApplicationStatus::ALL.iter().map(|s| stats.count(*s)).sum();
        assert_eq!(sum, stats.total);
        assert_eq!(
            stats.active_applications,
            stats.applied + stats.oa + stats.interview
        );
    }

    #[test]
    fn test_pipeline_segments() {
        let stats = ApplicationStats::from_applications(&apps(&[Applied, Applied, Offer, Rejected]));
        let pipeline = stats.pipeline();

        assert_eq!(pipeline.len(), 5);
        assert_eq!(pipeline[0].status, Applied);
        assert_eq!(pipeline[0].count, 2);
        assert!((pipeline[0].percent - 50.0).abs() < f64::EPSILON);
        assert_eq!(pipeline[1].percent, 0.0);

        let empty = ApplicationStats::default().pipeline();
        assert!(empty.iter().all(|s| s.percent == 0.0));
    }

    #[test]
    fn test_serializes_camel_case() {
        let stats = ApplicationStats::from_applications(&apps(&[Offer]));
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["successRate"], 100);
        assert_eq!(json["activeApplications"], 0);
    }
}
