//! Pipeline stages an application moves through.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of an application.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    /// Online assessment.
    Oa,
    Interview,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// All statuses in pipeline order.
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Oa,
        ApplicationStatus::Interview,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
    ];

    /// Lowercase name used in storage and serialized forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Oa => "oa",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Offer => "offer",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Oa => "OA",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Offer and rejected end the pipeline.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Offer | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a string that is not one of the five statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(ApplicationStatus::Applied),
            "oa" => Ok(ApplicationStatus::Oa),
            "interview" => Ok(ApplicationStatus::Interview),
            "offer" => Ok(ApplicationStatus::Offer),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_every_status() {
        for status in ApplicationStatus::ALL {
            assert_eq!(status.as_str().parse::<ApplicationStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "ghosted".parse::<ApplicationStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("ghosted".to_string()));
        assert!("Applied".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = ApplicationStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![ApplicationStatus::Offer, ApplicationStatus::Rejected]
        );
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ApplicationStatus::Oa).unwrap();
        assert_eq!(json, "\"oa\"");
        let status: ApplicationStatus = serde_json::from_str("\"interview\"").unwrap();
        assert_eq!(status, ApplicationStatus::Interview);
        assert!(serde_json::from_str::<ApplicationStatus>("\"hired\"").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(ApplicationStatus::Oa.label(), "OA");
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Applied);
    }
}
