//! Domain types: applications, their pipeline status, and inputs.

pub mod application;
pub mod optional;
pub mod status;

pub use application::{Application, ApplicationDraft, ApplicationPatch, NewApplication};
pub use optional::{normalize_text, parse_optional_date};
pub use status::{ApplicationStatus, UnknownStatus};
