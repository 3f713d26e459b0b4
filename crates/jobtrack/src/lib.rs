pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod logging;
pub mod model;
pub mod notify;
pub mod session;
pub mod stats;
pub mod store;
pub mod views;

pub use backend::{ApplicationBackend, MemoryBackend, SqliteBackend};
pub use config::{load_config, Config};
pub use db::{Database, DatabaseError};
pub use error::{BackendError, ConfigError, JobtrackError, Result};
pub use identity::{IdentityProvider, User};
pub use logging::init_logging;
pub use model::{Application, ApplicationPatch, ApplicationStatus, NewApplication};
pub use notify::{Notification, NotificationBroadcaster, NotificationKind, NotificationSink};
pub use session::{Dashboard, Session};
pub use stats::{ApplicationStats, PipelineSegment};
pub use store::{ApplicationStore, StoreSubscription};
pub use views::{ApplicationFilter, StatusFilter};
