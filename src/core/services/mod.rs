pub mod consumption_service;
pub mod eligibility_service;
pub mod export;
pub mod import_service;
pub mod reconcile_service;
pub mod session_service;

pub use consumption_service::ConsumptionService;
pub use eligibility_service::EligibilityService;
pub use import_service::{ImportService, ImportSummary};
pub use reconcile_service::{ReconcileOutcome, ReconcileService};
pub use session_service::SessionService;

use crate::domain::RecordId;
use crate::errors::StorageError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error type for the core services. Every variant except `Storage` is an
/// expected, recoverable condition the caller must branch on; none of them
/// should ever surface as a panic in the UI layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Session context is missing its date or group selection.
    #[error("session context is incomplete")]
    SessionNotReady,
    /// No active session is recorded in the state file.
    #[error("no active session")]
    NoActiveSession,
    #[error("session {0} not found")]
    SessionNotFound(RecordId),
    #[error("student `{0}` not found")]
    StudentNotFound(String),
    /// Marking a student who is already in the served set.
    #[error("student `{0}` already served in this session")]
    AlreadyServed(String),
    /// Unmarking a student who is not in the served set.
    #[error("student `{0}` not served in this session")]
    NotServed(String),
    /// Session creation refused (duplicate row, missing reservations,
    /// malformed date or time).
    #[error("session rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// True for the expected-failure variants a UI maps to a warning dialog
    /// rather than an error report.
    pub fn is_expected(&self) -> bool {
        !matches!(self, ServiceError::Storage(_))
    }
}
