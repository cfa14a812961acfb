use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid Code: no company found with code {0}")]
    InvalidCompanyCode(String),

    #[error("Profile is already associated with a company")]
    AlreadyInCompany,

    #[error("Already clocked in: an open time entry exists")]
    AlreadyClockedIn,

    #[error("Clock state changed elsewhere: time entry {0} is no longer open")]
    ClockStateChanged(String),

    #[error("Another clock action is already in progress")]
    ActionInProgress,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Whether the user may retry the same action manually and expect
    /// a different result (store/network hiccups, in-flight duplicates).
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Storage(_) | DomainError::ActionInProgress)
    }

    /// Stable machine-readable code surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::NotFound { .. } => "not_found",
            DomainError::Validation(_) => "validation",
            DomainError::Conflict(_) => "conflict",
            DomainError::Unauthorized(_) => "unauthorized",
            DomainError::Forbidden(_) => "forbidden",
            DomainError::InvalidCompanyCode(_) => "invalid_code",
            DomainError::AlreadyInCompany => "already_in_company",
            DomainError::AlreadyClockedIn => "already_clocked_in",
            DomainError::ClockStateChanged(_) => "state_changed",
            DomainError::ActionInProgress => "action_in_progress",
            DomainError::Storage(_) => "storage",
            DomainError::Internal(_) => "internal",
        }
    }
}
