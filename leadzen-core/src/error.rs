use shared_types::PermissionId;
use std::time::Duration;

/// Errors raised while loading or mutating a list store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to load: {0}")]
    LoadFailed(String),

    #[error("Load timed out after {0:?}")]
    Timeout(Duration),

    #[error("Entity {0} not found")]
    NotFound(i64),
}

/// Errors from the platform permissions collaborator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PermissionError {
    #[error("Platform error for {permission}: {message}")]
    Platform {
        permission: PermissionId,
        message: String,
    },

    #[error("Platform did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Platform returned no status for {0}")]
    MissingStatus(PermissionId),
}

/// Errors raised while dispatching a UI action
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Failed to open {uri}: {message}")]
    LaunchFailed { uri: String, message: String },

    #[error(transparent)]
    Permission(#[from] PermissionError),
}
