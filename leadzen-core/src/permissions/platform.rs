use async_trait::async_trait;
use shared_types::{PermissionId, PermissionStatus};

use crate::error::PermissionError;

/// Statuses in the order the platform reported them
pub type StatusReport = Vec<(PermissionId, PermissionStatus)>;

/// OS permission API (e.g. the Android runtime permission bridge)
#[async_trait]
pub trait PermissionPlatform: Send + Sync {
    async fn check(&self, permissions: &[PermissionId]) -> Result<StatusReport, PermissionError>;

    /// Shows the system dialog(s) and reports what the user chose
    async fn request(&self, permissions: &[PermissionId])
        -> Result<StatusReport, PermissionError>;

    async fn open_settings(&self) -> Result<(), PermissionError>;
}

pub(crate) fn status_for(
    report: &StatusReport,
    permission: &PermissionId,
) -> Result<PermissionStatus, PermissionError> {
    report
        .iter()
        .find(|(id, _)| id == permission)
        .map(|(_, status)| *status)
        .ok_or_else(|| PermissionError::MissingStatus(permission.clone()))
}
