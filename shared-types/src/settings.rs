use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::PermissionId;

/// Permission sets and gate timings the mobile client should use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PermissionPolicy {
    pub required: Vec<PermissionId>,
    pub optional: Vec<PermissionId>,
    /// Granted from a system settings screen, not a dialog
    pub special: Vec<PermissionId>,
    pub freshness_window_secs: u64,
    pub check_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

/// Response for settings endpoint
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SettingsResponse {
    pub config_file_path: String,
    pub page_size: usize,
    pub load_timeout_secs: u64,
    pub permissions: PermissionPolicy,
}
