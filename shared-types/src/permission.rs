use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Platform-defined permission identifier, e.g. `android.permission.CALL_PHONE`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct PermissionId(String);

impl PermissionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PermissionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Status reported by the platform for a single permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Denied permanently; only system settings can change it
    Blocked,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// What the UI should offer when a prompt is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PromptRemedy {
    Request,
    OpenSettings,
}

impl From<PermissionStatus> for PromptRemedy {
    fn from(status: PermissionStatus) -> Self {
        match status {
            PermissionStatus::Blocked => PromptRemedy::OpenSettings,
            _ => PromptRemedy::Request,
        }
    }
}

/// The single prompt the gate allows to be visible at a time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PermissionPrompt {
    pub permission: PermissionId,
    pub feature_name: String,
    pub remedy: PromptRemedy,
}

/// Result of consulting the gate before a capability-consuming action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GateDecision {
    pub allowed: bool,
    pub needs_prompt: bool,
    pub status: PermissionStatus,
}

/// Batch request result partitioned by outcome, in platform response order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchOutcome {
    pub granted: Vec<PermissionId>,
    pub denied: Vec<PermissionId>,
    pub blocked: Vec<PermissionId>,
}

impl BatchOutcome {
    pub fn from_statuses<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = &'a (PermissionId, PermissionStatus)>,
    {
        let mut outcome = BatchOutcome::default();
        for (permission, status) in statuses {
            match status {
                PermissionStatus::Granted => outcome.granted.push(permission.clone()),
                PermissionStatus::Denied => outcome.denied.push(permission.clone()),
                PermissionStatus::Blocked => outcome.blocked.push(permission.clone()),
            }
        }
        outcome
    }

    pub fn all_granted(&self) -> bool {
        self.denied.is_empty() && self.blocked.is_empty()
    }
}
