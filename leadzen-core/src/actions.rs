//! Capability-consuming UI actions and their dispatch through the permission gate.

use async_trait::async_trait;
use shared_types::{GateDecision, PermissionId};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ActionError;
use crate::permissions::{catalog, PermissionGate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Call { phone: String },
    Sms { phone: String },
    Email { address: String },
    WhatsApp { phone: String },
    ShowOverlay,
    StartRecording,
}

impl Action {
    pub fn feature_name(&self) -> &'static str {
        match self {
            Action::Call { .. } => "Phone calls",
            Action::Sms { .. } => "Text messages",
            Action::Email { .. } => "Email",
            Action::WhatsApp { .. } => "WhatsApp",
            Action::ShowOverlay => "Caller overlay",
            Action::StartRecording => "Call recording",
        }
    }

    pub fn required_permission(&self) -> Option<PermissionId> {
        let id = match self {
            Action::Call { .. } => catalog::CALL_PHONE,
            Action::ShowOverlay => catalog::SYSTEM_ALERT_WINDOW,
            Action::StartRecording => catalog::RECORD_AUDIO,
            Action::Sms { .. } | Action::Email { .. } | Action::WhatsApp { .. } => return None,
        };
        Some(PermissionId::from(id))
    }

    /// The URI this action opens, or `None` for in-app actions
    pub fn uri(&self) -> Result<Option<String>, ActionError> {
        let uri = match self {
            Action::Call { phone } => format!("tel:{}", dialable(phone)?),
            Action::Sms { phone } => format!("sms:{}", dialable(phone)?),
            Action::WhatsApp { phone } => format!("whatsapp://send?phone={}", dialable(phone)?),
            Action::Email { address } => {
                let address = address.trim();
                if address.is_empty() || !address.contains('@') {
                    return Err(ActionError::InvalidTarget(address.to_string()));
                }
                format!("mailto:{}", address)
            }
            Action::ShowOverlay | Action::StartRecording => return Ok(None),
        };
        Ok(Some(uri))
    }
}

/// Keeps digits and `+`; rejects numbers without any digit
fn dialable(phone: &str) -> Result<String, ActionError> {
    let cleaned: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(ActionError::InvalidTarget(phone.to_string()));
    }
    Ok(cleaned)
}

/// Dialer / messaging collaborator (e.g. the OS "open URL" facility)
#[async_trait]
pub trait UriLauncher: Send + Sync {
    async fn open(&self, uri: &str) -> Result<(), ActionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Launched(String),
    /// Allowed in-app action; the caller performs it
    Performed,
    Gated(GateDecision),
}

pub struct ActionDispatcher {
    gate: Arc<PermissionGate>,
    launcher: Arc<dyn UriLauncher>,
}

impl ActionDispatcher {
    pub fn new(gate: Arc<PermissionGate>, launcher: Arc<dyn UriLauncher>) -> Self {
        Self { gate, launcher }
    }

    pub async fn dispatch(&self, action: &Action) -> Result<DispatchOutcome, ActionError> {
        // Reject bad targets before bothering the user with a permission prompt
        let uri = action.uri()?;

        if let Some(permission) = action.required_permission() {
            let decision = self
                .gate
                .check_and_gate(&permission, action.feature_name())
                .await?;
            if !decision.allowed {
                info!("{} gated on {}", action.feature_name(), permission);
                return Ok(DispatchOutcome::Gated(decision));
            }
        }

        let Some(uri) = uri else {
            return Ok(DispatchOutcome::Performed);
        };

        if let Err(e) = self.launcher.open(&uri).await {
            warn!("Failed to open {}: {}", uri, e);
            return Err(e);
        }
        Ok(DispatchOutcome::Launched(uri))
    }
}
