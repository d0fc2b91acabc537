use shared_types::{
    BatchOutcome, GateDecision, PermissionId, PermissionPrompt, PermissionStatus, PromptRemedy,
};
use std::collections::HashMap;
use std::future::Future;
use std::slice;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::cache::{CacheState, PermissionCache, DEFAULT_FRESHNESS};
use super::catalog;
use super::platform::{status_for, PermissionPlatform, StatusReport};
use crate::clock::{Clock, SystemClock};
use crate::error::PermissionError;

pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Decides whether a capability-consuming action may proceed.
///
/// Owns the permission cache and the single pending prompt. Neither lock is
/// held while the platform is being queried. Concurrent checks of the same
/// permission share one platform query.
pub struct PermissionGate {
    platform: Arc<dyn PermissionPlatform>,
    cache: Mutex<PermissionCache>,
    prompt: Mutex<Option<PermissionPrompt>>,
    in_flight: Mutex<HashMap<PermissionId, Arc<Mutex<()>>>>,
    check_timeout: Duration,
    request_timeout: Duration,
}

impl PermissionGate {
    pub fn new(platform: Arc<dyn PermissionPlatform>) -> Self {
        Self::with_clock(platform, Arc::new(SystemClock), DEFAULT_FRESHNESS)
    }

    pub fn with_clock(
        platform: Arc<dyn PermissionPlatform>,
        clock: Arc<dyn Clock>,
        freshness: Duration,
    ) -> Self {
        Self {
            platform,
            cache: Mutex::new(PermissionCache::new(clock, freshness)),
            prompt: Mutex::new(None),
            in_flight: Mutex::new(HashMap::new()),
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, check: Duration, request: Duration) -> Self {
        self.check_timeout = check;
        self.request_timeout = request;
        self
    }

    pub async fn check_and_gate(
        &self,
        permission: &PermissionId,
        feature_name: &str,
    ) -> Result<GateDecision, PermissionError> {
        let cached = self.cache.lock().await.state(permission);

        let status = match cached {
            CacheState::Fresh(status) => status,
            CacheState::Stale(_) | CacheState::Unknown => {
                if let Some(pending) = self.prompt.lock().await.as_ref() {
                    debug!(
                        "Prompt for {} pending; not re-checking {}",
                        pending.permission, permission
                    );
                    return Ok(GateDecision {
                        allowed: false,
                        needs_prompt: false,
                        status: unverified_status(cached),
                    });
                }
                self.refresh(permission).await?
            }
        };

        if status.is_granted() {
            return Ok(GateDecision {
                allowed: true,
                needs_prompt: false,
                status,
            });
        }

        let needs_prompt = self.raise_prompt(permission, feature_name, status).await;
        Ok(GateDecision {
            allowed: false,
            needs_prompt,
            status,
        })
    }

    /// Shows the system dialog for one permission. Not retried on denial.
    pub async fn request_permission(
        &self,
        permission: &PermissionId,
    ) -> Result<bool, PermissionError> {
        let report = self.request(slice::from_ref(permission)).await?;
        let status = status_for(&report, permission)?;

        match status {
            PermissionStatus::Granted => info!("Permission {} granted", permission),
            PermissionStatus::Denied => info!("Permission {} denied", permission),
            PermissionStatus::Blocked => warn!("Permission {} blocked", permission),
        }

        Ok(status.is_granted())
    }

    pub async fn request_batch(
        &self,
        permissions: &[PermissionId],
    ) -> Result<BatchOutcome, PermissionError> {
        if permissions.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let report = self.request(permissions).await?;
        let outcome = BatchOutcome::from_statuses(&report);
        info!(
            "Batch request: {} granted, {} denied, {} blocked",
            outcome.granted.len(),
            outcome.denied.len(),
            outcome.blocked.len()
        );
        Ok(outcome)
    }

    /// Queries every permission in one platform call and caches the answers
    pub async fn check_all(
        &self,
        permissions: &[PermissionId],
    ) -> Result<BatchOutcome, PermissionError> {
        if permissions.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let report = self.query(permissions).await?;
        Ok(BatchOutcome::from_statuses(&report))
    }

    /// Requests whichever required permissions are not yet granted.
    ///
    /// Blocked permissions are not requested again; the returned outcome still
    /// lists them so the caller can point at settings.
    pub async fn ensure_required(&self) -> Result<BatchOutcome, PermissionError> {
        let required = catalog::required_permissions();
        let current = self.check_all(&required).await?;
        if current.all_granted() {
            return Ok(current);
        }

        let requested = self.request_batch(&current.denied).await?;
        Ok(BatchOutcome {
            granted: current
                .granted
                .into_iter()
                .chain(requested.granted)
                .collect(),
            denied: requested.denied,
            blocked: current
                .blocked
                .into_iter()
                .chain(requested.blocked)
                .collect(),
        })
    }

    pub async fn open_settings(&self) -> Result<(), PermissionError> {
        self.bounded(self.check_timeout, self.platform.open_settings())
            .await?;

        // Anything may have changed while the user was in settings
        self.cache.lock().await.invalidate_ungranted();
        self.prompt.lock().await.take();
        Ok(())
    }

    pub async fn pending_prompt(&self) -> Option<PermissionPrompt> {
        self.prompt.lock().await.clone()
    }

    pub async fn dismiss_prompt(&self) {
        self.prompt.lock().await.take();
    }

    pub async fn cached_state(&self, permission: &PermissionId) -> CacheState {
        self.cache.lock().await.state(permission)
    }

    /// Check-and-set of the pending prompt. Returns false when coalesced.
    async fn raise_prompt(
        &self,
        permission: &PermissionId,
        feature_name: &str,
        status: PermissionStatus,
    ) -> bool {
        let mut pending = self.prompt.lock().await;
        if let Some(existing) = pending.as_ref() {
            debug!(
                "Prompt for {} already pending; coalescing {}",
                existing.permission, permission
            );
            return false;
        }

        *pending = Some(PermissionPrompt {
            permission: permission.clone(),
            feature_name: feature_name.to_string(),
            remedy: PromptRemedy::from(status),
        });
        true
    }

    /// Single-flight re-query of one permission
    async fn refresh(&self, permission: &PermissionId) -> Result<PermissionStatus, PermissionError> {
        let flight = self
            .in_flight
            .lock()
            .await
            .entry(permission.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = flight.lock().await;

        // Answered by whoever held the flight before us
        if let CacheState::Fresh(status) = self.cache.lock().await.state(permission) {
            return Ok(status);
        }

        let report = self.query(slice::from_ref(permission)).await?;
        status_for(&report, permission)
    }

    async fn query(&self, permissions: &[PermissionId]) -> Result<StatusReport, PermissionError> {
        debug!("Checking {} permission(s) with platform", permissions.len());
        let report = self
            .bounded(self.check_timeout, self.platform.check(permissions))
            .await?;
        self.cache.lock().await.record_all(&report);
        Ok(report)
    }

    async fn request(
        &self,
        permissions: &[PermissionId],
    ) -> Result<StatusReport, PermissionError> {
        let report = self
            .bounded(self.request_timeout, self.platform.request(permissions))
            .await?;
        self.cache.lock().await.record_all(&report);

        let mut pending = self.prompt.lock().await;
        let resolved = pending.as_ref().is_some_and(|prompt| {
            report
                .iter()
                .any(|(id, status)| *id == prompt.permission && status.is_granted())
        });
        if resolved {
            pending.take();
        }

        Ok(report)
    }

    async fn bounded<T, F>(&self, limit: Duration, call: F) -> Result<T, PermissionError>
    where
        F: Future<Output = Result<T, PermissionError>>,
    {
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Permission platform timed out after {:?}", limit);
                Err(PermissionError::Timeout(limit))
            }
        }
    }
}

/// What to report for a permission that could not be re-checked. Never granted.
fn unverified_status(cached: CacheState) -> PermissionStatus {
    match cached {
        CacheState::Stale(PermissionStatus::Blocked) => PermissionStatus::Blocked,
        _ => PermissionStatus::Denied,
    }
}
