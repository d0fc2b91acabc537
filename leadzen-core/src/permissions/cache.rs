use chrono::{DateTime, Utc};
use shared_types::{PermissionId, PermissionStatus};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;

pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5);

/// What the cache knows about one permission right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Never queried this session
    Unknown,
    Fresh(PermissionStatus),
    /// Last known status, no longer trusted
    Stale(PermissionStatus),
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    status: PermissionStatus,
    last_checked_at: DateTime<Utc>,
}

/// In-memory permission statuses with a freshness window. Never persisted.
pub struct PermissionCache {
    entries: HashMap<PermissionId, CacheEntry>,
    freshness: Duration,
    clock: Arc<dyn Clock>,
}

impl PermissionCache {
    pub fn new(clock: Arc<dyn Clock>, freshness: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            freshness,
            clock,
        }
    }

    pub fn state(&self, permission: &PermissionId) -> CacheState {
        let Some(entry) = self.entries.get(permission) else {
            return CacheState::Unknown;
        };

        // A clock that went backwards counts as "just checked"
        let fresh = (self.clock.now() - entry.last_checked_at)
            .to_std()
            .map(|age| age < self.freshness)
            .unwrap_or(true);

        if fresh {
            CacheState::Fresh(entry.status)
        } else {
            CacheState::Stale(entry.status)
        }
    }

    pub fn record(&mut self, permission: &PermissionId, status: PermissionStatus) {
        self.entries.insert(
            permission.clone(),
            CacheEntry {
                status,
                last_checked_at: self.clock.now(),
            },
        );
    }

    pub fn record_all<'a, I>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = &'a (PermissionId, PermissionStatus)>,
    {
        for (permission, status) in statuses {
            self.record(permission, *status);
        }
    }

    /// Forgets every entry that is not granted, forcing a re-query
    pub fn invalidate_ungranted(&mut self) {
        self.entries.retain(|_, entry| entry.status.is_granted());
    }
}
