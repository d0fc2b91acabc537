pub mod cache;
pub mod catalog;
pub mod gate;
pub mod platform;

pub use cache::{CacheState, PermissionCache, DEFAULT_FRESHNESS};
pub use gate::{PermissionGate, DEFAULT_CHECK_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
pub use platform::{PermissionPlatform, StatusReport};
