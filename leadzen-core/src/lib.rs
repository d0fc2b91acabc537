pub mod actions;
pub mod clock;
pub mod error;
pub mod filter;
pub mod permissions;
pub mod phone;
pub mod source;
pub mod store;
pub mod t9;
pub mod validation;

pub use actions::{Action, ActionDispatcher, DispatchOutcome, UriLauncher};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ActionError, PermissionError, StoreError};
pub use filter::{filter, toggle_favorite, CategorySelector, EntityKind, FilterPredicate, ListEntity};
pub use permissions::{CacheState, PermissionCache, PermissionGate, PermissionPlatform};
pub use source::{EntitySource, Page};
pub use store::{
    dedupe_tags, fetch, summarize_calls, EntityListStore, ListOrder, LoadNotice, LoadOutcome,
    LoadTicket,
};
