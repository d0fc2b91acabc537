pub mod call_logs;
pub mod contacts;
pub mod leads;
pub mod notes;
pub mod settings;

use actix_web::error::{ErrorGatewayTimeout, ErrorInternalServerError, ErrorNotFound};
use leadzen_core::source::{EntitySource, Page};
use leadzen_core::store::{EntityListStore, LoadOutcome};
use leadzen_core::{ListEntity, StoreError};

use crate::config::StoreConfig;

/// Maps a list-store failure to the matching HTTP error
pub(crate) fn store_error(e: StoreError) -> actix_web::Error {
    match e {
        StoreError::NotFound(_) => ErrorNotFound(e.to_string()),
        StoreError::Timeout(_) => ErrorGatewayTimeout(e.to_string()),
        StoreError::LoadFailed(_) => ErrorInternalServerError(e.to_string()),
    }
}

pub(crate) fn page(store: &StoreConfig, limit: Option<usize>, offset: Option<usize>) -> Page {
    Page::new(limit.unwrap_or(store.page_size), offset.unwrap_or(0))
}

/// Loads up to `scan_limit` rows into `store`. Filtering and paging happen on
/// the loaded view so totals count every match, not just one page.
pub(crate) async fn load_store<E, S>(
    store: &mut EntityListStore<E>,
    source: &S,
    config: &StoreConfig,
) -> actix_web::Result<()>
where
    E: ListEntity,
    S: EntitySource<E> + ?Sized,
{
    match store.load(source, Page::new(config.scan_limit, 0)).await {
        LoadOutcome::Failed(e) => Err(store_error(e)),
        _ => Ok(()),
    }
}
