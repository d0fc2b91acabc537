//! Entity list store: an authoritative collection, a derived filtered view, and
//! the predicate that links them.
//!
//! Loads are ticketed. Each `begin_load` bumps a generation counter and only
//! the newest ticket may replace the collection; older responses are dropped.
//! A failed load keeps the last good collection and raises a notice instead.

use shared_types::{CallLog, CallSummary, Contact};
use std::collections::HashSet;
use std::time::Duration;

use crate::error::StoreError;
use crate::filter::{self, CategorySelector, FilterPredicate, ListEntity};
use crate::source::{EntitySource, Page};

pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListOrder {
    /// Keep whatever order the source returned
    #[default]
    AsLoaded,
    MostRecentFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Applied { loaded: usize, dropped: usize },
    /// A newer load was started after this one; the response was discarded
    Stale { generation: u64, latest: u64 },
    /// The collection was kept as-is and a notice raised
    Failed(StoreError),
}

/// Dismissible banner raised when a load fails
#[derive(Debug, Clone, PartialEq)]
pub struct LoadNotice {
    pub message: String,
    pub generation: u64,
}

pub struct EntityListStore<E: ListEntity> {
    items: Vec<E>,
    view: Vec<E>,
    predicate: FilterPredicate<E::Category>,
    order: ListOrder,
    load_timeout: Duration,
    latest_generation: u64,
    loading: bool,
    notice: Option<LoadNotice>,
}

impl<E: ListEntity> Default for EntityListStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ListEntity> EntityListStore<E> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            view: Vec::new(),
            predicate: FilterPredicate::default(),
            order: ListOrder::AsLoaded,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            latest_generation: 0,
            loading: false,
            notice: None,
        }
    }

    pub fn with_order(mut self, order: ListOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// The filtered view shown to the user
    pub fn view(&self) -> &[E] {
        &self.view
    }

    /// One window of the filtered view; empty past the end
    pub fn view_page(&self, page: Page) -> &[E] {
        let start = page.offset.min(self.view.len());
        let end = start.saturating_add(page.limit).min(self.view.len());
        &self.view[start..end]
    }

    pub fn predicate(&self) -> &FilterPredicate<E::Category> {
        &self.predicate
    }

    pub fn notice(&self) -> Option<&LoadNotice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn get(&self, id: i64) -> Option<&E> {
        self.items.iter().find(|entity| entity.id() == id)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.predicate.search = search.into();
        self.refresh_view();
    }

    pub fn set_selector(&mut self, selector: CategorySelector<E::Category>) {
        self.predicate.selector = selector;
        self.refresh_view();
    }

    pub fn set_predicate(&mut self, predicate: FilterPredicate<E::Category>) {
        self.predicate = predicate;
        self.refresh_view();
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.latest_generation,
        }
    }

    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<E>, StoreError>,
    ) -> LoadOutcome {
        if ticket.generation < self.latest_generation {
            tracing::debug!(
                "Discarding stale {} load (generation {}, latest {})",
                E::KIND.as_str(),
                ticket.generation,
                self.latest_generation
            );
            return LoadOutcome::Stale {
                generation: ticket.generation,
                latest: self.latest_generation,
            };
        }

        self.loading = false;

        match result {
            Ok(entities) => {
                let (items, dropped) = sanitize(entities);
                let loaded = items.len();
                self.items = items;
                self.apply_order();
                self.notice = None;
                self.refresh_view();

                tracing::info!(
                    "Loaded {} {} entities ({} dropped)",
                    loaded,
                    E::KIND.as_str(),
                    dropped
                );
                LoadOutcome::Applied { loaded, dropped }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load {} entities, keeping {} cached: {}",
                    E::KIND.as_str(),
                    self.items.len(),
                    e
                );
                self.notice = Some(LoadNotice {
                    message: e.to_string(),
                    generation: ticket.generation,
                });
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Fetches one page from `source` and applies it.
    pub async fn load<S>(&mut self, source: &S, page: Page) -> LoadOutcome
    where
        S: EntitySource<E> + ?Sized,
    {
        let ticket = self.begin_load();
        let result = fetch(source, page, self.load_timeout).await;
        self.complete_load(ticket, result)
    }

    fn apply_order(&mut self) {
        if self.order == ListOrder::MostRecentFirst {
            self.items
                .sort_by_key(|entity| std::cmp::Reverse(entity.recency()));
        }
    }

    fn refresh_view(&mut self) {
        self.view = filter::filter(&self.items, &self.predicate);
    }
}

impl EntityListStore<Contact> {
    /// Flips the favourite flag and returns the new value.
    pub fn toggle_favorite(&mut self, id: i64) -> Result<bool, StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id));
        }

        let items = std::mem::take(&mut self.items);
        self.items = filter::toggle_favorite(items, id)?;
        self.refresh_view();
        Ok(self.get(id).map(|c| c.is_favorite).unwrap_or(false))
    }
}

impl EntityListStore<CallLog> {
    pub fn summary(&self) -> CallSummary {
        summarize_calls(&self.view)
    }
}

pub fn summarize_calls(calls: &[CallLog]) -> CallSummary {
    let total_calls = calls.len();
    let successful_calls = calls
        .iter()
        .filter(|call| call.outcome.map(|o| o.is_successful()).unwrap_or(false))
        .count();
    let total_duration: i64 = calls.iter().map(|call| call.duration).sum();
    let average_duration = if total_calls > 0 {
        (total_duration as f64 / total_calls as f64).round() as i64
    } else {
        0
    };

    CallSummary {
        total_calls,
        successful_calls,
        total_duration,
        average_duration,
    }
}

/// Runs a source fetch under `timeout`, mapping failures to `StoreError`.
pub async fn fetch<E, S>(source: &S, page: Page, timeout: Duration) -> Result<Vec<E>, StoreError>
where
    E: ListEntity,
    S: EntitySource<E> + ?Sized,
{
    match tokio::time::timeout(timeout, source.get_entities(page)).await {
        Ok(Ok(entities)) => Ok(entities),
        Ok(Err(e)) => Err(StoreError::LoadFailed(e.to_string())),
        Err(_) => Err(StoreError::Timeout(timeout)),
    }
}

/// Drops malformed entities and duplicate ids, and dedupes tags.
fn sanitize<E: ListEntity>(entities: Vec<E>) -> (Vec<E>, usize) {
    let total = entities.len();
    let mut seen = HashSet::with_capacity(total);
    let mut kept = Vec::with_capacity(total);

    for mut entity in entities {
        if let Some(field) = entity.missing_field() {
            tracing::warn!(
                "Skipping malformed {} {}: missing {}",
                E::KIND.as_str(),
                entity.id(),
                field
            );
            continue;
        }
        if !seen.insert(entity.id()) {
            tracing::warn!("Skipping duplicate {} id {}", E::KIND.as_str(), entity.id());
            continue;
        }
        if let Some(tags) = entity.tags_mut() {
            dedupe_tags(tags);
        }
        kept.push(entity);
    }

    let dropped = total - kept.len();
    (kept, dropped)
}

/// Removes repeated tags, keeping the first occurrence of each
pub fn dedupe_tags(tags: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(tags.len());
    tags.retain(|tag| seen.insert(tag.clone()));
}
