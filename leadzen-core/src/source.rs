use anyhow::Result;
use async_trait::async_trait;

use crate::filter::ListEntity;

pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }
}

/// Persistence collaborator a list store loads from (local database or remote API).
///
/// No ordering guarantee is made; stores that need an order sort explicitly.
#[async_trait]
pub trait EntitySource<E: ListEntity>: Send + Sync {
    async fn get_entities(&self, page: Page) -> Result<Vec<E>>;
}
