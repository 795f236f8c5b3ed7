//! The data source a tree grid pulls its items from.

use async_trait::async_trait;

use super::error::FetchError;
use crate::tree::DataId;

/// A window into a child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    /// The first page of `limit` items.
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

/// One fetched page of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<D> {
    pub items: Vec<D>,
    /// Total size of the whole list, when the source knows it. `None` means
    /// the list ends with this page.
    pub total: Option<usize>,
}

impl<D> Page<D> {
    /// A page that ends the list.
    pub fn complete(items: Vec<D>) -> Self {
        Self { items, total: None }
    }

    /// A page out of a list of `total` items.
    pub fn partial(items: Vec<D>, total: usize) -> Self {
        Self {
            items,
            total: Some(total),
        }
    }
}

/// Supplies the items of a tree grid.
///
/// All fetches are asynchronous and run on the caller's task, so futures
/// need not be `Send`.
#[async_trait(?Send)]
pub trait TreeDataSource {
    type Item: Clone;

    /// Stable identity of an item.
    fn data_id(&self, item: &Self::Item) -> DataId;

    /// Whether the item can have children (drives the expander).
    fn has_children(&self, item: &Self::Item) -> bool;

    /// Fetch a page of top-level items.
    async fn fetch_root(&self, page: PageRequest) -> Result<Page<Self::Item>, FetchError>;

    /// Fetch a page of the children of `parent`.
    async fn fetch_children(
        &self,
        parent: &Self::Item,
        page: PageRequest,
    ) -> Result<Page<Self::Item>, FetchError>;

    /// Fetch a single item by id.
    async fn fetch(&self, data_id: &DataId) -> Result<Self::Item, FetchError>;
}
