//! In-memory data source with fetch logging and failure injection.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::grid::{FetchError, Page, PageRequest, TreeDataSource};
use crate::tree::DataId;

/// Key of the top-level list.
const ROOT: &str = "";

/// A test item: an id and a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub label: String,
}

impl Item {
    /// An item whose label is its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
        }
    }
}

/// A [`TreeDataSource`] over hand-built child lists.
///
/// Every fetch is logged (`root@0`, `children:B@2`, `item:B`) so tests can
/// assert what was fetched. Lists, failures and the filter sit behind
/// `RefCell`s so tests can change them through the grid's shared reference.
#[derive(Debug, Default)]
pub struct MemorySource {
    lists: RefCell<HashMap<String, Vec<Item>>>,
    fetches: RefCell<Vec<String>>,
    failing: RefCell<HashSet<String>>,
    filter: RefCell<Option<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the top-level items (builder).
    pub fn with_root(self, ids: &[&str]) -> Self {
        self.set_children(ROOT, ids);
        self
    }

    /// Set the children of `parent` (builder).
    pub fn with_children(self, parent: &str, ids: &[&str]) -> Self {
        self.set_children(parent, ids);
        self
    }

    /// Replace the children of `parent`; `""` is the top level.
    pub fn set_children(&self, parent: &str, ids: &[&str]) {
        let items = ids.iter().map(|id| Item::new(*id)).collect();
        self.lists.borrow_mut().insert(parent.to_owned(), items);
    }

    /// While set, top-level fetches return every item (at any depth) whose
    /// id contains `query`, as a flat list.
    pub fn set_filter(&self, query: Option<&str>) {
        *self.filter.borrow_mut() = query.map(str::to_owned);
    }

    /// Make fetches of `parent`'s children fail; `""` fails top-level fetches.
    pub fn fail_children_of(&self, parent: &str) {
        self.failing.borrow_mut().insert(parent.to_owned());
    }

    pub fn recover(&self, parent: &str) {
        self.failing.borrow_mut().remove(parent);
    }

    /// Every fetch so far, in order.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }

    /// How many logged fetches start with `prefix`.
    pub fn fetch_count(&self, prefix: &str) -> usize {
        self.fetches
            .borrow()
            .iter()
            .filter(|f| f.starts_with(prefix))
            .count()
    }

    fn page_of(&self, parent: &str, request: PageRequest) -> Result<Page<Item>, FetchError> {
        if self.failing.borrow().contains(parent) {
            return Err(FetchError::new(format!("fetch of `{parent}` refused")));
        }
        let lists = self.lists.borrow();
        let all = lists.get(parent).map(Vec::as_slice).unwrap_or_default();
        let start = request.offset.min(all.len());
        let end = request.offset.saturating_add(request.limit).min(all.len());
        Ok(Page::partial(all[start..end].to_vec(), all.len()))
    }

    fn filtered(&self, query: &str) -> Vec<Item> {
        let lists = self.lists.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<&Item> = lists
            .get(ROOT)
            .map(|items| items.iter().rev().collect())
            .unwrap_or_default();
        while let Some(item) = stack.pop() {
            if item.id.contains(query) {
                out.push(item.clone());
            }
            if let Some(children) = lists.get(&item.id) {
                stack.extend(children.iter().rev());
            }
        }
        out
    }
}

#[async_trait(?Send)]
impl TreeDataSource for MemorySource {
    type Item = Item;

    fn data_id(&self, item: &Item) -> DataId {
        DataId::new(item.id.clone())
    }

    fn has_children(&self, item: &Item) -> bool {
        self.lists
            .borrow()
            .get(&item.id)
            .is_some_and(|children| !children.is_empty())
    }

    async fn fetch_root(&self, page: PageRequest) -> Result<Page<Item>, FetchError> {
        self.fetches.borrow_mut().push(format!("root@{}", page.offset));
        let query = self.filter.borrow().clone();
        match query {
            Some(query) if !self.failing.borrow().contains(ROOT) => {
                Ok(Page::complete(self.filtered(&query)))
            }
            _ => self.page_of(ROOT, page),
        }
    }

    async fn fetch_children(
        &self,
        parent: &Item,
        page: PageRequest,
    ) -> Result<Page<Item>, FetchError> {
        self.fetches
            .borrow_mut()
            .push(format!("children:{}@{}", parent.id, page.offset));
        self.page_of(&parent.id, page)
    }

    async fn fetch(&self, data_id: &DataId) -> Result<Item, FetchError> {
        self.fetches.borrow_mut().push(format!("item:{data_id}"));
        self.lists
            .borrow()
            .values()
            .flatten()
            .find(|item| item.id == data_id.as_str())
            .cloned()
            .ok_or_else(|| FetchError::new(format!("no item `{data_id}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_root(&["a", "b"])
            .with_children("b", &["b1", "b2", "b3"])
    }

    #[test]
    fn pages_slice_the_list() {
        let src = source();
        let b = Item::new("b");
        let page = tokio_test::block_on(src.fetch_children(&b, PageRequest::new(1, 1))).unwrap();
        assert_eq!(page.items, vec![Item::new("b2")]);
        assert_eq!(page.total, Some(3));
        assert_eq!(src.fetches(), vec!["children:b@1"]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let src = source();
        let page = tokio_test::block_on(src.fetch_root(PageRequest::new(5, 10))).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn failure_injection() {
        let src = source();
        src.fail_children_of("b");
        let b = Item::new("b");
        assert!(tokio_test::block_on(src.fetch_children(&b, PageRequest::first(10))).is_err());
        src.recover("b");
        assert!(tokio_test::block_on(src.fetch_children(&b, PageRequest::first(10))).is_ok());
        assert_eq!(src.fetch_count("children:b"), 2);
    }

    #[test]
    fn has_children_and_fetch_by_id() {
        let src = source();
        assert!(src.has_children(&Item::new("b")));
        assert!(!src.has_children(&Item::new("a")));
        let item = tokio_test::block_on(src.fetch(&DataId::from("b2"))).unwrap();
        assert_eq!(item.id, "b2");
        assert!(tokio_test::block_on(src.fetch(&DataId::from("zz"))).is_err());
    }

    #[test]
    fn filter_flattens_matches() {
        let src = source();
        src.set_filter(Some("b"));
        let page = tokio_test::block_on(src.fetch_root(PageRequest::first(10))).unwrap();
        let ids: Vec<&str> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "b1", "b2", "b3"]);
        assert_eq!(page.total, None);
    }
}
