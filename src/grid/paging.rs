//! Lazy child paging driven by the viewport.

use std::time::Duration;

use log::{debug, trace};
use tokio::sync::{watch, Mutex};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::error::{Result, TreeGridError};
use super::source::{PageRequest, TreeDataSource};
use super::tree_grid::TreeGrid;
use super::view::{RowKind, RowView};
use crate::tree::{ChildrenState, NodeKey};

impl<S: TreeDataSource, V: RowView> TreeGrid<S, V> {
    /// Fetch the next page for the first load-more row within the viewport
    /// plus the load buffer.
    ///
    /// Returns `Ok(false)` when hidden, already loading, or nothing is
    /// pending on screen. At most one page is fetched per call.
    pub async fn post_load(&mut self) -> Result<bool> {
        if !self.is_visible() || self.is_loading() {
            return Ok(false);
        }
        let Some(parent) = self.pending_page_in_view() else {
            return Ok(false);
        };
        self.set_active(false);
        let result = self.load_next_page(parent).await;
        self.set_active(true);
        result.map_err(|err| self.report(err))
    }

    /// One poller tick: emit a settled selection change, then page in the
    /// load-more row on screen, if any. Returns whether anything happened.
    pub async fn poll_tick(&mut self, now: Instant) -> bool {
        let flushed = self.flush_selection_changed(now);
        let paged = match self.post_load().await {
            Ok(paged) => paged,
            Err(err) => {
                trace!("paging tick failed: {err}");
                false
            }
        };
        flushed || paged
    }

    fn pending_page_in_view(&self) -> Option<NodeKey> {
        let last = self.rows.len().checked_sub(1)?;
        let viewport = self.view.viewport();
        let bottom = viewport
            .bottom
            .saturating_add(self.config.load_buffer_size)
            .min(last);
        if viewport.top > bottom {
            return None;
        }
        self.rows[viewport.top..=bottom]
            .iter()
            .find_map(|row| match row.kind {
                RowKind::LoadMore { parent } => Some(parent),
                RowKind::Node { .. } => None,
            })
    }

    async fn load_next_page(&mut self, parent: NodeKey) -> Result<bool> {
        let root = self.tree().root();
        let Some(node) = self.tree().get(parent) else {
            return Err(TreeGridError::StaleKey);
        };
        let ChildrenState::Partial { next_offset } = node.children_state else {
            return Ok(false);
        };
        let known_total = node.max_children;
        let data = node.data.clone();
        let request = PageRequest::new(next_offset, self.config.page_size);
        trace!("fetching page at {next_offset} for {}", node.data_id);

        self.set_loading(true);
        let fetched = if parent == root {
            self.source.fetch_root(request).await
        } else if let Some(data) = data {
            self.source.fetch_children(&data, request).await
        } else {
            self.set_loading(false);
            return Ok(false);
        };
        self.set_loading(false);
        let page = fetched?;

        let received = page.items.len();
        let total = page.total.or(known_total);
        let nodes = self.to_nodes(page.items);
        let tree = self.root.current_mut();
        let keys = tree.append_children(parent, nodes);
        if let Some(node) = tree.get_mut(parent) {
            node.children_state = if received == 0 {
                ChildrenState::Loaded
            } else {
                ChildrenState::after_page(next_offset + received, total)
            };
            node.max_children = total;
        }
        debug!("appended {received} items at offset {next_offset}");
        self.after_structure_change();
        self.restore_expansion(keys).await;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// PagingPoller
// ---------------------------------------------------------------------------

/// Periodic driver for a grid's background work: each tick flushes a
/// settled selection change and runs [`TreeGrid::post_load`].
///
/// Missed ticks are skipped rather than bursted, so a slow fetch never
/// queues up a backlog of polls.
///
/// [`run`](Self::run) locks the shared grid only while a tick is handled,
/// so the host can keep feeding input through the same mutex. Hosts with
/// their own event loop can instead put [`tick`](Self::tick) in a
/// `select!` next to their input and call [`TreeGrid::poll_tick`].
#[derive(Debug)]
pub struct PagingPoller {
    interval: Interval,
}

impl PagingPoller {
    /// Create a poller ticking every `period`. Must be called inside a
    /// Tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    /// Create a poller using the grid's configured interval.
    pub fn for_grid<S: TreeDataSource, V: RowView>(grid: &TreeGrid<S, V>) -> Self {
        Self::new(grid.config().poll_interval)
    }

    /// Wait for the next tick. Cancel-safe.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }

    /// Wait for the next tick, then handle it on `grid`.
    pub async fn run_once<S: TreeDataSource, V: RowView>(
        &mut self,
        grid: &mut TreeGrid<S, V>,
    ) -> bool {
        self.tick().await;
        grid.poll_tick(Instant::now()).await
    }

    /// Poll until `mounted` turns `false` or its sender is dropped.
    ///
    /// Failures have already been reported by the grid and do not stop
    /// the loop.
    pub async fn run<S: TreeDataSource, V: RowView>(
        &mut self,
        grid: &Mutex<TreeGrid<S, V>>,
        mut mounted: watch::Receiver<bool>,
    ) {
        loop {
            if !*mounted.borrow_and_update() {
                break;
            }
            tokio::select! {
                biased;
                changed = mounted.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = self.interval.tick() => {
                    grid.lock().await.poll_tick(Instant::now()).await;
                }
            }
        }
        debug!("paging poller stopped");
    }
}
