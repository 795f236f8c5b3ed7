//! # treegrid
//!
//! A hierarchical, lazily-loaded, selectable tree-grid engine for virtualized
//! row widgets.
//!
//! A [`TreeGrid`](grid::TreeGrid) pulls items from a
//! [`TreeDataSource`](grid::TreeDataSource) page by page, keeps them in a
//! slotmap-backed tree, projects the visible part into flat rows, and pushes
//! those rows into a [`RowView`](grid::RowView). Clicks and key presses coming
//! back from the view are turned into tree mutations and selection or
//! highlight changes. Selection is keyed on data ids, so it survives reloads
//! and switching between the default and filtered trees.
//!
//! ## Core Systems
//!
//! - **[`tree`]**: Slotmap-backed node arena, tree operations, default/filtered root pair
//! - **[`selection`]**: Selection tracker, range-selection arithmetic, debouncer
//! - **[`event`]**: Input events, key bindings, grid events and their queue
//! - **[`grid`]**: The orchestrator: loading, paging, expand/collapse, gestures, keyboard, drag
//! - **[`testing`]**: In-memory source, headless view, Pilot, outline snapshots

// Data model
pub mod tree;

// Selection primitives
pub mod selection;

// Input and notifications
pub mod event;

// Orchestration
pub mod grid;

// Headless harness
pub mod testing;

pub use grid::{TreeDataSource, TreeGrid, TreeGridConfig, TreeGridError};
pub use tree::{DataId, NodeKey, TreeNode, TreeRoot};
