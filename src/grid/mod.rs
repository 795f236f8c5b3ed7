//! The tree grid orchestrator and its seams: data source, row view, errors
//! and configuration.

pub mod config;
pub mod error;
pub mod projection;
pub mod source;
pub mod view;

mod drag;
mod interaction;
mod keyboard;
mod paging;
mod tree_grid;

pub use config::TreeGridConfig;
pub use error::{ErrorHandler, ErrorPanel, FetchError, LogErrorHandler, Result, TreeGridError};
pub use paging::PagingPoller;
pub use source::{Page, PageRequest, TreeDataSource};
pub use tree_grid::{GridState, InteractionMode, TreeGrid};
pub use view::{RowItem, RowKind, RowView, Viewport};
