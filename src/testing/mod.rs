//! Headless testing framework: in-memory source, headless view, Pilot,
//! outline snapshots.
//!
//! Use the [`Pilot`] to drive a [`TreeGrid`](crate::grid::TreeGrid) by data id
//! without a real row widget. Use [`outline`] to capture visible rows as
//! plain text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;
pub mod source;
pub mod view;

pub use pilot::{HeadlessGrid, Pilot};
pub use snapshot::{grid_outline, outline};
pub use source::{Item, MemorySource};
pub use view::HeadlessView;
