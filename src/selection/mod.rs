//! Selection primitives: id tracker, range arithmetic, change debouncing.

pub mod debounce;
pub mod range;
pub mod tracker;

pub use debounce::SelectionDebouncer;
pub use range::{extend_range, walk_range, Direction};
pub use tracker::SelectionTracker;
