//! Tree grid configuration.

use std::time::Duration;

use crate::tree::DataId;

// ---------------------------------------------------------------------------
// TreeGridConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`TreeGrid`](super::TreeGrid).
#[derive(Debug, Clone)]
pub struct TreeGridConfig {
    /// Name of the row property the row view indexes rows by.
    pub id_property_name: String,
    /// Rows past the bottom of the viewport scanned for pending pages.
    pub load_buffer_size: usize,
    /// Children requested per fetch.
    pub page_size: usize,
    /// How often the paging poll runs while the grid is visible.
    pub poll_interval: Duration,
    /// Data ids expanded before the last reload; restored as they load.
    pub expanded_data_ids: Vec<DataId>,
    /// Show failures in an inline panel instead of the error handler.
    pub quiet_errors: bool,
    /// Allow more than one selected row.
    pub multi_select: bool,
    /// Quiet period before a selection change is announced.
    pub selection_debounce: Duration,
}

impl Default for TreeGridConfig {
    fn default() -> Self {
        Self {
            id_property_name: "id".to_owned(),
            load_buffer_size: 10,
            page_size: 100,
            poll_interval: Duration::from_millis(200),
            expanded_data_ids: Vec::new(),
            quiet_errors: false,
            multi_select: true,
            selection_debounce: Duration::from_millis(50),
        }
    }
}

impl TreeGridConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row id property name (builder).
    pub fn with_id_property(mut self, name: impl Into<String>) -> Self {
        self.id_property_name = name.into();
        self
    }

    /// Set the paging scan buffer (builder).
    pub fn with_load_buffer_size(mut self, rows: usize) -> Self {
        self.load_buffer_size = rows;
        self
    }

    /// Set the page size (builder). Zero is raised to one.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Set the paging poll interval (builder).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the persisted expanded ids (builder).
    pub fn with_expanded(mut self, ids: impl IntoIterator<Item = impl Into<DataId>>) -> Self {
        self.expanded_data_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable quiet error handling (builder).
    pub fn with_quiet_errors(mut self, quiet: bool) -> Self {
        self.quiet_errors = quiet;
        self
    }

    /// Enable or disable multi-select (builder).
    pub fn with_multi_select(mut self, multi: bool) -> Self {
        self.multi_select = multi;
        self
    }

    /// Set the selection debounce period (builder).
    pub fn with_selection_debounce(mut self, delay: Duration) -> Self {
        self.selection_debounce = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TreeGridConfig::new();
        assert_eq!(config.id_property_name, "id");
        assert_eq!(config.load_buffer_size, 10);
        assert_eq!(config.page_size, 100);
        assert!(config.multi_select);
        assert!(!config.quiet_errors);
        assert!(config.expanded_data_ids.is_empty());
    }

    #[test]
    fn builders() {
        let config = TreeGridConfig::new()
            .with_id_property("path")
            .with_load_buffer_size(3)
            .with_page_size(0)
            .with_expanded(["a", "b"])
            .with_quiet_errors(true)
            .with_multi_select(false)
            .with_selection_debounce(Duration::ZERO);
        assert_eq!(config.id_property_name, "path");
        assert_eq!(config.load_buffer_size, 3);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.expanded_data_ids, vec![DataId::from("a"), DataId::from("b")]);
        assert!(config.quiet_errors);
        assert!(!config.multi_select);
        assert_eq!(config.selection_debounce, Duration::ZERO);
    }
}
