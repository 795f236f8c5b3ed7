//! Tree grid errors and the channels they are reported through.

use std::error::Error as StdError;

use log::error;

use crate::tree::DataId;

/// A data-source fetch failed.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl FetchError {
    /// A failure described by a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A failure caused by another error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors from tree grid operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeGridError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("no node with data id `{0}`")]
    NodeNotFound(DataId),

    #[error("node key is not part of the current tree")]
    StaleKey,

    #[error("row {row} is out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("cannot move row {from} to row {to}: {reason}")]
    InvalidMove {
        from: usize,
        to: usize,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, TreeGridError>;

/// Receives failures when quiet error handling is off.
pub trait ErrorHandler {
    fn handle(&self, error: &TreeGridError);
}

/// Default handler: logs the failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorHandler;

impl ErrorHandler for LogErrorHandler {
    fn handle(&self, err: &TreeGridError) {
        error!("tree grid operation failed: {err}");
    }
}

/// Inline error shown in place of the grid body in quiet mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    pub message: String,
}
