//! Error types.

use thiserror::Error;

use crate::ids::ItemId;

/// Errors surfaced by the tree environment.
///
/// Almost everything the environment does is a silent no-op on bad input
/// (unknown trees, unmounted elements, missing children). The only failures
/// that travel back to the caller come from the host's item source or from a
/// recompute driver that died.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GroveError {
    /// The host item source failed while reading an item.
    #[error("item source failed while reading `{item}`: {message}")]
    Source {
        /// The item being read.
        item: ItemId,
        /// Description of the failure.
        message: String,
    },

    /// The recompute driver task ended abnormally.
    #[error("recompute driver stopped: {0}")]
    DriverStopped(String),
}

impl GroveError {
    /// Creates a new item source error.
    pub fn item_source(item: impl Into<ItemId>, message: impl Into<String>) -> Self {
        Self::Source {
            item: item.into(),
            message: message.into(),
        }
    }
}
