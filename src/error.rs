//! Error types shared by the store backends and the sync core

use thiserror::Error;

/// Failure reported by a remote table store.
///
/// Every variant means "the remote copy could not be used right now"; the
/// sync core degrades to its local cache on any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{store} unreachable: {message}")]
    Unreachable { store: String, message: String },

    #[error("table `{table}` is malformed: {message}")]
    Malformed { table: String, message: String },
}

impl StoreError {
    pub fn unreachable(store: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Unreachable {
            store: store.to_string(),
            message: err.to_string(),
        }
    }

    pub fn malformed(table: &str, err: impl std::fmt::Display) -> Self {
        StoreError::Malformed {
            table: table.to_string(),
            message: err.to_string(),
        }
    }
}

/// Failure while replaying buffered rows to the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("sync stopped after {replayed} row(s), {remaining} still pending: {source}")]
    PartialSync {
        replayed: usize,
        remaining: usize,
        #[source]
        source: StoreError,
    },
}

/// Input rejected before it reaches the table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("item name is required")]
    EmptyItem,

    #[error("quantity must be greater than zero (got {0})")]
    NonPositiveQuantity(f64),

    #[error("price must be greater than zero (got {0})")]
    NonPositivePrice(f64),
}
