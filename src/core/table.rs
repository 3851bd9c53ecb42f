//! The synced table: one remote table mirrored into a session-local cache

use crate::core::clock::Clock;
use crate::core::export::{self, CsvExport};
use crate::core::state::{ConnectionStatus, TableState};
use crate::error::{StoreError, SyncError};
use crate::model::{NewRow, Row, HEADER};
use crate::storage::TableStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where the rows returned by `fetch_rows` came from
#[derive(Debug, Clone, PartialEq)]
pub enum RowSource {
    /// Fresh remote read
    Remote,
    /// Remote was reachable but empty; the local cache was served instead
    Cache,
    /// Remote failed; the local cache was served instead
    Fallback(StoreError),
}

#[derive(Debug, Clone)]
pub struct FetchedRows {
    pub rows: Vec<Row>,
    pub source: RowSource,
}

impl FetchedRows {
    /// Served from the local cache because the remote read failed
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, RowSource::Fallback(_))
    }
}

/// Result of a reconcile pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Nothing pending, or offline: no remote call made
    Idle,
    /// Number of buffered rows written to the remote store
    Replayed(usize),
}

/// Result of `append_row`. The row is kept either way; `Buffered` only
/// defers its remote write.
#[derive(Debug)]
pub enum AppendOutcome {
    /// Written to the remote store; `reconcile` reports the flush of older
    /// buffered rows that followed
    Stored {
        row: Row,
        reconcile: Result<Reconciled, SyncError>,
    },
    /// Remote write failed; the row is buffered locally until the next sync
    Buffered { row: Row, reason: StoreError },
}

impl AppendOutcome {
    pub fn is_local_only(&self) -> bool {
        matches!(self, AppendOutcome::Buffered { .. })
    }

    pub fn row(&self) -> &Row {
        match self {
            AppendOutcome::Stored { row, .. } | AppendOutcome::Buffered { row, .. } => row,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteClear {
    Cleared,
    /// Known offline; only the local cache was cleared
    Skipped,
    Failed(StoreError),
}

/// Result of `clear_table`. The local cache is always cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearOutcome {
    pub remote: RemoteClear,
}

impl ClearOutcome {
    /// False only when the remote clear was attempted and failed
    pub fn succeeded(&self) -> bool {
        !matches!(self.remote, RemoteClear::Failed(_))
    }
}

/// One table mirrored between a remote store and a session's local cache.
///
/// `SyncedTable` itself is stateless and can be shared; everything that
/// changes lives in the `TableState` handed to each call. Remote failures
/// never escape an operation: they flip the session offline and the
/// operation answers from the local cache instead.
pub struct SyncedTable {
    store: Arc<dyn TableStore>,
    table: String,
    clock: Arc<dyn Clock>,
}

impl SyncedTable {
    pub fn new(store: Arc<dyn TableStore>, table: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            table: table.into(),
            clock,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Read all rows.
    ///
    /// A non-empty remote read replaces the confirmed part of the cache. An
    /// empty remote read is not trusted: the cache is served instead, which
    /// can hide a table that really was emptied elsewhere.
    #[instrument(skip_all, fields(session = %state.session_id(), table = %self.table))]
    pub async fn fetch_rows(&self, state: &mut TableState) -> FetchedRows {
        match self.read_remote().await {
            Ok(rows) => {
                state.set_online(true);
                if rows.is_empty() {
                    debug!("Remote table is empty, serving {} cached row(s)", state.len());
                    return FetchedRows {
                        rows: state.local_rows(),
                        source: RowSource::Cache,
                    };
                }
                debug!("Read {} row(s) from {}", rows.len(), self.store.name());
                state.replace_confirmed(rows.clone());
                FetchedRows {
                    rows,
                    source: RowSource::Remote,
                }
            }
            Err(e) => {
                warn!("Reading {} failed, serving local rows: {}", self.store.name(), e);
                state.set_online(false);
                FetchedRows {
                    rows: state.local_rows(),
                    source: RowSource::Fallback(e),
                }
            }
        }
    }

    /// Stamp and append a row.
    ///
    /// On success older buffered rows are flushed right after. On failure the
    /// row is buffered locally and the session goes offline.
    #[instrument(skip_all, fields(session = %state.session_id(), table = %self.table, item = %new_row.item()))]
    pub async fn append_row(&self, state: &mut TableState, new_row: NewRow) -> AppendOutcome {
        let row = new_row.stamp(self.clock.timestamp());

        match self.append_remote(&row).await {
            Ok(()) => {
                state.set_online(true);
                state.cache(row.clone());
                let reconcile = self.reconcile(state).await;
                AppendOutcome::Stored { row, reconcile }
            }
            Err(reason) => {
                warn!("Saving to {} failed, keeping row locally: {}", self.store.name(), reason);
                state.set_online(false);
                state.buffer(row.clone());
                AppendOutcome::Buffered { row, reason }
            }
        }
    }

    /// Replay buffered rows to the remote store, oldest first.
    ///
    /// Does nothing unless the session is online with rows pending. Each row
    /// is marked confirmed as soon as its append succeeds, so after a partial
    /// failure the next pass resumes at the first unconfirmed row.
    #[instrument(skip_all, fields(session = %state.session_id(), table = %self.table))]
    pub async fn reconcile(&self, state: &mut TableState) -> Result<Reconciled, SyncError> {
        if !(state.pending_sync() && state.is_online()) {
            return Ok(Reconciled::Idle);
        }

        let pending = state.pending_rows();
        let total = pending.len();
        debug!("Replaying {} buffered row(s)", total);

        if let Err(source) = self.prepare().await {
            warn!("Sync aborted before the first row: {}", source);
            state.set_online(false);
            return Err(SyncError::PartialSync {
                replayed: 0,
                remaining: total,
                source,
            });
        }

        for (replayed, (index, row)) in pending.into_iter().enumerate() {
            if let Err(source) = self.store.append(&self.table, row.to_record()).await {
                warn!("Sync stopped after {}/{} row(s): {}", replayed, total, source);
                state.set_online(false);
                return Err(SyncError::PartialSync {
                    replayed,
                    remaining: total - replayed,
                    source,
                });
            }
            state.confirm(index);
        }

        info!("Synced {} buffered row(s) to {}", total, self.store.name());
        Ok(Reconciled::Replayed(total))
    }

    /// Empty the table.
    ///
    /// The remote table is reset to its header when the session is online;
    /// the local cache is cleared either way.
    #[instrument(skip_all, fields(session = %state.session_id(), table = %self.table))]
    pub async fn clear_table(&self, state: &mut TableState) -> ClearOutcome {
        let remote = if state.is_online() {
            match self.clear_remote().await {
                Ok(()) => {
                    state.set_online(true);
                    RemoteClear::Cleared
                }
                Err(e) => {
                    warn!("Clearing {} failed: {}", self.store.name(), e);
                    state.set_online(false);
                    RemoteClear::Failed(e)
                }
            }
        } else {
            debug!("Offline, clearing local rows only");
            RemoteClear::Skipped
        };

        let dropped = state.pending_count();
        if dropped > 0 {
            info!("Discarding {} unsynced row(s)", dropped);
        }
        state.clear();

        ClearOutcome { remote }
    }

    /// Export the current rows, or `None` when there are none
    #[instrument(skip_all, fields(session = %state.session_id(), table = %self.table))]
    pub async fn export_rows(&self, state: &mut TableState) -> Option<CsvExport> {
        let fetched = self.fetch_rows(state).await;
        if fetched.rows.is_empty() {
            return None;
        }

        Some(CsvExport {
            file_name: export::file_name(&self.clock.now()),
            contents: export::serialize_rows(&fetched.rows),
            rows: fetched.rows.len(),
            source: fetched.source,
        })
    }

    pub fn connection_status(&self, state: &TableState) -> ConnectionStatus {
        state.status()
    }

    /// Make sure the remote table exists with its header
    async fn prepare(&self) -> Result<(), StoreError> {
        self.store.create_if_missing(&self.table, &HEADER).await
    }

    async fn read_remote(&self) -> Result<Vec<Row>, StoreError> {
        self.prepare().await?;
        let records = self.store.read(&self.table).await?;
        let skip = usize::from(records.first().is_some_and(|r| is_header(r)));
        if skip == 0 && !records.is_empty() {
            warn!("Table `{}` has no header row", self.table);
        }
        Ok(records
            .iter()
            .skip(skip)
            .filter_map(|record| Row::from_record(record))
            .collect())
    }

    async fn append_remote(&self, row: &Row) -> Result<(), StoreError> {
        self.prepare().await?;
        self.store.append(&self.table, row.to_record()).await
    }

    async fn clear_remote(&self) -> Result<(), StoreError> {
        self.store.reset(&self.table, &HEADER).await
    }
}

/// A first record whose leading cell is the `Timestamp` column name
fn is_header(record: &[String]) -> bool {
    record
        .first()
        .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(HEADER[0]))
}
