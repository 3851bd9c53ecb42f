//! Per-session table state: the local row cache and the connection flags

use crate::model::Row;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where a session stands with respect to the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    OnlineSynced,
    /// Reachable again, buffered rows not replayed yet
    OnlinePending,
    OfflinePending,
    /// Offline before anything was written
    OfflineSynced,
}

/// Snapshot of the connection flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub online: bool,
    pub pending_sync: bool,
    pub pending_rows: usize,
}

impl ConnectionStatus {
    pub fn phase(&self) -> SyncPhase {
        match (self.online, self.pending_sync) {
            (true, false) => SyncPhase::OnlineSynced,
            (true, true) => SyncPhase::OnlinePending,
            (false, true) => SyncPhase::OfflinePending,
            (false, false) => SyncPhase::OfflineSynced,
        }
    }
}

#[derive(Debug, Clone)]
struct CachedRow {
    row: Row,
    /// Known to be present in the remote store
    confirmed: bool,
}

/// Local cache and write buffer of one session.
///
/// Created when a session starts and dropped (or `end`ed) when it finishes.
/// It is not durable: rows still pending when the session ends are lost.
#[derive(Debug)]
pub struct TableState {
    session_id: Uuid,
    rows: Vec<CachedRow>,
    online: bool,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new()
    }
}

impl TableState {
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        debug!("Session {} started", session_id);
        Self {
            session_id,
            rows: Vec::new(),
            online: true,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Last-known reachability of the remote store
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// True iff some cached row is not yet confirmed in the remote store
    pub fn pending_sync(&self) -> bool {
        self.rows.iter().any(|r| !r.confirmed)
    }

    pub fn pending_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.confirmed).count()
    }

    /// Cached rows in insertion order
    pub fn local_rows(&self) -> Vec<Row> {
        self.rows.iter().map(|r| r.row.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            online: self.online,
            pending_sync: self.pending_sync(),
            pending_rows: self.pending_count(),
        }
    }

    /// Finish the session
    pub fn end(self) {
        let pending = self.pending_count();
        if pending > 0 {
            warn!(
                "Session {} ended with {} unsynced row(s); they are discarded",
                self.session_id, pending
            );
        } else {
            debug!("Session {} ended", self.session_id);
        }
    }

    pub(crate) fn set_online(&mut self, online: bool) {
        if self.online != online {
            if online {
                info!("Remote store reachable again");
            } else {
                debug!("Switching to offline mode");
            }
        }
        self.online = online;
    }

    /// Keep a row that only exists locally
    pub(crate) fn buffer(&mut self, row: Row) {
        self.rows.push(CachedRow {
            row,
            confirmed: false,
        });
    }

    /// Keep a row already written to the remote store
    pub(crate) fn cache(&mut self, row: Row) {
        self.rows.push(CachedRow {
            row,
            confirmed: true,
        });
    }

    /// Replace the confirmed rows with a fresh remote read.
    ///
    /// Unconfirmed rows are not in that read, so they stay buffered after it.
    pub(crate) fn replace_confirmed(&mut self, remote: Vec<Row>) {
        let pending: Vec<CachedRow> = self.rows.drain(..).filter(|r| !r.confirmed).collect();
        self.rows = remote
            .into_iter()
            .map(|row| CachedRow {
                row,
                confirmed: true,
            })
            .chain(pending)
            .collect();
    }

    /// Unconfirmed rows with their cache positions, oldest first
    pub(crate) fn pending_rows(&self) -> Vec<(usize, Row)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.confirmed)
            .map(|(i, r)| (i, r.row.clone()))
            .collect()
    }

    pub(crate) fn confirm(&mut self, index: usize) {
        if let Some(cached) = self.rows.get_mut(index) {
            cached.confirmed = true;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }
}
