use crate::core::{Reconciled, RowSource, SyncPhase};
use crate::Session;

pub fn get_status(session: &Session) -> String {
    let status = session.app.table.connection_status(&session.state);
    match status.phase() {
        SyncPhase::OnlineSynced => "Online - items synced".to_string(),
        SyncPhase::OnlinePending => format!(
            "Online - {} item(s) waiting to sync (run `sync`)",
            status.pending_rows
        ),
        SyncPhase::OfflinePending => format!(
            "Offline - {} item(s) saved on this device only",
            status.pending_rows
        ),
        SyncPhase::OfflineSynced => "Offline - items are saved on this device".to_string(),
    }
}

/// Probe the store with a read, then replay anything buffered
pub async fn sync_now(session: &mut Session) -> String {
    let Session { app, state } = session;

    if let RowSource::Fallback(reason) = app.table.fetch_rows(state).await.source {
        return format!("Still offline: {}", reason);
    }

    match app.table.reconcile(state).await {
        Ok(Reconciled::Idle) => "Nothing to sync.".to_string(),
        Ok(Reconciled::Replayed(n)) => format!("Synced {} item(s).", n),
        Err(e) => format!("Sync error: {}", e),
    }
}
