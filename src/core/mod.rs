pub mod clock;
pub mod csv;
pub mod export;
pub mod state;
pub mod table;
pub mod totals;

pub use clock::{Clock, FixedClock, OffsetClock};
pub use export::CsvExport;
pub use state::{ConnectionStatus, SyncPhase, TableState};
pub use table::{
    AppendOutcome, ClearOutcome, FetchedRows, Reconciled, RemoteClear, RowSource, SyncedTable,
};
pub use totals::{compute_totals, Totals};
