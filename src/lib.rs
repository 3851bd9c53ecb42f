use std::path::PathBuf;
use std::sync::Arc;

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::core::{SyncedTable, TableState};
pub use error::{StoreError, SyncError, ValidationError};
pub use model::{NewRow, Row, StoreConfig, StoreType, UnitType};

use crate::config::TableConfig;
use crate::core::OffsetClock;

/// Application state shared by every session
#[derive(Clone)]
pub struct AppState {
    pub config_dir: PathBuf,
    pub table_config: TableConfig,
    pub table: Arc<SyncedTable>,
}

impl AppState {
    /// Load configuration from `config_dir` (or the default directory) and
    /// open the configured store
    pub async fn new(config_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let config_dir = config_dir.unwrap_or_else(default_config_dir);
        std::fs::create_dir_all(&config_dir)?;

        let store_config = config::load_store_config(&config_dir);
        let table_config = TableConfig::load(&config_dir);
        tracing::debug!("Using config directory {:?}", config_dir);

        let store = storage::create_store(&store_config).await?;
        Ok(Self::with_store(config_dir, table_config, store))
    }

    pub fn with_store(
        config_dir: PathBuf,
        table_config: TableConfig,
        store: Arc<dyn storage::TableStore>,
    ) -> Self {
        let clock = Arc::new(OffsetClock::from_hours(table_config.utc_offset_hours));
        let table = Arc::new(SyncedTable::new(store, table_config.name.clone(), clock));
        Self {
            config_dir,
            table_config,
            table,
        }
    }

    /// Start a session with an empty local cache
    pub fn start_session(&self) -> Session {
        Session {
            app: self.clone(),
            state: TableState::new(),
        }
    }
}

/// One user session: the shared table plus this session's cache and flags
pub struct Session {
    pub app: AppState,
    pub state: TableState,
}

impl Session {
    pub fn table(&self) -> &SyncedTable {
        &self.app.table
    }

    pub fn end(self) {
        self.state.end();
    }
}

/// `<platform config dir>/shoplist`, or `.shoplist` when no home is known
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("shoplist"))
        .unwrap_or_else(|| PathBuf::from(".shoplist"))
}

pub mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        if cfg!(target_os = "windows") {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        } else if cfg!(target_os = "macos") {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library").join("Application Support"))
        } else {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".config"))
                })
        }
    }
}
