//! Store connectivity check

use crate::config::load_store_config;
use crate::storage::create_store;
use crate::Session;

#[derive(Debug)]
pub struct TestConnectionResult {
    pub success: bool,
    pub message: String,
    pub details: Option<String>,
}

impl TestConnectionResult {
    pub fn render(&self) -> String {
        match &self.details {
            Some(details) => format!("{}\n  {}", self.message, details),
            None => self.message.clone(),
        }
    }
}

/// Open the configured store from scratch and read the table once.
///
/// Uses its own store instance, so the session's online flag is left alone.
pub async fn test_connection(session: &Session) -> TestConnectionResult {
    let config = load_store_config(&session.app.config_dir);
    let table = session.app.table.table();

    let store = match create_store(&config).await {
        Ok(s) => s,
        Err(e) => {
            return TestConnectionResult {
                success: false,
                message: "Store configuration error".to_string(),
                details: Some(e.to_string()),
            }
        }
    };

    match store.read(table).await {
        Ok(records) => TestConnectionResult {
            success: true,
            message: format!("Connected to {}", store.name()),
            details: Some(format!(
                "table `{}`: {} item(s)",
                table,
                records.len().saturating_sub(1)
            )),
        },
        Err(e) => TestConnectionResult {
            success: false,
            message: format!("Cannot reach {}", store.name()),
            details: Some(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{save_store_config, TableConfig};
    use crate::model::StoreConfig;
    use crate::AppState;

    #[tokio::test]
    async fn test_connection_to_local_store() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        save_store_config(dir.path(), &StoreConfig::local(tables.to_string_lossy())).unwrap();

        let app = AppState::new(Some(dir.path().to_path_buf())).await.unwrap();
        let session = app.start_session();

        let result = test_connection(&session).await;
        assert!(result.success);
        assert_eq!(result.details.as_deref(), Some("table `items`: 0 item(s)"));
        assert!(result.render().starts_with("Connected to local:"));
    }

    #[tokio::test]
    async fn test_connection_reports_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = StoreConfig::memory();
        config.typ = crate::model::StoreType::WebDav;
        save_store_config(dir.path(), &config).unwrap();

        let app = AppState::with_store(
            dir.path().to_path_buf(),
            TableConfig::default(),
            crate::storage::create_store(&StoreConfig::memory()).await.unwrap(),
        );
        let result = test_connection(&app.start_session()).await;
        assert!(!result.success);
        assert_eq!(result.message, "Store configuration error");
    }
}
