//! Tables stored as comma-separated objects behind an opendal operator

use super::{TableStore, IO_TIMEOUT_FACTOR};
use crate::core::csv;
use crate::error::StoreError;
use crate::model::StoreConfig;
use async_trait::async_trait;
use opendal::layers::{RetryLayer, TimeoutLayer};
use opendal::{ErrorKind, Operator};
use std::time::Duration;

/// One object per table (`<table>.csv`), header on the first line.
///
/// Appends are read-modify-write of the whole object; concurrent writers of
/// the same table are not coordinated.
pub struct ObjectTableStore {
    operator: Operator,
    name: String,
}

impl ObjectTableStore {
    pub(crate) fn new(operator: Operator, name: String) -> Self {
        Self { operator, name }
    }

    /// Attach the timeout and retry layers configured for remote backends
    pub(crate) fn layered(operator: Operator, config: &StoreConfig) -> Operator {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        operator
            .layer(
                TimeoutLayer::default()
                    .with_timeout(timeout)
                    .with_io_timeout(timeout * IO_TIMEOUT_FACTOR as u32),
            )
            .layer(RetryLayer::new().with_max_times(config.max_retries))
    }

    fn object_path(table: &str) -> String {
        format!("{}.csv", urlencoding::encode(table))
    }

    fn header_text(header: &[&str]) -> String {
        let mut text = csv::encode_record(header);
        text.push('\n');
        text
    }

    fn unreachable(&self, err: opendal::Error) -> StoreError {
        StoreError::unreachable(&self.name, err)
    }

    /// Raw object text, `None` when the table does not exist
    pub(crate) async fn read_text(&self, table: &str) -> Result<Option<String>, StoreError> {
        let data = match self.operator.read(&Self::object_path(table)).await {
            Ok(buffer) => buffer.to_vec(),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.unreachable(e)),
        };

        String::from_utf8(data)
            .map(Some)
            .map_err(|e| StoreError::malformed(table, e))
    }

    pub(crate) async fn write_text(&self, table: &str, text: String) -> Result<(), StoreError> {
        self.operator
            .write(&Self::object_path(table), text.into_bytes())
            .await
            .map_err(|e| self.unreachable(e))?;
        Ok(())
    }
}

#[async_trait]
impl TableStore for ObjectTableStore {
    async fn read(&self, table: &str) -> Result<Vec<Vec<String>>, StoreError> {
        match self.read_text(table).await? {
            Some(text) => csv::decode(&text).map_err(|e| StoreError::malformed(table, e)),
            None => Ok(Vec::new()),
        }
    }

    async fn append(&self, table: &str, record: Vec<String>) -> Result<(), StoreError> {
        let mut text = self.read_text(table).await?.unwrap_or_default();
        // Appending after a broken quote would bury the record in it
        csv::decode(&text).map_err(|e| StoreError::malformed(table, e))?;
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&csv::encode_record(record.as_slice()));
        text.push('\n');
        self.write_text(table, text).await
    }

    async fn reset(&self, table: &str, header: &[&str]) -> Result<(), StoreError> {
        self.write_text(table, Self::header_text(header)).await
    }

    async fn create_if_missing(&self, table: &str, header: &[&str]) -> Result<(), StoreError> {
        match self.operator.stat(&Self::object_path(table)).await {
            Ok(meta) if meta.content_length() > 0 => Ok(()),
            Ok(_) => {
                tracing::warn!("Table `{}` in {} is empty, restoring its header", table, self.name);
                self.write_text(table, Self::header_text(header)).await
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("Creating table `{}` in {}", table, self.name);
                self.write_text(table, Self::header_text(header)).await
            }
            Err(e) => Err(self.unreachable(e)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_object_path_is_encoded() {
        assert_eq!(ObjectTableStore::object_path("items"), "items.csv");
        assert_eq!(ObjectTableStore::object_path("my list"), "my%20list.csv");
    }

    #[tokio::test]
    async fn test_table_lifecycle() {
        let store = ObjectTableStore::memory().unwrap();

        store.create_if_missing("items", &["A", "B"]).await.unwrap();
        store.append("items", record(&["1", "x, y"])).await.unwrap();
        // Existing tables are left alone
        store.create_if_missing("items", &["Other"]).await.unwrap();

        assert_eq!(
            store.read("items").await.unwrap(),
            vec![record(&["A", "B"]), record(&["1", "x, y"])]
        );

        store.reset("items", &["A", "B"]).await.unwrap();
        assert_eq!(store.read("items").await.unwrap(), vec![record(&["A", "B"])]);
    }

    #[tokio::test]
    async fn test_empty_object_gets_header_back() {
        let store = ObjectTableStore::memory().unwrap();
        store.write_text("items", String::new()).await.unwrap();

        store.create_if_missing("items", &["A", "B"]).await.unwrap();
        assert_eq!(store.read("items").await.unwrap(), vec![record(&["A", "B"])]);
    }

    #[tokio::test]
    async fn test_append_refuses_malformed_table() {
        let store = ObjectTableStore::memory().unwrap();
        store
            .write_text("items", "A,B\n\"broken,x\n".to_string())
            .await
            .unwrap();

        let err = store.append("items", record(&["1", "2"])).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert!(matches!(
            store.read("items").await.unwrap_err(),
            StoreError::Malformed { .. }
        ));
        // Left untouched
        let text = store.read_text("items").await.unwrap().unwrap();
        assert_eq!(text, "A,B\n\"broken,x\n");
    }

    #[tokio::test]
    async fn test_append_creates_missing_object() {
        let store = ObjectTableStore::memory().unwrap();
        store.append("log", record(&["a"])).await.unwrap();
        assert_eq!(store.read("log").await.unwrap(), vec![record(&["a"])]);
    }
}
