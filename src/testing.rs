//! Test doubles

use crate::error::StoreError;
use crate::storage::{ObjectTableStore, TableStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory store that can be switched offline or made to fail mid-sync
pub struct FlakyStore {
    inner: ObjectTableStore,
    reachable: AtomicBool,
    /// Appends still allowed before they start failing (`None` = unlimited)
    appends_left: Mutex<Option<usize>>,
    calls: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: ObjectTableStore::memory().unwrap(),
            reachable: AtomicBool::new(true),
            appends_left: Mutex::new(None),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn fail_appends_after(&self, n: usize) {
        *self.appends_left.lock().unwrap() = Some(n);
    }

    /// Number of remote calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Table contents, bypassing the reachability switch
    pub async fn records(&self, table: &str) -> Vec<Vec<String>> {
        self.inner.read(table).await.unwrap()
    }

    /// Raw table text, bypassing the reachability switch
    pub async fn records_text(&self, table: &str) -> String {
        self.inner.read_text(table).await.unwrap().unwrap_or_default()
    }

    /// Seed a table directly, header included
    pub async fn seed(&self, table: &str, records: &[Vec<&str>]) {
        for record in records {
            let record = record.iter().map(|s| s.to_string()).collect();
            self.inner.append(table, record).await.unwrap();
        }
    }

    /// Overwrite a table with raw text, bypassing the codec
    pub async fn seed_text(&self, table: &str, text: &str) {
        self.inner.write_text(table, text.to_string()).await.unwrap();
    }

    fn check(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unreachable("flaky://", "connection refused"))
        }
    }
}

#[async_trait]
impl TableStore for FlakyStore {
    async fn read(&self, table: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.check()?;
        self.inner.read(table).await
    }

    async fn append(&self, table: &str, record: Vec<String>) -> Result<(), StoreError> {
        self.check()?;
        {
            let mut left = self.appends_left.lock().unwrap();
            match left.as_mut() {
                Some(0) => return Err(StoreError::unreachable("flaky://", "quota exceeded")),
                Some(n) => *n -= 1,
                None => {}
            }
        }
        self.inner.append(table, record).await
    }

    async fn reset(&self, table: &str, header: &[&str]) -> Result<(), StoreError> {
        self.check()?;
        self.inner.reset(table, header).await
    }

    async fn create_if_missing(&self, table: &str, header: &[&str]) -> Result<(), StoreError> {
        self.check()?;
        self.inner.create_if_missing(table, header).await
    }

    fn name(&self) -> &str {
        "flaky://"
    }
}
