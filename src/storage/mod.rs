pub mod local;
pub mod memory;
pub mod object;
pub mod s3;
pub mod webdav;

use crate::error::StoreError;
use crate::model::{StoreConfig, StoreType};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub use object::ObjectTableStore;

/// IO timeout multiplier over the per-call timeout (reads/writes move whole tables)
pub const IO_TIMEOUT_FACTOR: u64 = 4;

/// Remote tabular store.
///
/// A table is an ordered list of records; the first record is the header.
/// Every method reports failure as a `StoreError` value so callers can fall
/// back instead of aborting.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// All records of the table, header included. A missing table reads as empty.
    async fn read(&self, table: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Add one record at the end of the table
    async fn append(&self, table: &str, record: Vec<String>) -> Result<(), StoreError>;

    /// Replace every record with `header` in a single write
    async fn reset(&self, table: &str, header: &[&str]) -> Result<(), StoreError>;

    /// Create the table with `header` as its only record unless it already
    /// exists. An existing but empty table gets its header back.
    async fn create_if_missing(&self, table: &str, header: &[&str]) -> Result<(), StoreError>;

    /// Store name (for logs)
    fn name(&self) -> &str;
}

/// Build the store described by `config`
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn TableStore>> {
    let store = match config.typ {
        StoreType::Local => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("Local store requires path"))?;
            tracing::info!("Opening local store: {}", path);
            ObjectTableStore::local(path, config)?
        }
        StoreType::S3 => {
            let bucket = config
                .bucket
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("S3 store requires bucket"))?;
            let region = config
                .region
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("S3 store requires region"))?;
            let access_key = config
                .access_key
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("S3 store requires accessKey"))?;
            let secret_key = config
                .secret_key
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("S3 store requires secretKey"))?;
            tracing::info!("Opening S3 store: bucket={}, region={}", bucket, region);
            ObjectTableStore::s3(bucket, region, access_key, secret_key, config)?
        }
        StoreType::WebDav => {
            let endpoint = config
                .webdav_endpoint
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("WebDAV store requires webdavEndpoint"))?;
            let username = config
                .username
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("WebDAV store requires username"))?;
            let password = config
                .password
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("WebDAV store requires password"))?;
            tracing::info!("Opening WebDAV store: endpoint={}, root={:?}", endpoint, config.root);
            ObjectTableStore::webdav(endpoint, username, password, config).await?
        }
        StoreType::Memory => {
            tracing::info!("Opening in-memory store");
            ObjectTableStore::memory()?
        }
    };

    Ok(Arc::new(store) as Arc<dyn TableStore>)
}
