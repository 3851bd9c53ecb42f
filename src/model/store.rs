use serde::{Deserialize, Serialize};

/// Remote store backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Local,
    S3,
    WebDav,
    Memory,
}

/// Remote store settings (the `store` section of `config.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub typ: StoreType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webdav_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries of a single remote call before it is reported as failed
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_max_retries() -> usize {
    2
}

impl StoreConfig {
    /// A local directory store
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            typ: StoreType::Local,
            path: Some(path.into()),
            ..Self::memory()
        }
    }

    /// A process-local store, gone when the process exits
    pub fn memory() -> Self {
        Self {
            typ: StoreType::Memory,
            path: None,
            bucket: None,
            region: None,
            access_key: None,
            secret_key: None,
            endpoint: None,
            prefix: None,
            webdav_endpoint: None,
            username: None,
            password: None,
            root: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}
