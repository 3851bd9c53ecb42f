//! Application configuration (`config.json` in the config directory)
//!
//! Each concern owns one top-level section of the file and is loaded on its
//! own, falling back to defaults when the file or section is missing or
//! unreadable.

use crate::model::StoreConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";

/// Read one section, `None` when absent or invalid
pub(crate) fn load_section<T: DeserializeOwned>(config_dir: &Path, key: &str) -> Option<T> {
    let content = fs::read_to_string(config_dir.join(CONFIG_FILE)).ok()?;
    let config = serde_json::from_str::<serde_json::Value>(&content).ok()?;
    let section = config.get(key)?;
    match serde_json::from_value::<T>(section.clone()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring invalid `{}` config: {}", key, e);
            None
        }
    }
}

/// Write one section, keeping the others untouched
pub(crate) fn save_section<T: Serialize>(config_dir: &Path, key: &str, value: &T) -> io::Result<()> {
    let config_file = config_dir.join(CONFIG_FILE);

    let mut config: serde_json::Value = if config_file.exists() {
        let content = fs::read_to_string(&config_file)?;
        serde_json::from_str(&content).unwrap_or_else(|_| serde_json::json!({}))
    } else {
        serde_json::json!({})
    };
    if !config.is_object() {
        config = serde_json::json!({});
    }

    config[key] = serde_json::to_value(value).map_err(io::Error::other)?;

    let content = serde_json::to_string_pretty(&config).map_err(io::Error::other)?;
    fs::create_dir_all(config_dir)?;
    fs::write(&config_file, content)
}

/// Table settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    /// Name of the remote table
    #[serde(default = "default_table_name")]
    pub name: String,
    /// Offset of local time used for row timestamps and export names
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Where `export` writes files (defaults to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
}

fn default_table_name() -> String {
    "items".to_string()
}

fn default_utc_offset_hours() -> i32 {
    -3 // GMT-3
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: default_table_name(),
            utc_offset_hours: default_utc_offset_hours(),
            export_dir: None,
        }
    }
}

impl TableConfig {
    pub fn load(config_dir: &Path) -> Self {
        load_section(config_dir, "table").unwrap_or_default()
    }

    pub fn save(&self, config_dir: &Path) -> io::Result<()> {
        save_section(config_dir, "table", self)
    }
}

/// Store settings; a local directory store under `<config dir>/tables` by default
pub fn load_store_config(config_dir: &Path) -> StoreConfig {
    load_section(config_dir, "store").unwrap_or_else(|| {
        StoreConfig::local(config_dir.join("tables").to_string_lossy().into_owned())
    })
}

pub fn save_store_config(config_dir: &Path, config: &StoreConfig) -> io::Result<()> {
    save_section(config_dir, "store", config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StoreType;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(TableConfig::load(dir.path()), TableConfig::default());

        let store = load_store_config(dir.path());
        assert_eq!(store.typ, StoreType::Local);
        assert!(store.path.unwrap().ends_with("tables"));
    }

    #[test]
    fn test_sections_are_merged() {
        let dir = tempfile::tempdir().unwrap();

        let table = TableConfig {
            name: "feira".into(),
            utc_offset_hours: -4,
            export_dir: Some("/tmp/exports".into()),
        };
        table.save(dir.path()).unwrap();
        save_store_config(dir.path(), &StoreConfig::memory()).unwrap();

        assert_eq!(TableConfig::load(dir.path()), table);
        assert_eq!(load_store_config(dir.path()).typ, StoreType::Memory);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap())
                .unwrap();
        assert_eq!(raw["table"]["utcOffsetHours"], -4);
        assert_eq!(raw["store"]["type"], "memory");
    }

    #[test]
    fn test_partial_and_invalid_sections() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "table": { "name": "weekly" }, "store": { "type": "ftp" } }"#,
        )
        .unwrap();

        let table = TableConfig::load(dir.path());
        assert_eq!(table.name, "weekly");
        assert_eq!(table.utc_offset_hours, -3);

        // Unknown store type falls back to the default local store
        assert_eq!(load_store_config(dir.path()).typ, StoreType::Local);
    }
}
