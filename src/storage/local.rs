use super::ObjectTableStore;
use crate::model::StoreConfig;
use anyhow::Result;
use opendal::Operator;
use std::path::PathBuf;

impl ObjectTableStore {
    /// Tables kept as files in a directory (for example a synced network folder)
    pub fn local(path: &str, config: &StoreConfig) -> Result<Self> {
        use opendal::services::Fs;

        let base_path = PathBuf::from(path);
        if !base_path.exists() {
            std::fs::create_dir_all(&base_path)?;
        }

        let builder = Fs::default().root(path);
        let operator = Self::layered(Operator::new(builder)?.finish(), config);

        Ok(Self::new(operator, format!("local:{}", path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TableStore;

    #[tokio::test]
    async fn test_local_tables_are_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tables");
        let store = ObjectTableStore::local(root.to_str().unwrap(), &StoreConfig::memory()).unwrap();

        store.create_if_missing("items", &["Item", "Price"]).await.unwrap();
        store
            .append("items", vec!["Rice".into(), "8.50".into()])
            .await
            .unwrap();

        let text = std::fs::read_to_string(root.join("items.csv")).unwrap();
        assert_eq!(text, "Item,Price\nRice,8.50\n");
        assert_eq!(store.name(), format!("local:{}", root.display()));
    }
}
