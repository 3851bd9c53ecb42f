use crate::Session;
use std::path::PathBuf;

/// Write the list to `<dir>/list_<YYYYMMDD_HHMM>.csv`.
///
/// `dir` defaults to the configured export directory, then the working
/// directory.
pub async fn export_items(session: &mut Session, dir: Option<PathBuf>) -> Result<String, String> {
    let Session { app, state } = session;

    let Some(export) = app.table.export_rows(state).await else {
        return Ok("Nothing to export.".to_string());
    };

    let dir = dir
        .or_else(|| app.table_config.export_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| format!("Cannot create {}: {}", dir.display(), e))?;

    let path = dir.join(&export.file_name);
    tokio::fs::write(&path, export.contents.as_bytes())
        .await
        .map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;

    tracing::info!("Exported {} row(s) to {:?}", export.rows, path);

    let mut message = format!("Exported {} item(s) to {}", export.rows, path.display());
    if let crate::core::RowSource::Fallback(_) = export.source {
        message.push_str(" (offline copy)");
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use crate::core::export::parse_rows;
    use crate::model::{NewRow, UnitType};
    use crate::testing::FlakyStore;
    use crate::AppState;

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FlakyStore::new();
        let mut session =
            AppState::with_store(".".into(), TableConfig::default(), store.clone()).start_session();

        let message = export_items(&mut session, Some(dir.path().into())).await.unwrap();
        assert_eq!(message, "Nothing to export.");

        let Session { app, state } = &mut session;
        let row = NewRow::new("Rice", 2.0, UnitType::Kilogram, 8.5).unwrap();
        app.table.append_row(state, row).await;

        store.set_reachable(false);
        let message = export_items(&mut session, Some(dir.path().into())).await.unwrap();
        assert!(message.ends_with("(offline copy)"));

        let file = std::fs::read_dir(dir.path()).unwrap().next().unwrap().unwrap();
        let name = file.file_name().into_string().unwrap();
        assert!(name.starts_with("list_") && name.ends_with(".csv"));

        let text = std::fs::read_to_string(file.path()).unwrap();
        let rows = parse_rows(&text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item, "Rice");
    }
}
