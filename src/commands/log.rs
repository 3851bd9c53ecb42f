//! Logging settings

use crate::logging::LogConfig;
use std::path::Path;

pub fn get_log_config(config_dir: &Path) -> LogConfig {
    LogConfig::load(config_dir)
}

/// Update the given fields and save. Takes effect on the next start.
pub fn set_log_config(
    config_dir: &Path,
    enabled: Option<bool>,
    max_size_mb: Option<u32>,
    level: Option<String>,
) -> Result<LogConfig, String> {
    let mut config = LogConfig::load(config_dir);

    if let Some(e) = enabled {
        config.enabled = e;
    }
    if let Some(size) = max_size_mb {
        config.set_max_size_mb(size);
    }
    if let Some(l) = level {
        config.set_level(&l)?;
    }

    config.save(config_dir).map_err(|e| e.to_string())?;

    Ok(config)
}

pub fn render(config: &LogConfig) -> String {
    format!(
        "logging: {}, level: {}, max size: {} MB",
        if config.enabled { "on" } else { "off" },
        config.level,
        config.max_size_mb
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_log_config() {
        let dir = tempfile::tempdir().unwrap();

        let config = set_log_config(dir.path(), Some(false), Some(1000), Some("Warn".into())).unwrap();
        assert_eq!(render(&config), "logging: off, level: warn, max size: 100 MB");
        assert_eq!(get_log_config(dir.path()), config);

        assert!(set_log_config(dir.path(), None, None, Some("loud".into())).is_err());
        assert_eq!(get_log_config(dir.path()).level, "warn");
    }
}
