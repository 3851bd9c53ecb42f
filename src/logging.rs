//! Logging: file output with a size cap, console output in debug builds

use crate::config::{load_section, save_section};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "shoplist.log";

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// The `log` section of `config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Size at which the log file is rotated (MB)
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u32,
    /// "error", "warn", "info", "debug" or "trace"
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_enabled() -> bool {
    true
}

fn default_max_size_mb() -> u32 {
    5
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_size_mb: default_max_size_mb(),
            level: default_level(),
        }
    }
}

impl LogConfig {
    pub fn load(config_dir: &Path) -> Self {
        load_section(config_dir, "log").unwrap_or_default()
    }

    pub fn save(&self, config_dir: &Path) -> io::Result<()> {
        save_section(config_dir, "log", self)
    }

    /// Clamped to 1..=100 MB
    pub fn set_max_size_mb(&mut self, size: u32) {
        self.max_size_mb = size.clamp(1, 100);
    }

    pub fn set_level(&mut self, level: &str) -> Result<(), String> {
        let level = level.to_lowercase();
        if !LEVELS.contains(&level.as_str()) {
            return Err(format!("Invalid log level: {}", level));
        }
        self.level = level;
        Ok(())
    }

    pub fn tracing_level(&self) -> tracing::Level {
        match self.level.to_lowercase().as_str() {
            "error" => tracing::Level::ERROR,
            "warn" => tracing::Level::WARN,
            "debug" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            _ => tracing::Level::INFO,
        }
    }
}

/// Log file writer that moves the file to `<name>.old` once it passes `max_size`
#[derive(Clone)]
pub struct SizeRotatingWriter {
    file_path: PathBuf,
    max_size: u64,
    writer: Arc<Mutex<Option<BufWriter<File>>>>,
}

impl SizeRotatingWriter {
    pub fn new(log_dir: &Path, max_size_mb: u32) -> io::Result<Self> {
        Self::with_limit(log_dir, u64::from(max_size_mb) * 1024 * 1024)
    }

    fn with_limit(log_dir: &Path, max_size: u64) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;

        let file_path = log_dir.join(LOG_FILE);
        let writer = Self::open_file(&file_path, max_size)?;

        Ok(Self {
            file_path,
            max_size,
            writer: Arc::new(Mutex::new(Some(writer))),
        })
    }

    fn open_file(file_path: &Path, max_size: u64) -> io::Result<BufWriter<File>> {
        if Self::oversized(file_path, max_size) {
            Self::rotate_log(file_path)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;

        Ok(BufWriter::new(file))
    }

    fn oversized(file_path: &Path, max_size: u64) -> bool {
        fs::metadata(file_path)
            .map(|m| m.len() > max_size)
            .unwrap_or(false)
    }

    fn rotate_log(file_path: &Path) -> io::Result<()> {
        let backup_path = backup_path(file_path);
        if backup_path.exists() {
            fs::remove_file(&backup_path)?;
        }
        fs::rename(file_path, &backup_path)
    }
}

fn backup_path(file_path: &Path) -> PathBuf {
    file_path.with_extension("log.old")
}

impl Write for SizeRotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("log writer poisoned"))?;

        let writer = guard
            .as_mut()
            .ok_or_else(|| io::Error::other("log writer not available"))?;
        let written = writer.write(buf)?;
        writer.flush()?;

        if Self::oversized(&self.file_path, self.max_size) {
            if let Some(mut w) = guard.take() {
                let _ = w.flush();
            }
            Self::rotate_log(&self.file_path)?;
            *guard = Some(Self::open_file(&self.file_path, self.max_size)?);
        }

        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("log writer poisoned"))?;
        match guard.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the background writer when dropped; keep it
/// alive until the program exits.
pub fn init(log_dir: &Path) -> Option<WorkerGuard> {
    let config = LogConfig::load(log_dir);
    if !config.enabled {
        return None;
    }

    let mut env_filter = EnvFilter::from_default_env().add_directive(config.tracing_level().into());
    for directive in ["opendal=warn", "hyper=warn", "reqwest=warn"] {
        if let Ok(d) = directive.parse() {
            env_filter = env_filter.add_directive(d);
        }
    }

    let file_writer = match SizeRotatingWriter::new(log_dir, config.max_size_mb) {
        Ok(w) => w,
        Err(e) => {
            // No log file: console only, in debug builds
            if cfg!(debug_assertions) {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_writer(io::stderr)
                    .try_init();
                tracing::warn!("Log file unavailable: {}", e);
            }
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_writer);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false);

    let console_layer = cfg!(debug_assertions).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    Some(guard)
}
