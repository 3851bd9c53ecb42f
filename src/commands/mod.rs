//! Front-end commands: each one drives the table for a session and renders
//! what it gets back as text

pub mod export;
pub mod items;
pub mod log;
pub mod shell;
pub mod sync;
pub mod test;

use crate::Session;
use clap::Subcommand;
use std::path::PathBuf;

pub use items::AddArgs;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the list with its totals
    List,
    /// Add an item to the list
    Add(AddArgs),
    /// Remove every item
    Clear,
    /// Save the list as a spreadsheet file
    Export {
        /// Directory to write into
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show connection and sync state
    Status,
    /// Check the remote store and push items saved while offline
    Sync,
    /// Show or change logging settings
    Log {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        max_size_mb: Option<u32>,
        #[arg(long)]
        level: Option<String>,
    },
    /// Check that the configured store can be read
    TestConnection,
    /// Interactive session (default)
    Shell,
}

/// Run one command and return the text to show the user
pub async fn dispatch(session: &mut Session, command: Command) -> Result<String, String> {
    match command {
        Command::List => Ok(items::list_items(session).await),
        Command::Add(args) => items::add_item(session, args).await,
        Command::Clear => Ok(items::clear_items(session).await),
        Command::Export { out } => export::export_items(session, out).await,
        Command::Status => Ok(sync::get_status(session)),
        Command::Sync => Ok(sync::sync_now(session).await),
        Command::Log {
            enabled,
            max_size_mb,
            level,
        } => {
            let config = if enabled.is_none() && max_size_mb.is_none() && level.is_none() {
                log::get_log_config(&session.app.config_dir)
            } else {
                log::set_log_config(&session.app.config_dir, enabled, max_size_mb, level)?
            };
            Ok(log::render(&config))
        }
        Command::TestConnection => Ok(test::test_connection(session).await.render()),
        Command::Shell => Err("Already in a shell".to_string()),
    }
}

/// `R$ 1234.50`
pub(crate) fn money(value: f64) -> String {
    format!("R$ {:.2}", value)
}
