use clap::Parser;
use shoplist_lib::commands::{self, Command};
use shoplist_lib::AppState;
use std::path::PathBuf;

/// Grocery list kept in sync with a remote table
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Configuration and log directory
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_dir = cli
        .config_dir
        .unwrap_or_else(shoplist_lib::default_config_dir);
    std::fs::create_dir_all(&config_dir)?;
    let _log_guard = shoplist_lib::logging::init(&config_dir);

    let state = AppState::new(Some(config_dir)).await?;
    let mut session = state.start_session();
    tracing::info!(
        "Session {} started on {}",
        session.state.session_id(),
        session.table().store_name()
    );

    let result = match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => commands::shell::run(&mut session).await,
        command => match commands::dispatch(&mut session, command).await {
            Ok(out) => {
                println!("{}", out);
                Ok(())
            }
            Err(e) => Err(anyhow::anyhow!(e)),
        },
    };

    session.end();
    result
}
