mod console;
mod menu;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use roster_store::DEFAULT_FILE_NAME;
use tracing_subscriber::EnvFilter;

use crate::console::TerminalConsole;

/// Interactive maintenance of the ARL company roster.
#[derive(Parser)]
#[command(name = "roster", version)]
struct Cli {
    /// Roster file (Parquet)
    #[arg(long, env = "ROSTER_FILE", default_value = DEFAULT_FILE_NAME)]
    file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("roster v{}", env!("CARGO_PKG_VERSION"));

    let mut console = TerminalConsole::new().context("opening the terminal")?;
    let mut session = menu::open_or_create(&cli.file, &mut console)?;
    menu::run(&mut session, &mut console)
}
