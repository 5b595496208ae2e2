#![forbid(unsafe_code)]

mod cli;
mod commands;
mod shutdown;
mod startup;

use anyhow::Result;

use cli::Command;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::parse();

    match cli.command {
        Some(Command::Version) => {
            println!("warpgate-agent {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }

        Some(Command::Purge) => commands::cmd_purge(&cli).await,

        Some(Command::Simulate) => commands::cmd_simulate(&cli).await,

        // `run` and no subcommand both start the agent daemon
        Some(Command::Run { .. }) | None => startup::run(&cli).await,
    }
}
