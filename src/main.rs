//! sagit-hw CLI
//!
//! Command-line front-end for the Xiaomi Mi 6 hardware helpers.

use anyhow::Result;
use clap::Parser;

// CLI definitions
mod cli;
use cli::{Cli, Commands, KeysCommands, ToggleCommands};

// Command handlers
mod commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = || commands::Context::from_cli(&cli);

    match &cli.command {
        // === Capacitive keys ===
        Commands::Keys(KeysCommands::Status) => commands::keys::status(&ctx()?)?,
        Commands::Keys(KeysCommands::Supported) => commands::keys::supported(&ctx()?)?,
        Commands::Keys(KeysCommands::Disable) => commands::keys::set_active(&ctx()?, true)?,
        Commands::Keys(KeysCommands::Enable) => commands::keys::set_active(&ctx()?, false)?,

        // === Settings panel switches ===
        Commands::Toggle(ToggleCommands::List) => commands::toggle::list(&ctx()?)?,
        Commands::Toggle(ToggleCommands::Set { name, state }) => {
            commands::toggle::set(&ctx()?, name, state.as_bool())?
        }
        Commands::Toggle(ToggleCommands::Reset { name }) => {
            commands::toggle::reset(&ctx()?, name)?
        }

        // === Lights ===
        Commands::Light {
            id,
            color,
            on_ms,
            off_ms,
            mode,
        } => commands::lights::set_light(&ctx()?, id, *color, *on_ms, *off_ms, *mode)?,

        // === WLAN MAC (plain file, no config or node access) ===
        Commands::Readmac { path, mac } => commands::readmac::readmac(path, mac.as_deref())?,
    }

    Ok(())
}
