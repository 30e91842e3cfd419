//! Dossier CLI - turn client notes into structured profiles.

use clap::Parser;
use dossier_cli::cli::{ConfigAction, ConfigArgs};
use dossier_cli::commands;
use dossier_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins over -v
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> dossier_cli::Result<()> {
    let config_path = cli.config.as_deref();
    // init must work even when the existing file no longer parses
    let config = match &cli.command {
        Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. },
        }) => Config::default(),
        _ => Config::load(config_path)?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Parse(args) => commands::execute_parse(args, &config, &formatter).await?,
        Command::Validate(args) => commands::execute_validate(args, &config, &formatter).await?,
        Command::Config(args) => {
            commands::execute_config(args, &config, config_path, &formatter).await?
        }
    }

    Ok(())
}
