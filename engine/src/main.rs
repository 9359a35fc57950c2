// Focus Sort
// Main entry point for the focus-sort binary

use clap::Parser;
use focus_engine::cli::{Cli, Command, SettingsAction};
use focus_engine::config::Config;
use focus_engine::handlers::{
    handle_doctor, handle_generate, handle_history, handle_play, handle_serve,
    handle_settings_set, handle_settings_show, OutputFormat,
};
use focus_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // RUST_LOG still wins over both
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::debug!("Focus Sort v{} ({} - {})", version, commit, timestamp);

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Command::Serve { host, port } => {
            tracing::info!("Starting task endpoint...");
            handle_serve(&config, host, port).await
        }

        Command::Generate { goal, server } => {
            tracing::info!("Generating tasks for: {}", goal);
            handle_generate(goal, server, &config, format).await
        }

        Command::Play { goal, server } => {
            tracing::info!("Starting round for: {}", goal);
            handle_play(goal, server, &config, format).await
        }

        Command::History { clear } => handle_history(clear, &config, format).await,

        Command::Settings { action } => match action {
            SettingsAction::Show => handle_settings_show(&config, format).await,
            SettingsAction::Set {
                sound,
                volume,
                vibrate,
            } => handle_settings_set(sound, volume, vibrate, &config, format).await,
        },

        Command::Doctor => {
            tracing::info!("Running diagnostics...");
            handle_doctor(&config, cli.config.as_deref(), format).await
        }
    }
}
