mod audio;
mod cli;
mod config;
mod models;
mod prayer_times;
mod schedule;
mod session;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.is_none());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Starting async runtime")?;

    runtime.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        // Runs before loading so `config --init` works when the file is broken.
        Some(Commands::Config { init }) => handlers::handle_config(config_path, init),
        Some(Commands::Times) => handlers::handle_times(&load_config(config_path)?).await,
        Some(Commands::Locate) => handlers::handle_locate(&load_config(config_path)?).await,
        // No subcommand → launch TUI
        None => tui::app::run(load_config(config_path)?, cli.tracks).await,
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(path).context("Loading config")
}

/// Subcommands log warnings to stderr. The dashboard owns the terminal, so
/// its log goes to a file in the data directory.
fn init_logging(dashboard: bool) {
    let default_filter = if dashboard { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if dashboard {
        let file = AppConfig::ensure_data_dir()
            .and_then(|_| AppConfig::log_path())
            .and_then(|path| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("Opening log file {:?}", path))
            });
        match file {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Logging disabled: {:#}", e);
                builder.filter_level(log::LevelFilter::Off);
            }
        }
    }

    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn config_init_ignores_a_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        let path_arg = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["adzan", "--config", path_arg, "config", "--init"]).unwrap();
        dispatch(cli).await.unwrap();

        let cli = Cli::try_parse_from(["adzan", "--config", path_arg, "times"]).unwrap();
        assert!(dispatch(cli).await.is_err());
    }
}
