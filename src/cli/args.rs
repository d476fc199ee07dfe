use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "adzan", version, author, about = "Prayer time reminders with adhan alerts and a music player for your terminal")]
pub struct Cli {
    /// Audio file or folder to queue in the player (repeatable)
    #[arg(long = "track", short = 't', value_name = "PATH", global = true)]
    pub tracks: Vec<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch today's prayer times once and print them with the next countdown
    Times,
    /// Resolve and print the location prayer times are fetched for
    Locate,
    /// Show the config file path and its effective contents
    Config {
        /// Write a default config file if none exists yet
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_are_repeatable() {
        let cli = Cli::parse_from(["adzan", "--track", "a.mp3", "-t", "music/"]);
        assert_eq!(cli.tracks, vec![PathBuf::from("a.mp3"), PathBuf::from("music/")]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn config_init_flag() {
        let cli = Cli::parse_from(["adzan", "config", "--init"]);
        assert!(matches!(cli.command, Some(Commands::Config { init: true })));
    }

    #[test]
    fn command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
