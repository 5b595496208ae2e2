use clap::{Parser, Subcommand};
use infrastructure::config::{LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "warpgate-agent",
    about = "Metagame alert dispatch agent",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Cli {
    /// Log level override (takes precedence over the environment)
    #[arg(short, long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log format: text (default, development) or json (production)
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the agent: ingest the event feed and dispatch alerts (default)
    Run {
        /// Read the event feed from a file instead of stdin
        #[arg(long)]
        feed: Option<String>,
    },

    /// Remove alert records older than the retention window, then exit
    Purge,

    /// Drive a synthetic alert through the store, then exit
    Simulate,

    /// Display version information
    Version,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_defaults_to_run() {
        let cli = Cli::try_parse_from(["warpgate-agent"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.log_level.is_none());
        assert!(cli.log_format.is_none());
    }

    #[test]
    fn cli_run_subcommand() {
        let cli = Cli::try_parse_from(["warpgate-agent", "run"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Run { feed: None })));
    }

    #[test]
    fn cli_run_with_feed_path() {
        let cli =
            Cli::try_parse_from(["warpgate-agent", "run", "--feed", "events.jsonl"]).unwrap();
        match cli.command {
            Some(Command::Run { feed }) => assert_eq!(feed.as_deref(), Some("events.jsonl")),
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_purge_subcommand() {
        let cli = Cli::try_parse_from(["warpgate-agent", "purge"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Purge)));
    }

    #[test]
    fn cli_simulate_subcommand() {
        let cli = Cli::try_parse_from(["warpgate-agent", "simulate"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Simulate)));
    }

    #[test]
    fn cli_version_subcommand() {
        let cli = Cli::try_parse_from(["warpgate-agent", "version"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Version)));
    }

    #[test]
    fn cli_log_level_override() {
        let cli = Cli::try_parse_from(["warpgate-agent", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn cli_log_level_short_flag() {
        let cli = Cli::try_parse_from(["warpgate-agent", "-l", "trace"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Trace));
    }

    #[test]
    fn cli_log_format_json() {
        let cli = Cli::try_parse_from(["warpgate-agent", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn cli_log_format_text() {
        let cli = Cli::try_parse_from(["warpgate-agent", "--log-format", "text"]).unwrap();
        assert_eq!(cli.log_format, Some(LogFormat::Text));
    }

    #[test]
    fn cli_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["warpgate-agent", "purge", "--log-level", "warn"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Purge)));
        assert_eq!(cli.log_level, Some(LogLevel::Warn));
    }

    #[test]
    fn cli_invalid_log_level_rejected() {
        let result = Cli::try_parse_from(["warpgate-agent", "--log-level", "banana"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_log_format_invalid_rejected() {
        let result = Cli::try_parse_from(["warpgate-agent", "--log-format", "xml"]);
        assert!(result.is_err());
    }
}
