use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ccnx-cs",
    about = "CCNx content store: replay request traces against the cache",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log store and queue activity at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Feed a JSON-lines trace through the delayed content store
    Replay(ReplayArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Trace file, one JSON record per line
    pub trace: PathBuf,
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML configuration file to merge over the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_replay() {
        let cli = Cli::try_parse_from(["ccnx-cs", "replay", "trace.jsonl"]).unwrap();
        if let Command::Replay(args) = cli.command {
            assert_eq!(args.trace, PathBuf::from("trace.jsonl"));
            assert!(args.config.is_none());
        } else {
            panic!("wrong command");
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn parse_replay_with_config_and_json() {
        let cli = Cli::try_parse_from([
            "ccnx-cs", "replay", "t.jsonl", "--config", "cs.toml", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        if let Command::Replay(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("cs.toml")));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_config() {
        let cli = Cli::try_parse_from(["ccnx-cs", "config"]).unwrap();
        assert!(matches!(cli.command, Command::Config(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["ccnx-cs", "-v", "config"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn replay_requires_a_trace() {
        assert!(Cli::try_parse_from(["ccnx-cs", "replay"]).is_err());
    }
}
