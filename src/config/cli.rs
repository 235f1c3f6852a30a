use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_INSTANCE_URL: &str = "http://127.0.0.1:8001";

#[derive(Debug, Parser)]
#[command(name = "firehose", version)]
#[command(about = "Aggregates personal data feeds into one reverse-chronological stream")]
pub struct Cli {
    /// Base URL of the tabular-query service
    #[arg(
        short = 'u',
        long,
        env = "FIREHOSE_URL",
        default_value = DEFAULT_INSTANCE_URL,
        global = true
    )]
    pub url: String,

    /// API token for the query service
    #[arg(short = 't', long, env = "FIREHOSE_TOKEN", default_value = "", global = true)]
    pub token: String,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Update data sources
    Update {
        /// Data source to refresh
        #[arg(short, long)]
        source: Option<String>,

        /// List available sources
        #[arg(short, long)]
        list_sources: bool,

        /// Data directory where databases are stored
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// Print the merged firehose
    Stream {
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        output: OutputFormat,

        /// Maximum number of entries to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Cli::try_parse_from(["firehose"]).is_err());
    }

    #[test]
    fn parses_stream_with_limit() {
        let cli = Cli::try_parse_from(["firehose", "stream", "--limit", "5"]).unwrap();
        match cli.command {
            Command::Stream { limit, output } => {
                assert_eq!(limit, 5);
                assert_eq!(output, OutputFormat::Plain);
            }
            other => panic!("expected stream, got {other:?}"),
        }
    }

    #[test]
    fn parses_update_source() {
        let cli =
            Cli::try_parse_from(["firehose", "update", "--source", "mastodon"]).unwrap();
        match cli.command {
            Command::Update { source, .. } => assert_eq!(source.as_deref(), Some("mastodon")),
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli =
            Cli::try_parse_from(["firehose", "stream", "--token", "sesame", "-u", "http://h:9"])
                .unwrap();
        assert_eq!(cli.token, "sesame");
        assert_eq!(cli.url, "http://h:9");
    }
}
