use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cringeguard")]
#[command(author, version, about = "Hide cringe posts in a LinkedIn feed dump")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "cringeguard.yaml")]
    pub config: PathBuf,

    /// Settings and stats file, overriding `storage_path` from the config
    #[arg(short, long, global = true)]
    pub storage: Option<PathBuf>,

    /// Chat completions endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// API key, used instead of the stored one
    #[arg(long, global = true, env = "GROQ_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every post in an HTML feed dump
    Scan {
        /// Feed document to scan
        file: PathBuf,

        /// Keep reading inserted HTML fragments from stdin, one per line
        #[arg(short, long)]
        follow: bool,
    },

    /// Show posts hidden and time saved
    Stats,

    /// Turn scanning on
    Enable,

    /// Turn scanning off
    Disable,

    /// Save the API key
    SetKey {
        /// Groq API key
        key: String,
    },

    /// Delete the stored API key
    ClearKey,

    /// List the criteria sent to the model
    Criteria,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_with_global_flags() {
        let cli = Cli::try_parse_from([
            "cringeguard",
            "scan",
            "feed.html",
            "--follow",
            "--storage",
            "state.json",
            "--model",
            "llama3-8b-8192",
        ])
        .unwrap();

        assert_eq!(cli.storage, Some(PathBuf::from("state.json")));
        assert_eq!(cli.model.as_deref(), Some("llama3-8b-8192"));
        match cli.command {
            Commands::Scan { file, follow } => {
                assert_eq!(file, PathBuf::from("feed.html"));
                assert!(follow);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_set_key() {
        let cli = Cli::try_parse_from(["cringeguard", "set-key", "gsk_123"]).unwrap();
        assert!(matches!(cli.command, Commands::SetKey { key } if key == "gsk_123"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
