//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "magpie", version, about = "Keyword image harvester with a resumable download queue")]
pub struct Cli {
    /// Configuration file (defaults to ./magpie.toml, then the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search for images and record their metadata (no bytes are fetched)
    Collect {
        /// Search keyword, e.g. "musicians with birds"
        keyword: String,
        /// Tag to attach to every recorded image; repeatable
        #[arg(long = "tag", value_name = "NAME")]
        tags: Vec<String>,
    },
    /// Fetch the bytes of every not-yet-retrieved record
    Download {
        /// Destination directory (default taken from the configuration)
        #[arg(long, value_name = "DIR")]
        folder: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_collect_with_repeated_tags() {
        let cli = Cli::try_parse_from([
            "magpie",
            "collect",
            "musicians with birds",
            "--tag",
            "birds",
            "--tag",
            "musicians",
        ])
        .unwrap();
        match cli.command {
            Command::Collect { keyword, tags } => {
                assert_eq!(keyword, "musicians with birds");
                assert_eq!(tags, vec!["birds".to_string(), "musicians".to_string()]);
            },
            _ => panic!("expected the collect subcommand"),
        }
    }

    #[test]
    fn test_parses_download_with_folder_override() {
        let cli = Cli::try_parse_from(["magpie", "download", "--folder", "/srv/pics"]).unwrap();
        match cli.command {
            Command::Download { folder } => assert_eq!(folder, Some(PathBuf::from("/srv/pics"))),
            _ => panic!("expected the download subcommand"),
        }
    }

    #[test]
    fn test_download_folder_is_optional() {
        let cli = Cli::try_parse_from(["magpie", "download"]).unwrap();
        assert!(matches!(cli.command, Command::Download { folder: None }));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
