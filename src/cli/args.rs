//! Command-line arguments and subcommands for the Serpentes CLI.
//!
//! Uses `clap` derive. The tool reads parse trees serialized as JSON by an
//! external grammar engine; it does not parse source text itself.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "serpentes",
    about = "Lowers grammar parse trees into a Python-style abstract syntax tree.",
    disable_version_flag = true
)]
pub struct SerpentesArgs {
    /// Shows the current version of Serpentes.
    #[arg(short, long)]
    pub version: bool,

    /// The author of Serpentes.
    #[arg(short, long)]
    pub author: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the tree and print its materialized form as JSON.
    Lower {
        /// The path to the JSON parse tree.
        #[arg(required = true)]
        file: PathBuf,
        /// A YAML file with transformer options.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Keep fractional number literals as floats.
        #[arg(long)]
        preserve_floats: bool,
        /// Print JSON on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// Build the tree and print a one-line summary.
    Check {
        /// The path to the JSON parse tree.
        #[arg(required = true)]
        file: PathBuf,
        /// A YAML file with transformer options.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_flags() {
        let args = SerpentesArgs::parse_from([
            "serpentes",
            "lower",
            "tree.json",
            "--preserve-floats",
            "--compact",
        ]);
        match args.command {
            Some(Command::Lower {
                file,
                config,
                preserve_floats,
                compact,
            }) => {
                assert_eq!(file, PathBuf::from("tree.json"));
                assert!(config.is_none());
                assert!(preserve_floats);
                assert!(compact);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_banner_flags_without_subcommand() {
        let args = SerpentesArgs::parse_from(["serpentes", "-a"]);
        assert!(args.author);
        assert!(!args.version);
        assert!(args.command.is_none());
    }
}
