//! The Serpentes Command-Line Interface.
//!
//! Reads a JSON parse tree, runs the transformer, and reports the result.
//! Errors surface as `miette` diagnostics.

use std::fs;
use std::path::Path;

use clap::{CommandFactory, Parser};
use miette::IntoDiagnostic;

use crate::cli::args::{Command, SerpentesArgs};
use crate::errors::Result;
use crate::{Node, ParseTree, TransformOptions, Transformer};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<()> {
    run_with(SerpentesArgs::parse())
}

/// Dispatches already-parsed arguments.
pub fn run_with(args: SerpentesArgs) -> miette::Result<()> {
    if args.version {
        println!("Serpentes {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    if args.author {
        println!("{}", env!("CARGO_PKG_AUTHORS"));
        return Ok(());
    }

    match args.command {
        Some(Command::Lower {
            file,
            config,
            preserve_floats,
            compact,
        }) => {
            let mut options = load_options(config.as_deref())?;
            if preserve_floats {
                options.float_literals = crate::transform::FloatLiterals::Preserve;
            }
            let module = lower_file(&file, options)?;
            output::print_module(&module, compact)?;
        }
        Some(Command::Check { file, config }) => {
            let module = lower_file(&file, load_options(config.as_deref())?)?;
            output::print_summary(&module);
        }
        None => SerpentesArgs::command().print_help().into_diagnostic()?,
    }
    Ok(())
}

/// Options from a YAML file, or the defaults.
pub fn load_options(path: Option<&Path>) -> Result<TransformOptions> {
    match path {
        Some(path) => TransformOptions::from_yaml_str(&fs::read_to_string(path)?),
        None => Ok(TransformOptions::default()),
    }
}

/// Reads a JSON parse tree and reduces it to a module.
pub fn lower_file(path: &Path, options: TransformOptions) -> Result<Node> {
    log::debug!("lowering {}", path.display());
    let tree = ParseTree::from_json(&fs::read_to_string(path)?)?;
    Transformer::new(options).transform(tree)
}
