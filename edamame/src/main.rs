mod common;
mod input;
mod output;
mod run_preserve;
mod run_properties;

use crate::run_preserve::*;
use crate::run_properties::*;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "EDAMAME",
    long_about = "Module preservation between weighted networks\n\
		  Matrices are delimited text files (`.tsv`, `.csv`, optionally `.gz`)\n\
		  with column names in the first line and row names in the first column."
)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Test whether discovery modules are preserved in a test dataset",
        long_about = "Compare each module between a discovery and a test dataset:\n\
		      (1) Compute seven preservation statistics on the real test nodes\n\
		      (2) Recompute them on random node sets of the same size\n\
		      (3) Report permutation p-values against these nulls.\n"
    )]
    Preserve(PreserveArgs),

    /// Weighted degree, summary profile and contributions of modules
    /// within one dataset
    Properties(PropertiesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.commands {
        Commands::Preserve(args) => {
            run_preserve(args)?;
        }
        Commands::Properties(args) => {
            run_properties(args)?;
        }
    }

    Ok(())
}
