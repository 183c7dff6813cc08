use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{analyze_command, generate_command};

#[derive(Parser, Debug)]
#[command(name = "mocksmith")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate mock classes for annotated protocols
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),
    /// List the entities and members found in a Swift file
    #[command(visible_alias = "a")]
    Analyze {
        /// Path to the Swift file
        filepath: PathBuf,

        /// Print the analysis as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Source files or directories to scan for protocols
    #[arg(short, long = "sources", num_args = 1.., required = true)]
    pub sources: Vec<PathBuf>,

    /// Previously generated mock files, re-emitted verbatim where inherited
    #[arg(short, long = "mockfiles", num_args = 1..)]
    pub mockfiles: Vec<PathBuf>,

    /// Output file; prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum number of files processed at once
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Configuration file (defaults to the nearest .mocksmith.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Header text written at the top of the output
    #[arg(long)]
    pub header: Option<String>,

    /// Doc comment marker selecting the protocols to mock
    #[arg(long)]
    pub annotation: Option<String>,

    /// Extra modules to import
    #[arg(long = "custom-imports", num_args = 1..)]
    pub custom_imports: Vec<String>,

    /// Modules to leave out of the imports
    #[arg(long = "exclude-imports", num_args = 1..)]
    pub exclude_imports: Vec<String>,

    /// Modules imported with @testable
    #[arg(long = "testable-imports", num_args = 1..)]
    pub testable_imports: Vec<String>,

    /// Declare the generated classes final
    #[arg(long)]
    pub mock_final: bool,
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Generate(args) => generate_command(&args),
            Commands::Analyze { filepath, json } => analyze_command(&filepath, json),
        }
    }
}
