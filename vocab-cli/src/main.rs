//! vocabgen — generate a rules-engine vocabulary model from a type
//! descriptor document.
//!
//! # Usage
//!
//! ```bash
//! vocabgen generate --file model.json
//! vocabgen generate --file model.json --output build/ --dependency deps/
//! vocabgen generate --file model.json --namespaces SampleModel.Model,SampleModel.Shared
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vocab_core::{generate, GenerateOptions};

#[derive(Parser)]
#[command(name = "vocabgen")]
#[command(version = "0.1.0")]
#[command(about = "Generate a business-rules vocabulary model from a type descriptor document")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate vocabulary.
    Generate {
        /// Descriptor document to be processed
        #[arg(short, long)]
        file: PathBuf,

        /// Where to save the vocabulary file
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Where to search for imported modules (default: the input
        /// file's directory)
        #[arg(short, long)]
        dependency: Option<PathBuf>,

        /// Restrict scanning to these namespaces
        #[arg(short, long, value_delimiter = ',')]
        namespaces: Vec<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate {
            file,
            output,
            dependency,
            namespaces,
        } => cmd_generate(file, output, dependency, namespaces),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_generate(
    file: PathBuf,
    output: PathBuf,
    dependency: Option<PathBuf>,
    namespaces: Vec<String>,
) -> Result<()> {
    let options = GenerateOptions {
        input: file.clone(),
        output_dir: output,
        dependency_dir: dependency,
        namespaces,
    };
    let written = generate(&options)
        .with_context(|| format!("generating vocabulary from '{}'", file.display()))?;
    println!("{}", written.display());
    Ok(())
}
