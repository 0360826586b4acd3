//! TexFuse CLI - Batch texture channel recombination tools
//!
//! This binary provides commands for merging foliage texture sets,
//! converting packed-PBR texture sets, and normalizing alpha channels.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use texfuse_cli::commands;

/// TexFuse - Texture Channel Recombination Tools
#[derive(Parser)]
#[command(name = "texfuse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge foliage texture sets (_D/_A/_N/_R/_S/_AO) into packed outputs
    Foliage {
        /// Texture files to process (grouped by shared base name)
        files: Vec<String>,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<String>,

        /// Show per-operation lines instead of progress dots
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert packed-PBR texture sets (_C/_MRA/_NCE) under a directory tree
    Repack {
        /// Root directory to scan recursively for .tga files
        #[arg(long)]
        root: String,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<String>,

        /// Show per-operation lines instead of progress dots
        #[arg(short, long)]
        verbose: bool,
    },

    /// Rescale an image's alpha channel to span the full [0, 1] range
    NormalizeAlpha {
        /// Input image file
        #[arg(short, long)]
        input: String,

        /// Output path (default: overwrite the input after writing a backup)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Foliage {
            files,
            report,
            verbose,
        } => commands::foliage::run(&files, report.as_deref(), verbose),
        Commands::Repack {
            root,
            report,
            verbose,
        } => commands::repack::run(&root, report.as_deref(), verbose),
        Commands::NormalizeAlpha { input, output } => {
            commands::normalize_alpha::run(&input, output.as_deref())
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
