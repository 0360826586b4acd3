//! Normalize-alpha command implementation
//!
//! Rescales one image's alpha channel to span the full [0, 1] range while
//! keeping 0.5 fixed. The input is overwritten (after a backup) unless an
//! explicit output path is given; output is always TGA.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use texfuse_core::normalize_alpha_file;

/// Run the normalize-alpha command
///
/// # Arguments
/// * `input` - Image file to transform
/// * `output` - Optional output path (extension forced to `.tga`)
///
/// # Returns
/// Exit code: 0 success; errors propagate as fatal
pub fn run(input: &str, output: Option<&str>) -> Result<ExitCode> {
    let input_path = Path::new(input);
    if !input_path.is_file() {
        anyhow::bail!("input file does not exist: {}", input);
    }

    println!("{} {}", "Normalizing alpha of:".cyan().bold(), input);

    let outcome = normalize_alpha_file(input_path, output.map(Path::new))
        .with_context(|| format!("failed to normalize alpha of {}", input))?;

    let stats = outcome.stats;
    println!(
        "{} alpha min {:.4}, max {:.4}",
        "INFO".blue().bold(),
        stats.min,
        stats.max
    );
    println!(
        "{} scale {:.4}, applied ratio {:.4}",
        "INFO".blue().bold(),
        stats.scale,
        stats.ratio
    );
    if let Some(backup) = &outcome.backup_path {
        println!(
            "{} original backed up to {}",
            "INFO".blue().bold(),
            backup.display()
        );
    }
    println!(
        "{} saved {} ({})",
        "SUCCESS".green().bold(),
        outcome.output_path.display(),
        &outcome.hash[..16]
    );

    Ok(ExitCode::SUCCESS)
}
