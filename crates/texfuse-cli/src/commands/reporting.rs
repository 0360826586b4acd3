//! Shared console reporting for the batch commands.

use std::process::ExitCode;

use colored::Colorize;
use texfuse_core::{FailureRecord, GroupOutcome, OutputRecord, SkipRecord};

/// Print the cyan banner block that opens every batch run.
pub(crate) fn banner(title: &str) {
    println!("{}", "======================================".cyan());
    println!("{}", format!("  {}", title).cyan());
    println!("{}", "======================================".cyan());
    println!();
}

/// Accumulated results across every processed group.
#[derive(Default)]
pub(crate) struct RunTotals {
    pub outputs: Vec<OutputRecord>,
    pub failures: Vec<FailureRecord>,
    pub skips: Vec<SkipRecord>,
    pub warnings: Vec<String>,
    pub groups_processed: usize,
}

impl RunTotals {
    /// Fold in one group's outcome, emitting per-operation lines with
    /// `--verbose` or progress dots without.
    pub fn absorb(&mut self, outcome: GroupOutcome, verbose: bool) {
        self.groups_processed += 1;

        for warning in &outcome.warnings {
            if verbose {
                println!("  {} {}", "WARN".yellow().bold(), warning);
            }
        }
        for output in &outcome.outputs {
            if verbose {
                println!(
                    "  {} {}{} -> {}",
                    "SUCCESS".green(),
                    output.group,
                    output.operation,
                    output.path.display()
                );
            } else {
                print!("{}", ".".green());
            }
        }
        for failure in &outcome.failures {
            if verbose {
                println!(
                    "  {} {}{} - {}",
                    "FAILED".red(),
                    failure.group,
                    failure.operation,
                    failure.message
                );
            } else {
                print!("{}", "x".red());
            }
        }
        for skip in &outcome.skips {
            if verbose {
                println!(
                    "  {} {}{} (missing {})",
                    "skip".dimmed(),
                    skip.group,
                    skip.operation,
                    skip.missing
                );
            }
        }

        self.outputs.extend(outcome.outputs);
        self.failures.extend(outcome.failures);
        self.skips.extend(outcome.skips);
        self.warnings.extend(outcome.warnings);
    }

    /// Print the closing summary block and any warning/failure details.
    pub fn print_summary(&self, groups_found: usize, elapsed_seconds: f64, verbose: bool) {
        if !verbose {
            println!(); // Newline after progress dots
        }

        println!();
        println!("{}", "======================================".cyan());
        println!("{}", "  Run Summary".cyan());
        println!("{}", "======================================".cyan());
        println!();
        println!("{} {}", "Groups found:".blue().bold(), groups_found);
        println!(
            "{} {}",
            "Groups processed:".blue().bold(),
            self.groups_processed
        );
        println!("{} {}", "Outputs written:".green().bold(), self.outputs.len());
        println!("{} {}", "Operations failed:".red().bold(), self.failures.len());
        println!(
            "{} {}",
            "Operations skipped:".yellow().bold(),
            self.skips.len()
        );
        println!(
            "{} {:.2}s",
            "Total runtime:".blue().bold(),
            elapsed_seconds
        );
        println!();

        if !self.warnings.is_empty() {
            println!("{}", "Warnings:".yellow().bold());
            for warning in &self.warnings {
                println!("  - {}", warning);
            }
            println!();
        }

        if !self.failures.is_empty() {
            println!("{}", "Failed operations:".red().bold());
            for failure in &self.failures {
                println!(
                    "  - {}{}: {}",
                    failure.group, failure.operation, failure.message
                );
            }
            println!();
        }
    }

    /// Exit code: 0 for clean and omission-only runs, 1 when any operation
    /// failed.
    pub fn exit_code(&self) -> ExitCode {
        if self.failures.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }
    }
}
