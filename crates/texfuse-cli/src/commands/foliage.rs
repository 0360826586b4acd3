//! Foliage merge command implementation
//!
//! Groups an explicit list of texture files by base name, keeps the groups
//! whose base carries a Leaf/Trunk keyword, and merges each into `_DA`,
//! `_NRS`, and (for Trunk groups) `_DAO`/`_NR` outputs under a `Textures`
//! subdirectory next to the inputs.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use texfuse_core::pipeline::{foliage_keyword_match, process_foliage_group};
use texfuse_core::{group_paths, SuffixSet};

use super::reporting::{banner, RunTotals};
use crate::report::{self, RunSummary};

/// Run the foliage command
///
/// # Arguments
/// * `files` - Explicit texture file list; nonexistent paths are warned
///   about and dropped
/// * `report_path` - Optional JSON run report destination
/// * `verbose` - Per-operation output instead of progress dots
///
/// # Returns
/// Exit code: 0 success (including nothing to process), 1 if any operation
/// failed
pub fn run(files: &[String], report_path: Option<&str>, verbose: bool) -> Result<ExitCode> {
    let start = Instant::now();

    banner("TexFuse Foliage Merger");

    let mut inputs: Vec<PathBuf> = Vec::new();
    for file in files {
        let path = Path::new(file);
        if path.is_file() {
            inputs.push(path.to_path_buf());
        } else {
            println!(
                "{} input does not exist, dropping: {}",
                "WARN".yellow().bold(),
                file
            );
        }
    }

    println!(
        "{} {} input file(s) to consider",
        "INFO".blue().bold(),
        inputs.len()
    );

    let groups = group_paths(&inputs, SuffixSet::Foliage);
    let groups_found = groups.len();
    let (matched, ignored): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .partition(|g| foliage_keyword_match(&g.base));
    if !ignored.is_empty() {
        println!(
            "{} Ignoring {} group(s) without a Leaf/Trunk keyword",
            "INFO".yellow().bold(),
            ignored.len()
        );
    }
    println!(
        "{} Processing {} foliage group(s)",
        "INFO".blue().bold(),
        matched.len()
    );
    println!();

    let mut totals = RunTotals::default();
    for group in &matched {
        totals.absorb(process_foliage_group(group), verbose);
    }

    let elapsed = start.elapsed().as_secs_f64();
    totals.print_summary(groups_found, elapsed, verbose);

    if let Some(report_path) = report_path {
        let summary = RunSummary {
            timestamp: report::timestamp(),
            tool: "foliage".to_string(),
            root: None,
            input_count: inputs.len(),
            groups_found,
            groups_processed: totals.groups_processed,
            outputs_written: totals.outputs.len(),
            operations_failed: totals.failures.len(),
            operations_skipped: totals.skips.len(),
            runtime_seconds: elapsed,
            outputs: totals.outputs.clone(),
            failures: totals.failures.clone(),
            skips: totals.skips.clone(),
        };
        report::write_report(Path::new(report_path), &summary)?;
        println!("{} {}", "Run report:".blue().bold(), report_path);
    }

    Ok(totals.exit_code())
}
