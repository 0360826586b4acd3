//! Repack command implementation
//!
//! Recursively scans a root directory for `.tga` files, groups them per
//! directory by the packed-PBR suffix set, and converts each group into
//! `_DM`, `_ORS`, `_N`, and `_S`/`_SpecialMask` outputs written alongside
//! the inputs. Groups never span directories.

use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use walkdir::WalkDir;

use texfuse_core::pipeline::process_packed_group;
use texfuse_core::{group_paths, SuffixSet};

use super::reporting::{banner, RunTotals};
use crate::report::{self, RunSummary};

/// Run the repack command
///
/// # Arguments
/// * `root` - Directory scanned recursively for `.tga` inputs
/// * `report_path` - Optional JSON run report destination
/// * `verbose` - Per-operation output instead of progress dots
///
/// # Returns
/// Exit code: 0 success (including nothing to process), 1 if any operation
/// failed
pub fn run(root: &str, report_path: Option<&str>, verbose: bool) -> Result<ExitCode> {
    let start = Instant::now();

    let root_path = Path::new(root);
    if !root_path.is_dir() {
        anyhow::bail!("root directory does not exist: {}", root);
    }

    banner("TexFuse Packed-PBR Converter");
    println!("{} {}", "Scan root:".blue().bold(), root);

    // Directories are visited in sorted order for deterministic output.
    let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    let mut input_count = 0usize;
    for entry in WalkDir::new(root_path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"))
        {
            let dir = path.parent().unwrap_or(root_path).to_path_buf();
            by_dir.entry(dir).or_default().push(path.to_path_buf());
            input_count += 1;
        }
    }

    println!(
        "{} Found {} .tga file(s) in {} directorie(s)",
        "INFO".blue().bold(),
        input_count,
        by_dir.len()
    );
    println!();

    let mut totals = RunTotals::default();
    let mut groups_found = 0usize;
    for (dir, files) in &by_dir {
        for group in group_paths(files, SuffixSet::Packed) {
            groups_found += 1;
            totals.absorb(process_packed_group(&group, dir), verbose);
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    totals.print_summary(groups_found, elapsed, verbose);

    if let Some(report_path) = report_path {
        let summary = RunSummary {
            timestamp: report::timestamp(),
            tool: "repack".to_string(),
            root: Some(root.to_string()),
            input_count,
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
