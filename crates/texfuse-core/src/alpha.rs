//! Alpha-range normalization.
//!
//! Rescales an image's alpha channel so its existing value spread maximally
//! spans [0, 1] while keeping 0.5 fixed: `ratio * (v - 0.5) + 0.5` with
//! `ratio = 0.5 / max(|max - 0.5|, |min - 0.5|)`. A constant channel passes
//! through unchanged (ratio treated as 1).

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::image::{Channel, Image};
use crate::tga;

/// Errors from the file-level alpha transform.
#[derive(Debug, Error)]
pub enum AlphaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] crate::image::ImageError),

    #[error("failed to back up {path} to {backup}: {source}")]
    Backup {
        path: PathBuf,
        backup: PathBuf,
        source: std::io::Error,
    },
}

/// Observed alpha statistics and the applied remap parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaStats {
    /// Minimum alpha value, normalized to [0, 1].
    pub min: f32,
    /// Maximum alpha value, normalized to [0, 1].
    pub max: f32,
    /// `max(|max - 0.5|, |min - 0.5|)` over the whole channel.
    pub scale: f32,
    /// Applied remap ratio (1.0 for a constant channel).
    pub ratio: f32,
}

/// Result of [`normalize_alpha_file`].
#[derive(Debug, Clone)]
pub struct AlphaOutcome {
    /// Path the transformed image was written to.
    pub output_path: PathBuf,
    /// Backup of the original, written only when the output overwrites the
    /// input.
    pub backup_path: Option<PathBuf>,
    /// BLAKE3 hash of the written TGA bytes.
    pub hash: String,
    /// Channel statistics and remap parameters.
    pub stats: AlphaStats,
}

/// Remap the alpha channel in place. Images without an alpha channel are
/// upgraded to 4 channels (opaque) first, which makes them a constant-channel
/// pass-through.
pub fn normalize_alpha_range(image: &mut Image) -> AlphaStats {
    image.ensure_rgba(255);

    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for y in 0..image.height() {
        for x in 0..image.width() {
            let a = image.get(x, y, Channel::Alpha).unwrap_or(255) as f32 / 255.0;
            min = min.min(a);
            max = max.max(a);
        }
    }
    if min > max {
        // Zero-pixel image: nothing to remap.
        return AlphaStats {
            min: 0.0,
            max: 0.0,
            scale: 0.0,
            ratio: 1.0,
        };
    }

    let scale = (max - 0.5).abs().max((min - 0.5).abs());
    let ratio = if scale == 0.0 { 1.0 } else { 0.5 / scale };

    for y in 0..image.height() {
        for x in 0..image.width() {
            let a = image.get(x, y, Channel::Alpha).unwrap_or(255) as f32 / 255.0;
            let remapped = (ratio * (a - 0.5) + 0.5).clamp(0.0, 1.0);
            image.set(x, y, Channel::Alpha, (remapped * 255.0).round() as u8);
        }
    }

    AlphaStats {
        min,
        max,
        scale,
        ratio,
    }
}

/// Load a file, normalize its alpha range, and save it as TGA.
///
/// The resolved output path (`output` when given, else the input path) has
/// its extension forced to `.tga`. When the resolved output equals the input
/// path, a backup named `<stem>_backup<ext>` is written alongside the input
/// before saving; a failed backup aborts the transform.
pub fn normalize_alpha_file(
    input: &Path,
    output: Option<&Path>,
) -> Result<AlphaOutcome, AlphaError> {
    let output_path = output.unwrap_or(input).with_extension("tga");

    let mut image = tga::load_image(input)?;
    let stats = normalize_alpha_range(&mut image);

    let backup_path = if output_path == input {
        let backup = backup_path_for(input);
        std::fs::copy(input, &backup).map_err(|source| AlphaError::Backup {
            path: input.to_path_buf(),
            backup: backup.clone(),
            source,
        })?;
        Some(backup)
    } else {
        None
    };

    let hash = tga::write_tga(&image, &output_path)?;
    Ok(AlphaOutcome {
        output_path,
        backup_path,
        hash,
        stats,
    })
}

fn backup_path_for(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_backup{ext}"))
}
