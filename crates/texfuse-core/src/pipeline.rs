//! Per-group orchestration.
//!
//! Dispatches the recombination operations over an [`AssetGroup`] and applies
//! the skip/failure policy: a missing required input skips the operation (an
//! omission, not an error), a load failure or dimension mismatch fails the
//! operation, and nothing aborts the sibling operations or other groups.
//! Images are loaded fresh per operation and never cached.
//!
//! This layer does not print; every event is recorded in the returned
//! [`GroupOutcome`] so the caller owns the reporting.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::classify::TextureKind;
use crate::group::AssetGroup;
use crate::image::Image;
use crate::ops;
use crate::ops::RecombineError;
use crate::tga;

/// One written output file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    /// Base key of the producing group.
    pub group: String,
    /// Output suffix of the producing operation (e.g. `_DA`).
    pub operation: String,
    /// Path the file was written to.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// BLAKE3 hash of the written TGA bytes.
    pub hash: String,
}

/// One failed operation (load failure, dimension mismatch, or save failure).
#[derive(Debug, Clone, Serialize)]
pub struct FailureRecord {
    pub group: String,
    pub operation: String,
    pub message: String,
}

/// One operation skipped because a required input was absent.
#[derive(Debug, Clone, Serialize)]
pub struct SkipRecord {
    pub group: String,
    pub operation: String,
    /// The missing input suffixes, comma separated.
    pub missing: String,
}

/// Everything that happened while processing one group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupOutcome {
    pub outputs: Vec<OutputRecord>,
    pub failures: Vec<FailureRecord>,
    pub skips: Vec<SkipRecord>,
    /// Degradation notices that do not fail an operation (e.g. an unreadable
    /// UniqueMask falling back to defaults).
    pub warnings: Vec<String>,
}

impl GroupOutcome {
    /// Fold another outcome into this one.
    pub fn merge(&mut self, other: GroupOutcome) {
        self.outputs.extend(other.outputs);
        self.failures.extend(other.failures);
        self.skips.extend(other.skips);
        self.warnings.extend(other.warnings);
    }
}

/// Foliage groups are only processed when the base name carries one of the
/// vegetation keywords.
pub fn foliage_keyword_match(base: &str) -> bool {
    base.contains("Leaf") || base.contains("Trunk")
}

fn load(path: &Path) -> Result<Image, String> {
    tga::load_image(path).map_err(|e| format!("failed to load {}: {}", path.display(), e))
}

fn save(
    outcome: &mut GroupOutcome,
    group: &AssetGroup,
    operation: &str,
    image: &Image,
    path: PathBuf,
) {
    match tga::write_tga(image, &path) {
        Ok(hash) => outcome.outputs.push(OutputRecord {
            group: group.base.clone(),
            operation: operation.to_string(),
            path,
            width: image.width(),
            height: image.height(),
            hash,
        }),
        Err(e) => outcome.failures.push(FailureRecord {
            group: group.base.clone(),
            operation: operation.to_string(),
            message: format!("failed to write {}: {}", path.display(), e),
        }),
    }
}

fn fail(outcome: &mut GroupOutcome, group: &AssetGroup, operation: &str, message: String) {
    outcome.failures.push(FailureRecord {
        group: group.base.clone(),
        operation: operation.to_string(),
        message,
    });
}

/// Record a skip when any required kind is absent. Returns the member paths
/// when all are present.
fn require<'a, const N: usize>(
    outcome: &mut GroupOutcome,
    group: &'a AssetGroup,
    operation: &str,
    kinds: [TextureKind; N],
) -> Option<[&'a Path; N]> {
    let missing: Vec<&str> = kinds
        .iter()
        .filter(|k| group.member(**k).is_none())
        .map(|k| k.suffix())
        .collect();
    if !missing.is_empty() {
        outcome.skips.push(SkipRecord {
            group: group.base.clone(),
            operation: operation.to_string(),
            missing: missing.join(", "),
        });
        return None;
    }
    Some(kinds.map(|k| group.member(k).expect("checked above")))
}

/// Foliage output placement: a `Textures` subdirectory next to the primary
/// input.
fn foliage_output_path(primary: &Path, base: &str, suffix: &str) -> PathBuf {
    let dir = primary.parent().unwrap_or_else(|| Path::new("."));
    dir.join("Textures").join(format!("{base}{suffix}.tga"))
}

/// A two-input merge in the foliage set: load both, apply `op`, write next
/// to the primary input.
fn run_foliage_merge(
    outcome: &mut GroupOutcome,
    group: &AssetGroup,
    operation: &str,
    primary_kind: TextureKind,
    secondary_kind: TextureKind,
    op: fn(&Image, &Image) -> Result<Image, RecombineError>,
) {
    let Some([primary, secondary]) = require(outcome, group, operation, [primary_kind, secondary_kind])
    else {
        return;
    };
    let (primary, secondary) = (primary.to_path_buf(), secondary.to_path_buf());

    let first = match load(&primary) {
        Ok(img) => img,
        Err(msg) => return fail(outcome, group, operation, msg),
    };
    let second = match load(&secondary) {
        Ok(img) => img,
        Err(msg) => return fail(outcome, group, operation, msg),
    };

    match op(&first, &second) {
        Ok(image) => {
            let path = foliage_output_path(&primary, &group.base, operation);
            save(outcome, group, operation, &image, path);
        }
        Err(e) => fail(outcome, group, operation, e.to_string()),
    }
}

/// Process one foliage group: `_DA`, `_NRS`, and for Trunk groups `_DAO` and
/// `_NR`. The caller has already applied the Leaf/Trunk keyword filter.
pub fn process_foliage_group(group: &AssetGroup) -> GroupOutcome {
    let mut outcome = GroupOutcome::default();

    run_foliage_merge(
        &mut outcome,
        group,
        "_DA",
        TextureKind::Diffuse,
        TextureKind::Alpha,
        ops::merge_da,
    );

    if let Some([n_path, r_path, s_path]) = require(
        &mut outcome,
        group,
        "_NRS",
        [
            TextureKind::Normal,
            TextureKind::Roughness,
            TextureKind::Specular,
        ],
    ) {
        let (n_path, r_path, s_path) =
            (n_path.to_path_buf(), r_path.to_path_buf(), s_path.to_path_buf());
        match (load(&n_path), load(&r_path), load(&s_path)) {
            (Ok(n), Ok(r), Ok(s)) => match ops::merge_nrs(&n, &r, &s) {
                Ok(image) => {
                    let path = foliage_output_path(&n_path, &group.base, "_NRS");
                    save(&mut outcome, group, "_NRS", &image, path);
                }
                Err(e) => fail(&mut outcome, group, "_NRS", e.to_string()),
            },
            (n, r, s) => {
                let msg = [n.err(), r.err(), s.err()]
                    .into_iter()
                    .flatten()
                    .next()
                    .expect("at least one load failed");
                fail(&mut outcome, group, "_NRS", msg);
            }
        }
    }

    if group.base.contains("Trunk") {
        run_foliage_merge(
            &mut outcome,
            group,
            "_DAO",
            TextureKind::Diffuse,
            TextureKind::AmbientOcclusion,
            ops::merge_da,
        );
        run_foliage_merge(
            &mut outcome,
            group,
            "_NR",
            TextureKind::Normal,
            TextureKind::Roughness,
            ops::merge_nr,
        );
    }

    outcome
}

/// Resolve the UniqueMask input for a packed group. The grouped `_UniqueMask`
/// member wins; otherwise the directory is searched for a stem spelled
/// without the underscore, then `<base>_UniqueMask.tga` is probed directly.
fn resolve_unique_mask(group: &AssetGroup, dir: &Path) -> Option<PathBuf> {
    if let Some(path) = group.member(TextureKind::UniqueMask) {
        return Some(path.to_path_buf());
    }

    let fused_stem = format!("{}UniqueMask", group.base);
    if let Ok(entries) = std::fs::read_dir(dir) {
        let mut hits: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file() && p.file_stem().and_then(|s| s.to_str()) == Some(fused_stem.as_str())
            })
            .collect();
        hits.sort();
        if let Some(hit) = hits.into_iter().next() {
            return Some(hit);
        }
    }

    let probe = dir.join(format!("{}_UniqueMask.tga", group.base));
    probe.exists().then_some(probe)
}

/// Process one packed-PBR group: `_DM`, `_ORS`, `_N`, and the
/// `_S`/`_SpecialMask` step. Outputs are written into `dir` alongside the
/// inputs.
pub fn process_packed_group(group: &AssetGroup, dir: &Path) -> GroupOutcome {
    let mut outcome = GroupOutcome::default();
    let output_path =
        |suffix: &str| -> PathBuf { dir.join(format!("{}{}.tga", group.base, suffix)) };

    // _DM and _ORS both consume C + MRA, each with a fresh load.
    for (operation, op) in [
        ("_DM", ops::merge_dm as fn(&Image, &Image) -> Result<Image, RecombineError>),
        ("_ORS", ops::make_ors),
    ] {
        let Some([c_path, mra_path]) = require(
            &mut outcome,
            group,
            operation,
            [TextureKind::Color, TextureKind::Mra],
        ) else {
            continue;
        };
        let (c_path, mra_path) = (c_path.to_path_buf(), mra_path.to_path_buf());

        let c = match load(&c_path) {
            Ok(img) => img,
            Err(msg) => {
                fail(&mut outcome, group, operation, msg);
                continue;
            }
        };
        let mra = match load(&mra_path) {
            Ok(img) => img,
            Err(msg) => {
                fail(&mut outcome, group, operation, msg);
                continue;
            }
        };

        match op(&c, &mra) {
            Ok(image) => save(&mut outcome, group, operation, &image, output_path(operation)),
            Err(e) => fail(&mut outcome, group, operation, e.to_string()),
        }
    }

    if let Some([nce_path]) = require(&mut outcome, group, "_N", [TextureKind::Nce]) {
        let nce_path = nce_path.to_path_buf();
        match load(&nce_path) {
            Ok(nce) => {
                let image = ops::make_n(&nce);
                save(&mut outcome, group, "_N", &image, output_path("_N"));
            }
            Err(msg) => fail(&mut outcome, group, "_N", msg),
        }
    }

    if let Some([nce_path]) = require(&mut outcome, group, "_SpecialMask", [TextureKind::Nce]) {
        let nce_path = nce_path.to_path_buf();
        match load(&nce_path) {
            Ok(nce) => {
                if let Some(s) = ops::make_s(&nce) {
                    save(&mut outcome, group, "_S", &s, output_path("_S"));
                }

                // An unusable mask degrades to the documented defaults
                // instead of failing the step.
                let mask = resolve_unique_mask(group, dir).and_then(|path| match load(&path) {
                    Ok(mask) if mask.same_dimensions(&nce) => Some(mask),
                    Ok(mask) => {
                        outcome.warnings.push(format!(
                            "{}: UniqueMask {} is {}x{} but NCE is {}x{}; using defaults",
                            group.base,
                            path.display(),
                            mask.width(),
                            mask.height(),
                            nce.width(),
                            nce.height(),
                        ));
                        None
                    }
                    Err(msg) => {
                        outcome
                            .warnings
                            .push(format!("{}: {}; using defaults", group.base, msg));
                        None
                    }
                });

                let image = ops::make_special_mask(&nce, mask.as_ref());
                save(
                    &mut outcome,
                    group,
                    "_SpecialMask",
                    &image,
                    output_path("_SpecialMask"),
                );
            }
            Err(msg) => fail(&mut outcome, group, "_SpecialMask", msg),
        }
    }

    outcome
}
