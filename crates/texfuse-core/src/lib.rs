//! TexFuse Texture Recombination Engine
//!
//! This crate implements the channel recombination rules used by the TexFuse
//! batch tools: merging foliage texture sets (`_D`/`_A`/`_N`/`_R`/`_S`/`_AO`)
//! into packed outputs, converting packed-PBR weapon sets
//! (`_C`/`_MRA`/`_NCE`/`_UniqueMask`) into engine-facing textures, and
//! rescaling alpha channels to span the full [0, 1] range.
//!
//! All operations are single-pass, deterministic transforms over in-memory
//! 8-bit raster images. Images are loaded fresh per operation, transformed,
//! written to a new TGA file, and discarded; inputs are never mutated on disk
//! (except by the alpha normalizer, which backs up the original first).
//!
//! # Layers
//!
//! - [`image`]: the `Image` value type and `Channel` selector
//! - [`tga`]: codec boundary (decode to RGBA-ordered bytes, encode + hash)
//! - [`classify`] / [`group`]: suffix classification and asset grouping
//! - [`ops`]: the pure recombination operations
//! - [`alpha`]: the alpha-range normalization transform
//! - [`pipeline`]: per-group orchestration and skip/failure policy

pub mod alpha;
pub mod classify;
pub mod group;
pub mod image;
pub mod ops;
pub mod pipeline;
pub mod tga;

pub use alpha::{normalize_alpha_file, normalize_alpha_range, AlphaError, AlphaOutcome, AlphaStats};
pub use classify::{classify_stem, SuffixSet, TextureKind};
pub use group::{group_paths, AssetGroup};
pub use crate::image::{Channel, Image, ImageError};
pub use ops::RecombineError;
pub use pipeline::{
    process_foliage_group, process_packed_group, FailureRecord, GroupOutcome, OutputRecord,
    SkipRecord,
};
