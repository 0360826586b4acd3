//! CLI command implementations

pub mod foliage;
pub mod normalize_alpha;
pub mod repack;

mod reporting;
