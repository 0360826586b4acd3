//! TexFuse CLI library.
//!
//! This crate provides the command implementations behind the `texfuse`
//! binary: batch foliage merging, recursive packed-PBR conversion, and
//! single-file alpha normalization, plus the JSON run report.

pub mod commands;
pub mod report;
