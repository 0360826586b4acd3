//! Filename-suffix classification.
//!
//! Each filename stem is classified into a [`TextureKind`] plus a base key
//! (the stem minus the suffix) via a longest-suffix-first lookup over the
//! tool's suffix set. Unrecognized stems classify as `None` and never join
//! an asset group.

/// Asset-type marker carried by a texture filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureKind {
    // Foliage set
    Diffuse,
    Alpha,
    Normal,
    Roughness,
    Specular,
    AmbientOcclusion,
    // Packed-PBR set
    Color,
    Mra,
    Nce,
    UniqueMask,
}

impl TextureKind {
    /// The filename suffix this kind is recognized by.
    pub fn suffix(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "_D",
            TextureKind::Alpha => "_A",
            TextureKind::Normal => "_N",
            TextureKind::Roughness => "_R",
            TextureKind::Specular => "_S",
            TextureKind::AmbientOcclusion => "_AO",
            TextureKind::Color => "_C",
            TextureKind::Mra => "_MRA",
            TextureKind::Nce => "_NCE",
            TextureKind::UniqueMask => "_UniqueMask",
        }
    }
}

impl std::fmt::Display for TextureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Which tool's suffix vocabulary to classify against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixSet {
    /// Foliage merge set: `_D`, `_A`, `_N`, `_R`, `_S`, `_AO`.
    Foliage,
    /// Packed-PBR set: `_C`, `_MRA`, `_NCE`, `_UniqueMask`.
    Packed,
}

impl SuffixSet {
    /// Recognized suffixes, longest first so `_AO` wins over `_A`.
    fn table(self) -> &'static [TextureKind] {
        match self {
            SuffixSet::Foliage => &[
                TextureKind::AmbientOcclusion,
                TextureKind::Diffuse,
                TextureKind::Alpha,
                TextureKind::Normal,
                TextureKind::Roughness,
                TextureKind::Specular,
            ],
            SuffixSet::Packed => &[
                TextureKind::UniqueMask,
                TextureKind::Mra,
                TextureKind::Nce,
                TextureKind::Color,
            ],
        }
    }
}

/// Classify a filename stem into its base key and texture kind.
///
/// Returns `None` for stems that carry no recognized suffix, or where
/// stripping the suffix would leave an empty base key.
pub fn classify_stem(stem: &str, set: SuffixSet) -> Option<(&str, TextureKind)> {
    for &kind in set.table() {
        if let Some(base) = stem.strip_suffix(kind.suffix()) {
            if base.is_empty() {
                return None;
            }
            return Some((base, kind));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_foliage_suffixes() {
        assert_eq!(
            classify_stem("Leaf01_D", SuffixSet::Foliage),
            Some(("Leaf01", TextureKind::Diffuse))
        );
        assert_eq!(
            classify_stem("Leaf01_A", SuffixSet::Foliage),
            Some(("Leaf01", TextureKind::Alpha))
        );
        assert_eq!(
            classify_stem("Trunk02_N", SuffixSet::Foliage),
            Some(("Trunk02", TextureKind::Normal))
        );
        assert_eq!(
            classify_stem("Trunk02_R", SuffixSet::Foliage),
            Some(("Trunk02", TextureKind::Roughness))
        );
        assert_eq!(
            classify_stem("Trunk02_S", SuffixSet::Foliage),
            Some(("Trunk02", TextureKind::Specular))
        );
    }

    #[test]
    fn test_ao_wins_over_a() {
        assert_eq!(
            classify_stem("Trunk02_AO", SuffixSet::Foliage),
            Some(("Trunk02", TextureKind::AmbientOcclusion))
        );
    }

    #[test]
    fn test_packed_suffixes() {
        assert_eq!(
            classify_stem("Rifle_C", SuffixSet::Packed),
            Some(("Rifle", TextureKind::Color))
        );
        assert_eq!(
            classify_stem("Rifle_MRA", SuffixSet::Packed),
            Some(("Rifle", TextureKind::Mra))
        );
        assert_eq!(
            classify_stem("Rifle_NCE", SuffixSet::Packed),
            Some(("Rifle", TextureKind::Nce))
        );
        assert_eq!(
            classify_stem("Rifle_UniqueMask", SuffixSet::Packed),
            Some(("Rifle", TextureKind::UniqueMask))
        );
    }

    #[test]
    fn test_sets_do_not_cross_classify() {
        assert_eq!(classify_stem("Rifle_MRA", SuffixSet::Foliage), None);
        assert_eq!(classify_stem("Leaf01_D", SuffixSet::Packed), None);
    }

    #[test]
    fn test_unrecognized_stems() {
        assert_eq!(classify_stem("Rock01_DA", SuffixSet::Foliage), None);
        assert_eq!(classify_stem("readme", SuffixSet::Foliage), None);
        assert_eq!(classify_stem("_D", SuffixSet::Foliage), None);
    }
}
