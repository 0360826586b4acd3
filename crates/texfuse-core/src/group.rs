//! Suffix-based asset grouping.
//!
//! An [`AssetGroup`] is a transient grouping computed from a file listing; it
//! owns no files, only paths. Within a group each texture kind maps to at
//! most one path; when duplicates classify into the same slot the
//! lexicographically later path wins (input paths are sorted first, so
//! grouping is deterministic regardless of listing order).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::classify::{classify_stem, SuffixSet, TextureKind};

/// A set of texture files sharing a base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetGroup {
    /// Filename stem with the recognized suffix stripped.
    pub base: String,
    /// One path per recognized texture kind.
    pub members: BTreeMap<TextureKind, PathBuf>,
}

impl AssetGroup {
    /// Path of the member with the given kind, if present.
    pub fn member(&self, kind: TextureKind) -> Option<&Path> {
        self.members.get(&kind).map(PathBuf::as_path)
    }
}

/// Group file paths by base key under the given suffix set.
///
/// Paths whose stems carry no recognized suffix are ignored. Groups are
/// returned sorted by base key.
pub fn group_paths(paths: &[PathBuf], set: SuffixSet) -> Vec<AssetGroup> {
    let mut sorted: Vec<&PathBuf> = paths.iter().collect();
    sorted.sort();

    let mut groups: BTreeMap<String, BTreeMap<TextureKind, PathBuf>> = BTreeMap::new();
    for path in sorted {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((base, kind)) = classify_stem(stem, set) else {
            continue;
        };
        groups
            .entry(base.to_string())
            .or_default()
            .insert(kind, path.clone());
    }

    groups
        .into_iter()
        .map(|(base, members)| AssetGroup { base, members })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_groups_by_base_key() {
        let input = paths(&[
            "art/Leaf01_D.tga",
            "art/Leaf01_A.tga",
            "art/Trunk02_N.tga",
            "art/Trunk02_R.tga",
        ]);
        let groups = group_paths(&input, SuffixSet::Foliage);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].base, "Leaf01");
        assert_eq!(
            groups[0].member(TextureKind::Diffuse),
            Some(Path::new("art/Leaf01_D.tga"))
        );
        assert_eq!(
            groups[0].member(TextureKind::Alpha),
            Some(Path::new("art/Leaf01_A.tga"))
        );
        assert_eq!(groups[1].base, "Trunk02");
        assert_eq!(groups[1].member(TextureKind::Diffuse), None);
    }

    #[test]
    fn test_unrecognized_files_are_ignored() {
        let input = paths(&["art/Rock01_D.tga", "art/notes.txt", "art/Leaf_DA.tga"]);
        let groups = group_paths(&input, SuffixSet::Foliage);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].base, "Rock01");
    }

    #[test]
    fn test_duplicate_slot_later_path_wins() {
        let input = paths(&["b/Leaf01_D.tga", "a/Leaf01_D.tga"]);
        let groups = group_paths(&input, SuffixSet::Foliage);
        assert_eq!(
            groups[0].member(TextureKind::Diffuse),
            Some(Path::new("b/Leaf01_D.tga"))
        );
    }

    #[test]
    fn test_packed_grouping() {
        let input = paths(&[
            "w/Rifle_C.tga",
            "w/Rifle_MRA.tga",
            "w/Rifle_NCE.tga",
            "w/Rifle_UniqueMask.tga",
        ]);
        let groups = group_paths(&input, SuffixSet::Packed);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].base, "Rifle");
        assert_eq!(groups[0].members.len(), 4);
    }
}
