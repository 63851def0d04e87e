//! Flat encoding of original directory locations.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path};

/// Byte that replaces path separators in the encoded prefix.
pub const JOIN_BYTE: &str = "-";

/// Flatten a directory path into a single filename-safe token.
///
/// The segments of `dir` are joined with [`JOIN_BYTE`]; every other byte
/// passes through unchanged (spaces, accents, combining marks, embedded
/// dashes). Parent-dir components stay as literal `..` segments, so
/// `../data` and `data` encode distinctly. Root and current-dir components
/// contribute nothing, so a file located directly in a scanned root yields
/// an empty prefix.
///
/// The join byte is deliberately not escaped when it occurs inside a segment,
/// so two distinct paths can encode identically; that ambiguity surfaces as a
/// destination conflict during relocation, never as an overwrite.
pub fn encoded_prefix(dir: &Path) -> OsString {
    let mut out = OsString::new();
    for component in dir.components() {
        let segment = match component {
            Component::Normal(segment) => segment,
            Component::ParentDir => OsStr::new(".."),
            _ => continue,
        };
        if !out.is_empty() {
            out.push(JOIN_BYTE);
        }
        out.push(segment);
    }
    out
}

/// Compute the destination leaf name for a file at `dir`/`leaf`.
///
/// Returns `prefix-leaf`, degenerating to `leaf` alone when the encoded
/// prefix is empty (no stray leading join byte).
pub fn destination_name(dir: &Path, leaf: &OsStr) -> OsString {
    let mut name = encoded_prefix(dir);
    if !name.is_empty() {
        name.push(JOIN_BYTE);
    }
    name.push(leaf);
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_encode_nested_dir() {
        assert_eq!(encoded_prefix(Path::new("archive/2024")), "archive-2024");
    }

    #[test]
    fn test_encode_single_segment() {
        assert_eq!(encoded_prefix(Path::new("archive")), "archive");
    }

    #[test]
    fn test_encode_empty_dir() {
        assert_eq!(encoded_prefix(Path::new("")), "");
    }

    #[test]
    fn test_curdir_contributes_nothing() {
        assert_eq!(encoded_prefix(Path::new("./archive/2024")), "archive-2024");
    }

    #[test]
    fn test_parentdir_is_a_literal_segment() {
        assert_eq!(encoded_prefix(Path::new("../data")), "..-data");
        assert_ne!(
            encoded_prefix(Path::new("../data")),
            encoded_prefix(Path::new("data"))
        );
        assert_eq!(encoded_prefix(Path::new("a/../b")), "a-..-b");
    }

    #[test]
    fn test_absolute_path_has_no_leading_join() {
        assert_eq!(encoded_prefix(Path::new("/data/archive")), "data-archive");
    }

    #[test]
    fn test_spaces_and_unicode_pass_through() {
        assert_eq!(
            encoded_prefix(Path::new("my docs/caf\u{e9} notes")),
            "my docs-caf\u{e9} notes"
        );
    }

    #[test]
    fn test_embedded_dash_is_not_escaped() {
        // "a-b"/"c" and "a"/"b-c" collide by design; the relocator reports
        // the collision as a destination conflict.
        assert_eq!(encoded_prefix(Path::new("a-b/c")), "a-b-c");
        assert_eq!(encoded_prefix(Path::new("a/b-c")), "a-b-c");
    }

    #[test]
    fn test_destination_name_with_prefix() {
        let name = destination_name(Path::new("archive/2024"), OsStr::new("file17.txt"));
        assert_eq!(name, "archive-2024-file17.txt");
    }

    #[test]
    fn test_destination_name_empty_prefix() {
        let name = destination_name(Path::new(""), OsStr::new("file17.txt"));
        assert_eq!(name, "file17.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_segment_passes_through() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};

        let dir = PathBuf::from(OsString::from_vec(vec![b'a', 0x80, b'/', b'b']));
        let encoded = encoded_prefix(&dir);
        assert_eq!(encoded.as_bytes(), &[b'a', 0x80, b'-', b'b']);
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property 1: over join-byte-free segments the encoding splits back
        /// into the original segments, so it is injective on those paths.
        #[test]
        fn prop_dash_free_segments_round_trip(
            segments in prop::collection::vec("[a-z0-9_ ]{1,8}", 1..6)
        ) {
            let dir: PathBuf = segments.iter().collect();
            let encoded = encoded_prefix(&dir);
            let encoded = encoded.to_str().unwrap().to_string();
            let split: Vec<&str> = encoded.split('-').collect();
            prop_assert_eq!(split, segments);
        }

        /// Property 2: the encoded prefix never starts or ends with the join
        /// byte, so destination names never carry doubled separators.
        #[test]
        fn prop_no_stray_join_byte(
            segments in prop::collection::vec("[a-z0-9]{1,8}", 0..6)
        ) {
            let dir: PathBuf = segments.iter().collect();
            let encoded = encoded_prefix(&dir);
            let encoded = encoded.to_str().unwrap();
            prop_assert!(!encoded.starts_with('-'));
            prop_assert!(!encoded.ends_with('-'));
        }
    }
}
