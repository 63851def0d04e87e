//! Deterministic fingerprinting of the relocated tree.

use crate::error::{Error, Result};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Digest size in bytes (SHA-256 produces 256-bit hashes).
pub const DIGEST_SIZE: usize = 32;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Create a Digest from raw bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }

    /// Create a Digest from a hex string (64 hex characters).
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        if hex_str.len() != DIGEST_SIZE * 2 {
            return Err(Error::invalid_digest(format!(
                "Expected {} hex characters, got {}",
                DIGEST_SIZE * 2,
                hex_str.len()
            )));
        }

        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::invalid_digest(format!("Invalid hex: {}", e)))?;

        let mut digest = [0u8; DIGEST_SIZE];
        digest.copy_from_slice(&bytes);
        Ok(Digest(digest))
    }

    /// Convert to lowercase hex string (64 characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Digest raw bytes.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Digest(hasher.finalize().into())
    }

    /// Digest data from a reader.
    pub fn of_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut hasher = Sha256::new();
        std::io::copy(&mut reader, &mut hasher)?;
        Ok(Digest(hasher.finalize().into()))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Fingerprint every regular file under `root`.
///
/// Paths are taken exactly as the filesystem reports them (no normalization,
/// no case folding), sorted by pure byte value, and hashed as one
/// `\n`-terminated line each, in sort order. Byte-value ordering is the load-
/// bearing property: the same file set sorts identically regardless of host
/// locale, so two independent runs can be proven equal by comparing digests.
///
/// The digest is a pure function of the final path set; file contents and
/// timestamps do not participate.
pub fn fingerprint_tree(root: &Path) -> Result<Digest> {
    let mut paths: Vec<Vec<u8>> = Vec::new();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .build();

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_some_and(|t| t.is_file()) {
            paths.push(path_bytes(entry.path()));
        }
    }

    // Byte-value order, never locale collation
    paths.sort_unstable();

    let mut hasher = Sha256::new();
    for path in &paths {
        hasher.update(path);
        hasher.update(b"\n");
    }
    Ok(Digest(hasher.finalize().into()))
}

/// Raw bytes of a path as the filesystem reports them.
#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

/// Raw bytes of a path (non-Unix fallback).
#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fingerprint_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"alpha").unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("sub/b.txt"), b"beta").unwrap();

        let first = fingerprint_tree(temp_dir.path()).unwrap();
        let second = fingerprint_tree(temp_dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rename_changes_digest() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"alpha").unwrap();

        let before = fingerprint_tree(temp_dir.path()).unwrap();
        fs::rename(
            temp_dir.path().join("a.txt"),
            temp_dir.path().join("b.txt"),
        )
        .unwrap();
        let after = fingerprint_tree(temp_dir.path()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_content_change_keeps_digest() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"alpha").unwrap();

        let before = fingerprint_tree(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"completely different").unwrap();
        let after = fingerprint_tree(temp_dir.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_directories_do_not_participate() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), b"alpha").unwrap();

        let before = fingerprint_tree(temp_dir.path()).unwrap();
        fs::create_dir(temp_dir.path().join("empty")).unwrap();
        let after = fingerprint_tree(temp_dir.path()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_matches_reference_concatenation() {
        // The digest must equal SHA-256 over the byte-sorted, newline-
        // terminated path list, reproducing the reference pipeline.
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("z.txt"), b"z").unwrap();
        // 'é' starts with 0xc3, which sorts after 'z' (0x7a) in byte order
        // even though most locales collate it before
        fs::write(temp_dir.path().join("\u{e9}.txt"), b"e").unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&path_bytes(&temp_dir.path().join("z.txt")));
        expected.push(b'\n');
        expected.extend_from_slice(&path_bytes(&temp_dir.path().join("\u{e9}.txt")));
        expected.push(b'\n');

        let digest = fingerprint_tree(temp_dir.path()).unwrap();
        assert_eq!(digest, Digest::of_bytes(&expected));
    }

    #[test]
    fn test_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        let digest = fingerprint_tree(temp_dir.path()).unwrap();
        // SHA-256 of the empty byte sequence
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_of_bytes_known_value() {
        // SHA-256 of "hello world"
        assert_eq!(
            Digest::of_bytes(b"hello world").to_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_of_reader_matches_of_bytes() {
        let data = b"some longer payload for the reader path";
        let from_reader = Digest::of_reader(&data[..]).unwrap();
        assert_eq!(from_reader, Digest::of_bytes(data));
    }

    #[test]
    fn test_from_hex_roundtrip() {
        let original = Digest::of_bytes(b"test data");
        let parsed = Digest::from_hex(&original.to_hex()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_hex_invalid_length() {
        assert!(Digest::from_hex("abcd").is_err());
        assert!(Digest::from_hex("").is_err());
    }

    #[test]
    fn test_from_hex_invalid_chars() {
        let invalid = "z".repeat(64);
        assert!(Digest::from_hex(&invalid).is_err());
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            max_shrink_iters: 10000,
            ..ProptestConfig::default()
        })]

        /// Property 1: digesting the same data always produces the same digest
        #[test]
        fn prop_digest_deterministic(data: Vec<u8>) {
            prop_assert_eq!(Digest::of_bytes(&data), Digest::of_bytes(&data));
        }

        /// Property 2: hex encoding is bijective
        #[test]
        fn prop_hex_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
            let digest = Digest::from_bytes(bytes);
            let parsed = Digest::from_hex(&digest.to_hex())?;
            prop_assert_eq!(digest, parsed);
        }

        /// Property 3: invalid hex length always fails
        #[test]
        fn prop_invalid_hex_length_fails(
            s in "[0-9a-f]{0,63}|[0-9a-f]{65,128}"
        ) {
            prop_assert!(Digest::from_hex(&s).is_err());
        }
    }
}
