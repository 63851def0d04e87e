//! # Shelf Core
//!
//! Reorganizes a tree of text files into a flat, category-keyed layout and
//! produces a verifiable SHA-256 fingerprint of the result.
//!
//! Each file declares its category on a metadata line (`category: <value>`).
//! Files are moved into one directory per category, with their original
//! location flattened into the new filename, so two independent runs over the
//! same inputs can be proven identical by comparing fingerprints.
//!
//! ## Features
//!
//! - First-line category extraction (`category: <value>`)
//! - Collision-aware flat encoding of original directory paths
//! - Conflict-safe relocation: never overwrites, records every outcome
//! - Locale-independent tree fingerprint (byte-sorted paths, SHA-256)
//!
//! ## Example
//!
//! ```no_run
//! use shelf_core::{Relocator, fingerprint_tree, has_suffix};
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let relocator = Relocator::new(".");
//! let roots = vec![PathBuf::from("archive")];
//!
//! // Move every *.txt file into its category directory
//! let report = relocator.reorganize(&roots, |leaf| has_suffix(leaf, ".txt"))?;
//! println!("moved {} files", report.counts().moved);
//!
//! // Fingerprint the resulting tree
//! let digest = fingerprint_tree(Path::new("."))?;
//! println!("{}", digest);
//! # Ok(())
//! # }
//! ```

mod category;
mod encode;
mod error;
mod fingerprint;
mod relocate;
mod report;

pub use category::extract_category;
pub use encode::{JOIN_BYTE, destination_name, encoded_prefix};
pub use error::{Error, Result};
pub use fingerprint::{DIGEST_SIZE, Digest, fingerprint_tree};
pub use relocate::{Relocator, has_suffix};
pub use report::{Counts, FailureKind, FileOutcome, Report};
