//! Discovery, per-file relocation, and conflict policy.

use crate::category::extract_category;
use crate::encode::destination_name;
use crate::error::{Error, Result};
use crate::fingerprint::Digest;
use crate::report::{FailureKind, FileOutcome, Report};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Moves category-tagged files into a flat, category-keyed layout.
///
/// One directory per observed category is created under the destination
/// root; each file lands there under its encoded original location. Every
/// discovered file is moved at most once, and an existing destination is
/// never overwritten.
#[derive(Debug)]
pub struct Relocator {
    dest_root: PathBuf,
}

impl Relocator {
    /// Create a relocator that builds category containers under `dest_root`.
    pub fn new<P: AsRef<Path>>(dest_root: P) -> Self {
        Self {
            dest_root: dest_root.as_ref().to_path_buf(),
        }
    }

    /// Relocate every regular file under `roots` whose leaf name satisfies
    /// `leaf_filter`.
    ///
    /// Discovery runs to completion before any file is moved, so files that
    /// land in category containers are never re-discovered even when the
    /// destination root lies inside a scanned root. Overlapping roots are
    /// de-duplicated by canonical path.
    ///
    /// Per-file failures (conflicts, unreadable files, categories that cannot
    /// name a directory) are recorded in the [`Report`] and do not abort the
    /// run. Only a root that cannot be read at all is fatal. There is no
    /// rollback: a failed run leaves already-moved files moved.
    pub fn reorganize<F>(&self, roots: &[PathBuf], leaf_filter: F) -> Result<Report>
    where
        F: Fn(&OsStr) -> bool,
    {
        let mut report = Report::default();
        let files = self.discover(roots, &leaf_filter, &mut report)?;

        for path in files {
            let outcome = self.relocate_one(&path);
            report.record(outcome);
        }

        Ok(report)
    }

    /// Enumerate matching regular files under all roots.
    ///
    /// Walk errors below a readable root are recorded as per-file I/O
    /// failures; an unreadable root itself is fatal.
    fn discover<F>(
        &self,
        roots: &[PathBuf],
        leaf_filter: &F,
        report: &mut Report,
    ) -> Result<Vec<PathBuf>>
    where
        F: Fn(&OsStr) -> bool,
    {
        let mut files = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for root in roots {
            fs::read_dir(root).map_err(|e| Error::root_unreadable(root, e))?;

            let walker = ignore::WalkBuilder::new(root)
                .standard_filters(false)
                .build();

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        report.record(FileOutcome::Failed {
                            path: walk_error_path(&err, root),
                            kind: FailureKind::Io {
                                reason: err.to_string(),
                            },
                        });
                        continue;
                    }
                };

                if !entry.file_type().is_some_and(|t| t.is_file()) {
                    continue;
                }
                if !leaf_filter(entry.file_name()) {
                    continue;
                }

                let path = entry.path();
                let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
                if seen.insert(canonical) {
                    files.push(path.to_path_buf());
                }
            }
        }

        Ok(files)
    }

    /// Process one discovered file: extract, encode, move.
    fn relocate_one(&self, path: &Path) -> FileOutcome {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(err) => return failed_io(path, &err),
        };

        let raw = match extract_category(file) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return FileOutcome::SkippedNoCategory {
                    path: path.to_path_buf(),
                };
            }
            Err(err) => return failed_io(path, &err),
        };

        let category = match validate_category(&raw) {
            Ok(category) => category,
            Err(reason) => {
                return FileOutcome::Failed {
                    path: path.to_path_buf(),
                    kind: FailureKind::InvalidCategory { reason },
                };
            }
        };

        // Prefix encodes the full original directory, not a root-relative one,
        // so the destination is reconstructible from the original path alone.
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let Some(leaf) = path.file_name() else {
            return FileOutcome::Failed {
                path: path.to_path_buf(),
                kind: FailureKind::Io {
                    reason: "path has no file name".to_string(),
                },
            };
        };

        let container = self.dest_root.join(&category);
        if let Err(err) = fs::create_dir_all(&container) {
            // InvalidInput means the category value itself is at fault
            let kind = if err.kind() == io::ErrorKind::InvalidInput {
                FailureKind::InvalidCategory {
                    reason: err.to_string(),
                }
            } else {
                FailureKind::Io {
                    reason: err.to_string(),
                }
            };
            return FileOutcome::Failed {
                path: path.to_path_buf(),
                kind,
            };
        }

        let dest = container.join(destination_name(dir, leaf));

        // rename() would silently replace an existing destination; the check
        // runs just before the move in this single-threaded reference model.
        if dest.symlink_metadata().is_ok() {
            return FileOutcome::Failed {
                path: path.to_path_buf(),
                kind: FailureKind::DestinationConflict { destination: dest },
            };
        }

        match move_file(path, &dest) {
            Ok(()) => FileOutcome::Moved {
                from: path.to_path_buf(),
                to: dest,
            },
            Err(err) => failed_io(path, &err),
        }
    }
}

/// Path of the entry a walk error is about, falling back to the root when
/// the error carries no path of its own.
fn walk_error_path(err: &ignore::Error, root: &Path) -> PathBuf {
    match err {
        ignore::Error::WithPath { path, .. } => path.clone(),
        ignore::Error::WithDepth { err, .. } => walk_error_path(err, root),
        ignore::Error::WithLineNumber { err, .. } => walk_error_path(err, root),
        _ => root.to_path_buf(),
    }
}

fn failed_io(path: &Path, err: &dyn std::fmt::Display) -> FileOutcome {
    FileOutcome::Failed {
        path: path.to_path_buf(),
        kind: FailureKind::Io {
            reason: err.to_string(),
        },
    }
}

/// Validate a raw category value as a single path component.
///
/// Any non-empty string is a valid category; the only rejections are values
/// that cannot name exactly one directory on the host filesystem.
fn validate_category(raw: &[u8]) -> std::result::Result<String, String> {
    let category = std::str::from_utf8(raw)
        .map_err(|_| "not valid UTF-8".to_string())?
        .to_string();

    if category.contains(['/', '\\']) {
        return Err("contains a path separator".to_string());
    }
    if category.contains('\0') {
        return Err("contains a NUL byte".to_string());
    }
    if category == "." || category == ".." {
        return Err("reserved directory name".to_string());
    }

    Ok(category)
}

/// Move a file, falling back to copy-verify-delete across filesystems.
fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            copy_verify_remove(src, dest)
        }
        Err(err) => Err(err.into()),
    }
}

/// Cross-device move: copy into a temp file beside the destination, verify
/// the copy by digest, persist without clobbering, then delete the source.
///
/// The source is removed only after the destination is durably in place; any
/// earlier failure leaves the source untouched and no partial destination
/// visible.
fn copy_verify_remove(src: &Path, dest: &Path) -> Result<()> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;

    let mut reader = fs::File::open(src)?;
    io::copy(&mut reader, &mut temp_file)?;
    temp_file.as_file().sync_all()?;

    let src_digest = Digest::of_reader(fs::File::open(src)?)?;
    let copy_digest = Digest::of_reader(fs::File::open(temp_file.path())?)?;
    if src_digest != copy_digest {
        return Err(Error::Io {
            source: io::Error::other(format!(
                "copy verification failed: expected {}, got {}",
                src_digest, copy_digest
            )),
        });
    }

    temp_file.persist_noclobber(dest)?;
    fs::remove_file(src)?;
    Ok(())
}

/// Byte-wise leaf-name suffix match.
///
/// Operates on raw bytes where the platform allows, so filenames that are
/// not valid UTF-8 still match a plain-ASCII suffix like `.txt`.
#[cfg(unix)]
pub fn has_suffix(leaf: &OsStr, suffix: &str) -> bool {
    use std::os::unix::ffi::OsStrExt;
    leaf.as_bytes().ends_with(suffix.as_bytes())
}

/// Byte-wise leaf-name suffix match (non-Unix fallback).
#[cfg(not(unix))]
pub fn has_suffix(leaf: &OsStr, suffix: &str) -> bool {
    leaf.to_string_lossy().ends_with(suffix)
}
