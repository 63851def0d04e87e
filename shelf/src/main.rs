use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shelf_core::{Digest, FailureKind, FileOutcome, Relocator, fingerprint_tree, has_suffix};
use std::path::{Path, PathBuf};

mod output;

use output::{FingerprintOutput, OutputWriter, RunOutput, VerifyOutput};

/// Shelf - deterministic category-keyed file relocation
#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Reorganize tagged text files into category directories", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relocate matching files into category containers
    Run {
        /// Root directories to scan
        #[arg(required = true)]
        roots: Vec<PathBuf>,

        /// Only process files whose name ends with this suffix
        #[arg(long, default_value = ".txt")]
        suffix: String,

        /// Destination root for category containers
        #[arg(long, default_value = ".")]
        dest: PathBuf,

        /// Skip the final tree fingerprint
        #[arg(long)]
        no_fingerprint: bool,
    },

    /// Fingerprint all regular files under a root
    Fingerprint {
        /// Root directory to fingerprint
        root: PathBuf,
    },

    /// Recompute a tree fingerprint and compare it to an expected digest
    Verify {
        /// Root directory to fingerprint
        root: PathBuf,

        /// Expected digest (64 lowercase hex characters)
        digest: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.json);

    let result = match cli.command {
        Commands::Run {
            roots,
            suffix,
            dest,
            no_fingerprint,
        } => cmd_run(&writer, &roots, &suffix, &dest, no_fingerprint),
        Commands::Fingerprint { root } => cmd_fingerprint(&writer, &root),
        Commands::Verify { root, digest } => cmd_verify(&writer, &root, &digest),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            writer.write_error(&error);
            std::process::exit(1);
        }
    }
}

fn cmd_run(
    writer: &OutputWriter,
    roots: &[PathBuf],
    suffix: &str,
    dest: &Path,
    no_fingerprint: bool,
) -> Result<i32> {
    let relocator = Relocator::new(dest);
    let report = relocator
        .reorganize(roots, |leaf| has_suffix(leaf, suffix))
        .context("Reorganize failed")?;

    let fingerprint = if no_fingerprint {
        None
    } else {
        let digest = fingerprint_tree(dest)
            .with_context(|| format!("Failed to fingerprint {}", dest.display()))?;
        Some(digest.to_hex())
    };

    let counts = report.counts();
    let data = RunOutput {
        success: true,
        counts,
        outcomes: report.outcomes().to_vec(),
        fingerprint: fingerprint.clone(),
    };

    writer.write(&data, || {
        let mut text = String::new();
        text.push_str(&format!(
            "moved: {}\nskipped (no category): {}\nfailed (conflict): {}\nfailed (invalid category): {}\nfailed (io): {}\n",
            counts.moved,
            counts.skipped_no_category,
            counts.failed_conflict,
            counts.failed_invalid_category,
            counts.failed_io,
        ));
        for outcome in report.failures() {
            if let FileOutcome::Failed { path, kind } = outcome {
                let reason = match kind {
                    FailureKind::DestinationConflict { destination } => {
                        format!("destination already exists: {}", destination.display())
                    }
                    FailureKind::InvalidCategory { reason } => {
                        format!("invalid category: {}", reason)
                    }
                    FailureKind::Io { reason } => reason.clone(),
                };
                text.push_str(&format!("failed {}: {}\n", path.display(), reason));
            }
        }
        if let Some(digest) = &fingerprint {
            text.push_str(&format!("fingerprint: {}\n", digest));
        }
        text
    })?;

    // Per-file failures are reported, not fatal
    Ok(0)
}

fn cmd_fingerprint(writer: &OutputWriter, root: &Path) -> Result<i32> {
    let digest = fingerprint_tree(root)
        .with_context(|| format!("Failed to fingerprint {}", root.display()))?;

    let data = FingerprintOutput {
        success: true,
        digest: digest.to_hex(),
    };
    writer.write(&data, || format!("{}\n", digest))?;

    Ok(0)
}

fn cmd_verify(writer: &OutputWriter, root: &Path, expected_str: &str) -> Result<i32> {
    let expected =
        Digest::from_hex(expected_str).with_context(|| format!("Invalid digest: {}", expected_str))?;

    let actual = fingerprint_tree(root)
        .with_context(|| format!("Failed to fingerprint {}", root.display()))?;

    let matched = actual == expected;
    let data = VerifyOutput {
        success: matched,
        expected: expected.to_hex(),
        actual: actual.to_hex(),
        matched,
    };

    writer.write(&data, || {
        if matched {
            format!("OK {}\n", actual)
        } else {
            format!("MISMATCH expected {} actual {}\n", expected, actual)
        }
    })?;

    Ok(if matched { 0 } else { 1 })
}
