use std::path::{Path, PathBuf};

use colored::Colorize;
use log::{debug, warn};
use serde::Serialize;

use crate::error::Result;
use crate::hasher::{Digest, files_identical};
use crate::policy::RetentionPolicy;
use crate::store::{SizeBucket, SizeBucketStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Re-read both files and compare bytes before trusting a digest match.
    pub paranoid: bool,
    /// Print each duplicate pairing as it is found.
    pub report: bool,
}

/// A file selected for removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub path: PathBuf,
    /// The copy that was being kept when `path` was marked.
    pub original: PathBuf,
    pub size: u64,
    pub digest: Digest,
}

/// Two files with equal size and digest but different content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashCollision {
    pub kept: PathBuf,
    pub skipped: PathBuf,
    pub digest: Digest,
}

#[derive(Debug, Default)]
pub struct Resolution {
    /// Files to remove, in discovery order.
    pub duplicates: Vec<Duplicate>,
    pub uniquely_sized_files: usize,
    pub filesize_savings: u64,
    pub collisions: Vec<HashCollision>,
}

/// Walks every digest list in `store` and decides which files are duplicates.
///
/// Within a list the first file starts as the kept candidate and every
/// later file is compared against whichever file is the candidate at that
/// point, so for three or more copies the result depends on scan order.
pub fn resolve(
    store: &SizeBucketStore,
    options: ResolveOptions,
    policy: &RetentionPolicy,
) -> Result<Resolution> {
    let mut resolution = Resolution::default();

    for (size, bucket) in store.iter() {
        let by_digest = match bucket {
            SizeBucket::Pending(_) => {
                resolution.uniquely_sized_files += 1;
                continue;
            }
            SizeBucket::Hashed(by_digest) => by_digest,
        };

        for (digest, files) in by_digest {
            let mut files = files.iter();
            let Some(mut keep) = files.next() else {
                continue;
            };

            for file in files {
                if options.paranoid && !files_identical(keep, file)? {
                    warn!("Hash collision: '{}' '{}'", keep.display(), file.display());
                    resolution.collisions.push(HashCollision {
                        kept: keep.clone(),
                        skipped: file.clone(),
                        digest: *digest,
                    });
                    continue;
                }

                resolution.filesize_savings += size;

                let (dupe, original) = if policy.prefers_challenger(keep, file) {
                    let previous = keep;
                    keep = file;
                    (previous, file)
                } else {
                    (file, keep)
                };

                debug!("'{}' is a duplicate of '{}'", dupe.display(), original.display());
                if options.report {
                    let [dupe_line, of_line] = pairing_lines(dupe, original);
                    println!("{}", dupe_line.yellow());
                    println!("{}", of_line.green());
                }

                resolution.duplicates.push(Duplicate {
                    path: dupe.clone(),
                    original: original.clone(),
                    size,
                    digest: *digest,
                });
            }
        }
    }

    Ok(resolution)
}

/// The two lines printed for a duplicate when reporting is on.
pub fn pairing_lines(dupe: &Path, original: &Path) -> [String; 2] {
    [
        format!("dupe: {}", dupe.display()),
        format!("  of: {}", original.display()),
    ]
}
