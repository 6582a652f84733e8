use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use indicatif::{HumanBytes, HumanCount};
use log::{error, info};
use serde::Serialize;

use crate::resolver::Duplicate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct DisposeReport {
    pub deleted: usize,
    pub bytes_freed: u64,
    pub failures: Vec<DeleteFailure>,
}

/// Deletes every duplicate when `commit` is set, otherwise prints what
/// would be deleted. A failed deletion is logged and does not stop the rest.
pub fn dispose(duplicates: &[Duplicate], commit: bool) -> DisposeReport {
    let mut report = DisposeReport::default();

    for dupe in duplicates {
        if !commit {
            println!("{} {}", "delete preview:".cyan(), dupe.path.display());
            continue;
        }

        println!("{} {}", "deleting:".red(), dupe.path.display());
        match fs::remove_file(&dupe.path) {
            Ok(()) => {
                report.deleted += 1;
                report.bytes_freed += dupe.size;
            }
            Err(e) => {
                error!("  delete failed for '{}': {}", dupe.path.display(), e);
                report.failures.push(DeleteFailure {
                    path: dupe.path.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if commit {
        info!(
            "Deleted {} files ({}), {} failures",
            HumanCount(report.deleted as u64),
            HumanBytes(report.bytes_freed),
            report.failures.len()
        );
    }
    report
}
