use std::path::PathBuf;

use colored::Colorize;
use indicatif::{HumanBytes, HumanCount};
use serde::Serialize;

use crate::disposer::{DeleteFailure, DisposeReport};
use crate::policy::RetentionPolicy;
use crate::resolver::{Duplicate, HashCollision, Resolution};
use crate::scanner::ScanOutcome;

/// Everything a run found and did, for `--json` output.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub root: PathBuf,
    pub committed: bool,
    pub paranoid: bool,
    pub policy: RetentionPolicy,
    pub files_found: usize,
    pub files_hashed: usize,
    pub skipped_entries: Vec<PathBuf>,
    pub uniquely_sized_files: usize,
    pub filesize_savings: u64,
    pub duplicates: Vec<Duplicate>,
    pub collisions: Vec<HashCollision>,
    pub deleted: usize,
    pub delete_failures: Vec<DeleteFailure>,
}

impl RunSummary {
    pub fn new(
        root: PathBuf,
        policy: RetentionPolicy,
        committed: bool,
        paranoid: bool,
        scan: &ScanOutcome,
        resolution: Resolution,
        disposal: Option<DisposeReport>,
    ) -> Self {
        let report = disposal.unwrap_or_default();
        Self {
            root,
            committed,
            paranoid,
            policy,
            files_found: scan.files_found,
            files_hashed: scan.store.hashed_files(),
            skipped_entries: scan.skipped_entries.clone(),
            uniquely_sized_files: resolution.uniquely_sized_files,
            filesize_savings: resolution.filesize_savings,
            duplicates: resolution.duplicates,
            collisions: resolution.collisions,
            deleted: report.deleted,
            delete_failures: report.failures,
        }
    }
}

/// Prints the resolve-stage totals in the same words as the run log.
pub fn print_resolution(resolution: &Resolution) {
    println!(
        "Files with unique sizes: {}",
        HumanCount(resolution.uniquely_sized_files as u64)
    );
    if resolution.duplicates.is_empty() {
        println!("{}", "No duplicates found".green());
    } else {
        println!(
            "Duplicates ready to delete: {} for savings of {}",
            HumanCount(resolution.duplicates.len() as u64),
            HumanBytes(resolution.filesize_savings)
        );
    }
    if !resolution.collisions.is_empty() {
        println!(
            "{}",
            format!("Hash collisions skipped: {}", resolution.collisions.len()).yellow()
        );
    }
}
