use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, error, info};

use find_dupes::logging::init_logging;
use find_dupes::summary::print_resolution;
use find_dupes::{
    Cli, ResolveOptions, RetentionPolicy, RunSummary, StageTimer, dispose, format_human_elapsed,
    resolve, scan,
};

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse_normalized(std::env::args_os());

    init_logging(cli.verbose).context("Failed to initialize logging")?;

    info!("Starting find-dupes v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command line arguments: {:?}", cli);

    if !cli.directory.is_dir() {
        error!("Invalid directory specified: '{}'", cli.directory.display());
        anyhow::bail!("Invalid directory specified: '{}'", cli.directory.display());
    }

    let absolute_path = cli
        .directory
        .canonicalize()
        .with_context(|| format!("Failed to resolve path: '{}'", cli.directory.display()))?;
    info!("Target directory: '{}'", absolute_path.display());

    let policy = if cli.delete_markers.is_empty() {
        RetentionPolicy::default()
    } else {
        RetentionPolicy::with_delete_markers(cli.delete_markers.iter().cloned())
    };
    let rule_names: Vec<String> = policy.rules().iter().map(|rule| rule.name()).collect();
    debug!("Retention policy: {}", rule_names.join(", "));

    let outcome = {
        let _timer = StageTimer::start("Processing files");
        scan(&absolute_path)
            .with_context(|| format!("Failed to scan '{}'", absolute_path.display()))?
    };

    let options = ResolveOptions {
        paranoid: cli.paranoid,
        report: cli.report,
    };
    let resolution = {
        let _timer = StageTimer::start("Finding duplicates");
        resolve(&outcome.store, options, &policy).context("Failed to resolve duplicates")?
    };
    print_resolution(&resolution);

    let disposal = if resolution.duplicates.is_empty() {
        None
    } else {
        let _timer = StageTimer::start(if cli.delete {
            "Deleting duplicates"
        } else {
            "Reviewing duplicates"
        });
        Some(dispose(&resolution.duplicates, cli.delete))
    };

    if let Some(json_path) = &cli.json {
        let summary = RunSummary::new(
            absolute_path.clone(),
            policy,
            cli.delete,
            cli.paranoid,
            &outcome,
            resolution,
            disposal,
        );
        let file = File::create(json_path)
            .with_context(|| format!("Failed to create '{}'", json_path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .with_context(|| format!("Failed to write '{}'", json_path.display()))?;
        info!("Run summary written to '{}'", json_path.display());
    }

    info!(
        "Total operation time {}",
        format_human_elapsed(start_time.elapsed())
    );
    Ok(())
}
