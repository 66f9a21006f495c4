//! Batch command implementation.

use super::{load_config, CliError};
use indicatif::{ProgressBar, ProgressStyle};
use matchstate::{JsonReplay, Reconstructor};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Counts of what happened to each match in a batch.
#[derive(Debug, Default, Clone, Copy)]
struct BatchStats {
    written: u64,
    existing: u64,
    failed: u64,
}

impl BatchStats {
    fn merge(mut self, other: Self) -> Self {
        self.written += other.written;
        self.existing += other.existing;
        self.failed += other.failed;
        self
    }
}

enum Outcome {
    Written,
    Existing,
}

/// Report path for a replay dump.
fn report_path(out: &Path, replay: &Path) -> PathBuf {
    let stem = replay
        .file_stem()
        .map_or_else(|| "unknown".to_string(), |s| s.to_string_lossy().to_string());
    out.join(format!("{stem}.report.json"))
}

/// Replay dumps in a directory, sorted by path.
fn replay_files(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", dir.display())))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

fn process(reconstructor: &Reconstructor, replay: &Path, out: &Path) -> Result<Outcome, CliError> {
    let target = report_path(out, replay);
    if target.exists() {
        return Ok(Outcome::Existing);
    }

    let replay = reconstructor.load(&JsonReplay::new(replay))?;
    let report = reconstructor.report(&replay)?;
    let json = serde_json::to_string_pretty(&report)?;
    fs::write(&target, json)
        .map_err(|e| CliError::new(format!("Failed to write {}: {e}", target.display())))?;
    Ok(Outcome::Written)
}

/// Execute the batch command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the directories cannot be
/// used. Individual match failures are logged and counted.
pub(crate) fn execute(
    config: Option<PathBuf>,
    dir: PathBuf,
    out: PathBuf,
    threads: Option<usize>,
    progress: bool,
) -> Result<(), CliError> {
    let reconstructor = Reconstructor::new(load_config(config.as_deref())?)?;
    let files = replay_files(&dir)?;
    fs::create_dir_all(&out)
        .map_err(|e| CliError::new(format!("Failed to create {}: {e}", out.display())))?;

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} matches ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    info!(matches = files.len(), dir = %dir.display(), "starting batch");
    let start = Instant::now();

    let stats = files
        .par_iter()
        .fold(BatchStats::default, |mut local, path| {
            match process(&reconstructor, path, &out) {
                Ok(Outcome::Written) => local.written += 1,
                Ok(Outcome::Existing) => local.existing += 1,
                Err(e) => {
                    warn!(replay = %path.display(), error = %e, "skipping match");
                    local.failed += 1;
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(BatchStats::default, BatchStats::merge);

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    println!(
        "Processed {} matches in {:.2}s: {} written, {} already present, {} failed",
        files.len(),
        start.elapsed().as_secs_f64(),
        stats.written,
        stats.existing,
        stats.failed
    );

    Ok(())
}
