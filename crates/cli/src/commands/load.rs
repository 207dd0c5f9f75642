//! Read files through the async loader.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use pienoon_loader::{AsyncLoader, FileResource, FileStatus, LoaderConfig};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::output;

/// Sleep between finalize attempts.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    bytes: Option<usize>,
    error: Option<String>,
}

impl FileReport {
    fn new(resource: &FileResource) -> Self {
        let path = resource.path().display().to_string();
        match resource.status() {
            FileStatus::Ready(bytes) => Self {
                path,
                bytes: Some(bytes),
                error: None,
            },
            FileStatus::Failed(message) => Self {
                path,
                bytes: None,
                error: Some(message),
            },
            other => Self {
                path,
                bytes: None,
                error: Some(format!("not finalized: {other:?}")),
            },
        }
    }
}

/// Execute the load command.
pub fn execute(
    files: &[PathBuf],
    config: LoaderConfig,
    timeout: Duration,
    json: bool,
) -> Result<()> {
    if files.is_empty() {
        return Err(CliError::ValidationError("no files given".to_string()).into());
    }

    let mut loader = AsyncLoader::with_config(config);
    let resources: Vec<Arc<FileResource>> =
        files.iter().map(|path| Arc::new(FileResource::new(path))).collect();
    for resource in &resources {
        loader.queue_job(Arc::clone(resource) as _);
    }

    let started = Instant::now();
    loader.start_loading().map_err(CliError::from)?;
    loader.stop_loading_when_complete();

    let mut polls = 0u64;
    while !loader.try_finalize() {
        if started.elapsed() > timeout {
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
            warn!(timeout_ms, polls, "giving up on the loader worker");
            // A load that never returns would block a joining drop forever.
            loader.detach();
            return Err(CliError::Timeout(timeout_ms).into());
        }
        polls += 1;
        thread::sleep(POLL_INTERVAL);
    }
    loader.shutdown().map_err(CliError::from)?;
    let elapsed = started.elapsed();
    debug!(polls, "finalize loop done");

    let stats = loader.stats();
    let reports: Vec<FileReport> = resources.iter().map(|r| FileReport::new(r)).collect();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    let total_bytes: usize = reports.iter().filter_map(|r| r.bytes).sum();
    info!(files = reports.len(), failed, total_bytes, ?elapsed, "load complete");

    if json {
        output::print_json(&json!({
            "success": failed == 0,
            "files": reports,
            "total_bytes": total_bytes,
            "elapsed_ms": elapsed.as_secs_f64() * 1000.0,
            "stats": stats,
        }))?;
    } else {
        output::heading("Files");
        for report in &reports {
            match (&report.bytes, &report.error) {
                (Some(bytes), _) => {
                    println!("  {} {} ({} bytes)", output::mark(true), report.path, bytes);
                }
                (None, error) => println!(
                    "  {} {} ({})",
                    output::mark(false),
                    report.path,
                    error.as_deref().unwrap_or("unknown error")
                ),
            }
        }
        output::heading("Summary");
        println!(
            "  {} queued, {} loaded, {} finalized, {} bytes in {:.1} ms",
            stats.queued,
            stats.loaded,
            stats.finalized,
            total_bytes,
            elapsed.as_secs_f64() * 1000.0
        );
    }

    if failed > 0 {
        return Err(CliError::LoadFailed {
            failed,
            total: reports.len(),
        }
        .into());
    }
    Ok(())
}
