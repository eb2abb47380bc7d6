//! Removes uploaded photos that no student references.
//!
//! Registration writes the photo before the student row, so a failed insert
//! leaves the file behind. Files younger than the grace period are skipped
//! to avoid racing a registration that is still in flight.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::db::Store;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub removed: usize,
    pub kept_recent: usize,
}

pub struct OrphanPhotoSweeper {
    store: Store,
    photo_dir: PathBuf,
    grace: Duration,
}

impl OrphanPhotoSweeper {
    #[must_use]
    pub fn new(store: Store, photo_dir: impl Into<PathBuf>, grace: Duration) -> Self {
        Self {
            store,
            photo_dir: photo_dir.into(),
            grace,
        }
    }

    pub async fn sweep(&self) -> Result<SweepReport> {
        if !self.photo_dir.exists() {
            debug!(dir = %self.photo_dir.display(), "Photo directory missing, nothing to sweep");
            return Ok(SweepReport::default());
        }

        let referenced: HashSet<String> = self
            .store
            .student_photo_paths()
            .await
            .context("Failed to load referenced photos")?
            .into_iter()
            .collect();

        let photo_dir = self.photo_dir.clone();
        let grace = self.grace;

        let candidates = tokio::task::spawn_blocking(move || collect_orphans(&photo_dir, &referenced, grace))
            .await
            .context("Photo scan task panicked")?;

        let mut report = SweepReport {
            scanned: candidates.scanned,
            kept_recent: candidates.kept_recent,
            ..SweepReport::default()
        };

        for path in candidates.orphans {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    report.removed += 1;
                    info!(path = %path.display(), "Removed orphaned photo");
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove orphaned photo"),
            }
        }

        metrics::counter!("orphan_photos_removed_total").increment(report.removed as u64);

        Ok(report)
    }
}

struct Candidates {
    scanned: usize,
    kept_recent: usize,
    orphans: Vec<PathBuf>,
}

fn collect_orphans(dir: &Path, referenced: &HashSet<String>, grace: Duration) -> Candidates {
    let now = SystemTime::now();
    let mut candidates = Candidates {
        scanned: 0,
        kept_recent: 0,
        orphans: Vec::new(),
    };

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        candidates.scanned += 1;

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if referenced.contains(name) {
            continue;
        }

        let age = entry
            .metadata()
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();

        if age < grace {
            candidates.kept_recent += 1;
        } else {
            candidates.orphans.push(entry.into_path());
        }
    }

    candidates
}
