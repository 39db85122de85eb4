//! Ephemeral data and home directories for the embedded node
//!
//! Each start attempt provisions a fresh pair of directories under the
//! process temp directory, named from the cluster name, a millisecond
//! timestamp and a process-wide sequence number. Directories survive
//! `stop()`; a start attempt only cleans the (fresh) paths it is about to
//! use. Clean and create are best-effort by contract: failures are logged
//! and reported through the return value, never raised.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{error, info};

/// Outcome of a best-effort directory clean
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// All contents were removed
    Cleaned,
    /// The path did not exist; nothing to do
    AlreadyAbsent,
    /// At least one entry could not be removed (logged)
    Failed,
}

/// Delete the contents of a directory, best effort
///
/// The directory itself is kept. Never fails: a missing path reports
/// `AlreadyAbsent`, removal errors are logged and report `Failed`.
pub fn clean_dir(path: &Path) -> CleanOutcome {
    if !path.exists() {
        return CleanOutcome::AlreadyAbsent;
    }

    info!("Deleting contents of data dir {}", path.display());

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to clean data dir {}: {}", path.display(), e);
            return CleanOutcome::Failed;
        }
    };

    let mut outcome = CleanOutcome::Cleaned;
    for entry in entries {
        let result = entry.and_then(|entry| {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                fs::remove_dir_all(&entry_path)
            } else {
                fs::remove_file(&entry_path)
            }
        });
        if let Err(e) = result {
            error!("Failed to clean data dir {}: {}", path.display(), e);
            outcome = CleanOutcome::Failed;
        }
    }

    outcome
}

/// Create a directory tree, best effort
///
/// Failures are logged and reported as `false`; the caller proceeds
/// regardless.
pub fn create_dir(path: &Path) -> bool {
    match fs::create_dir_all(path) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to create data dir {}: {}", path.display(), e);
            false
        }
    }
}

/// Fresh directory pair for one start attempt
#[derive(Debug, Clone)]
pub struct NodePaths {
    pub data_dir: PathBuf,
    pub home_dir: PathBuf,
}

static DIR_SEQ: AtomicU64 = AtomicU64::new(0);

impl NodePaths {
    /// Generate a fresh directory pair for the given cluster name
    ///
    /// Paths are never reused across start attempts: the name carries a
    /// millisecond timestamp plus a sequence number so attempts within the
    /// same millisecond stay distinct.
    pub fn provision(cluster_name: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let seq = DIR_SEQ.fetch_add(1, Ordering::SeqCst);
        let base = env::temp_dir();

        Self {
            data_dir: base.join(format!("{}_{}_{}data", cluster_name, millis, seq)),
            home_dir: base.join(format!("{}_{}_{}-home", cluster_name, millis, seq)),
        }
    }

    /// Clean-then-create the data dir, create the home dir
    ///
    /// Best effort throughout; node construction is attempted even if the
    /// directory state could not be fully prepared, which may later surface
    /// as a bootstrap failure.
    pub fn setup(&self) {
        clean_dir(&self.data_dir);
        create_dir(&self.data_dir);
        create_dir(&self.home_dir);
    }
}
