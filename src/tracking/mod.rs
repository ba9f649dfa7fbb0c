//! Experiment tracking
//!
//! Records per-call latency, token usage and model id as runs in a flat
//! file store. Tracking is best-effort: every storage error is logged and
//! swallowed so it can never fail an analysis.
//!
//! Runs are scoped: [`Tracker::start_run`] returns a [`RunGuard`] that
//! closes the run when dropped, on success and failure paths alike. A run
//! started while another is active becomes its child.

pub mod store;

pub use store::{MetricRecord, RunMeta, RunStatus};

use chrono::Utc;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct Tracker {
    experiment_dir: Option<PathBuf>,
    /// Stack of open run ids, innermost last
    active: Mutex<Vec<String>>,
}

impl Tracker {
    /// Open (or create) an experiment; falls back to disabled on failure
    pub fn open(root: &Path, experiment: &str) -> Self {
        let dir = root.join(experiment);
        let experiment_dir = match std::fs::create_dir_all(&dir) {
            Ok(()) => Some(dir),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "tracking disabled: cannot create experiment directory");
                None
            }
        };

        Self {
            experiment_dir,
            active: Mutex::new(Vec::new()),
        }
    }

    pub fn disabled() -> Self {
        Self {
            experiment_dir: None,
            active: Mutex::new(Vec::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.experiment_dir.is_some()
    }

    pub fn experiment_dir(&self) -> Option<&Path> {
        self.experiment_dir.as_deref()
    }

    /// Innermost open run
    pub fn active_run_id(&self) -> Option<String> {
        self.active.lock().ok().and_then(|stack| stack.last().cloned())
    }

    /// Open a run, nested under the active run if there is one
    pub fn start_run(&self, name: &str) -> RunGuard<'_> {
        let Some(experiment_dir) = &self.experiment_dir else {
            return RunGuard::inert(self);
        };

        let parent_run_id = self.active_run_id();
        let run_id = Uuid::now_v7().simple().to_string();
        let dir = experiment_dir.join(&run_id);
        let meta = RunMeta {
            run_id: run_id.clone(),
            run_name: name.to_string(),
            parent_run_id,
            status: RunStatus::Running,
            start_time: Utc::now(),
            end_time: None,
        };

        if let Err(e) = store::write_meta(&dir, &meta) {
            warn!(run = name, error = %e, "failed to start tracking run");
            return RunGuard::inert(self);
        }

        if let Ok(mut stack) = self.active.lock() {
            stack.push(run_id.clone());
        }
        debug!(run = name, run_id = %run_id, parent = ?meta.parent_run_id, "tracking run started");

        RunGuard {
            tracker: self,
            run: Some(ActiveRun {
                dir,
                meta,
                params: BTreeMap::new(),
            }),
            finished: false,
        }
    }

    fn release(&self, run_id: &str) {
        if let Ok(mut stack) = self.active.lock() {
            if let Some(pos) = stack.iter().rposition(|id| id == run_id) {
                stack.remove(pos);
            }
        }
    }
}

struct ActiveRun {
    dir: PathBuf,
    meta: RunMeta,
    params: BTreeMap<String, String>,
}

/// Open run; closed on drop
///
/// Dropping without [`RunGuard::finish`] marks the run FAILED.
pub struct RunGuard<'a> {
    tracker: &'a Tracker,
    run: Option<ActiveRun>,
    finished: bool,
}

impl<'a> RunGuard<'a> {
    fn inert(tracker: &'a Tracker) -> Self {
        Self {
            tracker,
            run: None,
            finished: false,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.run.is_some()
    }

    pub fn run_id(&self) -> Option<&str> {
        self.run.as_ref().map(|r| r.meta.run_id.as_str())
    }

    pub fn parent_run_id(&self) -> Option<&str> {
        self.run.as_ref().and_then(|r| r.meta.parent_run_id.as_deref())
    }

    pub fn log_metric(&self, key: &str, value: f64, step: Option<u64>) {
        let Some(run) = &self.run else { return };

        let record = MetricRecord {
            key: key.to_string(),
            value,
            step,
            timestamp: Utc::now(),
        };
        if let Err(e) = store::append_metric(&run.dir, &record) {
            warn!(metric = key, error = %e, "failed to log metric");
        }
    }

    pub fn log_param(&mut self, key: &str, value: &str) {
        let Some(run) = &mut self.run else { return };

        run.params.insert(key.to_string(), value.to_string());
        if let Err(e) = store::write_params(&run.dir, &run.params) {
            warn!(param = key, error = %e, "failed to log param");
        }
    }

    /// Close the run as FINISHED
    pub fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let Some(run) = &mut self.run else { return };

        run.meta.status = if self.finished {
            RunStatus::Finished
        } else {
            RunStatus::Failed
        };
        run.meta.end_time = Some(Utc::now());

        if let Err(e) = store::write_meta(&run.dir, &run.meta) {
            warn!(run_id = %run.meta.run_id, error = %e, "failed to close tracking run");
        }
        self.tracker.release(&run.meta.run_id);
        debug!(run_id = %run.meta.run_id, status = ?run.meta.status, "tracking run closed");
    }
}
