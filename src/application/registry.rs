use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{DownloadKind, DownloadStatus};

use super::job::JobRecord;

/// Every job's `(source URL, latest status)`, partitioned by kind. Both lists
/// preserve submission order.
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    pub singles: Vec<(String, DownloadStatus)>,
    pub collections: Vec<(String, DownloadStatus)>,
}

impl StatusReport {
    pub fn is_empty(&self) -> bool {
        self.singles.is_empty() && self.collections.is_empty()
    }
}

/// Append-only, insertion-ordered collection of every job created during the
/// process's lifetime. Nothing is ever removed or reordered.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Mutex<Vec<Arc<JobRecord>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, job: Arc<JobRecord>) {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(job);
    }

    /// Point-in-time view of all jobs. Each status is cloned under its own
    /// record's lock, so every entry is a complete payload; there is no
    /// cross-job synchronization barrier.
    pub fn query_all(&self) -> StatusReport {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let mut report = StatusReport::default();
        for job in jobs.iter() {
            let entry = (job.source_url().to_string(), job.status());
            match job.kind() {
                DownloadKind::Single => report.singles.push(entry),
                DownloadKind::Collection => report.collections.push(entry),
            }
        }
        report
    }

    pub fn len(&self) -> usize {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Vec<Arc<JobRecord>> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
