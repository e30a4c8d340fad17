use std::sync::{Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::domain::{DownloadKind, DownloadOptions, DownloadStatus};

/// One download request and its evolving status.
///
/// `kind`, `source_url` and `options` are fixed at creation. The status is the
/// only mutable part: exactly one worker replaces it through
/// [`record_progress`](Self::record_progress), while the GUI poll reads
/// snapshots of it concurrently.
#[derive(Debug)]
pub struct JobRecord {
    kind: DownloadKind,
    source_url: String,
    options: DownloadOptions,
    status: Mutex<DownloadStatus>,
    /// Kept for bookkeeping only; the worker is never joined or cancelled.
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl JobRecord {
    pub fn new(kind: DownloadKind, source_url: String, options: DownloadOptions) -> Self {
        Self {
            kind,
            source_url,
            options,
            status: Mutex::new(DownloadStatus::Queued),
            worker: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> DownloadKind {
        self.kind
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    /// Snapshot of the most recent status payload.
    pub fn status(&self) -> DownloadStatus {
        // A poisoned lock still holds a whole status value; keep serving it.
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the stored status wholesale. No validation, no merging with
    /// the previous payload; a poller always sees the last payload in full.
    pub fn record_progress(&self, next: DownloadStatus) {
        *self
            .status
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = next;
    }

    pub fn attach_worker(&self, handle: JoinHandle<()>) {
        *self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    #[cfg(test)]
    pub(crate) fn take_worker(&self) -> Option<JoinHandle<()>> {
        self.worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AudioFormat;

    fn options() -> DownloadOptions {
        DownloadOptions {
            output_template: "/tmp/%(title)s.%(ext)s".into(),
            audio_format: AudioFormat::Mp3,
            audio_quality: "192".into(),
            expand_collection: false,
        }
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = JobRecord::new(DownloadKind::Single, "https://example.com/v".into(), options());
        assert_eq!(job.status(), DownloadStatus::Queued);
        assert_eq!(job.kind(), DownloadKind::Single);
        assert_eq!(job.source_url(), "https://example.com/v");
    }

    #[test]
    fn test_record_progress_replaces_whole_status() {
        let job = JobRecord::new(DownloadKind::Single, "u".into(), options());
        for pct in [10.0, 55.0, 90.0] {
            job.record_progress(DownloadStatus::Downloading {
                percent: Some(pct),
                speed: Some("1MiB/s".into()),
                eta: None,
            });
        }
        // Last write wins; earlier payloads leave no trace.
        assert_eq!(
            job.status(),
            DownloadStatus::Downloading {
                percent: Some(90.0),
                speed: Some("1MiB/s".into()),
                eta: None,
            }
        );
    }

    #[test]
    fn test_concurrent_readers_see_complete_payloads() {
        use std::sync::Arc;

        let job = Arc::new(JobRecord::new(DownloadKind::Single, "u".into(), options()));
        let writer = {
            let job = Arc::clone(&job);
            std::thread::spawn(move || {
                for pct in 0..100 {
                    job.record_progress(DownloadStatus::Downloading {
                        percent: Some(pct as f32),
                        speed: Some(format!("{pct}KiB/s")),
                        eta: Some(format!("00:{pct:02}")),
                    });
                }
                job.record_progress(DownloadStatus::Finished);
            })
        };

        // Every observed payload must be internally consistent: the speed and
        // eta strings always carry the same number as the percent.
        loop {
            match job.status() {
                DownloadStatus::Queued => continue,
                DownloadStatus::Downloading { percent, speed, eta } => {
                    let pct = percent.unwrap() as u32;
                    assert_eq!(speed.unwrap(), format!("{pct}KiB/s"));
                    assert_eq!(eta.unwrap(), format!("00:{pct:02}"));
                }
                DownloadStatus::Finished => break,
                other => panic!("unexpected status: {other:?}"),
            }
        }
        writer.join().unwrap();
    }
}
