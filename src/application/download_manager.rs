use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use crate::config::Config;
use crate::domain::{AppError, AudioFormat, DownloadKind, DownloadOptions, DownloadStatus};
use crate::utils::expand_home;
use crate::ytdlp::DownloadBackend;

use super::job::JobRecord;
use super::registry::{JobRegistry, StatusReport};

/// Global output preferences, editable from the GUI. Jobs copy these into
/// their [`DownloadOptions`] at submission and never look back.
#[derive(Debug, Clone)]
pub struct Preferences {
    pub output_dir: String,
    pub format: AudioFormat,
    pub quality: String,
}

impl From<&Config> for Preferences {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.download_location.clone(),
            format: config.preferred_format,
            quality: config.preferred_quality.clone(),
        }
    }
}

/// Turns a submission into a running worker plus a registered [`JobRecord`].
///
/// Submissions are fire-and-forget: one OS thread per job, never joined,
/// never cancelled. The worker owns its record's status; the GUI polls the
/// registry for snapshots.
pub struct DownloadManager {
    backend: Arc<dyn DownloadBackend>,
    prefs: Mutex<Preferences>,
    registry: JobRegistry,
}

impl DownloadManager {
    pub fn new(backend: Arc<dyn DownloadBackend>, prefs: Preferences) -> Self {
        Self {
            backend,
            prefs: Mutex::new(prefs),
            registry: JobRegistry::new(),
        }
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_output_dir(&self, output_dir: String) {
        self.prefs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .output_dir = output_dir;
    }

    pub fn set_preferred_format(&self, format: AudioFormat) {
        self.prefs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .format = format;
    }

    /// Downloads the audio of a single video/track.
    pub fn submit_single(&self, url: &str) -> Result<(), AppError> {
        self.submit(DownloadKind::Single, url)
    }

    /// Downloads every item of a playlist/album, grouped under a
    /// per-uploader, per-collection subdirectory.
    pub fn submit_collection(&self, url: &str) -> Result<(), AppError> {
        self.submit(DownloadKind::Collection, url)
    }

    pub fn statuses(&self) -> StatusReport {
        self.registry.query_all()
    }

    fn submit(&self, kind: DownloadKind, url: &str) -> Result<(), AppError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AppError::InvalidInput);
        }

        let options = self.options_for(kind);
        log::info!(
            "queueing {} download of {} as {} into {}",
            kind.as_str(),
            url,
            options.audio_format,
            options.output_template
        );

        let record = Arc::new(JobRecord::new(kind, url.to_string(), options));
        self.registry.record(Arc::clone(&record));
        log::debug!("registry now holds {} jobs", self.registry.len());

        let backend = Arc::clone(&self.backend);
        let job = Arc::clone(&record);
        let handle = thread::Builder::new()
            .name(format!("download-{}", kind.as_str()))
            .spawn(move || {
                let result = backend.run(job.source_url(), job.options(), &|status| {
                    job.record_progress(status)
                });
                match result {
                    Ok(()) => {
                        // yt-dlp emits no final hook after post-processing, so
                        // a clean return is promoted to a terminal status.
                        if !job.status().is_terminal() {
                            job.record_progress(DownloadStatus::Finished);
                        }
                    }
                    Err(err) => {
                        log::error!("download of {} failed: {err}", job.source_url());
                        job.record_progress(DownloadStatus::Failed {
                            reason: err.to_string(),
                        });
                    }
                }
            })
            .map_err(|e| AppError::Io(e.to_string()))?;

        record.attach_worker(handle);
        Ok(())
    }

    /// Snapshot of the current preferences as immutable job options, with the
    /// kind-specific yt-dlp output template rooted at the expanded output
    /// directory.
    fn options_for(&self, kind: DownloadKind) -> DownloadOptions {
        let prefs = self.preferences();
        let outdir = expand_home(&prefs.output_dir);
        DownloadOptions {
            output_template: output_template(kind, &outdir),
            audio_format: prefs.format,
            audio_quality: prefs.quality,
            expand_collection: kind == DownloadKind::Collection,
        }
    }
}

fn output_template(kind: DownloadKind, outdir: &Path) -> String {
    let path = match kind {
        DownloadKind::Single => outdir.join("%(title)s.%(ext)s"),
        DownloadKind::Collection => outdir
            .join("%(uploader)s - %(playlist_title)s")
            .join("%(playlist_index)s. %(title)s.%(ext)s"),
    };
    path.to_string_lossy().into_owned()
}
