use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use thiserror::Error;

use crate::domain::{DownloadOptions, DownloadStatus};

use super::progress::parse_line;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to run yt-dlp: {0}")]
    Io(#[from] std::io::Error),

    #[error("yt-dlp exited with status {code}: {stderr}")]
    Exited { code: i32, stderr: String },
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Seam between the task-tracking layer and whatever performs the actual
/// retrieval and transcoding. The callback is invoked zero or more times with
/// progress payloads; a clean return means the source was fully processed.
pub trait DownloadBackend: Send + Sync {
    fn run(
        &self,
        url: &str,
        options: &DownloadOptions,
        on_progress: &dyn Fn(DownloadStatus),
    ) -> Result<()>;
}

const PROGRESS_TEMPLATE: &str =
    "progress:%(progress._percent_str)s|%(progress._speed_str)s|%(progress._eta_str)s";
const STDERR_TAIL_LINES: usize = 8;

/// Backend that shells out to the `yt-dlp` binary, letting it handle format
/// negotiation, retrieval and the ffmpeg audio extraction.
pub struct YtdlpBackend {
    binary: PathBuf,
}

impl YtdlpBackend {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn build_args(url: &str, options: &DownloadOptions) -> Vec<String> {
        let mut args = vec![
            "-f".to_owned(),
            "bestaudio/best".to_owned(),
            "-x".to_owned(),
            "--audio-format".to_owned(),
            options.audio_format.as_str().to_owned(),
            "--audio-quality".to_owned(),
            options.audio_quality.clone(),
            "-o".to_owned(),
            options.output_template.clone(),
            "--newline".to_owned(),
            "--progress-template".to_owned(),
            PROGRESS_TEMPLATE.to_owned(),
        ];
        args.push(
            if options.expand_collection {
                "--yes-playlist"
            } else {
                "--no-playlist"
            }
            .to_owned(),
        );
        args.push(url.to_owned());
        args
    }
}

impl Default for YtdlpBackend {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl DownloadBackend for YtdlpBackend {
    fn run(
        &self,
        url: &str,
        options: &DownloadOptions,
        on_progress: &dyn Fn(DownloadStatus),
    ) -> Result<()> {
        let mut child = Command::new(&self.binary)
            .args(Self::build_args(url, options))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain stderr on a side thread so neither pipe can fill up and
        // stall the child; keep a short tail for the failure reason.
        let stderr_tail = thread::scope(|scope| {
            let reader = scope.spawn(move || {
                let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
                if let Some(stderr) = stderr {
                    for line in BufReader::new(stderr).lines().map_while(io::Result::ok) {
                        log::trace!("yt-dlp[err]: {line}");
                        if line.trim().is_empty() {
                            continue;
                        }
                        if tail.len() == STDERR_TAIL_LINES {
                            tail.pop_front();
                        }
                        tail.push_back(line);
                    }
                }
                tail
            });

            if let Some(stdout) = stdout {
                for line in BufReader::new(stdout).lines().map_while(io::Result::ok) {
                    log::trace!("yt-dlp: {line}");
                    if let Some(status) = parse_line(&line) {
                        on_progress(status);
                    }
                }
            }

            reader.join().unwrap_or_default()
        });

        let exit = child.wait()?;
        if exit.success() {
            Ok(())
        } else {
            Err(BackendError::Exited {
                code: exit.code().unwrap_or(-1),
                stderr: Vec::from(stderr_tail).join(" | "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AudioFormat;

    fn options(expand: bool) -> DownloadOptions {
        DownloadOptions {
            output_template: "/music/%(title)s.%(ext)s".into(),
            audio_format: AudioFormat::Opus,
            audio_quality: "192".into(),
            expand_collection: expand,
        }
    }

    #[test]
    fn test_single_args() {
        let args = YtdlpBackend::build_args("https://example.com/v", &options(false));
        assert!(args.contains(&"--no-playlist".to_owned()));
        assert!(!args.contains(&"--yes-playlist".to_owned()));
        assert_eq!(args.last().unwrap(), "https://example.com/v");

        let fmt_at = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[fmt_at + 1], "opus");
        let out_at = args.iter().position(|a| a == "-o").unwrap();
        assert_eq!(args[out_at + 1], "/music/%(title)s.%(ext)s");
    }

    #[test]
    fn test_collection_args() {
        let args = YtdlpBackend::build_args("https://example.com/playlist", &options(true));
        assert!(args.contains(&"--yes-playlist".to_owned()));
        assert!(!args.contains(&"--no-playlist".to_owned()));
    }
}
