use serde::{Deserialize, Serialize};

/// What a submission expands to: one track, or a whole playlist/album.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Single,
    Collection,
}

impl DownloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Collection => "collection",
        }
    }
}

/// Target audio format handed to yt-dlp's audio extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    M4a,
    Opus,
    Flac,
    Wav,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [Self::Mp3, Self::M4a, Self::Opus, Self::Flac, Self::Wav];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Opus => "opus",
            Self::Flac => "flac",
            Self::Wav => "wav",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of the output settings a job was submitted with. Captured once at
/// submission; later preference edits never reach an in-flight job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// yt-dlp output template, already rooted at the expanded output directory.
    pub output_template: String,
    pub audio_format: AudioFormat,
    pub audio_quality: String,
    /// Whether the source URL should be expanded into its playlist entries.
    pub expand_collection: bool,
}

/// Latest progress payload recorded for a job. Written whole by the worker's
/// callback, read whole by pollers; this layer never merges fields across
/// payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadStatus {
    Queued,
    Downloading {
        percent: Option<f32>,
        speed: Option<String>,
        eta: Option<String>,
    },
    /// yt-dlp handed the file to its post-processor (audio extraction).
    Processing,
    Finished,
    Failed {
        reason: String,
    },
}

impl DownloadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed { .. })
    }
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Downloading { percent, speed, eta } => {
                match percent {
                    Some(pct) => write!(f, "downloading {:.1}%", pct)?,
                    None => write!(f, "downloading")?,
                }
                if let Some(speed) = speed {
                    write!(f, " at {}", speed)?;
                }
                if let Some(eta) = eta {
                    write!(f, ", ETA {}", eta)?;
                }
                Ok(())
            }
            Self::Processing => write!(f, "converting"),
            Self::Finished => write!(f, "finished"),
            Self::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(DownloadStatus::Finished.is_terminal());
        assert!(DownloadStatus::Failed { reason: "x".into() }.is_terminal());
        assert!(!DownloadStatus::Queued.is_terminal());
        assert!(!DownloadStatus::Processing.is_terminal());
    }

    #[test]
    fn test_status_display() {
        let status = DownloadStatus::Downloading {
            percent: Some(42.7),
            speed: Some("1.2MiB/s".into()),
            eta: Some("00:12".into()),
        };
        assert_eq!(status.to_string(), "downloading 42.7% at 1.2MiB/s, ETA 00:12");
        assert_eq!(
            DownloadStatus::Downloading {
                percent: None,
                speed: None,
                eta: None
            }
            .to_string(),
            "downloading"
        );
    }

    #[test]
    fn test_audio_format_serde() {
        let json = serde_json::to_string(&AudioFormat::M4a).unwrap();
        assert_eq!(json, "\"m4a\"");
        let parsed: AudioFormat = serde_json::from_str("\"flac\"").unwrap();
        assert_eq!(parsed, AudioFormat::Flac);
    }
}
