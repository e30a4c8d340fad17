use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::AudioFormat;

/// Startup defaults for the two user preferences, read once at launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub download_location: String,
    pub preferred_format: AudioFormat,
    pub preferred_quality: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_location: "~/Music".to_string(),
            preferred_format: AudioFormat::Mp3,
            preferred_quality: "192".to_string(),
        }
    }
}

/// Platform config file location, e.g.
/// `~/.config/music-downloader/config.json` on Linux.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "music-downloader")
        .map(|dirs| dirs.config_dir().join("config.json"))
}

/// Loads the config file, falling back to built-in defaults when the file is
/// missing or malformed. Never fatal; problems are logged instead.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            log::warn!("could not determine a config directory, using defaults");
            Config::default()
        }
    }
}

fn load_from(path: &Path) -> Config {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            log::info!("no config at {} ({err}), using defaults", path.display());
            return Config::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(err) => {
            log::warn!(
                "malformed config at {}: {err}, using defaults",
                path.display()
            );
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("nope.json"));
        assert_eq!(config.download_location, "~/Music");
        assert_eq!(config.preferred_format, AudioFormat::Mp3);
        assert_eq!(config.preferred_quality, "192");
    }

    #[test]
    fn test_well_formed_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"download_location": "/srv/audio", "preferred_format": "wav"}}"#
        )
        .unwrap();

        let config = load_from(&path);
        assert_eq!(config.download_location, "/srv/audio");
        assert_eq!(config.preferred_format, AudioFormat::Wav);
        // Unspecified fields keep their defaults.
        assert_eq!(config.preferred_quality, "192");
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let config = load_from(&path);
        assert_eq!(config.download_location, "~/Music");
    }
}
