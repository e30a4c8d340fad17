use regex::Regex;

use crate::domain::DownloadStatus;

/// Parses one line of yt-dlp stdout into a status payload.
///
/// The backend asks yt-dlp for `progress:<percent>|<speed>|<eta>` lines via
/// `--progress-template`; post-processor and classic `[download]` lines are
/// recognized as well. Anything else is ignored.
pub fn parse_line(line: &str) -> Option<DownloadStatus> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix("progress:") {
        return Some(parse_template_fields(rest));
    }

    if line.starts_with("[ExtractAudio]") {
        return Some(DownloadStatus::Processing);
    }

    // Classic progress line, seen when the progress template is not in
    // effect (older yt-dlp builds).
    let re = Regex::new(r"^\[download\]\s+([\d.]+)%").ok()?;
    if let Some(caps) = re.captures(line) {
        return Some(DownloadStatus::Downloading {
            percent: caps[1].parse().ok(),
            speed: None,
            eta: None,
        });
    }

    None
}

fn parse_template_fields(rest: &str) -> DownloadStatus {
    let mut fields = rest.splitn(3, '|');
    let percent = fields.next().and_then(parse_percent);
    let speed = fields.next().and_then(parse_field);
    let eta = fields.next().and_then(parse_field);
    DownloadStatus::Downloading { percent, speed, eta }
}

fn parse_percent(raw: &str) -> Option<f32> {
    raw.trim().strip_suffix('%')?.trim().parse().ok()
}

/// yt-dlp prints `N/A` or `Unknown` for fields it cannot estimate yet.
fn parse_field(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty()
        || value.eq_ignore_ascii_case("n/a")
        || value.eq_ignore_ascii_case("unknown")
    {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templated_progress_line() {
        let status = parse_line("progress:  42.7%| 1.23MiB/s|00:12").unwrap();
        assert_eq!(
            status,
            DownloadStatus::Downloading {
                percent: Some(42.7),
                speed: Some("1.23MiB/s".into()),
                eta: Some("00:12".into()),
            }
        );
    }

    #[test]
    fn test_unknown_fields_become_none() {
        let status = parse_line("progress: N/A|Unknown|N/A").unwrap();
        assert_eq!(
            status,
            DownloadStatus::Downloading {
                percent: None,
                speed: None,
                eta: None,
            }
        );
    }

    #[test]
    fn test_extract_audio_line_means_processing() {
        let status = parse_line("[ExtractAudio] Destination: /music/song.mp3").unwrap();
        assert_eq!(status, DownloadStatus::Processing);
    }

    #[test]
    fn test_classic_download_line() {
        let status = parse_line("[download]  12.5% of 3.50MiB at 1.00MiB/s ETA 00:03").unwrap();
        assert_eq!(
            status,
            DownloadStatus::Downloading {
                percent: Some(12.5),
                speed: None,
                eta: None,
            }
        );
    }

    #[test]
    fn test_unrelated_lines_are_ignored() {
        assert_eq!(parse_line("[youtube] abc123: Downloading webpage"), None);
        assert_eq!(parse_line("[download] Destination: /music/song.webm"), None);
        assert_eq!(parse_line(""), None);
    }
}
