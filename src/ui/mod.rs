use iced::{
    widget::{button, column, pick_list, radio, row, text, text_input, Space},
    Element, Length,
};

use crate::application::StatusReport;
use crate::domain::{AudioFormat, DownloadKind};

/// Main view state
pub struct DownloadView {
    pub url: String,
    pub output_dir: String,
    pub format: AudioFormat,
    pub kind: DownloadKind,
    pub status_message: String,
    pub report: StatusReport,
}

impl DownloadView {
    pub fn new(output_dir: String, format: AudioFormat) -> Self {
        Self {
            url: String::new(),
            output_dir,
            format,
            kind: DownloadKind::Single,
            status_message: "Enter a URL to download".to_string(),
            report: StatusReport::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    OutputDirChanged(String),
    BrowsePressed,
    FormatSelected(AudioFormat),
    KindSelected(DownloadKind),
    DownloadPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url = url;
            }
            DownloadMessage::OutputDirChanged(dir) => {
                self.output_dir = dir;
            }
            DownloadMessage::FormatSelected(format) => {
                self.format = format;
            }
            DownloadMessage::KindSelected(kind) => {
                self.kind = kind;
            }
            DownloadMessage::BrowsePressed | DownloadMessage::DownloadPressed => {
                // Handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let submit_label = match self.kind {
            DownloadKind::Single => "Download Track",
            DownloadKind::Collection => "Download Playlist",
        };

        let mut layout = column![
            text("Music Downloader").size(32),
            Space::new().height(Length::Fixed(20.0)),
            row![
                radio(
                    "Single track",
                    DownloadKind::Single,
                    Some(self.kind),
                    DownloadMessage::KindSelected
                ),
                radio(
                    "Playlist / album",
                    DownloadKind::Collection,
                    Some(self.kind),
                    DownloadMessage::KindSelected
                ),
            ]
            .spacing(20),
            text("URL:").size(16),
            text_input("Enter a video or playlist URL...", &self.url)
                .on_input(DownloadMessage::UrlChanged)
                .padding(10),
            text("Save to:").size(16),
            row![
                text_input("Output directory...", &self.output_dir)
                    .on_input(DownloadMessage::OutputDirChanged)
                    .padding(10),
                button("Browse...")
                    .on_press(DownloadMessage::BrowsePressed)
                    .padding(10),
            ]
            .spacing(10),
            row![
                text("Format:").size(16),
                pick_list(
                    AudioFormat::ALL,
                    Some(self.format),
                    DownloadMessage::FormatSelected
                )
                .padding(10),
            ]
            .spacing(10),
            Space::new().height(Length::Fixed(10.0)),
            button(submit_label)
                .on_press(DownloadMessage::DownloadPressed)
                .padding([10, 20]),
            Space::new().height(Length::Fixed(10.0)),
            text(&self.status_message).size(14),
        ]
        .padding(20)
        .spacing(10);

        if !self.report.is_empty() {
            layout = layout.push(text("Downloads").size(20));
            for (url, status) in &self.report.singles {
                layout = layout.push(text(format!("{url}: {status}")).size(14));
            }
            for (url, status) in &self.report.collections {
                layout = layout.push(text(format!("[playlist] {url}: {status}")).size(14));
            }
        }

        layout.into()
    }
}
