use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use iced::{Subscription, Task};
use url::Url;

use crate::application::{DownloadManager, Preferences};
use crate::config::Config;
use crate::domain::DownloadKind;
use crate::ui::{DownloadMessage, DownloadView};
use crate::ytdlp::YtdlpBackend;

pub struct DownloadApp {
    view: DownloadView,
    manager: Arc<DownloadManager>,
}

impl DownloadApp {
    pub fn new(config: Config) -> Self {
        let prefs = Preferences::from(&config);
        let view = DownloadView::new(prefs.output_dir.clone(), prefs.format);
        let manager = Arc::new(DownloadManager::new(
            Arc::new(YtdlpBackend::default()),
            prefs,
        ));

        Self { view, manager }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Folder chosen in the output-directory dialog (None if cancelled)
    OutputDirSelected(Option<PathBuf>),
    /// Periodic poll of the job registry
    Tick,
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::OutputDirChanged(dir) => {
                    app.manager.set_output_dir(dir);
                }
                DownloadMessage::FormatSelected(format) => {
                    app.manager.set_preferred_format(format);
                }
                DownloadMessage::BrowsePressed => {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .pick_folder()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::OutputDirSelected,
                    );
                }
                DownloadMessage::DownloadPressed => {
                    let input = app.view.url.trim().to_string();
                    if Url::parse(&input).is_err() {
                        app.view.status_message = "Invalid URL".to_string();
                        return Task::none();
                    }

                    let submitted = match app.view.kind {
                        DownloadKind::Single => app.manager.submit_single(&input),
                        DownloadKind::Collection => app.manager.submit_collection(&input),
                    };
                    match submitted {
                        Ok(()) => {
                            app.view.status_message = format!("Queued: {input}");
                            app.view.url.clear();
                        }
                        Err(err) => {
                            app.view.status_message = err.to_string();
                        }
                    }
                }
                _ => {}
            }
        }
        Message::OutputDirSelected(Some(path)) => {
            let dir = path.to_string_lossy().into_owned();
            app.view.output_dir = dir.clone();
            app.manager.set_output_dir(dir);
        }
        Message::OutputDirSelected(None) => {
            // User cancelled the dialog
        }
        Message::Tick => {
            app.view.report = app.manager.statuses();
        }
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

pub fn subscription(_app: &DownloadApp) -> Subscription<Message> {
    iced::time::every(Duration::from_millis(500)).map(|_| Message::Tick)
}
