mod app;
mod application;
mod config;
mod domain;
mod ui;
mod utils;
mod ytdlp;

use iced::window;

fn main() -> iced::Result {
    env_logger::init();

    let icon_data = include_bytes!("../assets/icon.png");

    let icon = match image::load_from_memory(icon_data) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            window::icon::from_rgba(rgba.into_raw(), width, height).ok()
        }
        Err(_) => None,
    };

    let config = config::load();

    iced::application(
        move || app::DownloadApp::new(config.clone()),
        app::update,
        app::view,
    )
    .title("Music Downloader")
    .subscription(app::subscription)
    .window(window::Settings {
        icon,
        ..Default::default()
    })
    .run()
}
