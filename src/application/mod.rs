pub mod download_manager;
pub mod job;
pub mod registry;

pub use download_manager::{DownloadManager, Preferences};
pub use registry::StatusReport;
