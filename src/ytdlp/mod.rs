pub mod backend;
pub mod progress;

pub use backend::{BackendError, DownloadBackend, Result, YtdlpBackend};
