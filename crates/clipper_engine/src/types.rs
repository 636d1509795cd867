use std::path::PathBuf;

use thiserror::Error;

use crate::decode::DecodeError;
use crate::locate::LocateError;
use crate::persist::PersistError;
use clip_logging::clip_info;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Decoding,
    Locating,
    DownloadingMedia,
    Rendering,
    Writing,
    Done,
}

/// One asset written to the vault's `Assets/` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    pub source_url: String,
    pub filename: String,
    pub path: PathBuf,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub note_path: PathBuf,
    pub assets: Vec<SavedAsset>,
    pub preview: String,
}

/// Progress events emitted while a job runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipEvent {
    Stage(Stage),
    AssetSaved { filename: String, bytes: u64 },
    NoteWritten { path: PathBuf },
}

/// Receives progress events. The app installs [`LogSink`]; tests record.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ClipEvent);
}

/// Prints one progress line per event through the logging facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: ClipEvent) {
        match event {
            ClipEvent::Stage(stage) => clip_info!("{stage:?}"),
            ClipEvent::AssetSaved { filename, bytes } => {
                clip_info!("saved asset {filename} ({bytes} bytes)");
            }
            ClipEvent::NoteWritten { path } => {
                clip_info!("markdown file saved to {}", path.display());
            }
        }
    }
}

/// HTTP failure taxonomy shared by page and asset fetches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("request timed out")]
    Timeout,
    #[error("redirect limit exceeded")]
    RedirectLimit,
    #[error("response too large (limit {limit} bytes)")]
    TooLarge { limit: u64 },
    #[error("unsupported content type {0}")]
    UnsupportedContentType(String),
    #[error("network error: {0}")]
    Network(String),
}

/// Anything that can end a pipeline run.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error("failed to download {url}: {source}")]
    Asset { url: String, source: FetchError },
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
