//! Clipper engine: the fetch → decode → locate → media → sanitize →
//! render → write pipeline.
mod batch;
mod decode;
mod fetch;
mod frontmatter;
mod locate;
mod media;
mod normalize;
mod persist;
mod pipeline;
mod preview;
mod render;
mod sanitize;
mod types;

pub use batch::{convert_directory, BatchError, BatchSummary};
pub use decode::{decode_html, DecodeError, DecodedHtml};
pub use fetch::{FetchSettings, Fetcher, PageFetch, ReqwestFetcher};
pub use frontmatter::build_note_document;
pub use locate::{document_title, locate_target, LocateError};
pub use media::{download_assets, plan_assets, AssetFailurePolicy, MediaSettings, PlannedAsset};
pub use normalize::normalize_blank_lines;
pub use persist::{ensure_output_dir, ensure_vault_layout, AtomicFileWriter, PersistError};
pub use pipeline::Pipeline;
pub use preview::prepare_preview_content;
pub use render::render_markdown;
pub use sanitize::{sanitize_fragment, MediaRewrites, SanitizeRules};
pub use types::{
    ClipError, ClipEvent, FetchError, LogSink, ProgressSink, RunOutcome, SavedAsset, Stage,
};
