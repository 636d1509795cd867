use std::fs;
use std::sync::Arc;

use scraper::Html;
use url::Url;

use clip_logging::clip_debug;
use clipper_core::{sanitize_component, ClipJob, Source};

use crate::decode::decode_html;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::frontmatter::build_note_document;
use crate::locate::{document_title, locate_target};
use crate::media::{download_assets, plan_assets, AssetFailurePolicy, MediaSettings};
use crate::normalize::normalize_blank_lines;
use crate::persist::{ensure_vault_layout, AtomicFileWriter};
use crate::preview::prepare_preview_content;
use crate::render::render_markdown;
use crate::sanitize::{sanitize_fragment, MediaRewrites, SanitizeRules};
use crate::types::{
    ClipError, ClipEvent, FetchError, ProgressSink, RunOutcome, SavedAsset, Stage,
};

/// One configured pipeline instance. Runs are independent; nothing is
/// shared across them except the HTTP client.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    asset_policy: AssetFailurePolicy,
    /// UTC timestamp stamped into frontmatter, supplied by the caller so
    /// the engine stays clock-free.
    clipped_utc: String,
}

impl Pipeline {
    pub fn new(settings: FetchSettings, clipped_utc: impl Into<String>) -> Result<Self, ClipError> {
        let fetcher = ReqwestFetcher::new(settings)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), clipped_utc))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, clipped_utc: impl Into<String>) -> Self {
        Self {
            fetcher,
            asset_policy: AssetFailurePolicy::Abort,
            clipped_utc: clipped_utc.into(),
        }
    }

    pub fn with_asset_policy(mut self, policy: AssetFailurePolicy) -> Self {
        self.asset_policy = policy;
        self
    }

    /// Runs one job start to finish. Strictly sequential: the page fetch,
    /// then each asset fetch in document order, then the note write.
    pub async fn run(&self, job: &ClipJob, sink: &dyn ProgressSink) -> Result<RunOutcome, ClipError> {
        sink.emit(ClipEvent::Stage(Stage::Fetching));
        let (bytes, content_type, page_url) = self.obtain(&job.source).await?;

        sink.emit(ClipEvent::Stage(Stage::Decoding));
        let decoded = decode_html(&bytes, content_type.as_deref())?;

        sink.emit(ClipEvent::Stage(Stage::Locating));
        let doc = Html::parse_document(&decoded.html);
        let title = document_title(&doc);
        let target = locate_target(&doc, &job.target)?;

        let mut assets: Vec<SavedAsset> = Vec::new();
        let mut rewrites = MediaRewrites::new();
        if job.download_media {
            if let Some(origin) = page_url.as_ref() {
                sink.emit(ClipEvent::Stage(Stage::DownloadingMedia));
                let media = MediaSettings {
                    assets_dir: job.layout.assets_dir(),
                    naming: job.module.clone(),
                    origin: origin.clone(),
                    on_error: self.asset_policy,
                };
                let plan = plan_assets(target, &media);
                clip_debug!("planned {} media assets", plan.len());
                (assets, rewrites) =
                    download_assets(self.fetcher.as_ref(), &plan, &media, sink).await?;
            }
        }

        sink.emit(ClipEvent::Stage(Stage::Rendering));
        let rules = SanitizeRules::new(job.notes.clone());
        let cleaned = sanitize_fragment(target, &rules, &rewrites);
        let markdown = render_markdown(&cleaned);
        let document = if job.frontmatter {
            build_note_document(
                &job.source.to_string(),
                title.as_deref(),
                &decoded.encoding,
                &self.clipped_utc,
                &markdown,
            )
        } else {
            markdown
        };
        let document = normalize_blank_lines(&document);

        sink.emit(ClipEvent::Stage(Stage::Writing));
        ensure_vault_layout(&job.layout)?;
        let writer = AtomicFileWriter::new(job.layout.section_dir());
        let note_filename = format!("{}.md", sanitize_component(&job.module.name));
        let note_path = writer.write_str(&note_filename, &document)?;
        sink.emit(ClipEvent::NoteWritten {
            path: note_path.clone(),
        });

        sink.emit(ClipEvent::Stage(Stage::Done));
        Ok(RunOutcome {
            note_path,
            assets,
            preview: prepare_preview_content(&document),
        })
    }

    /// Blocking front door for the app: owns a private tokio runtime, so
    /// callers never see async.
    pub fn run_blocking(&self, job: &ClipJob, sink: &dyn ProgressSink) -> Result<RunOutcome, ClipError> {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.run(job, sink))
    }

    /// Raw bytes plus content type and the URL media resolves against.
    async fn obtain(
        &self,
        source: &Source,
    ) -> Result<(Vec<u8>, Option<String>, Option<Url>), ClipError> {
        match source {
            Source::Url(url) => {
                let page = self.fetcher.fetch_page(url).await?;
                let final_url = Url::parse(&page.final_url)
                    .map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
                Ok((page.bytes, page.content_type, Some(final_url)))
            }
            Source::File(path) => {
                let bytes = fs::read(path)?;
                Ok((bytes, None, None))
            }
        }
    }
}
