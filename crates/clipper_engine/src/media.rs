use std::path::PathBuf;

use ego_tree::{NodeId, NodeRef};
use scraper::node::Node;
use scraper::ElementRef;
use url::Url;

use clip_logging::{clip_debug, clip_warn};
use clipper_core::ModuleNaming;

use crate::fetch::Fetcher;
use crate::persist::AtomicFileWriter;
use crate::sanitize::{is_stripped_tag, MediaRewrites};
use crate::types::{ClipError, ClipEvent, ProgressSink, SavedAsset};

const MEDIA_TAGS: &[&str] = &["img", "video", "audio"];

/// What to do when one asset download fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetFailurePolicy {
    /// Abort the run. Assets already on disk stay; no note is written.
    #[default]
    Abort,
    /// Leave the element unrewritten and keep going.
    Skip,
}

#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub assets_dir: PathBuf,
    pub naming: ModuleNaming,
    /// Page URL that relative sources resolve against.
    pub origin: Url,
    pub on_error: AssetFailurePolicy,
}

/// One media element scheduled for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAsset {
    pub node: NodeId,
    pub url: Url,
    pub filename: String,
}

/// Walks the subtree for `img`/`video`/`audio` elements and assigns each a
/// resolved URL and a `{prefix}_{module}_{counter}.{ext}` filename, counting
/// 1..M in document order.
///
/// Subtrees the sanitizer drops (stripped containers, flattened `a`
/// elements) are not walked, so nothing is downloaded that the note cannot
/// reference. Elements without a usable source are skipped; sources that do
/// not resolve against the origin are skipped with a warning.
pub fn plan_assets(root: ElementRef, settings: &MediaSettings) -> Vec<PlannedAsset> {
    let mut sources = Vec::new();
    collect_sources(*root, &mut sources);

    let mut plan = Vec::new();
    for (node, raw) in sources {
        let url = match settings.origin.join(&raw) {
            Ok(url) => url,
            Err(err) => {
                clip_warn!("skipping media source {raw:?}: {err}");
                continue;
            }
        };
        let ext = extension_for(&url);
        let filename = settings.naming.asset_filename(plan.len() + 1, &ext);
        plan.push(PlannedAsset {
            node,
            url,
            filename,
        });
    }
    plan
}

fn collect_sources(node: NodeRef<'_, Node>, found: &mut Vec<(NodeId, String)>) {
    let Some(el) = ElementRef::wrap(node) else {
        for child in node.children() {
            collect_sources(child, found);
        }
        return;
    };
    let name = el.value().name();
    if is_stripped_tag(name) || name == "a" {
        return;
    }
    if MEDIA_TAGS.contains(&name) {
        if let Some(src) = element_source(el) {
            found.push((el.id(), src));
        }
        return;
    }
    for child in el.children() {
        collect_sources(child, found);
    }
}

/// The element's own `src`, else the `src` of its first `source` child.
fn element_source(el: ElementRef<'_>) -> Option<String> {
    if let Some(src) = el.value().attr("src") {
        return Some(src.to_string());
    }
    el.children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "source")
        .and_then(|source| source.value().attr("src"))
        .map(str::to_string)
}

/// Extension from the last path segment; the URL path never carries the
/// query string. Extension-less segments fall back to `bin`.
fn extension_for(url: &Url) -> String {
    url.path()
        .rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("bin")
        .to_string()
}

/// Downloads the planned assets in order, writes each into the assets
/// directory, and returns the saved records plus the rewrite map for the
/// sanitizer. Only downloaded assets get a token, so a skipped failure
/// leaves its element untouched.
pub async fn download_assets(
    fetcher: &dyn Fetcher,
    plan: &[PlannedAsset],
    settings: &MediaSettings,
    sink: &dyn ProgressSink,
) -> Result<(Vec<SavedAsset>, MediaRewrites), ClipError> {
    let writer = AtomicFileWriter::new(settings.assets_dir.clone());
    let mut saved = Vec::new();
    let mut rewrites = MediaRewrites::new();

    for asset in plan {
        clip_debug!("fetching media asset {}", asset.url);
        let bytes = match fetcher.fetch_bytes(asset.url.as_str()).await {
            Ok(bytes) => bytes,
            Err(err) => match settings.on_error {
                AssetFailurePolicy::Abort => {
                    return Err(ClipError::Asset {
                        url: asset.url.to_string(),
                        source: err,
                    });
                }
                AssetFailurePolicy::Skip => {
                    clip_warn!("skipping asset {}: {err}", asset.url);
                    continue;
                }
            },
        };
        let path = writer.write(&asset.filename, &bytes)?;
        sink.emit(ClipEvent::AssetSaved {
            filename: asset.filename.clone(),
            bytes: bytes.len() as u64,
        });
        rewrites.insert(asset.node, format!("![[{}]]", asset.filename));
        saved.push(SavedAsset {
            source_url: asset.url.to_string(),
            filename: asset.filename.clone(),
            path,
        });
    }

    Ok((saved, rewrites))
}
