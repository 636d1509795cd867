use std::fs;
use std::path::{Path, PathBuf};

use scraper::Html;
use serde_json::json;

use clip_logging::clip_info;

use crate::decode::{decode_html, DecodeError};
use crate::normalize::normalize_blank_lines;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::render::render_markdown;
use crate::sanitize::{sanitize_fragment, MediaRewrites, SanitizeRules};

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode {file}: {source}")]
    Decode {
        file: String,
        source: DecodeError,
    },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub total_words: u64,
    pub manifest_path: PathBuf,
}

/// Converts every `*.html` file in `input_dir`, in name order, into a
/// `{stem}.md` note in `output_dir`, whole document, no media download.
/// A `manifest.json` summarizing the run is written alongside the notes.
pub fn convert_directory(input_dir: &Path, output_dir: &Path) -> Result<BatchSummary, BatchError> {
    let mut entries: Vec<_> = fs::read_dir(input_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("html"))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let rules = SanitizeRules::default();
    let rewrites = MediaRewrites::new();

    let mut files = Vec::new();
    let mut total_words: u64 = 0;
    for entry in entries {
        let path = entry.path();
        let bytes = fs::read(&path)?;
        let decoded = decode_html(&bytes, None).map_err(|source| BatchError::Decode {
            file: path.display().to_string(),
            source,
        })?;

        let doc = Html::parse_document(&decoded.html);
        let cleaned = sanitize_fragment(doc.root_element(), &rules, &rewrites);
        let markdown = normalize_blank_lines(&render_markdown(&cleaned));

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        let output_name = format!("{stem}.md");
        let output_path = writer.write_str(&output_name, &markdown)?;
        clip_info!("converted {} -> {}", path.display(), output_path.display());

        let words = markdown.split_whitespace().count() as u64;
        total_words += words;
        files.push(json!({
            "source": path.display().to_string(),
            "output": output_name,
            "words": words,
        }));
    }

    let manifest = json!({
        "converted": files.len(),
        "total_words": total_words,
        "files": files,
    });
    let manifest_path = writer.write_str("manifest.json", &manifest.to_string())?;

    Ok(BatchSummary {
        converted: files.len(),
        total_words,
        manifest_path,
    })
}
