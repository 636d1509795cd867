use std::path::PathBuf;

use crate::layout::VaultLayout;
use crate::selector::{NotesSelector, TargetSelector};

/// Where the raw HTML comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// Media downloads need a page URL to resolve sources against.
    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Url(_))
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Naming parameters for one module: the note filename stem plus the
/// prefix/number pair used for downloaded media.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNaming {
    pub name: String,
    pub number: String,
    pub media_prefix: String,
}

impl ModuleNaming {
    pub fn new(name: &str, number: &str, media_prefix: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            number: number.trim().to_string(),
            media_prefix: media_prefix.trim().to_string(),
        }
    }

    /// `{prefix}_{module_number}_{counter}.{ext}`
    pub fn asset_filename(&self, counter: usize, ext: &str) -> String {
        format!("{}_{}_{}.{}", self.media_prefix, self.number, counter, ext)
    }
}

/// Everything one pipeline run needs, gathered up front.
///
/// The five divergent original entry points collapse into this one
/// configuration: batch and single-file runs are the same pipeline with
/// different sources and toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipJob {
    pub source: Source,
    pub layout: VaultLayout,
    pub module: ModuleNaming,
    pub target: TargetSelector,
    pub notes: Option<NotesSelector>,
    /// Prepend YAML frontmatter (source, title, clipped, encoding).
    pub frontmatter: bool,
    /// Download media and rewrite sources to embed tokens. Only effective
    /// for remote sources; local files have no origin to resolve against.
    pub download_media: bool,
}

impl ClipJob {
    pub fn new(source: Source, layout: VaultLayout, module: ModuleNaming) -> Self {
        let download_media = source.is_remote();
        Self {
            source,
            layout,
            module,
            target: TargetSelector::WholeDocument,
            notes: None,
            frontmatter: false,
            download_media,
        }
    }

    pub fn with_target(mut self, target: TargetSelector) -> Self {
        self.target = target;
        self
    }

    pub fn with_notes(mut self, notes: Option<NotesSelector>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_frontmatter(mut self, frontmatter: bool) -> Self {
        self.frontmatter = frontmatter;
        self
    }
}
