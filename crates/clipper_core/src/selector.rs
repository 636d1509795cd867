use thiserror::Error;

/// How the pipeline picks the subtree to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// Convert the whole document.
    WholeDocument,
    /// First element carrying this id.
    ById(String),
    /// First element with this tag name, in document order.
    ByTag(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorKindError {
    #[error("invalid selector kind {0:?} (expected document, id, or tag)")]
    UnknownKind(String),
    #[error("selector kind {0:?} requires a value")]
    MissingValue(String),
}

impl TargetSelector {
    /// Parses the interactive `kind` / `value` pair.
    ///
    /// `document` takes no value; `id` and `tag` require a non-empty one.
    pub fn parse(kind: &str, value: &str) -> Result<Self, SelectorKindError> {
        let kind = kind.trim().to_ascii_lowercase();
        let value = value.trim();
        match kind.as_str() {
            "document" => Ok(Self::WholeDocument),
            "id" | "tag" if value.is_empty() => Err(SelectorKindError::MissingValue(kind)),
            "id" => Ok(Self::ById(value.to_string())),
            "tag" => Ok(Self::ByTag(value.to_ascii_lowercase())),
            _ => Err(SelectorKindError::UnknownKind(kind)),
        }
    }
}

impl std::fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetSelector::WholeDocument => write!(f, "whole document"),
            TargetSelector::ById(id) => write!(f, "id={id}"),
            TargetSelector::ByTag(tag) => write!(f, "tag={tag}"),
        }
    }
}

/// Element type (optionally class-scoped) treated as callout content and
/// re-emitted as a blockquote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesSelector {
    pub element: String,
    pub class: Option<String>,
}

impl NotesSelector {
    pub fn new(element: impl Into<String>, class: Option<String>) -> Self {
        Self {
            element: element.into().to_ascii_lowercase(),
            class: class.filter(|c| !c.trim().is_empty()),
        }
    }
}
