use scraper::{ElementRef, Html};
use thiserror::Error;

use clipper_core::TargetSelector;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("target not found: {0}")]
    NotFound(String),
}

/// Selects the subtree to convert: the whole document, the element with a
/// given id, or the first element with a given tag name in document order.
///
/// Duplicate ids are not corrected; the first match wins, mirroring the
/// parser.
pub fn locate_target<'a>(
    doc: &'a Html,
    target: &TargetSelector,
) -> Result<ElementRef<'a>, LocateError> {
    let root = doc.root_element();
    match target {
        TargetSelector::WholeDocument => Ok(root),
        TargetSelector::ById(id) => root
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id.as_str()))
            .ok_or_else(|| LocateError::NotFound(target.to_string())),
        TargetSelector::ByTag(tag) => root
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name().eq_ignore_ascii_case(tag))
            .ok_or_else(|| LocateError::NotFound(target.to_string())),
    }
}

/// The text of the document's `<title>`, if any, for frontmatter.
pub fn document_title(doc: &Html) -> Option<String> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "title")
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}
