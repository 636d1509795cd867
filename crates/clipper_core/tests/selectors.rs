use clipper_core::{NotesSelector, SelectorKindError, TargetSelector};
use pretty_assertions::assert_eq;

#[test]
fn document_kind_ignores_value() {
    let sel = TargetSelector::parse("document", "").unwrap();
    assert_eq!(sel, TargetSelector::WholeDocument);

    let sel = TargetSelector::parse(" Document ", "ignored").unwrap();
    assert_eq!(sel, TargetSelector::WholeDocument);
}

#[test]
fn id_and_tag_kinds_take_their_value() {
    assert_eq!(
        TargetSelector::parse("id", "main-content").unwrap(),
        TargetSelector::ById("main-content".to_string())
    );
    assert_eq!(
        TargetSelector::parse("tag", "ARTICLE").unwrap(),
        TargetSelector::ByTag("article".to_string())
    );
}

#[test]
fn unknown_kind_is_rejected() {
    let err = TargetSelector::parse("css", ".main").unwrap_err();
    assert_eq!(err, SelectorKindError::UnknownKind("css".to_string()));
}

#[test]
fn id_kind_without_value_is_rejected() {
    let err = TargetSelector::parse("id", "  ").unwrap_err();
    assert_eq!(err, SelectorKindError::MissingValue("id".to_string()));
}

#[test]
fn notes_selector_drops_blank_class() {
    let notes = NotesSelector::new("ASIDE", Some("   ".to_string()));
    assert_eq!(notes.element, "aside");
    assert_eq!(notes.class, None);

    let notes = NotesSelector::new("div", Some("callout".to_string()));
    assert_eq!(notes.class.as_deref(), Some("callout"));
}
