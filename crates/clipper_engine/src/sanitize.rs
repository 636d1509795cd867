use std::collections::HashMap;

use ego_tree::{NodeId, NodeRef};
use scraper::node::Node;
use scraper::ElementRef;

use clipper_core::NotesSelector;

/// Embed token per media-element node, produced by the media extractor.
pub type MediaRewrites = HashMap<NodeId, String>;

/// Elements dropped with their entire subtree.
const STRIPPED_TAGS: &[&str] = &[
    "figure", "style", "script", "noscript", "head", "template", "iframe",
];

/// Tags that never take children or a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub(crate) fn is_stripped_tag(name: &str) -> bool {
    STRIPPED_TAGS.contains(&name)
}

fn is_void_tag(name: &str) -> bool {
    VOID_TAGS.contains(&name)
}

/// What the sanitizer rewrites besides the fixed strip list.
#[derive(Debug, Clone, Default)]
pub struct SanitizeRules {
    notes: Option<NotesSelector>,
}

impl SanitizeRules {
    pub fn new(notes: Option<NotesSelector>) -> Self {
        Self { notes }
    }

    fn is_note(&self, el: &ElementRef) -> bool {
        let Some(notes) = &self.notes else {
            return false;
        };
        if el.value().name() != notes.element {
            return false;
        }
        match &notes.class {
            None => true,
            Some(class) => el
                .value()
                .attr("class")
                .map(|attr| attr.split_whitespace().any(|c| c == class))
                .unwrap_or(false),
        }
    }
}

/// Re-serializes the selected subtree as cleaned HTML.
///
/// The cleaning transforms are expressed here, at serialization time,
/// instead of mutating the parsed tree:
/// - stripped containers vanish with their children;
/// - `a` elements flatten to their visible text;
/// - notes elements are re-emitted as `blockquote`;
/// - `pre` folding its first `code` child keeps the language class on the
///   fence owner;
/// - media elements with a planned rewrite come back with the embed token
///   as their only source and no children.
pub fn sanitize_fragment(
    root: ElementRef,
    rules: &SanitizeRules,
    rewrites: &MediaRewrites,
) -> String {
    let mut out = String::new();
    write_element(root, rules, rewrites, &mut out);
    out
}

fn write_node(node: NodeRef<Node>, rules: &SanitizeRules, rewrites: &MediaRewrites, out: &mut String) {
    match node.value() {
        Node::Text(text) => push_escaped_text(text, out),
        Node::Element(_) => {
            if let Some(el) = ElementRef::wrap(node) {
                write_element(el, rules, rewrites, out);
            }
        }
        // Comments, doctypes, and processing instructions are dropped.
        _ => {}
    }
}

fn write_element(el: ElementRef, rules: &SanitizeRules, rewrites: &MediaRewrites, out: &mut String) {
    let name = el.value().name();
    if is_stripped_tag(name) {
        return;
    }
    if name == "a" {
        for text in el.text() {
            push_escaped_text(text, out);
        }
        return;
    }
    if let Some(token) = rewrites.get(&el.id()) {
        out.push('<');
        out.push_str(name);
        push_attr("src", token, out);
        out.push('>');
        if !is_void_tag(name) {
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        return;
    }
    if name == "pre" {
        if let Some(code) = first_element_child(el).filter(|c| c.value().name() == "code") {
            out.push_str("<pre");
            if let Some(class) = code.value().attr("class") {
                push_attr("class", class, out);
            }
            out.push('>');
            for text in code.text() {
                push_escaped_text(text, out);
            }
            out.push_str("</pre>");
            return;
        }
    }

    let emitted = if rules.is_note(&el) { "blockquote" } else { name };
    out.push('<');
    out.push_str(emitted);
    for (attr, value) in el.value().attrs() {
        push_attr(attr, value, out);
    }
    out.push('>');
    if is_void_tag(emitted) {
        return;
    }
    for child in el.children() {
        write_node(child, rules, rewrites, out);
    }
    out.push_str("</");
    out.push_str(emitted);
    out.push('>');
}

fn first_element_child(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.children().find_map(ElementRef::wrap)
}

fn push_escaped_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_attr(name: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
