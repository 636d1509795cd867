use std::collections::HashMap;
use std::sync::OnceLock;

use html2md::{parse_html_custom, StructuredPrinter, TagHandler, TagHandlerFactory};
use markup5ever_rcdom::{Handle, NodeData};
use regex::Regex;

/// Converts sanitized HTML to Markdown.
///
/// Generic conversion is delegated to `html2md`; headings, code, and media
/// embeds carry custom rules:
/// - every heading is preceded by a horizontal rule;
/// - block code becomes a fenced block tagged from a `language-*` class;
/// - media elements whose source is an embed token emit the token verbatim.
///
/// A final pass collapses runs of 3+ asterisks left by malformed bold
/// markers to exactly 2.
pub fn render_markdown(html: &str) -> String {
    let mut handlers: HashMap<String, Box<dyn TagHandlerFactory>> = HashMap::new();
    for level in 1..=6 {
        handlers.insert(
            format!("h{level}"),
            Box::new(RuledHeadingFactory { level }),
        );
    }
    handlers.insert("pre".to_string(), Box::new(CodeFactory { block: true }));
    handlers.insert("code".to_string(), Box::new(CodeFactory { block: false }));
    for tag in ["img", "video", "audio"] {
        handlers.insert(tag.to_string(), Box::new(EmbedMediaFactory));
    }

    let markdown = parse_html_custom(html, &handlers);
    collapse_stray_bold(&markdown)
}

fn collapse_stray_bold(markdown: &str) -> String {
    static STRAY_BOLD: OnceLock<Regex> = OnceLock::new();
    let re = STRAY_BOLD.get_or_init(|| Regex::new(r"\*{3,}").unwrap());
    re.replace_all(markdown, "**").into_owned()
}

fn attr_value(tag: &Handle, name: &str) -> Option<String> {
    match tag.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn tag_name(tag: &Handle) -> Option<String> {
    match tag.data {
        NodeData::Element { ref name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// `language-{lang}` class, as emitted by most highlighters.
fn language_of(class_attr: &str) -> Option<String> {
    class_attr
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
        .map(str::to_string)
}

/// Renders `hN` as `\n\n---\n\n{#'s} {trimmed text}\n\n`.
struct RuledHeading {
    level: usize,
    start: usize,
}

impl TagHandler for RuledHeading {
    fn handle(&mut self, _tag: &Handle, printer: &mut StructuredPrinter) {
        self.start = printer.data.len();
    }

    fn after_handle(&mut self, printer: &mut StructuredPrinter) {
        let text = printer.data.split_off(self.start);
        let marks = "#".repeat(self.level);
        printer.append_str(&format!("\n\n---\n\n{marks} {}\n\n", text.trim()));
    }
}

struct RuledHeadingFactory {
    level: usize,
}

impl TagHandlerFactory for RuledHeadingFactory {
    fn instantiate(&self) -> Box<dyn TagHandler> {
        Box::new(RuledHeading {
            level: self.level,
            start: 0,
        })
    }
}

/// Fenced blocks for `pre`, backticks for inline `code`.
///
/// The sanitizer folds `pre > code` pairs into a single `pre`, so a `code`
/// still nested under a `pre` here adds no markup of its own.
struct CodeBlock {
    block: bool,
    inline: bool,
}

impl TagHandler for CodeBlock {
    fn handle(&mut self, tag: &Handle, printer: &mut StructuredPrinter) {
        if self.block {
            let lang = attr_value(tag, "class")
                .and_then(|class| language_of(&class))
                .unwrap_or_default();
            printer.append_str(&format!("\n\n```{lang}\n"));
        } else if printer.parent_chain.iter().all(|parent| parent != "pre") {
            self.inline = true;
            printer.append_str("`");
        }
    }

    fn after_handle(&mut self, printer: &mut StructuredPrinter) {
        if self.block {
            printer.append_str("\n```\n\n");
        } else if self.inline {
            printer.append_str("`");
        }
    }
}

struct CodeFactory {
    block: bool,
}

impl TagHandlerFactory for CodeFactory {
    fn instantiate(&self) -> Box<dyn TagHandler> {
        Box::new(CodeBlock {
            block: self.block,
            inline: false,
        })
    }
}

/// Embed tokens for downloaded media; plain image syntax otherwise.
struct EmbedMedia;

impl TagHandler for EmbedMedia {
    fn handle(&mut self, tag: &Handle, printer: &mut StructuredPrinter) {
        let src = attr_value(tag, "src");
        match src {
            Some(src) if src.starts_with("![[") => {
                printer.append_str(&format!("\n\n{src}\n\n"));
            }
            Some(src) if tag_name(tag).as_deref() == Some("img") => {
                let alt = attr_value(tag, "alt").unwrap_or_default();
                printer.append_str(&format!("![{alt}]({src})"));
            }
            // video/audio without a downloaded asset render nothing
            _ => {}
        }
    }

    fn after_handle(&mut self, _printer: &mut StructuredPrinter) {}

    fn skip_descendants(&self) -> bool {
        true
    }
}

struct EmbedMediaFactory;

impl TagHandlerFactory for EmbedMediaFactory {
    fn instantiate(&self) -> Box<dyn TagHandler> {
        Box::new(EmbedMedia)
    }
}
