/// Assembles the note: YAML frontmatter followed by the Markdown body.
pub fn build_note_document(
    source: &str,
    title: Option<&str>,
    encoding: &str,
    clipped_utc: &str,
    body_markdown: &str,
) -> String {
    let title = title.unwrap_or("untitled");
    format!(
        "---\nsource: {source}\ntitle: {title}\nclipped: {clipped_utc}\nencoding: {encoding}\n---\n\n{body_markdown}"
    )
}
