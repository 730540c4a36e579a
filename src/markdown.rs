use crate::loader::{LoadOutcome, LoadedContent};
use crate::metadata;
use crate::reader::RenderedDocument;

const IMAGE_ALT: &str = "Illustration";

/// Render a load outcome as a single Markdown document.
///
/// Paragraph text stays HTML-escaped; Markdown renders the entities as the
/// original characters.
pub fn render_outcome(outcome: &LoadOutcome) -> String {
    let mut md = metadata::format_metadata(outcome);

    match &outcome.content {
        LoadedContent::Document(doc) | LoadedContent::Placeholder(doc) => {
            md.push_str(&document_to_markdown(doc));
        }
        LoadedContent::PdfNotice { href } => {
            md.push_str(&format!("[Download PDF]({})\n", href));
        }
    }

    clean_markdown(&md)
}

fn document_to_markdown(doc: &RenderedDocument) -> String {
    let mut md = String::new();

    for (i, chapter) in doc.chapters.iter().enumerate() {
        if i > 0 {
            md.push_str("\n---\n\n");
        }
        if let Some(ref title) = chapter.title {
            md.push_str(&format!("## {}\n\n", title));
        }
        for paragraph in &chapter.paragraphs {
            md.push_str(paragraph);
            md.push_str("\n\n");
        }
        for src in &chapter.images {
            md.push_str(&format!("![{}]({})\n\n", IMAGE_ALT, src));
        }
    }

    md
}

pub fn clean_markdown(md: &str) -> String {
    let mut result = md.to_string();

    // Collapse 3+ consecutive blank lines to 2
    while result.contains("\n\n\n") {
        result = result.replace("\n\n\n", "\n\n");
    }

    // Trim trailing whitespace per line
    result = result
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    // Ensure single trailing newline
    let trimmed = result.trim_end().to_string();
    if trimmed.is_empty() {
        String::new()
    } else {
        trimmed + "\n"
    }
}
