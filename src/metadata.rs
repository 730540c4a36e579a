use crate::loader::LoadOutcome;

/// Markdown header with the book's bibliographic data.
pub fn format_metadata(book: &LoadOutcome) -> String {
    let title = book.title.as_str();
    let authors = &book.authors;
    let mut lines = Vec::new();

    if !title.trim().is_empty() {
        lines.push(format!("# {}", title.trim()));
        lines.push(String::new());
    }

    if !authors.is_empty() {
        lines.push(format!("**Author:** {}", authors.join(", ")));
    }

    if let Some(ref language) = book.language {
        lines.push(format!("**Language:** {}", language));
    }

    if let Some(ref annotation) = book.annotation {
        lines.push(String::new());
        for paragraph in annotation.split("\n\n") {
            lines.push(format!("> {}", paragraph));
            lines.push(">".to_string());
        }
        lines.pop();
    }

    if !lines.is_empty() {
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
    }

    let result = lines.join("\n");
    // Ensure the metadata block ends with a trailing newline
    if result.is_empty() {
        result
    } else {
        result + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadedContent;
    use crate::reader::RenderedDocument;

    fn outcome(title: &str, authors: &[&str]) -> LoadOutcome {
        LoadOutcome {
            title: title.to_string(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
            language: None,
            annotation: None,
            content: LoadedContent::Document(RenderedDocument::default()),
        }
    }

    #[test]
    fn header_with_title_and_authors() {
        let header = format_metadata(&outcome("War and Peace", &["Leo Tolstoy"]));
        assert_eq!(
            header,
            "# War and Peace\n\n**Author:** Leo Tolstoy\n\n---\n\n"
        );
    }

    #[test]
    fn language_and_annotation_follow_authors() {
        let mut book = outcome("Anna", &["Tolstoy"]);
        book.language = Some("ru".to_string());
        book.annotation = Some("A novel.\n\nIn eight parts.".to_string());
        assert_eq!(
            format_metadata(&book),
            "# Anna\n\n**Author:** Tolstoy\n**Language:** ru\n\n> A novel.\n>\n> In eight parts.\n\n---\n\n"
        );
    }

    #[test]
    fn empty_metadata_is_empty() {
        assert_eq!(format_metadata(&outcome("  ", &[])), "");
    }
}
