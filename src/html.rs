//! HTML fragment rendering for the reader content pane.

use crate::reader::{ChapterBlock, RenderedDocument};

const IMAGE_ALT: &str = "Illustration";

/// Escape text for use between tags.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Render every chapter as a `<section class="chapter">` block.
pub fn render_document(doc: &RenderedDocument) -> String {
    let mut html = String::new();
    for (position, chapter) in doc.chapters.iter().enumerate() {
        render_chapter(&mut html, chapter, position + 1);
    }
    html
}

fn render_chapter(html: &mut String, chapter: &ChapterBlock, number: usize) {
    html.push_str(&format!(
        "<section class=\"chapter\" data-chapter=\"{}\">\n",
        number
    ));

    if let Some(ref title) = chapter.title {
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(title)));
    }

    // Paragraphs are escaped when extracted.
    for paragraph in &chapter.paragraphs {
        html.push_str(&format!("<p>{}</p>\n", paragraph));
    }

    for src in &chapter.images {
        html.push_str(&format!(
            "<div class=\"book-image\"><img src=\"{}\" alt=\"{}\" loading=\"lazy\" /></div>\n",
            escape_attr(src),
            IMAGE_ALT
        ));
    }

    html.push_str("</section>\n");
}

/// Download notice shown instead of inline PDF content.
pub fn render_pdf_notice(title: &str, href: &str) -> String {
    format!(
        "<div class=\"pdf-container\">\n\
         <h3>{}</h3>\n\
         <p>To read this PDF, download it using the link below:</p>\n\
         <a href=\"{}\" class=\"btn-primary\" download>Download PDF</a>\n\
         </div>\n",
        escape_html(title),
        escape_attr(href)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters_only() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            r#"&lt;b&gt;"Tom" &amp; 'Jerry'&lt;/b&gt;"#
        );
        assert_eq!(escape_attr(r#"a"b"#), "a&quot;b");
    }

    #[test]
    fn untitled_chapter_has_no_heading() {
        let doc = RenderedDocument {
            chapters: vec![ChapterBlock {
                index: 0,
                title: None,
                paragraphs: vec!["Hello world, this is long enough.".to_string()],
                images: vec![],
            }],
        };
        let html = render_document(&doc);
        assert!(!html.contains("<h2>"));
        assert!(html.contains("<section class=\"chapter\" data-chapter=\"1\">"));
        assert!(html.contains("<p>Hello world, this is long enough.</p>"));
    }

    #[test]
    fn chapters_are_numbered_by_position_and_images_rendered() {
        let doc = RenderedDocument {
            chapters: vec![
                ChapterBlock {
                    index: 0,
                    title: Some("One & Two".to_string()),
                    paragraphs: vec!["a".to_string()],
                    images: vec![],
                },
                ChapterBlock {
                    index: 3,
                    title: None,
                    paragraphs: vec![],
                    images: vec!["books/x/images/p.jpg".to_string()],
                },
            ],
        };
        let html = render_document(&doc);
        assert!(html.contains("<h2>One &amp; Two</h2>"));
        assert!(html.contains("data-chapter=\"2\""));
        assert!(html.contains(
            "<img src=\"books/x/images/p.jpg\" alt=\"Illustration\" loading=\"lazy\" />"
        ));
    }

    #[test]
    fn pdf_notice_links_to_file() {
        let html = render_pdf_notice("Manual", "books/m/manual.pdf");
        assert!(html.contains("<h3>Manual</h3>"));
        assert!(html.contains("href=\"books/m/manual.pdf\""));
    }
}
