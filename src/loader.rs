//! Book loading pipeline: fetch, decode, parse, and fall back to a fixed
//! placeholder document whenever any stage fails.

use crate::config::{BookConfig, BookFormat};
use crate::error::LoadResult;
use crate::fb2::{Fb2Document, Fb2Reader};
use crate::html::escape_html;
use crate::reader::{BookDescriptor, BookReader, ChapterBlock, RenderedDocument};
use crate::source;
use crate::txt::TxtReader;

/// What a load run hands to the content pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedContent {
    Document(RenderedDocument),
    /// A stage failed; the fixed placeholder stands in for the book.
    Placeholder(RenderedDocument),
    /// PDF books are offered for download instead of being rendered.
    PdfNotice { href: String },
}

impl LoadedContent {
    pub fn chapter_count(&self) -> usize {
        match self {
            Self::Document(doc) | Self::Placeholder(doc) => doc.chapters.len(),
            Self::PdfNotice { .. } => 0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Result of one load, with the bibliographic data resolved along the way.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub title: String,
    pub authors: Vec<String>,
    pub language: Option<String>,
    pub annotation: Option<String>,
    pub content: LoadedContent,
}

/// Load the book at `location`. Never fails: errors become the placeholder.
pub fn load(location: &str, format: BookFormat, config: &BookConfig) -> LoadOutcome {
    let mut title = config.title.trim().to_string();
    let mut authors: Vec<String> = Some(config.author.trim())
        .filter(|a| !a.is_empty())
        .map(|a| vec![a.to_string()])
        .unwrap_or_default();
    log::debug!("loading {} as {}", location, format);

    if format == BookFormat::Pdf {
        return LoadOutcome {
            title: fallback_title(title),
            authors,
            language: None,
            annotation: None,
            content: LoadedContent::PdfNotice {
                href: location.to_string(),
            },
        };
    }

    let bytes = match source::fetch(location) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("showing placeholder for {}: {}", location, e);
            let title = fallback_title(title);
            return LoadOutcome {
                content: LoadedContent::Placeholder(placeholder_document(&title)),
                title,
                authors,
                language: None,
                annotation: None,
            };
        }
    };

    let mut language = None;
    let mut annotation = None;
    let (title, converted) = match format {
        BookFormat::Fb2 => match Fb2Document::from_bytes(&bytes) {
            Ok(book) => {
                let meta = book.metadata();
                if title.is_empty() {
                    title = meta.title.unwrap_or_default();
                }
                if authors.is_empty() {
                    authors = meta.authors;
                }
                language = meta.language;
                annotation = meta.annotation;

                let title = fallback_title(title);
                let converted = book.chapters(&title, config.folder.as_deref());
                (title, converted)
            }
            Err(e) => (fallback_title(title), Err(e)),
        },
        _ => {
            let title = fallback_title(title);
            let converted = convert(&BookDescriptor {
                format,
                bytes: &bytes,
                title_hint: &title,
                folder: config.folder.as_deref(),
            });
            (title, converted)
        }
    };

    let content = match converted {
        Ok(doc) => {
            log::info!("loaded {} chapters from {}", doc.chapters.len(), location);
            LoadedContent::Document(doc)
        }
        Err(e) => {
            log::warn!("showing placeholder for {}: {}", location, e);
            LoadedContent::Placeholder(placeholder_document(&title))
        }
    };

    LoadOutcome {
        title,
        authors,
        language,
        annotation,
        content,
    }
}

/// Pure conversion of one descriptor into a document.
pub fn convert(book: &BookDescriptor<'_>) -> LoadResult<RenderedDocument> {
    reader_for(book.format).read(book)
}

fn reader_for(format: BookFormat) -> &'static dyn BookReader {
    match format {
        BookFormat::Fb2 => &Fb2Reader,
        // PDFs never reach conversion; read them as text if asked to.
        BookFormat::Txt | BookFormat::Pdf => &TxtReader,
    }
}

fn fallback_title(title: String) -> String {
    if title.trim().is_empty() {
        "Book".to_string()
    } else {
        title
    }
}

/// The fixed three-chapter document shown when a book cannot be loaded.
pub fn placeholder_document(title: &str) -> RenderedDocument {
    let title = escape_html(title);
    let chapter = |index: usize, heading: &str, paragraphs: Vec<String>| ChapterBlock {
        index,
        title: Some(heading.to_string()),
        paragraphs,
        images: Vec::new(),
    };

    RenderedDocument {
        chapters: vec![
            chapter(
                0,
                "Introduction",
                vec![
                    format!("This is placeholder content for the book \"{}\".", title),
                    "The original book file is temporarily unavailable or still being processed."
                        .to_string(),
                    "Please try reloading the page later or contact support.".to_string(),
                ],
            ),
            chapter(
                1,
                "About the book",
                vec![
                    format!(
                        "\"{}\" is a literary work available for reading in our digital library.",
                        title
                    ),
                    "For the most comfortable reading you can adjust the background, page and text colors to your liking."
                        .to_string(),
                ],
            ),
            chapter(
                2,
                "Reading features",
                vec![
                    "• Color scheme settings for comfortable reading".to_string(),
                    "• Two reading modes: paged and scrolling".to_string(),
                    "• Reading progress is saved".to_string(),
                    "• Responsive layout for mobile devices".to_string(),
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::render_document;
    use std::io::Write;

    const PLACEHOLDER_HEADINGS: [&str; 3] = ["Introduction", "About the book", "Reading features"];

    fn write_book(contents: &[u8], suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    fn config() -> BookConfig {
        BookConfig {
            id: "test".to_string(),
            title: "Test Book".to_string(),
            author: "A. Writer".to_string(),
            folder: Some("books/test/".to_string()),
            ..BookConfig::default()
        }
    }

    fn assert_placeholder(outcome: &LoadOutcome) {
        let LoadedContent::Placeholder(doc) = &outcome.content else {
            panic!("expected placeholder, got {:?}", outcome.content);
        };
        let html = render_document(doc);
        for heading in PLACEHOLDER_HEADINGS {
            assert!(html.contains(&format!("<h2>{}</h2>", heading)));
        }
    }

    #[test]
    fn loads_fb2_book() {
        let file = write_book(
            br#"<?xml version="1.0"?><FictionBook><body><section><title><p>Start</p></title><p>It was a dark and stormy night.</p><image href="map.png"/></section></body></FictionBook>"#,
            ".fb2",
        );
        let outcome = load(&file.path().to_string_lossy(), BookFormat::Fb2, &config());

        assert_eq!(outcome.title, "Test Book");
        assert_eq!(outcome.authors, vec!["A. Writer"]);
        let LoadedContent::Document(doc) = outcome.content else {
            panic!("expected document");
        };
        assert_eq!(doc.chapters[0].title.as_deref(), Some("Start"));
        assert_eq!(doc.chapters[0].images, vec!["books/test/images/map.png"]);
    }

    #[test]
    fn malformed_fb2_falls_back_to_placeholder() {
        let file = write_book(
            b"<?xml version=\"1.0\"?><FictionBook><body><section><p>broken</body></FictionBook>",
            ".fb2",
        );
        let outcome = load(&file.path().to_string_lossy(), BookFormat::Fb2, &config());
        assert_placeholder(&outcome);
        assert!(outcome.content.is_placeholder());
        assert_eq!(outcome.content.chapter_count(), 3);
    }

    #[test]
    fn undecodable_and_missing_files_fall_back() {
        let file = write_book(b"no markers in here", ".fb2");
        assert_placeholder(&load(&file.path().to_string_lossy(), BookFormat::Fb2, &config()));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.fb2");
        assert_placeholder(&load(&missing.to_string_lossy(), BookFormat::Fb2, &config()));
    }

    #[test]
    fn metadata_fills_missing_configuration() {
        let file = write_book(
            br#"<FictionBook><description><title-info><author><first-name>Anna</first-name><last-name>Karenina</last-name></author><book-title>Untold</book-title></title-info></description><body><p>Paragraph long enough to keep.</p></body></FictionBook>"#,
            ".fb2",
        );
        let outcome = load(
            &file.path().to_string_lossy(),
            BookFormat::Fb2,
            &BookConfig::default(),
        );
        assert_eq!(outcome.title, "Untold");
        assert_eq!(outcome.authors, vec!["Anna Karenina"]);
        let LoadedContent::Document(doc) = outcome.content else {
            panic!("expected document");
        };
        assert_eq!(doc.chapters[0].title.as_deref(), Some("Untold"));
    }

    #[test]
    fn loads_txt_book() {
        let file = write_book(b"Call me Ishmael. Some years ago.\n\nNever mind how long.", ".txt");
        let outcome = load(&file.path().to_string_lossy(), BookFormat::Txt, &config());
        assert_eq!(outcome.content.chapter_count(), 1);
        assert!(!outcome.content.is_placeholder());
    }

    #[test]
    fn pdf_is_offered_for_download() {
        let outcome = load("books/test/manual.pdf", BookFormat::Pdf, &config());
        assert_eq!(
            outcome.content,
            LoadedContent::PdfNotice {
                href: "books/test/manual.pdf".to_string()
            }
        );
    }

    #[test]
    fn placeholder_escapes_title() {
        let doc = placeholder_document("<Evil>");
        assert!(doc.chapters[0].paragraphs[0].contains("&lt;Evil&gt;"));
    }
}
