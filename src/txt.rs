use crate::error::{LoadError, LoadResult};
use crate::html::escape_html;
use crate::reader::{BookDescriptor, BookReader, ChapterBlock, RenderedDocument};

/// Paragraphs must be longer than this many characters.
const MIN_PARAGRAPH_CHARS: usize = 10;

/// Plain-text books: blank-line separated paragraphs in a single chapter.
pub struct TxtReader;

impl BookReader for TxtReader {
    fn read(&self, book: &BookDescriptor<'_>) -> LoadResult<RenderedDocument> {
        let text = String::from_utf8_lossy(book.bytes).replace("\r\n", "\n");

        let paragraphs: Vec<String> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
            .map(escape_html)
            .collect();

        if paragraphs.is_empty() {
            return Err(LoadError::EmptyDocument);
        }

        let title = book.title_hint.trim();
        Ok(RenderedDocument {
            chapters: vec![ChapterBlock {
                index: 0,
                title: (!title.is_empty()).then(|| title.to_string()),
                paragraphs,
                images: Vec::new(),
            }],
        })
    }
}
