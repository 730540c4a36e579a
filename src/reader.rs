use crate::config::BookFormat;
use crate::error::LoadResult;

/// One chapter of a converted book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterBlock {
    /// Position of the source section, used for the default label.
    pub index: usize,
    /// Heading text; `None` when the source had no usable title.
    pub title: Option<String>,
    /// HTML-escaped paragraph text
    pub paragraphs: Vec<String>,
    /// Resolved image paths
    pub images: Vec<String>,
}

impl ChapterBlock {
    pub fn default_title(index: usize) -> String {
        format!("Chapter {}", index + 1)
    }

    /// Title shown in tables of contents; falls back to the default label.
    pub fn label(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| Self::default_title(self.index))
    }

    /// Whether this chapter is worth emitting.
    pub fn has_content(&self) -> bool {
        self.paragraphs.iter().any(|p| !p.trim().is_empty()) || !self.images.is_empty()
    }
}

/// Ordered chapters of a successfully converted book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub chapters: Vec<ChapterBlock>,
}

/// Immutable input of a single conversion.
#[derive(Debug, Clone, Copy)]
pub struct BookDescriptor<'a> {
    pub format: BookFormat,
    pub bytes: &'a [u8],
    /// Title for chapters synthesized from untitled content.
    pub title_hint: &'a str,
    /// Book folder used to resolve relative image references.
    pub folder: Option<&'a str>,
}

/// A format that can turn raw bytes into a document.
pub trait BookReader {
    /// Convert the descriptor's bytes into chapters.
    fn read(&self, book: &BookDescriptor<'_>) -> LoadResult<RenderedDocument>;
}
