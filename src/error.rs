use thiserror::Error;

/// Everything that can stop a book from turning into a document.
///
/// The loader treats every variant the same way: it logs the error and
/// commits the placeholder document instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// No candidate encoding produced text that looks like a FictionBook.
    #[error("no candidate encoding produced a recognizable FictionBook document")]
    NoValidEncoding,

    /// The XML parser rejected the document structure.
    #[error("malformed markup: {0}")]
    MalformedMarkup(String),

    /// Neither a `body` nor any `section` element exists.
    #[error("no readable content found")]
    NoReadableContent,

    /// Parsing succeeded but no chapter carried paragraphs or images.
    #[error("no content extracted from book")]
    EmptyDocument,

    /// Fetching the raw book failed (bad status, I/O or network error).
    #[error("failed to fetch book: {0}")]
    TransportFailure(String),
}

pub type LoadResult<T> = std::result::Result<T, LoadError>;
