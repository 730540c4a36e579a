use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Declared format of a book file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BookFormat {
    #[default]
    Fb2,
    Txt,
    Pdf,
}

impl BookFormat {
    /// Guess from a file name or URL; `None` for unknown extensions.
    pub fn from_location(location: &str) -> Option<Self> {
        let path = location.split(['?', '#']).next().unwrap_or(location);
        let ext = Path::new(path).extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "fb2" => Some(Self::Fb2),
            "txt" => Some(Self::Txt),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for BookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fb2 => "fb2",
            Self::Txt => "txt",
            Self::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

/// Per-book configuration, passed explicitly to every load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub id: String,
    pub title: String,
    pub author: String,
    /// Folder holding the book and its `images/` directory.
    pub folder: Option<String>,
    /// Location of the book file (path or URL).
    pub file: Option<String>,
    pub format: Option<BookFormat>,
}

/// A JSON list of books: `{ "books": [ ... ] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub books: Vec<BookConfig>,
}

impl Catalog {
    pub fn open(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))
    }

    pub fn find(&self, id: &str) -> Option<&BookConfig> {
        self.books.iter().find(|book| book.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn format_from_location() {
        assert_eq!(BookFormat::from_location("books/a/book.fb2"), Some(BookFormat::Fb2));
        assert_eq!(
            BookFormat::from_location("https://example.com/x/Book.TXT?v=2"),
            Some(BookFormat::Txt)
        );
        assert_eq!(BookFormat::from_location("manual.pdf"), Some(BookFormat::Pdf));
        assert_eq!(BookFormat::from_location("archive.zip"), None);
        assert_eq!(BookFormat::from_location("README"), None);
    }

    #[test]
    fn catalog_loads_and_finds_books() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"books": [
                {{"id": "war", "title": "War and Peace", "author": "Leo Tolstoy",
                  "folder": "books/war/", "file": "books/war/book.fb2", "format": "fb2"}},
                {{"id": "notes", "title": "Notes"}}
            ]}}"#
        )
        .unwrap();

        let catalog = Catalog::open(file.path()).unwrap();
        let war = catalog.find("war").unwrap();
        assert_eq!(war.folder.as_deref(), Some("books/war/"));
        assert_eq!(war.format, Some(BookFormat::Fb2));

        let notes = catalog.find("notes").unwrap();
        assert_eq!(notes.author, "");
        assert_eq!(notes.file, None);
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn broken_catalog_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Catalog::open(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse catalog"));
    }
}
