use clap::Parser;
use std::path::PathBuf;

use crate::config::BookFormat;

/// Load an FB2, TXT or PDF book into reader-ready HTML or Markdown
#[derive(Parser, Debug)]
#[command(name = "bookview", version, about)]
pub struct Cli {
    /// Path or http(s) URL of the book file.
    /// May be omitted when the catalog entry names a file.
    pub location: Option<String>,

    /// Declared book format. Defaults to the catalog entry, then the file extension, then fb2
    #[arg(short, long, value_enum)]
    pub format: Option<BookFormat>,

    /// JSON catalog of books ({"books": [...]})
    #[arg(long, requires = "book")]
    pub catalog: Option<PathBuf>,

    /// Id of the catalog entry to load
    #[arg(long, requires = "catalog")]
    pub book: Option<String>,

    /// Book title (overrides the catalog)
    #[arg(long)]
    pub title: Option<String>,

    /// Book author (overrides the catalog)
    #[arg(long)]
    pub author: Option<String>,

    /// Folder holding the book's images/ directory (overrides the catalog)
    #[arg(long)]
    pub folder: Option<String>,

    /// Book id reported in the completion summary (overrides the catalog)
    #[arg(long)]
    pub id: Option<String>,

    /// Emit Markdown instead of an HTML fragment
    #[arg(long, default_value_t = false)]
    pub markdown: bool,

    /// Output file. Defaults to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Log pipeline decisions (same as RUST_LOG=debug)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
