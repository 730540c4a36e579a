//! FictionBook (FB2) conversion.
//!
//! FB2 is an XML format: `FictionBook` → `body` → `section` → `p` / `image`,
//! with images usually embedded as base64 `<binary>` elements after the
//! bodies. Real-world files are messy, so every stage has a fallback: a body
//! without sections is read as a flat run of paragraphs, and a document
//! without a body is searched for sections directly.

use crate::encoding;
use crate::error::{LoadError, LoadResult};
use crate::html::escape_html;
use crate::image::{self, BinaryMap};
use crate::reader::{BookDescriptor, BookReader, ChapterBlock, RenderedDocument};
use crate::xml::{self, Element};

/// Flat-body paragraphs must be longer than this many characters.
const MIN_FLAT_PARAGRAPH_CHARS: usize = 10;

/// Options shared by every section walk of one document.
struct WalkContext<'a> {
    folder: Option<&'a str>,
    binaries: BinaryMap,
}

pub struct Fb2Reader;

impl BookReader for Fb2Reader {
    fn read(&self, book: &BookDescriptor<'_>) -> LoadResult<RenderedDocument> {
        Fb2Document::from_bytes(book.bytes)?.chapters(book.title_hint, book.folder)
    }
}

/// A parsed FB2 document. Metadata and chapters are both read from the one
/// tree.
pub struct Fb2Document {
    root: Element,
}

impl Fb2Document {
    pub fn from_bytes(bytes: &[u8]) -> LoadResult<Self> {
        let decoded = encoding::resolve(bytes)?;
        log::debug!(
            "parsing {} bytes decoded as {}",
            bytes.len(),
            decoded.encoding
        );
        Self::from_text(&decoded.text)
    }

    pub fn from_text(text: &str) -> LoadResult<Self> {
        Ok(Self {
            root: xml::parse_document(text)?,
        })
    }

    /// Walk the first body (or, without one, every section) into chapters.
    pub fn chapters(
        &self,
        title_hint: &str,
        folder: Option<&str>,
    ) -> LoadResult<RenderedDocument> {
        let root = &self.root;
        let ctx = WalkContext {
            folder,
            binaries: image::collect_binaries(root),
        };

        let chapters = match find_body(root) {
            Some(body) => walk_body(body, title_hint, &ctx),
            None => {
                let sections = root.descendants("section");
                if sections.is_empty() {
                    return Err(LoadError::NoReadableContent);
                }
                log::debug!("no body element, walking {} bare sections", sections.len());
                walk_sections(&sections, &ctx)
            }
        };

        let chapters: Vec<ChapterBlock> = chapters
            .into_iter()
            .filter(|chapter| {
                let keep = chapter.has_content();
                if !keep {
                    log::debug!("dropping empty chapter {}", chapter.label());
                }
                keep
            })
            .collect();

        if chapters.is_empty() {
            return Err(LoadError::EmptyDocument);
        }

        Ok(RenderedDocument { chapters })
    }

    /// Bibliographic data from `description/title-info`; empty when the
    /// block is missing.
    pub fn metadata(&self) -> BookMetadata {
        let Some(info) = self
            .root
            .child("description")
            .and_then(|description| description.child("title-info"))
        else {
            return BookMetadata::default();
        };

        let authors = info
            .child_elements()
            .filter(|el| el.local_name() == "author")
            .filter_map(author_name)
            .collect();

        BookMetadata {
            title: child_text(info, "book-title"),
            authors,
            language: child_text(info, "lang"),
            annotation: info.child("annotation").and_then(|annotation| {
                let paragraphs: Vec<String> = annotation
                    .descendants("p")
                    .into_iter()
                    .map(|p| p.text_content().trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect();
                if paragraphs.is_empty() {
                    non_empty(annotation.text_content())
                } else {
                    Some(paragraphs.join("\n\n"))
                }
            }),
        }
    }
}

/// First `body` element in document order, including the root itself.
fn find_body(root: &Element) -> Option<&Element> {
    if root.local_name() == "body" {
        return Some(root);
    }
    root.find("body")
}

fn walk_body(body: &Element, title_hint: &str, ctx: &WalkContext<'_>) -> Vec<ChapterBlock> {
    let sections = body.descendants("section");
    if !sections.is_empty() {
        return walk_sections(&sections, ctx);
    }

    log::debug!("body has no sections, collecting paragraphs directly");
    flat_chapter(body, title_hint).into_iter().collect()
}

/// Every section becomes its own chapter, nested ones included, in
/// document order.
fn walk_sections(sections: &[&Element], ctx: &WalkContext<'_>) -> Vec<ChapterBlock> {
    sections
        .iter()
        .enumerate()
        .map(|(index, section)| walk_section(section, index, ctx))
        .collect()
}

/// One chapter holding every sufficiently long paragraph of `body`.
///
/// Returns `None` when the body has no paragraphs at all.
fn flat_chapter(body: &Element, title_hint: &str) -> Option<ChapterBlock> {
    let paragraphs = body.descendants("p");
    if paragraphs.is_empty() {
        return None;
    }

    let paragraphs = paragraphs
        .into_iter()
        .map(|p| p.text_content())
        .map(|text| text.trim().to_string())
        .filter(|text| text.chars().count() > MIN_FLAT_PARAGRAPH_CHARS)
        .map(|text| escape_html(&text))
        .collect();

    let title = title_hint.trim();
    Some(ChapterBlock {
        index: 0,
        title: (!title.is_empty()).then(|| title.to_string()),
        paragraphs,
        images: Vec::new(),
    })
}

/// Content of nested sections belongs to their own chapters and is skipped
/// here.
fn walk_section(section: &Element, index: usize, ctx: &WalkContext<'_>) -> ChapterBlock {
    let heading = section.child("title");

    let title = heading
        .map(|t| t.text_content().trim().to_string())
        .filter(|t| !t.is_empty() && *t != ChapterBlock::default_title(index));

    // The heading's own paragraphs are already the title.
    let heading_paragraphs: Vec<&Element> =
        heading.map(|t| t.descendants("p")).unwrap_or_default();

    let paragraphs = section
        .descendants_outside("p", "section")
        .into_iter()
        .filter(|p| !heading_paragraphs.iter().any(|hp| std::ptr::eq(*hp, *p)))
        .map(|p| p.text_content())
        .filter_map(|text| {
            let text = text.trim();
            (!text.is_empty()).then(|| escape_html(text))
        })
        .collect();

    let images = section
        .descendants_outside("image", "section")
        .into_iter()
        .filter_map(image::image_reference)
        .map(|reference| image::resolve_fb2_image(reference, ctx.folder, &ctx.binaries))
        .collect();

    ChapterBlock {
        index,
        title,
        paragraphs,
        images,
    }
}

/// Bibliographic data from `description/title-info`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub language: Option<String>,
    pub annotation: Option<String>,
}

fn author_name(author: &Element) -> Option<String> {
    let parts: Vec<String> = ["first-name", "middle-name", "last-name"]
        .iter()
        .filter_map(|part| child_text(author, part))
        .collect();

    if parts.is_empty() {
        child_text(author, "nickname")
    } else {
        Some(parts.join(" "))
    }
}

fn child_text(el: &Element, local: &str) -> Option<String> {
    el.child(local).and_then(|child| non_empty(child.text_content()))
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
