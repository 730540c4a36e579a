//! Content-sniffing text decoder for FictionBook files.
//!
//! Old FB2 files are often mislabeled or stored in Cyrillic code pages, so
//! instead of trusting the XML declaration every candidate encoding is tried
//! in a fixed order and the first one producing recognizable markup wins.

use encoding_rs::Encoding;

use crate::error::{LoadError, LoadResult};

/// Candidate labels, tried in order. Labels go through `encoding_rs`, so
/// `iso-8859-1` maps onto windows-1252 and `cp1251` onto windows-1251.
const CANDIDATES: [&str; 4] = ["utf-8", "windows-1251", "iso-8859-1", "cp1251"];

const ROOT_MARKER: &str = "FictionBook";
const DECL_MARKER: &str = "<?xml";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text decoded under one candidate encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Canonical name of the encoding that produced `text`.
    pub encoding: &'static str,
}

/// Decode `bytes` with the first candidate whose output contains a
/// FictionBook root marker or an XML declaration.
pub fn resolve(bytes: &[u8]) -> LoadResult<DecodedText> {
    for label in CANDIDATES {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            continue;
        };

        let Some(text) = decode_strict(encoding, bytes) else {
            log::debug!("{} rejected the buffer as malformed", encoding.name());
            continue;
        };

        if looks_like_fb2(&text) {
            return Ok(DecodedText {
                text,
                encoding: encoding.name(),
            });
        }
    }

    Err(LoadError::NoValidEncoding)
}

/// Decode without replacement characters; `None` on any malformed sequence.
fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let bytes = if encoding == encoding_rs::UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn looks_like_fb2(text: &str) -> bool {
    text.contains(ROOT_MARKER) || text.contains(DECL_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_fictionbook_selects_utf8() {
        let doc = "<FictionBook><body><p>Привет, мир</p></body></FictionBook>";
        let decoded = resolve(doc.as_bytes()).unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
        assert_eq!(decoded.text, doc);
    }

    #[test]
    fn cyrillic_code_page_selects_windows_1251() {
        let (bytes, _, _) = encoding_rs::WINDOWS_1251
            .encode("<?xml version=\"1.0\"?><FictionBook><p>Глава первая</p></FictionBook>");
        assert!(std::str::from_utf8(&bytes).is_err());

        let decoded = resolve(&bytes).unwrap();
        assert_eq!(decoded.encoding, "windows-1251");
        assert!(decoded.text.contains("Глава первая"));
    }

    #[test]
    fn xml_declaration_alone_is_enough() {
        let decoded = resolve(b"<?xml version=\"1.0\"?><book/>").unwrap();
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"<FictionBook/>");
        let decoded = resolve(&bytes).unwrap();
        assert_eq!(decoded.text, "<FictionBook/>");
    }

    #[test]
    fn text_without_markers_fails() {
        assert_eq!(
            resolve(b"just some plain words").unwrap_err(),
            LoadError::NoValidEncoding
        );
        assert_eq!(resolve(b"").unwrap_err(), LoadError::NoValidEncoding);
    }
}
