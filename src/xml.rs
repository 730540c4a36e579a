//! Minimal owned element tree over `quick-xml` events.
//!
//! The book parser needs random access (first `body`, every `section`,
//! descendants of a section) rather than a single streaming pass, so the
//! whole document is materialised once. Element names are matched by local
//! name; attributes keep their qualified names.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{LoadError, LoadResult};

/// Deepest element nesting accepted. Tree walks recurse once per level.
const MAX_DEPTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name as written, e.g. `fb:section`.
    pub name: String,
    /// `(qualified name, unescaped value)` in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart) -> LoadResult<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr =
                attr.map_err(|e| malformed(format!("bad attribute in <{}>: {}", name, e)))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attr.value);
            let value = quick_xml::escape::unescape(&raw)
                .map_err(|e| malformed(format!("bad attribute value for {}: {}", key, e)))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Name without any namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.name)
    }

    /// Value of the attribute whose qualified name is exactly `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// First direct child with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.local_name() == local)
    }

    /// First descendant (not `self`) with the given local name, depth-first.
    pub fn find(&self, local: &str) -> Option<&Element> {
        for child in self.child_elements() {
            if child.local_name() == local {
                return Some(child);
            }
            if let Some(found) = child.find(local) {
                return Some(found);
            }
        }
        None
    }

    /// Every descendant with the given local name, in document order.
    pub fn descendants(&self, local: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect(local, None, &mut found);
        found
    }

    /// Like [`Element::descendants`], but does not look inside descendants
    /// named `boundary`.
    pub fn descendants_outside(&self, local: &str, boundary: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect(local, Some(boundary), &mut found);
        found
    }

    fn collect<'a>(&'a self, local: &str, boundary: Option<&str>, out: &mut Vec<&'a Element>) {
        for child in self.child_elements() {
            if child.local_name() == local {
                out.push(child);
            }
            if boundary == Some(child.local_name()) {
                continue;
            }
            child.collect(local, boundary, out);
        }
    }

    /// Concatenation of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.push_text(&mut text);
        text
    }

    fn push_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => el.push_text(out),
            }
        }
    }
}

fn malformed(msg: impl Into<String>) -> LoadError {
    LoadError::MalformedMarkup(msg.into())
}

/// Parse a complete document and return its root element.
///
/// Rejects mismatched or unclosed tags, undefined entities, a missing root,
/// more than one root, non-whitespace text outside the root, and nesting
/// deeper than [`MAX_DEPTH`].
pub fn parse_document(text: &str) -> LoadResult<Element> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed("more than one root element"));
                }
                if stack.len() >= MAX_DEPTH {
                    return Err(malformed(format!(
                        "elements nested deeper than {} levels",
                        MAX_DEPTH
                    )));
                }
                stack.push(Element::from_start(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let el = Element::from_start(&e)?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::End(_)) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| malformed("closing tag without an open element"))?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .decode()
                    .map_err(|err| malformed(format!("text decode error: {:?}", err)))?;
                push_text(&mut stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                push_text(&mut stack, &text)?;
            }
            Ok(Event::GeneralRef(e)) => {
                let name = e
                    .decode()
                    .map_err(|err| malformed(format!("entity decode error: {:?}", err)))?;
                let entity = format!("&{};", name);
                let resolved = quick_xml::escape::unescape(&entity)
                    .map_err(|err| malformed(format!("undefined entity {}: {}", entity, err)))?;
                push_text(&mut stack, &resolved)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(malformed(format!(
                    "XML error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or_else(|| malformed("document has no root element"))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> LoadResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(el));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(el);
            Ok(())
        }
        None => Err(malformed("more than one root element")),
    }
}

fn push_text(stack: &mut [Element], text: &str) -> LoadResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            // Entity references split text into several events; merge them.
            if let Some(Node::Text(prev)) = parent.children.last_mut() {
                prev.push_str(text);
            } else {
                parent.children.push(Node::Text(text.to_string()));
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(malformed("text outside the root element")),
    }
}
