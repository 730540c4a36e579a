use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;

use crate::xml::Element;

/// Attribute names that may carry an image reference, in priority order.
const HREF_ATTRS: [&str; 3] = ["l:href", "href", "xlink:href"];

/// Embedded `<binary>` payloads by id, already rendered as `data:` URIs.
pub type BinaryMap = HashMap<String, String>;

/// Raw reference of an `image` element, or `None` when every candidate
/// attribute is missing or empty.
pub fn image_reference(image: &Element) -> Option<&str> {
    HREF_ATTRS
        .iter()
        .filter_map(|name| image.attr(name))
        .find(|value| !value.is_empty())
}

/// Map an image reference to the path a reader should load it from.
///
/// Absolute URLs, root-relative paths and data URIs pass through. Anything
/// else lives under `{folder}/images/`; without a folder (or with an empty
/// one) the reference is returned unchanged.
pub fn resolve_image_path(reference: &str, folder: Option<&str>) -> String {
    if reference.starts_with("http") || reference.starts_with('/') || reference.starts_with("data:")
    {
        return reference.to_string();
    }

    match folder.filter(|f| !f.is_empty()) {
        Some(folder) => format!("{}/images/{}", folder.trim_end_matches('/'), reference),
        None => reference.to_string(),
    }
}

/// Resolve an FB2 image reference, preferring embedded binaries for `#id`
/// references.
pub fn resolve_fb2_image(reference: &str, folder: Option<&str>, binaries: &BinaryMap) -> String {
    match reference.strip_prefix('#') {
        Some(id) => match binaries.get(id) {
            Some(data_uri) => data_uri.clone(),
            None => resolve_image_path(id, folder),
        },
        None => resolve_image_path(reference, folder),
    }
}

/// Collect `<binary id content-type>` elements under `root` whose payload
/// is valid base64.
pub fn collect_binaries(root: &Element) -> BinaryMap {
    let mut binaries = BinaryMap::new();

    for binary in root.descendants("binary") {
        let Some(id) = binary.attr("id").filter(|id| !id.is_empty()) else {
            continue;
        };

        let payload: String = binary
            .text_content()
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        if let Err(e) = STANDARD.decode(&payload) {
            log::warn!("skipping embedded image {}: {}", id, e);
            continue;
        }

        let content_type = binary
            .attr("content-type")
            .filter(|ct| !ct.is_empty())
            .unwrap_or("application/octet-stream");

        binaries.insert(
            id.to_string(),
            format!("data:{};base64,{}", content_type, payload),
        );
    }

    binaries
}
