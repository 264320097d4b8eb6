// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XML text -> [`Element`] tree.
//!
//! Parsing is delegated to `roxmltree`; the borrowed DOM is then copied into an
//! owned tree so codecs never hold on to the source text.

use crate::error::CodecError;
use crate::xml::Element;
use roxmltree::Document;

/// Parse a document and return its root element.
///
/// Fails with `MalformedDocument` on ill-formed text and with
/// `DocumentTooDeep` once nesting goes past `max_depth`.
pub fn parse_document(text: &str, max_depth: usize) -> Result<Element, CodecError> {
    let doc = Document::parse(text)
        .map_err(|e| CodecError::MalformedDocument(format!("Failed to parse XML: {}", e)))?;
    convert(doc.root_element(), 1, max_depth)
}

fn convert(node: roxmltree::Node<'_, '_>, depth: usize, max_depth: usize) -> Result<Element, CodecError> {
    if depth > max_depth {
        return Err(CodecError::DocumentTooDeep { limit: max_depth });
    }

    let mut element = Element::new(node.tag_name().name());
    for attr in node.attributes() {
        element.set_attribute(attr.name(), attr.value());
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            element.push_child(convert(child, depth + 1, max_depth)?);
        } else if child.is_text() {
            if let Some(t) = child.text() {
                text.push_str(t);
            }
        }
    }

    let trimmed = text.trim();
    if !trimmed.is_empty() {
        element.set_text(trimmed);
    }
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_in_order() {
        let root = parse_document(
            r#"<root><a id="1"/><b x="2"><c/></b><a id="3"/></root>"#,
            16,
        )
        .expect("parse");

        let names: Vec<_> = root.children().iter().map(Element::name).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
        assert_eq!(root.children()[2].attribute("id"), Some("3"));
        assert_eq!(root.children()[1].children()[0].name(), "c");
    }

    #[test]
    fn keeps_text_and_decodes_entities() {
        let root = parse_document("<v a=\"x &amp; y\"> hello &lt;b&gt; </v>", 4).expect("parse");
        assert_eq!(root.attribute("a"), Some("x & y"));
        assert_eq!(root.text(), Some("hello <b>"));
    }

    #[test]
    fn malformed_text_is_rejected() {
        let err = parse_document("<root><unclosed></root>", 8).unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument(_)));

        let err = parse_document("", 8).unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument(_)));
    }

    #[test]
    fn depth_limit_enforced() {
        let deep = format!("{}{}", "<a>".repeat(10), "</a>".repeat(10));
        assert!(parse_document(&deep, 10).is_ok());
        let err = parse_document(&deep, 9).unwrap_err();
        assert!(matches!(err, CodecError::DocumentTooDeep { limit: 9 }));
    }
}
