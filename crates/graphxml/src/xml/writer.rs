// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! [`Element`] tree -> XML text.

use crate::xml::Element;

/// Serialize an element tree.
///
/// With `indent == None` the output is a single line; otherwise each element
/// starts on its own line, indented by `indent` spaces per level.
pub fn write_document(root: &Element, indent: Option<usize>) -> String {
    let mut out = String::new();
    write_element(&mut out, root, indent, 0);
    out
}

fn write_element(out: &mut String, element: &Element, indent: Option<usize>, level: usize) {
    if let Some(width) = indent {
        if level > 0 {
            out.push('\n');
        }
        out.extend(std::iter::repeat(' ').take(width * level));
    }

    out.push('<');
    out.push_str(element.name());
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attribute_into(out, value);
        out.push('"');
    }

    if element.children().is_empty() && element.text().is_none() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    if let Some(text) = element.text() {
        escape_text_into(out, text);
    }
    for child in element.children() {
        write_element(out, child, indent, level + 1);
    }

    if let Some(width) = indent {
        if !element.children().is_empty() {
            out.push('\n');
            out.extend(std::iter::repeat(' ').take(width * level));
        }
    }
    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}

fn escape_attribute_into(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#xa;"),
            '\r' => out.push_str("&#xd;"),
            '\t' => out.push_str("&#x9;"),
            _ => out.push(ch),
        }
    }
}

fn escape_text_into(out: &mut String, raw: &str) {
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
