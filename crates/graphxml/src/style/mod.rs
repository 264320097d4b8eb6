// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Named cell styles and the stylesheet codec.
//!
//! A cell's `style` attribute is a `;`-separated list of style names and
//! `key=value` pairs applied on top of the default vertex or edge style:
//!
//! ```text
//! rounded;fillColor=#FFFFFF;strokeColor=none
//! ```
//!
//! Stylesheet documents:
//!
//! ```xml
//! <mxStylesheet>
//!   <add as="rounded" extend="defaultVertex">
//!     <add as="rounded" value="1"/>
//!     <remove as="fillColor"/>
//!   </add>
//! </mxStylesheet>
//! ```

use crate::codec::{ObjectCodec, Session};
use crate::error::CodecError;
use crate::types::{Persist, Value};
use crate::xml::{Element, ADD_TAG, AS_ATTRIBUTE};
use std::collections::BTreeMap;

/// Style properties, key to value.
pub type Style = BTreeMap<String, String>;

pub const DEFAULT_VERTEX: &str = "defaultVertex";
pub const DEFAULT_EDGE: &str = "defaultEdge";

const REMOVE_TAG: &str = "remove";
/// Value that removes a key when resolving a style string.
const NONE_VALUE: &str = "none";

fn style_of(pairs: &[(&str, &str)]) -> Style {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn default_vertex_style() -> Style {
    style_of(&[
        ("shape", "rectangle"),
        ("perimeter", "rectanglePerimeter"),
        ("verticalAlign", "middle"),
        ("align", "center"),
        ("fillColor", "#C3D9FF"),
        ("strokeColor", "#6482B9"),
        ("fontColor", "#774400"),
    ])
}

fn default_edge_style() -> Style {
    style_of(&[
        ("shape", "connector"),
        ("endArrow", "classic"),
        ("verticalAlign", "middle"),
        ("align", "center"),
        ("strokeColor", "#6482B9"),
        ("fontColor", "#446299"),
    ])
}

/// Named styles.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    styles: BTreeMap<String, Style>,
}

impl Default for Stylesheet {
    fn default() -> Self {
        let mut sheet = Self::empty();
        sheet.reset();
        sheet
    }
}

impl Stylesheet {
    pub const TYPE_NAME: &'static str = "Stylesheet";

    /// Stylesheet with the default vertex and edge styles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stylesheet with no styles at all.
    pub fn empty() -> Self {
        Self {
            styles: BTreeMap::new(),
        }
    }

    /// Drop every custom style and restore the built-in defaults.
    pub fn reset(&mut self) {
        self.styles.clear();
        self.styles.insert(DEFAULT_VERTEX.to_string(), default_vertex_style());
        self.styles.insert(DEFAULT_EDGE.to_string(), default_edge_style());
    }

    pub fn get_style(&self, name: &str) -> Option<&Style> {
        self.styles.get(name)
    }

    pub fn put_style(&mut self, name: impl Into<String>, style: Style) {
        self.styles.insert(name.into(), style);
    }

    pub fn remove_style(&mut self, name: &str) -> Option<Style> {
        self.styles.remove(name)
    }

    pub fn default_vertex_style(&self) -> Option<&Style> {
        self.get_style(DEFAULT_VERTEX)
    }

    pub fn default_edge_style(&self) -> Option<&Style> {
        self.get_style(DEFAULT_EDGE)
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &Style)> {
        self.styles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Effective properties for a cell style string.
    ///
    /// Starts from the default edge or vertex style, then applies each entry
    /// in order: a name merges that style, `key=value` sets a key and
    /// `key=none` removes it. Unknown names are ignored.
    pub fn resolve(&self, style: Option<&str>, edge: bool) -> Style {
        let base = if edge { DEFAULT_EDGE } else { DEFAULT_VERTEX };
        let mut out = self.get_style(base).cloned().unwrap_or_default();
        for entry in style.unwrap_or_default().split(';').map(str::trim) {
            if entry.is_empty() {
                continue;
            }
            match entry.split_once('=') {
                Some((key, value)) if value == NONE_VALUE => {
                    out.remove(key);
                }
                Some((key, value)) => {
                    out.insert(key.to_string(), value.to_string());
                }
                None => match self.get_style(entry) {
                    Some(named) => out.extend(named.iter().map(|(k, v)| (k.clone(), v.clone()))),
                    None => log::trace!("unknown style name `{}`", entry),
                },
            }
        }
        out
    }
}

impl Persist for Stylesheet {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    fn set_field(&mut self, _name: &str, _value: Value) -> bool {
        false
    }

    fn clone_boxed(&self) -> Box<dyn Persist> {
        Box::new(self.clone())
    }
}

/// Codec for [`Stylesheet`], registered as `mxStylesheet`.
///
/// Encode writes every style as an `add` element listing its keys. Decode
/// adds styles to the target; `extend` copies another style (already in the
/// target or earlier in the document) before applying the listed keys.
#[derive(Debug, Default)]
pub struct StylesheetCodec;

impl StylesheetCodec {
    pub fn new() -> Self {
        Self
    }

    fn decode_style(sheet: &Stylesheet, directive: &Element) -> Style {
        let mut style = match directive.attribute("extend") {
            Some(base) => match sheet.get_style(base) {
                Some(base) => base.clone(),
                None => {
                    log::debug!("[mxStylesheet] unknown base style `{}`", base);
                    Style::new()
                }
            },
            None => Style::new(),
        };
        for entry in directive.children() {
            let Some(key) = entry.attribute(AS_ATTRIBUTE) else {
                continue;
            };
            match entry.name() {
                ADD_TAG => {
                    let value = entry
                        .attribute("value")
                        .map(str::to_string)
                        .or_else(|| entry.text().map(str::to_string))
                        .unwrap_or_default();
                    style.insert(key.to_string(), value);
                }
                REMOVE_TAG => {
                    style.remove(key);
                }
                other => log::trace!("[mxStylesheet] ignoring <{}>", other),
            }
        }
        style
    }
}

impl ObjectCodec for StylesheetCodec {
    fn name(&self) -> &str {
        "mxStylesheet"
    }

    fn type_name(&self) -> &str {
        Stylesheet::TYPE_NAME
    }

    fn encode(
        &self,
        _session: &mut Session<'_>,
        object: &dyn Persist,
    ) -> Result<Option<Element>, CodecError> {
        let Some(sheet) = object.downcast_ref::<Stylesheet>() else {
            return Err(CodecError::TargetMismatch {
                codec: self.name().to_string(),
                found: object.type_name().to_string(),
            });
        };
        let mut element = Element::new(self.name());
        for (name, style) in sheet.styles() {
            let mut directive = Element::new(ADD_TAG).with_attribute(AS_ATTRIBUTE, name);
            for (key, value) in style {
                directive.push_child(
                    Element::new(ADD_TAG)
                        .with_attribute(AS_ATTRIBUTE, key.as_str())
                        .with_attribute("value", value.as_str()),
                );
            }
            element.push_child(directive);
        }
        Ok(Some(element))
    }

    fn decode(
        &self,
        session: &mut Session<'_>,
        element: &Element,
    ) -> Result<Box<dyn Persist>, CodecError> {
        let mut sheet = Stylesheet::empty();
        self.decode_into(session, element, &mut sheet)?;
        Ok(Box::new(sheet))
    }

    fn decode_into(
        &self,
        _session: &mut Session<'_>,
        element: &Element,
        into: &mut dyn Persist,
    ) -> Result<(), CodecError> {
        let found = into.type_name().to_string();
        let Some(sheet) = into.downcast_mut::<Stylesheet>() else {
            return Err(CodecError::TargetMismatch {
                codec: self.name().to_string(),
                found,
            });
        };
        for directive in element.children() {
            if directive.name() != ADD_TAG {
                continue;
            }
            let Some(name) = directive.attribute(AS_ATTRIBUTE) else {
                log::debug!("[mxStylesheet] style without a name");
                continue;
            };
            let style = Self::decode_style(sheet, directive);
            sheet.put_style(name, style);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecRegistry;
    use crate::config::CodecConfig;

    #[test]
    fn reset_restores_defaults() {
        let pristine = Stylesheet::new();
        let mut sheet = Stylesheet::new();
        sheet.put_style("custom", style_of(&[("rounded", "1")]));
        sheet.remove_style(DEFAULT_EDGE);
        assert_ne!(sheet, pristine);

        sheet.reset();
        assert_eq!(sheet, pristine);
        sheet.reset();
        assert_eq!(sheet, pristine);
    }

    #[test]
    fn resolve_style_string() {
        let mut sheet = Stylesheet::new();
        sheet.put_style("rounded", style_of(&[("rounded", "1")]));

        let style = sheet.resolve(Some("rounded;fillColor=#FFFFFF;strokeColor=none;bogus"), false);
        assert_eq!(style.get("rounded").map(String::as_str), Some("1"));
        assert_eq!(style.get("fillColor").map(String::as_str), Some("#FFFFFF"));
        assert!(style.get("strokeColor").is_none());
        assert_eq!(style.get("shape").map(String::as_str), Some("rectangle"));

        let edge = sheet.resolve(None, true);
        assert_eq!(edge.get("endArrow").map(String::as_str), Some("classic"));
    }

    #[test]
    fn decode_extend_and_remove() {
        let registry = CodecRegistry::new();
        let config = CodecConfig::default();
        let mut session = Session::new(&registry, &config);

        let element = Element::new("mxStylesheet").with_child(
            Element::new(ADD_TAG)
                .with_attribute("as", "boxed")
                .with_attribute("extend", DEFAULT_VERTEX)
                .with_child(
                    Element::new(ADD_TAG)
                        .with_attribute("as", "rounded")
                        .with_attribute("value", "1"),
                )
                .with_child(Element::new(REMOVE_TAG).with_attribute("as", "fillColor")),
        );

        let mut sheet = Stylesheet::new();
        StylesheetCodec::new()
            .decode_into(&mut session, &element, &mut sheet)
            .unwrap();
        let boxed = sheet.get_style("boxed").unwrap();
        assert_eq!(boxed.get("rounded").map(String::as_str), Some("1"));
        assert_eq!(boxed.get("shape").map(String::as_str), Some("rectangle"));
        assert!(boxed.get("fillColor").is_none());
        assert!(sheet.default_vertex_style().is_some());
    }

    #[test]
    fn encode_then_decode_matches() {
        let registry = CodecRegistry::new();
        let config = CodecConfig::default();
        let mut session = Session::new(&registry, &config);
        let codec = StylesheetCodec::new();

        let mut sheet = Stylesheet::new();
        sheet.put_style("label", style_of(&[("fontSize", "14")]));
        let element = codec.encode(&mut session, &sheet).unwrap().unwrap();
        let decoded = codec.decode(&mut session, &element).unwrap();
        assert_eq!(decoded.downcast_ref::<Stylesheet>(), Some(&sheet));
    }
}
