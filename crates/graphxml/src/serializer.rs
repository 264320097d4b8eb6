// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Whole-model import and export.
//!
//! Document layout:
//!
//! ```xml
//! <mxGraphModel>
//!   <root>
//!     <mxCell id="0"/>
//!     <mxCell id="1" parent="0"/>
//!     <mxCell id="2" vertex="1" parent="1">
//!       <mxGeometry x="380" y="20" width="140" height="30" as="geometry"/>
//!     </mxCell>
//!   </root>
//! </mxGraphModel>
//! ```

use crate::codec::{CodecRegistry, Session};
use crate::config::CodecConfig;
use crate::error::{CodecError, ModelError};
use crate::model::{Cell, GraphModel};
use crate::types::{Persist, Value};
use crate::xml::{parse_document, write_document, Element};
use std::collections::HashMap;

const ROOT_TAG: &str = "root";

/// Drives full-model export and import through a codec registry.
///
/// Each call runs its own [`Session`]; nothing carries over between calls.
#[derive(Debug, Clone)]
pub struct ModelXmlSerializer<'r> {
    registry: &'r CodecRegistry,
    config: CodecConfig,
}

impl ModelXmlSerializer<'static> {
    /// Serializer over the global registry with default settings.
    pub fn new() -> Self {
        Self::with_config(CodecConfig::default())
    }

    /// Serializer over the global registry.
    pub fn with_config(config: CodecConfig) -> Self {
        Self::with_registry(CodecRegistry::global(), config)
    }
}

impl Default for ModelXmlSerializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> ModelXmlSerializer<'r> {
    pub fn with_registry(registry: &'r CodecRegistry, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r CodecRegistry {
        self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    // ========================================================================
    // Import
    // ========================================================================

    /// Parse `text` and replace the contents of `model` with its cells.
    ///
    /// On error `model` is left untouched.
    pub fn import(&self, text: &str, model: &mut GraphModel) -> Result<(), CodecError> {
        let document = parse_document(text, self.config.max_depth)?;
        self.import_element(&document, model)
    }

    /// Same as [`Self::import`] for an already parsed document.
    pub fn import_element(&self, document: &Element, model: &mut GraphModel) -> Result<(), CodecError> {
        let container = self.find_root(document)?;
        let mut session = Session::new(self.registry, &self.config);
        let mut declared = Vec::new();
        collect_ids(container, &mut declared);
        session.claim_ids(declared);

        for element in container.children() {
            match session.decode_element(element)? {
                Some(Value::Object(mut object)) if object.is::<Cell>() => {
                    let id = session.synthesize_id();
                    object.set_field("id", Value::Text(id.clone()));
                    session.put_object(&id, object);
                }
                Some(Value::Object(object)) => {
                    log::debug!("ignoring top-level <{}> ({})", element.name(), object.type_name());
                }
                _ => {}
            }
        }
        session.resolve_pending()?;

        let cells: Vec<Cell> = session
            .objects()
            .filter_map(|(_, object)| object.downcast_ref::<Cell>().cloned())
            .collect();
        let count = cells.len();
        let scratch = assemble(cells)?;

        *model = scratch;
        log::debug!("imported {} cell(s)", count);
        Ok(())
    }

    fn find_root<'d>(&self, document: &'d Element) -> Result<&'d Element, CodecError> {
        if document.name() == ROOT_TAG {
            return Ok(document);
        }
        if document.name() != self.config.root_tag {
            return Err(CodecError::MalformedDocument(format!(
                "expected <{}> or <{}>, found <{}>",
                self.config.root_tag,
                ROOT_TAG,
                document.name()
            )));
        }
        document.child(ROOT_TAG).ok_or_else(|| {
            CodecError::MalformedDocument(format!(
                "<{}> has no <{}> element",
                self.config.root_tag, ROOT_TAG
            ))
        })
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Write every cell reachable from the root, in pre-order.
    pub fn export(&self, model: &GraphModel) -> Result<String, CodecError> {
        let document = self.export_element(model)?;
        Ok(write_document(&document, self.config.indent))
    }

    /// Same as [`Self::export`] without the final text conversion.
    pub fn export_element(&self, model: &GraphModel) -> Result<Element, CodecError> {
        let mut session = Session::new(self.registry, &self.config);
        let mut root = Element::new(ROOT_TAG);
        let cells = model.cells();
        for cell in &cells {
            if let Some(element) = session.encode_object(*cell)? {
                root.push_child(element);
            }
        }
        log::debug!("exported {} cell(s)", cells.len());
        Ok(Element::new(self.config.root_tag.as_str()).with_child(root))
    }

    // ========================================================================
    // Single objects
    // ========================================================================

    /// Encode one object through its registered codec.
    ///
    /// `Ok(None)` when no codec applies and the policy is to skip.
    pub fn encode_object(&self, object: &dyn Persist) -> Result<Option<String>, CodecError> {
        let mut session = Session::new(self.registry, &self.config);
        Ok(session
            .encode_object(object)?
            .map(|element| write_document(&element, self.config.indent)))
    }

    /// Decode a standalone document into a new object.
    pub fn decode_object(&self, text: &str) -> Result<Option<Box<dyn Persist>>, CodecError> {
        let document = parse_document(text, self.config.max_depth)?;
        let mut session = Session::new(self.registry, &self.config);
        let value = session.decode_element(&document)?;
        session.resolve_pending()?;
        Ok(match value {
            Some(Value::Object(object)) => Some(object),
            Some(Value::Ref(id)) => session
                .into_objects()
                .into_iter()
                .find(|(key, _)| key.as_deref() == Some(id.as_str()))
                .map(|(_, object)| object),
            _ => None,
        })
    }

    /// Configure an existing object from a document, e.g. bind keystrokes
    /// onto a live [`KeyHandler`](crate::handler::KeyHandler).
    pub fn configure(&self, text: &str, into: &mut dyn Persist) -> Result<(), CodecError> {
        let document = parse_document(text, self.config.max_depth)?;
        let mut session = Session::new(self.registry, &self.config);
        session.decode_into(&document, into)?;
        session.resolve_pending()
    }
}

fn collect_ids<'d>(element: &'d Element, out: &mut Vec<&'d str>) {
    if let Some(id) = element.attribute("id") {
        out.push(id);
    }
    for child in element.children() {
        collect_ids(child, out);
    }
}

/// Build a model from decoded cells in arena order.
///
/// A cell's parent is the cell it was nested in, else its `parent`
/// attribute. Exactly one cell may be parentless and every cell must be
/// reachable from it.
fn assemble(cells: Vec<Cell>) -> Result<GraphModel, CodecError> {
    let mut model = GraphModel::new();
    if cells.is_empty() {
        return Ok(model);
    }

    let (root, by_parent) = {
        let mut nested_parent: HashMap<&str, &str> = HashMap::new();
        for cell in &cells {
            for child in &cell.children {
                nested_parent.entry(child.as_str()).or_insert(cell.id.as_str());
            }
        }

        let index: HashMap<&str, usize> = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.as_str(), i))
            .collect();
        let mut by_parent: HashMap<String, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (i, cell) in cells.iter().enumerate() {
            let parent = nested_parent
                .get(cell.id.as_str())
                .copied()
                .or(cell.parent.as_deref());
            match parent {
                None => roots.push(i),
                Some(parent) if index.contains_key(parent) => {
                    by_parent.entry(parent.to_string()).or_default().push(i);
                }
                Some(parent) => return Err(ModelError::UnknownParent(parent.to_string()).into()),
            }
        }

        match roots.as_slice() {
            [] => return Err(ModelError::NoRoot.into()),
            [root] => (*root, by_parent),
            _ => {
                return Err(CodecError::MalformedDocument(format!(
                    "{} cells have no parent; expected a single root",
                    roots.len()
                )))
            }
        }
    };

    let mut pending: Vec<Option<Cell>> = cells.into_iter().map(Some).collect();
    let mut stack: Vec<(usize, Option<String>)> = vec![(root, None)];
    while let Some((i, parent)) = stack.pop() {
        let Some(cell) = pending.get_mut(i).and_then(Option::take) else {
            continue;
        };
        let id = model.add_cell(cell, parent.as_deref())?;
        if let Some(children) = by_parent.get(&id) {
            for &child in children.iter().rev() {
                stack.push((child, Some(id.clone())));
            }
        }
    }

    if let Some(orphan) = pending.iter().flatten().next() {
        return Err(CodecError::MalformedDocument(format!(
            "cell `{}` is not reachable from the root",
            orphan.id
        )));
    }

    for cell in model.cells() {
        for (field, terminal) in [("source", &cell.source), ("target", &cell.target)] {
            if let Some(id) = terminal {
                if !model.contains(id) {
                    return Err(CodecError::UnresolvedReference {
                        id: id.clone(),
                        field: field.to_string(),
                    });
                }
            }
        }
    }
    Ok(model)
}
