// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cell codec.

use super::Cell;
use crate::codec::{DefaultCodec, ObjectCodec, Session};
use crate::error::CodecError;
use crate::types::{Describe, Persist, TypeDescriptor, Value};
use crate::xml::Element;

/// Codec for [`Cell`], registered as `mxCell`.
///
/// Fields go through the default rules. A cell element nested in another is
/// a child of that cell: a new id decodes a new cell, a known id is a
/// back-reference that links the existing cell. Either way the nesting wins
/// over the child's own `parent` attribute.
#[derive(Debug)]
pub struct CellCodec {
    inner: DefaultCodec,
}

impl CellCodec {
    pub fn new() -> Self {
        Self {
            inner: DefaultCodec::for_type::<Cell>().with_name("mxCell"),
        }
    }

    fn is_cell_element(session: &Session<'_>, element: &Element) -> bool {
        session
            .registry()
            .get_codec(element.name())
            .map(|c| c.type_name() == Cell::TYPE_NAME)
            .unwrap_or(false)
    }

    fn decode_nested_cell(
        &self,
        session: &mut Session<'_>,
        element: &Element,
    ) -> Result<Option<String>, CodecError> {
        match session.decode_element(element)? {
            Some(Value::Ref(id)) => Ok(Some(id)),
            Some(Value::Object(mut object)) => {
                let id = session.synthesize_id();
                object.set_field("id", Value::Text(id.clone()));
                session.put_object(&id, object);
                Ok(Some(id))
            }
            _ => Ok(None),
        }
    }
}

impl Default for CellCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectCodec for CellCodec {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn type_name(&self) -> &str {
        Cell::TYPE_NAME
    }

    fn descriptor(&self) -> Option<&TypeDescriptor> {
        self.inner.descriptor()
    }

    fn is_excluded(&self, field: &str) -> bool {
        self.inner.is_excluded(field)
    }

    fn encode(
        &self,
        session: &mut Session<'_>,
        object: &dyn Persist,
    ) -> Result<Option<Element>, CodecError> {
        self.inner.encode(session, object)
    }

    fn decode(
        &self,
        session: &mut Session<'_>,
        element: &Element,
    ) -> Result<Box<dyn Persist>, CodecError> {
        let mut object = self.inner.create();
        self.decode_into(session, element, object.as_mut())?;
        Ok(object)
    }

    fn decode_into(
        &self,
        session: &mut Session<'_>,
        element: &Element,
        into: &mut dyn Persist,
    ) -> Result<(), CodecError> {
        if !into.is::<Cell>() {
            return Err(CodecError::TargetMismatch {
                codec: self.name().to_string(),
                found: into.type_name().to_string(),
            });
        }
        self.inner.decode_attributes(session, element, into);

        for child in element.children() {
            if !Self::is_cell_element(session, child) {
                self.inner.decode_child(session, child, into)?;
                continue;
            }
            if let Some(child_id) = self.decode_nested_cell(session, child)? {
                if let Some(cell) = into.downcast_mut::<Cell>() {
                    cell.children.push(child_id);
                }
            }
        }
        self.inner.decode_links(session, element, into);
        Ok(())
    }
}
