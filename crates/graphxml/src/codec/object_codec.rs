// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor-driven default codec.
//!
//! Primitive fields become attributes, composite fields become child elements
//! tagged with `as="<field>"`, and lists become an `Array` child whose items
//! are either nested objects or `<add value="..."/>` entries.
//!
//! An object already written in the same session is referenced by its id: as
//! an attribute for a single composite field, as an id-only element inside a
//! list.

use super::{object_id, ObjectCodec, Session};
use crate::coerce::{format_bool, format_number, parse_bool, parse_enum, parse_int, parse_number};
use crate::error::CodecError;
use crate::types::{Describe, FieldDescriptor, FieldKind, Persist, TypeDescriptor, Value};
use crate::xml::{Element, ADD_TAG, ARRAY_TAG, AS_ATTRIBUTE};
use std::collections::HashSet;
use std::sync::Arc;

/// Codec for any type with a [`TypeDescriptor`].
///
/// The template instance supplies defaults: decode starts from a clone of it,
/// and encode can skip primitive fields that still hold the template value.
/// The template itself is never modified.
#[derive(Debug)]
pub struct DefaultCodec {
    name: String,
    template: Box<dyn Persist>,
    descriptor: Arc<TypeDescriptor>,
    exclude: HashSet<String>,
}

impl DefaultCodec {
    /// Codec named after the descriptor.
    pub fn new(template: Box<dyn Persist>, descriptor: Arc<TypeDescriptor>) -> Self {
        Self {
            name: descriptor.name.clone(),
            template,
            descriptor,
            exclude: HashSet::new(),
        }
    }

    /// Codec for a [`Describe`] type, using its default value as template.
    pub fn for_type<T: Describe>() -> Self {
        Self::new(Box::new(T::default()), Arc::new(T::describe()))
    }

    /// Override the registered name (and encoded tag).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Exclude a field from encode and decode.
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.exclude.insert(field.into());
        self
    }

    pub fn template(&self) -> &dyn Persist {
        self.template.as_ref()
    }

    /// Fresh instance cloned from the template.
    pub fn create(&self) -> Box<dyn Persist> {
        self.template.clone_boxed()
    }

    fn skips(&self, field: &FieldDescriptor) -> bool {
        field.transient || self.exclude.contains(&field.name)
    }

    // ========================================================================
    // Encode
    // ========================================================================

    /// Write every persistent field of `object` onto `element`.
    pub fn encode_fields(
        &self,
        session: &mut Session<'_>,
        object: &dyn Persist,
        element: &mut Element,
    ) -> Result<(), CodecError> {
        let omit_defaults = session.config().omit_defaults;
        for field in &self.descriptor.fields {
            if self.skips(field) {
                continue;
            }
            let Some(value) = object.get_field(&field.name) else {
                continue;
            };
            if omit_defaults {
                if let Some(default) = self.template.get_field(&field.name) {
                    if value.matches_default(&default) {
                        continue;
                    }
                }
            }
            self.encode_value(session, element, &field.name, value)?;
        }
        Ok(())
    }

    fn encode_value(
        &self,
        session: &mut Session<'_>,
        element: &mut Element,
        name: &str,
        value: Value,
    ) -> Result<(), CodecError> {
        match value {
            Value::Bool(v) => element.set_attribute(name, format_bool(v)),
            Value::Int(v) => element.set_attribute(name, v.to_string()),
            Value::Number(v) => element.set_attribute(name, format_number(v)),
            Value::Text(v) | Value::Enum(v) | Value::Ref(v) => element.set_attribute(name, v),
            Value::Object(object) => {
                // Already written in this session: refer to it instead of inlining.
                if let Some(id) = object_id(object.as_ref()) {
                    if session.lookup(&id).is_some() {
                        element.set_attribute(name, id);
                        return Ok(());
                    }
                }
                if let Some(mut child) = session.encode_object(object.as_ref())? {
                    child.set_attribute(AS_ATTRIBUTE, name);
                    element.push_child(child);
                }
            }
            Value::List(items) => {
                let mut array = Element::new(ARRAY_TAG).with_attribute(AS_ATTRIBUTE, name);
                for item in items {
                    if let Some(child) = self.encode_item(session, item)? {
                        array.push_child(child);
                    }
                }
                element.push_child(array);
            }
        }
        Ok(())
    }

    fn encode_item(
        &self,
        session: &mut Session<'_>,
        item: Value,
    ) -> Result<Option<Element>, CodecError> {
        let text = match item {
            Value::Object(object) => {
                // Repeats become an id-only element, read back as a reference.
                if let Some(id) = object_id(object.as_ref()) {
                    if session.lookup(&id).is_some() {
                        let Some(codec) = session.codec_for(object.type_name())? else {
                            return Ok(None);
                        };
                        return Ok(Some(Element::new(codec.name()).with_attribute("id", id)));
                    }
                }
                return session.encode_object(object.as_ref());
            }
            Value::List(items) => {
                let mut array = Element::new(ARRAY_TAG);
                for nested in items {
                    if let Some(child) = self.encode_item(session, nested)? {
                        array.push_child(child);
                    }
                }
                return Ok(Some(array));
            }
            Value::Bool(v) => format_bool(v).to_string(),
            Value::Int(v) => v.to_string(),
            Value::Number(v) => format_number(v),
            Value::Text(v) | Value::Enum(v) | Value::Ref(v) => v,
        };
        Ok(Some(Element::new(ADD_TAG).with_attribute("value", text)))
    }

    // ========================================================================
    // Decode
    // ========================================================================

    /// Assign every recognized attribute of `element` onto `into`.
    ///
    /// Unknown attributes are ignored; malformed values fall back per
    /// [`crate::coerce`] without affecting sibling fields.
    pub fn decode_attributes(
        &self,
        session: &mut Session<'_>,
        element: &Element,
        into: &mut dyn Persist,
    ) {
        for (attribute, raw) in element.attributes() {
            if attribute == AS_ATTRIBUTE {
                continue;
            }
            let Some(field) = self.descriptor.resolve(attribute) else {
                log::trace!("<{}> ignoring unknown attribute `{}`", self.name, attribute);
                continue;
            };
            // Linked by `decode_links` once children are decoded.
            if self.skips(field) || matches!(field.kind, FieldKind::Object(_)) {
                continue;
            }
            let Some(value) = self.coerce(session, field, &field.kind, raw) else {
                continue;
            };
            if !into.set_field(&field.name, value) {
                log::debug!("<{}> field `{}` rejected value {:?}", self.name, field.name, raw);
            }
        }
    }

    /// Resolve composite fields written as an id attribute.
    ///
    /// Runs after the element's children so an object first written inside
    /// this element is already in the arena. Ids decoded later are linked by
    /// [`Session::resolve_pending`].
    pub fn decode_links(&self, session: &mut Session<'_>, element: &Element, into: &mut dyn Persist) {
        for (attribute, raw) in element.attributes() {
            if attribute == AS_ATTRIBUTE || raw.is_empty() {
                continue;
            }
            let Some(field) = self.descriptor.resolve(attribute) else {
                continue;
            };
            if self.skips(field) || !matches!(field.kind, FieldKind::Object(_)) {
                continue;
            }
            session.note_reference(raw, &field.name);
            let target = session.get_object(raw).map(|o| Value::Object(o.clone_boxed()));
            match target {
                Some(value) => self.assign(into, field, value),
                None => session.defer_link(raw, &field.name),
            }
        }
    }

    fn coerce(
        &self,
        session: &mut Session<'_>,
        field: &FieldDescriptor,
        kind: &FieldKind,
        raw: &str,
    ) -> Option<Value> {
        let value = match kind {
            FieldKind::Bool => Value::Bool(parse_bool(raw)),
            FieldKind::Int => Value::Int(parse_int(raw)),
            FieldKind::Number => Value::Number(parse_number(raw)),
            FieldKind::Text => Value::Text(raw.to_string()),
            FieldKind::Enum(variants) => match parse_enum(raw, variants) {
                Some(variant) => Value::Enum(variant.to_string()),
                None => {
                    log::debug!(
                        "<{}> unknown `{}` variant {:?}, keeping default",
                        self.name,
                        field.name,
                        raw
                    );
                    return None;
                }
            },
            FieldKind::Reference => {
                if raw.is_empty() {
                    return None;
                }
                session.note_reference(raw, &field.name);
                Value::Ref(raw.to_string())
            }
            FieldKind::Object(_) | FieldKind::List(_) => {
                log::trace!("<{}> composite `{}` given as attribute", self.name, field.name);
                return None;
            }
        };
        Some(value)
    }

    /// Decode one child element into the matching field of `into`.
    ///
    /// The field is named by the child's `as` attribute; without one, the
    /// first composite field declared with the decoded object's type is used.
    pub fn decode_child(
        &self,
        session: &mut Session<'_>,
        child: &Element,
        into: &mut dyn Persist,
    ) -> Result<(), CodecError> {
        let named = child
            .attribute(AS_ATTRIBUTE)
            .map(|name| (name, self.descriptor.resolve(name)));

        if let Some((name, field)) = named {
            let Some(field) = field else {
                log::trace!("<{}> ignoring unknown child `{}`", self.name, name);
                return Ok(());
            };
            if self.skips(field) {
                return Ok(());
            }
            let value = match (&field.kind, child.name()) {
                (FieldKind::List(item), ARRAY_TAG) => {
                    Some(Value::List(self.decode_items(session, field, item, child)?))
                }
                (FieldKind::Object(_), _) => session
                    .decode_element(child)?
                    .map(|v| self.materialize(session, v)),
                _ => {
                    log::trace!("<{}> child for `{}` does not fit its kind", self.name, field.name);
                    None
                }
            };
            if let Some(value) = value {
                self.assign(into, field, value);
            }
            return Ok(());
        }

        let Some(value) = session.decode_element(child)? else {
            return Ok(());
        };
        let value = self.materialize(session, value);
        let Some(type_name) = value.as_object().map(|o| o.type_name().to_string()) else {
            return Ok(());
        };
        let target = self.descriptor.fields.iter().find(|f| {
            !self.skips(f) && matches!(&f.kind, FieldKind::Object(t) if *t == type_name)
        });
        match target {
            Some(field) => self.assign(into, field, value),
            None => log::trace!("<{}> no field accepts a `{}` child", self.name, type_name),
        }
        Ok(())
    }

    fn decode_items(
        &self,
        session: &mut Session<'_>,
        field: &FieldDescriptor,
        item: &FieldKind,
        array: &Element,
    ) -> Result<Vec<Value>, CodecError> {
        let mut items = Vec::with_capacity(array.children().len());
        for child in array.children() {
            if child.name() == ADD_TAG && item.is_primitive() {
                let raw = child.attribute("value").unwrap_or_default();
                if let Some(value) = self.coerce(session, field, item, raw) {
                    items.push(value);
                }
            } else if child.name() == ARRAY_TAG {
                if let FieldKind::List(inner) = item {
                    items.push(Value::List(self.decode_items(session, field, inner, child)?));
                }
            } else if let Some(value) = session.decode_element(child)? {
                items.push(self.materialize(session, value));
            }
        }
        Ok(items)
    }

    /// Composite fields own their value; an id-registered object is cloned in.
    fn materialize(&self, session: &Session<'_>, value: Value) -> Value {
        match value {
            Value::Ref(id) => match session.get_object(&id) {
                Some(object) => Value::Object(object.clone_boxed()),
                None => Value::Ref(id),
            },
            other => other,
        }
    }

    fn assign(&self, into: &mut dyn Persist, field: &FieldDescriptor, value: Value) {
        if !into.set_field(&field.name, value) {
            log::debug!("<{}> field `{}` rejected child value", self.name, field.name);
        }
    }
}

impl ObjectCodec for DefaultCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        self.template.type_name()
    }

    fn descriptor(&self) -> Option<&TypeDescriptor> {
        Some(&self.descriptor)
    }

    fn is_excluded(&self, field: &str) -> bool {
        self.exclude.contains(field)
            || self
                .descriptor
                .field(field)
                .map(|f| f.transient)
                .unwrap_or(false)
    }

    fn encode(
        &self,
        session: &mut Session<'_>,
        object: &dyn Persist,
    ) -> Result<Option<Element>, CodecError> {
        let mut element = Element::new(&self.name);
        self.encode_fields(session, object, &mut element)?;
        Ok(Some(element))
    }

    fn decode(
        &self,
        session: &mut Session<'_>,
        element: &Element,
    ) -> Result<Box<dyn Persist>, CodecError> {
        let mut object = self.create();
        self.decode_into(session, element, object.as_mut())?;
        Ok(object)
    }

    fn decode_into(
        &self,
        session: &mut Session<'_>,
        element: &Element,
        into: &mut dyn Persist,
    ) -> Result<(), CodecError> {
        if into.type_name() != self.type_name() {
            return Err(CodecError::TargetMismatch {
                codec: self.name.clone(),
                found: into.type_name().to_string(),
            });
        }
        self.decode_attributes(session, element, into);
        for child in element.children() {
            self.decode_child(session, child, into)?;
        }
        self.decode_links(session, element, into);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecRegistry;
    use crate::config::CodecConfig;
    use crate::types::{Record, TypeDescriptorBuilder};

    fn note_codec() -> DefaultCodec {
        let descriptor = TypeDescriptorBuilder::new("Note")
            .text_field("id")
            .text_field("label")
            .number_field("weight")
            .bool_field("pinned")
            .enum_field("kind", &["plain", "warning"])
            .list_field("tags", FieldKind::Text)
            .transient("cache", FieldKind::Text)
            .remap("w", "weight")
            .build();
        DefaultCodec::new(Box::new(Record::new("Note")), Arc::new(descriptor))
    }

    #[test]
    fn decode_coerces_and_ignores_unknown() {
        let registry = CodecRegistry::new();
        let config = CodecConfig::default();
        let mut session = Session::new(&registry, &config);
        let codec = note_codec();

        let element = Element::new("Note")
            .with_attribute("label", "hello")
            .with_attribute("w", "abc")
            .with_attribute("pinned", "true")
            .with_attribute("kind", "WARNING")
            .with_attribute("cache", "stale")
            .with_attribute("bogus", "1")
            .with_child(
                Element::new(ARRAY_TAG)
                    .with_attribute(AS_ATTRIBUTE, "tags")
                    .with_child(Element::new(ADD_TAG).with_attribute("value", "a"))
                    .with_child(Element::new(ADD_TAG).with_attribute("value", "b")),
            );

        let object = codec.decode(&mut session, &element).unwrap();
        let note = object.downcast_ref::<Record>().unwrap();
        assert_eq!(note.get("label").and_then(Value::as_str), Some("hello"));
        assert_eq!(note.get("weight").and_then(Value::as_number), Some(0.0));
        assert_eq!(note.get("pinned").and_then(Value::as_bool), Some(true));
        assert_eq!(note.get("kind").and_then(Value::as_str), Some("warning"));
        assert!(note.get("cache").is_none());
        assert!(note.get("bogus").is_none());
        assert_eq!(note.get("tags").and_then(Value::as_list).map(|l| l.len()), Some(2));
    }

    #[test]
    fn encode_writes_attributes_and_arrays() {
        let registry = CodecRegistry::new();
        let config = CodecConfig::default();
        let mut session = Session::new(&registry, &config);
        let codec = note_codec();

        let note = Record::new("Note")
            .with("label", Value::from("x"))
            .with("weight", Value::Number(2.0))
            .with("pinned", Value::Bool(false))
            .with("cache", Value::from("ignored"))
            .with("tags", Value::List(vec![Value::from("a")]));

        let element = codec.encode(&mut session, &note).unwrap().unwrap();
        assert_eq!(element.name(), "Note");
        assert_eq!(element.attribute("weight"), Some("2"));
        assert_eq!(element.attribute("pinned"), Some("0"));
        assert!(element.attribute("cache").is_none());
        let array = element.child(ARRAY_TAG).unwrap();
        assert_eq!(array.attribute(AS_ATTRIBUTE), Some("tags"));
        assert_eq!(array.children()[0].attribute("value"), Some("a"));
    }

    #[test]
    fn decode_into_rejects_other_types() {
        let registry = CodecRegistry::new();
        let config = CodecConfig::default();
        let mut session = Session::new(&registry, &config);
        let codec = note_codec();

        let mut other = Record::new("Other");
        let result = codec.decode_into(&mut session, &Element::new("Note"), &mut other);
        assert!(matches!(result, Err(CodecError::TargetMismatch { .. })));
    }

    #[test]
    fn template_is_not_mutated() {
        let registry = CodecRegistry::new();
        let config = CodecConfig::default();
        let mut session = Session::new(&registry, &config);
        let codec = note_codec();

        let element = Element::new("Note").with_attribute("label", "changed");
        let _ = codec.decode(&mut session, &element).unwrap();
        assert!(codec.template().get_field("label").is_none());
        assert!(codec.is_excluded("cache"));
        assert!(!codec.is_excluded("label"));
    }
}
