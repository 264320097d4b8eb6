// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! State of a single encode or decode pass.

use super::{object_id, CodecRegistry, ObjectCodec};
use crate::config::{CodecConfig, MissingCodecPolicy};
use crate::error::CodecError;
use crate::types::{Persist, Value};
use crate::xml::Element;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Index of an object in a session's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(usize);

impl ObjectHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Slot {
    id: Option<String>,
    /// `None` while the object is still being decoded, and for ids recorded
    /// during encode.
    object: Option<Box<dyn Persist>>,
}

#[derive(Debug, Clone)]
struct PendingReference {
    id: String,
    field: String,
}

/// Composite field of `holder` to fill with a clone of `id` once decoding ends.
#[derive(Debug, Clone)]
struct DeferredLink {
    holder: ObjectHandle,
    field: String,
    id: String,
}

/// Encode/decode session.
///
/// Holds the id table and the arena of decoded objects. Ids are registered
/// before an object's children are decoded, so back-references and cycles
/// resolve to the object under construction. Each session belongs to one
/// call and is never shared between threads.
#[derive(Debug)]
pub struct Session<'r> {
    registry: &'r CodecRegistry,
    config: &'r CodecConfig,
    ids: HashMap<String, ObjectHandle>,
    slots: Vec<Slot>,
    pending: Vec<PendingReference>,
    links: Vec<DeferredLink>,
    /// Slot of each object under decode, innermost last; `None` for anonymous ones.
    decoding: Vec<Option<ObjectHandle>>,
    /// Ids present in the input that synthesized ids must avoid.
    claimed: HashSet<String>,
    depth: usize,
    next_id: u64,
}

impl<'r> Session<'r> {
    pub fn new(registry: &'r CodecRegistry, config: &'r CodecConfig) -> Self {
        Self {
            registry,
            config,
            ids: HashMap::new(),
            slots: Vec::new(),
            pending: Vec::new(),
            links: Vec::new(),
            decoding: Vec::new(),
            claimed: HashSet::new(),
            depth: 0,
            next_id: 0,
        }
    }

    pub fn registry(&self) -> &'r CodecRegistry {
        self.registry
    }

    pub fn config(&self) -> &'r CodecConfig {
        self.config
    }

    // ========================================================================
    // Identity table
    // ========================================================================

    /// Associate `id` with an object. A later call with the same id wins.
    pub fn put_object(&mut self, id: &str, object: Box<dyn Persist>) -> ObjectHandle {
        let handle = self.push_slot(Some(id.to_string()), Some(object));
        self.ids.insert(id.to_string(), handle);
        handle
    }

    /// Object registered under `id`, if it is fully decoded.
    pub fn get_object(&self, id: &str) -> Option<&dyn Persist> {
        self.lookup(id).and_then(|h| self.object(h))
    }

    /// Handle registered under `id`, including objects still being decoded.
    pub fn lookup(&self, id: &str) -> Option<ObjectHandle> {
        self.ids.get(id).copied()
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&dyn Persist> {
        self.slots.get(handle.0)?.object.as_deref()
    }

    pub fn object_mut(&mut self, handle: ObjectHandle) -> Option<&mut (dyn Persist + 'static)> {
        self.slots.get_mut(handle.0)?.object.as_deref_mut()
    }

    /// Append an object without an id.
    pub fn push_anonymous(&mut self, object: Box<dyn Persist>) -> ObjectHandle {
        self.push_slot(None, Some(object))
    }

    /// Register `id` ahead of its object.
    pub(crate) fn reserve(&mut self, id: &str) -> ObjectHandle {
        let handle = self.push_slot(Some(id.to_string()), None);
        self.ids.insert(id.to_string(), handle);
        handle
    }

    pub(crate) fn fill(&mut self, handle: ObjectHandle, object: Box<dyn Persist>) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            slot.object = Some(object);
        }
    }

    fn push_slot(&mut self, id: Option<String>, object: Option<Box<dyn Persist>>) -> ObjectHandle {
        self.slots.push(Slot { id, object });
        ObjectHandle(self.slots.len() - 1)
    }

    /// Keep [`Self::synthesize_id`] away from ids not decoded yet.
    pub fn claim_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.claimed.extend(ids.into_iter().map(Into::into));
    }

    /// Generate an id not used or claimed in this session.
    pub fn synthesize_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let candidate = self.next_id.to_string();
            if !self.ids.contains_key(&candidate) && !self.claimed.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Number of arena slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Decoded objects in arena order, with their ids.
    pub fn objects(&self) -> impl Iterator<Item = (Option<&str>, &dyn Persist)> {
        self.slots.iter().filter_map(|s| {
            let object: &dyn Persist = s.object.as_deref()?;
            Some((s.id.as_deref(), object))
        })
    }

    /// Consume the session, yielding decoded objects in arena order.
    pub fn into_objects(self) -> Vec<(Option<String>, Box<dyn Persist>)> {
        self.slots
            .into_iter()
            .filter_map(|s| s.object.map(|o| (s.id, o)))
            .collect()
    }

    // ========================================================================
    // References
    // ========================================================================

    /// Record a reference to `id` made by `field`; checked by [`Self::resolve_pending`].
    pub fn note_reference(&mut self, id: &str, field: &str) {
        if !self.ids.contains_key(id) {
            self.pending.push(PendingReference {
                id: id.to_string(),
                field: field.to_string(),
            });
        }
    }

    /// Number of references seen before their target.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Fill composite `field` of the object under decode with `id` once it is decoded.
    ///
    /// Only objects carrying an id can be linked later; for an anonymous
    /// holder the link is dropped.
    pub fn defer_link(&mut self, id: &str, field: &str) {
        match self.decoding.last().copied().flatten() {
            Some(holder) => self.links.push(DeferredLink {
                holder,
                field: field.to_string(),
                id: id.to_string(),
            }),
            None => log::debug!("dropping link `{}` -> `{}` on an anonymous object", field, id),
        }
    }

    /// Fail on the first reference whose target never appeared, then apply
    /// deferred composite links.
    pub fn resolve_pending(&mut self) -> Result<(), CodecError> {
        let pending = std::mem::take(&mut self.pending);
        let resolved = pending.len();
        for reference in pending {
            if !self.ids.contains_key(&reference.id) {
                return Err(CodecError::UnresolvedReference {
                    id: reference.id,
                    field: reference.field,
                });
            }
        }
        if resolved > 0 {
            log::debug!("resolved {} forward reference(s)", resolved);
        }

        for link in std::mem::take(&mut self.links) {
            let target = self.get_object(&link.id).map(|o| o.clone_boxed());
            let Some(target) = target else {
                return Err(CodecError::UnresolvedReference {
                    id: link.id,
                    field: link.field,
                });
            };
            if let Some(holder) = self.object_mut(link.holder) {
                if !holder.set_field(&link.field, Value::Object(target)) {
                    log::debug!("field `{}` rejected linked object `{}`", link.field, link.id);
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Whether the codec for `object` excludes `field`.
    pub fn is_excluded(&self, object: &dyn Persist, field: &str) -> bool {
        self.registry
            .get_codec(object.type_name())
            .map(|c| c.is_excluded(field))
            .unwrap_or(false)
    }

    /// Codec for a tag or type name, applying the missing-codec policy.
    pub fn codec_for(&self, name: &str) -> Result<Option<Arc<dyn ObjectCodec>>, CodecError> {
        match self.registry.get_codec(name) {
            Some(codec) => Ok(Some(codec)),
            None => match self.config.missing_codec {
                MissingCodecPolicy::Skip => {
                    log::debug!("no codec for `{}`, skipping", name);
                    Ok(None)
                }
                MissingCodecPolicy::Error => Err(CodecError::MissingCodec(name.to_string())),
            },
        }
    }

    /// Decode one element through the codec its tag selects.
    ///
    /// Elements carrying an id are registered in the arena and come back as
    /// [`Value::Ref`]; an id seen before yields a reference to the existing
    /// object without decoding again. Anonymous elements come back as
    /// [`Value::Object`]. `Ok(None)` means the element was skipped.
    pub fn decode_element(&mut self, element: &Element) -> Result<Option<Value>, CodecError> {
        self.nested(|s| {
            let Some(codec) = s.codec_for(element.name())? else {
                return Ok(None);
            };
            match element.attribute("id").filter(|id| !id.is_empty()) {
                Some(id) => {
                    if s.ids.contains_key(id) {
                        log::trace!("<{}> id `{}` already decoded", element.name(), id);
                        return Ok(Some(Value::Ref(id.to_string())));
                    }
                    let handle = s.reserve(id);
                    let object = s.decoding(Some(handle), |s| codec.decode(s, element))?;
                    s.fill(handle, object);
                    Ok(Some(Value::Ref(id.to_string())))
                }
                None => {
                    let object = s.decoding(None, |s| codec.decode(s, element))?;
                    Ok(Some(Value::Object(object)))
                }
            }
        })
    }

    /// Configure an existing object from an element.
    pub fn decode_into(&mut self, element: &Element, into: &mut dyn Persist) -> Result<(), CodecError> {
        self.nested(|s| match s.codec_for(element.name())? {
            Some(codec) => s.decoding(None, |s| codec.decode_into(s, element, into)),
            None => Ok(()),
        })
    }

    /// Encode an object through the codec its type name selects.
    ///
    /// The object's id is recorded first so later fields can refer to it.
    pub fn encode_object(&mut self, object: &dyn Persist) -> Result<Option<Element>, CodecError> {
        self.nested(|s| {
            let Some(codec) = s.codec_for(object.type_name())? else {
                return Ok(None);
            };
            if let Some(id) = object_id(object) {
                if !s.ids.contains_key(&id) {
                    s.reserve(&id);
                }
            }
            codec.encode(s, object)
        })
    }

    fn decoding<T>(
        &mut self,
        holder: Option<ObjectHandle>,
        f: impl FnOnce(&mut Self) -> Result<T, CodecError>,
    ) -> Result<T, CodecError> {
        self.decoding.push(holder);
        let result = f(self);
        self.decoding.pop();
        result
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, CodecError>,
    ) -> Result<T, CodecError> {
        if self.depth >= self.config.max_depth {
            return Err(CodecError::DocumentTooDeep {
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}
