// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type codecs, the registry that selects them and the session state of a
//! single encode or decode pass.
//!
//! # Architecture
//!
//! ```text
//! CodecRegistry
//! +-- codecs:  name -> Arc<dyn ObjectCodec>
//! +-- aliases: legacy/natural name -> canonical codec name (one hop)
//! +-- types:   type name -> (descriptor, zero-argument factory)
//!
//! Session (one per encode/decode call)
//! +-- id table:  id -> ObjectHandle
//! +-- arena:     ObjectHandle -> decoded object
//! +-- pending:   references seen before their target
//! ```

mod object_codec;
mod registry;
mod session;

pub use object_codec::DefaultCodec;
pub use registry::{CodecRegistry, RegistrySnapshot};
pub use session::{ObjectHandle, Session};

use crate::error::CodecError;
use crate::types::{Persist, TypeDescriptor};
use crate::xml::Element;
use std::fmt;

/// Strategy converting one type's objects to and from elements.
pub trait ObjectCodec: Send + Sync + fmt::Debug {
    /// Registered codec name; the tag written on encode.
    fn name(&self) -> &str;

    /// Natural type name of the objects this codec handles.
    fn type_name(&self) -> &str;

    /// Declared layout, when the codec is descriptor-driven.
    fn descriptor(&self) -> Option<&TypeDescriptor> {
        None
    }

    /// Whether `field` is left out of serialization.
    fn is_excluded(&self, _field: &str) -> bool {
        false
    }

    /// Encode an object. `Ok(None)` means there is nothing to encode.
    ///
    /// Configuration-only codecs return [`CodecError::UnsupportedEncode`].
    fn encode(
        &self,
        session: &mut Session<'_>,
        object: &dyn Persist,
    ) -> Result<Option<Element>, CodecError>;

    /// Decode an element into a new instance.
    fn decode(
        &self,
        session: &mut Session<'_>,
        element: &Element,
    ) -> Result<Box<dyn Persist>, CodecError>;

    /// Configure an existing object from an element.
    fn decode_into(
        &self,
        session: &mut Session<'_>,
        element: &Element,
        into: &mut dyn Persist,
    ) -> Result<(), CodecError>;
}

/// Value of an object's `id` field, if it has a non-empty one.
pub fn object_id(object: &dyn Persist) -> Option<String> {
    object
        .get_field("id")
        .and_then(|v| v.as_str().map(str::to_string))
        .filter(|id| !id.is_empty())
}
