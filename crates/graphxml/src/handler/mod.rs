// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Keystroke bindings and their configuration-only codec.
//!
//! ```xml
//! <KeyHandler>
//!   <add as="88" control="true" action="cut"/>
//!   <add as="46" action="delete"/>
//! </KeyHandler>
//! ```

use crate::coerce::{parse_bool, parse_int};
use crate::codec::{ObjectCodec, Session};
use crate::error::CodecError;
use crate::types::{Describe, Persist, TypeDescriptor, TypeDescriptorBuilder, Value};
use crate::xml::{Element, ADD_TAG, AS_ATTRIBUTE};
use std::collections::BTreeMap;

/// Key code plus modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyBinding {
    pub code: u32,
    pub control: bool,
    pub shift: bool,
}

impl KeyBinding {
    pub fn new(code: u32) -> Self {
        Self {
            code,
            control: false,
            shift: false,
        }
    }

    pub fn with_control(mut self) -> Self {
        self.control = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Maps keystrokes to named actions.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyHandler {
    pub enabled: bool,
    bindings: BTreeMap<KeyBinding, String>,
}

impl Default for KeyHandler {
    fn default() -> Self {
        Self {
            enabled: true,
            bindings: BTreeMap::new(),
        }
    }
}

impl KeyHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `action` to a keystroke, replacing any previous binding for it.
    pub fn bind_action(&mut self, binding: KeyBinding, action: impl Into<String>) {
        self.bindings.insert(binding, action.into());
    }

    pub fn unbind(&mut self, binding: &KeyBinding) -> Option<String> {
        self.bindings.remove(binding)
    }

    /// Action bound to a keystroke; `None` while disabled.
    pub fn action_for(&self, binding: &KeyBinding) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.bindings.get(binding).map(String::as_str)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&KeyBinding, &str)> {
        self.bindings.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Persist for KeyHandler {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "enabled" => Some(Value::Bool(self.enabled)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> bool {
        match (name, value.as_bool()) {
            ("enabled", Some(v)) => {
                self.enabled = v;
                true
            }
            _ => false,
        }
    }

    fn clone_boxed(&self) -> Box<dyn Persist> {
        Box::new(self.clone())
    }
}

impl Describe for KeyHandler {
    const TYPE_NAME: &'static str = "KeyHandler";

    fn describe() -> TypeDescriptor {
        TypeDescriptorBuilder::new(Self::TYPE_NAME)
            .bool_field("enabled")
            .build()
    }
}

/// Configures an existing [`KeyHandler`] from `add` directives.
///
/// Encoding is not supported and always fails with
/// [`CodecError::UnsupportedEncode`].
#[derive(Debug)]
pub struct KeyHandlerCodec {
    descriptor: TypeDescriptor,
}

impl KeyHandlerCodec {
    pub fn new() -> Self {
        Self {
            descriptor: KeyHandler::describe(),
        }
    }

    fn binding_of(directive: &Element) -> Option<(KeyBinding, &str)> {
        let code = directive.attribute(AS_ATTRIBUTE)?;
        let Ok(code) = u32::try_from(parse_int(code)) else {
            log::warn!("[KeyHandler] ignoring key code {:?}", code);
            return None;
        };
        let Some(action) = directive.attribute("action").filter(|a| !a.is_empty()) else {
            log::warn!("[KeyHandler] key {} has no action", code);
            return None;
        };
        let binding = KeyBinding {
            code,
            control: directive.attribute("control").map(parse_bool).unwrap_or(false),
            shift: directive.attribute("shift").map(parse_bool).unwrap_or(false),
        };
        Some((binding, action))
    }
}

impl Default for KeyHandlerCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectCodec for KeyHandlerCodec {
    fn name(&self) -> &str {
        KeyHandler::TYPE_NAME
    }

    fn type_name(&self) -> &str {
        KeyHandler::TYPE_NAME
    }

    fn descriptor(&self) -> Option<&TypeDescriptor> {
        Some(&self.descriptor)
    }

    fn encode(
        &self,
        _session: &mut Session<'_>,
        _object: &dyn Persist,
    ) -> Result<Option<Element>, CodecError> {
        Err(CodecError::UnsupportedEncode(self.name().to_string()))
    }

    fn decode(
        &self,
        session: &mut Session<'_>,
        element: &Element,
    ) -> Result<Box<dyn Persist>, CodecError> {
        let mut handler = KeyHandler::default();
        self.decode_into(session, element, &mut handler)?;
        Ok(Box::new(handler))
    }

    fn decode_into(
        &self,
        _session: &mut Session<'_>,
        element: &Element,
        into: &mut dyn Persist,
    ) -> Result<(), CodecError> {
        let found = into.type_name().to_string();
        let Some(handler) = into.downcast_mut::<KeyHandler>() else {
            return Err(CodecError::TargetMismatch {
                codec: self.name().to_string(),
                found,
            });
        };
        for directive in element.children() {
            if directive.name() != ADD_TAG {
                log::trace!("[KeyHandler] ignoring <{}>", directive.name());
                continue;
            }
            if let Some((binding, action)) = Self::binding_of(directive) {
                handler.bind_action(binding, action);
            }
        }
        Ok(())
    }
}
