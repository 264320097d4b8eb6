// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record container for types known only by their descriptor.

use crate::types::{Persist, Value};
use std::collections::BTreeMap;

/// Type-erased field bag.
///
/// Lets host code persist types that have no Rust struct: register a
/// descriptor with [`CodecRegistry::register_record`](crate::codec::CodecRegistry::register_record)
/// and elements of that type decode into a `Record`.
#[derive(Debug, Clone, Default)]
pub struct Record {
    type_name: String,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record of the named type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Borrow a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Builder-style field assignment.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Persist for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: Value) -> bool {
        self.fields.insert(name.to_string(), value);
        true
    }

    fn clone_boxed(&self) -> Box<dyn Persist> {
        Box::new(self.clone())
    }
}
