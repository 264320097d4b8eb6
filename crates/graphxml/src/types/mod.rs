// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Persisted object model.
//!
//! From the codec's point of view every object is a bag of named fields with a
//! type name used to select its codec. Field layouts are declared up front in a
//! [`TypeDescriptor`] rather than discovered at runtime.
//!
//! # Example
//!
//! ```rust
//! use graphxml::types::{Persist, Record, TypeDescriptorBuilder, Value};
//!
//! let descriptor = TypeDescriptorBuilder::new("Annotation")
//!     .text_field("label")
//!     .number_field("weight")
//!     .build();
//! assert_eq!(descriptor.fields.len(), 2);
//!
//! let mut note = Record::new("Annotation");
//! note.set_field("label", Value::from("todo"));
//! assert_eq!(note.get_field("label").and_then(|v| v.as_str().map(str::to_owned)).as_deref(), Some("todo"));
//! ```

mod descriptor;
mod record;
mod value;

pub use descriptor::{FieldDescriptor, FieldKind, TypeDescriptor, TypeDescriptorBuilder};
pub use record::Record;
pub use value::Value;

use std::any::Any;
use std::fmt;

/// Upcast helper so `dyn Persist` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An object the codec layer can read and write field by field.
pub trait Persist: AsAny + fmt::Debug + Send + Sync {
    /// Natural type name, used to look up the codec on encode.
    fn type_name(&self) -> &str;

    /// Current value of a field; `None` when unset or unknown.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Assign a field. Returns `false` if the name or value kind is not accepted.
    fn set_field(&mut self, name: &str, value: Value) -> bool;

    /// Clone behind a box.
    fn clone_boxed(&self) -> Box<dyn Persist>;
}

impl<'a> dyn Persist + 'a {
    /// Whether the concrete type is `T`.
    pub fn is<T: Persist>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Persist>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Persist>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl Clone for Box<dyn Persist> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// A persisted type with a declared layout and a zero-argument form.
///
/// Registering a `Describe` type lets the registry synthesize a default codec
/// for it on first lookup.
pub trait Describe: Persist + Default {
    /// Natural type name; must equal [`Persist::type_name`].
    const TYPE_NAME: &'static str;

    /// Declared field layout.
    fn describe() -> TypeDescriptor;
}
