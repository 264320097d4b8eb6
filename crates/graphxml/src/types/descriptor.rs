// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared field layouts for persisted types.

/// Declared kind of a persisted field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Bool,
    Int,
    Number,
    Text,
    /// Enumeration with its allowed variant names.
    Enum(Vec<String>),
    /// Id of another persisted object.
    Reference,
    /// Nested composite of the named type.
    Object(String),
    /// Ordered list of items of the inner kind.
    List(Box<FieldKind>),
}

impl FieldKind {
    /// Primitive kinds are written as attributes.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Self::Object(_) | Self::List(_))
    }

    /// Type name of the composite carried by this kind, if any.
    pub fn object_type(&self) -> Option<&str> {
        match self {
            Self::Object(name) => Some(name),
            Self::List(inner) => inner.object_type(),
            _ => None,
        }
    }
}

/// Field descriptor for struct members.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name, also the attribute / `as` name in documents.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
    /// Excluded from encode and decode.
    pub transient: bool,
}

impl FieldDescriptor {
    /// Create a persistent field.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transient: false,
        }
    }

    /// Mark as transient.
    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name.
    pub name: String,
    /// Fields in declaration (and encode) order.
    pub fields: Vec<FieldDescriptor>,
    /// Legacy attribute name -> current field name.
    pub remaps: Vec<(String, String)>,
}

impl TypeDescriptor {
    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Map a document attribute name to its current field name.
    pub fn remap<'a>(&'a self, attribute: &'a str) -> &'a str {
        self.remaps
            .iter()
            .find(|(legacy, _)| legacy == attribute)
            .map(|(_, current)| current.as_str())
            .unwrap_or(attribute)
    }

    /// Resolve a document attribute (after remapping) to its field.
    pub fn resolve(&self, attribute: &str) -> Option<&FieldDescriptor> {
        self.field(self.remap(attribute))
    }

    /// Names of transient fields.
    pub fn transient_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.transient)
            .map(|f| f.name.as_str())
    }
}

/// Builder for creating [`TypeDescriptor`] instances.
#[derive(Debug)]
pub struct TypeDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    remaps: Vec<(String, String)>,
}

impl TypeDescriptorBuilder {
    /// Create a new builder for the named type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            remaps: Vec::new(),
        }
    }

    /// Add a field of any kind.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind));
        self
    }

    pub fn bool_field(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Bool)
    }

    pub fn int_field(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Int)
    }

    pub fn number_field(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Number)
    }

    pub fn text_field(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Text)
    }

    /// Add an enumeration field with its variant names.
    pub fn enum_field(self, name: impl Into<String>, variants: &[&str]) -> Self {
        let variants = variants.iter().map(|v| (*v).to_string()).collect();
        self.field(name, FieldKind::Enum(variants))
    }

    /// Add an id-reference field.
    pub fn reference(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Reference)
    }

    /// Add a nested composite field.
    pub fn object_field(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Object(type_name.into()))
    }

    /// Add an ordered list field.
    pub fn list_field(self, name: impl Into<String>, item: FieldKind) -> Self {
        self.field(name, FieldKind::List(Box::new(item)))
    }

    /// Add a transient field (declared for completeness, never serialized).
    pub fn transient(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDescriptor::new(name, kind).transient());
        self
    }

    /// Accept `legacy` as an attribute name for field `current`.
    pub fn remap(mut self, legacy: impl Into<String>, current: impl Into<String>) -> Self {
        self.remaps.push((legacy.into(), current.into()));
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            name: self.name,
            fields: self.fields,
            remaps: self.remaps,
        }
    }
}
