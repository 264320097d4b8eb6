// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field values exchanged between objects and codecs.

use crate::types::Persist;

/// A field value as seen by the codec layer.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Number(f64),
    Text(String),
    /// Canonical variant name of an enumeration.
    Enum(String),
    /// Cross-reference to another persisted object by its stable id.
    Ref(String),
    /// Composite value owned by the field.
    Object(Box<dyn Persist>),
    List(Vec<Value>),
}

impl Value {
    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as number (integers widen).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Text, enum variant or reference id.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) | Self::Enum(v) | Self::Ref(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get a reference id.
    pub fn as_ref_id(&self) -> Option<&str> {
        match self {
            Self::Ref(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get a composite value.
    pub fn as_object(&self) -> Option<&dyn Persist> {
        match self {
            Self::Object(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    /// Take a composite value.
    pub fn into_object(self) -> Option<Box<dyn Persist>> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get list items.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Take list items.
    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Whether this value is indistinguishable from a template default.
    ///
    /// Composite values never count as defaults; lists only when both are empty.
    pub fn matches_default(&self, default: &Value) -> bool {
        match (self, default) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b))
            | (Self::Enum(a), Self::Enum(b))
            | (Self::Ref(a), Self::Ref(b)) => a == b,
            (Self::List(a), Self::List(b)) => a.is_empty() && b.is_empty(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Box<dyn Persist>> for Value {
    fn from(v: Box<dyn Persist>) -> Self {
        Self::Object(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(3i64).as_number(), Some(3.0));
        assert_eq!(Value::from(2.5).as_int(), None);
        assert_eq!(Value::Ref("7".into()).as_ref_id(), Some("7"));
        assert_eq!(Value::Enum("Block".into()).as_str(), Some("Block"));
        assert!(Value::from("x").as_list().is_none());
    }

    #[test]
    fn default_matching() {
        assert!(Value::Bool(true).matches_default(&Value::Bool(true)));
        assert!(!Value::Number(1.0).matches_default(&Value::Int(1)));
        assert!(Value::List(vec![]).matches_default(&Value::List(vec![])));
        assert!(!Value::List(vec![Value::Int(1)]).matches_default(&Value::List(vec![])));
    }
}
