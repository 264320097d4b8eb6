// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Graph cell: vertex, edge, layer or root.

use super::Geometry;
use crate::types::{Describe, FieldKind, Persist, TypeDescriptor, TypeDescriptorBuilder, Value};

/// One element of the graph model.
///
/// Relationships are held by id. `children` is maintained by
/// [`GraphModel`](super::GraphModel) and is never serialized; on import it is
/// rebuilt from each cell's parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: String,
    pub value: Option<String>,
    pub style: Option<String>,
    pub vertex: bool,
    pub edge: bool,
    pub connectable: bool,
    pub visible: bool,
    pub collapsed: bool,
    pub parent: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub geometry: Option<Geometry>,
    pub children: Vec<String>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            id: String::new(),
            value: None,
            style: None,
            vertex: false,
            edge: false,
            connectable: true,
            visible: true,
            collapsed: false,
            parent: None,
            source: None,
            target: None,
            geometry: None,
            children: Vec::new(),
        }
    }
}

impl Cell {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Vertex cell with a geometry.
    pub fn new_vertex(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            vertex: true,
            geometry: Some(geometry),
            ..Self::new(id)
        }
    }

    /// Edge cell between two terminals.
    pub fn new_edge(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            edge: true,
            source: Some(source.into()),
            target: Some(target.into()),
            geometry: Some(Geometry {
                relative: true,
                ..Geometry::default()
            }),
            ..Self::new(id)
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Whether `id` is one of this edge's terminals.
    pub fn connects(&self, id: &str) -> bool {
        self.source.as_deref() == Some(id) || self.target.as_deref() == Some(id)
    }
}

fn opt_text(value: &Option<String>) -> Option<Value> {
    value.clone().map(Value::Text)
}

fn opt_ref(value: &Option<String>) -> Option<Value> {
    value.clone().map(Value::Ref)
}

fn id_of(value: Value) -> Option<String> {
    match value {
        Value::Ref(id) | Value::Text(id) => Some(id),
        _ => None,
    }
}

impl Persist for Cell {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "id" if !self.id.is_empty() => Some(Value::Text(self.id.clone())),
            "value" => opt_text(&self.value),
            "style" => opt_text(&self.style),
            "vertex" => Some(Value::Bool(self.vertex)),
            "edge" => Some(Value::Bool(self.edge)),
            "connectable" => Some(Value::Bool(self.connectable)),
            "visible" => Some(Value::Bool(self.visible)),
            "collapsed" => Some(Value::Bool(self.collapsed)),
            "parent" => opt_ref(&self.parent),
            "source" => opt_ref(&self.source),
            "target" => opt_ref(&self.target),
            "geometry" => self
                .geometry
                .as_ref()
                .map(|g| Value::Object(Box::new(g.clone()))),
            "children" => Some(Value::List(
                self.children.iter().cloned().map(Value::Ref).collect(),
            )),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> bool {
        match (name, value) {
            ("id", Value::Text(v)) => self.id = v,
            ("value", Value::Text(v)) => self.value = Some(v),
            ("style", Value::Text(v)) => self.style = Some(v),
            ("vertex", Value::Bool(v)) => self.vertex = v,
            ("edge", Value::Bool(v)) => self.edge = v,
            ("connectable", Value::Bool(v)) => self.connectable = v,
            ("visible", Value::Bool(v)) => self.visible = v,
            ("collapsed", Value::Bool(v)) => self.collapsed = v,
            ("parent", v) => match id_of(v) {
                Some(id) => self.parent = Some(id),
                None => return false,
            },
            ("source", v) => match id_of(v) {
                Some(id) => self.source = Some(id),
                None => return false,
            },
            ("target", v) => match id_of(v) {
                Some(id) => self.target = Some(id),
                None => return false,
            },
            ("geometry", Value::Object(object)) => match object.downcast_ref::<Geometry>() {
                Some(geometry) => self.geometry = Some(geometry.clone()),
                None => return false,
            },
            ("children", Value::List(items)) => {
                self.children = items.into_iter().filter_map(id_of).collect();
            }
            _ => return false,
        }
        true
    }

    fn clone_boxed(&self) -> Box<dyn Persist> {
        Box::new(self.clone())
    }
}

impl Describe for Cell {
    const TYPE_NAME: &'static str = "Cell";

    fn describe() -> TypeDescriptor {
        TypeDescriptorBuilder::new(Self::TYPE_NAME)
            .text_field("id")
            .text_field("value")
            .text_field("style")
            .bool_field("vertex")
            .bool_field("edge")
            .bool_field("connectable")
            .bool_field("visible")
            .bool_field("collapsed")
            .reference("parent")
            .reference("source")
            .reference("target")
            .object_field("geometry", Geometry::TYPE_NAME)
            .transient("children", FieldKind::List(Box::new(FieldKind::Reference)))
            .remap("isVertex", "vertex")
            .remap("isEdge", "edge")
            .build()
    }
}
