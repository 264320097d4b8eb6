// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cell bounds and edge waypoints.

use crate::types::{Describe, FieldKind, Persist, TypeDescriptor, TypeDescriptorBuilder, Value};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Persist for Point {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "x" => Some(Value::Number(self.x)),
            "y" => Some(Value::Number(self.y)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> bool {
        let Some(v) = value.as_number() else {
            return false;
        };
        match name {
            "x" => self.x = v,
            "y" => self.y = v,
            _ => return false,
        }
        true
    }

    fn clone_boxed(&self) -> Box<dyn Persist> {
        Box::new(*self)
    }
}

impl Describe for Point {
    const TYPE_NAME: &'static str = "Point";

    fn describe() -> TypeDescriptor {
        TypeDescriptorBuilder::new(Self::TYPE_NAME)
            .number_field("x")
            .number_field("y")
            .build()
    }
}

/// Bounds of a vertex, or control points of an edge.
///
/// For relative geometries `x`/`y` are fractions of the parent's size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub relative: bool,
    pub offset: Option<Point>,
    pub source_point: Option<Point>,
    pub target_point: Option<Point>,
    /// Edge waypoints, in document order.
    pub points: Vec<Point>,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points = points.into_iter().collect();
        self
    }
}

fn point_value(point: &Option<Point>) -> Option<Value> {
    point.map(|p| Value::Object(Box::new(p)))
}

fn point_of(value: &Value) -> Option<Point> {
    value.as_object()?.downcast_ref::<Point>().copied()
}

impl Persist for Geometry {
    fn type_name(&self) -> &str {
        Self::TYPE_NAME
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "x" => Some(Value::Number(self.x)),
            "y" => Some(Value::Number(self.y)),
            "width" => Some(Value::Number(self.width)),
            "height" => Some(Value::Number(self.height)),
            "relative" => Some(Value::Bool(self.relative)),
            "offset" => point_value(&self.offset),
            "sourcePoint" => point_value(&self.source_point),
            "targetPoint" => point_value(&self.target_point),
            "points" => Some(Value::List(
                self.points
                    .iter()
                    .map(|p| Value::Object(Box::new(*p)))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> bool {
        match name {
            "x" | "y" | "width" | "height" => {
                let Some(v) = value.as_number() else {
                    return false;
                };
                match name {
                    "x" => self.x = v,
                    "y" => self.y = v,
                    "width" => self.width = v,
                    _ => self.height = v,
                }
            }
            "relative" => match value.as_bool() {
                Some(v) => self.relative = v,
                None => return false,
            },
            "offset" | "sourcePoint" | "targetPoint" => {
                let Some(point) = point_of(&value) else {
                    return false;
                };
                match name {
                    "offset" => self.offset = Some(point),
                    "sourcePoint" => self.source_point = Some(point),
                    _ => self.target_point = Some(point),
                }
            }
            "points" => match value.as_list() {
                Some(items) => self.points = items.iter().filter_map(point_of).collect(),
                None => return false,
            },
            _ => return false,
        }
        true
    }

    fn clone_boxed(&self) -> Box<dyn Persist> {
        Box::new(self.clone())
    }
}

impl Describe for Geometry {
    const TYPE_NAME: &'static str = "Geometry";

    fn describe() -> TypeDescriptor {
        let point = || Point::TYPE_NAME.to_string();
        TypeDescriptorBuilder::new(Self::TYPE_NAME)
            .number_field("x")
            .number_field("y")
            .number_field("width")
            .number_field("height")
            .bool_field("relative")
            .object_field("offset", point())
            .object_field("sourcePoint", point())
            .object_field("targetPoint", point())
            .list_field("points", FieldKind::Object(point()))
            .remap("w", "width")
            .remap("h", "height")
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_through_fields() {
        let mut geometry = Geometry::default();
        let items = vec![
            Value::Object(Box::new(Point::new(1.0, 2.0))),
            Value::Object(Box::new(Point::new(3.0, 4.0))),
        ];
        assert!(geometry.set_field("points", Value::List(items)));
        assert_eq!(geometry.points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);

        assert!(geometry.set_field("sourcePoint", Value::Object(Box::new(Point::new(5.0, 6.0)))));
        assert_eq!(geometry.source_point, Some(Point::new(5.0, 6.0)));
        assert!(!geometry.set_field("targetPoint", Value::Number(1.0)));
    }

    #[test]
    fn numeric_fields() {
        let mut geometry = Geometry::new(1.0, 2.0, 3.0, 4.0);
        assert!(geometry.set_field("width", Value::Int(10)));
        assert_eq!(geometry.width, 10.0);
        assert!(!geometry.set_field("height", Value::from("tall")));
        assert_eq!(geometry.get_field("height").and_then(|v| v.as_number()), Some(4.0));
    }
}
