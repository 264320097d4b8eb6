// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Graph model: a tree of cells hanging off a single root.
//!
//! ```text
//! root "0"
//! +-- layer "1"
//!     +-- vertex "2"
//!     +-- vertex "3"
//!     +-- edge   "4" (2 -> 3)
//! ```

mod cell;
mod codecs;
mod geometry;

pub use cell::Cell;
pub use codecs::CellCodec;
pub use geometry::{Geometry, Point};

use crate::error::ModelError;
use std::collections::HashMap;

/// Cells indexed by id, with parent/child order kept on each cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphModel {
    cells: HashMap<String, Cell>,
    root: Option<String>,
}

impl GraphModel {
    /// Empty model without a root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Model with root `0` and a single default layer `1`.
    pub fn with_default_layers() -> Self {
        let mut model = Self::new();
        model.set_root(Cell::new("0"));
        // Cannot fail: the root was just inserted and `1` is free.
        let _ = model.add_cell(Cell::new("1"), Some("0"));
        model
    }

    pub fn root(&self) -> Option<&Cell> {
        self.root.as_deref().and_then(|id| self.cells.get(id))
    }

    /// Replace the whole model with a new root cell.
    pub fn set_root(&mut self, mut root: Cell) {
        self.cells.clear();
        root.parent = None;
        root.children.clear();
        self.root = Some(root.id.clone());
        self.cells.insert(root.id.clone(), root);
    }

    pub fn get_cell(&self, id: &str) -> Option<&Cell> {
        self.cells.get(id)
    }

    /// Mutable access for attributes; changing `id`, `parent` or `children`
    /// through this reference bypasses the model's bookkeeping.
    pub fn get_cell_mut(&mut self, id: &str) -> Option<&mut Cell> {
        self.cells.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cells.contains_key(id)
    }

    /// Add `cell` as the last child of `parent`, or as the root when `parent`
    /// is `None`. An empty id is replaced by a generated one.
    ///
    /// Returns the id of the added cell.
    pub fn add_cell(&mut self, mut cell: Cell, parent: Option<&str>) -> Result<String, ModelError> {
        if cell.id.is_empty() {
            cell.id = self.create_id();
        }
        if self.cells.contains_key(&cell.id) {
            return Err(ModelError::DuplicateId(cell.id));
        }
        cell.children.clear();
        let id = cell.id.clone();

        match parent {
            None => {
                if self.root.is_some() {
                    return Err(ModelError::RootExists);
                }
                cell.parent = None;
                self.root = Some(id.clone());
            }
            Some(parent_id) => {
                let parent = self
                    .cells
                    .get_mut(parent_id)
                    .ok_or_else(|| ModelError::UnknownParent(parent_id.to_string()))?;
                parent.children.push(id.clone());
                cell.parent = Some(parent_id.to_string());
            }
        }

        self.cells.insert(id.clone(), cell);
        Ok(id)
    }

    /// Insert a vertex under `parent` with a generated id.
    pub fn insert_vertex(
        &mut self,
        parent: &str,
        value: impl Into<String>,
        geometry: Geometry,
        style: Option<&str>,
    ) -> Result<String, ModelError> {
        let mut cell = Cell::new_vertex("", geometry).with_value(value);
        cell.style = style.map(str::to_string);
        self.add_cell(cell, Some(parent))
    }

    /// Insert an edge between two existing cells with a generated id.
    pub fn insert_edge(
        &mut self,
        parent: &str,
        value: impl Into<String>,
        source: &str,
        target: &str,
    ) -> Result<String, ModelError> {
        for terminal in [source, target] {
            if !self.cells.contains_key(terminal) {
                return Err(ModelError::UnknownCell(terminal.to_string()));
            }
        }
        let cell = Cell::new_edge("", source, target).with_value(value);
        self.add_cell(cell, Some(parent))
    }

    fn create_id(&self) -> String {
        let mut next = self.cells.len();
        loop {
            let candidate = next.to_string();
            if !self.cells.contains_key(&candidate) {
                return candidate;
            }
            next += 1;
        }
    }

    /// Children of `id` in stored order.
    pub fn children(&self, id: &str) -> Vec<&Cell> {
        self.cells
            .get(id)
            .map(|c| c.children.iter().filter_map(|child| self.cells.get(child)).collect())
            .unwrap_or_default()
    }

    /// Children of the root.
    pub fn layers(&self) -> Vec<&Cell> {
        match &self.root {
            Some(root) => self.children(root),
            None => Vec::new(),
        }
    }

    /// Every cell reachable from the root, parent before children, children
    /// in stored order.
    pub fn cells(&self) -> Vec<&Cell> {
        let mut out = Vec::with_capacity(self.cells.len());
        let mut stack: Vec<&Cell> = self.root().into_iter().collect();
        while let Some(cell) = stack.pop() {
            out.push(cell);
            for child in cell.children.iter().rev() {
                if let Some(child) = self.cells.get(child) {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Edges with `id` as source or target, in traversal order.
    pub fn edges_of(&self, id: &str) -> Vec<&Cell> {
        self.cells()
            .into_iter()
            .filter(|c| c.edge && c.connects(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
