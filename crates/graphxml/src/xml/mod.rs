// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Owned XML element tree plus its reader and writer.

mod element;
mod reader;
mod writer;

pub use element::Element;
pub use reader::parse_document;
pub use writer::write_document;

/// Attribute naming the field a nested element is assigned to.
pub const AS_ATTRIBUTE: &str = "as";

/// Container tag for list-valued fields.
pub const ARRAY_TAG: &str = "Array";

/// Tag of a primitive list item (`<add value="..."/>`).
pub const ADD_TAG: &str = "add";
