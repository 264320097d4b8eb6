// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Object graph <-> XML codec engine for mxGraph-style diagram models.
//!
//! Persists a graph of cells (vertices, edges, layers) together with their
//! geometry and style to an XML element tree, and rebuilds an equivalent graph
//! from it, including cross-references and cycles. Markup can also configure
//! objects that already exist, such as keystroke bindings on a live handler.
//!
//! # Features
//!
//! - **Declared layouts**: every persisted type describes its fields up front
//!   ([`types::TypeDescriptor`]); no runtime reflection
//! - **Codec registry**: tag/type name -> codec, with a legacy alias table and
//!   default codecs synthesized for registered types
//! - **Sessions**: id table plus object arena per call; forward references and
//!   cycles resolve without recursion
//! - **Tolerant decode**: malformed attribute values fall back to defaults,
//!   unknown attributes and elements are ignored
//! - **Atomic import**: a failed import leaves the target model untouched
//!
//! # Architecture
//!
//! ```text
//! XML text --parse--> Element tree --ModelXmlSerializer--> Session --> ObjectCodec
//!                                                             |            |
//!                                                             v            v
//!                                                        id table    CodecRegistry
//! ```
//!
//! # Example
//!
//! ```rust
//! use graphxml::{CodecConfig, CodecRegistry, GraphModel, ModelXmlSerializer};
//!
//! let registry = CodecRegistry::with_defaults();
//! let serializer = ModelXmlSerializer::with_registry(&registry, CodecConfig::default());
//!
//! let mut model = GraphModel::new();
//! serializer
//!     .import(
//!         r#"<mxGraphModel><root><mxCell id="0"/><mxCell id="1" parent="0"/></root></mxGraphModel>"#,
//!         &mut model,
//!     )
//!     .unwrap();
//! assert_eq!(model.len(), 2);
//!
//! let text = serializer.export(&model).unwrap();
//! assert_eq!(
//!     text,
//!     r#"<mxGraphModel><root><mxCell id="0"/><mxCell id="1" parent="0"/></root></mxGraphModel>"#
//! );
//! ```

pub mod codec;
pub mod coerce;
pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod serializer;
pub mod style;
pub mod types;
pub mod xml;

pub use codec::{CodecRegistry, DefaultCodec, ObjectCodec, Session};
pub use config::{CodecConfig, ConfigError, MissingCodecPolicy};
pub use error::{CodecError, ModelError};
pub use handler::{KeyBinding, KeyHandler, KeyHandlerCodec};
pub use model::{Cell, Geometry, GraphModel, Point};
pub use serializer::ModelXmlSerializer;
pub use style::{Stylesheet, StylesheetCodec};
pub use types::{Describe, Persist, Record, TypeDescriptor, Value};
pub use xml::Element;
