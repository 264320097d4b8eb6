// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for encode/decode sessions and the graph model.

use thiserror::Error;

/// Errors surfaced by codecs, sessions and the model serializer.
///
/// Attribute-level coercion problems never show up here: they are recovered
/// locally with a fallback value (see [`crate::coerce`]).
#[derive(Debug, Error)]
pub enum CodecError {
    /// Text is not well-formed XML, or a required container element is missing.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// An id was referenced but never defined once all passes completed.
    #[error("unresolved reference `{id}` (field `{field}`)")]
    UnresolvedReference { id: String, field: String },

    /// Encode requested on a configuration-only codec.
    #[error("codec `{0}` is configuration-only and cannot encode")]
    UnsupportedEncode(String),

    /// Nesting exceeded the configured recursion limit.
    #[error("document nesting exceeds the limit of {limit} levels")]
    DocumentTooDeep { limit: usize },

    /// No codec is registered or synthesizable for a type name.
    ///
    /// Only raised when [`MissingCodecPolicy::Error`](crate::config::MissingCodecPolicy)
    /// is configured; the default policy skips such elements.
    #[error("no codec available for `{0}`")]
    MissingCodec(String),

    /// `decode_into` was handed a target of the wrong runtime type.
    #[error("codec `{codec}` cannot configure an object of type `{found}`")]
    TargetMismatch { codec: String, found: String },

    /// The decoded cells do not form a valid model.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Structural errors raised by [`GraphModel`](crate::model::GraphModel).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("parent cell `{0}` does not exist")]
    UnknownParent(String),

    #[error("cell `{0}` does not exist")]
    UnknownCell(String),

    #[error("a cell with id `{0}` already exists")]
    DuplicateId(String),

    #[error("model has no root cell")]
    NoRoot,

    #[error("model already has a root cell")]
    RootExists,
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = CodecError> = std::result::Result<T, E>;
