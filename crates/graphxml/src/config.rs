// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! Supports both programmatic and file-based configuration.
//!
//! ```toml
//! max_depth = 64
//! missing_codec = "error"
//! omit_defaults = true
//! indent = 2
//! root_tag = "mxGraphModel"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What to do with an element or object whose type has no codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCodecPolicy {
    /// Log and ignore the element (permissive default).
    #[default]
    Skip,
    /// Fail the whole operation with [`CodecError::MissingCodec`](crate::CodecError).
    Error,
}

/// Settings shared by every session created from one serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum element nesting accepted on decode and produced on encode.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Policy for types without a codec.
    #[serde(default)]
    pub missing_codec: MissingCodecPolicy,

    /// Skip primitive fields whose value equals the codec template's.
    #[serde(default = "default_true")]
    pub omit_defaults: bool,

    /// Spaces per nesting level for exported text; `None` writes a single line.
    #[serde(default)]
    pub indent: Option<usize>,

    /// Container element name written on export.
    #[serde(default = "default_root_tag")]
    pub root_tag: String,
}

fn default_max_depth() -> usize {
    128
}

fn default_true() -> bool {
    true
}

fn default_root_tag() -> String {
    "mxGraphModel".to_string()
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            missing_codec: MissingCodecPolicy::Skip,
            omit_defaults: true,
            indent: None,
            root_tag: default_root_tag(),
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.root_tag.trim().is_empty() {
            return Err(ConfigError::Invalid("root_tag must not be empty".into()));
        }
        Ok(())
    }

    /// Builder-style override of the recursion limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder-style override of the missing-codec policy.
    pub fn with_missing_codec(mut self, policy: MissingCodecPolicy) -> Self {
        self.missing_codec = policy;
        self
    }

    /// Builder-style override of pretty-print indentation.
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_depth, 128);
        assert_eq!(config.missing_codec, MissingCodecPolicy::Skip);
        assert!(config.omit_defaults);
        assert_eq!(config.indent, None);
        assert_eq!(config.root_tag, "mxGraphModel");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_partial_toml_fills_defaults() {
        let config = CodecConfig::from_toml_str("missing_codec = \"error\"\nindent = 2\n")
            .expect("valid config");
        assert_eq!(config.missing_codec, MissingCodecPolicy::Error);
        assert_eq!(config.indent, Some(2));
        assert_eq!(config.max_depth, 128);
    }

    #[test]
    fn zero_depth_rejected() {
        let err = CodecConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn invalid_toml_reported() {
        let err = CodecConfig::from_toml_str("max_depth = [").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "max_depth = 16\nroot_tag = \"graph\"").expect("write");

        let config = CodecConfig::from_file(file.path()).expect("load");
        assert_eq!(config.max_depth, 16);
        assert_eq!(config.root_tag, "graph");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = CodecConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
