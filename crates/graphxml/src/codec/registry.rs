// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec registry.
//!
//! Maps tag and type names to codecs. Lookups follow at most one alias hop,
//! then fall back to synthesizing a [`DefaultCodec`] for a registered type.

use super::{DefaultCodec, ObjectCodec};
use crate::handler::{KeyHandler, KeyHandlerCodec};
use crate::model::{CellCodec, Geometry, Point};
use crate::style::StylesheetCodec;
use crate::types::{Describe, Persist, Record, TypeDescriptor};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

type Factory = Arc<dyn Fn() -> Box<dyn Persist> + Send + Sync>;

#[derive(Clone)]
struct TypeEntry {
    descriptor: Arc<TypeDescriptor>,
    factory: Factory,
}

/// Thread-safe codec registry.
///
/// One process-wide instance is available through [`CodecRegistry::global`];
/// independent instances can be created for isolated use (tests, sandboxes).
pub struct CodecRegistry {
    codecs: RwLock<HashMap<String, Arc<dyn ObjectCodec>>>,
    aliases: RwLock<HashMap<String, String>>,
    types: RwLock<HashMap<String, TypeEntry>>,
}

/// Comparable view of a registry's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub codecs: BTreeSet<String>,
    pub aliases: BTreeMap<String, String>,
    pub types: BTreeSet<String>,
}

static GLOBAL: OnceLock<CodecRegistry> = OnceLock::new();

impl CodecRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            codecs: RwLock::new(HashMap::new()),
            aliases: RwLock::new(HashMap::new()),
            types: RwLock::new(HashMap::new()),
        }
    }

    /// Registry holding the built-in codecs and legacy aliases.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.install_defaults();
        registry
    }

    /// Process-wide registry, initialized with defaults on first use.
    pub fn global() -> &'static CodecRegistry {
        GLOBAL.get_or_init(Self::with_defaults)
    }

    fn install_defaults(&self) {
        // Natural type names (Cell, Geometry, ...) become aliases here.
        self.register(Arc::new(CellCodec::new()), "mxCell");
        self.register(
            Arc::new(DefaultCodec::for_type::<Geometry>().with_name("mxGeometry")),
            "mxGeometry",
        );
        self.register(
            Arc::new(DefaultCodec::for_type::<Point>().with_name("mxPoint")),
            "mxPoint",
        );
        self.register(Arc::new(StylesheetCodec::new()), "mxStylesheet");
        self.register(Arc::new(KeyHandlerCodec::new()), KeyHandler::TYPE_NAME);
        self.add_alias("mxDefaultKeyHandler", KeyHandler::TYPE_NAME);
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register `codec` under `name`, replacing any previous entry.
    ///
    /// When the codec's natural type name differs from `name`, the type name
    /// is added as an alias so encode lookups by type find this codec.
    pub fn register(&self, codec: Arc<dyn ObjectCodec>, name: &str) {
        let type_name = codec.type_name().to_string();
        self.codecs.write().insert(name.to_string(), codec);
        if type_name != name {
            self.add_alias(&type_name, name);
        }
        log::debug!("[registry] registered codec `{}` (type `{}`)", name, type_name);
    }

    /// Register a codec under its own name.
    pub fn register_codec(&self, codec: Arc<dyn ObjectCodec>) {
        let name = codec.name().to_string();
        self.register(codec, &name);
    }

    /// Route lookups of `alias` to `canonical`.
    pub fn add_alias(&self, alias: &str, canonical: &str) {
        self.aliases
            .write()
            .insert(alias.to_string(), canonical.to_string());
    }

    /// Register a [`Describe`] type so a default codec can be synthesized for it.
    pub fn register_type<T: Describe>(&self) {
        let entry = TypeEntry {
            descriptor: Arc::new(T::describe()),
            factory: Arc::new(|| Box::new(T::default()) as Box<dyn Persist>),
        };
        self.types.write().insert(T::TYPE_NAME.to_string(), entry);
    }

    /// Register a descriptor-only type whose instances are [`Record`]s.
    pub fn register_record(&self, descriptor: TypeDescriptor) {
        let name = descriptor.name.clone();
        let type_name = name.clone();
        let entry = TypeEntry {
            descriptor: Arc::new(descriptor),
            factory: Arc::new(move || Box::new(Record::new(type_name.clone())) as Box<dyn Persist>),
        };
        self.types.write().insert(name, entry);
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Canonical name for `name` after one alias hop.
    pub fn resolve_alias(&self, name: &str) -> String {
        self.aliases
            .read()
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Codec for a tag or type name.
    ///
    /// Resolves one alias hop, then the codec table, then synthesizes and
    /// caches a default codec for a registered type. `None` when nothing
    /// applies.
    pub fn get_codec(&self, name: &str) -> Option<Arc<dyn ObjectCodec>> {
        let canonical = self.resolve_alias(name);
        if let Some(codec) = self.codecs.read().get(&canonical) {
            return Some(Arc::clone(codec));
        }

        let entry = {
            let types = self.types.read();
            types.get(&canonical).or_else(|| types.get(name)).cloned()
        }?;

        let mut codecs = self.codecs.write();
        // Another thread may have synthesized it meanwhile.
        if let Some(codec) = codecs.get(&canonical) {
            return Some(Arc::clone(codec));
        }
        let codec: Arc<dyn ObjectCodec> = Arc::new(
            DefaultCodec::new((entry.factory)(), entry.descriptor).with_name(canonical.clone()),
        );
        codecs.insert(canonical.clone(), Arc::clone(&codec));
        log::debug!("[registry] synthesized default codec for `{}`", canonical);
        Some(codec)
    }

    /// Codec registered under exactly `name` (no alias, no synthesis).
    pub fn get_codec_by_name(&self, name: &str) -> Option<Arc<dyn ObjectCodec>> {
        self.codecs.read().get(name).cloned()
    }

    /// Registered codec names, sorted.
    pub fn codec_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.codecs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered codecs.
    pub fn len(&self) -> usize {
        self.codecs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.read().is_empty()
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            codecs: self.codecs.read().keys().cloned().collect(),
            aliases: self
                .aliases
                .read()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            types: self.types.read().keys().cloned().collect(),
        }
    }

    /// Restore the built-in contents, dropping everything registered since.
    pub fn reset(&self) {
        let fresh = Self::with_defaults();
        *self.codecs.write() = fresh.codecs.into_inner();
        *self.aliases.write() = fresh.aliases.into_inner();
        *self.types.write() = fresh.types.into_inner();
        log::debug!("[registry] reset to defaults");
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("CodecRegistry")
            .field("codecs", &snapshot.codecs)
            .field("aliases", &snapshot.aliases)
            .field("types", &snapshot.types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptorBuilder;

    #[test]
    fn defaults_and_aliases() {
        let registry = CodecRegistry::with_defaults();
        for tag in ["mxCell", "mxGeometry", "mxPoint", "mxStylesheet", "KeyHandler"] {
            assert!(registry.get_codec_by_name(tag).is_some(), "{}", tag);
        }
        let by_alias = registry.get_codec("Cell").unwrap();
        let by_name = registry.get_codec("mxCell").unwrap();
        assert!(Arc::ptr_eq(&by_alias, &by_name));
        assert_eq!(by_alias.name(), "mxCell");
        assert_eq!(
            registry.get_codec("mxDefaultKeyHandler").map(|c| c.name().to_string()),
            Some("KeyHandler".to_string())
        );
    }

    #[test]
    fn alias_lookup_does_not_add_slot() {
        let registry = CodecRegistry::with_defaults();
        let before = registry.len();
        let _ = registry.get_codec("Geometry");
        let _ = registry.get_codec("Point");
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn synthesized_codec_is_cached() {
        let registry = CodecRegistry::new();
        registry.register_record(TypeDescriptorBuilder::new("Note").text_field("label").build());
        assert!(registry.get_codec_by_name("Note").is_none());

        let first = registry.get_codec("Note").unwrap();
        let second = registry.get_codec("Note").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_name_has_no_codec() {
        let registry = CodecRegistry::with_defaults();
        assert!(registry.get_codec("Nope").is_none());
    }

    #[test]
    fn reset_is_idempotent() {
        let registry = CodecRegistry::with_defaults();
        let pristine = registry.snapshot();

        registry.register_record(TypeDescriptorBuilder::new("Extra").build());
        registry.add_alias("Legacy", "Extra");
        let _ = registry.get_codec("Extra");
        assert_ne!(registry.snapshot(), pristine);

        registry.reset();
        assert_eq!(registry.snapshot(), pristine);
        registry.reset();
        assert_eq!(registry.snapshot(), pristine);
    }
}
