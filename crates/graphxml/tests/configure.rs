// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Configure-in-place integration tests
//!
//! Validates decoding onto existing objects and the one-way key handler codec.

use graphxml::{
    Cell, CodecConfig, CodecError, CodecRegistry, Geometry, KeyBinding, KeyHandler,
    ModelXmlSerializer,
};

fn serializer(registry: &CodecRegistry) -> ModelXmlSerializer<'_> {
    ModelXmlSerializer::with_registry(registry, CodecConfig::default())
}

#[test]
fn test_key_handler_binds_onto_existing_instance() {
    let registry = CodecRegistry::with_defaults();
    let serializer = serializer(&registry);

    let mut handler = KeyHandler::new();
    handler.bind_action(KeyBinding::new(46), "delete");
    handler.enabled = false;

    serializer
        .configure(
            r#"<KeyHandler><add as="88" control="true" action="cut"/></KeyHandler>"#,
            &mut handler,
        )
        .expect("configure");

    assert!(!handler.enabled);
    assert_eq!(handler.len(), 2);
    handler.enabled = true;
    assert_eq!(handler.action_for(&KeyBinding::new(88).with_control()), Some("cut"));
    assert_eq!(handler.action_for(&KeyBinding::new(88)), None);
    assert_eq!(handler.action_for(&KeyBinding::new(46)), Some("delete"));
}

#[test]
fn test_key_handler_encode_unsupported() {
    let registry = CodecRegistry::with_defaults();
    let serializer = serializer(&registry);

    let mut handler = KeyHandler::new();
    handler.bind_action(KeyBinding::new(88).with_control(), "cut");

    match serializer.encode_object(&handler) {
        Err(CodecError::UnsupportedEncode(codec)) => assert_eq!(codec, "KeyHandler"),
        other => panic!("expected UnsupportedEncode, got {:?}", other),
    }
}

#[test]
fn test_legacy_key_handler_tag() {
    let registry = CodecRegistry::with_defaults();
    let serializer = serializer(&registry);

    let mut handler = KeyHandler::new();
    serializer
        .configure(
            r#"<mxDefaultKeyHandler>
                 <add as="90" control="1" action="undo"/>
                 <add as="90" control="1" shift="1" action="redo"/>
               </mxDefaultKeyHandler>"#,
            &mut handler,
        )
        .expect("configure");

    assert_eq!(handler.action_for(&KeyBinding::new(90).with_control()), Some("undo"));
    assert_eq!(
        handler.action_for(&KeyBinding::new(90).with_control().with_shift()),
        Some("redo")
    );
}

#[test]
fn test_configure_rejects_wrong_target() {
    let registry = CodecRegistry::with_defaults();
    let serializer = serializer(&registry);

    let mut cell = Cell::new("1");
    let result = serializer.configure(
        r#"<KeyHandler><add as="88" action="cut"/></KeyHandler>"#,
        &mut cell,
    );
    assert!(matches!(result, Err(CodecError::TargetMismatch { .. })));
}

#[test]
fn test_configure_existing_cell() {
    let registry = CodecRegistry::with_defaults();
    let serializer = serializer(&registry);

    let mut cell = Cell::new_vertex("5", Geometry::new(1.0, 2.0, 3.0, 4.0));
    serializer
        .configure(r#"<mxCell value="hello" style="rounded=1"/>"#, &mut cell)
        .expect("configure");

    assert_eq!(cell.id, "5");
    assert!(cell.vertex);
    assert_eq!(cell.value.as_deref(), Some("hello"));
    assert_eq!(cell.style.as_deref(), Some("rounded=1"));
    assert_eq!(cell.geometry, Some(Geometry::new(1.0, 2.0, 3.0, 4.0)));
}

#[test]
fn test_configure_reports_unresolved_reference() {
    let registry = CodecRegistry::with_defaults();
    let serializer = serializer(&registry);

    let mut cell = Cell::new("5");
    let result = serializer.configure(r#"<mxCell parent="ghost"/>"#, &mut cell);
    assert!(matches!(
        result,
        Err(CodecError::UnresolvedReference { id, .. }) if id == "ghost"
    ));
}
