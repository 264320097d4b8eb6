// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::float_cmp)] // Test assertions with constants
#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic

//! Model import integration tests
//!
//! Validates document decoding through the public serializer API: reference
//! resolution, cycles, legacy names, tolerance and failure atomicity.

use graphxml::{
    CodecConfig, CodecError, CodecRegistry, GraphModel, MissingCodecPolicy, ModelError,
    ModelXmlSerializer,
};

fn import(text: &str) -> Result<GraphModel, CodecError> {
    let registry = CodecRegistry::with_defaults();
    let serializer = ModelXmlSerializer::with_registry(&registry, CodecConfig::default());
    let mut model = GraphModel::new();
    serializer.import(text, &mut model)?;
    Ok(model)
}

fn child_ids(model: &GraphModel, id: &str) -> Vec<String> {
    model.children(id).iter().map(|c| c.id.clone()).collect()
}

#[test]
fn test_import_basic_document() {
    let model = import(
        r#"<mxGraphModel><root><mxCell id="0"/><mxCell id="1" parent="0"/><mxCell id="2" vertex="1" parent="1"><mxGeometry x="380" y="20" width="140" height="30"/></mxCell></root></mxGraphModel>"#,
    )
    .expect("import");

    assert_eq!(model.len(), 3);
    assert_eq!(model.root().map(|c| c.id.as_str()), Some("0"));

    let cell = model.get_cell("2").expect("cell 2");
    assert!(cell.vertex);
    assert!(!cell.edge);
    assert_eq!(cell.parent.as_deref(), Some("1"));
    let geometry = cell.geometry.as_ref().expect("geometry");
    assert_eq!(
        (geometry.x, geometry.y, geometry.width, geometry.height),
        (380.0, 20.0, 140.0, 30.0)
    );

    assert_eq!(model.get_cell("1").and_then(|c| c.parent.as_deref()), Some("0"));
    assert_eq!(child_ids(&model, "1"), vec!["2"]);
}

#[test]
fn test_forward_references_resolve() {
    let model = import(
        r#"<root>
             <mxCell id="3" edge="1" parent="1" source="2" target="4"/>
             <mxCell id="0"/>
             <mxCell id="1" parent="0"/>
             <mxCell id="2" vertex="1" parent="1"/>
             <mxCell id="4" vertex="1" parent="1"/>
           </root>"#,
    )
    .expect("import");

    assert_eq!(child_ids(&model, "1"), vec!["3", "2", "4"]);
    let edge = model.get_cell("3").expect("edge");
    assert_eq!(edge.source.as_deref(), Some("2"));
    assert_eq!(edge.target.as_deref(), Some("4"));
    let edges: Vec<&str> = model.edges_of("4").iter().map(|c| c.id.as_str()).collect();
    assert_eq!(edges, vec!["3"]);
}

#[test]
fn test_cycle_back_reference() {
    // A names B as parent before B exists; B then lists A as a nested child.
    let model = import(
        r#"<mxGraphModel><root>
             <mxCell id="0"/>
             <mxCell id="1" parent="0"/>
             <mxCell id="A" vertex="1" parent="B"/>
             <mxCell id="B" vertex="1" parent="1"><mxCell id="A"/></mxCell>
           </root></mxGraphModel>"#,
    )
    .expect("import");

    assert_eq!(model.len(), 4);
    assert_eq!(model.get_cell("A").and_then(|c| c.parent.as_deref()), Some("B"));
    assert_eq!(child_ids(&model, "B"), vec!["A"]);

    let via_parent = model.children("B")[0];
    let via_id = model.get_cell("A").expect("A");
    assert!(std::ptr::eq(via_parent, via_id));
}

#[test]
fn test_nested_cells_become_children() {
    let model = import(
        r#"<root>
             <mxCell id="0"/>
             <mxCell id="1" parent="0">
               <mxCell id="group" vertex="1">
                 <mxCell id="inner" vertex="1" parent="0"/>
               </mxCell>
             </mxCell>
           </root>"#,
    )
    .expect("import");

    assert_eq!(child_ids(&model, "1"), vec!["group"]);
    assert_eq!(child_ids(&model, "group"), vec!["inner"]);
    assert_eq!(model.get_cell("inner").and_then(|c| c.parent.as_deref()), Some("group"));
}

#[test]
fn test_unresolved_reference_reported() {
    let err = import(
        r#"<root><mxCell id="0"/><mxCell id="1" parent="0"/><mxCell id="2" edge="1" parent="1" source="missing"/></root>"#,
    )
    .unwrap_err();

    match err {
        CodecError::UnresolvedReference { id, field } => {
            assert_eq!(id, "missing");
            assert_eq!(field, "source");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_malformed_documents() {
    for text in [
        "<mxGraphModel><root>",
        "not xml at all",
        "<mxGraphModel><cells/></mxGraphModel>",
        "<graph><root/></graph>",
    ] {
        assert!(
            matches!(import(text), Err(CodecError::MalformedDocument(_))),
            "{}",
            text
        );
    }
}

#[test]
fn test_root_rules() {
    let two_roots = import(r#"<root><mxCell id="a"/><mxCell id="b"/></root>"#);
    assert!(matches!(two_roots, Err(CodecError::MalformedDocument(_))));

    let no_root = import(r#"<root><mxCell id="a" parent="b"/><mxCell id="b" parent="a"/></root>"#);
    assert!(matches!(no_root, Err(CodecError::Model(ModelError::NoRoot))));

    let detached = import(
        r#"<root><mxCell id="0"/><mxCell id="a" parent="b"/><mxCell id="b" parent="a"/></root>"#,
    );
    assert!(matches!(detached, Err(CodecError::MalformedDocument(_))));

    let empty = import("<mxGraphModel><root/></mxGraphModel>").expect("empty import");
    assert!(empty.is_empty());
}

#[test]
fn test_document_too_deep() {
    let depth = 200;
    let mut text = String::from("<mxGraphModel><root><mxCell id=\"0\"/>");
    for _ in 0..depth {
        text.push_str("<mxCell>");
    }
    for _ in 0..depth {
        text.push_str("</mxCell>");
    }
    text.push_str("</root></mxGraphModel>");

    assert!(matches!(
        import(&text),
        Err(CodecError::DocumentTooDeep { limit: 128 })
    ));

    let registry = CodecRegistry::with_defaults();
    let shallow = ModelXmlSerializer::with_registry(&registry, CodecConfig::default().with_max_depth(4));
    let mut model = GraphModel::new();
    let result = shallow.import(
        r#"<root><mxCell id="0"><mxCell id="1"><mxCell id="2"><mxCell id="3"/></mxCell></mxCell></mxCell></root>"#,
        &mut model,
    );
    assert!(matches!(result, Err(CodecError::DocumentTooDeep { limit: 4 })));
}

#[test]
fn test_failed_import_leaves_model_untouched() {
    let registry = CodecRegistry::with_defaults();
    let serializer = ModelXmlSerializer::with_registry(&registry, CodecConfig::default());

    let mut model = GraphModel::with_default_layers();
    model
        .insert_vertex("1", "keep me", graphxml::Geometry::new(1.0, 2.0, 3.0, 4.0), None)
        .expect("vertex");
    let before = model.clone();

    let result = serializer.import(
        r#"<root><mxCell id="0"/><mxCell id="1" parent="0"/><mxCell id="9" parent="1" target="nowhere"/></root>"#,
        &mut model,
    );
    assert!(result.is_err());
    assert_eq!(model, before);

    assert!(serializer.import("<root><oops", &mut model).is_err());
    assert_eq!(model, before);
}

#[test]
fn test_malformed_attribute_falls_back() {
    let model = import(
        r#"<root><mxCell id="0"/><mxCell id="1" parent="0"/><mxCell id="2" vertex="1" parent="1"><mxGeometry x="abc" y="20" width="140" height="30" as="geometry"/></mxCell></root>"#,
    )
    .expect("import");

    let geometry = model
        .get_cell("2")
        .and_then(|c| c.geometry.as_ref())
        .expect("geometry");
    assert_eq!(geometry.x, 0.0);
    assert_eq!(geometry.y, 20.0);
    assert_eq!(geometry.width, 140.0);
    assert_eq!(geometry.height, 30.0);
}

#[test]
fn test_legacy_names() {
    let model = import(
        r#"<root>
             <Cell id="0"/>
             <Cell id="1" parent="0"/>
             <Cell id="2" isVertex="1" parent="1"><Geometry x="1" y="2" w="3" h="4"/></Cell>
             <mxCell id="3" isEdge="true" parent="1" source="2" target="2"/>
           </root>"#,
    )
    .expect("import");

    let vertex = model.get_cell("2").expect("vertex");
    assert!(vertex.vertex);
    let geometry = vertex.geometry.as_ref().expect("geometry");
    assert_eq!((geometry.width, geometry.height), (3.0, 4.0));
    assert!(model.get_cell("3").map(|c| c.edge).unwrap_or(false));
}

#[test]
fn test_edge_geometry_points() {
    let model = import(
        r#"<root>
             <mxCell id="0"/>
             <mxCell id="1" parent="0"/>
             <mxCell id="a" vertex="1" parent="1"/>
             <mxCell id="b" vertex="1" parent="1"/>
             <mxCell id="e" edge="1" parent="1" source="a" target="b">
               <mxGeometry relative="1" as="geometry">
                 <mxPoint x="10" y="20" as="sourcePoint"/>
                 <Array as="points">
                   <mxPoint x="1" y="2"/>
                   <mxPoint x="3" y="4"/>
                 </Array>
               </mxGeometry>
             </mxCell>
           </root>"#,
    )
    .expect("import");

    let geometry = model
        .get_cell("e")
        .and_then(|c| c.geometry.as_ref())
        .expect("geometry");
    assert!(geometry.relative);
    assert_eq!(geometry.source_point.map(|p| (p.x, p.y)), Some((10.0, 20.0)));
    let points: Vec<(f64, f64)> = geometry.points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(points, vec![(1.0, 2.0), (3.0, 4.0)]);
}

#[test]
fn test_unknown_content_ignored() {
    let model = import(
        r#"<root>
             <mxCell id="0" futureFlag="yes"/>
             <Widget id="w" parent="0"/>
             <mxCell id="1" parent="0"><Gadget/><mxGeometry as="unknownField" x="1"/></mxCell>
           </root>"#,
    )
    .expect("import");
    assert_eq!(model.len(), 2);
    assert!(model.get_cell("w").is_none());
    assert!(model.get_cell("1").and_then(|c| c.geometry.as_ref()).is_none());
}

#[test]
fn test_missing_codec_policy_error() {
    let registry = CodecRegistry::with_defaults();
    let config = CodecConfig::default().with_missing_codec(MissingCodecPolicy::Error);
    let serializer = ModelXmlSerializer::with_registry(&registry, config);
    let mut model = GraphModel::new();

    let result = serializer.import(r#"<root><mxCell id="0"/><Widget/></root>"#, &mut model);
    assert!(matches!(result, Err(CodecError::MissingCodec(name)) if name == "Widget"));
    assert!(model.is_empty());
}

#[test]
fn test_anonymous_cells_get_ids() {
    let model = import(r#"<root><mxCell id="0"/><mxCell parent="0" value="a"/><mxCell parent="0" value="b"/></root>"#)
        .expect("import");
    let values: Vec<Option<&str>> = model.children("0").iter().map(|c| c.value.as_deref()).collect();
    assert_eq!(values, vec![Some("a"), Some("b")]);
    let ids = child_ids(&model, "0");
    assert_ne!(ids[0], ids[1]);
}

#[test]
fn test_geometry_linked_by_id() {
    let model = import(
        r#"<root>
             <mxCell id="0"/>
             <mxCell id="1" parent="0"/>
             <mxCell id="2" vertex="1" parent="1" geometry="g"/>
             <mxGeometry id="g" x="5" y="6" width="70" height="80"/>
           </root>"#,
    )
    .expect("import");

    let geometry = model
        .get_cell("2")
        .and_then(|c| c.geometry.as_ref())
        .expect("linked geometry");
    assert_eq!(
        (geometry.x, geometry.y, geometry.width, geometry.height),
        (5.0, 6.0, 70.0, 80.0)
    );

    let result = import(r#"<root><mxCell id="0"/><mxCell id="1" parent="0" geometry="ghost"/></root>"#);
    assert!(matches!(
        result,
        Err(CodecError::UnresolvedReference { id, field }) if id == "ghost" && field == "geometry"
    ));
}
