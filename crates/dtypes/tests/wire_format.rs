// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Wire format: exact JSON shapes per kind and decode of hand-written documents.

use std::collections::BTreeMap;

use dtypes::{
    from_json, type_of, ConstType, DictType, DtypeError, KeyPolicy, ListType, ObjectType, Type,
    TypeRegistry, UnionType, Value,
};
use serde_json::json;

#[test]
fn every_builtin_kind_round_trips() {
    let nested_dict = Type::Dict(DictType::new(
        BTreeMap::from([
            ("a".to_string(), Type::Number),
            (
                "b".to_string(),
                Type::List(ListType::new(Type::optional(Type::Text))),
            ),
        ]),
        KeyPolicy::Unrestricted,
    ));

    let samples = vec![
        Type::Never,
        Type::Any,
        Type::Unknown,
        Type::None,
        Type::Text,
        Type::Number,
        Type::Boolean,
        Type::List(ListType::default()),
        Type::Union(UnionType::new([Type::Unknown, Type::Unknown, Type::Text])),
        Type::Union(UnionType::new(Vec::new())),
        Type::Dict(DictType::default()),
        nested_dict,
        Type::Const(ConstType::new(&Value::from("train")).unwrap()),
        Type::Const(ConstType::new(&Value::from(-3)).unwrap()),
        Type::Const(ConstType::new(&Value::from(0.125)).unwrap()),
        Type::Const(
            ConstType::new(&Value::Set(vec![Value::from(true), Value::from("x")])).unwrap(),
        ),
        Type::Object(ObjectType::new("Image").unwrap()),
    ];

    for t in samples {
        let wire = t.to_json(None);
        let back = from_json(&wire, None).unwrap_or_else(|e| panic!("{wire}: {e}"));
        assert_eq!(back, t, "round trip of {wire}");
        assert_eq!(back.canonical(), t.canonical());
    }
}

#[test]
fn list_wire_shape() {
    assert_eq!(
        Type::List(ListType::new(Type::Number)).to_json(None),
        json!({"wb_type": "list", "params": {"element_type": {"wb_type": "number"}}})
    );
}

#[test]
fn object_wire_shape() {
    assert_eq!(
        Type::Object(ObjectType::new("Audio").unwrap()).to_json(None),
        json!({"wb_type": "object", "params": {"class_name": "Audio"}})
    );
}

#[test]
fn decode_sorts_union_members() {
    let wire = json!({"wb_type": "union", "params": {"allowed_types": [
        {"wb_type": "text"}, {"wb_type": "none"}
    ]}});
    let t = from_json(&wire, None).unwrap();
    assert_eq!(t, Type::optional(Type::Text));
    assert_eq!(
        t.to_json(None)["params"]["allowed_types"][0],
        json!({"wb_type": "none"})
    );
}

#[test]
fn decode_flattens_nested_unions() {
    let wire = json!({"wb_type": "union", "params": {"allowed_types": [
        {"wb_type": "number"},
        {"wb_type": "union", "params": {"allowed_types": [{"wb_type": "text"}]}}
    ]}});
    match from_json(&wire, None).unwrap() {
        Type::Union(u) => assert_eq!(u.allowed_types(), &[Type::Number, Type::Text]),
        other => panic!("expected union, got {other}"),
    }
}

#[test]
fn leaf_params_are_optional_on_decode() {
    let t = from_json(&json!({"wb_type": "text", "params": {}}), None).unwrap();
    assert_eq!(t, Type::Text);
    let t = from_json(&json!({"wb_type": "none", "params": null}), None).unwrap();
    assert_eq!(t, Type::None);
}

#[test]
fn nested_unknown_discriminant_fails_the_whole_decode() {
    let wire = json!({"wb_type": "dictionary", "params": {
        "type_map": {"img": {"wb_type": "image-file"}},
        "policy": "E"
    }});
    let err = from_json(&wire, None).unwrap_err();
    assert!(matches!(err, DtypeError::UnknownDiscriminant(name) if name == "image-file"));
}

#[test]
fn decode_from_text() {
    let t = TypeRegistry::global()
        .from_json_str(
            r#"{"wb_type":"list","params":{"element_type":{"wb_type":"boolean"}}}"#,
            None,
        )
        .unwrap();
    assert_eq!(t, Type::List(ListType::new(Type::Boolean)));
}

#[test]
fn display_is_canonical_json() {
    let t = Type::Dict(DictType::new(
        BTreeMap::from([("k".to_string(), Type::Text)]),
        KeyPolicy::Exact,
    ));
    assert_eq!(
        t.to_string(),
        r#"{"params":{"policy":"E","type_map":{"k":{"wb_type":"text"}}},"wb_type":"dictionary"}"#
    );
}

#[test]
fn dict_with_a_wb_type_key_round_trips() {
    let t = type_of(&Value::from(json!({"wb_type": "x", "n": 1})));
    assert_eq!(
        t,
        Type::Dict(DictType::new(
            BTreeMap::from([
                ("n".to_string(), Type::Number),
                ("wb_type".to_string(), Type::Text),
            ]),
            KeyPolicy::Exact,
        ))
    );

    let back = from_json(&t.to_json(None), None).unwrap();
    assert_eq!(back, t);

    // nested under another dict and inside a list
    let nested = type_of(&Value::from(json!({
        "rows": [{"wb_type": "a"}],
        "meta": {"wb_type": 2}
    })));
    assert!(!nested.is_never());
    assert_eq!(from_json(&nested.to_json(None), None).unwrap(), nested);
}
