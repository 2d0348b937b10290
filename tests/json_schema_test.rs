use debrief::{CompileError, Node, SchemaCompiler};
use serde_json::json;

/// `required(:email).filled(:string)` plus `required(:age).filled(:integer, gt?: 18)`.
fn email_and_age() -> Node {
    Node::set([
        Node::and(
            Node::predicate("key?", [("name", json!("email"))]),
            Node::key(
                "email",
                Node::and(Node::nullary("str?"), Node::nullary("filled?")),
            ),
        ),
        Node::and(
            Node::predicate("key?", [("name", json!("age"))]),
            Node::key(
                "age",
                Node::and(
                    Node::nullary("int?"),
                    Node::and(
                        Node::nullary("filled?"),
                        Node::predicate("gt?", [("num", json!(18))]),
                    ),
                ),
            ),
        ),
    ])
}

#[test]
fn test_filled_string_and_bounded_integer_document() {
    let schema = SchemaCompiler::json_schema().compile(&email_and_age()).unwrap();

    assert_eq!(
        schema,
        json!({
            "$schema": "http://json-schema.org/draft-06/schema#",
            "type": "object",
            "properties": {
                "email": {"type": "string", "minLength": 1},
                "age": {"type": "integer", "exclusiveMinimum": 18}
            },
            "required": ["email", "age"]
        })
    );
}

#[test]
fn test_required_preserves_declaration_order() {
    let schema = SchemaCompiler::json_schema().compile(&email_and_age()).unwrap();
    assert_eq!(schema["required"], json!(["email", "age"]));
}

#[test]
fn test_type_predicates_map_to_fragments() {
    let tree = Node::set([
        Node::key("flag", Node::nullary("bool?")),
        Node::key("score", Node::nullary("float?")),
        Node::key("born_on", Node::nullary("date?")),
        Node::key("meta", Node::nullary("hash?")),
    ]);

    let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();
    let properties = &schema["properties"];

    assert_eq!(properties["flag"], json!({"type": "boolean"}));
    assert_eq!(properties["score"], json!({"type": "number"}));
    assert_eq!(
        properties["born_on"],
        json!({"type": "string", "format": "date"})
    );
    assert_eq!(properties["meta"], json!({"type": "object"}));
}

#[test]
fn test_projected_fragments_use_the_declared_argument() {
    let tree = Node::set([
        Node::key(
            "nickname",
            Node::and(
                Node::nullary("str?"),
                Node::and(
                    Node::predicate("min_size?", [("num", json!(3))]),
                    Node::predicate("max_size?", [("num", json!(20))]),
                ),
            ),
        ),
        Node::key(
            "state",
            Node::predicate("included_in?", [("list", json!(["draft", "published"]))]),
        ),
    ]);

    let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();

    assert_eq!(
        schema["properties"]["nickname"],
        json!({"type": "string", "minLength": 3, "maxLength": 20})
    );
    assert_eq!(
        schema["properties"]["state"],
        json!({"enum": ["draft", "published"]})
    );
}

#[test]
fn test_alternatives_group_under_any_of() {
    let tree = Node::key(
        "id",
        Node::or(Node::nullary("str?"), Node::nullary("int?")),
    );

    let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();
    assert_eq!(
        schema["properties"]["id"],
        json!({"anyOf": [{"type": "string"}, {"type": "integer"}]})
    );
}

#[test]
fn test_nested_any_of_branches_splice_flat() {
    let tree = Node::key(
        "id",
        Node::or(
            Node::or(Node::nullary("str?"), Node::nullary("int?")),
            Node::nullary("bool?"),
        ),
    );

    let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();
    assert_eq!(
        schema["properties"]["id"]["anyOf"],
        json!([{"type": "string"}, {"type": "integer"}, {"type": "boolean"}])
    );
}

#[test]
fn test_nested_keys_build_nested_properties() {
    let tree = Node::and(
        Node::predicate("key?", [("name", json!("profile"))]),
        Node::key(
            "profile",
            Node::and(
                Node::nullary("hash?"),
                Node::and(
                    Node::predicate("key?", [("name", json!("city"))]),
                    Node::key("city", Node::nullary("str?")),
                ),
            ),
        ),
    );

    let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();
    assert_eq!(
        schema["properties"]["profile"],
        json!({
            "type": "object",
            "properties": {"city": {"type": "string"}},
            "required": ["city"]
        })
    );
    assert_eq!(schema["required"], json!(["profile"]));
}

#[test]
fn test_each_compiles_the_member_rule_into_items() {
    let tree = Node::key(
        "tags",
        Node::and(
            Node::nullary("array?"),
            Node::each([Node::and(
                Node::nullary("str?"),
                Node::nullary("filled?"),
            )]),
        ),
    );

    let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();
    assert_eq!(
        schema["properties"]["tags"],
        json!({
            "type": "array",
            "items": {"type": "string", "minLength": 1}
        })
    );
}

#[test]
fn test_implication_keeps_optional_keys_out_of_required() {
    let tree = Node::set([
        Node::and(
            Node::predicate("key?", [("name", json!("email"))]),
            Node::key("email", Node::nullary("str?")),
        ),
        Node::implication(
            Node::predicate("key?", [("name", json!("bio"))]),
            Node::key("bio", Node::nullary("str?")),
        ),
    ]);

    let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();
    assert_eq!(schema["properties"]["bio"], json!({"type": "string"}));
    assert_eq!(schema["required"], json!(["email"]));
}

#[test]
fn test_filled_array_is_refused_in_strict_mode() {
    let tree = Node::key(
        "tags",
        Node::and(Node::nullary("array?"), Node::nullary("filled?")),
    );

    let err = SchemaCompiler::json_schema().compile(&tree).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnsupportedSchemaConversion {
            predicate: "filled?".to_string(),
            type_hint: Some("array".to_string()),
            format: "JSON Schema",
            permissive_hint: "SchemaCompiler::json_schema().permissive()",
        }
    );
}

#[test]
fn test_filled_array_approximates_in_permissive_mode() {
    let tree = Node::key(
        "tags",
        Node::and(Node::nullary("array?"), Node::nullary("filled?")),
    );

    let schema = SchemaCompiler::json_schema()
        .permissive()
        .compile(&tree)
        .unwrap();
    assert_eq!(
        schema["properties"]["tags"],
        json!({"type": "array", "not": {"type": "null"}})
    );
}

#[test]
fn test_unknown_predicate_is_refused_in_strict_mode() {
    let tree = Node::key(
        "name",
        Node::and(
            Node::nullary("str?"),
            Node::predicate("size?", [("num", json!(10))]),
        ),
    );

    let err = SchemaCompiler::json_schema().compile(&tree).unwrap_err();
    match err {
        CompileError::UnsupportedSchemaConversion {
            predicate,
            type_hint,
            ..
        } => {
            assert_eq!(predicate, "size?");
            assert_eq!(type_hint.as_deref(), Some("string"));
        }
        other => panic!("expected unsupported conversion, got {:?}", other),
    }
}

#[test]
fn test_unknown_predicate_is_skipped_in_permissive_mode() {
    let tree = Node::key(
        "name",
        Node::and(
            Node::nullary("str?"),
            Node::predicate("size?", [("num", json!(10))]),
        ),
    );

    let schema = SchemaCompiler::json_schema()
        .permissive()
        .compile(&tree)
        .unwrap();
    assert_eq!(schema["properties"]["name"], json!({"type": "string"}));
}

#[test]
fn test_negation_wraps_the_child_fragment() {
    let tree = Node::key("state", Node::not(Node::nullary("nil?")));

    let schema = SchemaCompiler::json_schema().compile(&tree).unwrap();
    assert_eq!(
        schema["properties"]["state"],
        json!({"not": {"type": "null"}})
    );
}

#[test]
fn test_schema_compilation_is_idempotent() {
    let compiler = SchemaCompiler::json_schema();
    let tree = email_and_age();

    assert_eq!(
        compiler.compile(&tree).unwrap(),
        compiler.compile(&tree).unwrap()
    );
}
