use debrief::{Path, PathSegment};
use serde_json::json;

#[test]
fn test_building_and_display() {
    let path = Path::root()
        .push_key("body")
        .push_key("data")
        .push_index(42)
        .push_key("items")
        .push_index(0)
        .push_key("name");

    assert_eq!(path.to_string(), "body.data[42].items[0].name");
    assert_eq!(path.len(), 6);
}

#[test]
fn test_from_segments_round_trips() {
    let path = Path::from_segments([
        PathSegment::key("users"),
        PathSegment::index(3),
        PathSegment::key("email"),
    ]);

    let rebuilt = Path::from_segments(path.segments().cloned());
    assert_eq!(path, rebuilt);
}

#[test]
fn test_intersect_is_commutative() {
    let a = Path::from_key("user").push_key("address").push_key("city");
    let b = Path::from_key("user").push_key("name");

    assert_eq!(a.intersect(&b), b.intersect(&a));
    assert_eq!(a.intersect(&b), Path::from_key("user"));
}

#[test]
fn test_intersect_with_itself_is_identity() {
    let path = Path::from_key("user").push_index(0);
    assert_eq!(path.intersect(&path), path);
}

#[test]
fn test_strip_prefix_after_intersect_gives_relative_path() {
    let root = Path::from_key("user");
    let full = root.push_key("address").push_key("zip");

    assert!(full.starts_with(&root));
    assert_eq!(full.strip_prefix(root.len()).to_string(), "address.zip");
}

#[test]
fn test_to_nested_builds_singly_keyed_mappings() {
    let path = Path::from_key("user").push_key("roles").push_index(0);

    assert_eq!(
        path.to_nested(json!(["is missing"])),
        json!({"user": {"roles": {"0": ["is missing"]}}})
    );
}

#[test]
fn test_nested_value_can_be_any_shape() {
    let path = Path::from_key("id");

    assert_eq!(
        path.to_nested(json!({"or": [["a"], ["b"]]})),
        json!({"id": {"or": [["a"], ["b"]]}})
    );
}
