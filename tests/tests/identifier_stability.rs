//! Identifier stability across immediate moves and reorders.

use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;

fn add(at: &str) -> AddNodeOperation {
    AddNodeOperation::new(path(at), NodeSnapshot::new("nt:unstructured"))
}

#[test]
fn test_identifier_survives_moves_and_reorders() {
    // GIVEN a node with a known identifier among siblings
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    let id = Identifier::generate();
    t.store_nodes(&[
        add("/left"),
        add("/right"),
        AddNodeOperation::new(path("/left/n"), NodeSnapshot::new("nt:unstructured").with_identifier(id)),
        add("/left/sibling"),
        add("/left/n/child"),
    ])
    .unwrap();
    let child = fixture.identifier("default", "/left/n/child").unwrap();

    // WHEN it is reordered and moved back and forth
    t.reorder_children(&path("/left"), &ChildOrder::Commands(vec![OrderBefore::to_end("n")]))
        .unwrap();
    t.move_node_immediately(&path("/left/n"), &path("/right")).unwrap();
    t.move_node_immediately(&path("/right/n"), &path("/left")).unwrap();
    t.reorder_children(
        &path("/left"),
        &ChildOrder::Sequence(vec!["n".to_string(), "sibling".to_string()]),
    )
    .unwrap();
    t.move_node_immediately(&path("/left/n"), &path("/right")).unwrap();

    // THEN identity is unchanged for the node and its subtree
    assert_eq!(fixture.identifier("default", "/right/n"), Some(id));
    assert_eq!(fixture.identifier("default", "/right/n/child"), Some(child));
    assert!(!fixture.exists("default", "/left/n"));
}

#[test]
fn test_batched_rename_keeps_identifier() {
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.store_nodes(&[add("/a"), add("/b"), add("/c")]).unwrap();
    let id = fixture.identifier("default", "/b").unwrap();

    t.prepare_save().unwrap();
    t.move_nodes(&[MoveSpec::new(path("/b"), path("/renamed"))]).unwrap();
    t.finish_save().unwrap();

    assert_eq!(fixture.identifier("default", "/renamed"), Some(id));
    // A rename stays in place
    assert_eq!(fixture.child_names("default", "/"), vec!["a", "renamed", "c"]);
}

#[test]
fn test_proposed_identifier_adopted_from_uuid_property() {
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    let id = Identifier::generate();

    t.store_nodes(&[AddNodeOperation::new(
        path("/r"),
        NodeSnapshot::new("nt:unstructured")
            .with_mixin("mix:referenceable")
            .with_property("jcr:uuid", id.to_string()),
    )])
    .unwrap();

    assert_eq!(fixture.identifier("default", "/r"), Some(id));
}

#[test]
fn test_identifier_in_use_is_item_exists() {
    let id = Identifier::generate();
    Scenario::new("identifier_collision")
        .step("first", move |t| {
            t.store_nodes(&[AddNodeOperation::new(
                path("/a"),
                NodeSnapshot::new("nt:unstructured").with_identifier(id),
            )])
        })
        .expect("second", Expect::ItemExists, move |t| {
            t.store_nodes(&[AddNodeOperation::new(
                path("/b"),
                NodeSnapshot::new("nt:unstructured").with_identifier(id),
            )])
        })
        .run()
        .unwrap();
}
