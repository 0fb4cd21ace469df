//! Immediate deletes and moves.

use arbor_tests::prelude::*;

fn add(at: &str) -> AddNodeOperation {
    AddNodeOperation::new(path(at), NodeSnapshot::new("nt:unstructured"))
}

#[test]
fn test_delete_property_immediately_missing_is_path_not_found() {
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();

    let err = t.delete_property_immediately(&path("/missing/prop")).unwrap_err();

    assert!(err.is_path_not_found());
}

#[test]
fn test_immediate_deletes_are_idempotent_for_callers() {
    // GIVEN a node with a property
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.store_nodes(&[AddNodeOperation::new(
        path("/a"),
        NodeSnapshot::new("nt:unstructured").with_property("p", "v"),
    )])
    .unwrap();

    // WHEN each delete runs twice, tolerating PathNotFound
    for _ in 0..2 {
        match t.delete_property_immediately(&path("/a/p")) {
            Ok(()) => {}
            Err(e) if e.is_path_not_found() => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    for _ in 0..2 {
        match t.delete_node_immediately(&path("/a")) {
            Ok(()) => {}
            Err(e) if e.is_path_not_found() => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    // THEN
    assert!(!fixture.exists("default", "/a"));
}

#[test]
fn test_immediate_delete_inside_cycle_is_not_rolled_back() {
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.store_nodes(&[add("/a"), add("/b")]).unwrap();

    t.prepare_save().unwrap();
    t.delete_node_immediately(&path("/a")).unwrap();
    t.store_nodes(&[add("/c")]).unwrap();
    t.rollback_save().unwrap();

    assert!(!fixture.exists("default", "/a"));
    assert!(fixture.exists("default", "/b"));
    assert!(!fixture.exists("default", "/c"));
}

#[test]
fn test_move_immediately_destination_is_parent() {
    Scenario::new("move_immediately")
        .step("seed", |t| t.store_nodes(&[add("/a"), add("/dir")]))
        .step("move", |t| t.move_node_immediately(&path("/a"), &path("/dir")))
        .check("kept_name", |f| {
            if f.exists("default", "/dir/a") {
                Ok(())
            } else {
                Err("expected /dir/a".to_string())
            }
        })
        .expect("missing_parent", Expect::PathNotFound, |t| {
            t.move_node_immediately(&path("/dir/a"), &path("/nope"))
        })
        .expect("into_itself", Expect::RepositoryError, |t| {
            t.move_node_immediately(&path("/dir"), &path("/dir/a"))
        })
        .run()
        .unwrap();
}

#[test]
fn test_invalid_name_check() {
    let fixture = Fixture::with_config(TransportConfig::default().with_reserved_characters("#"));
    let t = fixture.transport().unwrap();

    assert!(t.assert_valid_name("plain").is_ok());
    for bad in ["", "a/b", "a:b", "a#b", "..", " "] {
        assert!(
            matches!(t.assert_valid_name(bad), Err(TransportError::InvalidName { .. })),
            "{:?} should be rejected",
            bad
        );
    }
}

#[test]
fn test_move_into_node_added_in_cycle_is_refused() {
    // GIVEN a committed node and a directory added in an open cycle
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.store_nodes(&[add("/x")]).unwrap();
    let x = fixture.identifier("default", "/x");
    t.prepare_save().unwrap();
    t.store_nodes(&[add("/dir")]).unwrap();

    // WHEN the committed node is moved immediately under the new directory
    let result = t.move_node_immediately(&path("/x"), &path("/dir"));

    // THEN the move is refused and rollback leaves the committed node alone
    assert!(matches!(result, Err(TransportError::Repository { .. })));
    t.rollback_save().unwrap();
    assert!(!fixture.exists("default", "/dir"));
    assert!(fixture.exists("default", "/x"));
    assert_eq!(fixture.identifier("default", "/x"), x);
}

#[test]
fn test_copy_onto_name_freed_in_cycle_is_refused() {
    // GIVEN /a deleted inside an open cycle
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.store_nodes(&[add("/a"), add("/src")]).unwrap();
    t.prepare_save().unwrap();
    t.delete_nodes(&[RemoveNodeOperation::new(path("/a"))]).unwrap();

    // WHEN another node is copied onto the freed name
    let result = t.copy_node(&path("/src"), &path("/a"), None);

    // THEN the copy is refused and rollback restores a single /a
    assert!(matches!(result, Err(TransportError::Repository { .. })));
    t.rollback_save().unwrap();
    assert_eq!(fixture.child_names("default", "/"), vec!["a", "src"]);
}

#[test]
fn test_immediate_operations_clear_of_cycle_still_run() {
    // GIVEN an open cycle that added /dir and removed /a
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.store_nodes(&[add("/a"), add("/b"), add("/target")]).unwrap();
    t.prepare_save().unwrap();
    t.store_nodes(&[add("/dir")]).unwrap();
    t.delete_nodes(&[RemoveNodeOperation::new(path("/a"))]).unwrap();

    // WHEN immediate operations touch only committed nodes
    t.copy_node(&path("/b"), &path("/b2"), None).unwrap();
    t.move_node_immediately(&path("/b"), &path("/target")).unwrap();
    let refused = t.delete_node_immediately(&path("/dir"));

    // THEN they survive the rollback, and the cycle's own node was not touched
    assert!(matches!(refused, Err(TransportError::Repository { .. })));
    t.rollback_save().unwrap();
    assert!(fixture.exists("default", "/a"));
    assert!(fixture.exists("default", "/b2"));
    assert!(fixture.exists("default", "/target/b"));
    assert!(!fixture.exists("default", "/dir"));
}
