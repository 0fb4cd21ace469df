//! Copy and clone integration tests.

use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;

fn add(at: &str) -> AddNodeOperation {
    AddNodeOperation::new(path(at), NodeSnapshot::new("nt:unstructured"))
}

/// `/src` with two children, `x` holding a hard reference to `y`.
fn seed(t: &mut MemoryTransport) -> TransportResult<()> {
    let y = Identifier::generate();
    t.store_nodes(&[
        add("/src"),
        add("/src/x"),
        AddNodeOperation::new(path("/src/y"), NodeSnapshot::new("nt:unstructured").with_identifier(y)),
    ])?;
    t.store_property(&PropertySnapshot::new(path("/src/x/ref"), Value::Reference(y)))?;
    t.store_property(&PropertySnapshot::new(path("/src/title"), "source"))
}

mod copy {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_copy_is_structurally_identical_with_disjoint_identifiers() {
        // GIVEN
        let fixture = Fixture::new();
        let mut t = fixture.transport().unwrap();
        seed(&mut t).unwrap();

        // WHEN
        t.copy_node(&path("/src"), &path("/dst"), None).unwrap();

        // THEN
        let original = fixture.subtree_ids("default", "/src");
        let copied = fixture.subtree_ids("default", "/dst");
        assert_eq!(copied.len(), original.len());
        assert!(copied.is_disjoint(&original));
        assert_eq!(fixture.child_names("default", "/dst"), fixture.child_names("default", "/src"));
        assert_eq!(fixture.property("default", "/dst/title"), Some(PropertyValue::from("source")));

        // AND the internal reference follows the copy
        let new_y = fixture.identifier("default", "/dst/y").unwrap();
        assert_eq!(
            fixture.property("default", "/dst/x/ref"),
            Some(PropertyValue::Single(Value::Reference(new_y)))
        );
    }

    #[test]
    fn test_copy_from_other_workspace() {
        let fixture = Fixture::new();
        fixture.add_workspace("staging").unwrap();
        seed(&mut fixture.transport_in("staging").unwrap()).unwrap();
        let mut t = fixture.transport().unwrap();

        t.copy_node(&path("/src"), &path("/imported"), Some(&WorkspaceName::new("staging")))
            .unwrap();

        assert!(fixture.exists("default", "/imported/x"));
        assert!(fixture
            .subtree_ids("default", "/imported")
            .is_disjoint(&fixture.subtree_ids("staging", "/src")));
    }

    #[test]
    fn test_copy_errors() {
        Scenario::new("copy_errors")
            .step("seed", seed)
            .expect("missing_source", Expect::PathNotFound, |t| {
                t.copy_node(&path("/nope"), &path("/dst"), None)
            })
            .expect("missing_destination_parent", Expect::PathNotFound, |t| {
                t.copy_node(&path("/src"), &path("/nope/dst"), None)
            })
            .expect("destination_exists", Expect::ItemExists, |t| {
                t.copy_node(&path("/src/x"), &path("/src/y"), None)
            })
            .run()
            .unwrap();
    }
}

mod clone {
    use super::*;
    use pretty_assertions::assert_eq;

    fn staged() -> Fixture {
        let fixture = Fixture::new();
        fixture.add_workspace("staging").unwrap();
        seed(&mut fixture.transport_in("staging").unwrap()).unwrap();
        fixture
    }

    #[test]
    fn test_clone_preserves_identity_across_workspaces() {
        let fixture = staged();
        let mut t = fixture.transport().unwrap();

        t.clone_from(&WorkspaceName::new("staging"), &path("/src"), &path("/live"), false)
            .unwrap();

        assert_eq!(
            fixture.subtree_ids("default", "/live"),
            fixture.subtree_ids("staging", "/src")
        );
    }

    #[test]
    fn test_clone_existing_destination() {
        let fixture = staged();
        let mut t = fixture.transport().unwrap();
        t.store_nodes(&[add("/live")]).unwrap();
        let staging = WorkspaceName::new("staging");

        let refused = t.clone_from(&staging, &path("/src"), &path("/live"), false);
        assert!(matches!(refused, Err(TransportError::ItemExists(_))));

        t.clone_from(&staging, &path("/src"), &path("/live"), true).unwrap();
        assert_eq!(
            fixture.identifier("default", "/live"),
            fixture.identifier("staging", "/src")
        );
    }

    #[test]
    fn test_clone_with_fresh_identifiers() {
        let fixture = Fixture::with_config(
            TransportConfig::default().with_clone_identifiers(CloneIdentifiers::Fresh),
        );
        fixture.add_workspace("staging").unwrap();
        seed(&mut fixture.transport_in("staging").unwrap()).unwrap();
        let mut t = fixture.transport().unwrap();

        t.clone_from(&WorkspaceName::new("staging"), &path("/src"), &path("/a"), false)
            .unwrap();
        t.clone_from(&WorkspaceName::new("staging"), &path("/src"), &path("/b"), false)
            .unwrap();

        assert!(fixture
            .subtree_ids("default", "/a")
            .is_disjoint(&fixture.subtree_ids("default", "/b")));
    }

    #[test]
    fn test_clone_within_same_workspace_preserving_identity_fails() {
        Scenario::new("same_workspace_clone")
            .step("seed", seed)
            .expect("clone", Expect::RepositoryError, |t| {
                t.clone_from(&WorkspaceName::default(), &path("/src"), &path("/again"), false)
            })
            .run()
            .unwrap();
    }
}
