//! Save lifecycle integration tests.

use arbor_tests::prelude::*;

fn add(at: &str) -> AddNodeOperation {
    AddNodeOperation::new(path(at), NodeSnapshot::new("nt:unstructured"))
}

mod commit {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("store_then_commit")
            .step("prepare", |t| t.prepare_save())
            .step("store_a", |t| t.store_nodes(&[add("/a")]))
            .step("store_p1", |t| t.store_property(&PropertySnapshot::new(path("/a/p1"), "x")))
            .step("finish", |t| t.finish_save())
    }

    #[test]
    fn test_committed_property_is_readable() {
        let fixture = scenario().run().unwrap();

        assert_eq!(
            fixture.property("default", "/a/p1"),
            Some(PropertyValue::from("x"))
        );
    }
}

mod rollback {
    use super::*;

    #[test]
    fn test_rollback_after_failed_store_is_byte_exact() {
        // GIVEN a repository with committed content
        let fixture = Fixture::new();
        let mut t = fixture.transport().unwrap();
        t.store_nodes(&[add("/existing"), add("/existing/child")]).unwrap();
        t.store_property(&PropertySnapshot::new(path("/existing/title"), "kept")).unwrap();
        let before = fixture.snapshot().unwrap();

        // WHEN a cycle applies some work and then a store fails
        t.prepare_save().unwrap();
        t.store_nodes(&[add("/new")]).unwrap();
        t.store_property(&PropertySnapshot::new(path("/existing/title"), "changed")).unwrap();
        let failed = t.store_nodes(&[
            add("/new/child"),
            AddNodeOperation::new(path("/broken"), NodeSnapshot::new("nt:resource")),
        ]);
        assert!(failed.is_err());
        t.rollback_save().unwrap();

        // THEN the serialized state is unchanged
        assert_eq!(fixture.snapshot().unwrap(), before);
        assert_eq!(t.state(), TransactionState::Idle);
    }

    #[test]
    fn test_rollback_restores_deleted_subtree_and_order() {
        let fixture = Fixture::new();
        let mut t = fixture.transport().unwrap();
        t.store_nodes(&[add("/list"), add("/list/a"), add("/list/b"), add("/list/c")])
            .unwrap();
        let before = fixture.snapshot().unwrap();

        t.prepare_save().unwrap();
        t.reorder_children(&path("/list"), &ChildOrder::Sequence(vec!["c".into(), "a".into(), "b".into()]))
            .unwrap();
        t.move_nodes(&[MoveSpec::new(path("/list/a"), path("/moved"))]).unwrap();
        t.delete_nodes(&[RemoveNodeOperation::new(path("/list"))]).unwrap();
        t.rollback_save().unwrap();

        assert_eq!(fixture.snapshot().unwrap(), before);
        assert_eq!(fixture.child_names("default", "/list"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rollback_with_nothing_applied() {
        let fixture = Fixture::new();
        let mut t = fixture.transport().unwrap();
        let before = fixture.snapshot().unwrap();

        t.prepare_save().unwrap();
        t.rollback_save().unwrap();
        t.rollback_save().unwrap();

        assert_eq!(fixture.snapshot().unwrap(), before);
    }
}

mod states {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let fixture = Fixture::new();
        let mut t = fixture.transport().unwrap();

        assert_eq!(t.state(), TransactionState::Idle);
        t.prepare_save().unwrap();
        assert_eq!(t.state(), TransactionState::Preparing);
        t.store_nodes(&[add("/a")]).unwrap();
        assert_eq!(t.state(), TransactionState::Active);
        t.finish_save().unwrap();
        assert_eq!(t.state(), TransactionState::Idle);
    }

    #[test]
    fn test_failed_commit_requires_rollback() {
        // GIVEN a cycle holding a reference that never gets a target
        let fixture = Fixture::new();
        let mut t = fixture.transport().unwrap();
        t.prepare_save().unwrap();
        t.store_nodes(&[AddNodeOperation::new(
            path("/a"),
            NodeSnapshot::new("nt:unstructured").with_property("ref", Value::Reference(Identifier::generate())),
        )])
        .unwrap();

        // WHEN
        let result = t.finish_save();

        // THEN
        assert!(matches!(result, Err(TransportError::Repository { .. })));
        assert_eq!(t.state(), TransactionState::Active);
        t.rollback_save().unwrap();
        assert!(!fixture.exists("default", "/a"));
    }

    #[test]
    fn test_cycles_are_repeatable() {
        let fixture = Fixture::new();
        let mut t = fixture.transport().unwrap();

        for name in ["/one", "/two", "/three"] {
            t.prepare_save().unwrap();
            t.store_nodes(&[add(name)]).unwrap();
            t.finish_save().unwrap();
        }

        assert_eq!(fixture.child_names("default", "/"), vec!["one", "two", "three"]);
    }

    #[test]
    #[should_panic(expected = "only one save cycle may be open")]
    fn test_prepare_while_active_panics() {
        let fixture = Fixture::new();
        let mut t = fixture.transport().unwrap();
        t.prepare_save().unwrap();
        t.store_nodes(&[add("/a")]).unwrap();
        let _ = t.prepare_save();
    }
}
