//! Child reordering integration tests.

use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;

fn seeded(strategy: ReorderStrategy) -> (Fixture, MemoryTransport) {
    let fixture = Fixture::with_config(TransportConfig::default().with_reorder_strategy(strategy));
    let mut t = fixture.transport().unwrap();
    let mut ops = vec![AddNodeOperation::new(path("/list"), NodeSnapshot::new("nt:unstructured"))];
    for name in ["a", "b", "c", "d", "e"] {
        ops.push(AddNodeOperation::new(
            path(&format!("/list/{}", name)),
            NodeSnapshot::new("nt:unstructured"),
        ));
    }
    t.store_nodes(&ops).unwrap();
    (fixture, t)
}

fn names(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

#[test]
fn test_both_forms_reach_same_order_under_both_strategies() {
    for strategy in [ReorderStrategy::Commands, ReorderStrategy::Sequence] {
        // GIVEN a b c d e
        let (by_sequence, mut t1) = seeded(strategy);
        let (by_commands, mut t2) = seeded(strategy);

        // WHEN one receives the target sequence and the other commands
        t1.reorder_children(&path("/list"), &ChildOrder::Sequence(names("e a c b d")))
            .unwrap();
        t2.reorder_children(
            &path("/list"),
            &ChildOrder::Commands(vec![
                OrderBefore::new("e", Some("a")),
                OrderBefore::new("b", Some("d")),
            ]),
        )
        .unwrap();

        // THEN
        assert_eq!(by_sequence.child_names("default", "/list"), names("e a c b d"));
        assert_eq!(by_commands.child_names("default", "/list"), names("e a c b d"));
    }
}

#[test]
fn test_invalid_orders_rejected() {
    let (fixture, mut t) = seeded(ReorderStrategy::Commands);

    let missing = t.reorder_children(&path("/list"), &ChildOrder::Sequence(names("a b c d")));
    let unknown = t.reorder_children(
        &path("/list"),
        &ChildOrder::Commands(vec![OrderBefore::new("zz", None)]),
    );

    assert!(matches!(missing, Err(TransportError::Repository { .. })));
    assert!(matches!(unknown, Err(TransportError::Repository { .. })));
    assert_eq!(fixture.child_names("default", "/list"), names("a b c d e"));
}

#[test]
fn test_unorderable_node_rejected() {
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.store_nodes(&[
        AddNodeOperation::new(path("/folder"), NodeSnapshot::new("nt:folder")),
        AddNodeOperation::new(path("/folder/a"), NodeSnapshot::new("nt:unstructured")),
        AddNodeOperation::new(path("/folder/b"), NodeSnapshot::new("nt:unstructured")),
    ])
    .unwrap();

    let result = t.reorder_children(&path("/folder"), &ChildOrder::Sequence(names("b a")));

    assert!(matches!(result, Err(TransportError::Repository { .. })));
}
