//! Namespace registration integration tests.

use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;

#[test]
fn test_remapping_prefix_leaves_single_mapping() {
    // GIVEN p -> u and q -> u2
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.register_namespace("p", "http://example.com/u").unwrap();
    t.register_namespace("q", "http://example.com/u2").unwrap();

    // WHEN p is remapped to u2
    let evicted = t.register_namespace("p", "http://example.com/u2").unwrap();

    // THEN p -> u2 is the only mapping for either half
    assert_eq!(fixture.namespace_uri("p").as_deref(), Some("http://example.com/u2"));
    assert_eq!(fixture.namespace_prefix("http://example.com/u2").as_deref(), Some("p"));
    assert_eq!(fixture.namespace_uri("q"), None);
    assert_eq!(fixture.namespace_prefix("http://example.com/u"), None);
    assert_eq!(
        evicted,
        vec![
            NamespaceMapping::new("p", "http://example.com/u"),
            NamespaceMapping::new("q", "http://example.com/u2"),
        ]
    );
}

#[test]
fn test_reregistering_same_mapping_is_noop() {
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();
    t.register_namespace("p", "http://example.com/u").unwrap();

    let evicted = t.register_namespace("p", "http://example.com/u").unwrap();

    assert!(evicted.is_empty());
    assert_eq!(fixture.namespace_uri("p").as_deref(), Some("http://example.com/u"));
}

#[test]
fn test_builtin_and_unknown_prefixes() {
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();

    assert!(matches!(
        t.unregister_namespace("jcr"),
        Err(TransportError::Repository { .. })
    ));
    assert!(matches!(
        t.register_namespace("jcr", "http://example.com/other"),
        Err(TransportError::Repository { .. })
    ));
    assert!(matches!(
        t.unregister_namespace("unknown"),
        Err(TransportError::Repository { .. })
    ));
    assert!(matches!(
        t.register_namespace("bad:prefix", "http://example.com/x"),
        Err(TransportError::InvalidName { .. })
    ));
}

#[test]
fn test_namespace_writes_ignore_rollback() {
    let fixture = Fixture::new();
    let mut t = fixture.transport().unwrap();

    t.prepare_save().unwrap();
    t.register_namespace("p", "http://example.com/u").unwrap();
    t.rollback_save().unwrap();

    assert_eq!(fixture.namespace_uri("p").as_deref(), Some("http://example.com/u"));
}
