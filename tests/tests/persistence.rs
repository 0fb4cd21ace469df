//! Snapshot persistence integration tests.

use arbor_store::Repository;
use arbor_tests::prelude::*;

fn add(at: &str) -> AddNodeOperation {
    AddNodeOperation::new(path(at), NodeSnapshot::new("nt:unstructured"))
}

#[test]
fn test_committed_state_survives_reload() {
    // GIVEN a transport persisting to disk
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("repository.json");
    let fixture = Fixture::with_config(TransportConfig::default().with_snapshot_path(&file));
    let mut t = fixture.transport().unwrap();
    let id = Identifier::generate();

    // WHEN a cycle commits
    t.prepare_save().unwrap();
    t.store_nodes(&[AddNodeOperation::new(
        path("/a"),
        NodeSnapshot::new("nt:unstructured").with_identifier(id).with_property("p", "v"),
    )])
    .unwrap();
    t.finish_save().unwrap();

    // THEN a reloaded repository holds the same content
    let reloaded = Fixture::with_repository(
        Repository::load_snapshot(&file).unwrap(),
        TransportConfig::default(),
    );
    assert_eq!(reloaded.identifier("default", "/a"), Some(id));
    assert_eq!(reloaded.property("default", "/a/p"), Some(PropertyValue::from("v")));
    assert_eq!(reloaded.snapshot().unwrap(), fixture.snapshot().unwrap());
}

#[test]
fn test_rolled_back_cycle_is_not_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("repository.json");
    let fixture = Fixture::with_config(TransportConfig::default().with_snapshot_path(&file));
    let mut t = fixture.transport().unwrap();
    t.store_nodes(&[add("/kept")]).unwrap();

    t.prepare_save().unwrap();
    t.store_nodes(&[add("/discarded")]).unwrap();
    t.rollback_save().unwrap();

    let reloaded = Repository::load_snapshot(&file).unwrap();
    let ws = reloaded.workspace(&WorkspaceName::default()).unwrap();
    assert!(ws.resolve(&path("/kept")).is_some());
    assert!(ws.resolve(&path("/discarded")).is_none());
}

#[test]
fn test_config_file_drives_transport() {
    let dir = tempfile::tempdir().unwrap();
    let config_file = dir.path().join("arbor.toml");
    let snapshot = dir.path().join("snapshot.json");
    std::fs::write(
        &config_file,
        format!(
            "workspace = \"default\"\nreorder_strategy = \"sequence\"\nsnapshot_path = {:?}\n",
            snapshot.to_string_lossy()
        ),
    )
    .unwrap();

    let config = TransportConfig::from_file(&config_file).unwrap();
    let fixture = Fixture::with_config(config);
    fixture.transport().unwrap().store_nodes(&[add("/a")]).unwrap();

    assert_eq!(fixture.config().reorder_strategy, ReorderStrategy::Sequence);
    assert!(snapshot.exists());
}
