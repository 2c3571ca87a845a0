//! Tests for snapshot loading and the end-to-end pipeline

use std::path::PathBuf;

use tempfile::TempDir;

use kintree::application::{ApplicationError, Snapshot};
use kintree::config::Settings;

const FIXTURE: &str = r#"{
    "entities": [
        { "id": 1, "source": "link" },
        { "id": 2 },
        { "id": 3, "source": "playmarket" },
        { "id": 4 }
    ],
    "relations": [
        { "actor": 2, "target": 1, "created_at": "2023-01-02T10:00:00Z" },
        { "actor": 3, "target": 1, "created_at": "2023-01-03T10:00:00Z" },
        { "actor": 4, "target": 3, "created_at": "2023-01-04T10:00:00Z" }
    ]
}"#;

fn write_snapshot(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write snapshot file");
    path
}

#[test]
fn given_valid_json_when_parsing_then_returns_snapshot() {
    // Act
    let snapshot = Snapshot::parse(FIXTURE).unwrap();

    // Assert
    assert_eq!(snapshot.entities.len(), 4);
    assert_eq!(snapshot.relations.len(), 3);
    assert_eq!(snapshot.entities[0].source.as_deref(), Some("link"));
    assert_eq!(snapshot.entities[1].source, None);
    assert_eq!(snapshot.relations[0].actor, 2);
    assert_eq!(snapshot.relations[0].target, 1);
}

#[test]
fn given_missing_relations_when_parsing_then_defaults_empty() {
    // Arrange
    let content = r#"{ "entities": [ { "id": 1 } ] }"#;

    // Act
    let snapshot = Snapshot::parse(content).unwrap();

    // Assert
    assert_eq!(snapshot.entities.len(), 1);
    assert!(snapshot.relations.is_empty());
}

#[test]
fn given_malformed_timestamp_when_parsing_then_errors() {
    // Arrange
    let content = r#"{
        "entities": [ { "id": 1 }, { "id": 2 } ],
        "relations": [ { "actor": 2, "target": 1, "created_at": "yesterday" } ]
    }"#;

    // Act
    let result = Snapshot::parse(content);

    // Assert
    assert!(matches!(
        result,
        Err(ApplicationError::InvalidTimestamp { .. })
    ));
}

#[test]
fn given_invalid_json_when_parsing_then_errors() {
    let result = Snapshot::parse("{ not json");
    assert!(matches!(result, Err(ApplicationError::SnapshotFormat(_))));
}

#[test]
fn given_snapshot_file_when_loading_then_builds_colored_forest() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = write_snapshot(&temp, "snapshot.json", FIXTURE);

    // Act
    let snapshot = Snapshot::load(&path).unwrap();
    let forest = snapshot.build_forest(&Settings::default().palette()).unwrap();

    // Assert
    assert_eq!(forest.root_ids(), vec![1]);
    assert_eq!(forest.node(1).unwrap().data.color, "#2196F3");
    assert_eq!(forest.node(4).unwrap().data.color, "#9E9E9E");
}

#[test]
fn given_nonexistent_file_when_loading_then_errors() {
    let result = Snapshot::load(&PathBuf::from("/nonexistent/snapshot.json"));
    assert!(matches!(result, Err(ApplicationError::SnapshotRead { .. })));
}

#[test]
fn given_duplicate_ids_in_snapshot_when_building_then_errors() {
    // Arrange
    let content = r#"{ "entities": [ { "id": 1 }, { "id": 1 } ] }"#;
    let snapshot = Snapshot::parse(content).unwrap();

    // Act
    let result = snapshot.build_forest(&Settings::default().palette());

    // Assert
    assert!(matches!(result, Err(ApplicationError::Domain(_))));
}
