//! Tests for top-down color propagation

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use kintree::config::Settings;
use kintree::domain::{Entity, Forest, ForestBuilder, Palette, Relation};

fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

fn rel(actor: u64, target: u64, at: &str) -> Relation {
    Relation::new(actor, target, ts(at))
}

fn color_of(forest: &Forest, id: u64) -> String {
    forest.node(id).expect("node exists").data.color.clone()
}

#[test]
fn given_source_fixture_when_propagating_then_colors_match() {
    // Arrange: 1 (link) <- {2, 3 (playmarket)}; 3 <- 4
    let entities = vec![
        Entity::new(1, Some("link")),
        Entity::new(2, None),
        Entity::new(3, Some("playmarket")),
        Entity::new(4, None),
    ];
    let relations = vec![
        rel(2, 1, "2023-01-02T10:00:00Z"),
        rel(3, 1, "2023-01-03T10:00:00Z"),
        rel(4, 3, "2023-01-04T10:00:00Z"),
    ];
    let mut forest = ForestBuilder::new().build(&entities, &relations).unwrap();

    // Act
    forest.propagate(&Settings::default().palette());

    // Assert
    assert_eq!(forest.root_ids(), vec![1]);
    assert_eq!(color_of(&forest, 1), "#2196F3", "root uses link color");
    assert_eq!(color_of(&forest, 2), "#2196F3", "child inherits link color");
    assert_eq!(color_of(&forest, 3), "#9E9E9E", "overrides to playmarket");
    assert_eq!(color_of(&forest, 4), "#9E9E9E", "inherits the override");
}

#[test]
fn given_declared_child_when_propagating_then_override_beats_inheritance() {
    // Arrange: root declares "a", middle declares "b", leaf declares nothing
    let palette = Palette::new(
        BTreeMap::from([
            ("a".to_string(), "#111111".to_string()),
            ("b".to_string(), "#222222".to_string()),
        ]),
        "#000000",
    );
    let entities = vec![
        Entity::new(1, Some("a")),
        Entity::new(2, Some("b")),
        Entity::new(3, None),
    ];
    let relations = vec![
        rel(2, 1, "2023-01-01T10:00:00Z"),
        rel(3, 2, "2023-01-02T10:00:00Z"),
    ];
    let mut forest = ForestBuilder::new().build(&entities, &relations).unwrap();

    // Act
    forest.propagate(&palette);

    // Assert: the leaf inherits the override, not the grandparent's color
    assert_eq!(color_of(&forest, 2), "#222222");
    assert_eq!(color_of(&forest, 3), "#222222");
}

#[test]
fn given_unknown_source_when_propagating_then_falls_through_to_inheritance() {
    // Arrange: "organic" is not in the palette, so it is no declaration
    let palette = Palette::new(
        BTreeMap::from([("a".to_string(), "#111111".to_string())]),
        "#000000",
    );
    let entities = vec![Entity::new(1, Some("a")), Entity::new(2, Some("organic"))];
    let relations = vec![rel(2, 1, "2023-01-01T10:00:00Z")];
    let mut forest = ForestBuilder::new().build(&entities, &relations).unwrap();

    // Act
    forest.propagate(&palette);

    // Assert
    assert_eq!(color_of(&forest, 2), "#111111");
}

#[test]
fn given_root_without_declaration_when_propagating_then_gets_default() {
    // Arrange
    let palette = Palette::new(BTreeMap::new(), "#ABCDEF");
    let entities = vec![Entity::new(1, None), Entity::new(2, Some("unknown"))];
    let mut forest = ForestBuilder::new().build(&entities, &[]).unwrap();

    // Act
    forest.propagate(&palette);

    // Assert
    assert_eq!(color_of(&forest, 1), "#ABCDEF");
    assert_eq!(color_of(&forest, 2), "#ABCDEF");
}

#[test]
fn given_deep_chain_when_propagating_then_every_node_resolved() {
    // Arrange: a 500-deep chain; traversal must not rely on call depth
    let entities: Vec<Entity> = (1..=500).map(|id| Entity::new(id, None)).collect();
    let relations: Vec<Relation> = (2..=500)
        .map(|id| rel(id, id - 1, "2023-01-01T10:00:00Z"))
        .collect();
    let mut forest = ForestBuilder::new().build(&entities, &relations).unwrap();

    // Act
    forest.propagate(&Settings::default().palette());

    // Assert
    for (_, node) in forest.iter() {
        assert!(!node.data.color.is_empty(), "node {} unresolved", node.data.id);
    }
    assert_eq!(color_of(&forest, 500), "#9E9E9E");
}
