//! End-to-end routing scenarios over graphs stored on disk

use std::fs;

use serde_json::json;
use tempfile::{tempdir, TempDir};
use wayfinder::prelude::*;

fn write_doc(dir: &TempDir, name: &str, doc: serde_json::Value) {
    fs::write(
        dir.path().join(format!("{}_nodes.json", name)),
        serde_json::to_string_pretty(&doc).unwrap(),
    )
    .unwrap();
}

fn campus_fixture(dir: &TempDir) -> Navigator {
    write_doc(
        dir,
        "campus",
        json!({
            "nodes": {
                "main_gate": { "name": "Main Gate", "x": 0, "y": 0 },
                "library": { "name": "Library", "x": 120, "y": 0 },
                "a": {}, "b": {}, "c": {}
            },
            "edges": {
                "main_gate": { "library": 120 },
                "library": { "main_gate": 120 },
                "a": { "b": 5, "c": 20 },
                "b": { "a": 5, "c": 5 },
                "c": { "b": 5, "a": 20 }
            }
        }),
    );
    write_doc(
        dir,
        "building_A",
        json!({
            "nodes": {
                "building_A_entrance": { "name": "Building A Entrance" },
                "building_A_room101": { "name": "Room 101" }
            },
            "edges": {
                "building_A_entrance": { "building_A_room101": 30 },
                "building_A_room101": { "building_A_entrance": 30 }
            }
        }),
    );
    write_doc(
        dir,
        "building_B",
        json!({
            "nodes": { "building_B_entrance": { "name": "Building B Entrance" } },
            "edges": {}
        }),
    );
    Navigator::open(NavigatorConfig::with_data_dir(dir.path())).unwrap()
}

#[test]
fn campus_route() {
    let dir = tempdir().unwrap();
    let nav = campus_fixture(&dir);

    let route = nav.route("main_gate", "library").unwrap();
    assert_eq!(route.path, vec!["main_gate", "library"]);
    assert_eq!(route.distance, 120.0);
    assert_eq!(route.nodes[0].name(), Some("Main Gate"));
    assert_eq!(route.nodes[1].name(), Some("Library"));
}

#[test]
fn building_route() {
    let dir = tempdir().unwrap();
    let nav = campus_fixture(&dir);

    let route = nav
        .route("building_A_entrance", "building_A_room101")
        .unwrap();
    assert_eq!(route.path, vec!["building_A_entrance", "building_A_room101"]);
    assert_eq!(route.distance, 30.0);
}

#[test]
fn cross_building_route_is_not_found() {
    let dir = tempdir().unwrap();
    let nav = campus_fixture(&dir);

    assert!(nav.table().building("B").unwrap().has_node("building_B_entrance"));
    assert!(nav
        .route("building_A_room101", "building_B_entrance")
        .is_none());
    assert!(nav.route("library", "building_A_room101").is_none());
}

#[test]
fn multi_hop_beats_direct_edge() {
    let dir = tempdir().unwrap();
    let nav = campus_fixture(&dir);

    let route = nav.route("a", "c").unwrap();
    assert_eq!(route.path, vec!["a", "b", "c"]);
    assert_eq!(route.distance, 10.0);
}

#[test]
fn startup_creates_missing_documents() {
    let dir = tempdir().unwrap();
    let nav = campus_fixture(&dir);

    for name in ["building_C", "building_AD"] {
        let path = dir.path().join(format!("{}_nodes.json", name));
        let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(doc, json!({ "nodes": {}, "edges": {} }));
    }
    let statuses = nav.load_statuses();
    assert_eq!(statuses[0], ("campus".to_string(), LoadStatus::Existing));
    assert_eq!(statuses[3], ("building_C".to_string(), LoadStatus::Created));
}

#[test]
fn malformed_building_degrades_to_not_found() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("building_C_nodes.json"), "not json").unwrap();
    let nav = campus_fixture(&dir);

    assert!(nav.route("building_C_entrance", "building_C_lab").is_none());
    assert_eq!(nav.route("main_gate", "library").unwrap().distance, 120.0);
    assert!(nav
        .load_statuses()
        .contains(&("building_C".to_string(), LoadStatus::Recovered)));
}

#[test]
fn edits_reach_routing_and_disk() {
    let dir = tempdir().unwrap();
    let mut nav = campus_fixture(&dir);

    let mut building_b = nav.load_graph("building_B").unwrap();
    building_b.insert_node("building_B_lab", NodeRecord::waypoint("Lab", 3.0, 4.0, "room"));
    building_b.insert_node("building_B_hall", NodeRecord::waypoint("Hall", 0.0, 0.0, "corridor"));
    connect(&mut building_b, "building_B_hall", "building_B_lab", 5.0).unwrap();
    connect(&mut building_b, "building_B_entrance", "building_B_hall", 7.0).unwrap();
    nav.save_graph("building_B", building_b).unwrap();

    let route = nav.route("building_B_entrance", "building_B_lab").unwrap();
    assert_eq!(route.distance, 12.0);

    let reopened = Navigator::open(NavigatorConfig::with_data_dir(dir.path())).unwrap();
    assert_eq!(
        reopened.route("building_B_entrance", "building_B_lab").unwrap(),
        route
    );
}

#[test]
fn answer_payloads() {
    let dir = tempdir().unwrap();
    let nav = campus_fixture(&dir);

    let found = serde_json::to_value(nav.answer(Some("a"), Some("c"))).unwrap();
    assert_eq!(found["path"], json!(["a", "b", "c"]));
    assert_eq!(found["distance"], json!(10.0));
    assert_eq!(found["nodes"].as_array().unwrap().len(), 3);

    let missing = nav.answer(Some("a"), None);
    assert_eq!(missing.status_code(), 400);

    let none = nav.answer(Some("a"), Some("library"));
    assert_eq!(none.status_code(), 404);
}

#[test]
fn reading_an_unknown_graph_leaves_data_dir_alone() {
    let dir = tempdir().unwrap();
    let nav = campus_fixture(&dir);

    assert!(matches!(
        nav.load_graph("typo"),
        Err(NavError::UnknownGraph { .. })
    ));
    assert!(!dir.path().join("typo_nodes.json").exists());
}

#[test]
fn negative_cycle_on_disk_does_not_hang_routing() {
    let dir = tempdir().unwrap();
    write_doc(
        &dir,
        "campus",
        json!({
            "nodes": { "a": {}, "b": {}, "c": {} },
            "edges": { "a": { "b": -1 }, "b": { "a": -1 } }
        }),
    );
    let nav = Navigator::open(NavigatorConfig::with_data_dir(dir.path())).unwrap();

    assert!(nav.route("a", "c").is_none());
    assert_eq!(nav.answer(Some("a"), Some("c")).status_code(), 404);
}
