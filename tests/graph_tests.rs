//! Tests for building the road graph from map documents

use std::collections::HashSet;

use traffic_sim::simulation::{
    Anchor, MapDocument, NodeId, Position, RoadCategory, RoadId, RoadNodeKey, SimConfig,
    SimRoadNetwork,
};

fn build(json: &str) -> SimRoadNetwork {
    let document = MapDocument::from_json(json).expect("valid map");
    SimRoadNetwork::build(&document, &SimConfig::default())
}

fn anchor(road: u32, anchor: Anchor) -> NodeId {
    NodeId::anchor(RoadId(road), anchor)
}

fn crossing_count(network: &SimRoadNetwork) -> usize {
    network
        .nodes()
        .filter(|(node, _)| matches!(node, NodeId::Road(RoadNodeKey::Crossing { .. })))
        .count()
}

#[test]
fn test_empty_document_builds_empty_graph() {
    let network = build("{}");
    assert_eq!(network.node_count(), 0);
    assert_eq!(network.edge_count(), 0);
}

#[test]
fn test_horizontal_road_produces_chain() {
    let network = build(r#"{"roads": [{"id": 1, "x": 0, "y": 0, "w": 200, "h": 20}]}"#);

    assert_eq!(network.node_count(), 3);
    assert_eq!(network.edge_count(), 2);
    assert_eq!(
        network.position(&anchor(1, Anchor::Left)),
        Some(Position::new(0.0, 10.0))
    );
    assert_eq!(
        network.position(&anchor(1, Anchor::Middle)),
        Some(Position::new(100.0, 10.0))
    );
    assert_eq!(
        network.position(&anchor(1, Anchor::Right)),
        Some(Position::new(200.0, 10.0))
    );

    assert_eq!(
        network.edge_weight(&anchor(1, Anchor::Left), &anchor(1, Anchor::Middle)),
        Some(100.0)
    );
    assert_eq!(
        network.edge_weight(&anchor(1, Anchor::Middle), &anchor(1, Anchor::Right)),
        Some(100.0)
    );
    assert_eq!(
        network.edge_weight(&anchor(1, Anchor::Left), &anchor(1, Anchor::Right)),
        None,
        "extremities are only linked through the middle"
    );
}

#[test]
fn test_vertical_road_uses_top_and_bottom() {
    let network = build(r#"{"roads": [{"id": 4, "x": 0, "y": 0, "width": 20, "height": 100}]}"#);

    assert_eq!(
        network.position(&anchor(4, Anchor::Top)),
        Some(Position::new(10.0, 0.0))
    );
    assert_eq!(
        network.position(&anchor(4, Anchor::Middle)),
        Some(Position::new(10.0, 50.0))
    );
    assert_eq!(
        network.position(&anchor(4, Anchor::Bottom)),
        Some(Position::new(10.0, 100.0))
    );
    assert!(!network.contains(&anchor(4, Anchor::Left)));
}

#[test]
fn test_square_road_counts_as_horizontal() {
    let network = build(r#"{"roads": [{"id": 1, "x": 0, "y": 0, "w": 40, "h": 40}]}"#);

    assert!(network.contains(&anchor(1, Anchor::Left)));
    assert!(network.contains(&anchor(1, Anchor::Right)));
    assert!(!network.contains(&anchor(1, Anchor::Top)));
    // Extremities are exactly 40 apart, which is not close enough to stitch
    assert_eq!(network.edge_count(), 2);
}

#[test]
fn test_overlapping_roads_share_one_crossing() {
    let network = build(
        r#"{"roads": [
            {"id": 1, "x": 0, "y": 100, "w": 400, "h": 20},
            {"id": 2, "x": 190, "y": 0, "w": 20, "h": 300}
        ]}"#,
    );

    let crossing = NodeId::crossing(RoadId(1), RoadId(2));
    assert_eq!(crossing_count(&network), 1);
    assert_eq!(network.position(&crossing), Some(Position::new(200.0, 110.0)));

    let neighbors: Vec<NodeId> = network
        .neighbors(&crossing)
        .into_iter()
        .map(|(node, _)| node)
        .collect();
    assert_eq!(
        neighbors,
        vec![anchor(1, Anchor::Middle), anchor(2, Anchor::Middle)]
    );
    assert_eq!(
        network.edge_weight(&crossing, &anchor(2, Anchor::Middle)),
        Some(40.0)
    );
}

#[test]
fn test_separate_roads_have_no_crossing() {
    let network = build(
        r#"{"roads": [
            {"id": 1, "x": 0, "y": 0, "w": 100, "h": 20},
            {"id": 2, "x": 0, "y": 200, "w": 100, "h": 20}
        ]}"#,
    );

    assert_eq!(crossing_count(&network), 0);
    assert_eq!(network.node_count(), 6);
    assert_eq!(network.edge_count(), 4);
}

#[test]
fn test_touching_roads_are_stitched_not_crossed() {
    let network = build(
        r#"{"roads": [
            {"id": 1, "x": 0, "y": 0, "w": 100, "h": 20},
            {"id": 2, "x": 100, "y": 0, "w": 100, "h": 20}
        ]}"#,
    );

    assert_eq!(crossing_count(&network), 0);
    assert_eq!(
        network.edge_weight(&anchor(1, Anchor::Right), &anchor(2, Anchor::Left)),
        Some(0.0)
    );
    assert_eq!(network.edge_count(), 5);
}

#[test]
fn test_hub_snaps_to_nearest_road_node() {
    let network = build(
        r#"{
            "roads": [{"id": 1, "x": 0, "y": 0, "w": 200, "h": 20}],
            "hubs": [{"id": 1, "x": 30, "y": 50, "name": "Depot"}]
        }"#,
    );

    let hub = NodeId::hub(1);
    assert_eq!(network.degree(&hub), 1);
    assert_eq!(network.edge_weight(&hub, &anchor(1, Anchor::Left)), Some(50.0));
}

#[test]
fn test_far_hubs_stay_isolated_even_when_coincident() {
    let network = build(
        r#"{
            "roads": [{"id": 1, "x": 0, "y": 0, "w": 200, "h": 20}],
            "hubs": [
                {"id": 1, "x": 1000, "y": 1000},
                {"id": 2, "x": 1000, "y": 1000}
            ]
        }"#,
    );

    assert!(network.contains(&NodeId::hub(1)));
    assert!(network.contains(&NodeId::hub(2)));
    assert_eq!(network.degree(&NodeId::hub(1)), 0);
    assert_eq!(network.degree(&NodeId::hub(2)), 0);
    assert_eq!(network.edge_count(), 2);
}

#[test]
fn test_demo_map_nodes_unique_and_edges_symmetric() {
    let json = std::fs::read_to_string("maps/demo.json").expect("demo map present");
    let network = build(&json);

    let unique: HashSet<NodeId> = network.nodes().map(|(node, _)| node).collect();
    assert_eq!(unique.len(), network.node_count());

    let adjacency = network.adjacency();
    assert_eq!(adjacency.len(), network.edge_count() * 2);
    for (from, to, weight) in &adjacency {
        assert!(
            adjacency
                .iter()
                .any(|(a, b, w)| a == to && b == from && w == weight),
            "edge {} -> {} has no mirror",
            from,
            to
        );
    }
}

#[test]
fn test_edge_category_follows_owning_road() {
    let json = std::fs::read_to_string("maps/demo.json").expect("demo map present");
    let network = build(&json);

    assert_eq!(
        network.category_between(&anchor(1, Anchor::Left), &anchor(1, Anchor::Middle)),
        RoadCategory::Big
    );
    assert_eq!(
        network.category_between(&anchor(2, Anchor::Top), &anchor(2, Anchor::Middle)),
        RoadCategory::Small
    );
    assert_eq!(
        network.category_between(&NodeId::hub(1), &anchor(1, Anchor::Left)),
        RoadCategory::Big
    );
}

#[test]
fn test_node_names() {
    assert_eq!(anchor(3, Anchor::Top).to_string(), "r3_T");
    assert_eq!(NodeId::crossing(RoadId(1), RoadId(2)).to_string(), "i1_2");
    assert_eq!(NodeId::hub(7).to_string(), "hub7");
}
