//! Road network graph built from road rectangles
//!
//! Every road contributes three centerline nodes, overlapping roads share an
//! intersection node, nearby nodes are stitched together and hubs snap to the
//! closest road node.

use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::config::SimConfig;
use super::map::{MapDocument, RoadSpec};
use super::types::{Anchor, NodeId, Orientation, Position, RoadCategory, RoadId};

/// What the network remembers about each road
#[derive(Debug, Clone, Copy)]
struct RoadInfo {
    /// Position in the document, earlier roads win category lookups
    order: usize,
    category: RoadCategory,
}

/// Undirected weighted graph of navigable points
///
/// Edge weights are Euclidean distances fixed at build time.
#[derive(Debug, Default, Clone)]
pub struct SimRoadNetwork {
    graph: UnGraph<NodeId, f32>,

    /// Maps node IDs to their indices in the graph
    node_to_index: HashMap<NodeId, NodeIndex>,

    /// Storage for node positions
    positions: HashMap<NodeId, Position>,

    roads: HashMap<RoadId, RoadInfo>,
}

impl SimRoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for a validated map document
    pub fn build(document: &MapDocument, config: &SimConfig) -> Self {
        let mut network = Self::new();

        for (order, road) in document.roads.iter().enumerate() {
            network.add_road(order, road);
        }

        network.add_crossings(&document.roads);
        network.stitch(config.stitch_distance);

        for hub in &document.hubs {
            let node = NodeId::hub(hub.id);
            network.add_node(node, hub.position());
            match network.nearest_road_node(&hub.position()) {
                Some((nearest, distance)) if distance <= config.hub_snap_distance => {
                    debug!("Hub {} snapped to {} ({:.1} away)", hub.id, nearest, distance);
                    network.connect(node, nearest);
                }
                _ => warn!(
                    "Hub {} ({}) is not within {} of any road, it will never spawn cars",
                    hub.id, hub.name, config.hub_snap_distance
                ),
            }
        }

        info!(
            "Built road network: {} nodes, {} edges from {} roads and {} hubs",
            network.node_count(),
            network.edge_count(),
            document.roads.len(),
            document.hubs.len()
        );

        network
    }

    /// Three centerline nodes chained extremity - middle - extremity
    fn add_road(&mut self, order: usize, road: &RoadSpec) {
        let id = RoadId(road.id);
        self.roads.insert(
            id,
            RoadInfo {
                order,
                category: road.category,
            },
        );

        let rect = road.rect();
        let center = rect.center();
        let orientation = road.orientation();
        let points = match orientation {
            Orientation::Horizontal => [
                Position::new(rect.x, center.y),
                center,
                Position::new(rect.x + rect.width, center.y),
            ],
            Orientation::Vertical => [
                Position::new(center.x, rect.y),
                center,
                Position::new(center.x, rect.y + rect.height),
            ],
        };

        let anchors = Anchor::chain(orientation);
        let nodes = anchors.map(|anchor| NodeId::anchor(id, anchor));
        for (node, point) in nodes.iter().zip(points) {
            self.add_node(*node, point);
        }
        self.connect(nodes[0], nodes[1]);
        self.connect(nodes[1], nodes[2]);
    }

    /// One node per positive-area overlap, linked to the closest anchor of each road
    fn add_crossings(&mut self, roads: &[RoadSpec]) {
        for (i, a) in roads.iter().enumerate() {
            for b in &roads[i + 1..] {
                let Some(overlap) = a.rect().overlap(&b.rect()) else {
                    continue;
                };

                let crossing = NodeId::crossing(RoadId(a.id), RoadId(b.id));
                let center = overlap.center();
                self.add_node(crossing, center);

                for road in [a, b] {
                    if let Some(nearest) = self.nearest_anchor(road, &center) {
                        self.connect(crossing, nearest);
                    }
                }
            }
        }
    }

    /// Connect every pair of nodes closer than `threshold` that isn't linked yet
    fn stitch(&mut self, threshold: f32) {
        let indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        for (i, &a) in indices.iter().enumerate() {
            for &b in &indices[i + 1..] {
                if self.graph.find_edge(a, b).is_some() {
                    continue;
                }
                let distance = self.index_position(a).distance(&self.index_position(b));
                if distance < threshold {
                    self.graph.add_edge(a, b, distance);
                }
            }
        }
    }

    fn add_node(&mut self, node: NodeId, position: Position) {
        if self.node_to_index.contains_key(&node) {
            return;
        }
        let index = self.graph.add_node(node);
        self.node_to_index.insert(node, index);
        self.positions.insert(node, position);
    }

    /// Add an edge weighted by distance unless the pair is already linked
    fn connect(&mut self, a: NodeId, b: NodeId) {
        let (Some(&ia), Some(&ib)) = (self.node_to_index.get(&a), self.node_to_index.get(&b))
        else {
            return;
        };
        if ia == ib || self.graph.find_edge(ia, ib).is_some() {
            return;
        }
        let distance = self.index_position(ia).distance(&self.index_position(ib));
        self.graph.add_edge(ia, ib, distance);
    }

    fn index_position(&self, index: NodeIndex) -> Position {
        self.positions[&self.graph[index]]
    }

    /// Closest of a road's own anchors; the first one wins a tie
    fn nearest_anchor(&self, road: &RoadSpec, target: &Position) -> Option<NodeId> {
        let id = RoadId(road.id);
        Anchor::chain(road.orientation())
            .into_iter()
            .map(|anchor| NodeId::anchor(id, anchor))
            .filter_map(|node| Some((node, self.positions.get(&node)?.distance(target))))
            .min_by_key(|(_, distance)| OrderedFloat(*distance))
            .map(|(node, _)| node)
    }

    /// Closest non-hub node in creation order; the first one wins a tie
    fn nearest_road_node(&self, target: &Position) -> Option<(NodeId, f32)> {
        self.graph
            .node_indices()
            .filter(|&index| !self.graph[index].is_hub())
            .map(|index| (self.graph[index], self.index_position(index).distance(target)))
            .min_by_key(|(_, distance)| OrderedFloat(*distance))
    }

    /// Get number of nodes
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, node: &NodeId) -> bool {
        self.node_to_index.contains_key(node)
    }

    /// Gets the position of a node
    pub fn position(&self, node: &NodeId) -> Option<Position> {
        self.positions.get(node).copied()
    }

    /// All nodes with their positions, in creation order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, Position)> + '_ {
        self.graph
            .node_indices()
            .map(|index| (self.graph[index], self.index_position(index)))
    }

    /// Neighbours of a node with the edge weight, sorted by node id
    pub fn neighbors(&self, node: &NodeId) -> Vec<(NodeId, f32)> {
        let Some(&index) = self.node_to_index.get(node) else {
            return Vec::new();
        };
        let mut neighbors: Vec<(NodeId, f32)> = self
            .graph
            .edges(index)
            .map(|edge| {
                let other = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                (self.graph[other], *edge.weight())
            })
            .collect();
        neighbors.sort_by(|a, b| a.0.cmp(&b.0));
        neighbors
    }

    pub fn degree(&self, node: &NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Weight of the edge between two nodes, if they are linked
    pub fn edge_weight(&self, a: &NodeId, b: &NodeId) -> Option<f32> {
        let ia = self.node_to_index.get(a)?;
        let ib = self.node_to_index.get(b)?;
        let edge = self.graph.find_edge(*ia, *ib)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Cheapest node sequence from `start` to `goal` with its total cost
    ///
    /// `edge_cost` receives both endpoints and the edge length. `None` when
    /// either node is unknown or no path exists.
    pub fn cheapest_path(
        &self,
        start: &NodeId,
        goal: &NodeId,
        edge_cost: impl Fn(NodeId, NodeId, f32) -> f32,
    ) -> Option<(f32, Vec<NodeId>)> {
        let start_node = self.node_to_index.get(start)?;
        let end_node = self.node_to_index.get(goal)?;

        let (cost, node_path) = astar(
            &self.graph,
            *start_node,
            |node| node == *end_node,
            |edge| {
                edge_cost(
                    self.graph[edge.source()],
                    self.graph[edge.target()],
                    *edge.weight(),
                )
            },
            |_| 0.0, // Null heuristic = Dijkstra
        )?;

        let path = node_path.into_iter().map(|index| self.graph[index]).collect();
        Some((cost, path))
    }

    /// Every edge in both directions, as `(from, to, weight)`
    pub fn adjacency(&self) -> Vec<(NodeId, NodeId, f32)> {
        self.graph
            .edge_references()
            .flat_map(|edge| {
                let a = self.graph[edge.source()];
                let b = self.graph[edge.target()];
                let weight = *edge.weight();
                [(a, b, weight), (b, a, weight)]
            })
            .collect()
    }

    /// Category of the road an edge runs along
    ///
    /// Uses the earliest road in the document owning one of the endpoints;
    /// edges touching no road anchor count as small.
    pub fn category_between(&self, a: &NodeId, b: &NodeId) -> RoadCategory {
        [a.anchor_road(), b.anchor_road()]
            .into_iter()
            .flatten()
            .filter_map(|road| self.roads.get(&road))
            .min_by_key(|info| info.order)
            .map(|info| info.category)
            .unwrap_or(RoadCategory::Small)
    }
}
