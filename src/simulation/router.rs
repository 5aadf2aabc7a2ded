//! Congestion-aware shortest paths over the road network
//!
//! Each edge costs its length plus a fixed penalty per car already
//! travelling on it.

use std::collections::HashMap;

use super::error::RouteError;
use super::road_network::SimRoadNetwork;
use super::types::NodeId;

/// Undirected edge key: the smaller endpoint always comes first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.0, self.1)
    }
}

/// Number of cars per undirected edge
pub type CongestionMap = HashMap<EdgeKey, u32>;

/// A path through the network with its total routing cost
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes from start to goal, both included
    pub nodes: Vec<NodeId>,
    pub cost: f32,
}

impl Route {
    /// Number of edges a car has to drive
    pub fn edge_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Find the cheapest path from `start` to `goal`
///
/// `start == goal` yields a single-node route. The network is never modified.
pub fn find_path(
    network: &SimRoadNetwork,
    start: NodeId,
    goal: NodeId,
    congestion: Option<&CongestionMap>,
    penalty: f32,
) -> Result<Route, RouteError> {
    for node in [start, goal] {
        if !network.contains(&node) {
            return Err(RouteError::UnknownNode(node));
        }
    }

    let edge_cost = |a: NodeId, b: NodeId, weight: f32| -> f32 {
        let cars = congestion
            .and_then(|table| table.get(&EdgeKey::new(a, b)))
            .copied()
            .unwrap_or(0);
        weight + cars as f32 * penalty
    };

    let (cost, nodes) = network
        .cheapest_path(&start, &goal, edge_cost)
        .ok_or(RouteError::Unreachable {
            from: start,
            to: goal,
        })?;

    Ok(Route { nodes, cost })
}
