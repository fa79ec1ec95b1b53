//! Map editing operations
//!
//! The map editor owns graph content: it names graphs, places waypoints and
//! draws paths between them. The engine makes no undirected assumption, so
//! [`connect`] writes both directions of a path. [`check_graph`] reports
//! content the engine tolerates but routes poorly over.

use serde::Serialize;
use tracing::{debug, trace};

use crate::core::{is_identifier, Graph, NavError, NodeRecord};

/// Check that a graph name is safe to use as a document name (`^[\w-]+$`)
pub fn validate_graph_name(name: &str) -> Result<&str, NavError> {
    let trimmed = name.trim();
    if is_identifier(trimmed) {
        Ok(trimmed)
    } else {
        Err(NavError::invalid_graph_name(name))
    }
}

/// Add or replace a waypoint, returning the previous record
pub fn add_node(graph: &mut Graph, id: &str, record: NodeRecord) -> Result<Option<NodeRecord>, NavError> {
    if id.is_empty() {
        return Err(NavError::invalid_input("node id must not be empty"));
    }
    trace!(node = id, "Adding node");
    Ok(graph.insert_node(id, record))
}

/// Remove a waypoint together with every edge into or out of it
///
/// Returns the removed record, or `None` if the node did not exist. Edges
/// are cleaned up either way.
pub fn remove_node(graph: &mut Graph, id: &str) -> Option<NodeRecord> {
    let mut removed_edges = graph.remove_outgoing(id);
    let sources: Vec<String> = graph.edge_sources().map(str::to_string).collect();
    for source in sources {
        if graph.remove_edge(&source, id).is_some() {
            removed_edges += 1;
        }
    }
    debug!(node = id, removed_edges, "Removed node");
    graph.remove_node_record(id)
}

/// Connect two waypoints in both directions with the same weight
pub fn connect(graph: &mut Graph, a: &str, b: &str, weight: f64) -> Result<(), NavError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(NavError::invalid_input(format!(
            "edge weight must be a non-negative number, got {}",
            weight
        )));
    }
    for id in [a, b] {
        if !graph.has_node(id) {
            return Err(NavError::invalid_input(format!("unknown node {:?}", id)));
        }
    }
    graph.set_edge(a, b, weight);
    graph.set_edge(b, a, weight);
    trace!(a, b, weight, "Connected nodes");
    Ok(())
}

/// Connect two waypoints using the straight-line distance between them
///
/// Both records must carry numeric `x` and `y`. Returns the weight used.
pub fn connect_by_distance(graph: &mut Graph, a: &str, b: &str) -> Result<f64, NavError> {
    let position = |id: &str| {
        graph
            .node(id)
            .and_then(NodeRecord::position)
            .ok_or_else(|| NavError::invalid_input(format!("node {:?} has no coordinates", id)))
    };
    let (ax, ay) = position(a)?;
    let (bx, by) = position(b)?;
    let weight = (ax - bx).hypot(ay - by);
    connect(graph, a, b, weight)?;
    Ok(weight)
}

/// Remove the path between two waypoints in both directions
///
/// Returns true if at least one direction existed.
pub fn disconnect(graph: &mut Graph, a: &str, b: &str) -> bool {
    let forward = graph.remove_edge(a, b).is_some();
    let backward = graph.remove_edge(b, a).is_some();
    forward || backward
}

/// Findings of [`check_graph`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphReport {
    /// Edges `(from, to)` whose target has no node record
    pub dangling_edges: Vec<(String, String)>,
    /// Adjacency sources with no node record
    pub unknown_sources: Vec<String>,
    /// Edges `(from, to)` with no edge back from `to` to `from`
    pub one_way_edges: Vec<(String, String)>,
    /// Edges `(from, to, weight)` with a negative weight
    pub negative_weights: Vec<(String, String, f64)>,
}

impl GraphReport {
    /// True if nothing was found
    pub fn is_clean(&self) -> bool {
        self.dangling_edges.is_empty()
            && self.unknown_sources.is_empty()
            && self.one_way_edges.is_empty()
            && self.negative_weights.is_empty()
    }

    /// True if the graph has content the engine cannot route correctly
    ///
    /// One-way edges and dangling targets are legal; negative weights are not.
    pub fn has_errors(&self) -> bool {
        !self.negative_weights.is_empty()
    }
}

/// Inspect a graph for suspicious content
pub fn check_graph(graph: &Graph) -> GraphReport {
    let mut report = GraphReport::default();

    for source in graph.edge_sources() {
        if !graph.has_node(source) {
            report.unknown_sources.push(source.to_string());
        }
    }

    for (from, to, weight) in graph.edges() {
        if !graph.has_node(to) {
            report.dangling_edges.push((from.to_string(), to.to_string()));
        }
        if graph.weight(to, from).is_none() {
            report.one_way_edges.push((from.to_string(), to.to_string()));
        }
        if weight < 0.0 {
            report
                .negative_weights
                .push((from.to_string(), to.to_string(), weight));
        }
    }

    debug!(
        dangling = report.dangling_edges.len(),
        unknown_sources = report.unknown_sources.len(),
        one_way = report.one_way_edges.len(),
        negative = report.negative_weights.len(),
        "Checked graph"
    );
    report
}
