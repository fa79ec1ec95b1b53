//! Core type definitions for routing
//!
//! This module contains the data model shared by the store, the engine and
//! the dispatcher: waypoint records, graphs and route results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Display attributes of a waypoint
///
/// The engine treats the record as opaque. The editor conventionally writes
/// `name`, `x`, `y` and `type`, which the accessors below read when present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeRecord(Value);

impl NodeRecord {
    /// Wrap an arbitrary JSON payload
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Build a record with the editor's conventional fields
    pub fn waypoint(name: impl Into<String>, x: f64, y: f64, kind: impl Into<String>) -> Self {
        Self(serde_json::json!({
            "name": name.into(),
            "x": x,
            "y": y,
            "type": kind.into(),
        }))
    }

    /// Display name, if the record carries one
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Node type (`room`, `entrance`, ...), if the record carries one
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Map coordinates, if both `x` and `y` are numeric
    pub fn position(&self) -> Option<(f64, f64)> {
        let x = self.0.get("x").and_then(Value::as_f64)?;
        let y = self.0.get("y").and_then(Value::as_f64)?;
        Some((x, y))
    }

    /// The raw JSON payload
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for NodeRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// A weighted directed graph of waypoints
///
/// `edges` maps a source id to its neighbors and the non-negative weight of
/// each connection. An undirected path is two entries, one per direction.
/// Neighbors are not required to exist in `nodes`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    nodes: BTreeMap<String, NodeRecord>,
    #[serde(default)]
    edges: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from its node and adjacency maps
    pub fn from_parts(
        nodes: BTreeMap<String, NodeRecord>,
        edges: BTreeMap<String, BTreeMap<String, f64>>,
    ) -> Self {
        Self { nodes, edges }
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Get a node record by ID
    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }

    /// Iterate over all nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeRecord)> {
        self.nodes.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Iterate over every directed edge as `(from, to, weight)`
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.edges.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(to, weight)| (from.as_str(), to.as_str(), *weight))
        })
    }

    /// Iterate over the outgoing edges of a node
    pub fn neighbors<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.edges
            .get(id)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, weight)| (to.as_str(), *weight)))
    }

    /// Weight of the edge `from -> to`, if present
    pub fn weight(&self, from: &str, to: &str) -> Option<f64> {
        self.edges.get(from).and_then(|targets| targets.get(to)).copied()
    }

    /// Insert or replace a node record, returning the previous one
    pub fn insert_node(&mut self, id: impl Into<String>, record: NodeRecord) -> Option<NodeRecord> {
        self.nodes.insert(id.into(), record)
    }

    /// Remove a node record without touching edges
    pub fn remove_node_record(&mut self, id: &str) -> Option<NodeRecord> {
        self.nodes.remove(id)
    }

    /// Insert or replace the directed edge `from -> to`
    pub fn set_edge(&mut self, from: impl Into<String>, to: impl Into<String>, weight: f64) {
        self.edges
            .entry(from.into())
            .or_default()
            .insert(to.into(), weight);
    }

    /// Remove the directed edge `from -> to`, returning its weight
    ///
    /// A source left with no neighbors is dropped from the adjacency map.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> Option<f64> {
        let targets = self.edges.get_mut(from)?;
        let weight = targets.remove(to);
        if targets.is_empty() {
            self.edges.remove(from);
        }
        weight
    }

    /// Remove every outgoing edge of `id`
    pub fn remove_outgoing(&mut self, id: &str) -> usize {
        self.edges.remove(id).map_or(0, |targets| targets.len())
    }

    /// Source ids present in the adjacency map
    pub fn edge_sources(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of directed edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Returns true if the graph has neither nodes nor edges
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// A shortest path through a single graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Node ids from start to end, inclusive
    pub path: Vec<String>,
    /// Sum of the edge weights along `path`
    pub distance: f64,
    /// Node records for each id in `path`, in path order
    pub nodes: Vec<NodeRecord>,
}

impl Route {
    /// Number of edges traversed
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// First id of the path
    pub fn start(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }

    /// Last id of the path
    pub fn end(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}
