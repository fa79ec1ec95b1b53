//! Graph selection and routing
//!
//! A [`RouteTable`] holds the campus graph and an ordered table of building
//! graphs. [`select_graph`] decides which single graph answers a query;
//! routing never merges graphs or transfers between them.

use std::fmt;

use tracing::{debug, info, span, Level};

use crate::core::{Graph, Route};
use crate::engine::shortest_path;

/// Default substring marking entrance waypoints
pub const DEFAULT_ENTRANCE_MARKER: &str = "_entrance";

/// Identifies one graph of a [`RouteTable`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphKey {
    /// The campus graph
    Campus,
    /// The graph of the building with this code
    Building(String),
}

impl fmt::Display for GraphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKey::Campus => write!(f, "campus"),
            GraphKey::Building(code) => write!(f, "building_{}", code),
        }
    }
}

#[derive(Debug, Clone)]
struct BuildingGraph {
    code: String,
    prefix: String,
    graph: Graph,
}

/// The set of graphs a query may be answered from
#[derive(Debug, Clone)]
pub struct RouteTable {
    campus: Graph,
    buildings: Vec<BuildingGraph>,
    entrance_marker: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(Graph::new())
    }
}

impl RouteTable {
    /// Create a table with only a campus graph
    pub fn new(campus: Graph) -> Self {
        Self {
            campus,
            buildings: Vec::new(),
            entrance_marker: DEFAULT_ENTRANCE_MARKER.to_string(),
        }
    }

    /// Add a building graph; buildings are consulted in insertion order
    ///
    /// Adding a code twice replaces the earlier graph in place.
    pub fn with_building(mut self, code: impl Into<String>, graph: Graph) -> Self {
        self.insert_building(code, graph);
        self
    }

    /// Use a different entrance marker
    pub fn with_entrance_marker(mut self, marker: impl Into<String>) -> Self {
        self.entrance_marker = marker.into();
        self
    }

    fn insert_building(&mut self, code: impl Into<String>, graph: Graph) {
        let code = code.into();
        if let Some(existing) = self.buildings.iter_mut().find(|b| b.code == code) {
            existing.graph = graph;
            return;
        }
        self.buildings.push(BuildingGraph {
            prefix: format!("building_{}_", code),
            code,
            graph,
        });
    }

    /// The campus graph
    pub fn campus(&self) -> &Graph {
        &self.campus
    }

    /// The graph of one building
    pub fn building(&self, code: &str) -> Option<&Graph> {
        self.buildings
            .iter()
            .find(|b| b.code == code)
            .map(|b| &b.graph)
    }

    /// Building codes in dispatch order
    pub fn building_codes(&self) -> impl Iterator<Item = &str> {
        self.buildings.iter().map(|b| b.code.as_str())
    }

    /// The entrance marker in use
    pub fn entrance_marker(&self) -> &str {
        &self.entrance_marker
    }

    /// Look up a graph by key
    pub fn graph(&self, key: &GraphKey) -> Option<&Graph> {
        match key {
            GraphKey::Campus => Some(&self.campus),
            GraphKey::Building(code) => self.building(code),
        }
    }

    /// Replace the graph behind `key`, adding the building if it is new
    pub fn replace(&mut self, key: &GraphKey, graph: Graph) {
        match key {
            GraphKey::Campus => self.campus = graph,
            GraphKey::Building(code) => self.insert_building(code.as_str(), graph),
        }
    }

    /// Route between two waypoints; see [`select_graph`] for the policy
    pub fn route(&self, start: &str, end: &str) -> Option<Route> {
        route(self, start, end)
    }
}

/// Choose the graph that answers a query from `start` to `end`
///
/// First match wins:
/// 1. both ids are campus nodes: campus;
/// 2. both ids carry the prefix `building_<code>_` of the same building and
///    are nodes of its graph: that building;
/// 3. both ids contain the entrance marker: campus;
/// 4. otherwise none, which covers every cross-graph query.
pub fn select_graph(table: &RouteTable, start: &str, end: &str) -> Option<GraphKey> {
    if table.campus.has_node(start) && table.campus.has_node(end) {
        return Some(GraphKey::Campus);
    }

    for building in &table.buildings {
        if start.starts_with(&building.prefix)
            && end.starts_with(&building.prefix)
            && building.graph.has_node(start)
            && building.graph.has_node(end)
        {
            return Some(GraphKey::Building(building.code.clone()));
        }
    }

    if start.contains(&table.entrance_marker) && end.contains(&table.entrance_marker) {
        return Some(GraphKey::Campus);
    }

    None
}

/// Select a graph and search it
pub fn route(table: &RouteTable, start: &str, end: &str) -> Option<Route> {
    let route_span = span!(Level::INFO, "route", start, end);
    let _enter = route_span.enter();

    let Some(key) = select_graph(table, start, end) else {
        info!("No graph holds both endpoints");
        return None;
    };
    debug!(graph = %key, "Selected graph");

    let graph = table.graph(&key)?;
    let result = shortest_path(graph, start, end);
    match &result {
        Some(route) => info!(graph = %key, hops = route.hops(), distance = route.distance, "Route found"),
        None => info!(graph = %key, "No path found"),
    }
    result
}
