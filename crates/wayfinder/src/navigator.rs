//! Routing service
//!
//! A [`Navigator`] is built once at startup. It loads the campus graph and
//! every configured building graph from its store, answers routing queries
//! from memory, and is the save path for map edits: a saved graph is
//! persisted first and only then swapped into the routing table.

use serde::Serialize;
use tracing::{info, span, warn, Level};

use crate::core::{Graph, NavError, NavigatorConfig, Route};
use crate::dispatch::{GraphKey, RouteTable};
use crate::editor::{check_graph, validate_graph_name};
use crate::query::{RouteQuery, RouteResponse};
use crate::store::{FsGraphStore, GraphStore, LoadStatus};

/// A routable waypoint as listed to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Waypoint {
    pub id: String,
    pub name: Option<String>,
}

/// Owns the graph store and the in-memory routing table
#[derive(Debug)]
pub struct Navigator<S: GraphStore = FsGraphStore> {
    config: NavigatorConfig,
    store: S,
    table: RouteTable,
    load_statuses: Vec<(String, LoadStatus)>,
}

impl Navigator<FsGraphStore> {
    /// Open the JSON documents under `config.data_dir`
    pub fn open(config: NavigatorConfig) -> Result<Self, NavError> {
        let store = FsGraphStore::new(config.data_dir.clone());
        Self::with_store(config, store)
    }
}

impl<S: GraphStore> Navigator<S> {
    /// Load every routed graph from `store`
    ///
    /// Missing or malformed documents load as empty graphs; only an invalid
    /// configuration fails.
    pub fn with_store(config: NavigatorConfig, store: S) -> Result<Self, NavError> {
        config.validate()?;

        let init_span = span!(Level::INFO, "navigator_init", buildings = config.buildings.len());
        let _enter = init_span.enter();

        let mut load_statuses = Vec::with_capacity(config.buildings.len() + 1);

        let (campus, status) = store.load_with_status(&config.campus);
        load_statuses.push((config.campus.clone(), status));

        let mut table = RouteTable::new(campus).with_entrance_marker(config.entrance_marker.clone());
        for code in &config.buildings {
            let name = NavigatorConfig::building_graph_name(code);
            let (graph, status) = store.load_with_status(&name);
            load_statuses.push((name, status));
            table = table.with_building(code.clone(), graph);
        }

        for (name, status) in &load_statuses {
            if *status == LoadStatus::Recovered {
                warn!(graph = %name, "Graph replaced by an empty default");
            }
        }
        info!(graphs = load_statuses.len(), "Navigator ready");

        Ok(Self {
            config,
            store,
            table,
            load_statuses,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The in-memory routing table
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// How each routed graph was loaded at startup, campus first
    pub fn load_statuses(&self) -> &[(String, LoadStatus)] {
        &self.load_statuses
    }

    /// Find a route between two waypoints
    pub fn route(&self, start: &str, end: &str) -> Option<Route> {
        self.table.route(start, end)
    }

    /// Answer a raw query the way the web layer expects
    pub fn answer(&self, start: Option<&str>, end: Option<&str>) -> RouteResponse {
        match RouteQuery::from_params(start, end) {
            Ok(query) => RouteResponse::from_route(self.route(&query.start, &query.end)),
            Err(_) => RouteResponse::bad_request(RouteResponse::MISSING_PARAMS),
        }
    }

    /// Routing key for a store name, if the name is routed
    pub fn key_for_name(&self, name: &str) -> Option<GraphKey> {
        if name == self.config.campus {
            return Some(GraphKey::Campus);
        }
        let code = name.strip_prefix("building_")?;
        self.config
            .buildings
            .iter()
            .any(|c| c == code)
            .then(|| GraphKey::Building(code.to_string()))
    }

    /// Store name for a routing key
    pub fn name_for_key(&self, key: &GraphKey) -> String {
        match key {
            GraphKey::Campus => self.config.campus.clone(),
            GraphKey::Building(code) => NavigatorConfig::building_graph_name(code),
        }
    }

    /// Names of the routed graphs, campus first
    pub fn graph_names(&self) -> Vec<String> {
        self.config.graph_names()
    }

    /// Read a graph for editing
    ///
    /// Routed graphs come from memory; any other name must already be stored.
    /// Reading never creates a document.
    pub fn load_graph(&self, name: &str) -> Result<Graph, NavError> {
        let name = validate_graph_name(name)?;
        if let Some(graph) = self.key_for_name(name).and_then(|key| self.table.graph(&key)) {
            return Ok(graph.clone());
        }
        if !self.store.exists(name) {
            return Err(NavError::unknown_graph(name));
        }
        Ok(self.store.load(name))
    }

    /// Persist a graph and, if it is routed, make later routes use it
    ///
    /// Graphs with negative edge weights are refused before anything is written.
    pub fn save_graph(&mut self, name: &str, graph: Graph) -> Result<(), NavError> {
        let name = validate_graph_name(name)?.to_string();
        let save_span = span!(Level::INFO, "save_graph", graph = %name);
        let _enter = save_span.enter();

        let negative = check_graph(&graph).negative_weights.len();
        if negative > 0 {
            return Err(NavError::invalid_input(format!(
                "graph '{}' has {} edge(s) with a negative weight",
                name, negative
            )));
        }

        self.store.save(&name, &graph)?;
        if let Some(key) = self.key_for_name(&name) {
            self.table.replace(&key, graph);
            info!(key = %key, "Routing table updated");
        }
        Ok(())
    }

    /// Waypoints of a graph sorted by id
    pub fn waypoints(&self, name: &str) -> Result<Vec<Waypoint>, NavError> {
        let graph = self.load_graph(name)?;
        Ok(graph
            .nodes()
            .map(|(id, record)| Waypoint {
                id: id.to_string(),
                name: record.name().map(str::to_string),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeRecord;
    use crate::editor::connect;
    use crate::store::MemoryGraphStore;

    fn campus() -> Graph {
        let mut graph = Graph::new();
        graph.insert_node("main_gate", NodeRecord::waypoint("Main Gate", 0.0, 0.0, "entrance"));
        graph.insert_node("library", NodeRecord::waypoint("Library", 120.0, 0.0, "building"));
        connect(&mut graph, "main_gate", "library", 120.0).unwrap();
        graph
    }

    #[test]
    fn test_loads_every_routed_graph() {
        let store = MemoryGraphStore::new().with_graph("campus", campus());
        let nav = Navigator::with_store(NavigatorConfig::default(), store).unwrap();

        let statuses = nav.load_statuses();
        assert_eq!(statuses.len(), 5);
        assert_eq!(statuses[0], ("campus".to_string(), LoadStatus::Existing));
        assert!(statuses[1..].iter().all(|(_, s)| *s == LoadStatus::Created));
        assert!(nav.store().exists("building_AD"));
    }

    #[test]
    fn test_answer() {
        let store = MemoryGraphStore::new().with_graph("campus", campus());
        let nav = Navigator::with_store(NavigatorConfig::default(), store).unwrap();

        let found = nav.answer(Some("main_gate"), Some("library"));
        assert_eq!(found.status_code(), 200);
        assert_eq!(nav.answer(Some("main_gate"), Some("gym")).status_code(), 404);
        assert_eq!(nav.answer(None, Some("library")).status_code(), 400);
    }

    #[test]
    fn test_save_updates_routing() {
        let store = MemoryGraphStore::new();
        let mut nav = Navigator::with_store(NavigatorConfig::default(), store).unwrap();
        assert!(nav.route("main_gate", "library").is_none());

        nav.save_graph("campus", campus()).unwrap();
        assert_eq!(nav.route("main_gate", "library").unwrap().distance, 120.0);
        assert_eq!(nav.store().load("campus"), campus());
    }

    #[test]
    fn test_save_failure_leaves_routing_untouched() {
        let mut nav =
            Navigator::with_store(NavigatorConfig::default(), MemoryGraphStore::read_only()).unwrap();

        let err = nav.save_graph("campus", campus()).unwrap_err();
        assert!(matches!(err, NavError::WriteFailure { .. }));
        assert!(nav.route("main_gate", "library").is_none());
    }

    #[test]
    fn test_save_unrouted_graph() {
        let mut nav =
            Navigator::with_store(NavigatorConfig::default(), MemoryGraphStore::new()).unwrap();
        nav.save_graph("building_Z", campus()).unwrap();

        assert_eq!(nav.key_for_name("building_Z"), None);
        assert_eq!(nav.load_graph("building_Z").unwrap(), campus());
        assert!(nav.route("main_gate", "library").is_none());
    }

    #[test]
    fn test_save_refuses_negative_weights() {
        let store = MemoryGraphStore::new().with_graph("campus", campus());
        let mut nav = Navigator::with_store(NavigatorConfig::default(), store).unwrap();

        let mut bad = campus();
        bad.set_edge("library", "main_gate", -1.0);
        let err = nav.save_graph("campus", bad).unwrap_err();
        assert!(matches!(err, NavError::InvalidInput { .. }));
        assert_eq!(nav.store().load("campus"), campus());
        assert_eq!(nav.route("main_gate", "library").unwrap().distance, 120.0);
    }

    #[test]
    fn test_loading_unknown_graph_does_not_create_it() {
        let nav =
            Navigator::with_store(NavigatorConfig::default(), MemoryGraphStore::new()).unwrap();

        let err = nav.load_graph("typo").unwrap_err();
        assert!(matches!(err, NavError::UnknownGraph { .. }));
        assert!(nav.waypoints("typo").is_err());
        assert!(!nav.store().exists("typo"));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let mut nav =
            Navigator::with_store(NavigatorConfig::default(), MemoryGraphStore::new()).unwrap();
        assert!(nav.save_graph("../campus", Graph::new()).is_err());
        assert!(nav.load_graph("a b").is_err());
    }

    #[test]
    fn test_key_mapping() {
        let nav =
            Navigator::with_store(NavigatorConfig::default(), MemoryGraphStore::new()).unwrap();
        assert_eq!(nav.key_for_name("campus"), Some(GraphKey::Campus));
        assert_eq!(
            nav.key_for_name("building_AD"),
            Some(GraphKey::Building("AD".to_string()))
        );
        assert_eq!(nav.key_for_name("building_"), None);
        assert_eq!(nav.name_for_key(&GraphKey::Building("B".into())), "building_B");
    }

    #[test]
    fn test_waypoints_sorted_by_id() {
        let store = MemoryGraphStore::new().with_graph("campus", campus());
        let nav = Navigator::with_store(NavigatorConfig::default(), store).unwrap();

        let waypoints = nav.waypoints("campus").unwrap();
        assert_eq!(
            waypoints,
            vec![
                Waypoint {
                    id: "library".into(),
                    name: Some("Library".into())
                },
                Waypoint {
                    id: "main_gate".into(),
                    name: Some("Main Gate".into())
                },
            ]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = NavigatorConfig {
            buildings: vec!["A".into(), "A".into()],
            ..Default::default()
        };
        assert!(Navigator::with_store(config, MemoryGraphStore::new()).is_err());
    }
}
