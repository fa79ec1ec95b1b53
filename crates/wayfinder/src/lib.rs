//! Wayfinder - shortest-path routing over campus and building graphs
//!
//! Waypoints and the paths between them are stored as one weighted,
//! directed graph per area: a campus graph plus one graph per building.
//! A query names two waypoints; the dispatcher picks the one graph that
//! holds both and Dijkstra's algorithm finds the shortest path through it.
//!
//! # Quick Start
//!
//! ```rust
//! use wayfinder::prelude::*;
//!
//! let mut campus = Graph::new();
//! campus.insert_node("main_gate", NodeRecord::waypoint("Main Gate", 0.0, 0.0, "entrance"));
//! campus.insert_node("library", NodeRecord::waypoint("Library", 120.0, 0.0, "building"));
//! connect(&mut campus, "main_gate", "library", 120.0).unwrap();
//!
//! let table = RouteTable::new(campus);
//! let route = table.route("main_gate", "library").unwrap();
//! assert_eq!(route.path, vec!["main_gate", "library"]);
//! assert_eq!(route.distance, 120.0);
//! ```
//!
//! # Persistent graphs
//!
//! ```rust,no_run
//! use wayfinder::prelude::*;
//!
//! let navigator = Navigator::open(NavigatorConfig::with_data_dir("data")).unwrap();
//! let response = navigator.answer(Some("main_gate"), Some("library"));
//! println!("{}", serde_json::to_string(&response).unwrap());
//! ```

pub mod core;
pub mod dispatch;
pub mod editor;
pub mod engine;
pub mod navigator;
pub mod query;
pub mod store;

pub use crate::core::*;
pub use dispatch::{route, select_graph, GraphKey, RouteTable};
pub use engine::shortest_path;
pub use navigator::{Navigator, Waypoint};
pub use query::{RouteQuery, RouteResponse};
pub use store::{FsGraphStore, GraphStore, LoadStatus, MemoryGraphStore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{Graph, NavError, NavigatorConfig, NodeRecord, Route};
    pub use crate::dispatch::{select_graph, GraphKey, RouteTable};
    pub use crate::editor::{check_graph, connect, disconnect, remove_node, GraphReport};
    pub use crate::engine::shortest_path;
    pub use crate::navigator::Navigator;
    pub use crate::query::{RouteQuery, RouteResponse};
    pub use crate::store::{FsGraphStore, GraphStore, LoadStatus, MemoryGraphStore};
}
