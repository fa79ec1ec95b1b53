//! Graph persistence
//!
//! A [`GraphStore`] maps logical graph names to graph documents. Loading is
//! lenient: a missing, empty or unparsable document yields an empty graph,
//! which is written back so the next load finds a valid document. Saving is
//! strict and atomic: the new document is written to a temporary file in
//! the data directory and renamed over the old one, so a concurrent reader
//! sees either the old or the new content and never a truncated file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, span, trace, warn, Level};

use crate::core::{Graph, NavError};

/// Suffix of graph documents in a data directory
pub const DOCUMENT_SUFFIX: &str = "_nodes.json";

/// How a graph came back from [`GraphStore::load_with_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The stored document was read as-is
    Existing,
    /// No document existed; an empty one was created
    Created,
    /// The document was empty or malformed and was replaced by an empty one
    Recovered,
}

/// Storage backend for named graphs
pub trait GraphStore: Send + Sync {
    /// Load a graph, reporting whether the default had to be substituted
    fn load_with_status(&self, name: &str) -> (Graph, LoadStatus);

    /// Overwrite the stored graph atomically
    fn save(&self, name: &str, graph: &Graph) -> Result<(), NavError>;

    /// Check if a document exists for `name`
    fn exists(&self, name: &str) -> bool;

    /// Names of all stored graphs, sorted
    fn names(&self) -> Vec<String>;

    /// Load a graph; never fails
    fn load(&self, name: &str) -> Graph {
        self.load_with_status(name).0
    }
}

/// Graph store backed by JSON documents in a directory
#[derive(Debug, Clone)]
pub struct FsGraphStore {
    data_dir: PathBuf,
}

impl FsGraphStore {
    /// Create a store rooted at `data_dir`; the directory is created on first write
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the document backing `name`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}", name, DOCUMENT_SUFFIX))
    }

    /// Persist the empty default after a failed load; write errors are only logged
    fn materialize_default(&self, name: &str) -> Graph {
        let graph = Graph::new();
        if let Err(e) = self.save(name, &graph) {
            warn!(graph = name, error = %e, "Could not persist default graph");
        }
        graph
    }

    fn write_atomically(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl GraphStore for FsGraphStore {
    fn load_with_status(&self, name: &str) -> (Graph, LoadStatus) {
        let load_span = span!(Level::DEBUG, "load_graph", graph = name);
        let _enter = load_span.enter();

        let path = self.path_for(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(graph = name, path = %path.display(), "Graph document missing, creating empty graph");
                return (self.materialize_default(name), LoadStatus::Created);
            }
            Err(e) => {
                warn!(graph = name, path = %path.display(), error = %e, "Graph document unreadable, using empty graph");
                return (self.materialize_default(name), LoadStatus::Recovered);
            }
        };

        if content.trim().is_empty() {
            warn!(graph = name, path = %path.display(), "Graph document empty, using empty graph");
            return (self.materialize_default(name), LoadStatus::Recovered);
        }

        match serde_json::from_str::<Graph>(&content) {
            Ok(graph) => {
                debug!(
                    graph = name,
                    node_count = graph.node_count(),
                    edge_count = graph.edge_count(),
                    "Graph loaded"
                );
                (graph, LoadStatus::Existing)
            }
            Err(e) => {
                warn!(graph = name, path = %path.display(), error = %e, "Graph document malformed, using empty graph");
                (self.materialize_default(name), LoadStatus::Recovered)
            }
        }
    }

    fn save(&self, name: &str, graph: &Graph) -> Result<(), NavError> {
        let save_span = span!(Level::DEBUG, "save_graph", graph = name);
        let _enter = save_span.enter();

        let mut bytes = serde_json::to_vec_pretty(graph)?;
        bytes.push(b'\n');

        let path = self.path_for(name);
        self.write_atomically(&path, &bytes)
            .map_err(|e| NavError::write_failure(name, e))?;

        debug!(
            graph = name,
            bytes = bytes.len(),
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            "Graph saved"
        );
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn names(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                trace!(error = %e, "Data directory not readable");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|file| file.strip_suffix(DOCUMENT_SUFFIX))
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        names
    }
}

/// In-process graph store
///
/// Holds graphs in memory behind a lock. A read-only instance rejects every
/// save with a permission error.
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    graphs: RwLock<BTreeMap<String, Graph>>,
    read_only: bool,
}

impl MemoryGraphStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose saves always fail
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Seed a graph without going through `save`
    pub fn with_graph(self, name: impl Into<String>, graph: Graph) -> Self {
        self.graphs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.into(), graph);
        self
    }
}

impl GraphStore for MemoryGraphStore {
    fn load_with_status(&self, name: &str) -> (Graph, LoadStatus) {
        if let Some(graph) = self
            .graphs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
        {
            return (graph.clone(), LoadStatus::Existing);
        }

        let graph = Graph::new();
        if !self.read_only {
            self.graphs
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .insert(name.to_string(), graph.clone());
        }
        (graph, LoadStatus::Created)
    }

    fn save(&self, name: &str, graph: &Graph) -> Result<(), NavError> {
        if self.read_only {
            return Err(NavError::write_failure(
                name,
                io::Error::new(io::ErrorKind::PermissionDenied, "store is read-only"),
            ));
        }
        self.graphs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), graph.clone());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.graphs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        self.graphs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}
