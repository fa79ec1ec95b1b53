//! Navigator configuration
//!
//! Values come from, in increasing precedence: built-in defaults, a JSON
//! config file, the environment, and explicit overrides from the caller.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::NavError;

/// Environment variable overriding [`NavigatorConfig::data_dir`]
pub const DATA_DIR_ENV: &str = "WAYFINDER_DATA_DIR";

/// Settings for the graph store and the routing dispatcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigatorConfig {
    /// Directory holding one `<name>_nodes.json` document per graph
    pub data_dir: PathBuf,
    /// Logical name of the campus graph
    pub campus: String,
    /// Building codes, in dispatch order; each maps to graph `building_<code>`
    pub buildings: Vec<String>,
    /// Substring marking entrance waypoints
    pub entrance_marker: String,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            campus: "campus".to_string(),
            buildings: ["A", "B", "C", "AD"].iter().map(|c| c.to_string()).collect(),
            entrance_marker: "_entrance".to_string(),
        }
    }
}

impl NavigatorConfig {
    /// Create a configuration with defaults rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Read a JSON config file; omitted fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, NavError> {
        let content = fs::read_to_string(path).map_err(|e| {
            NavError::config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            NavError::config(format!("cannot parse '{}': {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                debug!(data_dir = %dir, "Using data directory from environment");
                self.data_dir = PathBuf::from(dir);
            }
        }
        self
    }

    /// Graph name for a building code
    pub fn building_graph_name(code: &str) -> String {
        format!("building_{}", code)
    }

    /// Names of every graph the dispatcher routes over, campus first
    pub fn graph_names(&self) -> Vec<String> {
        std::iter::once(self.campus.clone())
            .chain(self.buildings.iter().map(|c| Self::building_graph_name(c)))
            .collect()
    }

    /// Check names and codes for values the store cannot address
    pub fn validate(&self) -> Result<(), NavError> {
        if !is_identifier(&self.campus) {
            return Err(NavError::config(format!(
                "invalid campus graph name {:?}",
                self.campus
            )));
        }
        for (i, code) in self.buildings.iter().enumerate() {
            if !is_identifier(code) {
                return Err(NavError::config(format!("invalid building code {:?}", code)));
            }
            if self.buildings[..i].contains(code) {
                return Err(NavError::config(format!("duplicate building code {:?}", code)));
            }
        }
        if self.entrance_marker.is_empty() {
            return Err(NavError::config("entrance marker must not be empty"));
        }
        Ok(())
    }
}

/// `^[A-Za-z0-9_-]+$`
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
