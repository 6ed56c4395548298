//! Graph construction settings.

use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Who owns vertex and edge metadata when the graph is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataPolicy {
    /// [`Graph::destroy`](crate::Graph::destroy) hands live metadata back to the caller
    #[default]
    CallerOwned,
    /// Live metadata is dropped together with the graph
    GraphOwned,
}

/// Configuration for a [`Graph`](crate::Graph).
///
/// Capacities are hints: every store doubles on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Initial slot count of the vertex arena
    pub vertex_capacity: usize,

    /// Initial slot count of the edge arena
    pub edge_capacity: usize,

    /// Initial capacity of each vertex's outgoing edge list
    pub adjacency_capacity: usize,

    /// Metadata disposal at teardown
    pub metadata_policy: MetadataPolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            vertex_capacity: 16,
            edge_capacity: 16,
            adjacency_capacity: 16,
            metadata_policy: MetadataPolicy::CallerOwned,
        }
    }
}

impl GraphConfig {
    /// Config with both arenas pre-sized to `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertex_capacity: capacity,
            edge_capacity: capacity,
            ..Default::default()
        }
    }

    /// Set the metadata policy.
    pub fn metadata_policy(mut self, policy: MetadataPolicy) -> Self {
        self.metadata_policy = policy;
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GraphError::config("Failed to parse graph config", Some(e)))
    }

    /// Load a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GraphError::config(format!("Failed to read config {}", path.display()), Some(e))
        })?;
        Self::from_json_str(&contents)
    }
}
