//! Error types for slotgraph operations.
//!
//! All fallible operations return [`Result<T>`]. Pure lookups return `Option` instead.

use thiserror::Error;

/// Result type alias for slotgraph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Which arena an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Vertex arena
    Vertex,
    /// Edge arena
    Edge,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Vertex => write!(f, "vertex"),
            EntityKind::Edge => write!(f, "edge"),
        }
    }
}

/// Error type for all graph operations.
///
/// Nothing is retried internally; every failure is surfaced to the caller as-is.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The id is beyond the high-water mark or its slot is empty
    #[error("Vertex not found: {vertex_id}")]
    VertexNotFound {
        /// ID of the missing vertex
        vertex_id: u32,
    },

    /// The id is beyond the high-water mark or its slot is empty
    #[error("Edge not found: {edge_id}")]
    EdgeNotFound {
        /// ID of the missing edge
        edge_id: u32,
    },

    /// Explicit-id insertion hit an occupied slot
    #[error("Slot already occupied: {kind} {id}")]
    SlotOccupied {
        /// Arena the collision happened in
        kind: EntityKind,
        /// The colliding id
        id: u32,
    },

    /// Storage growth could not be allocated
    #[error("Out of memory: failed to grow storage to {requested} slots")]
    OutOfMemory {
        /// Slot count that was requested
        requested: usize,
    },

    /// The 32-bit id counter cannot advance any further
    #[error("Id space exhausted for {kind} arena")]
    IdSpaceExhausted {
        /// Arena whose counter is exhausted
        kind: EntityKind,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Detailed error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GraphError {
    /// Create a configuration error from a message and optional source.
    pub fn config<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }
}
