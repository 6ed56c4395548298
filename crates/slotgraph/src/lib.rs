//! # slotgraph
//!
//! An id-indexed directed multigraph store with concurrent insertion and BFS/DFS traversal.
//!
//! ## Core Principles
//!
//! - **Stable Ids**: an id names one vertex or edge forever and is never reused
//! - **Cheap Inserts**: ids come from an atomic counter; only storage growth takes a lock
//! - **Explicit Ownership**: metadata disposal is fixed by a [`MetadataPolicy`] at construction
//! - **Fail Fast**: every failure is a returned error, never a panic
//!
//! ## Architecture
//!
//! ```text
//! Traversal (BFS, DFS)
//!     ↓
//! Graph Store (vertices, edges, adjacency, degrees)
//!     ↓
//! Slot Arena (id -> slot, growth by doubling)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use slotgraph::Graph;
//!
//! # fn example() -> slotgraph::Result<()> {
//! let graph: Graph<&str, ()> = Graph::new(16);
//! let a = graph.add_vertex("a")?;
//! let b = graph.add_vertex("b")?;
//! graph.add_edge(a, b, ())?;
//!
//! assert_eq!(graph.bfs(a)?, vec![a, b]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod arena;
pub mod bitset;
pub mod config;
pub mod error;
pub mod graph;

// Re-export main types
pub use arena::SlotArena;
pub use bitset::BitSet;
pub use config::{GraphConfig, MetadataPolicy};
pub use error::{EntityKind, GraphError, Result};
pub use graph::{Edge, EdgeId, Graph, GraphStats, Reclaimed, Vertex, VertexId};
