//! Core graph types and operations.
//!
//! This module defines the fundamental building blocks:
//! - [`Vertex`] and [`Edge`]: entries stored under stable ids
//! - [`Graph`]: the concurrent graph store
//! - [`algorithms`]: breadth-first and depth-first traversal

mod types;
mod store;
pub mod algorithms;

pub use types::{Edge, EdgeId, GraphStats, Vertex, VertexId};
pub use store::{Graph, Reclaimed};
