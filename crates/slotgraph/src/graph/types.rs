//! Core graph types: vertices, edges and ids.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Stable identifier of a vertex (never reused after removal).
pub type VertexId = u32;

/// Stable identifier of an edge (never reused after removal).
pub type EdgeId = u32;

/// A vertex in the graph.
///
/// Degrees and the outgoing edge list are updated in place while the vertex is shared,
/// so they are read through accessors.
pub struct Vertex<V> {
    id: VertexId,
    in_degree: AtomicU32,
    // Its length is the out-degree.
    outgoing: Mutex<Vec<EdgeId>>,
    metadata: V,
}

impl<V> Vertex<V> {
    pub(crate) fn new(id: VertexId, metadata: V, adjacency_capacity: usize) -> Self {
        Self {
            id,
            in_degree: AtomicU32::new(0),
            outgoing: Mutex::new(Vec::with_capacity(adjacency_capacity)),
            metadata,
        }
    }

    /// Assigned id.
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Number of live edges ending at this vertex.
    pub fn in_degree(&self) -> u32 {
        self.in_degree.load(Ordering::Acquire)
    }

    /// Number of live edges starting at this vertex.
    pub fn out_degree(&self) -> u32 {
        self.outgoing.lock().len() as u32
    }

    /// Snapshot of the outgoing edge ids.
    ///
    /// Order is not stable: removals compact the list by swapping in the last entry.
    pub fn outgoing(&self) -> Vec<EdgeId> {
        self.outgoing.lock().clone()
    }

    /// Caller-supplied metadata.
    pub fn metadata(&self) -> &V {
        &self.metadata
    }

    /// Take the metadata back out of a detached vertex.
    pub fn into_metadata(self) -> V {
        self.metadata
    }

    pub(crate) fn push_outgoing(&self, edge_id: EdgeId) {
        let mut outgoing = self.outgoing.lock();
        if outgoing.len() == outgoing.capacity() {
            let additional = outgoing.capacity().max(1);
            outgoing.reserve_exact(additional);
        }
        outgoing.push(edge_id);
    }

    /// Swap-with-last removal. Returns `false` if `edge_id` was not listed.
    pub(crate) fn remove_outgoing(&self, edge_id: EdgeId) -> bool {
        let mut outgoing = self.outgoing.lock();
        match outgoing.iter().position(|&e| e == edge_id) {
            Some(index) => {
                outgoing.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn increment_in_degree(&self) {
        self.in_degree.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn decrement_in_degree(&self) {
        // Saturate rather than wrap if removals race with each other.
        let _ = self
            .in_degree
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |d| d.checked_sub(1));
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Vertex<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vertex")
            .field("id", &self.id)
            .field("in_degree", &self.in_degree())
            .field("outgoing", &*self.outgoing.lock())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// A directed edge between two vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<E> {
    /// Assigned id
    pub id: EdgeId,
    /// Source vertex id
    pub src: VertexId,
    /// Destination vertex id
    pub dest: VertexId,
    /// Caller-supplied metadata
    pub metadata: E,
}

impl<E> Edge<E> {
    /// Create a new edge (ID will be assigned by graph).
    pub fn new(id: EdgeId, src: VertexId, dest: VertexId, metadata: E) -> Self {
        Self {
            id,
            src,
            dest,
            metadata,
        }
    }

    /// Whether `vertex` is either endpoint.
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.src == vertex || self.dest == vertex
    }
}

/// Counters describing a graph at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Live vertices
    pub num_vertices: usize,
    /// Live edges
    pub num_edges: usize,
    /// One past the largest vertex id ever assigned
    pub vertex_high_water: u32,
    /// One past the largest edge id ever assigned
    pub edge_high_water: u32,
}
