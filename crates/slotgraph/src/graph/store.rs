//! The graph store: vertex and edge arenas plus per-vertex adjacency.

use super::types::{Edge, EdgeId, GraphStats, Vertex, VertexId};
use crate::arena::SlotArena;
use crate::config::{GraphConfig, MetadataPolicy};
use crate::error::{EntityKind, GraphError, Result};
use log::{debug, trace, warn};
use std::sync::Arc;

/// A directed, metadata-bearing multigraph with stable ids.
///
/// All operations take `&self`, so a graph can be shared across threads. Insertions are
/// safe to run concurrently. Removals touching the same vertex or edge, and traversals,
/// need the caller to keep other writers away.
pub struct Graph<V = (), E = ()> {
    vertices: SlotArena<Vertex<V>>,
    edges: SlotArena<Edge<E>>,
    config: GraphConfig,
}

/// Metadata handed back by [`Graph::destroy`] under [`MetadataPolicy::CallerOwned`].
#[derive(Debug)]
pub struct Reclaimed<V, E> {
    /// Metadata of every vertex that was live at teardown
    pub vertices: Vec<(VertexId, V)>,
    /// Metadata of every edge that was live at teardown
    pub edges: Vec<(EdgeId, E)>,
}

impl<V, E> Default for Reclaimed<V, E> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<V, E> Graph<V, E> {
    /// Create an empty graph whose arenas start with `initial_capacity` slots.
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_config(GraphConfig::with_capacity(initial_capacity))
    }

    /// Create an empty graph from an explicit configuration.
    pub fn with_config(config: GraphConfig) -> Self {
        debug!(
            "Creating graph: vertex_capacity={}, edge_capacity={}, policy={:?}",
            config.vertex_capacity, config.edge_capacity, config.metadata_policy
        );
        Self {
            vertices: SlotArena::new(EntityKind::Vertex, config.vertex_capacity),
            edges: SlotArena::new(EntityKind::Edge, config.edge_capacity),
            config,
        }
    }

    /// The configuration this graph was built with.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // ===== Vertices =====

    /// Add a vertex under the next free id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::OutOfMemory`] if the arena cannot grow, or
    /// [`GraphError::IdSpaceExhausted`] once every 32-bit id has been handed out.
    pub fn add_vertex(&self, metadata: V) -> Result<VertexId> {
        let adjacency_capacity = self.config.adjacency_capacity;
        let id = self
            .vertices
            .add_with(|id| Vertex::new(id, metadata, adjacency_capacity))?;
        trace!("Added vertex {id}");
        Ok(id)
    }

    /// Add a vertex under a caller-chosen id.
    ///
    /// Mixing this with [`add_vertex`](Self::add_vertex) is legal; automatic ids continue
    /// above the largest explicit id.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SlotOccupied`] if a live vertex already has `id`.
    pub fn add_vertex_at(&self, id: VertexId, metadata: V) -> Result<()> {
        self.vertices
            .add_at(id, Vertex::new(id, metadata, self.config.adjacency_capacity))?;
        trace!("Added vertex {id} at explicit id");
        Ok(())
    }

    /// Add several vertices, returning their ids in input order.
    pub fn add_vertices_batch(&self, metadata: Vec<V>) -> Result<Vec<VertexId>> {
        debug!("Adding batch of {} vertices", metadata.len());
        metadata.into_iter().map(|m| self.add_vertex(m)).collect()
    }

    /// Look up a live vertex.
    pub fn get_vertex(&self, id: VertexId) -> Option<Arc<Vertex<V>>> {
        self.vertices.get(id)
    }

    /// Whether `id` names a live vertex.
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains(id)
    }

    /// Remove a vertex and every edge that starts or ends at it.
    ///
    /// Incident edges are found by scanning all live edges, so this costs O(E).
    /// The cascade is not transactional: edges already removed stay removed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if `id` is not live.
    pub fn remove_vertex(&self, id: VertexId) -> Result<Arc<Vertex<V>>> {
        if !self.vertices.contains(id) {
            return Err(GraphError::VertexNotFound { vertex_id: id });
        }

        let incident: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|edge| edge.touches(id))
            .map(|edge| edge.id)
            .collect();

        debug!("Removing vertex {id} with {} incident edges", incident.len());
        for edge_id in incident {
            match self.remove_edge(edge_id) {
                Ok(_) => {}
                // Already gone; a concurrent remover got there first.
                Err(GraphError::EdgeNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        self.vertices
            .remove(id)
            .ok_or(GraphError::VertexNotFound { vertex_id: id })
    }

    /// Outgoing destinations of `id`, one entry per edge (parallel edges repeat).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if `id` is not live.
    pub fn neighbors(&self, id: VertexId) -> Result<Vec<VertexId>> {
        let vertex = self
            .get_vertex(id)
            .ok_or(GraphError::VertexNotFound { vertex_id: id })?;
        Ok(vertex
            .outgoing()
            .into_iter()
            .filter_map(|edge_id| self.edges.get(edge_id))
            .map(|edge| edge.dest)
            .collect())
    }

    // ===== Edges =====

    /// Add a directed edge `src -> dest`.
    ///
    /// Both endpoints are validated once, here.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if either endpoint is not live.
    pub fn add_edge(&self, src: VertexId, dest: VertexId, metadata: E) -> Result<EdgeId> {
        let source = self
            .get_vertex(src)
            .ok_or(GraphError::VertexNotFound { vertex_id: src })?;
        let target = self
            .get_vertex(dest)
            .ok_or(GraphError::VertexNotFound { vertex_id: dest })?;

        let id = self
            .edges
            .add_with(|id| Edge::new(id, src, dest, metadata))?;

        source.push_outgoing(id);
        target.increment_in_degree();
        trace!("Added edge {id}: {src} -> {dest}");
        Ok(id)
    }

    /// Add several edges, returning their ids in input order.
    ///
    /// Every endpoint is checked before any edge is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] for the first dead endpoint; nothing is
    /// inserted in that case.
    pub fn add_edges_batch(&self, edges: Vec<(VertexId, VertexId, E)>) -> Result<Vec<EdgeId>> {
        debug!("Adding batch of {} edges", edges.len());
        for (src, dest, _) in &edges {
            for endpoint in [*src, *dest] {
                if !self.contains_vertex(endpoint) {
                    return Err(GraphError::VertexNotFound {
                        vertex_id: endpoint,
                    });
                }
            }
        }
        edges
            .into_iter()
            .map(|(src, dest, metadata)| self.add_edge(src, dest, metadata))
            .collect()
    }

    /// Look up a live edge.
    pub fn get_edge(&self, id: EdgeId) -> Option<Arc<Edge<E>>> {
        self.edges.get(id)
    }

    /// Whether `id` names a live edge.
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(id)
    }

    /// Remove an edge and detach it from its endpoints.
    ///
    /// The source's outgoing list is compacted by swapping in its last entry, so the
    /// remaining order changes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeNotFound`] if `id` is not live.
    pub fn remove_edge(&self, id: EdgeId) -> Result<Arc<Edge<E>>> {
        let edge = self
            .edges
            .remove(id)
            .ok_or(GraphError::EdgeNotFound { edge_id: id })?;

        if let Some(source) = self.vertices.get(edge.src) {
            source.remove_outgoing(id);
        }
        if let Some(target) = self.vertices.get(edge.dest) {
            target.decrement_in_degree();
        }
        trace!("Removed edge {id}: {} -> {}", edge.src, edge.dest);
        Ok(edge)
    }

    /// Ids of every live edge from `src` to `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if either endpoint is not live.
    pub fn edges_between(&self, src: VertexId, dest: VertexId) -> Result<Vec<EdgeId>> {
        let source = self
            .get_vertex(src)
            .ok_or(GraphError::VertexNotFound { vertex_id: src })?;
        if !self.contains_vertex(dest) {
            return Err(GraphError::VertexNotFound { vertex_id: dest });
        }
        Ok(source
            .outgoing()
            .into_iter()
            .filter(|&edge_id| {
                self.edges
                    .get(edge_id)
                    .is_some_and(|edge| edge.dest == dest)
            })
            .collect())
    }

    // ===== Iteration and counters =====

    /// Live vertices in id order, skipping removed ids.
    pub fn vertices(&self) -> impl Iterator<Item = Arc<Vertex<V>>> + '_ {
        self.vertices.iter()
    }

    /// Ids of live vertices in ascending order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().map(|v| v.id())
    }

    /// Live edges in id order, skipping removed ids.
    pub fn edges(&self) -> impl Iterator<Item = Arc<Edge<E>>> + '_ {
        self.edges.iter()
    }

    /// Live edges leaving `id`, in current adjacency order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if `id` is not live.
    pub fn outgoing_edges(&self, id: VertexId) -> Result<Vec<Arc<Edge<E>>>> {
        let vertex = self
            .get_vertex(id)
            .ok_or(GraphError::VertexNotFound { vertex_id: id })?;
        Ok(vertex
            .outgoing()
            .into_iter()
            .filter_map(|edge_id| self.edges.get(edge_id))
            .collect())
    }

    /// Number of live vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// One past the largest vertex id ever assigned.
    pub fn vertex_high_water(&self) -> u32 {
        self.vertices.high_water()
    }

    /// One past the largest edge id ever assigned.
    pub fn edge_high_water(&self) -> u32 {
        self.edges.high_water()
    }

    /// Snapshot of the graph counters.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            num_vertices: self.num_vertices(),
            num_edges: self.num_edges(),
            vertex_high_water: self.vertex_high_water(),
            edge_high_water: self.edge_high_water(),
        }
    }

    // ===== Teardown =====

    /// Tear the graph down according to its [`MetadataPolicy`].
    ///
    /// With [`MetadataPolicy::CallerOwned`] every live vertex's and edge's metadata is
    /// returned. With [`MetadataPolicy::GraphOwned`] it is dropped here and the result is
    /// empty. Entries the caller still holds an `Arc` to cannot be reclaimed; their
    /// metadata lives on with that handle.
    pub fn destroy(self) -> Reclaimed<V, E> {
        let Self {
            vertices,
            edges,
            config,
        } = self;
        debug!(
            "Destroying graph: {} vertices, {} edges, policy={:?}",
            vertices.len(),
            edges.len(),
            config.metadata_policy
        );

        if config.metadata_policy == MetadataPolicy::GraphOwned {
            return Reclaimed::default();
        }

        let mut reclaimed = Reclaimed::default();
        for edge in edges.into_entries() {
            let id = edge.id;
            match Arc::try_unwrap(edge) {
                Ok(edge) => reclaimed.edges.push((id, edge.metadata)),
                Err(_) => warn!("Edge {id} still referenced at teardown; metadata not reclaimed"),
            }
        }
        for vertex in vertices.into_entries() {
            let id = vertex.id();
            match Arc::try_unwrap(vertex) {
                Ok(vertex) => reclaimed.vertices.push((id, vertex.into_metadata())),
                Err(_) => {
                    warn!("Vertex {id} still referenced at teardown; metadata not reclaimed")
                }
            }
        }
        reclaimed
    }
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::with_config(GraphConfig::default())
    }
}

impl<V, E> std::fmt::Debug for Graph<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("vertices", &self.vertices)
            .field("edges", &self.edges)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_is_empty() {
        let graph: Graph = Graph::new(8);
        assert_eq!(graph.num_vertices(), 0);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.stats().vertex_high_water, 0);
    }

    #[test]
    fn test_self_loop_removal() {
        let graph: Graph = Graph::new(4);
        let v = graph.add_vertex(()).unwrap();
        graph.add_edge(v, v, ()).unwrap();
        let vertex = graph.get_vertex(v).unwrap();
        assert_eq!(vertex.in_degree(), 1);
        assert_eq!(vertex.out_degree(), 1);

        graph.remove_vertex(v).unwrap();
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(vertex.in_degree(), 0);
        assert_eq!(vertex.out_degree(), 0);
    }

    #[test]
    fn test_destroy_caller_owned_returns_metadata() {
        let graph: Graph<String, u32> = Graph::new(4);
        let a = graph.add_vertex("a".to_string()).unwrap();
        let b = graph.add_vertex("b".to_string()).unwrap();
        graph.add_edge(a, b, 7).unwrap();
        graph.remove_vertex(b).unwrap();

        let reclaimed = graph.destroy();
        assert_eq!(reclaimed.vertices, vec![(a, "a".to_string())]);
        assert!(reclaimed.edges.is_empty());
    }

    #[test]
    fn test_destroy_graph_owned_drops_metadata() {
        let config = GraphConfig::default().metadata_policy(MetadataPolicy::GraphOwned);
        let graph: Graph<Arc<()>, ()> = Graph::with_config(config);
        let token = Arc::new(());
        graph.add_vertex(Arc::clone(&token)).unwrap();
        assert_eq!(Arc::strong_count(&token), 2);

        let reclaimed = graph.destroy();
        assert!(reclaimed.vertices.is_empty());
        assert_eq!(Arc::strong_count(&token), 1);
    }

    #[test]
    fn test_destroy_caller_owned_returns_edge_metadata() {
        let graph: Graph<&str, &str> = Graph::new(4);
        let a = graph.add_vertex("a").unwrap();
        let b = graph.add_vertex("b").unwrap();
        let e = graph.add_edge(a, b, "ab").unwrap();

        let reclaimed = graph.destroy();
        assert_eq!(reclaimed.edges, vec![(e, "ab")]);
        assert_eq!(reclaimed.vertices, vec![(a, "a"), (b, "b")]);
    }

    #[test]
    fn test_destroy_graph_owned_drops_edge_metadata() {
        let config = GraphConfig::default().metadata_policy(MetadataPolicy::GraphOwned);
        let graph: Graph<(), Arc<()>> = Graph::with_config(config);
        let a = graph.add_vertex(()).unwrap();
        let b = graph.add_vertex(()).unwrap();
        let token = Arc::new(());
        graph.add_edge(a, b, Arc::clone(&token)).unwrap();
        assert_eq!(Arc::strong_count(&token), 2);

        let reclaimed = graph.destroy();
        assert!(reclaimed.edges.is_empty());
        assert_eq!(Arc::strong_count(&token), 1);
    }

    #[test]
    fn test_destroy_skips_outstanding_handles() {
        let graph: Graph<&str, ()> = Graph::new(4);
        let a = graph.add_vertex("held").unwrap();
        graph.add_vertex("free").unwrap();
        let held = graph.get_vertex(a).unwrap();

        let reclaimed = graph.destroy();
        assert_eq!(reclaimed.vertices, vec![(1, "free")]);
        assert_eq!(*held.metadata(), "held");
    }
}
