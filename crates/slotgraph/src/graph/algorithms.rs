//! Graph traversal algorithms.
//!
//! Both walks follow outgoing edges and return the visited vertex ids in visitation
//! order, start vertex first. The visited set is a [`BitSet`] sized by the vertex id
//! high-water mark, so sparse id spaces are handled. The graph must not be mutated
//! while a walk is running.

use crate::bitset::BitSet;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, VertexId};

/// Breadth-First Search from `start`.
///
/// Each reachable vertex appears exactly once, in non-decreasing distance from `start`.
///
/// # Errors
///
/// Returns [`GraphError::VertexNotFound`] if `start` is not live.
pub fn bfs<V, E>(graph: &Graph<V, E>, start: VertexId) -> Result<Vec<VertexId>> {
    breadth_first(graph, start, None)
}

/// Breadth-First Search limited to `max_depth` layers beyond `start`.
///
/// A depth of 0 returns only `start`.
///
/// # Errors
///
/// Returns [`GraphError::VertexNotFound`] if `start` is not live.
pub fn bfs_with_depth<V, E>(
    graph: &Graph<V, E>,
    start: VertexId,
    max_depth: usize,
) -> Result<Vec<VertexId>> {
    breadth_first(graph, start, Some(max_depth))
}

fn breadth_first<V, E>(
    graph: &Graph<V, E>,
    start: VertexId,
    max_depth: Option<usize>,
) -> Result<Vec<VertexId>> {
    ensure_live(graph, start)?;

    let mut visited = BitSet::new(graph.vertex_high_water() as usize);
    // `result` doubles as the FIFO: [read, result.len()) is the frontier.
    let mut result = Vec::with_capacity(graph.num_vertices());
    let mut depths = Vec::with_capacity(graph.num_vertices());

    visited.set(start as usize);
    result.push(start);
    depths.push(0usize);

    let mut read = 0;
    while read < result.len() {
        let current = result[read];
        let depth = depths[read];
        read += 1;

        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }

        for next in successors(graph, current) {
            if mark(&mut visited, next) {
                result.push(next);
                depths.push(depth + 1);
            }
        }
    }

    Ok(result)
}

/// Depth-First Search (preorder) from `start`.
///
/// Uses an explicit stack rather than recursion, visiting each vertex's first unvisited
/// outgoing neighbor before its siblings. Adjacency order changes after edge removals,
/// so the sequence is only meaningful for the graph's current state.
///
/// # Errors
///
/// Returns [`GraphError::VertexNotFound`] if `start` is not live.
pub fn dfs<V, E>(graph: &Graph<V, E>, start: VertexId) -> Result<Vec<VertexId>> {
    ensure_live(graph, start)?;

    let mut visited = BitSet::new(graph.vertex_high_water() as usize);
    let mut result = Vec::with_capacity(graph.num_vertices());
    // Each frame holds a vertex's successors and the position of the next one to try.
    let mut stack: Vec<(Vec<VertexId>, usize)> = Vec::new();

    visited.set(start as usize);
    result.push(start);
    stack.push((successors(graph, start), 0));

    while let Some((next_vertices, cursor)) = stack.last_mut() {
        let Some(&next) = next_vertices.get(*cursor) else {
            stack.pop();
            continue;
        };
        *cursor += 1;

        if mark(&mut visited, next) {
            result.push(next);
            stack.push((successors(graph, next), 0));
        }
    }

    Ok(result)
}

fn ensure_live<V, E>(graph: &Graph<V, E>, start: VertexId) -> Result<()> {
    if graph.contains_vertex(start) {
        Ok(())
    } else {
        Err(GraphError::VertexNotFound { vertex_id: start })
    }
}

/// Destinations of `vertex`'s live outgoing edges, in adjacency order.
fn successors<V, E>(graph: &Graph<V, E>, vertex: VertexId) -> Vec<VertexId> {
    let Some(vertex) = graph.get_vertex(vertex) else {
        return Vec::new();
    };
    vertex
        .outgoing()
        .into_iter()
        .filter_map(|edge_id| graph.get_edge(edge_id))
        .map(|edge| edge.dest)
        .collect()
}

/// Mark `vertex` visited. Returns `true` only the first time.
fn mark(visited: &mut BitSet, vertex: VertexId) -> bool {
    let index = vertex as usize;
    !visited.check(index) && visited.set(index)
}

impl<V, E> Graph<V, E> {
    /// Breadth-First Search from `start`. See [`bfs`].
    pub fn bfs(&self, start: VertexId) -> Result<Vec<VertexId>> {
        bfs(self, start)
    }

    /// Depth-limited Breadth-First Search. See [`bfs_with_depth`].
    pub fn bfs_with_depth(&self, start: VertexId, max_depth: usize) -> Result<Vec<VertexId>> {
        bfs_with_depth(self, start, max_depth)
    }

    /// Depth-First Search from `start`. See [`dfs`].
    pub fn dfs(&self, start: VertexId) -> Result<Vec<VertexId>> {
        dfs(self, start)
    }
}
