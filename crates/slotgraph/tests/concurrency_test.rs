//! Concurrent insertion tests.

use slotgraph::{Graph, GraphConfig, VertexId};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 1_000;

#[test]
fn test_concurrent_add_vertex_ids_are_unique() {
    // Tiny initial capacity forces many concurrent growth events.
    let graph: Graph<(usize, usize), ()> = Graph::with_config(GraphConfig::with_capacity(1));

    let ids: Vec<VertexId> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let graph = &graph;
                s.spawn(move || {
                    (0..PER_THREAD)
                        .map(|i| graph.add_vertex((t, i)).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: HashSet<VertexId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), THREADS * PER_THREAD);
    assert_eq!(graph.num_vertices(), THREADS * PER_THREAD);
    assert_eq!(graph.vertex_high_water() as usize, THREADS * PER_THREAD);
    // No gaps: every id below the high-water mark is live.
    assert_eq!(graph.vertex_ids().count(), THREADS * PER_THREAD);
}

#[test]
fn test_concurrent_metadata_lands_in_own_slot() {
    let graph: Arc<Graph<(usize, usize), ()>> = Arc::new(Graph::new(2));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|i| (graph.add_vertex((t, i)).unwrap(), (t, i)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for (id, expected) in handle.join().unwrap() {
            assert_eq!(*graph.get_vertex(id).unwrap().metadata(), expected);
        }
    }
}

#[test]
fn test_concurrent_add_edge_from_shared_source() {
    let graph: Graph<(), usize> = Graph::new(2);
    let hub = graph.add_vertex(()).unwrap();
    let leaves: Vec<VertexId> = (0..THREADS).map(|_| graph.add_vertex(()).unwrap()).collect();

    thread::scope(|s| {
        for (t, &leaf) in leaves.iter().enumerate() {
            let graph = &graph;
            s.spawn(move || {
                for i in 0..PER_THREAD {
                    graph.add_edge(hub, leaf, t * PER_THREAD + i).unwrap();
                }
            });
        }
    });

    let total = THREADS * PER_THREAD;
    assert_eq!(graph.num_edges(), total);

    let hub_vertex = graph.get_vertex(hub).unwrap();
    assert_eq!(hub_vertex.out_degree() as usize, total);
    let listed: HashSet<u32> = hub_vertex.outgoing().into_iter().collect();
    assert_eq!(listed.len(), total);

    for &leaf in &leaves {
        assert_eq!(graph.get_vertex(leaf).unwrap().in_degree() as usize, PER_THREAD);
    }
    let in_sum: u32 = graph.vertices().map(|v| v.in_degree()).sum();
    assert_eq!(in_sum as usize, total);
}

#[test]
fn test_concurrent_vertex_and_edge_growth() {
    let graph: Graph<usize, usize> = Graph::with_config(GraphConfig::with_capacity(1));
    let roots: Vec<VertexId> = (0..THREADS).map(|i| graph.add_vertex(i).unwrap()).collect();

    thread::scope(|s| {
        for &root in &roots {
            let graph = &graph;
            s.spawn(move || {
                for i in 0..200 {
                    let v = graph.add_vertex(i).unwrap();
                    graph.add_edge(root, v, i).unwrap();
                }
            });
        }
    });

    assert_eq!(graph.num_vertices(), THREADS + THREADS * 200);
    assert_eq!(graph.num_edges(), THREADS * 200);
    for &root in &roots {
        assert_eq!(graph.bfs(root).unwrap().len(), 201);
    }
}
