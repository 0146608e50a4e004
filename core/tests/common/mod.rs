//! Networks and checks shared by the integration tests
#![allow(dead_code)]

use flownet_core::{Capacity, FlowAudit, FlowGraph, FlowNetwork, INFINITE_CAPACITY};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn graph(arcs: &[(&'static str, &'static str, Capacity)]) -> FlowGraph<&'static str> {
    FlowGraph::from_arcs(arcs.iter().copied()).unwrap()
}

/// s -> {1, 2} -> t with a cross arc 1 -> 2
pub fn scenario_a() -> FlowGraph<&'static str> {
    graph(&[("s", "1", 3.0), ("s", "2", 2.0), ("1", "2", 5.0), ("1", "t", 2.0), ("2", "t", 3.0)])
}

/// Six vertices, source 0, sink 5, maximum flow 23
pub fn scenario_b() -> FlowGraph<u32> {
    FlowGraph::from_arcs(vec![
        (0, 1, 16.0),
        (0, 2, 13.0),
        (1, 2, 10.0),
        (1, 3, 12.0),
        (2, 1, 4.0),
        (2, 4, 14.0),
        (3, 2, 9.0),
        (3, 5, 20.0),
        (4, 3, 7.0),
        (4, 5, 4.0),
    ])
    .unwrap()
}

/// Unbounded internal arcs between r and s, maximum flow 10
pub fn scenario_c() -> FlowGraph<&'static str> {
    graph(&[
        ("r", "a", 2.0),
        ("r", "b", 4.0),
        ("r", "c", 3.0),
        ("r", "d", 2.0),
        ("e", "s", 7.0),
        ("f", "s", 1.0),
        ("g", "s", 3.0),
        ("h", "s", 1.0),
        ("a", "e", INFINITE_CAPACITY),
        ("b", "a", INFINITE_CAPACITY),
        ("b", "c", INFINITE_CAPACITY),
        ("c", "d", INFINITE_CAPACITY),
        ("c", "f", INFINITE_CAPACITY),
        ("f", "g", INFINITE_CAPACITY),
        ("d", "g", INFINITE_CAPACITY),
        ("h", "d", INFINITE_CAPACITY),
    ])
}

/// Dense network from r to s with an anti-parallel pair, maximum flow 17
pub fn cook_network() -> FlowGraph<&'static str> {
    graph(&[
        ("r", "p", 6.0),
        ("r", "a", 9.0),
        ("r", "q", 4.0),
        ("p", "b", 3.0),
        ("p", "q", 2.0),
        ("q", "p", 1.0),
        ("q", "b", 2.0),
        ("q", "d", 6.0),
        ("b", "a", 1.0),
        ("b", "s", 8.0),
        ("a", "c", 8.0),
        ("a", "d", 1.0),
        ("c", "q", 1.0),
        ("c", "b", 2.0),
        ("c", "s", 4.0),
        ("d", "c", 1.0),
        ("d", "s", 6.0),
    ])
}

/// S to T, maximum flow 5
pub fn six_letter_network() -> FlowGraph<&'static str> {
    graph(&[
        ("S", "A", 4.0),
        ("S", "B", 2.0),
        ("A", "C", 3.0),
        ("B", "C", 2.0),
        ("B", "D", 3.0),
        ("C", "B", 1.0),
        ("C", "T", 2.0),
        ("D", "T", 4.0),
    ])
}

/// A to G, needs flow cancellation along C -> A, maximum flow 5
pub fn cancellation_network() -> FlowGraph<&'static str> {
    graph(&[
        ("A", "B", 3.0),
        ("A", "D", 3.0),
        ("B", "C", 4.0),
        ("C", "A", 3.0),
        ("C", "D", 1.0),
        ("C", "E", 2.0),
        ("D", "E", 2.0),
        ("D", "F", 6.0),
        ("E", "B", 1.0),
        ("E", "G", 1.0),
        ("F", "G", 9.0),
    ])
}

/// Capacity bounds and conservation hold
pub fn assert_feasible<N: FlowNetwork>(network: &N, source: &N::Vertex, sink: &N::Vertex) {
    let audit = FlowAudit::run(network, source, sink).unwrap();
    assert!(audit.is_clean(), "violations: {:?}", audit.violations);
}

/// Flow on every arc, in arc order
pub fn flow_snapshot<N: FlowNetwork>(network: &N) -> Vec<f64> {
    network
        .arcs()
        .iter()
        .map(|(tail, head)| network.flow(tail, head).unwrap())
        .collect()
}
