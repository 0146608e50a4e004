//! Residual capacity model over a flow network
//!
//! The residual graph is never built. Residual capacity between an ordered
//! pair is computed on demand from the arc records that exist between the two
//! vertices:
//!
//! | arcs present       | residual(u, v)                         |
//! |--------------------|----------------------------------------|
//! | (u, v) only        | cap(u, v) - flow(u, v)                 |
//! | (v, u) only        | flow(v, u)                             |
//! | both               | cap(u, v) - flow(u, v) + flow(v, u)    |
//! | neither            | 0                                      |
//!
//! With anti-parallel arcs, sending flow from `u` to `v` first cancels flow
//! on `(v, u)` and only then loads `(u, v)`. [`augment`] applies exactly that
//! order so both strategies keep `0 <= flow <= capacity` on every arc.
//!
//! Capacities are `f64`, so flows that should cancel exactly can leave
//! residues of a few ulps. Each run derives a zero cutoff from the network
//! ([`zero_cutoff`]) and treats residual capacity or excess at or below it as
//! zero.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use crate::algorithm::path_finding::bfs::{BreadthFirstSearch, SearchTree};
use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::network::{Capacity, Flow, FlowNetwork};

/// Relative slack, against the sum of finite capacities, under which a
/// residual capacity or an excess counts as zero
pub const FLOW_TOLERANCE: f64 = 1e-12;

/// Sum of every finite arc capacity
pub fn finite_capacity_total<N: FlowNetwork>(network: &N) -> Result<Capacity, AlgorithmError> {
    let mut total = 0.0;
    for (tail, head) in network.arcs() {
        let capacity = network.capacity(&tail, &head)?;
        if capacity.is_finite() {
            total += capacity;
        }
    }
    Ok(total)
}

/// Absolute cutoff at or below which an amount of flow on `network` is zero
pub fn zero_cutoff<N: FlowNetwork>(network: &N) -> Result<Flow, AlgorithmError> {
    Ok(FLOW_TOLERANCE * finite_capacity_total(network)?)
}

/// Residual capacity available for pushing flow from `u` to `v`
pub fn residual_capacity<N: FlowNetwork>(
    network: &N,
    u: &N::Vertex,
    v: &N::Vertex,
) -> Result<Capacity, AlgorithmError> {
    let forward = network.arc_exists(u, v);
    let backward = network.arc_exists(v, u);

    Ok(match (forward, backward) {
        (true, true) => network.capacity(u, v)? - network.flow(u, v)? + network.flow(v, u)?,
        (true, false) => network.capacity(u, v)? - network.flow(u, v)?,
        (false, true) => network.flow(v, u)?,
        (false, false) => 0.0,
    })
}

/// Edge filter for residual searches: hides pairs whose residual capacity
/// does not exceed `cutoff`
pub fn is_saturated<N: FlowNetwork>(
    network: &N,
    u: &N::Vertex,
    v: &N::Vertex,
    cutoff: Flow,
) -> Result<bool, AlgorithmError> {
    Ok(residual_capacity(network, u, v)? <= cutoff)
}

/// Breadth-first search of the residual graph from `source`, optionally
/// stopping once `goal` is dequeued
pub fn residual_search<N: FlowNetwork>(
    network: &N,
    source: &N::Vertex,
    goal: Option<&N::Vertex>,
    cutoff: Flow,
) -> Result<SearchTree<N::Vertex>, AlgorithmError> {
    let mut search = BreadthFirstSearch::new(source.clone());
    if let Some(goal) = goal {
        search = search.with_goal(goal.clone());
    }
    search.run(network, |u, v| is_saturated(network, u, v, cutoff))
}

/// Sends `amount` units from `u` to `v` through the residual graph.
///
/// The caller guarantees `amount <= residual_capacity(u, v)`.
pub fn augment<N: FlowNetwork>(
    network: &mut N,
    u: &N::Vertex,
    v: &N::Vertex,
    amount: Flow,
) -> Result<(), AlgorithmError> {
    let forward = network.arc_exists(u, v);
    let backward = network.arc_exists(v, u);

    match (forward, backward) {
        (true, true) => {
            let reverse_flow = network.flow(v, u)?;
            let cancelled = amount.min(reverse_flow);
            if cancelled > 0.0 {
                network.set_flow(v, u, reverse_flow - cancelled)?;
            }
            let remainder = amount - cancelled;
            if remainder > 0.0 {
                let current = network.flow(u, v)?;
                network.set_flow(u, v, current + remainder)?;
            }
        }
        (true, false) => {
            let current = network.flow(u, v)?;
            network.set_flow(u, v, current + amount)?;
        }
        (false, true) => {
            let current = network.flow(v, u)?;
            network.set_flow(v, u, current - amount)?;
        }
        (false, false) => return Err(AlgorithmError::missing_arc(u, v)),
    }
    Ok(())
}
