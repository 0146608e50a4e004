//! Minimum cut extraction from a terminal residual search
//!
//! Once no augmenting path remains, the vertices reachable from the source
//! through positive-residual pairs form the source side of a minimum cut.
//! Every arc leaving that side is saturated and every arc entering it is
//! empty, so the flow carried across the cut equals both the cut capacity and
//! the net flow out of the source.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::network::{Capacity, Flow, FlowNetwork};

/// Arc crossing from the source side to the sink side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutArc<V> {
    pub tail: V,
    pub head: V,
    /// Flow carried at extraction time
    pub flow: Flow,
    pub capacity: Capacity,
}

/// Cut arcs in discovery order and the flow they carry in total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinCut<V> {
    pub arcs: Vec<CutArc<V>>,
    pub value: Flow,
}

/// Collects every arc whose tail is in `reachable` and whose head is not
pub fn extract_min_cut<N: FlowNetwork>(
    network: &N,
    reachable: &[N::Vertex],
) -> Result<MinCut<N::Vertex>, AlgorithmError> {
    let source_side: HashSet<&N::Vertex> = reachable.iter().collect();
    let mut arcs = Vec::new();
    let mut value = 0.0;

    for tail in reachable {
        for head in network.neighbors(tail)? {
            if source_side.contains(head) || !network.arc_exists(tail, head) {
                continue;
            }
            let flow = network.flow(tail, head)?;
            value += flow;
            arcs.push(CutArc {
                tail: tail.clone(),
                head: head.clone(),
                flow,
                capacity: network.capacity(tail, head)?,
            });
        }
    }

    debug!(
        "Extracted cut of {} arcs over a source side of {} vertices, value {}",
        arcs.len(),
        reachable.len(),
        value
    );

    Ok(MinCut { arcs, value })
}

/// Flow leaving `vertex` minus flow entering it
pub fn net_outflow<N: FlowNetwork>(
    network: &N,
    vertex: &N::Vertex,
) -> Result<Flow, AlgorithmError> {
    let mut total = 0.0;
    for other in network.neighbors(vertex)? {
        if network.arc_exists(vertex, other) {
            total += network.flow(vertex, other)?;
        }
        if network.arc_exists(other, vertex) {
            total -= network.flow(other, vertex)?;
        }
    }
    Ok(total)
}
