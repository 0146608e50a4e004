//! Flow invariant audit
//!
//! Checks a network's flow assignment against the conditions every
//! terminated run must satisfy: each arc carries `0 <= flow <= capacity`, and
//! every vertex other than source and sink conserves flow. Every comparison
//! allows [`CONSERVATION_TOLERANCE`] of relative slack, since `f64` flows
//! pick up rounding the exact conditions would reject.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use serde::Serialize;

use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::network::{Capacity, Flow, FlowNetwork, Vertex};

/// Relative slack allowed when comparing flow quantities
pub const CONSERVATION_TOLERANCE: f64 = 1e-9;

/// Whether `a` and `b` agree up to [`CONSERVATION_TOLERANCE`] of the larger
/// magnitude (and never less than that much in absolute terms)
pub fn within_tolerance(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= CONSERVATION_TOLERANCE * scale
}

/// A single broken invariant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Violation<V> {
    NegativeFlow {
        tail: V,
        head: V,
        flow: Flow,
    },
    CapacityExceeded {
        tail: V,
        head: V,
        flow: Flow,
        capacity: Capacity,
    },
    Imbalance {
        vertex: V,
        inflow: Flow,
        outflow: Flow,
    },
}

/// Outcome of auditing one flow assignment
#[derive(Debug, Clone, Serialize)]
pub struct FlowAudit<V> {
    pub violations: Vec<Violation<V>>,
}

impl<V: Vertex> FlowAudit<V> {
    pub fn run<N>(network: &N, source: &V, sink: &V) -> Result<Self, AlgorithmError>
    where
        N: FlowNetwork<Vertex = V>,
    {
        let mut violations = Vec::new();
        let mut balance: HashMap<V, (Flow, Flow)> = HashMap::new();

        for (tail, head) in network.arcs() {
            let flow = network.flow(&tail, &head)?;
            let capacity = network.capacity(&tail, &head)?;

            if flow < 0.0 && !within_tolerance(flow, 0.0) {
                violations.push(Violation::NegativeFlow {
                    tail: tail.clone(),
                    head: head.clone(),
                    flow,
                });
            }
            if flow > capacity && !within_tolerance(flow, capacity) {
                violations.push(Violation::CapacityExceeded {
                    tail: tail.clone(),
                    head: head.clone(),
                    flow,
                    capacity,
                });
            }

            balance.entry(tail).or_insert((0.0, 0.0)).1 += flow;
            balance.entry(head).or_insert((0.0, 0.0)).0 += flow;
        }

        for vertex in network.vertices() {
            if vertex == source || vertex == sink {
                continue;
            }
            let (inflow, outflow) = balance.get(vertex).copied().unwrap_or((0.0, 0.0));
            if !within_tolerance(inflow, outflow) {
                violations.push(Violation::Imbalance {
                    vertex: vertex.clone(),
                    inflow,
                    outflow,
                });
            }
        }

        Ok(Self { violations })
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Converts a dirty audit into `InvariantViolation`
    pub fn into_result(self) -> Result<(), AlgorithmError> {
        match self.violations.first() {
            None => Ok(()),
            Some(first) => Err(AlgorithmError::InvariantViolation(format!(
                "{} violation(s), first: {:?}",
                self.violations.len(),
                first
            ))),
        }
    }
}
