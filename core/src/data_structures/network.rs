//! Flow network collaborator contract
//!
//! The max-flow engine never stores a graph of its own. It drives any type
//! implementing [`FlowNetwork`]: adjacency enumeration, arc existence and
//! per-arc `capacity` / `flow` fields addressed by ordered vertex pair.
//!
//! Neighbor enumeration is in the undirected sense: a vertex reports both the
//! heads of its out-arcs and the tails of its in-arcs. Residual search relies
//! on this to walk "backward" along arcs that carry flow.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::AlgorithmError;

/// Arc capacity. May be [`INFINITE_CAPACITY`].
pub type Capacity = f64;

/// Flow carried by an arc
pub type Flow = f64;

/// Sentinel for an arc without a capacity bound. IEEE infinity stays infinite
/// under subtraction of any finite flow, so residual arithmetic cannot overflow.
pub const INFINITE_CAPACITY: Capacity = f64::INFINITY;

/// Opaque vertex identifier
pub trait Vertex: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Vertex for T {}

/// Named numeric field stored on every arc
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcField {
    Capacity,
    Flow,
}

impl ArcField {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            ArcField::Capacity => "capacity",
            ArcField::Flow => "flow",
        }
    }
}

/// Read-only neighborhood view, the only thing breadth-first search needs
pub trait Adjacency {
    type Vertex: Vertex;

    /// Whether `vertex` belongs to the graph
    fn contains_vertex(&self, vertex: &Self::Vertex) -> bool;

    /// Neighbors of `vertex` in the order the graph reports them
    fn neighbors(&self, vertex: &Self::Vertex) -> Result<&[Self::Vertex], AlgorithmError>;
}

/// Capacitated network with mutable per-arc flow
pub trait FlowNetwork: Adjacency {
    /// All vertices in a stable order
    fn vertices(&self) -> &[Self::Vertex];

    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Every ordered arc `(tail, head)` that exists
    fn arcs(&self) -> Vec<(Self::Vertex, Self::Vertex)>;

    fn arc_exists(&self, tail: &Self::Vertex, head: &Self::Vertex) -> bool;

    fn arc_field(
        &self,
        tail: &Self::Vertex,
        head: &Self::Vertex,
        field: ArcField,
    ) -> Result<f64, AlgorithmError>;

    fn set_arc_field(
        &mut self,
        tail: &Self::Vertex,
        head: &Self::Vertex,
        field: ArcField,
        value: f64,
    ) -> Result<(), AlgorithmError>;

    fn capacity(
        &self,
        tail: &Self::Vertex,
        head: &Self::Vertex,
    ) -> Result<Capacity, AlgorithmError> {
        self.arc_field(tail, head, ArcField::Capacity)
    }

    fn flow(&self, tail: &Self::Vertex, head: &Self::Vertex) -> Result<Flow, AlgorithmError> {
        self.arc_field(tail, head, ArcField::Flow)
    }

    fn set_flow(
        &mut self,
        tail: &Self::Vertex,
        head: &Self::Vertex,
        flow: Flow,
    ) -> Result<(), AlgorithmError> {
        self.set_arc_field(tail, head, ArcField::Flow, flow)
    }

    /// Zeroes the flow on every arc
    fn reset_flows(&mut self) -> Result<(), AlgorithmError> {
        for (tail, head) in self.arcs() {
            self.set_flow(&tail, &head, 0.0)?;
        }
        Ok(())
    }

    /// Flow on every arc, in [`arcs`](FlowNetwork::arcs) order
    fn flow_snapshot(&self) -> Result<FlowSnapshot<Self::Vertex>, AlgorithmError> {
        self.arcs()
            .into_iter()
            .map(|(tail, head)| {
                let flow = self.flow(&tail, &head)?;
                Ok((tail, head, flow))
            })
            .collect()
    }

    /// Puts back the flow recorded by [`flow_snapshot`](FlowNetwork::flow_snapshot)
    fn restore_flows(
        &mut self,
        snapshot: &FlowSnapshot<Self::Vertex>,
    ) -> Result<(), AlgorithmError> {
        self.reset_flows()?;
        for (tail, head, flow) in snapshot {
            self.set_flow(tail, head, *flow)?;
        }
        Ok(())
    }
}

/// Per-arc flow captured from a network
pub type FlowSnapshot<V> = Vec<(V, V, Flow)>;
