//! FlowNet core
//!
//! Maximum flow and minimum cut for capacitated directed networks, with two
//! interchangeable strategies:
//!
//! - Edmonds-Karp: breadth-first shortest augmenting paths, O(V * E^2)
//! - Push-relabel with FIFO selection of active vertices
//!
//! The engine drives any type implementing [`FlowNetwork`]. [`FlowGraph`] is
//! the bundled implementation, with directed arcs, undirected edges and JSON
//! import/export.
//!
//! ```
//! use flownet_core::{FlowGraph, MaxFlow, MaxFlowAlgorithm};
//!
//! let graph = FlowGraph::from_arcs(vec![
//!     ("s", "a", 3.0),
//!     ("s", "b", 2.0),
//!     ("a", "b", 5.0),
//!     ("a", "t", 2.0),
//!     ("b", "t", 3.0),
//! ])?;
//!
//! let mut engine = MaxFlow::new(graph, Some("s"), Some("t"))?;
//! let result = engine.run(MaxFlowAlgorithm::PushRelabel)?;
//! assert_eq!(result.max_flow_value, 5.0);
//! assert_eq!(result.min_cut_value(), 5.0);
//! # Ok::<(), flownet_core::AlgorithmError>(())
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;

pub use crate::algorithm::graph::{
    CutArc, FlowAudit, FlowMetrics, FlowResult, FlowStrategy, MaxFlow, MaxFlowAlgorithm,
    MaxFlowConfig, MinCut,
};
pub use crate::algorithm::traits::{Algorithm, AlgorithmError};
pub use crate::data_structures::{
    Adjacency, ArcField, ArcKind, ArcSpec, Capacity, Flow, FlowGraph, FlowNetwork, FlowSnapshot,
    Vertex, INFINITE_CAPACITY,
};
