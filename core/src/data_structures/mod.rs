//! Network storage consumed by the flow algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod graph;
pub mod network;

pub use self::graph::{ArcKind, ArcSpec, FlowGraph};
pub use self::network::{
    Adjacency, ArcField, Capacity, Flow, FlowNetwork, FlowSnapshot, Vertex, INFINITE_CAPACITY,
};
