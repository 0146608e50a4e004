//! Maximum flow and minimum cut over capacitated networks
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod audit;
pub mod edmonds_karp;
pub mod max_flow;
pub mod min_cut;
pub mod push_relabel;
pub mod residual;

pub use self::audit::{within_tolerance, FlowAudit, Violation, CONSERVATION_TOLERANCE};
pub use self::edmonds_karp::EdmondsKarp;
pub use self::max_flow::{
    FlowMetrics, FlowResult, FlowStrategy, MaxFlow, MaxFlowAlgorithm, MaxFlowConfig,
};
pub use self::min_cut::{extract_min_cut, net_outflow, CutArc, MinCut};
pub use self::push_relabel::PushRelabel;
pub use self::residual::{
    augment, finite_capacity_total, is_saturated, residual_capacity, residual_search, zero_cutoff,
    FLOW_TOLERANCE,
};
