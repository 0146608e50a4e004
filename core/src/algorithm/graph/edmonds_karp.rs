//! Edmonds-Karp maximum flow
//!
//! Ford-Fulkerson with breadth-first augmenting paths: every iteration pushes
//! the bottleneck along a shortest residual path (by hop count) until the sink
//! becomes unreachable. The vertices seen by that last failed search are the
//! source side of the minimum cut.
//!
//! # Complexity
//! - Time: O(V * E^2)
//! - Space: O(V) per search
//!
//! Any flow already on the network is kept and extended, so running again on
//! a terminated network changes nothing. An `UnboundedFlow` error can leave
//! earlier augmentations in place; [`MaxFlow::run`] rolls them back.
//!
//! [`MaxFlow::run`]: crate::algorithm::graph::max_flow::MaxFlow::run
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;

use crate::algorithm::graph::max_flow::{
    FlowMetrics, FlowResult, FlowStrategy, MaxFlowAlgorithm, AUGMENTING_PATHS,
};
use crate::algorithm::graph::residual::{augment, residual_capacity, residual_search, zero_cutoff};
use crate::algorithm::traits::{AlgorithmError, AlgorithmProfiler};
use crate::data_structures::network::{Capacity, FlowNetwork, INFINITE_CAPACITY};

/// Shortest augmenting path strategy
#[derive(Debug, Default)]
pub struct EdmondsKarp {
    profiler: AlgorithmProfiler,
}

impl EdmondsKarp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Smallest residual capacity over consecutive pairs of `path`
    fn bottleneck<N: FlowNetwork>(
        network: &N,
        path: &[N::Vertex],
    ) -> Result<Capacity, AlgorithmError> {
        path.windows(2).try_fold(INFINITE_CAPACITY, |smallest, pair| {
            Ok(smallest.min(residual_capacity(network, &pair[0], &pair[1])?))
        })
    }
}

impl FlowStrategy for EdmondsKarp {
    fn algorithm(&self) -> MaxFlowAlgorithm {
        MaxFlowAlgorithm::EdmondsKarp
    }

    fn execute<N: FlowNetwork>(
        &mut self,
        network: &mut N,
        source: &N::Vertex,
        sink: &N::Vertex,
    ) -> Result<FlowResult<N::Vertex>, AlgorithmError> {
        self.profiler = AlgorithmProfiler::new();
        self.profiler.start();

        let cutoff = zero_cutoff(network)?;
        let reachable = loop {
            let tree = residual_search(network, source, Some(sink), cutoff)?;
            self.profiler.record_nodes_explored(tree.len());

            let path = match tree.path_to(sink) {
                Some(path) => path,
                None => break tree.into_discovery_order(),
            };

            let bottleneck = Self::bottleneck(network, &path)?;
            if bottleneck.is_infinite() {
                return Err(AlgorithmError::UnboundedFlow);
            }

            for pair in path.windows(2) {
                augment(network, &pair[0], &pair[1], bottleneck)?;
            }

            self.profiler.record_step();
            self.profiler.bump(AUGMENTING_PATHS);
            debug!("Augmented {} along {} arcs: {:?}", bottleneck, path.len() - 1, path);
        };

        self.profiler.stop();
        let metrics = FlowMetrics::from_profiler(self.algorithm(), &self.profiler);
        FlowResult::terminate(network, source, reachable, metrics)
    }
}
