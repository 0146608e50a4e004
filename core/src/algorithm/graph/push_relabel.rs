//! Push-relabel maximum flow with FIFO vertex selection
//!
//! Goldberg-Tarjan preflow algorithm. The source arcs are saturated up front,
//! then active vertices (positive excess, neither source nor sink) are taken
//! from a FIFO queue. Each dequeued vertex is relabelled to one above its
//! lowest residual neighbor and pushes excess downhill along admissible pairs
//! `(u, v)` with `height[u] == height[v] + 1`.
//!
//! Heights and excesses live in a side table owned by the run, never on the
//! network. FIFO selection does not reach the O(V^3) bound of highest-label
//! discharge; it is still correct and is what this strategy implements.
//!
//! Arcs leaving the source with infinite capacity are saturated with a finite
//! stand-in larger than the sum of every finite capacity. A finite maximum
//! flow never reaches that stand-in, so hitting it means the flow is
//! unbounded. The preflow is already on the network when that is detected;
//! [`MaxFlow::run`] rolls it back.
//!
//! Excess and residual capacity at or below the run's zero cutoff (see
//! [`zero_cutoff`]) count as zero, so rounding residues never keep a vertex
//! active. A vertex that still cannot discharge, because no neighbor has
//! residual capacity or because lifting it would pass the `2|V| - 1` height
//! no real excess reaches, keeps its height and leaves the queue.
//!
//! [`MaxFlow::run`]: crate::algorithm::graph::max_flow::MaxFlow::run
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, trace};

use crate::algorithm::graph::max_flow::{
    FlowMetrics, FlowResult, FlowStrategy, MaxFlowAlgorithm, PUSHES, RELABELS,
};
use crate::algorithm::graph::residual::{
    augment, finite_capacity_total, residual_capacity, residual_search, zero_cutoff,
};
use crate::algorithm::traits::{AlgorithmError, AlgorithmProfiler};
use crate::data_structures::network::{Capacity, Flow, FlowNetwork, Vertex};

/// Per-run heights, excesses and the active queue
#[derive(Debug)]
struct Preflow<V: Vertex> {
    source: V,
    sink: V,
    height: HashMap<V, usize>,
    excess: HashMap<V, Flow>,
    active: VecDeque<V>,
    /// Vertices currently in `active`, each at most once
    queued: HashSet<V>,
    /// Excess at or below this is zero
    cutoff: Flow,
    /// Highest label a vertex with real excess can need
    ceiling: usize,
}

impl<V: Vertex> Preflow<V> {
    fn new(source: V, sink: V, vertex_count: usize, cutoff: Flow) -> Self {
        let mut height = HashMap::with_capacity(vertex_count);
        height.insert(source.clone(), vertex_count);
        Self {
            source,
            sink,
            height,
            excess: HashMap::with_capacity(vertex_count),
            active: VecDeque::new(),
            queued: HashSet::new(),
            cutoff,
            ceiling: (2 * vertex_count).saturating_sub(1),
        }
    }

    #[inline]
    fn height(&self, vertex: &V) -> usize {
        self.height.get(vertex).copied().unwrap_or(0)
    }

    #[inline]
    fn excess(&self, vertex: &V) -> Flow {
        self.excess.get(vertex).copied().unwrap_or(0.0)
    }

    #[inline]
    fn is_active(&self, vertex: &V) -> bool {
        self.excess(vertex) > self.cutoff
    }

    fn is_terminal(&self, vertex: &V) -> bool {
        *vertex == self.source || *vertex == self.sink
    }

    fn enqueue(&mut self, vertex: &V) {
        if self.is_active(vertex)
            && !self.is_terminal(vertex)
            && self.queued.insert(vertex.clone())
        {
            self.active.push_back(vertex.clone());
        }
    }

    fn dequeue(&mut self) -> Option<V> {
        let vertex = self.active.pop_front()?;
        self.queued.remove(&vertex);
        Some(vertex)
    }

    /// Moves `amount` of excess from `from` to `to` and queues `to` if it is
    /// now active
    fn transfer(&mut self, from: &V, to: &V, amount: Flow) {
        *self.excess.entry(from.clone()).or_insert(0.0) -= amount;
        *self.excess.entry(to.clone()).or_insert(0.0) += amount;
        self.enqueue(to);
    }
}

/// FIFO push-relabel strategy
#[derive(Debug, Default)]
pub struct PushRelabel {
    profiler: AlgorithmProfiler,
}

impl PushRelabel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zeroes all flow and saturates every arc leaving the source.
    /// Returns whether any infinite source arc had to be clamped.
    fn initialize<N: FlowNetwork>(
        network: &mut N,
        preflow: &mut Preflow<N::Vertex>,
        threshold: Capacity,
    ) -> Result<bool, AlgorithmError> {
        network.reset_flows()?;

        let source = preflow.source.clone();
        let heads: Vec<N::Vertex> = network
            .neighbors(&source)?
            .iter()
            .filter(|head| network.arc_exists(&source, head))
            .cloned()
            .collect();

        let saturated = heads.len();
        let mut clamped = false;
        for head in heads {
            let mut amount = residual_capacity(network, &source, &head)?;
            if amount.is_infinite() {
                amount = threshold;
                clamped = true;
            }
            if amount <= preflow.cutoff {
                continue;
            }
            augment(network, &source, &head, amount)?;
            preflow.transfer(&source, &head, amount);
        }

        debug!(
            "Preflow saturated {} source arcs, {} vertices active",
            saturated,
            preflow.active.len()
        );
        Ok(clamped)
    }

    /// Lifts `vertex` to one above its lowest residual neighbor. Returns
    /// false, with the height untouched, when there is no residual neighbor
    /// or the lift would pass the height ceiling.
    fn relabel<N: FlowNetwork>(
        &mut self,
        network: &N,
        preflow: &mut Preflow<N::Vertex>,
        vertex: &N::Vertex,
    ) -> Result<bool, AlgorithmError> {
        let mut lowest: Option<usize> = None;
        for neighbor in network.neighbors(vertex)? {
            if residual_capacity(network, vertex, neighbor)? > preflow.cutoff {
                let height = preflow.height(neighbor);
                lowest = Some(lowest.map_or(height, |current| current.min(height)));
            }
        }

        let height = match lowest {
            Some(lowest) if lowest < preflow.ceiling => lowest + 1,
            _ => return Ok(false),
        };

        let previous = preflow.height(vertex);
        if height != previous {
            preflow.height.insert(vertex.clone(), height);
            self.profiler.bump(RELABELS);
            trace!("Relabel {:?}: {} -> {}", vertex, previous, height);
        }
        Ok(true)
    }

    /// Pushes excess out of `vertex` along admissible pairs until it runs out
    fn push_admissible<N: FlowNetwork>(
        &mut self,
        network: &mut N,
        preflow: &mut Preflow<N::Vertex>,
        vertex: &N::Vertex,
    ) -> Result<(), AlgorithmError> {
        let neighbors = network.neighbors(vertex)?.to_vec();
        let height = preflow.height(vertex);

        for neighbor in neighbors {
            if !preflow.is_active(vertex) {
                break;
            }
            if height != preflow.height(&neighbor) + 1 {
                continue;
            }
            let residual = residual_capacity(network, vertex, &neighbor)?;
            if residual <= preflow.cutoff {
                continue;
            }

            let amount = preflow.excess(vertex).min(residual);
            augment(network, vertex, &neighbor, amount)?;
            preflow.transfer(vertex, &neighbor, amount);
            self.profiler.bump(PUSHES);
            trace!("Push {} from {:?} to {:?}", amount, vertex, neighbor);
        }
        Ok(())
    }
}

impl FlowStrategy for PushRelabel {
    fn algorithm(&self) -> MaxFlowAlgorithm {
        MaxFlowAlgorithm::PushRelabel
    }

    fn execute<N: FlowNetwork>(
        &mut self,
        network: &mut N,
        source: &N::Vertex,
        sink: &N::Vertex,
    ) -> Result<FlowResult<N::Vertex>, AlgorithmError> {
        self.profiler = AlgorithmProfiler::new();
        self.profiler.start();

        let threshold = 1.0 + finite_capacity_total(network)?;
        let cutoff = zero_cutoff(network)?;
        let mut preflow =
            Preflow::new(source.clone(), sink.clone(), network.vertex_count(), cutoff);
        let clamped = Self::initialize(network, &mut preflow, threshold)?;

        while let Some(vertex) = preflow.dequeue() {
            self.profiler.record_step();
            if !self.relabel(network, &mut preflow, &vertex)? {
                debug!(
                    "{:?} keeps height {} and excess {} with nowhere to push",
                    vertex,
                    preflow.height(&vertex),
                    preflow.excess(&vertex)
                );
                continue;
            }
            self.push_admissible(network, &mut preflow, &vertex)?;
            preflow.enqueue(&vertex);
        }

        let tree = residual_search(network, source, None, cutoff)?;
        self.profiler.record_nodes_explored(tree.len());
        self.profiler.stop();

        let metrics = FlowMetrics::from_profiler(self.algorithm(), &self.profiler);
        let result = FlowResult::terminate(network, source, tree.into_discovery_order(), metrics)?;

        if clamped && result.max_flow_value >= threshold {
            return Err(AlgorithmError::UnboundedFlow);
        }
        Ok(result)
    }
}
