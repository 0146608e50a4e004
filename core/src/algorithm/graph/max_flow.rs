//! Maximum Flow Engine
//!
//! This module owns a flow network for the duration of a run and drives one
//! of two strategies over it: Edmonds-Karp shortest augmenting paths, or FIFO
//! push-relabel. Both leave the maximum flow in the network's arc records and
//! report the value, the minimum cut, and the residual-reachable source side.
//!
//! # Lifecycle
//! 1. Construction zeroes every arc flow (unless seeded flow is requested)
//! 2. Source and sink are set, either at construction or through setters
//! 3. `run` validates endpoints before touching any flow, then executes
//! 4. Results stay readable until the next run or endpoint change
//!
//! A run that fails after it started moving flow, for instance with
//! `UnboundedFlow` or a failed audit, puts back the flow the network carried
//! before it.
//!
//! Re-running Edmonds-Karp on a terminated network is a no-op: no augmenting
//! path remains. Push-relabel always starts over from a fresh preflow.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::audit::{within_tolerance, FlowAudit};
use crate::algorithm::graph::edmonds_karp::EdmondsKarp;
use crate::algorithm::graph::min_cut::{extract_min_cut, net_outflow, CutArc, MinCut};
use crate::algorithm::graph::push_relabel::PushRelabel;
use crate::algorithm::traits::{
    Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmParameter, AlgorithmProfiler,
    ParameterType,
};
use crate::data_structures::network::{Flow, FlowNetwork};

/// Profiler counter for completed augmentations
pub(crate) const AUGMENTING_PATHS: &str = "augmenting_paths";
/// Profiler counter for push operations
pub(crate) const PUSHES: &str = "pushes";
/// Profiler counter for height changes
pub(crate) const RELABELS: &str = "relabels";

/// Maximum flow algorithm variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFlowAlgorithm {
    /// Edmonds-Karp with BFS shortest augmenting paths
    #[default]
    EdmondsKarp,
    /// Goldberg-Tarjan push-relabel with FIFO vertex selection
    PushRelabel,
}

impl MaxFlowAlgorithm {
    pub const ALL: [MaxFlowAlgorithm; 2] =
        [MaxFlowAlgorithm::EdmondsKarp, MaxFlowAlgorithm::PushRelabel];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            MaxFlowAlgorithm::EdmondsKarp => "edmonds_karp",
            MaxFlowAlgorithm::PushRelabel => "push_relabel",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            MaxFlowAlgorithm::EdmondsKarp => "Edmonds-Karp",
            MaxFlowAlgorithm::PushRelabel => "Push-Relabel FIFO",
        }
    }

    /// Comma-separated list of every accepted name
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|algorithm| algorithm.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn complexity(self) -> AlgorithmComplexity {
        let time = match self {
            MaxFlowAlgorithm::EdmondsKarp => "O(V * E^2)",
            MaxFlowAlgorithm::PushRelabel => "O(V^2 * E)",
        };
        AlgorithmComplexity {
            time_complexity: time.to_string(),
            space_complexity: "O(V + E)".to_string(),
        }
    }
}

impl fmt::Display for MaxFlowAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaxFlowAlgorithm {
    type Err = AlgorithmError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.as_str() == name)
            .ok_or_else(|| AlgorithmError::InvalidAlgorithm {
                name: name.to_owned(),
                valid: Self::valid_names(),
            })
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxFlowConfig {
    /// Strategy used by [`MaxFlow::run_configured`]
    pub algorithm: MaxFlowAlgorithm,
    /// Audit capacity bounds, conservation and cut equality after every run
    pub verify_invariants: bool,
}

/// Flow algorithm performance metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub algorithm: MaxFlowAlgorithm,
    /// Number of augmenting paths applied
    pub augmenting_paths: usize,
    /// Number of push operations
    pub push_operations: usize,
    /// Number of relabels that changed a height
    pub relabel_operations: usize,
    /// Main loop iterations: augmentations or vertex discharges
    pub steps_executed: usize,
    /// Vertices discovered across all residual searches
    pub nodes_explored: usize,
    pub execution_time: Duration,
}

impl FlowMetrics {
    pub(crate) fn from_profiler(
        algorithm: MaxFlowAlgorithm,
        profiler: &AlgorithmProfiler,
    ) -> Self {
        let metrics = profiler.get_metrics();
        Self {
            algorithm,
            augmenting_paths: profiler.counter(AUGMENTING_PATHS),
            push_operations: profiler.counter(PUSHES),
            relabel_operations: profiler.counter(RELABELS),
            steps_executed: metrics.steps_executed,
            nodes_explored: metrics.nodes_explored,
            execution_time: metrics.execution_time,
        }
    }
}

/// Terminal state of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct FlowResult<V> {
    /// Net flow out of the source
    pub max_flow_value: Flow,
    pub min_cut: MinCut<V>,
    /// Source side of the cut in discovery order
    pub reachable: Vec<V>,
    pub metrics: FlowMetrics,
}

impl<V> FlowResult<V> {
    pub fn min_cut_value(&self) -> Flow {
        self.min_cut.value
    }

    pub fn min_cut_edges(&self) -> &[CutArc<V>] {
        &self.min_cut.arcs
    }

    /// Builds the result from the vertices reached by the final residual search
    pub(crate) fn terminate<N>(
        network: &N,
        source: &V,
        reachable: Vec<V>,
        metrics: FlowMetrics,
    ) -> Result<Self, AlgorithmError>
    where
        N: FlowNetwork<Vertex = V>,
    {
        let min_cut = extract_min_cut(network, &reachable)?;
        let max_flow_value = net_outflow(network, source)?;
        Ok(Self {
            max_flow_value,
            min_cut,
            reachable,
            metrics,
        })
    }
}

/// A max-flow strategy run to completion over a network.
///
/// On error the network may be left holding a partial flow.
pub trait FlowStrategy {
    fn algorithm(&self) -> MaxFlowAlgorithm;

    fn execute<N: FlowNetwork>(
        &mut self,
        network: &mut N,
        source: &N::Vertex,
        sink: &N::Vertex,
    ) -> Result<FlowResult<N::Vertex>, AlgorithmError>;
}

/// Maximum flow engine with exclusive ownership of its network
#[derive(Debug)]
pub struct MaxFlow<N: FlowNetwork> {
    network: N,
    source: Option<N::Vertex>,
    sink: Option<N::Vertex>,
    config: MaxFlowConfig,
    result: Option<FlowResult<N::Vertex>>,
}

impl<N: FlowNetwork> MaxFlow<N> {
    /// Takes ownership of `network` and zeroes every arc flow
    pub fn new(
        mut network: N,
        source: Option<N::Vertex>,
        sink: Option<N::Vertex>,
    ) -> Result<Self, AlgorithmError> {
        network.reset_flows()?;
        Ok(Self {
            network,
            source,
            sink,
            config: MaxFlowConfig::default(),
            result: None,
        })
    }

    /// Takes ownership of `network` keeping whatever flow it already carries.
    /// Edmonds-Karp continues from that flow, which must be feasible.
    pub fn with_seeded_flow(network: N) -> Self {
        Self {
            network,
            source: None,
            sink: None,
            config: MaxFlowConfig::default(),
            result: None,
        }
    }

    pub fn with_config(mut self, config: MaxFlowConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_source(&mut self, source: N::Vertex) {
        self.source = Some(source);
        self.result = None;
    }

    pub fn set_sink(&mut self, sink: N::Vertex) {
        self.sink = Some(sink);
        self.result = None;
    }

    pub fn source(&self) -> Option<&N::Vertex> {
        self.source.as_ref()
    }

    pub fn sink(&self) -> Option<&N::Vertex> {
        self.sink.as_ref()
    }

    pub fn config(&self) -> &MaxFlowConfig {
        &self.config
    }

    /// Runs the algorithm named `name` (`edmonds_karp` or `push_relabel`)
    pub fn run_named(&mut self, name: &str) -> Result<&FlowResult<N::Vertex>, AlgorithmError> {
        let algorithm = name.parse::<MaxFlowAlgorithm>()?;
        self.run(algorithm)
    }

    /// Runs the algorithm selected in the configuration
    pub fn run_configured(&mut self) -> Result<&FlowResult<N::Vertex>, AlgorithmError> {
        self.run(self.config.algorithm)
    }

    pub fn run(
        &mut self,
        algorithm: MaxFlowAlgorithm,
    ) -> Result<&FlowResult<N::Vertex>, AlgorithmError> {
        let (source, sink) = self.endpoints()?;
        self.result = None;

        info!(
            "Running {} from {:?} to {:?} over {} vertices",
            algorithm.display_name(),
            source,
            sink,
            self.network.vertex_count()
        );

        let snapshot = self.network.flow_snapshot()?;
        let result = match self.solve(algorithm, &source, &sink) {
            Ok(result) => result,
            Err(error) => {
                warn!("{} failed, restoring prior flow: {}", algorithm.display_name(), error);
                self.network.restore_flows(&snapshot)?;
                return Err(error);
            }
        };

        info!(
            "{} terminated: max flow {}, {} cut arcs, {:?}",
            algorithm.display_name(),
            result.max_flow_value,
            result.min_cut.arcs.len(),
            result.metrics.execution_time
        );

        Ok(&*self.result.insert(result))
    }

    /// Runs the strategy and, when configured, audits the flow it left
    fn solve(
        &mut self,
        algorithm: MaxFlowAlgorithm,
        source: &N::Vertex,
        sink: &N::Vertex,
    ) -> Result<FlowResult<N::Vertex>, AlgorithmError> {
        let result = match algorithm {
            MaxFlowAlgorithm::EdmondsKarp => {
                EdmondsKarp::new().execute(&mut self.network, source, sink)?
            }
            MaxFlowAlgorithm::PushRelabel => {
                PushRelabel::new().execute(&mut self.network, source, sink)?
            }
        };

        if self.config.verify_invariants {
            FlowAudit::run(&self.network, source, sink)?.into_result()?;
            if !within_tolerance(result.max_flow_value, result.min_cut_value()) {
                return Err(AlgorithmError::InvariantViolation(format!(
                    "max flow {} differs from min cut {}",
                    result.max_flow_value,
                    result.min_cut_value()
                )));
            }
        }
        Ok(result)
    }

    /// Validates endpoints without touching the network
    fn endpoints(&self) -> Result<(N::Vertex, N::Vertex), AlgorithmError> {
        let (source, sink) = match (&self.source, &self.sink) {
            (None, None) => return Err(AlgorithmError::MissingEndpoint("source and sink")),
            (None, Some(_)) => return Err(AlgorithmError::MissingEndpoint("source")),
            (Some(_), None) => return Err(AlgorithmError::MissingEndpoint("sink")),
            (Some(source), Some(sink)) => (source, sink),
        };

        for endpoint in [source, sink] {
            if !self.network.contains_vertex(endpoint) {
                return Err(AlgorithmError::missing_vertex(endpoint));
            }
        }
        if source == sink {
            return Err(AlgorithmError::IdenticalEndpoints(format!("{:?}", source)));
        }

        Ok((source.clone(), sink.clone()))
    }

    pub fn result(&self) -> Option<&FlowResult<N::Vertex>> {
        self.result.as_ref()
    }

    pub fn max_flow_value(&self) -> Option<Flow> {
        self.result.as_ref().map(|result| result.max_flow_value)
    }

    pub fn min_cut_value(&self) -> Option<Flow> {
        self.result.as_ref().map(FlowResult::min_cut_value)
    }

    pub fn min_cut_edges(&self) -> Option<&[CutArc<N::Vertex>]> {
        self.result.as_ref().map(FlowResult::min_cut_edges)
    }

    pub fn min_cut_edge_set(&self) -> Option<HashSet<(N::Vertex, N::Vertex)>> {
        self.min_cut_edges().map(|arcs| {
            arcs.iter()
                .map(|arc| (arc.tail.clone(), arc.head.clone()))
                .collect()
        })
    }

    pub fn reachable_set(&self) -> Option<HashSet<N::Vertex>> {
        self.result
            .as_ref()
            .map(|result| result.reachable.iter().cloned().collect())
    }

    pub fn metrics(&self) -> Option<&FlowMetrics> {
        self.result.as_ref().map(|result| &result.metrics)
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn into_network(self) -> N {
        self.network
    }
}

impl<N: FlowNetwork + fmt::Debug> Algorithm for MaxFlow<N> {
    fn name(&self) -> &'static str {
        self.config.algorithm.display_name()
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        format!(
            "{} maximum flow with residual min-cut extraction, {} time",
            self.name(),
            self.complexity().time_complexity
        )
    }

    fn complexity(&self) -> AlgorithmComplexity {
        self.config.algorithm.complexity()
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter {
                name: "algorithm".to_string(),
                value: self.config.algorithm.to_string(),
                value_type: ParameterType::Enum(
                    MaxFlowAlgorithm::ALL
                        .iter()
                        .map(|algorithm| algorithm.as_str().to_string())
                        .collect(),
                ),
                description: "Strategy used by run_configured".to_string(),
            },
            AlgorithmParameter {
                name: "verify_invariants".to_string(),
                value: self.config.verify_invariants.to_string(),
                value_type: ParameterType::Boolean,
                description: "Audit the flow after every run".to_string(),
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "algorithm" => self.config.algorithm = value.parse()?,
            "verify_invariants" => {
                ParameterType::Boolean.validate(name, value)?;
                self.config.verify_invariants = value == "true";
            }
            _ => {
                return Err(AlgorithmError::InvalidParameter {
                    name: name.to_owned(),
                    reason: "unknown parameter".to_string(),
                })
            }
        }
        Ok(())
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        self.parameters()
            .into_iter()
            .find(|parameter| parameter.name == name)
            .map(|parameter| parameter.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::FlowGraph;
    use crate::data_structures::network::INFINITE_CAPACITY;

    fn scenario_a() -> FlowGraph<&'static str> {
        FlowGraph::from_arcs(vec![
            ("s", "1", 3.0),
            ("s", "2", 2.0),
            ("1", "2", 5.0),
            ("1", "t", 2.0),
            ("2", "t", 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!(MaxFlowAlgorithm::default(), MaxFlowAlgorithm::EdmondsKarp);
        assert_eq!(
            "push_relabel".parse::<MaxFlowAlgorithm>().unwrap(),
            MaxFlowAlgorithm::PushRelabel
        );
        assert_eq!(MaxFlowAlgorithm::EdmondsKarp.to_string(), "edmonds_karp");

        match "dinic".parse::<MaxFlowAlgorithm>() {
            Err(AlgorithmError::InvalidAlgorithm { name, valid }) => {
                assert_eq!(name, "dinic");
                assert_eq!(valid, "edmonds_karp, push_relabel");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_construction_zeroes_flow() {
        let mut graph = scenario_a();
        graph.set_flow(&"s", &"1", 3.0).unwrap();

        let engine = MaxFlow::new(graph.clone(), None, None).unwrap();
        assert_eq!(engine.network().flow(&"s", &"1").unwrap(), 0.0);

        let seeded = MaxFlow::with_seeded_flow(graph);
        assert_eq!(seeded.network().flow(&"s", &"1").unwrap(), 3.0);
    }

    #[test]
    fn test_missing_endpoint_leaves_network_untouched() {
        let mut engine = MaxFlow::new(scenario_a(), None, None).unwrap();
        assert!(matches!(
            engine.run(MaxFlowAlgorithm::EdmondsKarp),
            Err(AlgorithmError::MissingEndpoint("source and sink"))
        ));

        engine.set_source("s");
        assert!(matches!(
            engine.run(MaxFlowAlgorithm::PushRelabel),
            Err(AlgorithmError::MissingEndpoint("sink"))
        ));
        assert!(engine.max_flow_value().is_none());
        for (tail, head) in engine.network().arcs() {
            assert_eq!(engine.network().flow(&tail, &head).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_endpoint_validation() {
        let mut engine = MaxFlow::new(scenario_a(), Some("s"), Some("nowhere")).unwrap();
        assert!(matches!(
            engine.run_configured(),
            Err(AlgorithmError::MissingVertex(_))
        ));

        engine.set_sink("s");
        assert!(matches!(
            engine.run_configured(),
            Err(AlgorithmError::IdenticalEndpoints(_))
        ));
    }

    #[test]
    fn test_run_named_rejects_unknown_algorithm() {
        let mut engine = MaxFlow::new(scenario_a(), Some("s"), Some("t")).unwrap();
        assert!(matches!(
            engine.run_named("ford_fulkerson"),
            Err(AlgorithmError::InvalidAlgorithm { .. })
        ));
        assert_eq!(engine.run_named("push_relabel").unwrap().max_flow_value, 5.0);
    }

    #[test]
    fn test_accessors_after_run() {
        let mut engine = MaxFlow::new(scenario_a(), Some("s"), Some("t")).unwrap();
        engine.run(MaxFlowAlgorithm::EdmondsKarp).unwrap();

        assert_eq!(engine.max_flow_value(), Some(5.0));
        assert_eq!(engine.min_cut_value(), Some(5.0));
        assert_eq!(engine.reachable_set(), Some(HashSet::from(["s"])));
        assert_eq!(
            engine.min_cut_edge_set(),
            Some(HashSet::from([("s", "1"), ("s", "2")]))
        );
        let metrics = engine.metrics().unwrap();
        assert_eq!(metrics.algorithm, MaxFlowAlgorithm::EdmondsKarp);
        assert_eq!(metrics.steps_executed, metrics.augmenting_paths);

        engine.set_sink("2");
        assert!(engine.result().is_none());
    }

    #[test]
    fn test_parameters_round_trip() {
        let mut engine = MaxFlow::new(scenario_a(), Some("s"), Some("t")).unwrap();

        assert_eq!(engine.category(), "max_flow");
        assert_eq!(engine.name(), "Edmonds-Karp");
        assert_eq!(engine.get_parameter("algorithm").as_deref(), Some("edmonds_karp"));

        engine.set_parameter("algorithm", "push_relabel").unwrap();
        engine.set_parameter("verify_invariants", "true").unwrap();
        assert_eq!(engine.name(), "Push-Relabel FIFO");
        assert_eq!(engine.id().as_str(), "Push-Relabel FIFO");
        assert!(engine.config().verify_invariants);
        assert_eq!(engine.complexity().time_complexity, "O(V^2 * E)");

        assert!(engine.set_parameter("algorithm", "simplex").is_err());
        assert!(engine.set_parameter("verify_invariants", "sometimes").is_err());
        assert!(engine.set_parameter("global_relabel_frequency", "100").is_err());
        assert_eq!(engine.get_parameter("unknown"), None);

        let result = engine.run_configured().unwrap();
        assert_eq!(result.metrics.algorithm, MaxFlowAlgorithm::PushRelabel);
        assert_eq!(result.max_flow_value, 5.0);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: MaxFlowConfig =
            serde_json::from_str(r#"{"algorithm": "push_relabel"}"#).unwrap();
        assert_eq!(config.algorithm, MaxFlowAlgorithm::PushRelabel);
        assert!(!config.verify_invariants);

        let empty: MaxFlowConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, MaxFlowConfig::default());
    }

    #[test]
    fn test_verified_run_tolerates_decimal_rounding() {
        let graph = FlowGraph::from_arcs(vec![
            ("s", "a", 10.0),
            ("a", "x", 0.1),
            ("a", "y", 0.2),
            ("a", "z", 0.3),
            ("x", "x2", 0.1),
            ("x2", "t", 0.1),
            ("y", "t", 0.2),
            ("z", "t", 0.3),
        ])
        .unwrap();
        let config = MaxFlowConfig {
            verify_invariants: true,
            ..MaxFlowConfig::default()
        };

        for algorithm in MaxFlowAlgorithm::ALL {
            let mut engine = MaxFlow::new(graph.clone(), Some("s"), Some("t"))
                .unwrap()
                .with_config(config);
            let result = engine.run(algorithm).unwrap();
            assert!((result.max_flow_value - 0.6).abs() < 1e-12, "{}", algorithm);
            assert_eq!(
                engine.min_cut_edge_set(),
                Some(HashSet::from([("a", "x"), ("a", "y"), ("a", "z")]))
            );
        }
    }

    #[test]
    fn test_failed_run_restores_prior_flow() {
        let mut graph = FlowGraph::from_arcs(vec![
            ("s", "t", 2.0),
            ("s", "a", INFINITE_CAPACITY),
            ("a", "b", INFINITE_CAPACITY),
            ("b", "t", INFINITE_CAPACITY),
        ])
        .unwrap();
        graph.set_flow(&"s", &"t", 0.5).unwrap();
        let before = graph.flow_snapshot().unwrap();

        let mut engine = MaxFlow::with_seeded_flow(graph);
        engine.set_source("s");
        engine.set_sink("t");

        for algorithm in MaxFlowAlgorithm::ALL {
            // Edmonds-Karp fills s -> t before it meets the infinite path.
            assert!(matches!(engine.run(algorithm), Err(AlgorithmError::UnboundedFlow)));
            assert_eq!(engine.network().flow_snapshot().unwrap(), before, "{}", algorithm);
            assert!(engine.result().is_none());
        }
    }
}
