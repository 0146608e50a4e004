//! Core algorithm trait definitions for the flow engine
//!
//! This module establishes the descriptor trait shared by the flow
//! algorithms, the typed parameter surface used to configure them, and the
//! error type every fallible operation in the crate returns.
//!
//! # Key Design Principles
//! - Closed, typed parameters validated at the boundary
//! - One error enum propagated with `?` from collaborator to engine
//! - Per-run profiling through named counters
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Universal algorithm identifier for type-safe dispatch
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmId(String);

impl AlgorithmId {
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Algorithm parameter with strongly typed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmParameter {
    pub name: String,
    pub value: String,
    pub value_type: ParameterType,
    pub description: String,
}

/// Parameter type enumeration for type-safe parameter handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterType {
    Boolean,
    Enum(Vec<String>),
}

impl ParameterType {
    /// Checks a raw textual value against the declared type
    pub fn validate(&self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        let invalid = |reason: String| AlgorithmError::InvalidParameter {
            name: name.to_owned(),
            reason,
        };

        match self {
            ParameterType::Boolean => value
                .parse::<bool>()
                .map(|_| ())
                .map_err(|_| invalid(format!("'{}' is not a boolean", value))),
            ParameterType::Enum(allowed) => {
                if allowed.iter().any(|candidate| candidate == value) {
                    Ok(())
                } else {
                    Err(invalid(format!(
                        "'{}' is not one of: {}",
                        value,
                        allowed.join(", ")
                    )))
                }
            }
        }
    }
}

/// Comprehensive error types for flow operations
#[derive(Debug, thiserror::Error)]
pub enum AlgorithmError {
    #[error("Missing endpoint: {0} must be set before running")]
    MissingEndpoint(&'static str),

    #[error("Invalid algorithm '{name}', expected one of: {valid}")]
    InvalidAlgorithm { name: String, valid: String },

    #[error("Source and sink must differ, both are {0}")]
    IdenticalEndpoints(String),

    #[error("Vertex not found: {0}")]
    MissingVertex(String),

    #[error("Arc not found: ({tail}, {head})")]
    MissingArc { tail: String, head: String },

    #[error("Duplicate arc: ({tail}, {head})")]
    DuplicateArc { tail: String, head: String },

    #[error("Invalid capacity {capacity} on arc ({tail}, {head})")]
    InvalidCapacity {
        tail: String,
        head: String,
        capacity: f64,
    },

    #[error("Invalid graph state: {0}")]
    InvalidGraph(String),

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Maximum flow is unbounded: an augmenting route has infinite residual capacity")]
    UnboundedFlow,

    #[error("Flow invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AlgorithmError {
    /// Builds a not-found error for a single vertex
    pub fn missing_vertex<V: Debug>(vertex: &V) -> Self {
        AlgorithmError::MissingVertex(format!("{:?}", vertex))
    }

    /// Builds a not-found error for the ordered pair `(tail, head)`
    pub fn missing_arc<V: Debug>(tail: &V, head: &V) -> Self {
        AlgorithmError::MissingArc {
            tail: format!("{:?}", tail),
            head: format!("{:?}", head),
        }
    }
}

/// Algorithm complexity information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Descriptor and configuration surface shared by the flow algorithms
pub trait Algorithm: Debug {
    /// Returns the algorithm's unique identifier
    fn id(&self) -> AlgorithmId {
        AlgorithmId::new(self.name())
    }

    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category (e.g., max_flow)
    fn category(&self) -> &'static str;

    /// Returns the algorithm's description with complexity guarantees
    fn description(&self) -> String;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Returns supported parameters with type information
    fn parameters(&self) -> Vec<AlgorithmParameter>;

    /// Sets algorithm parameter with type validation
    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError>;

    /// Gets algorithm parameter value
    fn get_parameter(&self, name: &str) -> Option<String>;
}

/// Algorithm execution metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlgorithmMetrics {
    pub steps_executed: usize,
    pub nodes_explored: usize,
    pub execution_time: Duration,
    pub custom_metrics: HashMap<String, f64>,
}

/// Performance profiling for a single run
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: AlgorithmMetrics,
    start_time: Option<Instant>,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.metrics.execution_time = start.elapsed();
        }
    }

    pub fn record_step(&mut self) {
        self.metrics.steps_executed += 1;
    }

    pub fn record_nodes_explored(&mut self, count: usize) {
        self.metrics.nodes_explored += count;
    }

    /// Increments a named counter
    pub fn bump(&mut self, counter: &str) {
        *self
            .metrics
            .custom_metrics
            .entry(counter.to_owned())
            .or_insert(0.0) += 1.0;
    }

    pub fn counter(&self, counter: &str) -> usize {
        self.metrics
            .custom_metrics
            .get(counter)
            .map(|value| *value as usize)
            .unwrap_or(0)
    }

    pub fn get_metrics(&self) -> AlgorithmMetrics {
        self.metrics.clone()
    }
}
