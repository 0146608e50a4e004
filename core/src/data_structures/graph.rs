//! Capacitated graph implementing the flow network contract
//!
//! `FlowGraph` keeps arc records in a flat vector addressed through a nested
//! `tail -> head -> slot` lookup map for O(1) access, plus an insertion-ordered
//! vertex list and a symmetric adjacency list so that iteration order (and
//! therefore every search and push order built on it) is deterministic.
//!
//! # Undirected edges
//! An undirected edge is a single record with one capacity and one signed
//! flow measured along the orientation it was inserted with. Both ordered
//! pairs resolve to that record: `flow(a, b)` is the positive part of the
//! signed flow seen from `a`, `flow(b, a)` the positive part seen from `b`, so
//! at most one direction carries flow at any time.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::network::{
    Adjacency, ArcField, Capacity, Flow, FlowNetwork, Vertex, INFINITE_CAPACITY,
};

/// How an arc record answers for its two ordered pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcKind {
    /// Only `(tail, head)` exists
    Directed,
    /// Both `(tail, head)` and `(head, tail)` share this record
    Undirected,
}

#[derive(Debug, Clone)]
struct ArcRecord<V> {
    tail: V,
    head: V,
    capacity: Capacity,
    flow: Flow,
    kind: ArcKind,
}

impl<V: Vertex> ArcRecord<V> {
    /// Signed flow seen from `from`
    #[inline]
    fn oriented_flow(&self, from: &V) -> Flow {
        if *from == self.tail {
            self.flow
        } else {
            -self.flow
        }
    }

    fn flow_from(&self, from: &V) -> Flow {
        match self.kind {
            ArcKind::Directed => self.flow,
            ArcKind::Undirected => self.oriented_flow(from).max(0.0),
        }
    }

    fn set_flow_from(&mut self, from: &V, flow: Flow) {
        match self.kind {
            ArcKind::Directed => self.flow = flow,
            ArcKind::Undirected => {
                let sign = if *from == self.tail { 1.0 } else { -1.0 };
                if flow > 0.0 {
                    self.flow = sign * flow;
                } else if self.oriented_flow(from) > 0.0 {
                    // Clearing this direction must not wipe flow running the other way.
                    self.flow = 0.0;
                }
            }
        }
    }
}

/// Serializable description of one arc or undirected edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec<V> {
    pub tail: V,
    pub head: V,
    /// Finite number, or the string `"inf"` for an unbounded arc
    #[serde(with = "capacity_repr")]
    pub capacity: Capacity,
    /// Seeded flow; for undirected edges the signed flow from `tail` to `head`
    #[serde(default)]
    pub flow: Flow,
    #[serde(default)]
    pub undirected: bool,
}

impl<V> ArcSpec<V> {
    pub fn new(tail: V, head: V, capacity: Capacity) -> Self {
        Self {
            tail,
            head,
            capacity,
            flow: 0.0,
            undirected: false,
        }
    }

    pub fn undirected(a: V, b: V, capacity: Capacity) -> Self {
        Self {
            undirected: true,
            ..Self::new(a, b, capacity)
        }
    }
}

mod capacity_repr {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Capacity, INFINITE_CAPACITY};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Named(String),
    }

    pub fn serialize<S: Serializer>(capacity: &Capacity, serializer: S) -> Result<S::Ok, S::Error> {
        if *capacity == INFINITE_CAPACITY {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_f64(*capacity)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Capacity, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Named(name) => match name.to_ascii_lowercase().as_str() {
                "inf" | "infinity" => Ok(INFINITE_CAPACITY),
                other => Err(D::Error::custom(format!("unrecognized capacity '{}'", other))),
            },
        }
    }
}

/// Capacitated graph with deterministic iteration order
#[derive(Debug, Clone)]
pub struct FlowGraph<V: Vertex> {
    /// Vertices in first-seen order
    vertices: Vec<V>,
    /// Symmetric adjacency in first-seen order
    adjacency: HashMap<V, Vec<V>>,
    /// Arc storage
    records: Vec<ArcRecord<V>>,
    /// tail -> head -> index into `records`
    lookup: HashMap<V, HashMap<V, usize>>,
}

impl<V: Vertex> Default for FlowGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex> FlowGraph<V> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            adjacency: HashMap::new(),
            records: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Builds a directed graph from `(tail, head, capacity)` triples
    pub fn from_arcs<I>(arcs: I) -> Result<Self, AlgorithmError>
    where
        I: IntoIterator<Item = (V, V, Capacity)>,
    {
        let mut graph = Self::new();
        for (tail, head, capacity) in arcs {
            graph.add_arc(tail, head, capacity)?;
        }
        Ok(graph)
    }

    pub fn from_specs<I>(specs: I) -> Result<Self, AlgorithmError>
    where
        I: IntoIterator<Item = ArcSpec<V>>,
    {
        let mut graph = Self::new();
        for spec in specs {
            let kind = if spec.undirected {
                ArcKind::Undirected
            } else {
                ArcKind::Directed
            };
            let slot = graph.insert_record(spec.tail, spec.head, spec.capacity, kind)?;
            graph.records[slot].flow = spec.flow;
        }
        Ok(graph)
    }

    /// Snapshot of every record, including current flow, in insertion order
    pub fn to_specs(&self) -> Vec<ArcSpec<V>> {
        self.records
            .iter()
            .map(|record| ArcSpec {
                tail: record.tail.clone(),
                head: record.head.clone(),
                capacity: record.capacity,
                flow: record.flow,
                undirected: record.kind == ArcKind::Undirected,
            })
            .collect()
    }

    /// Parses a JSON array of [`ArcSpec`]
    pub fn from_json(json: &str) -> Result<Self, AlgorithmError>
    where
        V: DeserializeOwned,
    {
        let specs: Vec<ArcSpec<V>> = serde_json::from_str(json)?;
        Self::from_specs(specs)
    }

    pub fn to_json(&self) -> Result<String, AlgorithmError>
    where
        V: Serialize,
    {
        Ok(serde_json::to_string_pretty(&self.to_specs())?)
    }

    /// Registers an isolated vertex. Returns `false` if it was already present.
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.adjacency.contains_key(&vertex) {
            return false;
        }
        self.adjacency.insert(vertex.clone(), Vec::new());
        self.vertices.push(vertex);
        true
    }

    pub fn add_arc(&mut self, tail: V, head: V, capacity: Capacity) -> Result<(), AlgorithmError> {
        self.insert_record(tail, head, capacity, ArcKind::Directed)
            .map(|_| ())
    }

    pub fn add_undirected_edge(
        &mut self,
        a: V,
        b: V,
        capacity: Capacity,
    ) -> Result<(), AlgorithmError> {
        self.insert_record(a, b, capacity, ArcKind::Undirected)
            .map(|_| ())
    }

    /// Number of stored records (an undirected edge counts once)
    pub fn arc_count(&self) -> usize {
        self.records.len()
    }

    pub fn arc_kind(&self, tail: &V, head: &V) -> Option<ArcKind> {
        self.slot(tail, head).map(|slot| self.records[slot].kind)
    }

    #[inline]
    fn slot(&self, tail: &V, head: &V) -> Option<usize> {
        self.lookup.get(tail).and_then(|heads| heads.get(head)).copied()
    }

    fn record(&self, tail: &V, head: &V) -> Result<&ArcRecord<V>, AlgorithmError> {
        self.slot(tail, head)
            .map(|slot| &self.records[slot])
            .ok_or_else(|| AlgorithmError::missing_arc(tail, head))
    }

    fn record_mut(&mut self, tail: &V, head: &V) -> Result<&mut ArcRecord<V>, AlgorithmError> {
        match self.slot(tail, head) {
            Some(slot) => Ok(&mut self.records[slot]),
            None => Err(AlgorithmError::missing_arc(tail, head)),
        }
    }

    fn check_capacity(tail: &V, head: &V, capacity: Capacity) -> Result<(), AlgorithmError> {
        if capacity.is_nan() || capacity < 0.0 {
            return Err(AlgorithmError::InvalidCapacity {
                tail: format!("{:?}", tail),
                head: format!("{:?}", head),
                capacity,
            });
        }
        Ok(())
    }

    fn insert_record(
        &mut self,
        tail: V,
        head: V,
        capacity: Capacity,
        kind: ArcKind,
    ) -> Result<usize, AlgorithmError> {
        if tail == head {
            return Err(AlgorithmError::InvalidGraph(format!(
                "self-loop on {:?} cannot carry flow",
                tail
            )));
        }
        Self::check_capacity(&tail, &head, capacity)?;

        // Undirected records are registered under both pairs, so one lookup covers them.
        let clashes = self.slot(&tail, &head).is_some()
            || (kind == ArcKind::Undirected && self.slot(&head, &tail).is_some());
        if clashes {
            return Err(AlgorithmError::DuplicateArc {
                tail: format!("{:?}", tail),
                head: format!("{:?}", head),
            });
        }

        self.add_vertex(tail.clone());
        self.add_vertex(head.clone());
        self.link(&tail, &head);
        self.link(&head, &tail);

        let slot = self.records.len();
        self.lookup
            .entry(tail.clone())
            .or_default()
            .insert(head.clone(), slot);
        if kind == ArcKind::Undirected {
            self.lookup
                .entry(head.clone())
                .or_default()
                .insert(tail.clone(), slot);
        }

        self.records.push(ArcRecord {
            tail,
            head,
            capacity,
            flow: 0.0,
            kind,
        });
        Ok(slot)
    }

    fn link(&mut self, from: &V, to: &V) {
        let neighbors = self.adjacency.entry(from.clone()).or_default();
        if !neighbors.contains(to) {
            neighbors.push(to.clone());
        }
    }
}

impl<V: Vertex> Adjacency for FlowGraph<V> {
    type Vertex = V;

    fn contains_vertex(&self, vertex: &V) -> bool {
        self.adjacency.contains_key(vertex)
    }

    fn neighbors(&self, vertex: &V) -> Result<&[V], AlgorithmError> {
        self.adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .ok_or_else(|| AlgorithmError::missing_vertex(vertex))
    }
}

impl<V: Vertex> FlowNetwork for FlowGraph<V> {
    fn vertices(&self) -> &[V] {
        &self.vertices
    }

    fn arcs(&self) -> Vec<(V, V)> {
        let mut arcs = Vec::with_capacity(self.records.len());
        for record in &self.records {
            arcs.push((record.tail.clone(), record.head.clone()));
            if record.kind == ArcKind::Undirected {
                arcs.push((record.head.clone(), record.tail.clone()));
            }
        }
        arcs
    }

    fn arc_exists(&self, tail: &V, head: &V) -> bool {
        self.slot(tail, head).is_some()
    }

    fn arc_field(&self, tail: &V, head: &V, field: ArcField) -> Result<f64, AlgorithmError> {
        let record = self.record(tail, head)?;
        Ok(match field {
            ArcField::Capacity => record.capacity,
            ArcField::Flow => record.flow_from(tail),
        })
    }

    fn set_arc_field(
        &mut self,
        tail: &V,
        head: &V,
        field: ArcField,
        value: f64,
    ) -> Result<(), AlgorithmError> {
        if field == ArcField::Capacity {
            Self::check_capacity(tail, head, value)?;
        }
        let record = self.record_mut(tail, head)?;
        match field {
            ArcField::Capacity => record.capacity = value,
            ArcField::Flow => record.set_flow_from(tail, value),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_creation_and_basic_operations() {
        let graph = FlowGraph::from_arcs(vec![("s", "a", 4.0), ("a", "t", 2.0), ("s", "t", 1.0)])
            .unwrap();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.arc_count(), 3);
        assert_eq!(graph.vertices(), &["s", "a", "t"]);
        assert!(graph.arc_exists(&"s", &"a"));
        assert!(!graph.arc_exists(&"a", &"s"));
        assert_eq!(graph.capacity(&"a", &"t").unwrap(), 2.0);
        assert_eq!(graph.flow(&"a", &"t").unwrap(), 0.0);
        assert!(matches!(
            graph.capacity(&"t", &"s"),
            Err(AlgorithmError::MissingArc { .. })
        ));
    }

    #[test]
    fn test_adjacency_is_symmetric_and_ordered() {
        let graph = FlowGraph::from_arcs(vec![
            ("s", "1", 3.0),
            ("s", "2", 2.0),
            ("1", "2", 5.0),
            ("1", "t", 2.0),
            ("2", "t", 3.0),
        ])
        .unwrap();

        assert_eq!(graph.neighbors(&"s").unwrap(), &["1", "2"]);
        assert_eq!(graph.neighbors(&"1").unwrap(), &["s", "2", "t"]);
        assert_eq!(graph.neighbors(&"t").unwrap(), &["1", "2"]);
        assert!(matches!(
            graph.neighbors(&"x"),
            Err(AlgorithmError::MissingVertex(_))
        ));
    }

    #[test]
    fn test_anti_parallel_arcs_are_independent() {
        let mut graph = FlowGraph::from_arcs(vec![(1, 2, 5.0), (2, 1, 3.0)]).unwrap();
        graph.set_flow(&1, &2, 4.0).unwrap();

        assert_eq!(graph.flow(&1, &2).unwrap(), 4.0);
        assert_eq!(graph.flow(&2, &1).unwrap(), 0.0);
        assert_eq!(graph.neighbors(&1).unwrap(), &[2]);
    }

    #[test]
    fn test_rejects_invalid_arcs() {
        let mut graph = FlowGraph::new();
        graph.add_arc("a", "b", 1.0).unwrap();

        assert!(matches!(
            graph.add_arc("a", "b", 2.0),
            Err(AlgorithmError::DuplicateArc { .. })
        ));
        assert!(matches!(
            graph.add_arc("b", "c", -1.0),
            Err(AlgorithmError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            graph.add_arc("c", "d", f64::NAN),
            Err(AlgorithmError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            graph.add_arc("c", "c", 1.0),
            Err(AlgorithmError::InvalidGraph(_))
        ));
        assert!(matches!(
            graph.add_undirected_edge("b", "a", 1.0),
            Err(AlgorithmError::DuplicateArc { .. })
        ));
        assert!(matches!(
            graph.set_arc_field(&"a", &"b", ArcField::Capacity, -2.0),
            Err(AlgorithmError::InvalidCapacity { .. })
        ));
        assert_eq!(graph.arc_count(), 1);
    }

    #[test]
    fn test_undirected_edge_shares_one_record() {
        let mut graph = FlowGraph::new();
        graph.add_undirected_edge("a", "b", 6.0).unwrap();

        assert!(graph.arc_exists(&"a", &"b"));
        assert!(graph.arc_exists(&"b", &"a"));
        assert_eq!(graph.arc_count(), 1);
        assert_eq!(graph.arcs().len(), 2);
        assert_eq!(graph.arc_kind(&"b", &"a"), Some(ArcKind::Undirected));

        graph.set_flow(&"b", &"a", 4.0).unwrap();
        assert_eq!(graph.flow(&"b", &"a").unwrap(), 4.0);
        assert_eq!(graph.flow(&"a", &"b").unwrap(), 0.0);

        // Clearing the idle direction leaves the loaded one alone.
        graph.set_flow(&"a", &"b", 0.0).unwrap();
        assert_eq!(graph.flow(&"b", &"a").unwrap(), 4.0);

        graph.set_flow(&"b", &"a", 0.0).unwrap();
        graph.set_flow(&"a", &"b", 2.0).unwrap();
        assert_eq!(graph.flow(&"a", &"b").unwrap(), 2.0);
        assert_eq!(graph.flow(&"b", &"a").unwrap(), 0.0);
        assert_eq!(graph.capacity(&"b", &"a").unwrap(), 6.0);
    }

    #[test]
    fn test_reset_flows() {
        let mut graph = FlowGraph::new();
        graph.add_arc(0, 1, 3.0).unwrap();
        graph.add_undirected_edge(1, 2, 3.0).unwrap();
        graph.set_flow(&0, &1, 3.0).unwrap();
        graph.set_flow(&2, &1, 1.0).unwrap();

        graph.reset_flows().unwrap();

        for (tail, head) in graph.arcs() {
            assert_eq!(graph.flow(&tail, &head).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_flow_snapshot_restores_undirected_direction() {
        let mut graph = FlowGraph::new();
        graph.add_arc(0, 1, 3.0).unwrap();
        graph.add_undirected_edge(1, 2, 3.0).unwrap();
        graph.set_flow(&0, &1, 2.0).unwrap();
        graph.set_flow(&2, &1, 1.5).unwrap();
        let snapshot = graph.flow_snapshot().unwrap();

        graph.set_flow(&0, &1, 0.0).unwrap();
        graph.set_flow(&1, &2, 3.0).unwrap();
        graph.restore_flows(&snapshot).unwrap();

        assert_eq!(graph.flow(&0, &1).unwrap(), 2.0);
        assert_eq!(graph.flow(&2, &1).unwrap(), 1.5);
        assert_eq!(graph.flow(&1, &2).unwrap(), 0.0);
        assert_eq!(graph.flow_snapshot().unwrap(), snapshot);
    }

    #[test]
    fn test_json_round_trip_with_infinite_capacity() {
        let json = r#"[
            {"tail": "r", "head": "a", "capacity": 2},
            {"tail": "a", "head": "e", "capacity": "inf"},
            {"tail": "e", "head": "s", "capacity": 7, "flow": 1.5},
            {"tail": "e", "head": "x", "capacity": 1, "undirected": true}
        ]"#;

        let graph: FlowGraph<String> = FlowGraph::from_json(json).unwrap();
        let a = "a".to_string();
        let e = "e".to_string();
        let s = "s".to_string();
        let x = "x".to_string();

        assert!(graph.capacity(&a, &e).unwrap().is_infinite());
        assert_eq!(graph.flow(&e, &s).unwrap(), 1.5);
        assert!(graph.arc_exists(&x, &e));

        let restored: FlowGraph<String> = FlowGraph::from_json(&graph.to_json().unwrap()).unwrap();
        assert_eq!(restored.to_specs(), graph.to_specs());
    }

    #[test]
    fn test_json_rejects_unknown_capacity_name() {
        let json = r#"[{"tail": 1, "head": 2, "capacity": "lots"}]"#;
        assert!(matches!(
            FlowGraph::<u32>::from_json(json),
            Err(AlgorithmError::Serialization(_))
        ));
    }
}
