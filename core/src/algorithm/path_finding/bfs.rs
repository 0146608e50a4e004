//! Breadth-First Search with edge filtering
//!
//! Level-by-level exploration from a start vertex over any [`Adjacency`]
//! view. A caller-supplied predicate hides individual edges, which is how the
//! flow strategies search the residual graph without materializing it.
//!
//! # Properties
//! - Distances count edges, not weights
//! - First discovery wins: a vertex receives exactly one parent and one
//!   distance, assigned the first time it is reached in FIFO order
//! - Neighbors are expanded in the order the graph reports them
//! - Time O(V + E), space O(V)
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::{HashMap, VecDeque};

use crate::algorithm::traits::AlgorithmError;
use crate::data_structures::network::{Adjacency, Vertex};

/// Parent and distance maps produced by one search
#[derive(Debug, Clone)]
pub struct SearchTree<V: Vertex> {
    start: V,
    parent: HashMap<V, Option<V>>,
    distance: HashMap<V, usize>,
    /// Vertices in the order they were discovered
    order: Vec<V>,
}

impl<V: Vertex> SearchTree<V> {
    fn rooted_at(start: V) -> Self {
        let mut parent = HashMap::new();
        let mut distance = HashMap::new();
        parent.insert(start.clone(), None);
        distance.insert(start.clone(), 0);
        Self {
            order: vec![start.clone()],
            start,
            parent,
            distance,
        }
    }

    pub fn start(&self) -> &V {
        &self.start
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.distance.contains_key(vertex)
    }

    /// Hop count from the start, if reached
    pub fn distance(&self, vertex: &V) -> Option<usize> {
        self.distance.get(vertex).copied()
    }

    /// Predecessor on the search tree; `None` for the start and unreached vertices
    pub fn parent(&self, vertex: &V) -> Option<&V> {
        self.parent.get(vertex).and_then(Option::as_ref)
    }

    pub fn discovery_order(&self) -> &[V] {
        &self.order
    }

    pub fn into_discovery_order(self) -> Vec<V> {
        self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Walks parent pointers back from `goal` and returns the start-to-goal path
    pub fn path_to(&self, goal: &V) -> Option<Vec<V>> {
        if !self.contains(goal) {
            return None;
        }

        let mut path = vec![goal.clone()];
        let mut current = goal;
        while let Some(previous) = self.parent(current) {
            path.push(previous.clone());
            current = previous;
        }
        path.reverse();
        Some(path)
    }

    fn discover(&mut self, vertex: V, from: &V) {
        let depth = self.distance[from] + 1;
        self.parent.insert(vertex.clone(), Some(from.clone()));
        self.distance.insert(vertex.clone(), depth);
        self.order.push(vertex);
    }
}

/// Breadth-first search configuration
#[derive(Debug, Clone)]
pub struct BreadthFirstSearch<V: Vertex> {
    start: V,
    goal: Option<V>,
}

impl<V: Vertex> BreadthFirstSearch<V> {
    pub fn new(start: V) -> Self {
        Self { start, goal: None }
    }

    /// Stops expanding once `goal` is dequeued. Everything discovered up to that
    /// point stays in the tree; without a goal the whole component is visited.
    pub fn with_goal(mut self, goal: V) -> Self {
        self.goal = Some(goal);
        self
    }

    /// Runs the search over every edge
    pub fn run_unfiltered<G>(&self, graph: &G) -> Result<SearchTree<V>, AlgorithmError>
    where
        G: Adjacency<Vertex = V>,
    {
        self.run(graph, |_, _| Ok(false))
    }

    /// Runs the search, skipping edge `(u, v)` whenever `skip(u, v)` is true
    pub fn run<G, F>(&self, graph: &G, mut skip: F) -> Result<SearchTree<V>, AlgorithmError>
    where
        G: Adjacency<Vertex = V>,
        F: FnMut(&V, &V) -> Result<bool, AlgorithmError>,
    {
        if !graph.contains_vertex(&self.start) {
            return Err(AlgorithmError::missing_vertex(&self.start));
        }

        let mut tree = SearchTree::rooted_at(self.start.clone());
        let mut frontier = VecDeque::new();
        frontier.push_back(self.start.clone());

        while let Some(current) = frontier.pop_front() {
            if self.goal.as_ref() == Some(&current) {
                break;
            }

            for next in graph.neighbors(&current)? {
                if tree.contains(next) || skip(&current, next)? {
                    continue;
                }
                tree.discover(next.clone(), &current);
                frontier.push_back(next.clone());
            }
        }

        Ok(tree)
    }
}
