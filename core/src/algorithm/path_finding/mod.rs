//! Graph search primitives shared by the flow algorithms
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod bfs;

pub use self::bfs::{BreadthFirstSearch, SearchTree};
