//! Integration tests - full exports against an in-memory graph source
//!
//! These tests run the whole pipeline (fetch, flatten, CSV, schema) into
//! temporary directories without requiring a running graph database.

mod export_tests;

use std::path::Path;

use graph_export::graph_source::MemoryGraph;

pub fn fixture_graph() -> MemoryGraph {
    let text = include_str!("../fixtures/scheduling_graph.json");
    MemoryGraph::from_json(text).expect("fixture snapshot should load")
}

pub fn read(dir: &Path, file: &str) -> String {
    std::fs::read_to_string(dir.join(file)).unwrap_or_else(|e| panic!("reading {}: {}", file, e))
}
