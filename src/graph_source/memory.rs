//! In-process property graph.
//!
//! Evaluates export projections directly against labelled nodes and typed,
//! directed relationships, with the same matching rules the Cypher rendering
//! expresses: a relationship row exists only when both endpoint labels match.
//! Can be built in code or loaded from a JSON snapshot:
//!
//! ```text
//! {
//!   "nodes": [
//!     { "labels": ["Course"], "properties": { "id": "c1" } },
//!     { "labels": ["Section"], "properties": { "crn": 12345.0 } }
//!   ],
//!   "relationships": [
//!     { "type": "OFFERS", "start": 0, "end": 1, "properties": {} }
//!   ]
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{GraphSource, RawRow};
use crate::errors::{ExportError, Result};
use crate::export_catalog::{Element, EntityExport, Pattern};

/// Index of a node inside a [`MemoryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef(usize);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryNode {
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRelationship {
    #[serde(rename = "type")]
    pub rel_type: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryGraph {
    #[serde(default)]
    nodes: Vec<MemoryNode>,
    #[serde(default)]
    relationships: Vec<MemoryRelationship>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot, rejecting relationships that point at missing nodes.
    pub fn from_json(text: &str) -> Result<Self> {
        let graph: MemoryGraph = serde_json::from_str(text)?;
        for (i, rel) in graph.relationships.iter().enumerate() {
            if rel.start >= graph.nodes.len() || rel.end >= graph.nodes.len() {
                return Err(dangling(i, &rel.rel_type));
            }
        }
        Ok(graph)
    }

    /// Add a node with a single label. Non-object `properties` are ignored.
    pub fn add_node(&mut self, label: &str, properties: Value) -> NodeRef {
        self.nodes.push(MemoryNode {
            labels: vec![label.to_string()],
            properties: into_map(properties),
        });
        NodeRef(self.nodes.len() - 1)
    }

    /// Connect two nodes of this graph. A `NodeRef` this graph never handed
    /// out is rejected.
    pub fn add_relationship(
        &mut self,
        start: NodeRef,
        rel_type: &str,
        end: NodeRef,
        properties: Value,
    ) -> Result<()> {
        if start.0 >= self.nodes.len() || end.0 >= self.nodes.len() {
            return Err(dangling(self.relationships.len(), rel_type));
        }
        self.relationships.push(MemoryRelationship {
            rel_type: rel_type.to_string(),
            start: start.0,
            end: end.0,
            properties: into_map(properties),
        });
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    fn has_label(&self, index: usize, label: &str) -> bool {
        self.nodes[index].labels.iter().any(|l| l == label)
    }

    fn project<'g>(
        entity: &EntityExport,
        lookup: impl Fn(Element) -> Option<&'g Map<String, Value>>,
    ) -> RawRow {
        entity
            .columns
            .iter()
            .map(|column| {
                let value = lookup(column.element)
                    .and_then(|props| props.get(column.property))
                    .cloned()
                    .unwrap_or(Value::Null);
                (column.name.to_string(), value)
            })
            .collect()
    }
}

fn dangling(index: usize, rel_type: &str) -> ExportError {
    ExportError::Snapshot(serde::de::Error::custom(format!(
        "relationship #{} ({}) references a missing node",
        index, rel_type
    )))
}

fn into_map(properties: Value) -> Map<String, Value> {
    match properties {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            log::warn!("Ignoring non-object properties {}", other);
            Map::new()
        }
    }
}

#[async_trait]
impl GraphSource for MemoryGraph {
    fn describe(&self) -> String {
        format!(
            "in-memory graph ({} nodes, {} relationships)",
            self.nodes.len(),
            self.relationships.len()
        )
    }

    async fn verify(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch(&self, entity: &EntityExport) -> Result<Vec<RawRow>> {
        let rows = match &entity.pattern {
            Pattern::Node { label } => self
                .nodes
                .iter()
                .filter(|n| n.labels.iter().any(|l| l == label))
                .map(|n| {
                    Self::project(entity, |element| {
                        (element == Element::Node).then_some(&n.properties)
                    })
                })
                .collect(),
            Pattern::Relationship {
                from_label,
                rel_type,
                to_label,
            } => self
                .relationships
                .iter()
                .filter(|r| {
                    r.rel_type == *rel_type
                        && self.has_label(r.start, from_label)
                        && self.has_label(r.end, to_label)
                })
                .map(|r| {
                    Self::project(entity, |element| match element {
                        Element::Start => Some(&self.nodes[r.start].properties),
                        Element::Edge => Some(&r.properties),
                        Element::End => Some(&self.nodes[r.end].properties),
                        Element::Node => None,
                    })
                })
                .collect(),
        };
        Ok(rows)
    }
}
