//! Read-only access to the source graph.
//!
//! A [`GraphSource`] answers one question: "give me every match of this
//! entity's pattern, projected onto its columns". Values come back untyped
//! (as JSON values, the same representation the Bolt result transformer
//! uses for properties) and are coerced later by the exporter.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::Result;
use crate::export_catalog::EntityExport;

pub mod bolt;
pub mod cypher;
pub mod memory;

pub use bolt::BoltSource;
pub use memory::MemoryGraph;

/// One matched record keyed by output column name.
///
/// Columns the source had no value for may be absent or `Value::Null`; both
/// are written as empty fields.
pub type RawRow = HashMap<String, Value>;

#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Human-readable location used in log lines.
    fn describe(&self) -> String;

    /// Confirm the session is usable before anything is written.
    async fn verify(&self) -> Result<()>;

    /// Run the entity's projection and materialize every matching record.
    async fn fetch(&self, entity: &EntityExport) -> Result<Vec<RawRow>>;
}
