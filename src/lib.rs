//! graph-export - flatten the course scheduling graph into relational files
//!
//! This crate reads a Memgraph/Neo4j property graph over Bolt and writes:
//! - one CSV per node label and relationship type, with a fixed column layout
//! - a PostgreSQL schema (`_postgres_schema.sql`) matching those CSVs
//!
//! The mapping from graph to tables lives in [`export_catalog`]; the
//! pipeline that runs it lives in [`exporter`].

pub mod config;
pub mod errors;
pub mod export_catalog;
pub mod exporter;
pub mod graph_source;

pub use errors::{ExportError, Result};
