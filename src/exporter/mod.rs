//! # Export Pipeline
//!
//! Drives one full export against a [`GraphSource`]:
//!
//! ```text
//! schema/catalog check -> source probe -> output dir
//!     -> node tables -> join tables -> _postgres_schema.sql
//! ```
//!
//! Nothing touches the filesystem until the source has answered its probe, so
//! a failed connection leaves any previous export untouched. After that every
//! table is fetched, flattened, sorted and written before the next query runs;
//! a failure stops the run with earlier files left in place.

use std::path::PathBuf;

use crate::config::ExportConfig;
use crate::errors::{ExportError, Result};
use crate::export_catalog::{node_exports, relationship_exports, Cell, EntityExport};
use crate::graph_source::{BoltSource, GraphSource, RawRow};

pub mod csv_writer;
pub mod schema_emitter;

/// Row count of one written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub output_dir: PathBuf,
    pub files: Vec<ExportedFile>,
    pub schema_path: PathBuf,
}

impl ExportSummary {
    pub fn total_rows(&self) -> usize {
        self.files.iter().map(|f| f.rows).sum()
    }

    pub fn rows_for(&self, file_name: &str) -> Option<usize> {
        self.files
            .iter()
            .find(|f| f.file_name == file_name)
            .map(|f| f.rows)
    }
}

/// Connect to the configured database and export everything.
///
/// The Bolt session lives for the duration of this call and is released when
/// it returns, whether the export succeeded or not.
pub async fn run_with_config(config: &ExportConfig) -> Result<ExportSummary> {
    let source = BoltSource::connect(config).await?;
    Exporter::new(&source, &config.output_dir).run().await
}

pub struct Exporter<'a, S: GraphSource + ?Sized> {
    source: &'a S,
    output_dir: PathBuf,
    nodes: Vec<EntityExport>,
    relationships: Vec<EntityExport>,
}

impl<'a, S: GraphSource + ?Sized> Exporter<'a, S> {
    pub fn new(source: &'a S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            nodes: node_exports(),
            relationships: relationship_exports(),
        }
    }

    pub async fn run(&self) -> Result<ExportSummary> {
        let all: Vec<EntityExport> = self
            .nodes
            .iter()
            .chain(&self.relationships)
            .cloned()
            .collect();
        schema_emitter::verify_against_catalog(&all)?;

        self.source.verify().await?;
        log::info!("✓ Connected to {}", self.source.describe());

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| ExportError::io(&self.output_dir, e))?;
        log::info!(
            "Exporting {} into {}",
            self.source.describe(),
            self.output_dir.display()
        );

        let mut files = Vec::with_capacity(all.len());

        log::info!("== Nodes ==");
        for entity in &self.nodes {
            files.push(self.export_entity(entity).await?);
        }

        log::info!("== Relationships ==");
        for entity in &self.relationships {
            files.push(self.export_entity(entity).await?);
        }

        log::info!("== PostgreSQL DDL ==");
        let schema_path = schema_emitter::write_schema(&self.output_dir)?;

        Ok(ExportSummary {
            output_dir: self.output_dir.clone(),
            files,
            schema_path,
        })
    }

    async fn export_entity(&self, entity: &EntityExport) -> Result<ExportedFile> {
        let file_name = entity.file_name();
        let raw = self.source.fetch(entity).await?;
        let rows = flatten_rows(entity, &raw);

        csv_writer::write_table(&self.output_dir, &file_name, &entity.header(), &rows)?;
        log::info!("  -> {}: {} rows", file_name, rows.len());

        Ok(ExportedFile {
            file_name,
            rows: rows.len(),
        })
    }
}

/// Coerce one record onto the entity's column list.
///
/// Only declared columns are read: extra keys are dropped, absent keys become
/// the coercion's fallback.
pub fn flatten(entity: &EntityExport, raw: &RawRow) -> Vec<Cell> {
    entity
        .columns
        .iter()
        .map(|column| match raw.get(column.name) {
            Some(value) => column.coercion.apply(value),
            None => column.coercion.apply(&serde_json::Value::Null),
        })
        .collect()
}

/// Flatten every record and sort by key columns, then by the whole row.
pub fn flatten_rows(entity: &EntityExport, raw: &[RawRow]) -> Vec<Vec<Cell>> {
    let key = entity.key_indices();
    let mut rows: Vec<Vec<Cell>> = raw.iter().map(|r| flatten(entity, r)).collect();
    rows.sort_by(|a, b| {
        key.iter()
            .map(|&i| a[i].sort_cmp(&b[i]))
            .chain(a.iter().zip(b.iter()).map(|(x, y)| x.sort_cmp(y)))
            .find(|o| o.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}
