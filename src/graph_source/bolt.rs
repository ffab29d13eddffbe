//! Bolt-backed graph source (Memgraph / Neo4j).
//!
//! Holds a single-connection pool for the lifetime of the export, so every
//! projection runs on the same session one after another. The pool is closed
//! when the source is dropped, on success and on every error path alike.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph};
use serde_json::Value;

use super::{cypher, GraphSource, RawRow};
use crate::config::ExportConfig;
use crate::errors::{ExportError, Result};
use crate::export_catalog::EntityExport;

pub struct BoltSource {
    graph: Graph,
    uri: String,
}

impl BoltSource {
    /// Build the connection pool.
    ///
    /// The session is proven by [`GraphSource::verify`], which the exporter
    /// runs before touching the output directory. No retry: an unreachable
    /// server or rejected credentials end the run.
    pub async fn connect(config: &ExportConfig) -> Result<Self> {
        log::info!(
            "Connecting to graph database at {} as '{}'",
            config.uri,
            config.username
        );

        let bolt_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.username.as_str())
            .password(config.password.as_str())
            .fetch_size(config.fetch_size)
            .max_connections(1)
            .build()
            .map_err(|e| ExportError::connection(&config.uri, e))?;

        let graph = Graph::connect(bolt_config)
            .await
            .map_err(|e| ExportError::connection(&config.uri, e))?;

        Ok(Self {
            graph,
            uri: config.uri.clone(),
        })
    }
}

#[async_trait]
impl GraphSource for BoltSource {
    fn describe(&self) -> String {
        self.uri.clone()
    }

    async fn verify(&self) -> Result<()> {
        self.graph
            .run(query(cypher::PROBE_QUERY))
            .await
            .map_err(|e| ExportError::connection(&self.uri, e))
    }

    async fn fetch(&self, entity: &EntityExport) -> Result<Vec<RawRow>> {
        let file = entity.file_name();
        let text = cypher::render(entity);
        log::debug!("{}: {}", file, text);

        let mut stream = self
            .graph
            .execute(query(&text))
            .await
            .map_err(|e| ExportError::query(&file, e))?;

        let mut rows = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| ExportError::query(&file, e))?
        {
            let mut raw = RawRow::with_capacity(entity.columns.len());
            for column in &entity.columns {
                let value: Option<Value> =
                    row.get(column.name).map_err(|e| ExportError::Decode {
                        file: file.clone(),
                        column: column.name.to_string(),
                        message: e.to_string(),
                    })?;
                raw.insert(column.name.to_string(), value.unwrap_or(Value::Null));
            }
            rows.push(raw);
        }

        Ok(rows)
    }
}
