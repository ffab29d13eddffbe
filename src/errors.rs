//! # Export Error Types
//!
//! Every stage of the export fails fast. Errors carry the file or path they
//! were produced for so a crashed run tells the operator where it stopped.
//!
//! ## Error Categories
//!
//! - **Connection**: the graph store could not be reached or rejected the
//!   credentials. Raised before anything is written.
//! - **Query / Decode**: a projection query failed or returned a value the
//!   driver could not decode. Earlier files stay on disk.
//! - **Io / Csv**: the output directory or a file could not be written.
//! - **SchemaMismatch**: the embedded DDL and the export catalog disagree.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to connect to graph database at {uri}: {source}")]
    Connection {
        uri: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Query for `{file}` failed: {source}")]
    Query {
        file: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Could not decode column `{column}` for `{file}`: {message}")]
    Decode {
        file: String,
        column: String,
        message: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV write error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid graph snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Schema and export catalog disagree on table `{table}`: {message}")]
    SchemaMismatch { table: String, message: String },
}

impl ExportError {
    pub fn connection<E>(uri: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ExportError::Connection {
            uri: uri.into(),
            source: Box::new(source),
        }
    }

    pub fn query<E>(file: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ExportError::Query {
            file: file.into(),
            source: Box::new(source),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        ExportError::Csv {
            path: path.into(),
            source,
        }
    }
}
