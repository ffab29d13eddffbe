//! PostgreSQL schema emission.
//!
//! The DDL is hand-maintained in `postgres_schema.sql` and embedded at build
//! time. It is never derived from the live graph. Its CREATE TABLE column
//! lists must match the export catalog; [`verify_against_catalog`] reads them
//! back out of the text so a drift between the two is caught before a run.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{ExportError, Result};
use crate::export_catalog::EntityExport;

pub const SCHEMA_FILE_NAME: &str = "_postgres_schema.sql";

pub const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

static CREATE_TABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)CREATE TABLE (\w+) \((.*?)\n\);").unwrap());

static CREATE_INDEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"CREATE INDEX ON (\w+) \((\w+)\);").unwrap());

/// A table as declared in the DDL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredTable {
    pub name: String,
    pub columns: Vec<String>,
}

/// Tables and their column names, in declaration order.
pub fn declared_tables(ddl: &str) -> Vec<DeclaredTable> {
    CREATE_TABLE_PATTERN
        .captures_iter(ddl)
        .map(|caps| {
            let columns = caps[2]
                .lines()
                .map(|line| line.split("--").next().unwrap_or("").trim())
                .filter(|line| !line.is_empty() && !line.starts_with("PRIMARY KEY"))
                .filter_map(|line| line.split_whitespace().next())
                .map(str::to_string)
                .collect();
            DeclaredTable {
                name: caps[1].to_string(),
                columns,
            }
        })
        .collect()
}

/// `(table, column)` pairs for every `CREATE INDEX` statement.
pub fn declared_indexes(ddl: &str) -> Vec<(String, String)> {
    CREATE_INDEX_PATTERN
        .captures_iter(ddl)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Fail when the embedded DDL and the catalog disagree on any table.
pub fn verify_against_catalog(catalog: &[EntityExport]) -> Result<()> {
    let declared = declared_tables(POSTGRES_SCHEMA);

    for entity in catalog {
        let Some(table) = declared.iter().find(|t| t.name == entity.table) else {
            return Err(ExportError::SchemaMismatch {
                table: entity.table.to_string(),
                message: "no CREATE TABLE statement".to_string(),
            });
        };
        let header = entity.header();
        if table.columns != header {
            return Err(ExportError::SchemaMismatch {
                table: entity.table.to_string(),
                message: format!(
                    "DDL declares [{}], export writes [{}]",
                    table.columns.join(", "),
                    header.join(", ")
                ),
            });
        }
    }

    if let Some(extra) = declared
        .iter()
        .find(|t| !catalog.iter().any(|e| e.table == t.name))
    {
        return Err(ExportError::SchemaMismatch {
            table: extra.name.clone(),
            message: "declared in DDL but never exported".to_string(),
        });
    }

    Ok(())
}

/// Write the schema file, replacing any previous version.
pub fn write_schema(output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(SCHEMA_FILE_NAME);
    std::fs::write(&path, POSTGRES_SCHEMA).map_err(|e| ExportError::io(&path, e))?;
    log::info!("  -> {} written", SCHEMA_FILE_NAME);
    Ok(path)
}
