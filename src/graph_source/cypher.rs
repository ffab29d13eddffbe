//! Cypher rendering for export projections.
//!
//! Each [`EntityExport`] becomes one parameterless read query:
//!
//! ```text
//! MATCH (a:Course)-[r:PREREQUISITE]->(b:Course)
//! RETURN b.id AS course_id, a.id AS prerequisite_course_id, ...
//! ```
//!
//! Properties are returned raw; type coercion happens client-side so every
//! graph source produces identical rows. The one exception is temporal data,
//! which is fetched through `toString()`.

use crate::export_catalog::{ColumnSpec, EntityExport, Pattern};

/// Connectivity probe run before any output is produced.
pub const PROBE_QUERY: &str = "RETURN 1 AS ok";

pub fn render(entity: &EntityExport) -> String {
    let pattern = match &entity.pattern {
        Pattern::Node { label } => format!("(n:{})", quote_identifier(label)),
        Pattern::Relationship {
            from_label,
            rel_type,
            to_label,
        } => format!(
            "(a:{})-[r:{}]->(b:{})",
            quote_identifier(from_label),
            quote_identifier(rel_type),
            quote_identifier(to_label)
        ),
    };

    let projections = entity
        .columns
        .iter()
        .map(render_column)
        .collect::<Vec<_>>()
        .join(", ");

    format!("MATCH {} RETURN {}", pattern, projections)
}

fn render_column(column: &ColumnSpec) -> String {
    let access = format!(
        "{}.{}",
        column.element.variable(),
        quote_identifier(column.property)
    );
    let expr = if column.coercion.reads_as_string() {
        format!("toString({})", access)
    } else {
        access
    };
    format!("{} AS {}", expr, quote_identifier(column.name))
}

/// Backtick-quote anything that is not a plain identifier.
fn quote_identifier(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}
