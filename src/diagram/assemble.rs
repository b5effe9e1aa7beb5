//! Document assembly shared by all dialects.

use super::dialect::Dialect;
use super::entity::render_entities;
use super::relationship::{render_relationships, resolve_relationships};
use super::sanitize::sanitize_text;
use crate::metadata::{Column, ForeignKey, Table};
use ahash::AHashSet;

/// Generate a Mermaid erDiagram from fetched metadata
#[allow(clippy::too_many_arguments)]
pub fn synthesize_mermaid(
    server: &str,
    database: &str,
    schema_description: Option<&str>,
    max_tables: usize,
    tables: &[Table],
    columns: &[Column],
    foreign_keys: &[ForeignKey],
    compact: bool,
) -> String {
    synthesize(
        Dialect::Mermaid,
        server,
        database,
        schema_description,
        max_tables,
        tables,
        columns,
        foreign_keys,
        compact,
    )
}

/// Generate a PlantUML entity diagram from fetched metadata
#[allow(clippy::too_many_arguments)]
pub fn synthesize_uml(
    server: &str,
    database: &str,
    schema_description: Option<&str>,
    max_tables: usize,
    tables: &[Table],
    columns: &[Column],
    foreign_keys: &[ForeignKey],
    compact: bool,
) -> String {
    synthesize(
        Dialect::PlantUml,
        server,
        database,
        schema_description,
        max_tables,
        tables,
        columns,
        foreign_keys,
        compact,
    )
}

/// Generate a diagram in the given dialect.
///
/// `max_tables` is the cap applied when the tables were fetched; reaching it
/// appends a warning that the diagram may be incomplete. The table list is
/// never truncated here.
#[allow(clippy::too_many_arguments)]
pub fn synthesize(
    dialect: Dialect,
    server: &str,
    database: &str,
    schema_description: Option<&str>,
    max_tables: usize,
    tables: &[Table],
    columns: &[Column],
    foreign_keys: &[ForeignKey],
    compact: bool,
) -> String {
    if tables.is_empty() {
        return empty_diagram(dialect, server, database, schema_description);
    }

    let mut lines = dialect.header(&title(server, database, schema_description));
    lines.extend(render_entities(dialect, tables, columns, foreign_keys, compact));

    let relationships = resolve_relationships(foreign_keys);
    if !relationships.is_empty() {
        lines.push(String::new());
        lines.extend(render_relationships(dialect, &relationships));
    }

    if is_truncated(tables, max_tables) {
        lines.push(String::new());
        lines.push(dialect.comment_line(&format!(
            "WARNING: Table limit of {} reached. Results may be incomplete.",
            max_tables
        )));
    }

    finish(dialect, lines)
}

/// Minimal valid diagram for a database without matching tables
pub fn empty_diagram(
    dialect: Dialect,
    server: &str,
    database: &str,
    schema_description: Option<&str>,
) -> String {
    let mut lines = dialect.header(&title(server, database, schema_description));
    lines.push(dialect.comment_line("No tables found"));
    finish(dialect, lines)
}

/// Whether the distinct table count reached the fetch cap
pub fn is_truncated(tables: &[Table], max_tables: usize) -> bool {
    let distinct: AHashSet<(&str, &str)> = tables
        .iter()
        .map(|t| (t.schema.as_str(), t.name.as_str()))
        .collect();
    distinct.len() >= max_tables
}

fn title(server: &str, database: &str, schema_description: Option<&str>) -> String {
    let mut title = format!(
        "Database {} on {}",
        sanitize_text(database),
        sanitize_text(server)
    );
    if let Some(desc) = schema_description.filter(|d| !d.trim().is_empty()) {
        title.push_str(&format!(" ({})", sanitize_text(desc)));
    }
    title
}

fn finish(dialect: Dialect, mut lines: Vec<String>) -> String {
    if let Some(footer) = dialect.footer() {
        lines.push(footer.to_string());
    }
    let mut output = lines.join("\n");
    output.push('\n');
    output
}
