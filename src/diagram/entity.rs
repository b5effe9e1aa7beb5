//! Entity blocks: one per table, with typed and key-marked columns.

use super::dialect::Dialect;
use super::sanitize::{entity_token, sanitize_text};
use crate::metadata::{Column, ForeignKey, Table};
use ahash::{AHashMap, AHashSet};

/// Schema whose tables render without a schema prefix
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Joins schema and table in a qualified entity identifier
const SCHEMA_JOINER: &str = "__";

/// Entity identifier for a table: `Table` in the default schema,
/// `schema__Table` otherwise
pub fn entity_id(schema: &str, table: &str) -> String {
    if schema == DEFAULT_SCHEMA {
        entity_token(table)
    } else {
        format!(
            "{}{}{}",
            entity_token(schema),
            SCHEMA_JOINER,
            entity_token(table)
        )
    }
}

/// Display label for a table, `schema.Table` outside the default schema
pub fn entity_label(schema: &str, table: &str) -> String {
    if schema == DEFAULT_SCHEMA {
        sanitize_text(table)
    } else {
        sanitize_text(&format!("{}.{}", schema, table))
    }
}

/// Render a declared type with its length or precision/scale.
///
/// Character and binary types carry their length (`MAX` for `-1`),
/// decimal types carry `(precision,scale)`, anything else is unchanged.
pub fn format_data_type(data_type: &str, max_length: i32, precision: u8, scale: u8) -> String {
    match data_type.to_lowercase().as_str() {
        "nvarchar" | "varchar" | "nchar" | "char" | "varbinary" | "binary" => {
            if max_length == -1 {
                format!("{}(MAX)", data_type)
            } else {
                format!("{}({})", data_type, max_length)
            }
        }
        "decimal" | "numeric" => format!("{}({},{})", data_type, precision, scale),
        _ => data_type.to_string(),
    }
}

/// Key marker for a column: `PK`, `FK`, `PK,FK` or empty
pub fn key_marker(is_primary_key: bool, is_foreign_key: bool) -> &'static str {
    match (is_primary_key, is_foreign_key) {
        (true, true) => "PK,FK",
        (true, false) => "PK",
        (false, true) => "FK",
        (false, false) => "",
    }
}

/// Render all entity blocks in table order
pub(crate) fn render_entities(
    dialect: Dialect,
    tables: &[Table],
    columns: &[Column],
    foreign_keys: &[ForeignKey],
    compact: bool,
) -> Vec<String> {
    let fk_columns: AHashSet<(&str, &str, &str)> = foreign_keys
        .iter()
        .map(|fk| {
            (
                fk.child_schema.as_str(),
                fk.child_table.as_str(),
                fk.child_column.as_str(),
            )
        })
        .collect();

    let mut by_table: AHashMap<(&str, &str), Vec<&Column>> = AHashMap::new();
    for col in columns {
        by_table
            .entry((col.schema.as_str(), col.table.as_str()))
            .or_default()
            .push(col);
    }

    let mut lines = Vec::new();
    for table in tables {
        lines.push(dialect.open_entity(
            &entity_id(&table.schema, &table.name),
            &entity_label(&table.schema, &table.name),
        ));

        let table_columns = by_table
            .get(&(table.schema.as_str(), table.name.as_str()))
            .map(Vec::as_slice)
            .unwrap_or_default();

        for col in table_columns {
            let is_fk = fk_columns.contains(&(
                col.schema.as_str(),
                col.table.as_str(),
                col.name.as_str(),
            ));
            if let Some(line) = render_column(dialect, col, is_fk, compact) {
                lines.push(line);
            }
        }

        lines.push(dialect.close_entity());
    }
    lines
}

fn render_column(dialect: Dialect, col: &Column, is_fk: bool, compact: bool) -> Option<String> {
    if compact && !col.is_primary_key && !is_fk {
        return None;
    }

    let type_token = if compact {
        None
    } else {
        let formatted = format_data_type(&col.data_type, col.max_length, col.precision, col.scale);
        Some(dialect.type_token(&sanitize_text(&formatted))).filter(|t| !t.is_empty())
    };
    // blank types get the compact placeholder
    let type_token = type_token.or_else(|| dialect.compact_type().map(str::to_string));

    Some(dialect.attribute(
        type_token.as_deref(),
        &entity_token(&col.name),
        key_marker(col.is_primary_key, is_fk),
        !col.is_nullable,
    ))
}
