//! Schema and table filtering for metadata fetches.

use super::{MetadataError, Table};
use ahash::AHashSet;
use glob::{MatchOptions, Pattern};

/// Schemas that never contain user tables
pub const SYSTEM_SCHEMAS: &[&str] = &["sys", "INFORMATION_SCHEMA"];

/// Default cap on the number of tables fetched for a diagram
pub const DEFAULT_MAX_TABLES: usize = 50;

/// Upper bound accepted for `max_tables`
pub const MAX_TABLES_LIMIT: usize = 200;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Clamp a requested table cap into `1..=MAX_TABLES_LIMIT`
pub fn clamp_max_tables(requested: usize) -> usize {
    requested.clamp(1, MAX_TABLES_LIMIT)
}

/// Parse a comma-separated list of names.
///
/// Entries are trimmed, empty entries are dropped and duplicates are removed
/// case-insensitively, keeping the first spelling. Returns `None` when no
/// entry remains.
pub fn parse_comma_separated_list(value: Option<&str>) -> Option<Vec<String>> {
    let value = value?;
    let mut seen = AHashSet::new();
    let items: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Include/exclude rules for schemas and tables.
///
/// An include list overrides the matching exclude list. Schema names compare
/// case-insensitively; table entries are glob patterns matched against either
/// the bare table name or `schema.name`.
#[derive(Debug, Clone, Default)]
pub struct SchemaFilter {
    include_schemas: Option<Vec<String>>,
    exclude_schemas: Option<Vec<String>>,
    include_tables: Option<Vec<Pattern>>,
    exclude_tables: Option<Vec<Pattern>>,
}

impl SchemaFilter {
    pub fn new(
        include_schemas: Option<Vec<String>>,
        exclude_schemas: Option<Vec<String>>,
        include_tables: Option<Vec<String>>,
        exclude_tables: Option<Vec<String>>,
    ) -> Result<Self, MetadataError> {
        Ok(Self {
            include_schemas: non_empty(include_schemas),
            exclude_schemas: non_empty(exclude_schemas),
            include_tables: compile_patterns(include_tables)?,
            exclude_tables: compile_patterns(exclude_tables)?,
        })
    }

    /// Whether the filter keeps the given table
    pub fn matches(&self, table: &Table) -> bool {
        if SYSTEM_SCHEMAS
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&table.schema))
        {
            return false;
        }

        let schema_ok = match (&self.include_schemas, &self.exclude_schemas) {
            (Some(include), _) => contains_ignore_case(include, &table.schema),
            (None, Some(exclude)) => !contains_ignore_case(exclude, &table.schema),
            (None, None) => true,
        };
        if !schema_ok {
            return false;
        }

        match (&self.include_tables, &self.exclude_tables) {
            (Some(include), _) => matches_any(include, table),
            (None, Some(exclude)) => !matches_any(exclude, table),
            (None, None) => true,
        }
    }

    /// Human-readable summary for diagram titles, `None` when unfiltered
    pub fn description(&self) -> Option<String> {
        let mut parts = Vec::new();

        if let Some(include) = &self.include_schemas {
            parts.push(format!("schemas {}", include.join(", ")));
        } else if let Some(exclude) = &self.exclude_schemas {
            parts.push(format!("excluding schemas {}", exclude.join(", ")));
        }

        if let Some(include) = &self.include_tables {
            parts.push(format!("tables {}", join_patterns(include)));
        } else if let Some(exclude) = &self.exclude_tables {
            parts.push(format!("excluding tables {}", join_patterns(exclude)));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" and "))
        }
    }
}

fn non_empty(list: Option<Vec<String>>) -> Option<Vec<String>> {
    list.filter(|l| !l.is_empty())
}

fn compile_patterns(list: Option<Vec<String>>) -> Result<Option<Vec<Pattern>>, MetadataError> {
    let Some(list) = non_empty(list) else {
        return Ok(None);
    };

    list.iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| MetadataError::InvalidPattern {
                pattern: p.clone(),
                message: e.msg.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn contains_ignore_case(list: &[String], value: &str) -> bool {
    list.iter().any(|s| s.eq_ignore_ascii_case(value))
}

fn matches_any(patterns: &[Pattern], table: &Table) -> bool {
    let qualified = table.to_string();
    patterns.iter().any(|p| {
        p.matches_with(&table.name, MATCH_OPTIONS) || p.matches_with(&qualified, MATCH_OPTIONS)
    })
}

fn join_patterns(patterns: &[Pattern]) -> String {
    patterns
        .iter()
        .map(Pattern::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
