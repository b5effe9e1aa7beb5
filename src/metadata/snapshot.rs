//! JSON snapshot of already-fetched metadata rows.

use super::{Column, ForeignKey, MetadataError, MetadataSource, SchemaFilter, Table};
use ahash::AHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Metadata rows as exported from a database catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MetadataSnapshot {
    pub tables: Vec<Table>,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl MetadataSnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, MetadataError> {
        let content = fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&content)?;
        debug!(
            path = %path.display(),
            tables = snapshot.tables.len(),
            columns = snapshot.columns.len(),
            foreign_keys = snapshot.foreign_keys.len(),
            "loaded metadata snapshot"
        );
        Ok(snapshot)
    }

    pub fn from_json(content: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(content)?)
    }
}

impl MetadataSource for MetadataSnapshot {
    fn fetch_tables(
        &self,
        filter: &SchemaFilter,
        max_tables: usize,
    ) -> Result<Vec<Table>, MetadataError> {
        let tables: Vec<Table> = self
            .tables
            .iter()
            .filter(|t| filter.matches(t))
            .take(max_tables)
            .cloned()
            .collect();

        debug!(
            selected = tables.len(),
            available = self.tables.len(),
            max_tables,
            "fetched tables"
        );
        Ok(tables)
    }

    fn fetch_columns(&self, tables: &[Table]) -> Result<Vec<Column>, MetadataError> {
        let selected = table_set(tables);
        Ok(self
            .columns
            .iter()
            .filter(|c| selected.contains(&(c.schema.as_str(), c.table.as_str())))
            .cloned()
            .collect())
    }

    fn fetch_foreign_keys(&self, tables: &[Table]) -> Result<Vec<ForeignKey>, MetadataError> {
        let selected = table_set(tables);
        Ok(self
            .foreign_keys
            .iter()
            .filter(|fk| selected.contains(&fk.child()) && selected.contains(&fk.parent()))
            .cloned()
            .collect())
    }
}

fn table_set(tables: &[Table]) -> AHashSet<(&str, &str)> {
    tables
        .iter()
        .map(|t| (t.schema.as_str(), t.name.as_str()))
        .collect()
}
