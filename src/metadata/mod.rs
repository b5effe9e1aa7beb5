//! Relational metadata rows consumed by the diagram engine.
//!
//! This module provides:
//! - Row types for tables, columns and foreign keys
//! - The `MetadataSource` seam that fetches those rows
//! - A JSON snapshot source with schema/table filtering and a table cap

mod filter;
mod snapshot;

pub use filter::*;
pub use snapshot::*;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A base table, identified by `(schema, name)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub schema: String,
    pub name: String,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// One column of a table, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub data_type: String,
    /// Declared length for character/binary types, `-1` for MAX
    #[serde(default)]
    pub max_length: i32,
    #[serde(default)]
    pub precision: u8,
    #[serde(default)]
    pub scale: u8,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_identity: bool,
}

impl Column {
    /// Column with no length/precision/scale and no flags set
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            name: name.into(),
            data_type: data_type.into(),
            max_length: 0,
            precision: 0,
            scale: 0,
            is_nullable: false,
            is_primary_key: false,
            is_identity: false,
        }
    }

    pub fn with_length(mut self, max_length: i32) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: u8) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }
}

/// One column pair of a foreign key constraint.
///
/// Composite keys are several rows sharing `constraint_name`. `is_nullable`
/// and `is_unique` describe the whole relationship and are identical across
/// those rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    pub constraint_name: String,
    pub child_schema: String,
    pub child_table: String,
    pub child_column: String,
    pub parent_schema: String,
    pub parent_table: String,
    pub parent_column: String,
    #[serde(default)]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_unique: bool,
}

impl ForeignKey {
    pub fn child(&self) -> (&str, &str) {
        (&self.child_schema, &self.child_table)
    }

    pub fn parent(&self) -> (&str, &str) {
        (&self.parent_schema, &self.parent_table)
    }
}

/// Errors raised while loading or querying metadata
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read metadata snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid table pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Fetches metadata rows for diagram synthesis.
///
/// Implementations apply schema/table filtering and the table cap; the
/// returned collections are already in display order.
pub trait MetadataSource {
    fn fetch_tables(
        &self,
        filter: &SchemaFilter,
        max_tables: usize,
    ) -> Result<Vec<Table>, MetadataError>;

    fn fetch_columns(&self, tables: &[Table]) -> Result<Vec<Column>, MetadataError>;

    fn fetch_foreign_keys(&self, tables: &[Table]) -> Result<Vec<ForeignKey>, MetadataError>;
}
