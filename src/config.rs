//! YAML configuration for the diagram command.
//!
//! Values here are defaults; command-line flags take precedence.

use crate::diagram::Dialect;
use crate::metadata::DEFAULT_MAX_TABLES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Diagram defaults loaded from a YAML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Server name shown in the diagram title
    pub server: Option<String>,
    /// Database name shown in the diagram title
    pub database: Option<String>,
    /// Output dialect
    pub format: Option<Dialect>,
    /// Maximum number of tables to include
    pub max_tables: Option<usize>,
    /// Show only key columns
    pub compact: bool,
    pub include_schemas: Vec<String>,
    pub exclude_schemas: Vec<String>,
    /// Table name or `schema.table` glob patterns
    pub include_tables: Vec<String>,
    pub exclude_tables: Vec<String>,
}

impl DiagramConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: DiagramConfig = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Table cap from the file, or the built-in default
    pub fn max_tables_or_default(&self) -> usize {
        self.max_tables.unwrap_or(DEFAULT_MAX_TABLES)
    }
}

/// Prefer the command-line list; fall back to the configured one
pub fn merge_list(cli: Option<Vec<String>>, configured: &[String]) -> Option<Vec<String>> {
    cli.or_else(|| {
        if configured.is_empty() {
            None
        } else {
            Some(configured.to_vec())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
server: prod-sql
database: Sales
format: plantuml
max_tables: 80
compact: true
include_schemas: [dbo, sales]
exclude_tables: ["audit_*"]
"#;
        let config: DiagramConfig = serde_yaml_ng::from_str(yaml).unwrap();

        assert_eq!(config.server.as_deref(), Some("prod-sql"));
        assert_eq!(config.format, Some(Dialect::PlantUml));
        assert_eq!(config.max_tables_or_default(), 80);
        assert!(config.compact);
        assert_eq!(config.include_schemas, vec!["dbo", "sales"]);
        assert_eq!(config.exclude_tables, vec!["audit_*"]);
        assert!(config.exclude_schemas.is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: DiagramConfig = serde_yaml_ng::from_str("{}").unwrap();

        assert_eq!(config, DiagramConfig::default());
        assert_eq!(config.max_tables_or_default(), DEFAULT_MAX_TABLES);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "format: uml\ncompact: true").unwrap();

        let config = DiagramConfig::load(file.path()).unwrap();
        assert_eq!(config.format, Some(Dialect::PlantUml));
        assert!(config.compact);
    }

    #[test]
    fn test_merge_list_prefers_cli() {
        let configured = vec!["audit".to_string()];

        assert_eq!(
            merge_list(Some(vec!["staging".to_string()]), &configured),
            Some(vec!["staging".to_string()])
        );
        assert_eq!(merge_list(None, &configured), Some(configured.clone()));
        assert_eq!(merge_list(None, &[]), None);
    }
}
