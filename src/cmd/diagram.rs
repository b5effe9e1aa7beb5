//! Diagram command implementation.

use crate::config::{merge_list, DiagramConfig};
use crate::diagram::{
    is_truncated, resolve_relationships, synthesize, validate_foreign_keys, Dialect,
};
use crate::metadata::{
    clamp_max_tables, parse_comma_separated_list, MetadataSnapshot, MetadataSource, SchemaFilter,
};
use crate::output::save_to_file;
use anyhow::{bail, Context, Result};
use clap::Args;
use schemars::JsonSchema;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const DEFAULT_SERVER: &str = "localhost";

#[derive(Args, Debug)]
pub struct DiagramArgs {
    /// Metadata snapshot (JSON with tables, columns and foreign_keys)
    pub file: PathBuf,

    /// Output file (.mmd or .puml); prints to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: mermaid or plantuml (default: from output extension, then mermaid)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Server name shown in the diagram title
    #[arg(long)]
    pub server: Option<String>,

    /// Database name shown in the diagram title (default: snapshot file name)
    #[arg(long)]
    pub database: Option<String>,

    /// Comma-separated schemas to include (overrides --exclude-schemas)
    #[arg(long)]
    pub include_schemas: Option<String>,

    /// Comma-separated schemas to exclude
    #[arg(long)]
    pub exclude_schemas: Option<String>,

    /// Comma-separated tables to include, glob patterns allowed (overrides --exclude-tables)
    #[arg(long)]
    pub include_tables: Option<String>,

    /// Comma-separated tables to exclude, glob patterns allowed
    #[arg(long)]
    pub exclude_tables: Option<String>,

    /// Maximum tables to include (1-200, default 50)
    #[arg(long)]
    pub max_tables: Option<usize>,

    /// Show only primary and foreign key columns
    #[arg(long)]
    pub compact: bool,

    /// YAML config file with defaults for the options above
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print a JSON summary to stdout (requires --output)
    #[arg(long)]
    pub json: bool,
}

/// JSON summary of a diagram run
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct DiagramJsonOutput {
    input_file: String,
    output_file: String,
    format: Dialect,
    compact: bool,
    max_tables: usize,
    statistics: DiagramStatistics,
}

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct DiagramStatistics {
    tables: usize,
    columns: usize,
    relationships: usize,
    truncated: bool,
}

/// Run the diagram command
pub fn run(args: DiagramArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => DiagramConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DiagramConfig::default(),
    };

    if args.json && args.output.is_none() {
        bail!("--json requires --output");
    }

    let dialect = resolve_dialect(args.format.as_deref(), config.format, args.output.as_deref())?;
    let max_tables = clamp_max_tables(args.max_tables.unwrap_or(config.max_tables_or_default()));
    if let Some(requested) = args.max_tables {
        if requested != max_tables {
            warn!(requested, max_tables, "max tables clamped");
        }
    }

    let filter = SchemaFilter::new(
        merge_list(
            parse_comma_separated_list(args.include_schemas.as_deref()),
            &config.include_schemas,
        ),
        merge_list(
            parse_comma_separated_list(args.exclude_schemas.as_deref()),
            &config.exclude_schemas,
        ),
        merge_list(
            parse_comma_separated_list(args.include_tables.as_deref()),
            &config.include_tables,
        ),
        merge_list(
            parse_comma_separated_list(args.exclude_tables.as_deref()),
            &config.exclude_tables,
        ),
    )?;

    let snapshot = MetadataSnapshot::from_path(&args.file)?;
    let tables = snapshot.fetch_tables(&filter, max_tables)?;
    let columns = snapshot.fetch_columns(&tables)?;
    let foreign_keys = snapshot.fetch_foreign_keys(&tables)?;
    validate_foreign_keys(&foreign_keys)
        .with_context(|| format!("invalid metadata in {}", args.file.display()))?;

    let relationships = resolve_relationships(&foreign_keys);
    for rel in &relationships {
        debug!(
            constraint = %rel.constraint_name,
            columns = rel.columns.len(),
            "{} {} {}",
            rel.parent,
            rel.cardinality,
            rel.child
        );
    }

    let server = args
        .server
        .or(config.server)
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let database = args
        .database
        .or(config.database)
        .unwrap_or_else(|| default_database_name(&args.file));
    let compact = args.compact || config.compact;
    let description = filter.description();

    info!(
        format = %dialect,
        tables = tables.len(),
        compact,
        "generating diagram for {} on {}",
        database,
        server
    );

    let content = synthesize(
        dialect,
        &server,
        &database,
        description.as_deref(),
        max_tables,
        &tables,
        &columns,
        &foreign_keys,
        compact,
    );

    let truncated = is_truncated(&tables, max_tables);
    if truncated {
        warn!(max_tables, "table limit reached, diagram may be incomplete");
    }

    let Some(output) = args.output else {
        print!("{}", content);
        return Ok(());
    };

    let message = save_to_file(&content, &output, dialect)?;

    if args.json {
        let summary = DiagramJsonOutput {
            input_file: args.file.display().to_string(),
            output_file: output.display().to_string(),
            format: dialect,
            compact,
            max_tables,
            statistics: DiagramStatistics {
                tables: tables.len(),
                columns: columns.len(),
                relationships: relationships.len(),
                truncated,
            },
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        eprintln!("{}", message);
    }

    Ok(())
}

/// Pick the dialect: explicit flag, then config, then output extension
fn resolve_dialect(
    format: Option<&str>,
    configured: Option<Dialect>,
    output: Option<&Path>,
) -> Result<Dialect> {
    if let Some(f) = format {
        return f.parse().map_err(|e: String| anyhow::anyhow!(e));
    }
    if let Some(d) = configured {
        return Ok(d);
    }
    Ok(output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .and_then(Dialect::from_extension)
        .unwrap_or_default())
}

fn default_database_name(file: &Path) -> String {
    file.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "database".to_string())
}
