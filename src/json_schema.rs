//! JSON Schema generation for the metadata snapshot input and JSON output.
//!
//! Schemas are generated using the schemars crate and can be exported via the
//! `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas keyed by name.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // input accepted by the diagram command
    schemas.insert(
        "snapshot",
        schema_for!(crate::metadata::MetadataSnapshot),
    );

    // diagram --json summary
    schemas.insert(
        "diagram",
        schema_for!(crate::cmd::diagram::DiagramJsonOutput),
    );

    schemas
}

/// Generate a single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}
