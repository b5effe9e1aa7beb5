//! ER diagram synthesis from relational metadata.
//!
//! This module provides:
//! - Sanitizers for labels and entity identifiers
//! - Entity blocks with type formatting, key markers and compact mode
//! - Relationship resolution with composite key folding and cardinality
//! - Mermaid and PlantUML output through one shared assembler
//!
//! Everything here is a pure function over borrowed metadata rows.

mod assemble;
mod dialect;
mod entity;
mod error;
mod relationship;
mod sanitize;

pub use assemble::{empty_diagram, is_truncated, synthesize, synthesize_mermaid, synthesize_uml};
pub use dialect::Dialect;
pub use entity::{entity_id, entity_label, format_data_type, key_marker, DEFAULT_SCHEMA};
pub use error::DiagramError;
pub use relationship::{
    group_by_constraint, resolve_relationships, validate_foreign_keys, Cardinality, Relationship,
};
pub use sanitize::{entity_token, sanitize_entity_name, sanitize_text};
