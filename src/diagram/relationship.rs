//! Relationship resolution: one relationship per foreign key constraint.
//!
//! Foreign key rows arrive one per column pair. Rows sharing a constraint
//! name form a single logical relationship, emitted once in the order the
//! constraint name was first seen.

use super::dialect::Dialect;
use super::entity::entity_id;
use super::error::DiagramError;
use super::sanitize::sanitize_text;
use crate::metadata::ForeignKey;
use ahash::AHashMap;
use std::fmt;

/// Relationship cardinality, seen from the parent side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    OneToOneMandatory,
    OneToOneOptional,
    OneToManyMandatory,
    OneToManyOptional,
}

impl Cardinality {
    /// Classify from relationship uniqueness and nullability of the child side
    pub fn from_flags(is_unique: bool, is_nullable: bool) -> Self {
        match (is_unique, is_nullable) {
            (true, false) => Cardinality::OneToOneMandatory,
            (true, true) => Cardinality::OneToOneOptional,
            (false, false) => Cardinality::OneToManyMandatory,
            (false, true) => Cardinality::OneToManyOptional,
        }
    }

    /// Crow's-foot marker on the parent end
    pub fn parent_marker(self) -> &'static str {
        "||"
    }

    /// Crow's-foot marker on the child end
    pub fn child_marker(self) -> &'static str {
        match self {
            Cardinality::OneToOneMandatory => "||",
            Cardinality::OneToOneOptional => "o|",
            Cardinality::OneToManyMandatory => "|{",
            Cardinality::OneToManyOptional => "o{",
        }
    }

    /// Full connector, e.g. `||--o{`
    pub fn markers(self) -> String {
        format!("{}--{}", self.parent_marker(), self.child_marker())
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::OneToOneMandatory => write!(f, "one-to-one"),
            Cardinality::OneToOneOptional => write!(f, "one-to-zero-or-one"),
            Cardinality::OneToManyMandatory => write!(f, "one-to-many"),
            Cardinality::OneToManyOptional => write!(f, "one-to-zero-or-many"),
        }
    }
}

/// A foreign key constraint folded into one parent-child connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub constraint_name: String,
    /// Entity id of the referenced table
    pub parent: String,
    /// Entity id of the referencing table
    pub child: String,
    pub cardinality: Cardinality,
    /// `(child_column, parent_column)` pairs in row order
    pub columns: Vec<(String, String)>,
}

/// Group rows by constraint name, keeping first-seen order of names
pub fn group_by_constraint(foreign_keys: &[ForeignKey]) -> Vec<Vec<&ForeignKey>> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut groups: Vec<Vec<&ForeignKey>> = Vec::new();

    for fk in foreign_keys {
        match index.get(fk.constraint_name.as_str()) {
            Some(&pos) => groups[pos].push(fk),
            None => {
                index.insert(&fk.constraint_name, groups.len());
                groups.push(vec![fk]);
            }
        }
    }
    groups
}

/// Fold foreign key rows into one relationship per constraint.
///
/// Tables and flags are read from the first row of each group; use
/// [`validate_foreign_keys`] to reject groups whose rows disagree.
pub fn resolve_relationships(foreign_keys: &[ForeignKey]) -> Vec<Relationship> {
    group_by_constraint(foreign_keys)
        .into_iter()
        .map(|group| {
            let first = group[0];
            Relationship {
                constraint_name: first.constraint_name.clone(),
                parent: entity_id(&first.parent_schema, &first.parent_table),
                child: entity_id(&first.child_schema, &first.child_table),
                cardinality: Cardinality::from_flags(first.is_unique, first.is_nullable),
                columns: group
                    .iter()
                    .map(|fk| (fk.child_column.clone(), fk.parent_column.clone()))
                    .collect(),
            }
        })
        .collect()
}

/// Reject constraints whose rows disagree on tables or relationship flags
pub fn validate_foreign_keys(foreign_keys: &[ForeignKey]) -> Result<(), DiagramError> {
    for group in group_by_constraint(foreign_keys) {
        let first = group[0];
        for fk in &group[1..] {
            let detail = if fk.child() != first.child() {
                Some(format!(
                    "child table {}.{} differs from {}.{}",
                    fk.child_schema, fk.child_table, first.child_schema, first.child_table
                ))
            } else if fk.parent() != first.parent() {
                Some(format!(
                    "parent table {}.{} differs from {}.{}",
                    fk.parent_schema, fk.parent_table, first.parent_schema, first.parent_table
                ))
            } else if fk.is_nullable != first.is_nullable {
                Some("rows disagree on nullability".to_string())
            } else if fk.is_unique != first.is_unique {
                Some("rows disagree on uniqueness".to_string())
            } else {
                None
            };

            if let Some(detail) = detail {
                return Err(DiagramError::InconsistentForeignKey {
                    constraint: first.constraint_name.clone(),
                    detail,
                });
            }
        }
    }
    Ok(())
}

/// Render one line per relationship
pub(crate) fn render_relationships(dialect: Dialect, relationships: &[Relationship]) -> Vec<String> {
    relationships
        .iter()
        .map(|rel| {
            dialect.relationship(
                &rel.parent,
                &rel.cardinality.markers(),
                &rel.child,
                &sanitize_text(&rel.constraint_name),
            )
        })
        .collect()
}
