//! Relationship spec parsing and cardinality classification.
//!
//! The catalog encodes a table's links as `TARGET:FK_COLUMN:REF_COLUMN`
//! entries separated by `;` (e.g. `"CLIENTS:ID_CLIENT:ID;ITEMS:ID_ORDER:ID"`).
//! Catalog data is historically messy, so the parser is lenient: a malformed
//! entry is dropped, never an error that takes the whole query down.

use std::collections::HashMap;

/// Whether a related table contributes one child object per primary row
/// (many-to-one) or an array of them (one-to-many).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    OneToMany,
    ManyToOne,
}

/// One parsed link. `target_table` doubles as the column prefix the assembler
/// extracts nested data by; the key columns are used for join construction and
/// classification only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    pub target_table: String,
    pub foreign_key: String,
    pub referenced_key: String,
    pub cardinality: Cardinality,
}

/// Assigns each parsed link a cardinality. The default rule is a naming
/// heuristic (see [`Classifier::classify`]); per-target overrides let catalog
/// authors pin a cardinality when the heuristic guesses wrong.
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    overrides: HashMap<String, Cardinality>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the cardinality for one target table (case-insensitive).
    pub fn with_override(mut self, target_table: &str, cardinality: Cardinality) -> Self {
        self.overrides.insert(target_table.to_uppercase(), cardinality);
        self
    }

    /// Heuristic rule: one-to-many when the FK column name contains the target
    /// table name, or when it starts with `ID_`; many-to-one otherwise.
    ///
    /// The `ID_` branch is ambiguous: plain FK pointers (`ID_CLIENT` on
    /// `ORDERS`) use the same prefix as child-side keys (`ID_ORDER` on
    /// `ITEMS`). A hit on that branch alone is logged so catalog authors can
    /// pin an override instead of relying on the guess.
    pub fn classify(&self, target_table: &str, foreign_key: &str) -> Cardinality {
        let target = target_table.to_uppercase();
        if let Some(card) = self.overrides.get(&target) {
            return *card;
        }
        let fk = foreign_key.to_uppercase();
        let contains_target = fk.contains(target.as_str());
        let id_prefixed = fk.starts_with("ID_");
        if contains_target || id_prefixed {
            if id_prefixed && !contains_target {
                tracing::warn!(
                    target_table,
                    foreign_key,
                    "foreign key matched only the ID_ prefix rule; one-to-many may be wrong, consider a cardinality override"
                );
            }
            Cardinality::OneToMany
        } else {
            Cardinality::ManyToOne
        }
    }
}

/// Parse a relationship spec with the default classifier.
pub fn parse_relationships(spec: &str) -> Vec<Relationship> {
    parse_relationships_with(spec, &Classifier::default())
}

/// Parse a relationship spec. Entries that do not split into exactly three
/// non-empty trimmed parts are silently dropped. Duplicate targets parse
/// independently; an empty spec yields an empty list.
pub fn parse_relationships_with(spec: &str, classifier: &Classifier) -> Vec<Relationship> {
    spec.split(';')
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split(':').collect();
            if parts.len() != 3 {
                return None;
            }
            let target = parts[0].trim();
            let foreign_key = parts[1].trim();
            let referenced_key = parts[2].trim();
            if target.is_empty() || foreign_key.is_empty() || referenced_key.is_empty() {
                return None;
            }
            Some(Relationship {
                cardinality: classifier.classify(target, foreign_key),
                target_table: target.to_string(),
                foreign_key: foreign_key.to_string(),
                referenced_key: referenced_key.to_string(),
            })
        })
        .collect()
}
