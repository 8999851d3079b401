//! Builds the dynamic SELECT (flat or JOINed) from catalog metadata.

use crate::catalog::TableMetadata;
use crate::relation::{Cardinality, Relationship};

const MAIN_ALIAS: &str = "main";

/// One resolvable join: the parsed relationship plus the related table's own
/// catalog record (needed for its column list).
pub struct JoinTarget<'a> {
    pub relationship: &'a Relationship,
    pub metadata: &'a TableMetadata,
}

/// Quote identifier for PostgreSQL (safe: only from the catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn order_clause(pk_field: &str) -> String {
    if pk_field.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}.{}", MAIN_ALIAS, quoted(pk_field))
    }
}

/// SELECT of the primary table's available fields, ORDER BY its pk.
pub fn select_flat(meta: &TableMetadata) -> String {
    let cols = meta
        .field_list()
        .iter()
        .map(|c| format!("{}.{}", MAIN_ALIAS, quoted(c)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {} FROM {} {}{}",
        cols,
        quoted(&meta.table_name),
        MAIN_ALIAS,
        order_clause(&meta.pk_field)
    )
}

/// SELECT with one LEFT JOIN per target, aliasing related columns as
/// `TARGET_COLUMN` — the prefix convention the assembler folds back by.
///
/// Join direction follows cardinality: a one-to-many target carries the
/// foreign key on its side (`items.ID_ORDER = main.ID`); a many-to-one target
/// is referenced from the primary table (`main.ID_CLIENT = clients.ID`).
pub fn select_with_joins(meta: &TableMetadata, targets: &[JoinTarget<'_>]) -> String {
    let mut select_parts: Vec<String> = meta
        .field_list()
        .iter()
        .map(|c| {
            let q = quoted(c);
            format!("{}.{} AS {}", MAIN_ALIAS, q, q)
        })
        .collect();
    let mut join_parts = Vec::new();

    for t in targets {
        let target = &t.relationship.target_table;
        let alias = quoted(target);
        for col in t.metadata.field_list() {
            select_parts.push(format!(
                "{}.{} AS {}",
                alias,
                quoted(&col),
                quoted(&format!("{}_{}", target, col))
            ));
        }
        let on = match t.relationship.cardinality {
            Cardinality::OneToMany => format!(
                "{}.{} = {}.{}",
                alias,
                quoted(&t.relationship.foreign_key),
                MAIN_ALIAS,
                quoted(&t.relationship.referenced_key)
            ),
            Cardinality::ManyToOne => format!(
                "{}.{} = {}.{}",
                MAIN_ALIAS,
                quoted(&t.relationship.foreign_key),
                alias,
                quoted(&t.relationship.referenced_key)
            ),
        };
        join_parts.push(format!("LEFT JOIN {} {} ON {}", quoted(&t.metadata.table_name), alias, on));
    }

    let joins = if join_parts.is_empty() {
        String::new()
    } else {
        format!(" {}", join_parts.join(" "))
    };
    format!(
        "SELECT {} FROM {} {}{}{}",
        select_parts.join(", "),
        quoted(&meta.table_name),
        MAIN_ALIAS,
        joins,
        order_clause(&meta.pk_field)
    )
}
