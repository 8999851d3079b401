//! Dynamic query execution: build SQL from the catalog, run it, and
//! optionally reassemble the flat JOIN rows into hierarchical documents.

use crate::catalog::{CatalogRepository, TableMetadata};
use crate::error::{AppError, CatalogError};
use crate::hierarchy::{Assembled, Assembler};
use crate::relation::{parse_relationships_with, Classifier, Relationship};
use crate::sql::{select_flat, select_with_joins, JoinTarget};
use serde_json::{Map, Value};
use sqlx::PgPool;

/// Row volumes above this are logged but not blocked.
pub const ROW_WARN_THRESHOLD: usize = 5_000;

/// Only one join level is compiled; deeper requests are clamped.
const MAX_JOIN_DEPTH: u8 = 1;

#[derive(Debug)]
pub struct QueryOutput {
    pub table: String,
    pub format: &'static str,
    pub total: usize,
    pub rows: Vec<Value>,
    pub sql: String,
}

pub struct QueryService;

impl QueryService {
    /// Tables currently queryable (active catalog entries), sorted by name.
    pub async fn list_tables(pool: &PgPool) -> Result<Vec<String>, AppError> {
        let metas = CatalogRepository::list(pool, true).await?;
        Ok(metas.into_iter().map(|m| m.table_name).collect())
    }

    /// Query one whitelisted table. `include_joins` adds LEFT JOINs for every
    /// relationship whose target has a catalog entry; `hierarchical` then
    /// reassembles the flat rows into nested documents (flat rows pass
    /// through unchanged on every degenerate path). Cardinality follows the
    /// default naming heuristic; use [`Self::query_table_with`] to pin
    /// overrides.
    pub async fn query_table(
        pool: &PgPool,
        table: &str,
        include_joins: bool,
        depth: u8,
        hierarchical: bool,
    ) -> Result<QueryOutput, AppError> {
        Self::query_table_with(pool, table, include_joins, depth, hierarchical, &Classifier::default()).await
    }

    /// [`Self::query_table`] with a caller-supplied classifier, for embedders
    /// that pin per-table cardinality overrides when the naming heuristic
    /// guesses wrong (see [`Classifier::with_override`]).
    pub async fn query_table_with(
        pool: &PgPool,
        table: &str,
        include_joins: bool,
        depth: u8,
        hierarchical: bool,
        classifier: &Classifier,
    ) -> Result<QueryOutput, AppError> {
        let meta = CatalogRepository::get_by_table(pool, table)
            .await?
            .ok_or_else(|| CatalogError::UnknownTable(table.to_string()))?;
        let depth = depth.clamp(1, MAX_JOIN_DEPTH);
        tracing::info!(table = %meta.table_name, include_joins, depth, hierarchical, "dynamic query");

        let relationships = meta
            .relationship_spec
            .as_deref()
            .map(|spec| parse_relationships_with(spec, classifier))
            .unwrap_or_default();

        let (sql, joined) = if include_joins && !relationships.is_empty() {
            let related = Self::resolve_targets(pool, &relationships).await?;
            let targets: Vec<JoinTarget<'_>> = related
                .iter()
                .map(|(rel, m)| JoinTarget {
                    relationship: rel,
                    metadata: m,
                })
                .collect();
            (select_with_joins(&meta, &targets), !targets.is_empty())
        } else {
            (select_flat(&meta), false)
        };
        tracing::debug!(sql = %sql, "generated sql");

        let rows = Self::fetch_rows(pool, &sql).await?;
        if rows.len() > ROW_WARN_THRESHOLD {
            tracing::warn!(
                table = %meta.table_name,
                total = rows.len(),
                "query returned more rows than recommended"
            );
        }

        let (format, rows) = if joined && hierarchical {
            Self::to_hierarchical(&meta, relationships, rows)
        } else {
            ("flat", rows.into_iter().map(Value::Object).collect())
        };
        Ok(QueryOutput {
            table: meta.table_name,
            format,
            total: rows.len(),
            rows,
            sql,
        })
    }

    /// Pair each relationship with its target's catalog entry. Targets with no
    /// entry are skipped (their column list is unknown), with a warning.
    async fn resolve_targets<'a>(
        pool: &PgPool,
        relationships: &'a [Relationship],
    ) -> Result<Vec<(&'a Relationship, TableMetadata)>, AppError> {
        let mut out = Vec::new();
        for rel in relationships {
            match CatalogRepository::get_by_table(pool, &rel.target_table).await? {
                Some(m) => out.push((rel, m)),
                None => {
                    tracing::warn!(related = %rel.target_table, "related table has no catalog entry; join skipped");
                }
            }
        }
        Ok(out)
    }

    fn to_hierarchical(
        meta: &TableMetadata,
        relationships: Vec<Relationship>,
        rows: Vec<Map<String, Value>>,
    ) -> (&'static str, Vec<Value>) {
        let assembler = Assembler::new(meta.pk_field.clone(), meta.field_list(), relationships);
        match assembler.assemble(&rows) {
            Assembled::Hierarchical(docs) => ("hierarchical", docs),
            Assembled::Flat => ("flat", rows.into_iter().map(Value::Object).collect()),
        }
    }

    async fn fetch_rows(pool: &PgPool, sql: &str) -> Result<Vec<Map<String, Value>>, AppError> {
        let rows = sqlx::query(sql).fetch_all(pool).await.map_err(map_query_error)?;
        Ok(rows.iter().map(row_to_map).collect())
    }
}

/// The catalog can reference tables or columns that were never created; map
/// the raw Postgres error to a message catalog authors can act on.
fn map_query_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            // undefined_table
            Some("42P01") => {
                return AppError::BadRequest(
                    "table is registered in the catalog but does not exist in the database".into(),
                )
            }
            // undefined_column
            Some("42703") => {
                return AppError::BadRequest(
                    "a column is registered in the catalog but does not exist in the table".into(),
                )
            }
            _ => {}
        }
    }
    AppError::Db(err)
}

/// Decode one row into a JSON object keyed by column name, in SELECT order.
/// Column order matters downstream: the assembler's dedup rule keys off the
/// first child field ending in "id".
fn row_to_map(row: &sqlx::postgres::PgRow) -> Map<String, Value> {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    map
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<serde_json::Value>, _>(name) {
        return j;
    }
    Value::Null
}
