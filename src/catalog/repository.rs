//! Catalog persistence: lookups and lifecycle writes against table_metadata.

use crate::catalog::{MetadataInput, TableMetadata};
use crate::error::AppError;
use crate::store::qualified_catalog_table;
use sqlx::PgPool;

const COLUMNS: &str = "id, table_name, available_fields, pk_field, relationship_spec, \
     table_description, fields_description, visible_to_ai, active, created_at, updated_at";

pub struct CatalogRepository;

impl CatalogRepository {
    /// Active-only lookup by table name (case-normalized to upper).
    pub async fn get_by_table(pool: &PgPool, table: &str) -> Result<Option<TableMetadata>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE table_name = $1 AND active",
            COLUMNS,
            qualified_catalog_table()
        );
        tracing::debug!(sql = %sql, table, "catalog lookup");
        let row = sqlx::query_as::<_, TableMetadata>(&sql)
            .bind(table.to_uppercase())
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<TableMetadata>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, qualified_catalog_table());
        let row = sqlx::query_as::<_, TableMetadata>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn list(pool: &PgPool, only_active: bool) -> Result<Vec<TableMetadata>, AppError> {
        let filter = if only_active { " WHERE active" } else { "" };
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY table_name",
            COLUMNS,
            qualified_catalog_table(),
            filter
        );
        let rows = sqlx::query_as::<_, TableMetadata>(&sql).fetch_all(pool).await?;
        Ok(rows)
    }

    /// Whether any entry (active or not) exists for the table name.
    pub async fn exists(pool: &PgPool, table: &str) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE table_name = $1)",
            qualified_catalog_table()
        );
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(table.to_uppercase())
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// Insert one entry; table name is stored upper-cased. Returns the created row.
    pub async fn create(pool: &PgPool, input: &MetadataInput) -> Result<TableMetadata, AppError> {
        let sql = format!(
            "INSERT INTO {} (table_name, available_fields, pk_field, relationship_spec, \
             table_description, fields_description, visible_to_ai) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            qualified_catalog_table(),
            COLUMNS
        );
        tracing::debug!(sql = %sql, table = %input.table_name, "catalog insert");
        let row = sqlx::query_as::<_, TableMetadata>(&sql)
            .bind(input.table_name.to_uppercase())
            .bind(&input.available_fields)
            .bind(&input.pk_field)
            .bind(&input.relationship_spec)
            .bind(&input.table_description)
            .bind(&input.fields_description)
            .bind(input.visible_to_ai)
            .fetch_one(pool)
            .await?;
        Ok(row)
    }

    /// Update one entry by id. Returns the updated row, or None when absent.
    pub async fn update(pool: &PgPool, id: i64, input: &MetadataInput) -> Result<Option<TableMetadata>, AppError> {
        let sql = format!(
            "UPDATE {} SET table_name = $2, available_fields = $3, pk_field = $4, \
             relationship_spec = $5, table_description = $6, fields_description = $7, \
             visible_to_ai = $8, updated_at = NOW() WHERE id = $1 RETURNING {}",
            qualified_catalog_table(),
            COLUMNS
        );
        tracing::debug!(sql = %sql, id, "catalog update");
        let row = sqlx::query_as::<_, TableMetadata>(&sql)
            .bind(id)
            .bind(input.table_name.to_uppercase())
            .bind(&input.available_fields)
            .bind(&input.pk_field)
            .bind(&input.relationship_spec)
            .bind(&input.table_description)
            .bind(&input.fields_description)
            .bind(input.visible_to_ai)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Soft delete: mark the entry inactive. Returns false when it was absent
    /// or already inactive.
    pub async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, AppError> {
        let sql = format!(
            "UPDATE {} SET active = FALSE, updated_at = NOW() WHERE id = $1 AND active RETURNING id",
            qualified_catalog_table()
        );
        let row: Option<i64> = sqlx::query_scalar(&sql).bind(id).fetch_optional(pool).await?;
        Ok(row.is_some())
    }
}
