//! Catalog table DDL. The catalog lives in a schema named from the
//! `DYNTABLE_SCHEMA` env var (default `dyntable`).

use crate::error::AppError;
use sqlx::PgPool;

/// Schema name for the catalog table. Must be a valid PostgreSQL identifier.
pub fn catalog_schema() -> String {
    std::env::var("DYNTABLE_SCHEMA").unwrap_or_else(|_| "dyntable".into())
}

/// Schema-qualified catalog table name (e.g. "dyntable.table_metadata").
pub fn qualified_catalog_table() -> String {
    format!("{}.table_metadata", catalog_schema())
}

/// Create the catalog schema and table if they do not exist.
pub async fn ensure_catalog_table(pool: &PgPool) -> Result<(), AppError> {
    let schema = catalog_schema();
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
        .execute(pool)
        .await?;
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            table_name TEXT NOT NULL UNIQUE,
            available_fields TEXT NOT NULL,
            pk_field TEXT NOT NULL,
            relationship_spec TEXT,
            table_description TEXT,
            fields_description TEXT,
            visible_to_ai BOOLEAN NOT NULL DEFAULT TRUE,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ
        )
        "#,
        qualified_catalog_table()
    );
    sqlx::query(&ddl).execute(pool).await?;
    Ok(())
}
