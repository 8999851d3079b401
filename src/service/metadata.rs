//! Catalog lifecycle: create, update, deactivate (soft delete).

use crate::catalog::{CatalogRepository, MetadataInput, TableMetadata};
use crate::error::{AppError, CatalogError};
use crate::service::validation::validate_metadata_input;
use sqlx::PgPool;

pub struct MetadataService;

impl MetadataService {
    /// Register a new table. The table name must not already have an entry,
    /// active or not — deactivated entries keep their name reserved.
    pub async fn create(pool: &PgPool, input: &MetadataInput) -> Result<TableMetadata, AppError> {
        validate_metadata_input(input)?;
        if CatalogRepository::exists(pool, &input.table_name).await? {
            tracing::warn!(table = %input.table_name, "duplicate metadata registration attempt");
            return Err(CatalogError::DuplicateTable(input.table_name.to_uppercase()).into());
        }
        let created = CatalogRepository::create(pool, input).await?;
        tracing::info!(id = created.id, table = %created.table_name, "metadata created");
        Ok(created)
    }

    pub async fn update(pool: &PgPool, id: i64, input: &MetadataInput) -> Result<TableMetadata, AppError> {
        validate_metadata_input(input)?;
        let updated = CatalogRepository::update(pool, id, input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("metadata id {}", id)))?;
        tracing::info!(id, table = %updated.table_name, "metadata updated");
        Ok(updated)
    }

    /// Soft delete. Absent ids are not found; already-inactive ids conflict.
    /// The conflict check rides on the UPDATE itself, so a deactivation that
    /// races this one still surfaces as a conflict rather than a false
    /// success.
    pub async fn deactivate(pool: &PgPool, id: i64) -> Result<(), AppError> {
        let meta = CatalogRepository::get_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("metadata id {}", id)))?;
        let updated = CatalogRepository::deactivate(pool, id).await?;
        deactivated_or_conflict(id, updated)?;
        tracing::info!(id, table = %meta.table_name, "metadata deactivated");
        Ok(())
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<TableMetadata, AppError> {
        CatalogRepository::get_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("metadata id {}", id)))
    }

    pub async fn list(pool: &PgPool, only_active: bool) -> Result<Vec<TableMetadata>, AppError> {
        CatalogRepository::list(pool, only_active).await
    }
}

/// A false update means the row was already inactive when the UPDATE ran —
/// either a repeat request or a concurrent deactivation that won the race.
fn deactivated_or_conflict(id: i64, updated: bool) -> Result<(), CatalogError> {
    if updated {
        Ok(())
    } else {
        Err(CatalogError::AlreadyInactive(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn losing_the_deactivation_race_is_a_conflict() {
        assert!(deactivated_or_conflict(7, true).is_ok());
        assert!(matches!(
            deactivated_or_conflict(7, false),
            Err(CatalogError::AlreadyInactive(7))
        ));
    }
}
