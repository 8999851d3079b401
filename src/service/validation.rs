//! Catalog input validation.

use crate::catalog::MetadataInput;
use crate::error::AppError;
use regex::Regex;

const TABLE_NAME_PATTERN: &str = "^[A-Z][A-Z0-9_]*$";

/// Validate a create/update payload. Table names follow the catalog's naming
/// convention (upper-case, leading letter); field limits mirror the catalog
/// columns.
pub fn validate_metadata_input(input: &MetadataInput) -> Result<(), AppError> {
    let table = input.table_name.trim();
    if table.is_empty() {
        return Err(AppError::Validation("tableName is required".into()));
    }
    if table.len() > 100 {
        return Err(AppError::Validation("tableName must be at most 100 characters".into()));
    }
    let re = Regex::new(TABLE_NAME_PATTERN)
        .map_err(|_| AppError::Validation("invalid table name pattern".into()))?;
    if !re.is_match(table) {
        return Err(AppError::Validation(
            "tableName must be UPPER_CASE letters, digits and underscores".into(),
        ));
    }
    if input.available_fields.trim().is_empty() {
        return Err(AppError::Validation("availableFields is required".into()));
    }
    let pk = input.pk_field.trim();
    if pk.is_empty() {
        return Err(AppError::Validation("pkField is required".into()));
    }
    if pk.len() > 100 {
        return Err(AppError::Validation("pkField must be at most 100 characters".into()));
    }
    if let Some(desc) = &input.table_description {
        if desc.len() > 500 {
            return Err(AppError::Validation(
                "tableDescription must be at most 500 characters".into(),
            ));
        }
    }
    if let Some(desc) = &input.fields_description {
        if desc.len() > 2000 {
            return Err(AppError::Validation(
                "fieldsDescription must be at most 2000 characters".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(table: &str) -> MetadataInput {
        MetadataInput {
            table_name: table.into(),
            available_fields: "ID,DATE".into(),
            pk_field: "ID".into(),
            relationship_spec: None,
            table_description: None,
            fields_description: None,
            visible_to_ai: true,
        }
    }

    #[test]
    fn accepts_well_formed_input() {
        assert!(validate_metadata_input(&input("ORDERS")).is_ok());
        assert!(validate_metadata_input(&input("ITEMS_ORDER2")).is_ok());
    }

    #[test]
    fn rejects_empty_or_lowercase_table_names() {
        assert!(validate_metadata_input(&input("")).is_err());
        assert!(validate_metadata_input(&input("orders")).is_err());
        assert!(validate_metadata_input(&input("1ORDERS")).is_err());
        assert!(validate_metadata_input(&input("ORD ERS")).is_err());
    }

    #[test]
    fn rejects_missing_fields_and_pk() {
        let mut i = input("ORDERS");
        i.available_fields = "  ".into();
        assert!(validate_metadata_input(&i).is_err());
        let mut i = input("ORDERS");
        i.pk_field = "".into();
        assert!(validate_metadata_input(&i).is_err());
    }

    #[test]
    fn rejects_oversized_descriptions() {
        let mut i = input("ORDERS");
        i.table_description = Some("x".repeat(501));
        assert!(validate_metadata_input(&i).is_err());
        let mut i = input("ORDERS");
        i.fields_description = Some("x".repeat(2001));
        assert!(validate_metadata_input(&i).is_err());
    }
}
