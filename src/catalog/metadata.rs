//! Catalog record types, matching the table_metadata row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One catalog entry. `available_fields` holds the raw comma-separated column
/// list exactly as catalog authors enter it; `relationship_spec` holds the
/// textual link spec parsed by [`crate::relation`].
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    pub id: i64,
    pub table_name: String,
    pub available_fields: String,
    pub pk_field: String,
    pub relationship_spec: Option<String>,
    pub table_description: Option<String>,
    pub fields_description: Option<String>,
    pub visible_to_ai: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TableMetadata {
    /// Split `available_fields` into trimmed column names, dropping empties.
    pub fn field_list(&self) -> Vec<String> {
        self.available_fields
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Create/update payload for a catalog entry.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataInput {
    pub table_name: String,
    pub available_fields: String,
    pub pk_field: String,
    #[serde(default)]
    pub relationship_spec: Option<String>,
    #[serde(default)]
    pub table_description: Option<String>,
    #[serde(default)]
    pub fields_description: Option<String>,
    #[serde(default = "default_true")]
    pub visible_to_ai: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn meta(fields: &str) -> TableMetadata {
        TableMetadata {
            id: 1,
            table_name: "ORDERS".into(),
            available_fields: fields.into(),
            pk_field: "ID".into(),
            relationship_spec: None,
            table_description: None,
            fields_description: None,
            visible_to_ai: true,
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn field_list_splits_and_trims() {
        assert_eq!(meta("ID, DATE ,STATUS").field_list(), vec!["ID", "DATE", "STATUS"]);
    }

    #[test]
    fn field_list_drops_empties() {
        assert_eq!(meta("ID,,DATE,").field_list(), vec!["ID", "DATE"]);
        assert!(meta("").field_list().is_empty());
    }
}
