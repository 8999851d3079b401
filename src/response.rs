//! Standard response envelopes.

use crate::service::QueryOutput;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaCount,
}

#[derive(Serialize)]
pub struct MetaCount {
    pub count: u64,
}

/// Dynamic query response body. `debug.sql` carries the generated SQL, as the
/// query surface is metadata-driven and authors need to see what ran.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub table: String,
    pub format: &'static str,
    pub include_joins: bool,
    pub depth: u8,
    pub total: usize,
    pub data: Vec<Value>,
    pub debug: QueryDebug,
}

#[derive(Serialize)]
pub struct QueryDebug {
    pub sql: String,
}

impl QueryResponse {
    pub fn from_output(output: QueryOutput, include_joins: bool, depth: u8) -> Self {
        QueryResponse {
            table: output.table,
            format: output.format,
            include_joins,
            depth,
            total: output.total,
            data: output.rows,
            debug: QueryDebug { sql: output.sql },
        }
    }
}
