//! Metadata catalog: one record per queryable table, persisted in PostgreSQL.

pub mod metadata;
pub mod repository;

pub use metadata::*;
pub use repository::*;
