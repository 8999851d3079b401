//! dyntable: metadata-driven dynamic table query library.
//!
//! A metadata catalog whitelists tables and declares their columns, primary
//! key, and relationships. The query service compiles a SELECT (optionally
//! with LEFT JOINs) from the catalog, and the hierarchy module reassembles
//! the flat JOIN result into nested documents.

pub mod case;
pub mod catalog;
pub mod error;
pub mod handlers;
pub mod hierarchy;
pub mod relation;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use catalog::{CatalogRepository, MetadataInput, TableMetadata};
pub use error::{AppError, CatalogError};
pub use hierarchy::{Assembled, Assembler};
pub use relation::{parse_relationships, parse_relationships_with, Cardinality, Classifier, Relationship};
pub use routes::{common_routes, metadata_routes, query_routes};
pub use service::{MetadataService, QueryService};
pub use state::AppState;
pub use store::ensure_catalog_table;
