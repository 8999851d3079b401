//! Domain services: dynamic query execution and catalog lifecycle.

mod metadata;
mod query;
mod validation;
pub use metadata::MetadataService;
pub use query::{QueryOutput, QueryService, ROW_WARN_THRESHOLD};
pub use validation::validate_metadata_input;
