//! HTTP handlers for dynamic queries and catalog lifecycle.

pub mod metadata;
pub mod query;
pub use metadata::*;
pub use query::*;
