//! Route builders: common (health/ready/version), catalog CRUD, dynamic query.

pub mod common;
pub mod metadata;
pub mod query;
pub use common::*;
pub use metadata::*;
pub use query::*;
