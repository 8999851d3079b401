//! Safe SQL builder: identifiers come from the catalog only, never from the request.

mod builder;
pub use builder::*;
