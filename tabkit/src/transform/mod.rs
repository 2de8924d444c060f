//! Table transformations.
//!
//! Both are pure functions over in-memory data:
//! - Concat: stack tables along rows or columns
//! - Aggregate: pivot `attribute, value, unit` rows into one record

pub mod aggregate;
pub mod concat;

pub use aggregate::{aggregate, MetadataRecord};
pub use concat::concat;
