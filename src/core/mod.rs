pub mod firehose;
pub mod query;

pub use crate::core::firehose::Firehose;
pub use crate::core::query::Query;
