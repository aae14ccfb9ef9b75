//! Entity to model mappers
//!
//! Conversions from database rows to domain objects. Columns holding enums
//! are text, so rows carrying one go through `TryFrom` and surface an
//! unexpected value as a database error.

mod admin_action;
mod comment;
mod leaderboard;
mod member;
mod notification;
mod reaction;
mod report;
mod shoutout;

use brag_core::value_objects::Snowflake;

pub use report::report_stats;

/// Raw ids for binding as `BIGINT[]`
pub fn raw_ids(ids: &[Snowflake]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}
