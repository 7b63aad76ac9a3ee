//! In-memory entity caches owned by a view
//!
//! Provides the page accumulator that builds a collection view from
//! successive store pages, and the join index that resolves foreign keys
//! between collections.

mod accumulator;
mod join;

pub use accumulator::{LoadMode, PageTicket, PaginationAccumulator};
pub use join::{distinct_keys, JoinIndex, JoinRecord, JoinResolver, JoinStrategy, JoinTarget};
