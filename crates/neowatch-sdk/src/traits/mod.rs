//! Core traits for entity types
//!
//! These traits define the interface entities implement to be read from and
//! written to the record store.

mod record;

pub use record::Record;
