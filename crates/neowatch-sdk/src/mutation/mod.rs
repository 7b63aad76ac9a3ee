//! Optimistic mutations
//!
//! Creates, updates and deletes are applied to local view state first and
//! sent to the store second. Each change is tracked until the store answers:
//!
//! - a refused create stays in the list marked unsynced, with retry/discard
//! - a refused update is reverted
//! - a refused delete puts the record back where it was
//!
//! Each failure also queues a [`Notice`](crate::notice::Notice).

mod optimistic;

pub use optimistic::{
    MutationId, MutationKind, MutationState, OptimisticList, PendingWrite, SyncStatus, Tracked,
};
