//! Local-first list with tracked remote writes
//!
//! Every change lands in the list before the store is called. The write is
//! handed back to the caller as a [`PendingWrite`]; its outcome is fed back
//! through [`OptimisticList::settle`], which confirms the entry or runs the
//! failure branch for that kind of change.

use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, WatchError};
use crate::notice::Notice;
use crate::store::RecordStore;
use crate::traits::Record;

/// Identifies one optimistic change
pub type MutationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

/// Where one mutation stands
#[derive(Debug, Clone, PartialEq)]
pub enum MutationState {
    /// Visible locally, store call outstanding
    Applied,
    /// Store accepted the write
    Confirmed,
    /// Store rejected the write; the failure branch has run
    Failed(WatchError),
}

impl MutationState {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, MutationState::Confirmed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, MutationState::Failed(_))
    }
}

/// Sync state of one list entry
#[derive(Debug, Clone, PartialEq)]
pub enum SyncStatus {
    Synced,
    Pending { mutation: MutationId },
    /// A create the store refused. The entry stays visible until retried
    /// or discarded.
    Unsynced { mutation: MutationId, error: WatchError },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<T> {
    pub record: T,
    pub status: SyncStatus,
}

impl<T> Tracked<T> {
    fn synced(record: T) -> Self {
        Self {
            record,
            status: SyncStatus::Synced,
        }
    }

    pub fn is_synced(&self) -> bool {
        self.status == SyncStatus::Synced
    }

    pub fn is_unsynced(&self) -> bool {
        matches!(self.status, SyncStatus::Unsynced { .. })
    }
}

/// A store call an applied mutation still owes
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub id: MutationId,
    pub kind: MutationKind,
    pub collection: &'static str,
    pub record_id: String,
    /// Full record for creates, `_id` plus changed fields for updates,
    /// `Null` for deletes
    pub payload: Value,
}

impl PendingWrite {
    /// Issue the write against `store`.
    pub async fn send<S: RecordStore + ?Sized>(&self, store: &S) -> Result<()> {
        match self.kind {
            MutationKind::Create => store.create(self.collection, self.payload.clone()).await.map(|_| ()),
            MutationKind::Update => store.update(self.collection, self.payload.clone()).await.map(|_| ()),
            MutationKind::Delete => store.delete(self.collection, &self.record_id).await,
        }
    }
}

/// How to undo a change if the store refuses it
#[derive(Debug, Clone)]
enum Rollback<T> {
    /// Creates are never rolled back automatically
    Create,
    Update { before: T, after: T },
    /// `next` and `prev` are the ids of the neighbours at removal time
    Delete {
        record: T,
        index: usize,
        next: Option<String>,
        prev: Option<String>,
    },
}

#[derive(Debug, Clone)]
struct InFlight<T> {
    /// Order in which mutations were applied
    seq: u64,
    write: PendingWrite,
    rollback: Rollback<T>,
}

/// Records of one collection as a view shows them, newest changes first.
#[derive(Debug, Clone)]
pub struct OptimisticList<T> {
    entries: Vec<Tracked<T>>,
    in_flight: HashMap<MutationId, InFlight<T>>,
    next_seq: u64,
    notices: Vec<Notice>,
}

impl<T> Default for OptimisticList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            in_flight: HashMap::new(),
            next_seq: 0,
            notices: Vec::new(),
        }
    }
}

impl<T: Record + PartialEq> OptimisticList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<T>) -> Self {
        let mut list = Self::new();
        list.replace_all(records);
        list
    }

    /// Swap in freshly loaded records. Outstanding mutations are forgotten,
    /// so their late outcomes settle as no-ops.
    pub fn replace_all(&mut self, records: Vec<T>) {
        if !self.in_flight.is_empty() {
            debug!(
                collection = T::collection(),
                dropped = self.in_flight.len(),
                "Reload forgets outstanding mutations"
            );
        }
        self.entries = records.into_iter().map(Tracked::synced).collect();
        self.in_flight.clear();
    }

    pub fn entries(&self) -> &[Tracked<T>] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn get(&self, record_id: &str) -> Option<&Tracked<T>> {
        self.entries.iter().find(|e| e.record.record_id() == record_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any store call is still outstanding
    pub fn has_pending(&self) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.status, SyncStatus::Pending { .. }))
            || self
                .in_flight
                .values()
                .any(|f| matches!(f.rollback, Rollback::Delete { .. }))
    }

    /// Whether a create is outstanding
    pub fn has_pending_create(&self) -> bool {
        self.entries.iter().any(|e| match e.status {
            SyncStatus::Pending { mutation } => self.is_create(mutation),
            _ => false,
        })
    }

    /// Drain queued user notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn position(&self, record_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.record.record_id() == record_id)
    }

    fn track(&mut self, kind: MutationKind, record_id: &str, payload: Value, rollback: Rollback<T>) -> PendingWrite {
        let write = PendingWrite {
            id: Uuid::new_v4(),
            kind,
            collection: T::collection(),
            record_id: record_id.to_string(),
            payload,
        };
        debug!(
            collection = write.collection,
            record_id = %write.record_id,
            kind = ?kind,
            "Applied locally"
        );
        self.next_seq += 1;
        self.in_flight.insert(
            write.id,
            InFlight {
                seq: self.next_seq,
                write: write.clone(),
                rollback,
            },
        );
        write
    }

    /// Put `record` at the head of the list and return the create it owes.
    pub fn apply_create(&mut self, record: T) -> Result<PendingWrite> {
        let payload = record.to_json()?;
        let record_id = record.record_id().to_string();
        let write = self.track(MutationKind::Create, &record_id, payload, Rollback::Create);
        self.entries.insert(
            0,
            Tracked {
                record,
                status: SyncStatus::Pending { mutation: write.id },
            },
        );
        Ok(write)
    }

    /// Change a record in place. `patch` holds only the changed fields; the
    /// record's `_id` is added to it. `None` when the record is not listed.
    pub fn apply_update<F>(&mut self, record_id: &str, patch: Value, mutate: F) -> Option<PendingWrite>
    where
        F: FnOnce(&mut T),
    {
        let index = self.position(record_id)?;
        let before = self.entries[index].record.clone();
        mutate(&mut self.entries[index].record);
        let after = self.entries[index].record.clone();

        let mut payload = match patch {
            Value::Object(fields) => fields,
            _ => serde_json::Map::new(),
        };
        payload.insert("_id".to_string(), Value::String(record_id.to_string()));

        let write = self.track(
            MutationKind::Update,
            record_id,
            Value::Object(payload),
            Rollback::Update { before, after },
        );
        self.entries[index].status = SyncStatus::Pending { mutation: write.id };
        Some(write)
    }

    /// Take a record out of the list. `None` when it is not listed or its
    /// create has not reached the store: an unsynced entry is discarded
    /// instead, and one whose create is still outstanding is left in place.
    pub fn apply_delete(&mut self, record_id: &str) -> Option<PendingWrite> {
        let index = self.position(record_id)?;
        match self.entries[index].status {
            SyncStatus::Unsynced { .. } => {
                self.discard(record_id);
                return None;
            }
            SyncStatus::Pending { mutation } if self.is_create(mutation) => {
                debug!(record_id = %record_id, "Create still outstanding, not removing");
                return None;
            }
            _ => {}
        }

        let next = self.entries.get(index + 1).map(|e| e.record.record_id().to_string());
        let prev = index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.record.record_id().to_string());
        let removed = self.entries.remove(index);
        Some(self.track(
            MutationKind::Delete,
            record_id,
            Value::Null,
            Rollback::Delete {
                record: removed.record,
                index,
                next,
                prev,
            },
        ))
    }

    fn is_create(&self, mutation: MutationId) -> bool {
        self.in_flight
            .get(&mutation)
            .is_some_and(|f| f.write.kind == MutationKind::Create)
    }

    /// Where a restored record goes: before its old successor, else after
    /// its old predecessor, else its old index.
    fn restore_position(&self, index: usize, next: Option<&str>, prev: Option<&str>) -> usize {
        if let Some(at) = next.and_then(|id| self.position(id)) {
            return at;
        }
        if let Some(at) = prev.and_then(|id| self.position(id)) {
            return at + 1;
        }
        index.min(self.entries.len())
    }

    fn updates_on<'a>(&'a self, record_id: &'a str) -> impl Iterator<Item = (&'a MutationId, &'a InFlight<T>)> {
        self.in_flight
            .iter()
            .filter(move |(_, f)| f.write.record_id == record_id && matches!(f.rollback, Rollback::Update { .. }))
    }

    /// The next outstanding update on `record_id` after `seq`, if it was
    /// applied on top of `state`
    fn update_applied_over(&self, record_id: &str, seq: u64, state: &T) -> Option<MutationId> {
        let (id, next) = self
            .updates_on(record_id)
            .filter(|(_, f)| f.seq > seq)
            .min_by_key(|(_, f)| f.seq)?;
        match &next.rollback {
            Rollback::Update { before, .. } if before == state => Some(*id),
            _ => None,
        }
    }

    /// The closest outstanding update on `record_id` before `seq`, if it
    /// produced `state`
    fn update_producing(&self, record_id: &str, seq: u64, state: &T) -> Option<MutationId> {
        let (id, prev) = self
            .updates_on(record_id)
            .filter(|(_, f)| f.seq < seq)
            .max_by_key(|(_, f)| f.seq)?;
        match &prev.rollback {
            Rollback::Update { after, .. } if after == state => Some(*id),
            _ => None,
        }
    }

    /// Feed back the store's answer for a write.
    ///
    /// Returns `None` when the mutation is unknown, which happens when the
    /// list was reloaded or the entry discarded while the write was out.
    pub fn settle(&mut self, mutation: MutationId, result: Result<()>) -> Option<MutationState> {
        let Some(flight) = self.in_flight.remove(&mutation) else {
            debug!(mutation = %mutation, "Ignoring outcome of a forgotten mutation");
            return None;
        };
        let record_id = flight.write.record_id.clone();

        let error = match result {
            Ok(()) => {
                if let Some(index) = self.position(&record_id) {
                    if self.entries[index].status == (SyncStatus::Pending { mutation }) {
                        self.entries[index].status = SyncStatus::Synced;
                    }
                }
                info!(
                    collection = flight.write.collection,
                    record_id = %record_id,
                    kind = ?flight.write.kind,
                    "Mutation confirmed"
                );
                return Some(MutationState::Confirmed);
            }
            Err(e) => e,
        };

        warn!(
            collection = flight.write.collection,
            record_id = %record_id,
            kind = ?flight.write.kind,
            error = %error,
            "Mutation failed"
        );

        match flight.rollback {
            Rollback::Create => {
                if let Some(index) = self.position(&record_id) {
                    self.entries[index].status = SyncStatus::Unsynced {
                        mutation,
                        error: error.clone(),
                    };
                    // Kept so the create can be retried
                    self.in_flight.insert(mutation, InFlight {
                        seq: flight.seq,
                        write: flight.write,
                        rollback: Rollback::Create,
                    });
                }
                self.notices
                    .push(Notice::error("Not saved. Retry or discard.").for_record(&record_id));
            }
            Rollback::Update { before, after } => {
                if let Some(later) = self.update_applied_over(&record_id, flight.seq, &after) {
                    // The later change now has to unwind past this one too
                    if let Some(InFlight {
                        rollback: Rollback::Update { before: chained, .. },
                        ..
                    }) = self.in_flight.get_mut(&later)
                    {
                        *chained = before.clone();
                    }
                }
                if let Some(index) = self.position(&record_id) {
                    if self.entries[index].record == after {
                        let status = match self.update_producing(&record_id, flight.seq, &before) {
                            Some(earlier) => SyncStatus::Pending { mutation: earlier },
                            None => SyncStatus::Synced,
                        };
                        let entry = &mut self.entries[index];
                        entry.record = before;
                        entry.status = status;
                    }
                }
                self.notices
                    .push(Notice::error("Update failed. Change reverted.").for_record(&record_id));
            }
            Rollback::Delete { record, index, next, prev } => {
                let index = self.restore_position(index, next.as_deref(), prev.as_deref());
                self.entries.insert(index, Tracked::synced(record));
                self.notices
                    .push(Notice::error("Could not remove. Item restored.").for_record(&record_id));
            }
        }
        Some(MutationState::Failed(error))
    }

    /// Re-issue the create for an unsynced entry.
    pub fn retry(&mut self, record_id: &str) -> Option<PendingWrite> {
        let index = self.position(record_id)?;
        let SyncStatus::Unsynced { mutation, .. } = self.entries[index].status else {
            return None;
        };
        let write = self.in_flight.get(&mutation)?.write.clone();
        self.entries[index].status = SyncStatus::Pending { mutation };
        debug!(collection = write.collection, record_id = %record_id, "Retrying create");
        Some(write)
    }

    /// Drop an unsynced entry from the list.
    pub fn discard(&mut self, record_id: &str) -> bool {
        let Some(index) = self.position(record_id) else {
            return false;
        };
        let SyncStatus::Unsynced { mutation, .. } = self.entries[index].status else {
            return false;
        };
        self.in_flight.remove(&mutation);
        self.entries.remove(index);
        true
    }

    pub async fn create<S: RecordStore + ?Sized>(&mut self, store: &S, record: T) -> Result<MutationState> {
        let write = self.apply_create(record)?;
        let result = write.send(store).await;
        Ok(self.settle(write.id, result).unwrap_or(MutationState::Applied))
    }

    pub async fn update<S, F>(&mut self, store: &S, record_id: &str, patch: Value, mutate: F) -> Result<MutationState>
    where
        S: RecordStore + ?Sized,
        F: FnOnce(&mut T),
    {
        let write = self
            .apply_update(record_id, patch, mutate)
            .ok_or_else(|| WatchError::NotFound(record_id.to_string()))?;
        let result = write.send(store).await;
        Ok(self.settle(write.id, result).unwrap_or(MutationState::Applied))
    }

    pub async fn delete<S: RecordStore + ?Sized>(&mut self, store: &S, record_id: &str) -> Result<MutationState> {
        let write = self
            .apply_delete(record_id)
            .ok_or_else(|| WatchError::NotFound(record_id.to_string()))?;
        let result = write.send(store).await;
        Ok(self.settle(write.id, result).unwrap_or(MutationState::Applied))
    }

    /// Re-send an unsynced create and settle it.
    pub async fn resend<S: RecordStore + ?Sized>(&mut self, store: &S, record_id: &str) -> Option<MutationState> {
        let write = self.retry(record_id)?;
        let result = write.send(store).await;
        self.settle(write.id, result)
    }
}
