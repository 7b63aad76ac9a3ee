//! Foreign-key resolution between collections
//!
//! The store has no join query. Join records (watch entries, discussions)
//! carry a foreign key; the distinct keys are collected first, the targets
//! fetched, and the result kept as a lookup index. A key with no matching
//! target is simply absent from the index.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::entities::{CommunityDiscussion, NearEarthObject, WatchedAsteroid};
use crate::error::{Result, WatchError};
use crate::store::{QueryFilter, RecordStore, RecordStoreExt};
use crate::traits::Record;

/// How a foreign key locates its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStrategy {
    /// The key is the target's `_id`; each key is looked up directly
    ById,
    /// The key is the target's catalog reference; the target collection is
    /// scanned once and indexed by reference
    ByReference,
}

/// Target side of a join
pub trait JoinTarget: Record {
    /// Catalog reference used by [`JoinStrategy::ByReference`]
    fn reference_key(&self) -> Option<&str>;
}

impl JoinTarget for NearEarthObject {
    fn reference_key(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }
}

/// Record carrying a foreign key into `Target`
pub trait JoinRecord {
    type Target: JoinTarget;

    const STRATEGY: JoinStrategy;

    fn foreign_key(&self) -> Option<&str>;
}

impl JoinRecord for WatchedAsteroid {
    type Target = NearEarthObject;

    const STRATEGY: JoinStrategy = JoinStrategy::ById;

    fn foreign_key(&self) -> Option<&str> {
        self.neo_id.as_deref()
    }
}

impl JoinRecord for CommunityDiscussion {
    type Target = NearEarthObject;

    const STRATEGY: JoinStrategy = JoinStrategy::ByReference;

    fn foreign_key(&self) -> Option<&str> {
        self.neo_reference_id.as_deref()
    }
}

/// Distinct non-empty foreign keys, in first-seen order
pub fn distinct_keys<'a, J, I>(records: I) -> Vec<String>
where
    J: JoinRecord + 'a,
    I: IntoIterator<Item = &'a J>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter_map(JoinRecord::foreign_key)
        .filter(|key| !key.is_empty())
        .filter(|key| seen.insert(key.to_string()))
        .map(str::to_string)
        .collect()
}

/// Foreign key → resolved target
#[derive(Debug, Clone)]
pub struct JoinIndex<E> {
    entries: HashMap<String, E>,
}

impl<E> Default for JoinIndex<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E> JoinIndex<E> {
    /// Index `candidates` by `key_of`, keeping only keys in `wanted`.
    /// When several candidates share a key the first one wins.
    pub fn build<F>(wanted: &[String], candidates: impl IntoIterator<Item = E>, key_of: F) -> Self
    where
        F: Fn(&E) -> Option<&str>,
    {
        let wanted: HashSet<&str> = wanted.iter().map(String::as_str).collect();
        let mut entries = HashMap::new();
        for candidate in candidates {
            let Some(key) = key_of(&candidate) else {
                continue;
            };
            if wanted.contains(key) && !entries.contains_key(key) {
                entries.insert(key.to_string(), candidate);
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&E> {
        self.entries.get(key)
    }

    /// Target of a join record; `None` means unknown, not an error
    pub fn resolve<J: JoinRecord>(&self, record: &J) -> Option<&E> {
        record.foreign_key().and_then(|key| self.entries.get(key))
    }

    /// Add a target known locally, e.g. one picked for an optimistic create.
    /// An existing entry for `key` is kept.
    pub fn insert(&mut self, key: impl Into<String>, target: E) {
        self.entries.entry(key.into()).or_insert(target);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Resolves join records against the store
pub struct JoinResolver<'s, S: ?Sized> {
    store: &'s S,
    page_size: u32,
    max_pages: u32,
}

impl<'s, S: RecordStore + ?Sized> JoinResolver<'s, S> {
    /// `page_size` and `max_pages` bound the collection scan used by
    /// [`JoinStrategy::ByReference`].
    pub fn new(store: &'s S, page_size: u32, max_pages: u32) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
            max_pages,
        }
    }

    pub async fn resolve<J: JoinRecord>(&self, records: &[J]) -> Result<JoinIndex<J::Target>> {
        let keys = distinct_keys(records);
        if keys.is_empty() {
            return Ok(JoinIndex::default());
        }

        let index = match J::STRATEGY {
            JoinStrategy::ById => self.resolve_by_id::<J::Target>(&keys).await?,
            JoinStrategy::ByReference => self.resolve_by_reference::<J::Target>(&keys).await?,
        };

        if index.len() < keys.len() {
            warn!(
                collection = J::Target::collection(),
                wanted = keys.len(),
                resolved = index.len(),
                "Some foreign keys did not resolve"
            );
        } else {
            debug!(collection = J::Target::collection(), resolved = index.len(), "Join resolved");
        }
        Ok(index)
    }

    async fn resolve_by_id<E: JoinTarget>(&self, keys: &[String]) -> Result<JoinIndex<E>> {
        let mut found = Vec::with_capacity(keys.len());
        for key in keys {
            match self.store.fetch_one::<E>(key).await {
                Ok(Some(target)) => found.push(target),
                Ok(None) | Err(WatchError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(JoinIndex::build(keys, found, |e: &E| Some(e.record_id())))
    }

    async fn resolve_by_reference<E: JoinTarget>(&self, keys: &[String]) -> Result<JoinIndex<E>> {
        let all: Vec<E> = self
            .store
            .fetch_all(&QueryFilter::new(), self.page_size, self.max_pages)
            .await?;
        Ok(JoinIndex::build(keys, all, |e: &E| e.reference_key()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch(neo_id: Option<&str>) -> WatchedAsteroid {
        WatchedAsteroid {
            id: uuid::Uuid::new_v4().to_string(),
            neo_id: neo_id.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_distinct_keys_skip_empty_and_duplicates() {
        let watches = vec![
            watch(Some("n-2")),
            watch(Some("n-1")),
            watch(None),
            watch(Some("")),
            watch(Some("n-2")),
        ];
        assert_eq!(distinct_keys(&watches), vec!["n-2".to_string(), "n-1".to_string()]);
    }

    #[test]
    fn test_build_keeps_only_wanted_and_first_match() {
        let neos = vec![
            NearEarthObject {
                id: "a".into(),
                reference_id: Some("r-1".into()),
                ..Default::default()
            },
            NearEarthObject {
                id: "b".into(),
                reference_id: Some("r-1".into()),
                ..Default::default()
            },
            NearEarthObject {
                id: "c".into(),
                reference_id: Some("r-9".into()),
                ..Default::default()
            },
        ];
        let index = JoinIndex::build(&["r-1".to_string()], neos, |n: &NearEarthObject| {
            n.reference_id.as_deref()
        });

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("r-1").unwrap().id, "a");
        assert!(!index.contains("r-9"));
    }
}
