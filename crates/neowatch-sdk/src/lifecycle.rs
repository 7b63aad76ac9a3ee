//! Mount generations for view state
//!
//! Every load a view starts is stamped with the view's current generation.
//! Remounting or unmounting moves the generation on, so results that arrive
//! for an earlier mount are recognised and dropped.

use crate::error::WatchError;

/// Monotonic mount counter of one view instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    current: Generation,
    mounted: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new mount; earlier generations become stale.
    pub fn mount(&mut self) -> Generation {
        self.current = self.current.next();
        self.mounted = true;
        self.current
    }

    pub fn unmount(&mut self) {
        self.current = self.current.next();
        self.mounted = false;
    }

    pub fn current(&self) -> Generation {
        self.current
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.mounted && generation == self.current
    }
}

/// Result of applying a load to view state
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Results were applied; `received` records arrived in this load
    Applied { received: usize },
    /// The view moved on before the results arrived; nothing changed
    Stale,
    /// The guard refused to start a load (one in flight, or nothing left)
    Skipped,
    /// The view needs a signed-in member
    SignInRequired,
    /// The store call failed; previous state is kept
    Failed(WatchError),
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied { .. })
    }
}
