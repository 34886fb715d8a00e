//! Fixed-capacity experience replay.

use std::collections::VecDeque;

use rand::{Rng, seq::index};
use serde::{Deserialize, Serialize};

/// How [`ReplayPool::withdraw`] picks the entries it removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingPolicy {
    /// Uniformly random, without replacement.
    #[default]
    Random,
    /// Oldest entries first.
    Fifo,
}

/// Ring buffer of training records. Pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct ReplayPool<T> {
    items: VecDeque<T>,
    capacity: usize,
    policy: SamplingPolicy,
}

impl<T> ReplayPool<T> {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize, policy: SamplingPolicy) -> Self {
        assert!(capacity > 0, "replay pool capacity must be positive");
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            policy,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.items.iter()
    }

    /// Removes `count` entries according to the pool's [`SamplingPolicy`].
    ///
    /// The returned entries, and those left behind, keep their insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds [`Self::len`].
    pub fn withdraw<R>(&mut self, count: usize, rng: &mut R) -> Vec<T>
    where
        R: Rng + ?Sized,
    {
        assert!(
            count <= self.items.len(),
            "cannot withdraw {count} entries from a pool of {}",
            self.items.len()
        );
        match self.policy {
            SamplingPolicy::Fifo => self.items.drain(..count).collect(),
            SamplingPolicy::Random => {
                let mut chosen = vec![false; self.items.len()];
                for i in index::sample(rng, self.items.len(), count) {
                    chosen[i] = true;
                }
                let mut batch = Vec::with_capacity(count);
                let mut kept = VecDeque::with_capacity(self.capacity);
                for (item, take) in self.items.drain(..).zip(chosen) {
                    if take {
                        batch.push(item);
                    } else {
                        kept.push_back(item);
                    }
                }
                self.items = kept;
                batch
            }
        }
    }
}
