//! Size-bounded key/value store that evicts the smallest key first.
//!
//! This is not an LRU. Eviction is only "oldest first" when keys are inserted in
//! increasing order, which is how the simulation uses it (keys are simulation
//! times, and the clock only runs forwards). Inserting keys out of order evicts
//! whatever is numerically smallest, recent or not.
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct BoundedCache<K: Ord + Hash + Clone, V> {
    max_size: Option<usize>,
    entries: HashMap<K, V>,
    // min-heap over the keys currently stored.
    ordering: BinaryHeap<Reverse<K>>,
}

impl<K: Ord + Hash + Clone, V> BoundedCache<K, V> {
    /// `None` disables eviction.
    pub fn new(max_size: Option<usize>) -> Self {
        Self {
            max_size,
            entries: HashMap::new(),
            ordering: BinaryHeap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: K, value: V) {
        //! no-op if the key is already present; the stored value is kept.
        if self.entries.contains_key(&key) {
            return;
        }
        self.ordering.push(Reverse(key.clone()));
        self.entries.insert(key, value);

        self.reduce_to_size();
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Removes and returns the entry with the smallest key.
    pub fn remove_smallest(&mut self) -> Option<(K, V)> {
        let Reverse(key) = self.ordering.pop()?;
        let value = self.entries.remove(&key)?;
        Some((key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    fn reduce_to_size(&mut self) {
        let Some(max_size) = self.max_size else {
            return;
        };
        while self.entries.len() > max_size {
            if self.remove_smallest().is_none() {
                break;
            }
        }
    }
}
