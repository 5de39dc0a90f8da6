//! An insertion-ordered, capacity-bounded map.
//!
//! [`FifoMap`] is a thin wrapper over [`IndexMap`]: the index order is the
//! insertion order, so the oldest entry always sits at index 0.
//!
//! The map is not synchronized; owners wrap it in a lock and perform every
//! read-modify-write sequence under that lock.

use indexmap::IndexMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// A map that evicts in insertion order once it grows past its capacity.
///
/// Eviction is pure FIFO: reads never change an entry's position. Inserting a
/// key that is already present replaces the value and moves the key to the
/// newest position.
#[derive(Debug, Clone)]
pub struct FifoMap<K, V> {
    entries: IndexMap<K, V>,
    capacity: NonZeroUsize,
}

impl<K, V> FifoMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map that holds at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: IndexMap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Mutable access to a value. Does not change the entry's position.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Inserts `value` at the newest position, then evicts the oldest entries
    /// until the map is back within capacity.
    ///
    /// Returns the number of entries evicted.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        self.entries.shift_remove(&key);
        self.entries.insert(key, value);

        let mut evicted = 0;
        while self.entries.len() > self.capacity.get() {
            if self.pop_oldest().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key)
    }

    /// Removes and returns the longest-resident entry.
    pub fn pop_oldest(&mut self) -> Option<(K, V)> {
        self.entries.shift_remove_index(0)
    }

    /// Keeps only the entries for which `keep` returns `true`, preserving the
    /// order of the survivors.
    ///
    /// Returns the number of entries removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&K, &V) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|key, value| keep(key, value));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates keys from oldest to newest.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(capacity: usize) -> FifoMap<String, u32> {
        FifoMap::new(NonZeroUsize::new(capacity).unwrap())
    }

    fn keys(map: &FifoMap<String, u32>) -> Vec<String> {
        map.keys().cloned().collect()
    }

    #[test]
    fn insert_and_get() {
        let mut m = map(4);
        assert!(m.is_empty());

        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);

        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&"a".to_string()), Some(&1));
        assert_eq!(m.get(&"b".to_string()), Some(&2));
        assert_eq!(m.get(&"c".to_string()), None);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut m = map(3);
        for (i, k) in ["k1", "k2", "k3", "k4", "k5"].iter().enumerate() {
            m.insert(k.to_string(), i as u32);
        }

        assert_eq!(m.len(), 3);
        assert_eq!(keys(&m), vec!["k3", "k4", "k5"]);
    }

    #[test]
    fn insert_reports_evictions() {
        let mut m = map(2);
        assert_eq!(m.insert("a".to_string(), 1), 0);
        assert_eq!(m.insert("b".to_string(), 2), 0);
        assert_eq!(m.insert("c".to_string(), 3), 1);
    }

    #[test]
    fn reinsert_moves_key_to_newest_position() {
        let mut m = map(3);
        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);
        m.insert("c".to_string(), 3);

        m.insert("a".to_string(), 10);
        assert_eq!(keys(&m), vec!["b", "c", "a"]);

        m.insert("d".to_string(), 4);
        assert_eq!(keys(&m), vec!["c", "a", "d"]);
        assert_eq!(m.get(&"a".to_string()), Some(&10));
    }

    #[test]
    fn reads_do_not_refresh_position() {
        let mut m = map(2);
        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);

        assert_eq!(m.get(&"a".to_string()), Some(&1));
        if let Some(v) = m.get_mut(&"a".to_string()) {
            *v += 1;
        }

        m.insert("c".to_string(), 3);
        assert_eq!(keys(&m), vec!["b", "c"]);
    }

    #[test]
    fn remove_and_pop_oldest() {
        let mut m = map(4);
        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);
        m.insert("c".to_string(), 3);

        assert_eq!(m.remove(&"b".to_string()), Some(2));
        assert_eq!(m.remove(&"b".to_string()), None);
        assert_eq!(m.pop_oldest(), Some(("a".to_string(), 1)));
        assert_eq!(keys(&m), vec!["c"]);
    }

    #[test]
    fn retain_drops_rejected_entries() {
        let mut m = map(8);
        for i in 0..6u32 {
            m.insert(format!("k{i}"), i);
        }

        let removed = m.retain(|_, v| v % 2 == 0);
        assert_eq!(removed, 3);
        assert_eq!(keys(&m), vec!["k0", "k2", "k4"]);
    }

    #[test]
    fn clear_empties_the_map() {
        let mut m = map(4);
        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);
        m.clear();

        assert!(m.is_empty());
        assert_eq!(m.keys().count(), 0);

        m.insert("c".to_string(), 3);
        assert_eq!(keys(&m), vec!["c"]);
    }

    #[test]
    fn retain_preserves_eviction_order() {
        let mut m = map(3);
        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);
        m.insert("c".to_string(), 3);
        m.retain(|k, _| k.as_str() != "b");

        m.insert("d".to_string(), 4);
        m.insert("e".to_string(), 5);
        assert_eq!(keys(&m), vec!["c", "d", "e"]);
    }

    #[test]
    fn default_sized_map_evicts_only_the_overflow() {
        let mut m = map(50_000);
        for i in 1..=50_005u32 {
            m.insert(format!("k{i}"), i);
        }

        assert_eq!(m.len(), 50_000);
        for i in 1..=5 {
            assert_eq!(m.get(&format!("k{i}")), None);
        }
        assert_eq!(m.get(&"k6".to_string()), Some(&6));
        assert_eq!(m.get(&"k50005".to_string()), Some(&50_005));
    }

    #[test]
    fn capacity_of_one_keeps_latest() {
        let mut m = map(1);
        m.insert("a".to_string(), 1);
        m.insert("b".to_string(), 2);
        assert_eq!(keys(&m), vec!["b"]);
        assert_eq!(m.capacity(), 1);
    }
}
