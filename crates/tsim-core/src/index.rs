//! `SparseIndex<V>`: an unbounded, lazily grown slot store.
//!
//! Conceptually an infinite sequence of slots `0, 1, 2, …`, each either
//! holding a `V` or empty.  Reads never fail: an index past the end is simply
//! empty.  Writes past the end extend the backing `Vec` with empty slots.
//!
//! Emptiness is an explicit `None`, never a default-constructed `V`, so "no
//! light at this intersection" stays distinguishable from "a light that is
//! always open".

/// Growable arena of `Option<V>` slots keyed by `usize`.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseIndex<V> {
    slots: Vec<Option<V>>,
}

impl<V> SparseIndex<V> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Pre-allocate room for slots `0..capacity` (all empty).
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity) }
    }

    /// The value at slot `k`, or `None` if it is empty or out of range.
    #[inline]
    pub fn get(&self, k: usize) -> Option<&V> {
        self.slots.get(k).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, k: usize) -> Option<&mut V> {
        self.slots.get_mut(k).and_then(Option::as_mut)
    }

    /// Store `value` at slot `k`, growing as needed.  Returns the previous
    /// occupant.
    pub fn set(&mut self, k: usize, value: V) -> Option<V> {
        if k >= self.slots.len() {
            self.slots.resize_with(k + 1, || None);
        }
        self.slots[k].replace(value)
    }

    /// Empty slot `k`.  The slot count is left unchanged.
    pub fn remove(&mut self, k: usize) -> Option<V> {
        self.slots.get_mut(k).and_then(Option::take)
    }

    #[inline]
    pub fn contains(&self, k: usize) -> bool {
        self.get(k).is_some()
    }

    /// Number of slots materialised so far (occupied or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of occupied slots.  O(len).
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Occupied slots in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &V)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    /// Mutable occupied slots in ascending index order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut V)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|v| (i, v)))
    }

    /// Indices of the occupied slots, ascending.
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(|(i, _)| i)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<V> Default for SparseIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(usize, V)> for SparseIndex<V> {
    fn from_iter<I: IntoIterator<Item = (usize, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (k, v) in iter {
            index.set(k, v);
        }
        index
    }
}
