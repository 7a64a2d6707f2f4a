//! State types for automata.

use fixedbitset::FixedBitSet;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A state identifier represented as a u32.
pub type StateId = u32;

/// A set of states implemented using a fixed-size bit set for efficiency.
///
/// Equality, ordering and hashing only look at membership: two sets holding
/// the same states are the same set whatever capacity they were created with.
/// Subset construction relies on this to use a `StateSet` directly as the
/// identity of a DFA state.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create a new empty state set with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a state set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state into the set.
    pub fn insert(&mut self, state: StateId) {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    /// Check if the set contains a state.
    pub fn contains(&self, state: StateId) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Get the number of states in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over all states in the set, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union this set with another, modifying self in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check if this set intersects with another.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.bits.intersection(&other.bits).next().is_some()
    }

    /// Sorted members, used as the canonical form of the set.
    pub fn to_vec(&self) -> Vec<StateId> {
        self.iter().collect()
    }
}

impl PartialEq for StateSet {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for StateSet {}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Trailing zero blocks must not change the hash.
        for member in self.iter() {
            member.hash(state);
        }
        self.len().hash(state);
    }
}

impl PartialOrd for StateSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StateSet {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let items: Vec<StateId> = iter.into_iter().collect();
        let capacity = items.iter().copied().max().map_or(0, |m| m as usize + 1);
        let mut set = Self::with_capacity(capacity);
        for state in items {
            set.insert(state);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(10);
        assert!(set.is_empty());

        set.insert(3);
        set.insert(7);
        assert!(!set.is_empty());
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(set.contains(7));
        assert!(!set.contains(5));
        assert!(!set.contains(100));
    }

    #[test]
    fn test_state_set_union() {
        let mut set1 = StateSet::with_capacity(10);
        set1.insert(1);
        set1.insert(3);

        let mut set2 = StateSet::with_capacity(20);
        set2.insert(2);
        set2.insert(3);
        set2.insert(15);

        set1.union_with(&set2);
        assert_eq!(set1.to_vec(), vec![1, 2, 3, 15]);
    }

    #[test]
    fn test_identity_ignores_capacity() {
        let small = StateSet::singleton(2, 3);
        let large = StateSet::singleton(2, 300);
        assert_eq!(small, large);

        let mut seen = HashSet::new();
        seen.insert(small);
        assert!(seen.contains(&large));
        assert!(!seen.contains(&StateSet::singleton(1, 3)));
    }

    #[test]
    fn test_empty_sets_are_equal() {
        assert_eq!(StateSet::with_capacity(0), StateSet::with_capacity(64));
        assert_eq!(StateSet::default().len(), 0);
    }

    #[test]
    fn test_intersects() {
        let a: StateSet = [0, 4].into_iter().collect();
        let b: StateSet = [4, 9].into_iter().collect();
        let c: StateSet = [1].into_iter().collect();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_ordering_is_by_members() {
        let a: StateSet = [0, 1].into_iter().collect();
        let b: StateSet = [0, 2].into_iter().collect();
        let c: StateSet = [0].into_iter().collect();
        assert!(a < b);
        assert!(c < a);
    }
}
