//! State identifiers and bitset-backed state sets.

use fixedbitset::FixedBitSet;
use std::fmt;

/// Identifies an NFA node or DFA state within its owning model's arena.
pub type StateId = u32;

/// A set of states backed by a fixed-size bit set.
///
/// The backing storage grows on demand, so equality is defined over the
/// members rather than the raw blocks: two sets with the same members but
/// different capacities compare equal.
#[derive(Clone, Default)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create an empty set sized for the given number of states.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    pub fn insert(&mut self, state: StateId) {
        let index = state as usize;
        if index >= self.bits.len() {
            self.bits.grow(index + 1);
        }
        self.bits.insert(index);
    }

    pub fn contains(&self, state: StateId) -> bool {
        let index = state as usize;
        index < self.bits.len() && self.bits.contains(index)
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|index| index as StateId)
    }

    /// The members as a sorted vector, usable as a content-addressed key.
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

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::default();
        for state in iter {
            set.insert(state);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_set_basic() {
        let mut set = StateSet::with_capacity(8);
        assert!(set.is_empty());

        set.insert(3);
        set.insert(6);
        assert_eq!(set.len(), 2);
        assert!(set.contains(3));
        assert!(set.contains(6));
        assert!(!set.contains(4));
    }

    #[test]
    fn test_state_set_grows_past_capacity() {
        let mut set = StateSet::with_capacity(2);
        set.insert(100);
        assert!(set.contains(100));
        assert!(!set.contains(99));
    }

    #[test]
    fn test_state_set_equality_ignores_capacity() {
        let mut small = StateSet::with_capacity(4);
        let mut large = StateSet::with_capacity(64);
        small.insert(1);
        large.insert(1);
        assert_eq!(small, large);

        large.insert(40);
        assert_ne!(small, large);
    }

    #[test]
    fn test_state_set_to_vec_is_sorted() {
        let set: StateSet = [9, 2, 5, 2].into_iter().collect();
        assert_eq!(set.to_vec(), vec![2, 5, 9]);
    }
}
