//! Fixed-size open-addressing hash table with exact probe instrumentation.
//!
//! The table never resizes and never exposes a delete operation. What it
//! does track, exactly, is the cost of getting every distinct value into
//! its slot: how many probes each placement took, how many placements
//! happened, and how many insert calls turned out to be duplicates. That
//! makes it the measurement core for load-factor experiments comparing
//! linear probing against double hashing.

use std::fmt;

use thiserror::Error;

use crate::entry::{KeyHash, KeyedEntry};

/// Smallest usable table size. Double hashing's secondary modulus is
/// `table_size - 2`, which must stay at least 1.
pub const MIN_TABLE_SIZE: usize = 3;

/// Collision resolution strategy, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStrategy {
    /// The probe sequence advances by a constant step of 1.
    Linear,
    /// The probe sequence advances by a per-key step derived from a
    /// second hash function.
    Double,
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Double => write!(f, "Double"),
        }
    }
}

/// Error building a table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The requested size cannot support the secondary hash modulus.
    #[error("table size {0} is too small, need at least 3 slots")]
    TableTooSmall(usize),
}

/// One slot of the table.
#[derive(Debug, Clone)]
enum Slot<T> {
    /// Never used.
    Empty,
    /// Previously occupied and reusable by insertion. No current mutator
    /// produces this state; it is the extension point for a delete
    /// operation.
    #[allow(dead_code)]
    Tombstoned,
    /// Holds a live entry.
    Occupied(KeyedEntry<T>),
}

/// Public view of a slot's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// The slot was never used.
    Empty,
    /// The slot held an entry that was since removed.
    Tombstoned,
    /// The slot holds a live entry.
    Occupied,
}

/// Open-addressing hash table of a fixed size.
///
/// Values supply their own integer key through [`KeyHash`] and their own
/// equality; the table is otherwise agnostic about what it stores. All
/// probing is done in the slot array itself, with the strategy chosen at
/// construction deciding how the sequence advances.
///
/// Insertion past capacity is a silent no-op: the table saturates rather
/// than signalling overflow. Callers that care should watch
/// [`is_full`](Self::is_full) before inserting.
#[derive(Debug, Clone)]
pub struct OpenAddressingTable<T> {
    /// The slot array; its length is fixed at construction.
    slots: Vec<Slot<T>>,
    /// Active probing strategy.
    strategy: ProbeStrategy,
    /// Probes expended on successful new insertions. Duplicate hits do
    /// not add to this.
    total_probes: usize,
    /// Distinct entries placed.
    total_inserts: usize,
    /// Insert calls that matched an existing entry.
    duplicate_count: usize,
}

impl<T> OpenAddressingTable<T> {
    /// Creates a table with `table_size` empty slots and zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::TableTooSmall`] when `table_size` is below
    /// [`MIN_TABLE_SIZE`].
    pub fn new(table_size: usize, strategy: ProbeStrategy) -> Result<Self, TableError> {
        if table_size < MIN_TABLE_SIZE {
            return Err(TableError::TableTooSmall(table_size));
        }
        let mut slots = Vec::with_capacity(table_size);
        slots.resize_with(table_size, || Slot::Empty);
        Ok(Self { slots, strategy, total_probes: 0, total_inserts: 0, duplicate_count: 0 })
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the probing strategy the table was built with.
    #[must_use]
    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    /// Returns the probes expended on successful new insertions.
    #[must_use]
    pub fn total_probes(&self) -> usize {
        self.total_probes
    }

    /// Returns the number of distinct entries placed.
    #[must_use]
    pub fn total_inserts(&self) -> usize {
        self.total_inserts
    }

    /// Returns the number of insert calls that matched an existing entry.
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_count
    }

    /// Returns true while no entry has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_inserts == 0
    }

    /// Returns true once every slot holds an entry.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.total_inserts == self.slots.len()
    }

    /// Returns the ratio of placed entries to capacity.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.total_inserts as f64 / self.slots.len() as f64
    }

    /// Returns the mean probes per distinct insertion, 0.0 while empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_probes(&self) -> f64 {
        if self.total_inserts == 0 {
            return 0.0;
        }
        self.total_probes as f64 / self.total_inserts as f64
    }

    /// Returns the state of the slot at `index`, or `None` out of range.
    #[must_use]
    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).map(|slot| match slot {
            Slot::Empty => SlotState::Empty,
            Slot::Tombstoned => SlotState::Tombstoned,
            Slot::Occupied(_) => SlotState::Occupied,
        })
    }

    /// Returns the entry at `index` when that slot is occupied.
    #[must_use]
    pub fn slot_at(&self, index: usize) -> Option<&KeyedEntry<T>> {
        match self.slots.get(index) {
            Some(Slot::Occupied(entry)) => Some(entry),
            _ => None,
        }
    }

    /// Iterates the occupied slots in index order.
    #[must_use = "iterators are lazy and do nothing unless consumed"]
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &KeyedEntry<T>)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Occupied(entry) => Some((index, entry)),
            _ => None,
        })
    }
}

impl<T: KeyHash + Eq> OpenAddressingTable<T> {
    /// Primary probe position for `key`.
    fn primary_hash(&self, key: i64) -> usize {
        floor_mod(key, self.slots.len())
    }

    /// Secondary step for `key`, always in `[1, table_size - 2]`.
    #[allow(clippy::arithmetic_side_effects)]
    fn secondary_hash(&self, key: i64) -> usize {
        // The constructor guarantees at least MIN_TABLE_SIZE slots, so
        // the secondary modulus is at least 1 and the step at least 1.
        1 + floor_mod(key, self.slots.len() - 2)
    }

    /// Inserts `value`, resolving collisions per the active strategy.
    ///
    /// The probe sequence is walked until the first `Empty` or
    /// `Tombstoned` slot takes a new entry, or an occupied slot matching
    /// both key and value absorbs the call as a duplicate. A new entry
    /// records the 1-based number of probes it consumed; duplicates touch
    /// only the matched entry's frequency and the duplicate counter.
    /// When every slot is occupied by other values the insertion is
    /// dropped without any signal.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn insert(&mut self, value: T) {
        let key = value.key_hash();
        let table_size = self.slots.len();
        let h1 = self.primary_hash(key);
        let step = match self.strategy {
            ProbeStrategy::Linear => 1,
            ProbeStrategy::Double => self.secondary_hash(key),
        };
        for attempt in 0..table_size {
            // Bounded modular arithmetic: h1 and step are both below
            // table_size, so the index stays in range.
            let index = (h1 + attempt * step) % table_size;
            let Some(slot) = self.slots.get_mut(index) else {
                return;
            };
            match slot {
                Slot::Empty | Slot::Tombstoned => {
                    let probes = attempt + 1;
                    *slot = Slot::Occupied(KeyedEntry::new(value, probes));
                    self.total_inserts = self.total_inserts.saturating_add(1);
                    self.total_probes = self.total_probes.saturating_add(probes);
                    return;
                }
                Slot::Occupied(entry) => {
                    if entry.key() == key && *entry.value() == value {
                        entry.increment_frequency();
                        self.duplicate_count = self.duplicate_count.saturating_add(1);
                        return;
                    }
                }
            }
        }
        // Every slot probed and held a different value: the table is
        // saturated and the insertion is dropped.
    }
}

/// Floored modulus, folding negative keys into `[0, modulus)`.
#[allow(
    clippy::arithmetic_side_effects,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn floor_mod(value: i64, modulus: usize) -> usize {
    // Table sizes fit comfortably in i64, and rem_euclid is exactly the
    // floored modulus: the result is non-negative and below the modulus.
    value.rem_euclid(modulus as i64) as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn table(size: usize, strategy: ProbeStrategy) -> OpenAddressingTable<i32> {
        OpenAddressingTable::new(size, strategy).unwrap()
    }

    /// Recomputes `entry`'s probe sequence and checks it was placed in
    /// the first reachable free slot: every earlier slot is occupied by a
    /// value that does not match, and the final probe lands on `index`.
    fn assert_first_reachable_slot(table: &OpenAddressingTable<i32>, index: usize) {
        let entry = table.slot_at(index).unwrap();
        let key = entry.key();
        let h1 = table.primary_hash(key);
        let step = match table.strategy() {
            ProbeStrategy::Linear => 1,
            ProbeStrategy::Double => table.secondary_hash(key),
        };
        let probes = entry.probe_count();
        assert!(probes >= 1);
        for attempt in 0..probes - 1 {
            let earlier = (h1 + attempt * step) % table.table_size();
            let resident = table.slot_at(earlier).unwrap();
            assert_ne!(resident.value(), entry.value());
        }
        assert_eq!((h1 + (probes - 1) * step) % table.table_size(), index);
    }

    #[test]
    fn test_construction_rejects_sizes_below_minimum() {
        for size in 0..MIN_TABLE_SIZE {
            let result = OpenAddressingTable::<i32>::new(size, ProbeStrategy::Double);
            assert_eq!(result.err(), Some(TableError::TableTooSmall(size)));
        }
        assert!(OpenAddressingTable::<i32>::new(MIN_TABLE_SIZE, ProbeStrategy::Double).is_ok());
    }

    #[test]
    fn test_new_table_is_empty_with_zeroed_counters() {
        let table = table(11, ProbeStrategy::Linear);
        assert!(table.is_empty());
        assert!(!table.is_full());
        assert_eq!(table.table_size(), 11);
        assert_eq!(table.total_probes(), 0);
        assert_eq!(table.total_inserts(), 0);
        assert_eq!(table.duplicate_count(), 0);
        assert_eq!(table.average_probes(), 0.0);
        for index in 0..11 {
            assert_eq!(table.slot_state(index), Some(SlotState::Empty));
            assert!(table.slot_at(index).is_none());
        }
        assert_eq!(table.slot_state(11), None);
    }

    #[test]
    fn test_linear_probing_end_to_end() {
        // Keys 1, 12 and 23 all hash to slot 1 in a table of 11; key 2
        // then finds its home slot taken by the displaced 12.
        let mut table = table(11, ProbeStrategy::Linear);
        for key in [1, 12, 23, 2] {
            table.insert(key);
        }
        assert_eq!(table.total_inserts(), 4);
        assert_eq!(table.duplicate_count(), 0);
        assert_eq!(table.total_probes(), 9);

        let placements = [(1, 1, 1), (2, 12, 2), (3, 23, 3), (4, 2, 3)];
        for (index, value, probes) in placements {
            let entry = table.slot_at(index).unwrap();
            assert_eq!(*entry.value(), value);
            assert_eq!(entry.probe_count(), probes);
            assert_eq!(entry.frequency(), 0);
        }
        for index in [0, 5, 6, 7, 8, 9, 10] {
            assert_eq!(table.slot_state(index), Some(SlotState::Empty));
        }
    }

    #[test]
    fn test_double_hashing_separates_colliding_keys() {
        // Same primary slot, different secondary steps: 12 steps by
        // 1 + (12 mod 9) = 4, 23 by 1 + (23 mod 9) = 6.
        let mut table = table(11, ProbeStrategy::Double);
        for key in [1, 12, 23] {
            table.insert(key);
        }
        assert_eq!(table.total_inserts(), 3);
        assert_eq!(table.total_probes(), 5);
        assert_eq!(*table.slot_at(1).unwrap().value(), 1);
        assert_eq!(*table.slot_at(5).unwrap().value(), 12);
        assert_eq!(*table.slot_at(7).unwrap().value(), 23);
        assert_eq!(table.slot_at(5).unwrap().probe_count(), 2);
        assert_eq!(table.slot_at(7).unwrap().probe_count(), 2);
    }

    #[test]
    fn test_duplicates_touch_frequency_and_duplicate_count_only() {
        let mut table = table(11, ProbeStrategy::Linear);
        table.insert(7);
        let probes_before = table.total_probes();
        table.insert(7);
        table.insert(7);
        assert_eq!(table.total_inserts(), 1);
        assert_eq!(table.duplicate_count(), 2);
        assert_eq!(table.total_probes(), probes_before);
        let entry = table.slot_at(7).unwrap();
        assert_eq!(entry.frequency(), 2);
        assert_eq!(entry.probe_count(), 1);
    }

    #[test]
    fn test_negative_keys_fold_with_floored_modulus() {
        let mut table = table(11, ProbeStrategy::Linear);
        table.insert(-1); // -1 mod 11 = 10
        table.insert(-13); // -13 mod 11 = 9
        assert_eq!(*table.slot_at(10).unwrap().value(), -1);
        assert_eq!(*table.slot_at(9).unwrap().value(), -13);
        assert_eq!(table.total_probes(), 2);
    }

    #[test]
    fn test_negative_keys_probe_forward_under_double_hashing() {
        // -23 mod 11 = 10 and 1 + (-23 mod 9) = 5, both non-negative, so
        // the sequence walks 10, 4, 9, ...
        let mut table = table(11, ProbeStrategy::Double);
        table.insert(-1); // lands at slot 10
        table.insert(-23);
        assert_eq!(table.total_inserts(), 2);
        assert_eq!(*table.slot_at(4).unwrap().value(), -23);
        assert_eq!(table.slot_at(4).unwrap().probe_count(), 2);
    }

    #[test]
    fn test_secondary_step_stays_in_range() {
        let table = table(11, ProbeStrategy::Double);
        for key in [i64::MIN, -100, -1, 0, 1, 8, 9, 100, i64::MAX] {
            let step = table.secondary_hash(key);
            assert!((1..=9).contains(&step), "step {step} for key {key}");
        }
    }

    #[test]
    fn test_tombstoned_slots_are_reused_by_insertion() {
        let mut table = table(11, ProbeStrategy::Linear);
        table.insert(1);
        // Model a future delete operation by hand.
        *table.slots.get_mut(1).unwrap() = Slot::Tombstoned;
        assert_eq!(table.slot_state(1), Some(SlotState::Tombstoned));

        // Key 12 hashes to slot 1 and takes the tombstone on probe 1.
        table.insert(12);
        assert_eq!(*table.slot_at(1).unwrap().value(), 12);
        assert_eq!(table.slot_at(1).unwrap().probe_count(), 1);
        assert_eq!(table.total_inserts(), 2);
    }

    #[test]
    fn test_full_table_drops_new_values_silently() {
        let mut table = table(3, ProbeStrategy::Linear);
        for key in [0, 1, 2] {
            table.insert(key);
        }
        assert!(table.is_full());
        let probes_before = table.total_probes();

        table.insert(9);
        assert_eq!(table.total_inserts(), 3);
        assert_eq!(table.duplicate_count(), 0);
        assert_eq!(table.total_probes(), probes_before);

        // A duplicate of a resident value is still matched while full.
        table.insert(1);
        assert_eq!(table.duplicate_count(), 1);
        assert_eq!(table.total_inserts(), 3);
    }

    #[test]
    fn test_occupied_iterates_in_slot_order() {
        let mut table = table(11, ProbeStrategy::Linear);
        for key in [5, 16, 2] {
            table.insert(key);
        }
        let collected: Vec<(usize, i32)> =
            table.occupied().map(|(index, entry)| (index, *entry.value())).collect();
        assert_eq!(collected, vec![(2, 2), (5, 5), (6, 16)]);
    }

    #[test]
    fn test_placements_are_first_reachable_slots() {
        for strategy in [ProbeStrategy::Linear, ProbeStrategy::Double] {
            let mut table = table(23, strategy);
            for key in [3, 26, 49, 72, 95, 4, -20, 11, 0, 22] {
                table.insert(key);
            }
            assert_eq!(table.total_inserts(), 10);
            let occupied: Vec<usize> = table.occupied().map(|(index, _)| index).collect();
            for index in occupied {
                assert_first_reachable_slot(&table, index);
            }
        }
    }

    #[test]
    fn test_string_values_hash_and_deduplicate() {
        let mut table: OpenAddressingTable<String> =
            OpenAddressingTable::new(11, ProbeStrategy::Double).unwrap();
        table.insert(String::from("apple"));
        table.insert(String::from("banana"));
        table.insert(String::from("apple"));
        assert_eq!(table.total_inserts(), 2);
        assert_eq!(table.duplicate_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_distinct_keys_all_land(
            keys in prop::collection::hash_set(any::<i32>(), 1..50)
        ) {
            for strategy in [ProbeStrategy::Linear, ProbeStrategy::Double] {
                let mut table = table(53, strategy);
                for &key in &keys {
                    table.insert(key);
                }
                prop_assert_eq!(table.total_inserts(), keys.len());
                prop_assert_eq!(table.duplicate_count(), 0);
                prop_assert!(table.average_probes() >= 1.0);
                prop_assert!(table.total_probes() >= table.total_inserts());
            }
        }

        #[test]
        fn prop_every_placement_is_first_reachable(
            keys in prop::collection::vec(any::<i32>(), 1..100)
        ) {
            for strategy in [ProbeStrategy::Linear, ProbeStrategy::Double] {
                let mut table = table(211, strategy);
                for &key in &keys {
                    table.insert(key);
                }
                let occupied: Vec<usize> =
                    table.occupied().map(|(index, _)| index).collect();
                for index in occupied {
                    assert_first_reachable_slot(&table, index);
                }
            }
        }

        #[test]
        fn prop_counters_reconcile_with_calls(
            keys in prop::collection::vec(0i32..40, 1..200)
        ) {
            let mut table = table(53, ProbeStrategy::Double);
            for &key in &keys {
                table.insert(key);
            }
            // Every call either placed a new entry or hit a duplicate;
            // the table never saturates at 40 distinct keys in 53 slots.
            prop_assert_eq!(
                table.total_inserts() + table.duplicate_count(),
                keys.len()
            );
        }
    }
}
