//! # Probelab
//!
//! An instrumented open-addressing hash table for load-factor
//! experiments, with two collision resolution strategies:
//!
//! - `ProbeStrategy::Linear`: the probe sequence advances one slot at a
//!   time
//! - `ProbeStrategy::Double`: the probe sequence advances by a per-key
//!   step from a second hash function
//!
//! The table has a fixed size and counts exactly what an experiment
//! wants counted: probes per placement, distinct insertions and
//! duplicate hits. A twin prime search is included for picking table
//! sizes that keep both hash moduli prime.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probelab::{OpenAddressingTable, ProbeStrategy};
//!
//! let mut table = OpenAddressingTable::new(11, ProbeStrategy::Linear).unwrap();
//!
//! // Insert values; duplicates are counted, not re-inserted.
//! table.insert(42);
//! table.insert(42);
//! table.insert(7);
//!
//! assert_eq!(table.total_inserts(), 2);
//! assert_eq!(table.duplicate_count(), 1);
//! assert!(table.average_probes() >= 1.0);
//!
//! // Every occupied slot can be inspected.
//! let entry = table.slot_at(42 % 11).unwrap();
//! assert_eq!(*entry.value(), 42);
//! assert_eq!(entry.frequency(), 1);
//! ```
//!
//! ## Sizing with twin primes
//!
//! ```rust
//! use probelab::{OpenAddressingTable, ProbeStrategy, TwinPrimeFinder};
//!
//! let mut finder = TwinPrimeFinder::new(5);
//! let size = finder.find_larger_twin_prime(3, 50).unwrap();
//!
//! let mut table =
//!     OpenAddressingTable::new(size as usize, ProbeStrategy::Double).unwrap();
//! table.insert(-13); // negative keys fold into the slot range
//! assert_eq!(table.total_inserts(), 1);
//! ```
//!
//! ## Running a simulation
//!
//! ```rust
//! use probelab::{fill_from, random_keys, OpenAddressingTable, ProbeStrategy, TableReport};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut table = OpenAddressingTable::new(53, ProbeStrategy::Double).unwrap();
//! fill_from(&mut table, random_keys(StdRng::seed_from_u64(7)), 26);
//!
//! let report = TableReport::from_table(&table);
//! assert_eq!(report.total_inserts, 26);
//! println!("{report}");
//! ```

/// Module wrapping stored values with their insertion statistics
mod entry;
/// Module searching for twin primes with a probabilistic test
mod primes;
/// Module with simulation glue: key sources, fill loops and reports
mod simulation;
/// Module implementing the open-addressing table itself
mod table;

pub use entry::{KeyHash, KeyedEntry, default_key_hash};
pub use primes::TwinPrimeFinder;
pub use simulation::{TableReport, dump, fill_from, random_keys, timestamp_keys, word_keys};
pub use table::{MIN_TABLE_SIZE, OpenAddressingTable, ProbeStrategy, SlotState, TableError};
