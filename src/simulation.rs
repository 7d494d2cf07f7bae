//! Simulation driver: key sources, fill loops, summary reports and slot
//! dumps.
//!
//! The table itself never touches the outside world. Everything here is
//! the glue an experiment needs around it: streams of keys to feed in,
//! a loop that stops at a target load, and the reporting formats the
//! results come back out in.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::entry::KeyHash;
use crate::table::{OpenAddressingTable, ProbeStrategy};

/// Feeds `keys` into `table` until `target` distinct entries are placed
/// or the source runs dry. Returns how many keys were consumed.
///
/// Duplicate hits do not advance the distinct count, so a duplicate-heavy
/// source consumes many more keys than `target`.
pub fn fill_from<T, I>(table: &mut OpenAddressingTable<T>, keys: I, target: usize) -> usize
where
    T: KeyHash + Eq,
    I: IntoIterator<Item = T>,
{
    let mut consumed = 0_usize;
    for key in keys {
        if table.total_inserts() >= target {
            break;
        }
        table.insert(key);
        consumed = consumed.saturating_add(1);
    }
    consumed
}

/// Infinite stream of pseudo-random `i32` keys.
pub fn random_keys<R: Rng>(rng: R) -> impl Iterator<Item = i32> {
    let mut rng = rng;
    std::iter::repeat_with(move || rng.random())
}

/// Infinite stream of epoch-millisecond timestamps.
///
/// Consecutive draws land in the same millisecond most of the time, so
/// this source is duplicate-heavy on purpose.
pub fn timestamp_keys() -> impl Iterator<Item = i64> {
    std::iter::repeat_with(|| match SystemTime::now().duration_since(UNIX_EPOCH) {
        #[allow(clippy::cast_possible_truncation)]
        // Epoch milliseconds stay far below i64::MAX.
        Ok(elapsed) => elapsed.as_millis() as i64,
        Err(_) => 0,
    })
}

/// Keys read from a word list, one per line. A read error ends the
/// stream.
pub fn word_keys<R: BufRead>(reader: R) -> impl Iterator<Item = String> {
    reader.lines().map_while(Result::ok)
}

/// Summary statistics of one simulation run.
#[derive(Debug, Clone)]
pub struct TableReport {
    /// Strategy the table ran with.
    pub strategy: ProbeStrategy,
    /// Slot count of the table.
    pub table_size: usize,
    /// Distinct entries placed.
    pub total_inserts: usize,
    /// Insert calls that matched an existing entry.
    pub duplicate_count: usize,
    /// Every insert call seen: distinct entries plus duplicates.
    pub total_elements: usize,
    /// Mean probes per distinct insertion.
    pub average_probes: f64,
    /// Placed entries over capacity.
    pub load_factor: f64,
}

impl TableReport {
    /// Captures the statistics of `table`.
    #[must_use]
    pub fn from_table<T>(table: &OpenAddressingTable<T>) -> Self {
        Self {
            strategy: table.strategy(),
            table_size: table.table_size(),
            total_inserts: table.total_inserts(),
            duplicate_count: table.duplicate_count(),
            total_elements: table.total_inserts().saturating_add(table.duplicate_count()),
            average_probes: table.average_probes(),
            load_factor: table.load_factor(),
        }
    }
}

impl fmt::Display for TableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Using {} Hashing...", self.strategy)?;
        writeln!(
            f,
            "Input {} elements, of which {} are duplicates",
            self.total_elements, self.duplicate_count
        )?;
        write!(
            f,
            "Load Factor = {:.2}, Avg. no. of probes {:.6}",
            self.load_factor, self.average_probes
        )
    }
}

/// Writes one line per occupied slot: `table[i]: value frequency probes`.
///
/// # Errors
///
/// Propagates any error from the writer.
pub fn dump<T, W>(table: &OpenAddressingTable<T>, writer: &mut W) -> io::Result<()>
where
    T: fmt::Display,
    W: Write,
{
    for (index, entry) in table.occupied() {
        writeln!(writer, "table[{index}]: {entry}")?;
    }
    Ok(())
}
