//! Table tuning knobs.

use crate::error::TableError;
use crate::hash::DEFAULT_SEED;

/// Slot count a table starts with unless configured otherwise.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
/// Load at which an insert first doubles the table.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;
/// Load below which a removal halves the table.
pub const DEFAULT_MIN_LOAD_FACTOR: f64 = 0.2;

const LARGEST_POWER_OF_TWO: usize = 1 << (usize::BITS - 1);

/// Construction-time parameters of a table.
///
/// A table grows by doubling when an insert finds `len / slots` at or above
/// the max load factor, and shrinks by halving after a removal leaves
/// `len / slots` below the min load factor. It never shrinks below its
/// initial slot count. A min load factor of `0.0` disables shrinking.
///
/// The seed feeds both probe hashes of every key, including keys hashed
/// through a [`KeyFns`](crate::KeyFns) hook.
///
/// # Examples
///
/// ```
/// use double_hash::{HashMap, TableConfig};
///
/// let config = TableConfig::new()
///     .with_initial_capacity(64)
///     .with_max_load_factor(0.5)
///     .with_min_load_factor(0.0)
///     .with_seed(99);
/// assert!(config.validate().is_ok());
///
/// let mut map = HashMap::with_config(config);
/// map.insert("a", 1);
/// assert_eq!(map.slot_count(), 64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    initial_capacity: usize,
    max_load_factor: f64,
    min_load_factor: f64,
    seed: u64,
}

impl TableConfig {
    /// The default configuration.
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            min_load_factor: DEFAULT_MIN_LOAD_FACTOR,
            seed: DEFAULT_SEED,
        }
    }

    /// Sets the initial slot count. Rounded up to a power of two, minimum 1.
    pub const fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the load factor that triggers growth. Must be in `(0, 1)`.
    pub const fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Sets the load factor that triggers shrinking. Must be in
    /// `[0, max / 2)`.
    pub const fn with_min_load_factor(mut self, min_load_factor: f64) -> Self {
        self.min_load_factor = min_load_factor;
        self
    }

    /// Sets the hash seed.
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Draws a per-table seed from the standard library's randomly keyed
    /// hasher.
    #[cfg(feature = "std")]
    pub fn with_random_seed(self) -> Self {
        use core::hash::BuildHasher;
        use core::hash::Hasher;

        let seed = std::hash::RandomState::new().build_hasher().finish();
        self.with_seed(seed)
    }

    /// The configured initial capacity, as given.
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// The growth threshold.
    pub const fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// The shrink threshold.
    pub const fn min_load_factor(&self) -> f64 {
        self.min_load_factor
    }

    /// The hash seed.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The slot count a fresh or cleared table uses.
    pub fn initial_slots(&self) -> usize {
        self.initial_capacity
            .max(1)
            .checked_next_power_of_two()
            .unwrap_or(LARGEST_POWER_OF_TWO)
    }

    /// Checks that both load factors are usable: the max in `(0, 1)`, the
    /// min in `[0, max / 2)`.
    pub fn validate(&self) -> Result<(), TableError> {
        let max = self.max_load_factor;
        if !(max > 0.0 && max < 1.0) {
            return Err(TableError::invalid_load_factor("max", max));
        }

        let min = self.min_load_factor;
        if !(min >= 0.0 && min < max / 2.0) {
            return Err(TableError::invalid_load_factor("min", min));
        }

        Ok(())
    }

    /// Number of live entries `slots` can hold before an insert grows it.
    pub(crate) fn max_populated(&self, slots: usize) -> usize {
        let exact = self.max_load_factor * slots as f64;
        let whole = exact as usize;
        if (whole as f64) < exact {
            whole + 1
        } else {
            whole
        }
    }

    /// Smallest power-of-two slot count, no smaller than the initial one,
    /// that takes `entries` inserts without growing.
    pub(crate) fn slots_for(&self, entries: usize) -> Result<usize, TableError> {
        let mut slots = self.initial_slots();
        while self.max_populated(slots) < entries {
            slots = slots.checked_mul(2).ok_or(TableError::CapacityOverflow)?;
        }
        Ok(slots)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}
