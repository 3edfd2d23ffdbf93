use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash::HashPair;
pub use crate::slot::SlotStatus;
use crate::slot::Slot;
use crate::store::SlotStore;

/// Outcome of walking a key's probe sequence for an insert.
enum Probe {
    /// The key is live at `index`, matched on the given 1-based attempt.
    Found { index: usize, attempt: usize },
    /// The key is absent. `index` is the first reusable slot on its
    /// sequence: the first tombstone passed, or else the terminating empty
    /// slot.
    Vacant {
        index: usize,
        attempt: usize,
        fresh: bool,
    },
    /// Every slot was visited without a match or a reusable slot.
    Exhausted,
}

/// Debug statistics for hash table analysis.
#[cfg(feature = "stats")]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of live entries
    pub populated: usize,
    /// Maximum live entries before the next insert grows the table
    pub capacity: usize,
    /// Total number of slots allocated
    pub total_slots: usize,
    /// Number of tombstone slots
    pub tombstones: usize,
    /// Number of never-used slots
    pub empty_slots: usize,
    /// Load factor (populated / total_slots)
    pub load_factor: f64,
    /// Longest probe sequence of a live entry
    pub max_psl: usize,
    /// Mean probe sequence length of live entries
    pub mean_psl: f64,
    /// Total memory in bytes used by the slot array
    pub total_bytes: usize,
    /// Bytes held by slots without a live entry
    pub wasted_bytes: usize,
}

#[cfg(feature = "stats")]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.total_slots,
            self.load_factor * 100.0
        );
        println!("Growth threshold: {} entries", self.capacity);
        println!(
            "Slots: {} empty, {} tombstones",
            self.empty_slots, self.tombstones
        );
        println!(
            "Probe length: max {}, mean {:.3}",
            self.max_psl, self.mean_psl
        );
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// An open-addressing hash table using double hashing.
///
/// `HashTable<K, V>` stores key/value pairs in a power-of-two array of
/// slots. Each key's probe sequence visits `(home + i * step) mod slots` for
/// `i = 0, 1, ...`, where `home` and the odd `step` come from the key's
/// [`HashPair`]. Removed entries leave tombstones so that sequences passing
/// through them stay intact.
///
/// Like a raw table, it does not hash keys itself: every operation takes the
/// key's hash pair and an equality predicate, and operations that may
/// rehash also take a function that recomputes the pair of a stored key.
/// [`HashMap`](crate::HashMap) and [`HashSet`](crate::HashSet) wrap it with a
/// [`ProbeHasher`](crate::ProbeHasher).
///
/// ## Sizing
///
/// - Grows by doubling when an insert finds the load at or above the max
///   load factor.
/// - Shrinks by halving when a removal leaves the load below the min load
///   factor, never going under the initial slot count.
/// - Rehashing drops every tombstone.
///
/// ## Example
///
/// ```rust
/// # use double_hash::hash::HashPair;
/// # use double_hash::hash_table::Entry;
/// # use double_hash::hash_table::HashTable;
/// #
/// # fn pair(key: &str) -> HashPair {
/// #     HashPair::of_bytes(key.as_bytes(), 0)
/// # }
/// #
/// let mut table: HashTable<String, u32> = HashTable::new();
///
/// match table.entry(pair("alice"), |k| k == "alice", |k| pair(k)) {
///     Entry::Vacant(entry) => {
///         entry.insert("alice".to_string(), 30);
///     }
///     Entry::Occupied(_) => {
///         println!("alice already exists");
///     }
/// }
///
/// assert_eq!(table.find(pair("alice"), |k| k == "alice"), Some((&"alice".to_string(), &30)));
/// ```
#[derive(Clone)]
pub struct HashTable<K, V> {
    store: SlotStore<K, V>,
    config: TableConfig,
    populated: usize,
    tombstones: usize,
    max_populated: usize,
}

impl<K, V> Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .store
                    .slots()
                    .chunks(16)
                    .map(|row| {
                        row.iter()
                            .map(|slot| match slot.status() {
                                SlotStatus::Empty => "..".to_string(),
                                SlotStatus::Tombstone => "xx".to_string(),
                                SlotStatus::Occupied(psl) => format!("{psl:02}"),
                            })
                            .collect::<Vec<String>>()
                            .join(", ")
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.max_populated)
            .finish()
    }
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashTable<K, V> {
    /// Creates an empty table with the default configuration: 16 slots, max
    /// load factor 0.7, min load factor 0.2.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::hash_table::HashTable;
    ///
    /// let table: HashTable<u64, u64> = HashTable::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.slot_count(), 16);
    /// ```
    pub fn new() -> Self {
        Self::with_config(TableConfig::new())
    }

    /// Creates an empty table with `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`TableConfig::validate`], and aborts like
    /// `alloc` collections if the initial slots cannot be allocated. Use
    /// [`try_with_config`](Self::try_with_config) to handle both.
    pub fn with_config(config: TableConfig) -> Self {
        Self::try_with_config(config).unwrap_or_else(|err| err.raise())
    }

    /// Creates an empty table with `config`, reporting invalid settings and
    /// allocation failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::TableConfig;
    /// use double_hash::TableError;
    /// use double_hash::hash_table::HashTable;
    ///
    /// let bad = TableConfig::new().with_max_load_factor(1.5);
    /// let err = HashTable::<u8, u8>::try_with_config(bad).unwrap_err();
    /// assert!(matches!(err, TableError::InvalidLoadFactor { name: "max", .. }));
    /// ```
    pub fn try_with_config(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;
        let slots = config.initial_slots();
        Ok(Self {
            store: SlotStore::try_with_slots(slots)?,
            config,
            populated: 0,
            tombstones: 0,
            max_populated: config.max_populated(slots),
        })
    }

    /// The configuration this table was built with.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns true if the table holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of entries the table can hold before an insert
    /// grows it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::hash_table::HashTable;
    ///
    /// let table: HashTable<u64, ()> = HashTable::new();
    /// // 16 slots at a 0.7 max load factor.
    /// assert_eq!(table.capacity(), 12);
    /// ```
    pub fn capacity(&self) -> usize {
        self.max_populated
    }

    /// Returns the number of slots in the backing array. Always a power of
    /// two.
    pub fn slot_count(&self) -> usize {
        self.store.len()
    }

    /// Returns the number of tombstone slots.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns `len / slot_count`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.store.len() as f64
    }

    /// Returns the status of every slot, in index order.
    pub fn slot_statuses(&self) -> impl ExactSizeIterator<Item = SlotStatus> + '_ {
        self.store.slots().iter().map(Slot::status)
    }

    /// Returns an iterator over the live entries in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use double_hash::hash::HashPair;
    /// # use double_hash::hash_table::HashTable;
    /// #
    /// # fn pair(key: u32) -> HashPair {
    /// #     HashPair::of_bytes(&key.to_le_bytes(), 0)
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// for k in 0..3u32 {
    ///     table.entry(pair(k), |v: &u32| *v == k, |v| pair(*v)).or_insert(k, k * 10);
    /// }
    ///
    /// let mut values: Vec<_> = table.iter().map(|(_, v)| *v).collect();
    /// values.sort();
    /// assert_eq!(values, [0, 10, 20]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.store.slots(),
            cursor: 0,
            yielded: 0,
            len: self.populated,
        }
    }

    /// Returns an iterator over the live entries with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            remaining: self.populated,
            slots: self.store.slots_mut().iter_mut(),
        }
    }

    /// Removes every entry, returning them as an iterator.
    ///
    /// The table is reset to its initial slot count when the iterator is
    /// dropped, including any entries not yet yielded.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            table: self,
            cursor: 0,
        }
    }

    /// Removes every entry and returns the table to its initial slot count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use double_hash::hash::HashPair;
    /// # use double_hash::hash_table::HashTable;
    /// #
    /// # fn pair(key: u32) -> HashPair {
    /// #     HashPair::of_bytes(&key.to_le_bytes(), 0)
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// for k in 0..100u32 {
    ///     table.entry(pair(k), |v: &u32| *v == k, |v| pair(*v)).or_insert(k, ());
    /// }
    /// assert!(table.slot_count() > 16);
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.slot_count(), 16);
    /// ```
    pub fn clear(&mut self) {
        let initial = self.config.initial_slots();
        if self.store.len() == initial {
            self.store.reset();
        } else {
            match SlotStore::try_with_slots(initial) {
                Ok(store) => self.store = store,
                Err(err) => {
                    log::debug!("keeping {} slots on clear: {}", self.store.len(), err);
                    self.store.reset();
                }
            }
        }

        self.populated = 0;
        self.tombstones = 0;
        self.max_populated = self.config.max_populated(self.store.len());
    }

    /// Finds the entry matching `eq` on the probe sequence of `hash`.
    ///
    /// The probe passes over tombstones and non-matching entries and stops
    /// at the first empty slot or after visiting every slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use double_hash::hash::HashPair;
    /// # use double_hash::hash_table::HashTable;
    /// #
    /// # fn pair(key: &str) -> HashPair {
    /// #     HashPair::of_bytes(key.as_bytes(), 0)
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// table
    ///     .entry(pair("k"), |k: &String| k == "k", |k| pair(k))
    ///     .or_insert("k".to_string(), 1);
    ///
    /// assert_eq!(table.find(pair("k"), |k| k == "k").map(|(_, v)| *v), Some(1));
    /// assert!(table.find(pair("missing"), |k| k == "missing").is_none());
    /// ```
    pub fn find(&self, hash: HashPair, eq: impl Fn(&K) -> bool) -> Option<(&K, &V)> {
        let index = self.find_index(hash, eq)?;
        self.store.slot(index).entry()
    }

    /// Like [`find`](Self::find), with a mutable value.
    pub fn find_mut(&mut self, hash: HashPair, eq: impl Fn(&K) -> bool) -> Option<(&K, &mut V)> {
        let index = self.find_index(hash, eq)?;
        self.store.slot_mut(index).entry_mut()
    }

    fn find_index(&self, hash: HashPair, eq: impl Fn(&K) -> bool) -> Option<usize> {
        let mask = self.store.mask();
        for attempt in 0..self.store.len() {
            let index = hash.probe(attempt, mask);
            match self.store.slot(index) {
                Slot::Empty => return None,
                Slot::Occupied { key, .. } if eq(key) => return Some(index),
                Slot::Occupied { .. } | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Walks the whole sequence up to an empty slot before settling on a
    /// vacancy, so a key living past a tombstone is still found.
    fn probe_for_insert(&self, hash: HashPair, eq: &impl Fn(&K) -> bool) -> Probe {
        let mask = self.store.mask();
        let mut first_tombstone = None;
        for attempt in 0..self.store.len() {
            let index = hash.probe(attempt, mask);
            match self.store.slot(index) {
                Slot::Empty => {
                    return match first_tombstone {
                        Some((index, attempt)) => Probe::Vacant {
                            index,
                            attempt,
                            fresh: false,
                        },
                        None => Probe::Vacant {
                            index,
                            attempt: attempt + 1,
                            fresh: true,
                        },
                    };
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some((index, attempt + 1));
                    }
                }
                Slot::Occupied { key, .. } if eq(key) => {
                    return Probe::Found {
                        index,
                        attempt: attempt + 1,
                    };
                }
                Slot::Occupied { .. } => {}
            }
        }

        match first_tombstone {
            Some((index, attempt)) => Probe::Vacant {
                index,
                attempt,
                fresh: false,
            },
            None => Probe::Exhausted,
        }
    }

    /// Gets the entry for a key, for in-place insertion or update.
    ///
    /// If the table is at its growth threshold it doubles before probing,
    /// whether or not the key is present, using `hasher` to re-place the
    /// stored keys.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow and aborts on allocation failure. Use
    /// [`try_entry`](Self::try_entry) to handle both.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use double_hash::hash::HashPair;
    /// # use double_hash::hash_table::Entry;
    /// # use double_hash::hash_table::HashTable;
    /// #
    /// # fn pair(key: &str) -> HashPair {
    /// #     HashPair::of_bytes(key.as_bytes(), 0)
    /// # }
    /// #
    /// let mut table: HashTable<String, u32> = HashTable::new();
    ///
    /// match table.entry(pair("key"), |k| k == "key", |k| pair(k)) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert("key".to_string(), 1);
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// match table.entry(pair("key"), |k| k == "key", |k| pair(k)) {
    ///     Entry::Occupied(mut entry) => {
    ///         *entry.get_mut() += 1;
    ///     }
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    ///
    /// assert_eq!(table.find(pair("key"), |k| k == "key").map(|(_, v)| *v), Some(2));
    /// ```
    pub fn entry(
        &mut self,
        hash: HashPair,
        eq: impl Fn(&K) -> bool,
        hasher: impl Fn(&K) -> HashPair,
    ) -> Entry<'_, K, V> {
        self.try_entry(hash, eq, hasher)
            .unwrap_or_else(|err| err.raise())
    }

    /// Fallible form of [`entry`](Self::entry).
    pub fn try_entry(
        &mut self,
        hash: HashPair,
        eq: impl Fn(&K) -> bool,
        hasher: impl Fn(&K) -> HashPair,
    ) -> Result<Entry<'_, K, V>, TableError> {
        if self.populated >= self.max_populated {
            self.try_rehash(self.grown_slots()?, &hasher)?;
        }

        loop {
            match self.probe_for_insert(hash, &eq) {
                Probe::Found { index, attempt } => {
                    self.store.slot_mut(index).set_psl(attempt);
                    return Ok(Entry::Occupied(OccupiedEntry { table: self, index }));
                }
                Probe::Vacant { fresh: true, .. }
                    if self.populated + self.tombstones >= self.max_populated =>
                {
                    log::debug!(
                        "purging {} tombstones from {} slots",
                        self.tombstones,
                        self.store.len()
                    );
                    self.try_rehash(self.store.len(), &hasher)?;
                }
                Probe::Vacant { index, attempt, .. } => {
                    return Ok(Entry::Vacant(VacantEntry {
                        table: self,
                        index,
                        psl: attempt,
                    }));
                }
                Probe::Exhausted => {
                    log::trace!(
                        "probe exhausted {} slots, growing",
                        self.store.len()
                    );
                    self.try_rehash(self.grown_slots()?, &hasher)?;
                }
            }
        }
    }

    /// Removes the entry matching `eq` and returns it.
    ///
    /// The slot becomes a tombstone. If the load then drops below the min
    /// load factor the table halves, using `hasher` to re-place the stored
    /// keys. A failed shrink is logged and leaves the table as is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use double_hash::hash::HashPair;
    /// # use double_hash::hash_table::HashTable;
    /// #
    /// # fn pair(key: &str) -> HashPair {
    /// #     HashPair::of_bytes(key.as_bytes(), 0)
    /// # }
    /// #
    /// let mut table = HashTable::new();
    /// table
    ///     .entry(pair("key"), |k: &String| k == "key", |k| pair(k))
    ///     .or_insert("key".to_string(), 7);
    ///
    /// let removed = table.remove(pair("key"), |k| k == "key", |k| pair(k));
    /// assert_eq!(removed, Some(("key".to_string(), 7)));
    /// assert!(table.is_empty());
    /// assert_eq!(table.tombstones(), 1);
    /// ```
    pub fn remove(
        &mut self,
        hash: HashPair,
        eq: impl Fn(&K) -> bool,
        hasher: impl Fn(&K) -> HashPair,
    ) -> Option<(K, V)> {
        let index = self.find_index(hash, eq)?;
        let entry = self.take_live(index);
        self.maybe_shrink(&hasher);
        Some(entry)
    }

    /// Keeps only the entries for which `keep` returns true, then shrinks if
    /// the load dropped below the min load factor.
    pub fn retain(
        &mut self,
        mut keep: impl FnMut(&K, &mut V) -> bool,
        hasher: impl Fn(&K) -> HashPair,
    ) {
        let mut removed = false;
        for slot in self.store.slots_mut() {
            if let Some((key, value)) = slot.entry_mut() {
                if !keep(key, value) {
                    slot.take();
                    self.populated -= 1;
                    self.tombstones += 1;
                    removed = true;
                }
            }
        }

        if removed {
            self.maybe_shrink(&hasher);
        }
    }

    /// Makes room for at least `additional` more entries without growing.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow and aborts on allocation failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use double_hash::hash::HashPair;
    /// # use double_hash::hash_table::HashTable;
    /// #
    /// # fn pair(key: &u64) -> HashPair {
    /// #     HashPair::of_bytes(&key.to_le_bytes(), 0)
    /// # }
    /// #
    /// let mut table: HashTable<u64, ()> = HashTable::new();
    /// table.reserve(100, pair);
    /// assert!(table.capacity() >= 100);
    /// ```
    pub fn reserve(&mut self, additional: usize, hasher: impl Fn(&K) -> HashPair) {
        self.try_reserve(additional, hasher)
            .unwrap_or_else(|err| err.raise())
    }

    /// Fallible form of [`reserve`](Self::reserve).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use double_hash::hash::HashPair;
    /// # use double_hash::hash_table::HashTable;
    /// use double_hash::TableError;
    ///
    /// # fn pair(key: &u64) -> HashPair {
    /// #     HashPair::of_bytes(&key.to_le_bytes(), 0)
    /// # }
    /// #
    /// let mut table: HashTable<u64, ()> = HashTable::new();
    /// assert_eq!(table.try_reserve(usize::MAX, pair), Err(TableError::CapacityOverflow));
    /// assert!(table.try_reserve(10, pair).is_ok());
    /// ```
    pub fn try_reserve(
        &mut self,
        additional: usize,
        hasher: impl Fn(&K) -> HashPair,
    ) -> Result<(), TableError> {
        let needed = self
            .populated
            .checked_add(additional)
            .ok_or(TableError::CapacityOverflow)?;
        if needed <= self.max_populated {
            return Ok(());
        }

        let slots = self.config.slots_for(needed)?;
        self.try_rehash(slots, &hasher)
    }

    /// Shrinks the slot array as far as the current entries allow (never
    /// under the initial slot count) and drops every tombstone.
    pub fn shrink_to_fit(&mut self, hasher: impl Fn(&K) -> HashPair) {
        let slots = match self.config.slots_for(self.populated) {
            Ok(slots) => slots,
            Err(_) => return,
        };

        if slots == self.store.len() && self.tombstones == 0 {
            return;
        }

        if let Err(err) = self.try_rehash(slots, &hasher) {
            log::debug!("keeping {} slots, shrink failed: {}", self.store.len(), err);
        }
    }

    fn grown_slots(&self) -> Result<usize, TableError> {
        self.store
            .len()
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow)
    }

    fn maybe_shrink(&mut self, hasher: &impl Fn(&K) -> HashPair) {
        let min = self.config.min_load_factor();
        let floor = self.config.initial_slots();

        let mut slots = self.store.len();
        while slots > floor && (self.populated as f64) < min * slots as f64 {
            slots /= 2;
        }

        if slots < self.store.len() {
            if let Err(err) = self.try_rehash(slots, hasher) {
                log::debug!("keeping {} slots, shrink failed: {}", self.store.len(), err);
            }
        }
    }

    /// Moves every live entry into a fresh array of `slots` slots.
    fn try_rehash(
        &mut self,
        slots: usize,
        hasher: &impl Fn(&K) -> HashPair,
    ) -> Result<(), TableError> {
        debug_assert!(slots >= self.populated);

        let store = SlotStore::try_with_slots(slots)?;
        let old = core::mem::replace(&mut self.store, store);
        log::debug!(
            "rehashing {} entries from {} to {} slots, dropping {} tombstones",
            self.populated,
            old.len(),
            slots,
            self.tombstones
        );

        self.tombstones = 0;
        self.max_populated = self.config.max_populated(slots);
        for slot in old.into_slots() {
            if let Some((key, value)) = slot.into_entry() {
                let hash = hasher(&key);
                self.place_unique(hash, key, value);
            }
        }

        Ok(())
    }

    /// Places an entry known to be absent into a table without tombstones.
    fn place_unique(&mut self, hash: HashPair, key: K, value: V) {
        let mask = self.store.mask();
        let mut attempt = 0;
        loop {
            let index = hash.probe(attempt, mask);
            attempt += 1;
            let slot = self.store.slot_mut(index);
            if slot.is_empty() {
                *slot = Slot::occupied(attempt, key, value);
                return;
            }
        }
    }

    fn take_live(&mut self, index: usize) -> (K, V) {
        let Some(entry) = self.store.slot_mut(index).take() else {
            unreachable!("slot {index} is not occupied");
        };
        self.populated -= 1;
        self.tombstones += 1;
        entry
    }

    /// Computes a histogram of probe sequence lengths.
    ///
    /// Index `i` counts the live entries placed on attempt `i + 1`. The
    /// vector is as long as the longest probe sequence.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for status in self.slot_statuses() {
            if let SlotStatus::Occupied(psl) = status {
                if hist.len() < psl {
                    hist.resize(psl, 0);
                }
                hist[psl - 1] += 1;
            }
        }
        hist
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> DebugStats {
        let hist = self.probe_histogram();
        let total_psl: usize = hist.iter().enumerate().map(|(i, n)| (i + 1) * n).sum();
        let total_slots = self.store.len();
        let empty_slots = total_slots - self.populated - self.tombstones;

        DebugStats {
            populated: self.populated,
            capacity: self.max_populated,
            total_slots,
            tombstones: self.tombstones,
            empty_slots,
            load_factor: self.load_factor(),
            max_psl: hist.len(),
            mean_psl: if self.populated == 0 {
                0.0
            } else {
                total_psl as f64 / self.populated as f64
            },
            total_bytes: self.store.size_in_bytes(),
            wasted_bytes: (total_slots - self.populated) * core::mem::size_of::<Slot<K, V>>(),
        }
    }

    /// Pretty-prints the probe-length histogram horizontally using stdout.
    #[cfg(all(feature = "stats", feature = "std"))]
    pub fn print_probe_histogram(&self) {
        let hist = self.probe_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.populated);

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let mut bar = "█".repeat(units / 8);
            let partial = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];
            if let Some(ch) = (units % 8).checked_sub(1).and_then(|i| partial.get(i)) {
                bar.push(*ch);
            }
            bar
        };

        for (i, &count) in hist.iter().enumerate() {
            println!("{:>3} | {} ({})", i + 1, make_bar(count), count);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut HashTable<K, V> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for HashTable<K, V> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            slots: self.store.into_slots(),
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
///
/// # Examples
///
/// ```rust
/// # use double_hash::hash::HashPair;
/// # use double_hash::hash_table::Entry;
/// # use double_hash::hash_table::HashTable;
/// #
/// # fn pair(key: &str) -> HashPair {
/// #     HashPair::of_bytes(key.as_bytes(), 0)
/// # }
/// #
/// let mut table: HashTable<String, i32> = HashTable::new();
///
/// match table.entry(pair("a"), |k| k == "a", |k| pair(k)) {
///     Entry::Vacant(entry) => {
///         entry.insert("a".to_string(), 1);
///     }
///     Entry::Occupied(entry) => {
///         println!("found {}", entry.get());
///     }
/// }
/// ```
pub enum Entry<'a, K, V> {
    /// A vacant entry - the key is not present in the table
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry - the key is present in the table
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts `key` and `default` if the entry is vacant, and returns a
    /// mutable reference to the value either way.
    ///
    /// If the entry is occupied, `key` is dropped and the stored key kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use double_hash::hash::HashPair;
    /// # use double_hash::hash_table::HashTable;
    /// #
    /// # fn pair(key: &str) -> HashPair {
    /// #     HashPair::of_bytes(key.as_bytes(), 0)
    /// # }
    /// #
    /// let mut table: HashTable<String, i32> = HashTable::new();
    ///
    /// let value = table
    ///     .entry(pair("key"), |k| k == "key", |k| pair(k))
    ///     .or_insert("key".to_string(), 1);
    /// assert_eq!(*value, 1);
    ///
    /// let existing = table
    ///     .entry(pair("key"), |k| k == "key", |k| pair(k))
    ///     .or_insert("key".to_string(), 2);
    /// assert_eq!(*existing, 1);
    /// ```
    pub fn or_insert(self, key: K, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(key, default),
        }
    }

    /// Like [`or_insert`](Self::or_insert), computing the key and value only
    /// when the entry is vacant.
    pub fn or_insert_with(self, default: impl FnOnce() -> (K, V)) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let (key, value) = default();
                entry.insert(key, value)
            }
        }
    }

    /// Modifies the value in place if the entry is occupied.
    ///
    /// Returns the modified value, or `None` if the entry was vacant.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Option<&'a mut V> {
        match self {
            Entry::Occupied(entry) => {
                let value = entry.into_mut();
                f(value);
                Some(value)
            }
            Entry::Vacant(_) => None,
        }
    }
}

/// A view into a vacant entry in a [`HashTable`].
///
/// The slot it refers to is either the first tombstone on the key's probe
/// sequence or the empty slot that ended it.
pub struct VacantEntry<'a, K, V> {
    table: &'a mut HashTable<K, V>,
    index: usize,
    psl: usize,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Inserts the entry and returns a mutable reference to the value.
    ///
    /// `key` must be the key this entry was looked up with.
    pub fn insert(self, key: K, value: V) -> &'a mut V {
        let table = self.table;
        let slot = table.store.slot_mut(self.index);
        if matches!(slot, Slot::Tombstone) {
            table.tombstones -= 1;
        }
        *slot = Slot::occupied(self.psl, key, value);
        table.populated += 1;
        slot.live_value_mut()
    }

    /// The 1-based probe attempt the entry will be placed on.
    pub fn probe_length(&self) -> usize {
        self.psl
    }
}

/// A view into an occupied entry in a [`HashTable`].
pub struct OccupiedEntry<'a, K, V> {
    table: &'a mut HashTable<K, V>,
    index: usize,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the stored key.
    pub fn key(&self) -> &K {
        self.table.store.slot(self.index).live_key()
    }

    /// Gets a reference to the value.
    pub fn get(&self) -> &V {
        self.table.store.slot(self.index).live_value()
    }

    /// Gets a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        self.table.store.slot_mut(self.index).live_value_mut()
    }

    /// Converts the entry into a mutable reference to the value with the
    /// table's lifetime.
    pub fn into_mut(self) -> &'a mut V {
        self.table.store.slot_mut(self.index).live_value_mut()
    }

    /// Replaces the value, returning the old one. The stored key is kept.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(self.get_mut(), value)
    }

    /// Swaps in `key`, which must equal the stored key, and returns the old
    /// one. The value and probe position are kept.
    pub fn replace_key(&mut self, key: K) -> K {
        self.table.store.slot_mut(self.index).replace_key(key)
    }

    /// Removes the entry, leaving a tombstone, and returns the key and value.
    ///
    /// Like [`HashTable::remove`], the table then halves if the load dropped
    /// below the min load factor, using `hasher` to re-place the stored keys.
    pub fn remove(self, hasher: impl Fn(&K) -> HashPair) -> (K, V) {
        let entry = self.table.take_live(self.index);
        self.table.maybe_shrink(&hasher);
        entry
    }
}

/// An iterator over the entries of a [`HashTable`], in slot order.
///
/// This struct is created by the [`iter`] method on [`HashTable`].
///
/// [`iter`]: HashTable::iter
pub struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    cursor: usize,
    yielded: usize,
    len: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            cursor: self.cursor,
            yielded: self.yielded,
            len: self.len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.yielded < self.len {
            let slot = self.slots.get(self.cursor)?;
            self.cursor += 1;
            if let Some(entry) = slot.entry() {
                self.yielded += 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.yielded;
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// A mutable iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`iter_mut`] method on [`HashTable`].
///
/// [`iter_mut`]: HashTable::iter_mut
pub struct IterMut<'a, K, V> {
    slots: core::slice::IterMut<'a, Slot<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Some(entry) = self.slots.next()?.entry_mut() {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a [`HashTable`].
pub struct IntoIter<K, V> {
    slots: alloc::vec::IntoIter<Slot<K, V>>,
    remaining: usize,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Some(entry) = self.slots.next()?.into_entry() {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// A draining iterator over the entries of a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`].
/// It yields owned entries and empties the table as it iterates.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, K, V> {
    table: &'a mut HashTable<K, V>,
    cursor: usize,
}

impl<K, V> Drop for Drain<'_, K, V> {
    fn drop(&mut self) {
        self.table.clear();
    }
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while self.table.populated > 0 && self.cursor < self.table.store.len() {
            let index = self.cursor;
            self.cursor += 1;
            if let Some(entry) = self.table.store.slot_mut(index).take() {
                self.table.populated -= 1;
                self.table.tombstones += 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.populated, Some(self.table.populated))
    }
}

impl<K, V> ExactSizeIterator for Drain<'_, K, V> {}

impl<K, V> FusedIterator for Drain<'_, K, V> {}
