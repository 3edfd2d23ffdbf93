use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash::HashPair;
use crate::hash_builder::KeyFns;
use crate::hash_builder::ProbeHasher;
use crate::hash_builder::Xxh64State;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
pub use crate::hash_table::Drain;
pub use crate::hash_table::IntoIter;
pub use crate::hash_table::Iter;
pub use crate::hash_table::IterMut;

#[inline]
pub(crate) fn hash_key<Q: ?Sized, S: ProbeHasher<Q>>(
    hash_builder: &S,
    key: &Q,
    seed: u64,
) -> HashPair {
    hash_builder.hash_pair(key, seed)
}

#[inline]
pub(crate) fn make_hasher<K, S: ProbeHasher<K>>(
    hash_builder: &S,
    seed: u64,
) -> impl Fn(&K) -> HashPair + '_ {
    move |key| hash_builder.hash_pair(key, seed)
}

#[inline]
pub(crate) fn equivalent_key<'a, K, Q, S>(
    hash_builder: &'a S,
    key: &'a Q,
) -> impl Fn(&K) -> bool + 'a
where
    K: Borrow<Q>,
    Q: ?Sized,
    S: ProbeHasher<Q>,
{
    move |k| hash_builder.keys_equal(k.borrow(), key)
}

/// A hash map using open addressing with double hashing.
///
/// `HashMap<K, V, S>` stores key-value pairs in a [`HashTable`] and resolves
/// hashing and equality through a [`ProbeHasher`] `S`. The default,
/// [`Xxh64State`], runs the key's [`Hash`] output through seeded XXH64 and
/// compares keys with [`Eq`]. [`KeyFns`] lets the caller hash and compare
/// keys by a subset of their fields instead.
///
/// Removing a key returns its value, so a get-then-remove ("pop") is a
/// single call to [`remove`](Self::remove).
///
/// # Examples
///
/// ```rust
/// use double_hash::HashMap;
///
/// let mut squares = HashMap::new();
/// for k in 0..1000u64 {
///     squares.insert(k, k * k);
/// }
///
/// assert_eq!(squares.len(), 1000);
/// assert_eq!(squares.get(&12), Some(&144));
/// assert_eq!(squares.remove(&12), Some(144));
/// assert_eq!(squares.get(&12), None);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = Xxh64State> {
    table: HashTable<K, V>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> HashMap<K, V, Xxh64State> {
    /// Creates an empty map with the default configuration and hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(Xxh64State)
    }

    /// Creates an empty map with `config` and the default hasher.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`TableConfig::validate`].
    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, Xxh64State)
    }

    /// Fallible form of [`with_config`](Self::with_config).
    pub fn try_with_config(config: TableConfig) -> Result<Self, TableError> {
        Self::try_with_config_and_hasher(config, Xxh64State)
    }

    /// Creates a map holding every key of `keys`, each mapped to a clone of
    /// `value`. Later duplicates overwrite earlier ones.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let map = HashMap::from_keys(["a", "b", "c"], 0);
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.get("b"), Some(&0));
    /// ```
    pub fn from_keys<I>(keys: I, value: V) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Hash + Eq,
        V: Clone,
    {
        let mut map = Self::new();
        map.extend(keys.into_iter().map(|key| (key, value.clone())));
        map
    }
}

impl<K, V, F, E> HashMap<K, V, KeyFns<F, E>>
where
    F: Fn(&K, &dyn Fn(&[u8]) -> u64) -> u64,
    E: Fn(&K, &K) -> bool,
{
    /// Creates an empty map that hashes and compares keys with the given
    /// functions. See [`KeyFns`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// #[derive(Debug)]
    /// struct Node {
    ///     x: i32,
    ///     y: i32,
    /// }
    ///
    /// let mut map = HashMap::with_key_fns(
    ///     |node: &Node, inner: &dyn Fn(&[u8]) -> u64| inner(&node.x.to_le_bytes()),
    ///     |a: &Node, b: &Node| a.x == b.x,
    /// );
    /// map.insert(Node { x: 1, y: 2 }, 10);
    /// map.insert(Node { x: 1, y: 3 }, 20);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&Node { x: 1, y: 0 }), Some(&20));
    /// ```
    pub fn with_key_fns(hash: F, eq: E) -> Self {
        Self::with_hasher(KeyFns::new(hash, eq))
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Creates an empty map with the given hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::BuildHasherState;
    /// use double_hash::HashMap;
    /// use std::hash::RandomState;
    ///
    /// let mut map = HashMap::with_hasher(BuildHasherState::new(RandomState::new()));
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(TableConfig::new(), hash_builder)
    }

    /// Creates an empty map with `config` and the given hasher.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`TableConfig::validate`].
    pub fn with_config_and_hasher(config: TableConfig, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_config(config),
            hash_builder,
        }
    }

    /// Fallible form of [`with_config_and_hasher`](Self::with_config_and_hasher).
    pub fn try_with_config_and_hasher(
        config: TableConfig,
        hash_builder: S,
    ) -> Result<Self, TableError> {
        Ok(Self {
            table: HashTable::try_with_config(config)?,
            hash_builder,
        })
    }

    /// Returns a reference to the map's hasher.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the map's configuration.
    pub fn config(&self) -> &TableConfig {
        self.table.config()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.len(), 0);
    /// map.insert(1, "a");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the map can hold before growing.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the number of slots in the backing array.
    pub fn slot_count(&self) -> usize {
        self.table.slot_count()
    }

    /// Returns `len / slot_count`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Removes all elements and returns the map to its initial slot count.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs, in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let mut pairs: Vec<_> = map.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(&"a", &1), (&"b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.table.iter()
    }

    /// Returns an iterator over the key-value pairs with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.table.iter_mut()
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let total: i32 = map.values().sum();
    /// assert_eq!(total, 3);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Clears the map, returning all key-value pairs as an iterator.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        self.table.drain()
    }

    /// Computes a histogram of probe sequence lengths. See
    /// [`HashTable::probe_histogram`].
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.probe_histogram()
    }

    /// Returns utilization statistics. See [`HashTable::debug_stats`].
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    #[inline]
    fn seed(&self) -> u64 {
        self.table.config().seed()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    S: ProbeHasher<K>,
{
    /// Inserts a key-value pair.
    ///
    /// If the key was present, its value is replaced and the old value
    /// returned; the stored key is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), None);
    /// assert_eq!(map.insert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.try_insert(key, value)
            .unwrap_or_else(|err| err.raise())
    }

    /// Fallible form of [`insert`](Self::insert): reports capacity overflow
    /// and allocation failure instead of aborting. On error the map is
    /// unchanged and the key and value are dropped.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let seed = self.seed();
        let hash = self.hash_builder.hash_pair(&key, seed);
        let hash_builder = &self.hash_builder;
        match self.table.try_entry(
            hash,
            |k| hash_builder.keys_equal(k, &key),
            make_hasher::<K, _>(hash_builder, seed),
        )? {
            TableEntry::Occupied(mut entry) => Ok(Some(entry.insert(value))),
            TableEntry::Vacant(entry) => {
                entry.insert(key, value);
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value for `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("apple".to_string(), 3);
    /// assert_eq!(map.get("apple"), Some(&3));
    /// assert_eq!(map.get("pear"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and the value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        let hash = hash_key(&self.hash_builder, key, self.seed());
        self.table
            .find(hash, equivalent_key::<K, _, _>(&self.hash_builder, key))
    }

    /// Returns a mutable reference to the value for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        let hash = hash_key(&self.hash_builder, key, self.seed());
        self.table
            .find_mut(hash, equivalent_key::<K, _, _>(&self.hash_builder, key))
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        self.get_key_value(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// The map may shrink if the removal leaves its load below the min load
    /// factor.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` and returns the stored key and its value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        let seed = self.seed();
        let hash = hash_key(&self.hash_builder, key, seed);
        self.table.remove(
            hash,
            equivalent_key::<K, _, _>(&self.hash_builder, key),
            make_hasher::<K, _>(&self.hash_builder, seed),
        )
    }

    /// Gets the entry for `key` for in-place manipulation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(counts.get("a"), Some(&2));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let seed = self.seed();
        let hash = self.hash_builder.hash_pair(&key, seed);
        let hash_builder = &self.hash_builder;
        match self.table.entry(
            hash,
            |k| hash_builder.keys_equal(k, &key),
            make_hasher::<K, _>(hash_builder, seed),
        ) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry {
                entry,
                hash_builder,
                seed,
            }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Retains only the entries for which `f` returns `true`.
    pub fn retain(&mut self, f: impl FnMut(&K, &mut V) -> bool) {
        let seed = self.seed();
        self.table
            .retain(f, make_hasher::<K, _>(&self.hash_builder, seed));
    }

    /// Reserves room for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow and aborts on allocation failure.
    pub fn reserve(&mut self, additional: usize) {
        self.try_reserve(additional)
            .unwrap_or_else(|err| err.raise())
    }

    /// Fallible form of [`reserve`](Self::reserve).
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TableError> {
        let seed = self.seed();
        self.table
            .try_reserve(additional, make_hasher::<K, _>(&self.hash_builder, seed))
    }

    /// Shrinks the map as far as its entries allow and drops tombstones.
    pub fn shrink_to_fit(&mut self) {
        let seed = self.seed();
        self.table
            .shrink_to_fit(make_hasher::<K, _>(&self.hash_builder, seed));
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    V: PartialEq,
    S: ProbeHasher<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get_key_value(k).is_some_and(|(_, ov)| v == ov))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    V: Eq,
    S: ProbeHasher<K>,
{
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, Q, V, S> core::ops::Index<&Q> for HashMap<K, V, S>
where
    K: Borrow<Q>,
    Q: ?Sized,
    S: ProbeHasher<K> + ProbeHasher<Q>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not found in HashMap"),
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    S: ProbeHasher<K> + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    S: ProbeHasher<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut HashMap<K, V, S> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, K, V>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        self.entry.insert(self.key, value)
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, K, V>,
    hash_builder: &'a dyn ProbeHasher<K>,
    seed: u64,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        self.entry.key()
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.entry.get()
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.entry.get_mut()
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        self.entry.into_mut()
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        self.entry.insert(value)
    }

    /// Removes the entry from the map and returns the value.
    ///
    /// Shrinks the map like [`HashMap::remove`].
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        let OccupiedEntry {
            entry,
            hash_builder,
            seed,
        } = self;
        entry.remove(|k| hash_builder.hash_pair(k, seed))
    }
}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::hash_builder::BuildHasherState;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type SipMap<K, V> = HashMap<K, V, BuildHasherState<SipHashBuilder>>;

    #[derive(Debug, Clone, Copy)]
    struct Node {
        x: i32,
        y: i32,
    }

    fn node_map<V>() -> HashMap<Node, V, impl ProbeHasher<Node>> {
        HashMap::with_key_fns(
            |node: &Node, inner: &dyn Fn(&[u8]) -> u64| inner(&node.x.to_le_bytes()),
            |a: &Node, b: &Node| a.x == b.x,
        )
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.slot_count(), 16);

        let map: SipMap<i32, String> = HashMap::with_hasher(BuildHasherState::default());
        assert!(map.is_empty());
    }

    #[test]
    fn test_with_config() {
        let map: HashMap<i32, i32> =
            HashMap::with_config(TableConfig::new().with_initial_capacity(100));
        assert_eq!(map.slot_count(), 128);
        let bad = TableConfig::new().with_max_load_factor(2.0);
        assert!(HashMap::<i32, i32>::try_with_config(bad).is_err());
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = HashMap::new();
        assert_eq!(map.insert(1, "one"), None);
        assert_eq!(map.insert(2, "two"), None);
        assert_eq!(map.insert(1, "uno"), Some("one"));

        assert_eq!(map.get(&1), Some(&"uno"));
        assert_eq!(map.get(&2), Some(&"two"));
        assert_eq!(map.get(&3), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_squares() {
        let mut map = HashMap::new();
        for k in 0..1000u64 {
            map.insert(k, k * k);
        }
        assert_eq!(map.len(), 1000);
        for k in 0..1000u64 {
            assert_eq!(map.get(&k), Some(&(k * k)));
        }
        assert!(map.load_factor() < 0.7);
        assert!(map.slot_count().is_power_of_two());
    }

    #[test]
    fn test_get_mut() {
        let mut map = HashMap::new();
        map.insert(1, 10);
        if let Some(v) = map.get_mut(&1) {
            *v += 5;
        }
        assert_eq!(map[&1], 15);
        assert!(map.get_mut(&2).is_none());
    }

    #[test]
    fn test_contains_key() {
        let mut map = HashMap::new();
        map.insert("apple".to_string(), 1);
        assert!(map.contains_key("apple"));
        assert!(!map.contains_key("banana"));
    }

    #[test]
    fn test_remove() {
        let mut map = HashMap::new();
        map.insert(1, "one");
        map.insert(2, "two");

        assert_eq!(map.remove(&1), Some("one"));
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));
    }

    #[test]
    fn test_remove_entry() {
        let mut map = HashMap::new();
        map.insert("k".to_string(), 1);
        assert_eq!(map.remove_entry("k"), Some(("k".to_string(), 1)));
        assert!(map.is_empty());
    }

    #[test]
    fn test_pop_scenario() {
        let mut map: HashMap<String, i32> = HashMap::from_keys(
            ["alpha", "beta", "gamma"].map(String::from),
            0,
        );
        *map.get_mut("beta").unwrap() = 42;

        let popped = map.remove("beta");
        assert_eq!(popped, Some(42));
        assert_eq!(map.len(), 2);
        assert_eq!(map.remove("beta"), None);
    }

    #[test]
    fn test_remove_shrinks() {
        let mut map = HashMap::new();
        for k in 0..1000 {
            map.insert(k, k);
        }
        let grown = map.slot_count();
        for k in 0..990 {
            map.remove(&k);
        }
        assert!(map.slot_count() < grown);
        assert_eq!(map.slot_count(), 32);
        for k in 990..1000 {
            assert_eq!(map.get(&k), Some(&k));
        }
    }

    #[test]
    fn test_entry_remove_shrinks() {
        let mut map = HashMap::new();
        for k in 0..1000 {
            map.insert(k, k);
        }
        for k in 0..990 {
            match map.entry(k) {
                Entry::Occupied(entry) => assert_eq!(entry.remove(), k),
                Entry::Vacant(_) => panic!("{k} missing"),
            }
        }
        assert_eq!(map.len(), 10);
        assert_eq!(map.slot_count(), 32);
        for k in 990..1000 {
            assert_eq!(map.get(&k), Some(&k));
        }
    }

    #[test]
    fn test_update_at_threshold_grows() {
        let mut map = HashMap::new();
        for k in 0..12 {
            map.insert(k, k);
        }
        assert_eq!(map.slot_count(), 16);

        assert_eq!(map.insert(3, 99), Some(3));
        assert_eq!(map.slot_count(), 32);
        assert_eq!(map.len(), 12);
        assert_eq!(map[&3], 99);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_retain_panic_keeps_len() {
        let mut map: HashMap<i32, i32> = (0..10).map(|k| (k, k)).collect();
        let mut calls = 0;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            map.retain(|_, _| {
                calls += 1;
                if calls == 5 {
                    panic!("stop");
                }
                false
            });
        }));
        assert!(result.is_err());
        assert_eq!(map.len(), 6);
        assert_eq!(map.iter().count(), 6);
        assert_eq!(map.keys().len(), 6);
    }

    #[test]
    fn test_clear() {
        let mut map = HashMap::new();
        for i in 0..100 {
            map.insert(i, i);
        }
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.slot_count(), 16);
        map.insert(1, 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_reserve() {
        let mut map: HashMap<i32, i32> = HashMap::new();
        map.reserve(100);
        assert!(map.capacity() >= 100);
        assert_eq!(
            map.try_reserve(usize::MAX),
            Err(TableError::CapacityOverflow)
        );
    }

    #[test]
    fn test_entry_api() {
        let mut map = HashMap::new();

        *map.entry("a").or_insert(0) += 1;
        *map.entry("a").or_insert(0) += 1;
        *map.entry("b").or_insert_with(|| 10) += 1;

        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.get("b"), Some(&11));

        map.entry("a").and_modify(|v| *v *= 10).or_insert(0);
        assert_eq!(map.get("a"), Some(&20));
        assert_eq!(map.entry("z").key(), &"z");
    }

    #[test]
    fn test_entry_or_default() {
        let mut map: HashMap<&str, Vec<i32>> = HashMap::new();
        map.entry("list").or_default().push(1);
        map.entry("list").or_default().push(2);
        assert_eq!(map.get("list"), Some(&alloc::vec![1, 2]));
    }

    #[test]
    fn test_occupied_entry() {
        let mut map = HashMap::new();
        map.insert(1, "a");

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), &"a");
                assert_eq!(entry.insert("b"), "a");
                assert_eq!(entry.remove_entry(), (1, "b"));
            }
            Entry::Vacant(_) => panic!("expected occupied"),
        }
        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry() {
        let mut map: HashMap<i32, &str> = HashMap::new();
        match map.entry(5) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &5);
                *entry.insert("five") = "FIVE";
            }
            Entry::Occupied(_) => panic!("expected vacant"),
        }
        assert_eq!(map.get(&5), Some(&"FIVE"));
    }

    #[test]
    fn test_iterators() {
        let mut map = HashMap::new();
        for i in 0..10 {
            map.insert(i, i * 10);
        }

        let mut keys: Vec<i32> = map.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());

        let mut values: Vec<i32> = map.values().copied().collect();
        values.sort();
        assert_eq!(values, (0..10).map(|i| i * 10).collect::<Vec<_>>());

        for v in map.values_mut() {
            *v += 1;
        }
        for (k, v) in &mut map {
            *v += *k;
        }
        assert!(map.iter().all(|(k, v)| *v == k * 11 + 1));
        assert_eq!(map.iter().len(), 10);
        assert_eq!(map.keys().len(), 10);
    }

    #[test]
    fn test_drain() {
        let mut map = HashMap::new();
        for i in 0..10 {
            map.insert(i, i.to_string());
        }
        let mut drained: Vec<(i32, String)> = map.drain().collect();
        drained.sort();
        assert_eq!(drained.len(), 10);
        assert_eq!(drained[3], (3, "3".to_string()));
        assert!(map.is_empty());
    }

    #[test]
    fn test_into_iter() {
        let map: HashMap<i32, i32> = (0..20).map(|i| (i, -i)).collect();
        let mut pairs: Vec<(i32, i32)> = map.into_iter().collect();
        pairs.sort();
        assert_eq!(pairs.len(), 20);
        assert_eq!(pairs[19], (19, -19));
    }

    #[test]
    fn test_retain() {
        let mut map: HashMap<i32, i32> = (0..100).map(|i| (i, i)).collect();
        map.retain(|k, _| k % 10 == 0);
        assert_eq!(map.len(), 10);
        assert!(map.contains_key(&90));
        assert!(!map.contains_key(&91));
    }

    #[test]
    fn test_custom_key_fns() {
        let mut map = node_map();
        map.insert(Node { x: 1, y: 1 }, "first");
        map.insert(Node { x: 2, y: 1 }, "second");
        assert_eq!(map.insert(Node { x: 1, y: 99 }, "replaced"), Some("first"));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Node { x: 1, y: -5 }), Some(&"replaced"));
        // The stored key is the one first inserted.
        let (stored, _) = map.get_key_value(&Node { x: 1, y: 0 }).unwrap();
        assert_eq!(stored.y, 1);

        assert_eq!(map.remove(&Node { x: 2, y: 0 }), Some("second"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_custom_key_fns_survive_growth() {
        let mut map = node_map();
        for x in 0..500 {
            map.insert(Node { x, y: -x }, x);
        }
        for x in 0..500 {
            assert_eq!(map.get(&Node { x, y: 0 }), Some(&x));
        }
    }

    #[test]
    fn test_nested_maps() {
        let mut outer: HashMap<String, HashMap<String, i32>> = HashMap::new();
        for name in ["left", "right"] {
            let mut inner = HashMap::new();
            for i in 0..50 {
                inner.insert(alloc::format!("{name}-{i}"), i);
            }
            outer.insert(name.to_string(), inner);
        }

        for i in 0..50 {
            let key = alloc::format!("right-{i}");
            assert_eq!(outer["right"].get(key.as_str()), Some(&i));
        }

        let removed = outer.remove("left").unwrap();
        assert_eq!(removed.len(), 50);
        assert_eq!(outer.len(), 1);
    }

    #[test]
    fn test_from_keys() {
        let map = HashMap::from_keys(0..10, "x");
        assert_eq!(map.len(), 10);
        assert!(map.values().all(|v| *v == "x"));
    }

    #[test]
    fn test_seed_does_not_change_contents() {
        let mut a: HashMap<i32, i32> = HashMap::with_config(TableConfig::new().with_seed(1));
        let mut b: HashMap<i32, i32> = HashMap::with_config(TableConfig::new().with_seed(2));
        for i in 0..100 {
            a.insert(i, i);
            b.insert(i, i);
        }
        assert_eq!(a, b);
        assert_eq!(a.config().seed(), 1);
    }

    #[test]
    fn test_string_keys() {
        let mut map = SipMap::default();
        map.insert("hello".to_string(), 1);
        map.insert("world".to_string(), 2);
        assert_eq!(map.get("hello"), Some(&1));
        assert_eq!(map.get("world"), Some(&2));
        assert_eq!(map.get("nope"), None);
    }

    #[test]
    fn test_debug_and_clone() {
        let mut map = HashMap::new();
        map.insert(1, "a");
        let cloned = map.clone();
        map.insert(2, "b");
        assert_eq!(alloc::format!("{:?}", cloned), "{1: \"a\"}");
        assert_ne!(map, cloned);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_index_missing_panics() {
        let map: HashMap<i32, i32> = HashMap::new();
        let _ = map[&1];
    }
}
