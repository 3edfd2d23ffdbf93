use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::Hash;
use core::iter::FusedIterator;

use crate::config::TableConfig;
use crate::error::TableError;
use crate::hash_builder::KeyFns;
use crate::hash_builder::ProbeHasher;
use crate::hash_builder::Xxh64State;
use crate::hash_map::equivalent_key;
use crate::hash_map::hash_key;
use crate::hash_map::make_hasher;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash set built on the double-hashing [`HashTable`] with unit values.
///
/// `HashSet<T, S>` resolves hashing and equality through a [`ProbeHasher`]
/// `S`, by default [`Xxh64State`]. The set-algebra operations
/// ([`union`](Self::union), [`intersection`](Self::intersection),
/// [`difference`](Self::difference) and
/// [`symmetric_difference`](Self::symmetric_difference)) build a fresh set
/// that shares the left operand's configuration and hasher.
///
/// # Examples
///
/// ```rust
/// use double_hash::HashSet;
///
/// let a: HashSet<i32> = [1, 2, 3].into_iter().collect();
/// let b: HashSet<i32> = [2, 3, 4].into_iter().collect();
///
/// let both = a.intersection(&b);
/// assert_eq!(both.len(), 2);
/// assert!(both.contains(&2) && both.contains(&3));
///
/// let only_a = a.difference(&b);
/// assert_eq!(only_a.iter().copied().collect::<Vec<_>>(), [1]);
/// assert!(!a.is_disjoint(&b));
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = Xxh64State> {
    table: HashTable<T, ()>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    S: ProbeHasher<T>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S> where S: ProbeHasher<T> {}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> HashSet<T, Xxh64State> {
    /// Creates an empty set with the default configuration and hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(Xxh64State)
    }

    /// Creates an empty set with `config` and the default hasher.
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
}

impl<T, F, E> HashSet<T, KeyFns<F, E>>
where
    F: Fn(&T, &dyn Fn(&[u8]) -> u64) -> u64,
    E: Fn(&T, &T) -> bool,
{
    /// Creates an empty set that hashes and compares elements with the given
    /// functions. See [`KeyFns`].
    pub fn with_key_fns(hash: F, eq: E) -> Self {
        Self::with_hasher(KeyFns::new(hash, eq))
    }
}

impl<T, S> HashSet<T, S> {
    /// Creates an empty set with the given hasher.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_config_and_hasher(TableConfig::new(), hash_builder)
    }

    /// Creates an empty set with `config` and the given hasher.
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

    /// Returns a reference to the set's hasher.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the set's configuration.
    pub fn config(&self) -> &TableConfig {
        self.table.config()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements the set can hold before growing.
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

    /// Removes all elements and returns the set to its initial slot count.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the elements, in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let set: HashSet<i32> = (1..=3).collect();
    /// let mut items: Vec<_> = set.iter().copied().collect();
    /// items.sort();
    /// assert_eq!(items, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Clears the set, returning all elements as an iterator.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
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

    fn seed(&self) -> u64 {
        self.table.config().seed()
    }
}

impl<T, S> HashSet<T, S>
where
    S: ProbeHasher<T>,
{
    /// Adds a value to the set.
    ///
    /// Returns `false` if an equal value was already present; the stored
    /// value is left untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.try_insert(value).unwrap_or_else(|err| err.raise())
    }

    /// Fallible form of [`insert`](Self::insert).
    pub fn try_insert(&mut self, value: T) -> Result<bool, TableError> {
        let seed = self.seed();
        let hash = self.hash_builder.hash_pair(&value, seed);
        let hash_builder = &self.hash_builder;
        match self.table.try_entry(
            hash,
            |v| hash_builder.keys_equal(v, &value),
            make_hasher::<T, _>(hash_builder, seed),
        )? {
            TableEntry::Occupied(_) => Ok(false),
            TableEntry::Vacant(entry) => {
                entry.insert(value, ());
                Ok(true)
            }
        }
    }

    /// Adds a value to the set, replacing and returning an equal stored
    /// value if there was one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.replace(String::from("a")), None);
    /// assert_eq!(set.replace(String::from("a")), Some(String::from("a")));
    /// ```
    pub fn replace(&mut self, value: T) -> Option<T> {
        let seed = self.seed();
        let hash = self.hash_builder.hash_pair(&value, seed);
        let hash_builder = &self.hash_builder;
        match self.table.entry(
            hash,
            |v| hash_builder.keys_equal(v, &value),
            make_hasher::<T, _>(hash_builder, seed),
        ) {
            TableEntry::Occupied(mut entry) => Some(entry.replace_key(value)),
            TableEntry::Vacant(entry) => {
                entry.insert(value, ());
                None
            }
        }
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        self.get(value).is_some()
    }

    /// Returns the stored value equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        let hash = hash_key(&self.hash_builder, value, self.seed());
        self.table
            .find(hash, equivalent_key::<T, _, _>(&self.hash_builder, value))
            .map(|(v, _)| v)
    }

    /// Removes `value` from the set. Returns whether it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// set.insert(2);
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        S: ProbeHasher<Q>,
    {
        let seed = self.seed();
        let hash = hash_key(&self.hash_builder, value, seed);
        self.table
            .remove(
                hash,
                equivalent_key::<T, _, _>(&self.hash_builder, value),
                make_hasher::<T, _>(&self.hash_builder, seed),
            )
            .map(|(v, _)| v)
    }

    /// Retains only the elements for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let mut set: HashSet<i32> = (1..=4).collect();
    /// set.retain(|&x| x % 2 == 0);
    /// assert_eq!(set.len(), 2);
    /// assert!(set.contains(&2) && set.contains(&4));
    /// ```
    pub fn retain(&mut self, mut f: impl FnMut(&T) -> bool) {
        let seed = self.seed();
        self.table
            .retain(|v, _| f(v), make_hasher::<T, _>(&self.hash_builder, seed));
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
            .try_reserve(additional, make_hasher::<T, _>(&self.hash_builder, seed))
    }

    /// Shrinks the set as far as its elements allow and drops tombstones.
    pub fn shrink_to_fit(&mut self) {
        let seed = self.seed();
        self.table
            .shrink_to_fit(make_hasher::<T, _>(&self.hash_builder, seed));
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    ///
    /// Stops at the first element of `self` found in `other`.
    pub fn is_disjoint(&self, other: &HashSet<T, S>) -> bool {
        !self.iter().any(|v| other.contains(v))
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [1, 2, 3].into_iter().collect();
    /// assert!(a.is_subset(&b));
    /// assert!(!b.is_subset(&a));
    /// ```
    pub fn is_subset(&self, other: &HashSet<T, S>) -> bool {
        if self.len() > other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every element of `other` is in `self`.
    pub fn is_superset(&self, other: &HashSet<T, S>) -> bool {
        other.is_subset(self)
    }
}

impl<T, S> HashSet<T, S>
where
    T: Clone,
    S: ProbeHasher<T> + Clone,
{
    /// Returns a new set holding every element of `self` and of `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [2, 3].into_iter().collect();
    /// assert_eq!(a.union(&b).len(), 3);
    /// ```
    pub fn union(&self, other: &HashSet<T, S>) -> HashSet<T, S> {
        let mut out = self.empty_like();
        out.extend(self.iter().cloned());
        out.extend(other.iter().cloned());
        out
    }

    /// Returns a new set holding the elements of `self` also in `other`.
    pub fn intersection(&self, other: &HashSet<T, S>) -> HashSet<T, S> {
        let mut out = self.empty_like();
        out.extend(self.iter().filter(|v| other.contains(*v)).cloned());
        out
    }

    /// Returns a new set holding the elements of `self` not in `other`.
    pub fn difference(&self, other: &HashSet<T, S>) -> HashSet<T, S> {
        let mut out = self.empty_like();
        out.extend(self.iter().filter(|v| !other.contains(*v)).cloned());
        out
    }

    /// Returns a new set holding the elements in exactly one of `self` and
    /// `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use double_hash::HashSet;
    ///
    /// let a: HashSet<i32> = [1, 2].into_iter().collect();
    /// let b: HashSet<i32> = [2, 3].into_iter().collect();
    /// let sym = a.symmetric_difference(&b);
    /// assert!(sym.contains(&1) && sym.contains(&3) && !sym.contains(&2));
    /// ```
    pub fn symmetric_difference(&self, other: &HashSet<T, S>) -> HashSet<T, S> {
        let mut out = self.difference(other);
        out.extend(other.iter().filter(|v| !self.contains(*v)).cloned());
        out
    }

    fn empty_like(&self) -> HashSet<T, S> {
        HashSet::with_config_and_hasher(*self.config(), self.hash_builder.clone())
    }
}

impl<T, S> core::ops::BitOr<&HashSet<T, S>> for &HashSet<T, S>
where
    T: Clone,
    S: ProbeHasher<T> + Clone,
{
    type Output = HashSet<T, S>;

    fn bitor(self, rhs: &HashSet<T, S>) -> HashSet<T, S> {
        self.union(rhs)
    }
}

impl<T, S> core::ops::BitAnd<&HashSet<T, S>> for &HashSet<T, S>
where
    T: Clone,
    S: ProbeHasher<T> + Clone,
{
    type Output = HashSet<T, S>;

    fn bitand(self, rhs: &HashSet<T, S>) -> HashSet<T, S> {
        self.intersection(rhs)
    }
}

impl<T, S> core::ops::Sub<&HashSet<T, S>> for &HashSet<T, S>
where
    T: Clone,
    S: ProbeHasher<T> + Clone,
{
    type Output = HashSet<T, S>;

    fn sub(self, rhs: &HashSet<T, S>) -> HashSet<T, S> {
        self.difference(rhs)
    }
}

impl<T, S> core::ops::BitXor<&HashSet<T, S>> for &HashSet<T, S>
where
    T: Clone,
    S: ProbeHasher<T> + Clone,
{
    type Output = HashSet<T, S>;

    fn bitxor(self, rhs: &HashSet<T, S>) -> HashSet<T, S> {
        self.symmetric_difference(rhs)
    }
}

impl<T, S> Default for HashSet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// An iterator over the elements of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T, ()>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, _)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// A draining iterator over the elements of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T, ()>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, _)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> FusedIterator for Drain<'_, T> {}

/// An owning iterator over the elements of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, _)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    S: ProbeHasher<T> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    S: ProbeHasher<T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Hash + Eq, const N: usize> From<[T; N]> for HashSet<T, Xxh64State> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}
