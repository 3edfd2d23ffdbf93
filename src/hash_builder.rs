//! Hash and equality contracts used by [`HashMap`](crate::HashMap) and
//! [`HashSet`](crate::HashSet).
//!
//! A table resolves every probe through a [`ProbeHasher`]: it asks for the
//! key's [`HashPair`] under the table's seed and compares candidates with
//! [`ProbeHasher::keys_equal`]. Lookup, insert, remove, resize and the set
//! algebra all go through the same contract.

use core::fmt;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hash::HashPair;
use crate::hash::PairHasher;
use crate::hash::h64;
use crate::hash::h64_alt;

/// Supplies probe hashes and key equality for keys of type `K`.
///
/// Implementations must be consistent: keys that compare equal must produce
/// the same pair for the same seed.
pub trait ProbeHasher<K: ?Sized> {
    /// Returns the home hash and the (odd) probe step of `key`.
    fn hash_pair(&self, key: &K, seed: u64) -> HashPair;

    /// Returns true if `a` and `b` are the same key.
    fn keys_equal(&self, a: &K, b: &K) -> bool;
}

/// The default contract: the key's [`Hash`] bytes run through both XXH64
/// variants, and equality is [`Eq`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Xxh64State;

impl<K: Hash + Eq + ?Sized> ProbeHasher<K> for Xxh64State {
    #[inline]
    fn hash_pair(&self, key: &K, seed: u64) -> HashPair {
        let mut hasher = PairHasher::new(seed);
        key.hash(&mut hasher);
        hasher.pair()
    }

    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Caller-supplied hash and equality, for keys whose identity is a subset of
/// their fields.
///
/// `hash(key, inner)` picks the bytes that identify `key` and returns
/// `inner(bytes)`. The table calls it twice per key, once with the home
/// hash and once with the step hash, both under the table's seed. `eq`
/// replaces [`Eq`]. Neither `Hash` nor `Eq` is required of the key type.
///
/// # Examples
///
/// ```
/// use double_hash::{HashMap, KeyFns};
///
/// struct Node {
///     x: i32,
///     y: i32,
/// }
///
/// let mut map = HashMap::with_hasher(KeyFns::new(
///     |node: &Node, inner: &dyn Fn(&[u8]) -> u64| inner(&node.x.to_le_bytes()),
///     |a: &Node, b: &Node| a.x == b.x,
/// ));
///
/// map.insert(Node { x: 1, y: 10 }, "first");
/// assert_eq!(map.get(&Node { x: 1, y: 99 }), Some(&"first"));
/// ```
#[derive(Clone, Copy)]
pub struct KeyFns<F, E> {
    hash: F,
    eq: E,
}

impl<F, E> KeyFns<F, E> {
    /// Bundles a hash projection and an equality predicate.
    ///
    /// Both are required together, so a table can never hold one without
    /// the other.
    pub fn new<K: ?Sized>(hash: F, eq: E) -> Self
    where
        F: Fn(&K, &dyn Fn(&[u8]) -> u64) -> u64,
        E: Fn(&K, &K) -> bool,
    {
        Self { hash, eq }
    }
}

impl<K: ?Sized, F, E> ProbeHasher<K> for KeyFns<F, E>
where
    F: Fn(&K, &dyn Fn(&[u8]) -> u64) -> u64,
    E: Fn(&K, &K) -> bool,
{
    fn hash_pair(&self, key: &K, seed: u64) -> HashPair {
        let home = (self.hash)(key, &|bytes: &[u8]| h64(bytes, seed));
        let step = (self.hash)(key, &|bytes: &[u8]| h64_alt(bytes, seed));
        HashPair::new(home, step)
    }

    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        (self.eq)(a, b)
    }
}

impl<F, E> fmt::Debug for KeyFns<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyFns").finish_non_exhaustive()
    }
}

/// Adapter over any [`BuildHasher`].
///
/// The home hash is `S::hash_one(key)`. The step is the alternate XXH64 of
/// the home hash's bytes, so a single pass of the wrapped hasher is enough.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildHasherState<S> {
    build_hasher: S,
}

impl<S> BuildHasherState<S> {
    /// Wraps `build_hasher`.
    pub const fn new(build_hasher: S) -> Self {
        Self { build_hasher }
    }

    /// The wrapped builder.
    pub fn build_hasher(&self) -> &S {
        &self.build_hasher
    }
}

impl<K: Hash + Eq + ?Sized, S: BuildHasher> ProbeHasher<K> for BuildHasherState<S> {
    #[inline]
    fn hash_pair(&self, key: &K, seed: u64) -> HashPair {
        let home = self.build_hasher.hash_one(key);
        HashPair::new(home, h64_alt(&home.to_le_bytes(), seed))
    }

    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// [`BuildHasherState`] over foldhash's fast, randomly seeded hasher.
        pub type FoldState = BuildHasherState<foldhash::fast::RandomState>;
    }
}
