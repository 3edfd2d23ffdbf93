#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;

/// Errors reported by fallible table operations.
pub mod error;

pub mod hash;

pub mod hash_builder;

/// A key-value map over the double-hashing table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and resolves
/// hashing and equality through a [`ProbeHasher`].
pub mod hash_map;

/// A set over the double-hashing table.
///
/// This module provides a `HashSet` that stores elements in a `HashTable`
/// with unit values and builds fresh sets for union, intersection and
/// difference.
pub mod hash_set;

/// The open-addressing engine shared by the map and the set.
///
/// Callers supply each key's [`HashPair`] and an equality closure; the
/// table holds no hashing policy of its own.
pub mod hash_table;

mod slot;
mod store;

pub use config::TableConfig;
pub use error::TableError;
pub use hash::DEFAULT_SEED;
pub use hash::HashPair;
pub use hash_builder::BuildHasherState;
#[cfg(feature = "foldhash")]
pub use hash_builder::FoldState;
pub use hash_builder::KeyFns;
pub use hash_builder::ProbeHasher;
pub use hash_builder::Xxh64State;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hash_table::SlotStatus;
