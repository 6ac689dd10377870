#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod error;

/// A hash map with unique keys built on the open-addressing table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

/// A hash map that keeps every inserted pair, including duplicate keys.
pub mod hash_multi_map;

/// A hash set built on the open-addressing table.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers.
pub mod hash_set;

pub mod hash_table;

pub mod probe;

mod slot;

/// The default hasher builder used by the map, multimap and set wrappers.
#[cfg(feature = "foldhash")]
pub type DefaultHashBuilder = foldhash::fast::RandomState;

/// Placeholder for the default hasher builder.
///
/// With the `foldhash` feature disabled there is no default hasher; this
/// type cannot be constructed, and every wrapper must be created through a
/// `with_hasher` constructor with an explicit `BuildHasher`.
#[cfg(not(feature = "foldhash"))]
pub enum DefaultHashBuilder {}

pub use error::TableError;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_multi_map::HashMultiMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use probe::ProbeStrategy;
