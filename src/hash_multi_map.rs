use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::error::TableError;
use crate::hash_table::HashTable;
use crate::probe::ProbeStrategy;

/// A hash map that stores every inserted pair, including pairs whose keys
/// are equal.
///
/// `HashMultiMap<K, V, S>` is the duplicate-keys configuration of the
/// open-addressing [`HashTable`]: insertion never probes for an equal key,
/// so equal keys accumulate as independent entries. Entries for one key are
/// *not* necessarily adjacent in the slot array (collisions and rehashing
/// scatter them), so [`get_all`](HashMultiMap::get_all) scans the storage
/// exhaustively rather than assuming a contiguous run.
///
/// [`remove`](HashMultiMap::remove) removes a single entry (the first one on
/// the probe sequence); repeated calls drain a key one entry at a time.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "foldhash")]
/// # {
/// use probe_hash::HashMultiMap;
///
/// let mut map = HashMultiMap::new();
/// map.insert(5, "first").unwrap();
/// map.insert(5, "second").unwrap();
///
/// assert_eq!(map.count(&5), 2);
/// let mut values: Vec<&str> = map.get_all(&5).copied().collect();
/// values.sort_unstable();
/// assert_eq!(values, ["first", "second"]);
/// # }
/// ```
#[derive(Clone)]
pub struct HashMultiMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMultiMap<K, V, S>
where
    K: Debug + Hash + Eq,
    V: Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> HashMultiMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a multimap with the default capacity of 16 slots and the
    /// given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates a multimap with exactly `capacity` slots and the given
    /// hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Creates a multimap with exactly `capacity` slots, the given probe
    /// strategy, and the given hasher builder.
    pub fn with_probe_strategy_and_hasher(
        capacity: usize,
        probe: ProbeStrategy,
        hash_builder: S,
    ) -> Self {
        Self {
            table: HashTable::with_capacity_and_probe(capacity, probe),
            hash_builder,
        }
    }

    /// Returns the number of entries in the multimap, counting every
    /// duplicate.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the multimap contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the current ratio of entries to slots.
    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Returns the load-factor bound that triggers growth.
    pub fn max_load_factor(&self) -> f32 {
        self.table.max_load_factor()
    }

    /// Sets the load-factor bound that triggers growth.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidLoadFactor`] for bounds outside
    /// `(0, 1]`.
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) -> Result<(), TableError> {
        self.table.set_max_load_factor(max_load_factor)
    }

    /// Returns the probe strategy the multimap was built with.
    pub fn probe_strategy(&self) -> ProbeStrategy {
        self.table.probe_strategy()
    }

    /// Inserts a key-value pair, keeping any existing entries with an equal
    /// key, and returns a reference to the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::TableFull`] if the probe sequence cannot reach
    /// a free slot (not possible with linear probing); the pair is not
    /// stored in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::HashMultiMap;
    ///
    /// let mut map = HashMultiMap::new();
    /// map.insert("k", 1).unwrap();
    /// map.insert("k", 2).unwrap();
    /// assert_eq!(map.len(), 2);
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<&mut V, TableError> {
        let hash = self.hash_builder.hash_one(&key);
        self.table
            .insert_unique(hash, (key, value))
            .map(|(_, v)| v)
    }

    /// Returns a reference to one value stored under `key` (the first on
    /// its probe sequence), or `None` if the key is absent.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns an iterator over every value stored under `key`.
    ///
    /// Entries for one key are not contiguous in the slot array, so this
    /// scans the storage exhaustively; duplicates separated by other entries
    /// or tombstones are all found. Yield order is unspecified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::HashMultiMap;
    ///
    /// let mut map = HashMultiMap::new();
    /// map.insert(1, 'a').unwrap();
    /// map.insert(1, 'b').unwrap();
    /// map.insert(2, 'c').unwrap();
    ///
    /// assert_eq!(map.get_all(&1).count(), 2);
    /// assert_eq!(map.get_all(&3).count(), 0);
    /// # }
    /// ```
    pub fn get_all<'a>(&'a self, key: &'a K) -> impl Iterator<Item = &'a V> {
        self.table
            .find_all(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns the number of entries stored under `key`.
    pub fn count(&self, key: &K) -> usize {
        self.get_all(key).count()
    }

    /// Returns `true` if at least one entry is stored under `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes one entry stored under `key`, the first on its probe
    /// sequence, returning its value.
    ///
    /// Remaining duplicates stay in place and reachable.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Ensures the backing array has at least `capacity` slots.
    pub fn reserve(&mut self, capacity: usize) {
        self.table.reserve(capacity);
    }

    /// Rehashes the multimap into a backing array of exactly
    /// `new_capacity` slots, dropping accumulated tombstones.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityTooSmall`] if `new_capacity` cannot
    /// hold the current entries under the maximum load factor; the multimap
    /// is unchanged in that case.
    pub fn rehash(&mut self, new_capacity: usize) -> Result<(), TableError> {
        self.table.rehash(new_capacity)
    }

    /// Removes all entries, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs of the multimap in
    /// unspecified order. Duplicate keys appear once per entry.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the multimap, repeating
    /// duplicate keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over the values of the multimap.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Returns an iterator that removes and yields all key-value pairs.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

#[cfg(feature = "foldhash")]
impl<K, V> HashMultiMap<K, V>
where
    K: Hash + Eq,
{
    /// Creates a multimap with the default capacity of 16 slots, linear
    /// probing, and the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(crate::DefaultHashBuilder::default())
    }

    /// Creates a multimap with exactly `capacity` slots and the default
    /// hasher builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, crate::DefaultHashBuilder::default())
    }

    /// Creates a multimap with exactly `capacity` slots, the given probe
    /// strategy, and the default hasher builder.
    pub fn with_probe_strategy(capacity: usize, probe: ProbeStrategy) -> Self {
        Self::with_probe_strategy_and_hasher(capacity, probe, crate::DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashMultiMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for HashMultiMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    /// Multimaps are equal when they hold the same multiset of entries:
    /// every `(key, value)` pair occurs the same number of times in both,
    /// independent of insertion order and slot positions.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(key, value)| {
            let mine = self.get_all(key).filter(|&v| v == value).count();
            let theirs = other.get_all(key).filter(|&v| v == value).count();
            mine == theirs
        })
    }
}

impl<K, V, S> Eq for HashMultiMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> FromIterator<(K, V)> for HashMultiMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMultiMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

/// An iterator over the key-value pairs of a `HashMultiMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }
}

/// A draining iterator over the key-value pairs of a `HashMultiMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Drain<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
