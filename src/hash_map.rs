use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;
use core::mem;

use crate::DefaultHashBuilder;
use crate::error::TableError;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::probe::ProbeStrategy;

/// A hash map with unique keys, implemented on the open-addressing
/// [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs where keys implement
/// `Hash + Eq` and uses a configurable hasher builder `S` to hash keys. Each
/// pair lives directly in the table's slot array; removal tombstones the
/// slot and insertion reclaims tombstones before consuming fresh capacity.
///
/// Unlike `std::collections::HashMap`, [`insert`](HashMap::insert) never
/// overwrites: an existing key leaves the stored value untouched and reports
/// that nothing was created. Use
/// [`insert_or_assign`](HashMap::insert_or_assign) for overwrite semantics
/// or [`entry`](HashMap::entry) for in-place manipulation.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "foldhash")]
/// # {
/// use probe_hash::HashMap;
///
/// let mut map = HashMap::new();
/// assert_eq!(map.insert("a", 1), Ok(true));
/// assert_eq!(map.insert("a", 2), Ok(false));
/// assert_eq!(map.get(&"a"), Some(&1));
/// # }
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
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

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a map with the default capacity of 16 slots and the given
    /// hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates a map with exactly `capacity` slots and the given hasher
    /// builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Creates a map with exactly `capacity` slots, the given probe
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

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
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

    /// Returns the probe strategy the map was built with.
    pub fn probe_strategy(&self) -> ProbeStrategy {
        self.table.probe_strategy()
    }

    /// Inserts a key-value pair if the key is not already present.
    ///
    /// Returns `Ok(true)` if a new entry was created. An existing key leaves
    /// the stored value untouched, drops the offered one, and returns
    /// `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::TableFull`] if the probe sequence cannot reach
    /// a free slot (not possible with linear probing).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert(37, "a"), Ok(true));
    /// assert_eq!(map.insert(37, "b"), Ok(false));
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// # }
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<bool, TableError> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(_) => Ok(false),
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                Ok(true)
            }
        }
    }

    /// Inserts a key-value pair, overwriting the value of an existing key
    /// in place.
    ///
    /// Returns the previous value when the key was already present.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::TableFull`] if the probe sequence cannot reach
    /// a free slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert_or_assign(37, "a"), Ok(None));
    /// assert_eq!(map.insert_or_assign(37, "b"), Ok(Some("a")));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// # }
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(mut entry) => {
                Ok(Some(mem::replace(&mut entry.get_mut().1, value)))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// # }
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a reference to the value corresponding to the key, failing
    /// loudly when the key is absent.
    ///
    /// This is the strict counterpart of [`get`](HashMap::get): absence is
    /// an error rather than a sentinel. The failure is a plain return value
    /// and leaves the map fully usable.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::KeyNotFound`] if the key is not in the map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::HashMap;
    /// use probe_hash::TableError;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&10), Err(TableError::KeyNotFound));
    /// # }
    /// ```
    pub fn at(&self, key: &K) -> Result<&V, TableError> {
        self.get(key).ok_or(TableError::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key,
    /// failing with [`TableError::KeyNotFound`] when the key is absent.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, TableError> {
        self.get_mut(key).ok_or(TableError::KeyNotFound)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of entries stored under `key`: 0 or 1, since this
    /// map keeps keys unique.
    pub fn count(&self, key: &K) -> usize {
        usize::from(self.contains_key(key))
    }

    /// Returns an iterator over every value stored under `key`; at most
    /// one for this map.
    ///
    /// This is the unique-key degenerate form of
    /// [`HashMultiMap::get_all`](crate::HashMultiMap::get_all).
    pub fn get_all<'a>(&'a self, key: &'a K) -> impl Iterator<Item = &'a V> {
        self.table
            .find_all(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the value if the key was
    /// present.
    ///
    /// The vacated slot becomes a tombstone; no other entry moves, so
    /// references and iteration over the rest of the map stay valid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert(1, "a").unwrap();
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// # }
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if
    /// the key was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Gets the given key's entry in the map for in-place manipulation.
    ///
    /// `entry(key)?.or_default()` is the get-or-insert-default access
    /// pattern; `or_insert_with` covers lazily constructed values.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::TableFull`] if the probe sequence cannot reach
    /// a free slot for a vacant entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use probe_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.entry(1).unwrap().or_insert(10);
    /// map.entry(1).unwrap().and_modify(|v| *v += 5).or_insert(99);
    /// assert_eq!(map.get(&1), Some(&15));
    /// # }
    /// ```
    pub fn entry(&mut self, key: K) -> Result<Entry<'_, K, V>, TableError> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key)? {
            TableEntry::Occupied(entry) => Ok(Entry::Occupied(OccupiedEntry { entry })),
            TableEntry::Vacant(entry) => Ok(Entry::Vacant(VacantEntry { entry, key })),
        }
    }

    /// Ensures the backing array has at least `capacity` slots.
    pub fn reserve(&mut self, capacity: usize) {
        self.table.reserve(capacity);
    }

    /// Rehashes the map into a backing array of exactly `new_capacity`
    /// slots, dropping accumulated tombstones.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityTooSmall`] if `new_capacity` cannot
    /// hold the current entries under the maximum load factor; the map is
    /// unchanged in that case.
    pub fn rehash(&mut self, new_capacity: usize) -> Result<(), TableError> {
        self.table.rehash(new_capacity)
    }

    /// Removes all entries, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the key-value pairs of the map in
    /// unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator that removes and yields all key-value pairs.
    ///
    /// The map is empty once the iterator is dropped, even if it was not
    /// fully consumed.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

#[cfg(feature = "foldhash")]
impl<K, V> HashMap<K, V>
where
    K: Hash + Eq,
{
    /// Creates a map with the default capacity of 16 slots, linear probing,
    /// and the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    ///
    /// let map: HashMap<i32, &str> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(crate::DefaultHashBuilder::default())
    }

    /// Creates a map with exactly `capacity` slots and the default hasher
    /// builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, crate::DefaultHashBuilder::default())
    }

    /// Creates a map with exactly `capacity` slots, the given probe
    /// strategy, and the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashMap;
    /// use probe_hash::ProbeStrategy;
    ///
    /// let map: HashMap<i32, i32> =
    ///     HashMap::with_probe_strategy(64, ProbeStrategy::quadratic());
    /// assert_eq!(map.probe_strategy(), ProbeStrategy::quadratic());
    /// ```
    pub fn with_probe_strategy(capacity: usize, probe: ProbeStrategy) -> Self {
        Self::with_probe_strategy_and_hasher(capacity, probe, crate::DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    /// Maps are equal when they have the same size and every key maps to an
    /// equal value; insertion order and slot positions are irrelevant.
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Builds a map from a sequence of pairs; later duplicates of a key are
    /// ignored, matching [`insert`](HashMap::insert).
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
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
    /// Inserts the default value if the entry is vacant and returns a
    /// mutable reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a
    /// value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to
    /// it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
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
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Drain<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
