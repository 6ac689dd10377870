use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::error::TableError;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::probe::ProbeStrategy;

/// A hash set implemented on the open-addressing [`HashTable`].
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements
/// `Hash + Eq`, using a configurable hasher builder `S`. It is the
/// key-only configuration of the table: the stored value *is* the key.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "foldhash")]
/// # {
/// use probe_hash::HashSet;
///
/// let mut set = HashSet::new();
/// assert_eq!(set.insert(3), Ok(true));
/// assert_eq!(set.insert(3), Ok(false));
/// assert!(set.contains(&3));
/// # }
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug + Hash + Eq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a set with the default capacity of 16 slots and the given
    /// hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates a set with exactly `capacity` slots and the given hasher
    /// builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Creates a set with exactly `capacity` slots, the given probe
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

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the current ratio of elements to slots.
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

    /// Returns the probe strategy the set was built with.
    pub fn probe_strategy(&self) -> ProbeStrategy {
        self.table.probe_strategy()
    }

    /// Adds a value to the set.
    ///
    /// Returns `Ok(true)` if the value was not already present; an existing
    /// equal value stays in place and `Ok(false)` is returned.
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
    /// use probe_hash::HashSet;
    ///
    /// let mut set = HashSet::new();
    /// assert_eq!(set.insert("a"), Ok(true));
    /// assert_eq!(set.insert("a"), Ok(false));
    /// assert_eq!(set.len(), 1);
    /// # }
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool, TableError> {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |stored| stored == &value)? {
            TableEntry::Occupied(_) => Ok(false),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                Ok(true)
            }
        }
    }

    /// Returns `true` if the set contains the given value.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to the given one.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |stored| stored == value)
    }

    /// Removes a value from the set, returning `true` if it was present.
    ///
    /// The vacated slot becomes a tombstone and is reclaimed by later
    /// insertions.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to the given one.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |stored| stored == value)
    }

    /// Ensures the backing array has at least `capacity` slots.
    pub fn reserve(&mut self, capacity: usize) {
        self.table.reserve(capacity);
    }

    /// Rehashes the set into a backing array of exactly `new_capacity`
    /// slots, dropping accumulated tombstones.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityTooSmall`] if `new_capacity` cannot
    /// hold the current elements under the maximum load factor.
    pub fn rehash(&mut self, new_capacity: usize) -> Result<(), TableError> {
        self.table.rehash(new_capacity)
    }

    /// Removes all elements, keeping the allocated capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the elements of the set in unspecified
    /// order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields all elements.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

#[cfg(feature = "foldhash")]
impl<T> HashSet<T>
where
    T: Hash + Eq,
{
    /// Creates a set with the default capacity of 16 slots, linear probing,
    /// and the default hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(crate::DefaultHashBuilder::default())
    }

    /// Creates a set with exactly `capacity` slots and the default hasher
    /// builder.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, crate::DefaultHashBuilder::default())
    }

    /// Creates a set with exactly `capacity` slots, the given probe
    /// strategy, and the default hasher builder.
    pub fn with_probe_strategy(capacity: usize, probe: ProbeStrategy) -> Self {
        Self::with_probe_strategy_and_hasher(capacity, probe, crate::DefaultHashBuilder::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            let _ = self.insert(value);
        }
    }
}

/// An iterator over the elements of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// A draining iterator over the elements of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<'a, T> Iterator for Drain<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
