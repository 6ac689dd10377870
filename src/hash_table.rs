use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;

use crate::error::TableError;
use crate::probe::ProbeStrategy;
use crate::slot::Slot;

/// Capacity used by [`HashTable::new`] and by the first growth of a
/// zero-capacity table.
pub const DEFAULT_CAPACITY: usize = 16;

const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.75;

/// The slot chosen by a bounded probe walk for an insertion.
enum InsertSlot {
    /// A free slot: the first tombstone on the sequence if one was seen,
    /// otherwise the empty slot that ended the walk.
    Vacant(usize),
    /// An occupied slot whose value matched the equality predicate.
    Occupied(usize),
    /// The walk exhausted `capacity` attempts without a free slot.
    Full,
}

/// An open-addressing hash table storing values of type `V`.
///
/// `HashTable<V>` is the raw engine underneath [`HashMap`](crate::HashMap),
/// [`HashMultiMap`](crate::HashMultiMap) and [`HashSet`](crate::HashSet).
/// It does not hash anything itself: every operation takes the value's hash
/// and an equality predicate, which lets the wrappers decide how keys are
/// derived from stored values. The table owns the slot array, the entry
/// count, the maximum load factor and the [`ProbeStrategy`] that generates
/// candidate slot indices.
///
/// Entries are stored directly in a contiguous slot array. Removal leaves a
/// tombstone behind so that probe chains running past the removed entry stay
/// intact; tombstones are reused by insertion and reclaimed wholesale on
/// rehash.
///
/// Any operation that grows the table (`entry`, `insert_unique`, `reserve`,
/// `rehash`, `set_max_load_factor`) replaces the backing array and therefore
/// invalidates all outstanding references into it. In Rust this is enforced
/// by the borrow checker rather than left to the caller's discipline: all of
/// these operations require `&mut self`.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "foldhash")]
/// # {
/// use core::hash::BuildHasher;
///
/// use probe_hash::DefaultHashBuilder;
/// use probe_hash::hash_table::Entry;
/// use probe_hash::hash_table::HashTable;
///
/// let hasher = DefaultHashBuilder::default();
/// let mut table: HashTable<(u32, &str)> = HashTable::new();
///
/// let hash = hasher.hash_one(1u32);
/// match table.entry(hash, |&(id, _)| id == 1).unwrap() {
///     Entry::Vacant(entry) => {
///         entry.insert((1, "one"));
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(hash, |&(id, _)| id == 1), Some(&(1, "one")));
/// # }
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Vec<Slot<V>>,
    populated: usize,
    max_load_factor: f32,
    probe: ProbeStrategy,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.populated)
            .field("capacity", &self.slots.len())
            .field("probe", &self.probe)
            .finish_non_exhaustive()
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates a table with the default capacity of 16 slots and linear
    /// probing.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a table with exactly `capacity` slots and linear probing.
    ///
    /// The capacity is used as given; it is not rounded to a power of two.
    /// A zero-capacity table allocates nothing and grows to
    /// [`DEFAULT_CAPACITY`] on first insertion.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_probe(capacity, ProbeStrategy::default())
    }

    /// Creates a table with exactly `capacity` slots and the given probe
    /// strategy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::ProbeStrategy;
    /// use probe_hash::hash_table::HashTable;
    ///
    /// let table: HashTable<u64> =
    ///     HashTable::with_capacity_and_probe(32, ProbeStrategy::double_hashing());
    /// assert_eq!(table.capacity(), 32);
    /// assert_eq!(table.probe_strategy(), ProbeStrategy::double_hashing());
    /// ```
    pub fn with_capacity_and_probe(capacity: usize, probe: ProbeStrategy) -> Self {
        let mut slots = Vec::new();
        slots.resize_with(capacity, Slot::default);

        Self {
            slots,
            populated: 0,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            probe,
        }
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots in the backing array.
    ///
    /// The table holds at most `capacity() * max_load_factor()` entries
    /// before growing.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current ratio of entries to slots.
    pub fn load_factor(&self) -> f32 {
        if self.slots.is_empty() {
            0.0
        } else {
            self.populated as f32 / self.slots.len() as f32
        }
    }

    /// Returns the load-factor bound that triggers growth.
    pub fn max_load_factor(&self) -> f32 {
        self.max_load_factor
    }

    /// Sets the load-factor bound that triggers growth.
    ///
    /// The bound must lie within `(0, 1]`; anything else (including NaN) is
    /// rejected with [`TableError::InvalidLoadFactor`]. Lowering the bound
    /// below the current load factor grows the table immediately.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::TableError;
    /// use probe_hash::hash_table::HashTable;
    ///
    /// let mut table: HashTable<u64> = HashTable::new();
    /// assert_eq!(table.set_max_load_factor(0.5), Ok(()));
    /// assert_eq!(
    ///     table.set_max_load_factor(1.5),
    ///     Err(TableError::InvalidLoadFactor(1.5))
    /// );
    /// assert_eq!(table.max_load_factor(), 0.5);
    /// ```
    pub fn set_max_load_factor(&mut self, max_load_factor: f32) -> Result<(), TableError> {
        if !(max_load_factor > 0.0 && max_load_factor <= 1.0) {
            return Err(TableError::InvalidLoadFactor(max_load_factor));
        }

        self.max_load_factor = max_load_factor;
        if self.load_factor() > self.max_load_factor {
            self.grow_to(self.slots.len() * 2);
        }
        Ok(())
    }

    /// Returns the probe strategy the table was built with.
    pub fn probe_strategy(&self) -> ProbeStrategy {
        self.probe
    }

    /// Returns a reference to the first value matching `eq` on the probe
    /// sequence of `hash`.
    ///
    /// The walk is bounded by `capacity` attempts; an empty slot terminates
    /// it early, tombstones are skipped.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        self.find_index(hash, eq)
            .and_then(|index| self.slots[index].get())
    }

    /// Returns a mutable reference to the first value matching `eq` on the
    /// probe sequence of `hash`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        self.find_index(hash, eq)
            .and_then(|index| self.slots[index].get_mut())
    }

    /// Returns an iterator over every stored value matching `eq`.
    ///
    /// Unlike [`find`](Self::find) this scans the whole slot array instead
    /// of one probe sequence. Duplicate entries are not adjacent in the
    /// array (collisions and rehashing scatter them), and probe sequences
    /// other than linear can revisit indices, so the exhaustive scan is the
    /// only walk that yields each match exactly once for every strategy.
    /// Yield order follows the slot array and is otherwise unspecified.
    pub fn find_all<F>(&self, eq: F) -> FindAll<'_, V, F>
    where
        F: Fn(&V) -> bool,
    {
        FindAll {
            inner: self.slots.iter(),
            eq,
        }
    }

    /// Gets an entry for the given hash and equality predicate, growing the
    /// table first if the insertion would exceed the maximum load factor.
    ///
    /// Growth runs before the probe walk because it invalidates every index
    /// the walk would produce. The returned [`Entry`] is `Occupied` when a
    /// matching value exists and `Vacant` otherwise; a vacant entry points
    /// at the first tombstone seen on the sequence, falling back to the
    /// terminating empty slot.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::TableFull`] if the bounded probe sequence finds
    /// neither a match nor a free slot. This cannot happen with
    /// [`ProbeStrategy::Linear`]; strategies that do not cover the full
    /// index space can report it while free slots remain. The table is left
    /// usable (though possibly grown) when this is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use core::hash::BuildHasher;
    ///
    /// use probe_hash::DefaultHashBuilder;
    /// use probe_hash::hash_table::HashTable;
    ///
    /// let hasher = DefaultHashBuilder::default();
    /// let mut table: HashTable<u64> = HashTable::new();
    ///
    /// let hash = hasher.hash_one(7u64);
    /// table.entry(hash, |&v| v == 7).unwrap().or_insert(7);
    /// assert_eq!(table.len(), 1);
    ///
    /// // A second entry call for the same value finds it occupied.
    /// table.entry(hash, |&v| v == 7).unwrap().or_insert(7);
    /// assert_eq!(table.len(), 1);
    /// # }
    /// ```
    pub fn entry(
        &mut self,
        hash: u64,
        eq: impl Fn(&V) -> bool,
    ) -> Result<Entry<'_, V>, TableError> {
        self.grow_if_needed();

        match self.probe_insert_slot(hash, eq) {
            InsertSlot::Occupied(index) => Ok(Entry::Occupied(OccupiedEntry { table: self, index })),
            InsertSlot::Vacant(index) => Ok(Entry::Vacant(VacantEntry {
                table: self,
                index,
                hash,
            })),
            InsertSlot::Full => Err(TableError::TableFull),
        }
    }

    /// Inserts a value without probing for an equal entry.
    ///
    /// This is the duplicate-keys insertion path: values equal to an already
    /// stored one accumulate instead of being detected. The slot choice
    /// still prefers the first tombstone on the probe sequence over a fresh
    /// empty slot.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::TableFull`] under the same conditions as
    /// [`entry`](Self::entry); the value is not stored in that case.
    pub fn insert_unique(&mut self, hash: u64, value: V) -> Result<&mut V, TableError> {
        self.grow_if_needed();

        match self.probe_insert_slot(hash, |_| false) {
            InsertSlot::Vacant(index) => {
                self.slots[index].occupy(hash, value);
                self.populated += 1;
                match self.slots[index].get_mut() {
                    Some(value) => Ok(value),
                    // The slot was occupied on the line above.
                    None => unreachable!(),
                }
            }
            // The predicate above never matches.
            InsertSlot::Occupied(_) => unreachable!(),
            InsertSlot::Full => Err(TableError::TableFull),
        }
    }

    /// Removes and returns the first value matching `eq` on the probe
    /// sequence of `hash`.
    ///
    /// The slot becomes a tombstone; neighboring slots are never touched,
    /// so probe chains of entries inserted past the removed one remain
    /// intact. No reallocation happens.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = self.find_index(hash, eq)?;
        let value = self.slots[index].delete()?;
        self.populated -= 1;
        Some(value)
    }

    /// Removes all entries, keeping the allocated capacity.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
        self.populated = 0;
    }

    /// Ensures the backing array has at least `capacity` slots.
    ///
    /// Existing entries are rehashed into the larger array; tombstones are
    /// dropped. Does nothing if the current capacity is already sufficient.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.slots.len() {
            self.grow_to(capacity);
        }
    }

    /// Replaces the backing array with one of exactly `new_capacity` slots,
    /// reinserting every live entry and dropping all tombstones.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityTooSmall`] if `new_capacity` cannot
    /// hold the resident entries under the current maximum load factor, and
    /// [`TableError::TableFull`] if the probe strategy fails to place every
    /// entry in the new array. In both cases the table is left exactly as it
    /// was; entries are never silently dropped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "foldhash")]
    /// # {
    /// use core::hash::BuildHasher;
    ///
    /// use probe_hash::DefaultHashBuilder;
    /// use probe_hash::hash_table::HashTable;
    ///
    /// let hasher = DefaultHashBuilder::default();
    /// let mut table: HashTable<u64> = HashTable::new();
    /// for value in 0..8u64 {
    ///     let hash = hasher.hash_one(value);
    ///     table.entry(hash, |&v| v == value).unwrap().or_insert(value);
    /// }
    ///
    /// table.rehash(64).unwrap();
    /// assert_eq!(table.capacity(), 64);
    /// assert_eq!(table.len(), 8);
    /// assert!(table.rehash(4).is_err());
    /// # }
    /// ```
    pub fn rehash(&mut self, new_capacity: usize) -> Result<(), TableError> {
        let required = self.minimum_capacity(self.populated);
        if new_capacity < required {
            return Err(TableError::CapacityTooSmall {
                requested: new_capacity,
                required,
            });
        }
        self.rehash_into(new_capacity)
    }

    /// Returns an iterator over all values, skipping empty and tombstoned
    /// slots. Yield order follows the slot array and is unspecified.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.slots.iter(),
        }
    }

    /// Returns an iterator that removes and yields every value.
    ///
    /// The table is empty once the iterator is dropped, even if it was not
    /// fully consumed. Tombstones are cleared as a side effect.
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            index: 0,
        }
    }

    /// Walks the probe sequence of `hash` looking for a value matching
    /// `eq`. An empty slot ends the walk ("not found"); tombstones are
    /// skipped. At most `capacity` attempts are made.
    fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        let capacity = self.slots.len();
        for attempt in 0..capacity as u64 {
            let index = self.probe.probe(hash, attempt, capacity);
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied { value, .. } if eq(value) => return Some(index),
                _ => {}
            }
        }
        None
    }

    /// Walks the probe sequence of `hash` to pick an insertion slot,
    /// remembering the first tombstone so deleted capacity is reclaimed
    /// before untouched empty slots are consumed.
    fn probe_insert_slot(&self, hash: u64, eq: impl Fn(&V) -> bool) -> InsertSlot {
        let capacity = self.slots.len();
        let mut first_tombstone = None;

        for attempt in 0..capacity as u64 {
            let index = self.probe.probe(hash, attempt, capacity);
            match &self.slots[index] {
                Slot::Empty => return InsertSlot::Vacant(first_tombstone.unwrap_or(index)),
                Slot::Deleted => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Slot::Occupied { value, .. } if eq(value) => return InsertSlot::Occupied(index),
                Slot::Occupied { .. } => {}
            }
        }

        match first_tombstone {
            Some(index) => InsertSlot::Vacant(index),
            None => InsertSlot::Full,
        }
    }

    /// Grows the table if one more entry would push the load factor past
    /// its bound. Runs before the insertion probe since growth invalidates
    /// probe indices.
    fn grow_if_needed(&mut self) {
        let capacity = self.slots.len();
        if capacity == 0 {
            self.grow_to(DEFAULT_CAPACITY);
        } else if (self.populated + 1) as f32 / capacity as f32 > self.max_load_factor {
            self.grow_to(capacity * 2);
        }
    }

    /// Rehashes into `new_capacity` slots, doubling further if the probe
    /// strategy cannot place every entry at that size. Entries are never
    /// dropped to make a rehash fit.
    fn grow_to(&mut self, mut new_capacity: usize) {
        while self.rehash_into(new_capacity).is_err() {
            new_capacity *= 2;
        }
    }

    /// Replaces the slot array, reinserting every occupied slot against the
    /// new capacity.
    ///
    /// Placement is planned with the cached hashes before any value moves,
    /// so a planning failure leaves the table untouched.
    fn rehash_into(&mut self, new_capacity: usize) -> Result<(), TableError> {
        let Some(moves) = self.plan_rehash(new_capacity) else {
            return Err(TableError::TableFull);
        };

        let mut new_slots: Vec<Slot<V>> = Vec::new();
        new_slots.resize_with(new_capacity, Slot::default);

        for (old_index, new_index) in moves {
            if let Slot::Occupied { hash, value } =
                mem::replace(&mut self.slots[old_index], Slot::Empty)
            {
                new_slots[new_index].occupy(hash, value);
            }
        }

        self.slots = new_slots;
        Ok(())
    }

    /// Computes a target slot for every occupied entry at the new capacity,
    /// or `None` if some entry cannot be placed within the probe bound.
    fn plan_rehash(&self, new_capacity: usize) -> Option<Vec<(usize, usize)>> {
        if new_capacity == 0 {
            return if self.populated == 0 { Some(Vec::new()) } else { None };
        }

        let mut taken = vec![false; new_capacity];
        let mut moves = Vec::with_capacity(self.populated);

        for (old_index, slot) in self.slots.iter().enumerate() {
            let Some(hash) = slot.hash() else {
                continue;
            };

            let target = (0..new_capacity as u64)
                .map(|attempt| self.probe.probe(hash, attempt, new_capacity))
                .find(|&index| !taken[index])?;

            taken[target] = true;
            moves.push((old_index, target));
        }

        Some(moves)
    }

    /// The smallest capacity that keeps `populated` entries within the
    /// maximum load factor.
    fn minimum_capacity(&self, populated: usize) -> usize {
        if populated == 0 {
            return 0;
        }

        let mut capacity = ((populated as f32 / self.max_load_factor) as usize).max(populated);
        while populated as f32 / capacity as f32 > self.max_load_factor {
            capacity += 1;
        }
        capacity
    }
}

/// A view into a single position of a table, which is either occupied or
/// vacant.
///
/// Constructed by [`HashTable::entry`].
pub enum Entry<'a, V> {
    /// The probed sequence contains a value matching the predicate.
    Occupied(OccupiedEntry<'a, V>),
    /// No matching value exists; the entry points at the slot an insertion
    /// would use.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `value` if the entry is vacant and returns a mutable
    /// reference to the stored value either way.
    pub fn or_insert(self, value: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(value),
        }
    }

    /// Inserts the value produced by `default` if the entry is vacant and
    /// returns a mutable reference to the stored value either way.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

/// A view into an occupied table position.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the stored value.
    pub fn get(&self) -> &V {
        match self.table.slots[self.index].get() {
            Some(value) => value,
            // The entry was built from an occupied slot and holds an
            // exclusive borrow of the table.
            None => unreachable!(),
        }
    }

    /// Gets a mutable reference to the stored value.
    pub fn get_mut(&mut self) -> &mut V {
        match self.table.slots[self.index].get_mut() {
            Some(value) => value,
            None => unreachable!(),
        }
    }

    /// Converts the entry into a mutable reference tied to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        match self.table.slots[self.index].get_mut() {
            Some(value) => value,
            None => unreachable!(),
        }
    }

    /// Replaces the stored value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Removes the value, leaving a tombstone in its slot.
    pub fn remove(self) -> V {
        match self.table.slots[self.index].delete() {
            Some(value) => {
                self.table.populated -= 1;
                value
            }
            None => unreachable!(),
        }
    }
}

/// A view into a vacant table position.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts `value` into the slot and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        self.table.slots[self.index].occupy(self.hash, value);
        self.table.populated += 1;
        match self.table.slots[self.index].get_mut() {
            Some(value) => value,
            None => unreachable!(),
        }
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(Slot::get)
    }
}

/// An iterator over every stored value matching a predicate.
///
/// Created by [`HashTable::find_all`].
pub struct FindAll<'a, V, F> {
    inner: core::slice::Iter<'a, Slot<V>>,
    eq: F,
}

impl<'a, V, F> Iterator for FindAll<'a, V, F>
where
    F: Fn(&V) -> bool,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let eq = &self.eq;
        self.inner.by_ref().find_map(|slot| match slot.get() {
            Some(value) if eq(value) => Some(value),
            _ => None,
        })
    }
}

/// A draining iterator over the values of a [`HashTable`].
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> Iterator for Drain<'a, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.table.slots.len() {
            let index = self.index;
            self.index += 1;

            if let Some(value) = self.table.slots[index].clear() {
                self.table.populated -= 1;
                return Some(value);
            }
        }
        None
    }
}

impl<'a, V> Drop for Drain<'a, V> {
    fn drop(&mut self) {
        for _ in self {}
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    /// Inserts `value` using the value itself as its hash, panicking on the
    /// (unreachable with linear probing) full-table error.
    fn insert_value(table: &mut HashTable<u64>, value: u64) {
        table
            .entry(value, |&v| v == value)
            .unwrap()
            .or_insert(value);
    }

    #[test]
    fn new_table_has_default_capacity() {
        let table: HashTable<u64> = HashTable::new();
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.load_factor(), 0.0);
        assert_eq!(table.max_load_factor(), 0.75);
        assert_eq!(table.probe_strategy(), ProbeStrategy::Linear);
    }

    #[test]
    fn zero_capacity_table_grows_on_first_insert() {
        let mut table: HashTable<u64> = HashTable::with_capacity(0);
        assert_eq!(table.capacity(), 0);
        assert_eq!(table.find(1, |&v| v == 1), None);

        insert_value(&mut table, 1);
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert_eq!(table.find(1, |&v| v == 1), Some(&1));
    }

    #[test]
    fn entry_inserts_and_finds() {
        let mut table: HashTable<u64> = HashTable::new();

        for value in 0..10 {
            insert_value(&mut table, value);
            assert_eq!(table.len() as u64, value + 1);
            assert_eq!(table.find(value, |&v| v == value), Some(&value));
        }

        assert_eq!(table.find(99, |&v| v == 99), None);
    }

    #[test]
    fn entry_is_occupied_for_existing_value() {
        let mut table: HashTable<u64> = HashTable::new();
        insert_value(&mut table, 5);

        match table.entry(5, |&v| v == 5).unwrap() {
            Entry::Occupied(entry) => assert_eq!(entry.get(), &5),
            Entry::Vacant(_) => panic!("expected occupied entry"),
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn occupied_entry_replace_and_remove() {
        let mut table: HashTable<(u64, u64)> = HashTable::new();
        table.entry(1, |&(k, _)| k == 1).unwrap().or_insert((1, 10));

        match table.entry(1, |&(k, _)| k == 1).unwrap() {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.insert((1, 20)), (1, 10));
                assert_eq!(entry.get(), &(1, 20));
            }
            Entry::Vacant(_) => panic!("expected occupied entry"),
        }

        match table.entry(1, |&(k, _)| k == 1).unwrap() {
            Entry::Occupied(entry) => assert_eq!(entry.remove(), (1, 20)),
            Entry::Vacant(_) => panic!("expected occupied entry"),
        }
        assert!(table.is_empty());
        assert_eq!(table.find(1, |&(k, _)| k == 1), None);
    }

    #[test]
    fn remove_reports_absent_values() {
        let mut table: HashTable<u64> = HashTable::new();
        insert_value(&mut table, 1);

        assert_eq!(table.remove(1, |&v| v == 1), Some(1));
        assert_eq!(table.remove(1, |&v| v == 1), None);
        assert_eq!(table.remove(2, |&v| v == 2), None);
        assert!(table.is_empty());
    }

    #[test]
    fn lookup_probes_past_tombstones() {
        // Hashes 1 and 17 collide at slot 1 of a 16-slot array under linear
        // probing; 17 settles in slot 2. Removing 1 must not cut 17's chain.
        let mut table: HashTable<u64> = HashTable::with_capacity(16);
        insert_value(&mut table, 1);
        insert_value(&mut table, 17);

        assert_eq!(table.remove(1, |&v| v == 1), Some(1));
        assert_eq!(table.find(17, |&v| v == 17), Some(&17));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn reinsertion_reuses_tombstones_without_growth() {
        let mut table: HashTable<u64> = HashTable::with_capacity(4);
        table.set_max_load_factor(1.0).unwrap();

        for value in 0..4 {
            insert_value(&mut table, value);
        }
        assert_eq!(table.capacity(), 4);

        assert_eq!(table.remove(1, |&v| v == 1), Some(1));
        // 5 % 4 == 1: the new value probes straight into the tombstone.
        insert_value(&mut table, 5);

        assert_eq!(table.capacity(), 4);
        assert_eq!(table.len(), 4);
        assert_eq!(table.find(5, |&v| v == 5), Some(&5));
        for value in [0, 2, 3] {
            assert_eq!(table.find(value, |&v| v == value), Some(&value));
        }
    }

    #[test]
    fn growth_runs_before_the_threshold_insertion() {
        let mut table: HashTable<u64> = HashTable::new();

        for value in 0..12 {
            insert_value(&mut table, value);
            assert!(table.load_factor() <= table.max_load_factor());
        }
        assert_eq!(table.capacity(), 16);

        // 13/16 > 0.75, so the 13th insertion doubles the capacity first.
        insert_value(&mut table, 12);
        assert_eq!(table.capacity(), 32);
        assert_eq!(table.len(), 13);
        assert!(table.load_factor() <= table.max_load_factor());

        for value in 0..13 {
            assert_eq!(table.find(value, |&v| v == value), Some(&value));
        }
    }

    #[test]
    fn rehash_preserves_entries_and_sets_capacity() {
        let mut table: HashTable<u64> = HashTable::new();
        for value in 0..10 {
            insert_value(&mut table, value);
        }

        table.rehash(64).unwrap();
        assert_eq!(table.capacity(), 64);
        assert_eq!(table.len(), 10);
        for value in 0..10 {
            assert_eq!(table.find(value, |&v| v == value), Some(&value));
        }
    }

    #[test]
    fn rehash_rejects_too_small_capacities() {
        let mut table: HashTable<u64> = HashTable::new();
        for value in 0..10 {
            insert_value(&mut table, value);
        }
        table.rehash(64).unwrap();

        // ceil(10 / 0.75) = 14.
        assert_eq!(
            table.rehash(10),
            Err(TableError::CapacityTooSmall {
                requested: 10,
                required: 14,
            })
        );

        // The failed rehash left the table untouched.
        assert_eq!(table.capacity(), 64);
        assert_eq!(table.len(), 10);
        for value in 0..10 {
            assert_eq!(table.find(value, |&v| v == value), Some(&value));
        }

        table.rehash(14).unwrap();
        assert_eq!(table.capacity(), 14);
    }

    #[test]
    fn rehash_drops_tombstones() {
        let mut table: HashTable<u64> = HashTable::with_capacity(16);
        for value in 0..8 {
            insert_value(&mut table, value);
        }
        for value in 0..4 {
            table.remove(value, |&v| v == value);
        }

        table.rehash(16).unwrap();
        assert_eq!(table.len(), 4);
        for value in 4..8 {
            assert_eq!(table.find(value, |&v| v == value), Some(&value));
        }
        // The freshly rehashed array has no tombstones left: a full linear
        // walk for an absent value ends at an empty slot well within bounds.
        assert_eq!(table.find(0, |&v| v == 0), None);
    }

    #[test]
    fn quadratic_probing_can_report_full_before_capacity() {
        // Quadratic(1, 3) only ever reaches 8 of 16 slots from one hash, so
        // a ninth colliding entry exhausts the sequence with room to spare.
        let mut table: HashTable<u64> =
            HashTable::with_capacity_and_probe(16, ProbeStrategy::quadratic());
        table.set_max_load_factor(1.0).unwrap();

        for value in 0..8 {
            table.insert_unique(0, value).unwrap();
        }
        assert_eq!(table.len(), 8);
        assert_eq!(table.capacity(), 16);

        assert_eq!(table.insert_unique(0, 8), Err(TableError::TableFull));
        assert_eq!(table.len(), 8);
        assert_eq!(table.capacity(), 16);
        assert!(matches!(
            table.entry(0, |_| false),
            Err(TableError::TableFull)
        ));
    }

    #[test]
    fn set_max_load_factor_validates_range() {
        let mut table: HashTable<u64> = HashTable::new();

        for invalid in [0.0, -0.5, 1.5, f32::NAN, f32::INFINITY] {
            let result = table.set_max_load_factor(invalid);
            assert!(matches!(result, Err(TableError::InvalidLoadFactor(_))));
        }
        assert_eq!(table.max_load_factor(), 0.75);

        table.set_max_load_factor(1.0).unwrap();
        assert_eq!(table.max_load_factor(), 1.0);
    }

    #[test]
    fn lowering_max_load_factor_grows_immediately() {
        let mut table: HashTable<u64> = HashTable::new();
        for value in 0..12 {
            insert_value(&mut table, value);
        }
        assert_eq!(table.capacity(), 16);

        table.set_max_load_factor(0.5).unwrap();
        assert_eq!(table.capacity(), 32);
        for value in 0..12 {
            assert_eq!(table.find(value, |&v| v == value), Some(&value));
        }
    }

    #[test]
    fn find_all_yields_every_match() {
        let mut table: HashTable<(u64, u32)> = HashTable::new();
        table.insert_unique(7, (7, 1)).unwrap();
        table.insert_unique(7, (7, 2)).unwrap();
        table.insert_unique(8, (8, 1)).unwrap();

        let mut values: Vec<u32> = table
            .find_all(|&(k, _)| k == 7)
            .map(|&(_, v)| v)
            .collect();
        values.sort_unstable();
        assert_eq!(values, [1, 2]);

        assert_eq!(table.find_all(|&(k, _)| k == 7).count(), 2);
        assert_eq!(table.find_all(|&(k, _)| k == 9).count(), 0);
    }

    #[test]
    fn find_all_survives_interleaved_tombstones() {
        let mut table: HashTable<(u64, u32)> = HashTable::with_capacity(16);
        table.insert_unique(3, (3, 1)).unwrap();
        table.insert_unique(3, (9, 0)).unwrap();
        table.insert_unique(3, (3, 2)).unwrap();

        // Tombstone the unrelated entry sitting between the duplicates.
        assert_eq!(table.remove(3, |&(k, _)| k == 9), Some((9, 0)));

        assert_eq!(table.find_all(|&(k, _)| k == 3).count(), 2);
    }

    #[test]
    fn iter_skips_empty_and_deleted_slots() {
        let mut table: HashTable<u64> = HashTable::new();
        for value in 0..6 {
            insert_value(&mut table, value);
        }
        table.remove(0, |&v| v == 0);
        table.remove(3, |&v| v == 3);

        let mut values: Vec<u64> = table.iter().copied().collect();
        values.sort_unstable();
        assert_eq!(values, [1, 2, 4, 5]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut table: HashTable<u64> = HashTable::new();
        for value in 0..10 {
            insert_value(&mut table, value);
        }
        let capacity = table.capacity();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.find(1, |&v| v == 1), None);
    }

    #[test]
    fn drain_empties_the_table() {
        let mut table: HashTable<u64> = HashTable::new();
        for value in 0..8 {
            insert_value(&mut table, value);
        }

        let mut drained: Vec<u64> = table.drain().collect();
        drained.sort_unstable();
        assert_eq!(drained, [0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(table.is_empty());
    }

    #[test]
    fn partially_consumed_drain_still_empties() {
        let mut table: HashTable<u64> = HashTable::new();
        for value in 0..8 {
            insert_value(&mut table, value);
        }

        let mut drain = table.drain();
        drain.next();
        drain.next();
        drop(drain);

        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn reserve_only_grows() {
        let mut table: HashTable<u64> = HashTable::new();
        for value in 0..5 {
            insert_value(&mut table, value);
        }

        table.reserve(100);
        assert!(table.capacity() >= 100);
        let capacity = table.capacity();

        table.reserve(10);
        assert_eq!(table.capacity(), capacity);
        for value in 0..5 {
            assert_eq!(table.find(value, |&v| v == value), Some(&value));
        }
    }

    #[test]
    fn clone_copies_entries_and_configuration() {
        let mut table: HashTable<u64> =
            HashTable::with_capacity_and_probe(32, ProbeStrategy::double_hashing());
        table.set_max_load_factor(0.9).unwrap();
        for value in 0..10 {
            insert_value(&mut table, value);
        }

        let clone = table.clone();
        assert_eq!(clone.len(), 10);
        assert_eq!(clone.capacity(), table.capacity());
        assert_eq!(clone.max_load_factor(), 0.9);
        assert_eq!(clone.probe_strategy(), ProbeStrategy::double_hashing());
        for value in 0..10 {
            assert_eq!(clone.find(value, |&v| v == value), Some(&value));
        }
    }
}
