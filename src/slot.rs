use core::mem;

/// A single storage cell in the slot array.
///
/// A slot is either `Empty` (never written, or explicitly cleared),
/// `Deleted` (a tombstone left behind by removal), or `Occupied` with a live
/// value and its cached hash. The payload exists exactly when the slot is
/// `Occupied`; every transition out of `Occupied` hands the payload back to
/// the caller instead of dropping it silently.
///
/// The distinction between `Empty` and `Deleted` is load-bearing for open
/// addressing: an `Empty` slot terminates a probe walk, while a `Deleted`
/// slot must be skipped so that entries inserted past it remain reachable.
#[derive(Debug, Clone, Default)]
pub(crate) enum Slot<V> {
    #[default]
    Empty,
    Deleted,
    Occupied {
        hash: u64,
        value: V,
    },
}

impl<V> Slot<V> {
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    pub(crate) fn is_deleted(&self) -> bool {
        matches!(self, Slot::Deleted)
    }

    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Returns the stored value, or `None` unless the slot is occupied.
    pub(crate) fn get(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns the hash cached alongside an occupied value.
    pub(crate) fn hash(&self) -> Option<u64> {
        match self {
            Slot::Occupied { hash, .. } => Some(*hash),
            _ => None,
        }
    }

    /// Stores `value` and marks the slot occupied, returning any payload the
    /// slot held before.
    pub(crate) fn occupy(&mut self, hash: u64, value: V) -> Option<V> {
        mem::replace(self, Slot::Occupied { hash, value }).into_value()
    }

    /// Marks the slot as a tombstone, returning the payload if there was one.
    ///
    /// A tombstone is not reusable as a probe terminator; it only becomes a
    /// candidate insertion point again through the insertion path.
    pub(crate) fn delete(&mut self) -> Option<V> {
        mem::replace(self, Slot::Deleted).into_value()
    }

    /// Resets the slot to `Empty`, returning the payload if there was one.
    pub(crate) fn clear(&mut self) -> Option<V> {
        mem::replace(self, Slot::Empty).into_value()
    }

    pub(crate) fn into_value(self) -> Option<V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }
}
