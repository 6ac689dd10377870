//! Error kinds reported by fallible table operations.
//!
//! Absence is normally reported through `Option`/`bool` returns; only the
//! strict accessors and the configuration/insertion paths that can actually
//! fail return a [`TableError`].

/// The error type for table operations.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum TableError {
    /// A strict lookup (`at`/`at_mut`) did not find the requested key.
    #[error("key not found")]
    KeyNotFound,

    /// A maximum load factor outside `(0, 1]` was rejected.
    #[error("max load factor must be within (0, 1], got {0}")]
    InvalidLoadFactor(f32),

    /// An explicit rehash requested a capacity too small to hold the
    /// resident entries under the current maximum load factor.
    #[error("capacity {requested} is below the minimum of {required} for the resident entries")]
    CapacityTooSmall {
        /// The capacity passed to `rehash`.
        requested: usize,
        /// The smallest capacity that keeps the table within its maximum
        /// load factor.
        required: usize,
    },

    /// The bounded probe sequence was exhausted without locating a free
    /// slot or a reusable tombstone.
    ///
    /// Growth runs before every insertion, so this is only reachable with a
    /// probe strategy whose sequence does not cover the full index space
    /// (e.g. quadratic probing on a power-of-two capacity). The failing
    /// operation leaves the table unchanged.
    #[error("probe sequence exhausted without locating a free slot")]
    TableFull,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_names_the_condition() {
        assert_eq!(TableError::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            TableError::InvalidLoadFactor(1.5).to_string(),
            "max load factor must be within (0, 1], got 1.5"
        );
        assert_eq!(
            TableError::CapacityTooSmall {
                requested: 4,
                required: 16
            }
            .to_string(),
            "capacity 4 is below the minimum of 16 for the resident entries"
        );
    }

    #[test]
    fn errors_compare_by_kind_and_payload() {
        assert_eq!(TableError::KeyNotFound, TableError::KeyNotFound);
        assert_ne!(
            TableError::InvalidLoadFactor(0.0),
            TableError::InvalidLoadFactor(2.0)
        );
    }
}
