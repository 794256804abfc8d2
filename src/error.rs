/// Errors reported by the reversible hashers and the sets built on them.
///
/// Both kinds are detected before the table is touched, so a failed call
/// leaves the set exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The key is the reserved empty sentinel, or its permuted image is.
    ///
    /// Stored hash codes double as the occupancy marker, so `0` can never be
    /// hashed into or out of a table.
    #[error("key maps to the reserved empty sentinel")]
    InvalidKey,

    /// No free slot is left for a new key.
    ///
    /// Capacity is fixed at construction; hitting this means the set was
    /// sized with too few entries or too high a load factor.
    #[error("table is full (capacity {capacity})")]
    TableFull {
        /// Length of the backing array.
        capacity: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
