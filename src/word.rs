//! Machine words that can be stored in a table.
//!
//! A stored word is a permuted key, and doubles as the hash code used to find
//! its bucket. `0` marks an empty slot.
//!
//! Bucket selection uses Lemire's fast range reduction: the high word of
//! `hash * capacity`. It is not the same as `hash % capacity`; sequential
//! hashes land in the same bucket, which is why keys are always permuted
//! before they are stored.

use core::fmt::Debug;
use core::fmt::Display;
use core::fmt::LowerHex;
use core::hash::Hash;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// An unsigned word width supported by the sets (`u32` or `u64`).
///
/// Ordering is the native unsigned ordering, which is what bidirectional
/// linear probing sorts its chains by.
pub trait Word:
    Copy + Eq + Ord + Hash + Debug + Display + LowerHex + Default + sealed::Sealed + 'static
{
    /// The empty-slot sentinel.
    const EMPTY: Self;

    /// Width in bits.
    const BITS: u32;

    /// Maps `self` into `[0, n)` via the high word of `self * n`.
    ///
    /// `n` must be non-zero.
    fn fast_range(self, n: usize) -> usize;

    /// Unsigned absolute difference.
    fn abs_diff(self, other: Self) -> Self;

    /// Returns `true` if this is the empty sentinel.
    #[inline(always)]
    fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

macro_rules! impl_word {
    ($ty:ty) => {
        impl Word for $ty {
            const EMPTY: Self = 0;
            const BITS: u32 = <$ty>::BITS;

            #[inline(always)]
            fn fast_range(self, n: usize) -> usize {
                debug_assert!(n > 0);
                let product = (self as u128).wrapping_mul(n as u128);
                (product >> Self::BITS) as usize
            }

            #[inline(always)]
            fn abs_diff(self, other: Self) -> Self {
                <$ty>::abs_diff(self, other)
            }
        }
    };
}

impl_word!(u32);
impl_word!(u64);
