//! Reversible hash functions.
//!
//! A set stores `hash(key)` and recovers the key with `unhash`, so every
//! hasher here is a bijection on the nonzero words of its width. None of them
//! are cryptographically strong; they only need to mix bits well enough for
//! the fast range reduction in [`Word::fast_range`](crate::word::Word::fast_range)
//! to spread keys across buckets.
//!
//! Multiplicative inverses were computed with Newton's iteration modulo
//! `2^32`/`2^64`; xorshift steps are undone by repeating the shift until it
//! runs off the word.

use crate::error::Error;
use crate::error::Result;
use crate::word::Word;

/// A bijection over the nonzero `W` words, with its inverse.
///
/// `unhash(hash(x)) == x` for every nonzero `x`. Both directions reject the
/// empty sentinel `0` with [`Error::InvalidKey`], except for the identity
/// hashers which map it to itself. `Clone` must produce an independent hasher
/// with identical behaviour; keyed hashers copy their key schedule.
pub trait ReversibleHasher<W: Word>: Clone {
    /// Permutes `x`.
    fn hash(&self, x: W) -> Result<W>;

    /// Inverts [`hash`](Self::hash).
    fn unhash(&self, y: W) -> Result<W>;
}

#[inline(always)]
fn nonzero<W: Word>(x: W) -> Result<W> {
    if x.is_empty() {
        Err(Error::InvalidKey)
    } else {
        Ok(x)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "default-hasher-phi")] {
        /// Hasher used by the 32-bit sets when none is given.
        pub type DefaultIntHasher = PhiIntHasher;
        /// Hasher used by the 64-bit sets when none is given.
        pub type DefaultLongHasher = PhiLongHasher;
    } else {
        /// Hasher used by the 32-bit sets when none is given.
        pub type DefaultIntHasher = Murmur3IntHasher;
        /// Hasher used by the 64-bit sets when none is given.
        pub type DefaultLongHasher = Murmur3LongHasher;
    }
}

/// The identity permutation on `u32`. Maps `0` to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityIntHasher;

impl ReversibleHasher<u32> for IdentityIntHasher {
    #[inline]
    fn hash(&self, x: u32) -> Result<u32> {
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u32) -> Result<u32> {
        Ok(y)
    }
}

/// The identity permutation on `u64`. Maps `0` to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLongHasher;

impl ReversibleHasher<u64> for IdentityLongHasher {
    #[inline]
    fn hash(&self, x: u64) -> Result<u64> {
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u64) -> Result<u64> {
        Ok(y)
    }
}

/// MurmurHash3 32-bit finalizer (`fmix32`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Murmur3IntHasher;

impl ReversibleHasher<u32> for Murmur3IntHasher {
    #[inline]
    fn hash(&self, x: u32) -> Result<u32> {
        let mut x = nonzero(x)?;
        x ^= x >> 16;
        x = x.wrapping_mul(0x85eb_ca6b);
        x ^= x >> 13;
        x = x.wrapping_mul(0xc2b2_ae35);
        x ^= x >> 16;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u32) -> Result<u32> {
        let mut x = nonzero(y)?;
        x ^= x >> 16;
        x = x.wrapping_mul(0x7ed1_b41d);
        x ^= (x >> 13) ^ (x >> 26);
        x = x.wrapping_mul(0xa5cb_9243);
        x ^= x >> 16;
        Ok(x)
    }
}

/// Multiply by the 32-bit golden ratio, then fold the high half down.
///
/// Quasi-uniform on sequential integers, which makes it a cheap way to turn
/// `1..=n` into a duplicate-free pseudo-random sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhiIntHasher;

const INT_PHI: u32 = 0x9e37_79b9;
const INV_INT_PHI: u32 = 0x144c_bc89;

impl ReversibleHasher<u32> for PhiIntHasher {
    #[inline]
    fn hash(&self, x: u32) -> Result<u32> {
        let mut x = nonzero(x)?;
        x = x.wrapping_mul(INT_PHI);
        x ^= x >> 16;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u32) -> Result<u32> {
        let mut x = nonzero(y)?;
        x ^= x >> 16;
        x = x.wrapping_mul(INV_INT_PHI);
        Ok(x)
    }
}

/// The integer mixer used by the H2 database.
#[derive(Debug, Clone, Copy, Default)]
pub struct H2IntHasher;

impl ReversibleHasher<u32> for H2IntHasher {
    #[inline]
    fn hash(&self, x: u32) -> Result<u32> {
        let mut x = nonzero(x)?;
        x ^= x >> 16;
        x = x.wrapping_mul(0x045d_9f3b);
        x ^= x >> 16;
        x = x.wrapping_mul(0x045d_9f3b);
        x ^= x >> 16;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u32) -> Result<u32> {
        let mut x = nonzero(y)?;
        x ^= x >> 16;
        x = x.wrapping_mul(0x119d_e1f3);
        x ^= x >> 16;
        x = x.wrapping_mul(0x119d_e1f3);
        x ^= x >> 16;
        Ok(x)
    }
}

/// Best two-round function found by hash-prospector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prospector2RoundIntHasher;

impl ReversibleHasher<u32> for Prospector2RoundIntHasher {
    #[inline]
    fn hash(&self, x: u32) -> Result<u32> {
        let mut x = nonzero(x)?;
        x ^= x >> 16;
        x = x.wrapping_mul(0x7feb_352d);
        x ^= x >> 15;
        x = x.wrapping_mul(0x846c_a68b);
        x ^= x >> 16;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u32) -> Result<u32> {
        let mut x = nonzero(y)?;
        x ^= x >> 16;
        x = x.wrapping_mul(0x4302_1123);
        x ^= (x >> 15) ^ (x >> 30);
        x = x.wrapping_mul(0x1d69_e2a5);
        x ^= x >> 16;
        Ok(x)
    }
}

/// Best three-round function found by hash-prospector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prospector3RoundIntHasher;

impl ReversibleHasher<u32> for Prospector3RoundIntHasher {
    #[inline]
    fn hash(&self, x: u32) -> Result<u32> {
        let mut x = nonzero(x)?;
        x ^= x >> 17;
        x = x.wrapping_mul(0xed5a_d4bb);
        x ^= x >> 11;
        x = x.wrapping_mul(0xac4c_1b51);
        x ^= x >> 15;
        x = x.wrapping_mul(0x3184_8bab);
        x ^= x >> 14;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u32) -> Result<u32> {
        let mut x = nonzero(y)?;
        x ^= (x >> 14) ^ (x >> 28);
        x = x.wrapping_mul(0x32b2_1703);
        x ^= (x >> 15) ^ (x >> 30);
        x = x.wrapping_mul(0x469e_0db1);
        x ^= (x >> 11) ^ (x >> 22);
        x = x.wrapping_mul(0x79a8_5073);
        x ^= x >> 17;
        Ok(x)
    }
}

/// MurmurHash3 64-bit finalizer (`fmix64`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Murmur3LongHasher;

impl ReversibleHasher<u64> for Murmur3LongHasher {
    #[inline]
    fn hash(&self, x: u64) -> Result<u64> {
        let mut x = nonzero(x)?;
        x ^= x >> 33;
        x = x.wrapping_mul(0xff51_afd7_ed55_8ccd);
        x ^= x >> 33;
        x = x.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
        x ^= x >> 33;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u64) -> Result<u64> {
        let mut x = nonzero(y)?;
        x ^= x >> 33;
        x = x.wrapping_mul(0x9cb4_b2f8_1293_37db);
        x ^= x >> 33;
        x = x.wrapping_mul(0x4f74_430c_22a5_4005);
        x ^= x >> 33;
        Ok(x)
    }
}

/// Variant 13 of the Murmur3 64-bit finalizer (Stafford's mix13, as used by
/// SplitMix64).
#[derive(Debug, Clone, Copy, Default)]
pub struct Variant13LongHasher;

impl ReversibleHasher<u64> for Variant13LongHasher {
    #[inline]
    fn hash(&self, x: u64) -> Result<u64> {
        let mut x = nonzero(x)?;
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
        x ^= x >> 31;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u64) -> Result<u64> {
        let mut x = nonzero(y)?;
        x ^= (x >> 31) ^ (x >> 62);
        x = x.wrapping_mul(0x3196_42b2_d24d_8ec3);
        x ^= (x >> 27) ^ (x >> 54);
        x = x.wrapping_mul(0x96de_1b17_3f11_9089);
        x ^= (x >> 30) ^ (x >> 60);
        Ok(x)
    }
}

/// degski's 64-bit xorshift-multiply mixer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegskiLongHasher;

impl ReversibleHasher<u64> for DegskiLongHasher {
    #[inline]
    fn hash(&self, x: u64) -> Result<u64> {
        let mut x = nonzero(x)?;
        x ^= x >> 32;
        x = x.wrapping_mul(0xd6e8_feb8_6659_fd93);
        x ^= x >> 32;
        x = x.wrapping_mul(0xd6e8_feb8_6659_fd93);
        x ^= x >> 32;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u64) -> Result<u64> {
        let mut x = nonzero(y)?;
        x ^= x >> 32;
        x = x.wrapping_mul(0xcfee_444d_8b59_a89b);
        x ^= x >> 32;
        x = x.wrapping_mul(0xcfee_444d_8b59_a89b);
        x ^= x >> 32;
        Ok(x)
    }
}

/// Multiply by the 64-bit golden ratio and mix the high bits into the low.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhiLongHasher;

const LONG_PHI: u64 = 0x9e37_79b9_7f4a_7c15;
const INV_LONG_PHI: u64 = 0xf1de_83e1_9937_733d;

impl ReversibleHasher<u64> for PhiLongHasher {
    #[inline]
    fn hash(&self, x: u64) -> Result<u64> {
        let mut x = nonzero(x)?;
        x = x.wrapping_mul(LONG_PHI);
        x ^= x >> 32;
        x ^= x >> 16;
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u64) -> Result<u64> {
        let mut x = nonzero(y)?;
        x ^= x >> 32;
        x ^= x >> 16;
        x ^= x >> 32;
        x = x.wrapping_mul(INV_LONG_PHI);
        Ok(x)
    }
}

/// Thomas Wang's 64-bit integer hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct WangLongHasher;

impl ReversibleHasher<u64> for WangLongHasher {
    #[inline]
    fn hash(&self, x: u64) -> Result<u64> {
        let mut x = nonzero(x)?;
        x = (!x).wrapping_add(x << 21);
        x ^= x >> 24;
        x = x.wrapping_mul(265);
        x ^= x >> 14;
        x = x.wrapping_mul(21);
        x ^= x >> 28;
        x = x.wrapping_add(x << 31);
        Ok(x)
    }

    #[inline]
    fn unhash(&self, y: u64) -> Result<u64> {
        let mut x = nonzero(y)?;

        // x + (x << 31)
        let tmp = x.wrapping_sub(x << 31);
        x = x.wrapping_sub(tmp << 31);

        // x ^ (x >> 28)
        let tmp = x ^ (x >> 28);
        x ^= tmp >> 28;

        // x * 21
        x = x.wrapping_mul(0xcf3c_f3cf_3cf3_cf3d);

        // x ^ (x >> 14)
        let mut tmp = x ^ (x >> 14);
        tmp = x ^ (tmp >> 14);
        tmp = x ^ (tmp >> 14);
        x ^= tmp >> 14;

        // x * 265
        x = x.wrapping_mul(0xd38f_f08b_1c03_dd39);

        // x ^ (x >> 24)
        let tmp = x ^ (x >> 24);
        x ^= tmp >> 24;

        // !x + (x << 21)
        let mut tmp = !x;
        tmp = !(x.wrapping_sub(tmp << 21));
        tmp = !(x.wrapping_sub(tmp << 21));
        x = !(x.wrapping_sub(tmp << 21));

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::speck::SpeckIntHasher;
    use crate::speck::SpeckLongHasher;

    const SAMPLE_SIZE: usize = 1 << 12;
    const SEED: u64 = 0xdead_beef_cafe_babe;

    fn check_int_inverse<H: ReversibleHasher<u32>>(name: &str, hasher: H, exempt_zero: bool) {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let edges = [1u32, u32::MAX, 0x8000_0000, 0x7fff_ffff, 2];
        let sample = edges
            .into_iter()
            .chain((0..SAMPLE_SIZE).map(|_| rng.random::<u32>()))
            .filter(|&x| x != 0);
        for x in sample {
            let Ok(h) = hasher.hash(x) else {
                // keyed ciphers reject the one input that encrypts to zero
                continue;
            };
            assert_ne!(h, 0, "{name}: {x} hashed to the sentinel");
            assert_eq!(hasher.unhash(h), Ok(x), "{name}: inverting hash for {x}");
        }
        if exempt_zero {
            assert_eq!(hasher.hash(0), Ok(0), "{name}");
            assert_eq!(hasher.unhash(0), Ok(0), "{name}");
        } else {
            assert_eq!(hasher.hash(0), Err(Error::InvalidKey), "{name}");
            assert_eq!(hasher.unhash(0), Err(Error::InvalidKey), "{name}");
        }
    }

    fn check_long_inverse<H: ReversibleHasher<u64>>(name: &str, hasher: H, exempt_zero: bool) {
        let mut rng = SmallRng::seed_from_u64(SEED);
        let edges = [1u64, u64::MAX, 0x8000_0000_0000_0000, u32::MAX as u64, 2];
        let sample = edges
            .into_iter()
            .chain((0..SAMPLE_SIZE).map(|_| rng.random::<u64>()))
            .filter(|&x| x != 0);
        for x in sample {
            let Ok(h) = hasher.hash(x) else {
                continue;
            };
            assert_ne!(h, 0, "{name}: {x} hashed to the sentinel");
            assert_eq!(hasher.unhash(h), Ok(x), "{name}: inverting hash for {x}");
        }
        if exempt_zero {
            assert_eq!(hasher.hash(0), Ok(0), "{name}");
            assert_eq!(hasher.unhash(0), Ok(0), "{name}");
        } else {
            assert_eq!(hasher.hash(0), Err(Error::InvalidKey), "{name}");
            assert_eq!(hasher.unhash(0), Err(Error::InvalidKey), "{name}");
        }
    }

    #[test]
    fn int_hashers_invert() {
        check_int_inverse("identity", IdentityIntHasher, true);
        check_int_inverse("murmur3", Murmur3IntHasher, false);
        check_int_inverse("phi", PhiIntHasher, false);
        check_int_inverse("h2", H2IntHasher, false);
        check_int_inverse("prospector2", Prospector2RoundIntHasher, false);
        check_int_inverse("prospector3", Prospector3RoundIntHasher, false);
        check_int_inverse("speck", SpeckIntHasher::default(), false);
    }

    #[test]
    fn long_hashers_invert() {
        check_long_inverse("identity", IdentityLongHasher, true);
        check_long_inverse("murmur3", Murmur3LongHasher, false);
        check_long_inverse("variant13", Variant13LongHasher, false);
        check_long_inverse("degski", DegskiLongHasher, false);
        check_long_inverse("phi", PhiLongHasher, false);
        check_long_inverse("wang", WangLongHasher, false);
        check_long_inverse("speck", SpeckLongHasher::default(), false);
    }

    #[test]
    fn known_outputs() {
        assert_eq!(Murmur3IntHasher.hash(1), Ok(1_364_076_727));
        assert_eq!(PhiIntHasher.hash(5), Ok(387_282_824));
        assert_eq!(Murmur3LongHasher.hash(1), Ok(12_994_781_566_227_106_604));
        assert_eq!(WangLongHasher.hash(5), Ok(14_624_617_963_293_649_152));
    }

    #[test]
    fn clone_behaves_identically() {
        let original = Murmur3LongHasher;
        let cloned = original.clone();
        for x in 1..100u64 {
            assert_eq!(original.hash(x), cloned.hash(x));
        }
    }
}
