//! Keyed reversible hashers built on the Speck lightweight block ciphers.
//!
//! A block cipher under a fixed key is a permutation of its block space, so
//! encrypting a key is a reversible hash whose bucket placement an outsider
//! cannot predict without the key. Speck32/64 covers `u32` keys and
//! Speck64/128 covers `u64` keys.
//!
//! Words are packed big-end first: the high half of the block is `x`, the low
//! half is `y`, matching the published test vectors.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Error;
use crate::error::Result;
use crate::hasher::ReversibleHasher;

macro_rules! speck_schedule {
    ($name:ident, $word:ty, $alpha:expr, $beta:expr) => {
        fn $name(key_words: [$word; 4], rounds: usize) -> Vec<$word> {
            let mut k = Vec::with_capacity(rounds);
            let mut l = Vec::with_capacity(rounds + 2);
            k.push(key_words[0]);
            l.extend_from_slice(&key_words[1..]);
            for i in 0..rounds - 1 {
                let next = k[i].wrapping_add(l[i].rotate_right($alpha)) ^ (i as $word);
                l.push(next);
                k.push(k[i].rotate_left($beta) ^ next);
            }
            k
        }
    };
}

speck_schedule!(expand_key_32_64, u16, 7, 2);
speck_schedule!(expand_key_64_128, u32, 8, 3);

/// Speck32/64 as a permutation of `u32`.
#[derive(Clone)]
pub struct SpeckIntHasher {
    round_keys: Vec<u16>,
}

impl SpeckIntHasher {
    const ALPHA: u32 = 7;
    const BETA: u32 = 2;
    const DEFAULT_KEY: u64 = 0xa9cd_74fa_cf61_afe0;
    const DEFAULT_ROUNDS: usize = 22;

    /// Creates a hasher keyed with a 64-bit key and running `rounds` rounds.
    ///
    /// # Panics
    ///
    /// Panics if `rounds` is zero.
    pub fn new(key: u64, rounds: usize) -> Self {
        assert!(rounds > 0, "Speck needs at least one round");
        let key_words = [
            key as u16,
            (key >> 16) as u16,
            (key >> 32) as u16,
            (key >> 48) as u16,
        ];
        Self {
            round_keys: expand_key_32_64(key_words, rounds),
        }
    }

    fn encrypt(&self, block: u32) -> u32 {
        let mut x = (block >> 16) as u16;
        let mut y = block as u16;
        for &k in &self.round_keys {
            x = x.rotate_right(Self::ALPHA).wrapping_add(y) ^ k;
            y = y.rotate_left(Self::BETA) ^ x;
        }
        ((x as u32) << 16) | y as u32
    }

    fn decrypt(&self, block: u32) -> u32 {
        let mut x = (block >> 16) as u16;
        let mut y = block as u16;
        for &k in self.round_keys.iter().rev() {
            y = (x ^ y).rotate_right(Self::BETA);
            x = (x ^ k).wrapping_sub(y).rotate_left(Self::ALPHA);
        }
        ((x as u32) << 16) | y as u32
    }
}

impl Default for SpeckIntHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY, Self::DEFAULT_ROUNDS)
    }
}

impl Debug for SpeckIntHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpeckIntHasher")
            .field("rounds", &self.round_keys.len())
            .finish_non_exhaustive()
    }
}

impl ReversibleHasher<u32> for SpeckIntHasher {
    fn hash(&self, x: u32) -> Result<u32> {
        if x == 0 {
            return Err(Error::InvalidKey);
        }
        match self.encrypt(x) {
            0 => Err(Error::InvalidKey),
            h => Ok(h),
        }
    }

    fn unhash(&self, y: u32) -> Result<u32> {
        if y == 0 {
            return Err(Error::InvalidKey);
        }
        match self.decrypt(y) {
            0 => Err(Error::InvalidKey),
            x => Ok(x),
        }
    }
}

/// Speck64/128 as a permutation of `u64`.
#[derive(Clone)]
pub struct SpeckLongHasher {
    round_keys: Vec<u32>,
}

impl SpeckLongHasher {
    const ALPHA: u32 = 8;
    const BETA: u32 = 3;
    const DEFAULT_KEY: u128 = 0x1b1a_1918_1312_1110_0b0a_0908_0302_0100;
    const DEFAULT_ROUNDS: usize = 27;

    /// Creates a hasher keyed with a 128-bit key and running `rounds` rounds.
    ///
    /// # Panics
    ///
    /// Panics if `rounds` is zero.
    pub fn new(key: u128, rounds: usize) -> Self {
        assert!(rounds > 0, "Speck needs at least one round");
        let key_words = [
            key as u32,
            (key >> 32) as u32,
            (key >> 64) as u32,
            (key >> 96) as u32,
        ];
        Self {
            round_keys: expand_key_64_128(key_words, rounds),
        }
    }

    fn encrypt(&self, block: u64) -> u64 {
        let mut x = (block >> 32) as u32;
        let mut y = block as u32;
        for &k in &self.round_keys {
            x = x.rotate_right(Self::ALPHA).wrapping_add(y) ^ k;
            y = y.rotate_left(Self::BETA) ^ x;
        }
        ((x as u64) << 32) | y as u64
    }

    fn decrypt(&self, block: u64) -> u64 {
        let mut x = (block >> 32) as u32;
        let mut y = block as u32;
        for &k in self.round_keys.iter().rev() {
            y = (x ^ y).rotate_right(Self::BETA);
            x = (x ^ k).wrapping_sub(y).rotate_left(Self::ALPHA);
        }
        ((x as u64) << 32) | y as u64
    }
}

impl Default for SpeckLongHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEY, Self::DEFAULT_ROUNDS)
    }
}

impl Debug for SpeckLongHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpeckLongHasher")
            .field("rounds", &self.round_keys.len())
            .finish_non_exhaustive()
    }
}

impl ReversibleHasher<u64> for SpeckLongHasher {
    fn hash(&self, x: u64) -> Result<u64> {
        if x == 0 {
            return Err(Error::InvalidKey);
        }
        match self.encrypt(x) {
            0 => Err(Error::InvalidKey),
            h => Ok(h),
        }
    }

    fn unhash(&self, y: u64) -> Result<u64> {
        if y == 0 {
            return Err(Error::InvalidKey);
        }
        match self.decrypt(y) {
            0 => Err(Error::InvalidKey),
            x => Ok(x),
        }
    }
}
