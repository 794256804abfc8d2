use alloc::boxed::Box;
use alloc::vec;
#[cfg(any(test, feature = "stats"))]
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::word::Word;

/// Debug statistics for probe-length analysis.
///
/// Compiled with `cfg(test)` or the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of keys currently stored
    pub populated: usize,
    /// Length of the backing array
    pub capacity: usize,
    /// Fill ratio (populated / capacity)
    pub load_factor: f64,
    /// Largest displacement of any key from its preferred bucket
    pub max_probe_length: usize,
    /// Mean displacement over all stored keys
    pub mean_probe_length: f64,
    /// Length of the longest run of consecutive occupied slots
    pub longest_cluster: usize,
    /// Bytes used by the backing array
    pub total_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Set Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Probe length: {:.3} mean, {} max",
            self.mean_probe_length, self.max_probe_length
        );
        println!("Longest cluster: {} slots", self.longest_cluster);
        println!("Total Allocated: {} bytes", self.total_bytes);
    }
}

/// The backing array shared by every probing policy.
///
/// A fixed-length run of words where `0` marks an empty slot and any other
/// value is a stored hash code. All bucket arithmetic lives here so the
/// policies never compute indices on their own.
///
/// One slot is always kept free: [`has_vacancy`](Self::has_vacancy) refuses
/// the insertion that would fill the last empty slot, so every probe scan is
/// guaranteed to meet an empty slot.
#[derive(Clone)]
pub struct Table<W> {
    slots: Box<[W]>,
    populated: usize,
}

impl<W: Word> Debug for Table<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;
        use alloc::vec::Vec;

        f.debug_struct("Table")
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .enumerate()
                    .map(|(index, &hash)| {
                        if hash.is_empty() {
                            String::from("..")
                        } else {
                            format!("{index:>4}: {hash:#x} -> {}", self.preferred(hash))
                        }
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<W: Word> Table<W> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: vec![W::EMPTY; capacity].into_boxed_slice(),
            populated: 0,
        }
    }

    /// Length of the backing array.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if no slot is occupied.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// The raw slots, `0` for empty.
    #[inline(always)]
    pub fn slots(&self) -> &[W] {
        &self.slots
    }

    /// Returns `true` if one more key can be stored without using up the
    /// reserved free slot.
    #[inline(always)]
    pub fn has_vacancy(&self) -> bool {
        self.populated + 1 < self.capacity()
    }

    #[inline(always)]
    pub(crate) fn get(&self, bucket: usize) -> W {
        debug_assert!(bucket < self.capacity());
        self.slots[bucket]
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, bucket: usize, hash: W) {
        debug_assert!(bucket < self.capacity());
        self.slots[bucket] = hash;
    }

    /// Copies the word at `src` into `dst`, leaving `src` untouched.
    #[inline(always)]
    pub(crate) fn copy(&mut self, src: usize, dst: usize) {
        self.slots[dst] = self.slots[src];
    }

    #[inline(always)]
    pub(crate) fn is_vacant(&self, bucket: usize) -> bool {
        self.get(bucket).is_empty()
    }

    /// The ideal home of `hash`: `floor(hash * capacity / 2^W)`.
    #[inline(always)]
    pub fn preferred(&self, hash: W) -> usize {
        debug_assert!(!hash.is_empty());
        hash.fast_range(self.capacity())
    }

    /// The bucket after `bucket`, wrapping to `0`.
    #[inline(always)]
    pub(crate) fn next(&self, bucket: usize) -> usize {
        if bucket + 1 == self.capacity() {
            0
        } else {
            bucket + 1
        }
    }

    /// The bucket before `bucket`, wrapping to the end.
    #[inline(always)]
    pub(crate) fn prev(&self, bucket: usize) -> usize {
        if bucket == 0 {
            self.capacity() - 1
        } else {
            bucket - 1
        }
    }

    /// `(bucket + offset) mod capacity` for `offset <= capacity`.
    #[inline(always)]
    pub(crate) fn offset(&self, bucket: usize, offset: usize) -> usize {
        debug_assert!(offset <= self.capacity());
        let target = bucket + offset;
        if target >= self.capacity() {
            target - self.capacity()
        } else {
            target
        }
    }

    /// Forward cyclic distance from the preferred bucket of `hash` to
    /// `bucket`.
    #[inline(always)]
    pub(crate) fn probe_distance(&self, hash: W, bucket: usize) -> usize {
        let preferred = self.preferred(hash);
        if preferred > bucket {
            self.capacity() - preferred + bucket
        } else {
            bucket - preferred
        }
    }

    #[inline(always)]
    pub(crate) fn record_insert(&mut self) {
        self.populated += 1;
        debug_assert!(self.populated < self.capacity());
    }

    #[inline(always)]
    pub(crate) fn record_remove(&mut self) {
        debug_assert!(self.populated > 0);
        self.populated -= 1;
    }

    pub(crate) fn clear(&mut self) {
        self.slots.fill(W::EMPTY);
        self.populated = 0;
    }

    /// Computes a histogram of probe lengths for the current table state.
    ///
    /// Compiled with `cfg(test)` or the `stats` feature.
    ///
    /// `displacement` measures how far the key in an occupied bucket sits
    /// from its preferred bucket, as the owning policy defines it. The
    /// returned vector has one bin per displacement `0..=max`.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self, displacement: impl Fn(&Self, usize) -> usize) -> Vec<usize> {
        let mut hist = Vec::new();
        for bucket in 0..self.capacity() {
            if self.is_vacant(bucket) {
                continue;
            }
            let distance = displacement(self, bucket);
            if distance >= hist.len() {
                hist.resize(distance + 1, 0);
            }
            hist[distance] += 1;
        }
        hist
    }

    /// Returns probe-length and clustering statistics.
    ///
    /// Compiled with `cfg(test)` or the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self, displacement: impl Fn(&Self, usize) -> usize) -> DebugStats {
        let hist = self.probe_histogram(displacement);
        let total: usize = hist.iter().enumerate().map(|(d, &n)| d * n).sum();

        let mut longest_cluster = 0;
        let mut run = 0;
        for &slot in self.slots.iter() {
            if slot.is_empty() {
                run = 0;
            } else {
                run += 1;
                longest_cluster = longest_cluster.max(run);
            }
        }

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            load_factor: if self.capacity() == 0 {
                0.0
            } else {
                self.populated as f64 / self.capacity() as f64
            },
            max_probe_length: hist.len().saturating_sub(1),
            mean_probe_length: if self.populated == 0 {
                0.0
            } else {
                total as f64 / self.populated as f64
            },
            longest_cluster,
            total_bytes: core::mem::size_of_val(&*self.slots),
        }
    }

    /// Pretty-prints a probe histogram horizontally using stdout.
    ///
    /// Requires the `std` feature.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_probe_histogram(&self, hist: &[usize]) {
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("probe histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!("probe histogram ({} entries):", self.populated);

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let full = units / 8;
            let rem = units % 8;
            let mut bar = "█".repeat(full);
            if rem > 0 {
                let ch = match rem {
                    1 => '▏',
                    2 => '▎',
                    3 => '▍',
                    4 => '▌',
                    5 => '▋',
                    6 => '▊',
                    7 => '▉',
                    _ => unreachable!(),
                };
                bar.push(ch);
            }
            bar
        };

        for (i, &count) in hist.iter().enumerate() {
            println!("{:>3} | {} ({})", i, make_bar(count), count);
        }
    }
}
