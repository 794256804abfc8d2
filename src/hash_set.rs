use alloc::boxed::Box;
#[cfg(any(test, feature = "stats"))]
use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;

use tracing::debug;
use tracing::warn;

use crate::bidirectional::Bidirectional;
use crate::error::Error;
use crate::error::Result;
use crate::hasher::DefaultIntHasher;
use crate::hasher::DefaultLongHasher;
use crate::hasher::ReversibleHasher;
use crate::lcfs::Lcfs;
use crate::linear::LinearProbing;
use crate::policy::Policy;
use crate::policy::Probe;
use crate::robin_hood::RobinHood;
#[cfg(any(test, feature = "stats"))]
use crate::table::DebugStats;
use crate::table::Table;
use crate::word::Word;

/// A fixed-capacity integer set that stores only permuted keys.
///
/// `IntHashSet<W, P, H>` keeps keys of width `W` in a single array of `W`.
/// Each key is passed through the reversible hasher `H` and the result is
/// stored as is: it is the hash code that picks the bucket, and `H::unhash`
/// turns it back into the key. No separate key or hash field exists, and the
/// value `0` marks an empty slot.
///
/// The probing policy `P` decides how chains are built and repaired. Deletion
/// never leaves tombstones.
///
/// The set never grows. Its capacity is `floor(max_entries / load_factor)`,
/// and one slot always stays free, so at most `capacity - 1` keys fit.
///
/// # Examples
///
/// ```rust
/// use perm_set::Error;
/// use perm_set::RhLongHashSet;
///
/// let mut set: RhLongHashSet = RhLongHashSet::new(9, 0.9);
/// assert_eq!(set.capacity(), 10);
///
/// assert_eq!(set.add(42), Ok(true));
/// assert_eq!(set.add(42), Ok(false));
/// assert_eq!(set.contains(42), Ok(true));
/// assert_eq!(set.add(0), Err(Error::InvalidKey));
/// ```
pub struct IntHashSet<W, P, H> {
    table: Table<W>,
    hasher: H,
    policy: PhantomData<P>,
}

/// Plain linear probing over `u32` keys.
pub type LpIntHashSet<H = DefaultIntHasher> = IntHashSet<u32, LinearProbing, H>;
/// Last-come-first-served linear probing over `u32` keys.
pub type LcfsIntHashSet<H = DefaultIntHasher> = IntHashSet<u32, Lcfs, H>;
/// Robin Hood hashing over `u32` keys.
pub type RhIntHashSet<H = DefaultIntHasher> = IntHashSet<u32, RobinHood, H>;
/// Bidirectional linear probing over `u32` keys.
pub type BlpIntHashSet<H = DefaultIntHasher> = IntHashSet<u32, Bidirectional, H>;

/// Plain linear probing over `u64` keys.
pub type LpLongHashSet<H = DefaultLongHasher> = IntHashSet<u64, LinearProbing, H>;
/// Last-come-first-served linear probing over `u64` keys.
pub type LcfsLongHashSet<H = DefaultLongHasher> = IntHashSet<u64, Lcfs, H>;
/// Robin Hood hashing over `u64` keys.
pub type RhLongHashSet<H = DefaultLongHasher> = IntHashSet<u64, RobinHood, H>;
/// Bidirectional linear probing over `u64` keys.
pub type BlpLongHashSet<H = DefaultLongHasher> = IntHashSet<u64, Bidirectional, H>;

impl<W, P, H> Clone for IntHashSet<W, P, H>
where
    W: Word,
    H: Clone,
{
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hasher: self.hasher.clone(),
            policy: PhantomData,
        }
    }
}

impl<W, P, H> PartialEq for IntHashSet<W, P, H>
where
    W: Word,
    P: Policy,
    H: ReversibleHasher<W>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|key| other.contains(key) == Ok(true))
    }
}

impl<W, P, H> Eq for IntHashSet<W, P, H>
where
    W: Word,
    P: Policy,
    H: ReversibleHasher<W>,
{
}

impl<W, P, H> Debug for IntHashSet<W, P, H>
where
    W: Word,
    P: Policy,
    H: ReversibleHasher<W>,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<W, P, H> IntHashSet<W, P, H>
where
    W: Word,
    P: Policy,
    H: ReversibleHasher<W>,
{
    /// Creates an empty set sized for `max_entries` keys at `load_factor`,
    /// using the given hasher.
    ///
    /// The backing array has `floor(max_entries / load_factor)` slots.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is zero or `load_factor` is not in `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perm_set::BlpIntHashSet;
    /// use perm_set::SpeckIntHasher;
    ///
    /// let hasher = SpeckIntHasher::new(0x0123_4567_89ab_cdef, 22);
    /// let mut set = BlpIntHashSet::with_hasher(100, 0.75, hasher);
    /// assert_eq!(set.capacity(), 133);
    /// assert_eq!(set.add(7), Ok(true));
    /// ```
    pub fn with_hasher(max_entries: usize, load_factor: f64, hasher: H) -> Self {
        assert!(max_entries > 0, "max_entries must be positive");
        assert!(
            load_factor > 0.0 && load_factor <= 1.0,
            "load factor must be in (0, 1], got {load_factor}"
        );

        let capacity = (max_entries as f64 / load_factor) as usize;
        debug!(
            policy = P::NAME,
            bits = W::BITS,
            max_entries,
            load_factor,
            capacity,
            "created set"
        );

        Self {
            table: Table::new(capacity),
            hasher,
            policy: PhantomData,
        }
    }

    /// Returns the number of keys in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no keys.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the length of the backing array, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the current fill ratio, `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Returns a reference to the set's hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns the backing table of stored hash codes.
    pub fn table(&self) -> &Table<W> {
        &self.table
    }

    fn hash_key(&self, key: W) -> Result<W> {
        let hash = self.hasher.hash(key)?;
        // The identity hashers let 0 through.
        if hash.is_empty() {
            return Err(Error::InvalidKey);
        }
        Ok(hash)
    }

    /// Returns `true` if the set contains `key`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] if `key` hashes to the empty sentinel.
    pub fn contains(&self, key: W) -> Result<bool> {
        let hash = self.hash_key(key)?;
        Ok(P::lookup(&self.table, hash).found().is_some())
    }

    /// Adds `key` to the set.
    ///
    /// Returns `Ok(true)` if the key was added and `Ok(false)` if it was
    /// already present.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] if `key` hashes to the empty sentinel, and
    /// [`Error::TableFull`] if storing it would fill the last free slot. In
    /// both cases the set is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perm_set::Error;
    /// use perm_set::LpIntHashSet;
    ///
    /// let mut set: LpIntHashSet = LpIntHashSet::new(3, 1.0);
    /// assert_eq!(set.add(1), Ok(true));
    /// assert_eq!(set.add(2), Ok(true));
    /// assert_eq!(set.add(3), Err(Error::TableFull { capacity: 3 }));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn add(&mut self, key: W) -> Result<bool> {
        let hash = self.hash_key(key)?;
        let probe = P::lookup(&self.table, hash);
        if let Probe::Found(_) = probe {
            return Ok(false);
        }

        if !self.table.has_vacancy() {
            warn!(
                policy = P::NAME,
                capacity = self.capacity(),
                len = self.len(),
                "set is full, refusing insert"
            );
            return Err(Error::TableFull {
                capacity: self.capacity(),
            });
        }

        P::insert(&mut self.table, hash, probe)?;
        self.table.record_insert();
        Ok(true)
    }

    /// Removes `key` from the set, repairing its probe chain.
    ///
    /// Returns `Ok(true)` if the key was present.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidKey`] if `key` hashes to the empty sentinel.
    pub fn remove(&mut self, key: W) -> Result<bool> {
        let hash = self.hash_key(key)?;
        match P::lookup(&self.table, hash) {
            Probe::Found(bucket) => {
                P::remove(&mut self.table, bucket);
                self.table.record_remove();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Empties every slot and resets the size to zero.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the keys in table order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perm_set::LcfsIntHashSet;
    ///
    /// let mut set: LcfsIntHashSet = LcfsIntHashSet::new(16, 0.5);
    /// for key in [3, 1, 2] {
    ///     set.add(key).unwrap();
    /// }
    ///
    /// let mut keys: Vec<u32> = set.iter().collect();
    /// keys.sort();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, W, H> {
        Iter {
            slots: self.table.slots().iter(),
            hasher: &self.hasher,
        }
    }

    /// Computes a histogram of probe lengths for the current set state.
    ///
    /// Compiled with `cfg(test)` or the `stats` feature. Bin `i` counts the
    /// keys stored `i` slots away from their preferred bucket.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        self.table.probe_histogram(P::displacement::<W>)
    }

    /// Returns probe-length and clustering statistics.
    ///
    /// Compiled with `cfg(test)` or the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        self.table.debug_stats(P::displacement::<W>)
    }

    /// Pretty-prints the probe histogram horizontally using stdout.
    ///
    /// Requires the `std` feature.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_probe_histogram(&self) {
        self.table.print_probe_histogram(&self.probe_histogram());
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let table = &self.table;
        let mut occupied = 0;
        for (bucket, &hash) in table.slots().iter().enumerate() {
            if hash.is_empty() {
                continue;
            }
            occupied += 1;
            assert_eq!(
                P::lookup(table, hash),
                Probe::Found(bucket),
                "{} lost {hash:#x} at bucket {bucket}: {table:?}",
                P::NAME
            );
        }
        assert_eq!(occupied, table.len());
        assert!(table.len() < table.capacity());
    }
}

impl<W, P, H> IntHashSet<W, P, H>
where
    W: Word,
    P: Policy,
    H: ReversibleHasher<W> + Default,
{
    /// Creates an empty set with the default hasher for `H`.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is zero or `load_factor` is not in `(0, 1]`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use perm_set::LpIntHashSet;
    ///
    /// let set: LpIntHashSet = LpIntHashSet::new(1000, 0.75);
    /// assert_eq!(set.capacity(), 1333);
    /// assert!(set.is_empty());
    /// ```
    pub fn new(max_entries: usize, load_factor: f64) -> Self {
        Self::with_hasher(max_entries, load_factor, H::default())
    }
}

/// An iterator over the keys of an [`IntHashSet`].
pub struct Iter<'a, W, H> {
    slots: core::slice::Iter<'a, W>,
    hasher: &'a H,
}

impl<W, H> Iterator for Iter<'_, W, H>
where
    W: Word,
    H: ReversibleHasher<W>,
{
    type Item = W;

    fn next(&mut self) -> Option<Self::Item> {
        for &hash in self.slots.by_ref() {
            if hash.is_empty() {
                continue;
            }
            let key = self.hasher.unhash(hash);
            debug_assert!(key.is_ok(), "stored hash {hash:#x} does not unhash");
            if let Ok(key) = key {
                return Some(key);
            }
        }
        None
    }
}

impl<'a, W, P, H> IntoIterator for &'a IntHashSet<W, P, H>
where
    W: Word,
    P: Policy,
    H: ReversibleHasher<W>,
{
    type IntoIter = Iter<'a, W, H>;
    type Item = W;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The operation surface shared by every set variant, usable as a trait
/// object.
///
/// The [`registry`](crate::registry) hands out `Box<dyn IntSet<W>>` so a
/// harness can pick the policy and hasher by name.
pub trait IntSet<W: Word> {
    /// Short name of the probing policy.
    fn policy(&self) -> &'static str;

    /// Number of keys in the set.
    fn len(&self) -> usize;

    /// Returns `true` if the set contains no keys.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of the backing array.
    fn capacity(&self) -> usize;

    /// See [`IntHashSet::contains`].
    fn contains(&self, key: W) -> Result<bool>;

    /// See [`IntHashSet::add`].
    fn add(&mut self, key: W) -> Result<bool>;

    /// See [`IntHashSet::remove`].
    fn remove(&mut self, key: W) -> Result<bool>;

    /// Empties the set.
    fn clear(&mut self);

    /// Deep-copies the set, including its hasher state.
    fn clone_set(&self) -> Box<dyn IntSet<W>>;

    /// See [`IntHashSet::probe_histogram`].
    #[cfg(any(test, feature = "stats"))]
    fn probe_histogram(&self) -> Vec<usize>;

    /// See [`IntHashSet::debug_stats`].
    #[cfg(any(test, feature = "stats"))]
    fn debug_stats(&self) -> DebugStats;

    /// See [`IntHashSet::print_probe_histogram`].
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    fn print_probe_histogram(&self);
}

impl<W, P, H> IntSet<W> for IntHashSet<W, P, H>
where
    W: Word,
    P: Policy,
    H: ReversibleHasher<W> + 'static,
{
    fn policy(&self) -> &'static str {
        P::NAME
    }

    fn len(&self) -> usize {
        IntHashSet::len(self)
    }

    fn capacity(&self) -> usize {
        IntHashSet::capacity(self)
    }

    fn contains(&self, key: W) -> Result<bool> {
        IntHashSet::contains(self, key)
    }

    fn add(&mut self, key: W) -> Result<bool> {
        IntHashSet::add(self, key)
    }

    fn remove(&mut self, key: W) -> Result<bool> {
        IntHashSet::remove(self, key)
    }

    fn clear(&mut self) {
        IntHashSet::clear(self)
    }

    fn clone_set(&self) -> Box<dyn IntSet<W>> {
        Box::new(self.clone())
    }

    #[cfg(any(test, feature = "stats"))]
    fn probe_histogram(&self) -> Vec<usize> {
        IntHashSet::probe_histogram(self)
    }

    #[cfg(any(test, feature = "stats"))]
    fn debug_stats(&self) -> DebugStats {
        IntHashSet::debug_stats(self)
    }

    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    fn print_probe_histogram(&self) {
        IntHashSet::print_probe_histogram(self)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::vec;
    use alloc::vec::Vec;

    use proptest::prelude::*;
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::hasher::IdentityIntHasher;
    use crate::hasher::IdentityLongHasher;
    use crate::hasher::PhiIntHasher;
    use crate::hasher::PhiLongHasher;
    use crate::hasher::WangLongHasher;
    use crate::speck::SpeckIntHasher;
    use crate::speck::SpeckLongHasher;

    fn distinct_keys<W: Word>(rng: &mut SmallRng, n: usize, sample: impl Fn(&mut SmallRng) -> W) -> Vec<W> {
        let mut seen = hashbrown::HashSet::new();
        let mut keys = Vec::with_capacity(n);
        while keys.len() < n {
            let key = sample(rng);
            if key != W::EMPTY && seen.insert(key) {
                keys.push(key);
            }
        }
        keys
    }

    fn round_trip<W, P, H>(mut set: IntHashSet<W, P, H>, keys: &[W])
    where
        W: Word,
        P: Policy,
        H: ReversibleHasher<W>,
    {
        for &key in keys {
            assert_eq!(set.add(key), Ok(true), "{} add {key}", P::NAME);
        }
        assert_eq!(set.len(), keys.len());
        set.check_invariants();

        for &key in keys {
            assert_eq!(set.contains(key), Ok(true), "{} contains {key}", P::NAME);
            assert_eq!(set.add(key), Ok(false));
        }
        assert_eq!(set.len(), keys.len());

        for &key in keys {
            assert_eq!(set.remove(key), Ok(true), "{} remove {key}", P::NAME);
        }
        assert!(set.is_empty());
        set.check_invariants();

        for &key in keys {
            assert_eq!(set.contains(key), Ok(false));
        }
    }

    fn sequential_round_trip<P: Policy>() {
        let ints: Vec<u32> = (1..=1000).collect();
        round_trip(IntHashSet::<u32, P, DefaultIntHasher>::new(1000, 0.9), &ints);
        let longs: Vec<u64> = (1..=1000).collect();
        round_trip(IntHashSet::<u64, P, DefaultLongHasher>::new(1000, 0.9), &longs);
    }

    fn permuted_round_trip<P: Policy>() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let ints = distinct_keys(&mut rng, 2000, |rng| rng.random::<u32>());
        round_trip(IntHashSet::<u32, P, _>::with_hasher(2000, 0.95, PhiIntHasher), &ints);
        round_trip(
            IntHashSet::<u32, P, _>::with_hasher(2000, 0.95, SpeckIntHasher::default()),
            &ints,
        );

        let longs = distinct_keys(&mut rng, 2000, |rng| rng.random::<u64>());
        round_trip(IntHashSet::<u64, P, _>::with_hasher(2000, 0.95, WangLongHasher), &longs);
        round_trip(
            IntHashSet::<u64, P, _>::with_hasher(2000, 0.95, SpeckLongHasher::default()),
            &longs,
        );
    }

    #[test]
    fn test_sequential_round_trip() {
        sequential_round_trip::<LinearProbing>();
        sequential_round_trip::<Lcfs>();
        sequential_round_trip::<RobinHood>();
        sequential_round_trip::<Bidirectional>();
    }

    #[test]
    fn test_permuted_round_trip() {
        permuted_round_trip::<LinearProbing>();
        permuted_round_trip::<Lcfs>();
        permuted_round_trip::<RobinHood>();
        permuted_round_trip::<Bidirectional>();
    }

    fn clustered_round_trip<P: Policy>() {
        // the identity hasher sends every small key to bucket 0
        let ints: Vec<u32> = (1..=64).collect();
        round_trip(IntHashSet::<u32, P, _>::with_hasher(64, 0.5, IdentityIntHasher), &ints);
        // and every key near the top of the range to the last bucket
        let longs: Vec<u64> = (0..64).map(|i| u64::MAX - i).collect();
        round_trip(IntHashSet::<u64, P, _>::with_hasher(64, 0.5, IdentityLongHasher), &longs);
    }

    #[test]
    fn test_clustered_round_trip() {
        clustered_round_trip::<LinearProbing>();
        clustered_round_trip::<Lcfs>();
        clustered_round_trip::<RobinHood>();
        clustered_round_trip::<Bidirectional>();
    }

    #[test]
    fn test_capacity_fidelity() {
        let cases = [(9, 0.9, 10), (100, 0.75, 133), (1000, 0.5, 2000), (7, 1.0, 7), (10, 0.3, 33), (1, 1.0, 1)];
        for (max_entries, load_factor, capacity) in cases {
            let set: RhIntHashSet = RhIntHashSet::new(max_entries, load_factor);
            assert_eq!(set.capacity(), capacity);
            let set: BlpLongHashSet = BlpLongHashSet::new(max_entries, load_factor);
            assert_eq!(set.capacity(), capacity);
        }
    }

    #[test]
    #[should_panic(expected = "load factor")]
    fn test_rejects_zero_load_factor() {
        let _set: LpIntHashSet = LpIntHashSet::new(10, 0.0);
    }

    #[test]
    #[should_panic(expected = "max_entries")]
    fn test_rejects_zero_entries() {
        let _set: LpLongHashSet = LpLongHashSet::new(0, 0.5);
    }

    fn clone_independence<P: Policy>() {
        let mut original = IntHashSet::<u64, P, DefaultLongHasher>::new(100, 0.8);
        for key in 1..=50 {
            original.add(key).unwrap();
        }

        let mut copy = original.clone();
        copy.add(1000).unwrap();
        copy.remove(1).unwrap();
        assert_eq!(original.len(), 50);
        assert_eq!(original.contains(1), Ok(true));
        assert_eq!(original.contains(1000), Ok(false));

        original.remove(2).unwrap();
        assert_eq!(copy.contains(2), Ok(true));
        assert_eq!(copy.len(), 50);

        let mut boxed: Box<dyn IntSet<u64>> = Box::new(original.clone());
        let other = boxed.clone_set();
        boxed.clear();
        assert!(boxed.is_empty());
        assert_eq!(other.len(), 49);
        assert_eq!(other.contains(3), Ok(true));
    }

    #[test]
    fn test_clone_independence() {
        clone_independence::<LinearProbing>();
        clone_independence::<Lcfs>();
        clone_independence::<RobinHood>();
        clone_independence::<Bidirectional>();
    }

    #[test]
    fn test_keyed_clone_keeps_key_schedule() {
        let mut set = RhIntHashSet::with_hasher(50, 0.5, SpeckIntHasher::new(99, 12));
        for key in 1..=40 {
            set.add(key).unwrap();
        }
        let copy = set.clone();
        drop(set);
        for key in 1..=40 {
            assert_eq!(copy.contains(key), Ok(true));
        }
        copy.check_invariants();
    }

    fn full_table<P: Policy>() {
        let mut set = IntHashSet::<u32, P, DefaultIntHasher>::new(8, 1.0);
        assert_eq!(set.capacity(), 8);
        for key in 1..8 {
            assert_eq!(set.add(key), Ok(true));
        }
        let before: Vec<u32> = set.table().slots().to_vec();

        assert_eq!(set.add(8), Err(Error::TableFull { capacity: 8 }));
        assert_eq!(set.len(), 7);
        assert_eq!(set.table().slots(), &before[..]);

        // duplicates are still reported, and a removal makes room again
        assert_eq!(set.add(3), Ok(false));
        assert_eq!(set.remove(3), Ok(true));
        assert_eq!(set.add(8), Ok(true));
        set.check_invariants();
    }

    #[test]
    fn test_full_table() {
        full_table::<LinearProbing>();
        full_table::<Lcfs>();
        full_table::<RobinHood>();
        full_table::<Bidirectional>();
    }

    fn end_to_end<P: Policy>() {
        let mut set = IntHashSet::<u32, P, _>::with_hasher(9, 0.9, PhiIntHasher);
        assert_eq!(set.capacity(), 10);
        for key in 1..=9 {
            assert_eq!(set.add(key), Ok(true));
        }
        assert_eq!(set.len(), 9);
        // the last free slot is never handed out
        assert_eq!(set.add(10), Err(Error::TableFull { capacity: 10 }));

        assert_eq!(set.contains(5), Ok(true));
        assert_eq!(set.add(5), Ok(false));
        assert_eq!(set.remove(5), Ok(true));
        assert_eq!(set.len(), 8);
        assert_eq!(set.contains(5), Ok(false));
        assert_eq!(set.remove(5), Ok(false));

        set.clear();
        assert_eq!(set.len(), 0);
        assert_eq!(set.contains(1), Ok(false));
        assert!(set.table().slots().iter().all(|&slot| slot == 0));
    }

    #[test]
    fn test_end_to_end() {
        end_to_end::<LinearProbing>();
        end_to_end::<Lcfs>();
        end_to_end::<RobinHood>();
        end_to_end::<Bidirectional>();
    }

    #[test]
    fn test_invalid_key() {
        let mut set: LcfsIntHashSet = LcfsIntHashSet::new(10, 0.5);
        assert_eq!(set.add(0), Err(Error::InvalidKey));
        assert_eq!(set.contains(0), Err(Error::InvalidKey));
        assert_eq!(set.remove(0), Err(Error::InvalidKey));
        assert!(set.is_empty());

        // the identity hasher passes 0 through, which the set still refuses
        let mut set = BlpLongHashSet::with_hasher(10, 0.5, IdentityLongHasher);
        assert_eq!(set.add(0), Err(Error::InvalidKey));
        assert_eq!(set.add(1), Ok(true));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_invalid_key_from_keyed_hasher() {
        // encrypts to 0 under the default Speck32/64 key
        let preimage = 3_941_269_913;
        let mut set = LpIntHashSet::with_hasher(10, 0.5, SpeckIntHasher::default());
        assert_eq!(set.add(preimage), Err(Error::InvalidKey));
        assert_eq!(set.contains(preimage), Err(Error::InvalidKey));
        assert_eq!(set.add(preimage - 1), Ok(true));
        assert_eq!(set.len(), 1);
    }

    fn random_ops<P: Policy>(seed: u64) {
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..20 {
            let max_entries = rng.random_range(1..80);
            let load_factor = [0.5, 0.75, 0.9, 0.99, 1.0][rng.random_range(0..5)];
            let mut set = IntHashSet::<u64, P, DefaultLongHasher>::new(max_entries, load_factor);
            let mut reference = hashbrown::HashSet::new();

            for _ in 0..500 {
                let key = rng.random_range(1..120u64);
                match rng.random_range(0..10) {
                    0..5 => match set.add(key) {
                        Ok(added) => {
                            assert_eq!(added, reference.insert(key));
                        }
                        Err(err) => {
                            assert_eq!(err, Error::TableFull { capacity: set.capacity() });
                            assert!(!reference.contains(&key));
                            assert_eq!(reference.len() + 1, set.capacity());
                        }
                    },
                    5..8 => assert_eq!(set.remove(key), Ok(reference.remove(&key))),
                    _ => assert_eq!(set.contains(key), Ok(reference.contains(&key))),
                }
                assert_eq!(set.len(), reference.len());
                set.check_invariants();
            }
        }
    }

    #[test]
    fn test_random_ops_against_reference() {
        random_ops::<LinearProbing>(1);
        random_ops::<Lcfs>(2);
        random_ops::<RobinHood>(3);
        random_ops::<Bidirectional>(4);
    }

    #[test]
    fn test_iter_and_into_iterator() {
        let mut set: BlpIntHashSet = BlpIntHashSet::new(32, 0.5);
        for key in [10, 20, 30] {
            set.add(key).unwrap();
        }

        let mut keys: Vec<u32> = set.iter().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![10, 20, 30]);

        let mut keys: Vec<u32> = (&set).into_iter().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![10, 20, 30]);
    }

    #[test]
    fn test_debug_and_eq() {
        let mut left: LpIntHashSet = LpIntHashSet::new(8, 0.5);
        left.add(4).unwrap();
        assert_eq!(format!("{left:?}"), "{4}");

        let mut right: LpIntHashSet = LpIntHashSet::new(8, 0.5);
        assert_ne!(left, right);
        right.add(4).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_stats() {
        let mut set: RhLongHashSet = RhLongHashSet::new(500, 0.9);
        for key in 1..=500 {
            set.add(key).unwrap();
        }
        let hist = set.probe_histogram();
        assert_eq!(hist.iter().sum::<usize>(), 500);

        let stats = set.debug_stats();
        assert_eq!(stats.populated, 500);
        assert_eq!(stats.capacity, 555);
        assert_eq!(stats.max_probe_length + 1, hist.len());
        assert!((set.load_factor() - stats.load_factor).abs() < f64::EPSILON);

        let boxed: Box<dyn IntSet<u64>> = Box::new(set);
        assert_eq!(boxed.probe_histogram(), hist);
        assert_eq!(boxed.policy(), "rh");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_round_trip_u64(keys in prop::collection::hash_set(1u64..=u64::MAX, 1..200)) {
            let keys: Vec<u64> = keys.into_iter().collect();
            round_trip(LpLongHashSet::<PhiLongHasher>::new(keys.len() + 1, 0.9), &keys);
            round_trip(LcfsLongHashSet::<PhiLongHasher>::new(keys.len() + 1, 0.9), &keys);
            round_trip(RhLongHashSet::<PhiLongHasher>::new(keys.len() + 1, 0.9), &keys);
            round_trip(BlpLongHashSet::<PhiLongHasher>::new(keys.len() + 1, 0.9), &keys);
        }

        #[test]
        fn prop_remove_half_u32(keys in prop::collection::hash_set(1u32..=u32::MAX, 2..200)) {
            let keys: Vec<u32> = keys.into_iter().collect();
            let (gone, kept) = keys.split_at(keys.len() / 2);
            let mut set = BlpIntHashSet::<PhiIntHasher>::new(keys.len() + 1, 0.8);
            for &key in &keys {
                prop_assert_eq!(set.add(key), Ok(true));
            }
            for &key in gone {
                prop_assert_eq!(set.remove(key), Ok(true));
            }
            set.check_invariants();
            for &key in gone {
                prop_assert_eq!(set.contains(key), Ok(false));
            }
            for &key in kept {
                prop_assert_eq!(set.contains(key), Ok(true));
            }
        }
    }
}
