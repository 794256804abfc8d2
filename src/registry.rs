//! Name-based construction of sets, for harnesses that pick the probing
//! policy and hasher at runtime.
//!
//! Each width has a static table mapping a policy name to a constructor. The
//! constructor in turn resolves the hasher name. Unknown names resolve to
//! `None`.
//!
//! ```rust
//! use perm_set::registry;
//!
//! let mut set = registry::long_set("rh", "wang", 100, 0.9).unwrap();
//! assert_eq!(set.policy(), "rh");
//! assert_eq!(set.add(17), Ok(true));
//!
//! assert!(registry::int_set("cuckoo", "phi", 100, 0.9).is_none());
//! ```

use alloc::boxed::Box;

use crate::bidirectional::Bidirectional;
use crate::hash_set::IntHashSet;
use crate::hash_set::IntSet;
use crate::hasher::DegskiLongHasher;
use crate::hasher::H2IntHasher;
use crate::hasher::IdentityIntHasher;
use crate::hasher::IdentityLongHasher;
use crate::hasher::Murmur3IntHasher;
use crate::hasher::Murmur3LongHasher;
use crate::hasher::PhiIntHasher;
use crate::hasher::PhiLongHasher;
use crate::hasher::Prospector2RoundIntHasher;
use crate::hasher::Prospector3RoundIntHasher;
use crate::hasher::ReversibleHasher;
use crate::hasher::Variant13LongHasher;
use crate::hasher::WangLongHasher;
use crate::lcfs::Lcfs;
use crate::linear::LinearProbing;
use crate::policy::Policy;
use crate::robin_hood::RobinHood;
use crate::speck::SpeckIntHasher;
use crate::speck::SpeckLongHasher;
use crate::word::Word;

/// Builds a set from a hasher name, `max_entries` and `load_factor`.
pub type SetConstructor<W> = fn(&str, usize, f64) -> Option<Box<dyn IntSet<W>>>;

/// Accepted policy names, in registry order.
pub const SET_VARIANTS: &[&str] = &[
    LinearProbing::NAME,
    Lcfs::NAME,
    RobinHood::NAME,
    Bidirectional::NAME,
];

/// Accepted hasher names for `u32` sets.
pub const INT_HASHERS: &[&str] = &[
    "identity",
    "murmur3",
    "phi",
    "h2",
    "prospector2",
    "prospector3",
    "speck",
];

/// Accepted hasher names for `u64` sets.
pub const LONG_HASHERS: &[&str] = &[
    "identity",
    "murmur3",
    "phi",
    "variant13",
    "degski",
    "wang",
    "speck",
];

/// Policy constructors for `u32` sets.
pub const INT_SETS: &[(&str, SetConstructor<u32>)] = &[
    (LinearProbing::NAME, build_int::<LinearProbing>),
    (Lcfs::NAME, build_int::<Lcfs>),
    (RobinHood::NAME, build_int::<RobinHood>),
    (Bidirectional::NAME, build_int::<Bidirectional>),
];

/// Policy constructors for `u64` sets.
pub const LONG_SETS: &[(&str, SetConstructor<u64>)] = &[
    (LinearProbing::NAME, build_long::<LinearProbing>),
    (Lcfs::NAME, build_long::<Lcfs>),
    (RobinHood::NAME, build_long::<RobinHood>),
    (Bidirectional::NAME, build_long::<Bidirectional>),
];

fn boxed<W, P, H>(hasher: H, max_entries: usize, load_factor: f64) -> Box<dyn IntSet<W>>
where
    W: Word,
    P: Policy,
    H: ReversibleHasher<W> + 'static,
{
    Box::new(IntHashSet::<W, P, H>::with_hasher(
        max_entries,
        load_factor,
        hasher,
    ))
}

fn build_int<P: Policy>(
    hasher: &str,
    max_entries: usize,
    load_factor: f64,
) -> Option<Box<dyn IntSet<u32>>> {
    let set = match hasher {
        "identity" => boxed::<u32, P, _>(IdentityIntHasher, max_entries, load_factor),
        "murmur3" => boxed::<u32, P, _>(Murmur3IntHasher, max_entries, load_factor),
        "phi" => boxed::<u32, P, _>(PhiIntHasher, max_entries, load_factor),
        "h2" => boxed::<u32, P, _>(H2IntHasher, max_entries, load_factor),
        "prospector2" => boxed::<u32, P, _>(Prospector2RoundIntHasher, max_entries, load_factor),
        "prospector3" => boxed::<u32, P, _>(Prospector3RoundIntHasher, max_entries, load_factor),
        "speck" => boxed::<u32, P, _>(SpeckIntHasher::default(), max_entries, load_factor),
        _ => return None,
    };
    Some(set)
}

fn build_long<P: Policy>(
    hasher: &str,
    max_entries: usize,
    load_factor: f64,
) -> Option<Box<dyn IntSet<u64>>> {
    let set = match hasher {
        "identity" => boxed::<u64, P, _>(IdentityLongHasher, max_entries, load_factor),
        "murmur3" => boxed::<u64, P, _>(Murmur3LongHasher, max_entries, load_factor),
        "phi" => boxed::<u64, P, _>(PhiLongHasher, max_entries, load_factor),
        "variant13" => boxed::<u64, P, _>(Variant13LongHasher, max_entries, load_factor),
        "degski" => boxed::<u64, P, _>(DegskiLongHasher, max_entries, load_factor),
        "wang" => boxed::<u64, P, _>(WangLongHasher, max_entries, load_factor),
        "speck" => boxed::<u64, P, _>(SpeckLongHasher::default(), max_entries, load_factor),
        _ => return None,
    };
    Some(set)
}

fn resolve<W: Word>(
    table: &[(&str, SetConstructor<W>)],
    variant: &str,
    hasher: &str,
    max_entries: usize,
    load_factor: f64,
) -> Option<Box<dyn IntSet<W>>> {
    let (_, build) = table.iter().find(|(name, _)| *name == variant)?;
    build(hasher, max_entries, load_factor)
}

/// Builds a `u32` set by policy and hasher name.
///
/// # Panics
///
/// Panics if `max_entries` is zero or `load_factor` is not in `(0, 1]`.
pub fn int_set(
    variant: &str,
    hasher: &str,
    max_entries: usize,
    load_factor: f64,
) -> Option<Box<dyn IntSet<u32>>> {
    resolve(INT_SETS, variant, hasher, max_entries, load_factor)
}

/// Builds a `u64` set by policy and hasher name.
///
/// # Panics
///
/// Panics if `max_entries` is zero or `load_factor` is not in `(0, 1]`.
pub fn long_set(
    variant: &str,
    hasher: &str,
    max_entries: usize,
    load_factor: f64,
) -> Option<Box<dyn IntSet<u64>>> {
    resolve(LONG_SETS, variant, hasher, max_entries, load_factor)
}
