//! The probing strategy seam.
//!
//! A [`Policy`] decides where a new hash goes, how a hash is found, and how a
//! chain is repaired after a deletion. Policies are zero-sized types used only
//! as type parameters of [`IntHashSet`](crate::IntHashSet), so dispatch is
//! resolved at compile time and happens once per set operation.
//!
//! Every policy keeps the same reachability contract: each stored hash can be
//! found by [`Policy::lookup`] starting from its preferred bucket, without
//! tombstones.

use crate::error::Error;
use crate::error::Result;
use crate::table::Table;
use crate::word::Word;

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Outcome of looking a hash up in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// The hash is stored at this bucket.
    Found(usize),
    /// The hash is absent; this is the first empty bucket on its probe path.
    Empty(usize),
    /// The hash is absent and the probe did not end on an empty bucket.
    Missing,
}

impl Probe {
    /// The bucket holding the hash, if it was found.
    #[inline(always)]
    pub fn found(self) -> Option<usize> {
        match self {
            Probe::Found(bucket) => Some(bucket),
            _ => None,
        }
    }
}

/// A chain-management strategy over a [`Table`].
///
/// Implemented by [`LinearProbing`](crate::LinearProbing),
/// [`Lcfs`](crate::Lcfs), [`RobinHood`](crate::RobinHood) and
/// [`Bidirectional`](crate::Bidirectional). The provided methods are plain
/// linear probing with backward-shift deletion; strategies override only what
/// they change.
pub trait Policy: sealed::Sealed + 'static {
    /// Short name used in logs and by the registry.
    const NAME: &'static str;

    /// Finds `hash`, or reports where probing stopped.
    #[inline]
    fn lookup<W: Word>(table: &Table<W>, hash: W) -> Probe {
        linear_lookup(table, hash)
    }

    /// Stores `hash`, which `lookup` just reported absent with `probe`.
    ///
    /// The caller has already checked [`Table::has_vacancy`]. On error the
    /// table is left untouched.
    fn insert<W: Word>(table: &mut Table<W>, hash: W, probe: Probe) -> Result<()>;

    /// Empties `bucket` and repairs the chain it belonged to.
    #[inline]
    fn remove<W: Word>(table: &mut Table<W>, bucket: usize) {
        backward_shift(table, bucket);
    }

    /// How far the hash in the occupied `bucket` sits from its preferred
    /// bucket.
    #[inline]
    fn displacement<W: Word>(table: &Table<W>, bucket: usize) -> usize {
        table.probe_distance(table.get(bucket), bucket)
    }
}

/// Scans forward from the preferred bucket, wrapping, until `hash` or an
/// empty slot is met. Gives up after one full cycle.
pub(crate) fn linear_lookup<W: Word>(table: &Table<W>, hash: W) -> Probe {
    let mut bucket = table.preferred(hash);
    for _ in 0..table.capacity() {
        let slot = table.get(bucket);
        if slot.is_empty() {
            return Probe::Empty(bucket);
        }
        if slot == hash {
            return Probe::Found(bucket);
        }
        bucket = table.next(bucket);
    }
    Probe::Missing
}

/// Writes `hash` into the empty slot linear probing stopped at.
pub(crate) fn place_at_empty<W: Word>(table: &mut Table<W>, hash: W, probe: Probe) -> Result<usize> {
    match probe {
        Probe::Empty(bucket) => {
            table.set(bucket, hash);
            Ok(bucket)
        }
        _ => Err(Error::TableFull {
            capacity: table.capacity(),
        }),
    }
}

/// Zeroes `bucket`, then pulls later entries of the run back into the hole
/// whenever the hole lies on their probe path.
///
/// An entry at `src` may move into the hole at `dst` only if its preferred
/// bucket is outside the cyclic interval `(dst, src]`; otherwise moving it
/// would place it before its own preferred bucket.
pub(crate) fn backward_shift<W: Word>(table: &mut Table<W>, bucket: usize) {
    table.set(bucket, W::EMPTY);

    let mut dst = bucket;
    let mut shift = 1;
    let mut src = table.offset(dst, shift);
    while !table.is_vacant(src) {
        let preferred = table.preferred(table.get(src));
        let reachable = if src <= dst {
            preferred <= dst && preferred > src
        } else {
            preferred <= dst || preferred > src
        };

        if reachable {
            table.copy(src, dst);
            table.set(src, W::EMPTY);
            dst = src;
            shift = 1;
        } else {
            shift += 1;
        }
        src = table.offset(dst, shift);
    }
}
