use tracing::trace;

use crate::error::Error;
use crate::error::Result;
use crate::policy::Policy;
use crate::policy::Probe;
use crate::policy::sealed;
use crate::table::Table;
use crate::word::Word;

/// Bidirectional linear probing.
///
/// Chains grow to either side of a preferred bucket and are kept sorted by
/// unsigned hash value, so a lookup walks away from the preferred bucket in
/// the one direction the ordering allows and stops at the first value past
/// the target. The array does not wrap: bucket `0` and the last bucket are
/// hard edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bidirectional;

impl sealed::Sealed for Bidirectional {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    None,
    Left,
    Right,
}

impl Bidirectional {
    /// Finds the empty slot nearest to `start` on one side, then slides it
    /// back toward `start` until `hash` fits between its neighbours.
    /// Returns the slot where `hash` belongs, with the table already opened
    /// up around it, or `None` if that side has no empty slot.
    fn open_slot<W: Word>(table: &mut Table<W>, hash: W, start: usize, left: bool) -> Option<usize> {
        let last = table.capacity() - 1;
        let mut bucket = start;
        if left {
            while bucket > 0 && !table.is_vacant(bucket) {
                bucket -= 1;
            }
            if !table.is_vacant(bucket) {
                return None;
            }
            while bucket < last && !table.is_vacant(bucket + 1) && table.get(bucket + 1) < hash {
                table.copy(bucket + 1, bucket);
                bucket += 1;
            }
        } else {
            while bucket < last && !table.is_vacant(bucket) {
                bucket += 1;
            }
            if !table.is_vacant(bucket) {
                return None;
            }
            while bucket > 0 && !table.is_vacant(bucket - 1) && table.get(bucket - 1) > hash {
                table.copy(bucket - 1, bucket);
                bucket -= 1;
            }
        }
        Some(bucket)
    }

    fn neighbour_preferred<W: Word>(table: &Table<W>, bucket: usize) -> Option<usize> {
        let slot = table.get(bucket);
        (!slot.is_empty()).then(|| table.preferred(slot))
    }

    /// Which way the hole left by removing `bucket` must be closed.
    fn removal_direction<W: Word>(table: &Table<W>, bucket: usize) -> Direction {
        if bucket == 0 {
            return Direction::Left;
        }
        if bucket == table.capacity() - 1 {
            return Direction::Right;
        }

        let hash = table.get(bucket);
        let preferred = table.preferred(hash);
        if bucket < preferred {
            return Direction::Right;
        }
        if bucket > preferred {
            return Direction::Left;
        }

        let left = Self::neighbour_preferred(table, bucket - 1) == Some(preferred);
        let right = Self::neighbour_preferred(table, bucket + 1) == Some(preferred);
        match (left, right) {
            (false, false) => Direction::None,
            (true, false) => Direction::Right,
            (false, true) => Direction::Left,
            (true, true) => {
                let to_left = hash.abs_diff(table.get(bucket - 1));
                let to_right = hash.abs_diff(table.get(bucket + 1));
                if to_left > to_right {
                    Direction::Left
                } else {
                    Direction::Right
                }
            }
        }
    }
}

impl Policy for Bidirectional {
    const NAME: &'static str = "blp";

    fn lookup<W: Word>(table: &Table<W>, hash: W) -> Probe {
        let last = table.capacity() - 1;
        let mut bucket = table.preferred(hash);
        let slot = table.get(bucket);
        if slot < hash {
            while bucket < last && !table.is_vacant(bucket + 1) && table.get(bucket + 1) <= hash {
                bucket += 1;
            }
        } else if slot > hash {
            while bucket > 0 && !table.is_vacant(bucket - 1) && table.get(bucket - 1) >= hash {
                bucket -= 1;
            }
        }

        if table.get(bucket) == hash {
            Probe::Found(bucket)
        } else {
            Probe::Missing
        }
    }

    fn insert<W: Word>(table: &mut Table<W>, hash: W, _probe: Probe) -> Result<()> {
        let last = table.capacity() - 1;
        let mut bucket = table.preferred(hash);
        if !table.is_vacant(bucket) {
            let left = (bucket > 0 && table.get(bucket) < hash) || bucket == last;
            bucket = match Self::open_slot(table, hash, bucket, left) {
                Some(slot) => slot,
                None => {
                    trace!(bucket, left, "no empty slot on first side, retrying");
                    Self::open_slot(table, hash, bucket, !left).ok_or(Error::TableFull {
                        capacity: table.capacity(),
                    })?
                }
            };
        }
        table.set(bucket, hash);
        Ok(())
    }

    fn remove<W: Word>(table: &mut Table<W>, bucket: usize) {
        let last = table.capacity() - 1;
        match Self::removal_direction(table, bucket) {
            Direction::None => table.set(bucket, W::EMPTY),
            Direction::Left => {
                let mut end = bucket;
                while end < last
                    && !table.is_vacant(end + 1)
                    && table.preferred(table.get(end + 1)) < end + 1
                {
                    end += 1;
                }
                for i in bucket..end {
                    table.copy(i + 1, i);
                }
                table.set(end, W::EMPTY);
            }
            Direction::Right => {
                let mut end = bucket;
                while end > 0
                    && !table.is_vacant(end - 1)
                    && end - 1 < table.preferred(table.get(end - 1))
                {
                    end -= 1;
                }
                for i in (end + 1..=bucket).rev() {
                    table.copy(i - 1, i);
                }
                table.set(end, W::EMPTY);
            }
        }
    }

    /// Distance to the preferred bucket in either direction.
    fn displacement<W: Word>(table: &Table<W>, bucket: usize) -> usize {
        bucket.abs_diff(table.preferred(table.get(bucket)))
    }
}
