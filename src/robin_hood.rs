use tracing::trace;

use crate::error::Error;
use crate::error::Result;
use crate::policy::Policy;
use crate::policy::Probe;
use crate::policy::sealed;
use crate::table::Table;
use crate::word::Word;

/// Robin Hood hashing.
///
/// An inserting hash takes the slot of any occupant that is closer to its own
/// preferred bucket, and carries the displaced occupant onward. Along any run
/// probe distances therefore never drop by more than one per slot, which lets
/// an unsuccessful lookup stop as soon as it has travelled further than the
/// occupant it is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RobinHood;

impl sealed::Sealed for RobinHood {}

impl Policy for RobinHood {
    const NAME: &'static str = "rh";

    fn lookup<W: Word>(table: &Table<W>, hash: W) -> Probe {
        let mut bucket = table.preferred(hash);
        let mut probe_length = 0;
        loop {
            let slot = table.get(bucket);
            if slot.is_empty() {
                return Probe::Empty(bucket);
            }
            if slot == hash {
                return Probe::Found(bucket);
            }
            if probe_length == table.capacity()
                || probe_length > table.probe_distance(slot, bucket)
            {
                return Probe::Missing;
            }
            bucket = table.next(bucket);
            probe_length += 1;
        }
    }

    fn insert<W: Word>(table: &mut Table<W>, hash: W, _probe: Probe) -> Result<()> {
        let mut carried = hash;
        let mut carried_distance = 0;
        let mut bucket = table.preferred(hash);
        for _ in 0..table.capacity() {
            let occupant = table.get(bucket);
            if occupant.is_empty() {
                table.set(bucket, carried);
                return Ok(());
            }

            let distance = table.probe_distance(occupant, bucket);
            if distance < carried_distance {
                trace!(bucket, distance, carried_distance, "robin hood swap");
                table.set(bucket, carried);
                carried = occupant;
                carried_distance = distance;
            }
            bucket = table.next(bucket);
            carried_distance += 1;
        }

        // Unreachable while one slot is kept free.
        Err(Error::TableFull {
            capacity: table.capacity(),
        })
    }

    fn remove<W: Word>(table: &mut Table<W>, bucket: usize) {
        let mut end = table.next(bucket);
        while !table.is_vacant(end) && end != table.preferred(table.get(end)) {
            end = table.next(end);
        }

        let mut current = bucket;
        while table.next(current) != end {
            let next = table.next(current);
            table.copy(next, current);
            current = next;
        }
        table.set(current, W::EMPTY);
    }
}
