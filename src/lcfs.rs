use crate::error::Result;
use crate::policy::Policy;
use crate::policy::Probe;
use crate::policy::place_at_empty;
use crate::policy::sealed;
use crate::table::Table;
use crate::word::Word;

/// Last-come-first-served linear probing.
///
/// A new hash always takes its preferred bucket. The occupants between the
/// preferred bucket and the first empty slot each move one slot forward to
/// make room. Lookup and deletion are those of plain linear probing, since
/// the shifted run still satisfies the same reachability rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lcfs;

impl sealed::Sealed for Lcfs {}

impl Policy for Lcfs {
    const NAME: &'static str = "lcfs";

    fn insert<W: Word>(table: &mut Table<W>, hash: W, probe: Probe) -> Result<()> {
        let preferred = table.preferred(hash);
        let mut bucket = place_at_empty(table, hash, probe)?;
        while bucket != preferred {
            let prev = table.prev(bucket);
            table.copy(prev, bucket);
            bucket = prev;
        }
        table.set(preferred, hash);
        Ok(())
    }
}
