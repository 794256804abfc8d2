use crate::error::Result;
use crate::policy::Policy;
use crate::policy::Probe;
use crate::policy::place_at_empty;
use crate::policy::sealed;
use crate::table::Table;
use crate::word::Word;

/// Plain linear probing.
///
/// A new hash goes into the first empty slot after its preferred bucket.
/// Lookup and deletion are the provided [`Policy`] methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearProbing;

impl sealed::Sealed for LinearProbing {}

impl Policy for LinearProbing {
    const NAME: &'static str = "lp";

    #[inline]
    fn insert<W: Word>(table: &mut Table<W>, hash: W, probe: Probe) -> Result<()> {
        place_at_empty(table, hash, probe)?;
        Ok(())
    }
}
