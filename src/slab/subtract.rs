//! Subtracting one slab from another.

use super::error::SlabError;
use super::layout::{
    append, append_record, append_table, compact_table, table_len, RawRecord,
};
use super::rules::SlabRules;
use super::Slab;
use core::fmt;
use octseq::builder::{EmptyBuilder, FromBuilder};
use std::vec::Vec;
use tracing::{debug, trace};

//------------ SubtractFlags -------------------------------------------------

/// Options for subtracting one slab from another.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SubtractFlags {
    exact: bool,
}

impl SubtractFlags {
    /// Creates a new value with all flags cleared.
    #[must_use]
    pub const fn new() -> Self {
        SubtractFlags { exact: false }
    }

    /// Returns whether all records to be removed have to be present.
    ///
    /// If this flag is set, subtracting fails with [`SlabError::NotExact`]
    /// if any of the records to be removed is missing.
    #[must_use]
    pub const fn exact(self) -> bool {
        self.exact
    }

    /// Sets the exact flag.
    pub fn set_exact(&mut self, set: bool) {
        self.exact = set
    }

    /// Returns the flags with the exact flag set.
    #[must_use]
    pub const fn with_exact(mut self) -> Self {
        self.exact = true;
        self
    }
}

//------------ Subtracted ----------------------------------------------------

/// The successful outcome of subtracting one slab from another.
#[derive(Clone)]
pub enum Subtracted<Octs> {
    /// A new slab with the remaining records.
    Changed(Slab<Octs>),

    /// None of the records to be removed were present.
    ///
    /// The original slab can be used as is.
    Unchanged,

    /// All records were removed.
    ///
    /// Since there is no such thing as an empty RRset, the RRset should be
    /// deleted instead.
    Empty,
}

impl<Octs> Subtracted<Octs> {
    /// Returns the new slab if there is one.
    pub fn into_slab(self) -> Option<Slab<Octs>> {
        match self {
            Subtracted::Changed(slab) => Some(slab),
            _ => None,
        }
    }

    /// Returns whether all records were removed.
    pub fn is_empty(&self) -> bool {
        matches!(self, Subtracted::Empty)
    }
}

//--- Debug

impl<Octs: AsRef<[u8]>> fmt::Debug for Subtracted<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Subtracted::Changed(slab) => {
                f.debug_tuple("Changed").field(slab).finish()
            }
            Subtracted::Unchanged => f.write_str("Unchanged"),
            Subtracted::Empty => f.write_str("Empty"),
        }
    }
}

//------------ Slab::subtract ------------------------------------------------

impl<Octs: AsRef<[u8]>> Slab<Octs> {
    /// Creates a new slab without the records of another slab.
    ///
    /// The new slab contains all records of `self` that are not present in
    /// `remove` according to `rules`. It keeps the reserved header of
    /// `self` and the remaining records keep their relative load order.
    ///
    /// If none of the records of `remove` are present, the method returns
    /// [`Subtracted::Unchanged`]. If no records would remain, it returns
    /// [`Subtracted::Empty`]. Subtracting fails if `flags` request an exact
    /// subtraction and some record of `remove` is not present in `self`, or
    /// if the octets builder runs out of space.
    pub fn subtract<Target, Other, R>(
        &self,
        remove: &Slab<Other>,
        rules: &R,
        flags: SubtractFlags,
    ) -> Result<Subtracted<Target>, SlabError>
    where
        Target: FromBuilder,
        <Target as FromBuilder>::Builder: EmptyBuilder + AsMut<[u8]>,
        Other: AsRef<[u8]>,
        R: SlabRules + ?Sized,
    {
        let base_count = self.count();
        let mut kept: Vec<RawRecord> = Vec::with_capacity(base_count);
        for record in self.raw_records() {
            if !remove.contains(record.data, rules) {
                kept.push(record)
            }
        }
        let removed = base_count - kept.len();

        if flags.exact() && removed != remove.count() {
            debug!(
                "exact subtraction rejected: {} of {} records present",
                removed,
                remove.count()
            );
            return Err(SlabError::NotExact);
        }
        if kept.is_empty() {
            trace!("subtraction removed all {} records", base_count);
            return Ok(Subtracted::Empty);
        }
        if removed == 0 {
            trace!(
                "subtraction left slab of {} records unchanged",
                base_count
            );
            return Ok(Subtracted::Unchanged);
        }

        let size = self.reserved_len()
            + table_len(kept.len())
            + kept.iter().map(|record| record.stored_len()).sum::<usize>();
        let mut target = Target::Builder::empty();
        append(&mut target, self.reserved())?;
        append_table(&mut target, kept.len())?;

        let mut slots = vec![None; base_count];
        let mut pos = table_len(kept.len());
        for record in &kept {
            slots[usize::from(record.rank)] = Some(pos as u32);
            append_record(&mut target, record.rank, record.data)?;
            pos += record.stored_len();
        }
        debug_assert_eq!(target.as_mut().len(), size);
        let placed = compact_table(
            &mut target.as_mut()[self.reserved_len()..],
            &slots,
        );
        debug_assert_eq!(placed, kept.len());

        trace!(
            "subtracted {} records leaving {} records",
            removed,
            kept.len()
        );
        Ok(Subtracted::Changed(Slab::from_octets_unchecked(
            Target::from_builder(target),
            self.reserved_len(),
        )))
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::Rtype;
    use crate::slab::test::{ranked, slab};

    type VecSlab = Slab<Vec<u8>>;

    fn subtract(
        base: &VecSlab,
        remove: &VecSlab,
        flags: SubtractFlags,
    ) -> Result<Subtracted<Vec<u8>>, SlabError> {
        base.subtract(remove, &Rtype::TXT, flags)
    }

    #[test]
    fn keeps_base_order() {
        let base = slab(&[b"a", b"b", b"c"]);
        let flags = SubtractFlags::new().with_exact();
        let res = subtract(&base, &slab(&[b"b"]), flags)
            .unwrap()
            .into_slab()
            .unwrap();
        assert_eq!(ranked(&res), [(0, &b"a"[..]), (1, &b"c"[..])]);

        let base = slab(&[b"d", b"a", b"c", b"b"]);
        let res = subtract(&base, &slab(&[b"a"]), SubtractFlags::new())
            .unwrap()
            .into_slab()
            .unwrap();
        assert_eq!(
            res.load_order().collect::<Vec<_>>(),
            [b"d", b"c", b"b"]
        );
    }

    #[test]
    fn empty_result() {
        let base = slab(&[b"a", b"b"]);
        let res =
            subtract(&base, &slab(&[b"b", b"a", b"c"]), SubtractFlags::new())
                .unwrap();
        assert!(res.is_empty());

        // With exact, the missing "c" is reported first.
        assert_eq!(
            subtract(
                &base,
                &slab(&[b"b", b"a", b"c"]),
                SubtractFlags::new().with_exact()
            )
            .unwrap_err(),
            SlabError::NotExact
        );
    }

    #[test]
    fn unchanged() {
        let base = slab(&[b"a", b"b"]);
        assert!(matches!(
            subtract(&base, &slab(&[b"c"]), SubtractFlags::new()).unwrap(),
            Subtracted::Unchanged
        ));
        assert_eq!(
            subtract(&base, &slab(&[b"c"]), SubtractFlags::new().with_exact())
                .unwrap_err(),
            SlabError::NotExact
        );
    }

    #[test]
    fn keeps_header() {
        let base =
            VecSlab::encode(&Rtype::TXT, b"hdr", [b"x", b"y"]).unwrap();
        let remove = VecSlab::encode(&Rtype::TXT, b"", [b"y"]).unwrap();
        let res = subtract(&base, &remove, SubtractFlags::new())
            .unwrap()
            .into_slab()
            .unwrap();
        assert_eq!(res.reserved(), b"hdr");
        assert_eq!(res.iter().collect::<Vec<_>>(), [b"x"]);
        assert!(Slab::from_octets(res.as_slice(), 3).is_ok());
    }

    #[test]
    fn debug() {
        let base = slab(&[b"a", b"b"]);
        let flags = SubtractFlags::new();
        assert_eq!(
            format!("{:?}", subtract(&base, &base, flags).unwrap()),
            "Empty"
        );
        assert_eq!(
            format!("{:?}", subtract(&base, &slab(&[b"c"]), flags).unwrap()),
            "Unchanged"
        );
        assert_eq!(
            format!("{:?}", subtract(&base, &slab(&[b"a"]), flags).unwrap()),
            "Changed(Slab { reserved: 0, records: [#0 62] })"
        );
    }

    #[cfg(feature = "heapless")]
    #[test]
    fn out_of_memory() {
        type Small = heapless::Vec<u8, 16>;
        let remove = slab(&[b"b"]);

        // Needs 11 octets.
        let res = slab(&[b"a", b"b"])
            .subtract::<Small, _, _>(
                &remove,
                &Rtype::TXT,
                SubtractFlags::new(),
            )
            .unwrap()
            .into_slab()
            .unwrap();
        assert_eq!(res.iter().collect::<Vec<_>>(), [b"a"]);

        // Needs 20 octets.
        assert_eq!(
            slab(&[b"a", b"b", b"c"])
                .subtract::<Small, _, _>(
                    &remove,
                    &Rtype::TXT,
                    SubtractFlags::new()
                )
                .unwrap_err(),
            SlabError::OutOfMemory
        );
    }
}
