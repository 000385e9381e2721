//! Merging two slabs.

use super::error::SlabError;
use super::layout::{
    append, append_record, append_table, compact_table, table_len,
    RawRecord, MAX_COUNT,
};
use super::rules::SlabRules;
use super::Slab;
use core::cmp::Ordering;
use core::fmt;
use octseq::builder::{EmptyBuilder, FromBuilder};
use std::vec::Vec;
use tracing::{debug, trace};

//------------ MergeFlags ----------------------------------------------------

/// Options for merging two slabs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MergeFlags {
    exact: bool,
    force: bool,
}

impl MergeFlags {
    /// Creates a new value with all flags cleared.
    #[must_use]
    pub const fn new() -> Self {
        MergeFlags {
            exact: false,
            force: false,
        }
    }

    /// Returns whether the merge has to be a pure addition.
    ///
    /// If this flag is set, merging fails with [`SlabError::NotExact`] if
    /// any record of the new slab is already present in the old one.
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

    /// Returns whether a new slab is to be created even if nothing changes.
    ///
    /// If this flag is not set, merging returns [`Merged::Unchanged`] if
    /// all records of the new slab are already present in the old one.
    #[must_use]
    pub const fn force(self) -> bool {
        self.force
    }

    /// Sets the force flag.
    pub fn set_force(&mut self, set: bool) {
        self.force = set
    }

    /// Returns the flags with the force flag set.
    #[must_use]
    pub const fn with_force(mut self) -> Self {
        self.force = true;
        self
    }
}

//------------ Merged --------------------------------------------------------

/// The successful outcome of merging two slabs.
#[derive(Clone)]
pub enum Merged<Octs> {
    /// A new slab containing the union of both slabs.
    Changed(Slab<Octs>),

    /// All records were already present in the old slab.
    ///
    /// The old slab can be used as is.
    Unchanged,
}

impl<Octs> Merged<Octs> {
    /// Returns the new slab if there is one.
    pub fn into_slab(self) -> Option<Slab<Octs>> {
        match self {
            Merged::Changed(slab) => Some(slab),
            Merged::Unchanged => None,
        }
    }

    /// Returns whether merging resulted in a new slab.
    pub fn is_changed(&self) -> bool {
        matches!(self, Merged::Changed(_))
    }
}

//--- Debug

impl<Octs: AsRef<[u8]>> fmt::Debug for Merged<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Merged::Changed(slab) => {
                f.debug_tuple("Changed").field(slab).finish()
            }
            Merged::Unchanged => f.write_str("Unchanged"),
        }
    }
}

//------------ MergeRank -----------------------------------------------------

/// The preliminary rank of a record in a merged slab.
#[derive(Clone, Copy, Debug)]
enum MergeRank {
    /// A record from the old slab with its rank there.
    Old(u16),

    /// A record added from the new slab with its rank there.
    New(u16),
}

impl MergeRank {
    /// Returns the slot in the rank map for this rank.
    ///
    /// All old records come before all new records.
    fn slot(self, old_count: usize) -> usize {
        match self {
            MergeRank::Old(rank) => rank.into(),
            MergeRank::New(rank) => old_count + usize::from(rank),
        }
    }
}

//------------ Slab::merge ---------------------------------------------------

impl<Octs: AsRef<[u8]>> Slab<Octs> {
    /// Merges the records of another slab into a new slab.
    ///
    /// The new slab contains all records of `self` and all records of
    /// `new` that aren’t already present in `self` according to `rules`.
    /// The reserved header is copied from `self`. In load order, the
    /// records of `self` come first in their original order, followed by
    /// the records added from `new` in their order there.
    ///
    /// If no records are added, the method returns [`Merged::Unchanged`]
    /// unless `flags` request a forced merge. Merging fails if `flags`
    /// request an exact merge and some record was already present, if the
    /// result would have more than one record of a singleton type or more
    /// than 65,535 records, or if the octets builder runs out of space.
    pub fn merge<Target, Other, R>(
        &self,
        new: &Slab<Other>,
        rules: &R,
        flags: MergeFlags,
    ) -> Result<Merged<Target>, SlabError>
    where
        Target: FromBuilder,
        <Target as FromBuilder>::Builder: EmptyBuilder + AsMut<[u8]>,
        Other: AsRef<[u8]>,
        R: SlabRules + ?Sized,
    {
        let old_count = self.count();
        let new_count = new.count();
        let additions: Vec<RawRecord> = new
            .raw_records()
            .filter(|record| !self.contains(record.data, rules))
            .collect();
        let total = old_count + additions.len();

        if flags.exact() && additions.len() != new_count {
            debug!(
                "exact merge rejected: {} of {} records already present",
                new_count - additions.len(),
                new_count
            );
            return Err(SlabError::NotExact);
        }
        if additions.is_empty() && !flags.force() {
            trace!("merge left slab of {} records unchanged", old_count);
            return Ok(Merged::Unchanged);
        }
        if total > 1 && rules.is_singleton() {
            debug!("merge rejected: {} records for singleton type", total);
            return Err(SlabError::SingletonViolation);
        }
        if total > MAX_COUNT {
            debug!("merge rejected: {} records", total);
            return Err(SlabError::CapacityExceeded);
        }

        let size = self.reserved_len()
            + table_len(total)
            + self.records_len()
            + additions
                .iter()
                .map(|record| record.stored_len())
                .sum::<usize>();
        let mut target = Target::Builder::empty();
        append(&mut target, self.reserved())?;
        append_table(&mut target, total)?;

        let mut slots = vec![None; old_count + new_count];
        let mut pos = table_len(total);
        let mut old_records = self.raw_records();
        let mut new_records = additions.into_iter();
        let mut old_next = old_records.next();
        let mut new_next = new_records.next();
        loop {
            let (record, rank) = match (old_next, new_next) {
                (None, None) => break,
                (Some(old_record), Some(new_record))
                    if rules.compare(old_record.data, new_record.data)
                        == Ordering::Greater =>
                {
                    new_next = new_records.next();
                    (new_record, MergeRank::New(new_record.rank))
                }
                (Some(old_record), _) => {
                    old_next = old_records.next();
                    (old_record, MergeRank::Old(old_record.rank))
                }
                (None, Some(new_record)) => {
                    new_next = new_records.next();
                    (new_record, MergeRank::New(new_record.rank))
                }
            };
            slots[rank.slot(old_count)] = Some(pos as u32);
            append_record(&mut target, record.rank, record.data)?;
            pos += record.stored_len();
        }
        debug_assert_eq!(target.as_mut().len(), size);
        let placed = compact_table(
            &mut target.as_mut()[self.reserved_len()..],
            &slots,
        );
        debug_assert_eq!(placed, total);

        trace!(
            "merged {} and {} records into {} records",
            old_count,
            new_count,
            total
        );
        Ok(Merged::Changed(Slab::from_octets_unchecked(
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

    fn merge(
        old: &VecSlab,
        new: &VecSlab,
        flags: MergeFlags,
    ) -> Result<Merged<Vec<u8>>, SlabError> {
        old.merge(new, &Rtype::TXT, flags)
    }

    #[test]
    fn load_order_is_concatenated() {
        let old = slab(&[b"d", b"b"]);
        let new = slab(&[b"e", b"a", b"b", b"c"]);
        let merged = merge(&old, &new, MergeFlags::new())
            .unwrap()
            .into_slab()
            .unwrap();
        assert_eq!(
            merged.iter().collect::<Vec<_>>(),
            [b"a", b"b", b"c", b"d", b"e"]
        );
        assert_eq!(
            merged.load_order().collect::<Vec<_>>(),
            [b"d", b"b", b"e", b"a", b"c"]
        );
        assert_eq!(
            ranked(&merged),
            [
                (3, &b"a"[..]),
                (1, &b"b"[..]),
                (4, &b"c"[..]),
                (0, &b"d"[..]),
                (2, &b"e"[..]),
            ]
        );
    }

    #[test]
    fn unchanged_and_forced() {
        let old = slab(&[b"a", b"b"]);
        let new = slab(&[b"b"]);
        assert!(!merge(&old, &new, MergeFlags::new()).unwrap().is_changed());
        let forced = merge(&old, &new, MergeFlags::new().with_force())
            .unwrap()
            .into_slab()
            .unwrap();
        assert!(forced.equal(&old));
        assert_eq!(
            forced.load_order().collect::<Vec<_>>(),
            old.load_order().collect::<Vec<_>>()
        );
    }

    #[test]
    fn exact() {
        let old = slab(&[b"a", b"b"]);
        assert_eq!(
            merge(&old, &slab(&[b"c", b"b"]), MergeFlags::new().with_exact())
                .unwrap_err(),
            SlabError::NotExact
        );
        let merged =
            merge(&old, &slab(&[b"c", b"d"]), MergeFlags::new().with_exact())
                .unwrap()
                .into_slab()
                .unwrap();
        assert_eq!(merged.count(), 4);
    }

    #[test]
    fn singleton() {
        let old = VecSlab::encode(&Rtype::CNAME, b"", [b"a"]).unwrap();
        let new = VecSlab::encode(&Rtype::CNAME, b"", [b"b"]).unwrap();
        assert_eq!(
            old.merge::<Vec<u8>, _, _>(&new, &Rtype::CNAME, MergeFlags::new())
                .unwrap_err(),
            SlabError::SingletonViolation
        );

        // Unchanged is reported before the singleton check.
        assert!(!old
            .merge::<Vec<u8>, _, _>(&old, &Rtype::CNAME, MergeFlags::new())
            .unwrap()
            .is_changed());
    }

    #[test]
    fn capacity() {
        let old = VecSlab::encode(
            &Rtype::TXT,
            b"",
            (0..MAX_COUNT as u32).map(u32::to_be_bytes),
        )
        .unwrap();
        assert_eq!(
            merge(&old, &slab(&[b"new"]), MergeFlags::new()).unwrap_err(),
            SlabError::CapacityExceeded
        );
    }

    #[test]
    fn keeps_old_header() {
        let old = VecSlab::encode(&Rtype::TXT, b"old", [b"a"]).unwrap();
        let new = VecSlab::encode(&Rtype::TXT, b"new!", [b"b"]).unwrap();
        let merged = merge(&old, &new, MergeFlags::new())
            .unwrap()
            .into_slab()
            .unwrap();
        assert_eq!(merged.reserved(), b"old");
        assert_eq!(merged.size(), merged.as_slice().len());
        assert!(Slab::from_octets(merged.as_slice(), 3).is_ok());
    }

    #[test]
    fn debug() {
        let old = slab(&[b"a"]);
        assert_eq!(
            format!("{:?}", merge(&old, &old, MergeFlags::new()).unwrap()),
            "Unchanged"
        );
        assert_eq!(
            format!(
                "{:?}",
                merge(&old, &old, MergeFlags::new().with_force()).unwrap()
            ),
            "Changed(Slab { reserved: 0, records: [#0 61] })"
        );
    }

    #[cfg(feature = "heapless")]
    #[test]
    fn out_of_memory() {
        type Small = heapless::Vec<u8, 16>;
        let old = slab(&[b"a"]);

        // Needs 11 octets.
        let flags = MergeFlags::new().with_force();
        let merged = old
            .merge::<Small, _, _>(&old, &Rtype::TXT, flags)
            .unwrap()
            .into_slab()
            .unwrap();
        assert!(merged.equal(&old));

        // Needs 20 octets.
        assert_eq!(
            old.merge::<Small, _, _>(
                &slab(&[b"b"]),
                &Rtype::TXT,
                MergeFlags::new()
            )
            .unwrap_err(),
            SlabError::OutOfMemory
        );
    }
}
