//! Building a slab from a sequence of records.

use super::error::SlabError;
use super::layout::{
    append, append_record, append_table, compact_table, table_len,
    MAX_COUNT, MAX_DATA_LEN, RECORD_HEADER_LEN,
};
use super::rules::SlabRules;
use super::Slab;
use core::cmp::{self, Ordering};
use octseq::builder::{EmptyBuilder, FromBuilder};
use std::vec::Vec;
use tracing::{debug, trace};

//------------ Ranked --------------------------------------------------------

/// A source record tagged with its position in the source sequence.
struct Ranked<T> {
    rank: u16,
    item: T,
}

impl<T: AsRef<[u8]>> Ranked<T> {
    fn data(&self) -> &[u8] {
        self.item.as_ref()
    }
}

//------------ Slab::encode --------------------------------------------------

impl<Octs: FromBuilder> Slab<Octs>
where
    <Octs as FromBuilder>::Builder: EmptyBuilder + AsMut<[u8]>,
{
    /// Creates a slab from a sequence of records.
    ///
    /// Each item of `records` provides the data of one record. The order of
    /// the items is the load order of the records. The records will be
    /// sorted according to `rules`. Records that are canonically equal are
    /// included only once, with the rank of the first and the data of the
    /// last of them.
    ///
    /// The reserved header of the new slab is a copy of `reserved`.
    ///
    /// The function fails if `records` is empty, if it contains more than
    /// 65,535 items, if any record is longer than 65,535 octets, if
    /// `rules` declare a singleton type but more than one distinct record
    /// is given, or if the octets builder runs out of space.
    pub fn encode<R, I>(
        rules: &R,
        reserved: &[u8],
        records: I,
    ) -> Result<Self, SlabError>
    where
        R: SlabRules + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let mut items = Vec::new();
        for (rank, item) in records.into_iter().enumerate() {
            if rank >= MAX_COUNT {
                debug!(
                    "slab encoding rejected: more than {} records",
                    MAX_COUNT
                );
                return Err(SlabError::CapacityExceeded);
            }
            if item.as_ref().len() > MAX_DATA_LEN {
                debug!(
                    "slab encoding rejected: record {} has {} octets",
                    rank,
                    item.as_ref().len()
                );
                return Err(SlabError::LongRecord);
            }
            items.push(Ranked {
                rank: rank as u16,
                item,
            });
        }
        if items.is_empty() {
            debug!("slab encoding rejected: no records");
            return Err(SlabError::InvalidArgument);
        }
        let source_count = items.len();

        // Sorting is stable, so equal records stay in load order and the
        // last one of a run is the one loaded last.
        items.sort_by(|left, right| rules.compare(left.data(), right.data()));
        let items = collapse_duplicates(items, rules);

        if items.len() > 1 && rules.is_singleton() {
            debug!(
                "slab encoding rejected: {} records for singleton type",
                items.len()
            );
            return Err(SlabError::SingletonViolation);
        }
        debug_assert!(items.len() <= MAX_COUNT);

        let records_len: usize = items
            .iter()
            .map(|item| RECORD_HEADER_LEN + item.data().len())
            .sum();
        let size = reserved.len() + table_len(items.len()) + records_len;

        // `with_capacity` panics for fixed-capacity builders that are too
        // small.
        let mut target = Octs::Builder::empty();
        append(&mut target, reserved)?;
        append_table(&mut target, items.len())?;
        let mut slots = vec![None; source_count];
        let mut pos = table_len(items.len());
        for item in &items {
            slots[usize::from(item.rank)] = Some(pos as u32);
            append_record(&mut target, item.rank, item.data())?;
            pos += RECORD_HEADER_LEN + item.data().len();
        }
        debug_assert_eq!(target.as_mut().len(), size);
        let placed =
            compact_table(&mut target.as_mut()[reserved.len()..], &slots);
        debug_assert_eq!(placed, items.len());

        trace!(
            "encoded slab with {} records into {} octets",
            items.len(),
            size
        );
        Ok(Slab::from_octets_unchecked(
            Octs::from_builder(target),
            reserved.len(),
        ))
    }

    /// Creates a slab from a sequence of records with a zeroed header.
    ///
    /// This is the same as [`encode`][Self::encode] except that the
    /// reserved header will be `reserved_len` zero octets.
    pub fn encode_zeroed<R, I>(
        rules: &R,
        reserved_len: usize,
        records: I,
    ) -> Result<Self, SlabError>
    where
        R: SlabRules + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        Self::encode(rules, &vec![0; reserved_len], records)
    }
}

/// Collapses each run of canonically equal records in a sorted vec.
///
/// The survivor of a run is its last element which takes on the smallest
/// rank found in the run.
fn collapse_duplicates<T, R>(
    items: Vec<Ranked<T>>,
    rules: &R,
) -> Vec<Ranked<T>>
where
    T: AsRef<[u8]>,
    R: SlabRules + ?Sized,
{
    let mut res: Vec<Ranked<T>> = Vec::with_capacity(items.len());
    for item in items {
        match res.last_mut() {
            Some(last)
                if rules.compare(last.data(), item.data())
                    == Ordering::Equal =>
            {
                *last = Ranked {
                    rank: cmp::min(last.rank, item.rank),
                    item: item.item,
                };
            }
            _ => res.push(item),
        }
    }
    res
}

//============ Tests =========================================================
