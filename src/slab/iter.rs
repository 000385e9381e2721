//! Reading the records of a slab.

use super::error::NoMoreItems;
use super::layout::{
    read_count, read_offset, table_len, RawRecords, RecordCursor,
};
use super::Slab;
use core::iter::FusedIterator;

//------------ RdataCursor ---------------------------------------------------

/// A cursor moving over the records of a slab in canonical order.
///
/// A new cursor isn’t positioned on any record yet. Calling
/// [`first`][Self::first] moves it to the first record, after which
/// [`next`][Self::next] moves it forward one record at a time until there
/// are no more records. The cursor can only move forward. In order to
/// start over, call [`first`][Self::first] again or create a new cursor.
///
/// Cloning a cursor produces a new cursor over the same slab that isn’t
/// positioned, not a copy of the current position.
///
/// For most purposes, the iterator returned by [`Slab::iter`] is more
/// convenient.
#[derive(Debug)]
pub struct RdataCursor<'a> {
    /// The region of the slab.
    region: &'a [u8],

    /// Where the cursor currently is.
    state: State,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    /// Not positioned on a record yet.
    Unbound,

    /// Positioned on the record starting at `pos`.
    ///
    /// `remaining` is the number of records after this one.
    Positioned { pos: usize, remaining: usize },

    /// Moved past the last record.
    Exhausted,
}

impl<'a> RdataCursor<'a> {
    /// Creates a new cursor for the given slab.
    pub fn associate<Octs: AsRef<[u8]>>(slab: &'a Slab<Octs>) -> Self {
        RdataCursor {
            region: slab.region(),
            state: State::Unbound,
        }
    }

    /// Returns the number of records in the slab.
    pub fn count(&self) -> usize {
        read_count(self.region)
    }

    /// Moves the cursor to the first record.
    ///
    /// Returns an error if the slab has no records.
    pub fn first(&mut self) -> Result<(), NoMoreItems> {
        let count = self.count();
        if count == 0 {
            self.state = State::Exhausted;
            return Err(NoMoreItems);
        }
        self.state = State::Positioned {
            pos: table_len(count),
            remaining: count - 1,
        };
        Ok(())
    }

    /// Moves the cursor to the next record.
    ///
    /// Returns an error if the cursor was on the last record already or
    /// hadn’t been positioned via [`first`][Self::first] yet.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(), NoMoreItems> {
        match self.state {
            State::Positioned { pos, remaining } if remaining > 0 => {
                let mut cursor = RecordCursor::new(self.region, pos);
                cursor.next_record();
                self.state = State::Positioned {
                    pos: cursor.pos(),
                    remaining: remaining - 1,
                };
                Ok(())
            }
            State::Positioned { .. } => {
                self.state = State::Exhausted;
                Err(NoMoreItems)
            }
            State::Unbound | State::Exhausted => Err(NoMoreItems),
        }
    }

    /// Returns the data of the record the cursor is positioned on.
    pub fn current(&self) -> Option<&'a [u8]> {
        match self.state {
            State::Positioned { pos, .. } => {
                Some(RecordCursor::new(self.region, pos).peek().data)
            }
            _ => None,
        }
    }
}

impl<'a> Clone for RdataCursor<'a> {
    fn clone(&self) -> Self {
        RdataCursor {
            region: self.region,
            state: State::Unbound,
        }
    }
}

//------------ RankedRecords -------------------------------------------------

/// An iterator over the records of a slab in canonical order.
///
/// The iterator returns the rank of each record together with its data.
#[derive(Clone, Debug)]
pub struct RankedRecords<'a>(RawRecords<'a>);

impl<'a> RankedRecords<'a> {
    pub(super) fn new(region: &'a [u8]) -> Self {
        RankedRecords(RawRecords::new(region))
    }
}

impl<'a> Iterator for RankedRecords<'a> {
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|record| (record.rank, record.data))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> ExactSizeIterator for RankedRecords<'a> {}

impl<'a> FusedIterator for RankedRecords<'a> {}

//------------ Records -------------------------------------------------------

/// An iterator over the record data of a slab in canonical order.
#[derive(Clone, Debug)]
pub struct Records<'a>(RawRecords<'a>);

impl<'a> Records<'a> {
    pub(super) fn new(region: &'a [u8]) -> Self {
        Records(RawRecords::new(region))
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|record| record.data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> ExactSizeIterator for Records<'a> {}

impl<'a> FusedIterator for Records<'a> {}

//------------ LoadOrder -----------------------------------------------------

/// An iterator over the record data of a slab in load order.
///
/// The iterator follows the offset table, so it returns the records in the
/// order of their ranks.
#[derive(Clone, Debug)]
pub struct LoadOrder<'a> {
    region: &'a [u8],
    next: usize,
    count: usize,
}

impl<'a> LoadOrder<'a> {
    pub(super) fn new(region: &'a [u8]) -> Self {
        LoadOrder {
            region,
            next: 0,
            count: read_count(region),
        }
    }
}

impl<'a> Iterator for LoadOrder<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.count {
            return None;
        }
        let offset = read_offset(self.region, self.next);
        self.next += 1;
        Some(RecordCursor::new(self.region, offset).peek().data)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.count - self.next;
        (len, Some(len))
    }
}

impl<'a> ExactSizeIterator for LoadOrder<'a> {}

impl<'a> FusedIterator for LoadOrder<'a> {}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::iana::Rtype;
    use crate::slab::test::slab;
    use std::vec::Vec;

    #[test]
    fn cursor_states() {
        let slab = slab(&[b"c", b"a", b"b"]);
        let mut cursor = slab.cursor();
        assert_eq!(cursor.count(), 3);
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.next(), Err(NoMoreItems));

        cursor.first().unwrap();
        assert_eq!(cursor.current(), Some(&b"a"[..]));
        cursor.next().unwrap();
        assert_eq!(cursor.current(), Some(&b"b"[..]));

        // A clone starts from scratch.
        let mut clone = cursor.clone();
        assert_eq!(clone.current(), None);
        clone.first().unwrap();
        assert_eq!(clone.current(), Some(&b"a"[..]));

        cursor.next().unwrap();
        assert_eq!(cursor.current(), Some(&b"c"[..]));
        assert_eq!(cursor.next(), Err(NoMoreItems));
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.next(), Err(NoMoreItems));

        // Restarting works.
        cursor.first().unwrap();
        assert_eq!(cursor.current(), Some(&b"a"[..]));
    }

    #[test]
    fn empty_cursor() {
        let slab = Slab::from_octets(&b"\x00\x00"[..], 0).unwrap();
        let mut cursor = RdataCursor::associate(&slab);
        assert_eq!(cursor.count(), 0);
        assert_eq!(cursor.first(), Err(NoMoreItems));
        assert_eq!(cursor.current(), None);
        assert_eq!(slab.iter().next(), None);
        assert_eq!(slab.load_order().next(), None);
    }

    #[test]
    fn iterators() {
        let slab = slab(&[b"c", b"a", b"b", b"a"]);
        let records = slab.iter();
        assert_eq!(records.len(), 3);
        assert_eq!(records.collect::<Vec<_>>(), [b"a", b"b", b"c"]);
        assert_eq!(
            slab.iter_ranked().collect::<Vec<_>>(),
            [(1, &b"a"[..]), (2, &b"b"[..]), (0, &b"c"[..])]
        );
        assert_eq!(
            slab.load_order().collect::<Vec<_>>(),
            [b"c", b"a", b"b"]
        );
        assert_eq!((&slab).into_iter().count(), 3);
    }

    #[test]
    fn concurrent_cursors() {
        let slab = Slab::<Vec<u8>>::encode(
            &Rtype::TXT,
            b"",
            (0..100u8).map(|i| [i]),
        )
        .unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let data: Vec<_> = slab.iter().collect();
                    assert_eq!(data.len(), 100);
                    assert!(data.windows(2).all(|pair| pair[0] < pair[1]));
                });
            }
        });
    }
}
