//! Low-level access to the slab layout.
//!
//! All positions handled here are relative to the start of the record
//! count, i.e., to the first octet after the reserved header. We call the
//! part of a slab starting there its _region._ All field accesses go
//! through slice indexing, so a malformed region leads to a panic rather
//! than to reading garbage.

use super::error::SlabError;
use octseq::builder::{OctetsBuilder, ShortBuf};

//------------ Constants -----------------------------------------------------

/// The length of the record count field.
pub(crate) const COUNT_LEN: usize = 2;

/// The length of a single entry of the offset table.
pub(crate) const OFFSET_LEN: usize = 4;

/// The length of the length and rank fields preceding record data.
pub(crate) const RECORD_HEADER_LEN: usize = 4;

/// The maximum number of records in a slab.
pub(crate) const MAX_COUNT: usize = 0xFFFF;

/// The maximum length of the data of a single record.
pub(crate) const MAX_DATA_LEN: usize = 0xFFFF;

/// Returns the length of the count field and a table of `count` offsets.
///
/// This is also the offset of the first record in a slab of `count`
/// records.
pub(crate) const fn table_len(count: usize) -> usize {
    COUNT_LEN + OFFSET_LEN * count
}

//------------ Field Access --------------------------------------------------

pub(crate) fn read_u16(region: &[u8], pos: usize) -> u16 {
    u16::from_be_bytes([region[pos], region[pos + 1]])
}

pub(crate) fn write_u16(region: &mut [u8], pos: usize, value: u16) {
    region[pos..pos + 2].copy_from_slice(&value.to_be_bytes())
}

pub(crate) fn read_u32(region: &[u8], pos: usize) -> u32 {
    u32::from_be_bytes([
        region[pos],
        region[pos + 1],
        region[pos + 2],
        region[pos + 3],
    ])
}

pub(crate) fn write_u32(region: &mut [u8], pos: usize, value: u32) {
    region[pos..pos + 4].copy_from_slice(&value.to_be_bytes())
}

/// Returns the record count stored at the start of `region`.
pub(crate) fn read_count(region: &[u8]) -> usize {
    read_u16(region, 0).into()
}

/// Returns the offset stored in the table slot `index`.
pub(crate) fn read_offset(region: &[u8], index: usize) -> usize {
    // u32 always fits into usize on the platforms we support.
    read_u32(region, COUNT_LEN + OFFSET_LEN * index) as usize
}

//------------ RawRecord -----------------------------------------------------

/// A record as it is stored in a slab.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RawRecord<'a> {
    /// The rank as stored in the record.
    pub rank: u16,

    /// The record data.
    pub data: &'a [u8],
}

impl<'a> RawRecord<'a> {
    /// Returns the number of octets the record occupies in a slab.
    pub fn stored_len(&self) -> usize {
        RECORD_HEADER_LEN + self.data.len()
    }
}

//------------ RecordCursor --------------------------------------------------

/// Reads records from a slab region one after another.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RecordCursor<'a> {
    region: &'a [u8],
    pos: usize,
}

impl<'a> RecordCursor<'a> {
    /// Creates a cursor positioned at `pos` within `region`.
    pub fn new(region: &'a [u8], pos: usize) -> Self {
        RecordCursor { region, pos }
    }

    /// Creates a cursor positioned at the first record of `region`.
    pub fn first(region: &'a [u8]) -> Self {
        Self::new(region, table_len(read_count(region)))
    }

    /// Returns the current position of the cursor.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the record at the current position.
    pub fn peek(&self) -> RawRecord<'a> {
        let len = usize::from(read_u16(self.region, self.pos));
        let start = self.pos + RECORD_HEADER_LEN;
        RawRecord {
            rank: read_u16(self.region, self.pos + 2),
            data: &self.region[start..start + len],
        }
    }

    /// Returns the record at the current position and moves past it.
    pub fn next_record(&mut self) -> RawRecord<'a> {
        let res = self.peek();
        self.pos += res.stored_len();
        res
    }
}

//------------ RawRecords ----------------------------------------------------

/// An iterator over the records of a region in storage order.
#[derive(Clone, Debug)]
pub(crate) struct RawRecords<'a> {
    cursor: RecordCursor<'a>,
    remaining: usize,
}

impl<'a> RawRecords<'a> {
    pub fn new(region: &'a [u8]) -> Self {
        RawRecords {
            cursor: RecordCursor::first(region),
            remaining: read_count(region),
        }
    }
}

impl<'a> Iterator for RawRecords<'a> {
    type Item = RawRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.cursor.next_record())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for RawRecords<'a> {}

//------------ Building ------------------------------------------------------

/// Appends a slice to an octets builder.
///
/// Any failure to append is reported as the builder running out of memory.
pub(crate) fn append<Target: OctetsBuilder + ?Sized>(
    target: &mut Target,
    slice: &[u8],
) -> Result<(), SlabError> {
    target.append_slice(slice).map_err(|err| {
        let err: ShortBuf = err.into();
        SlabError::from(err)
    })
}

/// Appends the count and an empty offset table for `count` records.
pub(crate) fn append_table<Target: OctetsBuilder + ?Sized>(
    target: &mut Target,
    count: usize,
) -> Result<(), SlabError> {
    debug_assert!(count <= MAX_COUNT);
    append(target, &(count as u16).to_be_bytes())?;
    for _ in 0..count {
        append(target, &[0; OFFSET_LEN])?;
    }
    Ok(())
}

/// Appends a record with the given rank.
pub(crate) fn append_record<Target: OctetsBuilder + ?Sized>(
    target: &mut Target,
    rank: u16,
    data: &[u8],
) -> Result<(), SlabError> {
    debug_assert!(data.len() <= MAX_DATA_LEN);
    append(target, &(data.len() as u16).to_be_bytes())?;
    append(target, &rank.to_be_bytes())?;
    append(target, data)
}

//------------ compact_table -------------------------------------------------

/// Writes the offset table and the record ranks of a freshly built region.
///
/// The `slots` map contains the offset of each record to be included in the
/// table under the record’s preliminary rank. Slots may be empty. The
/// function walks the slots in ascending order and assigns each occupied
/// slot the next final rank, starting from zero. It writes the offset into
/// the table under that final rank and overwrites the rank field of the
/// record at that offset.
///
/// Returns the number of records placed in the table.
pub(crate) fn compact_table(
    region: &mut [u8],
    slots: &[Option<u32>],
) -> usize {
    let mut rank = 0;
    for &offset in slots.iter().flatten() {
        write_u32(region, COUNT_LEN + OFFSET_LEN * rank, offset);
        write_u16(region, offset as usize + 2, rank as u16);
        rank += 1;
    }
    rank
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::vec::Vec;

    /// Builds a region holding the given records without a valid table.
    fn region(records: &[&[u8]]) -> Vec<u8> {
        let mut res = Vec::new();
        append_table(&mut res, records.len()).unwrap();
        for data in records {
            append_record(&mut res, 0xFFFF, data).unwrap();
        }
        res
    }

    #[test]
    fn table_len_and_cursor() {
        let region = region(&[b"ab", b"", b"xyz"]);
        assert_eq!(table_len(3), 14);
        assert_eq!(region.len(), 14 + 6 + 4 + 7);

        let mut cursor = RecordCursor::first(&region);
        assert_eq!(cursor.pos(), 14);
        let first = cursor.next_record();
        assert_eq!(first.data, b"ab");
        assert_eq!(first.rank, 0xFFFF);
        assert_eq!(cursor.next_record().data, b"");
        assert_eq!(cursor.pos(), 24);
        assert_eq!(cursor.peek().data, b"xyz");
    }

    #[test]
    fn compact_sparse_slots() {
        let mut region = region(&[b"ab", b"", b"xyz"]);
        // Preliminary ranks 1, 4, and 6 with 0, 2, 3, and 5 absent.
        let slots = [
            None,
            Some(24),
            None,
            None,
            Some(14),
            None,
            Some(20),
        ];
        assert_eq!(compact_table(&mut region, &slots), 3);
        assert_eq!(read_offset(&region, 0), 24);
        assert_eq!(read_offset(&region, 1), 14);
        assert_eq!(read_offset(&region, 2), 20);

        let ranks: Vec<_> = RawRecords::new(&region)
            .map(|record| (record.data, record.rank))
            .collect();
        assert_eq!(
            ranks,
            [(&b"ab"[..], 1), (&b""[..], 2), (&b"xyz"[..], 0)]
        );
    }

    #[test]
    fn raw_records_count() {
        let region = region(&[b"a", b"b"]);
        let records = RawRecords::new(&region);
        assert_eq!(records.len(), 2);
        assert_eq!(records.map(|r| r.data).collect::<Vec<_>>(), [b"a", b"b"]);
    }
}
