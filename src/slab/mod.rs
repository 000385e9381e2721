//! Slabs: compact storage for the records of an RRset.
//!
//! A [`Slab`] stores the record data of all records of an RRset in a single
//! octets sequence. Record owner, class, type, and TTL are shared by all
//! records of the set and are kept elsewhere. A slab is built once, either
//! from a sequence of records via [`Slab::encode`] or by combining two
//! existing slabs via [`Slab::merge`] or [`Slab::subtract`], and never
//! changes afterwards. This makes it safe to read the same slab from any
//! number of places at the same time.
//!
//! # Layout
//!
//! A slab has the following layout. All integers are in network byte
//! order.
//!
//! ```text
//! [reserved header: caller defined length, opaque]
//! [count: u16]
//! [offset table: count × u32]
//! [records in canonical order, each:
//!     [length: u16] [rank: u16] [data: length octets]
//! ]
//! ```
//!
//! The reserved header is space the owner of the slab can use for its own
//! purposes, typically to keep the RRset’s metadata right in front of the
//! records. The slab itself never looks at it.
//!
//! The records are stored sorted by their canonical order as defined by
//! the [`SlabRules`] used when building the slab and contain no duplicates.
//! In addition, each record remembers its _rank_, the position it had in
//! the order the records were originally loaded in. The offset table
//! contains, for each rank, the offset of the record with that rank
//! relative to the start of the count field. This way, the records can be
//! visited both in canonical order via [`Slab::iter`] and in load order via
//! [`Slab::load_order`].
//!
//! # Combining Slabs
//!
//! [`Slab::merge`] creates the union of two slabs. Records present in both
//! are taken from the first one. In load order, all records of the first
//! slab come before those added from the second slab. [`Slab::subtract`]
//! removes the records of one slab from another, keeping the load order of
//! the remaining records. Both operations signal through their return
//! value if there was nothing to do or if nothing would be left.

pub use self::error::{FormError, NoMoreItems, SlabError};
pub use self::iter::{LoadOrder, RankedRecords, RdataCursor, Records};
pub use self::merge::{MergeFlags, Merged};
pub use self::rules::{OrderedBy, SlabRules};
pub use self::subtract::{SubtractFlags, Subtracted};

mod encode;
mod error;
mod iter;
mod layout;
mod merge;
mod rules;
mod subtract;

use self::layout::{
    read_count, read_offset, table_len, RawRecords, RecordCursor,
    COUNT_LEN, OFFSET_LEN,
};
use core::cmp::Ordering;
use core::fmt;
use octseq::parse::Parser;

//------------ Slab ----------------------------------------------------------

/// The record data of an RRset packed into a single octets sequence.
///
/// See the [module documentation][self] for the details of the format.
///
/// The type is generic over the octets sequence holding the slab. Creating
/// slabs requires a type that can be built via an octets builder, such as
/// `Vec<u8>` or, with the `bytes` feature, `Bytes`. If the builder has a
/// limited capacity, such as a `heapless::Vec`, building can fail with
/// [`SlabError::OutOfMemory`].
#[derive(Clone)]
pub struct Slab<Octs> {
    /// The length of the reserved header.
    reserved: usize,

    /// The octets of the complete slab including the header.
    octets: Octs,
}

impl<Octs: AsRef<[u8]>> Slab<Octs> {
    /// Creates a slab from an octets sequence.
    ///
    /// The sequence must contain a complete slab with a reserved header of
    /// `reserved` octets. The function checks that the count, offset
    /// table, and records are consistent and that there is no data after
    /// the last record. It cannot check that the records are sorted as this
    /// requires knowing the rules for the record type.
    pub fn from_octets(
        octets: Octs,
        reserved: usize,
    ) -> Result<Self, FormError> {
        Self::check_slice(octets.as_ref(), reserved)?;
        Ok(Self::from_octets_unchecked(octets, reserved))
    }

    /// Creates a slab from an octets sequence without checking.
    ///
    /// If the octets sequence does not contain a correctly encoded slab,
    /// the methods of the returned value may panic.
    pub fn from_octets_unchecked(octets: Octs, reserved: usize) -> Self {
        Slab { reserved, octets }
    }

    /// Checks that a slice contains a correctly encoded slab.
    fn check_slice(slice: &[u8], reserved: usize) -> Result<(), FormError> {
        let mut parser = Parser::from_ref(slice);
        parser.advance(reserved)?;
        let count = usize::from(parser.parse_u16_be()?);
        let region_len = parser.remaining() + COUNT_LEN;
        let records_start = table_len(count);

        // Walk the records in storage order and note each record’s
        // position under its rank.
        parser.advance(count * OFFSET_LEN)?;
        let mut offsets = vec![None; count];
        for _ in 0..count {
            let offset = parser.pos() - reserved;
            let len = usize::from(parser.parse_u16_be()?);
            let rank = usize::from(parser.parse_u16_be()?);
            parser.advance(len)?;
            match offsets.get_mut(rank) {
                Some(slot) if slot.is_none() => *slot = Some(offset),
                _ => return Err(FormError::bad_rank()),
            }
        }
        if parser.remaining() != 0 {
            return Err(FormError::trailing_data());
        }

        // Now each table entry must point to the record with its rank.
        parser.seek(reserved + COUNT_LEN)?;
        for expected in offsets {
            let offset = parser.parse_u32_be()? as usize;
            if offset < records_start || offset >= region_len {
                return Err(FormError::bad_offset());
            }
            if Some(offset) != expected {
                return Err(FormError::bad_rank());
            }
        }
        Ok(())
    }
}

impl<Octs> Slab<Octs> {
    /// Returns a reference to the underlying octets sequence.
    pub fn as_octets(&self) -> &Octs {
        &self.octets
    }

    /// Converts the slab into the underlying octets sequence.
    pub fn into_octets(self) -> Octs {
        self.octets
    }

    /// Returns the length of the reserved header.
    pub fn reserved_len(&self) -> usize {
        self.reserved
    }
}

impl<Octs: AsRef<[u8]>> Slab<Octs> {
    /// Returns the complete slab as an octets slice.
    pub fn as_slice(&self) -> &[u8] {
        self.octets.as_ref()
    }

    /// Returns the reserved header.
    pub fn reserved(&self) -> &[u8] {
        &self.as_slice()[..self.reserved]
    }

    /// Returns the part of the slab after the reserved header.
    pub(crate) fn region(&self) -> &[u8] {
        &self.as_slice()[self.reserved..]
    }

    /// Returns the number of records in the slab.
    pub fn count(&self) -> usize {
        read_count(self.region())
    }

    /// Returns the length of the slab including the reserved header.
    ///
    /// The length is determined by walking over all records.
    pub fn size(&self) -> usize {
        let mut cursor = RecordCursor::first(self.region());
        for _ in 0..self.count() {
            cursor.next_record();
        }
        self.reserved + cursor.pos()
    }

    /// Returns the length of all stored records.
    pub(crate) fn records_len(&self) -> usize {
        self.size() - self.reserved - table_len(self.count())
    }

    /// Returns an iterator over the stored records.
    pub(crate) fn raw_records(&self) -> RawRecords<'_> {
        RawRecords::new(self.region())
    }

    /// Returns an iterator over the record data in canonical order.
    pub fn iter(&self) -> Records<'_> {
        Records::new(self.region())
    }

    /// Returns an iterator over ranks and record data in canonical order.
    pub fn iter_ranked(&self) -> RankedRecords<'_> {
        RankedRecords::new(self.region())
    }

    /// Returns an iterator over the record data in load order.
    pub fn load_order(&self) -> LoadOrder<'_> {
        LoadOrder::new(self.region())
    }

    /// Returns a cursor over the records.
    pub fn cursor(&self) -> RdataCursor<'_> {
        RdataCursor::associate(self)
    }

    /// Returns the offset of the record with the given rank.
    ///
    /// The offset is relative to the start of the count field, i.e., the
    /// end of the reserved header.
    pub fn rank_offset(&self, rank: usize) -> Option<usize> {
        if rank < self.count() {
            Some(read_offset(self.region(), rank))
        } else {
            None
        }
    }

    /// Returns whether the slab contains the given record data.
    ///
    /// Because the records are sorted, the scan stops as soon as it has
    /// passed the place where the record would have to be.
    pub fn contains<R: SlabRules + ?Sized>(
        &self,
        data: &[u8],
        rules: &R,
    ) -> bool {
        for record in self.raw_records() {
            match rules.compare(record.data, data) {
                Ordering::Less => {}
                Ordering::Equal => return true,
                Ordering::Greater => return false,
            }
        }
        false
    }

    /// Returns whether two slabs contain exactly the same records.
    ///
    /// Records are compared octet by octet in storage order. Neither the
    /// reserved header nor the load order are considered.
    pub fn equal<Other: AsRef<[u8]>>(&self, other: &Slab<Other>) -> bool {
        self.count() == other.count()
            && self
                .raw_records()
                .zip(other.raw_records())
                .all(|(left, right)| left.data == right.data)
    }

    /// Returns whether two slabs contain canonically equal records.
    ///
    /// This is like [`equal`][Self::equal] but compares the records using
    /// the given rules.
    pub fn equal_structured<Other, R>(
        &self,
        other: &Slab<Other>,
        rules: &R,
    ) -> bool
    where
        Other: AsRef<[u8]>,
        R: SlabRules + ?Sized,
    {
        self.count() == other.count()
            && self.raw_records().zip(other.raw_records()).all(
                |(left, right)| {
                    rules.compare(left.data, right.data) == Ordering::Equal
                },
            )
    }
}

//--- AsRef

impl<Octs: AsRef<[u8]>> AsRef<[u8]> for Slab<Octs> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

//--- IntoIterator

impl<'a, Octs: AsRef<[u8]>> IntoIterator for &'a Slab<Octs> {
    type Item = &'a [u8];
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//--- Debug

impl<Octs: AsRef<[u8]>> fmt::Debug for Slab<Octs> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        struct Record<'a>(u16, &'a [u8]);

        impl<'a> fmt::Debug for Record<'a> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "#{} ", self.0)?;
                for ch in self.1 {
                    write!(f, "{:02x}", ch)?;
                }
                Ok(())
            }
        }

        f.debug_struct("Slab")
            .field("reserved", &self.reserved)
            .field(
                "records",
                &self
                    .raw_records()
                    .map(|record| Record(record.rank, record.data))
                    .collect::<std::vec::Vec<_>>(),
            )
            .finish()
    }
}

//============ Testing =======================================================
