//! Errors of slab operations.

use core::fmt;
use octseq::builder::ShortBuf;
use octseq::parse::ShortInput;

//------------ SlabError -----------------------------------------------------

/// Creating a slab failed.
///
/// None of the operations leave anything behind when they fail: no partial
/// slab is returned and all scratch space has been released.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlabError {
    /// The octets builder ran out of space.
    OutOfMemory,

    /// The result would contain more than 65,535 records.
    CapacityExceeded,

    /// The result would contain more than one record of a singleton type.
    SingletonViolation,

    /// A precondition requested via an `exact` flag did not hold.
    NotExact,

    /// An argument was not acceptable, e.g., an empty record sequence.
    InvalidArgument,

    /// The data of a record was longer than 65,535 octets.
    LongRecord,
}

impl From<ShortBuf> for SlabError {
    fn from(_: ShortBuf) -> Self {
        SlabError::OutOfMemory
    }
}

impl fmt::Display for SlabError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            SlabError::OutOfMemory => "out of memory",
            SlabError::CapacityExceeded => "too many records",
            SlabError::SingletonViolation => {
                "multiple records for singleton type"
            }
            SlabError::NotExact => "not exact",
            SlabError::InvalidArgument => "invalid argument",
            SlabError::LongRecord => "record data too long",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SlabError {}

//------------ NoMoreItems ---------------------------------------------------

/// A cursor has no more records to move to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NoMoreItems;

impl fmt::Display for NoMoreItems {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("no more items")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NoMoreItems {}

//------------ FormError -----------------------------------------------------

/// An octets sequence does not contain a correctly encoded slab.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormError(FormErrorInner);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FormErrorInner {
    ShortInput,
    BadOffset,
    BadRank,
    TrailingData,
}

impl FormError {
    pub(crate) fn bad_offset() -> Self {
        FormError(FormErrorInner::BadOffset)
    }

    pub(crate) fn bad_rank() -> Self {
        FormError(FormErrorInner::BadRank)
    }

    pub(crate) fn trailing_data() -> Self {
        FormError(FormErrorInner::TrailingData)
    }
}

impl From<ShortInput> for FormError {
    fn from(_: ShortInput) -> Self {
        FormError(FormErrorInner::ShortInput)
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self.0 {
            FormErrorInner::ShortInput => "short input",
            FormErrorInner::BadOffset => "offset table points outside records",
            FormErrorInner::BadRank => "record rank does not match table",
            FormErrorInner::TrailingData => "trailing data",
        })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FormError {}
