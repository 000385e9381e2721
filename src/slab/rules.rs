//! The rules applied to the records of a slab.

use crate::base::cmp::CanonicalOrd;
use crate::base::iana::Rtype;
use core::cmp::Ordering;
use core::fmt;

//------------ SlabRules -----------------------------------------------------

/// What a slab needs to know about the record type it stores.
///
/// Since a slab treats record data as opaque octets, it relies on the
/// implementer of this trait for two things: the canonical order of the
/// record data, which determines both the order records are stored in and
/// which records are considered duplicates, and whether the record type
/// permits more than one record per RRset.
///
/// The trait is implemented for [`Rtype`] which compares the record data
/// octet by octet. This is correct for record data in canonical form. If
/// the data contains names that may differ in case, use [`OrderedBy`] with
/// an appropriate comparison function.
pub trait SlabRules {
    /// Compares the data of two records.
    ///
    /// This needs to be a total order and needs to be consistent for the
    /// duration of an operation.
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering;

    /// Returns whether there may be at most one record in an RRset.
    fn is_singleton(&self) -> bool;
}

impl SlabRules for Rtype {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        left.canonical_cmp(right)
    }

    fn is_singleton(&self) -> bool {
        Rtype::is_singleton(*self)
    }
}

impl<'a, T: SlabRules + ?Sized> SlabRules for &'a T {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        (*self).compare(left, right)
    }

    fn is_singleton(&self) -> bool {
        (*self).is_singleton()
    }
}

//------------ OrderedBy -----------------------------------------------------

/// Rules using a custom comparison function for a record type.
///
/// The record type still decides whether the RRset is a singleton.
#[derive(Clone, Copy)]
pub struct OrderedBy<F> {
    rtype: Rtype,
    cmp: F,
}

impl<F> OrderedBy<F> {
    /// Creates new rules from a record type and a comparison function.
    pub fn new(rtype: Rtype, cmp: F) -> Self
    where
        F: Fn(&[u8], &[u8]) -> Ordering,
    {
        OrderedBy { rtype, cmp }
    }

    /// Returns the record type of the rules.
    pub fn rtype(&self) -> Rtype {
        self.rtype
    }
}

impl<F: Fn(&[u8], &[u8]) -> Ordering> SlabRules for OrderedBy<F> {
    fn compare(&self, left: &[u8], right: &[u8]) -> Ordering {
        (self.cmp)(left, right)
    }

    fn is_singleton(&self) -> bool {
        self.rtype.is_singleton()
    }
}

impl<F> fmt::Debug for OrderedBy<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("OrderedBy")
            .field("rtype", &self.rtype)
            .finish_non_exhaustive()
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rtype_rules() {
        assert_eq!(Rtype::A.compare(b"\x01", b"\x01\x00"), Ordering::Less);
        assert_eq!(Rtype::A.compare(b"b", b"a"), Ordering::Greater);
        assert!(SlabRules::is_singleton(&Rtype::CNAME));
        assert!(!SlabRules::is_singleton(&Rtype::TXT));
    }

    #[test]
    fn ordered_by() {
        let rules = OrderedBy::new(Rtype::NS, |left: &[u8], right: &[u8]| {
            left.to_ascii_lowercase().cmp(&right.to_ascii_lowercase())
        });
        assert_eq!(rules.compare(b"Foo", b"fOO"), Ordering::Equal);
        assert!(!rules.is_singleton());
        assert_eq!(rules.rtype(), Rtype::NS);
    }
}
