//! Additional traits for comparisions.
//!
//! Records within an RRset have a well-defined order, the _canonical
//! order_, that is used when signing an RRset with DNSSEC. Slabs store
//! their records sorted this way, so that signing or comparing two RRsets
//! never requires sorting them again. In order to make it clear when this
//! mode of comparison is used, this module defines the trait
//! [`CanonicalOrd`] that allows types to define how they should be compared
//! in the context of DNSSEC.

use core::cmp::Ordering;

//------------ CanonicalOrd --------------------------------------------------

/// A trait for the canonical sort order of values.
///
/// The canonical sort order is used in DNS security when multiple values are
/// part of constructing or validating a signature. This sort order differs
/// in some cases from the normal sort order. To avoid confusion, only this
/// trait should be used when DNSSEC signatures are involved.
///
/// Canonical order is defined in [RFC 4034] and clarified in [RFC 6840].
/// Resource records within an RR set are ordered by comparing the canonical
/// wire-format representation of their record data as left-justified
/// unsigned octet sequences where the absence of an octet sorts before a
/// zero octet. This is exactly how slices of octets are ordered in Rust, so
/// the implementation for `[u8]` is the natural order of the slice. It
/// assumes that the data is already in canonical form, i.e., any embedded
/// domain names of the record types listed in RFC 4034 have been
/// lowercased.
///
/// [RFC 4034]: https://tools.ietf.org/html/rfc4034
/// [RFC 6840]: https://tools.ietf.org/html/rfc6840
pub trait CanonicalOrd<Rhs: ?Sized = Self> {
    /// Returns the canonical ordering between `self` and `other`.
    #[must_use]
    fn canonical_cmp(&self, other: &Rhs) -> Ordering;

    /// Returns whether `self` is canonically less than `other`.
    #[inline]
    #[must_use]
    fn canonical_lt(&self, other: &Rhs) -> bool {
        matches!(self.canonical_cmp(other), Ordering::Less)
    }

    /// Returns whether `self` is canonically equal to `other`.
    #[inline]
    #[must_use]
    fn canonical_eq(&self, other: &Rhs) -> bool {
        matches!(self.canonical_cmp(other), Ordering::Equal)
    }
}

impl CanonicalOrd for [u8] {
    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn octets_order() {
        let short: &[u8] = b"\x01";
        let zero: &[u8] = b"\x01\x00";
        let high: &[u8] = b"\x02";
        assert!(short.canonical_lt(zero));
        assert!(zero.canonical_lt(high));
        assert!(zero.canonical_eq(&[1, 0]));
        assert_eq!(high.canonical_cmp(short), Ordering::Greater);
    }
}
