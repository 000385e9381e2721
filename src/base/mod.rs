//! Basics.
//!
//! This module provides the fundamental types the slab encoding builds on.
//! Record data itself is treated as opaque octets throughout the crate, so
//! all that is needed here is a way to name record types and to talk
//! about their canonical order:
//!
//! * [iana] contains the registry of resource record types as [`Rtype`],
//!   including the knowledge which types may only ever have a single
//!   record in an RRset, and
//! * [cmp] defines the [`CanonicalOrd`] trait for the canonical sort order
//!   of record data defined by DNSSEC.
//!
//! [`CanonicalOrd`]: cmp::CanonicalOrd

pub use self::cmp::CanonicalOrd;
pub use self::iana::Rtype;

pub mod cmp;
pub mod iana;
