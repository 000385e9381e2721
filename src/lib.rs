//! Compact storage for DNS resource record sets.
//!
//! This crate provides the _slab_, a packed binary encoding for the record
//! data of a DNS resource record set (RRset) as it is kept by an
//! authoritative server or a cache. A slab holds all records of the set in
//! one contiguous octets sequence, sorted into the canonical order used by
//! DNSSEC, while still remembering the order in which the records were
//! originally loaded.
//!
//! # Modules
//!
//! * [base] contains the fundamental types the slab builds on, currently
//!   the record type registry and the canonical ordering trait, and
#![cfg_attr(feature = "std", doc = "* [slab]")]
#![cfg_attr(not(feature = "std"), doc = "* slab")]
//!   contains the slab itself together with the operations creating,
//!   combining, and reading it.
//!
//! # Reference of Feature Flags
//!
//! * `bytes`: Enables using the types `Bytes` and `BytesMut` from the
//!    [bytes](https://github.com/tokio-rs/bytes) crate as octet sequences
//!    for slabs.
//! * `heapless`: enables the use of the `Vec` type from the
//!   [heapless](https://github.com/japaric/heapless) crate as octet
//!   sequences. Since these have a fixed capacity, building a slab into
//!   them can run out of space.
//! * `smallvec`: enables the use of the `Smallvec` type from the
//!   [smallvec](https://github.com/servo/rust-smallvec) crate as octet
//!   sequences.
//! * `std`: support for the Rust std library. This feature is enabled by
//!   default and currently required for the
#![cfg_attr(feature = "std", doc = "  [slab]")]
#![cfg_attr(not(feature = "std"), doc = "  slab")]
//!   module which needs an allocator for its scratch space.

#![no_std]
#![allow(renamed_and_removed_lints)]
#![allow(clippy::unknown_clippy_lints)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
#[allow(unused_imports)] // Import macros even if unused.
#[macro_use]
extern crate std;

#[macro_use]
extern crate core;

pub mod base;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod slab;
