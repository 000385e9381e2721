//! IANA Definitions for DNS.
//!
//! This module contains types for parameters defined in IANA registries
//! that are relevant for this crate. Currently, this is only the registry
//! of resource record types.
//!
//! The types wrap the raw integer value and provide associated constants
//! for all well-defined values. There are two methods `from_int()` and
//! `to_int()` to convert from and to raw integer values as well as
//! implementations of the `From` trait for these. `FromStr` and `Display`
//! convert from the mnemonics to the values and back.

pub use self::rtype::Rtype;

#[macro_use]
mod macros;

pub mod rtype;
