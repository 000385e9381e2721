//! Resource Record (RR) TYPEs

//------------ Rtype ---------------------------------------------------------

int_enum! {
    /// Resource Record Types.
    ///
    /// Each resource records has a 16 bit type value indicating what kind of
    /// information is represented by the record. All records of an RRset
    /// share the same type, which is why a slab never stores it but the
    /// operations building a slab need to know it: some types only allow a
    /// single record per RRset. See [`is_singleton`][Self::is_singleton].
    ///
    /// The currently assigned values are maintained in an [IANA registry].
    /// Only the commonly used types have named constants here. All other
    /// values can still be created via [`from_int`][Self::from_int] and are
    /// displayed in the generic `TYPE`_n_ form.
    ///
    /// [IANA registry]: http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4
    ///
    /// In order to avoid confusion over capitalization, the mnemonics are
    /// treated as single acronyms and therefore all variant names are spelled
    /// with an initial capital letter in accordance with the Rust naming
    /// guidelines.
    =>
    Rtype, u16;

    /// A host address.
    (A => 1, "A")

    /// An authoritative name server.
    (NS => 2, "NS")

    /// The canonical name for an alias
    (CNAME => 5, "CNAME")

    /// Marks the start of a zone of authority.
    (SOA => 6, "SOA")

    /// A domain name pointer.
    (PTR => 12, "PTR")

    /// Host information.
    (HINFO => 13, "HINFO")

    /// Mail exchange.
    (MX => 15, "MX")

    /// Text strings.
    (TXT => 16, "TXT")

    /// IPv6 address.
    ///
    /// See RFC 3596.
    (AAAA =>  28, "AAAA")

    /// Server selection.
    ///
    /// See RFC 2782.
    (SRV => 33, "SRV")

    /// Naming authority pointer.
    ///
    /// See RFC 3403.
    (NAPTR => 35, "NAPTR")

    /// Delegation name.
    ///
    /// See RFC 6672.
    (DNAME => 39, "DNAME")

    /// The EDNS option pseudo record.
    ///
    /// See RFC 6891.
    (OPT => 41, "OPT")

    /// Delegation signer.
    ///
    /// See RFC 4034.
    (DS => 43, "DS")

    /// Resource record signature.
    ///
    /// See RFC 4034.
    (RRSIG => 46, "RRSIG")

    /// Next secure.
    ///
    /// See RFC 4034.
    (NSEC => 47, "NSEC")

    /// DNS key.
    ///
    /// See RFC 4034.
    (DNSKEY => 48, "DNSKEY")

    /// Hashed next secure.
    ///
    /// See RFC 5155.
    (NSEC3 => 50, "NSEC3")

    /// NSEC3 parameters.
    ///
    /// See RFC 5155.
    (NSEC3PARAM => 51, "NSEC3PARAM")

    /// TLSA certificate association.
    ///
    /// See RFC 6698.
    (TLSA => 52, "TLSA")

    /// Child DS.
    ///
    /// See RFC 7344.
    (CDS => 59, "CDS")

    /// Child DNSKEY.
    ///
    /// See RFC 7344.
    (CDNSKEY => 60, "CDNSKEY")

    /// Message digest for DNS zone.
    ///
    /// See RFC 8976.
    (ZONEMD => 63, "ZONEMD")

    /// General purpose service binding.
    ///
    /// See RFC 9460.
    (SVCB => 64, "SVCB")

    /// Service binding for HTTPS.
    ///
    /// See RFC 9460.
    (HTTPS => 65, "HTTPS")

    /// Certification Authority Restriction.
    ///
    /// See RFC 8659.
    (CAA => 257, "CAA")
}

int_enum_str_with_prefix!(Rtype, "TYPE", "unknown record type");

impl Rtype {
    /// Returns whether an RRset of this type may hold at most one record.
    ///
    /// A CNAME or DNAME can only redirect to a single target and a zone
    /// only has a single start of authority. Similarly, a message carries
    /// at most one OPT record. Adding a second record to an RRset of one
    /// of these types is a protocol violation.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self, Rtype::CNAME | Rtype::SOA | Rtype::DNAME | Rtype::OPT)
    }
}

//============ Tests =========================================================

#[cfg(test)]
#[cfg(feature = "std")]
mod test {
    use super::*;
    use core::str::FromStr;
    use std::string::ToString;

    #[test]
    fn singletons() {
        assert!(Rtype::CNAME.is_singleton());
        assert!(Rtype::SOA.is_singleton());
        assert!(Rtype::DNAME.is_singleton());
        assert!(!Rtype::A.is_singleton());
        assert!(!Rtype::RRSIG.is_singleton());
        assert!(!Rtype::from_int(65280).is_singleton());
    }

    #[test]
    fn display_and_parse() {
        assert_eq!(Rtype::AAAA.to_string(), "AAAA");
        assert_eq!(Rtype::from_int(65280).to_string(), "TYPE65280");
        assert_eq!(Rtype::from_str("cname").unwrap(), Rtype::CNAME);
        assert_eq!(Rtype::from_str("type1").unwrap(), Rtype::A);
        assert_eq!(Rtype::from_str("TYPE65280").unwrap().to_int(), 65280);
        assert!(Rtype::from_str("TYPE").is_err());
        assert!(Rtype::from_str("TYPE70000").is_err());
        assert!(Rtype::from_str("bogus").is_err());
    }
}
