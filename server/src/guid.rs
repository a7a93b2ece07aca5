/*
 * Created on Mon Jul 27 2026
 *
 * This file is a part of Skytable
 * Skytable (formerly known as TerrabaseDB or Skybase) is a free and open-source
 * NoSQL database written by Sayan Nandan ("the Author") with the
 * vision to provide flexibility in data modelling without compromising
 * on performance, queryability or scalability.
 *
 * Copyright (c) 2026, Sayan Nandan <ohsayan@outlook.com>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! 128-bit identifiers: a 48-bit database id (DBID) paired with a 34-bit
//! local serial number, packed so the wire form is indistinguishable from a
//! random RFC 4122 v4 UUID.
//!
//! The exact sub-field placement within the 128 bits is an implementation
//! choice (see DESIGN.md); only the externally observable text form and the
//! (dbid, serial) round trip are load-bearing.

use crate::error::Error;
use core::fmt;
use uuid::{Builder as UuidBuilder, Uuid};

const SERIAL_BITS: u32 = 34;
const SERIAL_MASK: u64 = (1 << SERIAL_BITS) - 1;
const DBID_BITS: u32 = 48;
const DBID_MASK: u64 = (1 << DBID_BITS) - 1;

const VERSION_NIBBLE: u64 = 0x4; // RFC 4122 version 4
const VARIANT_BITS: u64 = 0b10;

/// A 48-bit source/destination database identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dbid(u64);

impl Dbid {
    pub const ZERO: Self = Self(0);

    /// Truncates `v` to 48 bits.
    pub const fn new(v: u64) -> Self {
        Self(v & DBID_MASK)
    }
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::LowerHex for Dbid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// A 128-bit identifier: `(dbid, serial)` plus RFC 4122 v4 padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid {
    raw: u128,
}

impl Guid {
    /// The distinguished null GUID (`"0"`/`"null"` in text form).
    pub const NULL: Self = Self { raw: 0 };

    pub fn new(dbid: Dbid, serial: u64) -> Self {
        let serial = serial & SERIAL_MASK;
        if dbid.get() == 0 && serial == 0 {
            return Self::NULL;
        }
        let dbid_high = (dbid.get() >> 16) & 0xFFFF_FFFF;
        let dbid_low = dbid.get() & 0xFFFF;
        let hi: u64 = (dbid_high << 32) | (dbid_low << 16) | (VERSION_NIBBLE << 12);
        let lo: u64 = (VARIANT_BITS << 62) | serial;
        // route the packed bits through `uuid::Builder` to stamp the version/
        // variant nibbles, rather than hand-rolling the RFC 4122 bit placement.
        let raw = ((hi as u128) << 64) | (lo as u128);
        let mut builder = UuidBuilder::from_u128(raw);
        builder.set_version(uuid::Version::Random);
        builder.set_variant(uuid::Variant::RFC4122);
        Self {
            raw: builder.into_uuid().as_u128(),
        }
    }

    pub fn is_null(self) -> bool {
        self.raw == 0
    }

    pub fn dbid(self) -> Dbid {
        let hi = (self.raw >> 64) as u64;
        let dbid_high = hi >> 32;
        let dbid_low = (hi >> 16) & 0xFFFF;
        Dbid::new((dbid_high << 16) | dbid_low)
    }

    pub fn serial(self) -> u64 {
        let lo = self.raw as u64;
        lo & SERIAL_MASK
    }

    /// Adjusts only the serial number, keeping the same DBID.
    pub fn with_serial(self, serial: u64) -> Self {
        Self::new(self.dbid(), serial)
    }

    pub fn as_u128(self) -> u128 {
        self.raw
    }

    pub fn from_u128(raw: u128) -> Self {
        Self { raw }
    }

    /// Parses the 32-hex-digit form, or the `"0"`/`"null"` shorthand for
    /// [`Guid::NULL`].
    pub fn parse(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s == "0" || s.eq_ignore_ascii_case("null") {
            return Ok(Self::NULL);
        }
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::Lex);
        }
        let uuid = Uuid::parse_str(s).map_err(|_| Error::Lex)?;
        Ok(Self { raw: uuid.as_u128() })
    }

    /// Writes the canonical text form (`"0"` for null, else 32 lowercase
    /// hex digits) into `out`.
    pub fn write_text(self, out: &mut String) {
        if self.is_null() {
            out.push('0');
        } else {
            let uuid = Uuid::from_u128(self.raw);
            out.push_str(uuid.simple().to_string().as_str());
        }
    }

    pub fn to_text(self) -> String {
        let mut s = String::with_capacity(32);
        self.write_text(&mut s);
        s
    }

    /// The "compressed" form: a 1-hex-digit length-of-dbid (length + 1, so
    /// the all-zero DBID still encodes as a nonzero digit), the DBID XORed
    /// against its own big-endian byte width, and the raw serial in hex.
    pub fn write_compressed(self, out: &mut String) {
        use core::fmt::Write;
        if self.is_null() {
            out.push('0');
            return;
        }
        let dbid = self.dbid().get();
        let dbid_bytes = ((DBID_BITS as usize) + 7) / 8;
        let mut len = dbid_bytes;
        while len > 1 && (dbid >> ((len - 1) * 8)) & 0xFF == 0 {
            len -= 1;
        }
        // length+1 so a leading-zero-free encoding of length 0 never collides
        write!(out, "{:x}", len + 1).unwrap();
        let exored = dbid ^ ((1u64 << (len * 8)) - 1).min(u64::MAX);
        write!(out, "{:0width$x}", exored, width = len * 2).unwrap();
        write!(out, "{:x}", self.serial()).unwrap();
    }

    pub fn compressed(self) -> String {
        let mut s = String::new();
        self.write_compressed(&mut s);
        s
    }

    /// Decodes [`Self::write_compressed`]'s output back into a [`Guid`].
    pub fn parse_compressed(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s == "0" {
            return Ok(Self::NULL);
        }
        let mut chars = s.chars();
        let len_digit = chars.next().ok_or(Error::Lex)?;
        let len_plus_one = len_digit.to_digit(16).ok_or(Error::Lex)? as usize;
        let len = len_plus_one.checked_sub(1).ok_or(Error::Lex)?;
        let rest = &s[len_digit.len_utf8()..];
        let dbid_hex_len = len * 2;
        if rest.len() < dbid_hex_len {
            return Err(Error::Lex);
        }
        let (dbid_hex, serial_hex) = rest.split_at(dbid_hex_len);
        if serial_hex.is_empty() {
            return Err(Error::Lex);
        }
        let exored = if dbid_hex.is_empty() {
            0
        } else {
            u64::from_str_radix(dbid_hex, 16).map_err(|_| Error::Lex)?
        };
        let mask = (1u64 << (len * 8)) - 1;
        let dbid = exored ^ mask;
        let serial = u64::from_str_radix(serial_hex, 16).map_err(|_| Error::Lex)?;
        Ok(Self::new(Dbid::new(dbid), serial))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_guid_roundtrips() {
        assert!(Guid::NULL.is_null());
        assert_eq!(Guid::parse("0").unwrap(), Guid::NULL);
        assert_eq!(Guid::parse("null").unwrap(), Guid::NULL);
        assert_eq!(Guid::NULL.to_text(), "0");
    }

    #[test]
    fn dbid_serial_roundtrip() {
        let g = Guid::new(Dbid::new(0x1234_5678_9abc), 0x1_2345_6789 & SERIAL_MASK);
        assert_eq!(g.dbid(), Dbid::new(0x1234_5678_9abc));
        assert_eq!(g.serial(), 0x1_2345_6789 & SERIAL_MASK);
    }

    #[test]
    fn text_roundtrip() {
        let g = Guid::new(Dbid::new(0xdead_beef_1234), 42);
        let text = g.to_text();
        assert_eq!(text.len(), 32);
        let back = Guid::parse(&text).unwrap();
        assert_eq!(g, back);
    }

    #[test]
    fn version_and_variant_bits_are_set() {
        let g = Guid::new(Dbid::new(1), 1);
        let raw = g.as_u128();
        let hi = (raw >> 64) as u64;
        let lo = raw as u64;
        assert_eq!((hi >> 12) & 0xF, VERSION_NIBBLE);
        assert_eq!((lo >> 62) & 0b11, VARIANT_BITS);
    }

    #[test]
    fn bad_text_is_lex_error() {
        assert_eq!(Guid::parse("zz").unwrap_err(), Error::Lex);
        assert_eq!(Guid::parse("12345").unwrap_err(), Error::Lex);
    }

    #[test]
    fn compressed_form_roundtrips() {
        for (dbid, serial) in [
            (0x1234_5678_9abcu64, 42u64),
            (0x0u64, 7u64),
            (0xffff_ffff_ffffu64, 0x3_ffff_ffffu64),
            (0x1u64, 0u64),
        ] {
            let g = Guid::new(Dbid::new(dbid), serial & SERIAL_MASK);
            let packed = g.compressed();
            let back = Guid::parse_compressed(&packed).unwrap();
            assert_eq!(g, back, "roundtrip failed for {packed}");
        }
    }

    #[test]
    fn null_guid_compressed_form_roundtrips() {
        assert_eq!(Guid::NULL.compressed(), "0");
        assert_eq!(Guid::parse_compressed("0").unwrap(), Guid::NULL);
    }
}
