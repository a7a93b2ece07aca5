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

//! Text format:
//!
//! ```text
//! grmap '{'
//!   ( DBID_HEX '{'
//!       ( LOW_HEX '-' HIGH_HEX ':' DDBID_HEX SIGN OFF_HEX )*
//!     '}'
//!   )*
//! '}'
//! ```
//!
//! Whitespace between tokens is tolerated everywhere; hex case is
//! tolerated on read, always written lowercase.

use super::{range::Range, Grmap};
use crate::{
    error::Error,
    guid::Dbid,
    logger::NullLogger,
};

impl Grmap {
    pub fn to_text(&self) -> String {
        let mut out = String::from("grmap {\n");
        for slot in &self.slots {
            if slot.tables.iter().all(|t| t.table.is_empty()) {
                continue;
            }
            use core::fmt::Write;
            writeln!(out, "    {:x} {{", slot.dbid.get()).unwrap();
            for r in slot.ranges() {
                write_range_line(&mut out, r);
            }
            out.push_str("    }\n");
        }
        out.push_str("}\n");
        out
    }

    pub fn from_text(s: &str) -> Result<Self, Error> {
        let mut p = Parser::new(s);
        p.parse_grmap()
    }
}

fn write_range_line(out: &mut String, r: &Range) {
    use core::fmt::Write;
    let sign = if r.offset >= 0 { '+' } else { '-' };
    write!(
        out,
        "        {:x}-{:x}: {:x} {}{:x}\n",
        r.low,
        r.high,
        r.dest_dbid.get(),
        sign,
        r.offset.unsigned_abs()
    )
    .unwrap();
}

/// A streaming writer over a pre-rendered text form: callers pull chunks
/// into a buffer of at least 128 bytes, getting `Done` once everything has
/// been written. The rendering itself isn't incremental, only the external
/// chunked interface is.
pub struct TextWriter {
    buf: Vec<u8>,
    pos: usize,
}

impl TextWriter {
    pub fn new(map: &Grmap) -> Self {
        Self {
            buf: map.to_text().into_bytes(),
            pos: 0,
        }
    }

    /// Writes as much as fits into `out`, returning the number of bytes
    /// written and `Ok(())`, or `Err(Error::Done)` once everything has
    /// been written.
    pub fn write_chunk(&mut self, out: &mut [u8]) -> Result<usize, Error> {
        if out.len() < 128 && self.pos < self.buf.len() {
            return Err(Error::Invalid);
        }
        if self.pos >= self.buf.len() {
            return Err(Error::Done);
        }
        let n = out.len().min(self.buf.len() - self.pos);
        out[..n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// A streaming reader: bytes are pushed incrementally via [`Self::feed`];
/// internally this buffers until the closing `}` of the grammar is seen,
/// then parses in one pass, matching the externally observable
/// `Done`/`NeedMore` contract without an incremental lexer.
#[derive(Default)]
pub struct TextReader {
    buf: String,
}

impl TextReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds another chunk of text. Returns `Ok(Some(map))` (`Done`) once a
    /// complete `grmap { ... }` has been seen, `Ok(None)` (`NeedMore`) if
    /// more input is required, or `Err` on malformed text.
    pub fn feed(&mut self, chunk: &str) -> Result<Option<Grmap>, Error> {
        self.buf.push_str(chunk);
        let mut depth = 0i32;
        let mut seen_open = false;
        for ch in self.buf.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    seen_open = true;
                }
                '}' => {
                    depth -= 1;
                    if seen_open && depth == 0 {
                        return Grmap::from_text(&self.buf).map(Some);
                    }
                    if depth < 0 {
                        return Err(Error::Lex);
                    }
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

struct Parser<'a> {
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn expect(&mut self, tok: &str) -> Result<(), Error> {
        self.skip_ws();
        if let Some(rest) = self.rest.strip_prefix(tok) {
            self.rest = rest;
            Ok(())
        } else {
            Err(Error::Lex)
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest.chars().next()
    }

    fn take_hex(&mut self) -> Result<u64, Error> {
        self.skip_ws();
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(Error::Lex);
        }
        let (tok, rest) = self.rest.split_at(end);
        self.rest = rest;
        u64::from_str_radix(tok, 16).map_err(|_| Error::Lex)
    }

    fn take_signed_hex(&mut self) -> Result<i64, Error> {
        self.skip_ws();
        let sign = match self.rest.chars().next() {
            Some('+') => {
                self.rest = &self.rest[1..];
                1i64
            }
            Some('-') => {
                self.rest = &self.rest[1..];
                -1i64
            }
            _ => return Err(Error::Lex),
        };
        let mag = self.take_hex()? as i64;
        Ok(sign * mag)
    }

    fn parse_grmap(&mut self) -> Result<Grmap, Error> {
        self.expect("grmap")?;
        self.expect("{")?;
        let mut map = Grmap {
            slots: Vec::new(),
            table_size: super::DEFAULT_TABLE_SIZE,
            logger: Box::new(NullLogger),
        };
        loop {
            match self.peek_char() {
                Some('}') => {
                    self.expect("}")?;
                    break;
                }
                Some(_) => self.parse_dbid_block(&mut map)?,
                None => return Err(Error::Lex),
            }
        }
        Ok(map)
    }

    fn parse_dbid_block(&mut self, map: &mut Grmap) -> Result<(), Error> {
        let dbid = Dbid::new(self.take_hex()?);
        self.expect("{")?;
        loop {
            match self.peek_char() {
                Some('}') => {
                    self.expect("}")?;
                    break;
                }
                Some(_) => {
                    let low = self.take_hex()?;
                    self.expect("-")?;
                    let high = self.take_hex()?;
                    self.expect(":")?;
                    let dest_dbid = Dbid::new(self.take_hex()?);
                    let offset = self.take_signed_hex()?;
                    if low >= high {
                        return Err(Error::Lex);
                    }
                    if map.slots.iter().find(|s| s.dbid == dbid).is_none() {
                        map.slots.push(super::DbidSlot::new(dbid));
                    }
                    let table_size = map.table_size;
                    let slot = map.slots.iter_mut().find(|s| s.dbid == dbid).unwrap();
                    slot.add_range(low, high, dest_dbid, offset, table_size)?;
                }
                None => return Err(Error::Lex),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{alloc::Global, guid::Guid, logger::NullLogger};

    #[test]
    fn empty_grmap_text() {
        let m = Grmap::init(&Global, NullLogger);
        assert_eq!(m.to_text(), "grmap {\n}\n");
    }

    #[test]
    fn round_trip() {
        let mut m = Grmap::init(&Global, NullLogger);
        m.add_range(
            Guid::new(Dbid::new(0x1), 0x0),
            Guid::new(Dbid::new(0x2), 0x100),
            0x10,
        )
        .unwrap();
        m.add_range(
            Guid::new(Dbid::new(0x1), 0x10),
            Guid::new(Dbid::new(0x2), 0x110),
            0x10,
        )
        .unwrap();
        let text = m.to_text();
        let back = Grmap::from_text(&text).unwrap();
        assert!(m.equal(&back));
    }

    #[test]
    fn streaming_reader_needs_more_until_closed() {
        let mut m = Grmap::init(&Global, NullLogger);
        m.add_range(Guid::new(Dbid::new(1), 0), Guid::new(Dbid::new(2), 0), 1)
            .unwrap();
        let full = m.to_text();
        let (a, b) = full.split_at(full.len() / 2);
        let mut r = TextReader::new();
        assert!(r.feed(a).unwrap().is_none());
        let parsed = r.feed(b).unwrap().expect("should be done by now");
        assert!(parsed.equal(&m));
    }

    #[test]
    fn malformed_text_is_lex_error() {
        assert!(Grmap::from_text("not a grmap").is_err());
        assert!(Grmap::from_text("grmap { 1 { 5-3: 2 +0 } }").is_err());
    }

    #[test]
    fn text_writer_streams_in_chunks_then_done() {
        let mut m = Grmap::init(&Global, NullLogger);
        m.add_range(Guid::new(Dbid::new(1), 0), Guid::new(Dbid::new(2), 0), 1)
            .unwrap();
        let expected = m.to_text();

        let mut w = TextWriter::new(&m);
        let mut buf = [0u8; 128];
        let mut collected = Vec::new();
        loop {
            match w.write_chunk(&mut buf) {
                Ok(n) => collected.extend_from_slice(&buf[..n]),
                Err(Error::Done) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(String::from_utf8(collected).unwrap(), expected);
    }

    #[test]
    fn text_writer_rejects_undersized_buffer() {
        let mut m = Grmap::init(&Global, NullLogger);
        m.add_range(Guid::new(Dbid::new(1), 0), Guid::new(Dbid::new(2), 0), 1)
            .unwrap();
        let mut w = TextWriter::new(&m);
        let mut tiny = [0u8; 10];
        assert_eq!(w.write_chunk(&mut tiny).unwrap_err(), Error::Invalid);
    }
}
