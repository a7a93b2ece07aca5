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

//! A dateline is a vector clock over databases: per DBID, the first serial
//! number not yet produced. Text form:
//! `<instance-id>,<GUID>(/<GUID>)*`.

use crate::{
    error::Error,
    guid::{Dbid, Guid},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dateline {
    entries: Vec<(Dbid, u64)>,
    instance_id: Option<String>,
}

impl Dateline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, dbid: Dbid, first_uncovered: u64) {
        match self.entries.iter_mut().find(|(d, _)| *d == dbid) {
            Some(e) => e.1 = first_uncovered,
            None => self.entries.push((dbid, first_uncovered)),
        }
    }

    pub fn get(&self, dbid: Dbid) -> Option<u64> {
        self.entries.iter().find(|(d, _)| *d == dbid).map(|(_, s)| *s)
    }

    pub fn entries(&self) -> impl Iterator<Item = (Dbid, u64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn set_instance_id(&mut self, id: impl Into<String>) {
        self.instance_id = Some(id.into());
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.instance_id.as_deref()
    }

    /// The serial a caller should resume an `iterate_dbid` walk from, i.e.
    /// the first serial not yet produced for `dbid`, or `0` if this
    /// dateline has no entry for it.
    pub fn resume_point(&self, dbid: Dbid) -> u64 {
        self.get(dbid).unwrap_or(0)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Some(id) = &self.instance_id {
            out.push_str(id);
        }
        out.push(',');
        for (i, (dbid, serial)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            Guid::new(*dbid, *serial).write_text(&mut out);
        }
        out
    }

    pub fn from_text(s: &str) -> Result<Self, Error> {
        let (instance_id, rest) = s.split_once(',').ok_or(Error::Lex)?;
        let mut d = Self::new();
        if !instance_id.is_empty() {
            d.set_instance_id(instance_id);
        }
        if rest.is_empty() {
            return Ok(d);
        }
        for part in rest.split('/') {
            let guid = Guid::parse(part)?;
            d.set(guid.dbid(), guid.serial());
        }
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_without_instance_id() {
        let mut d = Dateline::new();
        d.set(Dbid::new(1), 10);
        d.set(Dbid::new(2), 20);
        let text = d.to_text();
        let back = Dateline::from_text(&text).unwrap();
        assert_eq!(d, back);
    }

    #[test]
    fn roundtrips_with_instance_id() {
        let mut d = Dateline::new();
        d.set_instance_id("node-1");
        d.set(Dbid::new(7), 0);
        let text = d.to_text();
        assert!(text.starts_with("node-1,"));
        let back = Dateline::from_text(&text).unwrap();
        assert_eq!(d, back);
    }

    #[test]
    fn empty_dateline_is_just_a_comma() {
        let d = Dateline::new();
        assert_eq!(d.to_text(), ",");
        assert_eq!(Dateline::from_text(",").unwrap(), d);
    }
}
