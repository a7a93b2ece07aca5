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

use core::fmt;

pub type GrmapResult<T> = Result<T, Error>;
pub type HullResult<T> = Result<T, Error>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
/// Error kinds shared by GRMAP and HullSet.
///
/// `NoMapping` and `Done` are normal control flow, not failures; everything
/// else indicates either a caller error (`Invalid`, `InUse`) or a condition
/// outside this crate's control (`OutOfMemory`, `Lex`).
pub enum Error {
    /// the allocator failed to satisfy a request
    OutOfMemory,
    /// malformed text input (GRMAP grammar, GUID text form, dateline text form)
    Lex,
    /// a lookup terminated without a result
    NoMapping,
    /// `add_range` conflicts with an existing, differently-mapped range
    RangeOverlap,
    /// a mutation was attempted on a map that has already been populated
    InUse,
    /// a parameter violated a documented precondition
    Invalid,
    /// a streaming reader/writer reached the end of its input/output
    Done,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::OutOfMemory => "allocator exhausted",
            Self::Lex => "malformed input",
            Self::NoMapping => "no mapping for the given identifier",
            Self::RangeOverlap => "range overlaps an incompatible existing mapping",
            Self::InUse => "map is already populated",
            Self::Invalid => "invalid argument",
            Self::Done => "end of stream",
        };
        write!(f, "{msg}")
    }
}

impl std::error::Error for Error {}
