// Copyright (C) 2024-2026 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of tls-tracing.
//
// tls-tracing is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// mpdpopm is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even
// the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details.
//
// You should have received a copy of the GNU General Public License along with mpdpopm.  If not,
// see <http://www.gnu.org/licenses/>.

//! Dumps of multi-precision integers.
//!
//! Bignum libraries in the mbedTLS mold represent a large natural number as a little-endian
//! array of machine-word "limbs". [`Mpi`] borrows such an array & [`dump`] renders it the way a
//! cryptographer wants to read it: most-significant byte first, leading zeros suppressed, sixteen
//! bytes to a line, preceded by a header giving the value's width in bits:
//!
//! ```text
//! value of 'crt->rsa.N' (2048 bits) is:
//!  a1 d4 6f b0 ...
//! ```
//!
//! A value of zero is a special case throughout: it has no significant bits (the header says "0
//! bits") and no significant bytes, but printing nothing at all would read like a bug, so a
//! single zero byte stands in for it.

use crate::buffer::{LineBuf, MSG_BUF_SIZE};
use crate::debug::Emitter;

use std::fmt::Write;

/// One machine word of a multi-precision integer, least-significant limb first.
pub type Limb = u64;

pub(crate) const LIMB_BYTES: usize = std::mem::size_of::<Limb>();
pub(crate) const LIMB_BITS: usize = LIMB_BYTES * 8;

const BYTES_PER_LINE: usize = 16;

/// A borrowed view of a multi-precision natural number.
///
/// `Mpi` doesn't do arithmetic; it exists so that the dump routines can accept a bignum from any
/// library that can expose its limbs as a little-endian `u64` slice. An empty slice is a
/// perfectly good zero.
#[derive(Copy, Clone, Debug)]
pub struct Mpi<'a> {
    limbs: &'a [Limb],
}

impl<'a> Mpi<'a> {
    pub fn from_limbs(limbs: &'a [Limb]) -> Mpi<'a> {
        Mpi { limbs }
    }

    pub fn limbs(&self) -> &'a [Limb] {
        self.limbs
    }

    /// The value's width: the index of its highest set bit, plus one. Zero has width zero.
    pub fn bits(&self) -> usize {
        let n = self.top_limb_index();
        let top = self.limbs.get(n).copied().unwrap_or(0);
        n * LIMB_BITS + (LIMB_BITS - top.leading_zeros() as usize)
    }

    /// Index of the most-significant non-zero limb (zero if there is none).
    fn top_limb_index(&self) -> usize {
        self.limbs.iter().rposition(|&limb| limb != 0).unwrap_or(0)
    }
}

pub(crate) fn dump(em: &Emitter, text: &str, x: &Mpi) {
    let mut line = LineBuf::<MSG_BUF_SIZE>::new();
    let _ = writeln!(line, "value of '{}' ({} bits) is:", text, x.bits());
    em.emit(line.as_str());

    let mut zeros = true;
    let mut rendered = 0usize;
    line.clear();
    for i in (0..=x.top_limb_index()).rev() {
        let limb = x.limbs.get(i).copied().unwrap_or(0);
        if zeros && limb == 0 {
            continue;
        }
        for k in (0..LIMB_BYTES).rev() {
            let byte = (limb >> (k * 8)) as u8;
            if zeros && byte == 0 {
                continue;
            }
            zeros = false;
            if rendered > 0 && rendered % BYTES_PER_LINE == 0 {
                line.finish_line();
                em.emit(line.as_str());
                line.clear();
            }
            let _ = write!(line, " {:02x}", byte);
            rendered += 1;
        }
    }
    if zeros {
        let _ = line.write_str(" 00");
    }
    line.finish_line();
    em.emit(line.as_str());
}
