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

//! Dumps of elliptic-curve points.
//!
//! A point in affine coordinates is just a pair of bignums, and that is how it is dumped: the X
//! coordinate as the [`Mpi`] dump captioned `text(X)`, then Y as `text(Y)`.

use crate::buffer::{LineBuf, MSG_BUF_SIZE};
use crate::debug::Emitter;
use crate::mpi::{self, Mpi};

use std::fmt::Write;

/// A borrowed view of an elliptic-curve point in affine coordinates.
#[derive(Copy, Clone, Debug)]
pub struct EcPoint<'a> {
    x: Mpi<'a>,
    y: Mpi<'a>,
}

impl<'a> EcPoint<'a> {
    pub fn new(x: Mpi<'a>, y: Mpi<'a>) -> EcPoint<'a> {
        EcPoint { x, y }
    }

    pub fn x(&self) -> &Mpi<'a> {
        &self.x
    }

    pub fn y(&self) -> &Mpi<'a> {
        &self.y
    }
}

pub(crate) fn dump(em: &Emitter, text: &str, point: &EcPoint) {
    let mut caption = LineBuf::<MSG_BUF_SIZE>::new();
    let _ = write!(caption, "{}(X)", text);
    mpi::dump(em, caption.as_str(), point.x());
    caption.clear();
    let _ = write!(caption, "{}(Y)", text);
    mpi::dump(em, caption.as_str(), point.y());
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::level::Level;
    use crate::sink::MemorySink;

    #[test]
    fn test_dump() {
        let sink = MemorySink::new();
        let em = Emitter::new(&sink, Level::Info, "f", 1);
        let x = [0x02u64];
        let y = [0x80u64];
        dump(&em, "ECDH: Q", &EcPoint::new(Mpi::from_limbs(&x), Mpi::from_limbs(&y)));
        assert_eq!(
            sink.lines(),
            [
                "value of 'ECDH: Q(X)' (2 bits) is:\n",
                " 02\n",
                "value of 'ECDH: Q(Y)' (8 bits) is:\n",
                " 80\n"
            ]
        );
    }
}
