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

//! Fixed-capacity line buffers.
//!
//! All debug output is assembled one line at a time in a [`LineBuf`], a stack-allocated buffer of
//! `N` bytes that implements [`std::fmt::Write`]. Nothing here allocates: debug routines run on
//! protocol hot paths (record decryption, handshake parsing) and must cost next to nothing when
//! compiled in but gated off, and a predictable, bounded amount when gated on.
//!
//! Output that would overflow the buffer is truncated on a UTF-8 character boundary and the
//! buffer is marked; once marked it ignores further writes, so a too-long line comes out as a
//! clean prefix rather than interleaved fragments.

use std::fmt;

/// Capacity of a single formatted debug line, the caption of a hex dump included.
pub const MSG_BUF_SIZE: usize = 512;

/// Capacity of the buffer into which a certificate renders its description.
pub const CRT_BUF_SIZE: usize = 1024;

/// A fixed-capacity, stack-allocated string builder.
///
/// `LineBuf` never fails and never allocates; it just stops accepting bytes when full. Check
/// [`truncated`](LineBuf::truncated) if you care whether everything fit.
pub struct LineBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
    truncated: bool,
}

impl<const N: usize> LineBuf<N> {
    pub const fn new() -> LineBuf<N> {
        LineBuf {
            buf: [0u8; N],
            len: 0,
            truncated: false,
        }
    }

    /// The formatted contents, so far.
    pub fn as_str(&self) -> &str {
        // `write_str` only ever appends whole UTF-8 sequences.
        std::str::from_utf8(&self.buf[..self.len]).unwrap()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity() -> usize {
        N
    }

    /// Has any output been dropped on the floor since the last [`clear`](LineBuf::clear)?
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Reset to empty & un-truncated.
    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
    }

    /// Append a terminating newline, if there is headroom for one.
    ///
    /// A line that was truncated, or that exactly filled the buffer, goes out unterminated; the
    /// sink sees a bare 511-byte (or `N`-byte) prefix.
    pub fn finish_line(&mut self) {
        if !self.truncated && self.len < N {
            self.buf[self.len] = b'\n';
            self.len += 1;
        }
    }
}

impl<const N: usize> Default for LineBuf<N> {
    fn default() -> Self {
        LineBuf::new()
    }
}

impl<const N: usize> fmt::Write for LineBuf<N> {
    /// Append as much of `s` as fits. Truncation is not an error; this method always returns
    /// `Ok(())` so that a long line degrades to a prefix instead of poisoning the surrounding
    /// `write!`.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.truncated {
            return Ok(());
        }
        let room = N - self.len;
        if s.len() <= room {
            self.buf[self.len..self.len + s.len()].copy_from_slice(s.as_bytes());
            self.len += s.len();
        } else {
            let mut take = room;
            while take > 0 && !s.is_char_boundary(take) {
                take -= 1;
            }
            self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
            self.len += take;
            self.truncated = true;
        }
        Ok(())
    }
}
