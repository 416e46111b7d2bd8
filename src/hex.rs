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

//! Hex dumps of raw buffers.
//!
//! The workhorse behind [`print_buf`](crate::debug::print_buf). Output looks like every hex dump
//! you have ever seen:
//!
//! ```text
//! dumping 'record header' (5 bytes)
//! 0000:  16 03 03 00 2f                                   ..../
//! ```
//!
//! with a full row carrying sixteen bytes, a short final row padded so the ASCII gutter stays
//! aligned, and the whole dump capped at [`DUMP_MAX_BYTES`] (TLS records run to 16KB & nobody
//! wants four thousand lines of key block in their logs). The header always reports the true
//! length, so a capped dump is recognizable as such.

use crate::buffer::{LineBuf, MSG_BUF_SIZE};
use crate::debug::Emitter;

use std::fmt::Write;

/// Dump at most this many bytes of any one buffer.
pub const DUMP_MAX_BYTES: usize = 4096;

const BYTES_PER_LINE: usize = 16;

pub(crate) fn dump(em: &Emitter, text: &str, buf: &[u8]) {
    let mut line = LineBuf::<MSG_BUF_SIZE>::new();
    let _ = writeln!(line, "dumping '{}' ({} bytes)", text, buf.len());
    em.emit(line.as_str());

    let capped = &buf[..buf.len().min(DUMP_MAX_BYTES)];
    for (row, chunk) in capped.chunks(BYTES_PER_LINE).enumerate() {
        line.clear();
        let _ = write!(line, "{:04x}: ", row * BYTES_PER_LINE);
        for b in chunk {
            let _ = write!(line, " {:02x}", b);
        }
        for _ in chunk.len()..BYTES_PER_LINE {
            let _ = line.write_str("   ");
        }
        let _ = line.write_str("  ");
        for &b in chunk {
            let _ = line.write_char(if (32..127).contains(&b) { b as char } else { '.' });
        }
        line.finish_line();
        em.emit(line.as_str());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::level::Level;
    use crate::sink::MemorySink;

    fn dump_lines(text: &str, buf: &[u8]) -> Vec<String> {
        let sink = MemorySink::new();
        let em = Emitter::new(&sink, Level::Verbose, "f", 1);
        dump(&em, text, buf);
        sink.lines()
    }

    #[test]
    fn test_header() {
        assert_eq!(dump_lines("IV", &[]), ["dumping 'IV' (0 bytes)\n"]);
    }

    /// A short row must be padded so the ASCII gutter starts in the same column as a full row's
    #[test]
    fn test_partial_row() {
        let lines = dump_lines("label", b"ABC");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "dumping 'label' (3 bytes)\n");
        assert_eq!(
            lines[1],
            format!("0000:  41 42 43{}  ABC\n", "   ".repeat(13))
        );
    }

    #[test]
    fn test_full_row() {
        let buf: Vec<u8> = (0u8..16).collect();
        let lines = dump_lines("x", &buf);
        assert_eq!(
            lines[1],
            "0000:  00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f  ................\n"
        );
    }

    /// Bytes 0x20 & 0x7e are printable; 0x1f & 0x7f are not
    #[test]
    fn test_ascii_gutter() {
        let lines = dump_lines("x", &[0x1f, 0x20, 0x7e, 0x7f]);
        assert!(lines[1].ends_with("  . ~.\n"));
    }

    /// Row offsets advance by sixteen, in hex
    #[test]
    fn test_offsets() {
        let buf = [0xau8; 40];
        let lines = dump_lines("x", &buf);
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("0000: "));
        assert!(lines[2].starts_with("0010: "));
        assert!(lines[3].starts_with("0020: "));
    }

    /// The dump stops at [`DUMP_MAX_BYTES`], though the header reports the full length
    #[test]
    fn test_cap() {
        let buf = vec![0u8; DUMP_MAX_BYTES + 100];
        let lines = dump_lines("key block", &buf);
        assert_eq!(lines[0], "dumping 'key block' (4196 bytes)\n");
        assert_eq!(lines.len(), 1 + DUMP_MAX_BYTES / BYTES_PER_LINE);
        assert!(lines.last().unwrap().starts_with("0ff0: "));
    }

    /// The hex columns should survive a round-trip back to bytes
    #[test]
    fn test_round_trip() {
        let buf: Vec<u8> = (0..300).map(|i| (i * 7 % 256) as u8).collect();
        let lines = dump_lines("x", &buf);
        let mut recovered = Vec::new();
        for line in &lines[1..] {
            // Skip "NNNN: "; take the 16 three-character cells that follow.
            let cells = &line[6..6 + 3 * BYTES_PER_LINE];
            for cell in cells.as_bytes().chunks(3) {
                let cell = std::str::from_utf8(cell).unwrap().trim();
                if !cell.is_empty() {
                    recovered.push(u8::from_str_radix(cell, 16).unwrap());
                }
            }
        }
        assert_eq!(recovered, buf);
    }
}
