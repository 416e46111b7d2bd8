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

//! The debug entry points.
//!
//! These are the functions a TLS implementation sprinkles through its protocol logic:
//! [`print_msg`] (more conveniently, the [`debug_msg!`](crate::debug_msg) macro) for free-form
//! messages, [`print_ret`] for noting a function's error return, [`print_buf`] for hex dumps,
//! [`print_mpi`] & [`print_ecp`] for bignums & curve points, and [`print_crt`] for certificate
//! chains.
//!
//! Every entry point begins with the same gate: no sink on the session, or a message level above
//! the process-wide threshold, and the call returns having done no formatting at all. Past the
//! gate, output is assembled line-by-line in fixed-size stack buffers & handed to the session's
//! [`Sink`]; a failing sink is ignored. Nothing in this module allocates, blocks (beyond the
//! sink's own locking) or panics, and nothing ever reports failure to the caller. Debug
//! instrumentation that can break the thing it instruments is worse than none at all.
//!
//! The call site's file & line ride along on every [`Record`] (captured via
//! `#[track_caller]`, so the C convention of passing `__FILE__` & `__LINE__` by hand is not
//! missed).
//!
//! # Examples
//!
//! ```rust
//! use tls_tracing::debug_msg;
//! use tls_tracing::debug;
//! use tls_tracing::level::{set_threshold, Level};
//! use tls_tracing::session::DebugConfig;
//! use tls_tracing::sink::WriterSink;
//!
//! set_threshold(2);
//! let ssl = DebugConfig::new(WriterSink::stderr());
//! debug_msg!(&ssl, Level::StateChange, "=> handshake");
//! debug::print_ret(&ssl, Level::StateChange, "ttls_handshake_step", -0x7100);
//! debug::print_buf(&ssl, Level::Verbose, "record header", &[0x16, 0x03, 0x03, 0x00, 0x2f]);
//! debug_msg!(&ssl, Level::StateChange, "<= handshake");
//! ```

use crate::buffer::{LineBuf, MSG_BUF_SIZE};
use crate::ecp::{self, EcPoint};
use crate::hex;
use crate::level::{self, Level};
use crate::mpi::{self, Mpi};
use crate::session::Session;
use crate::sink::{Record, Sink};
use crate::x509::{self, Certificate};

use std::fmt::{self, Write};

/// The "operation would block, try again once readable" return code, which with non-blocking I/O
/// and callers that simply retry would flood the logs; [`print_ret`] declines to log it.
/// (`WANT_WRITE` is not given the same treatment, since it is usually rare.)
pub const ERR_WANT_READ: i32 = -0x6900;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     gate & line emission                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// A sink that has passed the gate, plus everything that rides along with each line.
///
/// The dump routines format into a [`LineBuf`] & call [`emit`](Emitter::emit) once per line;
/// `level`, `file` & `line` are fixed for the duration of one entry-point call.
pub(crate) struct Emitter<'a> {
    sink: &'a dyn Sink,
    level: Level,
    file: &'static str,
    line: u32,
}

impl<'a> Emitter<'a> {
    #[cfg(test)]
    pub(crate) fn new(
        sink: &'a dyn Sink,
        level: Level,
        file: &'static str,
        line: u32,
    ) -> Emitter<'a> {
        Emitter {
            sink,
            level,
            file,
            line,
        }
    }

    /// Hand one line to the sink. Errors are discarded; debug output must never disturb the code
    /// being debugged.
    pub(crate) fn emit(&self, text: &str) {
        let _ = self.sink.emit(&Record {
            level: self.level,
            file: self.file,
            line: self.line,
            text,
        });
    }
}

/// The common preamble to every entry point: does this call produce output at all?
///
/// The session is consulted first, then the process-wide threshold; a session with no sink pays
/// nothing further, however high the threshold is cranked, and no formatting happens on either
/// early return.
#[track_caller]
fn gate<'a, S: Session + ?Sized>(ssl: &'a S, level: Level) -> Option<Emitter<'a>> {
    let sink = ssl.debug_sink()?;
    if i32::from(level) > level::threshold() {
        return None;
    }
    let loc = std::panic::Location::caller();
    Some(Emitter {
        sink,
        level,
        file: loc.file(),
        line: loc.line(),
    })
}

/// Feed a multi-line string to the sink one line at a time.
///
/// Each line goes through a [`LineBuf`] of [`MSG_BUF_SIZE`] bytes, so an absurdly long line is
/// truncated just as it would be had it been formatted by [`print_msg`]. Note that a trailing
/// fragment with no final `'\n'` is *not* emitted; sinks only ever see newline-terminated lines
/// from this path.
pub(crate) fn emit_line_by_line(em: &Emitter, text: &str) {
    let mut buf = LineBuf::<MSG_BUF_SIZE>::new();
    for line in text.split_inclusive('\n') {
        if !line.ends_with('\n') {
            continue;
        }
        buf.clear();
        let _ = buf.write_str(line);
        em.emit(buf.as_str());
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                        entry points                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Emit one free-form message at `level`.
///
/// The message is assembled in a [`MSG_BUF_SIZE`]-byte buffer & newline-terminated; if it
/// overflows, the sink receives a bare [`MSG_BUF_SIZE`]-byte prefix instead. Most callers will
/// prefer the [`debug_msg!`](crate::debug_msg) macro, which supplies the `format_args!`.
#[track_caller]
pub fn print_msg<S: Session + ?Sized>(ssl: &S, level: Level, args: fmt::Arguments<'_>) {
    let em = match gate(ssl, level) {
        Some(em) => em,
        None => return,
    };
    let mut buf = LineBuf::<MSG_BUF_SIZE>::new();
    let _ = buf.write_fmt(args);
    buf.finish_line();
    em.emit(buf.as_str());
}

/// Note `func`'s error return, e.g. `ttls_write_record() returned -105 (-0x0069)`.
///
/// The parenthesized form is the negated code rendered in hex, the shape in which these codes
/// are defined in every embedded TLS stack's headers. [`ERR_WANT_READ`] is suppressed.
#[track_caller]
pub fn print_ret<S: Session + ?Sized>(ssl: &S, level: Level, func: &str, ret: i32) {
    let em = match gate(ssl, level) {
        Some(em) => em,
        None => return,
    };
    if ret == ERR_WANT_READ {
        return;
    }
    let mut buf = LineBuf::<MSG_BUF_SIZE>::new();
    // Negate in 64 bits: `ret` may be `i32::MIN`, and a positive `ret` must wrap to a large
    // unsigned value, not panic.
    let _ = writeln!(
        buf,
        "{}() returned {} (-0x{:04x})",
        func,
        ret,
        (-(ret as i64)) as u32
    );
    em.emit(buf.as_str());
}

/// Hex-dump `buf` under the caption `text`.
///
/// Output is a header line (`dumping 'text' (NNN bytes)`) followed by rows of sixteen bytes,
/// each with its offset & an ASCII gutter. Dumps are capped at
/// [`DUMP_MAX_BYTES`](crate::hex::DUMP_MAX_BYTES) bytes; the header still reports the full
/// length.
#[track_caller]
pub fn print_buf<S: Session + ?Sized>(ssl: &S, level: Level, text: &str, buf: &[u8]) {
    let em = match gate(ssl, level) {
        Some(em) => em,
        None => return,
    };
    hex::dump(&em, text, buf);
}

/// Dump the multi-precision integer `x` under the caption `text`.
#[track_caller]
pub fn print_mpi<S: Session + ?Sized>(ssl: &S, level: Level, text: &str, x: &Mpi) {
    let em = match gate(ssl, level) {
        Some(em) => em,
        None => return,
    };
    mpi::dump(&em, text, x);
}

/// Dump both coordinates of the elliptic-curve point `point` under the caption `text`.
#[track_caller]
pub fn print_ecp<S: Session + ?Sized>(ssl: &S, level: Level, text: &str, point: &EcPoint) {
    let em = match gate(ssl, level) {
        Some(em) => em,
        None => return,
    };
    ecp::dump(&em, text, point);
}

/// Dump the certificate chain headed by `crt`: for each certificate, an indexed caption line, the
/// certificate's own one-per-line description & a dump of its public key's parameters.
///
/// `crt` is an `Option` because the chain pointer being dumped is very often itself optional
/// ("show me the peer's chain" during a handshake that hasn't produced one); `None` simply
/// produces no output.
#[track_caller]
pub fn print_crt<S, C>(ssl: &S, level: Level, text: &str, crt: Option<&C>)
where
    S: Session + ?Sized,
    C: Certificate,
{
    let em = match gate(ssl, level) {
        Some(em) => em,
        None => return,
    };
    let crt = match crt {
        Some(crt) => crt,
        None => return,
    };
    x509::dump(&em, text, crt);
}

/// Emit one free-form debug message at a given verbosity level.
///
/// Sugar for [`print_msg`](crate::debug::print_msg):
///
/// ```rust
/// use tls_tracing::debug_msg;
/// use tls_tracing::level::Level;
/// use tls_tracing::session::DebugConfig;
///
/// let ssl = DebugConfig::disabled();
/// debug_msg!(&ssl, Level::Info, "client hello, len.: {}", 112);
/// ```
#[macro_export]
macro_rules! debug_msg {
    ($ssl:expr, $level:expr, $($arg:tt)*) => {
        $crate::debug::print_msg($ssl, $level, ::core::format_args!($($arg)*))
    };
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Result;
    use crate::level::with_threshold;
    use crate::sink::MemorySink;

    use std::sync::Mutex;

    struct TestSession<'a> {
        sink: Option<&'a MemorySink>,
    }

    impl Session for TestSession<'_> {
        fn debug_sink(&self) -> Option<&dyn Sink> {
            match self.sink {
                Some(sink) => Some(sink),
                None => None,
            }
        }
    }

    /// Both halves of the gate: the per-session sink & the process-wide threshold
    #[test]
    fn test_gate() {
        with_threshold(2, || {
            let sink = MemorySink::new();
            let ssl = TestSession { sink: Some(&sink) };
            print_msg(&ssl, Level::Error, format_args!("at level 1"));
            print_msg(&ssl, Level::StateChange, format_args!("at level 2"));
            print_msg(&ssl, Level::Info, format_args!("at level 3"));
            print_msg(&ssl, Level::Verbose, format_args!("at level 4"));
            assert_eq!(sink.lines(), ["at level 1\n", "at level 2\n"]);
            assert_eq!(sink.records()[0].0, Level::Error);
            assert_eq!(sink.records()[1].0, Level::StateChange);

            let off = TestSession { sink: None };
            print_msg(&off, Level::Error, format_args!("nobody home"));
        });
        with_threshold(0, || {
            let sink = MemorySink::new();
            let ssl = TestSession { sink: Some(&sink) };
            print_msg(&ssl, Level::Error, format_args!("silenced"));
            assert!(sink.is_empty());
        });
    }

    /// An overlong message should come out as a bare, un-terminated prefix
    #[test]
    fn test_msg_truncation() {
        with_threshold(1, || {
            let sink = MemorySink::new();
            let ssl = TestSession { sink: Some(&sink) };
            let long = "x".repeat(600);
            print_msg(&ssl, Level::Error, format_args!("{}", long));
            let lines = sink.lines();
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].len(), MSG_BUF_SIZE);
            assert!(!lines[0].ends_with('\n'));
        });
    }

    #[test]
    fn test_print_ret() {
        with_threshold(4, || {
            let sink = MemorySink::new();
            let ssl = TestSession { sink: Some(&sink) };
            print_ret(&ssl, Level::StateChange, "ttls_write_record", -105);
            assert_eq!(sink.lines(), ["ttls_write_record() returned -105 (-0x0069)\n"]);

            // WANT_READ is noise, not news.
            sink.clear();
            print_ret(&ssl, Level::StateChange, "ttls_read_record", ERR_WANT_READ);
            assert!(sink.is_empty());

            // A positive "error" wraps around in the hex field.
            sink.clear();
            print_ret(&ssl, Level::StateChange, "f", 7);
            assert_eq!(sink.lines(), ["f() returned 7 (-0xfffffff9)\n"]);

            // And the most negative value of all must not panic.
            sink.clear();
            print_ret(&ssl, Level::StateChange, "f", i32::MIN);
            assert_eq!(
                sink.lines(),
                [format!("f() returned {} (-0x80000000)\n", i32::MIN)]
            );
        });
    }

    #[test]
    fn test_debug_msg_macro() {
        with_threshold(4, || {
            let sink = MemorySink::new();
            let ssl = TestSession { sink: Some(&sink) };
            crate::debug_msg!(&ssl, Level::Info, "client hello, len.: {}", 112);
            assert_eq!(sink.lines(), ["client hello, len.: 112\n"]);
        });
    }

    /// Only newline-terminated lines reach the sink; a trailing fragment is dropped
    #[test]
    fn test_line_by_line() {
        let sink = MemorySink::new();
        let em = Emitter::new(&sink, Level::Info, "f", 1);
        emit_line_by_line(&em, "cert. version     : 3\nserial number     : 01\n");
        assert_eq!(
            sink.lines(),
            ["cert. version     : 3\n", "serial number     : 01\n"]
        );

        sink.clear();
        emit_line_by_line(&em, "complete\npartial with no newline");
        assert_eq!(sink.lines(), ["complete\n"]);

        sink.clear();
        emit_line_by_line(&em, "");
        assert!(sink.is_empty());

        sink.clear();
        emit_line_by_line(&em, "no newline at all");
        assert!(sink.is_empty());
    }

    /// A sink that records the file & line on each [`Record`], for checking call-site capture.
    struct WhenceSink {
        whence: Mutex<Vec<(String, u32)>>,
    }

    impl Sink for WhenceSink {
        fn emit(&self, record: &Record) -> Result<()> {
            self.whence
                .lock()
                .unwrap()
                .push((record.file.to_string(), record.line));
            Ok(())
        }
    }

    /// The file & line on each record should name the entry point's call site, i.e. this file
    #[test]
    fn test_call_site_capture() {
        struct WhenceSession<'a>(&'a WhenceSink);
        impl Session for WhenceSession<'_> {
            fn debug_sink(&self) -> Option<&dyn Sink> {
                Some(self.0)
            }
        }
        with_threshold(1, || {
            let sink = WhenceSink {
                whence: Mutex::new(Vec::new()),
            };
            let ssl = WhenceSession(&sink);
            print_msg(&ssl, Level::Error, format_args!("whence"));
            let whence = sink.whence.lock().unwrap();
            assert_eq!(whence.len(), 1);
            assert!(whence[0].0.ends_with("debug.rs"));
            assert!(whence[0].1 > 0);
        });
    }
}
