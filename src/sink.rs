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

//! Where formatted debug lines go.
//!
//! This module defines the [`Sink`] trait that all implementations must support, as well as
//! implementations that write to any [`std::io::Write`], that forward to the [`tracing`] crate,
//! and that simply collect lines in memory.
//!
//! The dump routines in [`debug`](crate::debug) format one line at a time and hand each line to
//! the session's [`Sink`]. A failing sink never disturbs the protocol logic being traced; errors
//! are swallowed at the call site (they only matter to code invoking a sink directly).
//!
//! # Examples
//!
//! To send debug output to stderr, mbedTLS-example style:
//!
//! ```rust
//! use tls_tracing::sink::WriterSink;
//! let sink = WriterSink::stderr();
//! ```
//!
//! To forward it to whatever [`tracing`] subscriber is installed:
//!
//! ```rust
//! use tls_tracing::sink::TracingSink;
//! let sink = TracingSink::new();
//! ```

use crate::error::Result;
use crate::level::Level;

use std::io::Write;
use std::sync::Mutex;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       the Sink trait                                           //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// One formatted debug line, together with where it came from.
///
/// `text` is a complete line, newline included, except when the formatter ran out of buffer (in
/// which case the sink receives a bare prefix). Multi-line dumps arrive as a sequence of
/// `Record`s sharing `level`, `file` & `line`; `file` & `line` name the call site of the public
/// entry point, not the record boundary inside a dump.
#[derive(Copy, Clone, Debug)]
pub struct Record<'a> {
    pub level: Level,
    pub file: &'static str,
    pub line: u32,
    pub text: &'a str,
}

/// Operations all debug sinks must support.
pub trait Sink {
    /// Accept a single formatted line.
    ///
    /// Implementations should be cheap to call & safe to call from multiple threads; a session
    /// may be driven from one thread while another turns the verbosity threshold up.
    fn emit(&self, record: &Record) -> Result<()>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                     sink implementations                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Write debug lines to any [`std::io::Write`].
///
/// Each line goes out as `FILE:LINE: TEXT`, optionally preceded by a wall-clock timestamp, and
/// the writer is flushed after every line so that output survives a crash of the very code being
/// debugged. The writer sits behind a [`Mutex`]; lines from concurrent sessions interleave, but
/// never mid-line.
pub struct WriterSink<W: Write> {
    writer: Mutex<W>,
    stamp: bool,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> WriterSink<W> {
        WriterSink {
            writer: Mutex::new(writer),
            stamp: false,
        }
    }
    /// Prefix each line with a wall-clock timestamp ("Jun  2 12:54:42")?
    pub fn with_timestamps(mut self, stamp: bool) -> WriterSink<W> {
        self.stamp = stamp;
        self
    }
}

impl WriterSink<std::io::Stderr> {
    /// Convenience constructor for the most common arrangement.
    pub fn stderr() -> WriterSink<std::io::Stderr> {
        WriterSink::new(std::io::stderr())
    }
}

impl<W: Write> Sink for WriterSink<W> {
    fn emit(&self, record: &Record) -> Result<()> {
        use bytes::BufMut;

        let mut frame = bytes::BytesMut::with_capacity(record.text.len() + 64);
        if self.stamp {
            frame.put_slice(
                format!("{} ", chrono::Local::now().format("%b %_d %H:%M:%S")).as_bytes(),
            );
        }
        frame.put_slice(format!("{}:{:04}: ", record.file, record.line).as_bytes());
        frame.put_slice(record.text.as_bytes());

        // A poisoned mutex just means some other thread panicked mid-write; the writer itself
        // is still sound, and debug output is too useful at exactly that moment to give up on.
        let mut writer = self.writer.lock().unwrap_or_else(|err| err.into_inner());
        writer.write_all(&frame)?;
        writer.flush()?;
        Ok(())
    }
}

/// Forward debug lines to the [`tracing`] crate.
///
/// Lines are re-emitted as `tracing` events with target `"tls"`, carrying the originating
/// file & line as fields (the event's own callsite would otherwise point here). The trailing
/// newline is dropped; `tracing` subscribers supply their own line framing.
pub struct TracingSink {
    map_level: Box<dyn Fn(Level) -> tracing::Level + Send + Sync>,
}

/// [`Level::Error`] surely maps to [`ERROR`](tracing::Level::ERROR), and hex dumps of every
/// record are [`TRACE`](tracing::Level::TRACE) material, but the two middle levels are a
/// judgement call; handshake state transitions are of interest to someone debugging the
/// protocol, not to the operator of a service, so they land on
/// [`DEBUG`](tracing::Level::DEBUG). Use [`TracingSink::with_level_mapping`] if you judge
/// differently.
fn default_level_mapping(level: Level) -> tracing::Level {
    match level {
        Level::Error => tracing::Level::ERROR,
        Level::StateChange => tracing::Level::DEBUG,
        Level::Info => tracing::Level::DEBUG,
        Level::Verbose => tracing::Level::TRACE,
    }
}

impl TracingSink {
    pub fn new() -> TracingSink {
        TracingSink::default()
    }
    /// Construct a [`TracingSink`] with a caller-supplied [`Level`] mapping.
    pub fn with_level_mapping<F>(map_level: F) -> TracingSink
    where
        F: Fn(Level) -> tracing::Level + Send + Sync + 'static,
    {
        TracingSink {
            map_level: Box::new(map_level),
        }
    }
}

impl std::default::Default for TracingSink {
    fn default() -> Self {
        TracingSink {
            map_level: Box::new(default_level_mapping),
        }
    }
}

impl Sink for TracingSink {
    fn emit(&self, record: &Record) -> Result<()> {
        let text = record.text.trim_end_matches('\n');
        // `event!` demands a level that's const at the macro call, hence one arm per level.
        match (self.map_level)(record.level) {
            tracing::Level::ERROR => tracing::event!(
                target: "tls",
                tracing::Level::ERROR,
                file = record.file,
                line = record.line,
                "{}",
                text
            ),
            tracing::Level::WARN => tracing::event!(
                target: "tls",
                tracing::Level::WARN,
                file = record.file,
                line = record.line,
                "{}",
                text
            ),
            tracing::Level::INFO => tracing::event!(
                target: "tls",
                tracing::Level::INFO,
                file = record.file,
                line = record.line,
                "{}",
                text
            ),
            tracing::Level::DEBUG => tracing::event!(
                target: "tls",
                tracing::Level::DEBUG,
                file = record.file,
                line = record.line,
                "{}",
                text
            ),
            tracing::Level::TRACE => tracing::event!(
                target: "tls",
                tracing::Level::TRACE,
                file = record.file,
                line = record.line,
                "{}",
                text
            ),
        }
        Ok(())
    }
}

/// Collect debug lines in memory.
///
/// Made for tests (this crate's own included), but handy anywhere one wants to capture a dump &
/// inspect it programmatically.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }
    /// The lines collected so far, in order of arrival.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
    /// The lines collected so far, each with the [`Level`] it arrived at.
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }
    pub fn is_empty(&self) -> bool {
        self.records
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .is_empty()
    }
    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clear();
    }
}

impl Sink for MemorySink {
    fn emit(&self, record: &Record) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .push((record.level, record.text.to_string()));
        Ok(())
    }
}
