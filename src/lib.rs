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
//! Bounded, gated diagnostic dumps of TLS-internal state: handshake messages, raw records,
//! bignums, curve points & certificate chains
//!
//! # Introduction
//!
//! Every embedded TLS stack descended from mbedTLS carries a little debug module with a
//! distinctive voice: `=> handshake`, `dumping 'record header' (5 bytes)`, `value of 'crt->rsa.N'
//! (2048 bits) is:`. Anyone who has debugged a broken handshake knows it well. The module itself
//! is simple but its constraints are not negotiable: it is called from the innermost protocol
//! loops, so when switched off it must cost almost nothing; it runs inside code that is itself
//! misbehaving, so it must never allocate, panic or return an error to the caller; and its
//! output is consumed by humans under stress, so the formats (sixteen bytes to a row, offsets,
//! an ASCII gutter) are kept exactly as four decades of hex dumps have trained us to read them.
//!
//! This crate is that module, as a library. It is not a TLS implementation & knows nothing about
//! any particular one; the handful of traits in [`session`], [`pk`] & [`x509`] are the narrow
//! windows through which a real stack's types are dumped.
//!
//! Two switches gate all output. The first is per-session: a [`Session`] either produces a
//! [`Sink`] or it doesn't. The second is process-wide: [`level::set_threshold`] sets the
//! verbosity above which messages are discarded, and may be turned up on a live process to catch
//! a misbehaving peer in the act.
//!
//! [`Session`]: crate::session::Session
//! [`Sink`]: crate::sink::Sink
//!
//! # Usage
//!
//! ```rust
//! use tls_tracing::debug_msg;
//! use tls_tracing::debug;
//! use tls_tracing::level::{set_threshold, Level};
//! use tls_tracing::session::DebugConfig;
//! use tls_tracing::sink::WriterSink;
//!
//! // Everything up to & including informational messages, to stderr:
//! set_threshold(3);
//! let ssl = DebugConfig::new(WriterSink::stderr());
//!
//! debug_msg!(&ssl, Level::StateChange, "=> write client hello");
//! debug::print_buf(&ssl, Level::Verbose, "record header",
//!                  &[0x16, 0x03, 0x03, 0x00, 0x2f]);
//! debug_msg!(&ssl, Level::StateChange, "<= write client hello");
//! ```
//!
//! will produce, on stderr, something like:
//!
//! ```text
//! src/main.rs:0012: => write client hello
//! src/main.rs:0014: <= write client hello
//! ```
//!
//! (the hex dump was discarded: [`Level::Verbose`](crate::level::Level) is above the threshold).
//! A TLS stack would instead implement [`Session`](crate::session::Session) on its own
//! connection type & call these entry points throughout its protocol logic; see the
//! [`debug`] module for the full set. To route output into the [`tracing`] ecosystem rather
//! than a raw writer, use [`TracingSink`](crate::sink::TracingSink).

pub mod buffer;
pub mod debug;
pub mod ecp;
pub mod error;
pub mod hex;
pub mod level;
pub mod mpi;
pub mod pk;
pub mod session;
pub mod sink;
pub mod x509;
