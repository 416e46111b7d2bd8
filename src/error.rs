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
//! [tls-tracing](crate) errors

use backtrace::Backtrace;

/// [tls-tracing](crate) error type
///
/// [tls-tracing](crate) eschews libraries like [thiserror], [anyhow] & [Snafu] in favor of a
/// straightforward enumeration with a few match arms chosen on the basis of what the caller will
/// need to respond. Note that the dump routines never surface these errors to the protocol logic
/// being traced; they only flow out of [`Sink`] implementations to whoever invokes one directly.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
/// [Snafu]: https://docs.rs/snafu/latest/snafu
/// [`Sink`]: crate::sink::Sink
#[non_exhaustive]
pub enum Error {
    /// An integer that names no debug verbosity level
    BadLevel { level: i32, back: Backtrace },
    /// General failure in a caller-supplied sink
    Emit {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// I/O error while writing-out a debug line
    Io {
        source: std::io::Error,
        back: Backtrace,
    },
}

impl std::convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            source: err,
            back: Backtrace::new(),
        }
    }
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadLevel { level, .. } => {
                write!(f, "{} does not name a debug verbosity level", level)
            }
            Error::Emit { source, .. } => write!(f, "Sink error: {:?}", source),
            Error::Io { source, .. } => write!(f, "I/O error: {}", source),
            _ => write!(f, "Other tls-tracing error"),
        }
    }
}

impl std::fmt::Debug for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadLevel { level: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::Emit { source: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::Io { source: _, back } => write!(f, "{}\n{:?}", self, back),
            err => write!(f, "tls-tracing error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
