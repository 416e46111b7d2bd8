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

//! Hooking debug output up to a TLS session.
//!
//! The dump routines in [`debug`](crate::debug) don't know anything about any particular TLS
//! implementation; they ask the session-like first argument for its [`Sink`] through the
//! [`Session`] trait & walk away quietly if there isn't one. A TLS stack will typically
//! implement [`Session`] on its connection or configuration type; anyone else can just use
//! [`DebugConfig`].

use crate::sink::Sink;

/// Anything that may carry a debug sink.
///
/// Returning `None` switches debugging off for this session regardless of the process-wide
/// verbosity threshold; it is the per-session half of the gate.
pub trait Session {
    fn debug_sink(&self) -> Option<&dyn Sink>;
}

/// The simplest possible [`Session`]: a sink, or not.
///
/// Embed one of these in a connection type & delegate, or pass it directly as the session
/// argument when there is no larger session object to hang it off of.
pub struct DebugConfig {
    sink: Option<Box<dyn Sink + Send + Sync>>,
}

impl DebugConfig {
    /// A configuration that sends debug output to `sink`.
    pub fn new<S: Sink + Send + Sync + 'static>(sink: S) -> DebugConfig {
        DebugConfig {
            sink: Some(Box::new(sink)),
        }
    }
    /// A configuration with debugging switched off.
    pub fn disabled() -> DebugConfig {
        DebugConfig { sink: None }
    }
}

impl Session for DebugConfig {
    fn debug_sink(&self) -> Option<&dyn Sink> {
        match &self.sink {
            Some(sink) => {
                let sink: &dyn Sink = sink.as_ref();
                Some(sink)
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_debug_config() {
        let conf = DebugConfig::new(MemorySink::new());
        assert!(conf.debug_sink().is_some());
        let conf = DebugConfig::disabled();
        assert!(conf.debug_sink().is_none());
    }
}
