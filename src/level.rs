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

//! Debug verbosity levels & the process-wide threshold.
//!
//! Every debug message carries a [`Level`] describing how urgent (or how chatty) it is, and the
//! process carries a single threshold against which those levels are compared. A message is
//! emitted only when its level is at or below the threshold, so a threshold of
//! [`Level::Error`]`.into()` yields errors only, while `4` yields everything and `0` (the
//! starting value) silences the module entirely.

use crate::error::{Error, Result};

use backtrace::Backtrace;

use std::sync::atomic::{AtomicI32, Ordering};

type StdResult<T, E> = std::result::Result<T, E>;

/// The four verbosity levels a debug message can carry. The enumeration values duplicate the
/// integer levels long used by embedded TLS stacks (1 through 4, with 0 reserved to mean "no
/// output at all" and hence not a level a message can carry).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Level {
    /// errors only
    Error = 1,
    /// state changes (handshake state transitions & the like)
    StateChange = 2,
    /// informational messages
    Info = 3,
    /// everything, including full hex dumps of handshake buffers
    Verbose = 4,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Level::Error => "error",
                Level::StateChange => "state change",
                Level::Info => "informational",
                Level::Verbose => "verbose",
            }
        )
    }
}

impl std::convert::From<Level> for i32 {
    fn from(level: Level) -> i32 {
        level as i32
    }
}

impl std::convert::TryFrom<i32> for Level {
    type Error = Error;
    fn try_from(level: i32) -> Result<Level> {
        match level {
            1 => Ok(Level::Error),
            2 => Ok(Level::StateChange),
            3 => Ok(Level::Info),
            4 => Ok(Level::Verbose),
            _ => Err(Error::BadLevel {
                level,
                back: Backtrace::new(),
            }),
        }
    }
}

/// The process-wide verbosity threshold. Plain stores & loads, no read-modify-write, so Relaxed
/// ordering everywhere.
static THRESHOLD: AtomicI32 = AtomicI32::new(0);

/// Set the process-wide verbosity threshold.
///
/// Messages at levels above `threshold` will be discarded. The value is deliberately _not_
/// restricted to `0..=4`; anything below 1 silences the module and anything above 4 admits
/// everything, which makes it convenient to feed straight from an environment variable or a
/// command-line flag.
pub fn set_threshold(threshold: i32) {
    THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// Retrieve the process-wide verbosity threshold.
pub fn threshold() -> i32 {
    THRESHOLD.load(Ordering::Relaxed)
}

/// Run `f` with the process-wide threshold set to `threshold`, restoring the prior value
/// afterwards. The threshold is process-global, so tests that touch it take a lock to keep from
/// trampling one another under the parallel test runner.
#[cfg(test)]
pub(crate) fn with_threshold<F: FnOnce()>(threshold: i32, f: F) {
    use std::sync::Mutex;

    static GUARD: Mutex<()> = Mutex::new(());

    let _lock = GUARD.lock().unwrap_or_else(|err| err.into_inner());
    let prior = self::threshold();
    set_threshold(threshold);
    f();
    set_threshold(prior);
}

#[cfg(test)]
mod test {
    use super::*;
    use std::convert::TryFrom;

    /// Test the mapping between [`Level`]s & raw integers
    #[test]
    fn test_levels() {
        assert_eq!(i32::from(Level::Error), 1);
        assert_eq!(i32::from(Level::Verbose), 4);
        assert_eq!(Level::try_from(2).unwrap(), Level::StateChange);
        assert_eq!(Level::try_from(3).unwrap(), Level::Info);
        assert!(Level::try_from(0).is_err());
        assert!(Level::try_from(5).is_err());
        assert!(Level::try_from(-1).is_err());
        assert_eq!(format!("{}", Level::StateChange), "state change".to_string());
    }

    /// Test setting & getting the process-wide threshold
    #[test]
    fn test_threshold() {
        with_threshold(0, || {
            assert_eq!(threshold(), 0);
            set_threshold(3);
            assert_eq!(threshold(), 3);
            set_threshold(-17);
            assert_eq!(threshold(), -17);
        });
    }
}
