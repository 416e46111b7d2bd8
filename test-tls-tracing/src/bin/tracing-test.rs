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

//! Exercise the dump routines against a [`TracingSink`] feeding a `tracing-subscriber` `fmt`
//! subscriber; the handshake chatter should come out interleaved with native [`tracing`] events.

use tls_tracing::debug;
use tls_tracing::debug_msg;
use tls_tracing::level::{set_threshold, Level};
use tls_tracing::mpi::Mpi;
use tls_tracing::pk::{PkDebug, PkDebugItem, PK_DEBUG_MAX_ITEMS};
use tls_tracing::session::DebugConfig;
use tls_tracing::sink::TracingSink;
use tls_tracing::x509::Certificate;

use tracing::info;

use std::fmt;

/// An RSA-shaped public key.
struct DemoKey {
    n: Vec<u64>,
    e: Vec<u64>,
}

impl PkDebug for DemoKey {
    type Error = std::convert::Infallible;
    fn debug_items<'a>(
        &'a self,
        items: &mut [PkDebugItem<'a>; PK_DEBUG_MAX_ITEMS],
    ) -> Result<(), Self::Error> {
        items[0] = PkDebugItem::Mpi {
            name: "rsa.N",
            value: Mpi::from_limbs(&self.n),
        };
        items[1] = PkDebugItem::Mpi {
            name: "rsa.E",
            value: Mpi::from_limbs(&self.e),
        };
        Ok(())
    }
}

/// A one-certificate "chain".
struct DemoCrt {
    subject: &'static str,
    key: DemoKey,
    next: Option<Box<DemoCrt>>,
}

impl Certificate for DemoCrt {
    type Pk = DemoKey;
    fn write_info(&self, out: &mut dyn fmt::Write, prefix: &str) -> fmt::Result {
        writeln!(out, "{}cert. version     : 3", prefix)?;
        writeln!(out, "{}subject name      : CN={}", prefix, self.subject)
    }
    fn pk(&self) -> &DemoKey {
        &self.key
    }
    fn next(&self) -> Option<&DemoCrt> {
        self.next.as_deref()
    }
}

pub fn main() {
    // Setup the real subscriber...
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .finish();
    // and install it.
    let _guard = tracing::subscriber::set_default(subscriber);

    set_threshold(4);
    let ssl = DebugConfig::new(TracingSink::new());

    info!("a native tracing event, for comparison");

    debug_msg!(&ssl, Level::StateChange, "=> write client hello");
    debug_msg!(&ssl, Level::Info, "client hello, len.: {}", 112);
    debug::print_buf(
        &ssl,
        Level::Verbose,
        "record header",
        &[0x16, 0x03, 0x03, 0x00, 0x2f],
    );
    debug::print_ret(&ssl, Level::Error, "ttls_parse_certificate", -0x2700);

    let crt = DemoCrt {
        subject: "localhost",
        key: DemoKey {
            n: vec![0xc3],
            e: vec![0x010001],
        },
        next: None,
    };
    debug::print_crt(&ssl, Level::StateChange, "peer certificate", Some(&crt));
    debug_msg!(&ssl, Level::StateChange, "<= write client hello");
}
