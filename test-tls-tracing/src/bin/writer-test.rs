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

//! Exercise every dump routine against a timestamped stderr sink & eyeball the output.

use tls_tracing::debug;
use tls_tracing::debug_msg;
use tls_tracing::ecp::EcPoint;
use tls_tracing::level::{set_threshold, Level};
use tls_tracing::mpi::Mpi;
use tls_tracing::pk::{PkDebug, PkDebugItem, PK_DEBUG_MAX_ITEMS};
use tls_tracing::session::DebugConfig;
use tls_tracing::sink::WriterSink;
use tls_tracing::x509::Certificate;

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

/// A certificate in a leaf-first chain.
struct DemoCrt {
    serial: u32,
    subject: &'static str,
    issuer: &'static str,
    key: DemoKey,
    next: Option<Box<DemoCrt>>,
}

impl Certificate for DemoCrt {
    type Pk = DemoKey;
    fn write_info(&self, out: &mut dyn fmt::Write, prefix: &str) -> fmt::Result {
        writeln!(out, "{}cert. version     : 3", prefix)?;
        writeln!(out, "{}serial number     : {:02x}", prefix, self.serial)?;
        writeln!(out, "{}issuer name       : CN={}", prefix, self.issuer)?;
        writeln!(out, "{}subject name      : CN={}", prefix, self.subject)?;
        writeln!(out, "{}signed using      : RSA with SHA-256", prefix)
    }
    fn pk(&self) -> &DemoKey {
        &self.key
    }
    fn next(&self) -> Option<&DemoCrt> {
        self.next.as_deref()
    }
}

fn demo_chain() -> DemoCrt {
    DemoCrt {
        serial: 0x2f,
        subject: "localhost",
        issuer: "Demo CA",
        key: DemoKey {
            n: vec![0x1122334455667788, 0x99aabbccddeeff00, 0xc3],
            e: vec![0x010001],
        },
        next: Some(Box::new(DemoCrt {
            serial: 0x01,
            subject: "Demo CA",
            issuer: "Demo CA",
            key: DemoKey {
                n: vec![0xfedcba9876543210, 0x0f],
                e: vec![0x010001],
            },
            next: None,
        })),
    }
}

pub fn main() {
    set_threshold(4);
    let ssl = DebugConfig::new(WriterSink::stderr().with_timestamps(true));

    debug_msg!(&ssl, Level::StateChange, "=> handshake");
    debug_msg!(&ssl, Level::Info, "client hello, len.: {}", 112);
    debug::print_buf(
        &ssl,
        Level::Verbose,
        "record header",
        &[0x16, 0x03, 0x03, 0x00, 0x2f],
    );

    let premaster: Vec<u8> = (0u8..48).collect();
    debug::print_buf(&ssl, Level::Verbose, "premaster secret", &premaster);

    let p = [0xffffffffffffffff, 0xc90fdaa22168c234];
    debug::print_mpi(&ssl, Level::Info, "DHM: P", &Mpi::from_limbs(&p));

    let qx = [0x04a5u64];
    let qy = [0x1e30u64];
    debug::print_ecp(
        &ssl,
        Level::Info,
        "ECDH: Q",
        &EcPoint::new(Mpi::from_limbs(&qx), Mpi::from_limbs(&qy)),
    );

    let chain = demo_chain();
    debug::print_crt(&ssl, Level::StateChange, "peer certificate", Some(&chain));

    // These two should produce nothing: WANT_READ is suppressed, and a `None` chain is not an
    // event worth reporting.
    debug::print_ret(&ssl, Level::StateChange, "ttls_read_record", debug::ERR_WANT_READ);
    debug::print_crt(&ssl, Level::StateChange, "own certificate", None::<&DemoCrt>);

    debug::print_ret(&ssl, Level::StateChange, "ttls_parse_certificate", -0x2700);
    debug_msg!(&ssl, Level::StateChange, "<= handshake");
}
