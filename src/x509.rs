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

//! Dumps of certificate chains.
//!
//! Certificate parsers in the mbedTLS family hand back a chain as an intrusive singly-linked
//! list, leaf first. [`dump`](self::dump) walks it, printing for each certificate a caption line
//! (`peer certificate #1:`, `#2:`, ...), the certificate's own textual description one line at a
//! time & its public key's parameters via [`pk`](crate::pk). The [`Certificate`] trait is the
//! small window this module needs onto whatever certificate type the embedding stack uses.

use crate::buffer::{LineBuf, CRT_BUF_SIZE, MSG_BUF_SIZE};
use crate::debug::{self, Emitter};
use crate::pk::{self, PkDebug};

use std::fmt::{self, Write};

/// Give up after this many certificates. Real chains run three or four deep; a walk that gets
/// this far is traversing garbage (or a list some bug has made circular).
pub(crate) const MAX_CHAIN_LEN: usize = 32;

/// A certificate in a singly-linked chain, as seen by the dump routines.
pub trait Certificate {
    type Pk: PkDebug;

    /// Render a human-readable, multi-line description of this certificate (version, serial,
    /// subject & so on) into `out`, prefixing each line with `prefix`. Lines must be
    /// newline-terminated to be shown.
    fn write_info(&self, out: &mut dyn fmt::Write, prefix: &str) -> fmt::Result;

    /// This certificate's public key.
    fn pk(&self) -> &Self::Pk;

    /// The next certificate up the chain, if any.
    fn next(&self) -> Option<&Self>;
}

pub(crate) fn dump<C: Certificate>(em: &Emitter, text: &str, head: &C) {
    let mut caption = LineBuf::<MSG_BUF_SIZE>::new();
    let mut info = LineBuf::<CRT_BUF_SIZE>::new();

    let mut crt = head;
    for index in 1..=MAX_CHAIN_LEN {
        caption.clear();
        let _ = writeln!(caption, "{} #{}:", text, index);
        em.emit(caption.as_str());

        info.clear();
        let _ = crt.write_info(&mut info, "");
        debug::emit_line_by_line(em, info.as_str());

        pk::dump(em, "crt->", crt.pk());

        crt = match crt.next() {
            Some(next) => next,
            None => return,
        };
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::level::{with_threshold, Level};
    use crate::mpi::Mpi;
    use crate::pk::{PkDebugItem, PK_DEBUG_MAX_ITEMS};
    use crate::session::Session;
    use crate::sink::{MemorySink, Sink};

    struct StubPk {
        n: Vec<u64>,
    }

    impl PkDebug for StubPk {
        type Error = std::convert::Infallible;
        fn debug_items<'a>(
            &'a self,
            items: &mut [PkDebugItem<'a>; PK_DEBUG_MAX_ITEMS],
        ) -> Result<(), Self::Error> {
            items[0] = PkDebugItem::Mpi {
                name: "rsa.N",
                value: Mpi::from_limbs(&self.n),
            };
            Ok(())
        }
    }

    struct StubCrt {
        subject: String,
        pk: StubPk,
        next: Option<Box<StubCrt>>,
    }

    impl Certificate for StubCrt {
        type Pk = StubPk;
        fn write_info(&self, out: &mut dyn fmt::Write, prefix: &str) -> fmt::Result {
            writeln!(out, "{}cert. version     : 3", prefix)?;
            writeln!(out, "{}subject name      : {}", prefix, self.subject)
        }
        fn pk(&self) -> &StubPk {
            &self.pk
        }
        fn next(&self) -> Option<&StubCrt> {
            self.next.as_deref()
        }
    }

    fn chain(subjects: &[&str]) -> StubCrt {
        let mut next: Option<Box<StubCrt>> = None;
        for subject in subjects.iter().rev() {
            next = Some(Box::new(StubCrt {
                subject: subject.to_string(),
                pk: StubPk { n: vec![0xc3] },
                next,
            }));
        }
        *next.unwrap()
    }

    /// Chain order & per-certificate structure: caption, description, key
    #[test]
    fn test_chain() {
        let sink = MemorySink::new();
        let em = Emitter::new(&sink, Level::StateChange, "f", 1);
        dump(&em, "peer certificate", &chain(&["leaf", "intermediate", "root"]));
        assert_eq!(
            sink.lines(),
            [
                "peer certificate #1:\n",
                "cert. version     : 3\n",
                "subject name      : leaf\n",
                "value of 'crt->rsa.N' (8 bits) is:\n",
                " c3\n",
                "peer certificate #2:\n",
                "cert. version     : 3\n",
                "subject name      : intermediate\n",
                "value of 'crt->rsa.N' (8 bits) is:\n",
                " c3\n",
                "peer certificate #3:\n",
                "cert. version     : 3\n",
                "subject name      : root\n",
                "value of 'crt->rsa.N' (8 bits) is:\n",
                " c3\n"
            ]
        );
    }

    /// The walk gives up after [`MAX_CHAIN_LEN`] certificates
    #[test]
    fn test_chain_cap() {
        let subjects: Vec<String> = (0..40).map(|i| format!("c{}", i)).collect();
        let subjects: Vec<&str> = subjects.iter().map(|s| s.as_str()).collect();
        let sink = MemorySink::new();
        let em = Emitter::new(&sink, Level::StateChange, "f", 1);
        dump(&em, "peer certificate", &chain(&subjects));
        let captions = sink
            .lines()
            .iter()
            .filter(|line| line.starts_with("peer certificate #"))
            .count();
        assert_eq!(captions, MAX_CHAIN_LEN);
    }

    /// `print_crt` with no chain at all is silent
    #[test]
    fn test_print_crt() {
        struct TestSession<'a>(&'a MemorySink);
        impl Session for TestSession<'_> {
            fn debug_sink(&self) -> Option<&dyn Sink> {
                Some(self.0)
            }
        }
        with_threshold(4, || {
            let sink = MemorySink::new();
            let ssl = TestSession(&sink);
            crate::debug::print_crt(&ssl, Level::StateChange, "peer certificate", None::<&StubCrt>);
            assert!(sink.is_empty());

            let crt = chain(&["leaf"]);
            crate::debug::print_crt(&ssl, Level::StateChange, "peer certificate", Some(&crt));
            assert_eq!(sink.lines()[0], "peer certificate #1:\n");
        });
    }
}
