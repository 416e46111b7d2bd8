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

//! Dumping public keys without knowing what kind of key they are.
//!
//! The certificate dumper wants to show a key's interesting parameters (`N` & `E` for RSA, `Q`
//! for an EC key) but has no business knowing every key type; new ones appear. So the knowledge
//! is inverted: a key implements [`PkDebug`] by filling a short array of [`PkDebugItem`]s, each a
//! named bignum or curve point, and [`dump`](self::dump) renders whatever it is handed. This is
//! the scheme mbedTLS-descended stacks use internally (`mbedtls_pk_debug` & friends), recast as
//! a trait.

use crate::buffer::LineBuf;
use crate::debug::Emitter;
use crate::ecp::{self, EcPoint};
use crate::mpi::{self, Mpi};

use std::fmt::Write;

type StdResult<T, E> = std::result::Result<T, E>;

/// The most parameters any one key may expose. RSA needs two, an EC key one; three leaves a
/// little room.
pub const PK_DEBUG_MAX_ITEMS: usize = 3;

/// Capacity for an item's full caption (prefix plus name). Parameter names are one or two
/// characters deep in practice; anything longer truncates.
const PK_NAME_SIZE: usize = 16;

/// One named parameter of a public key.
///
/// `None` terminates the array early: items after the first `None` are not examined.
#[non_exhaustive]
#[derive(Copy, Clone, Debug)]
pub enum PkDebugItem<'a> {
    None,
    Mpi { name: &'a str, value: Mpi<'a> },
    EcPoint { name: &'a str, value: EcPoint<'a> },
}

/// A public key that can describe its parameters for debugging.
pub trait PkDebug {
    type Error: std::error::Error;

    /// Fill `items` with this key's parameters, in the order they should be dumped.
    ///
    /// The array arrives all-`None`; implementations overwrite leading entries & leave the rest.
    /// Returning an error means "this key cannot be described right now" (say, a context whose
    /// key material is not yet set up) & suppresses the dump altogether.
    fn debug_items<'a>(
        &'a self,
        items: &mut [PkDebugItem<'a>; PK_DEBUG_MAX_ITEMS],
    ) -> StdResult<(), Self::Error>;
}

// `PkDebugItem` is non-exhaustive so that new kinds of parameter won't be a breaking change to
// implementors. That means the compiler won't catch us if we miss a variant here, so we always
// include a `_` arm; an unrecognized kind is skipped, not fatal.
#[allow(unreachable_patterns)]
pub(crate) fn dump<P: PkDebug + ?Sized>(em: &Emitter, prefix: &str, pk: &P) {
    let mut items: [PkDebugItem<'_>; PK_DEBUG_MAX_ITEMS] =
        std::array::from_fn(|_| PkDebugItem::None);
    if pk.debug_items(&mut items).is_err() {
        return;
    }
    let mut caption = LineBuf::<PK_NAME_SIZE>::new();
    for item in &items {
        match item {
            PkDebugItem::None => return,
            PkDebugItem::Mpi { name, value } => {
                caption.clear();
                let _ = write!(caption, "{}{}", prefix, name);
                mpi::dump(em, caption.as_str(), value);
            }
            PkDebugItem::EcPoint { name, value } => {
                caption.clear();
                let _ = write!(caption, "{}{}", prefix, name);
                ecp::dump(em, caption.as_str(), value);
            }
            _ => {}
        }
    }
}
