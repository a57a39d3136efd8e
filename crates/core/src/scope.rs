// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Install, run, restore.
//!
//! [`run_scoped`] is the single contract a host test framework needs: run a
//! body once and restore global state exactly once afterwards, whether the
//! body returned or unwound. Composed rules install in order and restore in
//! reverse.

use std::thread;
use stdguard_capture::StreamCapture;

/// What an [`install`](Scoped::install) call changed, handed back to the
/// matching [`restore`](Scoped::restore).
#[must_use = "pass the record back to `restore`"]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entered {
    /// A single value; `true` when this install swapped it in
    Single(bool),
    /// One record per part of a composed scope, in install order
    Composed(Vec<Entered>),
}

impl Entered {
    /// Whether this install swapped anything in
    pub fn swapped(&self) -> bool {
        match self {
            Self::Single(swapped) => *swapped,
            Self::Composed(parts) => parts.iter().any(Entered::swapped),
        }
    }

    fn into_parts(self) -> Vec<Entered> {
        match self {
            Self::Composed(parts) => parts,
            Self::Single(_) => Vec::new(),
        }
    }
}

/// Something that swaps process-wide state in and back out.
///
/// `restore` undoes only what the matching `install` did: a value that was
/// already installed when `install` ran stays installed. It must not panic;
/// it may run while the thread is unwinding.
pub trait Scoped {
    fn install(&self) -> Entered;
    fn restore(&self, entered: Entered);
}

impl<S: Scoped + ?Sized> Scoped for &S {
    fn install(&self) -> Entered {
        (**self).install()
    }

    fn restore(&self, entered: Entered) {
        (**self).restore(entered);
    }
}

impl<S: Scoped> Scoped for [S] {
    fn install(&self) -> Entered {
        Entered::Composed(self.iter().map(|scoped| scoped.install()).collect())
    }

    fn restore(&self, entered: Entered) {
        for (scoped, part) in self.iter().zip(entered.into_parts()).rev() {
            scoped.restore(part);
        }
    }
}

impl<S: Scoped> Scoped for Vec<S> {
    fn install(&self) -> Entered {
        self.as_slice().install()
    }

    fn restore(&self, entered: Entered) {
        self.as_slice().restore(entered);
    }
}

macro_rules! impl_scoped_tuple {
    ($($name:ident . $idx:tt),+ ; $($rev:tt),+) => {
        impl<$($name: Scoped),+> Scoped for ($($name,)+) {
            fn install(&self) -> Entered {
                Entered::Composed(vec![$(self.$idx.install()),+])
            }

            fn restore(&self, entered: Entered) {
                let mut parts = entered.into_parts();
                $(
                    if let Some(part) = parts.pop() {
                        self.$rev.restore(part);
                    }
                )+
            }
        }
    };
}

impl_scoped_tuple!(A.0; 0);
impl_scoped_tuple!(A.0, B.1; 1, 0);
impl_scoped_tuple!(A.0, B.1, C.2; 2, 1, 0);
impl_scoped_tuple!(A.0, B.1, C.2, D.3; 3, 2, 1, 0);

impl Scoped for StreamCapture {
    fn install(&self) -> Entered {
        Entered::Single(StreamCapture::install(self))
    }

    fn restore(&self, entered: Entered) {
        if entered.swapped() {
            StreamCapture::restore(self);
        }
    }
}

/// Restores its scoped value when dropped, including during unwinding.
#[must_use = "the scope is restored as soon as the guard is dropped"]
pub struct ScopeGuard<'a, S: Scoped + ?Sized> {
    scoped: &'a S,
    entered: Option<Entered>,
}

impl<'a, S: Scoped + ?Sized> ScopeGuard<'a, S> {
    /// Install `scoped` and return the guard that restores it
    pub fn enter(scoped: &'a S) -> Self {
        let entered = scoped.install();
        Self {
            scoped,
            entered: Some(entered),
        }
    }
}

impl<S: Scoped + ?Sized> Drop for ScopeGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(entered) = self.entered.take() {
            tracing::debug!(unwinding = thread::panicking(), "leaving scope");
            self.scoped.restore(entered);
        }
    }
}

/// Run `body` with `scoped` installed.
///
/// Restoration happens exactly once, before any panic raised by `body`
/// continues to propagate.
pub fn run_scoped<S, T, F>(scoped: &S, body: F) -> T
where
    S: Scoped + ?Sized,
    F: FnOnce() -> T,
{
    let _guard = ScopeGuard::enter(scoped);
    body()
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
