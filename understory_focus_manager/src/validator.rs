// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Validator gates.
//!
//! A [`Validator`] decides whether focus may leave or enter an element. It
//! answers with a [`Verdict`]: either immediately, or with a future the engine
//! polls on later ticks. Errors count as rejection.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_focus_manager::{GateContext, Validator, ValidatorError};
//!
//! // Plain predicate.
//! let filled = Rc::new(Cell::new(false));
//! let watch = filled.clone();
//! let leave = Validator::new(move |_: &GateContext<'_>| watch.get());
//!
//! // Fallible check; an `Err` blocks like `false` and is logged.
//! let enter = Validator::fallible(|ctx: &GateContext<'_>| {
//!     if ctx.to.starts_with("dose") {
//!         Ok(true)
//!     } else {
//!         Err(ValidatorError::new("unexpected field"))
//!     }
//! });
//!
//! // Asynchronous check, resolved on a later tick.
//! let remote = Validator::future(|_: &GateContext<'_>| async { Ok(true) });
//! # let _ = (leave, enter, remote);
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::fmt;
use core::future::Future;

use futures::future::LocalBoxFuture;

use crate::error::{Gate, ValidatorError};
use crate::history::TransitionReason;
use crate::id::ElementId;

/// Boxed future produced by an asynchronous gate.
pub type GateFuture = LocalBoxFuture<'static, Result<bool, ValidatorError>>;

/// What a validator is being asked.
#[derive(Clone, Copy, Debug)]
pub struct GateContext<'a> {
    /// Element that owns the gate being consulted.
    pub element: &'a ElementId,
    /// Which gate is consulted.
    pub gate: Gate,
    /// Element losing focus, if any.
    pub from: Option<&'a ElementId>,
    /// Element that would gain focus.
    pub to: &'a ElementId,
    /// Why the transition was requested.
    pub reason: TransitionReason,
}

/// A validator's answer.
pub enum Verdict {
    /// Decided now.
    Ready(Result<bool, ValidatorError>),
    /// Decided when the future resolves.
    Pending(GateFuture),
}

impl fmt::Debug for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(r) => f.debug_tuple("Ready").field(r).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

impl From<bool> for Verdict {
    fn from(allowed: bool) -> Self {
        Self::Ready(Ok(allowed))
    }
}

impl From<Result<bool, ValidatorError>> for Verdict {
    fn from(result: Result<bool, ValidatorError>) -> Self {
        Self::Ready(result)
    }
}

/// A shareable validator gate.
#[derive(Clone)]
pub struct Validator(Rc<dyn Fn(&GateContext<'_>) -> Verdict>);

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

impl Validator {
    /// A synchronous predicate.
    pub fn new(check: impl Fn(&GateContext<'_>) -> bool + 'static) -> Self {
        Self::from_fn(move |ctx| Verdict::from(check(ctx)))
    }

    /// A synchronous check that may fail.
    pub fn fallible(
        check: impl Fn(&GateContext<'_>) -> Result<bool, ValidatorError> + 'static,
    ) -> Self {
        Self::from_fn(move |ctx| Verdict::Ready(check(ctx)))
    }

    /// An asynchronous check.
    ///
    /// The future is polled once right away and then on every tick until it resolves.
    pub fn future<F, Fut>(check: F) -> Self
    where
        F: Fn(&GateContext<'_>) -> Fut + 'static,
        Fut: Future<Output = Result<bool, ValidatorError>> + 'static,
    {
        Self::from_fn(move |ctx| Verdict::Pending(Box::pin(check(ctx))))
    }

    /// A check that chooses per call whether to answer now or later.
    pub fn from_fn(check: impl Fn(&GateContext<'_>) -> Verdict + 'static) -> Self {
        Self(Rc::new(check))
    }

    /// Ask the gate.
    pub fn check(&self, ctx: &GateContext<'_>) -> Verdict {
        (self.0)(ctx)
    }
}
