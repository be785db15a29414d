// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase gate evaluation.
//!
//! A [`Transition`] is asked through its leave gate, then its enter gate.
//! Synchronous verdicts resolve in place; a future is polled once and, if it
//! is not ready, parked as a [`PendingTransition`] that the manager polls on
//! every tick. Nothing here mutates focus: the caller applies an accepted
//! transition only after checking it was not superseded.

use core::task::{Context, Poll};

use futures::FutureExt;
use futures::task::noop_waker_ref;

use crate::error::{Gate, ValidatorError};
use crate::history::TransitionReason;
use crate::id::ElementId;
use crate::validator::{GateContext, GateFuture, Validator, Verdict};

/// A requested focus move and the gates it must pass.
#[derive(Debug)]
pub(crate) struct Transition {
    pub(crate) to: ElementId,
    pub(crate) from: Option<ElementId>,
    pub(crate) reason: TransitionReason,
    pub(crate) leave: Option<Validator>,
    pub(crate) enter: Option<Validator>,
    /// Manager epoch when the request was made.
    pub(crate) epoch: u64,
    /// History mark to restore if an undo or redo is rejected.
    pub(crate) rewind: Option<Option<u64>>,
}

/// A transition parked on an unresolved gate future.
pub(crate) struct PendingTransition {
    pub(crate) transition: Transition,
    gate: Gate,
    future: GateFuture,
}

impl core::fmt::Debug for PendingTransition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PendingTransition")
            .field("transition", &self.transition)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

/// Where a transition stands after asking or polling its gates.
#[derive(Debug)]
pub(crate) enum Progress {
    Accepted(Transition),
    Rejected {
        transition: Transition,
        gate: Gate,
        cause: Option<ValidatorError>,
    },
    Pending(PendingTransition),
}

enum GateStep {
    Pass,
    Fail(Option<ValidatorError>),
    Wait(GateFuture),
}

impl Transition {
    /// Run both gates, polling any future once.
    pub(crate) fn ask(self) -> Progress {
        self.run_from(Gate::Leave)
    }

    fn run_from(self, start: Gate) -> Progress {
        let gates: &[Gate] = match start {
            Gate::Leave => &[Gate::Leave, Gate::Enter],
            Gate::Enter => &[Gate::Enter],
        };
        for &gate in gates {
            match self.consult(gate) {
                GateStep::Pass => {}
                GateStep::Fail(cause) => {
                    return Progress::Rejected {
                        transition: self,
                        gate,
                        cause,
                    };
                }
                GateStep::Wait(future) => {
                    return PendingTransition {
                        transition: self,
                        gate,
                        future,
                    }
                    .advance();
                }
            }
        }
        Progress::Accepted(self)
    }

    fn consult(&self, gate: Gate) -> GateStep {
        let (validator, element) = match gate {
            Gate::Leave => match (&self.leave, &self.from) {
                (Some(v), Some(from)) => (v, from),
                _ => return GateStep::Pass,
            },
            Gate::Enter => match &self.enter {
                Some(v) => (v, &self.to),
                None => return GateStep::Pass,
            },
        };
        let ctx = GateContext {
            element,
            gate,
            from: self.from.as_ref(),
            to: &self.to,
            reason: self.reason,
        };
        match validator.check(&ctx) {
            Verdict::Ready(result) => match verdict(result) {
                Ok(()) => GateStep::Pass,
                Err(cause) => GateStep::Fail(cause),
            },
            Verdict::Pending(future) => GateStep::Wait(future),
        }
    }
}

/// `Ok` to pass; `Err` carries the validator failure, if there was one.
fn verdict(result: Result<bool, ValidatorError>) -> Result<(), Option<ValidatorError>> {
    match result {
        Ok(true) => Ok(()),
        Ok(false) => Err(None),
        Err(err) => Err(Some(err)),
    }
}

impl PendingTransition {
    /// Poll the parked gate once with a no-op waker.
    pub(crate) fn advance(mut self) -> Progress {
        let mut cx = Context::from_waker(noop_waker_ref());
        let result = match self.future.poll_unpin(&mut cx) {
            Poll::Pending => return Progress::Pending(self),
            Poll::Ready(result) => result,
        };
        match (verdict(result), self.gate) {
            (Ok(()), Gate::Leave) => self.transition.run_from(Gate::Enter),
            (Ok(()), Gate::Enter) => Progress::Accepted(self.transition),
            (Err(cause), gate) => Progress::Rejected {
                transition: self.transition,
                gate,
                cause,
            },
        }
    }

    pub(crate) fn gate(&self) -> Gate {
        self.gate
    }
}
