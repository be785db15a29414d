// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine state machine.
//!
//! [`EngineState::reduce`] is a pure transition function; the manager feeds
//! it an [`EngineEvent`] at every boundary and stores the result.

/// Coarse engine state, exposed for diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// No transition in flight and no scope above the root.
    #[default]
    Idle,
    /// A transition is being decided synchronously.
    Navigating,
    /// At least one transition waits on an asynchronous gate.
    AwaitingValidation,
    /// Settled with this many scopes above the root.
    ModalOpen(usize),
}

/// Inputs to [`EngineState::reduce`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// A navigation request started.
    Begin,
    /// A gate answered with a future.
    Suspend,
    /// Work finished; `pending` transitions remain parked at scope `depth`.
    Settle {
        /// Scopes above the root.
        depth: usize,
        /// Transitions still awaiting a gate.
        pending: usize,
    },
    /// A scope was pushed, leaving `depth` scopes above the root.
    ScopePushed {
        /// Scopes above the root after the push.
        depth: usize,
    },
    /// A scope was popped, leaving `depth` scopes above the root.
    ScopePopped {
        /// Scopes above the root after the pop.
        depth: usize,
    },
}

impl EngineState {
    /// The state after `event`.
    #[must_use]
    pub fn reduce(self, event: EngineEvent) -> Self {
        match (self, event) {
            (_, EngineEvent::Begin) => Self::Navigating,
            (_, EngineEvent::Suspend) => Self::AwaitingValidation,
            (_, EngineEvent::Settle { pending, .. }) if pending > 0 => Self::AwaitingValidation,
            (_, EngineEvent::Settle { depth, .. }) => Self::resting(depth),
            // A scope change never interrupts an in-flight transition.
            (Self::Navigating | Self::AwaitingValidation, EngineEvent::ScopePushed { .. }) => self,
            (Self::Navigating | Self::AwaitingValidation, EngineEvent::ScopePopped { .. }) => self,
            (_, EngineEvent::ScopePushed { depth } | EngineEvent::ScopePopped { depth }) => {
                Self::resting(depth)
            }
        }
    }

    fn resting(depth: usize) -> Self {
        if depth == 0 {
            Self::Idle
        } else {
            Self::ModalOpen(depth)
        }
    }

    /// Whether no transition is in flight.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Idle | Self::ModalOpen(_))
    }
}
