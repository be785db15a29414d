// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only diagnostics.

use alloc::vec::Vec;

use understory_event_state::mode::{InteractionSample, NavigationMode};

use crate::error::Gate;
use crate::history::HistoryEntry;
use crate::id::{ElementId, ScopeId};
use crate::manager::FocusManager;
use crate::scope::ModalStackEntry;
use crate::state::EngineState;

/// The transition waiting on an asynchronous gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingValidation {
    /// Element that would gain focus.
    pub target: ElementId,
    /// Gate being awaited.
    pub gate: Gate,
}

/// Point-in-time copy of the engine's observable state.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugSnapshot {
    /// Focused element.
    pub current: Option<ElementId>,
    /// Active scope.
    pub active_scope: ScopeId,
    /// Scopes above the root.
    pub depth: usize,
    /// Scope stack from the root up.
    pub stack: Vec<ModalStackEntry>,
    /// Retained history, oldest first.
    pub history: Vec<HistoryEntry>,
    /// History cursor.
    pub history_cursor: Option<usize>,
    /// Retained pointer samples, oldest first.
    pub samples: Vec<InteractionSample<ElementId>>,
    /// Interaction classification.
    pub mode: NavigationMode,
    /// Engine state.
    pub state: EngineState,
    /// Transition awaiting a gate.
    pub pending: Option<PendingValidation>,
    /// Scheduled operations not yet applied.
    pub queued_operations: usize,
    /// Live registered elements.
    pub registered: usize,
}

impl FocusManager {
    /// Capture the engine's observable state.
    pub fn snapshot(&self) -> DebugSnapshot {
        DebugSnapshot {
            current: self.current().cloned(),
            active_scope: self.scopes.current().id.clone(),
            depth: self.scopes.depth(),
            stack: self.scopes.entries(),
            history: self.history.entries().cloned().collect(),
            history_cursor: self.history.cursor(),
            samples: self.mode.samples().iter().cloned().collect(),
            mode: self.mode.mode(),
            state: self.state,
            pending: self.pending.as_ref().map(|p| PendingValidation {
                target: p.transition.to.clone(),
                gate: p.gate(),
            }),
            queued_operations: self.scheduler.len(),
            registered: self.registry.len(),
        }
    }
}
