// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scope and modal operations on [`FocusManager`].

use alloc::vec::Vec;

use crate::error::FocusError;
use crate::history::TransitionReason;
use crate::id::{ElementId, ScopeId};
use crate::manager::FocusManager;
use crate::scope::{ModalStackEntry, Scope};
use crate::state::EngineEvent;

impl FocusManager {
    /// Push `scope`, making it active, and return its depth.
    ///
    /// An auto-focus scope takes focus on its first candidate now, or as soon
    /// as one registers.
    pub fn push_scope(&mut self, mut scope: Scope) -> Result<usize, FocusError> {
        scope.awaiting_autofocus = scope.auto_focus;
        let id = scope.id.clone();
        let depth = self.scopes.push(scope)?;
        self.state = self.state.reduce(EngineEvent::ScopePushed { depth });
        if self.config.debug {
            log::debug!("scope `{id}` pushed at depth {depth}");
        }
        self.try_autofocus();
        Ok(depth)
    }

    /// Pop the active scope and return its id.
    ///
    /// Runs the scope's on-close callback, then schedules a best-effort
    /// restoration of its restore target for the next tick. Popping the root
    /// scope is rejected.
    pub fn pop_scope(&mut self) -> Result<ScopeId, FocusError> {
        let mut scope = self.scopes.pop()?;
        let depth = self.scopes.depth();
        self.state = self.state.reduce(EngineEvent::ScopePopped { depth });
        if self.config.debug {
            log::debug!("scope `{}` popped, depth now {depth}", scope.id);
        }
        scope.notify_closed();
        if let Some(target) = scope.restore_target.take() {
            self.scheduler.batch(move |m: &mut Self| {
                m.restore(&target);
                Ok(())
            });
        }
        Ok(scope.id)
    }

    /// The active scope.
    pub fn current_scope(&self) -> &Scope {
        self.scopes.current()
    }

    /// Number of scopes above the root.
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Open a modal scope.
    ///
    /// When `scope` has no restore target, the currently focused element
    /// becomes one, so closing the modal returns focus to where it was.
    pub fn open_modal(&mut self, mut scope: Scope) -> Result<usize, FocusError> {
        if scope.restore_target.is_none() {
            scope.restore_target = self.current().cloned();
        }
        self.push_scope(scope)
    }

    /// Close the innermost modal.
    pub fn close_modal(&mut self) -> Result<ScopeId, FocusError> {
        self.pop_scope()
    }

    /// Close the innermost scope if it is dismissible.
    ///
    /// Closes at most one level per call. Returns whether a scope closed.
    pub fn handle_escape(&mut self) -> bool {
        if self.scopes.depth() == 0 || !self.scopes.current().dismissible {
            return false;
        }
        self.pop_scope().is_ok()
    }

    /// Scopes from the root up, with their depths.
    pub fn modal_stack(&self) -> Vec<ModalStackEntry> {
        self.scopes.entries()
    }

    /// Refocus a closed scope's restore target, ignoring every failure.
    fn restore(&mut self, target: &ElementId) {
        if !self.registry.contains(target) {
            log::debug!("restore target `{target}` is gone");
            return;
        }
        if let Err(err) = self.focus_field(target, TransitionReason::Programmatic) {
            log::debug!("restoring focus to `{target}` skipped: {err}");
        }
    }
}
