// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus scopes and the scope stack.
//!
//! The stack always holds the root scope ([`ROOT_SCOPE`](crate::id::ROOT_SCOPE))
//! at index 0. The top entry is the active scope. Scopes close strictly LIFO.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::error::FocusError;
use crate::id::{ElementId, ScopeId};

/// Callback run once when a scope is popped.
pub type OnClose = Box<dyn FnOnce(&ScopeId)>;

/// A focus scope: a group of elements that keyboard traversal stays within.
pub struct Scope {
    /// Unique id among scopes on the stack.
    pub id: ScopeId,
    /// Reject transitions to elements owned by other scopes while active.
    pub trap: bool,
    /// Focus the first candidate when the scope opens or gains its first element.
    pub auto_focus: bool,
    /// Whether Escape may close this scope.
    pub dismissible: bool,
    /// Element to refocus after the scope closes.
    pub restore_target: Option<ElementId>,
    on_close: Option<OnClose>,
    pub(crate) awaiting_autofocus: bool,
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("trap", &self.trap)
            .field("auto_focus", &self.auto_focus)
            .field("dismissible", &self.dismissible)
            .field("restore_target", &self.restore_target)
            .field("on_close", &self.on_close.is_some())
            .finish_non_exhaustive()
    }
}

impl Scope {
    /// A non-trapping, dismissible scope without auto-focus.
    pub fn new(id: impl Into<ScopeId>) -> Self {
        Self {
            id: id.into(),
            trap: false,
            auto_focus: false,
            dismissible: true,
            restore_target: None,
            on_close: None,
            awaiting_autofocus: false,
        }
    }

    /// A trapping, auto-focusing, dismissible scope, as used for modal dialogs.
    pub fn modal(id: impl Into<ScopeId>) -> Self {
        Self::new(id).trapping(true).auto_focus(true)
    }

    /// Set [`Scope::trap`].
    pub fn trapping(mut self, trap: bool) -> Self {
        self.trap = trap;
        self
    }

    /// Set [`Scope::auto_focus`].
    pub fn auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Set [`Scope::dismissible`].
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    /// Set [`Scope::restore_target`].
    pub fn restore_to(mut self, element: impl Into<ElementId>) -> Self {
        self.restore_target = Some(element.into());
        self
    }

    /// Install the on-close callback.
    pub fn on_close(mut self, callback: impl FnOnce(&ScopeId) + 'static) -> Self {
        self.on_close = Some(Box::new(callback));
        self
    }

    /// Run the on-close callback, if any. Subsequent calls do nothing.
    pub(crate) fn notify_closed(&mut self) {
        if let Some(callback) = self.on_close.take() {
            callback(&self.id);
        }
    }
}

/// A scope's position on the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalStackEntry {
    /// Scope id.
    pub scope: ScopeId,
    /// Nesting depth; the root scope is 0.
    pub depth: usize,
}

/// LIFO stack of scopes over a permanent root.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the root scope.
    pub fn new() -> Self {
        let mut scopes = Vec::with_capacity(4);
        scopes.push(Scope::new(ScopeId::root()).dismissible(false));
        Self { scopes }
    }

    /// Push `scope`, making it active, and return its depth.
    pub fn push(&mut self, scope: Scope) -> Result<usize, FocusError> {
        if self.contains(&scope.id) {
            log::warn!("scope `{}` is already on the stack", scope.id);
            return Err(FocusError::DuplicateScope(scope.id));
        }
        self.scopes.push(scope);
        Ok(self.depth())
    }

    /// Remove the active scope. The root scope is never removed.
    pub fn pop(&mut self) -> Result<Scope, FocusError> {
        if self.scopes.len() <= 1 {
            log::warn!("attempted to pop the root scope");
            return Err(FocusError::RootScope);
        }
        self.scopes.pop().ok_or(FocusError::RootScope)
    }

    /// The active scope.
    pub fn current(&self) -> &Scope {
        // The root is never popped, so the stack is never empty.
        &self.scopes[self.scopes.len() - 1]
    }

    pub(crate) fn current_mut(&mut self) -> &mut Scope {
        let top = self.scopes.len() - 1;
        &mut self.scopes[top]
    }

    /// Number of scopes above the root.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Whether a scope with `id` is on the stack.
    pub fn contains(&self, id: &str) -> bool {
        self.scopes.iter().any(|s| s.id == *id)
    }

    /// Scope with `id`, if on the stack.
    pub fn get(&self, id: &str) -> Option<&Scope> {
        self.scopes.iter().find(|s| s.id == *id)
    }

    /// All scopes from the root up.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Scope> + ExactSizeIterator {
        self.scopes.iter()
    }

    /// Stack positions from the root up.
    pub fn entries(&self) -> Vec<ModalStackEntry> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(depth, s)| ModalStackEntry {
                scope: s.id.clone(),
                depth,
            })
            .collect()
    }

    /// Drop every scope above the root without running callbacks.
    pub fn reset(&mut self) {
        self.scopes.truncate(1);
    }
}
