// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host callbacks.

use crate::config::FocusBehavior;
use crate::error::FocusError;
use crate::history::TransitionReason;
use crate::id::{ElementId, NodeKey};

/// An applied focus change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusChange {
    /// Element that lost focus.
    pub previous: Option<ElementId>,
    /// Element that gained focus.
    pub current: ElementId,
    /// Host node backing `current`; move native focus here.
    pub node: NodeKey,
    /// Why focus moved.
    pub reason: TransitionReason,
    /// How to scroll `node` into view.
    pub behavior: FocusBehavior,
    /// Whether the current interaction mode calls for a visible focus ring.
    pub show_focus_ring: bool,
}

/// Receiver of engine notifications.
///
/// All methods run synchronously inside the engine call that caused them and
/// must not call back into the engine.
pub trait FocusHost {
    /// Focus moved.
    fn focus_changed(&mut self, change: &FocusChange);

    /// A user-visible transition was rejected; give feedback such as a shake.
    ///
    /// Only called for errors where [`FocusError::wants_feedback`] is true.
    fn transition_blocked(&mut self, error: &FocusError) {
        let _ = error;
    }

    /// Focus was cleared because the focused element went away.
    fn focus_cleared(&mut self, previous: &ElementId) {
        let _ = previous;
    }
}
