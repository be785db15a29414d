// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focusable element descriptions.

use crate::id::{ElementId, NodeKey, ScopeId};
use crate::validator::Validator;

bitflags::bitflags! {
    /// Capability flags of a focusable element.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is visible to the user.
        const VISIBLE      = 0b0000_0001;
        /// Element accepts input.
        const ENABLED      = 0b0000_0010;
        /// Element is skipped by focus, both sequential and direct.
        const SKIP         = 0b0000_0100;
        /// Element may be focused by pointer out of sequence.
        const JUMP_ALLOWED = 0b0000_1000;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED
    }
}

impl ElementFlags {
    /// Visible, enabled, and not skipped.
    pub fn is_focusable(self) -> bool {
        self.contains(Self::VISIBLE | Self::ENABLED) && !self.contains(Self::SKIP)
    }
}

/// Interactive type of an element, for hosts that style or announce by kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Single- or multi-line text entry.
    Text,
    /// Dropdown or list selection.
    Select,
    /// Date or time picker.
    Date,
    /// Checkbox, radio button, or switch.
    Toggle,
    /// Push button or link.
    Button,
    /// Anything else.
    #[default]
    Other,
}

/// Description of a focusable element, as handed to
/// [`FocusManager::register`](crate::FocusManager::register).
///
/// ```
/// use understory_focus_manager::{ElementKind, FocusableElement, NodeKey, Validator};
///
/// let dose = FocusableElement::new("dose", NodeKey(12))
///     .in_scope("prescription")
///     .with_order(2)
///     .with_kind(ElementKind::Text)
///     .can_leave(Validator::new(|_| true));
/// assert_eq!(dose.order, Some(2));
/// assert!(dose.flags.is_focusable());
/// ```
#[derive(Clone, Debug)]
pub struct FocusableElement {
    /// Unique id.
    pub id: ElementId,
    /// Owning scope.
    pub scope: ScopeId,
    /// Explicit traversal order; lower first, unordered elements last.
    pub order: Option<i32>,
    /// Interactive type.
    pub kind: ElementKind,
    /// Capability flags.
    pub flags: ElementFlags,
    /// Backing host node. Elements without one are rejected at registration.
    pub node: Option<NodeKey>,
    /// Gate consulted before this element gains focus.
    pub can_receive_focus: Option<Validator>,
    /// Gate consulted before this element loses focus to sequential or pointer navigation.
    pub can_leave_focus: Option<Validator>,
}

impl FocusableElement {
    /// An element in the root scope with default flags and no validators.
    pub fn new(id: impl Into<ElementId>, node: NodeKey) -> Self {
        Self {
            id: id.into(),
            scope: ScopeId::root(),
            order: None,
            kind: ElementKind::Other,
            flags: ElementFlags::default(),
            node: Some(node),
            can_receive_focus: None,
            can_leave_focus: None,
        }
    }

    /// Place the element in `scope`.
    pub fn in_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Set an explicit traversal order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the interactive type.
    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    /// Replace the capability flags.
    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Allow pointer focus out of sequence.
    pub fn jump_allowed(mut self) -> Self {
        self.flags |= ElementFlags::JUMP_ALLOWED;
        self
    }

    /// Install the `can_receive_focus` gate.
    pub fn can_receive(mut self, validator: Validator) -> Self {
        self.can_receive_focus = Some(validator);
        self
    }

    /// Install the `can_leave_focus` gate.
    pub fn can_leave(mut self, validator: Validator) -> Self {
        self.can_leave_focus = Some(validator);
        self
    }
}
