// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Nothing in this crate panics for expected conditions. Operations return
//! [`FocusError`]; callers that only care about success can test `is_ok()`.
//! [`FocusError::kind`] groups the variants into the coarse categories hosts
//! usually branch on.

use alloc::string::String;
use core::fmt;

use crate::id::{ElementId, ScopeId};

/// Which validator gate made a decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// `can_leave_focus` of the element losing focus.
    Leave,
    /// `can_receive_focus` of the element gaining focus.
    Enter,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Leave => "leave",
            Self::Enter => "enter",
        })
    }
}

/// Failure reported by a validator.
///
/// Treated exactly like a validator answering `false`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidatorError {
    message: String,
}

impl ValidatorError {
    /// Create an error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message passed at construction.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Coarse error categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An operation referenced an id that is not registered.
    NotFound,
    /// A validator rejected, errored, or the transition lost a race.
    ValidationRejected,
    /// Navigation rules (scope, trap, sequence, candidates) prevented the move.
    Blocked,
    /// A structural rule was violated; the operation was a no-op.
    InvariantViolation,
}

/// Errors returned by focus operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    /// The element is not registered, or its owner released it.
    #[error("element `{0}` is not registered")]
    NotFound(ElementId),
    /// The element is hidden, disabled, skipped, or its scope has closed.
    #[error("element `{0}` cannot take focus")]
    NotFocusable(ElementId),
    /// The active scope traps focus and the element belongs elsewhere.
    #[error("element `{element}` is outside trapping scope `{scope}`")]
    OutsideTrap {
        /// Requested element.
        element: ElementId,
        /// Active trapping scope.
        scope: ScopeId,
    },
    /// The active scope has no candidate in the requested direction.
    #[error("no focus candidate in scope `{0}`")]
    NoCandidate(ScopeId),
    /// A pointer tried to reach an element out of sequence.
    #[error("element `{0}` cannot be reached out of sequence")]
    JumpBlocked(ElementId),
    /// A validator gate answered `false` or failed.
    #[error("{gate} gate of `{element}` rejected the transition")]
    ValidationRejected {
        /// Element whose gate decided.
        element: ElementId,
        /// Which gate decided.
        gate: Gate,
        /// Validator failure, when the gate errored rather than answering `false`.
        #[source]
        cause: Option<ValidatorError>,
    },
    /// Focus moved while the transition was awaiting validation.
    #[error("transition to `{0}` was superseded")]
    Superseded(ElementId),
    /// Attempt to pop the root scope.
    #[error("the root scope cannot be popped")]
    RootScope,
    /// A scope with this id is already on the stack.
    #[error("scope `{0}` is already on the stack")]
    DuplicateScope(ScopeId),
    /// The referenced scope is not on the stack.
    #[error("scope `{0}` is not on the stack")]
    UnknownScope(ScopeId),
    /// The element description is unusable.
    #[error("malformed element `{element}`: {reason}")]
    MalformedElement {
        /// Offending element.
        element: ElementId,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl FocusError {
    /// The coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ValidationRejected { .. } | Self::Superseded(_) => ErrorKind::ValidationRejected,
            Self::NotFocusable(_)
            | Self::OutsideTrap { .. }
            | Self::NoCandidate(_)
            | Self::JumpBlocked(_) => ErrorKind::Blocked,
            Self::RootScope
            | Self::DuplicateScope(_)
            | Self::UnknownScope(_)
            | Self::MalformedElement { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// Whether the host should give visible feedback for this rejection.
    ///
    /// True for decisions the user caused and can act on: validator rejections,
    /// out-of-sequence jumps, and clicks outside a trap.
    pub fn wants_feedback(&self) -> bool {
        matches!(
            self,
            Self::ValidationRejected { .. } | Self::JumpBlocked(_) | Self::OutsideTrap { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use core::error::Error as _;

    #[test]
    fn kinds() {
        assert_eq!(FocusError::NotFound("a".into()).kind(), ErrorKind::NotFound);
        assert_eq!(FocusError::RootScope.kind(), ErrorKind::InvariantViolation);
        assert_eq!(
            FocusError::NoCandidate(ScopeId::root()).kind(),
            ErrorKind::Blocked
        );
        assert_eq!(
            FocusError::Superseded("a".into()).kind(),
            ErrorKind::ValidationRejected
        );
    }

    #[test]
    fn rejection_carries_validator_source() {
        let err = FocusError::ValidationRejected {
            element: "dose".into(),
            gate: Gate::Leave,
            cause: Some(ValidatorError::new("dose must be positive")),
        };
        assert_eq!(err.to_string(), "leave gate of `dose` rejected the transition");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("dose must be positive")
        );
        assert!(err.wants_feedback());
        assert!(!FocusError::NotFound("x".into()).wants_feedback());
    }
}
