// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Focus Manager: a deterministic focus engine.
//!
//! [`FocusManager`] decides which single element, among a dynamically
//! registered and scoped set, holds logical input focus. It owns:
//!
//! - an element [`Registry`] with ownership handles ([`Registration`]); dropping
//!   a handle unregisters the element on the next prune,
//! - a [`ScopeStack`] over a permanent root scope, used for traps and modal dialogs,
//! - validator gates ([`Validator`]) that may answer synchronously or with a future,
//! - a bounded [`History`] with undo and redo,
//! - a [`ModeDetector`](understory_event_state::mode::ModeDetector) that
//!   classifies input as keyboard, pointer, or hybrid,
//! - a tick-driven [`Scheduler`] for deferred and debounced work.
//!
//! Ordering comes from [`understory_focus::DefaultPolicy`]: explicit order first,
//! then registration order. The engine never renders or reads a clock; the host
//! forwards input, calls [`FocusManager::tick`] once per frame, and moves native
//! focus when told through [`FocusHost`].
//!
//! ## Example
//!
//! ```rust
//! use understory_focus_manager::{
//!     FocusConfig, FocusManager, FocusOutcome, FocusableElement, NavigateOptions, NodeKey,
//!     Scope, TransitionReason, Validator,
//! };
//!
//! let mut focus = FocusManager::new(FocusConfig::default());
//! let _name = focus.register(FocusableElement::new("name", NodeKey(1))).unwrap();
//! let _dose = focus
//!     .register(
//!         FocusableElement::new("dose", NodeKey(2))
//!             // Stay put until a dose is entered.
//!             .can_leave(Validator::new(|_| false)),
//!     )
//!     .unwrap();
//!
//! focus.focus_field("name", TransitionReason::Programmatic).unwrap();
//! focus.focus_next(NavigateOptions::default()).unwrap();
//! assert_eq!(focus.current().map(|id| id.as_str()), Some("dose"));
//!
//! // The leave gate refuses.
//! assert!(focus.focus_next(NavigateOptions::default()).is_err());
//!
//! // A modal traps focus and hands it back when closed.
//! focus.open_modal(Scope::modal("confirm")).unwrap();
//! let _ok = focus
//!     .register(FocusableElement::new("ok", NodeKey(3)).in_scope("confirm"))
//!     .unwrap();
//! assert_eq!(focus.current().map(|id| id.as_str()), Some("ok"));
//! assert!(focus.handle_escape());
//! focus.tick(16);
//! assert_eq!(focus.current().map(|id| id.as_str()), Some("dose"));
//!
//! // Focusing the focused element is a no-op.
//! assert_eq!(
//!     focus.focus_field("dose", TransitionReason::Programmatic),
//!     Ok(FocusOutcome::Unchanged)
//! );
//! ```
//!
//! ## Time and asynchrony
//!
//! Every timestamp is host-provided milliseconds. A gate that returns a
//! future makes the request return [`FocusOutcome::Pending`]; each tick polls
//! the pending gate once, and the transition applies only if focus has not
//! moved in the meantime. Only the newest unresolved request is kept.
//!
//! ## Logging
//!
//! Diagnostics go through the `log` facade. Structural problems log at
//! `warn`; rejections at `debug`. With [`FocusConfig::debug`] every
//! transition decision is logged at `debug`.
//!
//! This crate is `no_std` and uses `alloc`. The engine is single-threaded.

#![no_std]

extern crate alloc;

pub mod config;
pub mod element;
pub mod error;
pub mod history;
pub mod host;
pub mod id;
mod manager;
mod modal;
pub mod registry;
pub mod scheduler;
pub mod scope;
mod snapshot;
pub mod state;
mod transition;
pub mod validator;

pub use config::{FocusBehavior, FocusConfig, NavigateOptions};
pub use element::{ElementFlags, ElementKind, FocusableElement};
pub use error::{ErrorKind, FocusError, Gate, ValidatorError};
pub use history::{History, HistoryEntry, TransitionReason};
pub use host::{FocusChange, FocusHost};
pub use id::{ElementId, NodeKey, ROOT_SCOPE, ScopeId};
pub use manager::{FocusManager, FocusOutcome, TickReport};
pub use registry::{Registration, Registry};
pub use scheduler::{FlushReport, Scheduler};
pub use scope::{ModalStackEntry, Scope, ScopeStack};
pub use snapshot::{DebugSnapshot, PendingValidation};
pub use state::{EngineEvent, EngineState};
pub use validator::{GateContext, GateFuture, Validator, Verdict};

pub use understory_event_state::mode::{KeyInput, NavigationMode};
