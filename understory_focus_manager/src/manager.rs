// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focus manager.

use alloc::boxed::Box;
use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;
use understory_event_state::mode::{KeyInput, ModeDetector, NavigationMode};
use understory_focus::{DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation, WrapMode};

use crate::config::{FocusConfig, NavigateOptions};
use crate::element::{ElementFlags, FocusableElement};
use crate::error::{FocusError, Gate};
use crate::history::{History, HistoryEntry, TransitionReason};
use crate::host::{FocusChange, FocusHost};
use crate::id::{ElementId, ScopeId};
use crate::registry::{Registration, Registry};
use crate::scheduler::{FlushReport, Scheduled, Scheduler};
use crate::scope::ScopeStack;
use crate::state::{EngineEvent, EngineState};
use crate::transition::{PendingTransition, Progress, Transition};

/// Candidates of one scope, built per navigation.
type Candidates = SmallVec<[FocusEntry<ElementId>; 16]>;

/// Result of a focus request that was not rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Focus moved.
    Moved {
        /// Element that lost focus.
        from: Option<ElementId>,
        /// Element that gained focus.
        to: ElementId,
    },
    /// The target already had focus; nothing changed.
    Unchanged,
    /// A gate answered asynchronously; the move is decided on a later [`FocusManager::tick`].
    Pending(ElementId),
}

impl FocusOutcome {
    /// Whether focus moved during this call.
    pub fn moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// What one [`FocusManager::tick`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Disposed registry entries removed.
    pub pruned: usize,
    /// Pending transitions that were applied, rejected, or dropped.
    pub resolved: usize,
    /// Scheduled operations.
    pub flush: FlushReport,
}

/// Deterministic focus engine.
///
/// Owns the element registry, the scope stack, the history, the mode detector,
/// and the update scheduler. All mutation goes through `&mut self`; the host
/// drives time by calling [`FocusManager::tick`].
pub struct FocusManager {
    pub(crate) config: FocusConfig,
    pub(crate) registry: Registry,
    pub(crate) scopes: ScopeStack,
    pub(crate) history: History,
    pub(crate) mode: ModeDetector<ElementId>,
    pub(crate) scheduler: Scheduler<Self>,
    pub(crate) current: Option<ElementId>,
    pub(crate) state: EngineState,
    /// The newest transition waiting on a gate future.
    pub(crate) pending: Option<PendingTransition>,
    queued_step: Option<(Navigation, NavigateOptions)>,
    host: Option<Box<dyn FocusHost>>,
    /// Bumped whenever current focus changes.
    epoch: u64,
    now: u64,
}

impl fmt::Debug for FocusManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusManager")
            .field("current", &self.current)
            .field("active_scope", &self.scopes.current().id)
            .field("state", &self.state)
            .field("mode", &self.mode.mode())
            .field("registered", &self.registry.len())
            .field("pending", &self.pending.as_ref().map(|p| &p.transition.to))
            .field("queued", &self.scheduler.len())
            .field("host", &self.host.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for FocusManager {
    fn default() -> Self {
        Self::new(FocusConfig::default())
    }
}

impl Scheduled for FocusManager {
    fn scheduler(&mut self) -> &mut Scheduler<Self> {
        &mut self.scheduler
    }
}

impl FocusManager {
    /// Create an engine with only the root scope.
    pub fn new(config: FocusConfig) -> Self {
        Self {
            registry: Registry::new(),
            scopes: ScopeStack::new(),
            history: History::new(config.history_capacity),
            mode: ModeDetector::with_config(config.mode_window_ms, config.sample_capacity),
            scheduler: Scheduler::new(config.flush_chunk),
            current: None,
            state: EngineState::Idle,
            pending: None,
            queued_step: None,
            host: None,
            epoch: 0,
            now: 0,
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    /// Replace the configuration wholesale.
    ///
    /// Shrinking capacities evicts the oldest history entries and samples.
    pub fn set_config(&mut self, config: FocusConfig) {
        self.history.set_capacity(config.history_capacity);
        self.mode.set_sample_capacity(config.sample_capacity);
        self.mode.window_ms = config.mode_window_ms;
        self.scheduler.set_chunk(config.flush_chunk);
        self.config = config;
    }

    /// Install the host that receives focus notifications.
    pub fn set_host(&mut self, host: impl FocusHost + 'static) {
        self.host = Some(Box::new(host));
    }

    /// Remove the host, returning it.
    pub fn take_host(&mut self) -> Option<Box<dyn FocusHost>> {
        self.host.take()
    }

    /// Register an element and return its ownership handle.
    ///
    /// The element's scope must be on the stack. If the active scope is
    /// waiting to auto-focus, this may move focus to the new element.
    pub fn register(&mut self, element: FocusableElement) -> Result<Registration, FocusError> {
        if !self.scopes.contains(&element.scope) {
            log::warn!(
                "rejected registration of `{}`: scope `{}` is not on the stack",
                element.id,
                element.scope
            );
            return Err(FocusError::UnknownScope(element.scope));
        }
        let id = element.id.clone();
        let handle = self.registry.register(element)?;
        if self.current.as_ref() == Some(&id) && !self.is_focusable(&id) {
            self.clear_focus();
        }
        self.try_autofocus();
        Ok(handle)
    }

    /// Remove an element. Clears focus if it was focused.
    pub fn unregister(&mut self, id: &str) -> Option<FocusableElement> {
        let removed = self.registry.unregister(id)?;
        if self.current.as_deref() == Some(id) {
            self.clear_focus();
        }
        Some(removed)
    }

    /// Update an element's capability flags.
    ///
    /// Making the focused element unfocusable clears focus.
    pub fn set_flags(&mut self, id: &str, flags: ElementFlags) -> Result<(), FocusError> {
        self.registry.set_flags(id, flags)?;
        if self.current.as_deref() == Some(id) && !flags.is_focusable() {
            self.clear_focus();
        } else if flags.is_focusable() {
            self.try_autofocus();
        }
        Ok(())
    }

    /// The registry, for lookups.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The focused element, if any.
    pub fn current(&self) -> Option<&ElementId> {
        self.current.as_ref().filter(|id| self.registry.contains(id))
    }

    /// Coarse engine state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Current interaction classification.
    pub fn mode(&self) -> NavigationMode {
        self.mode.mode()
    }

    /// Whether keyboard-only affordances such as a focus ring should be shown.
    pub fn shows_focus_ring(&self) -> bool {
        self.mode.shows_focus_ring()
    }

    /// The focus history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Forget all recorded transitions.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Forget recorded pointer samples; the mode is kept.
    pub fn clear_samples(&mut self) {
        self.mode.clear();
    }

    /// Move focus to `id`.
    ///
    /// The target must be registered, focusable, owned by a scope on the stack,
    /// and allowed by any trap. Its `can_receive_focus` gate decides.
    pub fn focus_field(
        &mut self,
        id: &str,
        reason: TransitionReason,
    ) -> Result<FocusOutcome, FocusError> {
        self.begin();
        let result = self.request(id, reason, false, None);
        self.settle();
        result
    }

    /// Move focus to the next candidate of the active scope.
    pub fn focus_next(&mut self, options: NavigateOptions) -> Result<FocusOutcome, FocusError> {
        self.navigate(Navigation::Next, options, TransitionReason::Keyboard)
    }

    /// Move focus to the previous candidate of the active scope.
    pub fn focus_previous(&mut self, options: NavigateOptions) -> Result<FocusOutcome, FocusError> {
        self.navigate(Navigation::Prev, options, TransitionReason::Keyboard)
    }

    /// Focus the first candidate of the active scope.
    pub fn focus_first(&mut self) -> Result<FocusOutcome, FocusError> {
        self.navigate(
            Navigation::First,
            NavigateOptions::default(),
            TransitionReason::Programmatic,
        )
    }

    /// Focus the last candidate of the active scope.
    pub fn focus_last(&mut self) -> Result<FocusOutcome, FocusError> {
        self.navigate(
            Navigation::Last,
            NavigateOptions::default(),
            TransitionReason::Programmatic,
        )
    }

    /// Focus `id` in response to a click at `position`.
    ///
    /// Records the interaction, then rejects targets more than one step ahead
    /// of current focus unless they allow jumps. Both the leave gate of the
    /// focused element and the enter gate of the target run.
    pub fn focus_by_pointer(
        &mut self,
        id: &str,
        position: Point,
        now: u64,
    ) -> Result<FocusOutcome, FocusError> {
        self.now = now;
        self.mode.on_pointer(Some(ElementId::from(id)), position, now);
        self.begin();
        let result = match self.check_jump(id) {
            Ok(()) => self.request(id, TransitionReason::Pointer, true, None),
            Err(err) => Err(self.reject(err)),
        };
        self.settle();
        result
    }

    /// Forward a key press to the mode detector.
    pub fn observe_key(&mut self, key: KeyInput, now: u64) -> NavigationMode {
        self.now = now;
        self.mode.on_key(key, now)
    }

    /// Forward pointer activity that did not request focus.
    pub fn observe_pointer(&mut self, target: Option<&str>, position: Point, now: u64) -> NavigationMode {
        self.now = now;
        self.mode.on_pointer(target.map(ElementId::from), position, now)
    }

    /// Drop focus without moving it elsewhere. Returns the element that had it.
    pub fn blur(&mut self) -> Option<ElementId> {
        let previous = self.current.clone()?;
        self.clear_focus();
        Some(previous)
    }

    /// Step the history cursor back and refocus that entry.
    ///
    /// Returns `false` when there is nothing to undo, or the entry's element is
    /// gone or refuses focus; the cursor is then left where it was.
    pub fn undo(&mut self) -> bool {
        self.walk_history(History::step_back)
    }

    /// Step the history cursor forward and refocus that entry.
    ///
    /// Same failure rules as [`FocusManager::undo`].
    pub fn redo(&mut self) -> bool {
        self.walk_history(History::step_forward)
    }

    /// Enqueue arbitrary work for the next tick.
    ///
    /// Returns `true` when this scheduled a flush that was not already pending.
    pub fn batch(&mut self, op: impl FnOnce(&mut Self) -> Result<(), FocusError> + 'static) -> bool {
        self.scheduler.batch(op)
    }

    /// Debounced [`FocusManager::focus_next`].
    ///
    /// Sequential requests made before the next tick share one slot; only the
    /// most recent survives. Returns `true` when this call opened the slot.
    pub fn request_next(&mut self, options: NavigateOptions) -> bool {
        self.request_step(Navigation::Next, options)
    }

    /// Debounced [`FocusManager::focus_previous`].
    pub fn request_previous(&mut self, options: NavigateOptions) -> bool {
        self.request_step(Navigation::Prev, options)
    }

    /// Enqueue [`FocusManager::focus_field`] for the next tick.
    pub fn request_focus(&mut self, id: impl Into<ElementId>, reason: TransitionReason) -> bool {
        let id = id.into();
        self.scheduler
            .batch(move |m: &mut Self| m.focus_field(&id, reason).map(drop))
    }

    /// Advance the engine to `now`.
    ///
    /// Prunes disposed elements, polls pending gates in request order, then
    /// applies one chunk of scheduled operations.
    pub fn tick(&mut self, now: u64) -> TickReport {
        self.now = now;
        let pruned = self.prune();
        let resolved = self.poll_pending();
        let flush = Scheduler::flush(self);
        self.settle();
        TickReport {
            pruned,
            resolved,
            flush,
        }
    }

    /// Whether calling [`FocusManager::tick`] would do anything beyond pruning.
    pub fn needs_tick(&self) -> bool {
        self.pending.is_some() || self.scheduler.is_scheduled()
    }

    /// Remove disposed registry entries. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let dead = self.registry.prune();
        if self.current.as_ref().is_some_and(|c| dead.contains(c)) {
            self.clear_focus();
        }
        dead.len()
    }

    /// Cancel all work and return to the initial state.
    ///
    /// Scheduled operations and pending gates are dropped, every element is
    /// unregistered, scopes above the root are discarded without running their
    /// callbacks, and history and samples are cleared. The host stays installed.
    pub fn teardown(&mut self) {
        self.scheduler.destroy();
        self.pending = None;
        self.queued_step = None;
        self.registry.clear();
        self.scopes.reset();
        self.history.clear();
        self.mode.reset();
        self.current = None;
        self.epoch += 1;
        self.state = EngineState::Idle;
        log::debug!("focus engine torn down");
    }

    fn request_step(&mut self, direction: Navigation, options: NavigateOptions) -> bool {
        let fresh = self.queued_step.replace((direction, options)).is_none();
        if fresh {
            self.scheduler.batch(|m: &mut Self| match m.queued_step.take() {
                Some((direction, options)) => m
                    .navigate(direction, options, TransitionReason::Keyboard)
                    .map(drop),
                None => Ok(()),
            });
        }
        fresh
    }

    fn navigate(
        &mut self,
        direction: Navigation,
        options: NavigateOptions,
        reason: TransitionReason,
    ) -> Result<FocusOutcome, FocusError> {
        self.begin();
        let result = self.step(direction, options, reason);
        self.settle();
        result
    }

    fn step(
        &mut self,
        direction: Navigation,
        options: NavigateOptions,
        reason: TransitionReason,
    ) -> Result<FocusOutcome, FocusError> {
        let active = self.scopes.current().id.clone();
        let candidates = self.candidates(&active);
        let policy = DefaultPolicy {
            wrap: WrapMode::from(options.wrap.unwrap_or(self.config.wrap)),
        };
        let origin = self.current().cloned();
        let picked = policy.next(
            origin.clone(),
            direction,
            &FocusSpace { nodes: &candidates },
        );
        let target = match picked {
            // Sequential moves must go somewhere else.
            Some(t) if origin.as_ref() == Some(&t)
                && matches!(direction, Navigation::Next | Navigation::Prev) =>
            {
                None
            }
            other => other,
        };
        let Some(target) = target else {
            return Err(self.reject(FocusError::NoCandidate(active)));
        };
        let leave = reason == TransitionReason::Keyboard;
        self.request(&target, reason, leave, None)
    }

    fn walk_history(&mut self, step: fn(&mut History) -> Option<&HistoryEntry>) -> bool {
        let saved = self.history.mark();
        let Some(target) = step(&mut self.history).map(|e| e.element.clone()) else {
            return false;
        };
        self.begin();
        let result = self.request(&target, TransitionReason::HistoryNavigation, false, Some(saved));
        self.settle();
        match result {
            Ok(_) => true,
            Err(err) => {
                self.history.restore(saved);
                log::debug!("history navigation to `{target}` abandoned: {err}");
                false
            }
        }
    }

    /// Build and ask a transition to `to`.
    fn request(
        &mut self,
        to: &str,
        reason: TransitionReason,
        leave_gate: bool,
        rewind: Option<Option<u64>>,
    ) -> Result<FocusOutcome, FocusError> {
        let target = self
            .check_target(to)
            .map(|el| (el.id.clone(), el.can_receive_focus.clone()));
        let (to, enter) = match target {
            Ok(t) => t,
            Err(err) => return Err(self.reject(err)),
        };
        let from = self.current().cloned();
        if from.as_ref() == Some(&to) {
            return Ok(FocusOutcome::Unchanged);
        }
        let leave = if leave_gate {
            from.as_deref()
                .and_then(|f| self.registry.get(f))
                .and_then(|el| el.can_leave_focus.clone())
        } else {
            None
        };
        let transition = Transition {
            to,
            from,
            reason,
            leave,
            enter,
            epoch: self.epoch,
            rewind,
        };
        self.resolve(transition.ask())
    }

    fn resolve(&mut self, progress: Progress) -> Result<FocusOutcome, FocusError> {
        match progress {
            Progress::Accepted(t) => self.apply(t),
            Progress::Rejected {
                transition,
                gate,
                cause,
            } => {
                self.rewind(&transition);
                let element = match gate {
                    Gate::Leave => transition.from.unwrap_or(transition.to),
                    Gate::Enter => transition.to,
                };
                Err(self.reject(FocusError::ValidationRejected {
                    element,
                    gate,
                    cause,
                }))
            }
            Progress::Pending(p) => {
                let to = p.transition.to.clone();
                self.park(p);
                Ok(FocusOutcome::Pending(to))
            }
        }
    }

    /// Phase two: commit an accepted transition unless focus moved meanwhile.
    fn apply(&mut self, t: Transition) -> Result<FocusOutcome, FocusError> {
        if t.epoch != self.epoch {
            self.rewind(&t);
            return Err(self.reject(FocusError::Superseded(t.to)));
        }
        let checked = self
            .check_target(&t.to)
            .and_then(|el| match el.node {
                Some(node) => Ok((node, el.scope.clone())),
                None => Err(FocusError::MalformedElement {
                    element: el.id.clone(),
                    reason: "no backing node",
                }),
            });
        let (node, scope) = match checked {
            Ok(v) => v,
            Err(err) => {
                self.rewind(&t);
                return Err(self.reject(err));
            }
        };

        let previous = self.current.take().filter(|id| self.registry.contains(id));
        self.current = Some(t.to.clone());
        self.epoch += 1;
        if t.reason != TransitionReason::HistoryNavigation {
            self.history.push(HistoryEntry {
                element: t.to.clone(),
                scope,
                reason: t.reason,
                previous: previous.clone(),
                timestamp: self.now,
            });
        }
        if self.config.debug {
            log::debug!("focus accepted: {:?} -> `{}` ({:?})", previous, t.to, t.reason);
        }
        // The cursor now belongs to this move.
        if let Some(stale) = self.pending.take() {
            self.supersede(stale.transition, false);
        }
        let change = FocusChange {
            previous: previous.clone(),
            current: t.to.clone(),
            node,
            reason: t.reason,
            behavior: self.config.behavior,
            show_focus_ring: self.mode.shows_focus_ring(),
        };
        if let Some(host) = self.host.as_deref_mut() {
            host.focus_changed(&change);
        }
        Ok(FocusOutcome::Moved {
            from: previous,
            to: t.to,
        })
    }

    /// Park `p`, taking the slot from any older unresolved request.
    ///
    /// An older request for the same target is replaced; one for another
    /// target is superseded.
    fn park(&mut self, mut p: PendingTransition) {
        if let Some(old) = self.pending.take() {
            // A history move keeps the cursor mark from before the first
            // unresolved history move.
            let inherit = p.transition.rewind.is_some() && old.transition.rewind.is_some();
            if inherit {
                p.transition.rewind = old.transition.rewind;
            }
            if old.transition.to == p.transition.to {
                if !inherit {
                    self.rewind(&old.transition);
                }
                log::debug!("pending transition to `{}` replaced", old.transition.to);
            } else {
                self.supersede(old.transition, !inherit);
            }
        }
        if self.config.debug {
            log::debug!(
                "focus to `{}` awaiting {} gate",
                p.transition.to,
                p.gate()
            );
        }
        self.pending = Some(p);
        self.state = self.state.reduce(EngineEvent::Suspend);
    }

    fn poll_pending(&mut self) -> usize {
        let Some(p) = self.pending.take() else {
            return 0;
        };
        if p.transition.epoch != self.epoch {
            self.supersede(p.transition, true);
            return 1;
        }
        match p.advance() {
            Progress::Pending(p) => {
                self.pending = Some(p);
                0
            }
            done => {
                // Rejections are already logged and reported to the host.
                let _ = self.resolve(done);
                1
            }
        }
    }

    fn check_target(&self, id: &str) -> Result<&FocusableElement, FocusError> {
        let el = self
            .registry
            .get(id)
            .ok_or_else(|| FocusError::NotFound(id.into()))?;
        if !el.flags.is_focusable() || !self.scopes.contains(&el.scope) {
            return Err(FocusError::NotFocusable(el.id.clone()));
        }
        let active = self.scopes.current();
        if active.trap && el.scope != active.id {
            return Err(FocusError::OutsideTrap {
                element: el.id.clone(),
                scope: active.id.clone(),
            });
        }
        Ok(el)
    }

    /// Direct-jump gate for pointer focus within the active scope.
    fn check_jump(&self, id: &str) -> Result<(), FocusError> {
        if !self.config.guard_jumps {
            return Ok(());
        }
        let Some(el) = self.registry.get(id) else {
            return Ok(());
        };
        let active = &self.scopes.current().id;
        if el.flags.contains(ElementFlags::JUMP_ALLOWED) || el.scope != *active {
            return Ok(());
        }
        let candidates = self.candidates(active);
        let space = FocusSpace { nodes: &candidates };
        let Some(rank) = space.rank(&el.id) else {
            return Ok(());
        };
        let reachable = match self.current().and_then(|c| space.rank(c)) {
            Some(r) => r + 1,
            None => 0,
        };
        if rank <= reachable {
            Ok(())
        } else {
            Err(FocusError::JumpBlocked(el.id.clone()))
        }
    }

    fn candidates(&self, scope: &ScopeId) -> Candidates {
        self.registry
            .iter()
            .filter(|(el, _)| el.scope == *scope)
            .map(|(el, sequence)| FocusEntry {
                id: el.id.clone(),
                order: el.order,
                sequence,
                enabled: el.flags.is_focusable(),
            })
            .collect()
    }

    fn is_focusable(&self, id: &str) -> bool {
        self.registry.get(id).is_some_and(|el| el.flags.is_focusable())
    }

    /// Log a rejection, tell the host when the user should see it, and hand it back.
    fn reject(&mut self, err: FocusError) -> FocusError {
        if self.config.debug {
            log::debug!("focus rejected: {err}");
        }
        if let FocusError::ValidationRejected {
            cause: Some(cause), ..
        } = &err
        {
            log::debug!("validator failed: {cause}");
        }
        if err.wants_feedback() {
            if let Some(host) = self.host.as_deref_mut() {
                host.transition_blocked(&err);
            }
        }
        err
    }

    fn supersede(&mut self, t: Transition, rewind: bool) {
        if rewind {
            self.rewind(&t);
        }
        self.reject(FocusError::Superseded(t.to));
    }

    fn rewind(&mut self, t: &Transition) {
        if let Some(mark) = t.rewind {
            self.history.restore(mark);
        }
    }

    pub(crate) fn clear_focus(&mut self) {
        let Some(previous) = self.current.take() else {
            return;
        };
        self.epoch += 1;
        if self.config.debug {
            log::debug!("focus cleared from `{previous}`");
        }
        if let Some(host) = self.host.as_deref_mut() {
            host.focus_cleared(&previous);
        }
    }

    /// Focus the first candidate of the active scope if it is waiting to.
    pub(crate) fn try_autofocus(&mut self) {
        if !self.scopes.current().awaiting_autofocus {
            return;
        }
        match self.navigate(
            Navigation::First,
            NavigateOptions::default(),
            TransitionReason::Programmatic,
        ) {
            // Keep waiting for the first eligible element.
            Err(FocusError::NoCandidate(_)) => {}
            Ok(_) | Err(_) => self.scopes.current_mut().awaiting_autofocus = false,
        }
    }

    pub(crate) fn begin(&mut self) {
        self.state = self.state.reduce(EngineEvent::Begin);
    }

    pub(crate) fn settle(&mut self) {
        self.state = self.state.reduce(EngineEvent::Settle {
            depth: self.scopes.depth(),
            pending: usize::from(self.pending.is_some()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FocusBehavior;
    use crate::error::ValidatorError;
    use crate::id::NodeKey;
    use crate::snapshot::PendingValidation;
    use crate::validator::{Validator, Verdict};
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};
    use core::task::Poll;
    use futures::future::poll_fn;

    #[derive(Default)]
    struct Log {
        changes: Vec<FocusChange>,
        blocked: Vec<FocusError>,
        cleared: Vec<ElementId>,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Log>>);

    impl FocusHost for Recorder {
        fn focus_changed(&mut self, change: &FocusChange) {
            self.0.borrow_mut().changes.push(change.clone());
        }

        fn transition_blocked(&mut self, error: &FocusError) {
            self.0.borrow_mut().blocked.push(error.clone());
        }

        fn focus_cleared(&mut self, previous: &ElementId) {
            self.0.borrow_mut().cleared.push(previous.clone());
        }
    }

    fn form(ids: &[&str]) -> (FocusManager, Vec<Registration>) {
        let mut m = FocusManager::default();
        let handles = ids
            .iter()
            .zip(0_u64..)
            .map(|(id, node)| m.register(FocusableElement::new(*id, NodeKey(node))).unwrap())
            .collect();
        (m, handles)
    }

    fn current(m: &FocusManager) -> Option<&str> {
        m.current().map(|id| id.as_str())
    }

    /// A gate whose future resolves to `answer` once `open` is set.
    fn latch(open: &Rc<Cell<bool>>, answer: bool) -> Validator {
        let open = open.clone();
        Validator::future(move |_| {
            let open = open.clone();
            poll_fn(move |_| {
                if open.get() {
                    Poll::Ready(Ok(answer))
                } else {
                    Poll::Pending
                }
            })
        })
    }

    /// Accepts at once until `deny` is set, then refuses once `open` is set.
    fn switchable(deny: &Rc<Cell<bool>>, open: &Rc<Cell<bool>>) -> Validator {
        let deny = deny.clone();
        let gate = latch(open, false);
        Validator::from_fn(move |cx| {
            if deny.get() {
                gate.check(cx)
            } else {
                Verdict::Ready(Ok(true))
            }
        })
    }

    fn next(m: &mut FocusManager) -> Result<FocusOutcome, FocusError> {
        m.focus_next(NavigateOptions::default())
    }

    #[test]
    fn explicit_order_then_registration_order() {
        let mut m = FocusManager::default();
        let _h = [
            m.register(FocusableElement::new("x", NodeKey(0))).unwrap(),
            m.register(FocusableElement::new("c", NodeKey(1)).with_order(2)).unwrap(),
            m.register(FocusableElement::new("a", NodeKey(2)).with_order(1)).unwrap(),
            m.register(FocusableElement::new("y", NodeKey(3))).unwrap(),
        ];
        let mut seen = Vec::new();
        for _ in 0..5 {
            next(&mut m).unwrap();
            seen.extend(m.current().cloned());
        }
        assert_eq!(seen, ["a", "c", "x", "y", "a"], "ordered first, then wrap");
    }

    #[test]
    fn previous_without_focus_selects_last() {
        let (mut m, _h) = form(&["a", "b", "c"]);
        m.focus_previous(NavigateOptions::default()).unwrap();
        assert_eq!(current(&m), Some("c"));
    }

    #[test]
    fn non_wrapping_edge_has_no_candidate() {
        let (mut m, _h) = form(&["a", "b"]);
        m.focus_field("b", TransitionReason::Programmatic).unwrap();
        assert_eq!(
            m.focus_next(NavigateOptions::wrap(false)),
            Err(FocusError::NoCandidate(ScopeId::root()))
        );
        assert_eq!(current(&m), Some("b"), "a blocked move leaves focus alone");

        m.set_config(FocusConfig::default().with_wrap(false));
        assert!(next(&mut m).is_err());
        m.focus_next(NavigateOptions::wrap(true)).unwrap();
        assert_eq!(current(&m), Some("a"), "per-call option overrides config");
    }

    #[test]
    fn next_then_previous_returns_to_origin() {
        let (mut m, _h) = form(&["a", "b", "c"]);
        m.focus_field("b", TransitionReason::Programmatic).unwrap();
        next(&mut m).unwrap();
        m.focus_previous(NavigateOptions::default()).unwrap();
        assert_eq!(current(&m), Some("b"));

        m.focus_field("c", TransitionReason::Programmatic).unwrap();
        next(&mut m).unwrap();
        assert_eq!(current(&m), Some("a"), "wrapped forward");
        m.focus_previous(NavigateOptions::default()).unwrap();
        assert_eq!(current(&m), Some("c"), "and wrapped back");
    }

    #[test]
    fn single_candidate_does_not_reselect_itself() {
        let (mut m, _h) = form(&["only"]);
        next(&mut m).unwrap();
        assert_eq!(next(&mut m), Err(FocusError::NoCandidate(ScopeId::root())));
        assert_eq!(m.history().len(), 1);
    }

    #[test]
    fn empty_scope_has_no_candidate() {
        let mut m = FocusManager::default();
        assert!(matches!(next(&mut m), Err(FocusError::NoCandidate(_))));
        assert_eq!(m.state(), EngineState::Idle);
    }

    #[test]
    fn skipped_and_hidden_elements_are_not_candidates() {
        let (mut m, _h) = form(&["a", "b", "c"]);
        m.set_flags("b", ElementFlags::default() | ElementFlags::SKIP).unwrap();
        next(&mut m).unwrap();
        next(&mut m).unwrap();
        assert_eq!(current(&m), Some("c"));
        assert_eq!(
            m.focus_field("b", TransitionReason::Programmatic),
            Err(FocusError::NotFocusable("b".into()))
        );
        m.set_flags("a", ElementFlags::ENABLED).unwrap();
        assert_eq!(
            m.focus_field("a", TransitionReason::Programmatic),
            Err(FocusError::NotFocusable("a".into()))
        );
    }

    #[test]
    fn unknown_target_is_not_found() {
        let (mut m, _h) = form(&["a"]);
        assert_eq!(
            m.focus_field("ghost", TransitionReason::Programmatic),
            Err(FocusError::NotFound("ghost".into()))
        );
        assert!(m.current().is_none());
    }

    #[test]
    fn refocusing_current_is_unchanged() {
        let (mut m, _h) = form(&["a"]);
        let outcome = m.focus_field("a", TransitionReason::Programmatic).unwrap();
        assert!(outcome.moved());
        assert_eq!(
            m.focus_field("a", TransitionReason::Pointer),
            Ok(FocusOutcome::Unchanged)
        );
        assert_eq!(m.history().len(), 1, "a no-op must not touch history");
    }

    #[test]
    fn register_into_unknown_scope_is_rejected() {
        let mut m = FocusManager::default();
        let err = m
            .register(FocusableElement::new("a", NodeKey(0)).in_scope("nowhere"))
            .unwrap_err();
        assert_eq!(err, FocusError::UnknownScope("nowhere".into()));
        assert!(m.registry().is_empty());
    }

    #[test]
    fn leave_gate_blocks_keyboard_and_notifies_host() {
        let mut m = FocusManager::default();
        let host = Recorder::default();
        m.set_host(host.clone());
        let filled = Rc::new(Cell::new(false));
        let watch = filled.clone();
        let _a = m
            .register(
                FocusableElement::new("dose", NodeKey(0))
                    .can_leave(Validator::new(move |_| watch.get())),
            )
            .unwrap();
        let _b = m.register(FocusableElement::new("route", NodeKey(1))).unwrap();
        m.focus_field("dose", TransitionReason::Programmatic).unwrap();

        let err = next(&mut m).unwrap_err();
        assert!(matches!(
            &err,
            FocusError::ValidationRejected { element, gate: Gate::Leave, cause: None } if *element == "dose"
        ));
        assert_eq!(current(&m), Some("dose"));
        assert_eq!(host.0.borrow().blocked, [err]);

        // Programmatic moves skip the leave gate.
        m.focus_field("route", TransitionReason::Programmatic).unwrap();
        m.focus_field("dose", TransitionReason::Programmatic).unwrap();

        filled.set(true);
        next(&mut m).unwrap();
        assert_eq!(current(&m), Some("route"));
        assert_eq!(host.0.borrow().changes.len(), 4);
    }

    #[test]
    fn failing_enter_gate_carries_cause() {
        let (mut m, _h) = form(&["a"]);
        let _b = m
            .register(FocusableElement::new("b", NodeKey(9)).can_receive(Validator::fallible(
                |_| Err(ValidatorError::new("lookup failed")),
            )))
            .unwrap();
        let err = m.focus_field("b", TransitionReason::Programmatic).unwrap_err();
        let FocusError::ValidationRejected { element, gate, cause } = err else {
            panic!("expected a validation rejection");
        };
        assert_eq!(element, "b");
        assert_eq!(gate, Gate::Enter);
        assert_eq!(cause, Some(ValidatorError::new("lookup failed")));
        assert!(m.current().is_none());
    }

    #[test]
    fn history_records_reasons_and_undo_redo() {
        let (mut m, _h) = form(&["a", "b", "c"]);
        m.tick(100);
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        next(&mut m).unwrap();
        m.focus_by_pointer("c", Point::new(1.0, 1.0), 250).unwrap();
        let reasons: Vec<_> = m.history().entries().map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            [
                TransitionReason::Programmatic,
                TransitionReason::Keyboard,
                TransitionReason::Pointer
            ]
        );
        let last = m.history().entries().last().unwrap();
        assert_eq!(last.previous.as_deref(), Some("b"));
        assert_eq!(last.timestamp, 250);

        assert!(m.undo());
        assert_eq!(current(&m), Some("b"));
        assert!(m.undo());
        assert_eq!(current(&m), Some("a"));
        assert!(!m.undo(), "nothing older to undo");
        assert_eq!(m.history().len(), 3, "history navigation is not recorded");
        assert!(m.redo());
        assert_eq!(current(&m), Some("b"));
        assert_eq!(m.history().cursor(), Some(1));
    }

    #[test]
    fn undo_to_missing_element_restores_cursor() {
        let (mut m, mut handles) = form(&["a", "b", "c"]);
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        next(&mut m).unwrap();
        next(&mut m).unwrap();
        drop(handles.remove(1));
        assert_eq!(m.history().cursor(), Some(2));
        assert!(!m.undo());
        assert_eq!(m.history().cursor(), Some(2), "failed undo leaves the cursor");
        assert_eq!(current(&m), Some("c"));
    }

    #[test]
    fn async_gate_applies_on_tick() {
        let (mut m, _h) = form(&["a"]);
        let open = Rc::new(Cell::new(false));
        let _b = m
            .register(FocusableElement::new("b", NodeKey(9)).can_receive(latch(&open, true)))
            .unwrap();
        m.focus_field("a", TransitionReason::Programmatic).unwrap();

        let outcome = m.focus_field("b", TransitionReason::Programmatic).unwrap();
        assert_eq!(outcome, FocusOutcome::Pending("b".into()));
        assert_eq!(m.state(), EngineState::AwaitingValidation);
        assert!(m.needs_tick());
        assert_eq!(current(&m), Some("a"), "nothing applies before the gate resolves");

        assert_eq!(m.tick(10).resolved, 0);
        open.set(true);
        let report = m.tick(20);
        assert_eq!(report.resolved, 1);
        assert_eq!(current(&m), Some("b"));
        assert_eq!(m.state(), EngineState::Idle);
        assert_eq!(m.history().entries().last().map(|e| e.timestamp), Some(20));
        assert!(!m.needs_tick());
    }

    #[test]
    fn async_rejection_reports_to_host() {
        let (mut m, _h) = form(&["a"]);
        let host = Recorder::default();
        m.set_host(host.clone());
        let open = Rc::new(Cell::new(true));
        let _b = m
            .register(FocusableElement::new("b", NodeKey(9)).can_receive(Validator::future(
                move |_| {
                    let open = open.clone();
                    let mut polled = false;
                    poll_fn(move |_| {
                        if polled && open.get() {
                            Poll::Ready(Ok(false))
                        } else {
                            polled = true;
                            Poll::Pending
                        }
                    })
                },
            )))
            .unwrap();
        assert!(matches!(
            m.focus_field("b", TransitionReason::Programmatic),
            Ok(FocusOutcome::Pending(_))
        ));
        m.tick(1);
        assert!(m.current().is_none());
        assert!(matches!(
            host.0.borrow().blocked.as_slice(),
            [FocusError::ValidationRejected { gate: Gate::Enter, .. }]
        ));
    }

    #[test]
    fn stale_pending_transition_is_superseded() {
        let (mut m, _h) = form(&["a", "c"]);
        let open = Rc::new(Cell::new(false));
        let _b = m
            .register(FocusableElement::new("b", NodeKey(9)).can_receive(latch(&open, true)))
            .unwrap();
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        m.focus_field("b", TransitionReason::Programmatic).unwrap();
        m.focus_field("c", TransitionReason::Programmatic).unwrap();
        assert!(m.snapshot().pending.is_none(), "applying c drops the request for b");
        open.set(true);
        let report = m.tick(5);
        assert_eq!(report.resolved, 0);
        assert_eq!(current(&m), Some("c"), "focus moved while b was pending");
        assert!(m.snapshot().pending.is_none());
    }

    #[test]
    fn one_pending_slot_per_target() {
        let (mut m, _h) = form(&["a"]);
        let open = Rc::new(Cell::new(false));
        let _b = m
            .register(FocusableElement::new("b", NodeKey(9)).can_receive(latch(&open, true)))
            .unwrap();
        m.focus_field("b", TransitionReason::Programmatic).unwrap();
        m.focus_field("b", TransitionReason::Keyboard).unwrap();
        assert_eq!(
            m.snapshot().pending,
            Some(PendingValidation {
                target: "b".into(),
                gate: Gate::Enter,
            })
        );
        open.set(true);
        m.tick(1);
        assert_eq!(
            m.history().entries().last().map(|e| e.reason),
            Some(TransitionReason::Keyboard),
            "the latest request wins the slot"
        );
    }

    #[test]
    fn newest_pending_request_wins() {
        let (mut m, _h) = form(&["a"]);
        let open = Rc::new(Cell::new(false));
        let _x = m
            .register(FocusableElement::new("x", NodeKey(8)).can_receive(latch(&open, true)))
            .unwrap();
        let _y = m
            .register(FocusableElement::new("y", NodeKey(9)).can_receive(latch(&open, true)))
            .unwrap();
        let host = Recorder::default();
        m.set_host(host.clone());

        assert!(matches!(
            m.focus_field("x", TransitionReason::Programmatic),
            Ok(FocusOutcome::Pending(_))
        ));
        assert!(matches!(
            m.focus_field("y", TransitionReason::Programmatic),
            Ok(FocusOutcome::Pending(_))
        ));
        assert_eq!(
            m.snapshot().pending.map(|p| p.target),
            Some(ElementId::from("y")),
            "the older request gives up the slot"
        );
        open.set(true);
        assert_eq!(m.tick(1).resolved, 1);
        assert_eq!(current(&m), Some("y"));
        assert_eq!(m.history().len(), 1, "only the newest request is applied");
        assert_eq!(host.0.borrow().changes.len(), 1);
    }

    #[test]
    fn applied_move_drops_pending_undo_without_rewinding() {
        let mut m = FocusManager::new(FocusConfig::default().with_history_capacity(3));
        let (deny, open) = (Rc::new(Cell::new(false)), Rc::new(Cell::new(false)));
        let _h = [
            m.register(FocusableElement::new("a", NodeKey(0))).unwrap(),
            m.register(FocusableElement::new("b", NodeKey(1))).unwrap(),
            m.register(FocusableElement::new("c", NodeKey(2))).unwrap(),
            m.register(FocusableElement::new("d", NodeKey(3)).can_receive(switchable(&deny, &open)))
                .unwrap(),
        ];
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        m.focus_field("d", TransitionReason::Programmatic).unwrap();
        m.focus_field("b", TransitionReason::Programmatic).unwrap();

        deny.set(true);
        assert!(m.undo(), "the undo parks on the gate");
        assert!(m.snapshot().pending.is_some());
        assert_eq!(current(&m), Some("b"));

        // Evicts `a` and takes the cursor.
        m.focus_field("c", TransitionReason::Programmatic).unwrap();
        assert!(m.snapshot().pending.is_none());
        assert_eq!(m.tick(1).resolved, 0);
        assert_eq!(m.history().cursor(), Some(2));
        assert_eq!(m.history().current().map(|e| e.element.as_str()), Some("c"));
    }

    #[test]
    fn async_redo_rejection_restores_cursor_across_eviction() {
        let mut m = FocusManager::new(FocusConfig::default().with_history_capacity(4));
        let (deny, open) = (Rc::new(Cell::new(false)), Rc::new(Cell::new(false)));
        let _h = [
            m.register(FocusableElement::new("a", NodeKey(0)).can_receive(switchable(&deny, &open)))
                .unwrap(),
            m.register(FocusableElement::new("b", NodeKey(1))).unwrap(),
            m.register(FocusableElement::new("c", NodeKey(2))).unwrap(),
        ];
        for id in ["b", "c", "a", "b"] {
            m.focus_field(id, TransitionReason::Programmatic).unwrap();
        }
        assert!(m.undo());
        assert!(m.undo());
        assert_eq!(current(&m), Some("c"));
        assert_eq!(m.history().cursor(), Some(1));

        deny.set(true);
        assert!(m.redo());
        assert!(m.snapshot().pending.is_some());

        // Shrinking evicts `b` while the gate is still out; focus is untouched.
        m.set_config(FocusConfig::default().with_history_capacity(3));
        open.set(true);
        m.tick(1);
        assert_eq!(current(&m), Some("c"));
        assert_eq!(m.history().cursor(), Some(0));
        assert_eq!(
            m.history().current().map(|e| e.element.as_str()),
            Some("c"),
            "the rejected redo returns to the entry it started from"
        );
    }

    #[test]
    fn pointer_jump_gate() {
        let (mut m, _h) = form(&["a", "b", "c", "d"]);
        let host = Recorder::default();
        m.set_host(host.clone());
        let at = Point::new(10.0, 10.0);
        assert_eq!(
            m.focus_by_pointer("b", at, 0),
            Err(FocusError::JumpBlocked("b".into())),
            "without focus only the first candidate is in sequence"
        );
        m.focus_by_pointer("a", at, 1).unwrap();
        assert_eq!(
            m.focus_by_pointer("c", at, 2),
            Err(FocusError::JumpBlocked("c".into()))
        );
        m.focus_by_pointer("b", at, 3).unwrap();
        m.focus_by_pointer("a", at, 4).unwrap();
        m.set_flags("d", ElementFlags::default() | ElementFlags::JUMP_ALLOWED)
            .unwrap();
        m.focus_by_pointer("d", at, 5).unwrap();
        assert_eq!(current(&m), Some("d"));
        assert_eq!(host.0.borrow().blocked.len(), 2);
        assert_eq!(m.snapshot().samples.len(), 6);

        m.set_config(FocusConfig::default().with_guard_jumps(false));
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        m.focus_by_pointer("c", at, 6).unwrap();
    }

    #[test]
    fn pointer_runs_leave_gate() {
        let mut m = FocusManager::default();
        let _a = m
            .register(FocusableElement::new("a", NodeKey(0)).can_leave(Validator::new(|_| false)))
            .unwrap();
        let _b = m.register(FocusableElement::new("b", NodeKey(1))).unwrap();
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        assert!(matches!(
            m.focus_by_pointer("b", Point::ZERO, 0),
            Err(FocusError::ValidationRejected { gate: Gate::Leave, .. })
        ));
    }

    #[test]
    fn mode_follows_input_and_reaches_host() {
        let (mut m, _h) = form(&["a", "b"]);
        let host = Recorder::default();
        m.set_host(host.clone());
        assert_eq!(m.mode(), NavigationMode::Auto);
        m.focus_by_pointer("a", Point::new(3.0, 4.0), 100).unwrap();
        assert_eq!(m.mode(), NavigationMode::Pointer);
        assert_eq!(m.observe_key(KeyInput::Tab, 600), NavigationMode::Hybrid);
        assert_eq!(m.observe_key(KeyInput::Tab, 5_000), NavigationMode::Keyboard);
        assert_eq!(m.observe_key(KeyInput::Enter, 5_001), NavigationMode::Keyboard);
        next(&mut m).unwrap();
        let log = host.0.borrow();
        assert!(!log.changes[0].show_focus_ring, "pointer focus hides the ring");
        assert!(log.changes[1].show_focus_ring);
        assert_eq!(
            m.observe_pointer(None, Point::ZERO, 5_500),
            NavigationMode::Hybrid
        );
    }

    #[test]
    fn focus_change_carries_node_and_behavior() {
        let mut m = FocusManager::new(FocusConfig::default().with_behavior(FocusBehavior::Smooth));
        let host = Recorder::default();
        m.set_host(host.clone());
        let _a = m.register(FocusableElement::new("a", NodeKey(42))).unwrap();
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        let change = host.0.borrow().changes[0].clone();
        assert_eq!(change.node, NodeKey(42));
        assert_eq!(change.behavior, FocusBehavior::Smooth);
        assert_eq!(change.previous, None);
    }

    #[test]
    fn dropping_focused_registration_clears_focus() {
        let (mut m, mut handles) = form(&["a", "b"]);
        let host = Recorder::default();
        m.set_host(host.clone());
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        drop(handles.remove(0));
        assert!(m.current().is_none(), "disposed elements vanish at once");
        assert_eq!(m.tick(1).pruned, 1);
        assert_eq!(host.0.borrow().cleared, [ElementId::from("a")]);
        next(&mut m).unwrap();
        assert_eq!(current(&m), Some("b"));
    }

    #[test]
    fn hiding_or_unregistering_focus_clears_it() {
        let (mut m, _h) = form(&["a", "b"]);
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        m.set_flags("a", ElementFlags::ENABLED).unwrap();
        assert!(m.current().is_none());
        m.focus_field("b", TransitionReason::Programmatic).unwrap();
        assert!(m.unregister("b").is_some());
        assert!(m.current().is_none());
        assert!(m.unregister("b").is_none());
        assert_eq!(m.set_flags("b", ElementFlags::default()), Err(FocusError::NotFound("b".into())));
    }

    #[test]
    fn request_next_coalesces_until_tick() {
        let (mut m, _h) = form(&["a", "b", "c"]);
        assert!(m.request_next(NavigateOptions::default()));
        assert!(!m.request_next(NavigateOptions::default()));
        assert!(!m.request_next(NavigateOptions::default()));
        assert_eq!(m.snapshot().queued_operations, 1);
        assert!(m.current().is_none(), "debounced requests wait for the tick");
        m.tick(16);
        assert_eq!(current(&m), Some("a"), "three requests collapse into one step");

        m.request_next(NavigateOptions::default());
        m.request_previous(NavigateOptions::default());
        m.tick(32);
        assert_eq!(current(&m), Some("c"), "the most recent request wins");
    }

    #[test]
    fn burst_of_requests_records_one_transition() {
        let (mut m, _h) = form(&["a", "b", "c"]);
        let host = Recorder::default();
        m.set_host(host.clone());
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        let before = m.history().len();
        for _ in 0..5 {
            m.request_next(NavigateOptions::default());
        }
        m.tick(16);
        assert_eq!(current(&m), Some("b"));
        assert_eq!(m.history().len(), before + 1, "five requests, one entry");
        assert_eq!(host.0.borrow().changes.len(), 2);
        assert!(!m.needs_tick());
    }

    #[test]
    fn request_focus_applies_on_tick() {
        let (mut m, _h) = form(&["a", "b"]);
        assert!(m.request_focus("b", TransitionReason::Programmatic));
        assert!(m.current().is_none());
        let report = m.tick(1);
        assert_eq!(report.flush.ran, 1);
        assert_eq!(current(&m), Some("b"));

        m.request_focus("ghost", TransitionReason::Programmatic);
        assert_eq!(m.tick(2).flush.failed, 1, "failures are counted, not raised");
    }

    #[test]
    fn batch_flushes_ten_per_tick() {
        let mut m = FocusManager::default();
        let ran = Rc::new(Cell::new(0));
        for _ in 0..15 {
            let ran = ran.clone();
            m.batch(move |_| {
                ran.set(ran.get() + 1);
                Ok(())
            });
        }
        assert_eq!(m.tick(1).flush.remaining, 5);
        assert_eq!(ran.get(), 10);
        m.tick(2);
        assert_eq!(ran.get(), 15);
        assert!(!m.needs_tick());
    }

    #[test]
    fn teardown_resets_everything() {
        let (mut m, handles) = form(&["a", "b"]);
        m.focus_field("a", TransitionReason::Programmatic).unwrap();
        m.push_scope(crate::scope::Scope::new("side")).unwrap();
        m.request_next(NavigateOptions::default());
        m.teardown();
        let snap = m.snapshot();
        assert!(snap.current.is_none());
        assert_eq!(snap.depth, 0);
        assert!(snap.history.is_empty());
        assert_eq!(snap.queued_operations, 0);
        assert_eq!(snap.registered, 0);
        assert_eq!(snap.state, EngineState::Idle);
        assert!(handles.iter().all(|h| !h.is_live()));
    }

    #[test]
    fn set_config_shrinks_history() {
        let (mut m, _h) = form(&["a", "b"]);
        for _ in 0..6 {
            next(&mut m).unwrap();
        }
        m.set_config(FocusConfig::default().with_history_capacity(3));
        assert_eq!(m.history().len(), 3);
        assert_eq!(m.history().cursor(), Some(2));
        m.clear_history();
        assert!(!m.undo(), "cleared history has nothing to undo");
        assert!(m.history().cursor().is_none());
    }
}
