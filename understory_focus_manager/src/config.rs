// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static engine configuration.

use understory_event_state::mode::{DEFAULT_SAMPLE_CAPACITY, DEFAULT_WINDOW_MS};

/// Default number of retained history entries.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Default number of scheduled operations applied per tick.
pub const DEFAULT_FLUSH_CHUNK: usize = 10;

/// How the host should bring a newly focused element into view.
///
/// The engine only forwards this in [`FocusChange`](crate::host::FocusChange).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FocusBehavior {
    /// Jump straight to the element.
    #[default]
    Instant,
    /// Animate the scroll.
    Smooth,
}

/// Engine configuration, supplied once at construction.
///
/// There is no partial reconfiguration; [`FocusManager::set_config`] replaces the
/// whole value.
///
/// [`FocusManager::set_config`]: crate::FocusManager::set_config
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusConfig {
    /// Whether sequential navigation wraps at the ends of a scope.
    pub wrap: bool,
    /// Scroll behavior forwarded to the host.
    pub behavior: FocusBehavior,
    /// Log every transition decision at `debug` level.
    pub debug: bool,
    /// Reject pointer focus on elements more than one step ahead of the
    /// current focus unless they are marked
    /// [`JUMP_ALLOWED`](crate::ElementFlags::JUMP_ALLOWED).
    pub guard_jumps: bool,
    /// Maximum retained history entries.
    pub history_capacity: usize,
    /// Maximum retained interaction samples.
    pub sample_capacity: usize,
    /// Scheduled operations applied per tick.
    pub flush_chunk: usize,
    /// Trailing window for hybrid mode detection, in milliseconds.
    pub mode_window_ms: u64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            wrap: true,
            behavior: FocusBehavior::Instant,
            debug: false,
            guard_jumps: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            sample_capacity: DEFAULT_SAMPLE_CAPACITY,
            flush_chunk: DEFAULT_FLUSH_CHUNK,
            mode_window_ms: DEFAULT_WINDOW_MS,
        }
    }
}

impl FocusConfig {
    /// Set [`FocusConfig::wrap`].
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Set [`FocusConfig::behavior`].
    pub fn with_behavior(mut self, behavior: FocusBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set [`FocusConfig::debug`].
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set [`FocusConfig::guard_jumps`].
    pub fn with_guard_jumps(mut self, guard_jumps: bool) -> Self {
        self.guard_jumps = guard_jumps;
        self
    }

    /// Set [`FocusConfig::history_capacity`].
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

/// Per-call options for sequential navigation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigateOptions {
    /// Override [`FocusConfig::wrap`] for this call.
    pub wrap: Option<bool>,
}

impl NavigateOptions {
    /// Options that force wrapping on or off.
    pub fn wrap(wrap: bool) -> Self {
        Self { wrap: Some(wrap) }
    }
}
