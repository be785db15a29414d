// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation mode detection.
//!
//! [`ModeDetector`] watches the interaction stream a host forwards to it and
//! classifies it as one of the [`NavigationMode`] values:
//!
//! - Pointer movement or clicks flip the mode to [`NavigationMode::Pointer`].
//! - Keyboard traversal ([`KeyInput::Tab`], [`KeyInput::Arrow`]) flips it to
//!   [`NavigationMode::Keyboard`].
//! - If the other style was seen within the trailing window, the mode is
//!   [`NavigationMode::Hybrid`] instead.
//! - Until anything is observed, the mode is [`NavigationMode::Auto`].
//!
//! Keys that do not traverse (Enter, Escape, text input) never change the mode.
//! Pointer events are also recorded as [`InteractionSample`]s in a bounded log
//! for diagnostics.

use kurbo::Point;

use crate::ring::BoundedLog;

/// Default trailing window, in milliseconds, for hybrid detection.
pub const DEFAULT_WINDOW_MS: u64 = 1_000;

/// Default number of retained [`InteractionSample`]s.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 50;

/// Classification of the current interaction style.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NavigationMode {
    /// Keyboard traversal dominates.
    Keyboard,
    /// Pointer interaction dominates.
    Pointer,
    /// Both styles were used within the trailing window.
    Hybrid,
    /// Nothing observed yet.
    #[default]
    Auto,
}

/// Keyboard input as far as mode detection cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyInput {
    /// Tab or Shift+Tab.
    Tab,
    /// Any arrow key.
    Arrow,
    /// Escape.
    Escape,
    /// Enter or Return.
    Enter,
    /// Anything else, such as text entry.
    Other,
}

impl KeyInput {
    /// Whether this key moves focus sequentially.
    pub const fn is_traversal(self) -> bool {
        matches!(self, Self::Tab | Self::Arrow)
    }
}

/// A recorded pointer interaction.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionSample<K> {
    /// Pointer position in the host's coordinate space.
    pub position: Point,
    /// Element under the pointer, if the host resolved one.
    pub target: Option<K>,
    /// Timestamp in milliseconds.
    pub time: u64,
}

/// Interaction-stream classifier.
#[derive(Clone, Debug)]
pub struct ModeDetector<K> {
    mode: NavigationMode,
    /// Trailing window for hybrid detection, in milliseconds.
    pub window_ms: u64,
    last_keyboard: Option<u64>,
    last_pointer: Option<u64>,
    samples: BoundedLog<InteractionSample<K>>,
}

impl<K> Default for ModeDetector<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> ModeDetector<K> {
    /// Create a detector with the default window and sample capacity.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_WINDOW_MS, DEFAULT_SAMPLE_CAPACITY)
    }

    /// Create a detector with an explicit window and sample capacity.
    pub fn with_config(window_ms: u64, sample_capacity: usize) -> Self {
        Self {
            mode: NavigationMode::Auto,
            window_ms,
            last_keyboard: None,
            last_pointer: None,
            samples: BoundedLog::new(sample_capacity),
        }
    }

    /// The current classification.
    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// Whether keyboard-only affordances (for example a focus ring) should be shown.
    pub fn shows_focus_ring(&self) -> bool {
        matches!(self.mode, NavigationMode::Keyboard | NavigationMode::Hybrid)
    }

    /// Record a pointer move or click and return the updated mode.
    pub fn on_pointer(&mut self, target: Option<K>, position: Point, time: u64) -> NavigationMode {
        self.samples.push(InteractionSample {
            position,
            target,
            time,
        });
        self.last_pointer = Some(time);
        self.mode = if self.within_window(self.last_keyboard, time) {
            NavigationMode::Hybrid
        } else {
            NavigationMode::Pointer
        };
        self.mode
    }

    /// Record a key press and return the updated mode.
    ///
    /// Only traversal keys affect the classification.
    pub fn on_key(&mut self, key: KeyInput, time: u64) -> NavigationMode {
        if !key.is_traversal() {
            return self.mode;
        }
        self.last_keyboard = Some(time);
        self.mode = if self.within_window(self.last_pointer, time) {
            NavigationMode::Hybrid
        } else {
            NavigationMode::Keyboard
        };
        self.mode
    }

    /// Recorded pointer samples, oldest first.
    pub fn samples(&self) -> &BoundedLog<InteractionSample<K>> {
        &self.samples
    }

    /// Change how many samples are retained.
    pub fn set_sample_capacity(&mut self, capacity: usize) {
        self.samples.set_capacity(capacity);
    }

    /// Drop recorded samples but keep the classification.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Forget everything and return to [`NavigationMode::Auto`].
    pub fn reset(&mut self) {
        self.samples.clear();
        self.last_keyboard = None;
        self.last_pointer = None;
        self.mode = NavigationMode::Auto;
    }

    fn within_window(&self, other: Option<u64>, now: u64) -> bool {
        other.is_some_and(|t| now.saturating_sub(t) <= self.window_ms)
    }
}
