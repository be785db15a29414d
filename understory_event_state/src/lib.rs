// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: small state machines over the raw interaction stream.
//!
//! Hosts translate platform input into a handful of calls and get back a stable
//! classification of how the user is currently interacting:
//!
//! - [`mode::ModeDetector`] classifies the stream as keyboard-, pointer-, or
//!   hybrid-driven. Consumers use it to decide whether to paint keyboard-only
//!   affordances such as a focus ring.
//! - [`ring::BoundedLog`] is the fixed-capacity, FIFO-evicting buffer the detector
//!   uses for its [`mode::InteractionSample`] diagnostics. It is public so that
//!   other crates can keep append-and-trim logs with the same semantics.
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::mode::{KeyInput, ModeDetector, NavigationMode};
//!
//! let mut detector: ModeDetector<u32> = ModeDetector::new();
//! assert_eq!(detector.mode(), NavigationMode::Auto);
//!
//! detector.on_key(KeyInput::Tab, 1_000);
//! assert_eq!(detector.mode(), NavigationMode::Keyboard);
//! assert!(detector.shows_focus_ring());
//!
//! // A click shortly after Tab means both styles are in play.
//! detector.on_pointer(Some(7), Point::new(4.0, 2.0), 1_200);
//! assert_eq!(detector.mode(), NavigationMode::Hybrid);
//!
//! // Once the keyboard has been idle for a full window, pointer wins.
//! detector.on_pointer(Some(7), Point::new(5.0, 2.0), 5_000);
//! assert_eq!(detector.mode(), NavigationMode::Pointer);
//! ```
//!
//! All timestamps are host-provided milliseconds; nothing here reads a clock.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod mode;
pub mod ring;
