// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Focus: focus ordering primitives.
//!
//! This crate models sequential focus traversal as a combination of:
//! - **Navigation intents** ([`Navigation`]) such as [`Navigation::Next`] (Tab) and
//!   [`Navigation::Prev`] (Shift+Tab).
//! - A **view of candidates** ([`FocusEntry`] / [`FocusSpace`]) that describes the
//!   focusable nodes of one scope together with their explicit order and the order
//!   in which they were registered.
//! - Pluggable **policies** ([`FocusPolicy`]) that select the next focused node given an
//!   optional origin, an intent, and a read-only view of the candidates.
//!
//! It does not own focus state, run validators, or know about scopes beyond the
//! candidates it is handed; `understory_focus_manager` layers those on top.
//!
//! ## Minimal example
//!
//! Three fields, the last one registered first but ordered explicitly:
//!
//! ```rust
//! use understory_focus::{
//!     DefaultPolicy, FocusEntry, FocusPolicy, FocusSpace, Navigation, WrapMode,
//! };
//!
//! let entries = [
//!     FocusEntry { id: 'c', order: Some(3), sequence: 0, enabled: true },
//!     FocusEntry { id: 'a', order: Some(1), sequence: 1, enabled: true },
//!     FocusEntry { id: 'b', order: Some(2), sequence: 2, enabled: true },
//! ];
//!
//! let space = FocusSpace { nodes: &entries };
//! let policy = DefaultPolicy { wrap: WrapMode::Never };
//!
//! assert_eq!(policy.next(Some('a'), Navigation::Next, &space), Some('b'));
//! assert_eq!(policy.next(Some('b'), Navigation::Next, &space), Some('c'));
//! // No wrap: the end of the sequence yields nothing.
//! assert_eq!(policy.next(Some('c'), Navigation::Next, &space), None);
//! // Without an origin, traversal starts at the edges.
//! assert_eq!(policy.next(None, Navigation::Prev, &space), Some('c'));
//! ```
//!
//! ## Ordering
//!
//! Candidates are ordered by [`FocusEntry::order`] first (entries with an explicit
//! order come before entries without one) and by [`FocusEntry::sequence`] second.
//! The sequence is a registration counter maintained by the host, so entries
//! without an explicit order keep the order in which they appeared.
//!
//! The core types are generic over the node identifier `K`, so callers can use any
//! cheap-to-clone handle.
//!
//! This crate is `no_std`.

#![no_std]

use core::cmp::Ordering;

use smallvec::SmallVec;

/// Inline capacity for the ordered candidate buffer; larger scopes spill to the heap.
const INLINE_CANDIDATES: usize = 16;

/// Ordered candidate positions within a [`FocusSpace`].
pub type OrderedIndices = SmallVec<[usize; INLINE_CANDIDATES]>;

/// Direction of sequential focus navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the next candidate in forward order (for example, Tab).
    Next,
    /// Move to the previous candidate in backward order (for example, Shift+Tab).
    Prev,
    /// Move to the first candidate regardless of the origin.
    First,
    /// Move to the last candidate regardless of the origin.
    Last,
}

/// A single focusable candidate within a [`FocusSpace`].
#[derive(Clone, Debug)]
pub struct FocusEntry<K> {
    /// Identifier for this focusable node.
    pub id: K,
    /// Optional explicit ordering key. Lower values come first.
    pub order: Option<i32>,
    /// Registration sequence number, used to break ties.
    pub sequence: u64,
    /// Whether this node is currently eligible for focus.
    ///
    /// Disabled entries are skipped by traversal but may still be present so
    /// that the host can build the space once per scope.
    pub enabled: bool,
}

/// A read-only view of focusable candidates for one scope.
///
/// Policies should treat it as an immutable snapshot.
#[derive(Clone, Debug)]
pub struct FocusSpace<'a, K> {
    /// Candidates in arbitrary order.
    pub nodes: &'a [FocusEntry<K>],
}

impl<K: PartialEq> FocusSpace<'_, K> {
    /// Indices of enabled candidates, sorted by explicit order then sequence.
    pub fn ordered(&self) -> OrderedIndices {
        let mut indices: OrderedIndices = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.enabled.then_some(i))
            .collect();
        indices.sort_by(|&a, &b| compare_entries(&self.nodes[a], &self.nodes[b]));
        indices
    }

    /// Position of `id` within [`FocusSpace::ordered`], if it is an enabled candidate.
    pub fn rank(&self, id: &K) -> Option<usize> {
        self.ordered()
            .iter()
            .position(|&i| self.nodes[i].id == *id)
    }

    /// Number of enabled candidates.
    pub fn enabled_len(&self) -> usize {
        self.nodes.iter().filter(|e| e.enabled).count()
    }
}

/// Wrap mode configuration for focus traversal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; reaching the end of the sequence yields no next candidate.
    Never,
    /// Wrap around within the candidates of the current scope.
    Scope,
}

impl From<bool> for WrapMode {
    fn from(wrap: bool) -> Self {
        if wrap { Self::Scope } else { Self::Never }
    }
}

/// Trait for focus traversal policies.
///
/// A policy receives a navigation intent, the current origin (if any), and a
/// read-only view of focusable candidates, and returns the next focused node if
/// any. An origin that is not among the enabled candidates (for example, focus
/// sitting in a parent scope) is treated like no origin at all.
pub trait FocusPolicy<K>
where
    K: Clone + PartialEq,
{
    /// Compute the next focus target.
    fn next(&self, origin: Option<K>, direction: Navigation, space: &FocusSpace<'_, K>)
    -> Option<K>;
}

/// Linear traversal by explicit order, then registration order.
#[derive(Copy, Clone, Debug)]
pub struct DefaultPolicy {
    /// Wrap behavior at the ends of the sequence.
    pub wrap: WrapMode,
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self {
            wrap: WrapMode::Scope,
        }
    }
}

impl<K> FocusPolicy<K> for DefaultPolicy
where
    K: Clone + PartialEq,
{
    fn next(
        &self,
        origin: Option<K>,
        direction: Navigation,
        space: &FocusSpace<'_, K>,
    ) -> Option<K> {
        let indices = space.ordered();
        let first = *indices.first()?;
        let last = *indices.last()?;
        let nodes = space.nodes;

        let origin_pos = origin
            .as_ref()
            .and_then(|o| indices.iter().position(|&i| nodes[i].id == *o));
        let wraps = matches!(self.wrap, WrapMode::Scope);

        let picked = match (direction, origin_pos) {
            (Navigation::First, _) | (Navigation::Next, None) => first,
            (Navigation::Last, _) | (Navigation::Prev, None) => last,
            (Navigation::Next, Some(pos)) => match indices.get(pos + 1) {
                Some(&i) => i,
                None if wraps => first,
                None => return None,
            },
            (Navigation::Prev, Some(pos)) => match pos.checked_sub(1) {
                Some(p) => indices[p],
                None if wraps => last,
                None => return None,
            },
        };
        Some(nodes[picked].id.clone())
    }
}

/// Compare two entries by explicit order, then by registration sequence.
pub fn compare_entries<K>(a: &FocusEntry<K>, b: &FocusEntry<K>) -> Ordering {
    match (a.order, b.order) {
        (Some(ao), Some(bo)) => ao.cmp(&bo).then_with(|| a.sequence.cmp(&b.sequence)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.sequence.cmp(&b.sequence),
    }
}
