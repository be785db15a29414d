// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element registry.
//!
//! Entries are keyed by [`ElementId`] with a secondary index by [`NodeKey`].
//! Each registration hands back a [`Registration`]; once the owner drops it,
//! the entry disappears from every lookup and is physically removed by the
//! next [`Registry::prune`].

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use hashbrown::HashMap;

use crate::element::{ElementFlags, FocusableElement};
use crate::error::FocusError;
use crate::id::{ElementId, NodeKey};

/// Ownership handle for a registered element.
///
/// Dropping the handle (or calling [`Registration::release`]) disposes the
/// entry. Re-registering the same id issues a fresh handle; dropping the stale
/// one then has no effect.
#[derive(Debug)]
#[must_use = "dropping a Registration unregisters the element"]
pub struct Registration {
    id: ElementId,
    alive: Rc<Cell<bool>>,
}

impl Registration {
    /// Id of the registered element.
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Whether the entry is still registered under this handle.
    pub fn is_live(&self) -> bool {
        self.alive.get()
    }

    /// Dispose the entry now.
    pub fn release(self) {}

    /// Keep the element registered until it is explicitly unregistered.
    pub fn forget(self) {
        core::mem::forget(self);
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

#[derive(Debug)]
struct Slot {
    element: FocusableElement,
    sequence: u64,
    alive: Rc<Cell<bool>>,
}

impl Slot {
    fn is_live(&self) -> bool {
        self.alive.get()
    }
}

/// Live focusable elements.
#[derive(Debug, Default)]
pub struct Registry {
    slots: HashMap<ElementId, Slot>,
    by_node: HashMap<NodeKey, ElementId>,
    next_sequence: u64,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `element.id`.
    ///
    /// An overwrite keeps the original registration sequence, so traversal
    /// order is stable across re-registration. Elements without a backing
    /// node are rejected and nothing is inserted.
    pub fn register(&mut self, element: FocusableElement) -> Result<Registration, FocusError> {
        let Some(node) = element.node else {
            log::warn!("rejected registration of `{}`: no backing node", element.id);
            return Err(FocusError::MalformedElement {
                element: element.id,
                reason: "no backing node",
            });
        };
        let id = element.id.clone();
        let alive = Rc::new(Cell::new(true));

        let sequence = match self.slots.remove(&id) {
            Some(old) => {
                old.alive.set(false);
                if let Some(old_node) = old.element.node {
                    self.by_node.remove(&old_node);
                }
                old.sequence
            }
            None => {
                let s = self.next_sequence;
                self.next_sequence += 1;
                s
            }
        };
        if let Some(displaced) = self.by_node.insert(node, id.clone()) {
            if displaced != id {
                log::warn!("node {node:?} moved from `{displaced}` to `{id}`");
            }
        }
        self.slots.insert(
            id.clone(),
            Slot {
                element,
                sequence,
                alive: alive.clone(),
            },
        );
        Ok(Registration { id, alive })
    }

    /// Remove the entry for `id`. Returns the removed element, if any.
    pub fn unregister(&mut self, id: &str) -> Option<FocusableElement> {
        let slot = self.slots.remove(id)?;
        slot.alive.set(false);
        self.unlink_node(&slot);
        Some(slot.element)
    }

    /// Live entry for `id`.
    pub fn get(&self, id: &str) -> Option<&FocusableElement> {
        self.slots
            .get(id)
            .filter(|s| s.is_live())
            .map(|s| &s.element)
    }

    /// Live entry backed by `node`.
    pub fn get_by_node(&self, node: NodeKey) -> Option<&FocusableElement> {
        let id = self.by_node.get(&node)?;
        self.get(id)
    }

    /// Registration sequence of a live entry.
    pub fn sequence(&self, id: &str) -> Option<u64> {
        self.slots
            .get(id)
            .filter(|s| s.is_live())
            .map(|s| s.sequence)
    }

    /// Whether `id` is registered and live.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Prune disposed entries, then iterate the live ones.
    pub fn get_all(&mut self) -> impl Iterator<Item = &FocusableElement> {
        self.prune();
        self.slots.values().map(|s| &s.element)
    }

    /// Live entries with their registration sequence, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&FocusableElement, u64)> {
        self.slots
            .values()
            .filter(|s| s.is_live())
            .map(|s| (&s.element, s.sequence))
    }

    /// Physically remove disposed entries and return their ids.
    pub fn prune(&mut self) -> Vec<ElementId> {
        let dead: Vec<ElementId> = self
            .slots
            .iter()
            .filter(|(_, s)| !s.is_live())
            .map(|(id, _)| id.clone())
            .collect();
        for id in &dead {
            if let Some(slot) = self.slots.remove(id) {
                self.unlink_node(&slot);
            }
        }
        dead
    }

    /// Replace the capability flags of a live entry.
    pub fn set_flags(&mut self, id: &str, flags: ElementFlags) -> Result<(), FocusError> {
        match self.slots.get_mut(id).filter(|s| s.is_live()) {
            Some(slot) => {
                slot.element.flags = flags;
                Ok(())
            }
            None => Err(FocusError::NotFound(id.into())),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.slots.values().filter(|s| s.is_live()).count()
    }

    /// Returns `true` if no live entry exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Outstanding handles become inert.
    pub fn clear(&mut self) {
        for slot in self.slots.values() {
            slot.alive.set(false);
        }
        self.slots.clear();
        self.by_node.clear();
    }

    fn unlink_node(&mut self, slot: &Slot) {
        if let Some(node) = slot.element.node {
            if self.by_node.get(&node) == Some(&slot.element.id) {
                self.by_node.remove(&node);
            }
        }
    }
}
