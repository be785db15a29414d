// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative, tick-driven operation queue.
//!
//! Work is enqueued with [`Scheduler::batch`] and applied in bounded chunks by
//! [`Scheduler::flush`], which the owner calls once per tick. A failing
//! operation is logged and counted; the rest of the chunk still runs.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::fmt;

use crate::config::DEFAULT_FLUSH_CHUNK;
use crate::error::FocusError;

/// A deferred unit of work against the context `C`.
pub type Operation<C> = Box<dyn FnOnce(&mut C) -> Result<(), FocusError>>;

/// Contexts that own a [`Scheduler`] over themselves.
pub trait Scheduled: Sized {
    /// The owned scheduler.
    fn scheduler(&mut self) -> &mut Scheduler<Self>;
}

/// Outcome of one [`Scheduler::flush`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Operations applied this flush.
    pub ran: usize,
    /// Operations among them that returned `Err`.
    pub failed: usize,
    /// Operations left for later ticks.
    pub remaining: usize,
}

/// FIFO queue of operations, drained a chunk per tick.
pub struct Scheduler<C> {
    queue: VecDeque<Operation<C>>,
    chunk: usize,
    scheduled: bool,
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("queued", &self.queue.len())
            .field("chunk", &self.chunk)
            .field("scheduled", &self.scheduled)
            .finish()
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new(DEFAULT_FLUSH_CHUNK)
    }
}

impl<C> Scheduler<C> {
    /// An empty scheduler applying at most `chunk` operations per flush.
    pub fn new(chunk: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            chunk: chunk.max(1),
            scheduled: false,
        }
    }

    /// Enqueue an operation.
    ///
    /// Returns `true` when this call scheduled a flush that was not already pending.
    pub fn batch(&mut self, op: impl FnOnce(&mut C) -> Result<(), FocusError> + 'static) -> bool {
        self.queue.push_back(Box::new(op));
        !core::mem::replace(&mut self.scheduled, true)
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Whether a flush is pending.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Operations applied per flush.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Change how many operations are applied per flush.
    pub fn set_chunk(&mut self, chunk: usize) {
        self.chunk = chunk.max(1);
    }

    /// Cancel the pending flush and drop all queued work.
    pub fn destroy(&mut self) {
        self.queue.clear();
        self.scheduled = false;
    }

    fn take_chunk(&mut self) -> VecDeque<Operation<C>> {
        let n = self.chunk.min(self.queue.len());
        let rest = self.queue.split_off(n);
        core::mem::replace(&mut self.queue, rest)
    }
}

impl<C: Scheduled> Scheduler<C> {
    /// Apply up to one chunk of queued operations to `ctx`.
    ///
    /// Operations enqueued while flushing run on a later flush. The scheduler
    /// stays scheduled while work remains.
    pub fn flush(ctx: &mut C) -> FlushReport {
        let batch = ctx.scheduler().take_chunk();
        let mut report = FlushReport::default();
        for op in batch {
            report.ran += 1;
            if let Err(err) = op(ctx) {
                report.failed += 1;
                log::warn!("scheduled focus operation failed: {err}");
            }
        }
        let sched = ctx.scheduler();
        report.remaining = sched.queue.len();
        sched.scheduled = report.remaining > 0;
        report
    }
}
