//! Worker scratch recycled across epochs.
//!
//! `for_each_init` builds its state once per rayon split job, which is far more
//! often than once per thread. Workers instead check a workspace out of a
//! bounded lock-free queue and return it when their job ends, so a working
//! graph only ever allocates about one workspace per thread.

use crossbeam::queue::ArrayQueue;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bounded pool of per-worker scratch for one working graph.
#[derive(Debug)]
pub(super) struct WorkspacePool<W> {
    queue: ArrayQueue<W>,
    created: AtomicU64,
}

impl<W> WorkspacePool<W> {
    /// Pool sized for the current rayon thread count.
    pub(super) fn new() -> Self {
        Self {
            queue: ArrayQueue::new(rayon::current_num_threads().max(1)),
            created: AtomicU64::new(0),
        }
    }

    /// Takes an idle workspace, building one with `make` when none is left.
    pub(super) fn checkout(&self, make: impl FnOnce() -> W) -> Pooled<'_, W> {
        let ws = self.queue.pop().unwrap_or_else(|| {
            self.created.fetch_add(1, Ordering::Relaxed);
            make()
        });
        Pooled {
            ws: Some(ws),
            pool: self,
        }
    }

    /// Workspaces built so far.
    pub(super) fn created(&self) -> u64 {
        self.created.load(Ordering::Relaxed)
    }
}

/// A checked-out workspace; goes back to its pool on drop.
pub(super) struct Pooled<'a, W> {
    ws: Option<W>,
    pool: &'a WorkspacePool<W>,
}

impl<W> Deref for Pooled<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        match &self.ws {
            Some(ws) => ws,
            None => unreachable!("workspace is only taken on drop"),
        }
    }
}

impl<W> DerefMut for Pooled<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        match &mut self.ws {
            Some(ws) => ws,
            None => unreachable!("workspace is only taken on drop"),
        }
    }
}

impl<W> Drop for Pooled<'_, W> {
    fn drop(&mut self) {
        if let Some(ws) = self.ws.take() {
            // A full queue means more jobs overlapped than threads; drop the spare.
            let _ = self.pool.queue.push(ws);
        }
    }
}
