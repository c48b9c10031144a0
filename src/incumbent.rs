//! Shared best-clique state read by every worker.
//!
//! - The best size is an atomic claimed by compare-and-set, so it never regresses.
//! - The vertex list sits behind a `RwLock<Arc<[usize]>>`; readers clone the `Arc`
//!   and get a consistent list without holding the lock.
//! - The stop flag is raised once the best size reaches the target bound or the
//!   deadline passes; workers poll it between nodes.

use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

// ============================================================================
// StopSignal
// ============================================================================

/// Cooperative early-termination flag with an optional wall-clock deadline.
#[derive(Debug)]
pub struct StopSignal {
    flag: CachePadded<AtomicBool>,
    deadline: Option<Instant>,
}

impl StopSignal {
    /// Creates a lowered flag.
    pub fn new(deadline: Option<Instant>) -> Self {
        Self {
            flag: CachePadded::new(AtomicBool::new(false)),
            deadline,
        }
    }

    /// Raises the flag.
    #[inline]
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns whether the flag is raised. Does not look at the clock.
    #[inline(always)]
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Raises the flag if the deadline has passed; returns whether it is raised.
    #[inline]
    pub fn poll(&self) -> bool {
        if self.is_raised() {
            return true;
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.raise();
                true
            }
            _ => false,
        }
    }
}

// ============================================================================
// Incumbent
// ============================================================================

/// The best clique found so far, shared across workers.
///
/// In enumeration mode the incumbent also collects every clique of the best
/// size; equal-size offers are accepted instead of rejected.
#[derive(Debug)]
pub struct Incumbent {
    size: CachePadded<AtomicUsize>,
    best: RwLock<Arc<[usize]>>,
    enumerate: bool,
    all: Mutex<Vec<Vec<usize>>>,
    target: Option<usize>,
    stop: StopSignal,
}

impl Incumbent {
    /// Creates an incumbent that only accepts cliques larger than `floor`
    /// (or at least `floor` when `enumerate` is set).
    pub fn new(floor: usize, enumerate: bool) -> Self {
        Self {
            size: CachePadded::new(AtomicUsize::new(floor)),
            best: RwLock::new(Arc::from(Vec::new())),
            enumerate,
            all: Mutex::new(Vec::new()),
            target: None,
            stop: StopSignal::new(None),
        }
    }

    /// Raises the stop flag as soon as a clique of `target` vertices is accepted.
    ///
    /// Ignored in enumeration mode, which must see every maximum clique.
    #[must_use]
    pub fn with_target(mut self, target: usize) -> Self {
        if !self.enumerate {
            self.target = Some(target);
        }
        self
    }

    /// Raises the stop flag once `deadline` passes (checked by [`StopSignal::poll`]).
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.stop = StopSignal::new(deadline);
        self
    }

    /// The stop signal shared with the workers.
    #[inline(always)]
    pub fn stop(&self) -> &StopSignal {
        &self.stop
    }

    /// Whether equal-size cliques are being collected.
    #[inline(always)]
    pub fn enumerating(&self) -> bool {
        self.enumerate
    }

    /// Current best size.
    #[inline(always)]
    pub fn best_size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    /// Smallest clique size still worth finding.
    #[inline(always)]
    pub fn need(&self) -> usize {
        let best = self.best_size();
        if self.enumerate {
            best.max(1)
        } else {
            best + 1
        }
    }

    /// Returns whether a clique of `size` vertices would be accepted.
    #[inline(always)]
    pub fn improves(&self, size: usize) -> bool {
        size >= self.need()
    }

    /// Installs a known clique (the heuristic result) without adding it to the
    /// enumeration pool. Returns whether it was larger than the current best.
    pub fn seed(&self, clique: &[usize]) -> bool {
        let len = clique.len();
        if !self.claim(len) {
            return false;
        }
        self.store(clique);
        self.check_target(len);
        true
    }

    /// Offers a clique found by the search. Returns whether it was accepted.
    pub fn offer(&self, clique: &[usize]) -> bool {
        if self.enumerate {
            return self.offer_enumerated(clique);
        }
        let len = clique.len();
        if !self.claim(len) {
            return false;
        }
        self.store(clique);
        self.check_target(len);
        true
    }

    /// Snapshot of the best clique.
    pub fn snapshot(&self) -> Arc<[usize]> {
        Arc::clone(&self.best.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Every clique of the best size collected in enumeration mode.
    pub fn maximum_cliques(&self) -> Vec<Vec<usize>> {
        self.all.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Compare-and-set on size: succeeds only if `len` beats the latest size.
    fn claim(&self, len: usize) -> bool {
        let mut current = self.size.load(Ordering::Acquire);
        loop {
            if len <= current {
                return false;
            }
            match self.size.compare_exchange_weak(
                current,
                len,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Writes the vertex list unless a larger one landed first.
    fn store(&self, clique: &[usize]) {
        let mut best = self.best.write().unwrap_or_else(PoisonError::into_inner);
        if best.len() < clique.len() {
            *best = Arc::from(clique);
        }
    }

    fn check_target(&self, len: usize) {
        if self.target.is_some_and(|t| len >= t) {
            self.stop.raise();
        }
    }

    fn offer_enumerated(&self, clique: &[usize]) -> bool {
        let len = clique.len();
        if len < self.need() {
            return false;
        }
        let mut all = self.all.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.size.load(Ordering::Acquire);
        if len < current {
            return false;
        }
        if len > current {
            all.clear();
            self.size.store(len, Ordering::Release);
        }
        all.push(clique.to_vec());
        self.store(clique);
        true
    }
}

// ============================================================================
// Tests
// ============================================================================
