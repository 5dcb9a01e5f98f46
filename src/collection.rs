//! Display-bound collection with versioned incremental updates.
//!
//! [`BoundCollection`] owns the currently-displayed snapshot and decides,
//! per update, whether to diff synchronously on the calling thread or on
//! a background worker. A monotonic version counter invalidates stale
//! in-flight results: only the result matching the latest update may
//! commit.
//!
//! # Threading
//!
//! The collection lives on one owner thread, which calls
//! [`update`](BoundCollection::update), [`poll`](BoundCollection::poll)
//! or [`flush`](BoundCollection::flush), and reads the snapshot. A worker
//! only reads the two input snapshots and the comparator, and delivers
//! its result through a [`Weak`] mailbox handle; the commit (snapshot
//! swap plus notifications) always runs on the owner thread.
//! Cancellation is cooperative: superseding an update flips an advisory
//! flag, and the version check at commit time is what actually rejects a
//! stale result. Snapshots are never mutated, only replaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::compare::Comparator;
use crate::diff::diff;
use crate::script::EditScript;
use crate::sink::ChangeSink;

/// Largest snapshot size still diffed synchronously inside
/// [`BoundCollection::update`].
///
/// Below this bound the diff is cheaper than a thread handoff.
pub const SYNC_DIFF_THRESHOLD: usize = 50;

/// A computed background diff waiting for the owner thread.
struct Completed<T> {
    version: u64,
    items: Arc<[T]>,
    script: EditScript,
}

/// Single-slot mailbox between workers and the owner thread.
///
/// Holds the newest-versioned result only; an older result never
/// overwrites a newer one, whatever order the workers finish in.
struct Mailbox<T> {
    slot: Mutex<Option<Completed<T>>>,
    ready: Condvar,
}

impl<T> Mailbox<T> {
    fn new() -> Self {
        Self { slot: Mutex::new(None), ready: Condvar::new() }
    }

    fn deliver(&self, result: Completed<T>) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_none_or(|held| held.version < result.version) {
            *slot = Some(result);
        }
        drop(slot);
        self.ready.notify_all();
    }

    fn take(&self) -> Option<Completed<T>> {
        self.slot.lock().take()
    }
}

/// Cancellation handle for one dispatched diff.
struct InFlight {
    version: u64,
    cancel: Arc<AtomicBool>,
}

impl InFlight {
    fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Ordered collection bound to a renderer, updated through minimal
/// positional mutations.
///
/// The snapshot is immutable between commits; every update produces a new
/// one that atomically replaces the old. Small updates commit inside
/// [`update`](Self::update); large ones are diffed in the background and
/// commit on the next [`poll`](Self::poll) or [`flush`](Self::flush) that
/// finds the result still current.
pub struct BoundCollection<T, C> {
    comparator: Arc<C>,
    items: Option<Arc<[T]>>,
    version: u64,
    mailbox: Arc<Mailbox<T>>,
    in_flight: Option<InFlight>,
}

impl<T, C> BoundCollection<T, C>
where
    T: Send + Sync + 'static,
    C: Comparator<T> + Send + Sync + 'static,
{
    /// Create an empty collection.
    pub fn new(comparator: C) -> Self {
        Self {
            comparator: Arc::new(comparator),
            items: None,
            version: 0,
            mailbox: Arc::new(Mailbox::new()),
            in_flight: None,
        }
    }

    /// Number of items in the committed snapshot.
    pub fn item_count(&self) -> usize {
        self.items.as_ref().map_or(0, |items| items.len())
    }

    /// Item at `position` in the committed snapshot.
    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.as_ref().and_then(|items| items.get(position))
    }

    /// The committed snapshot, if the collection is populated.
    pub fn snapshot(&self) -> Option<&Arc<[T]>> {
        self.items.as_ref()
    }

    /// Update counter: one tick per [`update`](Self::update) call.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// `true` while a background diff is outstanding.
    pub fn is_updating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Replace the collection contents.
    ///
    /// `None` and an empty vec both mean "no items". Every call advances
    /// the version and invalidates any outstanding background diff, even
    /// when the call itself turns out to be a no-op.
    ///
    /// Transitions from or to the empty state commit synchronously with a
    /// single `full_reset` or `range_removed` notification. Populated-to-
    /// populated updates diff synchronously below
    /// [`SYNC_DIFF_THRESHOLD`], asynchronously otherwise. In the async
    /// case the old snapshot stays visible until the result commits via
    /// [`poll`](Self::poll) or [`flush`](Self::flush).
    pub fn update(&mut self, items: Option<Vec<T>>, sink: &mut dyn ChangeSink) {
        self.cancel_pending();
        self.version = self.version.wrapping_add(1);

        let incoming = items.filter(|items| !items.is_empty());
        match (self.items.clone(), incoming) {
            (None, None) => {}
            (None, Some(fresh)) => {
                self.items = Some(Arc::from(fresh));
                debug!(version = self.version, items = self.item_count(), "populated");
                sink.full_reset();
            }
            (Some(old), None) => {
                self.items = None;
                debug!(version = self.version, removed = old.len(), "cleared");
                sink.range_removed(0, old.len());
            }
            (Some(old), Some(fresh)) => {
                let fresh: Arc<[T]> = Arc::from(fresh);
                if old.len().max(fresh.len()) < SYNC_DIFF_THRESHOLD {
                    let script = diff(&old, &fresh, self.comparator.as_ref());
                    self.commit(fresh, &script, sink);
                } else {
                    self.dispatch(old, fresh);
                }
            }
        }
    }

    /// Commit a completed background diff if it is still current.
    ///
    /// Owner-thread half of the async path. Returns `true` if a commit
    /// happened; superseded results are discarded silently.
    pub fn poll(&mut self, sink: &mut dyn ChangeSink) -> bool {
        match self.mailbox.take() {
            Some(done) => self.try_commit(done, sink),
            None => false,
        }
    }

    /// Block until the outstanding diff (if any) commits or `timeout`
    /// elapses.
    ///
    /// For hosts without an event loop, and for tests. Returns `true` if
    /// a commit happened.
    pub fn flush(&mut self, sink: &mut dyn ChangeSink, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.in_flight.is_none() {
                return false;
            }
            let done = {
                let mut slot = self.mailbox.slot.lock();
                loop {
                    if let Some(done) = slot.take() {
                        break Some(done);
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        break None;
                    }
                    if self.mailbox.ready.wait_for(&mut slot, deadline - now).timed_out() {
                        break slot.take();
                    }
                }
            };
            match done {
                // A stale result keeps the loop waiting for the current one.
                Some(done) => {
                    if self.try_commit(done, sink) {
                        return true;
                    }
                }
                None => return false,
            }
        }
    }

    /// Drop interest in any outstanding background diff.
    ///
    /// Advisory: the worker may run to completion, but its result will
    /// not commit. Called automatically by every update and on drop; a
    /// host detaching its renderer calls it directly.
    pub fn cancel_pending(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel();
            trace!(version = in_flight.version, "cancelled outstanding diff");
        }
    }

    fn try_commit(&mut self, done: Completed<T>, sink: &mut dyn ChangeSink) -> bool {
        let expected = self.in_flight.as_ref().map(|in_flight| in_flight.version);
        if expected != Some(done.version) {
            trace!(delivered = done.version, "discarding superseded diff result");
            return false;
        }
        self.in_flight = None;
        self.commit(done.items, &done.script, sink);
        true
    }

    fn commit(&mut self, items: Arc<[T]>, script: &EditScript, sink: &mut dyn ChangeSink) {
        debug!(
            version = self.version,
            items = items.len(),
            ops = script.len(),
            "committing snapshot"
        );
        self.items = Some(items);
        script.dispatch_to(sink);
    }

    fn dispatch(&mut self, old: Arc<[T]>, fresh: Arc<[T]>) {
        let cancel = Arc::new(AtomicBool::new(false));
        let version = self.version;
        self.in_flight = Some(InFlight { version, cancel: Arc::clone(&cancel) });

        let comparator = Arc::clone(&self.comparator);
        let mailbox: Weak<Mailbox<T>> = Arc::downgrade(&self.mailbox);
        debug!(version, old = old.len(), new = fresh.len(), "dispatching background diff");

        std::thread::spawn(move || {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            let script = diff(&old, &fresh, comparator.as_ref());
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            // The collection may be gone; a failed upgrade is a discard.
            if let Some(mailbox) = mailbox.upgrade() {
                mailbox.deliver(Completed { version, items: fresh, script });
            }
        });
    }
}

impl<T, C> Default for BoundCollection<T, C>
where
    T: Send + Sync + 'static,
    C: Comparator<T> + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<T, C> Drop for BoundCollection<T, C> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel();
        }
    }
}
