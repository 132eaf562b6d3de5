use std::{
    collections::HashMap,
    sync::{
        Arc, Weak,
        atomic::{AtomicU8, Ordering},
    },
};

use parking_lot::Mutex;

const ACTIVE: u8 = 0;
const CANCELLED: u8 = 1;
const COMPLETED: u8 = 2;
const FAILED: u8 = 3;

/// Terminal outcome of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Cancelled,
    Completed,
    Failed,
}

/// Cancellable handle for one asynchronous execution.
///
/// Clones share the same state. The state moves from active to exactly one
/// terminal outcome; every transition is CAS-guarded, so cancellation racing
/// a completion resolves to a single winner.
#[derive(Clone)]
pub struct Subscription {
    state: Arc<AtomicU8>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(ACTIVE)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) == ACTIVE
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.load(Ordering::Acquire) == CANCELLED
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state.load(Ordering::Acquire) {
            CANCELLED => Some(Outcome::Cancelled),
            COMPLETED => Some(Outcome::Completed),
            FAILED => Some(Outcome::Failed),
            _ => None,
        }
    }

    /// Cancels the execution. Idempotent; loses against an already
    /// delivered terminal outcome.
    pub fn dispose(&self) -> bool {
        self.transition(CANCELLED)
    }

    pub(crate) fn complete(&self) -> bool {
        self.transition(COMPLETED)
    }

    pub(crate) fn fail(&self) -> bool {
        self.transition(FAILED)
    }

    fn transition(&self, target: u8) -> bool {
        self.state
            .compare_exchange(ACTIVE, target, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

struct Members {
    disposed: bool,
    next_key: u64,
    entries: HashMap<u64, Subscription>,
}

/// Aggregate owner of subscriptions.
///
/// Disposing the group cancels every member and permanently refuses new
/// ones. `add` and `dispose` may race from different threads; a single
/// mutex serialises both paths.
pub struct SubscriptionGroup {
    members: Arc<Mutex<Members>>,
}

impl SubscriptionGroup {
    pub fn new() -> Self {
        Self {
            members: Arc::new(Mutex::new(Members {
                disposed: false,
                next_key: 0,
                entries: HashMap::new(),
            })),
        }
    }

    /// Registers a subscription and returns its deregistration handle.
    ///
    /// Returns `None` when the group is already disposed; the subscription
    /// is cancelled before this returns.
    pub fn add(&self, subscription: Subscription) -> Option<Registration> {
        let mut members = self.members.lock();
        if members.disposed {
            drop(members);
            subscription.dispose();
            return None;
        }
        let key = members.next_key;
        members.next_key += 1;
        members.entries.insert(key, subscription);
        Some(Registration {
            members: Arc::downgrade(&self.members),
            key,
        })
    }

    /// Cancels every member and marks the group permanently disposed.
    /// Idempotent.
    pub fn dispose(&self) {
        let mut members = self.members.lock();
        if members.disposed {
            return;
        }
        members.disposed = true;
        tracing::debug!(
            outstanding = members.entries.len(),
            "subscription group disposed"
        );
        for (_, subscription) in members.entries.drain() {
            subscription.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.members.lock().disposed
    }

    pub fn len(&self) -> usize {
        self.members.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes one finished subscription from its group.
pub struct Registration {
    members: Weak<Mutex<Members>>,
    key: u64,
}

impl Registration {
    pub fn deregister(self) {
        if let Some(members) = self.members.upgrade() {
            members.lock().entries.remove(&self.key);
        }
    }
}
