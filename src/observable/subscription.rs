use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::error::SubscriberError;

/// Identifies one `subscribe` call on one observable.
///
/// Ids increase with every registration, so ordering by id is ordering by
/// registration.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) type Callback<T> = Arc<dyn Fn(&T) -> Result<(), SubscriberError> + Send + Sync>;

/// A registered callback. `active` is cleared on revocation so a pass that
/// already took its snapshot can skip it.
pub(crate) struct Entry<T> {
    id: SubscriptionId,
    callback: Callback<T>,
    active: AtomicBool,
}

impl<T> Entry<T> {
    pub(crate) fn id(&self) -> SubscriptionId {
        self.id
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub(crate) fn call(&self, value: &T) -> Result<(), SubscriberError> {
        (self.callback)(value)
    }
}

/// Ordered subscriber storage owned by a single observable.
pub(crate) struct Registry<T> {
    entries: BTreeMap<SubscriptionId, Arc<Entry<T>>>,
    next_id: u64,
}

impl<T> Registry<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn insert(&mut self, callback: Callback<T>) -> SubscriptionId {
        let id = SubscriptionId::from_raw(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Arc::new(Entry {
                id,
                callback,
                active: AtomicBool::new(true),
            }),
        );
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        match self.entries.remove(&id) {
            Some(entry) => {
                entry.active.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in registration order, detached from the registry so the
    /// caller can run callbacks without holding the lock.
    pub(crate) fn snapshot(&self) -> Vec<Arc<Entry<T>>> {
        self.entries.values().cloned().collect()
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked. Every
/// critical section in this crate leaves its data complete, so the poison
/// flag carries no information.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Type-erased view of a registry, letting handles outlive the value type.
trait Revoke {
    fn revoke(&self, id: SubscriptionId) -> bool;
    fn is_registered(&self, id: SubscriptionId) -> bool;
}

impl<T> Revoke for Mutex<Registry<T>> {
    fn revoke(&self, id: SubscriptionId) -> bool {
        lock(self).remove(id)
    }

    fn is_registered(&self, id: SubscriptionId) -> bool {
        lock(self).contains(id)
    }
}

/// Handle returned by `subscribe`, used to revoke that one registration.
///
/// Dropping a `Subscription` leaves the callback registered. Call
/// [`Subscription::unsubscribe`], or convert it with
/// [`Subscription::into_guard`] to tie the registration to a scope.
#[derive(Clone)]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<dyn Revoke + Send + Sync>,
}

impl Subscription {
    pub(crate) fn new<T: 'static>(id: SubscriptionId, registry: &Arc<Mutex<Registry<T>>>) -> Self {
        let registry: Weak<Mutex<Registry<T>>> = Arc::downgrade(registry);
        Self { id, registry }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| registry.is_registered(self.id))
    }

    /// Removes exactly this registration.
    ///
    /// Calling it again, or after the observable is gone, does nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.revoke(self.id) {
                tracing::trace!(subscription = %self.id, "unsubscribed");
            }
        }
    }

    /// Converts the handle into a guard that unsubscribes when dropped.
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard(self)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).field("active", &self.is_active()).finish()
    }
}

/// RAII guard for a subscription.
#[derive(Debug)]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
    pub fn id(&self) -> SubscriptionId {
        self.0.id()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.0.unsubscribe();
    }
}
