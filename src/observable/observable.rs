use std::fmt;
use std::sync::{Arc, Mutex};

use super::subscription::{lock, Callback, Registry, Subscription};
use crate::error::{NotifyError, ReplaceError, SubscriberError};

/// A value that notifies its subscribers every time it is written.
///
/// Writes store the new value first and then call each subscriber in
/// registration order, inline, before returning. There is no equality check:
/// writing the same value again notifies again.
///
/// # Notification passes
///
/// Each write runs one pass over a snapshot of the subscribers taken when the
/// pass starts:
///
/// - a subscriber added during a pass is first called by the next pass;
/// - a subscriber removed during a pass, before its turn, is not called;
/// - each subscriber receives the value stored at the moment it is called,
///   so after a nested write the rest of the outer pass sees the newer value
///   and the last value every subscriber saw agrees with `get`;
/// - the first fallible subscriber to return `Err` ends the pass, and the
///   write returns that error. Later subscribers are skipped for this pass
///   only.
///
/// No lock is held while a subscriber runs, so subscribers may read, write,
/// subscribe and unsubscribe on the same observable.
///
/// # Examples
///
/// ```
/// use beacon::Observable;
/// use std::sync::{Arc, Mutex};
///
/// let count = Observable::new(0);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let subscription = count.subscribe({
///     let seen = seen.clone();
///     move |value: &i32| seen.lock().unwrap().push(*value)
/// });
///
/// count.set(1).unwrap();
/// count.set(2).unwrap();
/// subscription.unsubscribe();
/// count.set(3).unwrap();
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// assert_eq!(count.get(), 3);
/// ```
pub struct Observable<T> {
    value: Mutex<Arc<T>>,
    subscribers: Arc<Mutex<Registry<T>>>,
}

impl<T: 'static> Observable<T> {
    /// Create a new observable holding `initial`, with no subscribers.
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(Arc::new(initial)),
            subscribers: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Read the value with a function without cloning.
    ///
    /// The closure sees the value current at the time of the call, even if it
    /// writes to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let current = self.current();
        f(&current)
    }

    /// Store `value`, then notify every subscriber.
    ///
    /// The value is stored even when a subscriber fails.
    pub fn set(&self, value: T) -> Result<(), NotifyError> {
        *lock(&self.value) = Arc::new(value);
        self.notify_subscribers()
    }

    /// Run a notification pass with the current value, without writing.
    pub fn notify(&self) -> Result<(), NotifyError> {
        self.notify_subscribers()
    }

    /// Subscribe to every future write.
    ///
    /// The callback is not called with the current value. The same callback
    /// may be registered any number of times; each registration gets its own
    /// [`Subscription`].
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(Arc::new(move |value: &T| -> Result<(), SubscriberError> {
            callback(value);
            Ok(())
        }))
    }

    /// Subscribe with a callback that can fail.
    ///
    /// An `Err` aborts the notification pass it occurs in and is returned
    /// from the write that started the pass.
    pub fn try_subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        self.register(Arc::new(callback))
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    fn register(&self, callback: Callback<T>) -> Subscription {
        let id = lock(&self.subscribers).insert(callback);
        tracing::trace!(subscription = %id, "subscribed");
        Subscription::new(id, &self.subscribers)
    }

    fn current(&self) -> Arc<T> {
        Arc::clone(&lock(&self.value))
    }

    fn notify_subscribers(&self) -> Result<(), NotifyError> {
        let snapshot = lock(&self.subscribers).snapshot();
        tracing::trace!(subscribers = snapshot.len(), "notifying");

        for (position, entry) in snapshot.iter().enumerate() {
            if !entry.is_active() {
                continue;
            }
            let current = self.current();
            if let Err(error) = entry.call(&current) {
                let skipped = snapshot[position + 1..].iter().filter(|e| e.is_active()).count();
                tracing::debug!(
                    subscription = %entry.id(),
                    position,
                    skipped,
                    %error,
                    "subscriber failed, abandoning notification pass"
                );
                return Err(NotifyError::new(error, entry.id(), position, skipped));
            }
        }
        Ok(())
    }
}

impl<T: Clone + 'static> Observable<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        T::clone(&lock(&self.value))
    }

    /// Update the value in place, then notify as [`Observable::set`] does.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<(), NotifyError> {
        let mut value = T::clone(&self.current());
        f(&mut value);
        self.set(value)
    }

    /// Like [`Observable::set`], returning the value that was replaced.
    ///
    /// The new value is stored either way. When a subscriber fails, the
    /// replaced value travels back inside the [`ReplaceError`].
    pub fn replace(&self, value: T) -> Result<T, ReplaceError<T>> {
        let previous = std::mem::replace(&mut *lock(&self.value), Arc::new(value));
        let previous = Arc::try_unwrap(previous).unwrap_or_else(|shared| T::clone(&shared));
        match self.notify_subscribers() {
            Ok(()) => Ok(previous),
            Err(error) => Err(ReplaceError::new(previous, error)),
        }
    }
}

impl<T: Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> From<T> for Observable<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = Arc::clone(&lock(&self.value));
        f.debug_struct("Observable")
            .field("value", &value)
            .field("subscribers", &lock(&self.subscribers).len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn observable_get_set() {
        let observable = Observable::new(1);
        assert_eq!(observable.get(), 1);

        observable.set(2).unwrap();
        assert_eq!(observable.get(), 2);
    }

    #[test]
    fn observable_update() {
        let observable = Observable::new(vec![1, 2]);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        observable.subscribe(move |v: &Vec<i32>| {
            assert_eq!(v.len(), 3);
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        observable.update(|v| v.push(3)).unwrap();

        assert_eq!(observable.get(), vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn replace_returns_previous_value() {
        let observable = Observable::new("old".to_string());
        let previous = observable.replace("new".to_string()).unwrap();
        assert_eq!(previous, "old");
        assert_eq!(observable.get(), "new");
    }

    #[test]
    fn replace_error_carries_previous_value() {
        let observable = Observable::new("old".to_string());
        observable.try_subscribe(|_| Err("rejected".into()));

        let err = observable.replace("new".to_string()).unwrap_err();
        assert_eq!(err.previous(), "old");
        assert_eq!(err.to_string(), "rejected");
        assert_eq!(observable.get(), "new");

        let (previous, notify) = err.into_parts();
        assert_eq!(previous, "old");
        assert_eq!(notify.position(), 0);
    }

    #[test]
    fn notify_reruns_pass_without_writing() {
        let observable = Observable::new(7);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        observable.subscribe(move |v: &i32| seen_clone.lock().unwrap().push(*v));

        observable.notify().unwrap();
        observable.notify().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![7, 7]);
    }

    #[test]
    fn with_borrows_without_clone() {
        struct NotClone(u32);

        let observable = Observable::new(NotClone(5));
        assert_eq!(observable.with(|v| v.0), 5);
        observable.set(NotClone(6)).unwrap();
        assert_eq!(observable.with(|v| v.0), 6);
    }

    #[test]
    fn subscriber_count_tracks_registrations() {
        let observable = Observable::new(0u8);
        let a = observable.subscribe(|_| {});
        let _b = observable.subscribe(|_| {});
        assert_eq!(observable.subscriber_count(), 2);

        a.unsubscribe();
        assert_eq!(observable.subscriber_count(), 1);
    }

    #[test]
    fn default_and_from() {
        let a: Observable<String> = Observable::default();
        assert_eq!(a.get(), "");

        let b = Observable::from(3.5f64);
        assert_eq!(b.get(), 3.5);
    }

    #[test]
    fn debug_shows_value_and_subscribers() {
        let observable = Observable::new(9);
        observable.subscribe(|_| {});
        assert_eq!(format!("{observable:?}"), "Observable { value: 9, subscribers: 1 }");
    }
}
