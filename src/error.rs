//! Errors surfaced by a notification pass.

use std::fmt;

use crate::observable::SubscriptionId;

/// The error type fallible subscribers return.
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A subscriber failed while being notified of a new value.
///
/// The pass stops at the failing subscriber: everything registered after it
/// is skipped for that pass. The value itself was already stored before the
/// pass began, so the observable stays consistent.
///
/// `Display` shows the subscriber's own message unchanged. Use
/// [`NotifyError::into_inner`] to get the original error back.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct NotifyError {
    error: SubscriberError,
    subscription: SubscriptionId,
    position: usize,
    skipped: usize,
}

impl NotifyError {
    pub(crate) fn new(error: SubscriberError, subscription: SubscriptionId, position: usize, skipped: usize) -> Self {
        Self {
            error,
            subscription,
            position,
            skipped,
        }
    }

    /// The subscription whose callback failed.
    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Index of the failing subscriber within the pass, in registration order.
    pub fn position(&self) -> usize {
        self.position
    }

    /// How many subscribers after the failing one were not called.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Borrow the subscriber's error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        &*self.error
    }

    /// Recover the subscriber's error exactly as it was returned.
    pub fn into_inner(self) -> SubscriberError {
        self.error
    }
}

/// A subscriber failed during [`Observable::replace`](crate::Observable::replace).
///
/// The new value was stored before the pass, so this carries the value it
/// replaced alongside the [`NotifyError`].
pub struct ReplaceError<T> {
    previous: T,
    error: NotifyError,
}

impl<T> ReplaceError<T> {
    pub(crate) fn new(previous: T, error: NotifyError) -> Self {
        Self { previous, error }
    }

    /// The value that was replaced.
    pub fn previous(&self) -> &T {
        &self.previous
    }

    pub fn error(&self) -> &NotifyError {
        &self.error
    }

    pub fn into_parts(self) -> (T, NotifyError) {
        (self.previous, self.error)
    }
}

impl<T> From<ReplaceError<T>> for NotifyError {
    fn from(err: ReplaceError<T>) -> Self {
        err.error
    }
}

impl<T> fmt::Debug for ReplaceError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplaceError").field("error", &self.error).finish_non_exhaustive()
    }
}

impl<T> fmt::Display for ReplaceError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T> std::error::Error for ReplaceError<T> {}
