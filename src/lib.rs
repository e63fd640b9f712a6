//! # Beacon
//!
//! A single-value observable container for in-process state propagation.
//!
//! An [`Observable<T>`] holds one value and a list of subscribers. Every write
//! stores the new value and then calls each subscriber synchronously, in the
//! order they subscribed:
//!
//! - `Observable<T>` - The value holder: `get`, `set`, `update`, `subscribe`
//! - `Subscription` - Handle that revokes exactly one registration
//! - `NotifyError` - A fallible subscriber failed and the pass stopped there
//!
//! ```
//! use beacon::Observable;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use std::sync::Arc;
//!
//! let temperature = Observable::new(20);
//! let last_seen = Arc::new(AtomicI32::new(0));
//!
//! let subscription = temperature.subscribe({
//!     let last_seen = last_seen.clone();
//!     move |celsius: &i32| last_seen.store(*celsius, Ordering::SeqCst)
//! });
//!
//! temperature.set(23).unwrap();
//! assert_eq!(last_seen.load(Ordering::SeqCst), 23);
//!
//! subscription.unsubscribe();
//! temperature.set(25).unwrap();
//! assert_eq!(last_seen.load(Ordering::SeqCst), 23);
//! assert_eq!(temperature.get(), 25);
//! ```
//!
//! Subscribers registered with [`Observable::try_subscribe`] may return an
//! error. The first error ends the notification pass and is returned from the
//! write; see [`NotifyError`].

pub mod error;
pub mod observable;

// Re-export main types for convenience
pub use error::{NotifyError, ReplaceError, SubscriberError};
pub use observable::{Observable, Subscription, SubscriptionGuard, SubscriptionId};
