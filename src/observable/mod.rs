//! The observable value container and its subscription handles.
//!
//! - `Observable<T>` - Holds a value and notifies subscribers on every write
//! - `Subscription` - Revokes one registration, idempotently
//! - `SubscriptionGuard` - Revokes its registration when dropped

mod observable;
mod subscription;

pub use observable::Observable;
pub use subscription::{Subscription, SubscriptionGuard, SubscriptionId};
