//! On-screen notification system.
//!
//! A bounded queue of short-lived messages. Entries leave the queue
//! when they expire or when newer entries push them out, and every
//! change is mirrored to a [`NotificationSurface`].

pub mod queue;
pub mod surface;
pub mod types;

pub use queue::NotificationQueue;
pub use surface::{BroadcastSurface, NotificationSurface};
pub use types::NotificationEntry;
