//! Notification type definitions.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Categories used by the dashboard. The queue itself accepts any tag.
pub mod category {
    pub const VERSION: &str = "version";
    pub const ERROR: &str = "error";
    pub const NO_PEI: &str = "no-pei";
    pub const FOREIGN: &str = "foreign";
}

/// A notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEntry {
    pub id: u64,
    pub message: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}
