//! Device-facing services used by the poller and the HTTP handlers.

pub mod detection;
pub mod frames;
pub mod settings;
pub mod status;
pub mod videos;
