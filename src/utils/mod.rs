//! Shared utilities.

pub mod timestamp;

pub use timestamp::format_timestamp;
