//! Domain model for patient records.
//!
//! These types mirror the backend's JSON payloads (camelCase keys) so they can be decoded and
//! encoded directly.

mod diagnosis;
mod entry;
mod patient;

pub use diagnosis::*;
pub use entry::*;
pub use patient::*;
