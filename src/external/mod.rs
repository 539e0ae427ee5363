//! Slow, network-bound collaborators the planner consumes.
//!
//! Failures are surfaced as typed errors; callers turn them into explicit
//! outcomes instead of substituting zeros.

pub mod geocode;
pub mod solar;

pub use geocode::*;
pub use solar::*;
