//! Trait definitions for the seams between the track model and its users.
//!
//! # Submodules
//!
//! - `topology`: read-only endpoint lookup consumed by the allocator
//!
//! The allocator is generic over [`Topology`], so it can run against a
//! [`Track`](crate::Track) built at start-up or any other table that keeps
//! the one-section-per-endpoint rule.

pub mod topology;

pub use topology::*;
