//! # rs-interlock
//!
//! Track topology and priority-based route allocation for trains sharing a
//! railway layout.
//!
//! ## Features
//!
//! - **Validated track model**: junctions, branches, sections, locations,
//!   segments and routes that cannot be built in an invalid state
//! - **Topology checks**: one section per junction branch, enforced on insert
//! - **Location equivalence**: the same point described from either end of a
//!   section compares equal
//! - **Priority allocation**: each train gets the longest safe prefix of its
//!   requested route, higher-priority trains first
//! - **Track files**: a line-oriented description format (with `std`)
//!
//! ## Architecture
//!
//! The core works without `std`:
//!
//! - `branch`, `junction`, `section`, `location`, `segment`, `route` - Value types
//! - `track` - The track graph container
//! - `traits` - The [`Topology`] seam the allocator is generic over
//! - `allocator` - Conflict resolution between trains
//! - `config` - Allocator and reader settings
//! - `reader` - Track file reader and writer (`std` only)
//! - `messages` - Serializable request/response types (`serde` only)
//!
//! ## Example
//!
//! ```rust
//! use rs_interlock::{Allocator, Branch, Endpoint, Junction, Route, Section, Segment, Track};
//!
//! let ep = |j: &str, b| Endpoint::new(Junction::new(j).unwrap(), b);
//!
//! // Two sidings merging at j1.
//! let west = Section::new(10, ep("j0", Branch::Facing), ep("j1", Branch::Normal)).unwrap();
//! let south = Section::new(8, ep("j3", Branch::Facing), ep("j1", Branch::Reverse)).unwrap();
//! let mut track = Track::new();
//! track.add_section(west.clone()).unwrap();
//! track.add_section(south.clone()).unwrap();
//!
//! let on = |section: &Section, from: Endpoint, start, end| {
//!     Route::single(Segment::new(section.clone(), from, start, end).unwrap())
//! };
//! let occupied = [
//!     on(&west, ep("j0", Branch::Facing), 0, 2),
//!     on(&south, ep("j3", Branch::Facing), 0, 2),
//! ];
//! // Both trains want to run right up to j1.
//! let requested = [
//!     on(&west, ep("j0", Branch::Facing), 0, 10),
//!     on(&south, ep("j3", Branch::Facing), 0, 8),
//! ];
//!
//! let allocated = Allocator::new(&track).allocate(&occupied, &requested).unwrap();
//! assert_eq!(allocated[0], requested[0]);
//! // The lower-priority train stops one unit short of the junction.
//! assert_eq!(allocated[1], on(&south, ep("j3", Branch::Facing), 0, 7));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Priority-ordered route allocation.
pub mod allocator;
/// The three connection slots of a junction.
pub mod branch;
/// Allocator and reader configuration.
pub mod config;
/// Error types for construction, topology and allocation.
pub mod error;
/// Junctions and their endpoints.
pub mod junction;
/// Points on the track.
pub mod location;
/// Contiguous sequences of segments.
pub mod route;
/// Length-bearing edges of the track graph.
pub mod section;
/// Directed sub-ranges of a section.
pub mod segment;
/// The track graph container.
pub mod track;
/// Abstraction seams between the model and its users.
pub mod traits;

/// Track file reader and writer.
#[cfg(feature = "std")]
pub mod reader;

/// Serializable message types for allocation requests (serde-based).
#[cfg(feature = "serde")]
pub mod messages;

// Re-exports for convenience
pub use allocator::{
    allocate, AllocationReport, Allocator, Blocker, Cut, CutReason, Limit, TrainDecision,
};
pub use branch::Branch;
pub use error::{AllocationError, InvalidArgument, InvalidTopology, ParseBranchError, RouteRole};
pub use junction::{Endpoint, Junction, JunctionName, MAX_JUNCTION_NAME};
pub use location::Location;
pub use route::Route;
pub use section::Section;
pub use segment::Segment;
pub use track::Track;
pub use traits::Topology;

// Config re-exports
pub use config::{AllocatorConfig, Config, ReaderConfig};

// Reader re-exports (std only)
#[cfg(feature = "std")]
pub use reader::{
    parse_track, read_track, write_track, FormatError, FormatErrorKind, ReadError, TrackReader,
};

// Message re-exports
#[cfg(feature = "serde")]
pub use messages::{AllocationRequest, AllocationResponse, TrackDescription};

// Parsing function re-exports (serde-json-core based)
#[cfg(feature = "serde-json-core")]
pub use messages::{parse_allocation_request, parse_track_description};
