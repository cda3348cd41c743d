//! Error types for the track model and the allocator.
//!
//! Every fallible constructor in the crate returns one of these types, so a
//! value that exists has already been validated.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`InvalidArgument`] | Value constructors ([`Junction`], [`Section`], [`Location`], [`Segment`], [`Route`]) |
//! | [`ParseBranchError`] | [`Branch::from_str`] |
//! | [`InvalidTopology`] | [`Track::add_section`] |
//! | [`AllocationError`] | [`Allocator::allocate`] |
//!
//! There is no "null input" error: the API takes owned values and references,
//! which cannot be absent.
//!
//! [`Junction`]: crate::Junction
//! [`Section`]: crate::Section
//! [`Location`]: crate::Location
//! [`Segment`]: crate::Segment
//! [`Route`]: crate::Route
//! [`Branch::from_str`]: crate::Branch
//! [`Track::add_section`]: crate::Track::add_section
//! [`Allocator::allocate`]: crate::Allocator::allocate

use alloc::string::String;

use crate::junction::Endpoint;
use crate::section::Section;

// ============================================================================
// Invalid arguments
// ============================================================================

/// A structurally impossible value was passed to a constructor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
    /// Junction names must contain at least one character.
    #[error("junction name is empty")]
    EmptyJunctionName,

    /// Junction names may not contain whitespace.
    #[error("junction name `{0}` contains whitespace")]
    WhitespaceInJunctionName(String),

    /// Junction names are stored inline and have a fixed capacity.
    #[error("junction name is {len} bytes long, at most {max} are allowed")]
    JunctionNameTooLong {
        /// Length of the rejected name in bytes.
        len: usize,
        /// Maximum supported length in bytes.
        max: usize,
    },

    /// Sections must have a positive length.
    #[error("section length must be positive")]
    NonPositiveLength,

    /// The two endpoints of a section must differ.
    #[error("section endpoints must differ, both are {0}")]
    DuplicateEndpoint(Endpoint),

    /// The endpoint is not one of the section's two endpoints.
    #[error("{0} is not an endpoint of the section")]
    ForeignEndpoint(Endpoint),

    /// An offset lies outside the section it refers to.
    #[error("offset {offset} is out of range for a section of length {length}")]
    OffsetOutOfRange {
        /// The rejected offset.
        offset: u32,
        /// Length of the section.
        length: u32,
    },

    /// A segment's start offset lies past its end offset.
    #[error("start offset {start} lies past end offset {end}")]
    ReversedOffsets {
        /// The segment start offset.
        start: u32,
        /// The segment end offset.
        end: u32,
    },

    /// Routes must contain at least one segment.
    #[error("route has no segments")]
    EmptyRoute,

    /// Two consecutive segments of a route do not meet at a junction.
    #[error("segments {index} and {} of the route do not meet at a junction", .index + 1)]
    DisconnectedRoute {
        /// Index of the first of the two segments.
        index: usize,
    },
}

/// An unrecognised branch keyword.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown branch `{0}`, expected one of FACING, NORMAL, REVERSE")]
pub struct ParseBranchError(pub String);

// ============================================================================
// Topology
// ============================================================================

/// Adding a section would connect an endpoint to a second section.
///
/// The track is left unmodified when this is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("endpoint {endpoint} is already connected to section {existing}")]
pub struct InvalidTopology {
    /// The endpoint that is already in use.
    pub endpoint: Endpoint,
    /// The section currently attached to that endpoint.
    pub existing: Section,
}

// ============================================================================
// Allocation
// ============================================================================

/// Which of the allocator's inputs (or outputs) a route belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RouteRole {
    /// The route a train currently occupies.
    Occupied,
    /// The route a train asked to travel next.
    Requested,
    /// The route granted to a train.
    Allocated,
}

impl RouteRole {
    /// Returns the role as a lowercase string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RouteRole::Occupied => "occupied",
            RouteRole::Requested => "requested",
            RouteRole::Allocated => "allocated",
        }
    }
}

impl core::fmt::Display for RouteRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The allocator's inputs violate its preconditions.
///
/// These are caller defects. The allocator refuses to compute anything rather
/// than return an allocation that might let two trains collide.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// One requested route is needed per occupied route.
    #[error("{occupied} occupied routes but {requested} requested routes")]
    LengthMismatch {
        /// Number of occupied routes.
        occupied: usize,
        /// Number of requested routes.
        requested: usize,
    },

    /// An input route has no segments.
    #[error("{role} route of train {train} is empty")]
    EmptyRoute {
        /// Index of the train.
        train: usize,
        /// Which input the route came from.
        role: RouteRole,
    },

    /// An input route runs over a section that is not part of the track.
    #[error("segment {segment} of the {role} route of train {train} is not on the track")]
    OffTrack {
        /// Index of the train.
        train: usize,
        /// Which input the route came from.
        role: RouteRole,
        /// Index of the offending segment within the route.
        segment: usize,
    },

    /// Two trains claim to occupy the same point of track.
    #[error("occupied routes of trains {first} and {second} intersect")]
    OccupiedRoutesIntersect {
        /// Lower train index.
        first: usize,
        /// Higher train index.
        second: usize,
    },

    /// The computed allocation failed its own safety check.
    #[error("allocation for train {train} conflicts with the {role} route of train {other}")]
    PostconditionViolated {
        /// The train whose allocation is at fault.
        train: usize,
        /// The train it conflicts with (equal to `train` for a prefix failure).
        other: usize,
        /// The route of `other` that was violated.
        role: RouteRole,
    },
}
