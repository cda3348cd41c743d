//! Message types for handing allocation work across a process boundary.
//!
//! A controller that runs the allocator on a different host (or a different
//! task) sends an [`AllocationRequest`] and gets an [`AllocationResponse`]
//! back. A [`TrackDescription`] carries the layout itself. Every model type
//! inside these messages deserializes through its validating constructor, so
//! a message that parses holds only well-formed values.
//!
//! These types are `no_std` compatible and can be deserialized using either
//! `serde_json` (desktop) or `serde-json-core` (embedded).
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "occupied":  [[{"section": {"length": 10, "endpoints": [
//!                     {"junction": "j1", "branch": "FACING"},
//!                     {"junction": "j2", "branch": "NORMAL"}]},
//!                   "departing": {"junction": "j1", "branch": "FACING"},
//!                   "start_offset": 0, "end_offset": 3}]],
//!   "requested": [[ ... ]]
//! }
//! ```

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::allocator::{AllocationReport, Allocator};
use crate::config::AllocatorConfig;
use crate::error::{AllocationError, InvalidTopology};
use crate::route::Route;
use crate::section::Section;
use crate::track::Track;
use crate::traits::Topology;

// ============================================================================
// Request Types
// ============================================================================

/// Where every train is and where each wants to go, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Occupied route of each train.
    pub occupied: Vec<Route>,
    /// Requested route of each train.
    pub requested: Vec<Route>,
}

impl AllocationRequest {
    /// Creates a request.
    pub fn new(occupied: Vec<Route>, requested: Vec<Route>) -> Self {
        Self {
            occupied,
            requested,
        }
    }

    /// Number of trains described by the request.
    pub fn trains(&self) -> usize {
        self.occupied.len()
    }

    /// Runs the allocator over `topology` and packages the result.
    ///
    /// # Errors
    ///
    /// Any [`AllocationError`] raised by the allocator.
    pub fn answer<T: Topology + ?Sized>(
        &self,
        topology: &T,
        config: AllocatorConfig,
    ) -> Result<AllocationResponse, AllocationError> {
        Allocator::new(topology)
            .with_config(config)
            .allocate_with_report(&self.occupied, &self.requested)
            .map(AllocationResponse::from)
    }
}

/// A track layout as a list of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescription {
    /// The sections, in any order.
    pub sections: Vec<Section>,
}

impl TrackDescription {
    /// Builds the described track.
    ///
    /// # Errors
    ///
    /// [`InvalidTopology`] if two sections share an endpoint.
    pub fn into_track(self) -> Result<Track, InvalidTopology> {
        Track::from_sections(self.sections)
    }
}

impl From<&Track> for TrackDescription {
    fn from(track: &Track) -> Self {
        Self {
            sections: track.iter().cloned().collect(),
        }
    }
}

impl TryFrom<TrackDescription> for Track {
    type Error = InvalidTopology;

    fn try_from(description: TrackDescription) -> Result<Self, Self::Error> {
        description.into_track()
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// The allocator's answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResponse {
    /// Allocated route of each train, in request order.
    pub allocated: Vec<Route>,
    /// Indices of trains that must stay where they are.
    pub held: Vec<usize>,
}

impl AllocationResponse {
    /// Packages allocated routes, deriving the held trains.
    pub fn from_routes(allocated: Vec<Route>) -> Self {
        let held = allocated
            .iter()
            .enumerate()
            .filter(|(_, route)| route.is_empty())
            .map(|(train, _)| train)
            .collect();
        Self { allocated, held }
    }
}

impl From<AllocationReport> for AllocationResponse {
    fn from(report: AllocationReport) -> Self {
        Self::from_routes(report.routes)
    }
}

// ============================================================================
// Parsing Functions (using serde-json-core for no_std compatibility)
// ============================================================================

/// Parse an allocation request from JSON bytes.
///
/// Works in both `std` and `no_std` environments using `serde-json-core`.
/// Returns `None` for malformed JSON and for messages holding invalid values.
///
/// # Example
///
/// ```
/// use rs_interlock::messages::parse_allocation_request;
///
/// let json = br#"{"occupied": [], "requested": []}"#;
/// let req = parse_allocation_request(json).unwrap();
/// assert_eq!(req.trains(), 0);
/// ```
#[cfg(feature = "serde-json-core")]
pub fn parse_allocation_request(json: &[u8]) -> Option<AllocationRequest> {
    serde_json_core::from_slice(json).ok().map(|(req, _)| req)
}

/// Parse a track description from JSON bytes.
#[cfg(feature = "serde-json-core")]
pub fn parse_track_description(json: &[u8]) -> Option<TrackDescription> {
    serde_json_core::from_slice(json).ok().map(|(desc, _)| desc)
}
