//! Points on the track.
//!
//! A [`Location`] is described by a section, one of its endpoints and an
//! offset from that endpoint. The same physical point usually has several
//! descriptions, so equality is an equivalence rather than field identity.
//! Two locations are equal when:
//!
//! 1. both have offset 0 and their endpoints share a junction, or
//! 2. their endpoints are equal and their offsets are equal, or
//! 3. their endpoints differ, their sections are equal and the offsets sum to
//!    the section length (the point seen from the opposite end).
//!
//! ```rust
//! use rs_interlock::{Branch, Endpoint, Junction, Location, Section};
//!
//! let j1 = Endpoint::new(Junction::new("j1").unwrap(), Branch::Facing);
//! let j2 = Endpoint::new(Junction::new("j2").unwrap(), Branch::Normal);
//! let section = Section::new(10, j1.clone(), j2.clone()).unwrap();
//!
//! let from_j1 = Location::new(section.clone(), j1, 3).unwrap();
//! let from_j2 = Location::new(section, j2, 7).unwrap();
//! assert_eq!(from_j1, from_j2);
//! ```
//!
//! Equality is an equivalence relation for locations taken from one
//! consistent track, where each endpoint belongs to a single section.
//! `Location` does not implement `Hash`: rule 2 compares endpoints without
//! comparing sections, which leaves no field a hash could safely depend on.

use crate::error::InvalidArgument;
use crate::junction::{Endpoint, Junction};
use crate::section::Section;

/// A point on the track.
///
/// # Invariant
///
/// `endpoint` is an endpoint of `section` and `offset < section.length()`.
#[derive(Clone, Debug)]
pub struct Location {
    section: Section,
    endpoint: Endpoint,
    offset: u32,
}

impl Location {
    /// Creates the location `offset` units from `endpoint` along `section`.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::ForeignEndpoint`] if `endpoint` does not belong to
    /// `section`; [`InvalidArgument::OffsetOutOfRange`] unless
    /// `offset < section.length()`.
    pub fn new(section: Section, endpoint: Endpoint, offset: u32) -> Result<Self, InvalidArgument> {
        if !section.has_endpoint(&endpoint) {
            return Err(InvalidArgument::ForeignEndpoint(endpoint));
        }
        if offset >= section.length() {
            return Err(InvalidArgument::OffsetOutOfRange {
                offset,
                length: section.length(),
            });
        }
        Ok(Self {
            section,
            endpoint,
            offset,
        })
    }

    /// The location `offset` units from `endpoint`, where `offset` may equal
    /// the section length (the far junction).
    ///
    /// Callers guarantee `endpoint` belongs to `section` and
    /// `offset <= section.length()`.
    pub(crate) fn along(section: &Section, endpoint: &Endpoint, offset: u32) -> Self {
        debug_assert!(
            offset <= section.length() && section.has_endpoint(endpoint),
            "offset {offset} from {endpoint} is outside section {section}"
        );
        if offset < section.length() {
            return Self {
                section: section.clone(),
                endpoint: endpoint.clone(),
                offset,
            };
        }
        let far = section.other_endpoint(endpoint).unwrap_or(endpoint);
        Self {
            section: section.clone(),
            endpoint: far.clone(),
            offset: 0,
        }
    }

    /// The section this location was described with.
    ///
    /// A location at a junction lies on every section attached to it; this
    /// is only the one it was constructed with.
    pub fn section(&self) -> &Section {
        &self.section
    }

    /// The endpoint the offset is measured from.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Distance from [`endpoint`](Self::endpoint).
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns true if this location is at a junction (offset 0).
    pub fn at_a_junction(&self) -> bool {
        self.offset == 0
    }

    /// The junction this location sits on, if it is at one.
    pub fn junction(&self) -> Option<&Junction> {
        self.at_a_junction().then(|| self.endpoint.junction())
    }

    /// Returns true if this location lies on `section`.
    ///
    /// A location at a junction lies on every section attached to that
    /// junction; any other location lies only on its own section.
    pub fn on_section(&self, section: &Section) -> bool {
        match self.junction() {
            Some(junction) => section.touches(junction),
            None => &self.section == section,
        }
    }

    /// Checks the class invariant. Only intended for tests.
    pub fn check_invariant(&self) -> bool {
        self.section.has_endpoint(&self.endpoint) && self.offset < self.section.length()
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        if self.offset == 0 && other.offset == 0 {
            return self.endpoint.junction() == other.endpoint.junction();
        }
        if self.endpoint == other.endpoint {
            return self.offset == other.offset;
        }
        self.section == other.section
            && u64::from(self.offset) + u64::from(other.offset) == u64::from(self.section.length())
    }
}

impl Eq for Location {}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.junction() {
            Some(junction) => write!(f, "{}", junction),
            None => write!(
                f,
                "Distance {} from {} along the {} branch",
                self.offset,
                self.endpoint.junction(),
                self.endpoint.branch()
            ),
        }
    }
}
