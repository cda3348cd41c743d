//! Segments: directed sub-ranges of a single section.
//!
//! A [`Segment`] says "this much of this section, travelled from this
//! endpoint towards the other". Offsets are measured from the departing
//! endpoint and satisfy `0 <= start <= end <= length`. An end offset equal to
//! the section length means the segment reaches the approaching junction;
//! a start offset of 0 means it begins at the departing junction.
//!
//! ```rust
//! use rs_interlock::{Branch, Endpoint, Junction, Location, Section, Segment};
//!
//! let j1 = Endpoint::new(Junction::new("j1").unwrap(), Branch::Facing);
//! let j2 = Endpoint::new(Junction::new("j2").unwrap(), Branch::Normal);
//! let section = Section::new(10, j1.clone(), j2.clone()).unwrap();
//!
//! let segment = Segment::new(section.clone(), j1, 2, 6).unwrap();
//! assert_eq!(segment.approaching_endpoint(), &j2);
//!
//! // 5 units from j2 is 5 units from j1: inside [2, 6].
//! let point = Location::new(section, j2, 5).unwrap();
//! assert!(segment.contains(&point));
//! ```

use crate::error::InvalidArgument;
use crate::junction::{Endpoint, Junction};
use crate::location::Location;
use crate::section::Section;

/// A directed sub-range of one section.
///
/// # Invariant
///
/// `departing` is an endpoint of `section` and
/// `start <= end <= section.length()`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "SegmentRecord", into = "SegmentRecord")
)]
pub struct Segment {
    section: Section,
    departing: Endpoint,
    start: u32,
    end: u32,
}

impl Segment {
    /// Creates the segment `[start, end]` of `section`, travelled from
    /// `departing`.
    ///
    /// # Errors
    ///
    /// Fails if `departing` is not an endpoint of `section`, if
    /// `start > end`, or if `end` exceeds the section length.
    pub fn new(
        section: Section,
        departing: Endpoint,
        start: u32,
        end: u32,
    ) -> Result<Self, InvalidArgument> {
        if !section.has_endpoint(&departing) {
            return Err(InvalidArgument::ForeignEndpoint(departing));
        }
        if start > end {
            return Err(InvalidArgument::ReversedOffsets { start, end });
        }
        if end > section.length() {
            return Err(InvalidArgument::OffsetOutOfRange {
                offset: end,
                length: section.length(),
            });
        }
        Ok(Self {
            section,
            departing,
            start,
            end,
        })
    }

    /// The whole section, travelled from `departing`.
    ///
    /// # Errors
    ///
    /// Fails if `departing` is not an endpoint of `section`.
    pub fn full(section: Section, departing: Endpoint) -> Result<Self, InvalidArgument> {
        let length = section.length();
        Self::new(section, departing, 0, length)
    }

    /// The section this segment lies on.
    pub fn section(&self) -> &Section {
        &self.section
    }

    /// The endpoint travel starts from; offsets are measured from here.
    pub fn departing_endpoint(&self) -> &Endpoint {
        &self.departing
    }

    /// The endpoint travel heads towards.
    pub fn approaching_endpoint(&self) -> &Endpoint {
        let [a, b] = self.section.endpoints();
        if a == &self.departing {
            b
        } else {
            a
        }
    }

    /// Offset of the first point, from the departing endpoint.
    pub fn start_offset(&self) -> u32 {
        self.start
    }

    /// Offset of the last point, from the departing endpoint.
    pub fn end_offset(&self) -> u32 {
        self.end
    }

    /// Distance covered by the segment.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true for a single-point segment.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The first point of the segment.
    pub fn first_location(&self) -> Location {
        Location::along(&self.section, &self.departing, self.start)
    }

    /// The last point of the segment.
    pub fn last_location(&self) -> Location {
        Location::along(&self.section, &self.departing, self.end)
    }

    /// The departing junction, if the segment starts on it.
    pub fn departure_junction(&self) -> Option<&Junction> {
        (self.start == 0).then(|| self.departing.junction())
    }

    /// The approaching junction, if the segment reaches it.
    pub fn arrival_junction(&self) -> Option<&Junction> {
        (self.end == self.section.length()).then(|| self.approaching_endpoint().junction())
    }

    /// Returns true if the segment starts or ends on `junction`.
    pub fn touches_junction(&self, junction: &Junction) -> bool {
        self.departure_junction() == Some(junction) || self.arrival_junction() == Some(junction)
    }

    /// The segment's range as `(near, far)` offsets measured from `endpoint`,
    /// which must belong to the same section.
    pub(crate) fn span_from(&self, endpoint: &Endpoint) -> (u32, u32) {
        if endpoint == &self.departing {
            (self.start, self.end)
        } else {
            let length = self.section.length();
            (length - self.end, length - self.start)
        }
    }

    /// Returns true if `location` is a point of this segment.
    ///
    /// A location at a junction is contained when the segment starts or ends
    /// on that junction, whichever section the location was described with.
    pub fn contains(&self, location: &Location) -> bool {
        if let Some(junction) = location.junction() {
            return self.touches_junction(junction);
        }
        if location.section() != &self.section {
            return false;
        }
        let offset = if location.endpoint() == &self.departing {
            location.offset()
        } else {
            self.section.length() - location.offset()
        };
        self.start <= offset && offset <= self.end
    }

    /// Returns true if the two segments share at least one point.
    pub fn intersects(&self, other: &Segment) -> bool {
        if self.section == other.section {
            let (near, far) = other.span_from(&self.departing);
            if near <= self.end && self.start <= far {
                return true;
            }
        }
        [self.departure_junction(), self.arrival_junction()]
            .into_iter()
            .flatten()
            .any(|junction| other.touches_junction(junction))
    }

    /// The same segment with its end moved back to `end`.
    ///
    /// Callers guarantee `start <= end <= self.end`.
    pub(crate) fn truncated(&self, end: u32) -> Self {
        debug_assert!(self.start <= end && end <= self.end);
        Self {
            end,
            ..self.clone()
        }
    }

    /// Checks the class invariant. Only intended for tests.
    pub fn check_invariant(&self) -> bool {
        self.section.has_endpoint(&self.departing)
            && self.start <= self.end
            && self.end <= self.section.length()
    }
}

impl core::fmt::Display for Segment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} [{}, {}] of {}",
            self.departing.junction(),
            self.departing.branch(),
            self.start,
            self.end,
            self.section
        )
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Unvalidated wire form of a [`Segment`].
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct SegmentRecord {
    section: Section,
    departing: Endpoint,
    start_offset: u32,
    end_offset: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<SegmentRecord> for Segment {
    type Error = InvalidArgument;

    fn try_from(record: SegmentRecord) -> Result<Self, Self::Error> {
        Segment::new(
            record.section,
            record.departing,
            record.start_offset,
            record.end_offset,
        )
    }
}

#[cfg(feature = "serde")]
impl From<Segment> for SegmentRecord {
    fn from(segment: Segment) -> Self {
        Self {
            section: segment.section,
            departing: segment.departing,
            start_offset: segment.start,
            end_offset: segment.end,
        }
    }
}
