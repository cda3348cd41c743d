//! Routes: contiguous paths made of segments.
//!
//! A [`Route`] describes either where a train currently is (its occupied
//! route) or where it wants to go (its requested route). Consecutive segments
//! must meet at a junction: each segment before the last runs up to its
//! approaching junction and the next one departs from that same junction at
//! offset 0.
//!
//! The allocator's output can be the empty route, meaning the train is held
//! where it is. [`Route::new`] never builds one; use [`Route::empty`].
//!
//! ```rust
//! use rs_interlock::{Branch, Endpoint, Junction, Route, Section, Segment};
//!
//! let ep = |j: &str, b| Endpoint::new(Junction::new(j).unwrap(), b);
//! let s1 = Section::new(10, ep("j1", Branch::Facing), ep("j2", Branch::Normal)).unwrap();
//! let s2 = Section::new(6, ep("j2", Branch::Facing), ep("j3", Branch::Normal)).unwrap();
//!
//! let route = Route::new(vec![
//!     Segment::new(s1, ep("j1", Branch::Facing), 4, 10).unwrap(),
//!     Segment::new(s2, ep("j2", Branch::Facing), 0, 3).unwrap(),
//! ])
//! .unwrap();
//!
//! assert_eq!(route.len(), 2);
//! assert_eq!(route.total_length(), 9);
//! ```

use alloc::vec::Vec;

use crate::error::InvalidArgument;
use crate::segment::Segment;

/// An ordered, contiguous sequence of segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Segment>", into = "Vec<Segment>")
)]
pub struct Route {
    segments: Vec<Segment>,
}

impl Route {
    /// Creates a route from its segments in travel order.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::EmptyRoute`] for an empty list and
    /// [`InvalidArgument::DisconnectedRoute`] if two consecutive segments do
    /// not meet at a junction.
    pub fn new(segments: Vec<Segment>) -> Result<Self, InvalidArgument> {
        if segments.is_empty() {
            return Err(InvalidArgument::EmptyRoute);
        }
        if let Some(index) = segments
            .windows(2)
            .position(|pair| !Self::meet(&pair[0], &pair[1]))
        {
            return Err(InvalidArgument::DisconnectedRoute { index });
        }
        Ok(Self { segments })
    }

    /// A route made of a single segment.
    pub fn single(segment: Segment) -> Self {
        Self {
            segments: alloc::vec![segment],
        }
    }

    /// The empty route: a train allocated this is held in place.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a route from a prefix of an already validated route.
    pub(crate) fn from_prefix(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    fn meet(first: &Segment, next: &Segment) -> bool {
        first.arrival_junction().is_some()
            && first.arrival_junction() == next.departure_junction()
    }

    /// The segments in travel order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Iterates over the segments in travel order.
    pub fn iter(&self) -> core::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the held (empty) route.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The first segment, if any.
    pub fn first(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// The last segment, if any.
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Sum of the segment lengths.
    pub fn total_length(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.len())).sum()
    }

    /// Returns true if any point of this route is a point of `other`.
    pub fn intersects(&self, other: &Route) -> bool {
        self.segments
            .iter()
            .any(|mine| other.segments.iter().any(|theirs| mine.intersects(theirs)))
    }

    /// Returns true if this route is a prefix of `other`.
    ///
    /// A prefix has the same leading segments as `other`; its last segment
    /// may end earlier than the corresponding segment of `other` but must
    /// start at the same offset in the same direction. The empty route is a
    /// prefix of every route.
    pub fn is_prefix_of(&self, other: &Route) -> bool {
        let Some((last, leading)) = self.segments.split_last() else {
            return true;
        };
        if self.len() > other.len() || leading != &other.segments[..leading.len()] {
            return false;
        }
        let candidate = &other.segments[leading.len()];
        last.section() == candidate.section()
            && last.departing_endpoint() == candidate.departing_endpoint()
            && last.start_offset() == candidate.start_offset()
            && last.end_offset() <= candidate.end_offset()
    }

    /// Checks the class invariant. Only intended for tests.
    pub fn check_invariant(&self) -> bool {
        self.segments.iter().all(Segment::check_invariant)
            && self
                .segments
                .windows(2)
                .all(|pair| Self::meet(&pair[0], &pair[1]))
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a Segment;
    type IntoIter = core::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl From<Segment> for Route {
    fn from(segment: Segment) -> Self {
        Route::single(segment)
    }
}

/// An empty list converts to the held route; anything else must be a valid
/// route.
impl TryFrom<Vec<Segment>> for Route {
    type Error = InvalidArgument;

    fn try_from(segments: Vec<Segment>) -> Result<Self, Self::Error> {
        if segments.is_empty() {
            Ok(Route::empty())
        } else {
            Route::new(segments)
        }
    }
}

impl From<Route> for Vec<Segment> {
    fn from(route: Route) -> Self {
        route.segments
    }
}
