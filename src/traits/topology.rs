//! The read-only view of a track that the allocator needs.
//!
//! The allocator only has to answer "is this section part of the layout?",
//! which in turn only needs the endpoint lookup. [`Track`](crate::Track) is
//! the usual implementation; tests and embedded callers can provide a
//! fixed table instead.
//!
//! # Example
//!
//! ```rust
//! use rs_interlock::traits::Topology;
//! use rs_interlock::{Branch, Endpoint, Junction, Section, Track};
//!
//! let ep = |j: &str, b| Endpoint::new(Junction::new(j).unwrap(), b);
//! let section = Section::new(4, ep("a", Branch::Facing), ep("b", Branch::Normal)).unwrap();
//! let mut track = Track::new();
//! track.add_section(section.clone()).unwrap();
//!
//! fn knows<T: Topology>(topology: &T, section: &Section) -> bool {
//!     topology.contains(section)
//! }
//! assert!(knows(&track, &section));
//! ```

use crate::junction::Endpoint;
use crate::route::Route;
use crate::section::Section;

/// Endpoint-to-section lookup over a consistent layout.
///
/// Implementations must attach each endpoint to at most one section.
pub trait Topology {
    /// The section attached to `endpoint`, if any.
    fn section_at(&self, endpoint: &Endpoint) -> Option<&Section>;

    /// Returns true if `section` is part of the layout.
    fn contains(&self, section: &Section) -> bool {
        section
            .endpoints()
            .iter()
            .all(|endpoint| self.section_at(endpoint) == Some(section))
    }

    /// Index of the first segment of `route` that is not on the layout.
    fn first_foreign_segment(&self, route: &Route) -> Option<usize> {
        route
            .iter()
            .position(|segment| !self.contains(segment.section()))
    }

    /// Returns true if every segment of `route` lies on the layout.
    fn contains_route(&self, route: &Route) -> bool {
        self.first_foreign_segment(route).is_none()
    }
}

impl<T: Topology + ?Sized> Topology for &T {
    fn section_at(&self, endpoint: &Endpoint) -> Option<&Section> {
        (**self).section_at(endpoint)
    }
}
