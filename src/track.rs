//! The track graph container.
//!
//! A [`Track`] owns a set of sections and enforces that every endpoint is
//! attached to at most one of them. Adding a section is validated before
//! anything is mutated, so a failed [`Track::add_section`] leaves the track
//! exactly as it was.
//!
//! ```rust
//! use rs_interlock::{Branch, Endpoint, Junction, Section, Track};
//!
//! let ep = |j: &str, b| Endpoint::new(Junction::new(j).unwrap(), b);
//! let mut track = Track::new();
//!
//! let first = Section::new(9, ep("j0", Branch::Facing), ep("j1", Branch::Facing)).unwrap();
//! track.add_section(first.clone()).unwrap();
//!
//! // j0 FACING is already taken.
//! let clash = Section::new(5, ep("j0", Branch::Facing), ep("j2", Branch::Normal)).unwrap();
//! assert!(track.add_section(clash).is_err());
//!
//! assert_eq!(track.len(), 1);
//! assert!(track.contains(&first));
//! ```
//!
//! # Thread Safety
//!
//! `Track` has no interior mutability. Share it immutably while allocations
//! run and wrap it in a lock if it must be edited from several threads.

use alloc::collections::{BTreeMap, BTreeSet};

use crate::branch::Branch;
use crate::error::InvalidTopology;
use crate::junction::{Endpoint, Junction};
use crate::section::Section;
use crate::traits::Topology;

/// A railway layout: sections joined at junctions.
///
/// # Invariant
///
/// `by_endpoint` maps each endpoint of each section in `sections` to that
/// section and holds nothing else, so no endpoint is shared by two sections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Track {
    sections: BTreeSet<Section>,
    by_endpoint: BTreeMap<Endpoint, Section>,
}

impl Track {
    /// Creates a track with no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a track from sections, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidTopology`] raised by
    /// [`add_section`](Self::add_section).
    pub fn from_sections<I>(sections: I) -> Result<Self, InvalidTopology>
    where
        I: IntoIterator<Item = Section>,
    {
        let mut track = Self::new();
        for section in sections {
            track.add_section(section)?;
        }
        Ok(track)
    }

    /// Adds a section to the track.
    ///
    /// Adding a section that is already present is a no-op.
    ///
    /// # Errors
    ///
    /// [`InvalidTopology`] if one of the section's endpoints is already
    /// attached to a different section. The track is not modified.
    pub fn add_section(&mut self, section: Section) -> Result<(), InvalidTopology> {
        if self.sections.contains(&section) {
            return Ok(());
        }
        for endpoint in section.endpoints() {
            if let Some(existing) = self.by_endpoint.get(endpoint) {
                return Err(InvalidTopology {
                    endpoint: endpoint.clone(),
                    existing: existing.clone(),
                });
            }
        }
        for endpoint in section.endpoints() {
            self.by_endpoint.insert(endpoint.clone(), section.clone());
        }
        tracing::debug!(%section, "section added");
        self.sections.insert(section);
        Ok(())
    }

    /// Removes the section equal to `section`, if present.
    ///
    /// Returns true if a section was removed.
    pub fn remove_section(&mut self, section: &Section) -> bool {
        if !self.sections.remove(section) {
            return false;
        }
        for endpoint in section.endpoints() {
            self.by_endpoint.remove(endpoint);
        }
        tracing::debug!(%section, "section removed");
        true
    }

    /// Returns true if the track holds a section equal to `section`.
    pub fn contains(&self, section: &Section) -> bool {
        self.sections.contains(section)
    }

    /// Every junction attached to at least one section.
    pub fn junctions(&self) -> BTreeSet<Junction> {
        self.by_endpoint
            .keys()
            .map(|endpoint| endpoint.junction().clone())
            .collect()
    }

    /// The section attached to `junction` on `branch`, if any.
    pub fn track_section(&self, junction: &Junction, branch: Branch) -> Option<&Section> {
        self.section_at(&Endpoint::new(junction.clone(), branch))
    }

    /// The section attached to `endpoint`, if any.
    pub fn section_at(&self, endpoint: &Endpoint) -> Option<&Section> {
        self.by_endpoint.get(endpoint)
    }

    /// Iterates over the sections.
    pub fn iter(&self) -> impl Iterator<Item = &Section> + '_ {
        self.sections.iter()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if the track has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Checks the class invariant. Only intended for tests.
    pub fn check_invariant(&self) -> bool {
        self.by_endpoint.len() == 2 * self.sections.len()
            && self.sections.iter().all(|section| {
                section.check_invariant()
                    && section
                        .endpoints()
                        .iter()
                        .all(|endpoint| self.by_endpoint.get(endpoint) == Some(section))
            })
    }
}

impl Topology for Track {
    fn section_at(&self, endpoint: &Endpoint) -> Option<&Section> {
        Track::section_at(self, endpoint)
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Section;
    type IntoIter = alloc::collections::btree_set::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl core::fmt::Display for Track {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}
