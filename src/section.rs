//! Sections: the length-bearing edges of the track graph.
//!
//! A section joins two distinct endpoints. The endpoints may belong to the
//! same junction (on two different branches), which forms a loop.
//!
//! Sections are values. Two sections are equal when their lengths match and
//! their endpoint sets match, regardless of the order the endpoints were
//! given in:
//!
//! ```rust
//! use rs_interlock::{Branch, Endpoint, Junction, Section};
//!
//! let a = Endpoint::new(Junction::new("j1").unwrap(), Branch::Facing);
//! let b = Endpoint::new(Junction::new("j2").unwrap(), Branch::Normal);
//!
//! let forward = Section::new(9, a.clone(), b.clone()).unwrap();
//! let backward = Section::new(9, b.clone(), a.clone()).unwrap();
//! assert_eq!(forward, backward);
//!
//! assert_eq!(forward.other_endpoint(&a).unwrap(), &b);
//! ```

use crate::error::InvalidArgument;
use crate::junction::{Endpoint, Junction};

/// An edge of the track graph.
///
/// # Invariant
///
/// `length > 0` and the two endpoints differ. The endpoints are kept in
/// canonical (sorted) order so the derived equality, ordering and hashing are
/// independent of construction order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "SectionRecord", into = "SectionRecord")
)]
pub struct Section {
    length: u32,
    endpoints: [Endpoint; 2],
}

impl Section {
    /// Creates a section of the given length between two endpoints.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::NonPositiveLength`] if `length` is zero and
    /// [`InvalidArgument::DuplicateEndpoint`] if both endpoints are equal.
    pub fn new(length: u32, first: Endpoint, second: Endpoint) -> Result<Self, InvalidArgument> {
        if length == 0 {
            return Err(InvalidArgument::NonPositiveLength);
        }
        if first == second {
            return Err(InvalidArgument::DuplicateEndpoint(first));
        }
        let endpoints = if first < second {
            [first, second]
        } else {
            [second, first]
        };
        Ok(Self { length, endpoints })
    }

    /// Length of the section.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Both endpoints, in canonical order.
    pub fn endpoints(&self) -> &[Endpoint; 2] {
        &self.endpoints
    }

    /// Returns true if `endpoint` is one of this section's endpoints.
    pub fn has_endpoint(&self, endpoint: &Endpoint) -> bool {
        self.endpoints.contains(endpoint)
    }

    /// Returns the endpoint at the opposite end from `endpoint`.
    ///
    /// # Errors
    ///
    /// [`InvalidArgument::ForeignEndpoint`] if `endpoint` is not one of this
    /// section's endpoints.
    pub fn other_endpoint(&self, endpoint: &Endpoint) -> Result<&Endpoint, InvalidArgument> {
        match &self.endpoints {
            [a, b] if a == endpoint => Ok(b),
            [a, b] if b == endpoint => Ok(a),
            _ => Err(InvalidArgument::ForeignEndpoint(endpoint.clone())),
        }
    }

    /// The junctions at either end (equal for a loop).
    pub fn junctions(&self) -> [&Junction; 2] {
        [self.endpoints[0].junction(), self.endpoints[1].junction()]
    }

    /// Returns true if both ends attach to the same junction.
    pub fn is_loop(&self) -> bool {
        self.endpoints[0].junction() == self.endpoints[1].junction()
    }

    /// Returns true if either end attaches to `junction`.
    pub fn touches(&self, junction: &Junction) -> bool {
        self.junctions().contains(&junction)
    }

    /// Checks the class invariant. Only intended for tests.
    pub fn check_invariant(&self) -> bool {
        self.length > 0 && self.endpoints[0] < self.endpoints[1]
    }
}

impl core::fmt::Display for Section {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.length, self.endpoints[0], self.endpoints[1]
        )
    }
}

// ============================================================================
// Serialization
// ============================================================================

/// Unvalidated wire form of a [`Section`].
#[cfg(feature = "serde")]
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct SectionRecord {
    length: u32,
    endpoints: [Endpoint; 2],
}

#[cfg(feature = "serde")]
impl TryFrom<SectionRecord> for Section {
    type Error = InvalidArgument;

    fn try_from(record: SectionRecord) -> Result<Self, Self::Error> {
        let [first, second] = record.endpoints;
        Section::new(record.length, first, second)
    }
}

#[cfg(feature = "serde")]
impl From<Section> for SectionRecord {
    fn from(section: Section) -> Self {
        Self {
            length: section.length,
            endpoints: section.endpoints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branch::Branch;
    use alloc::string::ToString;

    fn endpoint(name: &str, branch: Branch) -> Endpoint {
        Endpoint::new(Junction::new(name).unwrap(), branch)
    }

    #[test]
    fn rejects_zero_length() {
        let result = Section::new(
            0,
            endpoint("j1", Branch::Facing),
            endpoint("j2", Branch::Normal),
        );
        assert_eq!(result, Err(InvalidArgument::NonPositiveLength));
    }

    #[test]
    fn rejects_equal_endpoints() {
        let e = endpoint("j1", Branch::Facing);
        assert_eq!(
            Section::new(5, e.clone(), e.clone()),
            Err(InvalidArgument::DuplicateEndpoint(e))
        );
    }

    #[test]
    fn loop_on_two_branches_is_allowed() {
        let section = Section::new(
            20,
            endpoint("j1", Branch::Normal),
            endpoint("j1", Branch::Reverse),
        )
        .unwrap();
        assert!(section.is_loop());
        assert!(section.check_invariant());
    }

    #[test]
    fn equality_ignores_endpoint_order_but_not_length() {
        let a = endpoint("j1", Branch::Facing);
        let b = endpoint("j2", Branch::Normal);
        let s1 = Section::new(9, a.clone(), b.clone()).unwrap();
        let s2 = Section::new(9, b.clone(), a.clone()).unwrap();
        let s3 = Section::new(10, a, b).unwrap();
        assert_eq!(s1, s2);
        assert_ne!(s1, s3);
    }

    #[test]
    fn other_endpoint_round_trip() {
        let a = endpoint("j1", Branch::Facing);
        let b = endpoint("j2", Branch::Normal);
        let section = Section::new(9, b.clone(), a.clone()).unwrap();
        assert_eq!(section.other_endpoint(&a), Ok(&b));
        assert_eq!(section.other_endpoint(&b), Ok(&a));

        let stranger = endpoint("j3", Branch::Facing);
        assert_eq!(
            section.other_endpoint(&stranger),
            Err(InvalidArgument::ForeignEndpoint(stranger))
        );
    }

    #[test]
    fn display_lists_length_then_endpoints() {
        let section = Section::new(
            9,
            endpoint("j2", Branch::Normal),
            endpoint("j1", Branch::Facing),
        )
        .unwrap();
        assert_eq!(section.to_string(), "9 (j1, FACING) (j2, NORMAL)");
    }
}
