//! Junctions and the endpoints sections attach to.
//!
//! A [`Junction`] is nothing more than a validated name. An [`Endpoint`]
//! pairs a junction with one of its three [`Branch`]es and is the unit the
//! track uses to enforce "one section per connection slot".
//!
//! Names are stored inline in a `heapless::String`, so junctions stay cheap to
//! clone and usable without an allocator.
//!
//! ```rust
//! use rs_interlock::{Branch, Endpoint, Junction};
//!
//! let j1 = Junction::new("j1").unwrap();
//! let endpoint = Endpoint::new(j1.clone(), Branch::Facing);
//!
//! assert_eq!(endpoint.junction(), &j1);
//! assert_eq!(endpoint.to_string(), "(j1, FACING)");
//!
//! assert!(Junction::new("two words").is_err());
//! ```

use alloc::string::ToString;

use heapless::String as HString;

use crate::branch::Branch;
use crate::error::InvalidArgument;

/// Maximum length of a junction name in bytes.
pub const MAX_JUNCTION_NAME: usize = 32;

/// Inline storage for junction names.
pub type JunctionName = HString<MAX_JUNCTION_NAME>;

// ============================================================================
// Junction
// ============================================================================

/// A named node of the track graph.
///
/// Two junctions are equal if and only if their names are equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "JunctionName", into = "JunctionName")
)]
pub struct Junction {
    name: JunctionName,
}

impl Junction {
    /// Creates a junction with the given name.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty, contains whitespace, or is longer than
    /// [`MAX_JUNCTION_NAME`] bytes.
    pub fn new(name: &str) -> Result<Self, InvalidArgument> {
        if name.is_empty() {
            return Err(InvalidArgument::EmptyJunctionName);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(InvalidArgument::WhitespaceInJunctionName(name.to_string()));
        }
        let mut stored = JunctionName::new();
        stored
            .push_str(name)
            .map_err(|_| InvalidArgument::JunctionNameTooLong {
                len: name.len(),
                max: MAX_JUNCTION_NAME,
            })?;
        Ok(Self { name: stored })
    }

    /// Returns the junction's name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl core::fmt::Display for Junction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<JunctionName> for Junction {
    type Error = InvalidArgument;

    fn try_from(name: JunctionName) -> Result<Self, Self::Error> {
        Junction::new(name.as_str())
    }
}

impl From<Junction> for JunctionName {
    fn from(junction: Junction) -> Self {
        junction.name
    }
}

// ============================================================================
// Endpoint
// ============================================================================

/// A (junction, branch) pair: one connection point of a junction.
///
/// Equality is structural.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    junction: Junction,
    branch: Branch,
}

impl Endpoint {
    /// Creates an endpoint.
    pub fn new(junction: Junction, branch: Branch) -> Self {
        Self { junction, branch }
    }

    /// The junction of this endpoint.
    pub fn junction(&self) -> &Junction {
        &self.junction
    }

    /// The branch of this endpoint.
    pub fn branch(&self) -> Branch {
        self.branch
    }
}

impl core::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.junction, self.branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn junction_equality_is_by_name() {
        assert_eq!(Junction::new("j1").unwrap(), Junction::new("j1").unwrap());
        assert_ne!(Junction::new("j1").unwrap(), Junction::new("j2").unwrap());
    }

    #[test]
    fn junction_name_validation() {
        assert_eq!(Junction::new(""), Err(InvalidArgument::EmptyJunctionName));
        assert!(matches!(
            Junction::new("a\tb"),
            Err(InvalidArgument::WhitespaceInJunctionName(_))
        ));

        let long = "x".repeat(MAX_JUNCTION_NAME + 1);
        assert_eq!(
            Junction::new(&long),
            Err(InvalidArgument::JunctionNameTooLong {
                len: MAX_JUNCTION_NAME + 1,
                max: MAX_JUNCTION_NAME,
            })
        );

        let exact = "x".repeat(MAX_JUNCTION_NAME);
        assert_eq!(Junction::new(&exact).unwrap().name(), exact);
    }

    #[test]
    fn junction_accepts_punctuation() {
        let junction = Junction::new("yard-3/east").unwrap();
        assert_eq!(junction.to_string(), "yard-3/east");
    }

    #[test]
    fn endpoint_equality_is_structural() {
        let j1 = Junction::new("j1").unwrap();
        let a = Endpoint::new(j1.clone(), Branch::Facing);
        let b = Endpoint::new(Junction::new("j1").unwrap(), Branch::Facing);
        let c = Endpoint::new(j1, Branch::Normal);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn endpoint_display() {
        let endpoint = Endpoint::new(Junction::new("j2").unwrap(), Branch::Normal);
        assert_eq!(endpoint.to_string(), "(j2, NORMAL)");
    }
}
