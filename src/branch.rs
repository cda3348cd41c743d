//! The three connection slots a junction offers.
//!
//! A junction has at most one section attached on each branch. Branch
//! keywords appear verbatim in the persisted track format, so parsing is
//! strict: only the exact upper-case keywords are accepted.
//!
//! ```rust
//! use rs_interlock::Branch;
//!
//! let branch: Branch = "REVERSE".parse().unwrap();
//! assert_eq!(branch, Branch::Reverse);
//! assert_eq!(branch.as_str(), "REVERSE");
//!
//! assert!("reverse".parse::<Branch>().is_err());
//! ```

use alloc::string::ToString;
use core::str::FromStr;

use crate::error::ParseBranchError;

/// Connection slot of a junction.
///
/// The ordering (`Facing < Normal < Reverse`) is only used to give endpoints
/// a canonical order; it carries no railway meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Branch {
    /// The facing (toe) side of a set of points.
    Facing,
    /// The straight-through side.
    Normal,
    /// The diverging side.
    Reverse,
}

impl Branch {
    /// Every branch, in canonical order.
    pub const ALL: [Branch; 3] = [Branch::Facing, Branch::Normal, Branch::Reverse];

    /// Returns the keyword used for this branch in track files.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_interlock::Branch;
    ///
    /// assert_eq!(Branch::Facing.as_str(), "FACING");
    /// assert_eq!(Branch::Normal.as_str(), "NORMAL");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Branch::Facing => "FACING",
            Branch::Normal => "NORMAL",
            Branch::Reverse => "REVERSE",
        }
    }
}

impl core::fmt::Display for Branch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = ParseBranchError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|branch| branch.as_str() == token)
            .ok_or_else(|| ParseBranchError(token.to_string()))
    }
}
