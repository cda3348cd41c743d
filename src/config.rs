//! Configuration for the allocator and the track reader.
//!
//! Plain data with builder-style setters. Every type has a `Default` that
//! reproduces the strict behaviour, so most callers never touch this module.
//!
//! # Example
//!
//! ```rust
//! use rs_interlock::config::{AllocatorConfig, Config, ReaderConfig};
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.allocator.clearance, 1);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_allocator(AllocatorConfig::default().with_clearance(2))
//!     .with_reader(ReaderConfig::default().with_comment_prefix('#'));
//! ```

// ============================================================================
// Main Config
// ============================================================================

/// Complete configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Allocator behaviour
    pub allocator: AllocatorConfig,
    /// Track file parsing
    pub reader: ReaderConfig,
}

impl Config {
    /// Set allocator configuration
    pub fn with_allocator(mut self, allocator: AllocatorConfig) -> Self {
        self.allocator = allocator;
        self
    }

    /// Set reader configuration
    pub fn with_reader(mut self, reader: ReaderConfig) -> Self {
        self.reader = reader;
        self
    }
}

// ============================================================================
// Allocator Config
// ============================================================================

/// Smallest allowed clearance.
pub const MIN_CLEARANCE: u32 = 1;

/// Allocator configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AllocatorConfig {
    /// Distance kept between a truncated allocation and the point it was
    /// truncated for. Values below [`MIN_CLEARANCE`] are treated as
    /// [`MIN_CLEARANCE`].
    pub clearance: u32,
    /// Re-check every allocation against the inputs before returning it.
    pub verify_postconditions: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            clearance: MIN_CLEARANCE,
            verify_postconditions: cfg!(debug_assertions),
        }
    }
}

impl AllocatorConfig {
    /// Set the clearance, clamped to at least [`MIN_CLEARANCE`]
    pub fn with_clearance(mut self, clearance: u32) -> Self {
        self.clearance = clearance.max(MIN_CLEARANCE);
        self
    }

    /// Enable or disable the postcondition check
    pub fn with_verify_postconditions(mut self, verify: bool) -> Self {
        self.verify_postconditions = verify;
        self
    }

    /// The clearance actually applied.
    pub fn effective_clearance(&self) -> u32 {
        self.clearance.max(MIN_CLEARANCE)
    }
}

// ============================================================================
// Reader Config
// ============================================================================

/// Track file reader configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReaderConfig {
    /// Ignore lines that are empty or whitespace only
    pub skip_blank_lines: bool,
    /// Ignore lines whose first non-blank character is this one
    pub comment_prefix: Option<char>,
}

impl ReaderConfig {
    /// Set whether blank lines are ignored
    pub fn with_skip_blank_lines(mut self, skip: bool) -> Self {
        self.skip_blank_lines = skip;
        self
    }

    /// Set the comment prefix
    pub fn with_comment_prefix(mut self, prefix: char) -> Self {
        self.comment_prefix = Some(prefix);
        self
    }

    /// Returns true if `line` carries no section and should be skipped.
    pub fn ignores(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        if self.skip_blank_lines && trimmed.is_empty() {
            return true;
        }
        match self.comment_prefix {
            Some(prefix) => trimmed.starts_with(prefix),
            None => false,
        }
    }
}
