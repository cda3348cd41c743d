//! Reading and writing track description files.
//!
//! A track file holds one section per line, as five whitespace-separated
//! tokens:
//!
//! ```text
//! <length> <junction> <branch> <junction> <branch>
//! ```
//!
//! The length is a positive integer, junction names contain no whitespace and
//! branches are exactly `FACING`, `NORMAL` or `REVERSE`. Leading and trailing
//! whitespace is allowed. No two lines may describe the same section and no
//! two sections may share an endpoint.
//!
//! ```rust
//! use rs_interlock::reader::parse_track;
//!
//! let track = parse_track("9 j0 FACING j1 FACING\n5 j1 NORMAL j2 REVERSE\n").unwrap();
//! assert_eq!(track.len(), 2);
//!
//! let err = parse_track("9 j0 FACING j1 FACING\n5 j0 FACING j2 NORMAL\n").unwrap_err();
//! assert_eq!(err.line, 2);
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::branch::Branch;
use crate::config::ReaderConfig;
use crate::error::{InvalidArgument, ParseBranchError};
use crate::junction::{Endpoint, Junction};
use crate::section::Section;
use crate::track::Track;

// ============================================================================
// Errors
// ============================================================================

/// What was wrong with a line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormatErrorKind {
    /// A line must hold exactly five tokens.
    #[error("expected 5 tokens, found {found}")]
    WrongTokenCount {
        /// Number of tokens on the line.
        found: usize,
    },

    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// The first token is not a positive integer.
    #[error("length `{0}` is not a positive integer")]
    InvalidLength(String),

    /// A junction name was rejected.
    #[error("invalid junction name: {0}")]
    InvalidJunction(InvalidArgument),

    /// A branch token is not one of the three keywords.
    #[error(transparent)]
    UnknownBranch(#[from] ParseBranchError),

    /// The tokens do not form a valid section.
    #[error("invalid section: {0}")]
    InvalidSection(InvalidArgument),

    /// The section was already described on an earlier line.
    #[error("duplicate of the section on line {first_line}")]
    DuplicateSection {
        /// Line holding the first description.
        first_line: usize,
    },

    /// An endpoint is already used by the section on an earlier line.
    #[error("endpoint {endpoint} is already used on line {first_line}")]
    SharedEndpoint {
        /// The endpoint used twice.
        endpoint: Endpoint,
        /// Line holding the section that uses it first.
        first_line: usize,
    },
}

/// A malformed line in a track description.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}: `{text}`")]
pub struct FormatError {
    /// 1-based line number.
    pub line: usize,
    /// The offending line as read.
    pub text: String,
    /// What was wrong with it.
    pub kind: FormatErrorKind,
}

/// Failure to load a track file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The file could not be read.
    #[error("failed to read track file: {0}")]
    Io(#[from] io::Error),

    /// The file content is not a valid track description.
    #[error(transparent)]
    Format(#[from] FormatError),
}

// ============================================================================
// Reader
// ============================================================================

/// Builds a [`Track`] from a line-oriented description.
#[derive(Clone, Debug, Default)]
pub struct TrackReader {
    config: ReaderConfig,
}

impl TrackReader {
    /// Creates a reader with the given configuration.
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Parses a description held in memory.
    pub fn parse(&self, text: &str) -> Result<Track, FormatError> {
        let mut builder = Builder::default();
        for (index, line) in text.lines().enumerate() {
            builder.line(&self.config, index + 1, line)?;
        }
        Ok(builder.track)
    }

    /// Reads a description from any buffered source.
    pub fn from_reader<R: BufRead>(&self, reader: R) -> Result<Track, ReadError> {
        let mut builder = Builder::default();
        for (index, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    return Err(FormatError {
                        line: index + 1,
                        text: String::new(),
                        kind: FormatErrorKind::InvalidUtf8,
                    }
                    .into());
                }
                Err(err) => return Err(err.into()),
            };
            builder.line(&self.config, index + 1, &line)?;
        }
        Ok(builder.track)
    }

    /// Reads the description stored at `path`.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Track, ReadError> {
        let path = path.as_ref();
        let track = self.from_reader(BufReader::new(File::open(path)?))?;
        tracing::debug!(path = %path.display(), sections = track.len(), "track loaded");
        Ok(track)
    }
}

/// Parses a description with the strict default configuration.
pub fn parse_track(text: &str) -> Result<Track, FormatError> {
    TrackReader::default().parse(text)
}

/// Reads the file at `path` with the strict default configuration.
pub fn read_track(path: impl AsRef<Path>) -> Result<Track, ReadError> {
    TrackReader::default().read(path)
}

/// Writes `track` in the format [`parse_track`] reads, one section per line.
pub fn write_track<W: Write>(track: &Track, mut out: W) -> io::Result<()> {
    for section in track {
        let [first, second] = section.endpoints();
        writeln!(
            out,
            "{} {} {} {} {}",
            section.length(),
            first.junction(),
            first.branch(),
            second.junction(),
            second.branch()
        )?;
    }
    Ok(())
}

/// Accumulates sections and remembers which line introduced each one.
#[derive(Default)]
struct Builder {
    track: Track,
    lines: BTreeMap<Section, usize>,
}

impl Builder {
    fn line(&mut self, config: &ReaderConfig, number: usize, text: &str) -> Result<(), FormatError> {
        if config.ignores(text) {
            return Ok(());
        }
        let fail = |kind| FormatError {
            line: number,
            text: text.into(),
            kind,
        };

        let section = parse_section(text).map_err(fail)?;
        if let Some(&first_line) = self.lines.get(&section) {
            return Err(fail(FormatErrorKind::DuplicateSection { first_line }));
        }
        if let Err(clash) = self.track.add_section(section.clone()) {
            let first_line = self.lines.get(&clash.existing).copied().unwrap_or_default();
            return Err(fail(FormatErrorKind::SharedEndpoint {
                endpoint: clash.endpoint,
                first_line,
            }));
        }
        self.lines.insert(section, number);
        Ok(())
    }
}

fn parse_section(text: &str) -> Result<Section, FormatErrorKind> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let &[length, j1, b1, j2, b2] = tokens.as_slice() else {
        return Err(FormatErrorKind::WrongTokenCount {
            found: tokens.len(),
        });
    };
    let length = match length.parse::<u32>() {
        Ok(length) if length > 0 => length,
        _ => return Err(FormatErrorKind::InvalidLength(length.into())),
    };
    let first = parse_endpoint(j1, b1)?;
    let second = parse_endpoint(j2, b2)?;
    Section::new(length, first, second).map_err(FormatErrorKind::InvalidSection)
}

fn parse_endpoint(junction: &str, branch: &str) -> Result<Endpoint, FormatErrorKind> {
    let junction = Junction::new(junction).map_err(FormatErrorKind::InvalidJunction)?;
    let branch: Branch = branch.parse()?;
    Ok(Endpoint::new(junction, branch))
}
