//! Position and location types shared by the tree and the symbol engine.
//!
//! Positions follow editor conventions: 0-indexed line and column. A
//! `Locality` is where a node was written (document URI, range, and the
//! copybook it came from, if any); a `Location` is the slimmer value that is
//! stored in definition/usage lists and handed back to navigation features.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A position in a source document (0-indexed line and column).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.character.cmp(&other.character))
    }
}

/// A range in a source document. Both ends are inclusive for containment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Range { start, end }
    }

    /// Shorthand for a range on a single line.
    pub const fn on_line(line: u32, start: u32, end: u32) -> Self {
        Range {
            start: Position::new(line, start),
            end: Position::new(line, end),
        }
    }

    /// Whether `position` falls inside this range (inclusive on both ends).
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }

    /// Whether `other` lies completely within this range.
    pub fn contains_range(&self, other: &Range) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }
}

/// A location in a document (URI + range).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub uri: String,
    pub range: Range,
}

impl Location {
    pub fn new(uri: impl Into<String>, range: Range) -> Self {
        Location {
            uri: uri.into(),
            range,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.uri,
            self.range.start.line + 1,
            self.range.start.character + 1
        )
    }
}

/// Where a node was authored.
///
/// `copybook_id` is set when the text was pulled in from a copybook; the URI
/// then points at the copybook document rather than the program document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locality {
    pub uri: String,
    pub range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copybook_id: Option<String>,
}

impl Locality {
    pub fn new(uri: impl Into<String>, range: Range) -> Self {
        Locality {
            uri: uri.into(),
            range,
            copybook_id: None,
        }
    }

    #[must_use]
    pub fn with_copybook(mut self, copybook_id: impl Into<String>) -> Self {
        self.copybook_id = Some(copybook_id.into());
        self
    }

    pub fn to_location(&self) -> Location {
        Location::new(self.uri.clone(), self.range)
    }
}
