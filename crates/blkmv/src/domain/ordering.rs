//! Comparator set used to produce the deterministic listing order.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::entry::Entry;

/// Key compared by the plain modes and by the tie-break of [`SortMode::Type`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum KeyKind {
    /// Natural (numeric-aware) path comparison.
    #[default]
    Name,
    /// Byte length.
    Size,
    /// Last-modification time.
    ModTime,
}

impl KeyKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::ModTime => "mtime",
        }
    }

    fn compare(self, left: &Entry, right: &Entry) -> Ordering {
        match self {
            Self::Name => natural_cmp(left.path(), right.path()),
            Self::Size => left.size().cmp(&right.size()),
            Self::ModTime => left.modified().cmp(&right.modified()),
        }
    }
}

impl FromStr for KeyKind {
    type Err = ParseSortModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "size" => Ok(Self::Size),
            "mtime" | "time" => Ok(Self::ModTime),
            other => Err(ParseSortModeError(other.to_string())),
        }
    }
}

/// Selected ordering mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortMode {
    #[default]
    Name,
    Size,
    ModTime,
    /// Extension first, ties broken by the secondary key.
    Type(KeyKind),
}

impl SortMode {
    /// Returns the metadata this mode needs on each entry.
    pub fn key_kind(self) -> KeyKind {
        match self {
            Self::Name => KeyKind::Name,
            Self::Size => KeyKind::Size,
            Self::ModTime => KeyKind::ModTime,
            Self::Type(secondary) => secondary,
        }
    }

    fn compare(self, left: &Entry, right: &Entry) -> Ordering {
        match self {
            Self::Name => KeyKind::Name.compare(left, right),
            Self::Size => KeyKind::Size.compare(left, right),
            Self::ModTime => KeyKind::ModTime.compare(left, right),
            Self::Type(secondary) => left
                .extension()
                .cmp(right.extension())
                .then_with(|| secondary.compare(left, right)),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::Size => f.write_str("size"),
            Self::ModTime => f.write_str("mtime"),
            Self::Type(KeyKind::Name) => f.write_str("type"),
            Self::Type(secondary) => write!(f, "type:{}", secondary.as_str()),
        }
    }
}

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Some(secondary) = value.strip_prefix("type:") {
            return secondary
                .parse()
                .map(Self::Type)
                .map_err(|_| ParseSortModeError(value.to_string()));
        }

        match value {
            "type" => Ok(Self::Type(KeyKind::Name)),
            other => match other.parse::<KeyKind>()? {
                KeyKind::Name => Ok(Self::Name),
                KeyKind::Size => Ok(Self::Size),
                KeyKind::ModTime => Ok(Self::ModTime),
            },
        }
    }
}

/// Unknown sort-mode string.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("unknown sort mode `{0}` (expected name, size, mtime, type or type:<name|size|mtime>)")]
pub struct ParseSortModeError(String);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Immutable ordering configuration for one run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OrderingMode {
    pub mode: SortMode,
    pub direction: Direction,
}

impl OrderingMode {
    pub fn new(mode: SortMode, direction: Direction) -> Self {
        Self { mode, direction }
    }

    /// Compares two entries by the selected mode, honoring the direction.
    pub fn compare(&self, left: &Entry, right: &Entry) -> Ordering {
        let ordering = self.mode.compare(left, right);

        match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }

    /// Compares deeper entries first, then by [`OrderingMode::compare`].
    ///
    /// The depth gate is never reversed: children are always reconciled
    /// before their ancestors are checked for emptiness.
    pub fn compare_depth_gated(&self, left: &Entry, right: &Entry) -> Ordering {
        right
            .depth()
            .cmp(&left.depth())
            .then_with(|| self.compare(left, right))
    }
}

/// Byte-wise comparison that orders embedded digit runs numerically.
///
/// When both sides have a digit at the same position, the maximal digit runs
/// are compared as unsigned integers and comparison resumes after them, so
/// `file2 < file9 < file10`. At the end, the shorter remainder sorts first.
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let left = left.as_bytes();
    let right = right.as_bytes();
    let mut left_index = 0;
    let mut right_index = 0;

    while left_index < left.len() && right_index < right.len() {
        let left_byte = left[left_index];
        let right_byte = right[right_index];

        if left_byte.is_ascii_digit() && right_byte.is_ascii_digit() {
            let left_end = digit_run_end(left, left_index);
            let right_end = digit_run_end(right, right_index);
            let ordering =
                compare_digit_runs(&left[left_index..left_end], &right[right_index..right_end]);
            if ordering != Ordering::Equal {
                return ordering;
            }
            left_index = left_end;
            right_index = right_end;

            continue;
        }

        match left_byte.cmp(&right_byte) {
            Ordering::Equal => {
                left_index += 1;
                right_index += 1;
            }
            ordering => return ordering,
        }
    }

    (left.len() - left_index).cmp(&(right.len() - right_index))
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|byte| !byte.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset)
}

/// Compares two ASCII digit runs by numeric value without overflowing.
fn compare_digit_runs(left: &[u8], right: &[u8]) -> Ordering {
    let left = trim_leading_zeros(left);
    let right = trim_leading_zeros(right);

    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}

fn trim_leading_zeros(digits: &[u8]) -> &[u8] {
    let first_significant = digits
        .iter()
        .position(|digit| *digit != b'0')
        .unwrap_or(digits.len());

    &digits[first_significant..]
}
