//! Firmware versions and the version keys parameter sets are filed under.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Firmware revision reported by the hand. Ordered major first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FirmwareVersion {
    pub major: u16,
    pub minor: u16,
}

impl FirmwareVersion {
    /// `0.0`, what the hand manager reports when no version could be read.
    pub const UNKNOWN: FirmwareVersion = FirmwareVersion { major: 0, minor: 0 };

    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// Single integer preserving the version order.
    fn flat(self) -> u32 {
        (u32::from(self.major) << 16) | u32::from(self.minor)
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid firmware version `{0}`, expected <major>.<minor>")]
pub struct VersionParseError(String);

impl FromStr for FirmwareVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(err)?;
        Ok(Self {
            major: major.parse().map_err(|_| err())?,
            minor: minor.parse().map_err(|_| err())?,
        })
    }
}

/// The set of firmware versions a parameter set applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionKey {
    /// Exactly one version.
    Exact(FirmwareVersion),
    /// Inclusive interval; an absent bound is open.
    Range {
        min: Option<FirmwareVersion>,
        max: Option<FirmwareVersion>,
    },
    /// Every minor revision of one major version.
    Major(u16),
    /// Every version. Written as `0.0` in parameter files.
    Any,
}

/// How narrowly a key selects versions. Greater is more specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity {
    rank: u8,
    width: Reverse<u32>,
}

impl VersionKey {
    pub fn matches(&self, version: FirmwareVersion) -> bool {
        match *self {
            Self::Exact(v) => v == version,
            Self::Range { min, max } => {
                min.is_none_or(|min| version >= min) && max.is_none_or(|max| version <= max)
            }
            Self::Major(major) => version.major == major,
            Self::Any => true,
        }
    }

    /// Exact beats range, range beats major-only, major-only beats any.
    /// Between two ranges the one spanning fewer versions wins.
    pub fn specificity(&self) -> Specificity {
        let (rank, width) = match *self {
            Self::Exact(_) => (3, 0),
            Self::Range { min, max } => {
                let lo = min.map_or(0, FirmwareVersion::flat);
                let hi = max.map_or(u32::MAX, FirmwareVersion::flat);
                (2, hi.saturating_sub(lo))
            }
            Self::Major(_) => (1, u32::from(u16::MAX)),
            Self::Any => (0, u32::MAX),
        };
        Specificity {
            rank,
            width: Reverse(width),
        }
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Range { min, max } => {
                match min {
                    Some(v) => write!(f, "[{v}, ")?,
                    None => write!(f, "(*, ")?,
                }
                match max {
                    Some(v) => write!(f, "{v}]"),
                    None => write!(f, "*)"),
                }
            }
            Self::Major(major) => write!(f, "{major}.*"),
            Self::Any => write!(f, "*"),
        }
    }
}
