//! Strict `MAJOR.MINOR.PATCH` release versions

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A plain release version with numeric ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeVersion {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
}

impl NodeVersion {
    /// Build a version from its components
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a release-index tag of the exact form `vMAJOR.MINOR.PATCH`
    pub fn from_release_tag(tag: &str) -> Option<Self> {
        tag.strip_prefix('v')?.parse().ok()
    }
}

impl FromStr for NodeVersion {
    type Err = String;

    /// Accepts exactly three dot-separated runs of ASCII digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let mut next = || -> Result<u64, String> {
            let part = parts.next().ok_or_else(|| format!("invalid version: {s}"))?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("invalid version: {s}"));
            }
            part.parse().map_err(|_| format!("invalid version: {s}"))
        };
        let version = Self::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(format!("invalid version: {s}"));
        }
        Ok(version)
    }
}

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for NodeVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
