//! Migration version numbers.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dotted version such as `1.2.10`.
///
/// File names may separate segments with `.` or `_` (`V1_2__x.sql`).
/// Segments compare numerically and trailing zero segments are ignored, so
/// `1.2` < `1.10` and `1` == `1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MigrationVersion {
    segments: Vec<u64>,
}

impl MigrationVersion {
    /// Parse a version string.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("version is empty".to_string());
        }

        let mut segments = raw
            .split(['.', '_'])
            .map(|segment| {
                segment
                    .parse::<u64>()
                    .map_err(|_| format!("invalid version segment '{}' in '{}'", segment, raw))
            })
            .collect::<Result<Vec<_>, _>>()?;

        while segments.len() > 1 && segments.last() == Some(&0) {
            segments.pop();
        }

        Ok(Self { segments })
    }

    /// Numeric segments.
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }
}

impl Ord for MigrationVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments.cmp(&other.segments)
    }
}

impl PartialOrd for MigrationVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&joined)
    }
}

impl TryFrom<String> for MigrationVersion {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<MigrationVersion> for String {
    fn from(version: MigrationVersion) -> Self {
        version.to_string()
    }
}
