//! Maven group/artifact/version coordinates.

use crate::error::{CoreError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// Removes a trailing `-SNAPSHOT` qualifier from a version string.
pub fn strip_snapshot(version: &str) -> &str {
    version.strip_suffix(SNAPSHOT_SUFFIX).unwrap_or(version)
}

/// A `groupId:artifactId:version` triple.
///
/// All three parts are non-empty. The version never carries a `-SNAPSHOT`
/// suffix, so a snapshot and its release compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Coordinate {
    group: String,
    artifact: String,
    version: String,
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self> {
        let group = group.into().trim().to_string();
        let artifact = artifact.into().trim().to_string();
        let version = version.into();
        let version = strip_snapshot(version.trim()).to_string();

        if group.is_empty() || artifact.is_empty() || version.is_empty() {
            return Err(CoreError::InvalidCoordinates {
                coordinates: format!("{group}:{artifact}:{version}"),
            });
        }

        Ok(Self {
            group,
            artifact,
            version,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// "{groupId}:{artifactId}"
    pub fn name(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}

impl FromStr for Coordinate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CoreError::InvalidCoordinates {
            coordinates: s.to_string(),
        };

        let mut parts = s.trim().split(':');
        let (Some(group), Some(artifact), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Self::new(group, artifact, version).map_err(|_| invalid())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_gav() {
        let coord: Coordinate = "org.apache.commons:commons-lang3:3.14.0".parse().unwrap();
        assert_eq!(coord.group(), "org.apache.commons");
        assert_eq!(coord.artifact(), "commons-lang3");
        assert_eq!(coord.version(), "3.14.0");
        assert_eq!(coord.name(), "org.apache.commons:commons-lang3");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let coord: Coordinate = "  junit:junit:4.13.2 ".parse().unwrap();
        assert_eq!(coord.to_string(), "junit:junit:4.13.2");
    }

    #[test]
    fn test_snapshot_stripped() {
        let coord = Coordinate::new("com.example", "lib", "1.2.3-SNAPSHOT").unwrap();
        assert_eq!(coord.version(), "1.2.3");

        let parsed: Coordinate = "com.example:lib:1.2.3-SNAPSHOT".parse().unwrap();
        assert_eq!(parsed, coord);
    }

    #[test]
    fn test_strip_snapshot_only_suffix() {
        assert_eq!(strip_snapshot("1.2.3-SNAPSHOT"), "1.2.3");
        assert_eq!(strip_snapshot("1.2.3"), "1.2.3");
        assert_eq!(strip_snapshot("1.0-SNAPSHOT-1"), "1.0-SNAPSHOT-1");
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!("junit:junit".parse::<Coordinate>().is_err());
        assert!("a:b:c:d".parse::<Coordinate>().is_err());
        assert!("a::1.0".parse::<Coordinate>().is_err());
        assert!("".parse::<Coordinate>().is_err());
        assert!(Coordinate::new("a", "b", "-SNAPSHOT").is_err());

        let err = "badcoords".parse::<Coordinate>().unwrap_err();
        assert!(err.to_string().contains("badcoords"));
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let a = Coordinate::new("g", "a", "1.0").unwrap();
        let b: Coordinate = "g:a:1.0".parse().unwrap();
        let c = Coordinate::new("g", "a", "1.1").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        let coord = Coordinate::new("gnu.getopt", "java-getopt", "1.0.14").unwrap();
        insta::assert_snapshot!(coord, @"gnu.getopt:java-getopt:1.0.14");
    }
}
