//! Parsed build-script (ebuild) records.

use crate::coordinate::Coordinate;
use serde::Serialize;

/// Slot assumed for build scripts that do not declare one.
///
/// Treated as "unversioned, always compatible".
pub const DEFAULT_SLOT: &str = "99999";

/// One parsed build script.
///
/// Created once per file during indexing and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildScriptRecord {
    /// Grandparent directory name, e.g. `dev-java`.
    pub category: String,
    /// Parent directory name (`PN`).
    pub name: String,
    /// Version including revision (`PVR`), e.g. `1.0.14-r3`.
    pub version_spec: String,
    pub slot: String,
    pub use_flag: String,
    pub inherited_capabilities: Vec<String>,
    pub provided_coordinates: Vec<Coordinate>,
}

impl BuildScriptRecord {
    /// Package version without the `-rN` revision (`PV`).
    pub fn version(&self) -> &str {
        version_without_revision(&self.version_spec)
    }

    /// `category/name:slot`, the dependency atom other scripts would use.
    pub fn atom(&self) -> String {
        format!("{}/{}:{}", self.category, self.name, self.slot)
    }
}

/// Cuts a version spec at its first `-`, dropping the revision.
pub fn version_without_revision(version_spec: &str) -> &str {
    version_spec
        .split_once('-')
        .map_or(version_spec, |(version, _)| version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(version_spec: &str, slot: &str) -> BuildScriptRecord {
        BuildScriptRecord {
            category: "dev-java".into(),
            name: "java-getopt".into(),
            version_spec: version_spec.into(),
            slot: slot.into(),
            use_flag: String::new(),
            inherited_capabilities: vec!["java-pkg-2".into()],
            provided_coordinates: vec![
                Coordinate::new("gnu.getopt", "java-getopt", "1.0.14").unwrap(),
            ],
        }
    }

    #[test]
    fn test_version_drops_revision() {
        assert_eq!(record("1.0.14-r3", "1").version(), "1.0.14");
        assert_eq!(record("75.1", "0").version(), "75.1");
        assert_eq!(record("1.0_alpha3-r2", "1").version(), "1.0_alpha3");
    }

    #[test]
    fn test_atom() {
        assert_eq!(record("1.0.14-r3", "1").atom(), "dev-java/java-getopt:1");
    }
}
