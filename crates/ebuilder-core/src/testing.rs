//! Testing framework classification by coordinate and version range.

use crate::coordinate::Coordinate;
use crate::version::in_range;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_MIN_VERSION: &str = "0.0.1";
pub const DEFAULT_MAX_VERSION: &str = "999.999.999";

/// A testing framework recognised by group, artifact and inclusive version range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestingFrameworkSpec {
    /// Identifier used by the build-script tooling, e.g. `junit4`.
    pub id: String,
    /// Whether the build-script tooling can run this framework.
    pub supported_by_target: bool,
    pub group: String,
    pub artifact: String,
    pub min_version: String,
    pub max_version: String,
}

impl TestingFrameworkSpec {
    pub fn new(id: &str, supported_by_target: bool, group: &str, artifact: &str) -> Self {
        Self {
            id: id.into(),
            supported_by_target,
            group: group.into(),
            artifact: artifact.into(),
            min_version: DEFAULT_MIN_VERSION.into(),
            max_version: DEFAULT_MAX_VERSION.into(),
        }
    }

    #[must_use]
    pub fn with_min_version(mut self, version: &str) -> Self {
        self.min_version = version.into();
        self
    }

    #[must_use]
    pub fn with_max_version(mut self, version: &str) -> Self {
        self.max_version = version.into();
        self
    }

    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        self.group == coordinate.group()
            && self.artifact == coordinate.artifact()
            && in_range(coordinate.version(), &self.min_version, &self.max_version)
    }
}

/// The frameworks known to the Gentoo Java tooling.
///
/// Ranges must not overlap for the same artifact; if they do, the earlier
/// row wins.
pub fn default_frameworks() -> Vec<TestingFrameworkSpec> {
    vec![
        TestingFrameworkSpec::new("junit", true, "junit", "junit")
            .with_min_version("1.0.0")
            .with_max_version("3.9.9"),
        TestingFrameworkSpec::new("junit4", true, "junit", "junit").with_min_version("4.0.0"),
        TestingFrameworkSpec::new("testng", true, "org.testng", "testng"),
        // java-pkg-simple cannot run the following frameworks
        TestingFrameworkSpec::new(
            "junit-jupiter",
            false,
            "org.junit.jupiter",
            "junit-jupiter-engine",
        ),
        TestingFrameworkSpec::new(
            "junit-vintage",
            false,
            "org.junit.vintage",
            "junit-vintage-engine",
        ),
        TestingFrameworkSpec::new("cucumber", false, "io.cucumber", "cucumber-junit"),
    ]
}

/// Matches dependency coordinates against a fixed table of frameworks.
#[derive(Debug, Clone)]
pub struct TestingFrameworkClassifier {
    specs: Arc<[TestingFrameworkSpec]>,
}

impl Default for TestingFrameworkClassifier {
    fn default() -> Self {
        Self::new(default_frameworks())
    }
}

impl TestingFrameworkClassifier {
    pub fn new(specs: Vec<TestingFrameworkSpec>) -> Self {
        Self {
            specs: specs.into(),
        }
    }

    /// First spec in table order whose group, artifact and range match.
    pub fn classify(&self, coordinate: &Coordinate) -> Option<&TestingFrameworkSpec> {
        self.specs.iter().find(|spec| spec.matches(coordinate))
    }
}
