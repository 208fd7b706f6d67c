//! Project models produced from effective POM documents.

use ebuilder_core::{BuildScriptRecord, Coordinate};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MavenScope {
    #[default]
    Compile,
    Test,
    Runtime,
    Provided,
    System,
    Import,
}

impl MavenScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Test => "test",
            Self::Runtime => "runtime",
            Self::Provided => "provided",
            Self::System => "system",
            Self::Import => "import",
        }
    }
}

impl std::str::FromStr for MavenScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "test" => Self::Test,
            "runtime" => Self::Runtime,
            "provided" => Self::Provided,
            "system" => Self::System,
            "import" => Self::Import,
            _ => Self::Compile,
        })
    }
}

impl fmt::Display for MavenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared dependency and the ebuild that provides it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub coordinate: Coordinate,
    pub scope: MavenScope,
    /// `None` when no indexed ebuild provides exactly this coordinate.
    pub providing_record: Option<Arc<BuildScriptRecord>>,
}

impl ResolvedDependency {
    pub fn is_resolved(&self) -> bool {
        self.providing_record.is_some()
    }
}

/// One `<project>` of an effective POM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectModel {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub source_language_version: Option<String>,
    pub target_language_version: Option<String>,
    pub source_encoding: Option<String>,
    pub source_dir: Option<String>,
    pub test_source_dir: Option<String>,
    pub resource_dirs: Vec<String>,
    pub test_resource_dirs: Vec<String>,
    pub main_class: Option<String>,
    pub has_tests: bool,
    /// Gentoo license tags, in declaration order.
    pub licenses: Vec<String>,
    /// License names with no known Gentoo tag.
    pub unmapped_licenses: Vec<String>,
    pub dependencies: Vec<ResolvedDependency>,
    /// Ids of the testing frameworks found among the dependencies.
    pub testing_frameworks: Vec<String>,
}

impl ProjectModel {
    /// `group:artifact:version` of the project itself.
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group, self.artifact, self.version)
    }

    pub fn has_test_dependency(&self) -> bool {
        self.dependencies
            .iter()
            .any(|dep| dep.scope == MavenScope::Test)
    }

    pub fn unresolved_dependencies(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.dependencies.iter().filter(|dep| !dep.is_resolved())
    }
}
