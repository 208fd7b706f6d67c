//! TOML configuration.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [portage]
//! tree_root_directory = "/var/db/repos/gentoo"
//! additional_ebuild_repositories = "/var/db/repos/java,/var/db/repos/local"
//!
//! [eclass]
//! ant_tasks = "ant-tasks"
//!
//! [licenses]
//! table = "/etc/ebuilder/licenses.xml"
//!
//! [resolution]
//! strict_licenses = false
//! warn_on_duplicate_coordinates = true
//! skip_tests = false
//! force_tests = false
//! ```

use crate::error::Result;
use crate::pipeline::PipelineOptions;
use ebuilder_portage::DEFAULT_ANT_TASKS;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

pub const DEFAULT_TREE_ROOT: &str = "/var/db/repos/gentoo";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portage: PortageConfig,
    pub eclass: EclassConfig,
    pub licenses: LicensesConfig,
    pub resolution: ResolutionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortageConfig {
    pub tree_root_directory: PathBuf,
    /// Indexed after the main tree, in order; later repositories win.
    #[serde(deserialize_with = "deserialize_path_list")]
    pub additional_ebuild_repositories: Vec<PathBuf>,
}

impl Default for PortageConfig {
    fn default() -> Self {
        Self {
            tree_root_directory: PathBuf::from(DEFAULT_TREE_ROOT),
            additional_ebuild_repositories: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EclassConfig {
    /// Eclass name recorded as a capability besides the `java-*` eclasses.
    pub ant_tasks: String,
}

impl Default for EclassConfig {
    fn default() -> Self {
        Self {
            ant_tasks: DEFAULT_ANT_TASKS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LicensesConfig {
    /// License table to use instead of the bundled one.
    pub table: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    pub strict_licenses: bool,
    pub warn_on_duplicate_coordinates: bool,
    pub skip_tests: bool,
    pub force_tests: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            strict_licenses: false,
            warn_on_duplicate_coordinates: true,
            skip_tests: false,
            force_tests: false,
        }
    }
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Trees to index: the main tree first, then the additional repositories.
    pub fn roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.portage.tree_root_directory.clone()];
        for repository in &self.portage.additional_ebuild_repositories {
            if !roots.contains(repository) {
                roots.push(repository.clone());
            }
        }
        roots
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            ant_tasks: self.eclass.ant_tasks.clone(),
            warn_on_duplicates: self.resolution.warn_on_duplicate_coordinates,
            license_table: self.licenses.table.clone(),
            strict_licenses: self.resolution.strict_licenses,
            skip_tests: self.resolution.skip_tests,
            force_tests: self.resolution.force_tests,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PathList {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_path_list<'de, D>(deserializer: D) -> std::result::Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PathList::deserialize(deserializer)? {
        PathList::List(entries) => parse_path_list(entries),
        PathList::Joined(joined) => parse_path_list(joined.split(',')),
    })
}

/// Trims entries, drops blank ones and keeps the first of any duplicates.
pub fn parse_path_list<I, S>(entries: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.as_ref().trim();
        if entry.is_empty() {
            continue;
        }
        let path = PathBuf::from(entry);
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}
