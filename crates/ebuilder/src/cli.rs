//! Command line host.

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::Pipeline;
use clap::Parser;
use ebuilder_maven::ProjectModel;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "ebuilder",
    version,
    about = "Resolve Maven dependencies of effective POMs to Gentoo ebuilds"
)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ebuild tree to index, replaces the configured trees (repeatable)
    #[arg(long = "tree", value_name = "DIR")]
    pub trees: Vec<PathBuf>,

    /// Fail a descriptor that declares a license with no Gentoo equivalent
    #[arg(long)]
    pub strict_licenses: bool,

    /// Mark every project as having no tests
    #[arg(long, conflicts_with = "force_tests")]
    pub skip_tests: bool,

    /// Mark every project as having tests
    #[arg(long)]
    pub force_tests: bool,

    /// Effective POM files, as written by `mvn help:effective-pom`
    #[arg(required = true, value_name = "DESCRIPTOR")]
    pub descriptors: Vec<PathBuf>,
}

impl Cli {
    /// The configuration file, if any, with command line overrides applied.
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if self.strict_licenses {
            config.resolution.strict_licenses = true;
        }
        if self.skip_tests {
            config.resolution.skip_tests = true;
        }
        if self.force_tests {
            config.resolution.force_tests = true;
        }

        Ok(config)
    }
}

/// Writes the resolved projects of every descriptor to `out` as one JSON
/// array.
///
/// Returns `false` when at least one descriptor failed.
pub fn run(cli: &Cli, mut out: impl Write) -> Result<bool> {
    let config = cli.resolve_config()?;
    let roots = if cli.trees.is_empty() {
        config.roots()
    } else {
        cli.trees.clone()
    };

    let pipeline = Pipeline::new(config.pipeline_options())?.build_index(&roots);
    tracing::info!(
        "resolving {} descriptors against {} coordinates",
        cli.descriptors.len(),
        pipeline.index().len()
    );

    let mut models: Vec<ProjectModel> = Vec::new();
    let mut succeeded = true;
    for (path, result) in cli
        .descriptors
        .iter()
        .zip(pipeline.resolve_files(&cli.descriptors))
    {
        match result {
            Ok(resolved) => models.extend(resolved),
            Err(err) => {
                tracing::error!("{}: {}", path.display(), err);
                succeeded = false;
            }
        }
    }

    let unresolved: usize = models
        .iter()
        .map(|model| model.unresolved_dependencies().count())
        .sum();
    tracing::info!(
        "resolved {} projects, {} dependencies without a providing ebuild",
        models.len(),
        unresolved
    );

    serde_json::to_writer_pretty(&mut out, &models)?;
    writeln!(out)?;

    Ok(succeeded)
}
