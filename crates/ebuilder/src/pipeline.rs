//! Two-phase resolution: index every tree, then resolve descriptors.
//!
//! [`Pipeline`] only knows how to build an index. Resolution methods live on
//! the [`IndexedPipeline`] that indexing returns, so no descriptor can be
//! resolved against a partially built index.

use crate::error::{PipelineError, Result};
use ebuilder_core::{Coordinate, LicenseNormalizer, LicenseTable, TestingFrameworkClassifier};
use ebuilder_maven::{DescriptorParser, MavenScope, ProjectModel, ResolvedDependency};
use ebuilder_portage::{
    CoordinateIndex, DEFAULT_ANT_TASKS, EbuildParser, IndexOptions, IndexResult, ParseFailure,
    TreeIndexer,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const FALLBACK_TEST_DEPENDENCY: (&str, &str, &str) = ("junit", "junit", "4.11");

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub ant_tasks: String,
    pub warn_on_duplicates: bool,
    /// License table file, the bundled table when `None`.
    pub license_table: Option<PathBuf>,
    /// Fail a document when a license name has no Gentoo tag.
    pub strict_licenses: bool,
    pub skip_tests: bool,
    pub force_tests: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ant_tasks: DEFAULT_ANT_TASKS.to_string(),
            warn_on_duplicates: true,
            license_table: None,
            strict_licenses: false,
            skip_tests: false,
            force_tests: false,
        }
    }
}

#[derive(Debug)]
pub struct Pipeline {
    options: PipelineOptions,
    licenses: LicenseNormalizer,
    frameworks: TestingFrameworkClassifier,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Result<Self> {
        let table = match &options.license_table {
            Some(path) => LicenseTable::load(path)?,
            None => LicenseTable::bundled()?,
        };
        tracing::debug!("license table holds {} mappings", table.len());

        Ok(Self {
            options,
            licenses: LicenseNormalizer::new(table),
            frameworks: TestingFrameworkClassifier::default(),
        })
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Indexes `roots` in order and moves on to the resolution phase.
    pub fn build_index<P: AsRef<Path>>(self, roots: &[P]) -> IndexedPipeline {
        let indexer = TreeIndexer::new(
            EbuildParser::new(self.options.ant_tasks.as_str()),
            IndexOptions {
                warn_on_duplicates: self.options.warn_on_duplicates,
            },
        );

        let IndexResult { index, failures } = indexer.build_index(roots);
        if !failures.is_empty() {
            tracing::warn!("{} ebuilds could not be indexed", failures.len());
        }

        IndexedPipeline {
            pipeline: self,
            index,
            failures,
        }
    }
}

/// A pipeline whose coordinate index is complete.
#[derive(Debug)]
pub struct IndexedPipeline {
    pipeline: Pipeline,
    index: CoordinateIndex,
    failures: Vec<ParseFailure>,
}

impl IndexedPipeline {
    pub fn index(&self) -> &CoordinateIndex {
        &self.index
    }

    /// Ebuilds skipped while indexing.
    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    pub fn resolve(&self, document: &str) -> Result<Vec<ProjectModel>> {
        let parser = DescriptorParser::new(
            &self.index,
            &self.pipeline.licenses,
            &self.pipeline.frameworks,
        );

        let mut models = parser.parse(document)?;
        for model in &mut models {
            self.finish_model(model)?;
        }
        Ok(models)
    }

    pub fn resolve_file(&self, path: &Path) -> Result<Vec<ProjectModel>> {
        let document = std::fs::read_to_string(path)?;
        tracing::debug!("resolving {}", path.display());
        self.resolve(&document)
    }

    /// Resolves documents in parallel; results follow input order.
    pub fn resolve_all<D>(&self, documents: &[D]) -> Vec<Result<Vec<ProjectModel>>>
    where
        D: AsRef<str> + Sync,
    {
        documents
            .par_iter()
            .map(|document| self.resolve(document.as_ref()))
            .collect()
    }

    pub fn resolve_files<P>(&self, paths: &[P]) -> Vec<Result<Vec<ProjectModel>>>
    where
        P: AsRef<Path> + Sync,
    {
        paths
            .par_iter()
            .map(|path| self.resolve_file(path.as_ref()))
            .collect()
    }

    fn finish_model(&self, model: &mut ProjectModel) -> Result<()> {
        let options = &self.pipeline.options;

        if model.has_tests && !model.has_test_dependency() {
            self.add_fallback_test_dependency(model)?;
        }
        if options.force_tests {
            model.has_tests = true;
        }
        if options.skip_tests {
            model.has_tests = false;
        }

        if options.strict_licenses && !model.unmapped_licenses.is_empty() {
            return Err(PipelineError::UnmappedLicense {
                project: model.gav(),
                licenses: model.unmapped_licenses.clone(),
            });
        }

        Ok(())
    }

    fn add_fallback_test_dependency(&self, model: &mut ProjectModel) -> Result<()> {
        let (group, artifact, version) = FALLBACK_TEST_DEPENDENCY;
        let coordinate = Coordinate::new(group, artifact, version)?;
        tracing::debug!(
            "{} has tests but no test dependency, adding {}",
            model.gav(),
            coordinate
        );

        if let Some(spec) = self.pipeline.frameworks.classify(&coordinate)
            && !model.testing_frameworks.contains(&spec.id)
        {
            model.testing_frameworks.push(spec.id.clone());
        }

        let providing_record = self.index.get(&coordinate).cloned();
        model.dependencies.push(ResolvedDependency {
            coordinate,
            scope: MavenScope::Test,
            providing_record,
        });
        Ok(())
    }
}
