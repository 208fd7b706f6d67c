//! Coordinate index over one or more Portage trees.

use crate::error::ParseFailure;
use crate::parser::{EBUILD_EXTENSION, EbuildParser};
use ebuilder_core::{BuildScriptRecord, Coordinate};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Maven coordinate → providing ebuild.
///
/// Keys are unique; when two ebuilds provide the same coordinate the one
/// inserted last wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateIndex {
    entries: HashMap<Coordinate, Arc<BuildScriptRecord>>,
}

impl CoordinateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact group/artifact/version lookup.
    pub fn get(&self, coordinate: &Coordinate) -> Option<&Arc<BuildScriptRecord>> {
        self.entries.get(coordinate)
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.entries.contains_key(coordinate)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coordinate, &Arc<BuildScriptRecord>)> {
        self.entries.iter()
    }

    /// Indexes every coordinate `record` provides.
    ///
    /// Returns the number of coordinates that replaced another provider.
    pub fn insert(&mut self, record: BuildScriptRecord, warn_on_duplicates: bool) -> usize {
        let record = Arc::new(record);
        let mut replaced = 0;

        for coordinate in &record.provided_coordinates {
            if let Some(previous) = self.entries.insert(coordinate.clone(), Arc::clone(&record))
                && !Arc::ptr_eq(&previous, &record)
            {
                replaced += 1;
                if warn_on_duplicates {
                    tracing::warn!(
                        "{} is provided by both {}-{} and {}-{}, keeping the latter",
                        coordinate,
                        previous.atom(),
                        previous.version_spec,
                        record.atom(),
                        record.version_spec
                    );
                }
            }
        }

        replaced
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IndexOptions {
    /// Log a warning whenever a coordinate changes provider.
    pub warn_on_duplicates: bool,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            warn_on_duplicates: true,
        }
    }
}

/// Outcome of indexing: the index plus every file that could not be read.
#[derive(Debug, Default)]
pub struct IndexResult {
    pub index: CoordinateIndex,
    pub failures: Vec<ParseFailure>,
}

/// Walks Portage trees and builds a [`CoordinateIndex`].
#[derive(Debug, Clone, Default)]
pub struct TreeIndexer {
    parser: EbuildParser,
    options: IndexOptions,
}

impl TreeIndexer {
    pub fn new(parser: EbuildParser, options: IndexOptions) -> Self {
        Self { parser, options }
    }

    /// Indexes all roots into one index, in the order given.
    ///
    /// Files are parsed in parallel but merged in traversal order (roots in
    /// order, files sorted by name within a root), so "last write wins" is
    /// deterministic. The index is complete only once this returns.
    pub fn build_index<P: AsRef<Path>>(&self, roots: &[P]) -> IndexResult {
        let mut result = IndexResult::default();

        for root in roots {
            let root = root.as_ref();
            tracing::info!("indexing ebuilds under {}", root.display());

            let files = discover_ebuilds(root, &mut result.failures);
            let parsed: Vec<_> = files
                .par_iter()
                .map(|path| self.parser.parse(path))
                .collect();

            let mut records = 0;
            let mut replaced = 0;
            for outcome in parsed {
                match outcome {
                    Ok(record) => {
                        records += 1;
                        replaced += result
                            .index
                            .insert(record, self.options.warn_on_duplicates);
                    }
                    Err(failure) => {
                        tracing::warn!("skipping ebuild: {}", failure);
                        result.failures.push(failure);
                    }
                }
            }

            tracing::info!(
                "indexed {} ebuilds from {} ({} coordinates replaced)",
                records,
                root.display(),
                replaced
            );
        }

        tracing::info!(
            "coordinate index holds {} coordinates, {} failures",
            result.index.len(),
            result.failures.len()
        );

        result
    }
}

fn discover_ebuilds(root: &Path, failures: &mut Vec<ParseFailure>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_ebuild(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                tracing::warn!("error walking {}: {}", root.display(), err);
                failures.push(err.into());
            }
        }
    }

    files
}

fn is_ebuild(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == EBUILD_EXTENSION)
}
