//! Line-oriented ebuild parser.
//!
//! Ebuilds are bash, but the handful of variables the resolver needs are
//! plain assignments. Lines are normalized (blank and comment lines dropped,
//! whitespace trimmed), package variables are substituted, and the
//! assignments are read back by prefix.

use crate::error::{ParseFailure, Result};
use ebuilder_core::record::version_without_revision;
use ebuilder_core::{BuildScriptRecord, Coordinate, DEFAULT_SLOT};
use regex::{NoExpand, Regex};
use std::path::Path;
use std::sync::LazyLock;

/// File extension of build scripts.
pub const EBUILD_EXTENSION: &str = "ebuild";

/// Non `java-` eclass that still marks a Java package.
pub const DEFAULT_ANT_TASKS: &str = "ant-tasks";

const SLOT_VAR: &str = "SLOT";
const USE_FLAG_VAR: &str = "JAVA_PKG_OPT_USE";
const MAVEN_ID_VAR: &str = "MAVEN_ID";
const MAVEN_PROVIDES_VAR: &str = "MAVEN_PROVIDES";
const INHERIT: &str = "inherit";
const JAVA_ECLASS_PREFIX: &str = "java-";

// ${PVR} has to be replaced before ${PV}: the PV pattern matches it too.
static PN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{PN[^}]*\}").expect("Invalid regex"));

static PVR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{PVR[^}]*\}").expect("Invalid regex"));

static PV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{PV[^}]*\}").expect("Invalid regex"));

/// Parses ebuild files into [`BuildScriptRecord`]s.
#[derive(Debug, Clone)]
pub struct EbuildParser {
    ant_tasks: String,
}

impl Default for EbuildParser {
    fn default() -> Self {
        Self::new(DEFAULT_ANT_TASKS)
    }
}

impl EbuildParser {
    pub fn new(ant_tasks: impl Into<String>) -> Self {
        Self {
            ant_tasks: ant_tasks.into(),
        }
    }

    /// Reads and parses the ebuild at `path`.
    ///
    /// The path must look like `<root>/<category>/<name>/<name>-<version>.ebuild`.
    pub fn parse(&self, path: &Path) -> Result<BuildScriptRecord> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            tracing::warn!("could not read {}, skipping: {}", path.display(), e);
            ParseFailure::io(path, e)
        })?;
        self.parse_content(path, &content)
    }

    /// Parses already loaded ebuild content; `path` supplies category, name
    /// and version.
    pub fn parse_content(&self, path: &Path, content: &str) -> Result<BuildScriptRecord> {
        let (category, name) = package_location(path)?;
        let version_spec = version_spec(path, &name)?;
        let version = version_without_revision(&version_spec).to_string();

        let lines: Vec<String> = normalize_lines(content)
            .map(|line| substitute_variables(line, &name, &version_spec, &version))
            .collect();

        let slot = find_assignment(&lines, SLOT_VAR).unwrap_or_else(|| DEFAULT_SLOT.to_string());
        let use_flag = find_assignment(&lines, USE_FLAG_VAR).unwrap_or_default();
        let inherited_capabilities = self.inherited_capabilities(&lines);
        let provided_coordinates = provided_coordinates(&lines)
            .map_err(|message| ParseFailure::malformed(path, message))?;

        tracing::debug!(
            "parsed {}/{}-{} ({} coordinates)",
            category,
            name,
            version_spec,
            provided_coordinates.len()
        );

        Ok(BuildScriptRecord {
            category,
            name,
            version_spec,
            slot,
            use_flag,
            inherited_capabilities,
            provided_coordinates,
        })
    }

    fn inherited_capabilities(&self, lines: &[String]) -> Vec<String> {
        lines
            .iter()
            .filter_map(|line| {
                let mut tokens = line.split_whitespace();
                (tokens.next() == Some(INHERIT)).then_some(tokens)
            })
            .flatten()
            .filter(|eclass| eclass.starts_with(JAVA_ECLASS_PREFIX) || *eclass == self.ant_tasks)
            .map(str::to_string)
            .collect()
    }
}

fn normalize_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('#'))
}

fn substitute_variables(line: &str, name: &str, version_spec: &str, version: &str) -> String {
    let line = PN_PATTERN.replace_all(line, NoExpand(name));
    let line = PVR_PATTERN.replace_all(&line, NoExpand(version_spec));
    PV_PATTERN.replace_all(&line, NoExpand(version)).into_owned()
}

/// Category and package name from the two directories above the file.
fn package_location(path: &Path) -> Result<(String, String)> {
    let dir_name = |p: Option<&Path>| {
        p.and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .map(str::to_string)
    };

    let package_dir = path.parent();
    let name = dir_name(package_dir);
    let category = dir_name(package_dir.and_then(Path::parent));

    match (category, name) {
        (Some(category), Some(name)) => Ok((category, name)),
        _ => Err(ParseFailure::malformed(
            path,
            "path does not contain category and package directories",
        )),
    }
}

fn version_spec(path: &Path, name: &str) -> Result<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ParseFailure::malformed(path, "missing file name"))?;

    file_name
        .strip_suffix(EBUILD_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .and_then(|s| s.strip_prefix(name))
        .and_then(|s| s.strip_prefix('-'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ParseFailure::malformed(
                path,
                format!("file name '{file_name}' does not match '{name}-<version>.{EBUILD_EXTENSION}'"),
            )
        })
}

/// Value of the first `VAR=value` line, quotes removed.
fn find_assignment(lines: &[String], var: &str) -> Option<String> {
    lines
        .iter()
        .find_map(|line| assignment_value(line, var))
        .map(unquote)
}

fn assignment_value<'a>(line: &'a str, var: &str) -> Option<&'a str> {
    line.strip_prefix(var)?.trim_start().strip_prefix('=')
}

fn unquote(value: &str) -> String {
    value.replace('"', "").trim().trim_matches('\'').to_string()
}

/// Tokens of a possibly multi-line quoted assignment.
///
/// A quoted value ends at its closing quote, or at a line holding only `"`
/// (excluded). An unquoted value ends with its line.
fn declaration_tokens<'a>(lines: &'a [String], var: &str) -> Option<Vec<&'a str>> {
    let start = lines
        .iter()
        .position(|line| assignment_value(line, var).is_some())?;

    let first = assignment_value(&lines[start], var)?.trim();
    let Some(quote) = first.chars().next().filter(|c| matches!(c, '"' | '\'')) else {
        return Some(split_tokens(first));
    };
    let first = &first[1..];

    let mut tokens = split_tokens(first);
    if first.contains(quote) {
        return Some(tokens);
    }

    for line in &lines[start + 1..] {
        if line.len() == 1 && line.starts_with(quote) {
            break;
        }
        tokens.extend(split_tokens(line));
        if line.ends_with(quote) {
            break;
        }
    }

    Some(tokens)
}

fn split_tokens(s: &str) -> Vec<&str> {
    s.split_whitespace()
        .map(|token| token.trim_matches(['"', '\'']))
        .filter(|token| !token.is_empty())
        .collect()
}

/// `MAVEN_ID` wins over `MAVEN_PROVIDES`; an empty `MAVEN_ID` falls through.
fn provided_coordinates(lines: &[String]) -> std::result::Result<Vec<Coordinate>, String> {
    if let Some(token) =
        declaration_tokens(lines, MAVEN_ID_VAR).and_then(|tokens| tokens.first().copied())
    {
        return parse_coordinate(token).map(|c| vec![c]);
    }

    declaration_tokens(lines, MAVEN_PROVIDES_VAR)
        .unwrap_or_default()
        .into_iter()
        .map(parse_coordinate)
        .collect()
}

fn parse_coordinate(token: &str) -> std::result::Result<Coordinate, String> {
    token.parse::<Coordinate>().map_err(|e| e.to_string())
}
