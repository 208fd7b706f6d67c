//! Streaming effective-POM parser.
//!
//! Walks the document with a quick-xml pull reader. Each element context has
//! a static rule table mapping child element names to either a text setter or
//! a nested handler; children without a rule are skipped with everything
//! below them.

use crate::error::{MavenError, Result};
use crate::types::{MavenScope, ProjectModel, ResolvedDependency};
use ebuilder_core::{Coordinate, LicenseNormalizer, TestingFrameworkClassifier, strip_snapshot};
use ebuilder_portage::CoordinateIndex;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::path::Path;

/// Known broken dependency versions and their replacements.
const LEGACY_VERSIONS: &[(&str, &str)] = &[("gl1.1-android-2.1_r1", "2.1.1")];

/// Resolves effective POM documents against an ebuild coordinate index.
#[derive(Debug, Clone, Copy)]
pub struct DescriptorParser<'a> {
    index: &'a CoordinateIndex,
    licenses: &'a LicenseNormalizer,
    frameworks: &'a TestingFrameworkClassifier,
}

impl<'a> DescriptorParser<'a> {
    pub fn new(
        index: &'a CoordinateIndex,
        licenses: &'a LicenseNormalizer,
        frameworks: &'a TestingFrameworkClassifier,
    ) -> Self {
        Self {
            index,
            licenses,
            frameworks,
        }
    }

    /// Parses a `<project>` document into one model, or a `<projects>`
    /// document into one model per child project in document order.
    pub fn parse(&self, document: &str) -> Result<Vec<ProjectModel>> {
        let mut session = Session {
            reader: Reader::from_str(document),
            parser: *self,
        };

        let root = session.root()?;
        let mut models = Vec::new();
        match root.name.as_str() {
            "project" => read_project(&mut session, &root, &mut models)?,
            "projects" => session.dispatch(&root, PROJECTS, &mut models)?,
            other => {
                return Err(MavenError::UnsupportedRoot {
                    root: other.to_owned(),
                });
            }
        }
        session.finish()?;

        Ok(models)
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<ProjectModel>> {
        let document = std::fs::read_to_string(path)?;
        tracing::debug!("parsing descriptor {}", path.display());
        self.parse(&document)
    }

    fn resolve(&self, dependency: DependencyState) -> Option<ResolvedDependency> {
        let version = legacy_version(strip_snapshot(dependency.version.trim()));
        let coordinate = match Coordinate::new(dependency.group, dependency.artifact, version) {
            Ok(coordinate) => coordinate,
            Err(err) => {
                tracing::warn!("skipping dependency: {}", err);
                return None;
            }
        };

        let providing_record = self.index.get(&coordinate).cloned();
        match &providing_record {
            Some(record) => tracing::debug!("{} is provided by {}", coordinate, record.atom()),
            None => tracing::debug!("no ebuild provides {}", coordinate),
        }

        Some(ResolvedDependency {
            coordinate,
            scope: dependency.scope,
            providing_record,
        })
    }

    fn complete(&self, model: &mut ProjectModel) {
        for dependency in &model.dependencies {
            if let Some(spec) = self.frameworks.classify(&dependency.coordinate)
                && !model.testing_frameworks.contains(&spec.id)
            {
                model.testing_frameworks.push(spec.id.clone());
            }
        }

        model.has_tests = model.has_test_dependency()
            || model
                .test_source_dir
                .as_deref()
                .is_some_and(|dir| Path::new(dir).exists());
    }
}

fn legacy_version(version: &str) -> &str {
    LEGACY_VERSIONS
        .iter()
        .find(|(broken, _)| *broken == version)
        .map_or(version, |(_, fixed)| fixed)
}

/// An element whose start tag has just been read.
#[derive(Debug)]
struct Element {
    name: String,
    /// `<name/>`: there is no content or end tag to consume.
    empty: bool,
}

impl Element {
    fn new(local_name: &[u8], empty: bool) -> Self {
        Self {
            name: String::from_utf8_lossy(local_name).into_owned(),
            empty,
        }
    }
}

struct Session<'d, 'p> {
    reader: Reader<&'d [u8]>,
    parser: DescriptorParser<'p>,
}

impl Session<'_, '_> {
    fn root(&mut self) -> Result<Element> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return Ok(Element::new(e.local_name().as_ref(), false)),
                Event::Empty(e) => return Ok(Element::new(e.local_name().as_ref(), true)),
                Event::Eof => return Err(MavenError::malformed("document has no root element")),
                _ => {}
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        loop {
            match self.reader.read_event()? {
                Event::Start(_) | Event::Empty(_) => {
                    return Err(MavenError::malformed("content after the root element"));
                }
                Event::Eof => return Ok(()),
                _ => {}
            }
        }
    }

    /// Next child of the current element, `None` once its end tag is read.
    fn next_child(&mut self) -> Result<Option<Element>> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => return Ok(Some(Element::new(e.local_name().as_ref(), false))),
                Event::Empty(e) => return Ok(Some(Element::new(e.local_name().as_ref(), true))),
                Event::End(_) => return Ok(None),
                Event::Eof => return Err(unexpected_eof()),
                _ => {}
            }
        }
    }

    /// Consumes `element` and returns its trimmed text content.
    fn read_text(&mut self, element: &Element) -> Result<String> {
        let mut text = String::new();
        if element.empty {
            return Ok(text);
        }

        loop {
            match self.reader.read_event()? {
                Event::Text(e) => {
                    let decoded = e
                        .decode()
                        .map_err(|err| MavenError::malformed(err.to_string()))?;
                    text.push_str(&decoded);
                }
                Event::CData(e) => text.push_str(utf8(&e)?),
                Event::GeneralRef(e) => text.push_str(&resolve_reference(utf8(&e)?)?),
                Event::Start(e) => {
                    let nested = Element::new(e.local_name().as_ref(), false);
                    self.skip(&nested)?;
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof()),
                _ => {}
            }
        }

        Ok(text.trim().to_owned())
    }

    fn skip(&mut self, element: &Element) -> Result<()> {
        if element.empty {
            return Ok(());
        }

        let mut depth = 0usize;
        loop {
            match self.reader.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => return Ok(()),
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(unexpected_eof()),
                _ => {}
            }
        }
    }

    /// Applies `rules` to every child of `element`.
    fn dispatch<T>(&mut self, element: &Element, rules: &Rules<T>, target: &mut T) -> Result<()> {
        if element.empty {
            return Ok(());
        }

        while let Some(child) = self.next_child()? {
            match rules.iter().find(|(name, _)| *name == child.name) {
                Some((_, Rule::Text(set))) => {
                    let value = self.read_text(&child)?;
                    set(target, value);
                }
                Some((_, Rule::Nested(handler))) => handler(self, &child, target)?,
                None => self.skip(&child)?,
            }
        }

        Ok(())
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|err| MavenError::malformed(err.to_string()))
}

fn resolve_reference(name: &str) -> Result<String> {
    let reference = format!("&{name};");
    quick_xml::escape::unescape(&reference)
        .map(Cow::into_owned)
        .map_err(|err| MavenError::malformed(err.to_string()))
}

fn unexpected_eof() -> MavenError {
    MavenError::malformed("unexpected end of document")
}

type Handler<T> = fn(&mut Session<'_, '_>, &Element, &mut T) -> Result<()>;

enum Rule<T> {
    /// Store the element's text.
    Text(fn(&mut T, String)),
    /// Hand the element to a handler that consumes it.
    Nested(Handler<T>),
}

type Rules<T> = [(&'static str, Rule<T>)];

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn push_non_empty(list: &mut Vec<String>, value: String) {
    if !value.is_empty() {
        list.push(value);
    }
}

const PROJECTS: &Rules<Vec<ProjectModel>> = &[("project", Rule::Nested(read_project))];

const PROJECT: &Rules<ProjectModel> = &[
    ("artifactId", Rule::Text(|p, v| p.artifact = v)),
    ("groupId", Rule::Text(|p, v| p.group = v)),
    (
        "version",
        Rule::Text(|p, v| p.version = strip_snapshot(&v).to_owned()),
    ),
    ("description", Rule::Text(|p, v| p.description = non_empty(v))),
    ("url", Rule::Text(|p, v| p.homepage = non_empty(v))),
    ("properties", Rule::Nested(|s, e, p| s.dispatch(e, PROPERTIES, p))),
    ("build", Rule::Nested(|s, e, p| s.dispatch(e, BUILD, p))),
    (
        "dependencies",
        Rule::Nested(|s, e, p| s.dispatch(e, DEPENDENCIES, p)),
    ),
    ("licenses", Rule::Nested(|s, e, p| s.dispatch(e, LICENSES, p))),
];

const PROPERTIES: &Rules<ProjectModel> = &[
    (
        "maven.compiler.source",
        Rule::Text(|p, v| p.source_language_version = non_empty(v)),
    ),
    (
        "maven.compiler.target",
        Rule::Text(|p, v| p.target_language_version = non_empty(v)),
    ),
    (
        "project.build.sourceEncoding",
        Rule::Text(|p, v| p.source_encoding = non_empty(v)),
    ),
];

const BUILD: &Rules<ProjectModel> = &[
    ("sourceDirectory", Rule::Text(|p, v| p.source_dir = non_empty(v))),
    (
        "testSourceDirectory",
        Rule::Text(|p, v| p.test_source_dir = non_empty(v)),
    ),
    ("resources", Rule::Nested(|s, e, p| s.dispatch(e, RESOURCES, p))),
    (
        "testResources",
        Rule::Nested(|s, e, p| s.dispatch(e, TEST_RESOURCES, p)),
    ),
    ("plugins", Rule::Nested(|s, e, p| s.dispatch(e, PLUGINS, p))),
];

const RESOURCES: &Rules<ProjectModel> = &[(
    "resource",
    Rule::Nested(|s, e, p| s.dispatch(e, RESOURCE, p)),
)];

const RESOURCE: &Rules<ProjectModel> = &[(
    "directory",
    Rule::Text(|p, v| push_non_empty(&mut p.resource_dirs, v)),
)];

const TEST_RESOURCES: &Rules<ProjectModel> = &[(
    "testResource",
    Rule::Nested(|s, e, p| s.dispatch(e, TEST_RESOURCE, p)),
)];

const TEST_RESOURCE: &Rules<ProjectModel> = &[(
    "directory",
    Rule::Text(|p, v| push_non_empty(&mut p.test_resource_dirs, v)),
)];

const PLUGINS: &Rules<ProjectModel> = &[("plugin", Rule::Nested(read_plugin))];

const PLUGIN: &Rules<PluginState> = &[
    ("artifactId", Rule::Text(|p, v| p.artifact_id = v)),
    (
        "configuration",
        Rule::Nested(|s, e, p| s.dispatch(e, plugin_configuration(&p.artifact_id), p)),
    ),
];

const COMPILER_CONFIGURATION: &Rules<PluginState> = &[
    ("source", Rule::Text(|p, v| p.source = non_empty(v))),
    ("target", Rule::Text(|p, v| p.target = non_empty(v))),
];

const JAR_CONFIGURATION: &Rules<PluginState> =
    &[("archive", Rule::Nested(|s, e, p| s.dispatch(e, ARCHIVE, p)))];

const ARCHIVE: &Rules<PluginState> =
    &[("manifest", Rule::Nested(|s, e, p| s.dispatch(e, MANIFEST, p)))];

const MANIFEST: &Rules<PluginState> =
    &[("mainClass", Rule::Text(|p, v| p.main_class = non_empty(v)))];

const DEPENDENCIES: &Rules<ProjectModel> = &[("dependency", Rule::Nested(read_dependency))];

const DEPENDENCY: &Rules<DependencyState> = &[
    ("groupId", Rule::Text(|d, v| d.group = v)),
    ("artifactId", Rule::Text(|d, v| d.artifact = v)),
    ("version", Rule::Text(|d, v| d.version = v)),
    ("scope", Rule::Text(|d, v| d.scope = v.parse().unwrap_or_default())),
];

const LICENSES: &Rules<ProjectModel> = &[(
    "license",
    Rule::Nested(|s, e, p| s.dispatch(e, LICENSE, p)),
)];

const LICENSE: &Rules<ProjectModel> = &[("name", Rule::Nested(read_license_name))];

/// Configuration rules for a plugin, keyed by its artifact id.
fn plugin_configuration(artifact_id: &str) -> &'static Rules<PluginState> {
    match artifact_id {
        "maven-compiler-plugin" => COMPILER_CONFIGURATION,
        "maven-jar-plugin" => JAR_CONFIGURATION,
        _ => &[],
    }
}

#[derive(Debug, Default)]
struct PluginState {
    artifact_id: String,
    source: Option<String>,
    target: Option<String>,
    main_class: Option<String>,
}

#[derive(Debug, Default)]
struct DependencyState {
    group: String,
    artifact: String,
    version: String,
    scope: MavenScope,
}

fn read_project(
    session: &mut Session<'_, '_>,
    element: &Element,
    models: &mut Vec<ProjectModel>,
) -> Result<()> {
    let mut model = ProjectModel::default();
    session.dispatch(element, PROJECT, &mut model)?;
    session.parser.complete(&mut model);

    tracing::debug!(
        "parsed project {} ({} dependencies, {} licenses)",
        model.gav(),
        model.dependencies.len(),
        model.licenses.len()
    );
    models.push(model);
    Ok(())
}

fn read_plugin(
    session: &mut Session<'_, '_>,
    element: &Element,
    model: &mut ProjectModel,
) -> Result<()> {
    let mut plugin = PluginState::default();
    session.dispatch(element, PLUGIN, &mut plugin)?;

    if plugin.source.is_some() {
        model.source_language_version = plugin.source;
    }
    if plugin.target.is_some() {
        model.target_language_version = plugin.target;
    }
    if plugin.main_class.is_some() {
        model.main_class = plugin.main_class;
    }
    Ok(())
}

fn read_dependency(
    session: &mut Session<'_, '_>,
    element: &Element,
    model: &mut ProjectModel,
) -> Result<()> {
    let mut dependency = DependencyState::default();
    session.dispatch(element, DEPENDENCY, &mut dependency)?;

    if let Some(resolved) = session.parser.resolve(dependency) {
        model.dependencies.push(resolved);
    }
    Ok(())
}

fn read_license_name(
    session: &mut Session<'_, '_>,
    element: &Element,
    model: &mut ProjectModel,
) -> Result<()> {
    let name = session.read_text(element)?;
    if name.is_empty() {
        return Ok(());
    }

    match session.parser.licenses.normalize(&name) {
        Some(tag) => model.licenses.push(tag.to_owned()),
        None => {
            tracing::warn!("no Gentoo license known for '{}'", name);
            model.unmapped_licenses.push(name);
        }
    }
    Ok(())
}
