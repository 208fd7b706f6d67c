//! Effective pom.xml support for ebuilder.
//!
//! [`DescriptorParser`] streams an effective POM (a single `<project>` or a
//! `<projects>` wrapper) into [`ProjectModel`]s, resolving each dependency
//! against a [`CoordinateIndex`] and each license name against a
//! [`LicenseNormalizer`].
//!
//! [`CoordinateIndex`]: ebuilder_portage::CoordinateIndex
//! [`LicenseNormalizer`]: ebuilder_core::LicenseNormalizer

pub mod error;
pub mod parser;
pub mod types;

pub use error::{MavenError, Result};
pub use parser::DescriptorParser;
pub use types::{MavenScope, ProjectModel, ResolvedDependency};
