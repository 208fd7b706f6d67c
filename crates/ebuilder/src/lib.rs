//! Resolves the Maven dependencies of effective POMs to Gentoo ebuilds.
//!
//! The [`Pipeline`] indexes every configured Portage tree, then turns each
//! effective POM into [`ProjectModel`]s whose dependencies point at the
//! ebuilds providing them.
//!
//! [`ProjectModel`]: ebuilder_maven::ProjectModel

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use pipeline::{IndexedPipeline, Pipeline, PipelineOptions};
